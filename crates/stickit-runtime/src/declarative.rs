#![forbid(unsafe_code)]

//! JSON binding documents.
//!
//! A document is an object mapping selectors to either a shorthand string
//! (the observed attribute) or an options object with camelCase keys:
//!
//! ```json
//! {
//!   "#name": "name",
//!   "#title": {
//!     "observe": ["first", "last"],
//!     "onGet": "formatTitle",
//!     "updateModel": false,
//!     "attributes": [{"name": "class", "observe": "kind"}]
//!   },
//!   "select": {
//!     "observe": "country",
//!     "selectOptions": {"collection": "countries", "labelPath": "name"}
//!   }
//! }
//! ```
//!
//! Booleans become literal gates and strings name view methods. A select
//! collection given as a string names a view method; any other JSON value
//! is used as the literal collection. Selector order is preserved.

use serde::Deserialize;
use stickit_core::{Map, Result, StickitError, Value};

use crate::callback::{Gate, Hook, Transform};
use crate::config::{AttributeBinding, BindingOptions, Bindings, Collection, Observe, SelectOptions};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ObserveSpec {
    One(String),
    Many(Vec<String>),
}

impl From<ObserveSpec> for Observe {
    fn from(spec: ObserveSpec) -> Self {
        match spec {
            ObserveSpec::One(name) => Self::One(name),
            ObserveSpec::Many(names) => Self::Many(names),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GateSpec {
    Literal(bool),
    Method(String),
}

impl From<GateSpec> for Gate {
    fn from(spec: GateSpec) -> Self {
        match spec {
            GateSpec::Literal(answer) => Self::Literal(answer),
            GateSpec::Method(name) => Self::Method(name),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct AttributeSpec {
    name: String,
    observe: Option<ObserveSpec>,
    on_get: Option<String>,
    format: Option<String>,
    #[serde(default)]
    escape: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SelectSpec {
    #[serde(default)]
    collection: Value,
    label_path: Option<String>,
    value_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OptionsSpec {
    observe: Option<ObserveSpec>,
    model_attr: Option<ObserveSpec>,
    events: Option<Vec<String>>,
    update_model: Option<GateSpec>,
    update_view: Option<GateSpec>,
    update_method: Option<String>,
    on_get: Option<String>,
    format: Option<String>,
    on_set: Option<String>,
    after_update: Option<String>,
    set_options: Option<Map<String, Value>>,
    escape: Option<bool>,
    attributes: Option<Vec<AttributeSpec>>,
    visible: Option<GateSpec>,
    visible_fn: Option<String>,
    select_options: Option<SelectSpec>,
}

fn method(name: Option<String>) -> Option<Transform> {
    name.map(Transform::Method)
}

impl From<AttributeSpec> for AttributeBinding {
    fn from(spec: AttributeSpec) -> Self {
        Self {
            name: spec.name,
            observe: spec.observe.map(Into::into),
            on_get: method(spec.on_get),
            format: method(spec.format),
            escape: spec.escape,
        }
    }
}

impl From<SelectSpec> for SelectOptions {
    fn from(spec: SelectSpec) -> Self {
        let collection = match spec.collection {
            Value::String(name) => Collection::Method(name),
            other => Collection::Values(other),
        };
        Self {
            collection,
            label_path: spec.label_path,
            value_path: spec.value_path,
        }
    }
}

impl From<OptionsSpec> for BindingOptions {
    fn from(spec: OptionsSpec) -> Self {
        Self {
            observe: spec.observe.map(Into::into),
            model_attr: spec.model_attr.map(Into::into),
            events: spec.events,
            update_model: spec.update_model.map(Into::into),
            update_view: spec.update_view.map(Into::into),
            update_method: spec.update_method,
            on_get: method(spec.on_get),
            format: method(spec.format),
            on_set: method(spec.on_set),
            get_val: None,
            update: None,
            after_update: spec.after_update.map(Hook::Method),
            set_options: spec.set_options,
            attributes: spec
                .attributes
                .map(|attrs| attrs.into_iter().map(Into::into).collect()),
            visible: spec.visible.map(Into::into),
            visible_fn: spec.visible_fn.map(Hook::Method),
            select_options: spec.select_options.map(Into::into),
            escape: spec.escape,
        }
    }
}

fn invalid(message: impl Into<String>) -> StickitError {
    StickitError::InvalidDeclaration {
        message: message.into(),
    }
}

fn declaration(selector: &str, value: Value) -> Result<BindingOptions> {
    match value {
        Value::Null => Ok(BindingOptions::new()),
        Value::String(observe) => Ok(BindingOptions::observing(observe)),
        Value::Object(_) => serde_json::from_value::<OptionsSpec>(value)
            .map(Into::into)
            .map_err(|err| invalid(format!("{selector}: {err}"))),
        other => Err(invalid(format!(
            "{selector}: expected a string or an object, found {other}"
        ))),
    }
}

impl Bindings {
    /// Parse a JSON binding document.
    pub fn from_json(document: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(document).map_err(|err| invalid(err.to_string()))?;
        Self::from_value(value)
    }

    /// Build bindings from an already parsed JSON document.
    pub fn from_value(document: Value) -> Result<Self> {
        let Value::Object(entries) = document else {
            return Err(invalid("binding document must be an object"));
        };
        let mut bindings = Self::new();
        for (selector, value) in entries {
            let options = declaration(&selector, value)?;
            bindings.insert(selector, options);
        }
        tracing::debug!(selectors = bindings.len(), "binding document loaded");
        Ok(bindings)
    }
}
