#![forbid(unsafe_code)]

//! Select handler.
//!
//! Every write rebuilds the option list from `select_options.collection`.
//! The collection is either an array of items or an object describing
//! option groups:
//!
//! ```json
//! {
//!   "opt_labels": ["Looney Tunes", "Three Stooges"],
//!   "Looney Tunes": [{"id": 1, "name": "Bugs Bunny"}],
//!   "Three Stooges": [{"id": 3, "name": "moe"}]
//! }
//! ```
//!
//! Each item's label and stored value are taken from `label_path` and
//! `value_path` (defaults `"label"` and `"value"`; a path that does not
//! resolve yields the item itself). Stored values are kept in the binding's
//! [`OptionTable`] by position, so reads return the original values rather
//! than their string forms.
//!
//! # Selection rules
//!
//! - single: an option is selected when its value loosely equals the model
//!   value (both non-null), or deep-equals an object model value;
//! - multiple: the model value is an array; each entry (reduced through
//!   `value_path` when it is an object) selects the options it matches;
//! - a `null` model value adds a leading, selected empty option.
//!
//! [`OptionTable`]: crate::config::OptionTable

use stickit_core::value::{display_string, is_object, is_truthy, loose_eq};
use stickit_core::{ElementHandle, OptionEntry, Result, Value, evaluate_path};

use crate::config::{BindingOptions, Collection, EffectiveConfig, ElementTypeHandler, SelectOptions};
use crate::view::{MethodArgs, View};

const DEFAULT_LABEL_PATH: &str = "label";
const DEFAULT_VALUE_PATH: &str = "value";
const GROUP_LABELS_KEY: &str = "opt_labels";

pub(super) fn select() -> ElementTypeHandler {
    ElementTypeHandler::new(
        "select",
        BindingOptions::new()
            .events(["change"])
            .update(|view, element, value, _, config| update_select(view, element, value, config))
            .get_val(|_, element, config| Ok(read_select(element, config))),
    )
}

fn is_multiple(element: &dyn ElementHandle) -> bool {
    is_truthy(&element.prop("multiple"))
}

fn resolve_collection(view: &dyn View, config: &EffectiveConfig) -> Result<Value> {
    let Some(select) = &config.select_options else {
        return Ok(Value::Null);
    };
    match &select.collection {
        Collection::Values(values) => Ok(values.clone()),
        Collection::Method(name) => view.call_method(name, MethodArgs::Collection { config }),
        Collection::Callback(f) => f(view),
    }
}

fn update_select(
    view: &dyn View,
    element: &dyn ElementHandle,
    value: &Value,
    config: &EffectiveConfig,
) -> Result<()> {
    let collection = resolve_collection(view, config)?;
    let defaults = SelectOptions::default();
    let select = config.select_options.as_ref().unwrap_or(&defaults);
    let (entries, values) = render_options(&collection, select, value, is_multiple(element));
    tracing::trace!(options = entries.len(), "select options rendered");
    element.set_options(&entries);
    config.option_table.replace(values);
    Ok(())
}

fn read_select(element: &dyn ElementHandle, config: &EffectiveConfig) -> Value {
    let selected = element.selected_options();
    if is_multiple(element) {
        return Value::Array(
            selected
                .into_iter()
                .map(|index| config.option_table.get(index))
                .collect(),
        );
    }
    selected
        .first()
        .map_or(Value::Null, |index| config.option_table.get(*index))
}

/// Option list under construction; `values[i]` is the stored value of
/// `entries[i]`.
#[derive(Default)]
struct Rendered {
    entries: Vec<OptionEntry>,
    values: Vec<Value>,
}

impl Rendered {
    fn push(&mut self, group: Option<&str>, label: String, value: Value, selected: bool) {
        self.entries.push(OptionEntry {
            group: group.map(str::to_string),
            label,
            selected,
        });
        self.values.push(value);
    }

    /// Append `items` to the container whose first option sits at `start`.
    fn extend(
        &mut self,
        start: usize,
        group: Option<&str>,
        items: &[Value],
        select: &SelectOptions,
        field: &Value,
        multiple: bool,
    ) {
        let label_path = select.label_path.as_deref().unwrap_or(DEFAULT_LABEL_PATH);
        let value_path = select.value_path.as_deref().unwrap_or(DEFAULT_VALUE_PATH);
        for item in items {
            if item.is_null() {
                // One empty option per container.
                if self.values.len() > start && self.values[start].is_null() {
                    continue;
                }
                let selected = is_selected(&Value::Null, field, multiple, select);
                self.push(group, String::new(), Value::Null, selected);
                continue;
            }
            let label = display_string(evaluate_path(item, Some(label_path)));
            let option_value = evaluate_path(item, Some(value_path)).clone();
            let selected = is_selected(&option_value, field, multiple, select);
            self.push(group, label, option_value, selected);
        }
    }
}

fn is_selected(option: &Value, field: &Value, multiple: bool, select: &SelectOptions) -> bool {
    if !multiple && !option.is_null() && !field.is_null() && loose_eq(option, field) {
        return true;
    }
    if is_object(field) && option == field {
        return true;
    }
    if !multiple {
        return false;
    }
    let Some(wanted) = field.as_array() else {
        return false;
    };
    wanted.iter().any(|candidate| {
        let candidate = if is_object(candidate) {
            evaluate_path(candidate, select.value_path.as_deref())
        } else {
            candidate
        };
        loose_eq(candidate, option) || (is_object(candidate) && candidate == option)
    })
}

fn list_items(value: Option<&Value>) -> &[Value] {
    match value.and_then(Value::as_array) {
        Some(items) => items,
        None => &[],
    }
}

/// Build the option list for `collection` given the current model `value`.
///
/// Returns the rendered entries and, position for position, the stored
/// value of each entry.
#[must_use]
pub fn render_options(
    collection: &Value,
    select: &SelectOptions,
    value: &Value,
    multiple: bool,
) -> (Vec<OptionEntry>, Vec<Value>) {
    let mut rendered = Rendered::default();
    if value.is_null() {
        rendered.push(None, String::new(), Value::Null, true);
    }
    match collection {
        Value::Array(items) => rendered.extend(0, None, items, select, value, multiple),
        Value::Object(groups) => {
            for label in list_items(groups.get(GROUP_LABELS_KEY)) {
                let label = display_string(label);
                let items = list_items(groups.get(&label));
                let start = rendered.values.len();
                rendered.extend(start, Some(&label), items, select, value, multiple);
            }
        }
        _ => {}
    }
    (rendered.entries, rendered.values)
}
