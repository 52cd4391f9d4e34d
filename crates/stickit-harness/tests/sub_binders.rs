#![forbid(unsafe_code)]

//! Integration tests: attribute and visibility sub-binders.

use std::cell::RefCell;
use std::rc::Rc;

use stickit_core::{ElementHandle, ModelRef, ObservableModel, SetOptions, Value, json};
use stickit_harness::{Document, ElementBuilder, FixtureView, el};
use stickit_runtime::{
    AttributeBinding, Binder, BindingOptions, Bindings, Gate, Model, MethodArgs, Transform,
    VisibilityHook,
};

// ============================================================================
// Fixtures
// ============================================================================

fn page() -> ElementBuilder {
    el("main")
        .child(el("a").id("link"))
        .child(el("div").id("box").attr("class", "box"))
        .child(el("input").id("field").attr("type", "text"))
        .child(el("p").id("note"))
}

fn bind(view: FixtureView, attrs: Value, bindings: Bindings) -> (Rc<FixtureView>, Rc<Model>, Binder) {
    let view = Rc::new(view);
    let model = Rc::new(Model::with_attributes(attrs));
    let mut binder = Binder::new(&view);
    binder
        .stickit(Some(Rc::clone(&model) as ModelRef), Some(&bindings))
        .unwrap();
    (view, model, binder)
}

fn plain_view() -> FixtureView {
    FixtureView::new(Document::new().mount(page()))
}

fn external(model: &Model, attr: &str, value: Value) {
    model.set(attr, value, &SetOptions::default()).unwrap();
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn attributes_follow_their_own_observed_attribute() {
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"title": "Docs", "url": "/docs"}),
        Bindings::new().bind(
            "#link",
            BindingOptions::observing("title")
                .attribute(AttributeBinding::new("href").observe("url")),
        ),
    );
    let link = view.select("#link");
    assert_eq!(link.text(), "Docs");
    assert_eq!(link.attr("href").as_deref(), Some("/docs"));

    external(&model, "url", json!("/api"));
    assert_eq!(link.attr("href").as_deref(), Some("/api"));
    assert_eq!(link.text(), "Docs");
}

#[test]
fn attributes_default_to_the_binding_observe() {
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"name": "ann"}),
        Bindings::new().bind(
            "#note",
            BindingOptions::observing("name").attribute(AttributeBinding::new("data-name")),
        ),
    );
    let note = view.select("#note");
    assert_eq!(note.attr("data-name").as_deref(), Some("ann"));

    external(&model, "name", json!("bob"));
    assert_eq!(note.attr("data-name").as_deref(), Some("bob"));
}

#[test]
fn class_attribute_swaps_the_previous_value() {
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"state": "active"}),
        Bindings::new().bind(
            "#box",
            BindingOptions::new().attribute(AttributeBinding::new("class").observe("state")),
        ),
    );
    let node = view.select("#box");
    assert!(node.has_class("box"));
    assert!(node.has_class("active"));

    external(&model, "state", json!("done"));
    assert!(node.has_class("box"), "unrelated classes survive");
    assert!(node.has_class("done"));
    assert!(!node.has_class("active"));
}

#[test]
fn class_arrays_add_each_entry() {
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"flags": ["open", "wide"]}),
        Bindings::new().bind(
            "#box",
            BindingOptions::new().attribute(AttributeBinding::new("class").observe("flags")),
        ),
    );
    let node = view.select("#box");
    assert!(node.has_class("open"));
    assert!(node.has_class("wide"));
    assert!(!node.has_class("open,wide"));

    external(&model, "flags", json!(["closed"]));
    assert!(node.has_class("box"));
    assert!(node.has_class("closed"));
    assert!(!node.has_class("open"));
    assert!(!node.has_class("wide"));
}

#[test]
fn boolean_names_are_written_as_properties() {
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"locked": true}),
        Bindings::new().bind(
            "#field",
            BindingOptions::new().attribute(AttributeBinding::new("disabled").observe("locked")),
        ),
    );
    let field = view.select("#field");
    assert_eq!(field.prop("disabled"), json!(true));
    assert!(field.attr("disabled").is_none(), "properties leave attributes alone");

    external(&model, "locked", json!(0));
    assert_eq!(field.prop("disabled"), json!(false));
}

#[test]
fn attribute_format_through_a_view_method() {
    let view = plain_view().with_method("countLabel", |args: MethodArgs<'_>| {
        let count = args.value().and_then(Value::as_i64).unwrap_or_default();
        Ok(json!(format!("{count} items")))
    });
    let (view, model, _binder) = bind(
        view,
        json!({"count": 3}),
        Bindings::new().bind(
            "#note",
            BindingOptions::new().attribute(
                AttributeBinding::new("title")
                    .observe("count")
                    .format(Transform::method("countLabel")),
            ),
        ),
    );
    let note = view.select("#note");
    assert_eq!(note.attr("title").as_deref(), Some("3 items"));

    external(&model, "count", json!(4));
    assert_eq!(note.attr("title").as_deref(), Some("4 items"));
    assert_eq!(view.call_count("countLabel"), 2);
}

#[test]
fn escaped_attributes_and_null_removal() {
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"tip": "<b>"}),
        Bindings::new().bind(
            "#note",
            BindingOptions::new()
                .attribute(AttributeBinding::new("title").observe("tip").escape(true))
                .attribute(AttributeBinding::new("data-tip").observe("tip")),
        ),
    );
    let note = view.select("#note");
    assert_eq!(note.attr("title").as_deref(), Some("&lt;b&gt;"));
    assert_eq!(note.attr("data-tip").as_deref(), Some("<b>"));

    external(&model, "tip", Value::Null);
    assert!(note.attr("data-tip").is_none());
}

#[test]
fn attribute_bindings_are_released_with_the_view() {
    let (_view, model, mut binder) = bind(
        plain_view(),
        json!({"url": "/"}),
        Bindings::new().bind(
            "#link",
            BindingOptions::new().attribute(AttributeBinding::new("href").observe("url")),
        ),
    );
    assert_eq!(model.subscriber_count("change:url"), 1);
    binder.unstickit();
    assert_eq!(model.total_subscribers(), 0);
}

// ============================================================================
// Visibility
// ============================================================================

fn visibility(gate: Gate) -> BindingOptions {
    BindingOptions::observing("show").visible(gate).update_view(false)
}

#[test]
fn visible_true_follows_truthiness() {
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"show": ""}),
        Bindings::new().bind("#note", visibility(Gate::Literal(true))),
    );
    let note = view.select("#note");
    assert!(!note.is_visible());

    external(&model, "show", json!("yes"));
    assert!(note.is_visible());

    external(&model, "show", json!(0));
    assert!(!note.is_visible());
}

#[test]
fn visible_false_always_hides() {
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"show": true}),
        Bindings::new().bind("#note", visibility(Gate::Literal(false))),
    );
    let note = view.select("#note");
    assert!(!note.is_visible());
    external(&model, "show", json!(false));
    external(&model, "show", json!(true));
    assert!(!note.is_visible());
}

#[test]
fn visible_method_decides_by_its_result() {
    let view = plain_view().with_method("isPositive", |args| {
        let n = args.value().and_then(Value::as_i64).unwrap_or_default();
        Ok(json!(n > 0))
    });
    let (view, model, _binder) = bind(
        view,
        json!({"show": -1}),
        Bindings::new().bind("#note", visibility(Gate::method("isPositive"))),
    );
    let note = view.select("#note");
    assert!(!note.is_visible());

    external(&model, "show", json!(5));
    assert!(note.is_visible());
}

#[test]
fn visible_predicate_callback() {
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"show": "hidden"}),
        Bindings::new().bind(
            "#note",
            visibility(Gate::predicate(|value| value == &json!("shown"))),
        ),
    );
    let note = view.select("#note");
    assert!(!note.is_visible());
    external(&model, "show", json!("shown"));
    assert!(note.is_visible());
}

#[test]
fn visible_fn_replaces_show_and_hide() {
    let decisions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&decisions);
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"show": false}),
        Bindings::new().bind(
            "#note",
            visibility(Gate::Literal(true)).visible_fn(VisibilityHook::callback(
                move |element, visible, _| {
                    sink.borrow_mut().push((element.len(), visible));
                    Ok(())
                },
            )),
        ),
    );
    external(&model, "show", json!(true));
    assert_eq!(*decisions.borrow(), vec![(1, false), (1, true)]);
    assert!(view.select("#note").is_visible(), "primitives were not used");
}

#[test]
fn visible_fn_as_a_view_method() {
    let view = plain_view().with_method("slide", |args| match args {
        MethodArgs::Visibility { element, visible, .. } => {
            element.set_attr("data-slid", &json!(visible));
            Ok(Value::Null)
        }
        _ => Ok(Value::Null),
    });
    let (view, _model, _binder) = bind(
        view,
        json!({"show": 1}),
        Bindings::new().bind(
            "#note",
            visibility(Gate::Literal(true)).visible_fn(VisibilityHook::method("slide")),
        ),
    );
    assert_eq!(view.select("#note").attr("data-slid").as_deref(), Some("true"));
}

#[test]
fn visible_bindings_still_update_content_by_default() {
    let (view, model, _binder) = bind(
        plain_view(),
        json!({"show": "hello"}),
        Bindings::new().bind("#note", BindingOptions::observing("show").visible(true)),
    );
    let note = view.select("#note");
    assert_eq!(note.text(), "hello");
    assert!(note.is_visible());

    external(&model, "show", json!(""));
    assert_eq!(note.text(), "");
    assert!(!note.is_visible());
}
