#![forbid(unsafe_code)]

//! Integration tests: built-in element handlers against the in-memory DOM.

use std::rc::Rc;

use stickit_core::{ElementHandle, ModelRef, ObservableModel, SetOptions, Value, json};
use stickit_harness::{Document, ElementBuilder, FixtureView, el};
use stickit_runtime::{Binder, BindingOptions, Bindings, Model, SelectOptions};

// ============================================================================
// Fixtures
// ============================================================================

struct Bound {
    view: Rc<FixtureView>,
    model: Rc<Model>,
    _binder: Binder,
}

fn bind(tree: ElementBuilder, attrs: Value, bindings: Bindings) -> Bound {
    bind_view(FixtureView::new(Document::new().mount(tree)), attrs, bindings)
}

fn bind_view(view: FixtureView, attrs: Value, bindings: Bindings) -> Bound {
    let view = Rc::new(view);
    let model = Rc::new(Model::with_attributes(attrs));
    let mut binder = Binder::new(&view);
    binder
        .stickit(Some(Rc::clone(&model) as ModelRef), Some(&bindings))
        .unwrap();
    Bound {
        view,
        model,
        _binder: binder,
    }
}

fn external(model: &Model, attr: &str, value: Value) {
    model.set(attr, value, &SetOptions::default()).unwrap();
}

fn countries() -> Value {
    json!([
        {"id": 1, "name": "Canada"},
        {"id": 2, "name": "Mexico"},
        {"id": 3, "name": "Peru"},
    ])
}

fn country_binding() -> BindingOptions {
    BindingOptions::observing("country").select_options(
        SelectOptions::values(countries())
            .label_path("name")
            .value_path("id"),
    )
}

// ============================================================================
// Free text
// ============================================================================

#[test]
fn textarea_syncs_both_ways() {
    let bound = bind(
        el("form").child(el("textarea").id("notes").text("placeholder")),
        json!({"notes": "first"}),
        Bindings::new().bind("#notes", "notes"),
    );
    let notes = bound.view.select("#notes");
    assert_eq!(notes.value(), json!("first"));

    notes.input("second", "paste").unwrap();
    assert_eq!(bound.model.get("notes"), Some(json!("second")));

    external(&bound.model, "notes", json!("third"));
    assert_eq!(notes.value(), json!("third"));
}

#[test]
fn number_inputs_write_numbers() {
    let bound = bind(
        el("form").child(el("input").id("age").attr("type", "number")),
        json!({"age": 30}),
        Bindings::new().bind("#age", "age"),
    );
    let age = bound.view.select("#age");
    assert_eq!(age.value(), json!("30"));

    age.input("42", "keyup").unwrap();
    assert_eq!(bound.model.get("age"), Some(json!(42)));

    age.input("4.5", "keyup").unwrap();
    assert_eq!(bound.model.get("age"), Some(json!(4.5)));

    age.input("abc", "change").unwrap();
    assert_eq!(bound.model.get("age"), Some(Value::Null));
}

#[test]
fn contenteditable_binds_html() {
    let bound = bind(
        el("article").child(el("div").id("bio").attr("contenteditable", "true")),
        json!({"bio": "<b>bold</b>"}),
        Bindings::new().bind("#bio", "bio"),
    );
    let bio = bound.view.select("#bio");
    assert_eq!(bio.html(), "<b>bold</b>");
    assert_eq!(bio.text(), "bold");

    bio.write("html", &json!("<i>typed</i>")).unwrap();
    bio.trigger("keyup").unwrap();
    assert_eq!(bound.model.get("bio"), Some(json!("<i>typed</i>")));
}

#[test]
fn plain_elements_render_escaped_text() {
    let bound = bind(
        el("div").child(el("p").id("out")),
        json!({"out": "a < b & c"}),
        Bindings::new().bind("#out", "out"),
    );
    let out = bound.view.select("#out");
    assert_eq!(out.text(), "a < b & c");
    assert_eq!(out.html(), "a &lt; b &amp; c");
    assert!(bound.view.root().listener_count() == 0, "read-only bindings attach no listeners");
}

// ============================================================================
// Checkboxes and radios
// ============================================================================

#[test]
fn single_checkbox_reads_a_boolean() {
    let bound = bind(
        el("form").child(el("input").id("agree").attr("type", "checkbox")),
        json!({"agree": true}),
        Bindings::new().bind("#agree", "agree"),
    );
    let agree = bound.view.select("#agree");
    assert!(agree.is_checked());

    agree.set_checked(false);
    agree.trigger("change").unwrap();
    assert_eq!(bound.model.get("agree"), Some(json!(false)));

    external(&bound.model, "agree", json!(true));
    assert!(agree.is_checked());
}

#[test]
fn valued_checkbox_reads_its_value_or_null() {
    let bound = bind(
        el("form").child(
            el("input")
                .id("opt")
                .attr("type", "checkbox")
                .attr("value", "yes"),
        ),
        json!({"opt": "yes"}),
        Bindings::new().bind("#opt", "opt"),
    );
    let opt = bound.view.select("#opt");
    assert!(opt.is_checked());

    opt.set_checked(false);
    opt.trigger("change").unwrap();
    assert_eq!(bound.model.get("opt"), Some(Value::Null));

    opt.set_checked(true);
    opt.trigger("change").unwrap();
    assert_eq!(bound.model.get("opt"), Some(json!("yes")));
}

#[test]
fn checkbox_groups_bind_arrays() {
    let boxes = ["a", "b", "c"].map(|value| {
        el("input")
            .attr("type", "checkbox")
            .attr("class", "tag")
            .attr("value", value)
    });
    let bound = bind(
        el("form").children(boxes),
        json!({"tags": ["a", "c"]}),
        Bindings::new().bind(".tag", "tags"),
    );
    let tags = bound.view.select(".tag");
    let checked: Vec<bool> = (0..3).map(|i| tags.at(i).is_checked()).collect();
    assert_eq!(checked, vec![true, false, true]);

    tags.at(1).set_checked(true);
    tags.at(0).set_checked(false);
    tags.at(1).trigger("change").unwrap();
    assert_eq!(bound.model.get("tags"), Some(json!(["b", "c"])));

    external(&bound.model, "tags", json!([]));
    assert!((0..3).all(|i| !tags.at(i).is_checked()));
}

#[test]
fn radio_groups_bind_the_checked_value() {
    let radios = ["red", "green", "blue"].map(|value| {
        el("input")
            .attr("type", "radio")
            .attr("name", "color")
            .attr("value", value)
    });
    let bound = bind(
        el("form").children(radios),
        json!({"color": "green"}),
        Bindings::new().bind(r#"[name="color"]"#, "color"),
    );
    let group = bound.view.select(r#"[name="color"]"#);
    assert!(group.at(1).is_checked());

    group.at(2).set_checked(true);
    group.at(2).trigger("change").unwrap();
    assert_eq!(bound.model.get("color"), Some(json!("blue")));
    assert!(!group.at(1).is_checked());

    external(&bound.model, "color", json!("red"));
    assert!(group.at(0).is_checked());
    assert_eq!(bound.view.root().find(":checked").len(), 1);
}

#[test]
fn null_model_value_leaves_the_radio_group_unchecked() {
    let radios = ["", "x"].map(|value| {
        el("input")
            .attr("type", "radio")
            .attr("name", "c")
            .attr("value", value)
    });
    let bound = bind(
        el("form").children(radios),
        json!({"c": null}),
        Bindings::new().bind(r#"[name="c"]"#, "c"),
    );
    let group = bound.view.select(r#"[name="c"]"#);
    assert!(!group.at(0).is_checked());
    assert!(!group.at(1).is_checked());
    assert_eq!(bound.view.root().find(":checked").len(), 0);

    external(&bound.model, "c", json!(""));
    assert!(group.at(0).is_checked());
}

// ============================================================================
// Selects
// ============================================================================

#[test]
fn select_renders_collection_and_marks_model_value() {
    let bound = bind(
        el("form").child(el("select").id("country")),
        json!({"country": 2}),
        Bindings::new().bind("#country", country_binding()),
    );
    let select = bound.view.select("#country");
    assert_eq!(select.option_labels(), vec!["Canada", "Mexico", "Peru"]);
    assert_eq!(select.selected_options(), vec![1]);

    select.select_index(2);
    select.trigger("change").unwrap();
    assert_eq!(bound.model.get("country"), Some(json!(3)));

    external(&bound.model, "country", json!("1"));
    assert_eq!(select.selected_options(), vec![0], "loose match against a string");
}

#[test]
fn select_with_null_value_gets_an_empty_option() {
    let bound = bind(
        el("form").child(el("select").id("country")),
        json!({"country": null}),
        Bindings::new().bind("#country", country_binding()),
    );
    let select = bound.view.select("#country");
    assert_eq!(select.option_labels(), vec!["", "Canada", "Mexico", "Peru"]);
    assert_eq!(select.selected_options(), vec![0]);

    select.select_index(1);
    select.trigger("change").unwrap();
    assert_eq!(bound.model.get("country"), Some(json!(1)));

    select.select_index(0);
    select.trigger("change").unwrap();
    assert_eq!(bound.model.get("country"), Some(Value::Null));
}

#[test]
fn select_keeps_object_values() {
    let collection = json!([
        {"label": "small", "value": {"w": 1}},
        {"label": "large", "value": {"w": 9}},
    ]);
    let bound = bind(
        el("form").child(el("select").id("size")),
        json!({"size": {"w": 9}}),
        Bindings::new().bind(
            "#size",
            BindingOptions::observing("size").select_options(SelectOptions::values(collection)),
        ),
    );
    let select = bound.view.select("#size");
    assert_eq!(select.selected_options(), vec![1]);

    select.select_index(0);
    select.trigger("change").unwrap();
    assert_eq!(bound.model.get("size"), Some(json!({"w": 1})));
}

#[test]
fn select_renders_option_groups() {
    let collection = json!({
        "opt_labels": ["Looney Tunes", "Three Stooges"],
        "Looney Tunes": [{"id": 1, "name": "Bugs Bunny"}, {"id": 2, "name": "Donald Duck"}],
        "Three Stooges": [{"id": 3, "name": "moe"}, {"id": 4, "name": "larry"}],
    });
    let bound = bind(
        el("form").child(el("select").id("character")),
        json!({"character": 3}),
        Bindings::new().bind(
            "#character",
            BindingOptions::observing("character").select_options(
                SelectOptions::values(collection)
                    .label_path("name")
                    .value_path("id"),
            ),
        ),
    );
    let select = bound.view.select("#character");
    assert_eq!(
        select.option_labels(),
        vec!["Bugs Bunny", "Donald Duck", "moe", "larry"]
    );
    assert_eq!(
        select.option_groups(),
        vec![
            Some("Looney Tunes".to_string()),
            Some("Looney Tunes".to_string()),
            Some("Three Stooges".to_string()),
            Some("Three Stooges".to_string()),
        ]
    );
    assert_eq!(select.find("optgroup").len(), 2);
    assert_eq!(select.selected_options(), vec![2]);

    select.select_index(3);
    select.trigger("change").unwrap();
    assert_eq!(bound.model.get("character"), Some(json!(4)));
}

#[test]
fn multiple_select_binds_arrays() {
    let bound = bind(
        el("form").child(el("select").id("tags").flag("multiple")),
        json!({"tags": ["a", "c"]}),
        Bindings::new().bind(
            "#tags",
            BindingOptions::observing("tags")
                .select_options(SelectOptions::values(json!(["a", "b", "c"]))),
        ),
    );
    let select = bound.view.select("#tags");
    assert_eq!(select.selected_options(), vec![0, 2]);

    select.select_indexes(&[1, 2]);
    select.trigger("change").unwrap();
    assert_eq!(bound.model.get("tags"), Some(json!(["b", "c"])));

    select.select_indexes(&[]);
    select.trigger("change").unwrap();
    assert_eq!(bound.model.get("tags"), Some(json!([])));
}

#[test]
fn select_collection_from_a_view_method() {
    let view = FixtureView::new(Document::new().mount(el("form").child(el("select").id("pick"))))
        .with_method("choices", |_| Ok(json!(["x", "y", "z"])));
    let bound = bind_view(
        view,
        json!({"pick": "y"}),
        Bindings::new().bind(
            "#pick",
            BindingOptions::observing("pick").select_options(SelectOptions::method("choices")),
        ),
    );
    let select = bound.view.select("#pick");
    assert_eq!(select.option_labels(), vec!["x", "y", "z"]);
    assert_eq!(select.selected_options(), vec![1]);
    assert_eq!(bound.view.call_count("choices"), 1);

    external(&bound.model, "pick", json!("z"));
    assert_eq!(bound.view.call_count("choices"), 2, "every write re-renders");
    assert_eq!(select.selected_options(), vec![2]);
}

#[test]
fn select_collection_from_a_callback() {
    let bound = bind(
        el("form").child(el("select").id("pick")),
        json!({"pick": 20}),
        Bindings::new().bind(
            "#pick",
            BindingOptions::observing("pick")
                .select_options(SelectOptions::callback(|_| Ok(json!([10, 20, 30])))),
        ),
    );
    let select = bound.view.select("#pick");
    assert_eq!(select.option_labels(), vec!["10", "20", "30"]);
    assert_eq!(select.selected_options(), vec![1]);

    select.select_index(0);
    select.trigger("change").unwrap();
    assert_eq!(bound.model.get("pick"), Some(json!(10)));
}
