#![forbid(unsafe_code)]

//! Test harness and reference fixtures for stickit.
//!
//! # Role in stickit
//! `stickit-harness` is the in-memory host the binding engine is exercised
//! against. It implements [`ElementHandle`] over a small document model and
//! [`View`] over a mounted tree, so integration tests and benches can drive
//! real two-way bindings without a browser.
//!
//! # Primary responsibilities
//! - **Document**: arena-backed element tree with attributes, properties,
//!   form state and namespaced, delegated event listeners.
//! - **Selector**: the CSS subset bindings and handlers use.
//! - **Selection**: jQuery-style node sets plus user actions (`set_value`,
//!   `set_checked`, `select_index`, `trigger`).
//! - **FixtureView**: a view with named methods and a call log.
//! - **strategies**: proptest generators for binding scenarios.
//!
//! # Example
//! ```
//! use std::rc::Rc;
//! use stickit_harness::{Document, FixtureView, el};
//! use stickit_runtime::{Binder, Bindings, Model};
//! use stickit_core::{ModelRef, json};
//!
//! let root = Document::new().mount(el("form").child(el("input").id("name")));
//! let view = Rc::new(FixtureView::new(root));
//! let model = Rc::new(Model::with_attributes(json!({"name": "Ann"})));
//!
//! let mut binder = Binder::new(&view);
//! binder
//!     .stickit(Some(model.clone() as ModelRef), Some(&Bindings::new().bind("#name", "name")))
//!     .unwrap();
//! assert_eq!(view.select("#name").value(), json!("Ann"));
//!
//! view.select("#name").input("Bob", "keyup").unwrap();
//! assert_eq!(model.attributes()["name"], json!("Bob"));
//! ```
//!
//! [`ElementHandle`]: stickit_core::ElementHandle
//! [`View`]: stickit_runtime::View

pub mod dom;
pub mod fixture;
pub mod selection;
pub mod selector;
pub mod strategies;

pub use dom::{Document, ElementBuilder, NodeId, el};
pub use fixture::{FixtureView, MethodFn};
pub use selection::Selection;
pub use selector::{SelectorError, SelectorList};
