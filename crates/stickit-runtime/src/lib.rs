#![forbid(unsafe_code)]

//! Binding engine for stickit.
//!
//! # Role in stickit
//! `stickit-runtime` turns declarative per-selector binding options into
//! live two-way synchronization between an [`ObservableModel`] and the
//! elements of a [`View`]. It owns configuration resolution, the handler
//! registry with the built-in element handlers, and the [`Binder`] that
//! wires and unwires everything.
//!
//! # Primary responsibilities
//! - **HandlerRegistry**: ordered element-type handlers, later ones winning.
//! - **get_configuration**: generic handler → matching handlers → declaration.
//! - **Binder**: `stickit`, `unstick_model`, `unstick_view`, `unstickit`,
//!   `remove`.
//! - **Model**: an in-memory observable model for hosts without their own.
//!
//! # How it fits in the system
//! The runtime only talks to the UI through [`ElementHandle`] and to data
//! through [`ObservableModel`], both defined in `stickit-core`. The harness
//! crate supplies an in-memory DOM for tests; real hosts supply their own.
//!
//! [`ObservableModel`]: stickit_core::ObservableModel
//! [`ElementHandle`]: stickit_core::ElementHandle

pub mod attributes;
pub mod binder;
pub mod callback;
pub mod config;
#[cfg(feature = "declarative")]
pub mod declarative;
pub mod handlers;
pub mod pipeline;
pub mod reactive;
pub mod registry;
pub mod resolver;
pub mod scope;
pub mod view;
pub mod visible;

#[cfg(test)]
pub(crate) mod testing;

pub use attributes::{BOOLEAN_PROPERTIES, is_boolean_property};
pub use binder::{Binder, namespace_for};
pub use callback::{
    AfterUpdateHook, CollectionFn, Gate, GetValFn, Hook, Transform, UpdateFn, VisibilityHook,
};
pub use config::{
    AttributeBinding, BindingOptions, Bindings, Collection, EffectiveConfig, ElementTypeHandler,
    HandlerSelector, Observe, OptionTable, ROOT_SELECTOR, SelectOptions,
};
pub use handlers::{TEXT_EVENTS, default_handlers, render_options};
pub use pipeline::{get_attr, set_attr};
pub use reactive::Model;
pub use registry::{HandlerRegistry, IntoHandlers};
pub use resolver::{generic_handler, get_configuration};
pub use scope::{ModelBinding, ModelBindings};
pub use view::{MethodArgs, View};
