#![forbid(unsafe_code)]

//! Core primitives for stickit.
//!
//! This crate defines the capabilities the binding engine consumes but does
//! not implement itself:
//!
//! - [`ElementHandle`]: a selection of rendered UI nodes (query, events,
//!   content, properties, attributes, classes, visibility, option lists).
//! - [`ObservableModel`]: an attribute store that emits `change:<attr>`
//!   events and accepts tagged writes.
//!
//! It also carries the dynamic value helpers shared by every layer
//! ([`value`], [`path`]), the [`WriteToken`] used for echo suppression, and
//! the crate-wide [`StickitError`].

pub mod dom;
pub mod error;
pub mod model;
pub mod path;
pub mod token;
pub mod value;

pub use dom::{DomEvent, ElementHandle, ElementRef, Listener, OptionEntry};
pub use error::{Result, StickitError};
pub use model::{
    ChangeEvent, ChangeHandler, ModelRef, ObservableModel, SetOptions, SubscriptionId,
    change_event, same_model,
};
pub use path::evaluate_path;
pub use serde_json::{Map, Value, json};
pub use token::WriteToken;
