#![forbid(unsafe_code)]

//! Stickit public facade.
//!
//! Two-way binding between an observable model and the elements of a view.
//! Declare per-selector [`BindingOptions`], hand them to a [`Binder`], and
//! model changes render into elements while element events write back to
//! the model.
//!
//! ```ignore
//! use stickit::prelude::*;
//!
//! let bindings = Bindings::new()
//!     .bind("#title", "title")
//!     .bind("#author", BindingOptions::observing("author").events(["blur"]));
//! let mut binder = Binder::new(&view);
//! binder.stickit(Some(model), Some(&bindings))?;
//! ```
//!
//! Hosts implement [`ElementHandle`] for their UI layer and either implement
//! [`ObservableModel`] or use the bundled in-memory [`Model`]. The `harness`
//! feature adds an in-memory document for tests.

pub use stickit_core as core;
pub use stickit_runtime as runtime;

#[cfg(feature = "harness")]
pub use stickit_harness as harness;

pub use stickit_core::{
    DomEvent, ElementHandle, ElementRef, Listener, ModelRef, ObservableModel, OptionEntry, Result,
    SetOptions, StickitError, Value, WriteToken, evaluate_path, json,
};
pub use stickit_runtime::{
    AfterUpdateHook, AttributeBinding, Binder, BindingOptions, Bindings, Collection,
    ElementTypeHandler, Gate, HandlerRegistry, MethodArgs, Model, Observe, SelectOptions,
    Transform, View, VisibilityHook, get_configuration,
};

/// Everything a typical binding site needs.
pub mod prelude {
    pub use crate::{
        AfterUpdateHook, AttributeBinding, Binder, BindingOptions, Bindings, ElementHandle,
        ElementRef, Gate, HandlerRegistry, MethodArgs, Model, ModelRef, ObservableModel,
        SelectOptions, SetOptions, StickitError, Transform, Value, View, VisibilityHook, json,
    };

    #[cfg(feature = "harness")]
    pub use stickit_harness::{Document, FixtureView, Selection, el};
}
