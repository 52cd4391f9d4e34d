#![forbid(unsafe_code)]

//! In-memory observable model.
//!
//! [`Model`] is the reference [`ObservableModel`] implementation: an ordered
//! attribute map that notifies subscribers of `change:<attr>` and `change`
//! events. Hosts with their own model layer implement the trait directly.
//!
//! # Invariants
//!
//! 1. Setting a value equal to the current value is a no-op (no events).
//! 2. Subscribers are notified in registration order.
//! 3. `change:<attr>` fires before the generic `change` event.
//! 4. A subscriber removed during a notification cycle still receives the
//!    event of that cycle; one added during the cycle does not.
//!
//! [`ObservableModel`]: stickit_core::ObservableModel

pub mod model;

pub use model::Model;
