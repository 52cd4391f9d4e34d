#![forbid(unsafe_code)]

//! Built-in element-type handlers.
//!
//! | Selector | Events | Read | Write |
//! |----------|--------|------|-------|
//! | `[contenteditable="true"]` | keyup, change, paste, cut | HTML | HTML |
//! | `input` | keyup, change, paste, cut | value (number for `type=number`) | value |
//! | `textarea` | keyup, change, paste, cut | value | value |
//! | `input[type="radio"]` | change | checked member's value | check matching member |
//! | `input[type="checkbox"]` | change | bool, or checked values for groups | toggle `checked` |
//! | `select` | change | stored value(s) of selected option(s) | rebuild options |
//!
//! Registration order matters: the radio and checkbox handlers come after
//! the generic `input` handler so their strategies win for those inputs.

mod choice;
mod select;
mod text;

use crate::config::ElementTypeHandler;

pub use select::render_options;

/// Events that signal an edit of free-form text.
pub const TEXT_EVENTS: [&str; 4] = ["keyup", "change", "paste", "cut"];

/// The default handlers in registration order.
#[must_use]
pub fn default_handlers() -> Vec<ElementTypeHandler> {
    vec![
        text::contenteditable(),
        text::input(),
        text::textarea(),
        choice::radio(),
        choice::checkbox(),
        select::select(),
    ]
}
