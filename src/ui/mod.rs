//! UI layer: landing screen, dialogs and terminal event handling.

mod dialogs;
pub mod event_source;
mod field;
pub mod shell;
mod styles;
mod terminal;
mod view;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
