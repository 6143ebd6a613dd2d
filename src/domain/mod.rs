//! Domain layer: dialog state machines, validation rules and session state.

pub mod auth_flow;
pub mod booking_flow;
pub mod consultation_list_state;
pub mod contact;
pub mod dialog_error;
pub mod events;
pub mod identity;
pub mod locale;
pub mod remote;
pub mod shell_state;
pub mod text_input_state;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
