//! HTTP access to the code and booking endpoints, plus the worker that runs
//! those calls off the UI thread.

pub mod client;
pub mod dispatcher;
pub mod wire;

/// Returns the api module name for smoke checks.
pub fn module_name() -> &'static str {
    "api"
}
