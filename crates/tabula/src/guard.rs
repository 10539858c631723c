use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{FrameError, FrameResult};

/// Run `f`, converting a panic inside it into an invalid-operation error attributed to `op`.
pub fn safe_operation<T, F>(op: &str, f: F) -> FrameResult<T>
where
    F: FnOnce() -> FrameResult<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::warn!("{op} panicked: {message}");
            Err(FrameError::invalid(op, format!("panic: {message}")))
        }
    }
}

/// Like [`safe_operation`] but panics with the rendered error. Intended for tests and debugging.
pub fn must_operation<T, F>(op: &str, f: F) -> T
where
    F: FnOnce() -> FrameResult<T>,
{
    match safe_operation(op, f) {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
