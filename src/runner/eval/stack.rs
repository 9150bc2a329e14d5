//! Stack growth for deeply nested evaluation.
//!
//! Every `execute` goes through here, so a script nested thousands of calls
//! deep hits the runtime's depth budget instead of the thread's stack limit.

/// Run `f`, moving to a fresh stack segment first when the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const RED_ZONE: usize = 128 * 1024;
    const NEW_SEGMENT: usize = 2 * 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, NEW_SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
