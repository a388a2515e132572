//! Single-writer async composer, debounced edits and event stream APIs.

/// Keyed cancellable debounce timers.
pub mod debounce;
/// Event stream types emitted by the composer.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
