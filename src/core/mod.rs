//! Snippet registry and drag-reorder engine.

/// Ordered snippet registry.
pub mod registry;
/// Drag gesture state machine and move helper.
pub mod reorder;
