use thiserror::Error;
use tracing::debug;

/// Gesture event arrived outside of a drag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    /// `hover`, `drop` or `cancel` without a preceding `begin_drag`.
    #[error("no drag gesture in progress")]
    NotDragging,
}

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Item at `source` is being dragged.
    Dragging {
        /// Index the gesture started from.
        source: usize,
        /// Advisory landing index for the placement indicator.
        pending: Option<usize>,
    },
}

/// Advisory state exposed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragIndicator {
    /// Index being dragged.
    pub dragged: Option<usize>,
    /// Index the indicator should be drawn at.
    pub pending_drop: Option<usize>,
}

/// Completed move produced by a drop, in post-removal coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reorder {
    /// Index the item is taken from.
    pub from: usize,
    /// Index the item lands at once removed from `from`.
    pub to: usize,
}

/// Drag-and-drop state machine over list indices.
///
/// The engine never touches the list itself: a completed [`drop`](Self::drop)
/// hands back a [`Reorder`] for the owner of the list to apply. A second
/// `begin_drag` while a gesture is live cancels the earlier gesture.
#[derive(Debug, Default)]
pub struct ReorderEngine {
    state: DragState,
}

impl ReorderEngine {
    /// Idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// True while a gesture is live.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Placement hints for the current gesture; empty when idle.
    pub fn indicator(&self) -> DragIndicator {
        match self.state {
            DragState::Idle => DragIndicator::default(),
            DragState::Dragging { source, pending } => DragIndicator {
                dragged: Some(source),
                pending_drop: pending,
            },
        }
    }

    /// Starts dragging the item at `source`.
    pub fn begin_drag(&mut self, source: usize) {
        if let DragState::Dragging { source: prev, .. } = self.state {
            debug!(prev, source, "restarting drag, previous gesture cancelled");
        }
        self.state = DragState::Dragging {
            source,
            pending: None,
        };
    }

    /// Updates the advisory drop index. Hovering the source slot changes nothing.
    pub fn hover(&mut self, target: usize) -> Result<(), ReorderError> {
        match &mut self.state {
            DragState::Idle => Err(ReorderError::NotDragging),
            DragState::Dragging { source, .. } if *source == target => Ok(()),
            DragState::Dragging { pending, .. } => {
                *pending = Some(target);
                Ok(())
            }
        }
    }

    /// Ends the gesture. Returns the move to apply, or `None` for a drop
    /// onto the source slot.
    pub fn drop(&mut self, target: usize) -> Result<Option<Reorder>, ReorderError> {
        let DragState::Dragging { source, .. } = self.state else {
            return Err(ReorderError::NotDragging);
        };
        self.state = DragState::Idle;

        if source == target {
            return Ok(None);
        }
        Ok(Some(Reorder {
            from: source,
            to: target,
        }))
    }

    /// Abandons the gesture without moving anything.
    pub fn cancel(&mut self) -> Result<(), ReorderError> {
        if !self.is_dragging() {
            return Err(ReorderError::NotDragging);
        }
        self.state = DragState::Idle;
        Ok(())
    }
}

/// Splices the element at `from` out and back in at `to`, with `to` read
/// against the shortened list.
///
/// Both indices must be in bounds for `items`.
pub fn apply_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_move_forward_and_backward() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        apply_move(&mut v, 0, 2);
        assert_eq!(v, vec!['b', 'c', 'a', 'd']);

        apply_move(&mut v, 3, 0);
        assert_eq!(v, vec!['d', 'b', 'c', 'a']);

        apply_move(&mut v, 1, 3);
        assert_eq!(v, vec!['d', 'c', 'a', 'b']);
    }

    #[test]
    fn hover_is_advisory() {
        let mut engine = ReorderEngine::new();
        engine.begin_drag(1);
        engine.hover(3).unwrap();
        assert_eq!(
            engine.indicator(),
            DragIndicator {
                dragged: Some(1),
                pending_drop: Some(3),
            }
        );
        engine.hover(1).unwrap();
        assert_eq!(engine.indicator().pending_drop, Some(3));
    }
}
