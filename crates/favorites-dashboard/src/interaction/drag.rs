//! Drag-and-drop reordering state.

/// `Idle -> Dragging -> (dropped | cancelled) -> Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// An item is being dragged.
    Dragging {
        /// The dragged entity.
        dragged: String,
        /// The single marked drop target.
        over: Option<String>,
    },
}

/// Marker changes caused by [`DragState::drag_over`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetChange {
    /// Previously marked target, now cleared.
    pub cleared: Option<String>,
    /// Newly marked target.
    pub marked: Option<String>,
}

impl DragState {
    /// Begins dragging `entity_id`, abandoning any earlier drag.
    pub fn start(&mut self, entity_id: &str) {
        *self = DragState::Dragging {
            dragged: entity_id.to_string(),
            over: None,
        };
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// The dragged entity.
    pub fn dragged(&self) -> Option<&str> {
        match self {
            DragState::Dragging { dragged, .. } => Some(dragged),
            DragState::Idle => None,
        }
    }

    /// The marked drop target.
    pub fn drop_target(&self) -> Option<&str> {
        match self {
            DragState::Dragging { over, .. } => over.as_deref(),
            DragState::Idle => None,
        }
    }

    /// Pointer over `entity_id`. Hovering the dragged item marks nothing.
    pub fn drag_over(&mut self, entity_id: &str) -> TargetChange {
        let DragState::Dragging { dragged, over } = self else {
            return TargetChange::default();
        };
        if dragged.as_str() == entity_id || over.as_deref() == Some(entity_id) {
            return TargetChange::default();
        }
        TargetChange {
            cleared: over.replace(entity_id.to_string()),
            marked: Some(entity_id.to_string()),
        }
    }

    /// Drag cancelled or finished. Returns the dragged id and last target.
    pub fn end(&mut self) -> Option<(String, Option<String>)> {
        match std::mem::take(self) {
            DragState::Dragging { dragged, over } => Some((dragged, over)),
            DragState::Idle => None,
        }
    }

    /// Drop onto `target`. Returns `(dragged, target)` unless nothing was
    /// dragged or the item was dropped on itself. Always ends the drag.
    pub fn drop_on(&mut self, target: &str) -> Option<(String, String)> {
        let (dragged, _) = self.end()?;
        (dragged != target).then(|| (dragged, target.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_drop_target_marker() {
        let mut drag = DragState::default();
        drag.start("light.a");
        assert_eq!(
            drag.drag_over("cover.b"),
            TargetChange {
                cleared: None,
                marked: Some("cover.b".into())
            }
        );
        assert_eq!(
            drag.drag_over("switch.c"),
            TargetChange {
                cleared: Some("cover.b".into()),
                marked: Some("switch.c".into())
            }
        );
        assert_eq!(drag.drop_target(), Some("switch.c"));
    }

    #[test]
    fn hovering_dragged_item_marks_nothing() {
        let mut drag = DragState::default();
        drag.start("light.a");
        assert_eq!(drag.drag_over("light.a"), TargetChange::default());
        assert_eq!(drag.drop_target(), None);
    }

    #[test]
    fn drag_over_while_idle_is_ignored() {
        let mut drag = DragState::default();
        assert_eq!(drag.drag_over("light.a"), TargetChange::default());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn drop_on_self_is_noop_and_ends_drag() {
        let mut drag = DragState::default();
        drag.start("light.a");
        assert_eq!(drag.drop_on("light.a"), None);
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn drop_returns_pair() {
        let mut drag = DragState::default();
        drag.start("climate.lr");
        drag.drag_over("light.kitchen");
        assert_eq!(
            drag.drop_on("light.kitchen"),
            Some(("climate.lr".to_string(), "light.kitchen".to_string()))
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn end_reports_last_target() {
        let mut drag = DragState::default();
        drag.start("light.a");
        drag.drag_over("cover.b");
        assert_eq!(drag.end(), Some(("light.a".into(), Some("cover.b".into()))));
        assert_eq!(drag.end(), None);
    }
}
