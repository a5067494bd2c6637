//! Generic item for every other domain.

use crate::EntityStatus;

/// States that light up a generic item.
pub const ACTIVE_STATES: [&str; 7] = ["on", "home", "playing", "open", "unlocked", "heat", "cool"];

/// Mutable state of a generic item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardView {
    /// State is one of [`ACTIVE_STATES`].
    pub is_on: bool,
    /// Raw state, `unavailable` when unknown.
    pub state_text: String,
    /// Item icon.
    pub icon: String,
}

impl StandardView {
    /// View for `entity`.
    pub fn build(entity: Option<&EntityStatus>, icon: String) -> Self {
        let state = entity.map(|e| e.state.as_str()).unwrap_or_default();
        Self {
            is_on: is_active(state),
            state_text: state_text(state),
            icon,
        }
    }

    /// Refreshes the on flag and state text.
    pub fn patch(&mut self, entity: &EntityStatus) {
        self.is_on = is_active(&entity.state);
        self.state_text = state_text(&entity.state);
    }
}

fn is_active(state: &str) -> bool {
    ACTIVE_STATES.contains(&state)
}

fn state_text(state: &str) -> String {
    if state.is_empty() {
        "unavailable".to_string()
    } else {
        state.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_states_light_up() {
        for state in ACTIVE_STATES {
            let view = StandardView::build(Some(&EntityStatus::new(state)), String::new());
            assert!(view.is_on, "{state} should be active");
        }
        let view = StandardView::build(Some(&EntityStatus::new("locked")), String::new());
        assert!(!view.is_on);
        assert_eq!(view.state_text, "locked");
    }

    #[test]
    fn missing_entity_is_unavailable() {
        let mut view = StandardView::build(None, "mdi:help-circle".into());
        assert!(!view.is_on);
        assert_eq!(view.state_text, "unavailable");
        view.patch(&EntityStatus::new("playing"));
        assert!(view.is_on);
        assert_eq!(view.state_text, "playing");
    }
}
