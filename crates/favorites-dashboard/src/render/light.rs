//! Compact light tile.

use crate::EntityStatus;

/// Mutable state of a compact light item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightView {
    /// State is `on`.
    pub is_on: bool,
    /// `On` or `Off`.
    pub state_text: String,
    /// Tile icon.
    pub icon: String,
}

impl LightView {
    /// View for `entity`; a missing entity reads as off.
    pub fn build(entity: Option<&EntityStatus>, icon: String) -> Self {
        let is_on = entity.is_some_and(|e| e.state == "on");
        Self {
            is_on,
            state_text: state_text(is_on),
            icon,
        }
    }

    /// Refreshes the on flag and state text.
    pub fn patch(&mut self, entity: &EntityStatus) {
        self.is_on = entity.state == "on";
        self.state_text = state_text(self.is_on);
    }
}

fn state_text(is_on: bool) -> String {
    let text = if is_on { "On" } else { "Off" };
    text.to_string()
}
