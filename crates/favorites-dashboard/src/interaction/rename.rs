//! Rename dialog keyed to one favorite.

/// Open rename dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameModal {
    /// Favorite being renamed.
    pub entity_id: String,
    /// Current input text.
    pub input: String,
    /// Name shown after a reset.
    pub default_name: String,
}

impl RenameModal {
    /// Dialog for `entity_id` prefilled with `current_name`.
    pub fn new(entity_id: &str, current_name: &str, default_name: String) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            input: current_name.to_string(),
            default_name,
        }
    }

    /// Replaces the input text.
    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    /// Trimmed input, or `None` when blank.
    pub fn submission(&self) -> Option<String> {
        let trimmed = self.input.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}
