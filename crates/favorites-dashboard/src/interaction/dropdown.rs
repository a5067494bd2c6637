//! Hvac and fan mode dropdowns. At most one is open across the whole grid.

/// Which of a climate item's two menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropdownKind {
    /// Hvac mode menu, opened from the mode icon.
    Hvac,
    /// Fan mode menu, opened from the fan button.
    Fan,
}

/// The control that owns a dropdown: its kind and climate entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownRef {
    /// Menu kind.
    pub kind: DropdownKind,
    /// Climate entity the menu belongs to.
    pub entity_id: String,
}

impl DropdownRef {
    /// Reference to `kind` on `entity_id`.
    pub fn new(kind: DropdownKind, entity_id: &str) -> Self {
        Self {
            kind,
            entity_id: entity_id.to_string(),
        }
    }
}

/// Dropdown visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dropdowns {
    open: Option<DropdownRef>,
}

impl Dropdowns {
    /// All closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The open dropdown.
    pub fn open(&self) -> Option<&DropdownRef> {
        self.open.as_ref()
    }

    /// Whether `kind` is open on `entity_id`.
    pub fn is_open(&self, kind: DropdownKind, entity_id: &str) -> bool {
        self.open
            .as_ref()
            .is_some_and(|o| o.kind == kind && o.entity_id == entity_id)
    }

    /// Toggles `kind` on `entity_id`.
    ///
    /// Toggling the open one closes it; anything else replaces whatever was
    /// open. Returns the previously open dropdown, if one was closed.
    pub fn toggle(&mut self, kind: DropdownKind, entity_id: &str) -> Option<DropdownRef> {
        if self.is_open(kind, entity_id) {
            return self.open.take();
        }
        self.open.replace(DropdownRef::new(kind, entity_id))
    }

    /// Closes the open dropdown, returning it.
    pub fn close(&mut self) -> Option<DropdownRef> {
        self.open.take()
    }

    /// A click anywhere. Closes the open dropdown unless `origin` is its
    /// owning control.
    pub fn outside_click(&mut self, origin: Option<&DropdownRef>) -> Option<DropdownRef> {
        if origin.is_some() && origin == self.open.as_ref() {
            return None;
        }
        self.open.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_opens_and_closes() {
        let mut d = Dropdowns::new();
        assert_eq!(d.toggle(DropdownKind::Hvac, "climate.a"), None);
        assert!(d.is_open(DropdownKind::Hvac, "climate.a"));
        assert_eq!(
            d.toggle(DropdownKind::Hvac, "climate.a"),
            Some(DropdownRef::new(DropdownKind::Hvac, "climate.a"))
        );
        assert!(d.open().is_none());
    }

    #[test]
    fn opening_another_closes_the_first() {
        let mut d = Dropdowns::new();
        d.toggle(DropdownKind::Hvac, "climate.a");
        let closed = d.toggle(DropdownKind::Fan, "climate.a");
        assert_eq!(closed, Some(DropdownRef::new(DropdownKind::Hvac, "climate.a")));
        assert!(d.is_open(DropdownKind::Fan, "climate.a"));
        assert!(!d.is_open(DropdownKind::Hvac, "climate.a"));

        d.toggle(DropdownKind::Fan, "climate.b");
        assert!(d.is_open(DropdownKind::Fan, "climate.b"));
        assert!(!d.is_open(DropdownKind::Fan, "climate.a"));
    }

    #[test]
    fn outside_click_spares_owning_control() {
        let mut d = Dropdowns::new();
        d.toggle(DropdownKind::Hvac, "climate.a");
        let owner = DropdownRef::new(DropdownKind::Hvac, "climate.a");
        assert_eq!(d.outside_click(Some(&owner)), None);
        assert!(d.is_open(DropdownKind::Hvac, "climate.a"));

        let other = DropdownRef::new(DropdownKind::Fan, "climate.a");
        assert_eq!(d.outside_click(Some(&other)), Some(owner));
        assert!(d.open().is_none());
    }

    #[test]
    fn outside_click_with_nothing_open_is_noop() {
        let mut d = Dropdowns::new();
        assert_eq!(d.outside_click(None), None);
    }
}
