//! Cover item: state, position gauge and open/stop/close buttons.

use crate::render::labels::cover_icon;
use crate::EntityStatus;

/// Mutable state of a cover item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverView {
    /// Open and not moving.
    pub open: bool,
    /// Closed and not moving.
    pub closed: bool,
    /// Opening or closing.
    pub moving: bool,
    /// Position percentage, or a state word when the position is unknown.
    pub state_text: String,
    /// Icon reflecting motion and position.
    pub icon: &'static str,
    /// Open/stop/close buttons shown.
    pub controls: bool,
    /// Position gauge fill in percent, shown with the controls.
    pub fill: Option<u8>,
}

impl CoverView {
    /// View for `entity`; a missing entity reads as `unavailable`.
    pub fn build(entity: Option<&EntityStatus>, show_controls: bool) -> Self {
        let status = CoverStatus::read(entity);
        Self {
            open: status.open(),
            closed: status.closed(),
            moving: status.moving(),
            state_text: status.text(),
            icon: cover_icon(&status.state, status.position),
            controls: show_controls,
            fill: status.position.filter(|_| show_controls),
        }
    }

    /// Refreshes classes, text, icon and an existing gauge.
    pub fn patch(&mut self, entity: &EntityStatus) {
        let status = CoverStatus::read(Some(entity));
        self.open = status.open();
        self.closed = status.closed();
        self.moving = status.moving();
        self.state_text = status.text();
        self.icon = cover_icon(&status.state, status.position);
        if let (Some(fill), Some(position)) = (&mut self.fill, status.position) {
            *fill = position;
        }
    }
}

struct CoverStatus {
    state: String,
    position: Option<u8>,
}

impl CoverStatus {
    fn read(entity: Option<&EntityStatus>) -> Self {
        Self {
            state: entity
                .map(|e| e.state.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or("unavailable")
                .to_string(),
            position: entity
                .and_then(|e| e.attr_f64("current_position"))
                .filter(|p| p.is_finite())
                .map(|p| p.clamp(0.0, 100.0).round() as u8),
        }
    }

    fn moving(&self) -> bool {
        self.state == "opening" || self.state == "closing"
    }

    fn open(&self) -> bool {
        (self.state == "open" || self.position.is_some_and(|p| p > 0)) && !self.moving()
    }

    fn closed(&self) -> bool {
        (self.state == "closed" || self.position == Some(0)) && !self.moving()
    }

    fn text(&self) -> String {
        match (self.position, self.state.as_str()) {
            (Some(position), _) => format!("{}%", position),
            (None, "open") => "Open".to_string(),
            (None, "closed") => "Closed".to_string(),
            (None, state) => state.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blind(state: &str, position: Option<u8>) -> EntityStatus {
        let status = EntityStatus::new(state);
        match position {
            Some(p) => status.with_attr("current_position", p),
            None => status,
        }
    }

    #[test]
    fn open_with_position() {
        let view = CoverView::build(Some(&blind("open", Some(60))), true);
        assert!(view.open);
        assert!(!view.closed);
        assert_eq!(view.state_text, "60%");
        assert_eq!(view.fill, Some(60));
        assert_eq!(view.icon, "mdi:blinds-open");
    }

    #[test]
    fn state_words_without_position() {
        assert_eq!(CoverView::build(Some(&blind("open", None)), true).state_text, "Open");
        assert_eq!(CoverView::build(Some(&blind("closed", None)), true).state_text, "Closed");
        assert_eq!(CoverView::build(Some(&blind("stopped", None)), true).state_text, "stopped");
        assert_eq!(CoverView::build(None, true).state_text, "unavailable");
    }

    #[test]
    fn moving_suppresses_open_and_closed() {
        let view = CoverView::build(Some(&blind("closing", Some(30))), true);
        assert!(view.moving);
        assert!(!view.open);
        assert!(!view.closed);
        assert_eq!(view.icon, "mdi:arrow-down-box");
    }

    #[test]
    fn zero_position_is_closed() {
        let view = CoverView::build(Some(&blind("open", Some(0))), true);
        assert!(view.closed);
        assert!(!view.open);
        assert_eq!(view.icon, "mdi:blinds");
    }

    #[test]
    fn no_gauge_without_controls() {
        let view = CoverView::build(Some(&blind("open", Some(60))), false);
        assert!(!view.controls);
        assert_eq!(view.fill, None);
    }

    #[test]
    fn patch_updates_existing_gauge_only() {
        let mut with_gauge = CoverView::build(Some(&blind("open", Some(60))), true);
        with_gauge.patch(&blind("opening", Some(80)));
        assert_eq!(with_gauge.fill, Some(80));
        assert_eq!(with_gauge.state_text, "80%");
        assert!(with_gauge.moving);

        let mut without = CoverView::build(Some(&blind("closed", None)), true);
        without.patch(&blind("open", Some(40)));
        assert_eq!(without.fill, None);
        assert_eq!(without.state_text, "40%");
    }

    #[test]
    fn patch_text_matches_rebuild() {
        let mut view = CoverView::build(Some(&blind("closed", Some(0))), true);
        for (state, position) in [("open", None), ("closed", None), ("stopped", None)] {
            let entity = blind(state, position);
            view.patch(&entity);
            assert_eq!(view.state_text, CoverView::build(Some(&entity), true).state_text);
        }
        assert_eq!(view.state_text, "stopped");
    }
}
