//! Render-diff engine and the structured view model.
//!
//! A full rebuild regenerates the [`GridView`] from the favorites list. It is
//! needed only when the [`RenderKey`] (ordered ids plus theme) differs from
//! the last rebuilt one; otherwise the existing view is patched in place.

pub mod climate;
pub mod cover;
pub mod labels;
pub mod light;
pub mod standard;
pub mod view;

pub use climate::{ClimateView, FanButton, ModeOption, TemperatureControls, TemperatureRange};
pub use cover::CoverView;
pub use light::LightView;
pub use standard::StandardView;
pub use view::{GridBody, GridView, Header, ItemFlags, ItemKind, ItemView};

use crate::config::Theme;
use crate::snapshot::Fingerprint;

/// Identity of a fully rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderKey {
    ids: Fingerprint,
    theme: Theme,
}

impl RenderKey {
    /// Key for the given id sequence and theme.
    pub fn new(ids: Fingerprint, theme: Theme) -> Self {
        Self { ids, theme }
    }

    /// The id sequence.
    pub fn ids(&self) -> &Fingerprint {
        &self.ids
    }

    /// The theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }
}

/// Outcome of [`RenderDiff::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
    /// Regenerate the whole view.
    Rebuild,
    /// Patch mutable fields of the existing view.
    Patch,
}

/// Remembers the key of the last rebuild.
#[derive(Debug, Clone, Default)]
pub struct RenderDiff {
    rendered: Option<RenderKey>,
}

impl RenderDiff {
    /// Nothing rendered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides how to render `key`, recording it on rebuild.
    ///
    /// The first decision is always a rebuild.
    pub fn decide(&mut self, key: RenderKey) -> RenderDecision {
        if self.rendered.as_ref() == Some(&key) {
            return RenderDecision::Patch;
        }
        tracing::trace!("render key changed, rebuilding");
        self.rendered = Some(key);
        RenderDecision::Rebuild
    }

    /// Forces the next decision to rebuild.
    pub fn invalidate(&mut self) {
        self.rendered = None;
    }

    /// Key of the last rebuild.
    pub fn rendered(&self) -> Option<&RenderKey> {
        self.rendered.as_ref()
    }
}
