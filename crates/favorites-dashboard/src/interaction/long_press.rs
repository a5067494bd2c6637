//! Long-press detection for the rename gesture.
//!
//! `Idle -> Pressed -> Glowing -> Triggered`. The two timers are owned by
//! the caller and report back with the generation they were started for;
//! expiries from an earlier press are ignored.

/// Stage of the current press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PressPhase {
    /// No press.
    #[default]
    Idle,
    /// Pointer down, glow delay running.
    Pressed,
    /// Glow shown, rename delay running.
    Glowing,
    /// Rename opened.
    Triggered,
}

/// Long-press tracker for one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct LongPress {
    phase: PressPhase,
    entity_id: Option<String>,
    origin: (f64, f64),
    generation: u64,
    tolerance: f64,
}

impl LongPress {
    /// Tracker cancelling on movement beyond `tolerance` pixels.
    pub fn new(tolerance: f64) -> Self {
        Self {
            phase: PressPhase::Idle,
            entity_id: None,
            origin: (0.0, 0.0),
            generation: 0,
            tolerance,
        }
    }

    /// Current stage.
    pub fn phase(&self) -> PressPhase {
        self.phase
    }

    /// Entity under the current press.
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Generation of the current press.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pointer down on `entity_id` at `(x, y)`. Returns the new generation.
    pub fn start(&mut self, entity_id: &str, x: f64, y: f64) -> u64 {
        self.generation += 1;
        self.phase = PressPhase::Pressed;
        self.entity_id = Some(entity_id.to_string());
        self.origin = (x, y);
        self.generation
    }

    /// Pointer moved. Cancels the press if it travelled beyond the tolerance.
    ///
    /// Returns the entity whose press was cancelled.
    pub fn moved(&mut self, x: f64, y: f64) -> Option<String> {
        if !self.is_pending() {
            return None;
        }
        let distance = (x - self.origin.0).hypot(y - self.origin.1);
        if distance <= self.tolerance {
            return None;
        }
        self.cancel()
    }

    /// Pointer released or left. Cancels a pending press; a triggered press
    /// just returns to idle.
    pub fn release(&mut self) -> Option<String> {
        if self.phase == PressPhase::Triggered {
            self.reset();
            return None;
        }
        self.cancel()
    }

    /// Glow timer for `generation` expired. Returns the entity to glow.
    pub fn glow(&mut self, generation: u64) -> Option<&str> {
        if generation != self.generation || self.phase != PressPhase::Pressed {
            return None;
        }
        self.phase = PressPhase::Glowing;
        self.entity_id.as_deref()
    }

    /// Rename timer for `generation` expired. Returns the entity to rename.
    pub fn trigger(&mut self, generation: u64) -> Option<String> {
        if generation != self.generation || !self.is_pending() {
            return None;
        }
        self.phase = PressPhase::Triggered;
        self.entity_id.clone()
    }

    /// Abandons a pending press. Returns its entity.
    pub fn cancel(&mut self) -> Option<String> {
        if !self.is_pending() {
            return None;
        }
        let entity_id = self.entity_id.clone();
        self.reset();
        entity_id
    }

    fn is_pending(&self) -> bool {
        matches!(self.phase, PressPhase::Pressed | PressPhase::Glowing)
    }

    fn reset(&mut self) {
        self.phase = PressPhase::Idle;
        self.entity_id = None;
    }
}

impl Default for LongPress {
    fn default() -> Self {
        Self::new(10.0)
    }
}
