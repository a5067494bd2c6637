//! Climate item view: hvac mode menu, fan mode menu and temperature stepper.

use crate::render::labels::{climate_icon, fan_icon, fan_label, format_temperature, mode_label};
use crate::EntityStatus;

/// Modes offered when the entity does not list any.
pub const DEFAULT_HVAC_MODES: [&str; 4] = ["off", "cool", "heat", "auto"];

/// Fan mode assumed when the entity reports none.
pub const DEFAULT_FAN_MODE: &str = "auto";

/// One entry of the hvac or fan dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeOption {
    /// Value sent with the service call.
    pub value: String,
    /// Menu text.
    pub label: String,
    /// Menu icon.
    pub icon: &'static str,
    /// Whether this is the current mode.
    pub active: bool,
}

/// Fan mode button, present when the entity lists fan modes.
#[derive(Debug, Clone, PartialEq)]
pub struct FanButton {
    /// Icon of the current fan mode.
    pub icon: &'static str,
    /// Disabled while the entity is off.
    pub disabled: bool,
    /// Dropdown entries.
    pub options: Vec<ModeOption>,
}

/// Temperature stepper, present when climate controls are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureControls {
    /// Disabled while the entity is off.
    pub disabled: bool,
}

/// Mutable state of a climate item.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateView {
    /// Any state other than `off` / `unavailable`.
    pub is_on: bool,
    /// Mode is `cool`.
    pub cooling: bool,
    /// Mode is `heat`.
    pub heating: bool,
    /// Raw hvac mode.
    pub mode: String,
    /// Mode line, with the fan mode appended while on.
    pub mode_text: String,
    /// Mode icon on the dropdown button.
    pub icon: &'static str,
    /// Target temperature text, `--` while off.
    pub temperature_text: String,
    /// Displayed target temperature.
    pub target: Option<f64>,
    /// Temperature stepper.
    pub controls: Option<TemperatureControls>,
    /// Hvac dropdown entries.
    pub hvac_options: Vec<ModeOption>,
    /// Fan mode button and dropdown.
    pub fan: Option<FanButton>,
    /// Hvac dropdown visible.
    pub hvac_open: bool,
    /// Fan dropdown visible.
    pub fan_open: bool,
}

impl ClimateView {
    /// View for `entity`; a missing entity renders as off.
    pub fn build(entity: Option<&EntityStatus>, show_controls: bool) -> Self {
        let status = ClimateStatus::read(entity);
        let hvac_modes = entity
            .and_then(|e| e.attr_str_list("hvac_modes"))
            .unwrap_or_else(|| DEFAULT_HVAC_MODES.iter().map(|m| m.to_string()).collect());
        let hvac_options = hvac_modes
            .into_iter()
            .map(|m| ModeOption {
                label: mode_label(&m),
                icon: climate_icon(&m),
                active: m == status.mode,
                value: m,
            })
            .collect();
        let fan = (!status.fan_modes.is_empty()).then(|| FanButton {
            icon: fan_icon(&status.fan_mode),
            disabled: !status.is_on,
            options: status
                .fan_modes
                .iter()
                .map(|m| ModeOption {
                    value: m.clone(),
                    label: fan_label(Some(m)),
                    icon: fan_icon(m),
                    active: *m == status.fan_mode,
                })
                .collect(),
        });

        Self {
            is_on: status.is_on,
            cooling: status.mode == "cool",
            heating: status.mode == "heat",
            mode_text: status.mode_text(),
            icon: climate_icon(&status.mode),
            temperature_text: status.temperature_text(),
            target: status.target,
            controls: show_controls.then_some(TemperatureControls {
                disabled: !status.is_on,
            }),
            hvac_options,
            fan,
            hvac_open: false,
            fan_open: false,
            mode: status.mode,
        }
    }

    /// Refreshes the mutable fields from a new status.
    ///
    /// Structure (which menus and controls exist) stays as built.
    pub fn patch(&mut self, entity: &EntityStatus) {
        let status = ClimateStatus::read(Some(entity));
        self.is_on = status.is_on;
        self.cooling = status.mode == "cool";
        self.heating = status.mode == "heat";
        self.mode_text = status.mode_text();
        self.icon = climate_icon(&status.mode);
        self.temperature_text = status.temperature_text();
        self.target = status.target;
        if let Some(controls) = &mut self.controls {
            controls.disabled = !status.is_on;
        }
        for option in &mut self.hvac_options {
            option.active = option.value == status.mode;
        }
        if let Some(fan) = &mut self.fan {
            fan.disabled = !status.is_on;
            fan.icon = fan_icon(&status.fan_mode);
            for option in &mut fan.options {
                option.active = option.value == status.fan_mode;
            }
        }
        self.mode = status.mode;
    }

    /// Shows `target` ahead of the host confirming it.
    pub fn show_target(&mut self, target: f64) {
        self.target = Some(target);
        self.temperature_text = format!("{}°", format_temperature(target));
    }
}

/// Fields read from a climate status.
struct ClimateStatus {
    is_on: bool,
    mode: String,
    fan_mode: String,
    fan_modes: Vec<String>,
    target: Option<f64>,
}

impl ClimateStatus {
    fn read(entity: Option<&EntityStatus>) -> Self {
        let mode = entity
            .map(|e| e.state.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("off")
            .to_string();
        Self {
            is_on: entity.is_some() && mode != "off" && mode != "unavailable",
            fan_mode: entity
                .and_then(|e| e.attr_str("fan_mode"))
                .unwrap_or(DEFAULT_FAN_MODE)
                .to_string(),
            fan_modes: entity
                .and_then(|e| e.attr_str_list("fan_modes"))
                .unwrap_or_default(),
            target: entity.and_then(|e| e.attr_f64("temperature")),
            mode,
        }
    }

    fn mode_text(&self) -> String {
        if self.is_on && !self.fan_modes.is_empty() {
            format!("{} · {}", self.mode, self.fan_mode)
        } else {
            self.mode.clone()
        }
    }

    fn temperature_text(&self) -> String {
        match self.target {
            Some(t) if self.is_on => format!("{}°", format_temperature(t)),
            _ => "--".to_string(),
        }
    }
}

/// Target temperature bounds of one climate entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    /// Current target (default 22).
    pub current: f64,
    /// Lower bound (default 16).
    pub min: f64,
    /// Upper bound (default 30).
    pub max: f64,
    /// Step per press (default 1).
    pub step: f64,
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self {
            current: 22.0,
            min: 16.0,
            max: 30.0,
            step: 1.0,
        }
    }
}

impl TemperatureRange {
    /// Range from the entity attributes, each falling back to its default.
    pub fn of(entity: &EntityStatus) -> Self {
        let defaults = Self::default();
        let positive = |key: &str, fallback: f64| {
            entity
                .attr_f64(key)
                .filter(|v| v.is_finite() && *v != 0.0)
                .unwrap_or(fallback)
        };
        Self {
            current: positive("temperature", defaults.current),
            min: positive("min_temp", defaults.min),
            max: positive("max_temp", defaults.max),
            step: positive("target_temp_step", defaults.step).abs(),
        }
    }

    /// Target after `delta` steps from `from`, clamped to the range.
    pub fn step_from(&self, from: f64, delta: i32) -> f64 {
        step_temperature(from, delta, self.min, self.max, self.step)
    }
}

/// `current + delta * step`, clamped to `[min, max]`.
pub fn step_temperature(current: f64, delta: i32, min: f64, max: f64, step: f64) -> f64 {
    let next = current + f64::from(delta) * step;
    let clamped = next.max(min).min(max);
    (clamped * 100.0).round() / 100.0
}
