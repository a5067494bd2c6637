//! Display names, icons and short texts shared by the item views.

use crate::{EntityStatus, FavoriteRecord};

/// Name shown for a favorite.
///
/// Custom name, then the entity's friendly name, then the object id with
/// underscores turned into spaces.
pub fn display_name(record: &FavoriteRecord, entity: Option<&EntityStatus>) -> String {
    if let Some(name) = record.custom_name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if let Some(name) = entity.and_then(EntityStatus::friendly_name) {
        return name.to_string();
    }
    default_name(&record.entity_id)
}

/// Name derived from the entity id alone.
pub fn default_name(entity_id: &str) -> String {
    let object_id = entity_id
        .split_once('.')
        .map(|(_, object_id)| object_id)
        .unwrap_or(entity_id);
    object_id.replace('_', " ")
}

/// Icon shown for a favorite: custom icon, entity icon, domain default.
pub fn display_icon(record: &FavoriteRecord, entity: Option<&EntityStatus>) -> String {
    if let Some(icon) = record.custom_icon.as_deref().filter(|i| !i.is_empty()) {
        return icon.to_string();
    }
    if let Some(icon) = entity.and_then(|e| e.attr_str("icon")) {
        return icon.to_string();
    }
    record.domain().default_icon().to_string()
}

/// Icon for an hvac mode.
pub fn climate_icon(mode: &str) -> &'static str {
    match mode {
        "cool" => "mdi:snowflake",
        "heat" => "mdi:fire",
        "heat_cool" | "auto" => "mdi:autorenew",
        "dry" => "mdi:water-percent",
        "fan_only" => "mdi:fan",
        "off" => "mdi:power",
        _ => "mdi:air-conditioner",
    }
}

/// Menu label for an hvac mode. Unknown modes are shown verbatim.
pub fn mode_label(mode: &str) -> String {
    let label = match mode {
        "cool" => "Cool",
        "heat" => "Heat",
        "heat_cool" | "auto" => "Auto",
        "dry" => "Dry",
        "fan_only" => "Fan",
        "off" => "Off",
        other => other,
    };
    label.to_string()
}

/// Icon for a fan mode (case-insensitive).
pub fn fan_icon(fan_mode: &str) -> &'static str {
    match fan_mode.to_lowercase().as_str() {
        "auto" => "mdi:fan-auto",
        "low" => "mdi:fan-speed-1",
        "medium" => "mdi:fan-speed-2",
        "high" => "mdi:fan-speed-3",
        "turbo" => "mdi:fan-plus",
        "quiet" => "mdi:fan-minus",
        "off" => "mdi:fan-off",
        _ => "mdi:fan",
    }
}

/// Menu label for a fan mode: capitalized, `Auto` when unset.
pub fn fan_label(fan_mode: Option<&str>) -> String {
    let Some(fan_mode) = fan_mode.filter(|m| !m.is_empty()) else {
        return "Auto".to_string();
    };
    let mut chars = fan_mode.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Icon for a cover given its state and position.
pub fn cover_icon(state: &str, position: Option<u8>) -> &'static str {
    match state {
        "opening" => "mdi:arrow-up-box",
        "closing" => "mdi:arrow-down-box",
        _ if state == "closed" || position == Some(0) => "mdi:blinds",
        _ => "mdi:blinds-open",
    }
}

/// Temperature without a trailing `.0`.
pub fn format_temperature(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_precedence() {
        let entity = EntityStatus::new("on").with_attr("friendly_name", "Kitchen Light");
        let mut record = FavoriteRecord::new("light.kitchen_main");
        assert_eq!(display_name(&record, None), "kitchen main");
        assert_eq!(display_name(&record, Some(&entity)), "Kitchen Light");
        record.custom_name = Some("Counter".to_string());
        assert_eq!(display_name(&record, Some(&entity)), "Counter");
    }

    #[test]
    fn empty_custom_name_falls_through() {
        let mut record = FavoriteRecord::new("switch.pump");
        record.custom_name = Some(String::new());
        assert_eq!(display_name(&record, None), "pump");
    }

    #[test]
    fn default_name_without_dot_uses_whole_id() {
        assert_eq!(default_name("orphan_id"), "orphan id");
    }

    #[test]
    fn icon_precedence() {
        let entity = EntityStatus::new("on").with_attr("icon", "mdi:lamp");
        let mut record = FavoriteRecord::new("light.desk");
        assert_eq!(display_icon(&record, None), "mdi:lightbulb");
        assert_eq!(display_icon(&record, Some(&entity)), "mdi:lamp");
        record.custom_icon = Some("mdi:desk-lamp".to_string());
        assert_eq!(display_icon(&record, Some(&entity)), "mdi:desk-lamp");
    }

    #[test]
    fn climate_labels_and_icons() {
        assert_eq!(climate_icon("heat_cool"), "mdi:autorenew");
        assert_eq!(climate_icon("unavailable"), "mdi:air-conditioner");
        assert_eq!(mode_label("fan_only"), "Fan");
        assert_eq!(mode_label("eco"), "eco");
    }

    #[test]
    fn fan_labels_and_icons() {
        assert_eq!(fan_icon("HIGH"), "mdi:fan-speed-3");
        assert_eq!(fan_icon("breeze"), "mdi:fan");
        assert_eq!(fan_label(Some("mEDIUM")), "Medium");
        assert_eq!(fan_label(None), "Auto");
    }

    #[test]
    fn cover_icons() {
        assert_eq!(cover_icon("opening", Some(40)), "mdi:arrow-up-box");
        assert_eq!(cover_icon("open", Some(0)), "mdi:blinds");
        assert_eq!(cover_icon("closed", None), "mdi:blinds");
        assert_eq!(cover_icon("open", Some(60)), "mdi:blinds-open");
        assert_eq!(cover_icon("unavailable", None), "mdi:blinds-open");
    }

    #[test]
    fn temperatures() {
        assert_eq!(format_temperature(22.0), "22");
        assert_eq!(format_temperature(21.5), "21.5");
    }
}
