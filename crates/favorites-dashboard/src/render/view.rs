//! Grid view model: one [`ItemView`] per favorite, tagged by domain.

use crate::config::{GridConfig, Theme};
use crate::render::climate::ClimateView;
use crate::render::cover::CoverView;
use crate::render::labels::{display_icon, display_name};
use crate::render::light::LightView;
use crate::render::standard::StandardView;
use crate::service::ServiceCall;
use crate::snapshot::HomeState;
use crate::{Domain, EntityStatus, FavoriteRecord};

/// Title bar of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Configured title.
    pub title: String,
    /// `N items`.
    pub count_label: String,
}

/// Body of the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridBody {
    /// No favorites and the empty message is enabled.
    Empty {
        /// Configured message.
        message: String,
    },
    /// One view per favorite, in list order.
    Items(Vec<ItemView>),
}

/// Transient per-item flags driven by interactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFlags {
    /// Exit transition running.
    pub removing: bool,
    /// Item is being dragged.
    pub dragging: bool,
    /// Item is the current drop target.
    pub drop_target: bool,
    /// Long press passed the glow threshold.
    pub glowing: bool,
}

/// Domain-specific part of an item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// Climate entity.
    Climate(ClimateView),
    /// Light entity, when compact lights are enabled.
    Light(LightView),
    /// Cover entity.
    Cover(CoverView),
    /// Anything else.
    Standard(StandardView),
}

/// One rendered favorite.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    /// Entity the item shows.
    pub entity_id: String,
    /// Display name.
    pub name: String,
    /// Reordering enabled for this item.
    pub draggable: bool,
    /// Interaction flags.
    pub flags: ItemFlags,
    /// Domain-specific fields.
    pub kind: ItemKind,
}

impl ItemView {
    /// Builds the item for `record`. A missing entity still renders.
    pub fn build(record: &FavoriteRecord, entity: Option<&EntityStatus>, config: &GridConfig) -> Self {
        let kind = match record.domain() {
            Domain::Climate => {
                ItemKind::Climate(ClimateView::build(entity, config.show_climate_controls))
            }
            Domain::Cover => ItemKind::Cover(CoverView::build(entity, config.show_cover_controls)),
            Domain::Light if config.light_compact => {
                ItemKind::Light(LightView::build(entity, display_icon(record, entity)))
            }
            _ => ItemKind::Standard(StandardView::build(entity, display_icon(record, entity))),
        };
        Self {
            entity_id: record.entity_id.clone(),
            name: display_name(record, entity),
            draggable: config.allow_reorder,
            flags: ItemFlags::default(),
            kind,
        }
    }

    /// Refreshes the mutable fields of whichever variant was built.
    pub fn patch(&mut self, entity: &EntityStatus) {
        match &mut self.kind {
            ItemKind::Climate(view) => view.patch(entity),
            ItemKind::Light(view) => view.patch(entity),
            ItemKind::Cover(view) => view.patch(entity),
            ItemKind::Standard(view) => view.patch(entity),
        }
    }

    /// Request a plain click on the item issues, if any.
    pub fn click_action(&self) -> Option<ServiceCall> {
        match &self.kind {
            ItemKind::Light(_) => Some(ServiceCall::ToggleLight {
                entity_id: self.entity_id.clone(),
            }),
            ItemKind::Standard(_) if Domain::of(&self.entity_id).is_toggleable() => {
                Some(ServiceCall::ToggleEntity {
                    entity_id: self.entity_id.clone(),
                })
            }
            _ => None,
        }
    }

    /// Climate part, if this is a climate item.
    pub fn climate(&self) -> Option<&ClimateView> {
        match &self.kind {
            ItemKind::Climate(view) => Some(view),
            _ => None,
        }
    }

    /// Mutable climate part, if this is a climate item.
    pub fn climate_mut(&mut self) -> Option<&mut ClimateView> {
        match &mut self.kind {
            ItemKind::Climate(view) => Some(view),
            _ => None,
        }
    }

    /// Whether the item shows its entity as active.
    pub fn is_on(&self) -> bool {
        match &self.kind {
            ItemKind::Climate(v) => v.is_on,
            ItemKind::Light(v) => v.is_on,
            ItemKind::Cover(v) => v.open || v.moving,
            ItemKind::Standard(v) => v.is_on,
        }
    }
}

/// Complete view of the favorites grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    /// Header, absent when the title is empty.
    pub header: Option<Header>,
    /// Column count.
    pub columns: u16,
    /// Active theme.
    pub theme: Theme,
    /// Free-form style text.
    pub custom_style: String,
    /// Items or the empty message.
    pub body: GridBody,
}

impl GridView {
    /// Builds the full view of `records` against the snapshot `home`.
    pub fn build(records: &[FavoriteRecord], home: Option<&HomeState>, config: &GridConfig) -> Self {
        let header = (!config.title.is_empty()).then(|| Header {
            title: config.title.clone(),
            count_label: count_label(records.len()),
        });
        let body = if records.is_empty() && config.show_empty_message {
            GridBody::Empty {
                message: config.empty_message.clone(),
            }
        } else {
            GridBody::Items(
                records
                    .iter()
                    .map(|r| ItemView::build(r, home.and_then(|h| h.entity(&r.entity_id)), config))
                    .collect(),
            )
        };
        Self {
            header,
            columns: config.columns.max(1),
            theme: config.theme,
            custom_style: config.custom_style.clone(),
            body,
        }
    }

    /// Patches every item whose entity has a status, and the count label.
    pub fn patch(&mut self, count: usize, home: &HomeState) {
        if let Some(header) = &mut self.header {
            header.count_label = count_label(count);
        }
        for item in self.items_mut() {
            if let Some(entity) = home.entity(&item.entity_id) {
                item.patch(entity);
            }
        }
    }

    /// Items in display order (empty for the empty message).
    pub fn items(&self) -> &[ItemView] {
        match &self.body {
            GridBody::Items(items) => items,
            GridBody::Empty { .. } => &[],
        }
    }

    /// Mutable items in display order.
    pub fn items_mut(&mut self) -> &mut [ItemView] {
        match &mut self.body {
            GridBody::Items(items) => items,
            GridBody::Empty { .. } => &mut [],
        }
    }

    /// Item showing `entity_id`.
    pub fn item(&self, entity_id: &str) -> Option<&ItemView> {
        self.items().iter().find(|i| i.entity_id == entity_id)
    }

    /// Mutable item showing `entity_id`.
    pub fn item_mut(&mut self, entity_id: &str) -> Option<&mut ItemView> {
        self.items_mut().iter_mut().find(|i| i.entity_id == entity_id)
    }
}

fn count_label(count: usize) -> String {
    format!("{} items", count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn home() -> HomeState {
        HomeState::new(Some("u1"))
            .with_entity(
                "light.kitchen",
                EntityStatus::new("off").with_attr("friendly_name", "Kitchen"),
            )
            .with_entity("climate.lr", EntityStatus::new("cool"))
            .with_entity("cover.blind", EntityStatus::new("open").with_attr("current_position", 50))
            .with_entity("switch.pump", EntityStatus::new("on"))
            .with_entity("sensor.temp", EntityStatus::new("21.3"))
    }

    fn records(ids: &[&str]) -> Vec<FavoriteRecord> {
        ids.iter().map(|id| FavoriteRecord::new(*id)).collect()
    }

    #[test]
    fn light_item_uses_friendly_name_and_off_text() {
        let home = home();
        let view = GridView::build(&records(&["light.kitchen"]), Some(&home), &GridConfig::default());
        let item = view.item("light.kitchen").expect("item");
        assert_eq!(item.name, "Kitchen");
        match &item.kind {
            ItemKind::Light(light) => assert_eq!(light.state_text, "Off"),
            other => panic!("expected light item, got {other:?}"),
        }
        assert_eq!(
            view.header.as_ref().map(|h| h.count_label.as_str()),
            Some("1 items")
        );
    }

    #[test]
    fn kinds_follow_domain_and_config() {
        let home = home();
        let ids = ["light.kitchen", "climate.lr", "cover.blind", "switch.pump"];
        let view = GridView::build(&records(&ids), Some(&home), &GridConfig::default());
        let kinds: Vec<&str> = view
            .items()
            .iter()
            .map(|i| match i.kind {
                ItemKind::Climate(_) => "climate",
                ItemKind::Light(_) => "light",
                ItemKind::Cover(_) => "cover",
                ItemKind::Standard(_) => "standard",
            })
            .collect();
        assert_eq!(kinds, vec!["light", "climate", "cover", "standard"]);

        let config = GridConfig {
            light_compact: false,
            ..GridConfig::default()
        };
        let view = GridView::build(&records(&["light.kitchen"]), Some(&home), &config);
        assert!(matches!(view.items()[0].kind, ItemKind::Standard(_)));
    }

    #[test]
    fn empty_list_shows_message_or_empty_grid() {
        let view = GridView::build(&[], None, &GridConfig::default());
        assert_eq!(
            view.body,
            GridBody::Empty {
                message: "No favorites yet!".to_string()
            }
        );

        let config = GridConfig {
            show_empty_message: false,
            ..GridConfig::default()
        };
        let view = GridView::build(&[], None, &config);
        assert_eq!(view.body, GridBody::Items(Vec::new()));
    }

    #[test]
    fn empty_title_hides_header() {
        let config = GridConfig {
            title: String::new(),
            ..GridConfig::default()
        };
        assert!(GridView::build(&[], None, &config).header.is_none());
    }

    #[test]
    fn missing_entity_still_renders() {
        let view = GridView::build(&records(&["vacuum.robo_vac"]), None, &GridConfig::default());
        let item = &view.items()[0];
        assert_eq!(item.name, "robo vac");
        match &item.kind {
            ItemKind::Standard(s) => assert_eq!(s.state_text, "unavailable"),
            other => panic!("expected standard item, got {other:?}"),
        }
    }

    #[test]
    fn patch_skips_missing_entities_and_updates_count() {
        let mut home = home();
        let ids = ["switch.pump", "vacuum.gone"];
        let mut view = GridView::build(&records(&ids), Some(&home), &GridConfig::default());
        home.states
            .insert("switch.pump".to_string(), EntityStatus::new("off"));
        view.patch(5, &home);
        assert!(!view.items()[0].is_on());
        assert_eq!(
            view.header.as_ref().map(|h| h.count_label.as_str()),
            Some("5 items")
        );
        match &view.items()[1].kind {
            ItemKind::Standard(s) => assert_eq!(s.state_text, "unavailable"),
            other => panic!("expected standard item, got {other:?}"),
        }
    }

    #[test]
    fn click_actions() {
        let home = home().with_entity("input_boolean.guest", EntityStatus::new("off"));
        let ids = ["light.kitchen", "switch.pump", "sensor.temp", "climate.lr", "input_boolean.guest"];
        let view = GridView::build(&records(&ids), Some(&home), &GridConfig::default());
        let actions: Vec<Option<ServiceCall>> =
            view.items().iter().map(ItemView::click_action).collect();
        assert_eq!(
            actions,
            vec![
                Some(ServiceCall::ToggleLight {
                    entity_id: "light.kitchen".into()
                }),
                Some(ServiceCall::ToggleEntity {
                    entity_id: "switch.pump".into()
                }),
                None,
                None,
                Some(ServiceCall::ToggleEntity {
                    entity_id: "input_boolean.guest".into()
                }),
            ]
        );
    }

    #[test]
    fn non_compact_light_click_does_nothing() {
        let config = GridConfig {
            light_compact: false,
            ..GridConfig::default()
        };
        let view = GridView::build(&records(&["light.kitchen"]), Some(&home()), &config);
        assert_eq!(view.items()[0].click_action(), None);
    }

    #[test]
    fn draggable_follows_allow_reorder() {
        let config = GridConfig {
            allow_reorder: false,
            ..GridConfig::default()
        };
        let view = GridView::build(&records(&["switch.pump"]), Some(&home()), &config);
        assert!(!view.items()[0].draggable);
    }

    #[test]
    fn climate_item_reads_fan_modes() {
        let home = HomeState::new(Some("u1")).with_entity(
            "climate.lr",
            EntityStatus::new("heat").with_attr("fan_modes", json!(["low", "high"])),
        );
        let view = GridView::build(&records(&["climate.lr"]), Some(&home), &GridConfig::default());
        let climate = view.items()[0].climate().expect("climate");
        assert_eq!(climate.mode_text, "heat · auto");
    }
}
