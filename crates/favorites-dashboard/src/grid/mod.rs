//! The favorites grid component.
//!
//! [`FavoritesGrid`] is synchronous. Every input (host snapshot, UI event,
//! notification, timer expiry, request completion) is a method call that
//! mutates local state first and returns the side effects as [`Command`]s
//! for the caller to carry out. The async driver lives in
//! [`crate::controller`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigError, GridConfig, Timings};
use crate::favorites::FavoriteList;
use crate::interaction::{DragState, DropdownKind, DropdownRef, Dropdowns, LongPress, RenameModal};
use crate::notify::FavoriteChanged;
use crate::render::labels::display_name;
use crate::render::{
    GridView, ItemKind, RenderDecision, RenderDiff, RenderKey, TemperatureRange,
};
use crate::service::{CoverAction, ServiceCall, ServiceError};
use crate::snapshot::{Fingerprint, HomeState};
use crate::FavoriteRecord;

/// Delayed work the grid asks its driver to schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerKind {
    /// Exit transition of `entity_id` finished.
    Remove(String),
    /// Long press of the given generation reached the glow threshold.
    Glow(u64),
    /// Long press of the given generation reached the rename threshold.
    Trigger(u64),
}

/// A timer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    /// What to do on expiry, passed back to [`FavoritesGrid::fire`].
    pub kind: TimerKind,
    /// Delay from now.
    pub delay: Duration,
}

/// Side effect produced by the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Issue a service request; report the outcome through
    /// [`FavoritesGrid::request_finished`].
    Call(ServiceCall),
    /// Publish a cross-widget notification.
    Notify(FavoriteChanged),
    /// Start a timer; report expiry through [`FavoritesGrid::fire`].
    Schedule(Timer),
}

/// Favorites grid state: working list, render diff, view and interactions.
#[derive(Debug)]
pub struct FavoritesGrid {
    config: GridConfig,
    timings: Timings,
    user_id: Option<String>,
    home: Option<Arc<HomeState>>,
    favorites: FavoriteList,
    last_seen: Option<Fingerprint>,
    diff: RenderDiff,
    view: GridView,
    dropdowns: Dropdowns,
    drag: DragState,
    press: LongPress,
    rename: Option<RenameModal>,
    removing: HashSet<String>,
    pending_removals: HashMap<String, (usize, FavoriteRecord)>,
    rebuilds: usize,
    patches: usize,
}

impl FavoritesGrid {
    /// Grid with `config`, failing fast on invalid configuration.
    pub fn new(config: GridConfig, timings: Timings) -> Result<Self, ConfigError> {
        config.validate()?;
        let view = GridView::build(&[], None, &config);
        Ok(Self {
            press: LongPress::new(timings.move_tolerance),
            config,
            timings,
            user_id: None,
            home: None,
            favorites: FavoriteList::new(),
            last_seen: None,
            diff: RenderDiff::new(),
            view,
            dropdowns: Dropdowns::new(),
            drag: DragState::default(),
            rename: None,
            removing: HashSet::new(),
            pending_removals: HashMap::new(),
            rebuilds: 0,
            patches: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Current view model.
    pub fn view(&self) -> &GridView {
        &self.view
    }

    /// Working favorites list.
    pub fn favorites(&self) -> &FavoriteList {
        &self.favorites
    }

    /// Active configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Viewer of the last snapshot.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Open dropdown state.
    pub fn dropdowns(&self) -> &Dropdowns {
        &self.dropdowns
    }

    /// Drag state.
    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Long-press state.
    pub fn press(&self) -> &LongPress {
        &self.press
    }

    /// Open rename dialog.
    pub fn rename(&self) -> Option<&RenameModal> {
        self.rename.as_ref()
    }

    /// Number of full rebuilds so far.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    /// Number of patch passes so far.
    pub fn patch_count(&self) -> usize {
        self.patches
    }

    // -----------------------------------------------------------------------
    // Synchronization
    // -----------------------------------------------------------------------

    /// Takes in a host snapshot.
    ///
    /// A changed id sequence replaces the working list and asks for a render
    /// decision; otherwise only the state-patch pass runs.
    pub fn ingest(&mut self, home: Arc<HomeState>) {
        self.user_id = home.user_id.clone();
        let records = home.user_favorites();
        let fingerprint = Fingerprint::of(&records);
        self.home = Some(home);

        if self.last_seen.as_ref() != Some(&fingerprint) {
            tracing::debug!("favorites changed: {:?}", fingerprint.ids());
            self.last_seen = Some(fingerprint);
            self.favorites.replace(records);
            self.render();
        } else {
            self.patch_states();
        }
    }

    /// Applies a sibling widget's membership change.
    ///
    /// Returns whether the list changed. Changes for another viewer and
    /// repeats are ignored.
    pub fn apply_notification(&mut self, change: &FavoriteChanged) -> bool {
        if !change.applies_to(self.user_id.as_deref()) {
            tracing::trace!("ignoring change for another user: {}", change.entity_id);
            return false;
        }
        if !self
            .favorites
            .apply_change(&change.entity_id, change.is_favorite)
        {
            return false;
        }
        self.render();
        true
    }

    /// Replaces the configuration and forces a rebuild.
    pub fn set_config(&mut self, config: GridConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.diff.invalidate();
        self.render();
        Ok(())
    }

    /// Widget attached: the next snapshot resynchronizes from scratch.
    pub fn attach(&mut self) {
        self.last_seen = None;
        if let Some(home) = self.home.clone() {
            self.ingest(home);
        }
    }

    /// Widget detached: pending removals and interactions are dropped.
    pub fn detach(&mut self) {
        for entity_id in std::mem::take(&mut self.removing) {
            if let Some(item) = self.view.item_mut(&entity_id) {
                item.flags.removing = false;
            }
        }
        self.press.cancel();
        self.drag.end();
        self.dropdowns.close();
        self.clear_transient_flags();
    }

    /// Render decision for the current list and theme.
    fn render(&mut self) {
        let key = RenderKey::new(self.favorites.fingerprint(), self.config.theme);
        match self.diff.decide(key) {
            RenderDecision::Rebuild => self.rebuild(),
            RenderDecision::Patch => self.patch_states(),
        }
    }

    fn rebuild(&mut self) {
        self.view = GridView::build(
            self.favorites.records(),
            self.home.as_deref(),
            &self.config,
        );
        self.dropdowns.close();
        self.press.cancel();
        self.drag.end();
        for entity_id in &self.removing {
            if let Some(item) = self.view.item_mut(entity_id) {
                item.flags.removing = true;
            }
        }
        if let Some(modal) = &self.rename {
            if !self.favorites.contains(&modal.entity_id) {
                self.rename = None;
            }
        }
        self.rebuilds += 1;
    }

    fn patch_states(&mut self) {
        if let Some(home) = &self.home {
            self.view.patch(self.favorites.len(), home);
        }
        self.patches += 1;
    }

    fn entity_name(&self, record: &FavoriteRecord) -> String {
        let entity = self.home.as_ref().and_then(|h| h.entity(&record.entity_id));
        display_name(record, entity)
    }

    // -----------------------------------------------------------------------
    // Timers and request outcomes
    // -----------------------------------------------------------------------

    /// A scheduled timer expired.
    pub fn fire(&mut self, kind: TimerKind) -> Vec<Command> {
        match kind {
            TimerKind::Remove(entity_id) => self.finish_remove(&entity_id),
            TimerKind::Glow(generation) => {
                self.press_glow(generation);
                Vec::new()
            }
            TimerKind::Trigger(generation) => {
                self.press_trigger(generation);
                Vec::new()
            }
        }
    }

    /// Outcome of a request issued through [`Command::Call`].
    ///
    /// A rejected remove restores the favorite at its old position; every
    /// other rejection is only logged.
    pub fn request_finished(
        &mut self,
        call: &ServiceCall,
        outcome: Result<(), &ServiceError>,
    ) -> Vec<Command> {
        let removed = match call {
            ServiceCall::RemoveFavorite { entity_id, .. } => {
                self.pending_removals.remove(entity_id)
            }
            _ => None,
        };
        let Err(error) = outcome else {
            return Vec::new();
        };

        match (call, removed) {
            (ServiceCall::RemoveFavorite { entity_id, .. }, Some((index, record))) => {
                tracing::warn!("remove of {} failed, restoring: {}", entity_id, error);
                if !self.favorites.restore(index, record) {
                    return Vec::new();
                }
                self.last_seen = Some(self.favorites.fingerprint());
                self.render();
                vec![Command::Notify(self.change(entity_id, true))]
            }
            (ServiceCall::UpdateFavorite { entity_id, .. }, _) => {
                tracing::warn!("rename of {} was not saved: {}", entity_id, error);
                Vec::new()
            }
            _ => {
                tracing::warn!("{} failed: {}", call, error);
                Vec::new()
            }
        }
    }

    fn change(&self, entity_id: &str, is_favorite: bool) -> FavoriteChanged {
        FavoriteChanged {
            entity_id: entity_id.to_string(),
            is_favorite,
            user_id: self.user_id.clone(),
        }
    }

    fn clear_transient_flags(&mut self) {
        for item in self.view.items_mut() {
            item.flags.dragging = false;
            item.flags.drop_target = false;
            item.flags.glowing = false;
        }
        self.sync_dropdown_flags();
    }

    // -----------------------------------------------------------------------
    // Remove
    // -----------------------------------------------------------------------

    /// Starts the exit transition of `entity_id`.
    pub fn begin_remove(&mut self, entity_id: &str) -> Vec<Command> {
        if !self.favorites.contains(entity_id) || self.removing.contains(entity_id) {
            return Vec::new();
        }
        self.removing.insert(entity_id.to_string());
        if let Some(item) = self.view.item_mut(entity_id) {
            item.flags.removing = true;
        }
        vec![Command::Schedule(Timer {
            kind: TimerKind::Remove(entity_id.to_string()),
            delay: self.timings.remove_delay,
        })]
    }

    /// Exit transition finished: removes locally, then asks the store.
    pub fn finish_remove(&mut self, entity_id: &str) -> Vec<Command> {
        if !self.removing.remove(entity_id) {
            return Vec::new();
        }
        let Some(removed) = self.favorites.remove(entity_id) else {
            return Vec::new();
        };
        self.pending_removals.insert(entity_id.to_string(), removed);
        self.last_seen = Some(self.favorites.fingerprint());
        self.render();
        vec![
            Command::Notify(self.change(entity_id, false)),
            Command::Call(ServiceCall::RemoveFavorite {
                entity_id: entity_id.to_string(),
                user_id: self.user_id.clone(),
            }),
        ]
    }

    // -----------------------------------------------------------------------
    // Drag and drop
    // -----------------------------------------------------------------------

    /// Begins dragging `entity_id`. Returns whether a drag started.
    pub fn drag_start(&mut self, entity_id: &str) -> bool {
        if !self.config.allow_reorder || !self.favorites.contains(entity_id) {
            return false;
        }
        self.drag_end();
        self.cancel_press();
        self.drag.start(entity_id);
        if let Some(item) = self.view.item_mut(entity_id) {
            item.flags.dragging = true;
        }
        true
    }

    /// Pointer dragged over `entity_id`.
    pub fn drag_over(&mut self, entity_id: &str) {
        let change = self.drag.drag_over(entity_id);
        for (id, marked) in [(change.cleared, false), (change.marked, true)] {
            if let Some(id) = id {
                self.set_drop_target(&id, marked);
            }
        }
    }

    fn set_drop_target(&mut self, entity_id: &str, marked: bool) {
        if let Some(item) = self.view.item_mut(entity_id) {
            item.flags.drop_target = marked;
        }
    }

    /// Drag cancelled or finished.
    pub fn drag_end(&mut self) {
        if self.drag.end().is_some() {
            for item in self.view.items_mut() {
                item.flags.dragging = false;
                item.flags.drop_target = false;
            }
        }
    }

    /// Dropped onto `target`: moves the dragged favorite to the target's
    /// index and asks the store to persist the new order.
    pub fn drop_on(&mut self, target: &str) -> Vec<Command> {
        let dropped = self.drag.drop_on(target);
        for item in self.view.items_mut() {
            item.flags.dragging = false;
            item.flags.drop_target = false;
        }
        let Some((dragged, target)) = dropped else {
            return Vec::new();
        };
        if !self.favorites.move_onto(&dragged, &target) {
            return Vec::new();
        }
        self.diff.invalidate();
        self.render();
        vec![Command::Call(ServiceCall::ReorderFavorites {
            entity_ids: self.favorites.ids(),
            user_id: self.user_id.clone(),
        })]
    }

    // -----------------------------------------------------------------------
    // Dropdowns and per-domain controls
    // -----------------------------------------------------------------------

    /// Hvac menu button of `entity_id` clicked.
    pub fn toggle_hvac_dropdown(&mut self, entity_id: &str) -> bool {
        if self.view.item(entity_id).and_then(|i| i.climate()).is_none() {
            return false;
        }
        self.dropdowns.toggle(DropdownKind::Hvac, entity_id);
        self.sync_dropdown_flags();
        true
    }

    /// Fan menu button of `entity_id` clicked. Ignored while the entity is off.
    pub fn toggle_fan_dropdown(&mut self, entity_id: &str) -> bool {
        let enabled = self
            .view
            .item(entity_id)
            .and_then(|i| i.climate())
            .and_then(|c| c.fan.as_ref())
            .is_some_and(|fan| !fan.disabled);
        if !enabled {
            return false;
        }
        self.dropdowns.toggle(DropdownKind::Fan, entity_id);
        self.sync_dropdown_flags();
        true
    }

    /// A click anywhere on the page; `origin` names the dropdown control it
    /// landed on, if any.
    pub fn document_click(&mut self, origin: Option<&DropdownRef>) {
        if self.dropdowns.outside_click(origin).is_some() {
            self.sync_dropdown_flags();
        }
    }

    fn sync_dropdown_flags(&mut self) {
        let open = self.dropdowns.open().cloned();
        for item in self.view.items_mut() {
            let entity_id = item.entity_id.clone();
            if let Some(climate) = item.climate_mut() {
                let is = |kind: DropdownKind| {
                    open.as_ref()
                        .is_some_and(|o| o.kind == kind && o.entity_id == entity_id)
                };
                climate.hvac_open = is(DropdownKind::Hvac);
                climate.fan_open = is(DropdownKind::Fan);
            }
        }
    }

    /// Hvac mode picked from the menu.
    pub fn select_hvac_mode(&mut self, entity_id: &str, mode: &str) -> Vec<Command> {
        self.dropdowns.close();
        self.sync_dropdown_flags();
        if self.view.item(entity_id).and_then(|i| i.climate()).is_none() {
            return Vec::new();
        }
        vec![Command::Call(ServiceCall::SetHvacMode {
            entity_id: entity_id.to_string(),
            hvac_mode: mode.to_string(),
        })]
    }

    /// Fan mode picked from the menu.
    pub fn select_fan_mode(&mut self, entity_id: &str, fan_mode: &str) -> Vec<Command> {
        self.dropdowns.close();
        self.sync_dropdown_flags();
        if self.view.item(entity_id).and_then(|i| i.climate()).is_none() {
            return Vec::new();
        }
        vec![Command::Call(ServiceCall::SetFanMode {
            entity_id: entity_id.to_string(),
            fan_mode: fan_mode.to_string(),
        })]
    }

    /// Temperature stepper pressed `delta` steps.
    ///
    /// Rejected when the entity is unknown or off. Steps from the displayed
    /// target, so repeated presses accumulate before the host confirms.
    pub fn adjust_temperature(&mut self, entity_id: &str, delta: i32) -> Vec<Command> {
        let Some(entity) = self.home.as_ref().and_then(|h| h.entity(entity_id)) else {
            return Vec::new();
        };
        if entity.state == "off" {
            return Vec::new();
        }
        let range = TemperatureRange::of(entity);
        let Some(climate) = self.view.item_mut(entity_id).and_then(|i| i.climate_mut()) else {
            return Vec::new();
        };
        let target = range.step_from(climate.target.unwrap_or(range.current), delta);
        climate.show_target(target);
        vec![Command::Call(ServiceCall::SetTemperature {
            entity_id: entity_id.to_string(),
            temperature: target,
        })]
    }

    /// Plain click on an item. Ignored while dragging.
    pub fn activate(&mut self, entity_id: &str) -> Vec<Command> {
        if self.drag.is_dragging() {
            return Vec::new();
        }
        self.view
            .item(entity_id)
            .and_then(|i| i.click_action())
            .map(Command::Call)
            .into_iter()
            .collect()
    }

    /// Cover button pressed.
    pub fn cover_command(&mut self, entity_id: &str, action: CoverAction) -> Vec<Command> {
        match self.view.item(entity_id).map(|i| &i.kind) {
            Some(ItemKind::Cover(_)) => vec![Command::Call(ServiceCall::Cover {
                entity_id: entity_id.to_string(),
                action,
            })],
            _ => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Long press and rename
    // -----------------------------------------------------------------------

    /// Pointer down on an item.
    pub fn press_start(&mut self, entity_id: &str, x: f64, y: f64) -> Vec<Command> {
        if !self.favorites.contains(entity_id) {
            return Vec::new();
        }
        self.cancel_press();
        let generation = self.press.start(entity_id, x, y);
        vec![
            Command::Schedule(Timer {
                kind: TimerKind::Glow(generation),
                delay: self.timings.glow_delay,
            }),
            Command::Schedule(Timer {
                kind: TimerKind::Trigger(generation),
                delay: self.timings.rename_delay,
            }),
        ]
    }

    /// Pointer moved during a press.
    pub fn press_move(&mut self, x: f64, y: f64) {
        if let Some(entity_id) = self.press.moved(x, y) {
            self.set_glow(&entity_id, false);
        }
    }

    /// Pointer released or left the item.
    pub fn press_release(&mut self) {
        if let Some(entity_id) = self.press.release() {
            self.set_glow(&entity_id, false);
        }
    }

    fn cancel_press(&mut self) {
        if let Some(entity_id) = self.press.cancel() {
            self.set_glow(&entity_id, false);
        }
    }

    fn set_glow(&mut self, entity_id: &str, glowing: bool) {
        if let Some(item) = self.view.item_mut(entity_id) {
            item.flags.glowing = glowing;
        }
    }

    /// Glow timer of press `generation` expired.
    pub fn press_glow(&mut self, generation: u64) {
        if let Some(entity_id) = self.press.glow(generation).map(str::to_string) {
            self.set_glow(&entity_id, true);
        }
    }

    /// Rename timer of press `generation` expired: opens the dialog.
    pub fn press_trigger(&mut self, generation: u64) {
        let Some(entity_id) = self.press.trigger(generation) else {
            return;
        };
        self.set_glow(&entity_id, false);
        let Some(record) = self.favorites.get(&entity_id) else {
            return;
        };
        let current = self.entity_name(record);
        let default = self.entity_name(&FavoriteRecord {
            custom_name: None,
            ..record.clone()
        });
        tracing::debug!("opening rename for {}", entity_id);
        self.rename = Some(RenameModal::new(&entity_id, &current, default));
    }

    /// Rename input edited.
    pub fn rename_input(&mut self, text: &str) {
        if let Some(modal) = &mut self.rename {
            modal.set_input(text);
        }
    }

    /// Saves a non-blank name. A blank input keeps the dialog open.
    pub fn rename_save(&mut self) -> Vec<Command> {
        let Some(name) = self.rename.as_ref().and_then(RenameModal::submission) else {
            return Vec::new();
        };
        let Some(modal) = self.rename.take() else {
            return Vec::new();
        };
        self.apply_custom_name(&modal.entity_id, Some(name))
    }

    /// Clears the custom name back to the derived default.
    pub fn rename_reset(&mut self) -> Vec<Command> {
        let Some(modal) = self.rename.take() else {
            return Vec::new();
        };
        self.apply_custom_name(&modal.entity_id, None)
    }

    /// Closes the dialog without changes.
    pub fn rename_cancel(&mut self) {
        self.rename = None;
    }

    fn apply_custom_name(&mut self, entity_id: &str, custom_name: Option<String>) -> Vec<Command> {
        if !self.favorites.set_custom_name(entity_id, custom_name.clone()) {
            return Vec::new();
        }
        let name = self.favorites.get(entity_id).map(|r| self.entity_name(r));
        if let (Some(item), Some(name)) = (self.view.item_mut(entity_id), name) {
            item.name = name;
        }
        vec![Command::Call(ServiceCall::UpdateFavorite {
            entity_id: entity_id.to_string(),
            custom_name,
            user_id: self.user_id.clone(),
        })]
    }
}

#[cfg(test)]
mod tests;
