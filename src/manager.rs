use crate::config::SidebarConfig;
use crate::drag::{DragContext, DragController, DragSession, DragState, DragStep, DropOutcome};
use crate::entry::{Entry, EntryId};
use crate::events::{PointerEvent, RegistryEvent, SidebarEvent};
use crate::ordering::{order_hidden_zone, sort_pinned_zone, sort_sorted_zone};
use crate::persistence::PersistedState;
use crate::selection::SelectionController;
use crate::store::KeyValueStore;
use crate::surface::{entry_at, RenderSurface};
use crate::zones::{reassign_all, FeatureFlags, HiddenSet, Zone, ZoneLists};
use crossbeam_channel::Receiver;
use eframe::egui::Pos2;
use log::{debug, info, warn};
use std::rc::Rc;

/// Owns the zone model and is the only thing that mutates it.
pub struct NavigationManager<S: KeyValueStore> {
    store: S,
    flags: FeatureFlags,
    registered: Vec<Rc<Entry>>,
    state: PersistedState,
    zones: ZoneLists,
    selection: SelectionController,
    drag: DragController,
    /// Subject unhidden to start the current drag.
    implicit_unhide: Option<ImplicitUnhide>,
}

/// Where an overflow entry sat in the saved state before its drag began.
#[derive(Debug, Clone)]
struct ImplicitUnhide {
    id: EntryId,
    hidden_slot: usize,
    pinned_slot: Option<usize>,
}

impl<S: KeyValueStore> NavigationManager<S> {
    pub fn new(store: S, flags: FeatureFlags) -> Self {
        let state = PersistedState::load(&store);
        Self {
            store,
            flags,
            registered: Vec::new(),
            state,
            zones: ZoneLists::default(),
            selection: SelectionController::new(),
            drag: DragController::default(),
            implicit_unhide: None,
        }
    }

    pub fn from_config(store: S, config: &SidebarConfig) -> Self {
        let mut manager = Self::new(store, config.flags());
        manager.drag = DragController::new(config.drag_threshold);
        manager
    }

    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    pub fn zones(&self) -> &ZoneLists {
        &self.zones
    }

    pub fn entries(&self) -> &[Rc<Entry>] {
        &self.registered
    }

    pub fn entry(&self, id: &EntryId) -> Option<&Rc<Entry>> {
        self.registered.iter().find(|entry| entry.id == *id)
    }

    pub fn pinned_order(&self) -> &[EntryId] {
        &self.state.pinned_order
    }

    pub fn hidden_set(&self) -> &HiddenSet {
        &self.state.hidden
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn zone_of(&self, id: &EntryId) -> Option<Zone> {
        self.zones.zone_of(id)
    }

    pub fn is_pinned(&self, id: &EntryId) -> bool {
        self.zone_of(id) == Some(Zone::Pinned)
    }

    pub fn hidden_count(&self) -> usize {
        self.zones.hidden.len()
    }

    pub fn pinned_zone_visible(&self) -> bool {
        self.flags.pinning_enabled
    }

    /// The Hidden zone only takes space while it has members or a drag
    /// might drop into it.
    pub fn hidden_zone_visible(&self) -> bool {
        self.flags.hiding_enabled && (!self.zones.hidden.is_empty() || self.drag.is_dragging())
    }

    pub fn selected(&self) -> Option<&Rc<Entry>> {
        self.selection.selected()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    pub fn subscribe(&mut self) -> Receiver<SidebarEvent> {
        self.selection.subscribe()
    }

    pub fn entry_at_point(&self, point: Pos2, surface: &dyn RenderSurface) -> Option<EntryId> {
        entry_at(surface, point)
    }

    pub fn add(&mut self, entry: Rc<Entry>) {
        if self.entry(&entry.id).is_some() {
            debug!("add: {} already registered", entry.id);
            return;
        }
        entry.content.on_attach();
        self.registered.push(entry);
        self.reassign();
    }

    pub fn remove(&mut self, id: &EntryId, surface: &mut dyn RenderSurface) {
        let Some(pos) = self.registered.iter().position(|entry| entry.id == *id) else {
            debug!("remove: ignored unknown entry {id}");
            return;
        };
        if self.drag.subject() == Some(id) {
            if let Some(outcome) = self.drag.abort(surface) {
                debug!("remove: aborted drag ({outcome:?})");
                self.apply_drop(outcome);
            }
            self.implicit_unhide = None;
        }

        let entry = self.registered.remove(pos);
        self.zones.take(id);
        self.selection.clear_if(id);
        entry.content.on_detach();
        self.save_state();
    }

    pub fn handle_registry_event(&mut self, event: RegistryEvent, surface: &mut dyn RenderSurface) {
        match event {
            RegistryEvent::Added(entry) => self.add(entry),
            RegistryEvent::Removed(id) => self.remove(&id, surface),
        }
    }

    pub fn pin(&mut self, id: &EntryId) {
        if !self.flags.pinning_enabled || self.zone_of(id) != Some(Zone::Sorted) {
            return;
        }
        let Some(entry) = self.take_from(Zone::Sorted, id) else {
            return;
        };
        if !self.state.pinned_order.contains(id) {
            self.state.pinned_order.push(id.clone());
        }
        self.zones.pinned.push(entry);
        sort_pinned_zone(&mut self.zones.pinned, &self.state.pinned_order);
        self.save_state();
    }

    pub fn unpin(&mut self, id: &EntryId) {
        if !self.flags.pinning_enabled {
            return;
        }
        let Some(entry) = self.take_from(Zone::Pinned, id) else {
            return;
        };
        self.state.pinned_order.retain(|pinned| pinned != id);
        self.zones.sorted.push(entry);
        sort_sorted_zone(&mut self.zones.sorted, &self.registered);
        self.save_state();
    }

    /// Hiding strips pinned membership first.
    pub fn hide(&mut self, id: &EntryId) {
        if !self.flags.hiding_enabled {
            return;
        }
        let entry = match self.zone_of(id) {
            Some(Zone::Pinned) => self.take_from(Zone::Pinned, id),
            Some(Zone::Sorted) => self.take_from(Zone::Sorted, id),
            _ => None,
        };
        let Some(entry) = entry else {
            return;
        };
        self.state.pinned_order.retain(|pinned| pinned != id);
        self.state.hidden.insert(id.clone());
        self.zones.hidden.push(entry);
        order_hidden_zone(
            &mut self.zones.hidden,
            &self.state.pinned_order,
            &self.registered,
        );
        self.selection.clear_if(id);
        self.save_state();
    }

    pub fn unhide(&mut self, id: &EntryId) {
        if !self.flags.hiding_enabled {
            return;
        }
        let Some(entry) = self.take_from(Zone::Hidden, id) else {
            return;
        };
        self.state.hidden.shift_remove(id);
        if self.flags.pinning_enabled && self.state.pinned_order.contains(id) {
            self.zones.pinned.push(entry);
            sort_pinned_zone(&mut self.zones.pinned, &self.state.pinned_order);
        } else {
            self.zones.sorted.push(entry);
            sort_sorted_zone(&mut self.zones.sorted, &self.registered);
        }
        self.save_state();
    }

    /// Toggle semantics: selecting the active entry clears the selection.
    pub fn select(&mut self, id: Option<&EntryId>) -> bool {
        self.selection
            .select(id, &self.registered, self.drag.is_dragging())
    }

    pub fn apply_feature_flags(
        &mut self,
        plugin_enabled: bool,
        allow_pinning: bool,
        allow_hiding: bool,
        surface: &mut dyn RenderSurface,
    ) {
        let previous = self.flags;
        let flags = FeatureFlags::from_settings(plugin_enabled, allow_pinning, allow_hiding);
        self.flags = flags;
        self.state = PersistedState::load(&self.store);

        let lost_zone = (previous.pinning_enabled && !flags.pinning_enabled)
            || (previous.hiding_enabled && !flags.hiding_enabled);
        if lost_zone && self.drag.is_dragging() {
            let ctx = DragContext {
                lists: &self.zones,
                flags,
            };
            if let Some(outcome) = self.drag.interrupt(&ctx, surface) {
                self.apply_drop(outcome);
            }
        }

        self.reassign();
        debug!("apply_feature_flags: {flags:?}");
    }

    /// Forgets the saved order and hidden set, legacy keys included.
    pub fn reset_state(&mut self) {
        if let Err(err) = PersistedState::reset(&mut self.store) {
            warn!("Failed to reset sidebar state: {err}");
        }
        self.state = PersistedState::default();
        self.reassign();
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, surface: &mut dyn RenderSurface) {
        match event {
            PointerEvent::Press { entry, point } => {
                if self.zone_of(&entry).is_some() {
                    self.drag.press(entry, point);
                } else {
                    debug!("press: ignored unknown entry {entry}");
                }
            }
            PointerEvent::Move { point } => {
                if let Some(subject) = self.drag.promotion_due(point, self.flags).cloned() {
                    if self.zone_of(&subject) == Some(Zone::Hidden) {
                        self.unhide_for_drag(&subject);
                    }
                }
                let ctx = DragContext {
                    lists: &self.zones,
                    flags: self.flags,
                };
                self.drag.pointer_moved(point, &ctx, surface);
            }
            PointerEvent::Release { point } => {
                let ctx = DragContext {
                    lists: &self.zones,
                    flags: self.flags,
                };
                let step = self.drag.release(point, &ctx, surface);
                match step {
                    DragStep::Nothing => {}
                    DragStep::Clicked(id) => {
                        self.select(Some(&id));
                    }
                    DragStep::Finished(outcome) => self.apply_drop(outcome),
                }
            }
        }
    }

    fn unhide_for_drag(&mut self, id: &EntryId) {
        let Some(hidden_slot) = self.state.hidden.get_index_of(id) else {
            return;
        };
        let pinned_slot = self.state.pinned_order.iter().position(|pinned| pinned == id);
        self.unhide(id);
        if self.zone_of(id) != Some(Zone::Hidden) {
            self.implicit_unhide = Some(ImplicitUnhide {
                id: id.clone(),
                hidden_slot,
                pinned_slot,
            });
        }
    }

    fn apply_drop(&mut self, outcome: DropOutcome) {
        let unhidden = self.implicit_unhide.take();
        let returned_home =
            |subject: &EntryId| unhidden.clone().filter(|home| home.id == *subject);

        match outcome {
            DropOutcome::Hidden { subject } => match returned_home(&subject) {
                Some(home) => self.restore_hidden(&home),
                None => {
                    info!("drag: hiding {subject}");
                    self.hide(&subject);
                }
            },
            DropOutcome::Pinned { subject, index } => {
                info!("drag: pinning {subject} at {index}");
                self.commit_pinned(&subject, index);
            }
            DropOutcome::Sorted { subject } => {
                if self.is_pinned(&subject) {
                    info!("drag: unpinning {subject}");
                    self.unpin(&subject);
                }
            }
            DropOutcome::Cancelled { subject } => {
                if let Some(home) = returned_home(&subject) {
                    self.restore_hidden(&home);
                }
            }
        }
    }

    fn commit_pinned(&mut self, id: &EntryId, index: usize) {
        if !self.is_pinned(id) {
            self.pin(id);
        }
        let Some(entry) = self.take_from(Zone::Pinned, id) else {
            return;
        };
        let index = index.min(self.zones.pinned.len());
        self.zones.pinned.insert(index, entry);

        // Saved order mirrors the visual order; identities not on screen keep their place after it.
        let visible = self.zones.ids(Zone::Pinned);
        let retained = self
            .state
            .pinned_order
            .iter()
            .filter(|saved| !visible.contains(saved))
            .cloned()
            .collect::<Vec<_>>();
        self.state.pinned_order = visible.into_iter().chain(retained).collect();
        self.save_state();
    }

    /// Puts an overflow entry back exactly where its drag found it, pin
    /// membership included.
    fn restore_hidden(&mut self, home: &ImplicitUnhide) {
        let id = &home.id;
        debug!("drag: returning {id} to hidden slot {}", home.hidden_slot);
        self.state.pinned_order.retain(|pinned| pinned != id);
        if let Some(slot) = home.pinned_slot {
            let slot = slot.min(self.state.pinned_order.len());
            self.state.pinned_order.insert(slot, id.clone());
        }
        self.state.hidden.shift_remove(id);
        let slot = home.hidden_slot.min(self.state.hidden.len());
        self.state.hidden.shift_insert(slot, id.clone());
        self.reassign();
        self.save_state();
    }

    fn take_from(&mut self, zone: Zone, id: &EntryId) -> Option<Rc<Entry>> {
        let list = self.zones.list_mut(zone);
        let pos = list.iter().position(|entry| entry.id == *id)?;
        Some(list.remove(pos))
    }

    fn reassign(&mut self) {
        self.zones = reassign_all(
            &self.registered,
            &self.state.pinned_order,
            &self.state.hidden,
            self.flags,
        );
    }

    fn save_state(&mut self) {
        if let Err(err) = self.state.save(&mut self.store) {
            warn!("Failed to save sidebar state: {err}");
        }
    }
}
