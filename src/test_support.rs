use crate::entry::{Entry, EntryId, IconRef, PanelContent};
use crate::surface::{RenderSurface, SurfaceError, VisibleButton};
use crate::zones::Zone;
use eframe::egui::{pos2, vec2, Pos2, Rect};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub fn entry(label: &str, priority: i32) -> Rc<Entry> {
    Rc::new(Entry::labeled(label, priority))
}

pub fn labels(entries: &[Rc<Entry>]) -> Vec<String> {
    entries.iter().map(|entry| entry.label.clone()).collect()
}

pub fn ids(items: &[&str]) -> Vec<EntryId> {
    items.iter().map(|s| EntryId::from(*s)).collect()
}

#[derive(Clone, Default)]
pub struct ContentLog(Rc<RefCell<Vec<&'static str>>>);

impl ContentLog {
    pub fn take(&self) -> Vec<&'static str> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

struct RecordingContent(ContentLog);

impl PanelContent for RecordingContent {
    fn on_attach(&self) {
        self.0 .0.borrow_mut().push("attach");
    }

    fn on_detach(&self) {
        self.0 .0.borrow_mut().push("detach");
    }

    fn on_activate(&self) {
        self.0 .0.borrow_mut().push("activate");
    }

    fn on_deactivate(&self) {
        self.0 .0.borrow_mut().push("deactivate");
    }
}

pub fn tracked_entry(label: &str, priority: i32) -> (Rc<Entry>, ContentLog) {
    let log = ContentLog::default();
    let entry = Entry::new(
        EntryId::from_label(label),
        priority,
        label,
        IconRef::default(),
        Rc::new(RecordingContent(log.clone())),
    );
    (Rc::new(entry), log)
}

pub const BUTTON_HEIGHT: f32 = 20.0;
pub const BUTTON_PITCH: f32 = 24.0;
pub const PINNED_TOP: f32 = 0.0;
pub const SORTED_TOP: f32 = 100.0;
pub const HIDDEN_TOP: f32 = 200.0;

/// Every command the drag controller sent, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ShowGhost(EntryId),
    HideGhost,
    ShowPlaceholder(Zone, usize),
    MovePlaceholder(Zone, usize),
    RemovePlaceholder,
    Detach(EntryId, Zone, usize),
    Restore(EntryId, Zone, usize),
    Highlight(Option<Zone>),
    EmptyPinnedHint(bool),
}

/// Scripted layout: one 40px column holding Pinned (0..80), Sorted
/// (100..220) and Hidden (200..240, overlapping Sorted). Hidden entries are
/// listed in an overflow column at x 60..100.
#[derive(Default)]
pub struct FakeSurface {
    pub zones: HashMap<Zone, Rect>,
    pub buttons: HashMap<Zone, Vec<VisibleButton>>,
    pub calls: Vec<SurfaceCall>,
    pub fail_visuals: bool,
}

fn column(ids: &[&str], x: f32, top: f32) -> Vec<VisibleButton> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| VisibleButton {
            entry: EntryId::from(*id),
            bounds: Rect::from_min_size(
                pos2(x, top + i as f32 * BUTTON_PITCH),
                vec2(40.0, BUTTON_HEIGHT),
            ),
        })
        .collect()
}

impl FakeSurface {
    pub fn standard_layout(pinned: &[&str], sorted: &[&str], hidden: &[&str]) -> Self {
        let mut surface = Self::default();
        surface.zones.insert(
            Zone::Pinned,
            Rect::from_min_max(pos2(0.0, PINNED_TOP), pos2(40.0, 80.0)),
        );
        surface.zones.insert(
            Zone::Sorted,
            Rect::from_min_max(pos2(0.0, SORTED_TOP), pos2(40.0, 220.0)),
        );
        surface.zones.insert(
            Zone::Hidden,
            Rect::from_min_max(pos2(0.0, HIDDEN_TOP), pos2(40.0, 240.0)),
        );
        surface.relayout(pinned, sorted, hidden);
        surface
    }

    pub fn relayout(&mut self, pinned: &[&str], sorted: &[&str], hidden: &[&str]) {
        self.buttons
            .insert(Zone::Pinned, column(pinned, 0.0, PINNED_TOP));
        self.buttons
            .insert(Zone::Sorted, column(sorted, 0.0, SORTED_TOP));
        self.buttons
            .insert(Zone::Hidden, column(hidden, 60.0, HIDDEN_TOP));
    }

    pub fn center_of(&self, zone: Zone, id: &str) -> Pos2 {
        self.buttons[&zone]
            .iter()
            .find(|button| button.entry.as_str() == id)
            .map(|button| button.bounds.center())
            .unwrap_or_else(|| panic!("{id} not laid out in {zone:?}"))
    }

    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    fn record(&mut self, call: SurfaceCall) -> Result<(), SurfaceError> {
        self.calls.push(call);
        if self.fail_visuals {
            Err(SurfaceError::Unavailable("scripted failure".into()))
        } else {
            Ok(())
        }
    }
}

impl RenderSurface for FakeSurface {
    fn zone_bounds(&self, zone: Zone) -> Option<Rect> {
        self.zones.get(&zone).copied()
    }

    fn visible_buttons(&self, zone: Zone) -> Vec<VisibleButton> {
        self.buttons.get(&zone).cloned().unwrap_or_default()
    }

    fn show_ghost(&mut self, _point: Pos2, entry: &Entry) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::ShowGhost(entry.id.clone()))
    }

    fn hide_ghost(&mut self) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::HideGhost)
    }

    fn show_placeholder(&mut self, zone: Zone, index: usize) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::ShowPlaceholder(zone, index))
    }

    fn move_placeholder(&mut self, zone: Zone, index: usize) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::MovePlaceholder(zone, index))
    }

    fn remove_placeholder(&mut self) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::RemovePlaceholder)
    }

    fn detach_button(
        &mut self,
        entry: &EntryId,
        zone: Zone,
        index: usize,
    ) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Detach(entry.clone(), zone, index))
    }

    fn restore_button(
        &mut self,
        entry: &EntryId,
        zone: Zone,
        index: usize,
    ) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Restore(entry.clone(), zone, index))
    }

    fn set_highlight(&mut self, zone: Option<Zone>) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Highlight(zone))
    }

    fn set_empty_pinned_hint(&mut self, visible: bool) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::EmptyPinnedHint(visible))
    }
}
