use eframe::egui::{Pos2, Rect};
use log::info;
use sidebar_nav::{Entry, EntryId, PanelContent, RenderSurface, SurfaceError, VisibleButton, Zone};
use std::collections::HashMap;

/// Panel behind a demo entry. Only reports its lifecycle.
pub struct DemoPanel {
    pub name: &'static str,
}

impl PanelContent for DemoPanel {
    fn on_attach(&self) {
        info!("panel {} attached", self.name);
    }

    fn on_detach(&self) {
        info!("panel {} detached", self.name);
    }

    fn on_activate(&self) {
        info!("panel {} opened", self.name);
    }

    fn on_deactivate(&self) {
        info!("panel {} closed", self.name);
    }
}

pub struct Ghost {
    pub top_left: Pos2,
    pub label: String,
    pub icon: String,
}

/// Drag visuals requested by the navigation manager plus the geometry of
/// the last painted frame.
#[derive(Default)]
pub struct EguiSurface {
    zones: HashMap<Zone, Rect>,
    buttons: HashMap<Zone, Vec<VisibleButton>>,
    pub ghost: Option<Ghost>,
    pub placeholder: Option<(Zone, usize)>,
    pub detached: Option<EntryId>,
    pub highlight: Option<Zone>,
    pub empty_pinned_hint: bool,
}

impl EguiSurface {
    /// Forgets last frame's geometry. Drag visuals survive.
    pub fn begin_frame(&mut self) {
        self.zones.clear();
        self.buttons.clear();
    }

    pub fn record_zone(&mut self, zone: Zone, bounds: Rect) {
        self.zones.insert(zone, bounds);
    }

    pub fn record_button(&mut self, zone: Zone, entry: EntryId, bounds: Rect) {
        self.buttons
            .entry(zone)
            .or_default()
            .push(VisibleButton { entry, bounds });
    }

    pub fn is_detached(&self, id: &EntryId) -> bool {
        self.detached.as_ref() == Some(id)
    }

    pub fn placeholder_in(&self, zone: Zone) -> Option<usize> {
        self.placeholder
            .filter(|(placed, _)| *placed == zone)
            .map(|(_, index)| index)
    }

    fn require_zone(&self, zone: Zone) -> Result<(), SurfaceError> {
        if self.zones.contains_key(&zone) {
            Ok(())
        } else {
            Err(SurfaceError::ZoneNotLaidOut(zone))
        }
    }
}

impl RenderSurface for EguiSurface {
    fn zone_bounds(&self, zone: Zone) -> Option<Rect> {
        self.zones.get(&zone).copied()
    }

    fn visible_buttons(&self, zone: Zone) -> Vec<VisibleButton> {
        self.buttons.get(&zone).cloned().unwrap_or_default()
    }

    fn show_ghost(&mut self, point: Pos2, entry: &Entry) -> Result<(), SurfaceError> {
        self.ghost = Some(Ghost {
            top_left: point,
            label: entry.label.clone(),
            icon: entry.icon.0.clone(),
        });
        Ok(())
    }

    fn hide_ghost(&mut self) -> Result<(), SurfaceError> {
        self.ghost = None;
        Ok(())
    }

    fn show_placeholder(&mut self, zone: Zone, index: usize) -> Result<(), SurfaceError> {
        self.require_zone(zone)?;
        self.placeholder = Some((zone, index));
        Ok(())
    }

    fn move_placeholder(&mut self, zone: Zone, index: usize) -> Result<(), SurfaceError> {
        self.show_placeholder(zone, index)
    }

    fn remove_placeholder(&mut self) -> Result<(), SurfaceError> {
        self.placeholder = None;
        Ok(())
    }

    fn detach_button(
        &mut self,
        entry: &EntryId,
        zone: Zone,
        _index: usize,
    ) -> Result<(), SurfaceError> {
        self.require_zone(zone)?;
        self.detached = Some(entry.clone());
        Ok(())
    }

    fn restore_button(
        &mut self,
        entry: &EntryId,
        _zone: Zone,
        _index: usize,
    ) -> Result<(), SurfaceError> {
        if self.is_detached(entry) {
            self.detached = None;
        }
        Ok(())
    }

    fn set_highlight(&mut self, zone: Option<Zone>) -> Result<(), SurfaceError> {
        self.highlight = zone;
        Ok(())
    }

    fn set_empty_pinned_hint(&mut self, visible: bool) -> Result<(), SurfaceError> {
        self.empty_pinned_hint = visible;
        Ok(())
    }
}
