//! What the drag controller needs from whatever draws the sidebar.
//!
//! Geometry queries are answered from the last layout pass. Visual commands
//! are best-effort: an `Err` only means the aid is missing on screen.

use crate::entry::{Entry, EntryId};
use crate::zones::Zone;
use eframe::egui::{Pos2, Rect};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("render surface unavailable: {0}")]
    Unavailable(String),
    #[error("zone {0:?} is not laid out")]
    ZoneNotLaidOut(Zone),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleButton {
    pub entry: EntryId,
    pub bounds: Rect,
}

pub trait RenderSurface {
    /// Bounds of `zone`, or `None` when the zone is not shown.
    fn zone_bounds(&self, zone: Zone) -> Option<Rect>;
    /// Buttons currently laid out in `zone`, top to bottom.
    fn visible_buttons(&self, zone: Zone) -> Vec<VisibleButton>;

    fn show_ghost(&mut self, point: Pos2, entry: &Entry) -> Result<(), SurfaceError>;
    fn hide_ghost(&mut self) -> Result<(), SurfaceError>;

    fn show_placeholder(&mut self, zone: Zone, index: usize) -> Result<(), SurfaceError>;
    fn move_placeholder(&mut self, zone: Zone, index: usize) -> Result<(), SurfaceError>;
    fn remove_placeholder(&mut self) -> Result<(), SurfaceError>;

    /// Takes the subject's button out of the layout until it is restored.
    fn detach_button(
        &mut self,
        entry: &EntryId,
        zone: Zone,
        index: usize,
    ) -> Result<(), SurfaceError>;
    fn restore_button(
        &mut self,
        entry: &EntryId,
        zone: Zone,
        index: usize,
    ) -> Result<(), SurfaceError>;

    fn set_highlight(&mut self, zone: Option<Zone>) -> Result<(), SurfaceError>;
    /// Affordance drawn inside an otherwise empty Pinned zone.
    fn set_empty_pinned_hint(&mut self, visible: bool) -> Result<(), SurfaceError>;
}

/// Zone under `point`, checked in Hidden > Pinned > Sorted order and
/// skipping zones `accepts` rejects.
pub fn zone_at(
    surface: &dyn RenderSurface,
    point: Pos2,
    accepts: impl Fn(Zone) -> bool,
) -> Option<Zone> {
    Zone::HIT_ORDER.into_iter().find(|zone| {
        accepts(*zone)
            && surface
                .zone_bounds(*zone)
                .is_some_and(|bounds| bounds.contains(point))
    })
}

/// Entry whose visible button contains `point`.
pub fn entry_at(surface: &dyn RenderSurface, point: Pos2) -> Option<EntryId> {
    Zone::HIT_ORDER.into_iter().find_map(|zone| {
        surface
            .visible_buttons(zone)
            .into_iter()
            .find(|button| button.bounds.contains(point))
            .map(|button| button.entry)
    })
}

/// Number of Pinned buttons, other than `subject`, whose vertical midpoint
/// sits above `pointer_y`.
pub fn pinned_insertion_index(
    buttons: &[VisibleButton],
    subject: &EntryId,
    pointer_y: f32,
) -> usize {
    buttons
        .iter()
        .filter(|button| button.entry != *subject)
        .filter(|button| button.bounds.center().y <= pointer_y)
        .count()
}
