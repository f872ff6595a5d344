//! Pointer-driven move of one entry between zones.
//!
//! `Idle -> Pressed -> Dragging -> Idle`. A press only arms the controller;
//! the drag begins once the pointer travels past the threshold, so plain
//! clicks are never hijacked. The controller never mutates the zone model:
//! a finished drag yields a [`DropOutcome`] for the navigation manager to
//! apply.

use crate::config::DEFAULT_DRAG_THRESHOLD;
use crate::entry::{Entry, EntryId};
use crate::surface::{pinned_insertion_index, zone_at, RenderSurface, SurfaceError};
use crate::zones::{FeatureFlags, Zone, ZoneLists};
use eframe::egui::{Pos2, Vec2};
use log::debug;
use std::rc::Rc;

const DEFAULT_POINTER_OFFSET: Vec2 = Vec2 { x: 8.0, y: 8.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Pressed,
    Dragging,
}

/// Model view the controller reads while tracking.
pub struct DragContext<'a> {
    pub lists: &'a ZoneLists,
    pub flags: FeatureFlags,
}

#[derive(Debug, Clone)]
pub struct DragSession {
    pub subject: Rc<Entry>,
    pub origin_zone: Zone,
    pub origin_index: usize,
    pub pointer_offset: Vec2,
    pub current_target_zone: Option<Zone>,
    pub current_insertion_index: Option<usize>,
    ghost_visible: bool,
    placeholder_shown: bool,
    highlight: Option<Zone>,
    empty_hint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Hidden { subject: EntryId },
    Pinned { subject: EntryId, index: usize },
    Sorted { subject: EntryId },
    Cancelled { subject: EntryId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragStep {
    Nothing,
    /// Released without crossing the threshold.
    Clicked(EntryId),
    Finished(DropOutcome),
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Pressed {
        subject: EntryId,
        press_point: Pos2,
    },
    Dragging(DragSession),
}

#[derive(Debug)]
pub struct DragController {
    phase: Phase,
    threshold: f32,
    last_pointer: Option<Pos2>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

fn best_effort(result: Result<(), SurfaceError>, what: &str) {
    if let Err(err) = result {
        debug!("drag: {what} failed, continuing without it: {err}");
    }
}

impl DragController {
    pub fn new(threshold: f32) -> Self {
        Self {
            phase: Phase::Idle,
            threshold,
            last_pointer: None,
        }
    }

    pub fn state(&self) -> DragState {
        match self.phase {
            Phase::Idle => DragState::Idle,
            Phase::Pressed { .. } => DragState::Pressed,
            Phase::Dragging(_) => DragState::Dragging,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.phase {
            Phase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Entry under the pointer capture, pressed or dragged.
    pub fn subject(&self) -> Option<&EntryId> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Pressed { subject, .. } => Some(subject),
            Phase::Dragging(session) => Some(&session.subject.id),
        }
    }

    pub fn last_pointer(&self) -> Option<Pos2> {
        self.last_pointer
    }

    pub fn press(&mut self, subject: EntryId, point: Pos2) {
        if !matches!(self.phase, Phase::Idle) {
            debug!("drag: press on {subject} ignored, pointer already captured");
            return;
        }
        debug!("drag: pressed {subject} at {point:?}");
        self.last_pointer = Some(point);
        self.phase = Phase::Pressed {
            subject,
            press_point: point,
        };
    }

    /// Subject a move to `point` would promote into a drag.
    pub fn promotion_due(&self, point: Pos2, flags: FeatureFlags) -> Option<&EntryId> {
        match &self.phase {
            Phase::Pressed {
                subject,
                press_point,
            } if flags.drag_allowed() && point.distance(*press_point) > self.threshold => {
                Some(subject)
            }
            _ => None,
        }
    }

    pub fn pointer_moved(
        &mut self,
        point: Pos2,
        ctx: &DragContext<'_>,
        surface: &mut dyn RenderSurface,
    ) {
        self.last_pointer = Some(point);
        if let Some(subject) = self.promotion_due(point, ctx.flags).cloned() {
            let press_point = match &self.phase {
                Phase::Pressed { press_point, .. } => *press_point,
                _ => point,
            };
            self.begin(subject, press_point, ctx, surface);
        }
        if let Phase::Dragging(session) = &mut self.phase {
            if ctx.flags.drag_allowed() {
                track(session, point, ctx, surface);
            }
        }
    }

    pub fn release(
        &mut self,
        point: Pos2,
        ctx: &DragContext<'_>,
        surface: &mut dyn RenderSurface,
    ) -> DragStep {
        self.last_pointer = Some(point);
        match std::mem::take(&mut self.phase) {
            Phase::Idle => DragStep::Nothing,
            Phase::Pressed { subject, .. } => {
                debug!("drag: click on {subject}");
                DragStep::Clicked(subject)
            }
            Phase::Dragging(session) => {
                let landed = zone_at(surface, point, |zone| ctx.flags.accepts(zone));
                DragStep::Finished(finish(session, landed, point, surface))
            }
        }
    }

    /// Force-finishes a drag at the last pointer position after the flags
    /// changed. A target zone the new flags reject resolves to Sorted.
    pub fn interrupt(
        &mut self,
        ctx: &DragContext<'_>,
        surface: &mut dyn RenderSurface,
    ) -> Option<DropOutcome> {
        if !self.is_dragging() {
            return None;
        }
        match std::mem::take(&mut self.phase) {
            Phase::Dragging(session) => {
                let point = self.last_pointer.unwrap_or(Pos2::ZERO);
                let landed = zone_at(surface, point, |_| true).map(|zone| {
                    if ctx.flags.accepts(zone) {
                        zone
                    } else {
                        Zone::Sorted
                    }
                });
                debug!("drag: interrupted at {point:?}, landing in {landed:?}");
                Some(finish(session, landed, point, surface))
            }
            _ => None,
        }
    }

    /// Drops any capture without landing anywhere.
    pub fn abort(&mut self, surface: &mut dyn RenderSurface) -> Option<DropOutcome> {
        match std::mem::take(&mut self.phase) {
            Phase::Dragging(session) => {
                let point = self.last_pointer.unwrap_or(Pos2::ZERO);
                Some(finish(session, None, point, surface))
            }
            _ => None,
        }
    }

    fn begin(
        &mut self,
        subject: EntryId,
        press_point: Pos2,
        ctx: &DragContext<'_>,
        surface: &mut dyn RenderSurface,
    ) {
        let Some(origin_zone) = ctx.lists.zone_of(&subject) else {
            debug!("drag: {subject} is no longer registered");
            self.phase = Phase::Idle;
            return;
        };
        let origin_index = ctx.lists.index_in(origin_zone, &subject).unwrap_or(0);
        let entry = ctx.lists.list(origin_zone)[origin_index].clone();
        let pointer_offset = surface
            .visible_buttons(origin_zone)
            .into_iter()
            .find(|button| button.entry == subject)
            .map(|button| press_point - button.bounds.min)
            .unwrap_or(DEFAULT_POINTER_OFFSET);

        debug!("drag: started {subject} from {origin_zone:?}[{origin_index}]");
        best_effort(
            surface.detach_button(&subject, origin_zone, origin_index),
            "detaching button",
        );

        self.phase = Phase::Dragging(DragSession {
            subject: entry,
            origin_zone,
            origin_index,
            pointer_offset,
            current_target_zone: None,
            current_insertion_index: None,
            ghost_visible: false,
            placeholder_shown: false,
            highlight: None,
            empty_hint: false,
        });
    }
}

fn track(
    session: &mut DragSession,
    point: Pos2,
    ctx: &DragContext<'_>,
    surface: &mut dyn RenderSurface,
) {
    let target = zone_at(surface, point, |zone| ctx.flags.accepts(zone));
    let previous_index = session.current_insertion_index.take();
    session.current_target_zone = target;

    match target {
        Some(Zone::Pinned) => {
            let buttons = surface.visible_buttons(Zone::Pinned);
            let index = pinned_insertion_index(&buttons, &session.subject.id, point.y);
            if session.placeholder_shown {
                if previous_index != Some(index) {
                    best_effort(
                        surface.move_placeholder(Zone::Pinned, index),
                        "moving placeholder",
                    );
                }
            } else {
                best_effort(
                    surface.show_placeholder(Zone::Pinned, index),
                    "showing placeholder",
                );
                session.placeholder_shown = true;
            }
            session.current_insertion_index = Some(index);
            // The placeholder is the preview; no ghost on top of it.
            if session.ghost_visible {
                best_effort(surface.hide_ghost(), "hiding ghost");
                session.ghost_visible = false;
            }
            set_highlight(session, None, surface);
        }
        other => {
            clear_placeholder(session, surface);
            best_effort(
                surface.show_ghost(point - session.pointer_offset, &session.subject),
                "showing ghost",
            );
            session.ghost_visible = true;
            set_highlight(session, other, surface);
        }
    }

    let others_pinned = ctx
        .lists
        .pinned
        .iter()
        .filter(|entry| entry.id != session.subject.id)
        .count();
    let want_hint =
        ctx.flags.pinning_enabled && others_pinned == 0 && target != Some(Zone::Pinned);
    set_empty_hint(session, want_hint, surface);
}

fn clear_placeholder(session: &mut DragSession, surface: &mut dyn RenderSurface) {
    if session.placeholder_shown {
        best_effort(surface.remove_placeholder(), "removing placeholder");
        session.placeholder_shown = false;
    }
}

fn set_highlight(session: &mut DragSession, zone: Option<Zone>, surface: &mut dyn RenderSurface) {
    if session.highlight != zone {
        best_effort(surface.set_highlight(zone), "highlighting zone");
        session.highlight = zone;
    }
}

fn set_empty_hint(session: &mut DragSession, visible: bool, surface: &mut dyn RenderSurface) {
    if session.empty_hint != visible {
        best_effort(surface.set_empty_pinned_hint(visible), "toggling pin hint");
        session.empty_hint = visible;
    }
}

/// Shared terminal path for commits and cancels.
fn finish(
    mut session: DragSession,
    landed: Option<Zone>,
    point: Pos2,
    surface: &mut dyn RenderSurface,
) -> DropOutcome {
    let subject = session.subject.id.clone();
    let outcome = match landed {
        Some(Zone::Hidden) => DropOutcome::Hidden { subject },
        Some(Zone::Pinned) => {
            let buttons = surface.visible_buttons(Zone::Pinned);
            let index = pinned_insertion_index(&buttons, &subject, point.y);
            DropOutcome::Pinned { subject, index }
        }
        Some(Zone::Sorted) => DropOutcome::Sorted { subject },
        None => DropOutcome::Cancelled { subject },
    };

    best_effort(surface.hide_ghost(), "hiding ghost");
    session.ghost_visible = false;
    clear_placeholder(&mut session, surface);
    best_effort(
        surface.restore_button(
            &session.subject.id,
            session.origin_zone,
            session.origin_index,
        ),
        "restoring button",
    );
    set_highlight(&mut session, None, surface);
    set_empty_hint(&mut session, false, surface);

    debug!("drag: finished with {outcome:?}");
    outcome
}
