use crate::entry::{Entry, EntryId};
use eframe::egui::Pos2;
use std::rc::Rc;

/// Pointer input routed to the single drag controller.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Press { entry: EntryId, point: Pos2 },
    Move { point: Pos2 },
    Release { point: Pos2 },
}

/// Registry callbacks: entries appearing and going away.
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    Added(Rc<Entry>),
    Removed(EntryId),
}

/// Notifications sent to subscribers of the navigation manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEvent {
    SelectionChanged {
        previous: Option<EntryId>,
        current: Option<EntryId>,
    },
}
