use crate::entry::{Entry, EntryId};
use crate::events::SidebarEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
use std::rc::Rc;

/// At most one active entry. Selecting the active entry again deselects it.
#[derive(Default)]
pub struct SelectionController {
    selected: Option<Rc<Entry>>,
    listeners: Vec<Sender<SidebarEvent>>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&Rc<Entry>> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selected.as_ref().is_some_and(|entry| entry.id == *id)
    }

    pub fn subscribe(&mut self) -> Receiver<SidebarEvent> {
        let (tx, rx) = unbounded();
        self.listeners.push(tx);
        rx
    }

    /// Applies a user selection. Ignored while a drag is in progress or when
    /// `target` is not among `registered`. Returns whether anything changed.
    pub fn select(
        &mut self,
        target: Option<&EntryId>,
        registered: &[Rc<Entry>],
        drag_active: bool,
    ) -> bool {
        if drag_active {
            debug!("select: ignored during drag");
            return false;
        }
        let next = match target {
            None => None,
            Some(id) if self.is_selected(id) => None,
            Some(id) => match registered.iter().find(|entry| entry.id == *id) {
                Some(entry) => Some(entry.clone()),
                None => {
                    debug!("select: ignored unknown entry {id}");
                    return false;
                }
            },
        };
        self.replace(next)
    }

    /// Drops the selection when it points at `id`, regardless of drag state.
    pub fn clear_if(&mut self, id: &EntryId) -> bool {
        if self.is_selected(id) {
            self.replace(None)
        } else {
            false
        }
    }

    fn replace(&mut self, next: Option<Rc<Entry>>) -> bool {
        let unchanged = match (&self.selected, &next) {
            (None, None) => true,
            (Some(a), Some(b)) => a.id == b.id,
            _ => false,
        };
        if unchanged {
            return false;
        }

        let previous = std::mem::replace(&mut self.selected, next);
        if let Some(prev) = &previous {
            prev.content.on_deactivate();
        }
        if let Some(current) = &self.selected {
            current.content.on_activate();
        }

        let event = SidebarEvent::SelectionChanged {
            previous: previous.map(|entry| entry.id.clone()),
            current: self.selected.as_ref().map(|entry| entry.id.clone()),
        };
        debug!("selection: {event:?}");
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
        true
    }
}
