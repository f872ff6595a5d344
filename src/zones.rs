use crate::entry::{Entry, EntryId};
use crate::ordering::{order_hidden_zone, sort_pinned_zone, sort_sorted_zone};
use indexmap::IndexSet;
use std::rc::Rc;

/// Saved hidden identities, iterated in insertion order.
pub type HiddenSet = IndexSet<EntryId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Pinned,
    Sorted,
    Hidden,
}

impl Zone {
    /// Hit-test precedence: Hidden bounds may overlap adjacent chrome.
    pub const HIT_ORDER: [Zone; 3] = [Zone::Hidden, Zone::Pinned, Zone::Sorted];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    pub pinning_enabled: bool,
    pub hiding_enabled: bool,
}

impl FeatureFlags {
    pub fn from_settings(plugin_enabled: bool, allow_pinning: bool, allow_hiding: bool) -> Self {
        Self {
            pinning_enabled: plugin_enabled && allow_pinning,
            hiding_enabled: plugin_enabled && allow_hiding,
        }
    }

    pub fn drag_allowed(&self) -> bool {
        self.pinning_enabled || self.hiding_enabled
    }

    /// Whether `zone` can currently receive entries.
    pub fn accepts(&self, zone: Zone) -> bool {
        match zone {
            Zone::Pinned => self.pinning_enabled,
            Zone::Hidden => self.hiding_enabled,
            Zone::Sorted => true,
        }
    }
}

/// The three zone partitions, each in display order.
#[derive(Debug, Clone, Default)]
pub struct ZoneLists {
    pub pinned: Vec<Rc<Entry>>,
    pub sorted: Vec<Rc<Entry>>,
    pub hidden: Vec<Rc<Entry>>,
}

impl ZoneLists {
    pub fn list(&self, zone: Zone) -> &[Rc<Entry>] {
        match zone {
            Zone::Pinned => &self.pinned,
            Zone::Sorted => &self.sorted,
            Zone::Hidden => &self.hidden,
        }
    }

    pub(crate) fn list_mut(&mut self, zone: Zone) -> &mut Vec<Rc<Entry>> {
        match zone {
            Zone::Pinned => &mut self.pinned,
            Zone::Sorted => &mut self.sorted,
            Zone::Hidden => &mut self.hidden,
        }
    }

    pub fn zone_of(&self, id: &EntryId) -> Option<Zone> {
        Zone::HIT_ORDER
            .into_iter()
            .find(|zone| self.list(*zone).iter().any(|entry| entry.id == *id))
    }

    pub fn index_in(&self, zone: Zone, id: &EntryId) -> Option<usize> {
        self.list(zone).iter().position(|entry| entry.id == *id)
    }

    /// Removes `id` from every zone. Returns the zone it was found in.
    pub(crate) fn take(&mut self, id: &EntryId) -> Option<Zone> {
        let mut found = None;
        for zone in Zone::HIT_ORDER {
            let list = self.list_mut(zone);
            let before = list.len();
            list.retain(|entry| entry.id != *id);
            if list.len() != before {
                found = Some(zone);
            }
        }
        found
    }

    pub fn ids(&self, zone: Zone) -> Vec<EntryId> {
        self.list(zone).iter().map(|entry| entry.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.pinned.len() + self.sorted.len() + self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions `entries` (registration order) into zones.
///
/// Precedence per entry: saved-hidden (when hiding is enabled), then
/// saved-pinned (when pinning is enabled), then Sorted. Pure and idempotent.
pub fn reassign_all(
    entries: &[Rc<Entry>],
    pinned_order: &[EntryId],
    hidden_set: &HiddenSet,
    flags: FeatureFlags,
) -> ZoneLists {
    let mut lists = ZoneLists::default();

    for entry in entries {
        if flags.hiding_enabled && hidden_set.contains(&entry.id) {
            lists.hidden.push(entry.clone());
        } else if flags.pinning_enabled && pinned_order.contains(&entry.id) {
            lists.pinned.push(entry.clone());
        } else {
            lists.sorted.push(entry.clone());
        }
    }

    sort_pinned_zone(&mut lists.pinned, pinned_order);
    sort_sorted_zone(&mut lists.sorted, entries);
    order_hidden_zone(&mut lists.hidden, pinned_order, entries);
    lists
}
