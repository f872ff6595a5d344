//! Ordering rules for each zone.
//!
//! Sorted: priority ascending, then label (ordinal), then registration order.
//! Pinned: position within the saved pinned order.
//! Hidden (display only): saved pinned-order members first, then the Sorted rule.

use crate::entry::{Entry, EntryId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

/// Primary and secondary keys of the Sorted-zone comparator.
pub fn compare_priority_label(a: &Entry, b: &Entry) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.label.as_bytes().cmp(b.label.as_bytes()))
}

fn registration_rank(registered: &[Rc<Entry>]) -> HashMap<&EntryId, usize> {
    registered
        .iter()
        .enumerate()
        .map(|(idx, entry)| (&entry.id, idx))
        .collect()
}

fn rank_of(rank: &HashMap<&EntryId, usize>, id: &EntryId) -> usize {
    rank.get(id).copied().unwrap_or(usize::MAX)
}

pub fn sort_sorted_zone(zone: &mut [Rc<Entry>], registered: &[Rc<Entry>]) {
    let rank = registration_rank(registered);
    zone.sort_by(|a, b| {
        compare_priority_label(a, b)
            .then_with(|| rank_of(&rank, &a.id).cmp(&rank_of(&rank, &b.id)))
    });
}

pub fn sort_pinned_zone(zone: &mut [Rc<Entry>], pinned_order: &[EntryId]) {
    zone.sort_by_key(|entry| {
        pinned_order
            .iter()
            .position(|id| *id == entry.id)
            .unwrap_or(usize::MAX)
    });
}

pub fn order_hidden_zone(
    zone: &mut Vec<Rc<Entry>>,
    pinned_order: &[EntryId],
    registered: &[Rc<Entry>],
) {
    let (mut remembered, mut rest): (Vec<_>, Vec<_>) = std::mem::take(zone)
        .into_iter()
        .partition(|entry| pinned_order.contains(&entry.id));
    sort_pinned_zone(&mut remembered, pinned_order);
    sort_sorted_zone(&mut rest, registered);
    remembered.append(&mut rest);
    *zone = remembered;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{entry, labels};

    #[test]
    fn sorted_zone_orders_by_priority_then_label() {
        let registered = vec![entry("b", 2), entry("a", 2), entry("z", 1)];
        let mut zone = registered.clone();
        sort_sorted_zone(&mut zone, &registered);
        assert_eq!(labels(&zone), vec!["z", "a", "b"]);
    }

    #[test]
    fn label_compare_is_case_sensitive_ordinal() {
        let registered = vec![entry("apple", 0), entry("Zebra", 0)];
        let mut zone = registered.clone();
        sort_sorted_zone(&mut zone, &registered);
        assert_eq!(labels(&zone), vec!["Zebra", "apple"]);
    }

    #[test]
    fn full_ties_fall_back_to_registration_order() {
        let first = Rc::new(Entry::new(
            EntryId::new("first"),
            1,
            "Same",
            Default::default(),
            Rc::new(crate::entry::NoContent),
        ));
        let second = Rc::new(Entry::new(
            EntryId::new("second"),
            1,
            "Same",
            Default::default(),
            Rc::new(crate::entry::NoContent),
        ));
        let registered = vec![first.clone(), second.clone()];
        let mut zone = vec![second, first];
        sort_sorted_zone(&mut zone, &registered);
        assert_eq!(zone[0].id.as_str(), "first");
        assert_eq!(zone[1].id.as_str(), "second");
    }

    #[test]
    fn hidden_zone_lists_remembered_pins_first() {
        let registered = vec![entry("a", 1), entry("b", 2), entry("c", 3), entry("d", 0)];
        let mut zone = registered.clone();
        let pinned_order = vec![EntryId::from("c"), EntryId::from("b")];
        order_hidden_zone(&mut zone, &pinned_order, &registered);
        assert_eq!(labels(&zone), vec!["c", "b", "d", "a"]);
    }
}
