//! Read-only projections of an item list for display.
//!
//! Paired physical slots (`finger1`/`finger2`, `trinket1`/`trinket2`) collapse
//! into a single group here, while [`filter_by_slot`] still distinguishes them
//! by their original token.

use crate::models::{Item, Slot, SlotGroup};
use serde::Serialize;
use std::cmp::Reverse;

/// Items belonging to one display group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSummary<'a> {
    pub group: SlotGroup,
    pub items: Vec<&'a Item>,
}

/// Group items into the 12 display groups, in display order.
///
/// Within a group equipped items come first, then higher item level; ties keep
/// profile order. Weapon slots belong to no group and are left out.
pub fn slot_summaries(items: &[Item]) -> Vec<SlotSummary<'_>> {
    SlotGroup::DISPLAY_ORDER
        .iter()
        .map(|&group| {
            let mut grouped: Vec<&Item> = items
                .iter()
                .filter(|item| item.slot.group() == Some(group))
                .collect();
            grouped.sort_by_key(|item| (Reverse(item.equipped), Reverse(item.details.item_level)));
            SlotSummary {
                group,
                items: grouped,
            }
        })
        .collect()
}

/// Items stored in `slot` or in its paired counterpart, in profile order.
///
/// Asking for `trinket2` also returns items stored as `trinket1`, so the two
/// physical slots can be compared side by side.
pub fn filter_by_slot(items: &[Item], slot: Slot) -> Vec<&Item> {
    let counterpart = slot.counterpart();
    items
        .iter()
        .filter(|item| item.slot == slot || Some(item.slot) == counterpart)
        .collect()
}
