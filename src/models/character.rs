use crate::models::{Item, Slot};
use crate::services::slots::{self, SlotSummary};
use serde::Serialize;

/// A (trait id, rank) allocation from an `artifact=` or `crucible=` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraitRank {
    pub id: u32,
    pub rank: u32,
}

impl TraitRank {
    pub fn new(id: u32, rank: u32) -> Self {
        Self { id, rank }
    }
}

/// Everything recovered from one profile.
///
/// Built by [`ProfileParser`](crate::services::ProfileParser); the items are
/// later filled in place by [`Enricher`](crate::services::Enricher).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CharacterInfo {
    pub class: String,
    pub name: String,
    pub level: u32,
    pub race: String,
    pub region: String,
    pub server: String,
    pub spec: String,
    pub professions: String,
    pub talents: Vec<u8>,
    pub artifact: Vec<TraitRank>,
    pub crucible: Vec<TraitRank>,
    pub items: Vec<Item>,
}

impl CharacterInfo {
    /// Items grouped for display; see [`slots::slot_summaries`]
    pub fn slots(&self) -> Vec<SlotSummary<'_>> {
        slots::slot_summaries(&self.items)
    }

    /// Items stored in `slot` or its paired counterpart; see [`slots::filter_by_slot`]
    pub fn filter_by_slot(&self, slot: Slot) -> Vec<&Item> {
        slots::filter_by_slot(&self.items, slot)
    }

    pub fn equipped_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.equipped)
    }
}
