//! Serializable view of an enriched character for an external renderer.

use crate::models::{CharacterInfo, GameData, Item, Slot, SlotGroup, TraitRank};
use serde::Serialize;

/// One named stat value on an item, resolved through the stat table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatView {
    pub label: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: u32,
    pub slot: Slot,
    pub equipped: bool,
    pub name: String,
    pub icon: String,
    pub item_level: u32,
    pub armor: u32,
    pub quality: String,
    pub tier_bonus: String,
    pub sockets: String,
    pub bonus_ids: Vec<u32>,
    pub primary: Vec<StatView>,
    pub secondary: Vec<StatView>,
    pub tertiary: Vec<StatView>,
}

impl ItemView {
    fn new(item: &Item, data: &GameData) -> Self {
        let pick = |names: &[String]| -> Vec<StatView> {
            names
                .iter()
                .filter_map(|name| {
                    item.stat_amount(data, name).map(|amount| StatView {
                        label: name.clone(),
                        amount,
                    })
                })
                .collect()
        };

        Self {
            id: item.id,
            slot: item.slot,
            equipped: item.equipped,
            name: item.details.name.clone(),
            icon: item.details.icon.clone(),
            item_level: item.details.item_level,
            armor: item.details.armor,
            quality: item.details.quality.clone(),
            tier_bonus: item.tier_bonus(data).to_string(),
            sockets: item.socket_count_label(),
            bonus_ids: item.bonus_ids.clone(),
            primary: pick(data.primary.as_slice()),
            secondary: pick(data.secondary.as_slice()),
            tertiary: pick(data.tertiary.as_slice()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub group: SlotGroup,
    pub label: String,
    pub items: Vec<ItemView>,
}

/// Both physical slots of a paired slot, for side-by-side comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairedSlotView {
    pub slot: Slot,
    pub items: Vec<ItemView>,
}

/// Everything a renderer needs, with labels already localized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GearReport {
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
    pub slots: Vec<SlotView>,
    pub weapons: Vec<ItemView>,
    pub paired: Vec<PairedSlotView>,
}

impl GearReport {
    pub fn build(character: &CharacterInfo, data: &GameData, locale: &str) -> Self {
        let slots = character
            .slots()
            .into_iter()
            .map(|summary| SlotView {
                group: summary.group,
                label: data.localize(summary.group.as_str(), locale),
                items: summary
                    .items
                    .into_iter()
                    .map(|item| ItemView::new(item, data))
                    .collect(),
            })
            .collect();

        let weapons = character
            .items
            .iter()
            .filter(|item| item.slot.group().is_none())
            .map(|item| ItemView::new(item, data))
            .collect();

        let paired = [Slot::Finger1, Slot::Trinket1]
            .into_iter()
            .map(|slot| PairedSlotView {
                slot,
                items: character
                    .filter_by_slot(slot)
                    .into_iter()
                    .map(|item| ItemView::new(item, data))
                    .collect(),
            })
            .collect();

        Self {
            class: character.class.clone(),
            name: character.name.clone(),
            level: character.level,
            race: character.race.clone(),
            region: character.region.clone(),
            server: character.server.clone(),
            spec: character.spec.clone(),
            professions: character.professions.clone(),
            talents: character.talents.clone(),
            artifact: character.artifact.clone(),
            crucible: character.crucible.clone(),
            slots,
            weapons,
            paired,
        }
    }
}
