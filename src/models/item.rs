use crate::models::GameData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Equipment slot tokens recognized on item lines.
///
/// The finger and trinket slots exist twice physically but display as a
/// single [`SlotGroup`]. Weapon slots are parsed and enriched but have no
/// display group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Head,
    Neck,
    Shoulder,
    Back,
    Chest,
    Wrist,
    Hands,
    Waist,
    Legs,
    Feet,
    Finger1,
    Finger2,
    Trinket1,
    Trinket2,
    MainHand,
    OffHand,
}

impl Slot {
    pub const ALL: [Slot; 16] = [
        Slot::Head,
        Slot::Neck,
        Slot::Shoulder,
        Slot::Back,
        Slot::Chest,
        Slot::Wrist,
        Slot::Hands,
        Slot::Waist,
        Slot::Legs,
        Slot::Feet,
        Slot::Finger1,
        Slot::Finger2,
        Slot::Trinket1,
        Slot::Trinket2,
        Slot::MainHand,
        Slot::OffHand,
    ];

    /// The token as it appears in a profile
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Head => "head",
            Slot::Neck => "neck",
            Slot::Shoulder => "shoulder",
            Slot::Back => "back",
            Slot::Chest => "chest",
            Slot::Wrist => "wrist",
            Slot::Hands => "hands",
            Slot::Waist => "waist",
            Slot::Legs => "legs",
            Slot::Feet => "feet",
            Slot::Finger1 => "finger1",
            Slot::Finger2 => "finger2",
            Slot::Trinket1 => "trinket1",
            Slot::Trinket2 => "trinket2",
            Slot::MainHand => "main_hand",
            Slot::OffHand => "off_hand",
        }
    }

    /// Display group this slot collapses into, if any
    pub fn group(&self) -> Option<SlotGroup> {
        let group = match self {
            Slot::Head => SlotGroup::Head,
            Slot::Neck => SlotGroup::Neck,
            Slot::Shoulder => SlotGroup::Shoulder,
            Slot::Back => SlotGroup::Back,
            Slot::Chest => SlotGroup::Chest,
            Slot::Wrist => SlotGroup::Wrist,
            Slot::Hands => SlotGroup::Hands,
            Slot::Waist => SlotGroup::Waist,
            Slot::Legs => SlotGroup::Legs,
            Slot::Feet => SlotGroup::Feet,
            Slot::Finger1 | Slot::Finger2 => SlotGroup::Finger,
            Slot::Trinket1 | Slot::Trinket2 => SlotGroup::Trinket,
            Slot::MainHand | Slot::OffHand => return None,
        };
        Some(group)
    }

    /// The other physical slot of a paired slot (finger1 <-> finger2, trinket1 <-> trinket2)
    pub fn counterpart(&self) -> Option<Slot> {
        match self {
            Slot::Finger1 => Some(Slot::Finger2),
            Slot::Finger2 => Some(Slot::Finger1),
            Slot::Trinket1 => Some(Slot::Trinket2),
            Slot::Trinket2 => Some(Slot::Trinket1),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown slot token: {0}")]
pub struct UnknownSlot(pub String);

impl FromStr for Slot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::ALL
            .iter()
            .copied()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| UnknownSlot(s.to_string()))
    }
}

/// Display grouping of slots, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotGroup {
    Head,
    Neck,
    Shoulder,
    Back,
    Chest,
    Wrist,
    Hands,
    Waist,
    Legs,
    Feet,
    Finger,
    Trinket,
}

impl SlotGroup {
    pub const DISPLAY_ORDER: [SlotGroup; 12] = [
        SlotGroup::Head,
        SlotGroup::Neck,
        SlotGroup::Shoulder,
        SlotGroup::Back,
        SlotGroup::Chest,
        SlotGroup::Wrist,
        SlotGroup::Hands,
        SlotGroup::Waist,
        SlotGroup::Legs,
        SlotGroup::Feet,
        SlotGroup::Finger,
        SlotGroup::Trinket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotGroup::Head => "head",
            SlotGroup::Neck => "neck",
            SlotGroup::Shoulder => "shoulder",
            SlotGroup::Back => "back",
            SlotGroup::Chest => "chest",
            SlotGroup::Wrist => "wrist",
            SlotGroup::Hands => "hands",
            SlotGroup::Waist => "waist",
            SlotGroup::Legs => "legs",
            SlotGroup::Feet => "feet",
            SlotGroup::Finger => "finger",
            SlotGroup::Trinket => "trinket",
        }
    }
}

impl fmt::Display for SlotGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (stat id, amount) entry from the item API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStat {
    pub stat: u32,
    pub amount: i64,
}

/// Attributes merged in from the item API.
///
/// Stays at `Default` until enrichment succeeds for the owning item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemDetails {
    pub name: String,
    pub icon: String,
    pub item_level: u32,
    pub armor: u32,
    pub quality: String,
    pub inventory_type: u32,
    pub item_set_id: u32,
    pub socket_count: usize,
    pub stats: Vec<ItemStat>,
}

impl ItemDetails {
    pub fn is_empty(&self) -> bool {
        *self == ItemDetails::default()
    }
}

/// One gear line from a profile, equipped or commented out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: u32,
    pub slot: Slot,
    pub equipped: bool,
    pub bonus_ids: Vec<u32>,
    pub details: ItemDetails,

    /// Set once a lookup has been attempted, whatever its outcome
    #[serde(skip)]
    pub fetched: bool,
}

impl Item {
    pub fn new(slot: Slot, equipped: bool) -> Self {
        Self {
            id: 0,
            slot,
            equipped,
            bonus_ids: Vec::new(),
            details: ItemDetails::default(),
            fetched: false,
        }
    }

    /// Whether the item should be sent to the item API
    pub fn needs_lookup(&self) -> bool {
        self.id != 0 && !self.fetched
    }

    /// Tier label for the item's set, `""` when the item is not part of a set
    pub fn tier_bonus<'a>(&self, data: &'a GameData) -> &'a str {
        data.tier_bonus(self.details.item_set_id)
    }

    /// Socket count as shown in a report; empty when the item has no sockets
    pub fn socket_count_label(&self) -> String {
        if self.details.socket_count == 0 {
            String::new()
        } else {
            self.details.socket_count.to_string()
        }
    }

    /// Amount of the first stat whose label matches `stat_name`
    pub fn stat_amount(&self, data: &GameData, stat_name: &str) -> Option<i64> {
        self.details
            .stats
            .iter()
            .find(|s| data.stat_label(s.stat) == Some(stat_name))
            .map(|s| s.amount)
    }
}
