//! Data models for gearsheet.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`CharacterInfo`]: One parsed profile, holding the character fields and its [`Item`]s
//! - [`Item`]: A gear line plus the [`ItemDetails`] merged in from the item API
//! - [`Slot`] / [`SlotGroup`]: Raw slot tokens and the display groups they collapse into
//! - [`GameData`]: Static lookup tables loaded from `game_data.yaml`
//! - [`Settings`]: Runtime settings loaded from `settings.yaml` and the environment
//!
//! # Architecture Note
//!
//! - **Serializable**: Everything a renderer reads derives `Serialize`
//! - **Single writer**: `CharacterInfo` is only mutated by the parser, and its items only
//!   by the enrichment stage (one task per item). After that it is read-only.
//! - **Shared config**: `GameData` is never mutated after load; share it with `Arc`

pub mod character;
pub mod config;
pub mod item;

pub use character::{CharacterInfo, TraitRank};
pub use config::{DataError, GameData, Settings};
pub use item::{Item, ItemDetails, ItemStat, Slot, SlotGroup, UnknownSlot};
