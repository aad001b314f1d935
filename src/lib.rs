// gearsheet - Character gear profile parsing and item enrichment
//
// This is the library crate containing the parse/enrich pipeline and data structures.
// The binary crate (main.rs) provides the command-line entry point.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use metrics::Metrics;
pub use models::{CharacterInfo, GameData, Item, Settings, Slot};
pub use report::GearReport;
pub use services::{Enricher, HttpItemSource, ProfileParser};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
