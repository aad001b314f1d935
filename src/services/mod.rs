//! Services module - the parse and enrichment pipeline.
//!
//! The services take a profile from raw text to a fully enriched
//! [`CharacterInfo`](crate::models::CharacterInfo) and a display projection of
//! its gear. They have no dependencies on how the result is rendered.
//!
//! # Components
//!
//! - [`LineClassifier`]: Matches a line against an ordered rule table
//!   ([`LineKind::PRECEDENCE`]) and extracts its fields as a [`ProfileLine`]
//! - [`ProfileParser`]: Applies classified lines in order to build the character
//!   and its unenriched items
//! - [`Enricher`]: Fans out one lookup per item against an [`ItemSource`] and
//!   merges results back by index
//! - [`HttpItemSource`]: The item API client used in production
//! - [`slots`]: Display grouping and paired-slot lookups
//!
//! # Failure Handling
//!
//! | Stage      | Fatal                       | Logged and skipped                      |
//! |------------|-----------------------------|-----------------------------------------|
//! | Parsing    | malformed `level=`          | unrecognized lines, bad numeric values  |
//! | Enrichment | transport failure (any item)| undecodable response (that item only)   |
//!
//! # Usage Example
//!
//! ```ignore
//! use gearsheet::services::{Enricher, HttpItemSource, ProfileParser};
//!
//! let parser = ProfileParser::new(&game_data)?;
//! let mut character = parser.parse(&profile_text)?;
//!
//! let source = Arc::new(HttpItemSource::new(&settings)?);
//! Enricher::new(source, &settings.locale)
//!     .enrich_character(&mut character)
//!     .await?;
//!
//! for summary in character.slots() {
//!     println!("{}: {} items", summary.group, summary.items.len());
//! }
//! ```

pub mod enrichment;
pub mod item_source;
pub mod line_classifier;
pub mod profile_parser;
pub mod slots;

pub use enrichment::{EnrichError, EnrichSummary, Enricher};
pub use item_source::{FetchError, HttpItemSource, ItemRequest, ItemSource, decode_item};
pub use line_classifier::{ItemLine, LineClassifier, LineKind, ProfileLine};
pub use profile_parser::{ParseError, ProfileParser};
pub use slots::{SlotSummary, filter_by_slot, slot_summaries};
