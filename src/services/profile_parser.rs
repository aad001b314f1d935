use crate::metrics::Metrics;
use crate::models::{CharacterInfo, GameData, Item};
use crate::services::line_classifier::{LineClassifier, ProfileLine};
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort parsing of a profile
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unable to parse level {value:?} on line {line}: {source}")]
    InvalidLevel {
        line: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Turns profile text into a [`CharacterInfo`] with unenriched items.
///
/// Lines are applied strictly in order. Scalar and list fields are replaced
/// wholesale when a later line repeats them; every item line appends a new
/// [`Item`]. Unrecognized lines are logged and skipped.
pub struct ProfileParser {
    classifier: LineClassifier,
    metrics: Arc<Metrics>,
}

impl ProfileParser {
    /// Create a parser accepting the class tokens listed in `data`
    pub fn new(data: &GameData) -> Result<Self, ParseError> {
        Ok(Self {
            classifier: LineClassifier::new(&data.classes)?,
            metrics: Arc::new(Metrics::new()),
        })
    }

    /// Record parse counters into a shared [`Metrics`] instance
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn parse(&self, text: &str) -> Result<CharacterInfo, ParseError> {
        let mut character = CharacterInfo::default();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let classified = self.classifier.classify(line);
            if classified != ProfileLine::Blank {
                self.metrics.record_line_parsed();
            }
            self.apply(&mut character, line_no, line, classified)?;
        }

        tracing::debug!(
            "Parsed profile - class: {}, name: {}, level: {}, items: {}",
            character.class,
            character.name,
            character.level,
            character.items.len()
        );

        Ok(character)
    }

    /// Read and parse a profile file
    pub fn parse_file(&self, path: &Utf8Path) -> Result<CharacterInfo> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile: {}", path))?;

        let character = self
            .parse(&text)
            .with_context(|| format!("Failed to parse profile: {}", path))?;

        tracing::info!(
            "Parsed profile {} ({} items)",
            path,
            character.items.len()
        );
        Ok(character)
    }

    fn apply(
        &self,
        character: &mut CharacterInfo,
        line_no: usize,
        raw: &str,
        line: ProfileLine,
    ) -> Result<(), ParseError> {
        match line {
            ProfileLine::Blank | ProfileLine::Comment | ProfileLine::Role => {}
            ProfileLine::Item(item_line) => {
                let mut item = Item::new(item_line.slot, item_line.equipped);
                item.id = item_line.id;
                item.bonus_ids = item_line.bonus_ids;
                character.items.push(item);
            }
            ProfileLine::ClassName { class, name } => {
                character.class = class;
                character.name = name;
            }
            ProfileLine::Level(value) => {
                character.level =
                    value
                        .trim()
                        .parse()
                        .map_err(|source| ParseError::InvalidLevel {
                            line: line_no,
                            value,
                            source,
                        })?;
            }
            ProfileLine::Spec(spec) => character.spec = spec,
            ProfileLine::Race(race) => character.race = race,
            ProfileLine::Region(region) => character.region = region,
            ProfileLine::Server(server) => character.server = server,
            ProfileLine::Professions(professions) => character.professions = professions,
            ProfileLine::Talents(talents) => character.talents = talents,
            ProfileLine::Artifact(artifact) => character.artifact = artifact,
            ProfileLine::Crucible(crucible) => character.crucible = crucible,
            ProfileLine::Unrecognized => {
                self.metrics.record_line_unrecognized();
                tracing::warn!("Unable to parse line {} from profile: `{}`", line_no, raw);
            }
        }

        Ok(())
    }
}
