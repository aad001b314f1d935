use crate::models::{Slot, TraitRank};
use regex::{Captures, Regex};

/// Line kinds a profile may contain, in match precedence order.
///
/// [`LineClassifier`] tries them strictly in the order of [`LineKind::PRECEDENCE`];
/// the first pattern that matches decides the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    CommentedItem,
    ActiveItem,
    Comment,
    ClassName,
    Level,
    Spec,
    Race,
    Region,
    Server,
    Role,
    Professions,
    Talents,
    Artifact,
    Crucible,
}

impl LineKind {
    pub const PRECEDENCE: [LineKind; 14] = [
        LineKind::CommentedItem,
        LineKind::ActiveItem,
        LineKind::Comment,
        LineKind::ClassName,
        LineKind::Level,
        LineKind::Spec,
        LineKind::Race,
        LineKind::Region,
        LineKind::Server,
        LineKind::Role,
        LineKind::Professions,
        LineKind::Talents,
        LineKind::Artifact,
        LineKind::Crucible,
    ];
}

/// Item fields captured from a gear line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLine {
    pub slot: Slot,
    pub equipped: bool,
    pub id: u32,
    pub bonus_ids: Vec<u32>,
}

/// Result of classifying one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLine {
    Blank,
    Item(ItemLine),
    Comment,
    ClassName { class: String, name: String },
    /// Raw level text; the parser decides whether it is valid
    Level(String),
    Spec(String),
    Race(String),
    Region(String),
    Server(String),
    Role,
    Professions(String),
    Talents(Vec<u8>),
    Artifact(Vec<TraitRank>),
    Crucible(Vec<TraitRank>),
    Unrecognized,
}

struct Rule {
    kind: LineKind,
    pattern: Regex,
}

/// Classifies profile lines against a fixed, ordered rule table.
///
/// All patterns are compiled once at construction. The class/name pattern is
/// built from the class tokens in the game data, so construction can fail if a
/// token produces an invalid pattern.
pub struct LineClassifier {
    rules: Vec<Rule>,
    item_arg_pattern: Regex,
}

const SLOT_ALTERNATION: &str = "head|neck|shoulder|back|chest|wrist|hands|waist|legs|feet|finger1|finger2|trinket1|trinket2|main_hand|off_hand";

impl LineClassifier {
    /// Build the rule table for the given class tokens
    pub fn new(classes: &[String]) -> Result<Self, regex::Error> {
        let class_alternation = classes
            .iter()
            .map(|c| regex::escape(c))
            .collect::<Vec<_>>()
            .join("|");

        let rules = LineKind::PRECEDENCE
            .iter()
            .map(|&kind| {
                let pattern = match kind {
                    LineKind::CommentedItem => {
                        format!(r"^\s*#+\s*(?P<slot>{})=(?P<args>.*)$", SLOT_ALTERNATION)
                    }
                    LineKind::ActiveItem => {
                        format!(r"^\s*(?P<slot>{})=(?P<args>.*)$", SLOT_ALTERNATION)
                    }
                    LineKind::Comment => r"^\s*#.*$".to_string(),
                    LineKind::ClassName => format!(
                        r#"^\s*(?:class="?(?P<kw_class>{c})"?\s+name=(?P<kw_name>.*)|(?P<class>{c})=(?P<name>.*))$"#,
                        c = class_alternation
                    ),
                    LineKind::Level => r"^\s*level=(?P<value>.*)$".to_string(),
                    LineKind::Spec => r"^\s*spec=(?P<value>.*)$".to_string(),
                    LineKind::Race => r"^\s*race=(?P<value>.*)$".to_string(),
                    LineKind::Region => r"^\s*region=(?P<value>.*)$".to_string(),
                    LineKind::Server => r"^\s*server=(?P<value>.*)$".to_string(),
                    LineKind::Role => r"^\s*role=.*$".to_string(),
                    LineKind::Professions => r"^\s*professions=(?P<value>.*)$".to_string(),
                    LineKind::Talents => r"^\s*talents=(?P<value>[0-3]*)$".to_string(),
                    LineKind::Artifact => r"^\s*artifact=(?P<value>[0-9:]*)$".to_string(),
                    LineKind::Crucible => r"^\s*crucible=(?P<value>\S*)$".to_string(),
                };
                Ok(Rule {
                    kind,
                    pattern: Regex::new(&pattern)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            rules,
            item_arg_pattern: Regex::new(r"^(?P<key>[a-zA-Z_]*)=(?P<value>[^,]*)")?,
        })
    }

    /// Kind of the first rule matching `line`, without extracting fields
    pub fn kind_of(&self, line: &str) -> Option<LineKind> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(line))
            .map(|rule| rule.kind)
    }

    /// Classify a line and extract its fields
    pub fn classify(&self, line: &str) -> ProfileLine {
        if line.trim().is_empty() {
            return ProfileLine::Blank;
        }

        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(line) {
                return self.extract(rule.kind, &caps);
            }
        }

        ProfileLine::Unrecognized
    }

    fn extract(&self, kind: LineKind, caps: &Captures<'_>) -> ProfileLine {
        let value = || caps.name("value").map_or("", |m| m.as_str()).to_string();

        match kind {
            LineKind::CommentedItem | LineKind::ActiveItem => {
                // The alternation only admits known tokens
                let Ok(slot) = caps["slot"].parse::<Slot>() else {
                    return ProfileLine::Unrecognized;
                };
                let mut item = ItemLine {
                    slot,
                    equipped: kind == LineKind::ActiveItem,
                    id: 0,
                    bonus_ids: Vec::new(),
                };
                self.apply_item_args(&mut item, &caps["args"]);
                ProfileLine::Item(item)
            }
            LineKind::Comment => ProfileLine::Comment,
            LineKind::ClassName => {
                let (class, name) = match caps.name("kw_class") {
                    Some(class) => (class.as_str(), &caps["kw_name"]),
                    None => (&caps["class"], &caps["name"]),
                };
                ProfileLine::ClassName {
                    class: class.to_string(),
                    name: unquote(name).to_string(),
                }
            }
            LineKind::Level => ProfileLine::Level(value()),
            LineKind::Spec => ProfileLine::Spec(value()),
            LineKind::Race => ProfileLine::Race(value()),
            LineKind::Region => ProfileLine::Region(value()),
            LineKind::Server => ProfileLine::Server(value()),
            LineKind::Role => ProfileLine::Role,
            LineKind::Professions => ProfileLine::Professions(value()),
            LineKind::Talents => ProfileLine::Talents(parse_talents(&value())),
            LineKind::Artifact => ProfileLine::Artifact(parse_artifact(&value())),
            LineKind::Crucible => ProfileLine::Crucible(parse_crucible(&value())),
        }
    }

    /// Apply `key=value` arguments of an item line; unknown keys are ignored
    fn apply_item_args(&self, item: &mut ItemLine, args: &str) {
        for arg in args.split(',') {
            if arg.is_empty() {
                continue;
            }

            let Some(caps) = self.item_arg_pattern.captures(arg) else {
                tracing::debug!("Ignoring item argument without a key: {:?}", arg);
                continue;
            };

            match &caps["key"] {
                "id" => item.id = parse_or_zero(&caps["value"], "item id"),
                "bonus_id" => {
                    item.bonus_ids = caps["value"]
                        .split('/')
                        .map(|b| parse_or_zero(b, "bonus id"))
                        .collect();
                }
                _ => {}
            }
        }
    }
}

/// Parse a numeric fragment, degrading to 0 when it is malformed
fn parse_or_zero(fragment: &str, field: &str) -> u32 {
    fragment.parse().unwrap_or_else(|_| {
        tracing::warn!("Malformed {} {:?}, using 0", field, fragment);
        0
    })
}

/// Strip one pair of surrounding double quotes
fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_talents(value: &str) -> Vec<u8> {
    value
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

/// Colon-separated values consumed pairwise; a trailing unpaired value is dropped
fn parse_artifact(value: &str) -> Vec<TraitRank> {
    let values: Vec<&str> = value.split(':').collect();
    values
        .chunks_exact(2)
        .map(|pair| {
            TraitRank::new(
                parse_or_zero(pair[0], "artifact trait"),
                parse_or_zero(pair[1], "artifact rank"),
            )
        })
        .collect()
}

/// Slash-separated `id:rank` tokens; malformed tokens are skipped
fn parse_crucible(value: &str) -> Vec<TraitRank> {
    value
        .split('/')
        .filter_map(|token| {
            let parts: Vec<&str> = token.split(':').collect();
            if parts.len() != 2 {
                tracing::debug!("Skipping malformed crucible token {:?}", token);
                return None;
            }
            Some(TraitRank::new(
                parse_or_zero(parts[0], "crucible trait"),
                parse_or_zero(parts[1], "crucible rank"),
            ))
        })
        .collect()
}
