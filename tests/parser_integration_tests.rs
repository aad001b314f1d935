//! Integration tests for ProfileParser
//!
//! These tests verify:
//! - Parsing a complete profile export
//! - Equipped flag for commented and uncommented gear lines
//! - Replace-not-merge behavior of repeated lines
//! - Fatal vs recoverable parse failures

use gearsheet::models::{GameData, Slot, TraitRank};
use gearsheet::services::ParseError;
use gearsheet::{ConfigManager, ProfileParser};
use camino::Utf8PathBuf;
use proptest::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn repo_path(relative: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn shipped_parser() -> ProfileParser {
    let data = ConfigManager::new(repo_path("data")).load_game_data().unwrap();
    ProfileParser::new(&data).unwrap()
}

#[test]
fn test_round_trip_scenario() {
    let parser = ProfileParser::new(&GameData::default()).unwrap();
    let text = "class=\"druid\" name=\"Bear\"\nlevel=110\nhead=,id=12345,bonus_id=1/2\n";

    let character = parser.parse(text).unwrap();

    assert_eq!(character.class, "druid");
    assert_eq!(character.name, "Bear");
    assert_eq!(character.level, 110);
    assert_eq!(character.items.len(), 1);
    assert_eq!(character.items[0].id, 12345);
    assert_eq!(character.items[0].slot, Slot::Head);
    assert_eq!(character.items[0].bonus_ids, vec![1, 2]);
    assert!(character.items[0].equipped);
}

#[test]
fn test_parse_shipped_profile() {
    let parser = shipped_parser();
    let character = parser
        .parse_file(&repo_path("profiles/restoration_druid.simc"))
        .unwrap();

    assert_eq!(character.class, "druid");
    assert_eq!(character.name, "Savedyabear");
    assert_eq!(character.level, 110);
    assert_eq!(character.race, "night_elf");
    assert_eq!(character.region, "us");
    assert_eq!(character.server, "stormrage");
    assert_eq!(character.spec, "restoration");
    assert_eq!(character.professions, "herbalism=800/alchemy=800");
    assert_eq!(character.talents, vec![3, 1, 2, 3, 2, 1, 1]);

    // 19 values: the trailing unpaired one is dropped
    assert_eq!(character.artifact.len(), 9);
    assert_eq!(character.artifact[0], TraitRank::new(59, 0));

    // "155851:1:1" has three parts and is skipped
    assert_eq!(
        character.crucible,
        vec![TraitRank::new(155849, 1), TraitRank::new(155846, 1)]
    );

    assert_eq!(character.items.len(), 17);
    assert_eq!(character.equipped_items().count(), 15);

    // Items keep profile order
    assert_eq!(character.items[0].slot, Slot::Trinket1);
    assert!(!character.items[0].equipped);
    assert_eq!(character.items[16].slot, Slot::MainHand);
    assert!(character.items.iter().all(|i| i.details.is_empty()));
}

#[test]
fn test_equipped_iff_not_commented() {
    let parser = shipped_parser();
    let text = "\
legs=,id=1
#legs=,id=2
  # legs=,id=3
###legs=,id=4
";
    let character = parser.parse(text).unwrap();

    let flags: Vec<bool> = character.items.iter().map(|i| i.equipped).collect();
    assert_eq!(flags, vec![true, false, false, false]);
}

#[test]
fn test_repeated_talents_keep_last() {
    let parser = shipped_parser();
    let character = parser
        .parse("talents=1111111\nlevel=110\ntalents=3213\n")
        .unwrap();

    assert_eq!(character.talents, vec![3, 2, 1, 3]);
}

#[test]
fn test_odd_artifact_and_bad_crucible() {
    let parser = shipped_parser();
    let character = parser
        .parse("artifact=1:2:3\ncrucible=1:2/bad/3:4\n")
        .unwrap();

    assert_eq!(character.artifact, vec![TraitRank::new(1, 2)]);
    assert_eq!(
        character.crucible,
        vec![TraitRank::new(1, 2), TraitRank::new(3, 4)]
    );
}

#[test]
fn test_malformed_level_aborts() {
    let parser = shipped_parser();
    let result = parser.parse("druid=Bear\nlevel=\nhead=,id=1\n");

    assert!(matches!(result, Err(ParseError::InvalidLevel { line: 2, .. })));
}

#[test]
fn test_unreadable_profile_is_an_error() {
    let parser = shipped_parser();
    let result = parser.parse_file(&repo_path("profiles/does_not_exist.simc"));

    assert!(result.is_err());
}

#[test]
fn test_parse_file_from_disk() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "monk=\"Chi Walker\"").unwrap();
    writeln!(temp_file, "level=110").unwrap();
    writeln!(temp_file, "flask=seventh_demon").unwrap();
    writeln!(temp_file, "wrist=,id=137097,bonus_id=1811/3630").unwrap();
    temp_file.flush().unwrap();

    let path = Utf8PathBuf::try_from(temp_file.path().to_path_buf()).unwrap();
    let character = shipped_parser().parse_file(&path).unwrap();

    assert_eq!(character.class, "monk");
    assert_eq!(character.name, "Chi Walker");
    assert_eq!(character.items[0].bonus_ids, vec![1811, 3630]);
}

#[test]
fn test_class_set_comes_from_game_data() {
    let data = GameData {
        classes: vec!["evoker".to_string()],
        ..GameData::default()
    };
    let parser = ProfileParser::new(&data).unwrap();

    let character = parser.parse("evoker=Scales\ndruid=Bear\n").unwrap();

    assert_eq!(character.class, "evoker");
    assert_eq!(character.name, "Scales");
}

proptest! {
    #[test]
    fn prop_artifact_pairs_are_half_the_values(values in prop::collection::vec(0u32..200_000, 0..40)) {
        let parser = ProfileParser::new(&GameData::default()).unwrap();
        let line = format!(
            "artifact={}",
            values.iter().map(u32::to_string).collect::<Vec<_>>().join(":")
        );

        let character = parser.parse(&line).unwrap();

        prop_assert_eq!(character.artifact.len(), values.len() / 2);
        for (pair, chunk) in character.artifact.iter().zip(values.chunks_exact(2)) {
            prop_assert_eq!(*pair, TraitRank::new(chunk[0], chunk[1]));
        }
    }

    #[test]
    fn prop_talents_preserve_digit_order(digits in prop::collection::vec(0u8..=3, 0..10)) {
        let parser = ProfileParser::new(&GameData::default()).unwrap();
        let line = format!(
            "talents={}",
            digits.iter().map(u8::to_string).collect::<String>()
        );

        let character = parser.parse(&line).unwrap();

        prop_assert_eq!(character.talents, digits);
    }

    #[test]
    fn prop_item_count_matches_gear_lines(commented in prop::collection::vec(any::<bool>(), 0..16)) {
        let parser = ProfileParser::new(&GameData::default()).unwrap();
        let text = commented
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}chest=,id={}", if *c { "# " } else { "" }, i + 1))
            .collect::<Vec<_>>()
            .join("\n");

        let character = parser.parse(&text).unwrap();

        prop_assert_eq!(character.items.len(), commented.len());
        for (item, c) in character.items.iter().zip(&commented) {
            prop_assert_eq!(item.equipped, !*c);
        }
    }
}
