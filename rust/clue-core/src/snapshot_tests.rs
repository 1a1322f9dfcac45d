use crate::sim::Table;
use crate::snapshot::SNAPSHOT_VERSION;
use crate::{
    ClueError, ClueGame, ConfigurationError, ContradictionError, Event, KnowledgeSnapshot, Status,
    VariantConfig,
};

fn played_game() -> ClueGame {
    let mut game = ClueGame::standard(
        &["Me", "Bob", "Alice"],
        &["Candlestick", "Kitchen", "Colonel Mustard"],
    )
    .unwrap();
    game.apply(&Event::Suggestion {
        suggester: "Me".into(),
        cards: vec!["Dagger".into(), "Library".into(), "Mrs. Peacock".into()],
        passers: vec!["Bob".into()],
        shower: Some("Alice".into()),
        shown: None,
    })
    .unwrap();
    game.apply(&Event::Reveal {
        holder: "Bob".into(),
        card: "Rope".into(),
    })
    .unwrap();
    game
}

#[test]
fn snapshot_round_trips_through_yaml() {
    let game = played_game();
    let snapshot = game.snapshot();
    assert_eq!(snapshot.snapshot_version, SNAPSHOT_VERSION);
    assert_eq!(snapshot.players, vec!["Me", "Bob", "Alice"]);
    assert_eq!(snapshot.rows.len(), 21);
    assert_eq!(snapshot.disjunctions.len(), 1);
    assert_eq!(snapshot.disjunctions[0].holder, "Alice");

    let yaml = serde_yaml::to_string(&snapshot).unwrap();
    let parsed: KnowledgeSnapshot = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, snapshot);

    let restored = ClueGame::from_snapshot(&VariantConfig::default(), &parsed).unwrap();
    assert_eq!(restored, game);
}

#[test]
fn restored_game_keeps_deducing() {
    let game = played_game();
    let mut restored = ClueGame::from_snapshot(&VariantConfig::default(), &game.snapshot()).unwrap();
    for card in ["Dagger", "Library"] {
        restored
            .apply(&Event::Reveal {
                holder: "Solution".into(),
                card: card.into(),
            })
            .unwrap();
    }
    assert_eq!(
        restored.status_by_name("Mrs. Peacock", "Alice").unwrap(),
        Status::Yes
    );
}

#[test]
fn simulated_games_round_trip() {
    for seed in 0..8u64 {
        let mut table = Table::new(3 + seed as usize % 4, seed).unwrap();
        let mut game = table.game().unwrap();
        for fact in table.random_facts(20) {
            game.record(&fact).unwrap();
        }
        let restored =
            ClueGame::from_snapshot(&VariantConfig::default(), &game.snapshot()).unwrap();
        assert_eq!(restored, game, "seed {seed}");
    }
}

#[test]
fn contradictory_snapshot_is_rejected() {
    let mut snapshot = played_game().snapshot();
    // Rope is Bob's; claim the solution has it too.
    let rope = snapshot
        .rows
        .iter_mut()
        .find(|r| r.card == "Rope")
        .unwrap();
    rope.statuses[3] = Status::Yes;
    let err = ClueGame::from_snapshot(&VariantConfig::default(), &snapshot).unwrap_err();
    assert!(matches!(
        err,
        ClueError::Contradiction(ContradictionError::AlreadyHeld { .. })
    ));
}

#[test]
fn restored_hand_must_agree_with_the_grid() {
    // Rope is Bob's, so it cannot also be in the local hand.
    let mut snapshot = played_game().snapshot();
    snapshot.my_hand = vec!["Rope".into(), "Hall".into()];
    let err = ClueGame::from_snapshot(&VariantConfig::default(), &snapshot).unwrap_err();
    assert!(matches!(
        err,
        ClueError::Contradiction(ContradictionError::Conflict {
            current: Status::No,
            requested: Status::Yes,
            ..
        })
    ));

    // An undetermined hand card is restored as held.
    let mut snapshot = played_game().snapshot();
    snapshot.my_hand.push("Hall".into());
    let restored = ClueGame::from_snapshot(&VariantConfig::default(), &snapshot).unwrap();
    assert_eq!(restored.status_by_name("Hall", "Me").unwrap(), Status::Yes);
    assert_eq!(restored.status_by_name("Hall", "Bob").unwrap(), Status::No);
    assert_eq!(restored.my_hand().len(), 4);

    let mut snapshot = played_game().snapshot();
    snapshot.my_hand = [
        "Miss Scarlett",
        "Colonel Mustard",
        "Candlestick",
        "Dagger",
        "Hall",
        "Study",
        "Kitchen",
    ]
    .map(String::from)
    .to_vec();
    assert_eq!(
        ClueGame::from_snapshot(&VariantConfig::default(), &snapshot).unwrap_err(),
        ClueError::Configuration(ConfigurationError::HandTooLarge {
            declared: 7,
            allowed: 6
        })
    );
}

#[test]
fn unknown_snapshot_version_is_rejected() {
    let mut snapshot = played_game().snapshot();
    snapshot.snapshot_version = SNAPSHOT_VERSION + 1;
    assert_eq!(
        ClueGame::from_snapshot(&VariantConfig::default(), &snapshot).unwrap_err(),
        ClueError::Configuration(ConfigurationError::SnapshotVersion {
            got: SNAPSHOT_VERSION + 1,
            expected: SNAPSHOT_VERSION,
        })
    );
}

#[test]
fn snapshot_must_match_the_variant() {
    let mut snapshot = played_game().snapshot();
    snapshot.hand_sizes = vec![6, 6, 5, 4];
    assert!(matches!(
        ClueGame::from_snapshot(&VariantConfig::default(), &snapshot),
        Err(ClueError::Configuration(ConfigurationError::HandSizeMismatch { .. }))
    ));

    let mut snapshot = played_game().snapshot();
    snapshot.rows.pop();
    assert!(matches!(
        ClueGame::from_snapshot(&VariantConfig::default(), &snapshot),
        Err(ClueError::Configuration(ConfigurationError::GridShape { .. }))
    ));
}
