use std::collections::BTreeSet;
use std::thread;

use crate::{
    CardId, Catalog, Category, ClueError, ClueGame, ConfigurationError, ContradictionError, Event,
    Fact, GameSetup, HandSizes, HolderId, Holders, InvalidFactError, Rule, SharedGame, Shower,
    Status, Suggestion, VariantConfig,
};

const ME: HolderId = HolderId(0);
const BOB: HolderId = HolderId(1);
const ALICE: HolderId = HolderId(2);

fn game() -> ClueGame {
    ClueGame::standard(
        &["Me", "Bob", "Alice"],
        &["Candlestick", "Kitchen", "Colonel Mustard"],
    )
    .unwrap()
}

fn status(game: &ClueGame, card: &str, holder: &str) -> Status {
    game.status_by_name(card, holder).unwrap()
}

fn suggestion_event(
    suggester: &str,
    cards: [&str; 3],
    passers: &[&str],
    shower: Option<&str>,
    shown: Option<&str>,
) -> Event {
    Event::Suggestion {
        suggester: suggester.to_string(),
        cards: cards.iter().map(|c| c.to_string()).collect(),
        passers: passers.iter().map(|p| p.to_string()).collect(),
        shower: shower.map(str::to_string),
        shown: shown.map(str::to_string),
    }
}

fn reveal(holder: &str, card: &str) -> Event {
    Event::Reveal {
        holder: holder.to_string(),
        card: card.to_string(),
    }
}

/// Me suggests; Bob passes and Alice shows an unseen card.
fn alice_shows(game: &mut ClueGame) {
    game.apply(&suggestion_event(
        "Me",
        ["Dagger", "Library", "Mrs. Peacock"],
        &["Bob"],
        Some("Alice"),
        None,
    ))
    .unwrap();
}

#[test]
fn construction_seeds_the_local_hand() {
    let g = game();
    assert_eq!(status(&g, "Candlestick", "Me"), Status::Yes);
    assert_eq!(status(&g, "Candlestick", "Bob"), Status::No);
    assert_eq!(status(&g, "Candlestick", "Alice"), Status::No);
    assert_eq!(status(&g, "Candlestick", "Solution"), Status::No);
    assert_eq!(status(&g, "Dagger", "Me"), Status::Maybe);
    assert_eq!(g.my_hand().len(), 3);
    assert_eq!(g.hand_size(ME), 6);
    assert_eq!(g.hand_size(g.holders().solution()), 3);
    assert!(!g.is_solved());
}

#[test]
fn passers_are_ruled_out_and_the_shower_gets_a_disjunction() {
    let mut g = game();
    alice_shows(&mut g);

    for card in ["Dagger", "Library", "Mrs. Peacock"] {
        assert_eq!(status(&g, card, "Bob"), Status::No);
        assert_eq!(status(&g, card, "Alice"), Status::Maybe);
    }
    let pending: Vec<_> = g.pending_disjunctions().collect();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].holder, ALICE);
    let expected: BTreeSet<_> = ["Dagger", "Library", "Mrs. Peacock"]
        .iter()
        .map(|c| g.card(c).unwrap())
        .collect();
    assert_eq!(pending[0].candidates, expected);
}

#[test]
fn contradicting_reveal_is_rejected_and_rolled_back() {
    let mut g = game();
    alice_shows(&mut g);
    let before = g.clone();

    let err = g.apply(&reveal("Bob", "Dagger")).unwrap_err();
    let dagger = g.card("Dagger").unwrap();
    assert_eq!(
        err,
        ClueError::Contradiction(ContradictionError::Conflict {
            card: dagger,
            holder: BOB,
            current: Status::No,
            requested: Status::Yes,
            rule: Rule::Given,
        })
    );
    assert_eq!(g, before);

    let text = g.describe(&err);
    assert!(text.contains("Dagger"), "{text}");
    assert!(text.contains("Bob"), "{text}");
}

#[test]
fn disjunction_resolves_once_other_candidates_are_ruled_out() {
    let mut g = game();
    alice_shows(&mut g);

    g.apply(&reveal("Solution", "Dagger")).unwrap();
    assert_eq!(status(&g, "Mrs. Peacock", "Alice"), Status::Maybe);
    let report = g.apply(&reveal("Solution", "Library")).unwrap();

    assert_eq!(status(&g, "Mrs. Peacock", "Alice"), Status::Yes);
    let peacock = g.card("Mrs. Peacock").unwrap();
    assert!(report
        .inferred()
        .any(|d| d.card == peacock && d.holder == ALICE && d.rule == Rule::Disjunction));
    assert_eq!(g.pending_disjunctions().count(), 0);
}

#[test]
fn solution_is_reported_once_every_category_is_known() {
    let mut g = game();
    g.apply(&reveal("Solution", "Professor Plum")).unwrap();
    g.apply(&reveal("Solution", "Rope")).unwrap();
    assert_eq!(g.solution(), None);
    assert_eq!(g.solution_card(Category::Weapon), g.card("Rope").ok());

    // The last room falls out of row exhaustion.
    for holder in [ME, BOB, ALICE] {
        g.record_no_card(holder, g.card("Study").unwrap()).unwrap();
    }
    let expected = ["Professor Plum", "Rope", "Study"]
        .map(|c| g.card(c).unwrap())
        .to_vec();
    assert_eq!(g.solution(), Some(expected));
    assert!(g.is_solved());
}

#[test]
fn all_passed_rules_out_everyone_but_the_suggester() {
    let mut g = game();
    g.apply(&Event::AllPassed {
        suggester: "Bob".to_string(),
        cards: vec!["Mr. Green".into(), "Wrench".into(), "Lounge".into()],
    })
    .unwrap();
    for card in ["Mr. Green", "Wrench", "Lounge"] {
        assert_eq!(status(&g, card, "Me"), Status::No);
        assert_eq!(status(&g, card, "Alice"), Status::No);
        assert_eq!(status(&g, card, "Bob"), Status::Maybe);
        assert_eq!(status(&g, card, "Solution"), Status::Maybe);
    }
}

#[test]
fn shown_card_is_a_direct_reveal() {
    let mut g = game();
    let (green, rope, hall) = (
        g.card("Mr. Green").unwrap(),
        g.card("Rope").unwrap(),
        g.card("Hall").unwrap(),
    );
    let report = g
        .record_suggestion(&Suggestion {
            suggester: ME,
            cards: vec![green, rope, hall],
            passers: vec![],
            shower: Some(Shower {
                player: BOB,
                shown: Some(rope),
            }),
        })
        .unwrap();
    assert_eq!(g.status(rope, BOB), Status::Yes);
    assert_eq!(g.status(rope, ALICE), Status::No);
    assert_eq!(g.pending_disjunctions().count(), 0);
    assert_eq!(report.derivations[0].rule, Rule::Given);
}

#[test]
fn malformed_suggestions_are_rejected_without_changes() {
    let mut g = game();
    let before = g.clone();
    let cases = [
        (
            suggestion_event("Me", ["Dagger", "Library", "Rope"], &[], None, None),
            InvalidFactError::SuggestionCategory(Category::Suspect),
        ),
        (
            suggestion_event("Me", ["Mr. Green", "Rope", "Hall"], &["Me"], None, None),
            InvalidFactError::SuggesterResponded,
        ),
        (
            suggestion_event("Me", ["Mr. Green", "Rope", "Hall"], &["Bob"], Some("Bob"), None),
            InvalidFactError::ShowerAlsoPassed(BOB),
        ),
        (
            suggestion_event("Me", ["Mr. Green", "Rope", "Hall"], &["Bob", "Bob"], None, None),
            InvalidFactError::DuplicatePasser(BOB),
        ),
        (
            suggestion_event("Me", ["Mr. Green", "Rope", "Hall"], &[], Some("Bob"), Some("Study")),
            InvalidFactError::ShownCardNotSuggested(g.card("Study").unwrap()),
        ),
        (
            suggestion_event("Me", ["Mr. Green", "Rope", "Hall"], &[], None, Some("Rope")),
            InvalidFactError::ShownWithoutShower,
        ),
        (
            suggestion_event("Solution", ["Mr. Green", "Rope", "Hall"], &[], None, None),
            InvalidFactError::SolutionIsNotAPlayer,
        ),
        (
            suggestion_event("Me", ["Mr. Green", "Rope", "Attic"], &[], None, None),
            InvalidFactError::UnknownCard("Attic".to_string()),
        ),
        (
            reveal("Carol", "Rope"),
            InvalidFactError::UnknownHolder("Carol".to_string()),
        ),
    ];
    for (event, expected) in cases {
        assert_eq!(g.apply(&event), Err(ClueError::InvalidFact(expected)));
    }

    let short = Suggestion {
        suggester: ME,
        cards: vec![g.card("Rope").unwrap()],
        passers: vec![],
        shower: None,
    };
    assert_eq!(
        g.record(&Fact::Suggestion(short)),
        Err(ClueError::InvalidFact(InvalidFactError::SuggestionSize {
            got: 1,
            expected: 3
        }))
    );
    assert_eq!(g, before);
}

#[test]
fn names_resolve_case_insensitively() {
    let mut g = game();
    g.apply(&reveal("bob", "lead pipe")).unwrap();
    assert_eq!(status(&g, "Lead Pipe", "Bob"), Status::Yes);
    assert_eq!(g.holder("SOLUTION").unwrap(), g.holders().solution());
}

#[test]
fn bad_setups_are_configuration_errors() {
    assert_eq!(
        ClueGame::standard(&["Me", "Bob"], &["Nope"]).unwrap_err(),
        ClueError::Configuration(ConfigurationError::UnknownHandCard("Nope".to_string()))
    );
    let seven = [
        "Miss Scarlett",
        "Colonel Mustard",
        "Rope",
        "Dagger",
        "Hall",
        "Study",
        "Kitchen",
    ];
    assert_eq!(
        ClueGame::standard(&["Me", "Bob", "Alice"], &seven).unwrap_err(),
        ClueError::Configuration(ConfigurationError::HandTooLarge {
            declared: 7,
            allowed: 6
        })
    );
    assert_eq!(
        ClueGame::standard(&["Me", "solution"], &["Rope"]).unwrap_err(),
        ClueError::Configuration(ConfigurationError::ReservedPlayerName(
            "solution".to_string()
        ))
    );
    assert_eq!(
        ClueGame::standard(&["Me", "Bob", "bob"], &["Rope"]).unwrap_err(),
        ClueError::Configuration(ConfigurationError::DuplicatePlayer("bob".to_string()))
    );
}

#[test]
fn setup_with_mismatched_hand_sizes_is_rejected() {
    let catalog = Catalog::standard();
    let holders = Holders::new(&["Me", "Bob", "Alice"]).unwrap();
    // Sized for two players, seated with three.
    let hand_sizes = HandSizes::compute(2, &catalog, 0).unwrap();
    let setup = GameSetup {
        catalog,
        holders,
        hand_sizes,
    };
    assert_eq!(
        ClueGame::from_parts(setup, &[CardId(0)]).unwrap_err(),
        ClueError::Configuration(ConfigurationError::HandSizeMismatch {
            sizes: vec![9, 9, 3],
            cards: 21,
            holders: 4,
        })
    );
}

#[test]
#[should_panic]
fn status_of_a_card_outside_the_catalog_panics() {
    game().status(CardId(200), ME);
}

#[test]
fn leftover_cards_follow_the_configured_seat() {
    let config = VariantConfig {
        extra_cards_from_seat: 2,
        ..VariantConfig::default()
    };
    let g = ClueGame::new(&config, &["Me", "Bob", "Alice", "Carol"], &["Rope"]).unwrap();
    assert_eq!(g.hand_sizes().as_slice(), &[4, 4, 5, 5, 3]);
}

#[test]
fn full_hand_completes_the_local_column() {
    let hand = [
        "Candlestick",
        "Kitchen",
        "Colonel Mustard",
        "Rope",
        "Hall",
        "Professor Plum",
    ];
    let g = ClueGame::standard(&["Me", "Bob", "Alice"], &hand).unwrap();
    assert!(g.undetermined_categories(ME).is_empty());
    assert!(!g.incomplete_holders().contains(&ME));
    assert_eq!(g.known_cards(ME).len(), 6);
    assert_eq!(g.undetermined_categories(BOB), Category::ALL.to_vec());
    assert!(g
        .holder_column(ME)
        .iter()
        .all(|&(_, s)| s.is_certain()));
}

#[test]
fn events_parse_from_yaml() {
    let yaml = r#"
- kind: suggestion
  suggester: Me
  cards: [Dagger, Library, Mrs. Peacock]
  passers: [Bob]
  shower: Alice
- kind: no_card
  holder: Alice
  card: Rope
- kind: all_passed
  suggester: Alice
  cards: [Mr. Green, Wrench, Lounge]
"#;
    let events: Vec<Event> = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(
        events[0],
        suggestion_event(
            "Me",
            ["Dagger", "Library", "Mrs. Peacock"],
            &["Bob"],
            Some("Alice"),
            None
        )
    );
    let mut g = game();
    for event in &events {
        g.apply(event).unwrap();
    }
    assert_eq!(status(&g, "Rope", "Alice"), Status::No);
    assert_eq!(status(&g, "Wrench", "Bob"), Status::No);
}

#[test]
fn grid_rendering_lists_every_card_and_holder() {
    let g = game();
    let text = g.render_grid();
    let lines: Vec<&str> = text.lines().collect();
    // Header, one separator per category, one row per card.
    assert_eq!(lines.len(), 1 + 3 + 21);
    for name in ["Card", "Me", "Bob", "Alice", "Solution"] {
        assert!(lines[0].contains(name), "{}", lines[0]);
    }
    let candlestick = lines
        .iter()
        .find(|l| l.starts_with("Candlestick"))
        .unwrap();
    assert_eq!(candlestick.matches('Y').count(), 1);
    assert_eq!(candlestick.matches('N').count(), 3);
}

#[test]
fn shared_game_serializes_writers() {
    let shared = SharedGame::new(game());
    let handles: Vec<_> = [("Bob", "Rope"), ("Alice", "Hall"), ("Bob", "Dagger")]
        .into_iter()
        .map(|(holder, card)| {
            let shared = shared.clone();
            thread::spawn(move || shared.apply(&reveal(holder, card)).map(|_| ()))
        })
        .collect();
    for h in handles {
        h.join().unwrap().unwrap();
    }

    let bob = shared.read(|g| g.known_cards(BOB).len()).unwrap();
    assert_eq!(bob, 2);
    let g = shared.to_game().unwrap();
    assert_eq!(status(&g, "Hall", "Alice"), Status::Yes);
    assert_eq!(status(&g, "Hall", "Solution"), Status::No);
}
