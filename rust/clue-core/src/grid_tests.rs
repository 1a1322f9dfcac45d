use crate::{CardId, ContradictionError, HolderId, KnowledgeGrid, Rule, Status};

const A: CardId = CardId(0);
const B: CardId = CardId(1);
const P0: HolderId = HolderId(0);
const P1: HolderId = HolderId(1);

#[test]
fn new_grid_is_all_maybe() {
    let g = KnowledgeGrid::new(4, 3);
    assert!(g.cells().iter().all(|&s| s == Status::Maybe));
    assert_eq!(g.maybe_count(P0), 4);
    assert_eq!(g.yes_count(P0), 0);
    assert_eq!(g.owner(A), None);
}

#[test]
fn set_is_idempotent_and_updates_caches() {
    let mut g = KnowledgeGrid::new(4, 3);
    assert!(g.set_status(A, P0, Status::Yes, Rule::Given).unwrap());
    assert!(!g.set_status(A, P0, Status::Yes, Rule::Given).unwrap());
    assert_eq!(g.status(A, P0), Status::Yes);
    assert_eq!(g.owner(A), Some(P0));
    assert!(g.known_cards(P0).contains(&A));
    assert_eq!(g.yes_count(P0), 1);
    assert_eq!(g.maybe_count(P0), 3);

    assert!(g.set_status(B, P0, Status::No, Rule::Given).unwrap());
    assert_eq!(g.maybe_count(P0), 2);
    assert_eq!(g.yes_count(P0), 1);
}

#[test]
fn certain_cells_never_change() {
    let mut g = KnowledgeGrid::new(4, 3);
    g.set_status(A, P1, Status::No, Rule::Given).unwrap();
    let before = g.clone();

    let err = g.set_status(A, P1, Status::Yes, Rule::Disjunction).unwrap_err();
    assert_eq!(
        err,
        ContradictionError::Conflict {
            card: A,
            holder: P1,
            current: Status::No,
            requested: Status::Yes,
            rule: Rule::Disjunction,
        }
    );
    // Reverting to Maybe is a regression too.
    assert!(g.set_status(A, P1, Status::Maybe, Rule::Given).is_err());
    assert_eq!(g, before);
}

#[test]
fn second_yes_holder_is_rejected() {
    let mut g = KnowledgeGrid::new(4, 3);
    g.set_status(A, P0, Status::Yes, Rule::Given).unwrap();
    let err = g.set_status(A, P1, Status::Yes, Rule::Given).unwrap_err();
    assert_eq!(
        err,
        ContradictionError::AlreadyHeld {
            card: A,
            holder: P1,
            owner: P0,
            rule: Rule::Given,
        }
    );
    assert_eq!(g.status(A, P1), Status::Maybe);
}

#[test]
fn rows_and_columns_are_views_of_the_same_cells() {
    let mut g = KnowledgeGrid::new(3, 3);
    g.set_status(B, P1, Status::Yes, Rule::Given).unwrap();
    g.set_status(B, P0, Status::No, Rule::Given).unwrap();
    assert_eq!(g.row(B), &[Status::No, Status::Yes, Status::Maybe]);
    let col = g.holder_column(P1);
    assert_eq!(col[1], (B, Status::Yes));
    assert_eq!(g.maybe_cards(P1).collect::<Vec<_>>(), vec![A, CardId(2)]);
}

#[test]
fn from_cells_rebuilds_caches() {
    let mut g = KnowledgeGrid::new(3, 2);
    g.set_status(A, P0, Status::Yes, Rule::Given).unwrap();
    g.set_status(A, P1, Status::No, Rule::Given).unwrap();
    g.set_status(CardId(2), P1, Status::Yes, Rule::Given).unwrap();

    let rebuilt = KnowledgeGrid::from_cells(3, 2, g.cells()).unwrap();
    assert_eq!(rebuilt, g);

    let doubled = [Status::Yes, Status::Yes, Status::Maybe, Status::Maybe, Status::Maybe, Status::Maybe];
    assert!(matches!(
        KnowledgeGrid::from_cells(3, 2, &doubled),
        Err(ContradictionError::AlreadyHeld { .. })
    ));
}
