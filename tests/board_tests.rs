use contact_tracker::common::DomainError;
use contact_tracker::domains::tracking::*;

fn board() -> BoardState {
    BoardState::new(Grid::default())
}

fn contacts(board: &BoardState, identity: &str) -> Vec<String> {
    board.get_contacts(identity).unwrap()
}

#[test]
fn test_grid_rejects_empty_dimensions() {
    assert!(Grid::new(0, 5).is_err());
    assert!(Grid::new(5, 0).is_err());

    let grid = Grid::new(3, 2).unwrap();
    assert!(grid.contains(2, 1));
    assert!(!grid.contains(3, 1));
    assert!(!grid.contains(0, 2));
    assert!(!grid.contains(-1, 0));
}

#[test]
fn test_direction_tokens_are_case_insensitive() {
    assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
    assert_eq!("Left".parse::<Direction>().unwrap(), Direction::Left);
    assert!(matches!(
        "north".parse::<Direction>(),
        Err(DomainError::Validation { .. })
    ));
}

#[test]
fn test_create_person_registers_agent() {
    let mut board = board();
    board.create_person("Alice", 1, 2).unwrap();

    let alice = board.agent("Alice").unwrap();
    assert_eq!(alice.cell, Cell { x: 1, y: 2 });
    assert!(!alice.infected);
    assert!(contacts(&board, "Alice").is_empty());
    assert_eq!(board.len(), 1);
}

#[test]
fn test_create_person_out_of_bounds() {
    let mut board = board();

    for (x, y) in [(-1, 0), (0, -1), (10, 0), (0, 10)] {
        let err = board.create_person("Alice", x, y).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }), "({}, {})", x, y);
    }
    assert!(board.is_empty());
    assert!(board.uncommitted_events().is_empty());
}

#[test]
fn test_empty_identity_is_rejected() {
    let mut board = board();
    let err = board.create_person("", 0, 0).unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[test]
fn test_duplicate_create_leaves_agent_untouched() {
    let mut board = board();
    board.create_person("Alice", 1, 1).unwrap();
    board.create_person("Bob", 1, 1).unwrap();
    let before = board.snapshot();

    let err = board.create_person("Alice", 5, 5).unwrap_err();
    assert_eq!(
        err,
        DomainError::Duplicate {
            identity: "Alice".to_string()
        }
    );
    assert_eq!(board.snapshot(), before);
    assert_eq!(board.agent("Alice").unwrap().cell, Cell { x: 1, y: 1 });
}

#[test]
fn test_identities_are_case_sensitive() {
    let mut board = board();
    board.create_person("alice", 0, 0).unwrap();
    board.create_person("Alice", 0, 0).unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(contacts(&board, "alice"), vec!["Alice"]);
}

#[test]
fn test_move_unknown_person() {
    let mut board = board();
    let err = board.move_person("Ghost", Direction::Up).unwrap_err();
    assert_eq!(
        err,
        DomainError::NotFound {
            identity: "Ghost".to_string()
        }
    );
}

#[test]
fn test_moves_follow_axes() {
    let mut board = board();
    board.create_person("Alice", 5, 5).unwrap();

    assert_eq!(board.move_person("Alice", Direction::Up).unwrap(), Cell { x: 5, y: 6 });
    assert_eq!(board.move_person("Alice", Direction::Right).unwrap(), Cell { x: 6, y: 6 });
    assert_eq!(board.move_person("Alice", Direction::Down).unwrap(), Cell { x: 6, y: 5 });
    assert_eq!(board.move_person("Alice", Direction::Left).unwrap(), Cell { x: 5, y: 5 });
}

#[test]
fn test_moves_clamp_at_every_edge() {
    let mut board = BoardState::new(Grid::new(4, 3).unwrap());
    board.create_person("BottomLeft", 0, 0).unwrap();
    board.create_person("TopRight", 3, 2).unwrap();

    assert_eq!(board.move_person("BottomLeft", Direction::Left).unwrap(), Cell { x: 0, y: 0 });
    assert_eq!(board.move_person("BottomLeft", Direction::Down).unwrap(), Cell { x: 0, y: 0 });
    assert_eq!(board.move_person("TopRight", Direction::Right).unwrap(), Cell { x: 3, y: 2 });
    assert_eq!(board.move_person("TopRight", Direction::Up).unwrap(), Cell { x: 3, y: 2 });
}

#[test]
fn test_contacts_are_symmetric() {
    let mut board = board();
    board.create_person("Alice", 2, 2).unwrap();
    board.create_person("Bob", 3, 2).unwrap();
    assert!(contacts(&board, "Alice").is_empty());

    board.move_person("Bob", Direction::Left).unwrap();
    assert_eq!(contacts(&board, "Alice"), vec!["Bob"]);
    assert_eq!(contacts(&board, "Bob"), vec!["Alice"]);
}

#[test]
fn test_contacts_survive_separation_and_are_not_duplicated() {
    let mut board = board();
    board.create_person("Alice", 2, 2).unwrap();
    board.create_person("Bob", 2, 2).unwrap();

    board.move_person("Bob", Direction::Up).unwrap();
    board.move_person("Bob", Direction::Down).unwrap();
    board.move_person("Alice", Direction::Left).unwrap();

    assert_eq!(contacts(&board, "Alice"), vec!["Bob"]);
    assert_eq!(contacts(&board, "Bob"), vec!["Alice"]);
}

#[test]
fn test_recompute_links_every_pair_in_a_crowded_cell() {
    let mut board = board();
    board.create_person("Alice", 4, 4).unwrap();
    board.create_person("Bob", 4, 4).unwrap();
    board.create_person("Carol", 5, 4).unwrap();

    // Alice and Bob are already linked when Carol arrives.
    board.move_person("Carol", Direction::Left).unwrap();

    for (me, others) in [
        ("Alice", ["Bob", "Carol"]),
        ("Bob", ["Alice", "Carol"]),
        ("Carol", ["Alice", "Bob"]),
    ] {
        let mine = contacts(&board, me);
        assert_eq!(mine.len(), 2, "{} has {:?}", me, mine);
        for other in others {
            assert!(mine.iter().any(|c| c == other), "{} is missing {}", me, other);
        }
    }
}

#[test]
fn test_legacy_mode_stops_at_first_known_pair() {
    let mut board = BoardState::with_mode(Grid::default(), RecomputeMode::LegacyEarlyReturn);
    board.create_person("Alice", 4, 4).unwrap();
    board.create_person("Bob", 4, 4).unwrap();
    board.create_person("Carol", 5, 4).unwrap();
    board.move_person("Carol", Direction::Left).unwrap();

    // The scan starts with Alice, finds Bob already linked and gives up.
    assert_eq!(contacts(&board, "Alice"), vec!["Bob"]);
    assert!(contacts(&board, "Carol").is_empty());
}

#[test]
fn test_contacts_are_most_recent_first() {
    let mut board = board();
    board.create_person("Alice", 1, 1).unwrap();
    board.create_person("Bob", 1, 1).unwrap();
    board.create_person("Carol", 3, 1).unwrap();

    board.move_person("Alice", Direction::Right).unwrap();
    board.move_person("Alice", Direction::Right).unwrap();

    assert_eq!(contacts(&board, "Alice"), vec!["Carol", "Bob"]);
    assert_eq!(contacts(&board, "Bob"), vec!["Alice"]);
    assert_eq!(contacts(&board, "Carol"), vec!["Alice"]);
}

#[test]
fn test_get_contacts_for_unknown_identity() {
    let board = board();
    assert!(matches!(
        board.get_contacts("Nobody"),
        Err(DomainError::NotFound { .. })
    ));
}

#[test]
fn test_infection_flag_is_fixed_at_creation() {
    let mut board = board();
    board.create_person_with_status("Patient", 0, 0, true).unwrap();
    board.create_person("Visitor", 1, 0).unwrap();
    board.move_person("Visitor", Direction::Left).unwrap();
    board.move_person("Patient", Direction::Up).unwrap();

    assert!(board.agent("Patient").unwrap().infected);
    assert!(!board.agent("Visitor").unwrap().infected);
    assert_eq!(contacts(&board, "Visitor"), vec!["Patient"]);
}

#[test]
fn test_snapshot_is_sorted_and_complete() {
    let mut board = board();
    board.create_person("Zoe", 0, 0).unwrap();
    board.create_person("Adam", 0, 0).unwrap();

    let snapshot = board.snapshot();
    assert_eq!((snapshot.width, snapshot.height), (10, 10));
    let names: Vec<&str> = snapshot.agents.iter().map(|a| a.identity.as_str()).collect();
    assert_eq!(names, vec!["Adam", "Zoe"]);
    assert_eq!(snapshot.occupants(Cell { x: 0, y: 0 }).count(), 2);
    assert_eq!(snapshot.agents[0].contacts, vec!["Zoe"]);
}

#[test]
fn test_mutations_record_events() {
    let mut board = board();
    board.create_person("Alice", 0, 0).unwrap();
    board.create_person("Bob", 0, 1).unwrap();
    board.take_events();

    board.move_person("Bob", Direction::Down).unwrap();
    let events = board.take_events();
    let kinds: Vec<&str> = events.iter().map(|e| e.event_type()).collect();
    assert_eq!(kinds, vec!["PersonMoved", "ContactRecorded", "ContactRecorded"]);
    assert!(events[0].occurred_at() <= events[1].occurred_at());
    assert_eq!(events[1].occurred_at(), events[2].occurred_at());

    match &events[0] {
        BoardEvent::PersonMoved { from, to, direction, .. } => {
            assert_eq!(*from, Cell { x: 0, y: 1 });
            assert_eq!(*to, Cell { x: 0, y: 0 });
            assert_eq!(*direction, Direction::Down);
        }
        other => panic!("Expected PersonMoved, got {:?}", other),
    }
    assert!(board.uncommitted_events().is_empty());
}

#[test]
fn test_agent_equality_is_by_identity() {
    let a = Agent {
        identity: "Alice".to_string(),
        cell: Cell { x: 0, y: 0 },
        infected: false,
    };
    let moved = Agent {
        cell: Cell { x: 9, y: 9 },
        ..a.clone()
    };
    assert_eq!(a, moved);
}

/// Small deterministic generator so the walk below is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn assert_contact_lists_consistent(board: &BoardState, names: &[&str], step: usize) {
    for me in names.iter().filter(|n| board.agent(n).is_some()) {
        let mine = contacts(board, me);
        assert!(!mine.iter().any(|c| c == me), "step {}: {} lists itself", step, me);

        let mut unique = mine.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), mine.len(), "step {}: {} has duplicates {:?}", step, me, mine);

        for other in names.iter().filter(|n| *n != me && board.agent(n).is_some()) {
            let forward = mine.iter().any(|c| c == other);
            let backward = contacts(board, other).iter().any(|c| c == me);
            assert_eq!(forward, backward, "step {}: {} / {} not symmetric", step, me, other);

            if board.agent(me).unwrap().cell == board.agent(other).unwrap().cell {
                assert!(forward, "step {}: {} and {} share a cell but are not linked", step, me, other);
            }
        }
    }
}

#[test]
fn test_contacts_stay_symmetric_over_a_long_mixed_walk() {
    let names = ["Ann", "Ben", "Cat", "Dan", "Eve", "Fay", "Gus"];
    let directions = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
    let mut board = BoardState::new(Grid::new(4, 4).unwrap());
    let mut rng = Lcg(42);

    for step in 0..500 {
        let name = names[rng.next(names.len() as u64) as usize];
        if board.agent(name).is_none() || rng.next(10) == 0 {
            // Duplicates and out-of-bounds creates are part of the mix.
            let x = rng.next(6) as i64 - 1;
            let y = rng.next(6) as i64 - 1;
            let _ = board.create_person(name, x, y);
        } else {
            let direction = directions[rng.next(4) as usize];
            board.move_person(name, direction).unwrap();
        }
        assert_contact_lists_consistent(&board, &names, step);
    }

    assert_eq!(board.len(), names.len());
}
