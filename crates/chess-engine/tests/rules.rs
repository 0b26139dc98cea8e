//! Rule scenarios played through the interactive command surface.

use chess_core::{Color, Coord, Move, PieceKind, SpecialMove};
use chess_engine::{
    evaluate, is_in_checkmate, Board, EngineError, Game, GameEvent, GameOptions, MoveOutcome,
};

fn at(s: &str) -> Coord {
    Coord::from_algebraic(s).unwrap()
}

fn play_all(game: &mut Game, moves: &[&str]) {
    for mv in moves {
        let (from, to) = mv.split_at(2);
        game.play(at(from), at(to))
            .unwrap_or_else(|e| panic!("{} rejected: {}", mv, e));
    }
}

#[test]
fn scholars_mate() {
    let mut game = Game::standard();
    play_all(
        &mut game,
        &["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6"],
    );
    game.drain_events();

    let outcome = game.play(at("h5"), at("f7")).unwrap();
    assert!(matches!(
        outcome,
        MoveOutcome::Played {
            check: true,
            checkmate: true,
            ..
        }
    ));
    assert!(game.is_game_over());
    let events = game.drain_events();
    assert_eq!(
        events.last(),
        Some(&GameEvent::Checkmate {
            checkmated: Color::Black
        })
    );
    assert_eq!(game.play(at("e8"), at("f7")), Err(EngineError::GameOver));
}

#[test]
fn en_passant_only_on_next_ply() {
    let mut game = Game::standard();
    play_all(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert!(game.legal_targets(at("e5")).unwrap().contains(&at("d6")));

    let mut late = game.clone();
    play_all(&mut late, &["h2h3", "h7h6"]);
    assert!(!late.legal_targets(at("e5")).unwrap().contains(&at("d6")));

    let before = game.clone();
    game.drain_events();
    game.play(at("e5"), at("d6")).unwrap();
    assert!(game.board().piece_at(at("d5")).is_empty());
    assert_eq!(game.board().pieces(Color::Black).len(), 15);
    let events = game.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Captured { piece, .. } if piece.coord == at("d5")
    )));

    game.undo().unwrap();
    assert_eq!(game.board(), before.board());
    assert_eq!(game.turn(), before.turn());
    assert_eq!(game.history().len(), before.history().len());
}

#[test]
fn castling_by_king_notation() {
    let mut game = Game::standard();
    play_all(
        &mut game,
        &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"],
    );
    game.drain_events();
    game.play(at("e1"), at("g1")).unwrap();
    assert_eq!(game.board().piece_at(at("g1")).kind, PieceKind::King);
    assert_eq!(game.board().piece_at(at("f1")).kind, PieceKind::Rook);
    assert!(game.board().piece_at(at("h1")).is_empty());
    assert_eq!(game.side_to_move(), Color::Black);

    let events = game.drain_events();
    let moved: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Moved { from, to, kind, .. } => Some((*from, *to, *kind)),
            _ => None,
        })
        .collect();
    assert!(moved.contains(&(at("h1"), at("f1"), PieceKind::Rook)));
    assert!(moved.contains(&(at("e1"), at("g1"), PieceKind::King)));

    game.undo().unwrap();
    assert_eq!(game.board().piece_at(at("e1")).kind, PieceKind::King);
    assert_eq!(game.board().piece_at(at("h1")).kind, PieceKind::Rook);
    assert!(game.board().piece_at(at("e1")).is_unmoved());
    assert!(game.board().piece_at(at("h1")).is_unmoved());
}

#[test]
fn castling_lost_after_king_moves() {
    let mut game =
        Game::from_placement("4k3/8/8/8/8/8/8/R3K2R", GameOptions::default()).unwrap();
    play_all(&mut game, &["e1e2", "e8e7", "e2e1", "e7e8"]);
    assert_eq!(
        game.play(at("e1"), at("g1")),
        Err(EngineError::IllegalMoveRequested {
            from: at("e1"),
            to: at("g1")
        })
    );
    assert_eq!(game.turn(), 5);
}

#[test]
fn castling_blocked_by_piece_between() {
    let mut game = Game::standard();
    assert!(game.play(at("e1"), at("g1")).is_err());
    assert_eq!(game.board(), &Board::default());
}

#[test]
fn final_square_rule_allows_crossing_attacked_square() {
    let placement = "4k3/8/8/8/8/8/5r2/R3K2R";
    let mut relaxed = Game::from_placement(placement, GameOptions::default()).unwrap();
    assert!(relaxed.play(at("e1"), at("g1")).is_ok());

    let mut strict = Game::from_placement(placement, GameOptions::strict()).unwrap();
    assert!(strict.play(at("e1"), at("g1")).is_err());
    assert!(strict.play(at("e1"), at("c1")).is_ok());
}

#[test]
fn castling_into_check_is_never_legal() {
    let placement = "4k3/8/8/8/8/8/6r1/R3K2R";
    let mut relaxed = Game::from_placement(placement, GameOptions::default()).unwrap();
    assert!(relaxed.play(at("e1"), at("g1")).is_err());
}

#[test]
fn promotion_through_play() {
    let mut game =
        Game::from_placement("4k3/P7/8/8/8/8/8/4K3", GameOptions::default()).unwrap();
    let white_before = game.board().pieces(Color::White).len();
    let outcome = game.play(at("a7"), at("a8")).unwrap();
    let MoveOutcome::Played { applied, check, .. } = outcome else {
        panic!("move was cancelled");
    };
    assert!(applied.promoted);
    assert_eq!(applied.special, SpecialMove::Promotion);
    // the new queen checks along the back rank
    assert!(check);

    let queen = game.board().piece_at(at("a8"));
    assert_eq!(queen.kind, PieceKind::Queen);
    assert_eq!(queen.color, Color::White);
    assert_eq!(game.board().pieces(Color::White).len(), white_before);
    assert!(game
        .drain_events()
        .contains(&GameEvent::Promoted {
            at: at("a8"),
            color: Color::White
        }));

    game.undo().unwrap();
    assert_eq!(game.board().piece_at(at("a7")).kind, PieceKind::Pawn);
    assert!(game.board().piece_at(at("a8")).is_empty());
    assert!(game.board().validate().is_ok());
}

#[test]
fn boxed_lone_king_is_checkmated() {
    // black king in the corner, white queen and king take every square
    let mut game =
        Game::from_placement("k7/1Q6/2K5/8/8/8/8/8", GameOptions::default()).unwrap();
    assert_eq!(is_in_checkmate(&mut game, Color::Black), Ok(true));
    assert!(game.is_game_over());
    assert_eq!(game.select(at("b7")).unwrap_err(), EngineError::GameOver);
}

#[test]
fn king_found_without_black_pieces() {
    let board = Board::from_placement_str("8/8/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
    let king = board.find_king(Color::White).unwrap();
    assert_eq!(king.coord, Coord::E1);
    assert_eq!(king.coord.to_algebraic(), "e1");
}

#[test]
fn symmetric_start_scores_zero() {
    let game = Game::standard();
    assert_eq!(evaluate(game.board()), 0);
}

#[test]
fn engine_move_goes_through_play_move() {
    let mut game = Game::standard();
    let (from, m) = game.find_best_move(2).unwrap().unwrap();
    let outcome = game.play_move(from, m).unwrap();
    assert!(matches!(outcome, MoveOutcome::Played { .. }));
    assert_eq!(game.side_to_move(), Color::Black);
    assert_eq!(
        game.play_move(at("e7"), Move::normal(0, 3)),
        Err(EngineError::IllegalMoveRequested {
            from: at("e7"),
            to: at("e4")
        })
    );
}

#[test]
fn undo_walks_back_to_start() {
    let mut game = Game::standard();
    play_all(
        &mut game,
        &["e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5"],
    );
    while !game.history().is_empty() {
        game.undo().unwrap();
    }
    assert_eq!(game.board(), &Board::default());
    assert_eq!(game.turn(), 1);
    assert_eq!(game.undo(), Err(EngineError::EmptyHistory));
}
