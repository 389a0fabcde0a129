use negabot::Position;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn eval_material_startpos_is_zero() {
    use negabot::search::eval::material_eval_cp;
    let b = Position::startpos();
    assert_eq!(material_eval_cp(&b), 0, "startpos material not balanced");
}

#[test]
fn eval_material_known_advantage() {
    use negabot::search::eval::material_eval_cp;
    // White: Kh1, Qe2; Black: Ka8, Qd2. Material equal.
    let b = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").expect("valid fen");
    assert_eq!(material_eval_cp(&b), 0);
    // Black up a rook, seen from Black to move.
    let b = Position::from_fen("k5r1/8/8/8/8/8/8/7K b - - 0 1").expect("valid fen");
    assert_eq!(material_eval_cp(&b), 525);
}

#[test]
fn search_returns_legal_move_startpos() {
    use negabot::search::Searcher;
    let mut b = Position::startpos();
    let mut searcher = Searcher::default();
    let mut rng = SmallRng::seed_from_u64(0);
    let res = searcher.choose_move(&mut b, 1, &mut rng).unwrap();
    assert!(res.is_some(), "no move found at depth 1");
}

#[test]
fn search_prefers_winning_queen_capture() {
    use negabot::search::Searcher;
    // Qe2xd2 wins a queen
    let mut b = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").expect("valid fen");
    let mut searcher = Searcher::default();
    let mut rng = SmallRng::seed_from_u64(0);
    let res = searcher.choose_move(&mut b, 1, &mut rng).unwrap().expect("expected a best move");
    assert_eq!(format!("{}", res.best_move), "e2d2", "expected Qe2xd2, got {}", res.best_move);
    assert_eq!(res.ties.len(), 1);
}

#[test]
fn no_legal_moves_returns_none() {
    use negabot::search::Searcher;
    // Black is checkmated.
    let mut b = Position::from_fen("k7/1Q6/1K6/8/8/8/8/8 b - - 0 1").expect("valid fen");
    let mut rng = SmallRng::seed_from_u64(0);
    assert!(Searcher::default().choose_move(&mut b, 2, &mut rng).unwrap().is_none());
}

#[test]
fn promotion_piece_comes_from_the_move() {
    use negabot::search::Searcher;
    use cozy_chess::Piece;
    let mut b = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").expect("valid fen");
    let mut rng = SmallRng::seed_from_u64(9);
    let res = Searcher::default().choose_move(&mut b, 1, &mut rng).unwrap().expect("a move");
    assert_eq!(res.promotion, Some(Piece::Queen));
    assert_eq!(res.best_move.promotion, res.promotion);
    assert_eq!(format!("{}", res.best_move), "a7a8q");
}
