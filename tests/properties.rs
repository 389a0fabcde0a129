use negabot::search::alphabeta::mated_score;
use negabot::search::eval::{Evaluator, DRAW_SCORE, INF};
use negabot::search::{SearchParams, Searcher};
use negabot::{Position, Rules};
use pretty_assertions::assert_eq;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

fn tie_set(res: &negabot::SearchResult) -> BTreeSet<String> {
    res.ties.iter().map(|m| m.to_string()).collect()
}

#[test]
fn checkmate_scores_mated_sentinel() {
    let mut pos = Position::from_fen("k7/1Q6/1K6/8/8/8/8/8 b - - 0 1").unwrap();
    let mut s = Searcher::default();
    assert_eq!(s.search(&mut pos, 2, -INF, INF).unwrap(), mated_score(2));
    assert!(mated_score(3) < mated_score(1), "nearer mates must score more extreme");
}

#[test]
fn stalemate_scores_draw() {
    let mut pos = Position::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
    assert!(pos.legal_moves().is_empty());
    assert!(!pos.in_check());
    let mut s = Searcher::default();
    assert_eq!(s.search(&mut pos, 3, -INF, INF).unwrap(), DRAW_SCORE);
}

#[test]
fn search_prefers_the_mating_move() {
    let mut pos = Position::from_fen("k7/8/1K6/8/8/8/8/7Q w - - 0 1").unwrap();
    let mut rng = SmallRng::seed_from_u64(4);
    let res = Searcher::default().choose_move(&mut pos, 2, &mut rng).unwrap().unwrap();
    assert_eq!(res.best_eval, -mated_score(1));
    let mates = ["h1b7", "h1h8"];
    assert!(!res.ties.is_empty());
    assert!(res.ties.iter().all(|m| mates.contains(&m.to_string().as_str())), "{:?}", tie_set(&res));
}

#[test]
fn evaluation_is_color_symmetric() {
    let e = Evaluator::default();
    for fen in [
        "r1bqkb1r/ppp2ppp/2n2n2/3pp3/3PP3/2N2N2/PPP2PPP/R1BQKB1R w - - 0 5",
        "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1",
        "8/8/3k4/8/8/8/1R6/6K1 b - - 0 1",
        "2r3k1/5ppp/8/8/8/8/5PPP/3Q2K1 w - - 0 1",
    ] {
        let pos = Position::from_fen(fen).unwrap();
        let mirror = pos.mirrored().unwrap();
        assert_eq!(e.evaluate_white(&mirror), -e.evaluate_white(&pos), "{fen}");
        assert_eq!(e.evaluate(&mirror), e.evaluate(&pos), "{fen}");
    }
}

#[test]
fn transposition_table_does_not_change_results() {
    let fen = "r3k3/8/8/3p4/4P3/2N5/8/4K2R w - - 0 1";
    let run = |use_tt: bool| {
        let mut pos = Position::from_fen(fen).unwrap();
        let mut s = Searcher::new(SearchParams { depth: 3, use_tt, ..SearchParams::default() });
        let mut rng = SmallRng::seed_from_u64(0);
        s.search_with_params(&mut pos, &mut rng).unwrap().unwrap()
    };
    let cached = run(true);
    let plain = run(false);
    assert_eq!(cached.best_eval, plain.best_eval);
    assert_eq!(tie_set(&cached), tie_set(&plain));
}

#[test]
fn rook_endgame_scores_ignore_cache_and_order() {
    // Transpositions reach the same squares at different remaining depths.
    let fen = "7k/8/8/8/8/8/8/R3K3 w - - 0 1";
    let run = |use_tt: bool, order_moves: bool| {
        let mut pos = Position::from_fen(fen).unwrap();
        let mut s = Searcher::new(SearchParams { depth: 5, use_tt, order_moves, ..SearchParams::default() });
        let mut rng = SmallRng::seed_from_u64(0);
        s.search_with_params(&mut pos, &mut rng).unwrap().unwrap()
    };
    let reference = run(false, false);
    for (use_tt, order_moves) in [(true, true), (true, false), (false, true)] {
        let res = run(use_tt, order_moves);
        assert_eq!(res.best_eval, reference.best_eval, "tt={use_tt} order={order_moves}");
        assert_eq!(tie_set(&res), tie_set(&reference), "tt={use_tt} order={order_moves}");
    }
    assert!(tie_set(&reference).contains("a1a7"), "{:?}", tie_set(&reference));
}

#[test]
fn single_move_score_matches_uncached_search() {
    let fen = "7k/8/8/8/8/8/8/R3K3 w - - 0 1";
    let score = |use_tt: bool| {
        let mut pos = Position::from_fen(fen).unwrap();
        pos.make_move_uci("e1f1").unwrap();
        let mut s = Searcher::new(SearchParams { use_tt, ..SearchParams::default() });
        -s.search(&mut pos, 4, -INF, INF).unwrap()
    };
    assert_eq!(score(true), score(false));
}

#[test]
fn search_is_repeatable_for_a_seed() {
    let fen = "r3k3/8/8/3p4/4P3/2N5/8/4K2R w - - 0 1";
    let pick = || {
        let mut pos = Position::from_fen(fen).unwrap();
        let mut rng = SmallRng::seed_from_u64(77);
        Searcher::new(SearchParams { depth: 3, ..SearchParams::default() })
            .search_with_params(&mut pos, &mut rng).unwrap().unwrap()
    };
    let a = pick();
    let b = pick();
    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.nodes, b.nodes);
}

#[test]
fn startpos_move_is_sane() {
    let mut pos = Position::startpos();
    let mut rng = SmallRng::seed_from_u64(2024);
    let res = Searcher::new(SearchParams { depth: 2, ..SearchParams::default() })
        .search_with_params(&mut pos, &mut rng).unwrap().unwrap();
    let rank = res.best_move.to.rank() as u8;
    assert!(rank == 2 || rank == 3, "unexpected destination {}", res.best_move);
    assert!((-50..=50).contains(&res.best_eval), "eval {}", res.best_eval);
    assert_eq!(pos.fen(), Position::startpos().fen());
}

#[test]
fn equal_moves_are_picked_uniformly() {
    // Rxa8 and Rxh8 are mirror images of each other.
    let fen = "n6n/8/8/4k3/8/3K4/8/R6R w - - 0 1";
    let mut s = Searcher::new(SearchParams { depth: 1, ..SearchParams::default() });
    let mut rng = SmallRng::seed_from_u64(12345);
    let (mut left, mut right) = (0, 0);
    for _ in 0..1000 {
        let mut pos = Position::from_fen(fen).unwrap();
        let res = s.search_with_params(&mut pos, &mut rng).unwrap().unwrap();
        assert_eq!(res.ties.len(), 2, "{:?}", tie_set(&res));
        match res.best_move.to_string().as_str() {
            "a1a8" => left += 1,
            "h1h8" => right += 1,
            other => panic!("unexpected best move {other}"),
        }
    }
    assert!((400..=600).contains(&left), "left {left} right {right}");
    assert_eq!(left + right, 1000);
}
