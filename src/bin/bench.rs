use clap::Parser;
use negabot::search::{SearchParams, Searcher};
use negabot::Position;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "negabot-bench", version, about = "Benchmark NegaBot search speed")]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// Fixed search depth
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Movetime budget in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// Transposition table size in MB (approximate)
    #[arg(long, default_value_t = 16)]
    hash_mb: usize,

    /// Disable move ordering
    #[arg(long, default_value_t = false)]
    no_ordering: bool,

    /// Disable the transposition table
    #[arg(long, default_value_t = false)]
    no_tt: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut pos = Position::from_fen(&args.fen)?;

    let params = SearchParams {
        depth: args.depth.max(1),
        use_tt: !args.no_tt,
        order_moves: !args.no_ordering,
        movetime_ms: args.movetime,
        ..SearchParams::default()
    };
    let mut s = Searcher::new(params);
    s.set_tt_capacity_mb(args.hash_mb);
    let mut rng = SmallRng::seed_from_u64(0);

    let t0 = Instant::now();
    let res = s.search_with_params(&mut pos, &mut rng)?;
    let dt = t0.elapsed();
    let nodes = res.as_ref().map_or(0, |r| r.nodes + r.qnodes);
    let nps = if dt.as_secs_f64() > 0.0 { nodes as f64 / dt.as_secs_f64() } else { 0.0 };
    match res {
        Some(r) => println!(
            "bestmove={} score_cp={} ties={} nodes={} qnodes={} tt_hits={} elapsed={:.3}s nps={:.1}",
            r.best_move, r.best_eval, r.ties.len(), r.nodes, r.qnodes, r.tt_hits, dt.as_secs_f64(), nps
        ),
        None => println!("bestmove=(none)"),
    }
    Ok(())
}
