use clap::Parser;
use negabot::perft::{divide, perft};
use negabot::Position;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "perft", about = "Perft driver for the NegaBot rules adapter")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// FEN string or "startpos"
    #[arg(value_name = "FEN", default_value = "startpos")]
    fen: String,
    /// Print node counts per root move
    #[arg(long, default_value_t = false)]
    divide: bool,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut pos = Position::from_fen(&args.fen)?;

    let t0 = Instant::now();
    let nodes = if args.divide {
        let rows = divide(&mut pos, args.depth)?;
        for (mv, n) in &rows { println!("{}: {}", mv, n); }
        rows.iter().map(|(_, n)| n).sum()
    } else {
        perft(&mut pos, args.depth)?
    };
    let dt = t0.elapsed().as_secs_f64();
    if args.nps {
        let nps = if dt > 0.0 { nodes as f64 / dt } else { 0.0 };
        println!("nodes: {} elapsed: {:.3}s nps: {:.1}", nodes, dt, nps);
    } else {
        println!("nodes: {}", nodes);
    }
    Ok(())
}
