use anyhow::{Context, Result};
use clap::Parser;
use negabot::bots::{bot_by_name, roster};
use negabot::search::SearchParams;
use negabot::uci::UciEngine;
use negabot::Position;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pick a move with the NegaBot engine", long_about = None)]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// Search depth in plies (overrides the config file)
    #[arg(long)]
    depth: Option<u32>,

    /// Seed for tie-breaking among equally scored moves
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// JSON file with SearchParams
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bot to ask for the move
    #[arg(long, default_value = "Smart Bot")]
    bot: String,

    /// List available bots and exit
    #[arg(long)]
    list_bots: bool,

    /// Run the line-oriented UCI loop on stdin/stdout
    #[arg(long)]
    uci: bool,
}

fn load_params(path: Option<&PathBuf>) -> Result<SearchParams> {
    let Some(path) = path else { return Ok(SearchParams::default()) };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_bots {
        for name in roster() { println!("{}", name); }
        return Ok(());
    }

    let mut params = load_params(args.config.as_ref())?;
    if let Some(d) = args.depth { params.depth = d; }
    anyhow::ensure!(params.depth >= 1, "depth must be at least 1");

    if args.uci {
        UciEngine::new(params, args.seed).run_loop()?;
        return Ok(());
    }

    let mut pos = Position::from_fen(&args.fen)?;
    let mut bot = bot_by_name(&args.bot, params)?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    match bot.select(&mut pos, &mut rng)? {
        Some((mv, promotion)) => {
            println!("{} plays {}", bot.name(), mv);
            if let Some(p) = promotion { println!("promotion: {:?}", p); }
        }
        None => println!("No legal moves available!"),
    }
    Ok(())
}
