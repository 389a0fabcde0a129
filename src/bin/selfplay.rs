use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use negabot::bots::bot_by_name;
use negabot::search::SearchParams;
use negabot::selfplay::{play_match, MatchParams};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "negabot-selfplay", about = "Play a bot-vs-bot match and write games as JSON lines")]
struct Args {
    /// First bot (plays White in even games)
    #[arg(long, default_value = "Smart Bot")]
    first: String,
    /// Second bot
    #[arg(long, default_value = "Dumb Bot")]
    second: String,
    #[arg(long, default_value_t = 10)]
    games: usize,
    #[arg(long, default_value_t = 200)]
    max_plies: usize,
    #[arg(long, default_value_t = 2)]
    depth: u32,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value = "startpos")]
    fen: String,
    /// Output file (JSON lines); stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let search = SearchParams { depth: a.depth.max(1), ..SearchParams::default() };
    let mut first = bot_by_name(&a.first, search)?;
    let mut second = bot_by_name(&a.second, search)?;
    let params = MatchParams { games: a.games, max_plies: a.max_plies, seed: a.seed, start_fen: a.fen.clone() };

    let mut writer: Box<dyn Write> = match &a.out {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(std::io::stdout()),
    };
    let pb = ProgressBar::new(a.games as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} games {msg}")?);

    let mut write_err = None;
    let (_, summary) = play_match(first.as_mut(), second.as_mut(), &params, |rec| {
        if write_err.is_none() {
            let line = serde_json::to_string(rec).map_err(anyhow::Error::from);
            if let Err(e) = line.and_then(|l| writeln!(writer, "{}", l).map_err(anyhow::Error::from)) {
                write_err = Some(e);
            }
        }
        pb.inc(1);
    })?;
    pb.finish_with_message("done");
    if let Some(e) = write_err { return Err(e); }
    writer.flush()?;
    eprintln!(
        "{} vs {}: +{} -{} ={}",
        a.first, a.second, summary.first_wins, summary.second_wins, summary.draws
    );
    Ok(())
}
