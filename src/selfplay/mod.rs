use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use crate::board::cozy::Position;
use crate::board::Rules;
use crate::bots::{Bot, BotError};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchParams {
    pub games: usize,
    pub max_plies: usize,
    pub seed: u64,
    /// Start position as FEN, or `startpos`.
    pub start_fen: String,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self { games: 10, max_plies: 200, seed: 42, start_fen: "startpos".to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub start_fen: String,
    pub moves: Vec<String>,
    pub result: i8, // 1 white win, 0 draw, -1 black win
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
}

/// Plays one game between two bots. Fifty quiet moves or `max_plies` end
/// the game as a draw.
pub fn play_game(
    white: &mut dyn Bot,
    black: &mut dyn Bot,
    params: &MatchParams,
    rng: &mut SmallRng,
) -> Result<GameRecord, BotError> {
    let mut pos = Position::from_fen(&params.start_fen)?;
    let mut record = GameRecord {
        white: white.name().to_string(),
        black: black.name().to_string(),
        start_fen: pos.fen(),
        moves: Vec::new(),
        result: 0,
    };
    for ply in 0..params.max_plies {
        if pos.halfmove_clock() >= 100 { break; }
        let white_to_move = pos.side_to_move() == cozy_chess::Color::White;
        let choice = if white_to_move { white.select(&mut pos, rng)? } else { black.select(&mut pos, rng)? };
        let Some((mv, _promotion)) = choice else {
            if pos.in_check() { record.result = if white_to_move { -1 } else { 1 }; }
            break;
        };
        debug!("ply {} {} plays {}", ply, if white_to_move { white.name() } else { black.name() }, mv);
        record.moves.push(format!("{}", mv));
        pos.apply_move(&mv)?;
    }
    Ok(record)
}

/// Plays `params.games` games, swapping colors every game. Results are
/// reported from `first`'s point of view.
pub fn play_match(
    first: &mut dyn Bot,
    second: &mut dyn Bot,
    params: &MatchParams,
    mut on_game: impl FnMut(&GameRecord),
) -> Result<(Vec<GameRecord>, MatchSummary), BotError> {
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let mut games = Vec::with_capacity(params.games);
    let mut summary = MatchSummary::default();
    for gi in 0..params.games {
        let first_is_white = gi % 2 == 0;
        let rec = if first_is_white {
            play_game(first, second, params, &mut rng)?
        } else {
            play_game(second, first, params, &mut rng)?
        };
        let first_score = if first_is_white { rec.result } else { -rec.result };
        match first_score {
            1 => summary.first_wins += 1,
            -1 => summary.second_wins += 1,
            _ => summary.draws += 1,
        }
        on_game(&rec);
        games.push(rec);
    }
    Ok((games, summary))
}
