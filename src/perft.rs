use crate::board::{MoveGuard, Rules, RulesError};

// Make/unmake perft through the scoped guard; exercises the rules adapter.
pub fn perft<R: Rules + ?Sized>(pos: &mut R, depth: u32) -> Result<u64, RulesError> {
    if depth == 0 { return Ok(1); }
    let moves = pos.legal_moves();
    if depth == 1 { return Ok(moves.len() as u64); }
    let mut nodes = 0u64;
    for mv in &moves {
        let mut child = MoveGuard::apply(pos, mv)?;
        nodes += perft(&mut *child, depth - 1)?;
    }
    Ok(nodes)
}

/// Per-root-move breakdown, in generation order.
pub fn divide<R: Rules + ?Sized>(pos: &mut R, depth: u32) -> Result<Vec<(String, u64)>, RulesError> {
    let mut out = Vec::new();
    if depth == 0 { return Ok(out); }
    for mv in pos.legal_moves() {
        let mut child = MoveGuard::apply(pos, &mv)?;
        out.push((format!("{}", mv), perft(&mut *child, depth - 1)?));
    }
    Ok(out)
}
