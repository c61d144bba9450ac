//! Score constants shared by the searcher and the transposition table.

/// Window bound larger than any reachable score.
pub const INF: i32 = 30_000;

/// Mate found at the root. A mate at ply `p` scores `MATE_SCORE - p`, so
/// shorter mates score strictly higher.
pub const MATE_SCORE: i32 = 29_000;

/// Scores beyond this are mate scores and carry a distance-to-mate.
pub const MATE_THRESHOLD: i32 = 28_000;

/// Hard cap on search depth from the root, quiescence included.
pub const MAX_PLY: usize = 128;

/// True if `score` encodes a forced mate for either side.
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE_THRESHOLD
}

/// Full moves until mate, signed by the winning side, for UCI reporting.
pub fn mate_in(score: i32) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let plies = MATE_SCORE - score.abs();
    let moves = (plies + 1) / 2;
    Some(if score > 0 { moves } else { -moves })
}
