use crate::classifier::ClassifiedMatrix;
use crate::types::{MatchRecord, ScoreCell};
use crate::utils::parse_score_cell;

/// Walks every off-diagonal cell of a classified matrix and emits one
/// record per parseable score, in row-major order so each home side's
/// fixtures stay grouped. The away identity is the row label at the column
/// index: position, not header text, resolves who the opponent is.
pub fn extract_matches(matrix: &ClassifiedMatrix, season: &str) -> Vec<MatchRecord> {
    let mut records = Vec::new();
    for r in 0..matrix.size {
        for c in 0..matrix.size {
            if r == c {
                // Diagonal is the self-fixture, never played.
                continue;
            }
            let cell = matrix.score_cell(r, c).unwrap_or("");
            match parse_score_cell(cell) {
                ScoreCell::NoResult => continue,
                ScoreCell::Score(home_goals, away_goals) => records.push(MatchRecord::new(
                    season,
                    &matrix.teams[r],
                    &matrix.teams[c],
                    home_goals,
                    away_goals,
                )),
            }
        }
    }
    records
}
