use regex::Regex;
use std::sync::OnceLock;

use crate::types::ScoreCell;

/// Cell texts that mean "no playable result": unplayed fixture dashes and
/// the junk values free-form wiki tables leave behind.
const NO_RESULT_SENTINELS: [&str; 5] = ["-", "\u{2013}", "\u{2014}", "nan", "."];

fn annotation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Footnote markers like [a] or [12] and parenthetical notes like (awarded).
    RE.get_or_init(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)").unwrap())
}

/// Parses one results-matrix cell into a score. Malformed cells are common
/// and expected, so every failure mode resolves to `NoResult` rather than
/// an error; this function never panics.
pub fn parse_score_cell(raw: &str) -> ScoreCell {
    let text = raw.trim();
    if text.is_empty() || NO_RESULT_SENTINELS.contains(&text) {
        return ScoreCell::NoResult;
    }

    let cleaned = annotation_re().replace_all(text, "");
    let cleaned = cleaned.trim();

    // Wikipedia renders played scores with an en dash; plain hyphens show up
    // in hand-edited cells. Prefer the en dash when both appear.
    let separator = if cleaned.contains('\u{2013}') {
        '\u{2013}'
    } else if cleaned.contains('-') {
        '-'
    } else {
        return ScoreCell::NoResult;
    };

    let mut parts = cleaned.splitn(2, separator);
    let (Some(home), Some(away)) = (parts.next(), parts.next()) else {
        return ScoreCell::NoResult;
    };

    match (home.trim().parse::<u32>(), away.trim().parse::<u32>()) {
        (Ok(home_goals), Ok(away_goals)) => ScoreCell::Score(home_goals, away_goals),
        _ => ScoreCell::NoResult,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_en_dash_and_hyphen_scores() {
        assert_eq!(parse_score_cell("2–1"), ScoreCell::Score(2, 1));
        assert_eq!(parse_score_cell("0-0"), ScoreCell::Score(0, 0));
        assert_eq!(parse_score_cell(" 10 – 3 "), ScoreCell::Score(10, 3));
    }

    #[test]
    fn sentinels_are_no_result() {
        for cell in ["", "   ", "-", "–", "—", "nan", "."] {
            assert_eq!(parse_score_cell(cell), ScoreCell::NoResult, "cell {:?}", cell);
        }
    }

    #[test]
    fn annotations_do_not_change_the_score() {
        assert_eq!(parse_score_cell("2–1[3]"), ScoreCell::Score(2, 1));
        assert_eq!(parse_score_cell("2–1[a]"), ScoreCell::Score(2, 1));
        assert_eq!(parse_score_cell("1–1 (awarded)"), ScoreCell::Score(1, 1));
        assert_eq!(parse_score_cell("[b]3-2(pen.)"), ScoreCell::Score(3, 2));
    }

    #[test]
    fn malformed_cells_are_no_result_not_errors() {
        for cell in ["abc", "2:1", "2–", "–1", "2-1-3", "a–b", "-2–1", "2––1"] {
            assert_eq!(parse_score_cell(cell), ScoreCell::NoResult, "cell {:?}", cell);
        }
    }
}
