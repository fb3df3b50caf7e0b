use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a fixture, seen from the home side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "Home Win")]
    HomeWin,
    Draw,
    #[serde(rename = "Away Win")]
    AwayWin,
}

impl Outcome {
    pub fn from_goals(home_goals: u32, away_goals: u32) -> Self {
        if home_goals > away_goals {
            Outcome::HomeWin
        } else if away_goals > home_goals {
            Outcome::AwayWin
        } else {
            Outcome::Draw
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::HomeWin => "Home Win",
            Outcome::Draw => "Draw",
            Outcome::AwayWin => "Away Win",
        })
    }
}

/// One played match. The serde renames fix the CSV column names the
/// downstream feature and model scripts key on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "Home_Team")]
    pub home_team: String,
    #[serde(rename = "Away_Team")]
    pub away_team: String,
    #[serde(rename = "Home_Goals")]
    pub home_goals: u32,
    #[serde(rename = "Away_Goals")]
    pub away_goals: u32,
    #[serde(rename = "Outcome")]
    pub outcome: Outcome,
}

/// Dedup identity of a fixture: one (home, away) pairing per season.
pub type FixtureKey = (String, String, String);

impl MatchRecord {
    pub fn new(
        season: &str,
        home_team: &str,
        away_team: &str,
        home_goals: u32,
        away_goals: u32,
    ) -> Self {
        Self {
            season: season.to_string(),
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_goals,
            away_goals,
            outcome: Outcome::from_goals(home_goals, away_goals),
        }
    }

    /// Goals are excluded from the key so a corrected score replaces the
    /// old observation instead of sitting next to it.
    pub fn fixture_key(&self) -> FixtureKey {
        (
            self.season.clone(),
            self.home_team.clone(),
            self.away_team.clone(),
        )
    }
}

/// What one results-matrix cell says. Unplayed fixtures and unusable text
/// both land on `NoResult`; only `Score` produces a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCell {
    NoResult,
    Score(u32, u32),
}
