use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::store::StoreError;
use crate::types::{MatchRecord, Outcome};

/// A master-dataset row widened with the rating features the models train
/// on. Column names match the training CSV the notebooks read.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrainingRow {
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
    #[serde(rename = "Home_Attack")]
    pub home_attack: f64,
    #[serde(rename = "Home_Defense")]
    pub home_defense: f64,
    #[serde(rename = "Away_Attack")]
    pub away_attack: f64,
    #[serde(rename = "Away_Defense")]
    pub away_defense: f64,
    #[serde(rename = "Home_Exp_Goals")]
    pub home_exp_goals: f64,
    #[serde(rename = "Away_Exp_Goals")]
    pub away_exp_goals: f64,
    #[serde(rename = "Power_Diff")]
    pub power_diff: f64,
}

/// Per-team scoring rates split by venue. A home side's goals scored
/// measure its attack; the goals it concedes at home measure its defense,
/// and the away-side ratings flip the same way. League-wide averages are
/// the cold-start fallback for teams with no history on that side.
#[derive(Debug, Clone)]
pub struct TeamRatings {
    home: HashMap<String, (f64, f64)>,
    away: HashMap<String, (f64, f64)>,
    pub league_home_avg: f64,
    pub league_away_avg: f64,
}

impl TeamRatings {
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let mut home_sums: HashMap<&str, (f64, f64, f64)> = HashMap::new();
        let mut away_sums: HashMap<&str, (f64, f64, f64)> = HashMap::new();
        let mut total_home = 0.0;
        let mut total_away = 0.0;

        for record in records {
            let h = record.home_goals as f64;
            let a = record.away_goals as f64;
            total_home += h;
            total_away += a;

            let entry = home_sums
                .entry(record.home_team.as_str())
                .or_insert((0.0, 0.0, 0.0));
            entry.0 += h;
            entry.1 += a;
            entry.2 += 1.0;

            let entry = away_sums
                .entry(record.away_team.as_str())
                .or_insert((0.0, 0.0, 0.0));
            entry.0 += a;
            entry.1 += h;
            entry.2 += 1.0;
        }

        let games = records.len() as f64;
        let league_home_avg = if games > 0.0 { total_home / games } else { 0.0 };
        let league_away_avg = if games > 0.0 { total_away / games } else { 0.0 };

        let mean = |sums: HashMap<&str, (f64, f64, f64)>| {
            sums.into_iter()
                .map(|(team, (scored, conceded, n))| {
                    (team.to_string(), (scored / n, conceded / n))
                })
                .collect::<HashMap<String, (f64, f64)>>()
        };

        Self {
            home: mean(home_sums),
            away: mean(away_sums),
            league_home_avg,
            league_away_avg,
        }
    }

    /// Home-side (attack, defense) for a team, league averages when unseen.
    pub fn home_rating(&self, team: &str) -> (f64, f64) {
        self.home
            .get(team)
            .copied()
            .unwrap_or((self.league_home_avg, self.league_away_avg))
    }

    /// Away-side (attack, defense); the fallback flips venue the same way
    /// the ratings do, since an away attack is measured in away goals.
    pub fn away_rating(&self, team: &str) -> (f64, f64) {
        self.away
            .get(team)
            .copied()
            .unwrap_or((self.league_away_avg, self.league_home_avg))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Widens every record with the mismatch features: each side's expected
/// goals pit one attack against the other defense, and the power diff is
/// their difference (positive when the home side is stronger).
pub fn build_training_rows(records: &[MatchRecord]) -> Vec<TrainingRow> {
    let ratings = TeamRatings::from_records(records);
    records
        .iter()
        .map(|record| {
            let (home_attack, home_defense) = ratings.home_rating(&record.home_team);
            let (away_attack, away_defense) = ratings.away_rating(&record.away_team);
            let home_exp_goals = (home_attack + away_defense) / 2.0;
            let away_exp_goals = (away_attack + home_defense) / 2.0;
            TrainingRow {
                season: record.season.clone(),
                home_team: record.home_team.clone(),
                away_team: record.away_team.clone(),
                home_goals: record.home_goals,
                away_goals: record.away_goals,
                outcome: record.outcome,
                home_attack: round2(home_attack),
                home_defense: round2(home_defense),
                away_attack: round2(away_attack),
                away_defense: round2(away_defense),
                home_exp_goals: round2(home_exp_goals),
                away_exp_goals: round2(away_exp_goals),
                power_diff: round2(home_exp_goals - away_exp_goals),
            }
        })
        .collect()
}

pub fn write_training_csv(path: &Path, rows: &[TrainingRow]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MatchRecord> {
        vec![
            MatchRecord::new("2023-24", "Enyimba", "Lobi Stars", 2, 0),
            MatchRecord::new("2023-24", "Enyimba", "Remo Stars", 4, 2),
            MatchRecord::new("2023-24", "Lobi Stars", "Enyimba", 1, 3),
        ]
    }

    #[test]
    fn ratings_average_goals_by_venue() {
        let ratings = TeamRatings::from_records(&sample());
        // At home Enyimba scored 2 and 4, conceded 0 and 2.
        assert_eq!(ratings.home_rating("Enyimba"), (3.0, 1.0));
        // Away Enyimba scored 3, conceded 1.
        assert_eq!(ratings.away_rating("Enyimba"), (3.0, 1.0));
        assert_eq!(ratings.away_rating("Lobi Stars"), (0.0, 2.0));
    }

    #[test]
    fn unseen_teams_fall_back_to_league_averages() {
        let ratings = TeamRatings::from_records(&sample());
        assert_eq!(ratings.league_home_avg, 7.0 / 3.0);
        assert_eq!(ratings.league_away_avg, 5.0 / 3.0);
        assert_eq!(
            ratings.home_rating("Kano Pillars"),
            (7.0 / 3.0, 5.0 / 3.0)
        );
        assert_eq!(
            ratings.away_rating("Kano Pillars"),
            (5.0 / 3.0, 7.0 / 3.0)
        );
    }

    #[test]
    fn training_rows_carry_expectancy_and_power_diff() {
        let rows = build_training_rows(&sample());
        // Enyimba home (3.0, 1.0) vs Lobi Stars away defense 2.0, attack 0.0.
        assert_eq!(rows[0].home_exp_goals, 2.5);
        assert_eq!(rows[0].away_exp_goals, 0.5);
        assert_eq!(rows[0].power_diff, 2.0);
        assert_eq!(rows[0].outcome, Outcome::HomeWin);
    }

    #[test]
    fn empty_dataset_builds_no_rows() {
        assert!(build_training_rows(&[]).is_empty());
    }
}
