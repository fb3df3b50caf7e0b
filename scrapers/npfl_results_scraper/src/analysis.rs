use std::collections::BTreeSet;
use std::fmt;

use crate::types::{MatchRecord, Outcome};

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeShare {
    pub outcome: Outcome,
    pub count: usize,
    pub percent: f64,
}

/// Sanity-check summary of the master dataset: outcome distribution plus
/// the sorted team-name list, which makes near-duplicate spellings
/// ("Akwa Utd" next to "Akwa United") easy to spot by eye.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetAudit {
    pub total_matches: usize,
    pub outcomes: Vec<OutcomeShare>,
    pub teams: Vec<String>,
    pub home_win_percent: f64,
}

pub fn audit_dataset(records: &[MatchRecord]) -> DatasetAudit {
    let total = records.len();
    let mut counts = [
        (Outcome::HomeWin, 0usize),
        (Outcome::Draw, 0),
        (Outcome::AwayWin, 0),
    ];
    for record in records {
        for slot in counts.iter_mut() {
            if slot.0 == record.outcome {
                slot.1 += 1;
            }
        }
    }
    let outcomes: Vec<OutcomeShare> = counts
        .iter()
        .map(|&(outcome, count)| OutcomeShare {
            outcome,
            count,
            percent: if total > 0 {
                count as f64 * 100.0 / total as f64
            } else {
                0.0
            },
        })
        .collect();

    let teams: Vec<String> = records
        .iter()
        .flat_map(|r| [r.home_team.clone(), r.away_team.clone()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let home_win_percent = outcomes[0].percent;
    DatasetAudit {
        total_matches: total,
        outcomes,
        teams,
        home_win_percent,
    }
}

impl fmt::Display for DatasetAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total matches analysed: {}", self.total_matches)?;
        writeln!(f, "Outcome probabilities:")?;
        for share in &self.outcomes {
            writeln!(
                f,
                "  {}: {:.2}% ({} games)",
                share.outcome, share.percent, share.count
            )?;
        }
        writeln!(
            f,
            "{} unique team names (scan for near-duplicates):",
            self.teams.len()
        )?;
        for team in &self.teams {
            writeln!(f, "  {}", team)?;
        }
        write!(f, "Home advantage: {:.1}% home wins", self.home_win_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_counts_outcomes_and_team_names() {
        let records = vec![
            MatchRecord::new("2023-24", "Enyimba", "Lobi Stars", 2, 0),
            MatchRecord::new("2023-24", "Enyimba", "Remo Stars", 4, 2),
            MatchRecord::new("2023-24", "Lobi Stars", "Enyimba", 1, 3),
            MatchRecord::new("2023-24", "Remo Stars", "Lobi Stars", 1, 1),
        ];
        let audit = audit_dataset(&records);
        assert_eq!(audit.total_matches, 4);
        assert_eq!(audit.outcomes[0].count, 2); // home wins
        assert_eq!(audit.outcomes[1].count, 1); // draws
        assert_eq!(audit.outcomes[2].count, 1); // away wins
        assert_eq!(audit.home_win_percent, 50.0);
        assert_eq!(audit.teams, vec!["Enyimba", "Lobi Stars", "Remo Stars"]);
    }

    #[test]
    fn empty_dataset_audits_cleanly() {
        let audit = audit_dataset(&[]);
        assert_eq!(audit.total_matches, 0);
        assert_eq!(audit.home_win_percent, 0.0);
        assert!(audit.teams.is_empty());
    }
}
