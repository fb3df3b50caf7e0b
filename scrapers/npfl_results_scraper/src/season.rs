use tracing::{info, warn};

use crate::classifier;
use crate::matrix;
use crate::table::{self, TableStructure};
use crate::types::MatchRecord;

/// Outcome of running the pipeline over one season page. Counts are data,
/// not exceptions: a page with no matrix is a reportable result.
#[derive(Debug, Clone, Default)]
pub struct SeasonReport {
    pub season: String,
    pub tables_seen: usize,
    pub matrices_found: usize,
    pub records: Vec<MatchRecord>,
}

/// Classifies every table on a page and extracts matches from each matrix
/// that survives. When a page carries more than one qualifying table all of
/// them are processed; key dedup at merge time absorbs overlap.
pub fn process_tables(tables: Vec<TableStructure>, season: &str) -> SeasonReport {
    let tables_seen = tables.len();
    let matrices = classifier::classify_tables(tables);
    let matrices_found = matrices.len();

    let mut records = Vec::new();
    for classified in &matrices {
        records.extend(matrix::extract_matches(classified, season));
    }

    if matrices_found == 0 {
        warn!(
            "No results matrix found for {} ({} tables on page)",
            season, tables_seen
        );
    } else {
        info!(
            "Extracted {} matches from {} ({} matrices, {} tables)",
            records.len(),
            season,
            matrices_found,
            tables_seen
        );
    }

    SeasonReport {
        season: season.to_string(),
        tables_seen,
        matrices_found,
        records,
    }
}

pub fn process_page(html: &str, season: &str) -> SeasonReport {
    process_tables(table::extract_tables(html), season)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_table(scored_cell: (usize, usize, &str)) -> TableStructure {
        let n = 10;
        let column_labels = std::iter::once(String::new())
            .chain((0..n).map(|c| format!("T{}", c)))
            .collect();
        let rows = (0..n)
            .map(|r| {
                std::iter::once(format!("Team {}", r))
                    .chain((0..n).map(|c| {
                        if (r, c) == (scored_cell.0, scored_cell.1) {
                            scored_cell.2.to_string()
                        } else if r == c {
                            "\u{2014}".to_string()
                        } else {
                            "\u{2013}".to_string()
                        }
                    }))
                    .collect()
            })
            .collect();
        TableStructure {
            column_labels,
            rows,
        }
    }

    #[test]
    fn pages_without_a_matrix_report_zero_matrices() {
        let report = process_page(
            "<table><tr><th>Pos</th><th>Team</th></tr>\
             <tr><td>1</td><td>Enyimba</td></tr></table>",
            "2020-21",
        );
        assert_eq!(report.season, "2020-21");
        assert_eq!(report.tables_seen, 1);
        assert_eq!(report.matrices_found, 0);
        assert!(report.records.is_empty());
    }

    #[test]
    fn every_classified_matrix_contributes_records() {
        let tables = vec![
            matrix_table((0, 1, "1\u{2013}0")),
            matrix_table((2, 3, "0\u{2013}2")),
        ];
        let report = process_tables(tables, "2023-24");
        assert_eq!(report.matrices_found, 2);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].home_team, "Team 0");
        assert_eq!(report.records[1].home_team, "Team 2");
    }
}
