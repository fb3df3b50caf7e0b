use tracing::warn;

use crate::table::TableStructure;

/// A results matrix is teams x teams, so it is large and roughly square;
/// standings and infobox tables are narrow or small.
pub const MIN_MATRIX_DIM: usize = 8;
pub const MAX_SHAPE_SKEW: usize = 3;
/// A results grid is dominated by "H–A" strings, a standings table by plain
/// numbers. Below this fraction of dash-bearing cells a table is not a grid.
pub const MIN_DASH_DENSITY: f64 = 0.05;

/// A table judged to be a results matrix. Row order and column order are
/// the same team ordering; `teams` is captured once from the row labels and
/// is the only source of team identity downstream. Abbreviated column
/// headers are never parsed as names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMatrix {
    pub teams: Vec<String>,
    pub size: usize,
    cells: Vec<Vec<String>>,
}

impl ClassifiedMatrix {
    /// Score cell for (home row, away column). `None` when the grid is
    /// ragged or narrower than `size`; callers treat that as no result.
    pub fn score_cell(&self, r: usize, c: usize) -> Option<&str> {
        self.cells
            .get(r)
            .and_then(|row| row.get(c))
            .map(String::as_str)
    }
}

fn dash_density(table: &TableStructure) -> f64 {
    let total = table.row_count() * table.col_count();
    if total == 0 {
        return 0.0;
    }
    let dashes = table
        .rows
        .iter()
        .flatten()
        .filter(|cell| cell.contains('-') || cell.contains('\u{2013}'))
        .count();
    dashes as f64 / total as f64
}

/// Runs the matrix gates in order, cheapest first: shape, then dash
/// density. A table failing a gate is discarded without a per-table
/// diagnostic; the per-season counts suffice.
pub fn classify(table: TableStructure) -> Option<ClassifiedMatrix> {
    let rows = table.row_count();
    let cols = table.col_count();
    if rows < MIN_MATRIX_DIM || cols < MIN_MATRIX_DIM {
        return None;
    }
    if rows.abs_diff(cols) > MAX_SHAPE_SKEW {
        return None;
    }
    if dash_density(&table) < MIN_DASH_DENSITY {
        return None;
    }

    let header_teams = table.column_labels.len().saturating_sub(1);
    if header_teams != rows {
        warn!(
            "results matrix has {} row labels but {} header columns; trusting row order",
            rows, header_teams
        );
    }

    let size = rows.min(cols);
    let mut teams = Vec::with_capacity(rows);
    let mut cells = Vec::with_capacity(rows);
    for mut row in table.rows {
        let team = if row.is_empty() {
            String::new()
        } else {
            row.remove(0)
        };
        teams.push(team);
        cells.push(row);
    }
    Some(ClassifiedMatrix { teams, size, cells })
}

/// Pure filter: a page may yield zero, one, or several matrices, and every
/// one of them is handed on. Dedup at merge time absorbs any overlap.
pub fn classify_tables(tables: Vec<TableStructure>) -> Vec<ClassifiedMatrix> {
    tables.into_iter().filter_map(classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// n teams, a corner label plus n abbreviated header cells, en dashes
    /// everywhere off the diagonal and an em dash on it.
    fn matrix_table(n: usize) -> TableStructure {
        let column_labels = std::iter::once("Home \\ Away".to_string())
            .chain((0..n).map(|c| format!("T{}", c)))
            .collect();
        let rows = (0..n)
            .map(|r| {
                std::iter::once(format!("Team {}", r))
                    .chain((0..n).map(|c| {
                        if r == c {
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
    fn accepts_a_square_dash_heavy_grid() {
        let matrix = classify(matrix_table(10)).expect("10x10 grid classifies");
        assert_eq!(matrix.size, 10);
        assert_eq!(matrix.teams.len(), 10);
        assert_eq!(matrix.teams[0], "Team 0");
        assert_eq!(matrix.score_cell(0, 1), Some("\u{2013}"));
    }

    #[test]
    fn rejects_small_tables_regardless_of_content() {
        assert!(classify(matrix_table(7)).is_none());
    }

    #[test]
    fn rejects_skewed_shapes() {
        let mut table = matrix_table(10);
        for i in 0..4 {
            table.column_labels.push(format!("X{}", i));
        }
        // 10 rows vs 15 columns: both gates on size pass, skew does not.
        assert!(classify(table).is_none());
    }

    #[test]
    fn rejects_numeric_tables_with_few_dashes() {
        let column_labels: Vec<String> = (0..10).map(|c| format!("S{}", c)).collect();
        let rows: Vec<Vec<String>> = (0..10)
            .map(|r| (0..10).map(|c| format!("{}", r * c)).collect())
            .collect();
        assert!(classify(TableStructure {
            column_labels,
            rows
        })
        .is_none());
    }

    #[test]
    fn size_clamps_to_the_smaller_dimension() {
        let mut table = matrix_table(10);
        table.rows.truncate(8);
        let matrix = classify(table).expect("within shape tolerance");
        assert_eq!(matrix.size, 8);
    }

    #[test]
    fn missing_cells_read_as_none() {
        let matrix = classify(matrix_table(10)).unwrap();
        assert_eq!(matrix.score_cell(0, 10), None);
        assert_eq!(matrix.score_cell(10, 0), None);
    }
}
