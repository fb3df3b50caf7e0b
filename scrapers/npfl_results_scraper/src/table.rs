use scraper::{Html, Selector};

/// One HTML table as a grid of text cells. The first row of the table is
/// the header row and carries the column labels; every later row is a data
/// row whose first cell is the row label (the team name, in a results
/// matrix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStructure {
    pub column_labels: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableStructure {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Grid width, label column included. Wiki tables are occasionally
    /// ragged, so this is the widest of header and data rows.
    pub fn col_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .fold(self.column_labels.len(), usize::max)
    }

    pub fn row_label(&self, r: usize) -> Option<&str> {
        self.rows
            .get(r)
            .and_then(|row| row.first())
            .map(String::as_str)
    }
}

/// Extracts every `<table>` on a page into a [`TableStructure`]. No attempt
/// is made here to judge what a table is for; that is the classifier's job.
pub fn extract_tables(html: &str) -> Vec<TableStructure> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    let mut tables = Vec::new();
    for table in document.select(&table_selector) {
        let mut rows_iter = table.select(&row_selector);
        let Some(header) = rows_iter.next() else {
            continue;
        };
        let column_labels: Vec<String> = header
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        let rows: Vec<Vec<String>> = rows_iter
            .map(|row| {
                row.select(&cell_selector)
                    .map(|cell| cell.text().collect::<String>().trim().to_string())
                    .collect::<Vec<String>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();
        if column_labels.is_empty() && rows.is_empty() {
            continue;
        }
        tables.push(TableStructure {
            column_labels,
            rows,
        });
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table class="wikitable">
          <tr><th>Pos</th><th>Team</th><th>Pts</th></tr>
          <tr><th>1</th><td>Enyimba</td><td>66</td></tr>
          <tr><th>2</th><td>Remo Stars</td><td>60</td></tr>
        </table>
        <table><tr><td>lone cell</td></tr></table>
        </body></html>"#;

    #[test]
    fn splits_header_and_data_rows() {
        let tables = extract_tables(PAGE);
        assert_eq!(tables.len(), 2);
        let standings = &tables[0];
        assert_eq!(standings.column_labels, vec!["Pos", "Team", "Pts"]);
        assert_eq!(standings.row_count(), 2);
        assert_eq!(standings.col_count(), 3);
        assert_eq!(standings.row_label(0), Some("1"));
        assert_eq!(standings.rows[0][1], "Enyimba");
    }

    #[test]
    fn single_row_table_has_no_data_rows() {
        let tables = extract_tables(PAGE);
        assert_eq!(tables[1].row_count(), 0);
        assert_eq!(tables[1].col_count(), 1);
    }

    #[test]
    fn pages_without_tables_yield_nothing() {
        assert!(extract_tables("<p>Matchday postponed.</p>").is_empty());
    }

    #[test]
    fn cell_text_is_flattened_and_trimmed() {
        let tables = extract_tables(
            r#"<table>
                 <tr><th> Club </th></tr>
                 <tr><td><a href="/wiki/Enyimba">2–1<sup>[a]</sup></a></td></tr>
               </table>"#,
        );
        assert_eq!(tables[0].column_labels, vec!["Club"]);
        assert_eq!(tables[0].rows[0][0], "2–1[a]");
    }
}
