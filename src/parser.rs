//! Tabular parsing
//!
//! Turns raw comma-delimited text into header-keyed rows. This is not a general
//! CSV reader: records never span lines and the delimiter is always a comma.

use crate::coercion::{strip_outer_quotes, trim_cell};
use crate::types::{ParsedTable, RawRecord};

/// Split one line into fields.
///
/// A `"` toggles quote mode and is not emitted; inside quote mode a comma is
/// literal and `""` yields one `"`. Fields are returned untrimmed.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// Parse an export into headers and rows.
///
/// Empty input yields an empty table. Short rows are padded with empty cells;
/// cells beyond the header count are ignored.
pub fn parse_table(text: &str) -> ParsedTable {
    let mut lines = trim_cell(text)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty());

    let Some(header_line) = lines.next() else {
        return ParsedTable::default();
    };

    let headers: Vec<String> = split_line(header_line)
        .iter()
        .map(|h| clean_cell(h))
        .collect();

    let rows = lines
        .map(|line| {
            let cells = split_line(line);
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    let value = cells.get(index).map(|c| clean_cell(c)).unwrap_or_default();
                    (header.clone(), value)
                })
                .collect::<RawRecord>()
        })
        .collect();

    ParsedTable { headers, rows }
}

fn clean_cell(value: &str) -> String {
    trim_cell(strip_outer_quotes(value)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_line_quoted_comma() {
        assert_eq!(split_line("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_split_line_escaped_quote() {
        assert_eq!(split_line("\"a\"\"b\""), vec!["a\"b"]);
    }

    #[test]
    fn test_split_line_empty_fields() {
        assert_eq!(split_line(",,"), vec!["", "", ""]);
        assert_eq!(split_line(""), vec![""]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_table(""), ParsedTable::default());
        assert_eq!(parse_table("  \n\r\n  "), ParsedTable::default());
    }

    #[test]
    fn test_parse_header_only() {
        let table = parse_table("Date,Steps\n");
        assert_eq!(table.headers, vec!["Date", "Steps"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_parse_quoted_export() {
        let text = "\"Date\",\"Steps\",\"Note\"\r\n\"2026-01-01\",\"8000\",\"ran, then swam\"\r\n";
        let table = parse_table(text);

        assert_eq!(table.headers, vec!["Date", "Steps", "Note"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("Date"), Some("2026-01-01"));
        assert_eq!(table.rows[0].get("Steps"), Some("8000"));
        assert_eq!(table.rows[0].get("Note"), Some("ran, then swam"));
    }

    #[test]
    fn test_parse_short_and_long_rows() {
        let table = parse_table("A,B,C\n1\n1,2,3,4\n");

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("A"), Some("1"));
        assert_eq!(table.rows[0].get("B"), Some(""));
        assert_eq!(table.rows[0].get("C"), Some(""));
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.rows[1].get("C"), Some("3"));
    }

    #[test]
    fn test_parse_utf8_export_with_byte_order_mark() {
        let text = "\u{feff}Date,SleepHours\r\n2026-01-01,7.5\r\n";
        let table = parse_table(text);

        assert_eq!(table.headers, vec!["Date", "SleepHours"]);
        assert_eq!(table.rows[0].get("Date"), Some("2026-01-01"));

        let outcome = crate::daily_log_to_dashboard(text);
        let snapshot = outcome.snapshot().expect("dated row survives");
        assert_eq!(snapshot.dates(), vec!["2026-01-01"]);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_trims_cells() {
        let table = parse_table("A , B\n\n x ,  y  \n\n");

        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("A"), Some("x"));
        assert_eq!(table.rows[0].get("B"), Some("y"));
    }
}
