//! Hand-rolled CSV tokenizer for player import files.
//!
//! A single-pass state machine over raw text with two states, normal and
//! in-quotes. The format is the narrow subset the import path needs: comma
//! delimiter, double-quote field quoting with `""` escaping, CRLF or LF line
//! endings, optional leading BOM, mandatory header row.
//!
//! Header cells are normalized by lower-casing and stripping every character
//! outside `[a-z0-9]`, so "Skill Rating", "skill-rating" and "SKILLRATING"
//! all address the same column. The header must normalize to include `name`;
//! recognized optional columns normalize to `skillrating` and `positionpref`.
//!
//! An unmatched quote is fatal to the whole input. A data row wider than the
//! header is a per-row error, collected rather than fatal; a narrower row is
//! padded with empty cells.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{CsvError, CsvResult};

/// Rows of a parsed import file, keyed by normalized header name.
///
/// `row_errors` holds per-row problems; row numbers are 1-based and count
/// the header as row 1.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    /// Normalized header names, in column order.
    pub headers: Vec<String>,
    /// One map per surviving data row; cells are trimmed.
    pub records: Vec<HashMap<String, String>>,
    /// Collected per-row errors.
    pub row_errors: Vec<String>,
}

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new("[^a-z0-9]").expect("valid pattern"));

/// Normalize a header cell: lowercase, strip everything outside `[a-z0-9]`.
pub fn normalize_header(header: &str) -> String {
    NON_ALNUM.replace_all(&header.to_lowercase(), "").into_owned()
}

/// Tokenize raw CSV text into a rectangular table of string cells.
///
/// Reaching end of input while inside a quoted field fails the whole input;
/// no partial rows are returned. Trailing fully-empty records are discarded.
pub fn tokenize(text: &str) -> CsvResult<Vec<Vec<String>>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = strip_bom(text).chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // A doubled quote emits one literal quote and stays quoted.
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\n' => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            '\r' => {}
            _ => cell.push(c),
        }
    }

    if in_quotes {
        return Err(CsvError::UnmatchedQuote);
    }

    row.push(cell);
    rows.push(row);

    // A trailing newline (or several) leaves single-empty-cell records.
    while rows.last().is_some_and(|r| r.len() == 1 && r[0].is_empty()) {
        rows.pop();
    }
    rows.retain(|r| !r.is_empty());

    Ok(rows)
}

/// Parse an import file into header-keyed records.
///
/// The first surviving row is the header. Fully-blank data rows are skipped;
/// rows wider than the header are collected as per-row errors; narrower rows
/// are padded with empty strings.
pub fn parse_players_csv(text: &str) -> CsvResult<CsvTable> {
    let rows = tokenize(text)?;

    let Some((header_row, data_rows)) = rows.split_first() else {
        return Ok(CsvTable::default());
    };

    let headers: Vec<String> = header_row.iter().map(|h| normalize_header(h.trim())).collect();

    if !headers.iter().any(|h| h == "name") {
        return Err(CsvError::MissingNameColumn);
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();

    for (index, row) in data_rows.iter().enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        if row.len() > headers.len() {
            // Header is row 1, so the first data row is row 2.
            row_errors.push(format!("Row {} has more columns than the header.", index + 2));
            continue;
        }

        let mut record = HashMap::new();
        for (column, header) in headers.iter().enumerate() {
            let cell = row.get(column).map(|c| c.trim()).unwrap_or("");
            record.insert(header.clone(), cell.to_string());
        }
        records.push(record);
    }

    Ok(CsvTable {
        headers,
        records,
        row_errors,
    })
}

/// Parse an import file from disk.
pub fn parse_players_file<P: AsRef<Path>>(path: P) -> CsvResult<CsvTable> {
    let text = std::fs::read_to_string(path)?;
    parse_players_csv(&text)
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let table = parse_players_csv("name,skillrating\nA,5\n\"B, C\",7\n").unwrap();

        assert_eq!(table.records.len(), 2);
        assert!(table.row_errors.is_empty());
        assert_eq!(table.records[0]["name"], "A");
        assert_eq!(table.records[0]["skillrating"], "5");
        assert_eq!(table.records[1]["name"], "B, C");
        assert_eq!(table.records[1]["skillrating"], "7");
    }

    #[test]
    fn test_unmatched_quote_is_fatal() {
        let result = parse_players_csv("name\n\"unterminated\n");
        assert!(matches!(result, Err(CsvError::UnmatchedQuote)));
    }

    #[test]
    fn test_escaped_quotes() {
        let rows = tokenize("a,b\n\"say \"\"hi\"\"\",2\n").unwrap();
        assert_eq!(rows[1][0], "say \"hi\"");
        assert_eq!(rows[1][1], "2");
    }

    #[test]
    fn test_quote_mid_cell_does_not_emit() {
        // The opening quote itself never becomes part of the field.
        let rows = tokenize("a\nx\"y\"z\n").unwrap();
        assert_eq!(rows[1][0], "xyz");
    }

    #[test]
    fn test_crlf_and_bom() {
        let table = parse_players_csv("\u{feff}name,positionpref\r\nAlice,wing\r\n").unwrap();
        assert_eq!(table.headers, vec!["name", "positionpref"]);
        assert_eq!(table.records[0]["name"], "Alice");
        assert_eq!(table.records[0]["positionpref"], "wing");
    }

    #[test]
    fn test_newline_inside_quotes_kept() {
        let rows = tokenize("a\n\"line1\nline2\"\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "line1\nline2");
    }

    #[test]
    fn test_header_normalization_variants() {
        for header in ["Skill Rating", "skill-rating", "SKILLRATING"] {
            assert_eq!(normalize_header(header), "skillrating");
        }
        assert_eq!(normalize_header("  Name "), "name");
        assert_eq!(normalize_header("position_pref"), "positionpref");
    }

    #[test]
    fn test_missing_name_column_is_fatal() {
        let result = parse_players_csv("skillrating,positionpref\n5,wing\n");
        assert!(matches!(result, Err(CsvError::MissingNameColumn)));
    }

    #[test]
    fn test_wide_row_collected_not_fatal() {
        let table = parse_players_csv("name,skillrating\nA,1\nB,2,extra\nC,3\n").unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.row_errors, vec!["Row 3 has more columns than the header."]);
        assert_eq!(table.records[1]["name"], "C");
    }

    #[test]
    fn test_short_row_padded() {
        let table = parse_players_csv("name,skillrating,positionpref\nA,4\n").unwrap();
        assert_eq!(table.records[0]["skillrating"], "4");
        assert_eq!(table.records[0]["positionpref"], "");
    }

    #[test]
    fn test_blank_rows_skipped() {
        let table = parse_players_csv("name\nA\n\n , \nB\n").unwrap();
        let names: Vec<_> = table.records.iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_trailing_newlines_discarded() {
        let rows = tokenize("a,b\n1,2\n\n\n").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        let table = parse_players_csv("").unwrap();
        assert!(table.records.is_empty());
        assert!(table.row_errors.is_empty());
    }

    #[test]
    fn test_cells_trimmed_in_records() {
        let table = parse_players_csv("name , skillrating\n  Ann  , 6 \n").unwrap();
        assert_eq!(table.records[0]["name"], "Ann");
        assert_eq!(table.records[0]["skillrating"], "6");
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.csv");
        std::fs::write(&path, "name,skillrating\nD,9\n").unwrap();

        let table = parse_players_file(&path).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0]["name"], "D");
    }
}
