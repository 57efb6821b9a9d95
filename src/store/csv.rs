//! Minimal CSV codec for the record files.
//!
//! Standard quoting rules: fields holding commas, quotes or line breaks get
//! quoted, embedded quotes are doubled. Rows are written with CRLF and read
//! back with either line ending.

use itertools::Itertools;

/// Parses a whole file into rows of cells, skipping blank lines.
///
/// A leading byte-order mark is dropped so files written for Excel load
/// like any other.
pub(crate) fn parse(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\n' | '\r' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if !row.is_empty() || !field.is_empty() {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
            }
            _ => field.push(c),
        }
    }
    if !row.is_empty() || !field.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

/// Encodes one row, terminator included.
pub(crate) fn encode_row<S: AsRef<str>>(cells: &[S]) -> String {
    let mut line = cells.iter().map(|cell| encode_field(cell.as_ref())).join(",");
    line.push_str("\r\n");
    line
}

fn encode_field(cell: &str) -> String {
    if cell.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_rows() {
        let rows = parse("a,b,c\r\nd,e,f\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn test_parse_strips_bom_and_blank_lines() {
        let rows = parse("\u{feff}日付,チーム名\r\n\r\n2025-04-01,中日ドラゴンズ\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "日付");
        assert_eq!(rows[1][1], "中日ドラゴンズ");
    }

    #[test]
    fn test_parse_quoted_fields() {
        let rows = parse("a,\"b,1\",\"say \"\"hi\"\"\",\"two\nlines\"\r\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "b,1");
        assert_eq!(rows[0][2], "say \"hi\"");
        assert_eq!(rows[0][3], "two\nlines");
    }

    #[test]
    fn test_parse_keeps_trailing_empty_cell() {
        let rows = parse("a,b,\r\n");
        assert_eq!(rows, vec![vec!["a", "b", ""]]);
    }

    #[test]
    fn test_encode_row_quotes_when_needed() {
        let line = encode_row(&["plain", "with,comma", "with \"quote\"", ""]);
        assert_eq!(line, "plain,\"with,comma\",\"with \"\"quote\"\"\",\r\n");
    }

    #[test]
    fn test_encode_parse_round_trip() {
        let cells = vec![
            "2025-04-01".to_string(),
            "延長12回、劇的なサヨナラ\n忘れられない".to_string(),
            "値,込み".to_string(),
        ];
        let rows = parse(&encode_row(&cells));
        assert_eq!(rows, vec![cells]);
    }
}
