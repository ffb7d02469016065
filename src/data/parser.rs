use std::path::Path;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Header, Row};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How the source text is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// Header line followed by delimited records.
    Delimited,
    /// Records-oriented JSON: `[{ "col": value, ... }, ...]`.
    JsonRecords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub format: TextFormat,
    pub delimiter: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            format: TextFormat::Delimited,
            delimiter: b',',
        }
    }
}

impl ParseOptions {
    /// Pick format and delimiter from a file name or URL path.
    /// Unknown extensions fall back to comma-separated text.
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "tsv" | "tab" => Self::default().with_delimiter(b'\t'),
            "psv" => Self::default().with_delimiter(b'|'),
            "json" => Self {
                format: TextFormat::JsonRecords,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A record-level problem. Parsing continues past every one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("row {row}: expected {expected} fields but found {found}")]
    TooFewFields {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}: expected {expected} fields but found {found}, extra fields dropped")]
    TooManyFields {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}: {message}")]
    Malformed { row: usize, message: String },
    #[error("unreadable header: {0}")]
    Header(String),
}

/// Parsed rows plus everything that went wrong along the way.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub rows: Vec<Row>,
    pub errors: Vec<ParseError>,
}

/// Parse source text into rows. Never fails outright: whatever records can
/// be read become rows, the rest are reported in `errors`.
pub fn parse(text: &str, options: &ParseOptions) -> ParseOutput {
    match options.format {
        TextFormat::Delimited => parse_delimited(text, options.delimiter),
        TextFormat::JsonRecords => parse_json_records(text),
    }
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// First record is the header. Short records produce rows without the
/// trailing columns; long records lose the surplus fields. Blank lines are
/// skipped.
fn parse_delimited(text: &str, delimiter: u8) -> ParseOutput {
    let mut out = ParseOutput::default();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let names: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(str::to_string).collect(),
        Err(e) => {
            out.errors.push(ParseError::Header(e.to_string()));
            return out;
        }
    };
    if names.is_empty() {
        return out;
    }

    // Built once for the file: every row shares it. `slots[field]` is the
    // header position a field lands in; repeated names share a slot so the
    // later field wins.
    let header = Arc::new(Header::new(names.iter().map(String::as_str)));
    let slots: Vec<usize> = names
        .iter()
        .filter_map(|name| header.position(name))
        .collect();
    let expected = slots.len();

    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                out.errors.push(ParseError::Malformed {
                    row: row_no,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let found = record.len();
        if found < expected {
            out.errors.push(ParseError::TooFewFields {
                row: row_no,
                expected,
                found,
            });
        } else if found > expected {
            out.errors.push(ParseError::TooManyFields {
                row: row_no,
                expected,
                found,
            });
        }

        // Slots first appear in increasing order, so the filled ones form a prefix.
        let filled = slots[..found.min(expected)]
            .iter()
            .max()
            .map_or(0, |&last| last + 1);
        let mut values = vec![String::new(); filled];
        for (&slot, field) in slots.iter().zip(record.iter()) {
            values[slot] = field.to_string();
        }
        out.rows.push(Row::new(Arc::clone(&header), values));
    }

    out
}

// ---------------------------------------------------------------------------
// JSON records
// ---------------------------------------------------------------------------

/// Expected layout (the `orient='records'` shape):
///
/// ```json
/// [
///   { "Quarter": "1", "Play": "Run", "Yards": 4 },
///   ...
/// ]
/// ```
///
/// Keys keep document order. Strings are taken as-is, `null` becomes the
/// empty string and every other value its JSON text.
fn parse_json_records(text: &str) -> ParseOutput {
    let mut out = ParseOutput::default();
    let root: JsonValue = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            out.errors.push(ParseError::Header(e.to_string()));
            return out;
        }
    };
    let Some(records) = root.as_array() else {
        out.errors
            .push(ParseError::Header("expected top-level JSON array".to_string()));
        return out;
    };

    for (row_no, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            out.errors.push(ParseError::Malformed {
                row: row_no,
                message: "not a JSON object".to_string(),
            });
            continue;
        };
        out.rows.push(Row::from_pairs(
            obj.iter().map(|(key, val)| (key.as_str(), json_to_cell(val))),
        ));
    }

    out
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::infer_schema;

    fn keys(row: &Row) -> Vec<&str> {
        row.keys().map(|k| &**k).collect()
    }

    #[test]
    fn header_defines_keys() {
        let out = parse("Quarter,Play\n1,Run\n2,Pass\n", &ParseOptions::default());
        assert!(out.errors.is_empty());
        assert_eq!(out.rows.len(), 2);
        assert_eq!(keys(&out.rows[0]), ["Quarter", "Play"]);
        assert_eq!(out.rows[1].get("Play"), Some("Pass"));
    }

    #[test]
    fn quoted_fields_keep_delimiters_and_whitespace() {
        let out = parse(
            "Desc,Yards\n\"Run, left \",4\n",
            &ParseOptions::default(),
        );
        assert_eq!(out.rows[0].get("Desc"), Some("Run, left "));
    }

    #[test]
    fn short_record_lacks_trailing_keys() {
        let out = parse("a,b,c\n1,2\n", &ParseOptions::default());
        assert_eq!(keys(&out.rows[0]), ["a", "b"]);
        assert_eq!(
            out.errors,
            vec![ParseError::TooFewFields {
                row: 0,
                expected: 3,
                found: 2
            }]
        );
    }

    #[test]
    fn long_record_drops_surplus_fields() {
        let out = parse("a,b\n1,2,3\n4,5\n", &ParseOptions::default());
        assert_eq!(out.rows.len(), 2);
        assert_eq!(keys(&out.rows[0]), ["a", "b"]);
        assert!(matches!(
            out.errors[..],
            [ParseError::TooManyFields { row: 0, .. }]
        ));
    }

    #[test]
    fn repeated_header_takes_the_later_field() {
        let out = parse("a,b,a\n1,2,3\n4,5\n", &ParseOptions::default());
        assert_eq!(keys(&out.rows[0]), ["a", "b"]);
        assert_eq!(out.rows[0].get("a"), Some("3"));
        assert_eq!(out.rows[1].get("a"), Some("4"));
        assert_eq!(out.rows[1].get("b"), Some("5"));
    }

    #[test]
    fn wide_file_reads_every_cell() {
        let width = 400;
        let header: Vec<String> = (0..width).map(|c| format!("col{c}")).collect();
        let mut text = header.join(",");
        text.push('\n');
        for r in 0..200 {
            let record: Vec<String> = (0..width).map(|c| format!("{r}-{c}")).collect();
            text.push_str(&record.join(","));
            text.push('\n');
        }

        let out = parse(&text, &ParseOptions::default());
        assert!(out.errors.is_empty());
        assert_eq!(out.rows.len(), 200);
        assert_eq!(keys(&out.rows[0]).len(), width);
        assert_eq!(out.rows[0].get("col0"), Some("0-0"));
        assert_eq!(out.rows[199].get("col399"), Some("199-399"));
        assert_eq!(out.rows[123].get("col250"), Some("123-250"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let out = parse("a,b\n1,2\n\n3,4\n\n", &ParseOptions::default());
        assert_eq!(out.rows.len(), 2);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn empty_text_gives_no_rows_and_empty_schema() {
        let out = parse("", &ParseOptions::default());
        assert!(out.rows.is_empty());
        assert!(infer_schema(&out.rows).is_empty());
    }

    #[test]
    fn header_only_gives_no_rows() {
        let out = parse("a,b\n", &ParseOptions::default());
        assert!(out.rows.is_empty());
        assert!(out.errors.is_empty());
    }

    #[test]
    fn custom_delimiter() {
        let opts = ParseOptions::default().with_delimiter(b';');
        let out = parse("a;b\n1;2\n", &opts);
        assert_eq!(out.rows[0].get("b"), Some("2"));
    }

    #[test]
    fn options_follow_extension() {
        assert_eq!(ParseOptions::for_path(Path::new("x.TSV")).delimiter, b'\t');
        assert_eq!(ParseOptions::for_path(Path::new("x.psv")).delimiter, b'|');
        assert_eq!(
            ParseOptions::for_path(Path::new("x.json")).format,
            TextFormat::JsonRecords
        );
        assert_eq!(
            ParseOptions::for_path(Path::new("Nebraska 24.csv")),
            ParseOptions::default()
        );
    }

    #[test]
    fn json_records_keep_key_order_and_stringify() {
        let text = r#"[{"Quarter": 1, "Play": "Run", "Note": null}, 5, {"Play": "Pass", "Quarter": 2}]"#;
        let opts = ParseOptions {
            format: TextFormat::JsonRecords,
            ..ParseOptions::default()
        };
        let out = parse(text, &opts);
        assert_eq!(out.rows.len(), 2);
        assert_eq!(keys(&out.rows[0]), ["Quarter", "Play", "Note"]);
        assert_eq!(out.rows[0].get("Quarter"), Some("1"));
        assert_eq!(out.rows[0].get("Note"), Some(""));
        assert_eq!(keys(&out.rows[1]), ["Play", "Quarter"]);
        assert!(matches!(out.errors[..], [ParseError::Malformed { row: 1, .. }]));
    }

    #[test]
    fn json_that_is_not_an_array_is_reported() {
        let opts = ParseOptions {
            format: TextFormat::JsonRecords,
            ..ParseOptions::default()
        };
        let out = parse(r#"{"a": 1}"#, &opts);
        assert!(out.rows.is_empty());
        assert_eq!(out.errors.len(), 1);
    }
}
