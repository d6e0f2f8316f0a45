//! CSV → [`CandidateRecord`] parsing.
//!
//! Deliberately small: `,` separates fields, `"` toggles quoting, `""` inside
//! a quoted field is a literal quote. There is no multi-line field support;
//! every data line is one candidate.

use crate::candidates::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::candidates::record::CandidateRecord;
use crate::candidates::schema::CandidateSchema;

const FIELD_DELIMITER: char = ',';
const QUOTE: char = '"';

/// Splits the header line into trimmed column names.
pub fn split_header(line: &str) -> Vec<String> {
    line.split(FIELD_DELIMITER)
        .map(|name| name.trim().to_string())
        .collect()
}

/// Splits one data line into positional values.
///
/// Returns the values and whether the line ended inside an open quote. An
/// unterminated quote is closed implicitly at end of line.
pub fn split_line(line: &str) -> (Vec<String>, bool) {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            QUOTE if in_quotes && chars.peek() == Some(&QUOTE) => {
                current.push(QUOTE);
                chars.next();
            }
            QUOTE => in_quotes = !in_quotes,
            FIELD_DELIMITER if !in_quotes => values.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    values.push(current);
    (values, in_quotes)
}

/// Parses a whole CSV document. The first non-empty line is the header.
///
/// Every non-blank data line yields a record, in source order. Lines with
/// more values than the header are kept and the extra values reported.
pub fn parse_csv(
    text: &str,
    schema: &CandidateSchema,
    diagnostics: &mut Diagnostics,
) -> Vec<CandidateRecord> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = text.lines();
    let headers = match lines.next() {
        Some(header) => split_header(header),
        None => return Vec::new(),
    };

    let mut records = Vec::new();
    for (idx, line) in lines.enumerate() {
        // header is line 1
        let line_no = idx + 2;

        if line.trim().is_empty() {
            diagnostics.record(
                Diagnostic::new(DiagnosticKind::BlankLine, "Skipping blank line").at_line(line_no),
            );
            continue;
        }

        let (values, unterminated) = split_line(line);
        if unterminated {
            diagnostics.record(
                Diagnostic::new(
                    DiagnosticKind::UnterminatedQuote,
                    "Unclosed quote; field closed at end of line",
                )
                .at_line(line_no),
            );
        }

        if values.len() > headers.len() {
            diagnostics.record(
                Diagnostic::new(
                    DiagnosticKind::ExtraValues,
                    format!(
                        "Line has {} values but the header declares {}; ignoring the extra values",
                        values.len(),
                        headers.len()
                    ),
                )
                .at_line(line_no),
            );
        }

        records.push(CandidateRecord::from_row(schema, &headers, &values));
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::record::FieldValue;

    fn parse(text: &str) -> (Vec<CandidateRecord>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let records = parse_csv(text, &CandidateSchema::default(), &mut diags);
        (records, diags)
    }

    #[test]
    fn test_split_line_plain() {
        let (values, open) = split_line("a,b,,c");
        assert_eq!(values, vec!["a", "b", "", "c"]);
        assert!(!open);
    }

    #[test]
    fn test_split_line_quoted_delimiter_is_literal() {
        let (values, _) = split_line(r#"1,"Cape Town, South Africa",x"#);
        assert_eq!(values, vec!["1", "Cape Town, South Africa", "x"]);
    }

    #[test]
    fn test_split_line_doubled_quote_collapses() {
        let (values, _) = split_line(r#""she said ""hi""",2"#);
        assert_eq!(values, vec![r#"she said "hi""#, "2"]);
    }

    #[test]
    fn test_split_line_unterminated_quote_is_tolerated() {
        let (values, open) = split_line(r#"1,"never closed, still here"#);
        assert_eq!(values, vec!["1", "never closed, still here"]);
        assert!(open);
    }

    #[test]
    fn test_parse_generated_rows_in_order() {
        let mut csv = String::from("id,full_name,years_experience,skills,willing_to_relocate\n");
        for i in 0..25 {
            let relocate = if i % 2 == 0 { "Yes" } else { "no" };
            csv.push_str(&format!("{i},Person {i},{},Rust;SQL,{relocate}\n", i % 7));
        }

        let (records, diags) = parse(&csv);
        assert!(diags.is_empty());
        assert_eq!(records.len(), 25);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id(), Some(i.to_string().as_str()));
            assert_eq!(record.text("full_name"), Some(format!("Person {i}").as_str()));
            assert_eq!(record.number("years_experience"), Some((i % 7) as f64));
            assert_eq!(record.list("skills"), &["Rust".to_string(), "SQL".to_string()]);
            assert_eq!(
                record.get("willing_to_relocate"),
                Some(&FieldValue::Flag(i % 2 == 0))
            );
        }
    }

    #[test]
    fn test_parse_handles_crlf_line_endings() {
        let (records, _) = parse("id,title\r\n1,Engineer\r\n2,Designer\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text("title"), Some("Designer"));
    }

    #[test]
    fn test_extra_values_keep_the_record() {
        // unquoted comma in a free-text cell, then a trailing comma
        let (records, diags) = parse(
            "id,title,summary\n1,Engineer,Loves Rust, Go\n2,Designer,ok,\n3,Manager,fine\n",
        );
        let ids: Vec<_> = records.iter().filter_map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(records[0].text("summary"), Some("Loves Rust"));
        assert_eq!(records[1].text("summary"), Some("ok"));

        let extra: Vec<_> = diags
            .iter()
            .filter(|d| d.kind == DiagnosticKind::ExtraValues)
            .map(|d| d.line)
            .collect();
        assert_eq!(extra, vec![Some(2), Some(3)]);
    }

    #[test]
    fn test_unterminated_quote_reports_and_keeps_record() {
        let (records, diags) = parse("id,summary\n1,\"open ended\n2,fine\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text("summary"), Some("open ended"));
        assert!(diags.has(DiagnosticKind::UnterminatedQuote));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let (records, diags) = parse("id,title\n1,A\n\n2,B\n");
        assert_eq!(records.len(), 2);
        assert!(diags.has(DiagnosticKind::BlankLine));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let (records, diags) = parse("   \n");
        assert!(records.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let (records, _) = parse("id,title,skills\n");
        assert!(records.is_empty());
    }
}
