//! RECORD text codec
//!
//! Comma delimiter, double-quote quotechar, `\n` line terminator. Fields
//! are quoted only when they contain a delimiter, quote, or line break;
//! embedded quotes are doubled. The reader accepts quoted line breaks and
//! tolerates `\r\n` terminators and blank lines.

use wheelwright_errors::{Error, RecordError, Result};

/// Append one field to serialized output, quoting when required
pub(crate) fn push_field(out: &mut String, field: &str) {
    if field.contains(['"', ',', '\n', '\r']) {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Split serialized content into rows of fields
///
/// Returns each row with the line number it started on. Blank lines are
/// skipped; a final line without a terminator is accepted.
pub(crate) fn parse_rows(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut row_open = false;
    let mut line = 1;
    let mut row_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    // A doubled quote is a literal quote inside the field
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                row_open = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                row_open = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                line += 1;
                if row_open {
                    fields.push(std::mem::take(&mut field));
                    rows.push((row_line, std::mem::take(&mut fields)));
                }
                row_open = false;
                row_line = line;
            }
            _ => {
                field.push(c);
                row_open = true;
            }
        }
    }

    if in_quotes {
        return Err(Error::from(RecordError::Parse {
            line: row_line,
            message: "unterminated quoted field".to_string(),
        }));
    }
    if row_open {
        fields.push(field);
        rows.push((row_line, fields));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(text: &str) -> Vec<String> {
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows.len(), 1);
        rows.into_iter().next().unwrap().1
    }

    #[test]
    fn test_plain_row() {
        assert_eq!(row("a/b.py,abc123,10\n"), ["a/b.py", "abc123", "10"]);
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(row("a/a.py,,\n"), ["a/a.py", "", ""]);
    }

    #[test]
    fn test_quoted_delimiter_and_quote() {
        assert_eq!(row("\"a,b.py\",h,1\n"), ["a,b.py", "h", "1"]);
        assert_eq!(row("\"say \"\"hi\"\".py\",h,1\n"), ["say \"hi\".py", "h", "1"]);
    }

    #[test]
    fn test_quoted_newline() {
        let rows = parse_rows("\"odd\nname\",h,1\nnext,,\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1[0], "odd\nname");
        assert_eq!(rows[1].0, 3);
    }

    #[test]
    fn test_missing_final_terminator() {
        assert_eq!(row("a,b,c"), ["a", "b", "c"]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let rows = parse_rows("a,b,c\n\nd,e,f\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].0, 3);
    }

    #[test]
    fn test_crlf_tolerated() {
        assert_eq!(row("a,b,c\r\n"), ["a", "b", "c"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(parse_rows("\"a,b,c\n").is_err());
    }

    #[test]
    fn test_field_quoting_round_trip() {
        for field in ["plain", "with,comma", "with\"quote", "with\nnewline", ""] {
            let mut out = String::new();
            push_field(&mut out, field);
            out.push_str(",x,1\n");
            assert_eq!(row(&out)[0], field);
        }
    }
}
