//! # Spreadsheet Paste
//!
//! Turns tab-separated clipboard text (as copied from a spreadsheet) into
//! reaction rows, starting at the focused cell.
//!
//! ```rust
//! use cap_core::ingest::{apply_paste, PasteAnchor};
//! use cap_core::reactions::ReactionRow;
//!
//! let rows = vec![ReactionRow::blank()];
//! let text = "Case1\t1\t10\t20\t0\t5\t-5\nCase2\t1\t15\t25\t0\t6\t-6";
//! let pasted = apply_paste(text, &PasteAnchor::named(0, "load_case"), &rows).unwrap();
//!
//! assert_eq!(pasted.len(), 2);
//! assert_eq!(pasted[1].load_case, "Case2");
//! assert_eq!(pasted[1].my, -6.0);
//! ```

use crate::errors::CapResult;
use crate::reactions::{ReactionField, ReactionRow};

/// Cell the paste starts at. The column is addressed by its wire name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteAnchor {
    pub row: usize,
    pub field: String,
}

impl PasteAnchor {
    pub fn new(row: usize, field: ReactionField) -> Self {
        PasteAnchor {
            row,
            field: field.name().to_string(),
        }
    }

    pub fn named(row: usize, field: impl Into<String>) -> Self {
        PasteAnchor { row, field: field.into() }
    }
}

/// Apply pasted text to a copy of `rows`.
///
/// Lines split on CR, LF or CRLF and blank lines are skipped; cells split on
/// tabs and fill columns to the right of the anchor, extra cells dropped.
/// Rows past the end of the table are appended as blank rows first. An
/// unknown anchor column fails without producing any rows.
pub fn apply_paste(text: &str, anchor: &PasteAnchor, rows: &[ReactionRow]) -> CapResult<Vec<ReactionRow>> {
    let start_field = ReactionField::from_name(&anchor.field)?.index();

    let lines: Vec<&str> = text
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .collect();

    let mut out = rows.to_vec();
    if lines.is_empty() {
        return Ok(out);
    }

    let needed = anchor.row + lines.len();
    if out.len() < needed {
        out.resize(needed, ReactionRow::blank());
    }

    for (offset, line) in lines.iter().enumerate() {
        let row = &mut out[anchor.row + offset];
        let targets = ReactionField::ALL[start_field..].iter();
        for (field, cell) in targets.zip(line.split('\t')) {
            row.set_from_text(*field, cell);
        }
    }

    tracing::debug!(lines = lines.len(), row = anchor.row, field = %anchor.field, "applied reaction paste");
    Ok(out)
}

/// Lenient number parsing for pasted and typed cells: the longest numeric
/// prefix of the trimmed text, or 0. Never NaN or infinite.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_finite() {
            return v;
        }
    }
    let prefix_len = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    (1..=prefix_len)
        .rev()
        .filter_map(|len| trimmed[..len].parse::<f64>().ok())
        .find(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CASES: &str = "Case1\t1\t10\t20\t0\t5\t-5\nCase2\t1\t15\t25\t0\t6\t-6";

    fn row(name: &str, values: [f64; 6]) -> ReactionRow {
        ReactionRow {
            load_case: name.to_string(),
            dc_factor: values[0],
            fx: values[1],
            fy: values[2],
            fz: values[3],
            mx: values[4],
            my: values[5],
        }
    }

    #[test]
    fn test_paste_two_cases_into_blank_table() {
        let rows = vec![ReactionRow::blank()];
        let out = apply_paste(TWO_CASES, &PasteAnchor::named(0, "load_case"), &rows).unwrap();
        assert_eq!(
            out,
            vec![
                row("Case1", [1.0, 10.0, 20.0, 0.0, 5.0, -5.0]),
                row("Case2", [1.0, 15.0, 25.0, 0.0, 6.0, -6.0]),
            ]
        );
    }

    #[test]
    fn test_paste_is_idempotent_on_reset_table() {
        let anchor = PasteAnchor::new(0, ReactionField::LoadCase);
        let once = apply_paste(TWO_CASES, &anchor, &[ReactionRow::blank()]).unwrap();
        let again = apply_paste(TWO_CASES, &anchor, &[ReactionRow::blank()]).unwrap();
        assert_eq!(once, again);

        // Pasting over its own output changes nothing either
        let over = apply_paste(TWO_CASES, &anchor, &once).unwrap();
        assert_eq!(once, over);
    }

    #[test]
    fn test_paste_mid_row_shifts_columns() {
        let rows = vec![row("Existing", [1.0, 1.0, 2.0, 3.0, 4.0, 5.0])];
        let out = apply_paste("7\t8\t9\t10", &PasteAnchor::new(0, ReactionField::Fz), &rows).unwrap();
        // fz, mx, my filled; the fourth cell has no column
        assert_eq!(out[0], row("Existing", [1.0, 1.0, 2.0, 7.0, 8.0, 9.0]));
    }

    #[test]
    fn test_paste_appends_past_end() {
        let rows = vec![ReactionRow::blank()];
        let out = apply_paste("A\t2", &PasteAnchor::new(3, ReactionField::LoadCase), &rows).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[1], ReactionRow::blank());
        assert_eq!(out[3].load_case, "A");
        assert_eq!(out[3].dc_factor, 2.0);
    }

    #[test]
    fn test_bad_numbers_become_zero() {
        let out = apply_paste(
            "  Strength I \tabc\tNaN\t12kips\t\tinf\t-",
            &PasteAnchor::new(0, ReactionField::LoadCase),
            &[],
        )
        .unwrap();
        let r = &out[0];
        assert_eq!(r.load_case, "Strength I");
        assert_eq!(r.dc_factor, 0.0);
        assert_eq!(r.fx, 0.0);
        assert_eq!(r.fy, 12.0);
        assert_eq!(r.fz, 0.0);
        assert_eq!(r.mx, 0.0);
        assert_eq!(r.my, 0.0);
        assert!([r.dc_factor, r.fx, r.fy, r.fz, r.mx, r.my].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_line_endings_and_blank_lines() {
        let text = "A\t1\r\n\r\n   \rB\t2\rC\t3\n";
        let out = apply_paste(text, &PasteAnchor::new(0, ReactionField::LoadCase), &[]).unwrap();
        let names: Vec<&str> = out.iter().map(|r| r.load_case.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unknown_anchor_leaves_rows() {
        let rows = vec![row("Keep", [1.0, 0.0, 0.0, 0.0, 0.0, 0.0])];
        let err = apply_paste(TWO_CASES, &PasteAnchor::named(0, "fw"), &rows).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION");
        assert_eq!(rows[0].load_case, "Keep");
    }

    #[test]
    fn test_empty_paste_changes_nothing() {
        let rows = vec![ReactionRow::blank()];
        let out = apply_paste("\n \r\n", &PasteAnchor::new(5, ReactionField::Fx), &rows).unwrap();
        assert_eq!(out, rows);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 3.5 "), 3.5);
        assert_eq!(parse_number("-2e3"), -2000.0);
        assert_eq!(parse_number("1.5.2"), 1.5);
        assert_eq!(parse_number(""), 0.0);
        assert!(parse_number("1e999").is_finite());
    }
}
