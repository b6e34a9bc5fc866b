//! ANSI-aware text measurement and layout
//!
//! Handles:
//! - Display-width accounting that ignores SGR style sequences
//! - Padding and ellipsis truncation that keep styled columns aligned
//! - Fitting a block of rows into a fixed row budget

const ESC: char = '\u{1b}';
/// Single-cell truncation marker
pub const ELLIPSIS: char = '…';

/// One parsed run of a styled string: either a zero-width control
/// sequence or printable text
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Style(String),
    Text(String),
}

/// Split a string into alternating style and text segments. Any CSI
/// sequence (`ESC [ ... <final byte>`) counts as a zero-width style run.
pub fn parse_segments(s: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ESC && chars.peek() == Some(&'[') {
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            let mut style = String::from(ESC);
            style.push(chars.next().unwrap_or('['));
            for sc in chars.by_ref() {
                style.push(sc);
                if sc.is_ascii_alphabetic() {
                    break;
                }
            }
            segments.push(Segment::Style(style));
        } else {
            text.push(c);
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

/// Printable width in terminal cells (style sequences weigh nothing)
pub fn display_width(s: &str) -> usize {
    parse_segments(s)
        .iter()
        .map(|seg| match seg {
            Segment::Text(t) => t.chars().count(),
            Segment::Style(_) => 0,
        })
        .sum()
}

/// Cut a styled string down to `width` printable cells, ending in a
/// single ellipsis. Style runs before the cut are kept in place (a
/// leading color prefix survives) and style runs after the cut are
/// appended so trailing resets still fire.
pub fn truncate_to(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let keep = width - 1; // room for the ellipsis
    let mut out = String::new();
    let mut used = 0;
    let mut cut = false;

    for segment in parse_segments(s) {
        match segment {
            Segment::Style(style) => out.push_str(&style),
            Segment::Text(t) => {
                if cut {
                    continue;
                }
                for c in t.chars() {
                    if used == keep {
                        cut = true;
                        break;
                    }
                    out.push(c);
                    used += 1;
                }
                if cut {
                    out.push(ELLIPSIS);
                }
            }
        }
    }

    out
}

/// Pad with trailing spaces (or truncate) to exactly `width` printable cells
pub fn pad_to(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current > width {
        return truncate_to(s, width);
    }
    let mut out = s.to_string();
    out.extend(std::iter::repeat(' ').take(width - current));
    out
}

/// Fit rows into a fixed budget: extra rows are dropped (earliest kept),
/// missing rows are blank-padded, and every row is squared to `width`
pub fn fit_rows(rows: Vec<String>, budget: usize, width: usize) -> Vec<String> {
    let mut fitted: Vec<String> = rows
        .into_iter()
        .take(budget)
        .map(|row| pad_to(&row, width))
        .collect();
    while fitted.len() < budget {
        fitted.push(" ".repeat(width));
    }
    fitted
}
