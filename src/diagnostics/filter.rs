//! # Target selection.
//!
//! - [`select`] keeps diagnostics whose source or code is enabled and orders them
//!   ascending by start position (stable: equal positions keep input order).
//! - [`traversal_order`] reverses that order. Fixing from the bottom of the
//!   document up means an edit never moves a range that is still to be visited.
//! - [`on_line`] is the caret-line variant used by `run_for_line`.
//!
//! Empty input yields empty output; nothing here can fail.

use crate::{
    config::Config,
    diagnostics::{Diagnostic, Range},
};

/// Filters `raw` to enabled sources/codes and sorts by `(line, column)`.
///
/// # Example
/// ```rust
/// use fixrunner::{Config, Diagnostic, Range, select};
///
/// let cfg = Config { enabled_ids: vec!["E1".into()], ..Config::default() };
/// let raw = vec![
///     Diagnostic::new(Range::from_coords(5, 0, 5, 3)).with_code("E1"),
///     Diagnostic::new(Range::from_coords(2, 0, 2, 4)).with_code("E1"),
///     Diagnostic::new(Range::from_coords(1, 0, 1, 1)).with_code("W9"),
/// ];
///
/// let lines: Vec<u32> = select(&raw, &cfg).iter().map(|d| d.range.start.line).collect();
/// assert_eq!(lines, vec![2, 5]);
/// ```
pub fn select(raw: &[Diagnostic], cfg: &Config) -> Vec<Diagnostic> {
    let picked = raw
        .iter()
        .filter(|d| is_enabled(d, cfg))
        .cloned()
        .collect();
    sort_by_position(picked)
}

/// Stable ascending sort by start position.
pub fn sort_by_position(mut items: Vec<Diagnostic>) -> Vec<Diagnostic> {
    items.sort_by_key(|d| d.range.start);
    items
}

/// Turns an ascending selection into the order a run visits it (highest first).
pub fn traversal_order(mut ascending: Vec<Diagnostic>) -> Vec<Diagnostic> {
    ascending.reverse();
    ascending
}

/// Diagnostics intersecting the caret line, ascending.
///
/// A multi-line `selection` matches nothing (the caller falls back to a single
/// fix invocation).
pub fn on_line(raw: &[Diagnostic], selection: Range) -> Vec<Diagnostic> {
    if !selection.is_single_line() {
        return Vec::new();
    }
    let line = selection.start.line;
    let picked = raw
        .iter()
        .filter(|d| d.range.touches_line(line))
        .cloned()
        .collect();
    sort_by_position(picked)
}

fn is_enabled(d: &Diagnostic, cfg: &Config) -> bool {
    if let Some(source) = d.source.as_deref()
        && cfg.is_enabled(source)
    {
        return true;
    }
    d.code_text().is_some_and(|code| cfg.is_enabled(&code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cfg(ids: &[&str]) -> Config {
        Config {
            enabled_ids: ids.iter().map(|s| s.to_string()).collect(),
            ..Config::default()
        }
    }

    fn at(line: u32, col: u32) -> Diagnostic {
        Diagnostic::new(Range::from_coords(line, col, line, col + 1))
    }

    fn starts(items: &[Diagnostic]) -> Vec<(u32, u32)> {
        items
            .iter()
            .map(|d| (d.range.start.line, d.range.start.character))
            .collect()
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(select(&[], &cfg(&["E1"])).is_empty());
        assert!(traversal_order(Vec::new()).is_empty());
    }

    #[test]
    fn drops_unmatched_silently() {
        let raw = vec![at(1, 0).with_code("E1"), at(2, 0).with_code("W2"), at(3, 0)];
        let out = select(&raw, &cfg(&["E1"]));
        assert_eq!(starts(&out), vec![(1, 0)]);
    }

    #[test]
    fn matches_on_source_or_code() {
        let raw = vec![
            at(1, 0).with_source("eslint").with_code("semi"),
            at(2, 0).with_source("tsc").with_code(2304),
            at(3, 0).with_source("pylint").with_code("C0114"),
        ];
        let out = select(&raw, &cfg(&["eslint", "2304"]));
        assert_eq!(starts(&out), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn sorts_by_line_then_column() {
        let raw = vec![
            at(4, 2).with_code("E"),
            at(1, 9).with_code("E"),
            at(4, 0).with_code("E"),
            at(2, 5).with_code("E"),
        ];
        let out = select(&raw, &cfg(&["E"]));
        assert_eq!(starts(&out), vec![(1, 9), (2, 5), (4, 0), (4, 2)]);
    }

    #[test]
    fn ties_keep_input_order() {
        let raw = vec![
            at(3, 1).with_code("E").with_message("first"),
            at(0, 0).with_code("E").with_message("zero"),
            at(3, 1).with_code("E").with_message("second"),
            at(3, 1).with_code("E").with_message("third"),
        ];
        let out = select(&raw, &cfg(&["E"]));
        let msgs: Vec<&str> = out.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs, vec!["zero", "first", "second", "third"]);
    }

    #[test]
    fn traversal_is_strictly_descending_for_distinct_positions() {
        let raw = vec![
            at(5, 0).with_code("E1"),
            at(2, 0).with_code("E1"),
            at(9, 3).with_code("E1"),
        ];
        let order = traversal_order(select(&raw, &cfg(&["E1"])));
        assert_eq!(starts(&order), vec![(9, 3), (5, 0), (2, 0)]);
        assert!(order.windows(2).all(|w| w[0].range.start > w[1].range.start));
    }

    #[test]
    fn worked_example() {
        let raw = vec![
            Diagnostic::new(Range::from_coords(5, 0, 5, 3)).with_code("E1"),
            Diagnostic::new(Range::from_coords(2, 0, 2, 4)).with_code("E1"),
        ];
        let sorted = select(&raw, &cfg(&["E1"]));
        assert_eq!(starts(&sorted), vec![(2, 0), (5, 0)]);
        assert_eq!(starts(&traversal_order(sorted)), vec![(5, 0), (2, 0)]);
    }

    #[test]
    fn on_line_picks_intersecting_ranges() {
        let raw = vec![
            Diagnostic::new(Range::from_coords(7, 4, 7, 9)),
            Diagnostic::new(Range::from_coords(6, 0, 8, 1)),
            Diagnostic::new(Range::from_coords(7, 0, 7, 2)),
            Diagnostic::new(Range::from_coords(9, 0, 9, 1)),
        ];
        let caret = Range::from_coords(7, 3, 7, 3);
        assert_eq!(starts(&on_line(&raw, caret)), vec![(6, 0), (7, 0), (7, 4)]);
    }

    #[test]
    fn on_line_ignores_multi_line_selection() {
        let raw = vec![Diagnostic::new(Range::from_coords(7, 4, 7, 9))];
        assert!(on_line(&raw, Range::from_coords(7, 0, 8, 0)).is_empty());
    }
}
