//! Pipe table rows.

use crate::model::Alignment;

/// Split a table row into raw cell texts.
///
/// Leading and trailing pipes are optional. An escaped pipe (`\|`) stays in
/// the cell; the inline phase turns it into a literal `|`.
pub(super) fn split_cells(line: &str) -> Vec<String> {
    let mut row = line.trim();
    if let Some(rest) = row.strip_prefix('|') {
        row = rest;
    }
    if row.ends_with('|') && !row.ends_with("\\|") {
        row = &row[..row.len() - 1];
    }

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push_str("\\|");
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_owned()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_owned());
    cells
}

/// Alignments of a separator row such as `| :--- | :-: | --: |`.
pub(super) fn separator(line: &str) -> Option<Vec<Alignment>> {
    if !line.contains('|') {
        return None;
    }
    split_cells(line)
        .iter()
        .map(|cell| {
            let left = cell.starts_with(':');
            let right = cell.ends_with(':') && cell.len() > 1;
            let dashes = cell.trim_start_matches(':').trim_end_matches(':');
            if dashes.is_empty() || !dashes.chars().all(|c| c == '-') {
                return None;
            }
            Some(match (left, right) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            })
        })
        .collect()
}

/// Whether `header` followed by `next` starts a table.
pub(super) fn starts_table(header: &str, next: Option<&str>) -> bool {
    if !header.contains('|') {
        return false;
    }
    next.and_then(separator)
        .is_some_and(|alignments| alignments.len() == split_cells(header).len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_cells() {
        assert_eq!(split_cells("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_cells("a | b"), vec!["a", "b"]);
        assert_eq!(split_cells("| a |  |"), vec!["a", ""]);
    }

    #[test]
    fn test_escaped_pipe_stays_in_cell() {
        assert_eq!(split_cells(r"| a \| b | c |"), vec![r"a \| b", "c"]);
        assert_eq!(split_cells(r"| a \|"), vec![r"a \|"]);
    }

    #[test]
    fn test_separator_alignments() {
        assert_eq!(
            separator("| --- | :-- | :-: | --: |"),
            Some(vec![
                Alignment::None,
                Alignment::Left,
                Alignment::Center,
                Alignment::Right,
            ])
        );
    }

    #[test]
    fn test_separator_rejects_other_rows() {
        assert_eq!(separator("| a | b |"), None);
        assert_eq!(separator("---"), None);
        assert_eq!(separator("| : |"), None);
    }

    #[test]
    fn test_starts_table_requires_matching_width() {
        assert!(starts_table("| a | b |", Some("|---|---|")));
        assert!(!starts_table("| a | b |", Some("|---|")));
        assert!(!starts_table("| a | b |", None));
        assert!(!starts_table("a b", Some("|---|")));
    }
}
