//! Formatted output helpers for CLI commands.

/// Renders `(left, right)` rows as two aligned columns.
///
/// The left column is padded to the widest entry; rows end with a newline.
#[must_use]
pub fn format_columns(rows: &[(String, String)]) -> String {
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(left, right)| format!("{left:<width$}  {right}\n"))
        .collect()
}

/// Pluralises `noun` for `count` items, e.g. `1 resource`, `3 resources`.
#[must_use]
pub fn count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_columns_aligns_left_column() {
        let rows = vec![
            ("job=compile".to_owned(), "Run the 'b' image".to_owned()),
            ("mount=src".to_owned(), "Mount '.' at '/src'".to_owned()),
        ];
        assert_eq!(
            format_columns(&rows),
            "job=compile  Run the 'b' image\nmount=src    Mount '.' at '/src'\n"
        );
    }

    #[test]
    fn format_columns_empty() {
        assert_eq!(format_columns(&[]), "");
    }

    #[test]
    fn count_pluralises() {
        assert_eq!(count(0, "resource"), "0 resources");
        assert_eq!(count(1, "resource"), "1 resource");
        assert_eq!(count(4, "resource"), "4 resources");
    }
}
