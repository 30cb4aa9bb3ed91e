/// Tests for console formatting module
///
/// These tests ensure table layout stays stable: every line of a table has
/// the same display width, however long or wide the cell contents are.

#[cfg(test)]
mod tests {
    use crate::console_format::*;

    fn layout() -> TableLayout {
        TableLayout::new(vec![
            Column::new("NAME", 12, Align::Left),
            Column::new("STATUS", 8, Align::Center),
            Column::new("DETAILS", 16, Align::Left),
        ])
    }

    #[test]
    fn test_display_width_ascii() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width(""), 0);
        assert_eq!(display_width("test123"), 7);
    }

    #[test]
    fn test_display_width_unicode() {
        // Unicode box drawing characters
        assert_eq!(display_width("│"), 1);
        assert_eq!(display_width("─"), 1);
        // Emoji (wide characters)
        assert_eq!(display_width("✅"), 2);
        assert_eq!(display_width("❌"), 2);
    }

    #[test]
    fn test_truncate_with_padding_exact_fit() {
        let result = truncate_with_padding("hello", 5);
        assert_eq!(result, "hello");
        assert_eq!(display_width(&result), 5);
    }

    #[test]
    fn test_truncate_with_padding_needs_padding() {
        let result = truncate_with_padding("hi", 5);
        assert_eq!(result, "hi   ");
        assert_eq!(display_width(&result), 5);
    }

    #[test]
    fn test_truncate_with_padding_needs_truncation() {
        let result = truncate_with_padding("hello world", 8);
        assert_eq!(result, "hello...");
        assert_eq!(display_width(&result), 8);
    }

    #[test]
    fn test_truncate_with_padding_unicode() {
        let result = truncate_with_padding("test 📦 box", 10);
        assert!(result.ends_with("..."));
        assert_eq!(display_width(&result), 10);
    }

    #[test]
    fn test_fit_alignment() {
        assert_eq!(fit("ab", 6, Align::Left), "ab    ");
        assert_eq!(fit("ab", 6, Align::Right), "    ab");
        assert_eq!(fit("ab", 6, Align::Center), "  ab  ");
        assert_eq!(fit("abc", 6, Align::Center), " abc  ");
        // Overflow truncates regardless of alignment
        assert_eq!(fit("abcdefgh", 6, Align::Right), "abc...");
    }

    #[test]
    fn test_layout_widths() {
        let table = layout();
        assert_eq!(table.inner_width(), 12 + 8 + 16 + 2);
        assert_eq!(table.total_width(), table.inner_width() + 2);
    }

    #[test]
    fn test_all_lines_same_width() {
        let table = layout();
        let rows = vec![
            vec!["GPU Count", "✅", "✅ GPU Count: PASS"],
            vec!["A very long check name indeed", "❌", "short"],
            vec!["", "", ""],
        ];

        let out = table.render(Some("RESULTS"), &rows);
        let widths: Vec<usize> = out.lines().map(display_width).collect();
        assert!(widths.iter().all(|w| *w == table.total_width()), "uneven table:\n{}", out);
    }

    #[test]
    fn test_render_structure() {
        let table = layout();
        let rows: Vec<Vec<String>> = vec![vec!["one".into(), "✅".into(), "fine".into()]];
        let out = table.render(Some("RESULTS"), &rows);
        let lines: Vec<&str> = out.lines().collect();

        // top, title, rule, header, rule, one row, footer
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with('┌') && !lines[0].contains('┬'));
        assert!(lines[1].contains("RESULTS"));
        assert!(lines[2].contains('┬'));
        assert!(lines[3].contains("NAME") && lines[3].contains("STATUS") && lines[3].contains("DETAILS"));
        assert!(lines[4].contains('┼'));
        assert!(lines[5].starts_with("│ one"));
        assert!(lines[6].starts_with('└') && lines[6].contains('┴'));
    }

    #[test]
    fn test_render_without_title() {
        let table = layout();
        let rows: Vec<Vec<&str>> = Vec::new();
        let out = table.render(None, &rows);
        assert!(out.starts_with('┌'));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_missing_cells_render_blank() {
        let table = layout();
        let row = table.format_row(&["only"]);
        assert_eq!(display_width(row.trim_end_matches('\n')), table.total_width());
    }
}
