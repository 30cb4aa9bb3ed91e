/// Console formatting module - Pure rendering concerns
///
/// This module handles fixed-width box-drawn tables:
/// - Column widths and alignment, declared once per table
/// - Text truncation and padding by display width (emoji are two columns)
/// - Borders, title band and header row
///
/// It knows nothing about check results. Callers hand it rows of cells
/// and get back a finished string.
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Horizontal placement of text inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One table column. `width` includes the single space of padding on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub width: usize,
    pub align: Align,
}

impl Column {
    pub fn new(title: &str, width: usize, align: Align) -> Self {
        Self { title: title.to_string(), width, align }
    }

    /// Room for text once padding is taken off
    fn content_width(&self) -> usize {
        self.width.saturating_sub(2)
    }
}

/// Column layout for a box-drawn table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    columns: Vec<Column>,
}

impl TableLayout {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Width between the outer borders
    pub fn inner_width(&self) -> usize {
        let cells: usize = self.columns.iter().map(|c| c.width).sum();
        cells + self.columns.len().saturating_sub(1)
    }

    /// Display width of every line the table produces
    pub fn total_width(&self) -> usize {
        self.inner_width() + 2
    }

    fn rule(&self, left: char, join: char, right: char) -> String {
        let mut line = String::new();
        line.push(left);
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                line.push(join);
            }
            line.push_str(&"─".repeat(col.width));
        }
        line.push(right);
        line.push('\n');
        line
    }

    /// Top border with no column joints, sitting above a title band
    pub fn format_title(&self, title: &str) -> String {
        let width = self.inner_width();
        let mut out = format!("┌{:─<width$}┐\n", "", width = width);
        out.push_str(&format!("│{}│\n", fit(title, width, Align::Center)));
        out.push_str(&self.rule('├', '┬', '┤'));
        out
    }

    /// Top border for a table without a title band
    pub fn format_top_border(&self) -> String {
        self.rule('┌', '┬', '┐')
    }

    pub fn format_header(&self) -> String {
        let titles: Vec<&str> = self.columns.iter().map(|c| c.title.as_str()).collect();
        let mut out = self.format_row(&titles);
        out.push_str(&self.rule('├', '┼', '┤'));
        out
    }

    /// Format one row. Missing cells render blank; extra cells are ignored.
    pub fn format_row(&self, cells: &[&str]) -> String {
        let mut line = String::from("│");
        for (i, col) in self.columns.iter().enumerate() {
            let cell = cells.get(i).copied().unwrap_or("");
            line.push(' ');
            line.push_str(&fit(cell, col.content_width(), col.align));
            line.push_str(" │");
        }
        line.push('\n');
        line
    }

    pub fn format_footer(&self) -> String {
        self.rule('└', '┴', '┘')
    }

    /// Whole table: optional title band, header, rows, footer.
    pub fn render<R: AsRef<str>>(&self, title: Option<&str>, rows: &[Vec<R>]) -> String {
        let mut out = match title {
            Some(title) => self.format_title(title),
            None => self.format_top_border(),
        };
        out.push_str(&self.format_header());
        for row in rows {
            let cells: Vec<&str> = row.iter().map(|c| c.as_ref()).collect();
            out.push_str(&self.format_row(&cells));
        }
        out.push_str(&self.format_footer());
        out
    }
}

/// Get display width of string (accounting for Unicode)
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);

    if display_w > width {
        let mut result = String::new();
        let mut current_width = 0;

        // Reserve space for "..."
        let target_width = if width >= 3 { width - 3 } else { width };

        for c in s.chars() {
            let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
            if current_width + c_width > target_width {
                break;
            }
            result.push(c);
            current_width += c_width;
        }

        if width >= 3 {
            result.push_str("...");
            current_width += 3;
        }

        // A wide char that didn't fit leaves a one-column gap
        if current_width < width {
            result.push_str(&" ".repeat(width - current_width));
        }

        result
    } else {
        format!("{}{}", s, " ".repeat(width - display_w))
    }
}

/// Truncate if too wide, otherwise pad according to `align`
pub fn fit(s: &str, width: usize, align: Align) -> String {
    let display_w = display_width(s);
    if display_w >= width {
        return truncate_with_padding(s, width);
    }

    let gap = width - display_w;
    match align {
        Align::Left => format!("{}{}", s, " ".repeat(gap)),
        Align::Right => format!("{}{}", " ".repeat(gap), s),
        Align::Center => {
            let left = gap / 2;
            format!("{}{}{}", " ".repeat(left), s, " ".repeat(gap - left))
        }
    }
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
