//! Plain-text table rendering for markdown output.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Supported table styles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableFormat {
    /// GitHub flavoured markdown
    #[default]
    Github,
    /// Markdown with alignment colons
    Pipe,
    Simple,
    Grid,
    Plain,
    Html,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown table format: {0}")]
pub struct UnknownTableFormat(pub String);

impl TableFormat {
    pub const ALL: [TableFormat; 6] = [
        TableFormat::Github,
        TableFormat::Pipe,
        TableFormat::Simple,
        TableFormat::Grid,
        TableFormat::Plain,
        TableFormat::Html,
    ];

    /// Resolves an optional, caller-supplied format name.
    ///
    /// No name selects [`TableFormat::Github`]; an unrecognised name falls
    /// back to [`TableFormat::Simple`].
    pub fn resolve(name: Option<&str>) -> Self {
        match name {
            None => TableFormat::Github,
            Some(name) => name.parse().unwrap_or(TableFormat::Simple),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableFormat::Github => "github",
            TableFormat::Pipe => "pipe",
            TableFormat::Simple => "simple",
            TableFormat::Grid => "grid",
            TableFormat::Plain => "plain",
            TableFormat::Html => "html",
        }
    }
}

impl FromStr for TableFormat {
    type Err = UnknownTableFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        TableFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == name)
            .ok_or_else(|| UnknownTableFormat(s.to_string()))
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A header row plus data rows, rendered on demand in any [`TableFormat`].
///
/// Cells are single-line: embedded newlines are collapsed to spaces. Short
/// rows are padded with empty cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(cells);
        self
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, format: TableFormat) -> String {
        let cells = Cells::prepare(self, format);
        match format {
            TableFormat::Github => render_markdown(&cells, false),
            TableFormat::Pipe => render_markdown(&cells, true),
            TableFormat::Simple => render_simple(&cells, true),
            TableFormat::Plain => render_simple(&cells, false),
            TableFormat::Grid => render_grid(&cells),
            TableFormat::Html => render_html(&cells),
        }
    }
}

struct Cells {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl Cells {
    fn prepare(table: &Table, format: TableFormat) -> Self {
        let columns = table
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(table.headers.len()))
            .max()
            .unwrap_or(0);

        let clean = |cells: &[String]| -> Vec<String> {
            (0..columns)
                .map(|i| {
                    let cell = cells.get(i).map(String::as_str).unwrap_or("");
                    clean_cell(cell, format)
                })
                .collect()
        };

        let headers = if table.headers.is_empty() {
            Vec::new()
        } else {
            clean(&table.headers)
        };
        let rows: Vec<Vec<String>> = table.rows.iter().map(|row| clean(row)).collect();

        let mut widths = vec![0; columns];
        for line in std::iter::once(&headers).chain(rows.iter()) {
            for (i, cell) in line.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        Self {
            headers,
            rows,
            widths,
        }
    }

    fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }
}

fn clean_cell(cell: &str, format: TableFormat) -> String {
    let single_line = cell
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    match format {
        TableFormat::Github | TableFormat::Pipe => single_line.replace('|', "\\|"),
        TableFormat::Html => html_escape(&single_line),
        _ => single_line,
    }
}

fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

fn join_lines(lines: Vec<String>) -> String {
    lines
        .into_iter()
        .map(|line| line.trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_markdown(cells: &Cells, aligned: bool) -> String {
    let line = |row: &[String]| {
        let inner = row
            .iter()
            .zip(&cells.widths)
            .map(|(cell, width)| format!(" {} ", pad(cell, *width)))
            .collect::<Vec<_>>()
            .join("|");
        format!("|{}|", inner)
    };

    let mut lines = Vec::new();
    if cells.has_headers() {
        lines.push(line(&cells.headers));
        let separator = cells
            .widths
            .iter()
            .map(|width| {
                if aligned {
                    format!(":{}", "-".repeat(width + 1))
                } else {
                    "-".repeat(width + 2)
                }
            })
            .collect::<Vec<_>>()
            .join("|");
        lines.push(format!("|{}|", separator));
    }
    lines.extend(cells.rows.iter().map(|row| line(row)));
    join_lines(lines)
}

fn render_simple(cells: &Cells, underline: bool) -> String {
    let line = |row: &[String]| {
        row.iter()
            .zip(&cells.widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut lines = Vec::new();
    if cells.has_headers() {
        lines.push(line(&cells.headers));
        if underline {
            lines.push(
                cells
                    .widths
                    .iter()
                    .map(|width| "-".repeat(*width))
                    .collect::<Vec<_>>()
                    .join("  "),
            );
        }
    }
    lines.extend(cells.rows.iter().map(|row| line(row)));
    join_lines(lines)
}

fn render_grid(cells: &Cells) -> String {
    let border = |fill: char| {
        let inner = cells
            .widths
            .iter()
            .map(|width| fill.to_string().repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+");
        format!("+{}+", inner)
    };
    let line = |row: &[String]| {
        let inner = row
            .iter()
            .zip(&cells.widths)
            .map(|(cell, width)| format!(" {} ", pad(cell, *width)))
            .collect::<Vec<_>>()
            .join("|");
        format!("|{}|", inner)
    };

    let mut lines = vec![border('-')];
    if cells.has_headers() {
        lines.push(line(&cells.headers));
        lines.push(border('='));
    }
    for row in &cells.rows {
        lines.push(line(row));
        lines.push(border('-'));
    }
    join_lines(lines)
}

fn render_html(cells: &Cells) -> String {
    let line = |row: &[String], tag: &str| {
        let inner: String = row
            .iter()
            .map(|cell| format!("<{tag}>{cell}</{tag}>"))
            .collect();
        format!("<tr>{}</tr>", inner)
    };

    let mut lines = vec!["<table>".to_string()];
    if cells.has_headers() {
        lines.push("<thead>".to_string());
        lines.push(line(&cells.headers, "th"));
        lines.push("</thead>".to_string());
    }
    lines.push("<tbody>".to_string());
    lines.extend(cells.rows.iter().map(|row| line(row, "td")));
    lines.push("</tbody>".to_string());
    lines.push("</table>".to_string());
    join_lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(["Property", "Value"])
            .row(["Message", "disk full"])
            .row(["Host", "web-1"])
    }

    #[test]
    fn test_resolve_defaults_and_fallback() {
        assert_eq!(TableFormat::resolve(None), TableFormat::Github);
        assert_eq!(TableFormat::resolve(Some("grid")), TableFormat::Grid);
        assert_eq!(TableFormat::resolve(Some("HTML")), TableFormat::Html);
        assert_eq!(TableFormat::resolve(Some("fancy")), TableFormat::Simple);
        assert_eq!(TableFormat::resolve(Some("")), TableFormat::Simple);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!(
            "fancy".parse::<TableFormat>(),
            Err(UnknownTableFormat("fancy".to_string()))
        );
        for format in TableFormat::ALL {
            assert_eq!(format.as_str().parse::<TableFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_render_github() {
        let expected = "\
| Property | Value     |
|----------|-----------|
| Message  | disk full |
| Host     | web-1     |";
        assert_eq!(sample().render(TableFormat::Github), expected);
    }

    #[test]
    fn test_render_pipe() {
        let expected = "\
| Property | Value     |
|:---------|:----------|
| Message  | disk full |
| Host     | web-1     |";
        assert_eq!(sample().render(TableFormat::Pipe), expected);
    }

    #[test]
    fn test_render_simple_and_plain() {
        let simple = "\
Property  Value
--------  ---------
Message   disk full
Host      web-1";
        assert_eq!(sample().render(TableFormat::Simple), simple);

        let plain = "\
Property  Value
Message   disk full
Host      web-1";
        assert_eq!(sample().render(TableFormat::Plain), plain);
    }

    #[test]
    fn test_render_grid() {
        let expected = "\
+----------+-----------+
| Property | Value     |
+==========+===========+
| Message  | disk full |
+----------+-----------+
| Host     | web-1     |
+----------+-----------+";
        assert_eq!(sample().render(TableFormat::Grid), expected);
    }

    #[test]
    fn test_render_html_escapes() {
        let table = Table::new(["Field"]).row(["<b>&\"x\"</b>"]);
        let expected = "\
<table>
<thead>
<tr><th>Field</th></tr>
</thead>
<tbody>
<tr><td>&lt;b&gt;&amp;&quot;x&quot;&lt;/b&gt;</td></tr>
</tbody>
</table>";
        assert_eq!(table.render(TableFormat::Html), expected);
    }

    #[test]
    fn test_cells_are_single_line_and_escaped() {
        let table = Table::new(["k", "v"]).row(["a|b", "line one\nline two"]);
        let rendered = table.render(TableFormat::Github);
        assert!(rendered.contains("a\\|b"));
        assert!(rendered.contains("line one line two"));
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::new(["a", "b", "c"]).row(["1"]);
        assert_eq!(table.render(TableFormat::Plain), "a  b  c\n1");
    }
}
