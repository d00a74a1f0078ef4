use std::borrow::Cow;
use std::fmt::Write as _;

/// Renders an elastic two-space-separated table: every column as wide as its
/// widest cell, headers underlined with dashes.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|cell| cell.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));

    let dash_widths: Vec<usize> = widths.iter().map(|width| (*width).max(3)).collect();
    let dashes: Vec<String> = dash_widths.iter().map(|width| "-".repeat(*width)).collect();
    let _ = writeln!(output, "{}", format_row(&dashes, &dash_widths));

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// Pads each cell to its column width and joins with two spaces. Cells
/// beyond the header count are dropped; trailing padding is trimmed.
fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let cell = sanitize_cell(cell);
        line.push_str(&cell);
        for _ in 0..width.saturating_sub(cell.chars().count()) {
            line.push(' ');
        }
    }
    line.truncate(line.trim_end_matches(' ').len());
    line
}

fn sanitize_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains(['\n', '\r', '\t']) {
        Cow::Owned(cell.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(cell)
    }
}
