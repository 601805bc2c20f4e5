//! Plain-text tables for `--format table`.
//!
//! Cells are padded on their plain text and colored afterwards, so escape
//! codes never count toward a column's width.

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const GAP: &str = "  ";

/// Render `rows` under `headers`. Missing cells print as `-`; numbers are
/// right-aligned; status words are colored when `options.color` is set.
#[must_use]
pub fn render_entity_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .fold(header.chars().count(), usize::max)
        })
        .collect();
    if let Some(max_width) = options.max_width {
        shrink_to(&mut widths, headers, max_width);
    }

    let header_line = line(headers.iter().copied(), &widths, |cell, width| pad(&clip(cell, width), width, false));
    let rule = "-".repeat(widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1));

    let mut lines = vec![header_line, rule];
    for row in rows {
        let cells = (0..widths.len()).map(|index| row.get(index).map_or("-", String::as_str));
        lines.push(line(cells, &widths, |cell, width| {
            let clipped = clip(cell, width);
            let padded = pad(&clipped, width, is_number(&clipped));
            if options.color { paint(&clipped, padded) } else { padded }
        }));
    }
    lines.join("\n")
}

fn line<'a>(
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
    render: impl Fn(&str, usize) -> String,
) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| render(cell, *width))
        .collect::<Vec<_>>()
        .join(GAP)
        .trim_end()
        .to_string()
}

/// Take the overflow from the widest columns first, never narrowing a column
/// below its header.
fn shrink_to(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let total = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
    let mut overflow = total.saturating_sub(max_width);
    while overflow > 0 {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > headers[*index].chars().count())
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let Some(index) = widest else {
            break;
        };
        widths[index] -= 1;
        overflow -= 1;
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

fn is_number(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().is_ok()
}

/// Wrap `padded` in the color for the status word `cell`, if it has one.
fn paint(cell: &str, padded: String) -> String {
    let code = match cell.to_ascii_lowercase().as_str() {
        "published" | "developer" | "true" => "32",
        "in_review" | "pending" | "unverified" => "33",
        "draft" | "false" | "error" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn columns_align_and_numbers_right_align() {
        let rows = vec![
            vec!["Nebula Dashboard".to_string(), "12540".to_string()],
            vec!["CryptoWatch".to_string(), "3500".to_string()],
        ];
        let table = render_entity_table(&["title", "downloads"], &rows, PLAIN);
        assert_eq!(
            table,
            "title             downloads\n\
             ---------------------------\n\
             Nebula Dashboard      12540\n\
             CryptoWatch            3500"
        );
    }

    #[test]
    fn widest_column_absorbs_overflow() {
        let rows = vec![vec![
            "app-00000001".to_string(),
            "A real-time analytics platform for SaaS businesses".to_string(),
        ]];
        let table = render_entity_table(
            &["id", "description"],
            &rows,
            TableOptions {
                max_width: Some(40),
                color: false,
            },
        );
        for line in table.lines() {
            assert!(line.chars().count() <= 40, "line too wide: {line}");
        }
        assert!(table.contains("app-00000001"), "narrow column kept whole");
        assert!(table.contains('…'));
    }

    #[test]
    fn missing_cells_print_as_dash() {
        let rows = vec![vec!["app-00000003".to_string()]];
        let table = render_entity_table(&["id", "status"], &rows, PLAIN);
        assert_eq!(table.lines().last(), Some("app-00000003  -"));
    }

    #[test]
    fn status_colors_wrap_padding() {
        let rows = vec![vec!["draft".to_string(), "x".to_string()], vec!["published".to_string(), "y".to_string()]];
        let table = render_entity_table(
            &["status", "id"],
            &rows,
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "\u{1b}[31mdraft    \u{1b}[0m  x");
        assert_eq!(lines[3], "\u{1b}[32mpublished\u{1b}[0m  y");
    }
}
