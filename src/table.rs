use std::fmt::Display;
use std::io::Write;

use tracing::trace;

use crate::box_model::{BoxModel, LineRole, LineTemplate};
use crate::domain::{Result, TableOptions};

/// One cell as seen by a [`CellFilter`].
///
/// A `width` of 0 asks for the natural text of the cell, which is used to size its column.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    pub row: usize,
    pub column: usize,
    pub value: &'a str,
    pub width: usize,
    pub fill: char,
}

/// Turns a cell value into display text. Must return the same text for the same cell.
pub trait CellFilter {
    fn format(&self, cell: &Cell<'_>) -> String;
}

impl<F> CellFilter for F
where
    F: Fn(&Cell<'_>) -> String,
{
    fn format(&self, cell: &Cell<'_>) -> String {
        self(cell)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, width: usize, fill: char) -> String {
    let missing = width.saturating_sub(char_len(s));
    std::iter::repeat_n(fill, missing).collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LeftJustify;

impl CellFilter for LeftJustify {
    fn format(&self, cell: &Cell<'_>) -> String {
        format!("{}{}", cell.value, pad(cell.value, cell.width, cell.fill))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RightJustify;

impl CellFilter for RightJustify {
    fn format(&self, cell: &Cell<'_>) -> String {
        format!("{}{}", pad(cell.value, cell.width, cell.fill), cell.value)
    }
}

/// Centers the value; an odd leftover goes to the right.
#[derive(Debug, Clone, Copy, Default)]
pub struct Center;

impl CellFilter for Center {
    fn format(&self, cell: &Cell<'_>) -> String {
        let missing = cell.width.saturating_sub(char_len(cell.value));
        let left = missing / 2;
        let mut out: String = std::iter::repeat_n(cell.fill, left).collect();
        out.push_str(cell.value);
        out.extend(std::iter::repeat_n(cell.fill, missing - left));
        out
    }
}

/// Caps values at `max_width` chars, marking cut values with `…`.
#[derive(Debug, Clone, Copy)]
pub struct Ellipsis<F> {
    pub max_width: usize,
    pub inner: F,
}

impl<F: CellFilter> CellFilter for Ellipsis<F> {
    fn format(&self, cell: &Cell<'_>) -> String {
        if self.max_width == 0 || char_len(cell.value) <= self.max_width {
            return self.inner.format(cell);
        }
        let mut short: String = cell.value.chars().take(self.max_width - 1).collect();
        short.push('…');
        self.inner.format(&Cell {
            value: &short,
            ..*cell
        })
    }
}

fn clip(mut text: String, width: usize) -> String {
    let cut = text.char_indices().nth(width).map(|(idx, _)| idx);
    if let Some(idx) = cut {
        text.truncate(idx);
    }
    text
}

/// Column widths: the widest natural text per column, short rows counting as empty cells.
pub fn column_widths<F: CellFilter + ?Sized>(rows: &[Vec<String>], filter: &F) -> Vec<usize> {
    let ncolumns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; ncolumns];
    for (r, row) in rows.iter().enumerate() {
        for (c, width) in widths.iter_mut().enumerate() {
            let value = row.get(c).map_or("", String::as_str);
            let natural = filter.format(&Cell {
                row: r,
                column: c,
                value,
                width: 0,
                fill: ' ',
            });
            *width = (*width).max(char_len(&natural));
        }
    }
    widths
}

fn write_border<W: Write + ?Sized>(
    out: &mut W,
    template: &LineTemplate,
    row: usize,
    widths: &[usize],
) -> Result<()> {
    let cells = widths.iter().enumerate().map(|(c, &width)| Cell {
        row,
        column: c,
        value: "",
        width,
        fill: template.fill,
    });
    write_line(out, template, cells, &LeftJustify)
}

fn write_line<'a, W, F>(
    out: &mut W,
    template: &LineTemplate,
    cells: impl Iterator<Item = Cell<'a>>,
    filter: &F,
) -> Result<()>
where
    W: Write + ?Sized,
    F: CellFilter + ?Sized,
{
    let mut line = String::new();
    line.push(template.left);
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            line.push(template.separator);
        }
        line.push_str(&clip(filter.format(&cell), cell.width));
    }
    line.push(template.right);
    line.push('\n');
    out.write_all(line.as_bytes())?;
    Ok(())
}

/// Writes `rows` as a box-drawn table and flushes `out` once at the end.
pub fn render<R, V, W, F>(rows: &[R], out: &mut W, options: &TableOptions, filter: &F) -> Result<()>
where
    R: AsRef<[V]>,
    V: Display,
    W: Write + ?Sized,
    F: CellFilter + ?Sized,
{
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.as_ref().iter().map(ToString::to_string).collect())
        .collect();
    let widths = column_widths(&rows, filter);
    trace!("Column widths: {widths:?}");

    let model: &BoxModel = &options.box_model;
    write_border(out, model.line(LineRole::top(options.has_header)), 0, &widths)?;

    for (r, row) in rows.iter().enumerate() {
        let template = model.line(LineRole::content(r, options.has_header));
        let cells = widths.iter().enumerate().map(|(c, &width)| Cell {
            row: r,
            column: c,
            value: row.get(c).map_or("", String::as_str),
            width,
            fill: ' ',
        });
        write_line(out, template, cells, filter)?;

        if let Some(role) = LineRole::trailing(r, rows.len(), options.has_header, options.separators) {
            write_border(out, model.line(role), r, &widths)?;
        }
    }
    if rows.is_empty() {
        write_border(out, model.line(LineRole::Bottom), 0, &widths)?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_model::{DOUBLE_HEADER, HEAVY_HEADER};

    fn draw<F: CellFilter>(rows: &[Vec<&str>], options: TableOptions, filter: &F) -> String {
        let mut out = Vec::new();
        render(rows, &mut out, &options, filter).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn people() -> Vec<Vec<&'static str>> {
        vec![vec!["id", "name"], vec!["1", "Alice"], vec!["2", "Bob"]]
    }

    #[test]
    fn header_table_double_style() {
        let text = draw(&people(), TableOptions::default().has_header(true), &LeftJustify);
        let expected = "\
┌──┬─────┐
│id│name │
╞══╪═════╡
│1 │Alice│
│2 │Bob  │
└──┴─────┘
";
        assert_eq!(text, expected);
    }

    #[test]
    fn header_table_heavy_style() {
        let options = TableOptions::default().has_header(true).box_model(HEAVY_HEADER);
        let text = draw(&people(), options, &LeftJustify);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "┏━━┳━━━━━┓");
        assert_eq!(lines[1], "┃id┃name ┃");
        assert_eq!(lines[2], "┡━━╇━━━━━┩");
        assert_eq!(lines[5], "└──┴─────┘");
    }

    #[test]
    fn plain_table_with_separators() {
        let options = TableOptions::default().separators(true);
        let text = draw(&people(), options, &LeftJustify);
        let expected = "\
┌──┬─────┐
│id│name │
├──┼─────┤
│1 │Alice│
├──┼─────┤
│2 │Bob  │
└──┴─────┘
";
        assert_eq!(text, expected);
    }

    #[test]
    fn single_row_header_only_gets_bottom() {
        let rows = vec![vec!["only"]];
        let text = draw(&rows, TableOptions::default().has_header(true).separators(true), &LeftJustify);
        assert_eq!(text, "┌────┐\n│only│\n└────┘\n");
    }

    #[test]
    fn short_rows_are_padded() {
        let rows = vec![vec!["a", "bb", "ccc"], vec!["d"]];
        let text = draw(&rows, TableOptions::default(), &LeftJustify);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "│d│  │   │");
    }

    #[test]
    fn every_line_has_the_same_width() {
        let rows = vec![vec!["α", "longer value"], vec!["ßß", ""], vec!["", "x", "extra"]];
        for options in [
            TableOptions::default(),
            TableOptions::default().has_header(true).separators(true),
            TableOptions::default().box_model(HEAVY_HEADER).has_header(true),
        ] {
            let text = draw(&rows, options, &LeftJustify);
            let widths = [2usize, 12, 5];
            let expected = widths.iter().sum::<usize>() + (widths.len() - 1) + 2;
            for line in text.lines() {
                assert_eq!(line.chars().count(), expected, "{line}");
            }
            assert_eq!(text.lines().filter(|l| l.starts_with('└')).count(), 1);
            assert!(text.lines().last().unwrap().starts_with('└'));
        }
    }

    #[test]
    fn filter_output_is_clipped_to_width() {
        // Natural width comes from width=0 calls; wider output gets cut.
        fn noisy(cell: &Cell<'_>) -> String {
            if cell.width == 0 {
                cell.value.to_string()
            } else {
                format!("{}<<<<", LeftJustify.format(cell))
            }
        }
        let rows = vec![vec!["ab", "c"]];
        let text = draw(&rows, TableOptions::default(), &noisy);
        assert_eq!(text.lines().nth(1), Some("│ab│c│"));
    }

    #[test]
    fn renderer_does_not_pad_short_filter_output() {
        fn terse(cell: &Cell<'_>) -> String {
            cell.value.to_string()
        }
        let rows = vec![vec!["abc"], vec!["d"]];
        let text = draw(&rows, TableOptions::default(), &terse);
        assert_eq!(text.lines().nth(2), Some("│d│"));
    }

    #[test]
    fn right_and_center_filters() {
        let rows = vec![vec!["wide"], vec!["x"]];
        let right = draw(&rows, TableOptions::default(), &RightJustify);
        assert_eq!(right.lines().nth(2), Some("│   x│"));
        let center = draw(&rows, TableOptions::default(), &Center);
        assert_eq!(center.lines().nth(2), Some("│ x  │"));
    }

    #[test]
    fn ellipsis_caps_natural_width() {
        let filter = Ellipsis {
            max_width: 4,
            inner: LeftJustify,
        };
        let rows = vec![vec!["abcdefgh"], vec!["ab"]];
        let text = draw(&rows, TableOptions::default(), &filter);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "│abc…│");
        assert_eq!(lines[2], "│ab  │");
    }

    #[test]
    fn empty_table_still_closes() {
        let rows: Vec<Vec<&str>> = Vec::new();
        let text = draw(&rows, TableOptions::default().has_header(true), &LeftJustify);
        assert_eq!(text, "┌┐\n└┘\n");
    }

    #[test]
    fn non_string_values_are_stringified() {
        let rows = vec![vec![1, 22], vec![333, 4]];
        let mut out = Vec::new();
        render(&rows, &mut out, &TableOptions::default(), &RightJustify).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some("│  1│22│"));
    }

    #[test]
    fn widths_use_filter_natural_text() {
        let rows = vec![
            vec!["id".to_string(), "name".to_string()],
            vec!["1".to_string(), "Alice".to_string()],
        ];
        assert_eq!(column_widths(&rows, &LeftJustify), vec![2, 5]);
        let default = TableOptions::default();
        assert_eq!(default.box_model, DOUBLE_HEADER);
    }

    #[derive(Default)]
    struct FlushCounter {
        bytes: Vec<u8>,
        flushes: usize,
    }

    impl Write for FlushCounter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn flushes_once_after_the_last_line() {
        for rows in [people(), Vec::new()] {
            let mut out = FlushCounter::default();
            let options = TableOptions::default().has_header(true).separators(true);
            render(&rows, &mut out, &options, &LeftJustify).unwrap();
            assert_eq!(out.flushes, 1);
            assert!(String::from_utf8(out.bytes).unwrap().ends_with("┘\n"));
        }
    }
}
