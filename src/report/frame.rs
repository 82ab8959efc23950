use super::assembler::RenderSummary;
use super::canvas::{Face, ReportCanvas};
use super::config::LayoutConfig;
use super::cursor::PageCursor;
use super::selector::{Cell, RowSection};
use crate::rect::Rect;
use crate::units::{cm, Pt};
use std::collections::VecDeque;

/// Space from the top of a row box to its first baseline
const ROW_BASELINE: f32 = 0.45;
/// Vertical padding of a row box on top of its lines
const ROW_PADDING: f32 = 0.4;
/// Horizontal slack between a label and the edge of its column
const LABEL_PADDING: Pt = Pt(8.0);
/// Narrowest a wrapped value is ever allowed to be
const MIN_VALUE_WIDTH: Pt = Pt(10.0);
/// Tolerance for rows that fit exactly
const EPSILON: Pt = Pt(1e-3);

/// A report being laid out: the canvas drawing it, the cursor deciding where,
/// and what has been drawn so far.
pub(crate) struct Flow<'a> {
    pub canvas: ReportCanvas<'a>,
    pub cursor: PageCursor,
    pub config: &'a LayoutConfig,
    pub summary: RenderSummary,
}

/// One cell of a row with its value already wrapped
#[derive(Debug, Clone)]
pub(crate) struct PreparedCell {
    label: String,
    label_width: Pt,
    lines: Vec<String>,
    x: Pt,
}

#[derive(Debug, Clone)]
pub(crate) struct PreparedRow {
    cells: Vec<PreparedCell>,
    /// Lines of the tallest cell, never less than one
    lines: usize,
    pub height: Pt,
}

impl<'a> Flow<'a> {
    pub fn new(canvas: ReportCanvas<'a>, config: &'a LayoutConfig) -> Flow<'a> {
        Flow {
            canvas,
            cursor: PageCursor::new(config.content_top(), config.content_bottom()),
            config,
            summary: RenderSummary::default(),
        }
    }

    pub fn begin(&mut self) {
        self.cursor.begin(&mut self.canvas);
    }

    pub fn ensure_space(&mut self, height: Pt) -> Pt {
        self.cursor.ensure_space(&mut self.canvas, height)
    }

    pub fn reserve_rows(&mut self, overhead: Pt, row_height: Pt, remaining: usize) -> (Pt, usize) {
        self.cursor
            .reserve_rows(&mut self.canvas, overhead, row_height, remaining)
    }

    /// Height of a section frame holding `body` worth of content
    pub fn section_height(&self, body: Pt) -> Pt {
        self.config.title_inset + body + self.config.frame_padding
    }

    /// Space a section frame takes besides its content
    pub fn section_overhead(&self) -> Pt {
        self.section_height(Pt(0.0))
    }

    /// Draw a titled frame hanging from `top` and return the top of its
    /// interior
    pub fn draw_section(&mut self, title: &str, top: Pt, height: Pt) -> Pt {
        let config = self.config;
        let frame = Rect::from_top_left(config.frame_x(), top, config.frame_width(), height);
        let strip = Rect::from_top_left(
            config.frame_x(),
            top,
            config.frame_width(),
            config.title_strip_height,
        );
        self.canvas
            .rounded_rect(frame, Some(config.palette.frame_border), None);
        self.canvas.fill_rect(strip, config.palette.title_strip);
        self.canvas.text(
            title,
            config.frame_x() + config.content_gutter,
            top - config.title_strip_height + Pt(5.0),
            Face::Bold,
            config.fonts.section_title,
        );
        self.summary.note_page(title, self.cursor.page_count());
        top - config.title_inset
    }

    /// Leave a gap under a block whose bottom edge is `bottom`
    pub fn close_block(&mut self, bottom: Pt) {
        self.cursor.advance_to(bottom - self.config.section_gap);
    }

    /// Wrap every cell of a row to its share of the content width
    pub fn prepare_row(&self, cells: &[Cell]) -> PreparedRow {
        let config = self.config;
        let size = config.fonts.body;
        let total = config.inner_width();
        let mut x = config.inner_x();
        let mut prepared = Vec::with_capacity(cells.len());
        for cell in cells {
            let width = total * cell.ratio;
            let label = format!("{}: ", cell.label);
            let label_width = self.canvas.width(&label, Face::Bold, size);
            let available = (width - LABEL_PADDING - label_width).max(MIN_VALUE_WIDTH);
            let lines = self.canvas.wrap(&cell.value, available, Face::Regular, size);
            prepared.push(PreparedCell {
                label,
                label_width,
                lines,
                x,
            });
            x += width;
        }
        let lines = prepared
            .iter()
            .map(|cell| cell.lines.len())
            .max()
            .unwrap_or(0)
            .max(1);
        PreparedRow {
            cells: prepared,
            lines,
            height: self.row_height(lines),
        }
    }

    fn row_height(&self, lines: usize) -> Pt {
        self.config.line_height * lines as f32 + cm(ROW_PADDING)
    }

    /// Cut a row after its first `lines` lines. The rest continues without
    /// labels, its text starting at the left edge of each cell.
    fn split_row(&self, row: PreparedRow, lines: usize) -> (PreparedRow, Option<PreparedRow>) {
        if lines >= row.lines {
            return (row, None);
        }
        let mut head = Vec::with_capacity(row.cells.len());
        let mut tail = Vec::with_capacity(row.cells.len());
        for mut cell in row.cells {
            let rest = cell.lines.split_off(lines.min(cell.lines.len()));
            tail.push(PreparedCell {
                label: String::new(),
                label_width: Pt(0.0),
                lines: rest,
                x: cell.x,
            });
            head.push(cell);
        }
        let head = PreparedRow {
            cells: head,
            lines,
            height: self.row_height(lines),
        };
        let rest = row.lines - lines;
        let tail = PreparedRow {
            cells: tail,
            lines: rest,
            height: self.row_height(rest),
        };
        (head, Some(tail))
    }

    /// Draw a prepared row hanging from `top` and return its bottom
    pub fn draw_row(&mut self, row: &PreparedRow, top: Pt) -> Pt {
        let config = self.config;
        let size = config.fonts.body;
        let bottom = top - row.height;
        let border = Rect::from_origin(
            config.inner_x() - config.content_inset,
            bottom,
            config.inner_width(),
            row.height,
        );
        self.canvas.stroke_rect(border, config.palette.row_border);

        let baseline = top - cm(ROW_BASELINE);
        for cell in &row.cells {
            self.canvas.text(&cell.label, cell.x, baseline, Face::Bold, size);
            for (i, line) in cell.lines.iter().enumerate() {
                let (x, y) = if i == 0 {
                    (cell.x + cell.label_width, baseline)
                } else {
                    (cell.x, baseline - config.line_height * i as f32)
                };
                self.canvas.text(line, x, y, Face::Regular, size);
            }
        }
        bottom
    }

    /// A titled frame of label/value rows. Kept on one page when it fits
    /// one; otherwise each page is filled and rows are cut between lines,
    /// with the title repeated over the continuation.
    pub fn row_section(&mut self, section: &RowSection) {
        let rows: Vec<PreparedRow> = section
            .rows
            .iter()
            .map(|cells| self.prepare_row(cells))
            .collect();
        let count = rows.len();
        let body: Pt = rows.iter().map(|row| row.height).sum();
        let overhead = self.section_overhead();

        if overhead + body <= self.cursor.top() - self.cursor.bottom() + EPSILON {
            let height = overhead + body;
            let top = self.ensure_space(height);
            let mut y = self.draw_section(section.title, top, height);
            for row in &rows {
                y = self.draw_row(row, y);
            }
            self.close_block(top - height);
        } else {
            self.split_row_section(section.title, rows.into());
        }
        self.summary.add_rows(section.title, count);
    }

    fn split_row_section(&mut self, title: &str, mut queue: VecDeque<PreparedRow>) {
        let overhead = self.section_overhead();
        let line_height = self.config.line_height;
        let smallest = overhead + self.row_height(1);
        while !queue.is_empty() {
            let top = self.ensure_space(smallest);
            let mut room = self.cursor.available() - overhead;
            let mut chunk = Vec::new();
            while let Some(row) = queue.pop_front() {
                if row.height <= room + EPSILON {
                    room -= row.height;
                    chunk.push(row);
                    continue;
                }
                let fit = ((room - cm(ROW_PADDING) + EPSILON) / line_height).floor();
                let fit = if fit >= 1.0 { fit as usize } else { 0 };
                // something must be drawn on every page
                let fit = if chunk.is_empty() { fit.max(1) } else { fit };
                if fit == 0 {
                    queue.push_front(row);
                } else {
                    let (head, tail) = self.split_row(row, fit);
                    chunk.push(head);
                    if let Some(tail) = tail {
                        queue.push_front(tail);
                    }
                }
                break;
            }

            let height = overhead + chunk.iter().map(|row| row.height).sum::<Pt>();
            let mut y = self.draw_section(title, top, height);
            for row in &chunk {
                y = self.draw_row(row, y);
            }
            self.close_block(top - height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Font;
    use crate::report::canvas::PageHeader;
    use crate::report::config::Letterhead;
    use crate::report::schema::titles;

    fn header() -> PageHeader {
        PageHeader {
            folio: "MXL-0101".into(),
            date: "2024-06-11".into(),
            technician: "Luis Ortega".into(),
            locality: "Mexicali".into(),
        }
    }

    fn with_flow<F: FnOnce(&mut Flow)>(config: &LayoutConfig, f: F) {
        let letterhead = Letterhead::default();
        let canvas = ReportCanvas::new(
            config,
            &letterhead,
            header(),
            Font::helvetica(),
            Font::helvetica_bold(),
        );
        let mut flow = Flow::new(canvas, config);
        flow.begin();
        f(&mut flow);
    }

    #[test]
    fn row_height_follows_the_longest_cell() {
        let config = LayoutConfig::default();
        with_flow(&config, |flow| {
            let short = flow.prepare_row(&[Cell::new("Tipo", "Preventivo", 1.0)]);
            assert!((short.height.0 - (config.line_height + cm(ROW_PADDING)).0).abs() < 0.01);

            let long = "muy ".repeat(60);
            let row = flow.prepare_row(&[
                Cell::new("Tipo", "Preventivo", 0.3),
                Cell::new("Descripción", long.as_str(), 0.7),
            ]);
            assert!(row.height > short.height * 2.0);
        });
    }

    #[test]
    fn empty_values_still_reserve_a_line() {
        let config = LayoutConfig::default();
        with_flow(&config, |flow| {
            let row = flow.prepare_row(&[Cell::new("Email", "", 1.0)]);
            assert!((row.height.0 - (config.line_height + cm(ROW_PADDING)).0).abs() < 0.01);
        });
    }

    #[test]
    fn sections_are_recorded_in_the_summary() {
        let config = LayoutConfig::default();
        with_flow(&config, |flow| {
            let section = RowSection {
                title: titles::SERVICE,
                rows: vec![vec![
                    Cell::new("Tipo", "Correctivo", 0.3),
                    Cell::new("Descripción", "Cambio de válvula", 0.7),
                ]],
            };
            let before = flow.cursor.y();
            flow.row_section(&section);
            assert!(flow.cursor.y() < before);
            let summary = flow.summary.section(titles::SERVICE).expect("section drawn");
            assert_eq!(summary.rows, 1);
            assert_eq!(summary.pages, vec![1]);
        });
    }

    #[test]
    fn rows_split_between_lines() {
        let config = LayoutConfig::default();
        with_flow(&config, |flow| {
            let long = "palabra ".repeat(40);
            let row = flow.prepare_row(&[
                Cell::new("Tipo", "Correctivo", 0.3),
                Cell::new("Descripción", long.as_str(), 0.7),
            ]);
            assert!(row.lines > 2);
            let total = row.lines;
            let (head, tail) = flow.split_row(row, 2);
            let tail = tail.expect("lines remain");
            assert_eq!(head.lines, 2);
            assert_eq!(tail.lines, total - 2);
            assert!(tail.cells.iter().all(|cell| cell.label.is_empty()));
            // the short cell ends in the head
            assert!(tail.cells[0].lines.is_empty());
        });
    }

    #[test]
    fn rows_taller_than_a_page_continue_on_the_next_one() {
        let config = LayoutConfig::default();
        with_flow(&config, |flow| {
            let long = lipsum::lipsum(1500);
            let section = RowSection {
                title: titles::SERVICE,
                rows: vec![vec![
                    Cell::new("Tipo", "Correctivo", 0.3),
                    Cell::new("Descripción", long.as_str(), 0.7),
                ]],
            };
            flow.row_section(&section);
            assert!(flow.cursor.page_count() >= 2);
            assert!(flow.cursor.y() >= flow.cursor.bottom());
            let summary = flow.summary.section(titles::SERVICE).expect("section drawn");
            assert_eq!(summary.rows, 1);
            assert_eq!(summary.pages.len(), flow.cursor.page_count());
        });
    }

    #[test]
    fn sections_that_do_not_fit_move_to_the_next_page() {
        let config = LayoutConfig::default();
        with_flow(&config, |flow| {
            let bottom = flow.cursor.bottom();
            flow.cursor.advance_to(bottom + Pt(10.0));
            let section = RowSection {
                title: titles::CLIENT,
                rows: vec![vec![Cell::new("Cliente", "Aceros del Norte", 1.0)]],
            };
            flow.row_section(&section);
            assert_eq!(flow.cursor.page_count(), 2);
            assert_eq!(flow.summary.section(titles::CLIENT).map(|s| s.pages.clone()), Some(vec![2]));
        });
    }
}
