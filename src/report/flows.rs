//! The report blocks that flow over pages: tables, the checklist, free text,
//! photos and signatures. Everything here asks the cursor for room before
//! drawing and splits across pages in whole rows or lines.

use super::canvas::{Face, ImageStyle};
use super::frame::Flow;
use super::record::{Photo, Signature};
use super::schema::{self, titles};
use super::selector::{ElectricalRow, NoisePlan, ReadingsTable, SpmRow};
use super::{is_eligible, NOT_AVAILABLE};
use crate::colour::Colour;
use crate::rect::Rect;
use crate::units::{cm, Pt};
use log::debug;

/// Gap between a frame's interior top and the first table row
const TABLE_INSET: f32 = 0.25;
/// Distance from a row's bottom edge to the baseline of its text
const CELL_BASELINE: Pt = Pt(3.0);
const CELL_PADDING: Pt = Pt(2.0);
/// Distance from a frame's interior top to the first line of free text
const TEXT_BASELINE: f32 = 0.5;
const TEXT_PADDING: f32 = 0.2;
const PHOTO_INSET: f32 = 0.5;
const CAPTION_BASELINE: f32 = 0.32;
const CAPTION_LINE: f32 = 0.34;

impl Flow<'_> {
    fn cell_text(&mut self, text: &str, x: Pt, bottom: Pt, width: Pt, face: Face, size: Pt) {
        let text = self
            .canvas
            .ellipsize(text, width - CELL_PADDING * 2.0, face, size);
        self.canvas
            .text(&text, x + CELL_PADDING, bottom + CELL_BASELINE, face, size);
    }

    fn boxed(&mut self, x: Pt, top: Pt, width: Pt, height: Pt, colour: Colour) {
        self.canvas
            .stroke_rect(Rect::from_top_left(x, top, width, height), colour);
    }

    /// A two-column readings table: label on the left, bold value on the right
    pub fn readings(&mut self, table: &ReadingsTable) {
        let config = self.config;
        let size = config.fonts.table;
        let row_height = config.line_height;
        let x = config.inner_x() - config.content_inset;
        let width = config.inner_width();
        let label_width = width * config.tables.readings_label;
        let overhead = self.section_height(cm(TABLE_INSET));

        let mut rows = &table.rows[..];
        while !rows.is_empty() {
            let (top, count) = self.reserve_rows(overhead, row_height, rows.len());
            let (chunk, rest) = rows.split_at(count);
            let height = overhead + row_height * count as f32;
            let mut y = self.draw_section(table.title, top, height) - cm(TABLE_INSET);
            for (label, value) in chunk {
                self.boxed(x, y, width, row_height, config.palette.row_border);
                let bottom = y - row_height;
                self.cell_text(label, x + config.content_inset - CELL_PADDING, bottom, label_width, Face::Regular, size);
                self.cell_text(
                    value,
                    x + config.content_inset + label_width - CELL_PADDING,
                    bottom,
                    width - label_width - config.content_inset,
                    Face::Bold,
                    size,
                );
                y = bottom;
            }
            self.summary.add_rows(table.title, count);
            self.close_block(top - height);
            rows = rest;
        }
    }

    /// Three-phase and single-value measurements under a repeated header row
    pub fn electrical(&mut self, rows: &[ElectricalRow]) {
        if rows.is_empty() {
            return;
        }
        let config = self.config;
        let size = config.fonts.table;
        let row_height = config.line_height;
        let border = config.palette.cell_border;
        let x = config.inner_x() - config.content_inset;
        let label_width = config.inner_width() * config.tables.electrical_label;
        let cell_width = config.inner_width() * config.tables.electrical_cell;
        let full_width = label_width + cell_width * 3.0;
        let overhead = self.section_height(cm(TABLE_INSET) + row_height);

        let mut rows = rows;
        while !rows.is_empty() {
            let (top, count) = self.reserve_rows(overhead, row_height, rows.len());
            let (chunk, rest) = rows.split_at(count);
            let height = overhead + row_height * count as f32;
            let mut y = self.draw_section(titles::ELECTRICAL, top, height) - cm(TABLE_INSET);

            self.boxed(x, y, full_width, row_height, border);
            let bottom = y - row_height;
            let [measurement, phases @ ..] = schema::ELECTRICAL_HEADER;
            self.cell_text(measurement, x, bottom, label_width, Face::Bold, config.fonts.table_header);
            for (i, phase) in phases.iter().enumerate() {
                let cell_x = x + label_width + cell_width * i as f32;
                self.cell_text(phase, cell_x, bottom, cell_width, Face::Bold, config.fonts.table_header);
            }
            y = bottom;

            for row in chunk {
                let bottom = y - row_height;
                match row {
                    ElectricalRow::ThreePhase { label, cells } => {
                        self.boxed(x, y, label_width, row_height, border);
                        self.cell_text(label, x, bottom, label_width, Face::Regular, size);
                        for (i, value) in cells.iter().enumerate() {
                            let cell_x = x + label_width + cell_width * i as f32;
                            self.boxed(cell_x, y, cell_width, row_height, border);
                            self.cell_text(value, cell_x, bottom, cell_width, Face::Regular, size);
                        }
                    }
                    ElectricalRow::Single { label, value } => {
                        self.boxed(x, y, full_width, row_height, border);
                        self.cell_text(label, x, bottom, label_width, Face::Regular, size);
                        let value = self.canvas.ellipsize(
                            value,
                            cell_width * 3.0 - CELL_PADDING * 2.0,
                            Face::Bold,
                            size,
                        );
                        self.canvas.text_right(
                            &value,
                            x + full_width - CELL_PADDING * 2.0,
                            bottom + CELL_BASELINE,
                            Face::Bold,
                            size,
                        );
                    }
                }
                y = bottom;
            }
            self.summary.add_rows(titles::ELECTRICAL, count);
            self.close_block(top - height);
            rows = rest;
        }
    }

    /// The done activities in two columns, followed by the free-text
    /// "other activities" when there are any
    pub fn checklist(&mut self, rows: &[(&str, &str)], other_activities: Option<&str>) {
        let left = rows.len().div_ceil(2);
        let right = rows.len() - left;
        if rows.is_empty() {
            debug!("no checklist activities were done, skipping the grid");
        } else {
            self.summary.checklist_columns = Some((left, right));
            self.checklist_grid(rows, left, right);
        }
        if let Some(text) = other_activities {
            self.labelled_text(titles::CHECKLIST, schema::OTHER_ACTIVITIES_LABEL, text);
        }
    }

    fn checklist_grid(&mut self, rows: &[(&str, &str)], left: usize, right: usize) {
        let config = self.config;
        let row_height = config.line_height;
        let border = config.palette.cell_border;
        let activity_width = config.inner_width() * config.tables.checklist_activity;
        let status_width = config.inner_width() * config.tables.checklist_status;
        let gutter = config.inner_width() * config.tables.checklist_gutter;
        let columns = [
            config.inner_x(),
            config.inner_x() + activity_width + status_width + gutter,
        ];
        // header row of both columns
        let overhead = self.section_height(row_height);

        let mut drawn = 0;
        while drawn < left {
            let (top, count) = self.reserve_rows(overhead, row_height, left - drawn);
            let height = overhead + row_height * count as f32;
            let interior = self.draw_section(titles::CHECKLIST, top, height);

            let [activity, status] = schema::CHECKLIST_HEADER;
            let header_columns = if drawn < right { 2 } else { 1 };
            for &x in &columns[..header_columns] {
                let bottom = interior - row_height;
                let size = config.fonts.checklist_header;
                self.boxed(x, interior, activity_width, row_height, border);
                self.boxed(x + activity_width, interior, status_width, row_height, border);
                self.cell_text(activity, x + Pt(1.0), bottom, activity_width, Face::Bold, size);
                self.cell_text(status, x + activity_width + Pt(1.0), bottom, status_width, Face::Bold, size);
            }

            let mut y = interior - row_height;
            let mut entries = 0;
            for pair in drawn..drawn + count {
                let paired = [Some(pair), (pair < right).then_some(left + pair)];
                for (&x, index) in columns.iter().zip(paired) {
                    let Some((activity, status)) = index.map(|i| rows[i]) else {
                        continue;
                    };
                    let size = config.fonts.checklist;
                    let bottom = y - row_height;
                    self.boxed(x, y, activity_width, row_height, border);
                    self.boxed(x + activity_width, y, status_width, row_height, border);
                    self.cell_text(activity, x + Pt(1.0), bottom, activity_width, Face::Regular, size);
                    self.cell_text(status, x + activity_width + Pt(1.0), bottom, status_width, Face::Regular, size);
                    entries += 1;
                }
                y -= row_height;
            }
            self.summary.add_rows(titles::CHECKLIST, entries);
            self.close_block(top - height);
            drawn += count;
        }
    }

    /// The label drawn before free text, its width with the gap after it,
    /// and the width left for the text
    fn label_layout(&self, label: &str) -> (String, Pt, Pt) {
        let config = self.config;
        let label = format!("{label}: ");
        let label_width = self.canvas.width(&label, Face::Bold, config.fonts.body) + Pt(6.0);
        let text_width = config.inner_width() - config.content_inset * 2.0 - label_width;
        (label, label_width, text_width)
    }

    /// Free text after a bold label, with continuation lines indented to
    /// the start of the text
    pub fn labelled_text(&mut self, title: &str, label: &str, text: &str) {
        let (label, label_width, text_width) = self.label_layout(label);
        let lines = self
            .canvas
            .wrap(text, text_width, Face::Regular, self.config.fonts.body);
        self.labelled_lines(title, &label, label_width, &lines);
        self.summary.add_rows(title, lines.len());
    }

    fn labelled_lines(&mut self, title: &str, label: &str, label_width: Pt, lines: &[String]) {
        let config = self.config;
        let size = config.fonts.body;
        let line_height = config.line_height;
        let box_padding = cm(TEXT_BASELINE);
        let overhead = self.section_height(box_padding);

        let mut lines = lines;
        while !lines.is_empty() {
            let (top, count) = self.reserve_rows(overhead, line_height, lines.len());
            let (chunk, rest) = lines.split_at(count);
            let height = overhead + line_height * count as f32;
            let interior = self.draw_section(title, top, height);
            self.boxed(
                config.inner_x() - config.content_inset,
                interior,
                config.inner_width(),
                line_height * count as f32 + box_padding,
                config.palette.row_border,
            );
            let baseline = interior - cm(TEXT_BASELINE);
            self.canvas
                .text(label, config.inner_x(), baseline, Face::Bold, size);
            for (i, line) in chunk.iter().enumerate() {
                self.canvas.text(
                    line,
                    config.inner_x() + label_width,
                    baseline - line_height * i as f32,
                    Face::Regular,
                    size,
                );
            }
            self.close_block(top - height);
            lines = rest;
        }
    }

    /// A titled frame of wrapped text, continued on as many pages as it needs
    pub fn text_section(&mut self, title: &str, text: &str) {
        let config = self.config;
        let size = config.fonts.body;
        let line_height = config.line_height;
        let mut lines = self.canvas.wrap(
            text,
            config.inner_width() - config.content_inset * 2.0,
            Face::Regular,
            size,
        );
        let line_count = lines.len();
        if lines.is_empty() {
            // an empty frame still shows the heading
            lines.push(String::new());
        }
        let overhead = self.section_height(cm(TEXT_BASELINE) + cm(TEXT_PADDING) - line_height);

        let mut lines = &lines[..];
        while !lines.is_empty() {
            let (top, count) = self.reserve_rows(overhead, line_height, lines.len());
            let (chunk, rest) = lines.split_at(count);
            let height = overhead + line_height * count as f32;
            let baseline = self.draw_section(title, top, height) - cm(TEXT_BASELINE);
            for (i, line) in chunk.iter().enumerate() {
                self.canvas.text(
                    line,
                    config.inner_x(),
                    baseline - line_height * i as f32,
                    Face::Regular,
                    size,
                );
            }
            self.close_block(top - height);
            lines = rest;
        }
        self.summary.add_rows(title, line_count);
    }

    pub fn observations(&mut self, text: &str) {
        self.text_section(titles::OBSERVATIONS, text);
    }

    pub fn noise(&mut self, noise: &NoisePlan) {
        match noise {
            NoisePlan::None => {}
            NoisePlan::Simple {
                kind,
                result,
                observations,
            } => self.noise_summary(kind, result, observations),
            NoisePlan::Spm(rows) => self.spm_table(rows),
        }
    }

    /// Type and result on a line each, then the observations wrapped under
    /// their label. Observations too long for the page continue in frames of
    /// their own.
    fn noise_summary(&mut self, kind: &str, result: &str, observations: &str) {
        let config = self.config;
        let size = config.fonts.body;
        let line_height = config.line_height;
        let spacing = cm(0.6);
        let first = cm(0.7);
        let (label, label_width, text_width) = self.label_layout(schema::NOISE_OBSERVATIONS_LABEL);
        let lines = self.canvas.wrap(observations, text_width, Face::Regular, size);

        // the first observation line is part of the head
        let overhead = self.section_height(first + spacing * 2.0 + cm(TEXT_PADDING)) - line_height;
        let (top, count) = self.reserve_rows(overhead, line_height, lines.len().max(1));
        let count = count.min(lines.len());
        let height = overhead + line_height * count.max(1) as f32;
        let interior = self.draw_section(titles::NOISE, top, height);

        for (i, (field, value)) in [("Tipo:", kind), ("Resultado:", result)].into_iter().enumerate() {
            let baseline = interior - first - spacing * i as f32;
            let field_width = self.canvas.width(field, Face::Bold, size) + Pt(6.0);
            let value = self.canvas.ellipsize(
                value,
                config.inner_width() - config.content_inset - field_width,
                Face::Regular,
                size,
            );
            self.canvas
                .text(field, config.inner_x(), baseline, Face::Bold, size);
            self.canvas.text(
                &value,
                config.inner_x() + field_width,
                baseline,
                Face::Regular,
                size,
            );
        }

        let baseline = interior - first - spacing * 2.0;
        self.canvas
            .text(&label, config.inner_x(), baseline, Face::Bold, size);
        for (i, line) in lines[..count].iter().enumerate() {
            self.canvas.text(
                line,
                config.inner_x() + label_width,
                baseline - line_height * i as f32,
                Face::Regular,
                size,
            );
        }
        self.summary.add_rows(titles::NOISE, 3);
        self.close_block(top - height);

        self.labelled_lines(titles::NOISE, &label, label_width, &lines[count..]);
    }

    fn spm_table(&mut self, rows: &[SpmRow]) {
        let config = self.config;
        let sizes = config.fonts;
        let row_height = config.tables.spm_row_height;
        let border = config.palette.frame_border;
        let x = config.inner_x();
        let label_width = config.inner_width() * config.tables.spm_label;
        let columns = schema::SPM_COLUMNS.len() as f32;
        let cell_width = (config.inner_width() - config.content_inset - label_width) / columns;
        let full_width = label_width + cell_width * columns;
        // caption and column header rows
        let overhead = self.section_height(row_height * 2.0);

        let mut rows = rows;
        while !rows.is_empty() {
            let (top, count) = self.reserve_rows(overhead, row_height, rows.len());
            let (chunk, rest) = rows.split_at(count);
            let height = overhead + row_height * count as f32;
            let mut y = self.draw_section(titles::NOISE, top, height);

            self.boxed(x, y, full_width, row_height, border);
            self.cell_text(schema::SPM_CAPTION, x, y - row_height, full_width, Face::Bold, sizes.spm_label);
            y -= row_height;

            for (i, column) in schema::SPM_COLUMNS.iter().enumerate() {
                let cell_x = x + label_width + cell_width * i as f32;
                self.boxed(cell_x, y, cell_width, row_height, border);
                self.cell_text(column.label, cell_x, y - row_height, cell_width, Face::Bold, sizes.spm_header);
            }
            y -= row_height;

            for row in chunk {
                let bottom = y - row_height;
                self.boxed(x, y, label_width, row_height, border);
                self.cell_text(row.label, x, bottom, label_width, Face::Bold, sizes.spm_label);
                for (i, value) in row.cells.iter().enumerate() {
                    let cell_x = x + label_width + cell_width * i as f32;
                    self.boxed(cell_x, y, cell_width, row_height, border);
                    self.cell_text(value, cell_x, bottom, cell_width, Face::Regular, sizes.spm);
                }
                y = bottom;
            }
            self.summary.add_rows(titles::NOISE, count);
            self.close_block(top - height);
            rows = rest;
        }
    }

    /// Photos two to a row with numbered captions. Batches fill the space
    /// left on each page; when not even one row fits on an empty page, the
    /// images are shrunk so that one does.
    pub fn photos(&mut self, photos: &[&Photo]) {
        if photos.is_empty() {
            return;
        }
        let config = self.config;
        let geometry = config.photos;
        let size = config.fonts.caption;
        let column_width = (config.inner_width() - geometry.gutter) / 2.0;
        let full_image_height = column_width * geometry.aspect;
        let below_image = geometry.caption_height + geometry.row_gap;
        let overhead = self.section_height(cm(PHOTO_INSET));

        let mut next = 0;
        while next < photos.len() {
            let remaining_rows = (photos.len() - next).div_ceil(2);
            let mut image_height = full_image_height;
            let mut rows_fit = self.cursor.rows_fit(overhead, image_height + below_image);
            if rows_fit == 0 && !self.cursor.is_fresh() {
                self.ensure_space(overhead + image_height + below_image);
                rows_fit = self.cursor.rows_fit(overhead, image_height + below_image);
            }
            if rows_fit == 0 {
                let room = self.cursor.available() - overhead - below_image;
                image_height = room.max(Pt(0.0)).min(full_image_height);
                debug!(
                    "shrinking photos to {:.1}pt to fit a page",
                    image_height.0
                );
                rows_fit = 1;
            }

            let rows = rows_fit.min(remaining_rows);
            let per_row = image_height + below_image;
            let height = overhead + per_row * rows as f32;
            let top = self.ensure_space(height);
            let first_row = self.draw_section(titles::PHOTOS, top, height) - cm(PHOTO_INSET);

            let mut drawn = 0;
            for row in 0..rows {
                let row_top = first_row - per_row * row as f32;
                for column in 0..2 {
                    let Some(photo) = photos.get(next) else {
                        break;
                    };
                    let x = config.inner_x() + (column_width + geometry.gutter) * column as f32;
                    let frame = Rect::from_top_left(x, row_top, column_width, image_height);
                    let outcome = self.canvas.place_image(&photo.image, frame, ImageStyle::PHOTO);
                    self.summary.photos.push(outcome);

                    next += 1;
                    drawn += 1;
                    let caption = if is_eligible(&photo.caption) {
                        photo.caption.trim()
                    } else {
                        NOT_AVAILABLE
                    };
                    let caption = format!("Foto {next}: {caption}");
                    let lines = self.canvas.wrap_clamped(
                        &caption,
                        column_width - Pt(6.0),
                        Face::Regular,
                        size,
                        2,
                    );
                    let baseline = row_top - image_height - cm(CAPTION_BASELINE);
                    for (i, line) in lines.iter().enumerate() {
                        self.canvas.text(
                            line,
                            x,
                            baseline - cm(CAPTION_LINE) * i as f32,
                            Face::Regular,
                            size,
                        );
                    }
                }
            }
            self.summary.add_rows(titles::PHOTOS, drawn);
            self.close_block(top - height);
        }
    }

    /// Technician and client names, signature lines and signature images
    pub fn signatures(&mut self, signatures: [&Signature; 2]) {
        let config = self.config;
        let size = config.fonts.body;
        let height = config.signature_height;
        let top = self.ensure_space(height);
        let interior = self.draw_section(titles::SIGNATURES, top, height);

        let left = config.frame_x() + cm(0.5);
        let column = config.inner_width() * (8.2 / 17.6);
        let (box_width, box_height) = config.signature_box;
        let box_width = box_width.min(column - cm(1.0));

        for (i, (role, signature)) in ["Técnico", "Cliente"].into_iter().zip(signatures).enumerate() {
            let x = left + column * i as f32;
            let name = self.canvas.ellipsize(
                &format!("{role}: {}", signature.name),
                column - cm(0.5),
                Face::Regular,
                size,
            );
            self.canvas.text(&name, x, interior - cm(1.0), Face::Regular, size);
            let line_y = interior - cm(2.7);
            self.canvas
                .line((x, line_y), (x + box_width, line_y), config.palette.text);
            let frame = Rect::from_origin(x, interior - cm(2.6), box_width, box_height);
            let outcome = self
                .canvas
                .place_image(&signature.image, frame, ImageStyle::SIGNATURE);
            self.summary.signatures.push(outcome);
        }
        self.summary.add_rows(titles::SIGNATURES, 2);
        self.close_block(top - height);
    }
}
