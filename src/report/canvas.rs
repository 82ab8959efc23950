use super::config::{LayoutConfig, Letterhead};
use super::cursor::PageSink;
use crate::colour::Colour;
use crate::document::Document;
use crate::font::Font;
use crate::image::{Image, ImageLoad, ImageSource};
use crate::info::Info;
use crate::layout::{ellipsize, width_of_text, wrap_text, wrap_text_clamped};
use crate::page::{ImageLayout, Page, Shape, ShapeLayout, SpanFont, SpanLayout};
use crate::rect::Rect;
use crate::units::{cm, Pt};
use id_arena::Id;
use log::{debug, warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

/// What happened when an image was placed
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Placed,
    /// No image was supplied, or the file it points to doesn't exist
    Missing,
    /// The image was supplied but couldn't be read or decoded
    Invalid,
}

/// How [ReportCanvas::place_image] treats its box and the image
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageStyle {
    /// Stroke the box whether or not the image loads
    pub outlined: bool,
    /// Composite transparent images over white
    pub flatten: bool,
}

impl ImageStyle {
    pub const PHOTO: ImageStyle = ImageStyle {
        outlined: true,
        flatten: false,
    };
    pub const SIGNATURE: ImageStyle = ImageStyle {
        outlined: false,
        flatten: true,
    };
}

/// The per-page identity printed in the letterhead
#[derive(Debug, Clone, PartialEq)]
pub struct PageHeader {
    pub folio: String,
    pub date: String,
    pub technician: String,
    pub locality: String,
}

struct Logo {
    id: Id<Image>,
    width: u32,
    height: u32,
}

/// Draws onto the pages of one report. Owns the document being built and the
/// page currently being drawn; new pages are started through [PageSink].
pub struct ReportCanvas<'a> {
    config: &'a LayoutConfig,
    letterhead: &'a Letterhead,
    header: PageHeader,
    document: Document,
    page: Page,
    started: bool,
    regular: Id<Font>,
    bold: Id<Font>,
    logo: Option<Logo>,
}

impl<'a> ReportCanvas<'a> {
    pub fn new(
        config: &'a LayoutConfig,
        letterhead: &'a Letterhead,
        header: PageHeader,
        regular: Font,
        bold: Font,
    ) -> ReportCanvas<'a> {
        let mut document = Document::default();
        let regular = document.add_font(regular);
        let bold = document.add_font(bold);

        let logo = match ImageLoad::from_source(&letterhead.logo) {
            ImageLoad::Loaded(image) => {
                let (width, height) = (image.width, image.height);
                let id = document.add_image(image);
                Some(Logo { id, width, height })
            }
            ImageLoad::Missing => None,
            ImageLoad::Invalid(e) => {
                warn!("letterhead logo could not be loaded: {e}");
                None
            }
        };

        ReportCanvas {
            config,
            letterhead,
            header,
            document,
            page: Page::new(config.page_size, Some(config.margins())),
            started: false,
            regular,
            bold,
            logo,
        }
    }

    pub fn font(&self, face: Face) -> &Font {
        &self.document.fonts[self.font_id(face)]
    }

    fn font_id(&self, face: Face) -> Id<Font> {
        match face {
            Face::Regular => self.regular,
            Face::Bold => self.bold,
        }
    }

    pub fn width(&self, text: &str, face: Face, size: Pt) -> Pt {
        width_of_text(text, self.font(face), size)
    }

    pub fn wrap(&self, text: &str, max_width: Pt, face: Face, size: Pt) -> Vec<String> {
        wrap_text(text, max_width, self.font(face), size)
    }

    /// Wrap to at most `max_lines`, ellipsizing where text was cut
    pub fn wrap_clamped(
        &self,
        text: &str,
        max_width: Pt,
        face: Face,
        size: Pt,
        max_lines: usize,
    ) -> Vec<String> {
        wrap_text_clamped(text, max_width, self.font(face), size, max_lines)
    }

    pub fn ellipsize(&self, text: &str, max_width: Pt, face: Face, size: Pt) -> String {
        ellipsize(text, max_width, self.font(face), size)
    }

    pub fn text(&mut self, text: &str, x: Pt, y: Pt, face: Face, size: Pt) {
        let colour = self.config.palette.text;
        self.text_coloured(text, x, y, face, size, colour);
    }

    pub fn text_coloured(
        &mut self,
        text: &str,
        x: Pt,
        y: Pt,
        face: Face,
        size: Pt,
        colour: Colour,
    ) {
        if text.is_empty() {
            return;
        }
        self.page.add_span(SpanLayout {
            text: text.to_string(),
            font: SpanFont {
                id: self.font_id(face),
                size,
            },
            colour,
            coords: (x, y),
        });
    }

    /// Draw text so that it ends at `right`
    pub fn text_right(&mut self, text: &str, right: Pt, y: Pt, face: Face, size: Pt) {
        let width = self.width(text, face, size);
        self.text(text, right - width, y, face, size);
    }

    pub fn stroke_rect(&mut self, rect: Rect, colour: Colour) {
        self.shape(Shape::Rect(rect), Some(colour), None);
    }

    pub fn fill_rect(&mut self, rect: Rect, colour: Colour) {
        self.shape(Shape::Rect(rect), None, Some(colour));
    }

    pub fn rounded_rect(&mut self, rect: Rect, stroke: Option<Colour>, fill: Option<Colour>) {
        self.shape(
            Shape::RoundedRect(rect, self.config.corner_radius),
            stroke,
            fill,
        );
    }

    pub fn line(&mut self, from: (Pt, Pt), to: (Pt, Pt), colour: Colour) {
        self.shape(Shape::Line(from, to), Some(colour), None);
    }

    fn shape(&mut self, shape: Shape, stroke: Option<Colour>, fill: Option<Colour>) {
        self.page.add_shape(ShapeLayout {
            shape,
            stroke: stroke.map(|colour| (colour, Pt(1.0))),
            fill,
        });
    }

    /// Draw an image aspect-fitted into `frame`, anchored at its lower-left
    /// corner. Failures leave the box empty and are reported, never raised.
    pub fn place_image(
        &mut self,
        source: &ImageSource,
        frame: Rect,
        style: ImageStyle,
    ) -> ImageOutcome {
        if style.outlined {
            self.stroke_rect(frame, self.config.palette.cell_border);
        }
        match ImageLoad::from_source(source) {
            ImageLoad::Loaded(image) => {
                let image = if style.flatten { image.on_white() } else { image };
                let position = frame.fit_aspect(image.width as f32, image.height as f32);
                let image_id = self.document.add_image(image);
                self.page.add_image(ImageLayout { image_id, position });
                ImageOutcome::Placed
            }
            ImageLoad::Missing => {
                if !source.is_missing() {
                    warn!("image not found: {source:?}");
                }
                ImageOutcome::Missing
            }
            ImageLoad::Invalid(e) => {
                warn!("image could not be decoded, leaving its box empty: {e}");
                ImageOutcome::Invalid
            }
        }
    }

    /// Close the last page and hand over the finished document
    pub fn finish(mut self, info: Info) -> Document {
        if self.started {
            let last = std::mem::replace(
                &mut self.page,
                Page::new(self.config.page_size, None),
            );
            self.document.add_page(last);
        }
        self.document.set_info(info);
        self.document
    }

    fn paint_header(&mut self) {
        let config = self.config;
        let sizes = config.fonts;
        let top = config.page_height();
        let right = config.page_width() - cm(2.0);
        let left = config.frame_x();

        if let Some(logo) = &self.logo {
            let frame = Rect::from_origin(left, top - cm(2.1), cm(4.2), cm(1.6));
            let position = frame.fit_aspect(logo.width as f32, logo.height as f32);
            let image_id = logo.id;
            self.page.add_image(ImageLayout { image_id, position });
        }

        let letterhead = self.letterhead;
        self.text(
            &letterhead.title,
            left + config.frame_width() / 3.0,
            top - cm(1.6),
            Face::Bold,
            sizes.header_title,
        );

        let folio_y = top - cm(1.5);
        self.text_right(
            "Folio:",
            config.page_width() - cm(4.5),
            folio_y,
            Face::Regular,
            sizes.header,
        );
        let folio = self.header.folio.clone();
        let folio_x = right - self.width(&folio, Face::Bold, sizes.folio);
        self.text_coloured(
            &folio,
            folio_x,
            folio_y,
            Face::Bold,
            sizes.folio,
            config.palette.folio,
        );

        let date = format!("Fecha: {}", self.header.date);
        let technician = format!("Técnico: {}", self.header.technician);
        let locality = format!("Localidad: {}", self.header.locality);
        self.text_right(&date, right, top - cm(2.0), Face::Regular, sizes.header);
        self.text_right(&technician, right, top - cm(2.5), Face::Regular, sizes.header);
        self.text(&locality, left, top - cm(2.5), Face::Regular, sizes.header);

        let rule_y = top - cm(2.8);
        self.line(
            (left, rule_y),
            (left + config.frame_width(), rule_y),
            config.palette.header_rule,
        );
    }

    fn paint_footer(&mut self) {
        let config = self.config;
        let sizes = config.fonts;
        let base = cm(1.35);
        let height = cm(1.9);
        let gap = cm(0.4);
        let padding = cm(0.2);

        let band = Rect::from_origin(config.frame_x(), base - padding, config.frame_width(), height);
        self.rounded_rect(
            band,
            Some(config.palette.footer_border),
            Some(config.palette.footer_fill),
        );

        let letterhead = self.letterhead;
        let columns = &letterhead.footer;
        if columns.is_empty() {
            return;
        }
        let count = columns.len() as f32;
        let column_width = (config.frame_width() - gap * (count - 1.0)) / count;
        for (i, column) in columns.iter().enumerate() {
            let x = config.frame_x() + padding + (column_width + gap) * i as f32;
            self.text(
                &column.title,
                x,
                base + height - cm(0.55),
                Face::Bold,
                sizes.footer_title,
            );
            let mut y = base + height - cm(1.0);
            for line in &column.lines {
                for piece in self.wrap(line, column_width - padding, Face::Regular, sizes.footer) {
                    self.text(&piece, x, y, Face::Regular, sizes.footer);
                    y -= cm(0.34);
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn current_page(&self) -> &Page {
        &self.page
    }
}

impl PageSink for ReportCanvas<'_> {
    fn start_page(&mut self) {
        let next = Page::new(self.config.page_size, Some(self.config.margins()));
        let finished = std::mem::replace(&mut self.page, next);
        if self.started {
            self.document.add_page(finished);
        }
        self.started = true;
        debug!("starting page {}", self.document.page_count() + 1);
        self.paint_header();
        self.paint_footer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::tests::png_bytes;

    fn header() -> PageHeader {
        PageHeader {
            folio: "TIJ-0042".into(),
            date: "2024-05-02".into(),
            technician: "Juan Pérez".into(),
            locality: "Tijuana".into(),
        }
    }

    fn texts(page: &Page) -> Vec<String> {
        page.spans().map(|s| s.text.clone()).collect()
    }

    #[test]
    fn furniture_is_painted_on_every_new_page() {
        let config = LayoutConfig::default();
        let letterhead = Letterhead::default();
        let mut canvas =
            ReportCanvas::new(&config, &letterhead, header(), Font::helvetica(), Font::helvetica_bold());
        canvas.start_page();
        let first = texts(canvas.current_page());
        assert!(first.contains(&"TIJ-0042".to_string()));
        assert!(first.contains(&"Técnico: Juan Pérez".to_string()));
        assert!(first.contains(&"REPORTE TÉCNICO".to_string()));

        canvas.start_page();
        assert_eq!(texts(canvas.current_page()), first);
        let document = canvas.finish(Info::new());
        assert_eq!(document.page_count(), 2);
    }

    #[test]
    fn folio_is_right_aligned_in_red() {
        let config = LayoutConfig::default();
        let letterhead = Letterhead::default();
        let mut canvas =
            ReportCanvas::new(&config, &letterhead, header(), Font::helvetica(), Font::helvetica_bold());
        canvas.start_page();
        let folio = canvas
            .current_page()
            .spans()
            .find(|s| s.text == "TIJ-0042")
            .cloned()
            .expect("folio is printed");
        assert_eq!(folio.colour, config.palette.folio);
        let end = folio.coords.0 + canvas.width("TIJ-0042", Face::Bold, config.fonts.folio);
        assert!((end.0 - (config.page_width() - cm(2.0)).0).abs() < 0.01);
    }

    #[test]
    fn image_outcomes_are_reported() {
        let config = LayoutConfig::default();
        let letterhead = Letterhead::default();
        let mut canvas =
            ReportCanvas::new(&config, &letterhead, header(), Font::helvetica(), Font::helvetica_bold());
        canvas.start_page();
        let frame = Rect::from_origin(Pt(50.0), Pt(300.0), Pt(200.0), Pt(100.0));

        let placed = canvas.place_image(
            &ImageSource::Bytes(png_bytes(40, 10, [0, 0, 0, 0])),
            frame,
            ImageStyle::SIGNATURE,
        );
        assert_eq!(placed, ImageOutcome::Placed);
        assert_eq!(
            canvas.place_image(&ImageSource::Missing, frame, ImageStyle::PHOTO),
            ImageOutcome::Missing
        );
        assert_eq!(
            canvas.place_image(&ImageSource::Bytes(vec![1, 2, 3]), frame, ImageStyle::PHOTO),
            ImageOutcome::Invalid
        );

        let images: Vec<&ImageLayout> = canvas
            .current_page()
            .contents
            .iter()
            .filter_map(|c| match c {
                crate::page::PageContents::Image(image) => Some(image),
                _ => None,
            })
            .collect();
        assert_eq!(images.len(), 1);
        // 4:1 image in a 2:1 box is limited by the width
        assert_eq!(images[0].position.width(), Pt(200.0));
        assert_eq!(images[0].position.height(), Pt(50.0));
    }

    #[test]
    fn logo_is_drawn_when_supplied() {
        let config = LayoutConfig::default();
        let letterhead = Letterhead::default().with_logo(png_bytes(8, 3, [0, 90, 160, 255]));
        let mut canvas =
            ReportCanvas::new(&config, &letterhead, header(), Font::helvetica(), Font::helvetica_bold());
        canvas.start_page();
        let has_image = canvas
            .current_page()
            .contents
            .iter()
            .any(|c| matches!(c, crate::page::PageContents::Image(_)));
        assert!(has_image);
    }
}
