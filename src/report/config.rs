use crate::colour::{colours, Colour};
use crate::image::ImageSource;
use crate::layout::Margins;
use crate::pagesize::{self, PageSize};
use crate::units::{Cm, Pt};

/// Colours used for the page furniture and frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: Colour,
    pub folio: Colour,
    pub header_rule: Colour,
    pub frame_border: Colour,
    pub title_strip: Colour,
    pub row_border: Colour,
    pub cell_border: Colour,
    pub footer_fill: Colour,
    pub footer_border: Colour,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            text: colours::BLACK,
            folio: colours::FOLIO_RED,
            header_rule: colours::HEADER_RULE,
            frame_border: colours::FRAME_BORDER,
            title_strip: colours::TITLE_STRIP,
            row_border: colours::ROW_BORDER,
            cell_border: colours::BLACK,
            footer_fill: colours::FOOTER_FILL,
            footer_border: colours::FOOTER_BORDER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizes {
    pub body: Pt,
    pub section_title: Pt,
    pub header_title: Pt,
    pub header: Pt,
    pub folio: Pt,
    pub footer_title: Pt,
    pub footer: Pt,
    pub table: Pt,
    pub table_header: Pt,
    pub checklist: Pt,
    pub checklist_header: Pt,
    pub spm: Pt,
    pub spm_label: Pt,
    pub spm_header: Pt,
    pub caption: Pt,
}

impl Default for FontSizes {
    fn default() -> Self {
        FontSizes {
            body: Pt(9.0),
            section_title: Pt(10.0),
            header_title: Pt(14.0),
            header: Pt(9.0),
            folio: Pt(10.0),
            footer_title: Pt(8.0),
            footer: Pt(7.6),
            table: Pt(8.6),
            table_header: Pt(8.7),
            checklist: Pt(7.8),
            checklist_header: Pt(8.4),
            spm: Pt(7.0),
            spm_label: Pt(8.0),
            spm_header: Pt(7.2),
            caption: Pt(8.2),
        }
    }
}

/// Column widths of the tables, as fractions of the inner content width so
/// that tables scale with the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableGeometry {
    pub readings_label: f32,
    pub electrical_label: f32,
    pub electrical_cell: f32,
    pub checklist_activity: f32,
    pub checklist_status: f32,
    pub checklist_gutter: f32,
    pub spm_label: f32,
    pub spm_row_height: Pt,
}

impl Default for TableGeometry {
    fn default() -> Self {
        // measured against a 17.6 cm content width
        TableGeometry {
            readings_label: 10.8 / 17.6,
            electrical_label: 7.6 / 17.6,
            electrical_cell: 3.1 / 17.6,
            checklist_activity: 5.9 / 17.6,
            checklist_status: 2.0 / 17.6,
            checklist_gutter: 0.6 / 17.6,
            spm_label: 3.4 / 17.6,
            spm_row_height: Cm(0.68).into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoGeometry {
    pub gutter: Pt,
    /// Image box height as a fraction of its width
    pub aspect: f32,
    pub caption_height: Pt,
    pub row_gap: Pt,
    pub max_photos: usize,
    /// Log services print fewer photos
    pub max_log_photos: usize,
}

impl Default for PhotoGeometry {
    fn default() -> Self {
        PhotoGeometry {
            gutter: Cm(0.9).into(),
            aspect: 0.7,
            caption_height: Cm(1.1).into(),
            row_gap: Cm(0.6).into(),
            max_photos: 4,
            max_log_photos: 2,
        }
    }
}

/// All layout constants of a report. The defaults reproduce the printed A4
/// form; tests render at other sizes through [LayoutConfig::with_page_size].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page_size: PageSize,
    /// Distance from the page edge to the section frames
    pub side_margin: Pt,
    /// Band reserved at the top of each page for the letterhead
    pub header_height: Pt,
    /// Nothing flows below this distance from the bottom edge
    pub footer_height: Pt,
    /// Left inset of content inside a frame
    pub content_inset: Pt,
    /// Width trimmed from each side of a frame to get the content width
    pub content_gutter: Pt,
    pub line_height: Pt,
    pub section_gap: Pt,
    pub title_strip_height: Pt,
    /// Distance from a frame's top to its interior
    pub title_inset: Pt,
    pub corner_radius: Pt,
    /// Space between the last line of content and the bottom of its frame
    pub frame_padding: Pt,
    pub signature_height: Pt,
    pub signature_box: (Pt, Pt),
    pub fonts: FontSizes,
    pub tables: TableGeometry,
    pub photos: PhotoGeometry,
    pub palette: Palette,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_size: pagesize::A4,
            side_margin: Cm(1.5).into(),
            header_height: Cm(3.2).into(),
            footer_height: Cm(3.2).into(),
            content_inset: Cm(0.3).into(),
            content_gutter: Cm(0.2).into(),
            line_height: Cm(0.52).into(),
            section_gap: Cm(0.2).into(),
            title_strip_height: Pt(18.0),
            title_inset: Pt(22.0),
            corner_radius: Pt(6.0),
            frame_padding: Cm(0.3).into(),
            signature_height: Cm(4.2).into(),
            signature_box: (Cm(7.2).into(), Cm(1.6).into()),
            fonts: FontSizes::default(),
            tables: TableGeometry::default(),
            photos: PhotoGeometry::default(),
            palette: Palette::default(),
        }
    }
}

impl LayoutConfig {
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_side_margin<D: Into<Pt>>(mut self, margin: D) -> Self {
        self.side_margin = margin.into();
        self
    }

    pub fn with_header_height<D: Into<Pt>>(mut self, height: D) -> Self {
        self.header_height = height.into();
        self
    }

    pub fn with_footer_height<D: Into<Pt>>(mut self, height: D) -> Self {
        self.footer_height = height.into();
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn page_width(&self) -> Pt {
        self.page_size.0
    }

    pub fn page_height(&self) -> Pt {
        self.page_size.1
    }

    /// Where content starts flowing on every page
    pub fn content_top(&self) -> Pt {
        self.page_height() - self.header_height
    }

    /// The lowest y any content may reach
    pub fn content_bottom(&self) -> Pt {
        self.footer_height
    }

    pub fn frame_x(&self) -> Pt {
        self.side_margin
    }

    pub fn frame_width(&self) -> Pt {
        self.page_width() - self.side_margin * 2.0
    }

    pub fn inner_x(&self) -> Pt {
        self.frame_x() + self.content_inset
    }

    pub fn inner_width(&self) -> Pt {
        self.frame_width() - self.content_gutter * 2.0
    }

    /// Page margins matching the flow area, used for each page's art box
    pub fn margins(&self) -> Margins {
        Margins::trbl(
            self.header_height,
            self.side_margin,
            self.footer_height,
            self.side_margin,
        )
    }
}

/// One block of the company footer
#[derive(Debug, Clone, PartialEq)]
pub struct FooterColumn {
    pub title: String,
    pub lines: Vec<String>,
}

impl FooterColumn {
    pub fn new<T: ToString>(title: T, lines: &[&str]) -> FooterColumn {
        FooterColumn {
            title: title.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// The furniture repeated on every page
#[derive(Debug, Clone, PartialEq)]
pub struct Letterhead {
    pub title: String,
    pub logo: ImageSource,
    pub footer: Vec<FooterColumn>,
}

const COMPANY: &str = "INGENIERIA EN AIRE SA DE CV        RFC: IAI1605258G6";

impl Default for Letterhead {
    fn default() -> Self {
        Letterhead {
            title: "REPORTE TÉCNICO".to_string(),
            logo: ImageSource::Missing,
            footer: vec![
                FooterColumn::new(
                    COMPANY,
                    &[
                        "Avenida Alfonso Vidal y Planas #445, Interior S/N, Colonia Nueva Tijuana,",
                        "Tijuana, Baja California, México, CP: 22435, Lada 664 Tel(s) 250-0022",
                    ],
                ),
                FooterColumn::new(
                    COMPANY,
                    &[
                        "Avenida del Carmen #3863, Fracc. Residencias, Mexicali, Baja California, México,",
                        "CP: 21280, Lada 686 Tel(s) 962-9932",
                    ],
                ),
            ],
        }
    }
}

impl Letterhead {
    pub fn with_logo<S: Into<ImageSource>>(mut self, logo: S) -> Self {
        self.logo = logo.into();
        self
    }
}
