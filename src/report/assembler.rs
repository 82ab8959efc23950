use super::canvas::{ImageOutcome, PageHeader, ReportCanvas};
use super::config::{LayoutConfig, Letterhead};
use super::frame::Flow;
use super::record::ReportRecord;
use super::selector::{ReportPlan, VariantBlock};
use crate::document::Document;
use crate::error::ReportError;
use crate::font::Font;
use crate::info::Info;
use log::info;
use std::time::Instant;

/// One titled section as it ended up on paper
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionSummary {
    pub title: String,
    /// Table rows, checklist activities, text lines or photos, depending on
    /// the section
    pub rows: usize,
    /// 1-based numbers of the pages the section appears on
    pub pages: Vec<usize>,
}

/// What a render produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    pub pages: usize,
    /// In drawing order; a section continued over several pages is listed once
    pub sections: Vec<SectionSummary>,
    /// Rows in the left and right checklist columns
    pub checklist_columns: Option<(usize, usize)>,
    pub photos: Vec<ImageOutcome>,
    /// Technician first, then client
    pub signatures: Vec<ImageOutcome>,
}

impl RenderSummary {
    pub fn section(&self, title: &str) -> Option<&SectionSummary> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn has_section(&self, title: &str) -> bool {
        self.section(title).is_some()
    }

    fn section_mut(&mut self, title: &str) -> &mut SectionSummary {
        match self.sections.iter().position(|s| s.title == title) {
            Some(i) => &mut self.sections[i],
            None => {
                self.sections.push(SectionSummary {
                    title: title.to_string(),
                    ..SectionSummary::default()
                });
                let last = self.sections.len() - 1;
                &mut self.sections[last]
            }
        }
    }

    pub(crate) fn note_page(&mut self, title: &str, page: usize) {
        let section = self.section_mut(title);
        if section.pages.last() != Some(&page) {
            section.pages.push(page);
        }
    }

    pub(crate) fn add_rows(&mut self, title: &str, rows: usize) {
        self.section_mut(title).rows += rows;
    }
}

/// Renders maintenance reports. One renderer can be reused for any number of
/// records; each render owns its own document and cursor.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    config: LayoutConfig,
    letterhead: Letterhead,
    regular: Font,
    bold: Font,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        ReportRenderer::new()
    }
}

impl ReportRenderer {
    /// A4, Helvetica and the default letterhead
    pub fn new() -> ReportRenderer {
        ReportRenderer {
            config: LayoutConfig::default(),
            letterhead: Letterhead::default(),
            regular: Font::helvetica(),
            bold: Font::helvetica_bold(),
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_letterhead(mut self, letterhead: Letterhead) -> Self {
        self.letterhead = letterhead;
        self
    }

    /// Use other faces for body text and labels
    pub fn with_fonts(mut self, regular: Font, bold: Font) -> Self {
        self.regular = regular;
        self.bold = bold;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay the record out without serializing it
    pub fn layout(&self, record: &ReportRecord) -> Result<(Document, RenderSummary), ReportError> {
        let plan = ReportPlan::new(record, &self.config);
        let header = PageHeader {
            folio: record.folio.clone(),
            date: record.date.clone(),
            technician: record.technician.clone(),
            locality: record.locality.clone(),
        };
        let canvas = ReportCanvas::new(
            &self.config,
            &self.letterhead,
            header,
            self.regular.clone(),
            self.bold.clone(),
        );
        let mut flow = Flow::new(canvas, &self.config);
        flow.begin();

        flow.row_section(&plan.client);
        flow.row_section(&plan.service_section);
        flow.row_section(&plan.equipment_section);

        match &plan.variant {
            VariantBlock::Preventive {
                checklist,
                other_activities,
                noise,
            } => {
                flow.checklist(checklist, *other_activities);
                flow.noise(noise);
            }
            VariantBlock::Corrective { blocks } => {
                for (title, text) in blocks {
                    flow.text_section(title, text);
                }
            }
            VariantBlock::None => {}
        }

        for table in &plan.readings {
            flow.readings(table);
        }
        flow.electrical(&plan.electrical);
        flow.observations(plan.observations);
        flow.photos(&plan.photos);
        flow.signatures(plan.signatures);

        let mut info = Info::new();
        info.title(format!("{} {}", self.letterhead.title, record.folio))
            .author(&record.technician)
            .subject(&record.service.kind)
            .keywords(format!("{}, {}", record.equipment.kind, record.locality));

        let Flow {
            canvas,
            mut summary,
            ..
        } = flow;
        let document = canvas.finish(info);
        summary.pages = document.page_count();
        Ok((document, summary))
    }

    /// Render a record into the bytes of a PDF file
    pub fn render(&self, record: &ReportRecord) -> Result<Vec<u8>, ReportError> {
        self.render_with_summary(record).map(|(bytes, _)| bytes)
    }

    pub fn render_with_summary(
        &self,
        record: &ReportRecord,
    ) -> Result<(Vec<u8>, RenderSummary), ReportError> {
        let start = Instant::now();
        let (document, summary) = self.layout(record)?;
        let bytes = document.to_bytes()?;
        info!(
            "rendered report {} in {:?}: {} page(s), {} bytes",
            record.folio,
            start.elapsed(),
            summary.pages,
            bytes.len()
        );
        Ok((bytes, summary))
    }
}
