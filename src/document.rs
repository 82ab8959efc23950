use crate::{
    font::Font,
    image::Image,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
    ReportError,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<Font>,
    pub images: Arena<Image>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its id
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// The pages in document order
    pub fn pages_in_order(&self) -> impl Iterator<Item = &Page> {
        self.page_order.iter().filter_map(|id| self.pages.get(*id))
    }

    /// Add a font to the document structure. Fonts are stored "globally" within the
    /// document, such that any page can refer to them by the returned id.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Add an image to the document structure. Images are stored "globally" within the
    /// document, so a page can place the same image more than once.
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Write the entire document to the writer. The whole document is rendered
    /// in memory first, then handed to `w` in one go.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), ReportError> {
        let bytes = self.to_bytes()?;
        w.write_all(bytes.as_slice()).map_err(Into::into)
    }

    /// Render the finished PDF into memory
    pub fn to_bytes(self) -> Result<Vec<u8>, ReportError> {
        let Document {
            info,
            pages,
            page_order,
            fonts,
            images,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        // page refs are keyed by position in the document, not arena index
        let page_refs: Vec<Ref> = (0..page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, font) in fonts.iter() {
            font.write(&mut refs, id, &mut writer)?;
        }

        for (id, image) in images.iter() {
            image.write(&mut refs, id.index(), &mut writer);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(ReportError::PageMissing(page_index))?;
            page.write(&mut refs, page_index, &fonts, &images, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        Ok(writer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pagesize, Colour, Pt, SpanFont, SpanLayout};

    #[test]
    fn writes_a_minimal_pdf() {
        let mut doc = Document::default();
        let font = doc.add_font(Font::helvetica());
        let mut page = Page::new(pagesize::A4, None);
        page.add_span(SpanLayout {
            text: "Hola".into(),
            font: SpanFont { id: font, size: Pt(12.0) },
            colour: Colour::new_grey(0.0),
            coords: (Pt(72.0), Pt(720.0)),
        });
        doc.add_page(page);
        doc.add_page(Page::new(pagesize::A4, None));
        assert_eq!(doc.page_count(), 2);

        let bytes = doc.to_bytes().expect("can write document");
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("/Helvetica"));
        assert!(text.contains("/Count 2"));
    }

    #[test]
    fn write_forwards_bytes_to_the_writer() {
        let mut doc = Document::default();
        doc.add_page(Page::new(pagesize::LETTER, None));
        let mut out: Vec<u8> = Vec::new();
        doc.write(&mut out).expect("can write document");
        assert!(out.ends_with(b"%%EOF") || out.ends_with(b"%%EOF\n"));
    }
}
