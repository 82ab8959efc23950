use crate::units::Pt;
use log::{debug, warn};

/// Whatever owns the pages. The cursor asks it for a fresh page whenever a
/// block doesn't fit; the sink closes the current page, opens the next one
/// and paints its furniture.
pub trait PageSink {
    fn start_page(&mut self);
}

/// Tolerance for rows that fit exactly
const EPSILON: f32 = 1e-3;

/// The vertical write position of a report, moving down the page (PDF y
/// decreases). All page breaks go through [PageCursor::ensure_space].
#[derive(Debug, Clone)]
pub struct PageCursor {
    y: Pt,
    top: Pt,
    bottom: Pt,
    pages: usize,
    fresh: bool,
}

impl PageCursor {
    pub fn new(top: Pt, bottom: Pt) -> PageCursor {
        PageCursor {
            y: top,
            top,
            bottom,
            pages: 0,
            fresh: false,
        }
    }

    /// The current write position
    pub fn y(&self) -> Pt {
        self.y
    }

    pub fn top(&self) -> Pt {
        self.top
    }

    pub fn bottom(&self) -> Pt {
        self.bottom
    }

    /// Number of pages started so far, which is also the 1-based number of
    /// the current page
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// True while nothing has been placed on a newly started page
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Space left above the bottom limit
    pub fn available(&self) -> Pt {
        self.y - self.bottom
    }

    /// Start the first page if there isn't one yet
    pub fn begin<S: PageSink + ?Sized>(&mut self, sink: &mut S) -> Pt {
        if self.pages == 0 {
            self.new_page(sink);
        }
        self.y
    }

    /// Make sure a block of `height` fits below the cursor, starting a new
    /// page if it doesn't. Returns the y at which the block should start.
    ///
    /// A fresh page is never broken again: a block taller than a whole page
    /// is placed at the top and allowed to run over.
    pub fn ensure_space<S: PageSink + ?Sized>(&mut self, sink: &mut S, height: Pt) -> Pt {
        if self.pages == 0 {
            self.new_page(sink);
        }
        if self.y - height >= self.bottom - Pt(EPSILON) {
            return self.y;
        }
        if self.fresh {
            warn!(
                "block of {:.1}pt is taller than a page ({:.1}pt available), placing it anyway",
                height.0,
                self.available().0
            );
            return self.y;
        }
        debug!(
            "{:.1}pt needed, {:.1}pt left on page {}: breaking",
            height.0,
            self.available().0,
            self.pages
        );
        self.new_page(sink);
        self.y
    }

    /// Move the cursor to `y` once a block has been drawn. The cursor only
    /// ever moves down.
    pub fn advance_to(&mut self, y: Pt) {
        if y < self.y {
            self.y = y;
            self.fresh = false;
        }
    }

    /// How many rows of `row_height` fit under a block header of `overhead`
    /// at the current position
    pub fn rows_fit(&self, overhead: Pt, row_height: Pt) -> usize {
        rows_within(self.available(), overhead, row_height)
    }

    /// Reserve space for the next chunk of a table of `remaining` equal rows.
    ///
    /// A table that fits on a page is kept together: if it doesn't fit in the
    /// space left, the page is broken first. A table longer than a page is
    /// split, filling each page. Returns the top of the chunk and the number
    /// of rows it holds, which is at least one whenever rows remain.
    pub fn reserve_rows<S: PageSink + ?Sized>(
        &mut self,
        sink: &mut S,
        overhead: Pt,
        row_height: Pt,
        remaining: usize,
    ) -> (Pt, usize) {
        let per_page = rows_within(self.top - self.bottom, overhead, row_height).max(1);
        let wanted = remaining.min(per_page);
        let y = self.ensure_space(sink, overhead + row_height * wanted as f32);
        let rows = remaining.min(self.rows_fit(overhead, row_height).max(1));
        (y, rows)
    }

    fn new_page<S: PageSink + ?Sized>(&mut self, sink: &mut S) {
        sink.start_page();
        self.pages += 1;
        self.y = self.top;
        self.fresh = true;
    }
}

fn rows_within(space: Pt, overhead: Pt, row_height: Pt) -> usize {
    if row_height <= Pt(0.0) {
        return usize::MAX;
    }
    let rows = ((space - overhead) / row_height + EPSILON).floor();
    if rows <= 0.0 {
        0
    } else {
        rows as usize
    }
}
