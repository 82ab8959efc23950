//! Paginated PDF reports for compressor and dryer maintenance services.
//!
//! The low level modules ([Document], [Page], [Font], [Image]) write PDF
//! objects with `pdf-writer`; [report] lays a [report::ReportRecord] out over
//! as many pages as it needs.

mod colour;
pub use colour::*;

mod content;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Utility functions and structures to layout objects (most text) on pages
pub mod layout;

mod page;
pub use page::*;

pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// The maintenance report engine
pub mod report;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
