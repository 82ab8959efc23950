//! Measuring and wrapping text, and the margins that bound a page's content.
//!
//! Everything here is pure: nothing draws, so the report flows can size a block
//! completely before asking for space on the page.
//!
//! # Example
//!
//! ```
//! use service_report::{Font, Pt};
//! use service_report::layout::{wrap_text, width_of_text};
//!
//! let font = Font::helvetica();
//! let lines = wrap_text("Cambio de filtro de aire", Pt(60.0), &font, Pt(9.0));
//! assert!(lines.len() > 1);
//! assert!(lines.iter().all(|l| width_of_text(l, &font, Pt(9.0)) <= Pt(60.0)));
//! ```

mod margins;
mod text;

pub use margins::*;
pub use text::*;
