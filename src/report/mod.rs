//! The maintenance report engine.
//!
//! A [ReportRecord] goes in, a paginated PDF comes out. [ReportRenderer] resolves
//! which blocks apply to the record ([ReportPlan]), then flows them down the page
//! through a [PageCursor], starting new pages (with the letterhead repainted)
//! whenever a block would not fit.
//!
//! ```
//! use service_report::report::{ReportRecord, ReportRenderer};
//!
//! let mut record = ReportRecord::default();
//! record.folio = "TIJ-0042".into();
//! record.client.name = "Aceros del Norte".into();
//!
//! let pdf = ReportRenderer::new().render(&record).expect("can render report");
//! assert!(pdf.starts_with(b"%PDF"));
//! ```

mod assembler;
mod canvas;
mod config;
mod cursor;
mod flows;
mod frame;
mod record;
pub mod schema;
mod selector;

pub use assembler::*;
pub use canvas::*;
pub use config::*;
pub use cursor::*;
pub use record::*;
pub use selector::*;

/// The sentinel for absent data. Upstream normalization fills every empty
/// field with it.
pub const NOT_AVAILABLE: &str = "N/A";

/// Whether a value carries real data: not blank and not the sentinel
pub fn is_eligible(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != NOT_AVAILABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_and_blank_values_are_ineligible() {
        assert!(!is_eligible("N/A"));
        assert!(!is_eligible(" N/A "));
        assert!(!is_eligible(""));
        assert!(!is_eligible("  \t"));
        assert!(is_eligible("0"));
        assert!(is_eligible("5 (°C)"));
    }
}
