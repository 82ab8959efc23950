use thiserror::Error;

/// All errors that can make a render fail. Anything recoverable (missing data,
/// unreadable photos, over-long words) is handled inside the engine and never
/// surfaces here.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    /// An I/O error occurred while writing the finished document
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse a font supplied for the report
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// An image required by the document could not be encoded
    Image(#[from] crate::image::ImageError),

    #[error(transparent)]
    /// A report record could not be deserialized
    Json(#[from] serde_json::Error),

    #[error("page {0} is missing from the document")]
    /// The page order refers to a page that is no longer in the document
    PageMissing(usize),

    #[error("font {0} is missing from the document")]
    /// A text span refers to a font that was never added to the document
    FontMissing(usize),

    #[error("embedded font has no usable glyphs")]
    /// A TrueType font without a unicode cmap cannot be embedded
    EmptyFont,
}
