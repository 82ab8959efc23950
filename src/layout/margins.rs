use crate::units::Pt;

/// Margins bound where flowing content may be placed on a page. They are also
/// applied to [`Page`](crate::Page)s to set the `ArtBox` of each page in the
/// generated PDF.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::all(Pt(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Cm;

    #[test]
    fn all_converts_units() {
        let m = Margins::all(Cm(2.54));
        assert!((m.left.0 - 72.0).abs() < 1e-3);
        assert_eq!(m.top, m.bottom);
    }
}
