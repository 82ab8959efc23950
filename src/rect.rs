use crate::units::*;

/// A rectangle, specified by two opposite corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the lower-left corner.
    pub x1: Pt,
    /// The y-coordinate of the lower-left corner.
    pub y1: Pt,
    /// The x-coordinate of the upper-right corner.
    pub x2: Pt,
    /// The y-coordinate of the upper-right corner.
    pub y2: Pt,
}

impl Rect {
    /// Build a rectangle from its lower-left corner and its size
    pub fn from_origin(x: Pt, y: Pt, width: Pt, height: Pt) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Build a rectangle hanging down from a top-left corner, which is how the
    /// report flows position most boxes
    pub fn from_top_left(x: Pt, top: Pt, width: Pt, height: Pt) -> Rect {
        Rect::from_origin(x, top - height, width, height)
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    /// The largest rectangle with the aspect ratio `width:height` that fits
    /// inside `self`, anchored at the lower-left corner. Degenerate sizes
    /// yield an empty rectangle at the anchor.
    pub fn fit_aspect(&self, width: f32, height: f32) -> Rect {
        if width <= 0.0 || height <= 0.0 || self.width().0 <= 0.0 || self.height().0 <= 0.0 {
            return Rect::from_origin(self.x1, self.y1, Pt(0.0), Pt(0.0));
        }
        let scale = (self.width().0 / width).min(self.height().0 / height);
        Rect::from_origin(self.x1, self.y1, Pt(width * scale), Pt(height * scale))
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_aspect_preserves_ratio_and_anchor() {
        let frame = Rect::from_origin(Pt(10.0), Pt(20.0), Pt(200.0), Pt(100.0));

        let wide = frame.fit_aspect(400.0, 100.0);
        assert_eq!(wide, Rect::from_origin(Pt(10.0), Pt(20.0), Pt(200.0), Pt(50.0)));

        let tall = frame.fit_aspect(50.0, 100.0);
        assert_eq!(tall, Rect::from_origin(Pt(10.0), Pt(20.0), Pt(50.0), Pt(100.0)));
    }

    #[test]
    fn fit_aspect_of_empty_image_is_empty() {
        let frame = Rect::from_origin(Pt(0.0), Pt(0.0), Pt(10.0), Pt(10.0));
        let fitted = frame.fit_aspect(0.0, 5.0);
        assert_eq!(fitted.width(), Pt(0.0));
        assert_eq!(fitted.height(), Pt(0.0));
    }

    #[test]
    fn top_left_hangs_down() {
        let r = Rect::from_top_left(Pt(5.0), Pt(100.0), Pt(10.0), Pt(30.0));
        assert_eq!(r.y1, Pt(70.0));
        assert_eq!(r.y2, Pt(100.0));
    }
}
