/// A fill or stroke colour, expressed in the RGB or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub const fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub const fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }
}

/// Colours used by the report furniture
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    /// Folio number in the page header
    pub const FOLIO_RED: Colour = Colour::new_rgb(0.82, 0.0, 0.0);
    /// Rule under the page header
    pub const HEADER_RULE: Colour = Colour::new_grey(0.82);
    /// Section frame outline
    pub const FRAME_BORDER: Colour = Colour::new_grey(0.7);
    /// Shaded strip behind a section title
    pub const TITLE_STRIP: Colour = Colour::new_rgb(0.95, 0.95, 0.98);
    /// Light border around label:value rows
    pub const ROW_BORDER: Colour = Colour::new_grey(0.85);
    /// Footer background and outline
    pub const FOOTER_FILL: Colour = Colour::new_rgb(0.95, 0.96, 0.99);
    pub const FOOTER_BORDER: Colour = Colour::new_rgb(0.75, 0.75, 0.8);
}
