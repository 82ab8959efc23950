//! Length units used throughout the crate.
//!
//! Everything is laid out in PDF points ([Pt], 1/72 of an inch). The other
//! units exist so that layout constants can be written the way they are
//! measured on paper (`Cm(1.5).into()`), then converted once.

use derive_more::{Add, AddAssign, Deref, Display, From, Into, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul, Neg};

/// A length in PDF points
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    Deref,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
pub struct Pt(pub f32);

/// A length in centimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
pub struct Cm(pub f32);

/// A length in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
pub struct Mm(pub f32);

/// A length in inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
pub struct In(pub f32);

const POINTS_PER_INCH: f32 = 72.0;
const MM_PER_INCH: f32 = 25.4;

impl From<Cm> for Pt {
    fn from(v: Cm) -> Self {
        Pt(v.0 * 10.0 * POINTS_PER_INCH / MM_PER_INCH)
    }
}

impl From<Mm> for Pt {
    fn from(v: Mm) -> Self {
        Pt(v.0 * POINTS_PER_INCH / MM_PER_INCH)
    }
}

impl From<In> for Pt {
    fn from(v: In) -> Self {
        Pt(v.0 * POINTS_PER_INCH)
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Mul<Pt> for f32 {
    type Output = Pt;

    fn mul(self, rhs: Pt) -> Pt {
        Pt(self * rhs.0)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

/// Dividing two lengths gives a plain ratio
impl Div<Pt> for Pt {
    type Output = f32;

    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}

impl Neg for Pt {
    type Output = Pt;

    fn neg(self) -> Pt {
        Pt(-self.0)
    }
}

impl Pt {
    /// The smaller of two lengths
    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    /// The larger of two lengths
    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }
}

/// Shorthand for `Pt::from(Cm(v))`, used heavily by the layout constants
pub fn cm(v: f32) -> Pt {
    Cm(v).into()
}
