//! Plot color codes.
//!
//! Color codes travel through the output tuple as small integers encoded
//! as `f64`, with NaN meaning "no color this bar". The host maps the code
//! to its palette by index.

/// Plot palette index for two-state up/down coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    /// Up state (palette index 0)
    Up,
    /// Down state (palette index 1)
    Down,
}

impl ColorCode {
    /// Encodes the color as its palette index.
    #[must_use]
    pub fn to_value(self) -> f64 {
        match self {
            ColorCode::Up => 0.0,
            ColorCode::Down => 1.0,
        }
    }

    /// Encodes an optional color, NaN when absent.
    #[must_use]
    pub fn value_or_nan(color: Option<ColorCode>) -> f64 {
        color.map_or(f64::NAN, ColorCode::to_value)
    }

    /// Picks Up for non-negative values, Down otherwise.
    /// NaN carries no color.
    #[must_use]
    pub fn from_sign(value: f64) -> Option<ColorCode> {
        if value.is_nan() {
            None
        } else if value >= 0.0 {
            Some(ColorCode::Up)
        } else {
            Some(ColorCode::Down)
        }
    }
}
