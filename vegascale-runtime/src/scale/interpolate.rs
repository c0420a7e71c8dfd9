use peniko::color::{parse_color, Srgb};
use vegascale_common::data::scalar::ScalarValue;

/// Round half away from negative infinity, the way `Math.round` does
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Interpolator between two adjacent range values
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Interpolator {
    Number { a: f64, b: f64, round: bool },
    Rgb { a: [f64; 3], b: [f64; 3] },
    /// Range values that are neither numbers nor colors
    Unsupported,
}

impl Interpolator {
    pub fn new(a: &ScalarValue, b: &ScalarValue, round: bool) -> Self {
        if let (Some(a), Some(b)) = (numeric(a), numeric(b)) {
            return Interpolator::Number { a, b, round };
        }
        match (parse_rgb(a), parse_rgb(b)) {
            (Some(a), Some(b)) => Interpolator::Rgb { a, b },
            _ => Interpolator::Unsupported,
        }
    }

    pub fn interpolate(&self, t: f64) -> ScalarValue {
        match self {
            Interpolator::Number { a, b, round } => {
                let value = a + (b - a) * t;
                ScalarValue::Number(if *round { round_half_up(value) } else { value })
            }
            Interpolator::Rgb { a, b } => {
                let channel = |i: usize| {
                    round_half_up(a[i] + (b[i] - a[i]) * t).clamp(0.0, 255.0) as u8
                };
                ScalarValue::from(format!(
                    "#{:02x}{:02x}{:02x}",
                    channel(0),
                    channel(1),
                    channel(2)
                ))
            }
            Interpolator::Unsupported => ScalarValue::Null,
        }
    }
}

fn numeric(value: &ScalarValue) -> Option<f64> {
    match value {
        ScalarValue::Number(v) => Some(*v),
        _ => None,
    }
}

/// 8-bit sRGB channels of a CSS color string
pub(crate) fn parse_rgb(value: &ScalarValue) -> Option<[f64; 3]> {
    let color = parse_color(value.as_str()?).ok()?;
    let rgba = color.to_alpha_color::<Srgb>().to_rgba8();
    Some([rgba.r as f64, rgba.g as f64, rgba.b as f64])
}
