use crate::scale::interpolate::Interpolator;
use std::f64::consts::LN_10;
use vegascale_common::data::scalar::ScalarValue;

/// Transform applied to domain values before linear interpolation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContinuousTransform {
    Identity,
    Pow(f64),
    /// Base-10 logarithm, mirrored when the domain is negative
    Log { positive: bool },
}

impl ContinuousTransform {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ContinuousTransform::Identity => x,
            ContinuousTransform::Pow(exponent) => pow_signed(x, *exponent),
            ContinuousTransform::Log { positive: true } => x.max(0.0).ln() / LN_10,
            ContinuousTransform::Log { positive: false } => -(-x).max(0.0).ln() / LN_10,
        }
    }

    pub fn invert(&self, y: f64) -> f64 {
        match self {
            ContinuousTransform::Identity => y,
            ContinuousTransform::Pow(exponent) => pow_signed(y, 1.0 / exponent),
            ContinuousTransform::Log { positive: true } => 10f64.powf(y),
            ContinuousTransform::Log { positive: false } => -(10f64.powf(-y)),
        }
    }
}

fn pow_signed(x: f64, exponent: f64) -> f64 {
    if x < 0.0 {
        -(-x).powf(exponent)
    } else {
        x.powf(exponent)
    }
}

/// Normalizes a value against one domain segment
#[derive(Debug, Clone, Copy, PartialEq)]
struct Uninterpolate {
    a: f64,
    b: f64,
    clamp: bool,
}

impl Uninterpolate {
    fn new(a: f64, b: f64, clamp: bool) -> Self {
        Self { a, b: b - a, clamp }
    }

    fn apply(&self, x: f64) -> f64 {
        // A zero-width segment maps everything to its start
        let t = if self.b == 0.0 {
            0.0
        } else {
            (x - self.a) / self.b
        };
        if self.clamp {
            t.clamp(0.0, 1.0)
        } else {
            t
        }
    }
}

/// Piecewise-linear map from `k + 1` ascending control points onto `k + 1` output values
#[derive(Debug, Clone, PartialEq)]
struct Piecewise<I> {
    knots: Vec<f64>,
    segments: Vec<(Uninterpolate, I)>,
}

impl<I> Piecewise<I> {
    fn new<T: Clone>(
        domain: &[f64],
        range: &[T],
        clamp: bool,
        make: impl Fn(&T, &T) -> I,
    ) -> Option<Self> {
        let k = domain.len().min(range.len()).checked_sub(1)?;
        if k == 0 {
            return None;
        }
        let mut domain = domain[..=k].to_vec();
        let mut range = range[..=k].to_vec();
        if domain[k] < domain[0] {
            domain.reverse();
            range.reverse();
        }
        let segments = (1..=k)
            .map(|j| {
                (
                    Uninterpolate::new(domain[j - 1], domain[j], clamp),
                    make(&range[j - 1], &range[j]),
                )
            })
            .collect();
        Some(Self {
            knots: domain,
            segments,
        })
    }

    fn segment(&self, x: f64) -> Option<&(Uninterpolate, I)> {
        // bisect-right over the interior knots
        let k = self.segments.len();
        let interior = &self.knots[1..k];
        let j = interior.partition_point(|knot| *knot <= x);
        self.segments.get(j)
    }
}

/// Quantitative scale. Linear, power, square root and logarithmic scales only differ in
/// the transform applied to the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousScale {
    transform: ContinuousTransform,
    domain: Vec<ScalarValue>,
    range: Vec<ScalarValue>,
    forward: Option<Piecewise<Interpolator>>,
    inverse: Option<Piecewise<(f64, f64)>>,
}

impl ContinuousScale {
    pub fn new(
        transform: ContinuousTransform,
        domain: Vec<ScalarValue>,
        range: Vec<ScalarValue>,
        clamp: bool,
        round: bool,
    ) -> Self {
        let numeric_domain = domain
            .iter()
            .map(|v| v.as_f64().filter(|v| !v.is_nan()).map(|v| transform.apply(v)))
            .collect::<Option<Vec<_>>>();

        let (forward, inverse) = match numeric_domain {
            Some(d) => {
                let forward = Piecewise::new(&d, &range, clamp, |a, b| {
                    Interpolator::new(a, b, round)
                });
                let numeric_range = range
                    .iter()
                    .map(|v| match v {
                        ScalarValue::Number(n) => Some(*n),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>();
                let inverse = numeric_range.and_then(|r| {
                    Piecewise::new(&r, &d, clamp, |a: &f64, b: &f64| (*a, *b))
                });
                (forward, inverse)
            }
            None => (None, None),
        };

        Self {
            transform,
            domain,
            range,
            forward,
            inverse,
        }
    }

    pub fn domain(&self) -> &[ScalarValue] {
        &self.domain
    }

    pub fn range(&self) -> &[ScalarValue] {
        &self.range
    }

    pub fn exponent(&self) -> Option<f64> {
        match self.transform {
            ContinuousTransform::Pow(exponent) => Some(exponent),
            _ => None,
        }
    }

    /// Map a domain value to the range. Yields `Null` for non-numeric input and for
    /// scales whose domain or range cannot be interpolated.
    pub fn map(&self, value: &ScalarValue) -> ScalarValue {
        let (Some(forward), Some(x)) = (&self.forward, value.as_f64()) else {
            return ScalarValue::Null;
        };
        let x = self.transform.apply(x);
        match forward.segment(x) {
            Some((u, interp)) => interp.interpolate(u.apply(x)),
            None => ScalarValue::Null,
        }
    }

    /// Map a numeric range value back onto the domain
    pub fn invert(&self, value: &ScalarValue) -> Option<ScalarValue> {
        let inverse = self.inverse.as_ref()?;
        let y = value.as_f64()?;
        let (u, (a, b)) = inverse.segment(y)?;
        let x = a + (b - a) * u.apply(y);
        Some(ScalarValue::Number(self.transform.invert(x)))
    }

    /// `[min, max]` of the range endpoints
    pub fn range_extent(&self) -> Vec<ScalarValue> {
        match (self.range.first(), self.range.last()) {
            (Some(first), Some(last)) if first <= last => vec![first.clone(), last.clone()],
            (Some(first), Some(last)) => vec![last.clone(), first.clone()],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: &[f64]) -> Vec<ScalarValue> {
        v.iter().map(|v| ScalarValue::from(*v)).collect()
    }

    fn num(value: ScalarValue) -> f64 {
        value.as_f64().unwrap()
    }

    #[test]
    fn test_linear_map_and_invert() {
        let scale = ContinuousScale::new(
            ContinuousTransform::Identity,
            values(&[0.0, 10.0]),
            values(&[0.0, 500.0]),
            false,
            false,
        );
        assert_eq!(num(scale.map(&ScalarValue::from(2))), 100.0);
        assert_eq!(num(scale.map(&ScalarValue::from(20))), 1000.0);
        assert_eq!(num(scale.invert(&ScalarValue::from(250)).unwrap()), 5.0);
        assert_eq!(scale.map(&ScalarValue::from("abc")), ScalarValue::Null);
    }

    #[test]
    fn test_clamp_and_round() {
        let scale = ContinuousScale::new(
            ContinuousTransform::Identity,
            values(&[0.0, 3.0]),
            values(&[0.0, 10.0]),
            true,
            true,
        );
        assert_eq!(num(scale.map(&ScalarValue::from(1))), 3.0);
        assert_eq!(num(scale.map(&ScalarValue::from(-1))), 0.0);
        assert_eq!(num(scale.map(&ScalarValue::from(9))), 10.0);
    }

    #[test]
    fn test_descending_domain() {
        let scale = ContinuousScale::new(
            ContinuousTransform::Identity,
            values(&[10.0, 0.0]),
            values(&[0.0, 100.0]),
            false,
            false,
        );
        assert_eq!(num(scale.map(&ScalarValue::from(2.5))), 75.0);
    }

    #[test]
    fn test_polylinear() {
        let scale = ContinuousScale::new(
            ContinuousTransform::Identity,
            values(&[0.0, 1.0, 11.0]),
            values(&[0.0, 100.0, 200.0]),
            false,
            false,
        );
        assert_eq!(num(scale.map(&ScalarValue::from(0.5))), 50.0);
        assert_eq!(num(scale.map(&ScalarValue::from(6))), 150.0);
        assert_eq!(num(scale.invert(&ScalarValue::from(150)).unwrap()), 6.0);
    }

    #[test]
    fn test_pow() {
        let scale = ContinuousScale::new(
            ContinuousTransform::Pow(2.0),
            values(&[1.0, 2.0]),
            values(&[0.0, 1.0]),
            false,
            false,
        );
        assert!((num(scale.map(&ScalarValue::from(1.5))) - 0.41666667).abs() < 1e-6);
        assert_eq!(scale.exponent(), Some(2.0));
        let inverted = num(scale.invert(&ScalarValue::from(0.41666667)).unwrap());
        assert!((inverted - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_log() {
        let scale = ContinuousScale::new(
            ContinuousTransform::Log { positive: true },
            values(&[1.0, 100.0]),
            values(&[0.0, 2.0]),
            false,
            false,
        );
        assert!((num(scale.map(&ScalarValue::from(10))) - 1.0).abs() < 1e-12);
        let inverted = num(scale.invert(&ScalarValue::from(1)).unwrap());
        assert!((inverted - 10.0).abs() < 1e-9);
        assert_eq!(scale.exponent(), None);
    }

    #[test]
    fn test_empty_domain_maps_to_null() {
        let scale = ContinuousScale::new(
            ContinuousTransform::Identity,
            Vec::new(),
            values(&[0.0, 1.0]),
            false,
            false,
        );
        assert_eq!(scale.map(&ScalarValue::from(1)), ScalarValue::Null);
        assert_eq!(scale.invert(&ScalarValue::from(1)), None);
    }

    #[test]
    fn test_color_range_invert_unsupported() {
        let scale = ContinuousScale::new(
            ContinuousTransform::Identity,
            values(&[0.0, 1.0]),
            vec![ScalarValue::from("red"), ScalarValue::from("white")],
            false,
            false,
        );
        assert_eq!(
            scale.map(&ScalarValue::from(0.5)),
            ScalarValue::from("#ff8080")
        );
        assert_eq!(scale.invert(&ScalarValue::from(0.5)), None);
        assert_eq!(
            scale.range_extent(),
            vec![ScalarValue::from("red"), ScalarValue::from("white")]
        );
    }
}
