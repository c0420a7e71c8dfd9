use std::f64::consts::LN_10;
use vegascale_common::data::scalar::ScalarValue;
use vegascale_common::error::{Result, VegaScaleError};
use vegascale_core::spec::scale::ScaleTypeSpec;
use vegascale_core::task_graph::scale_state::ScaleOptions;

/// Resolved `domainMin`/`domainMax` (or `rangeMin`/`rangeMax`) pair
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Bounds {
    pub min: Option<ScalarValue>,
    pub max: Option<ScalarValue>,
}

/// Apply zero anchoring and nicing to a resolved domain, then the explicit endpoint
/// overrides, which always win.
pub(crate) fn apply_domain_defaults(
    scale_type: ScaleTypeSpec,
    domain: Vec<ScalarValue>,
    options: &ScaleOptions,
    bounds: Bounds,
    nice_count: usize,
) -> Result<Vec<ScalarValue>> {
    let mut domain = domain;
    if scale_type.is_continuous() {
        if options.zero && scale_type != ScaleTypeSpec::Log {
            domain = zero_domain(domain);
        }
        if options.nice {
            domain = if scale_type == ScaleTypeSpec::Log {
                nice_log(domain)?
            } else {
                nice_linear(domain, nice_count)?
            };
        }
    }
    apply_bounds(domain, bounds, "domain")
}

/// Extend the domain to include zero. The endpoint nearest to zero moves, so the domain
/// keeps its direction.
pub(crate) fn zero_domain(mut domain: Vec<ScalarValue>) -> Vec<ScalarValue> {
    let Some((d0, d1)) = numeric_endpoints(&domain) else {
        return domain;
    };
    let last = domain.len() - 1;
    if d0 > 0.0 && d1 > 0.0 {
        let i = if d0 <= d1 { 0 } else { last };
        domain[i] = ScalarValue::from(0.0);
    } else if d0 < 0.0 && d1 < 0.0 {
        let i = if d0 >= d1 { 0 } else { last };
        domain[i] = ScalarValue::from(0.0);
    }
    domain
}

/// Round the endpoints outward to multiples of a 1, 2 or 5 step sized for roughly
/// `count` ticks. Runs twice since the first pass can change the step.
pub(crate) fn nice_linear(domain: Vec<ScalarValue>, count: usize) -> Result<Vec<ScalarValue>> {
    let domain = nice_linear_pass(domain, count)?;
    nice_linear_pass(domain, count)
}

fn nice_linear_pass(domain: Vec<ScalarValue>, count: usize) -> Result<Vec<ScalarValue>> {
    let Some((d0, d1)) = finite_endpoints(&domain)? else {
        return Ok(domain);
    };
    let step = tick_step(d0.min(d1), d0.max(d1), count as f64);
    if step == 0.0 || !step.is_finite() {
        return Ok(domain);
    }
    Ok(nice_endpoints(
        domain,
        d0,
        d1,
        |x| (x / step).floor() * step,
        |x| (x / step).ceil() * step,
    ))
}

fn tick_step(min: f64, max: f64, count: f64) -> f64 {
    let span = max - min;
    let mut step = 10f64.powf(((span / count).ln() / LN_10).floor());
    let err = count / span * step;
    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }
    step
}

/// Round the endpoints of a log domain outward to integer powers of ten
pub(crate) fn nice_log(domain: Vec<ScalarValue>) -> Result<Vec<ScalarValue>> {
    let Some((d0, d1)) = finite_endpoints(&domain)? else {
        return Ok(domain);
    };
    if d0 > 0.0 && d1 > 0.0 {
        Ok(nice_endpoints(
            domain,
            d0,
            d1,
            |x| 10f64.powi(x.log10().floor() as i32),
            |x| 10f64.powi(x.log10().ceil() as i32),
        ))
    } else if d0 < 0.0 && d1 < 0.0 {
        Ok(nice_endpoints(
            domain,
            d0,
            d1,
            |x| -(10f64.powi((-x).log10().ceil() as i32)),
            |x| -(10f64.powi((-x).log10().floor() as i32)),
        ))
    } else {
        Ok(domain)
    }
}

/// Floor the lower endpoint and ceil the upper one, wherever they sit in the array
fn nice_endpoints(
    mut domain: Vec<ScalarValue>,
    d0: f64,
    d1: f64,
    floor: impl Fn(f64) -> f64,
    ceil: impl Fn(f64) -> f64,
) -> Vec<ScalarValue> {
    let last = domain.len() - 1;
    let (lo, hi) = if d1 < d0 { (last, 0) } else { (0, last) };
    domain[lo] = ScalarValue::from(floor(d0.min(d1)));
    domain[hi] = ScalarValue::from(ceil(d0.max(d1)));
    domain
}

fn numeric_endpoints(domain: &[ScalarValue]) -> Option<(f64, f64)> {
    if domain.len() < 2 {
        return None;
    }
    let d0 = domain.first()?.as_f64()?;
    let d1 = domain.last()?.as_f64()?;
    Some((d0, d1))
}

fn finite_endpoints(domain: &[ScalarValue]) -> Result<Option<(f64, f64)>> {
    if domain.len() < 2 {
        return Ok(None);
    }
    match numeric_endpoints(domain) {
        Some((d0, d1)) if d0.is_finite() && d1.is_finite() => Ok(Some((d0, d1))),
        _ => Err(VegaScaleError::invalid_nice_input(format!(
            "Cannot nice a domain with non-finite endpoints: {:?}",
            domain
        ))),
    }
}

/// Replace the first and last entries with the given overrides. With nothing to
/// override, both bounds must be present.
pub(crate) fn apply_bounds(
    values: Vec<ScalarValue>,
    bounds: Bounds,
    what: &str,
) -> Result<Vec<ScalarValue>> {
    let mut values = values;
    if values.is_empty() {
        return match (bounds.min, bounds.max) {
            (Some(min), Some(max)) => Ok(vec![min, max]),
            (None, None) => Ok(values),
            _ => Err(VegaScaleError::empty_domain_reduction(format!(
                "Cannot override one endpoint of an empty {what}"
            ))),
        };
    }
    let last = values.len() - 1;
    if let Some(min) = bounds.min {
        values[0] = min;
    }
    if let Some(max) = bounds.max {
        values[last] = max;
    }
    Ok(values)
}
