use crate::context::ResolutionContext;
use crate::scale::defaults::{apply_bounds, apply_domain_defaults, Bounds};
use crate::scale::schemes::named_range;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde_json::Value;
use std::collections::HashMap;
use vegascale_common::data::scalar::ScalarValue;
use vegascale_common::data::table::Record;
use vegascale_common::error::{Result, ResultWithContext, VegaScaleError};
use vegascale_core::spec::scale::{
    AggregateOpSpec, ScaleArrayElementSpec, ScaleBoundSpec, ScaleDataReferenceSpec,
    ScaleDomainSpec, ScaleRangeSpec, ScaleSortSpec, ScaleSpec, ScaleTypeSpec,
};
use vegascale_core::spec::values::ValueOrSignalSpec;
use vegascale_core::task_graph::scale_state::{ScaleOptions, ScaleState};

/// Resolve a scale spec to a concrete domain and range against the current context
pub fn resolve_scale_state(scale: &ScaleSpec, ctx: &ResolutionContext) -> Result<ScaleState> {
    let scale_type = scale.type_;
    let options = resolve_options(scale, ctx)?;

    let domain = match &scale.domain {
        Some(domain) => resolve_domain(scale_type, domain, ctx)
            .with_context(|| format!("Failed to resolve domain of scale {:?}", scale.name))?,
        None => Vec::new(),
    };
    let domain_bounds = Bounds {
        min: resolve_bound(scale.domain_min.as_ref(), BoundKind::Min, ctx)?,
        max: resolve_bound(scale.domain_max.as_ref(), BoundKind::Max, ctx)?,
    };
    let domain = apply_domain_defaults(
        scale_type,
        domain,
        &options,
        domain_bounds,
        ctx.nice_count,
    )
    .with_context(|| format!("Failed to apply domain defaults of scale {:?}", scale.name))?;

    let (range, range_from_data) = match &scale.range {
        Some(range) => resolve_range(scale_type, range, ctx)
            .with_context(|| format!("Failed to resolve range of scale {:?}", scale.name))?,
        None => (Vec::new(), false),
    };
    let range_bounds = Bounds {
        min: resolve_bound(scale.range_min.as_ref(), BoundKind::Min, ctx)?,
        max: resolve_bound(scale.range_max.as_ref(), BoundKind::Max, ctx)?,
    };
    let mut range = apply_bounds(range, range_bounds, "range")?;
    if options.reverse {
        range.reverse();
    }

    Ok(ScaleState {
        scale_type,
        domain,
        range,
        range_from_data,
        options,
    })
}

fn resolve_options(scale: &ScaleSpec, ctx: &ResolutionContext) -> Result<ScaleOptions> {
    let mut options = ScaleOptions::for_type(scale.type_);
    let bool_params = [
        (&scale.reverse, &mut options.reverse),
        (&scale.zero, &mut options.zero),
        (&scale.nice, &mut options.nice),
        (&scale.clamp, &mut options.clamp),
        (&scale.points, &mut options.points),
        (&scale.round, &mut options.round),
    ];
    for (param, target) in bool_params {
        if let Some(value) = resolve_param(param.as_ref(), ctx, ScalarValue::as_bool)? {
            *target = value;
        }
    }
    if let Some(padding) = resolve_param(scale.padding.as_ref(), ctx, ScalarValue::as_f64)? {
        options.padding = padding;
    }
    options.outer_padding =
        resolve_param(scale.outer_padding.as_ref(), ctx, ScalarValue::as_f64)?;

    // A square root scale always has exponent 0.5
    if scale.type_ == ScaleTypeSpec::Pow {
        if let Some(exponent) = resolve_param(scale.exponent.as_ref(), ctx, ScalarValue::as_f64)? {
            options.exponent = exponent;
        }
    }
    Ok(options)
}

/// Evaluate a literal-or-signal parameter. A signal whose value is null leaves the
/// parameter at its default.
fn resolve_param<T: Clone>(
    param: Option<&ValueOrSignalSpec<T>>,
    ctx: &ResolutionContext,
    convert: impl Fn(&ScalarValue) -> Option<T>,
) -> Result<Option<T>> {
    match param {
        None => Ok(None),
        Some(ValueOrSignalSpec::Value(value)) => Ok(Some(value.clone())),
        Some(ValueOrSignalSpec::Signal(expr)) => {
            let value = ctx.signal(&expr.signal)?;
            if value.is_null() {
                return Ok(None);
            }
            convert(value).map(Some).ok_or_else(|| {
                VegaScaleError::specification(format!(
                    "Signal {:?} has value {value} which is not a valid scale parameter",
                    expr.signal
                ))
            })
        }
    }
}

fn resolve_domain(
    scale_type: ScaleTypeSpec,
    domain: &ScaleDomainSpec,
    ctx: &ResolutionContext,
) -> Result<Vec<ScalarValue>> {
    match domain {
        ScaleDomainSpec::Array(elements) => scale_array_elements_to_vec(elements, ctx),
        ScaleDomainSpec::Signal(expr) => Ok(signal_to_vec(ctx.signal(&expr.signal)?)),
        ScaleDomainSpec::Value(value) => json_value_to_vec(value),
        ScaleDomainSpec::FieldReference(reference) => {
            domain_from_data_fields(scale_type, &[reference], reference.sort.as_ref(), ctx)
        }
        ScaleDomainSpec::FieldsReference(references) => {
            let fields = references.fields.iter().collect::<Vec<_>>();
            domain_from_data_fields(scale_type, &fields, references.sort.as_ref(), ctx)
        }
    }
}

/// Resolve a range spec. The flag tells whether the values came from data.
fn resolve_range(
    scale_type: ScaleTypeSpec,
    range: &ScaleRangeSpec,
    ctx: &ResolutionContext,
) -> Result<(Vec<ScalarValue>, bool)> {
    let range = match range {
        ScaleRangeSpec::Array(elements) => scale_array_elements_to_vec(elements, ctx)?,
        ScaleRangeSpec::Signal(expr) => signal_to_vec(ctx.signal(&expr.signal)?),
        ScaleRangeSpec::Value(Value::String(name)) => named_range_values(name, scale_type, ctx)?,
        ScaleRangeSpec::Value(value) => json_value_to_vec(value)?,
        ScaleRangeSpec::FieldReference(reference) => {
            let values =
                domain_from_data_fields(scale_type, &[reference], reference.sort.as_ref(), ctx)?;
            return Ok((values, true));
        }
        ScaleRangeSpec::FieldsReference(references) => {
            let fields = references.fields.iter().collect::<Vec<_>>();
            let values =
                domain_from_data_fields(scale_type, &fields, references.sort.as_ref(), ctx)?;
            return Ok((values, true));
        }
    };
    Ok((range, false))
}

fn named_range_values(
    name: &str,
    scale_type: ScaleTypeSpec,
    ctx: &ResolutionContext,
) -> Result<Vec<ScalarValue>> {
    match name {
        "width" => Ok(vec![ScalarValue::from(0.0), ScalarValue::from(ctx.width)]),
        // Vertical bands run top to bottom, continuous y scales bottom to top
        "height" if scale_type.is_discrete() => {
            Ok(vec![ScalarValue::from(0.0), ScalarValue::from(ctx.height)])
        }
        "height" => Ok(vec![ScalarValue::from(ctx.height), ScalarValue::from(0.0)]),
        _ => named_range(name).ok_or_else(|| {
            VegaScaleError::specification(format!("Unknown named range {name:?}"))
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundKind {
    Min,
    Max,
}

fn resolve_bound(
    bound: Option<&ScaleBoundSpec>,
    kind: BoundKind,
    ctx: &ResolutionContext,
) -> Result<Option<ScalarValue>> {
    let Some(bound) = bound else {
        return Ok(None);
    };
    let value = match bound {
        ScaleBoundSpec::Signal(expr) => ctx.signal(&expr.signal)?.clone(),
        ScaleBoundSpec::Value(value) => ScalarValue::from_json(value)?,
        ScaleBoundSpec::FieldReference(reference) => {
            bound_from_data_fields(&[reference], kind, ctx)?
        }
        ScaleBoundSpec::FieldsReference(references) => {
            let fields = references.fields.iter().collect::<Vec<_>>();
            bound_from_data_fields(&fields, kind, ctx)?
        }
    };
    Ok(if value.is_null() { None } else { Some(value) })
}

fn bound_from_data_fields(
    references: &[&ScaleDataReferenceSpec],
    kind: BoundKind,
    ctx: &ResolutionContext,
) -> Result<ScalarValue> {
    let rows = lookup_data_fields(references, ctx)?;
    let extent = numeric_extent(rows.iter().map(|(value, _)| value));
    Ok(match (extent, kind) {
        (Some((min, _)), BoundKind::Min) => ScalarValue::from(min),
        (Some((_, max)), BoundKind::Max) => ScalarValue::from(max),
        (None, _) => ScalarValue::Null,
    })
}

fn scale_array_elements_to_vec(
    elements: &[ScaleArrayElementSpec],
    ctx: &ResolutionContext,
) -> Result<Vec<ScalarValue>> {
    elements
        .iter()
        .map(|element| match element {
            ScaleArrayElementSpec::Signal(expr) => ctx.signal(&expr.signal).cloned(),
            ScaleArrayElementSpec::Value(value) => ScalarValue::from_json(value),
        })
        .collect()
}

/// The value of an array-typed signal is the whole sequence. Any other value is a
/// sequence of one.
fn signal_to_vec(value: &ScalarValue) -> Vec<ScalarValue> {
    match value {
        ScalarValue::List(values) => values.clone(),
        ScalarValue::Null => Vec::new(),
        value => vec![value.clone()],
    }
}

fn json_value_to_vec(value: &Value) -> Result<Vec<ScalarValue>> {
    match value {
        Value::Array(values) => values.iter().map(ScalarValue::from_json).collect(),
        _ => Err(VegaScaleError::specification(format!(
            "Expected an array of values, received {value}"
        ))),
    }
}

/// Values of each referenced field paired with the record they were read from
fn lookup_data_fields<'a>(
    references: &[&ScaleDataReferenceSpec],
    ctx: &ResolutionContext<'a>,
) -> Result<Vec<(ScalarValue, &'a Record)>> {
    let mut rows = Vec::new();
    for reference in references {
        let table = ctx.table(reference.data.as_deref())?;
        rows.extend(
            table
                .records()
                .iter()
                .map(|record| (record.get(&reference.field).clone(), record)),
        );
    }
    Ok(rows)
}

fn domain_from_data_fields(
    scale_type: ScaleTypeSpec,
    references: &[&ScaleDataReferenceSpec],
    sort: Option<&ScaleSortSpec>,
    ctx: &ResolutionContext,
) -> Result<Vec<ScalarValue>> {
    let rows = lookup_data_fields(references, ctx)?;
    if scale_type.is_continuous() {
        return Ok(match numeric_extent(rows.iter().map(|(value, _)| value)) {
            Some((min, max)) => vec![ScalarValue::from(min), ScalarValue::from(max)],
            None => Vec::new(),
        });
    }

    let sort = sort.or_else(|| references.first().and_then(|r| r.sort.as_ref()));
    let distinct = rows.iter().map(|(value, _)| value.clone()).unique();
    Ok(match sort {
        None | Some(ScaleSortSpec::Bool(false)) => distinct.collect(),
        Some(ScaleSortSpec::Bool(true)) => distinct.sorted().collect(),
        Some(ScaleSortSpec::Aggregate(aggregate)) => {
            let mut groups: HashMap<&ScalarValue, Vec<&ScalarValue>> = HashMap::new();
            for (key, record) in &rows {
                groups
                    .entry(key)
                    .or_default()
                    .push(record.get(&aggregate.field));
            }
            distinct
                .sorted_by_cached_key(|key| {
                    let values = groups.get(key).map(Vec::as_slice).unwrap_or_default();
                    // Groups without numeric values sort last: NaN orders above every number.
                    OrderedFloat(aggregate_values(aggregate.op, values).unwrap_or(f64::NAN))
                })
                .collect()
        }
    })
}

/// `[min, max]` over the numbers and booleans. Strings are not coerced.
fn numeric_extent<'a>(values: impl Iterator<Item = &'a ScalarValue>) -> Option<(f64, f64)> {
    values
        .filter_map(|value| match value {
            ScalarValue::Number(_) | ScalarValue::Boolean(_) => {
                value.as_f64().filter(|v| !v.is_nan())
            }
            _ => None,
        })
        .fold(None, |extent, v| match extent {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
}

fn aggregate_values(op: AggregateOpSpec, values: &[&ScalarValue]) -> Option<f64> {
    if op == AggregateOpSpec::Count {
        return Some(values.len() as f64);
    }
    let numbers = values
        .iter()
        .filter_map(|value| value.as_f64())
        .filter(|v| !v.is_nan())
        .collect::<Vec<_>>();
    if numbers.is_empty() {
        return None;
    }
    let count = numbers.len() as f64;
    match op {
        AggregateOpSpec::Count => Some(values.len() as f64),
        AggregateOpSpec::Sum => Some(numbers.iter().sum()),
        AggregateOpSpec::Average => Some(numbers.iter().sum::<f64>() / count),
        AggregateOpSpec::Min => numbers.iter().copied().reduce(f64::min),
        AggregateOpSpec::Max => numbers.iter().copied().reduce(f64::max),
        AggregateOpSpec::Median => {
            let sorted = numbers
                .into_iter()
                .sorted_by_key(|v| OrderedFloat(*v))
                .collect::<Vec<_>>();
            let mid = sorted.len() / 2;
            if sorted.len() % 2 == 0 {
                Some((sorted[mid - 1] + sorted[mid]) / 2.0)
            } else {
                Some(sorted[mid])
            }
        }
    }
}
