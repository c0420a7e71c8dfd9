use crate::scale::interpolate::round_half_up;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use vegascale_common::data::scalar::ScalarValue;

/// How a two-element numeric range is divided among the domain entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinalLayout {
    RoundBands,
    Bands,
    RoundPoints,
    Points,
}

impl OrdinalLayout {
    pub fn new(points: bool, round: bool) -> Self {
        match (points, round) {
            (true, true) => OrdinalLayout::RoundPoints,
            (true, false) => OrdinalLayout::Points,
            (false, true) => OrdinalLayout::RoundBands,
            (false, false) => OrdinalLayout::Bands,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrdinalParams {
    pub layout: OrdinalLayout,
    pub padding: f64,
    pub outer_padding: Option<f64>,
}

/// Discrete scale from a list of unique domain entries onto range values
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    domain: Vec<ScalarValue>,
    index: HashMap<ScalarValue, usize>,
    range: Vec<ScalarValue>,
    range_band: f64,
    range_extent: Vec<ScalarValue>,
    /// Laid-out positions with their domain entries, ascending by position.
    /// `None` when the range is used verbatim.
    positions: Option<Vec<(f64, ScalarValue)>>,
}

impl OrdinalScale {
    /// Build the scale. Duplicate domain entries are dropped, keeping the first occurrence.
    /// A range that came from data, starts with a string, or does not have exactly two
    /// elements is used verbatim. Otherwise it is laid out according to `params`.
    pub fn new(
        domain: Vec<ScalarValue>,
        range: Vec<ScalarValue>,
        range_from_data: bool,
        params: &OrdinalParams,
    ) -> Self {
        let domain = domain.into_iter().unique().collect::<Vec<_>>();
        let index = domain
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect::<HashMap<_, _>>();

        let numeric_pair = match range.as_slice() {
            [ScalarValue::Number(start), ScalarValue::Number(stop)] => Some((*start, *stop)),
            _ => None,
        };
        let numeric_pair = numeric_pair.filter(|_| !range_from_data);

        let Some((start, stop)) = numeric_pair else {
            let range_extent = match (range.first(), range.last()) {
                (Some(first), Some(last)) if first <= last => vec![first.clone(), last.clone()],
                (Some(first), Some(last)) => vec![last.clone(), first.clone()],
                _ => Vec::new(),
            };
            return Self {
                domain,
                index,
                range,
                range_band: 0.0,
                range_extent,
                positions: None,
            };
        };

        let (steps, range_band) = layout(domain.len(), start, stop, params);
        let positions = steps
            .iter()
            .zip(domain.iter())
            .map(|(pos, v)| (*pos, v.clone()))
            .sorted_by_key(|(pos, _)| OrderedFloat(*pos))
            .collect::<Vec<_>>();

        Self {
            range: steps.into_iter().map(ScalarValue::from).collect(),
            range_band,
            range_extent: vec![
                ScalarValue::from(start.min(stop)),
                ScalarValue::from(start.max(stop)),
            ],
            positions: Some(positions),
            domain,
            index,
        }
    }

    pub fn domain(&self) -> &[ScalarValue] {
        &self.domain
    }

    pub fn range(&self) -> &[ScalarValue] {
        &self.range
    }

    pub fn range_band(&self) -> f64 {
        self.range_band
    }

    pub fn range_extent(&self) -> &[ScalarValue] {
        &self.range_extent
    }

    /// Range value of a domain entry. A verbatim range is cycled when it is shorter than
    /// the domain. Values outside the domain map to `Null`.
    pub fn map(&self, value: &ScalarValue) -> ScalarValue {
        match (self.index.get(value), self.range.len()) {
            (Some(i), len) if len > 0 => self.range[i % len].clone(),
            _ => ScalarValue::Null,
        }
    }

    /// Domain entry whose band or point is the last one starting at or before `value`
    pub fn invert(&self, value: &ScalarValue) -> Option<ScalarValue> {
        let positions = self.positions.as_ref()?;
        let x = value.as_f64()?;
        let i = bisect_right(positions, x).saturating_sub(1);
        positions.get(i).map(|(_, v)| v.clone())
    }

    /// Domain entries whose bands overlap the interval between `a` and `b`, in ascending
    /// position order
    pub fn invert_range(&self, a: &ScalarValue, b: &ScalarValue) -> Option<Vec<ScalarValue>> {
        let positions = self.positions.as_ref()?;
        let (a, b) = (a.as_f64()?, b.as_f64()?);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        let start = bisect_right(positions, lo).saturating_sub(1);
        let end = bisect_right(positions, hi);
        if end == 0 {
            return Some(Vec::new());
        }
        Some(
            positions[start..end]
                .iter()
                .map(|(_, v)| v.clone())
                .collect(),
        )
    }
}

fn bisect_right(positions: &[(f64, ScalarValue)], x: f64) -> usize {
    positions.partition_point(|(pos, _)| *pos <= x)
}

/// Positions of `n` entries across `[start, stop]` and the resulting band width
fn layout(n: usize, start: f64, stop: f64, params: &OrdinalParams) -> (Vec<f64>, f64) {
    if n == 0 {
        return (Vec::new(), 0.0);
    }
    let count = n as f64;
    let padding = params.padding;
    let outer = params.outer_padding.unwrap_or(padding);
    let steps = |first: f64, step: f64| {
        (0..n)
            .map(|i| first + step * i as f64)
            .collect::<Vec<_>>()
    };

    match params.layout {
        OrdinalLayout::RoundBands | OrdinalLayout::Bands => {
            let reverse = stop < start;
            let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
            let span = hi - lo;
            let (mut positions, band) = if params.layout == OrdinalLayout::RoundBands {
                let step = (span / (count - padding + 2.0 * outer)).floor();
                let first = lo + round_half_up((span - (count - padding) * step) / 2.0);
                (steps(first, step), round_half_up(step * (1.0 - padding)))
            } else {
                let step = span / (count - padding + 2.0 * outer);
                (steps(lo + step * outer, step), step * (1.0 - padding))
            };
            if reverse {
                positions.reverse();
            }
            (positions, band)
        }
        OrdinalLayout::RoundPoints => {
            if n < 2 {
                let mid = round_half_up((start + stop) / 2.0);
                return (steps(mid, 0.0), 0.0);
            }
            let span = stop - start;
            let step = (span / (count - 1.0 + padding)).trunc();
            let offset = round_half_up(
                step * padding / 2.0 + (span - (count - 1.0 + padding) * step) / 2.0,
            );
            (steps(start + offset, step), 0.0)
        }
        OrdinalLayout::Points => {
            if n < 2 {
                return (steps((start + stop) / 2.0, 0.0), 0.0);
            }
            let step = (stop - start) / (count - 1.0 + padding);
            (steps(start + step * padding / 2.0, step), 0.0)
        }
    }
}
