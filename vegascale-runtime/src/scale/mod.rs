pub mod adapter;
pub mod continuous;
mod defaults;
mod interpolate;
pub mod ordinal;
pub mod resolve;
mod schemes;

use crate::context::ResolutionContext;
use crate::scale::adapter::{to_configured_scale, ConfiguredScale};
use crate::scale::resolve::resolve_scale_state;
use log::debug;
use vegascale_common::data::scalar::ScalarValue;
use vegascale_common::error::Result;
use vegascale_core::spec::scale::{ScaleSpec, ScaleTypeSpec};
use vegascale_core::task_graph::scale_state::ScaleState;

/// A named scale bound to one scope. Its spec is fixed at construction; domain and range
/// are re-resolved by [`Scale::refresh`] whenever one of its inputs changes.
#[derive(Debug, Clone)]
pub struct Scale {
    spec: ScaleSpec,
    scope: Vec<u32>,
    state: ScaleState,
    configured: ConfiguredScale,
    stamp: u64,
}

impl Scale {
    pub fn try_new(
        spec: ScaleSpec,
        scope: Vec<u32>,
        ctx: &ResolutionContext,
        stamp: u64,
    ) -> Result<Self> {
        let state = resolve_scale_state(&spec, ctx)?;
        debug!(
            "Created scale {:?} in scope {scope:?} at stamp {stamp}: domain {:?}",
            spec.name, state.domain
        );
        Ok(Self {
            configured: to_configured_scale(&state),
            spec,
            scope,
            state,
            stamp,
        })
    }

    /// Re-resolve against `ctx`. On failure the scale keeps its previous state.
    pub fn refresh(&mut self, ctx: &ResolutionContext, stamp: u64) -> Result<()> {
        let state = resolve_scale_state(&self.spec, ctx)?;
        debug!(
            "Resolved scale {:?} in scope {:?} at stamp {stamp}: domain {:?}",
            self.spec.name, self.scope, state.domain
        );
        if state != self.state {
            self.configured = to_configured_scale(&state);
            self.state = state;
        }
        self.stamp = stamp;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &ScaleSpec {
        &self.spec
    }

    pub fn scope(&self) -> &[u32] {
        &self.scope
    }

    pub fn scale_type(&self) -> ScaleTypeSpec {
        self.state.scale_type
    }

    pub fn state(&self) -> &ScaleState {
        &self.state
    }

    /// Stamp of the fire that last resolved this scale
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    pub fn domain(&self) -> &[ScalarValue] {
        match &self.configured {
            ConfiguredScale::Ordinal(scale) => scale.domain(),
            ConfiguredScale::Continuous(scale) => scale.domain(),
        }
    }

    pub fn range(&self) -> &[ScalarValue] {
        match &self.configured {
            ConfiguredScale::Ordinal(scale) => scale.range(),
            ConfiguredScale::Continuous(scale) => scale.range(),
        }
    }

    /// Band width of an ordinal band layout, 0 otherwise
    pub fn range_band(&self) -> f64 {
        match &self.configured {
            ConfiguredScale::Ordinal(scale) => scale.range_band(),
            ConfiguredScale::Continuous(_) => 0.0,
        }
    }

    pub fn range_extent(&self) -> Vec<ScalarValue> {
        match &self.configured {
            ConfiguredScale::Ordinal(scale) => scale.range_extent().to_vec(),
            ConfiguredScale::Continuous(scale) => scale.range_extent(),
        }
    }

    pub fn exponent(&self) -> Option<f64> {
        match &self.configured {
            ConfiguredScale::Continuous(scale) => scale.exponent(),
            ConfiguredScale::Ordinal(_) => None,
        }
    }

    pub fn map(&self, value: &ScalarValue) -> ScalarValue {
        match &self.configured {
            ConfiguredScale::Ordinal(scale) => scale.map(value),
            ConfiguredScale::Continuous(scale) => scale.map(value),
        }
    }

    /// Domain value at a range position. `None` when the scale cannot be inverted, such
    /// as an ordinal scale with a verbatim range or a continuous scale onto colors.
    pub fn invert(&self, value: &ScalarValue) -> Option<ScalarValue> {
        match &self.configured {
            ConfiguredScale::Ordinal(scale) => scale.invert(value),
            ConfiguredScale::Continuous(scale) => scale.invert(value),
        }
    }

    /// Ordinal domain entries whose bands overlap the range interval between `a` and `b`.
    /// `None` for scales other than laid-out ordinal scales.
    pub fn invert_range(&self, a: &ScalarValue, b: &ScalarValue) -> Option<Vec<ScalarValue>> {
        match &self.configured {
            ConfiguredScale::Ordinal(scale) => scale.invert_range(a, b),
            ConfiguredScale::Continuous(_) => None,
        }
    }
}
