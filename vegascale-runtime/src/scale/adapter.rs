use crate::scale::continuous::{ContinuousScale, ContinuousTransform};
use crate::scale::ordinal::{OrdinalLayout, OrdinalParams, OrdinalScale};
use vegascale_common::data::scalar::ScalarValue;
use vegascale_core::spec::scale::ScaleTypeSpec;
use vegascale_core::task_graph::scale_state::ScaleState;

/// A resolved scale ready for mapping
#[derive(Debug, Clone, PartialEq)]
pub enum ConfiguredScale {
    Ordinal(OrdinalScale),
    Continuous(ContinuousScale),
}

pub fn to_configured_scale(scale_state: &ScaleState) -> ConfiguredScale {
    let options = &scale_state.options;
    let transform = match scale_state.scale_type {
        ScaleTypeSpec::Ordinal => {
            let params = OrdinalParams {
                layout: OrdinalLayout::new(options.points, options.round),
                padding: options.padding,
                outer_padding: options.outer_padding,
            };
            return ConfiguredScale::Ordinal(OrdinalScale::new(
                scale_state.domain.clone(),
                scale_state.range.clone(),
                scale_state.range_from_data,
                &params,
            ));
        }
        ScaleTypeSpec::Linear => ContinuousTransform::Identity,
        ScaleTypeSpec::Pow | ScaleTypeSpec::Sqrt => ContinuousTransform::Pow(options.exponent),
        ScaleTypeSpec::Log => ContinuousTransform::Log {
            positive: scale_state
                .domain
                .first()
                .and_then(ScalarValue::as_f64)
                .map_or(true, |d0| d0 >= 0.0),
        },
    };
    ConfiguredScale::Continuous(ContinuousScale::new(
        transform,
        scale_state.domain.clone(),
        scale_state.range.clone(),
        options.clamp,
        options.round,
    ))
}
