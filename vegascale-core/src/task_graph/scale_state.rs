use crate::spec::scale::ScaleTypeSpec;
use vegascale_common::data::scalar::ScalarValue;

/// Scale parameters after literal and signal values have been evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleOptions {
    pub reverse: bool,
    pub zero: bool,
    pub nice: bool,
    pub clamp: bool,
    pub points: bool,
    pub round: bool,
    pub padding: f64,
    pub outer_padding: Option<f64>,
    pub exponent: f64,
}

impl ScaleOptions {
    /// Parameter defaults for a scale of the given type
    pub fn for_type(scale_type: ScaleTypeSpec) -> Self {
        Self {
            reverse: false,
            zero: matches!(
                scale_type,
                ScaleTypeSpec::Linear | ScaleTypeSpec::Pow | ScaleTypeSpec::Sqrt
            ),
            nice: false,
            clamp: false,
            points: false,
            round: scale_type.is_discrete(),
            padding: 0.0,
            outer_padding: None,
            exponent: match scale_type {
                ScaleTypeSpec::Sqrt => 0.5,
                _ => 1.0,
            },
        }
    }
}

/// Concrete domain and range of a scale, the result of resolving its spec against the
/// current signal and data values
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleState {
    pub scale_type: ScaleTypeSpec,
    pub domain: Vec<ScalarValue>,
    pub range: Vec<ScalarValue>,
    /// Whether the range came from a data reference rather than a literal
    pub range_from_data: bool,
    pub options: ScaleOptions,
}
