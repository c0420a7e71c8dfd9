pub mod facet;

use crate::spec::transform::facet::FacetTransformSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformSpec {
    Facet(FacetTransformSpec),

    // Transforms other than facet do not affect scale resolution
    #[serde(other)]
    Unsupported,
}
