use crate::spec::values::StringOrStringList;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetTransformSpec {
    pub groupby: StringOrStringList,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl FacetTransformSpec {
    pub fn groupby_fields(&self) -> Vec<String> {
        self.groupby.to_vec()
    }
}
