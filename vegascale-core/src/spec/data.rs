use crate::spec::transform::TransformSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use vegascale_common::data::table::DataTable;
use vegascale_common::error::{Result, ResultWithContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSpec {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<TransformSpec>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl DataSpec {
    /// Fields of the first facet transform in the pipeline, if any
    pub fn facet_groupby(&self) -> Option<Vec<String>> {
        self.transform.iter().find_map(|tx| match tx {
            TransformSpec::Facet(facet) => Some(facet.groupby_fields()),
            TransformSpec::Unsupported => None,
        })
    }

    /// Inline values as a table. A dataset without values starts empty.
    pub fn values_table(&self) -> Result<DataTable> {
        match &self.values {
            Some(values) => DataTable::from_json(values)
                .with_context(|| format!("Failed to read inline values of dataset {:?}", self.name)),
            None => Ok(DataTable::empty()),
        }
    }
}
