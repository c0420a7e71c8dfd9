use crate::data::scalar::{ScalarValue, NULL_SCALAR};
use crate::error::{Result, ResultWithContext, VegaScaleError};
use itertools::Itertools;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A single data tuple: an open mapping of field name to value
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, ScalarValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `field`, or `Null` when the record does not carry it
    pub fn get(&self, field: &str) -> &ScalarValue {
        self.fields.get(field).unwrap_or(&NULL_SCALAR)
    }

    pub fn set<S: Into<String>, V: Into<ScalarValue>>(&mut self, field: S, value: V) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn with<S: Into<String>, V: Into<ScalarValue>>(mut self, field: S, value: V) -> Self {
        self.set(field, value);
        self
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            VegaScaleError::specification(format!("Expected data record object, received {value}"))
        })?;
        let mut fields = HashMap::with_capacity(obj.len());
        for (k, v) in obj {
            let scalar = ScalarValue::from_json(v)
                .with_context(|| format!("Failed to convert field {k:?} of data record"))?;
            fields.insert(k.clone(), scalar);
        }
        Ok(Self { fields })
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        for (k, v) in self.fields.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            obj.insert(k.clone(), v.to_json());
        }
        Value::Object(obj)
    }
}

/// Ordered collection of records backing a named dataset
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataTable {
    records: Vec<Record>,
}

impl DataTable {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(rows) => {
                let records = rows
                    .iter()
                    .enumerate()
                    .map(|(i, row)| {
                        Record::from_json(row).with_context(|| format!("Invalid record at row {i}"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self { records })
            }
            _ => Err(VegaScaleError::specification(format!(
                "Expected array of data records, received {value}"
            ))),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.records.iter().map(|r| r.to_json()).collect())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<Record> {
        &mut self.records
    }

    pub fn num_rows(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of `field` for every record in table order. Missing fields yield `Null`.
    pub fn column(&self, field: &str) -> Vec<ScalarValue> {
        self.records.iter().map(|r| r.get(field).clone()).collect()
    }

    /// Records whose `fields` values equal `key`, in table order
    pub fn filter_key(&self, fields: &[String], key: &[ScalarValue]) -> DataTable {
        let records = self
            .records
            .iter()
            .filter(|r| fields.iter().zip(key).all(|(f, k)| r.get(f) == k))
            .cloned()
            .collect();
        DataTable { records }
    }

    /// Distinct values of `fields` across the table, in first-seen order
    pub fn distinct_keys(&self, fields: &[String]) -> Vec<Vec<ScalarValue>> {
        self.records
            .iter()
            .map(|r| fields.iter().map(|f| r.get(f).clone()).collect::<Vec<_>>())
            .unique()
            .collect()
    }
}

impl From<Vec<Record>> for DataTable {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}
