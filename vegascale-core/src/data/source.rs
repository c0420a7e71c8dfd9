use crate::spec::data::DataSpec;
use log::debug;
use std::fmt::{Debug, Formatter};
use vegascale_common::data::scalar::ScalarValue;
use vegascale_common::data::table::{DataTable, Record};
use vegascale_common::error::{Result, ResultWithContext};

pub type RecordPredicate = Box<dyn Fn(&Record) -> bool>;
pub type RecordTransform = Box<dyn Fn(&Record) -> ScalarValue>;

/// One pending modification of a data source
pub enum DataOp {
    Insert(Vec<Record>),
    Update {
        predicate: RecordPredicate,
        field: String,
        transform: RecordTransform,
    },
    Remove(RecordPredicate),
}

impl Debug for DataOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataOp::Insert(records) => write!(f, "Insert({} records)", records.len()),
            DataOp::Update { field, .. } => write!(f, "Update({field:?})"),
            DataOp::Remove(_) => write!(f, "Remove"),
        }
    }
}

/// A named table with a changeset of pending operations. Operations accumulate until
/// [`DataSource::commit`] applies them, in order, as one batch.
#[derive(Debug)]
pub struct DataSource {
    name: String,
    table: DataTable,
    facet: Option<Vec<String>>,
    pending: Vec<DataOp>,
}

impl DataSource {
    pub fn new<S: Into<String>>(name: S, table: DataTable) -> Self {
        Self {
            name: name.into(),
            table,
            facet: None,
            pending: Vec::new(),
        }
    }

    pub fn try_from_spec(spec: &DataSpec) -> Result<Self> {
        let table = spec
            .values_table()
            .with_context(|| format!("Failed to initialize dataset {:?}", spec.name))?;
        Ok(Self {
            facet: spec.facet_groupby(),
            ..Self::new(spec.name.clone(), table)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Committed records
    pub fn table(&self) -> &DataTable {
        &self.table
    }

    /// Fields of the facet transform declared on this dataset
    pub fn facet(&self) -> Option<&[String]> {
        self.facet.as_deref()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn insert(&mut self, records: Vec<Record>) {
        self.pending.push(DataOp::Insert(records));
    }

    pub fn update<P, T, S>(&mut self, predicate: P, field: S, transform: T)
    where
        P: Fn(&Record) -> bool + 'static,
        T: Fn(&Record) -> ScalarValue + 'static,
        S: Into<String>,
    {
        self.pending.push(DataOp::Update {
            predicate: Box::new(predicate),
            field: field.into(),
            transform: Box::new(transform),
        });
    }

    pub fn remove<P>(&mut self, predicate: P)
    where
        P: Fn(&Record) -> bool + 'static,
    {
        self.pending.push(DataOp::Remove(Box::new(predicate)));
    }

    /// Apply the pending operations. Returns true when there was anything to apply.
    pub fn commit(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        let ops = std::mem::take(&mut self.pending);
        let num_ops = ops.len();
        let records = self.table.records_mut();
        for op in ops {
            match op {
                DataOp::Insert(new_records) => records.extend(new_records),
                DataOp::Update {
                    predicate,
                    field,
                    transform,
                } => {
                    for record in records.iter_mut() {
                        if predicate(record) {
                            let value = transform(record);
                            record.set(field.clone(), value);
                        }
                    }
                }
                DataOp::Remove(predicate) => records.retain(|r| !predicate(r)),
            }
        }
        debug!(
            "Committed {num_ops} operation(s) to dataset {:?}, now {} row(s)",
            self.name,
            self.table.num_rows()
        );
        true
    }
}
