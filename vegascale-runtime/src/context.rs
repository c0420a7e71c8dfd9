use std::collections::HashMap;
use vegascale_common::data::scalar::ScalarValue;
use vegascale_common::data::table::DataTable;
use vegascale_common::error::{Result, VegaScaleError};
use vegascale_core::data::source::DataSource;
use vegascale_core::signal::Signal;

/// Everything a scale spec can be resolved against: committed signal values, committed
/// datasets and, inside a group instance, that instance's partition of its dataset.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub signals: &'a HashMap<String, Signal>,
    pub datasets: &'a HashMap<String, DataSource>,
    pub partition: Option<&'a DataTable>,
    pub width: f64,
    pub height: f64,
    pub nice_count: usize,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        signals: &'a HashMap<String, Signal>,
        datasets: &'a HashMap<String, DataSource>,
        width: f64,
        height: f64,
        nice_count: usize,
    ) -> Self {
        Self {
            signals,
            datasets,
            partition: None,
            width,
            height,
            nice_count,
        }
    }

    pub fn signal(&self, name: &str) -> Result<&'a ScalarValue> {
        self.signals
            .get(name)
            .map(|signal| signal.value())
            .ok_or_else(|| VegaScaleError::unresolved_signal(name))
    }

    /// Named dataset, or the group partition when `name` is `None`
    pub fn table(&self, name: Option<&str>) -> Result<&'a DataTable> {
        match name {
            Some(name) => self
                .datasets
                .get(name)
                .map(|source| source.table())
                .ok_or_else(|| VegaScaleError::unresolved_data(name)),
            None => self.partition.ok_or_else(|| {
                VegaScaleError::specification(
                    "Data reference without a dataset name used outside of a group",
                )
            }),
        }
    }

    pub fn with_partition(self, partition: Option<&'a DataTable>) -> Self {
        Self { partition, ..self }
    }
}
