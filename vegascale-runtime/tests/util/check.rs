use serde_json::Value;
use vegascale_common::data::scalar::ScalarValue;
use vegascale_common::data::table::{DataTable, Record};
use vegascale_core::spec::chart::ChartSpec;
use vegascale_runtime::chart_state::ChartState;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse an inline chart spec and build its state with default options
pub fn chart(spec: Value) -> ChartState {
    init();
    let spec: ChartSpec = serde_json::from_value(spec).unwrap();
    ChartState::try_new(spec, Default::default()).unwrap()
}

pub fn records(values: Value) -> Vec<Record> {
    DataTable::from_json(&values).unwrap().records().to_vec()
}

pub fn scalars<T: Into<ScalarValue> + Clone>(values: &[T]) -> Vec<ScalarValue> {
    values.iter().cloned().map(Into::into).collect()
}

/// Numeric field of a record, NaN when missing
pub fn num(record: &Record, field: &str) -> f64 {
    record.get(field).as_f64().unwrap_or(f64::NAN)
}
