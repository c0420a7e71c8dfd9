use crate::spec::signal::SignalSpec;
use vegascale_common::data::scalar::ScalarValue;
use vegascale_common::error::{Result, ResultWithContext};

/// A named, externally settable value. Writes are staged with [`Signal::set_value`] and
/// only become visible through [`Signal::value`] once committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    name: String,
    value: ScalarValue,
    staged: Option<ScalarValue>,
}

impl Signal {
    pub fn new<S: Into<String>>(name: S, value: ScalarValue) -> Self {
        Self {
            name: name.into(),
            value,
            staged: None,
        }
    }

    pub fn try_from_spec(spec: &SignalSpec) -> Result<Self> {
        let value = match &spec.value {
            Some(value) => ScalarValue::from_json(value)
                .with_context(|| format!("Invalid initial value of signal {:?}", spec.name))?,
            None => ScalarValue::Null,
        };
        Ok(Self::new(spec.name.clone(), value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Committed value
    pub fn value(&self) -> &ScalarValue {
        &self.value
    }

    /// Stage a new value. Repeated writes before a commit keep the last one.
    pub fn set_value(&mut self, value: ScalarValue) {
        self.staged = Some(value);
    }

    pub fn is_staged(&self) -> bool {
        self.staged.is_some()
    }

    /// Apply the staged value. Returns true when the committed value changed.
    pub fn commit(&mut self) -> bool {
        match self.staged.take() {
            Some(value) if value != self.value => {
                self.value = value;
                true
            }
            _ => false,
        }
    }
}
