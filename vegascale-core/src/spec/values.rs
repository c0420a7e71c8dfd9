use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrStringList {
    String(String),
    StringList(Vec<String>),
}

impl StringOrStringList {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            StringOrStringList::String(v) => vec![v.clone()],
            StringOrStringList::StringList(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalExpressionSpec {
    pub signal: String,
}

/// A parameter given either as a literal or as a reference to a named signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueOrSignalSpec<T> {
    Signal(SignalExpressionSpec),
    Value(T),
}

impl<T> ValueOrSignalSpec<T> {
    pub fn signal_name(&self) -> Option<&str> {
        match self {
            ValueOrSignalSpec::Signal(expr) => Some(expr.signal.as_str()),
            ValueOrSignalSpec::Value(_) => None,
        }
    }
}
