use crate::error::{Result, VegaScaleError};
use ordered_float::OrderedFloat;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// A dynamically typed value as it appears in signals, data records, domains and ranges.
///
/// `Null` doubles as "undefined": it is what a record yields for a field it does not carry.
/// Equality, hashing and ordering treat numbers through [`OrderedFloat`], so values can be
/// de-duplicated in hash sets and sorted with a total order:
/// `Null < Boolean < Number < String < List`.
#[derive(Debug, Clone, Default)]
pub enum ScalarValue {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    List(Vec<ScalarValue>),
}

pub const NULL_SCALAR: ScalarValue = ScalarValue::Null;

impl ScalarValue {
    pub fn from_json(value: &Value) -> Result<ScalarValue> {
        let scalar_value = match value {
            Value::Null => ScalarValue::Null,
            Value::Bool(v) => ScalarValue::Boolean(*v),
            Value::Number(v) => ScalarValue::Number(v.as_f64().ok_or_else(|| {
                VegaScaleError::specification(format!("Unsupported JSON number {v}"))
            })?),
            Value::String(v) => ScalarValue::String(v.clone()),
            Value::Array(elements) => ScalarValue::List(
                elements
                    .iter()
                    .map(ScalarValue::from_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(_) => {
                return Err(VegaScaleError::specification(format!(
                    "Objects are not supported as scalar values: {value}"
                )))
            }
        };
        Ok(scalar_value)
    }

    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Null => Value::Null,
            ScalarValue::Boolean(v) => Value::Bool(*v),
            ScalarValue::Number(v) => Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null),
            ScalarValue::String(v) => Value::String(v.clone()),
            ScalarValue::List(v) => Value::Array(v.iter().map(|el| el.to_json()).collect()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Numeric view of the value, following the loose coercion of the grammar:
    /// booleans are 0/1 and numeric strings are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(v) => Some(*v),
            ScalarValue::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            ScalarValue::String(v) => v.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Boolean(v) => Some(*v),
            ScalarValue::Number(v) => Some(*v != 0.0 && !v.is_nan()),
            ScalarValue::Null => Some(false),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ScalarValue]> {
        match self {
            ScalarValue::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            ScalarValue::Null => 0,
            ScalarValue::Boolean(_) => 1,
            ScalarValue::Number(_) => 2,
            ScalarValue::String(_) => 3,
            ScalarValue::List(_) => 4,
        }
    }
}

impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScalarValue {}

impl PartialOrd for ScalarValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScalarValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ScalarValue::Null, ScalarValue::Null) => Ordering::Equal,
            (ScalarValue::Boolean(a), ScalarValue::Boolean(b)) => a.cmp(b),
            (ScalarValue::Number(a), ScalarValue::Number(b)) => {
                OrderedFloat(*a).cmp(&OrderedFloat(*b))
            }
            (ScalarValue::String(a), ScalarValue::String(b)) => a.cmp(b),
            (ScalarValue::List(a), ScalarValue::List(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl Hash for ScalarValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_rank().hash(state);
        match self {
            ScalarValue::Null => {}
            ScalarValue::Boolean(v) => v.hash(state),
            ScalarValue::Number(v) => OrderedFloat(*v).hash(state),
            ScalarValue::String(v) => v.hash(state),
            ScalarValue::List(v) => v.hash(state),
        }
    }
}

impl Display for ScalarValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "null"),
            ScalarValue::Boolean(v) => write!(f, "{v}"),
            ScalarValue::Number(v) => write!(f, "{v}"),
            ScalarValue::String(v) => write!(f, "{v}"),
            ScalarValue::List(v) => {
                write!(f, "[")?;
                for (i, el) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{el}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Number(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Number(value as f64)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Number(value as f64)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl<T: Into<ScalarValue>> From<Vec<T>> for ScalarValue {
    fn from(value: Vec<T>) -> Self {
        ScalarValue::List(value.into_iter().map(Into::into).collect())
    }
}
