use crate::spec::values::{SignalExpressionSpec, ValueOrSignalSpec};
use crate::variable::Variable;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSpec {
    pub name: String,

    #[serde(rename = "type", default)]
    pub type_: ScaleTypeSpec,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<ScaleDomainSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_min: Option<ScaleBoundSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_max: Option<ScaleBoundSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ScaleRangeSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_min: Option<ScaleBoundSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_max: Option<ScaleBoundSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<ValueOrSignalSpec<bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero: Option<ValueOrSignalSpec<bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nice: Option<ValueOrSignalSpec<bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clamp: Option<ValueOrSignalSpec<bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<ValueOrSignalSpec<bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<ValueOrSignalSpec<bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<ValueOrSignalSpec<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_padding: Option<ValueOrSignalSpec<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponent: Option<ValueOrSignalSpec<f64>>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleTypeSpec {
    #[default]
    Linear,
    Ordinal,
    Pow,
    Sqrt,
    Log,
}

impl ScaleTypeSpec {
    pub fn is_discrete(&self) -> bool {
        matches!(self, ScaleTypeSpec::Ordinal)
    }

    pub fn is_continuous(&self) -> bool {
        !self.is_discrete()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleDomainSpec {
    FieldReference(ScaleDataReferenceSpec),
    FieldsReference(ScaleDataReferencesSpec),
    Signal(SignalExpressionSpec),
    Array(Vec<ScaleArrayElementSpec>),
    Value(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleRangeSpec {
    FieldReference(ScaleDataReferenceSpec),
    FieldsReference(ScaleDataReferencesSpec),
    Signal(SignalExpressionSpec),
    Array(Vec<ScaleArrayElementSpec>),
    Value(Value),
}

/// Form accepted by `domainMin`, `domainMax`, `rangeMin` and `rangeMax`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleBoundSpec {
    FieldReference(ScaleDataReferenceSpec),
    FieldsReference(ScaleDataReferencesSpec),
    Signal(SignalExpressionSpec),
    Value(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleDataReferencesSpec {
    pub fields: Vec<ScaleDataReferenceSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<ScaleSortSpec>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleDataReferenceSpec {
    /// Dataset name. When omitted the reference targets the data partition of the
    /// enclosing group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    pub field: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<ScaleSortSpec>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleArrayElementSpec {
    Signal(SignalExpressionSpec),
    Value(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleSortSpec {
    Bool(bool),
    Aggregate(ScaleSortAggregateSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSortAggregateSpec {
    pub field: String,

    #[serde(default)]
    pub op: AggregateOpSpec,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOpSpec {
    #[default]
    Count,
    Sum,
    #[serde(alias = "mean", alias = "avg")]
    Average,
    Min,
    Max,
    Median,
}

impl ScaleDataReferenceSpec {
    fn collect_vars(&self, vars: &mut Vec<Variable>) {
        if let Some(data) = &self.data {
            vars.push(Variable::new_data(data));
        }
    }
}

impl ScaleDataReferencesSpec {
    fn collect_vars(&self, vars: &mut Vec<Variable>) {
        for reference in &self.fields {
            reference.collect_vars(vars);
        }
    }

    fn references_group_data(&self) -> bool {
        self.fields.iter().any(|r| r.data.is_none())
    }
}

fn collect_array_vars(elements: &[ScaleArrayElementSpec], vars: &mut Vec<Variable>) {
    for el in elements {
        if let ScaleArrayElementSpec::Signal(expr) = el {
            vars.push(Variable::new_signal(&expr.signal));
        }
    }
}

impl ScaleBoundSpec {
    fn collect_vars(&self, vars: &mut Vec<Variable>) {
        match self {
            ScaleBoundSpec::FieldReference(r) => r.collect_vars(vars),
            ScaleBoundSpec::FieldsReference(r) => r.collect_vars(vars),
            ScaleBoundSpec::Signal(expr) => vars.push(Variable::new_signal(&expr.signal)),
            ScaleBoundSpec::Value(_) => {}
        }
    }

    fn references_group_data(&self) -> bool {
        match self {
            ScaleBoundSpec::FieldReference(r) => r.data.is_none(),
            ScaleBoundSpec::FieldsReference(r) => r.references_group_data(),
            _ => false,
        }
    }
}

impl ScaleSpec {
    /// Signals and datasets this scale must be re-resolved against when they change.
    /// Sorted and de-duplicated.
    pub fn input_vars(&self) -> Vec<Variable> {
        let mut vars = Vec::new();
        match &self.domain {
            Some(ScaleDomainSpec::FieldReference(r)) => r.collect_vars(&mut vars),
            Some(ScaleDomainSpec::FieldsReference(r)) => r.collect_vars(&mut vars),
            Some(ScaleDomainSpec::Signal(expr)) => vars.push(Variable::new_signal(&expr.signal)),
            Some(ScaleDomainSpec::Array(elements)) => collect_array_vars(elements, &mut vars),
            Some(ScaleDomainSpec::Value(_)) | None => {}
        }
        match &self.range {
            Some(ScaleRangeSpec::FieldReference(r)) => r.collect_vars(&mut vars),
            Some(ScaleRangeSpec::FieldsReference(r)) => r.collect_vars(&mut vars),
            Some(ScaleRangeSpec::Signal(expr)) => vars.push(Variable::new_signal(&expr.signal)),
            Some(ScaleRangeSpec::Array(elements)) => collect_array_vars(elements, &mut vars),
            Some(ScaleRangeSpec::Value(_)) | None => {}
        }
        for bound in [
            &self.domain_min,
            &self.domain_max,
            &self.range_min,
            &self.range_max,
        ]
        .into_iter()
        .flatten()
        {
            bound.collect_vars(&mut vars);
        }

        let bool_params = [
            &self.reverse,
            &self.zero,
            &self.nice,
            &self.clamp,
            &self.points,
            &self.round,
        ];
        vars.extend(
            bool_params
                .into_iter()
                .flatten()
                .filter_map(|p| p.signal_name())
                .map(Variable::new_signal),
        );
        let num_params = [&self.padding, &self.outer_padding, &self.exponent];
        vars.extend(
            num_params
                .into_iter()
                .flatten()
                .filter_map(|p| p.signal_name())
                .map(Variable::new_signal),
        );

        vars.into_iter().sorted().dedup().collect()
    }

    /// Whether any data reference omits its dataset name, and so reads from the
    /// partition of the enclosing group
    pub fn references_group_data(&self) -> bool {
        let domain = match &self.domain {
            Some(ScaleDomainSpec::FieldReference(r)) => r.data.is_none(),
            Some(ScaleDomainSpec::FieldsReference(r)) => r.references_group_data(),
            _ => false,
        };
        let range = match &self.range {
            Some(ScaleRangeSpec::FieldReference(r)) => r.data.is_none(),
            Some(ScaleRangeSpec::FieldsReference(r)) => r.references_group_data(),
            _ => false,
        };
        domain
            || range
            || [
                &self.domain_min,
                &self.domain_max,
                &self.range_min,
                &self.range_max,
            ]
            .into_iter()
            .flatten()
            .any(|b| b.references_group_data())
    }
}
