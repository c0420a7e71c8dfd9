use crate::context::ResolutionContext;
use crate::facet::FacetGroup;
use crate::registry::ScaleRegistry;
use crate::scale::Scale;
use lazy_static::lazy_static;
use log::{debug, warn};
use std::collections::HashMap;
use vegascale_common::data::scalar::ScalarValue;
use vegascale_common::data::table::{DataTable, Record};
use vegascale_common::error::{Result, ResultWithContext, VegaScaleError};
use vegascale_core::data::source::DataSource;
use vegascale_core::signal::Signal;
use vegascale_core::spec::chart::ChartSpec;
use vegascale_core::spec::mark::MarkSpec;
use vegascale_core::task_graph::graph::{root_data, root_signal, DependencyGraph};
use vegascale_core::variable::{ScopedVariable, VariableNamespace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStateOpts {
    /// Layout width when the chart does not declare one
    pub default_width: f64,
    /// Layout height when the chart does not declare one
    pub default_height: f64,
    /// Approximate tick count that `nice` rounds domains for
    pub nice_count: usize,
}

impl Default for ChartStateOpts {
    fn default() -> Self {
        Self {
            default_width: 500.0,
            default_height: 500.0,
            nice_count: 10,
        }
    }
}

/// The live scales of a chart. Owns the signals and datasets the scales read from, and
/// re-resolves every dependent scale, exactly once, when a batch of changes is fired.
#[derive(Debug)]
pub struct ChartState {
    spec: ChartSpec,
    width: f64,
    height: f64,
    nice_count: usize,
    graph: DependencyGraph,
    signals: HashMap<String, Signal>,
    datasets: HashMap<String, DataSource>,
    scales: ScaleRegistry,
    groups: Vec<FacetGroup>,
    stamp: u64,
}

impl ChartState {
    pub fn try_new(spec: ChartSpec, opts: ChartStateOpts) -> Result<Self> {
        for group in spec.marks.iter().filter(|m| m.is_group()) {
            check_no_nested_scales(group)?;
        }

        let mut signals = HashMap::new();
        for signal_spec in &spec.signals {
            let signal = Signal::try_from_spec(signal_spec)?;
            if signals.insert(signal_spec.name.clone(), signal).is_some() {
                return Err(VegaScaleError::specification(format!(
                    "Duplicate signal name {:?}",
                    signal_spec.name
                )));
            }
        }

        let mut datasets = HashMap::new();
        for data_spec in &spec.data {
            let source = DataSource::try_from_spec(data_spec)?;
            if datasets.insert(data_spec.name.clone(), source).is_some() {
                return Err(VegaScaleError::specification(format!(
                    "Duplicate dataset name {:?}",
                    data_spec.name
                )));
            }
        }

        let task_scope = spec.to_task_scope()?;
        let graph = DependencyGraph::try_new(&spec, &task_scope)?;

        let width = spec.width.unwrap_or(opts.default_width);
        let height = spec.height.unwrap_or(opts.default_height);
        let stamp = 0;
        let ctx = ResolutionContext::new(&signals, &datasets, width, height, opts.nice_count);

        let scales = ScaleRegistry::try_new(&spec.scales, &[], &ctx, stamp)?;
        let groups = spec
            .marks
            .iter()
            .filter(|m| m.is_group())
            .enumerate()
            .map(|(i, mark)| {
                FacetGroup::try_new(i as u32, mark, &ctx, stamp)
                    .with_context(|| format!("Failed to create group {i}"))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Created chart state with {} signal(s), {} dataset(s), {} scale(s), {} group(s)",
            signals.len(),
            datasets.len(),
            scales.len(),
            groups.len()
        );

        Ok(Self {
            spec,
            width,
            height,
            nice_count: opts.nice_count,
            graph,
            signals,
            datasets,
            scales,
            groups,
            stamp,
        })
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of fires that changed something since construction
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Top-level scale
    pub fn scale(&self, name: &str) -> Result<&Scale> {
        self.scales.scale(name)
    }

    pub fn scales(&self) -> &ScaleRegistry {
        &self.scales
    }

    /// Group mark by its index among the top-level group marks
    pub fn group(&self, index: u32) -> Result<&FacetGroup> {
        self.groups.get(index as usize).ok_or_else(|| {
            VegaScaleError::specification(format!("No group with index {index}"))
        })
    }

    pub fn groups(&self) -> &[FacetGroup] {
        &self.groups
    }

    /// Scale visible from one instance of a group: the group's own scale of that name,
    /// or else the top-level one
    pub fn lookup_scale(&self, group: u32, instance: usize, name: &str) -> Result<&Scale> {
        let instance = self.group(group)?.instance(instance)?;
        match instance.scales().get(name) {
            Some(scale) => Ok(scale),
            None => self.scale(name),
        }
    }

    pub fn signal_value(&self, name: &str) -> Result<&ScalarValue> {
        self.signals
            .get(name)
            .map(Signal::value)
            .ok_or_else(|| VegaScaleError::unresolved_signal(name))
    }

    /// Committed records of a dataset
    pub fn table(&self, name: &str) -> Result<&DataTable> {
        self.datasets
            .get(name)
            .map(DataSource::table)
            .ok_or_else(|| VegaScaleError::unresolved_data(name))
    }

    /// Handle for staging writes to a signal
    pub fn signal(&mut self, name: &str) -> Result<SignalHandle<'_>> {
        if !self.signals.contains_key(name) {
            return Err(VegaScaleError::unresolved_signal(name));
        }
        Ok(SignalHandle {
            state: self,
            name: name.to_string(),
        })
    }

    /// Handle for staging operations on a dataset
    pub fn data(&mut self, name: &str) -> Result<DataHandle<'_>> {
        if !self.datasets.contains_key(name) {
            return Err(VegaScaleError::unresolved_data(name));
        }
        Ok(DataHandle {
            state: self,
            name: name.to_string(),
        })
    }

    /// Commit every staged signal write and dataset operation as a single batch
    pub fn fire(&mut self) -> Result<()> {
        let mut changed = self.commit_signals();
        for (name, source) in self.datasets.iter_mut() {
            if source.commit() {
                changed.push(root_data(name));
            }
        }
        self.propagate(changed)
    }

    /// Commit the staged signal writes
    pub fn fire_signals(&mut self) -> Result<()> {
        let changed = self.commit_signals();
        self.propagate(changed)
    }

    /// Commit the staged operations of one dataset
    pub fn fire_data(&mut self, name: &str) -> Result<()> {
        let source = self
            .datasets
            .get_mut(name)
            .ok_or_else(|| VegaScaleError::unresolved_data(name))?;
        let changed = if source.commit() {
            vec![root_data(name)]
        } else {
            Vec::new()
        };
        self.propagate(changed)
    }

    fn commit_signals(&mut self) -> Vec<ScopedVariable> {
        let mut changed = Vec::new();
        for (name, signal) in self.signals.iter_mut() {
            if signal.commit() {
                debug!("Committed signal {name:?} = {}", signal.value());
                changed.push(root_signal(name));
            }
        }
        changed
    }

    /// Re-resolve everything downstream of `changed` under a new stamp
    fn propagate(&mut self, changed: Vec<ScopedVariable>) -> Result<()> {
        if changed.is_empty() {
            return Ok(());
        }
        let affected = self.graph.affected(&changed)?;
        self.stamp += 1;
        let stamp = self.stamp;
        debug!(
            "Propagating {} change(s) to {} dependent(s) at stamp {stamp}",
            changed.len(),
            affected.len()
        );

        let ctx = ResolutionContext::new(
            &self.signals,
            &self.datasets,
            self.width,
            self.height,
            self.nice_count,
        );
        for (var, scope) in affected {
            match (var.ns(), scope.as_slice()) {
                (VariableNamespace::Group, []) => {
                    let group = group_index(&var.name)
                        .and_then(|i| self.groups.get_mut(i))
                        .with_context(|| format!("No group for variable {var}"))?;
                    if let Err(err) = group.refacet(&ctx, stamp) {
                        warn!("Failed to refacet group {}: {err}", var.name);
                    }
                }
                // Nested groups have no instances of their own
                (VariableNamespace::Group, _) => {}
                (VariableNamespace::Scale, []) => {
                    if let Err(err) = self.scales.refresh(&var.name, &ctx, stamp) {
                        warn!("Failed to refresh scale {:?}: {err}", var.name);
                    }
                }
                (VariableNamespace::Scale, [group]) => {
                    let group = self
                        .groups
                        .get_mut(*group as usize)
                        .with_context(|| format!("No group for scope {scope:?}"))?;
                    group.refresh_scale(&var.name, &ctx, stamp);
                }
                _ => {
                    return Err(VegaScaleError::internal(format!(
                        "Unexpected dependent {var} in scope {scope:?}"
                    )))
                }
            }
        }
        Ok(())
    }
}

fn group_index(name: &str) -> Option<usize> {
    name.parse().ok()
}

fn check_no_nested_scales(group: &MarkSpec) -> Result<()> {
    for mark in group.marks.iter().filter(|m| m.is_group()) {
        if !mark.scales.is_empty() {
            return Err(VegaScaleError::specification(
                "Scales on nested group marks are not supported",
            ));
        }
        check_no_nested_scales(mark)?;
    }
    Ok(())
}

/// Stages values for a signal. Writes are only visible after [`SignalHandle::fire`].
pub struct SignalHandle<'a> {
    state: &'a mut ChartState,
    name: String,
}

impl<'a> SignalHandle<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Committed value
    pub fn get(&self) -> &ScalarValue {
        self.state
            .signals
            .get(&self.name)
            .map(Signal::value)
            .unwrap_or(&NULL_VALUE)
    }

    /// Stage a new value
    pub fn value<V: Into<ScalarValue>>(self, value: V) -> Self {
        if let Some(signal) = self.state.signals.get_mut(&self.name) {
            signal.set_value(value.into());
        }
        self
    }

    /// Switch to another signal, keeping the writes staged so far
    pub fn signal(self, name: &str) -> Result<SignalHandle<'a>> {
        self.state.signal(name)
    }

    /// Commit all staged signal writes as one batch
    pub fn fire(self) -> Result<()> {
        self.state.fire_signals()
    }
}

/// Stages operations on a dataset. Nothing is applied until [`DataHandle::fire`].
pub struct DataHandle<'a> {
    state: &'a mut ChartState,
    name: String,
}

impl<'a> DataHandle<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Committed records
    pub fn values(&self) -> &DataTable {
        self.state
            .datasets
            .get(&self.name)
            .map(DataSource::table)
            .unwrap_or(&EMPTY_TABLE)
    }

    /// Continue staging onto the same batch
    pub fn synchronize(self) -> Self {
        self
    }

    pub fn insert(self, records: Vec<Record>) -> Self {
        if let Some(source) = self.state.datasets.get_mut(&self.name) {
            source.insert(records);
        }
        self
    }

    /// Set `field` to `transform(record)` on every record matching `predicate`
    pub fn update<P, T>(self, predicate: P, field: &str, transform: T) -> Self
    where
        P: Fn(&Record) -> bool + 'static,
        T: Fn(&Record) -> ScalarValue + 'static,
    {
        if let Some(source) = self.state.datasets.get_mut(&self.name) {
            source.update(predicate, field, transform);
        }
        self
    }

    pub fn remove<P>(self, predicate: P) -> Self
    where
        P: Fn(&Record) -> bool + 'static,
    {
        if let Some(source) = self.state.datasets.get_mut(&self.name) {
            source.remove(predicate);
        }
        self
    }

    /// Commit the staged operations of this dataset as one batch
    pub fn fire(self) -> Result<()> {
        self.state.fire_data(&self.name)
    }
}

static NULL_VALUE: ScalarValue = ScalarValue::Null;

lazy_static! {
    static ref EMPTY_TABLE: DataTable = DataTable::empty();
}
