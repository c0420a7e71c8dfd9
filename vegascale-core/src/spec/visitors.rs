use crate::spec::chart::ChartVisitor;
use crate::spec::data::DataSpec;
use crate::spec::mark::MarkSpec;
use crate::spec::scale::ScaleSpec;
use crate::spec::signal::SignalSpec;
use crate::task_graph::scope::TaskScope;
use crate::variable::{ScopedVariable, Variable};
use std::collections::HashSet;
use vegascale_common::error::{Result, ResultWithContext, VegaScaleError};

#[derive(Clone, Debug, Default)]
pub struct MakeTaskScopeVisitor {
    pub task_scope: TaskScope,
}

impl MakeTaskScopeVisitor {
    pub fn new() -> Self {
        Self {
            task_scope: Default::default(),
        }
    }
}

impl ChartVisitor for MakeTaskScopeVisitor {
    fn visit_data(&mut self, data: &DataSpec, scope: &[u32]) -> Result<()> {
        let task_scope = self.task_scope.get_child_mut(scope)?;
        task_scope.data.insert(data.name.clone());
        Ok(())
    }

    fn visit_signal(&mut self, signal: &SignalSpec, scope: &[u32]) -> Result<()> {
        let task_scope = self.task_scope.get_child_mut(scope)?;
        task_scope.signals.insert(signal.name.clone());
        Ok(())
    }

    fn visit_scale(&mut self, scale: &ScaleSpec, scope: &[u32]) -> Result<()> {
        let task_scope = self.task_scope.get_child_mut(scope)?;
        task_scope.scales.insert(scale.name.clone());
        Ok(())
    }

    fn visit_group_mark(&mut self, _mark: &MarkSpec, scope: &[u32]) -> Result<()> {
        // Initialize scope for this group level
        let parent_scope = self.task_scope.get_child_mut(&scope[0..scope.len() - 1])?;
        parent_scope.children.push(Default::default());
        Ok(())
    }
}

/// Collect `(dependency, dependent)` pairs of scoped variables
#[derive(Clone, Debug)]
pub struct InputVarsChartVisitor<'a> {
    pub task_scope: &'a TaskScope,
    pub input_vars: HashSet<(ScopedVariable, ScopedVariable)>,
}

impl<'a> InputVarsChartVisitor<'a> {
    pub fn new(task_scope: &'a TaskScope) -> Self {
        Self {
            task_scope,
            input_vars: Default::default(),
        }
    }
}

/// Group variable for the group mark at `scope`, which lives in the parent scope
pub fn group_scoped_var(scope: &[u32]) -> Result<ScopedVariable> {
    let (index, parent) = scope
        .split_last()
        .with_context(|| "Group scope may not be empty")?;
    Ok((Variable::new_group(*index), Vec::from(parent)))
}

impl<'a> ChartVisitor for InputVarsChartVisitor<'a> {
    fn visit_scale(&mut self, scale: &ScaleSpec, scope: &[u32]) -> Result<()> {
        let scale_var = (Variable::new_scale(&scale.name), Vec::from(scope));
        for input_var in scale.input_vars() {
            let resolved = self
                .task_scope
                .resolve_scope(&input_var, scope)
                .with_context(|| format!("Failed to resolve inputs of scale {:?}", scale.name))?;
            self.input_vars
                .insert(((resolved.var, resolved.scope), scale_var.clone()));
        }

        if scope.is_empty() {
            if scale.references_group_data() {
                return Err(VegaScaleError::specification(format!(
                    "Scale {:?} references a field without a dataset outside of a group",
                    scale.name
                )));
            }
        } else {
            // Scales of a group are rebuilt from the group's partition
            self.input_vars
                .insert((group_scoped_var(scope)?, scale_var));
        }
        Ok(())
    }

    fn visit_group_mark(&mut self, mark: &MarkSpec, scope: &[u32]) -> Result<()> {
        let group_var = group_scoped_var(scope)?;
        if let Some(data) = mark.from.as_ref().and_then(|from| from.data.as_ref()) {
            let resolved = self
                .task_scope
                .resolve_scope(&Variable::new_data(data), &group_var.1)
                .with_context(|| format!("Failed to resolve data source of group {scope:?}"))?;
            self.input_vars
                .insert(((resolved.var, resolved.scope), group_var));
        }
        Ok(())
    }
}
