use crate::variable::{Variable, VariableNamespace};
use std::collections::HashSet;
use vegascale_common::error::{Result, ResultWithContext, VegaScaleError};

/// Names defined at each level of the group hierarchy
#[derive(Clone, Debug, Default)]
pub struct TaskScope {
    pub signals: HashSet<String>,
    pub data: HashSet<String>,
    pub scales: HashSet<String>,
    pub children: Vec<TaskScope>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_child(&self, scope: &[u32]) -> Result<&TaskScope> {
        let mut child = self;
        for index in scope {
            child = child
                .children
                .get(*index as usize)
                .with_context(|| format!("No group with scope {scope:?} found"))?;
        }
        Ok(child)
    }

    pub fn get_child_mut(&mut self, scope: &[u32]) -> Result<&mut TaskScope> {
        let mut child = self;
        for index in scope {
            child = child
                .children
                .get_mut(*index as usize)
                .with_context(|| format!("No group with scope {scope:?} found"))?;
        }
        Ok(child)
    }

    pub fn add_variable(&mut self, variable: &Variable, scope: &[u32]) -> Result<()> {
        let child = self.get_child_mut(scope)?;

        match variable.ns() {
            VariableNamespace::Signal => {
                child.signals.insert(variable.name.clone());
            }
            VariableNamespace::Data => {
                child.data.insert(variable.name.clone());
            }
            VariableNamespace::Scale => {
                child.scales.insert(variable.name.clone());
            }
            VariableNamespace::Group => {
                return Err(VegaScaleError::internal(
                    "Group variables are not registered by name",
                ))
            }
        }

        Ok(())
    }

    /// Find the scope that defines `variable` as seen from `usage_scope`, starting at the
    /// usage scope and walking up to the top level
    pub fn resolve_scope(&self, variable: &Variable, usage_scope: &[u32]) -> Result<Resolved> {
        for level in (0..=usage_scope.len()).rev() {
            let curr_scope = &usage_scope[0..level];
            let task_scope = self.get_child(curr_scope)?;

            let found_it = match variable.ns() {
                VariableNamespace::Signal => task_scope.signals.contains(&variable.name),
                VariableNamespace::Data => task_scope.data.contains(&variable.name),
                VariableNamespace::Scale => task_scope.scales.contains(&variable.name),
                VariableNamespace::Group => false,
            };
            if found_it {
                return Ok(Resolved {
                    var: variable.clone(),
                    scope: Vec::from(curr_scope),
                });
            }
        }

        // Didn't find it
        Err(match variable.ns() {
            VariableNamespace::Signal => VegaScaleError::unresolved_signal(&variable.name),
            VariableNamespace::Data => VegaScaleError::unresolved_data(&variable.name),
            VariableNamespace::Scale => VegaScaleError::unresolved_scale(&variable.name),
            VariableNamespace::Group => VegaScaleError::internal(format!(
                "Failed to resolve variable {variable} used in scope {usage_scope:?}"
            )),
        })
    }
}

pub struct Resolved {
    pub var: Variable,
    pub scope: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vegascale_common::error::{ReferenceKind, VegaScaleError};

    #[test]
    fn test_resolve_walks_up() {
        let mut task_scope = TaskScope::new();
        task_scope.children.push(TaskScope::new());
        task_scope
            .add_variable(&Variable::new_scale("x"), &[])
            .unwrap();
        task_scope
            .add_variable(&Variable::new_scale("pos"), &[0])
            .unwrap();

        let resolved = task_scope
            .resolve_scope(&Variable::new_scale("x"), &[0])
            .unwrap();
        assert_eq!(resolved.scope, Vec::<u32>::new());

        let resolved = task_scope
            .resolve_scope(&Variable::new_scale("pos"), &[0])
            .unwrap();
        assert_eq!(resolved.scope, vec![0]);

        let err = task_scope
            .resolve_scope(&Variable::new_signal("nope"), &[0])
            .err()
            .unwrap();
        assert!(matches!(
            err,
            VegaScaleError::UnresolvedReference(ReferenceKind::Signal, name, _) if name == "nope"
        ));
    }
}
