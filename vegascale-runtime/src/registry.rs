use crate::context::ResolutionContext;
use crate::scale::Scale;
use std::collections::HashMap;
use vegascale_common::error::{Result, ResultWithContext, VegaScaleError};
use vegascale_core::spec::scale::ScaleSpec;

/// The scales of one scope, addressable by name. Scales keep their position and
/// identity for the lifetime of the registry.
#[derive(Debug, Clone, Default)]
pub struct ScaleRegistry {
    scales: Vec<Scale>,
    index: HashMap<String, usize>,
}

impl ScaleRegistry {
    /// Build one scale per spec. Fails on the first scale that cannot be resolved.
    pub fn try_new(
        specs: &[ScaleSpec],
        scope: &[u32],
        ctx: &ResolutionContext,
        stamp: u64,
    ) -> Result<Self> {
        let mut registry = Self::default();
        for spec in specs {
            if registry.index.contains_key(&spec.name) {
                return Err(VegaScaleError::specification(format!(
                    "Duplicate scale name {:?} in scope {scope:?}",
                    spec.name
                )));
            }
            let scale = Scale::try_new(spec.clone(), scope.to_vec(), ctx, stamp)
                .with_context(|| format!("Failed to create scale {:?}", spec.name))?;
            registry
                .index
                .insert(spec.name.clone(), registry.scales.len());
            registry.scales.push(scale);
        }
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&Scale> {
        self.index.get(name).and_then(|i| self.scales.get(*i))
    }

    pub fn scale(&self, name: &str) -> Result<&Scale> {
        self.get(name)
            .ok_or_else(|| VegaScaleError::unresolved_scale(name))
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Re-resolve the named scale unless it was already resolved at `stamp`
    pub fn refresh(&mut self, name: &str, ctx: &ResolutionContext, stamp: u64) -> Result<()> {
        let i = *self
            .index
            .get(name)
            .with_context(|| format!("No scale named {name:?} to refresh"))?;
        let scale = &mut self.scales[i];
        if scale.stamp() == stamp {
            return Ok(());
        }
        scale.refresh(ctx, stamp)
    }
}
