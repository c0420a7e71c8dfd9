use crate::context::ResolutionContext;
use crate::registry::ScaleRegistry;
use crate::scale::Scale;
use log::{debug, warn};
use vegascale_common::data::scalar::ScalarValue;
use vegascale_common::data::table::DataTable;
use vegascale_common::error::{Result, VegaScaleError};
use vegascale_core::spec::mark::MarkSpec;
use vegascale_core::spec::scale::ScaleSpec;

/// One instance of a group mark: a facet key, the matching rows and the group's scales
/// resolved against them
#[derive(Debug, Clone)]
pub struct GroupInstance {
    id: u64,
    key: Option<Vec<ScalarValue>>,
    partition: Option<DataTable>,
    registry: ScaleRegistry,
}

impl GroupInstance {
    /// Identifier assigned at creation. Stable for as long as the instance lives.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Facet key, `None` for a group whose data is not faceted
    pub fn key(&self) -> Option<&[ScalarValue]> {
        self.key.as_deref()
    }

    pub fn partition(&self) -> Option<&DataTable> {
        self.partition.as_ref()
    }

    pub fn scales(&self) -> &ScaleRegistry {
        &self.registry
    }

    pub fn scale(&self, name: &str) -> Result<&Scale> {
        self.registry.scale(name)
    }
}

type Partition = (Option<Vec<ScalarValue>>, Option<DataTable>);

/// A top-level group mark and its instances
#[derive(Debug, Clone)]
pub struct FacetGroup {
    index: u32,
    from: Option<String>,
    groupby: Option<Vec<String>>,
    scales: Vec<ScaleSpec>,
    instances: Vec<GroupInstance>,
    next_id: u64,
}

impl FacetGroup {
    pub fn try_new(
        index: u32,
        mark: &MarkSpec,
        ctx: &ResolutionContext,
        stamp: u64,
    ) -> Result<Self> {
        let from = mark.from.as_ref().and_then(|from| from.data.clone());
        let groupby = match &from {
            Some(name) => ctx
                .datasets
                .get(name)
                .ok_or_else(|| VegaScaleError::unresolved_data(name))?
                .facet()
                .map(<[String]>::to_vec),
            None => None,
        };

        let mut group = Self {
            index,
            from,
            groupby,
            scales: mark.scales.clone(),
            instances: Vec::new(),
            next_id: 0,
        };
        for (key, partition) in group.partitions(ctx)? {
            let instance = group.make_instance(key, partition, ctx, stamp)?;
            group.instances.push(instance);
        }
        debug!(
            "Created group {index} with {} instance(s)",
            group.instances.len()
        );
        Ok(group)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn scope(&self) -> Vec<u32> {
        vec![self.index]
    }

    pub fn instances(&self) -> &[GroupInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instance(&self, i: usize) -> Result<&GroupInstance> {
        self.instances.get(i).ok_or_else(|| {
            VegaScaleError::specification(format!(
                "Group {} has no instance {i}, it has {}",
                self.index,
                self.instances.len()
            ))
        })
    }

    pub fn instance_for_key(&self, key: &[ScalarValue]) -> Option<&GroupInstance> {
        self.instances.iter().find(|i| i.key() == Some(key))
    }

    /// Re-partition the source data. Instances whose key survives keep their identity
    /// and scales, and pick up their new partition. Instances for new keys are created,
    /// resolved at `stamp`, and the rest are dropped.
    pub fn refacet(&mut self, ctx: &ResolutionContext, stamp: u64) -> Result<()> {
        let partitions = self.partitions(ctx)?;
        let mut previous = std::mem::take(&mut self.instances);
        let mut instances = Vec::with_capacity(partitions.len());
        let mut created = 0;

        for (key, partition) in partitions {
            match previous.iter().position(|i| i.key == key) {
                Some(pos) => {
                    let mut instance = previous.swap_remove(pos);
                    instance.partition = partition;
                    instances.push(instance);
                }
                None => match self.make_instance(key.clone(), partition, ctx, stamp) {
                    Ok(instance) => {
                        created += 1;
                        instances.push(instance);
                    }
                    Err(err) => warn!(
                        "Failed to create instance {key:?} of group {}: {err}",
                        self.index
                    ),
                },
            }
        }

        if created > 0 || !previous.is_empty() {
            debug!(
                "Refaceted group {} at stamp {stamp}: {created} created, {} removed",
                self.index,
                previous.len()
            );
        }
        self.instances = instances;
        Ok(())
    }

    /// Re-resolve the named scale in every instance that has not been resolved at `stamp`.
    /// Instances that fail keep their previous state.
    pub fn refresh_scale(&mut self, name: &str, ctx: &ResolutionContext, stamp: u64) {
        for instance in &mut self.instances {
            let ctx = ctx.with_partition(instance.partition.as_ref());
            if let Err(err) = instance.registry.refresh(name, &ctx, stamp) {
                warn!(
                    "Failed to refresh scale {name:?} of group {} instance {:?}: {err}",
                    self.index, instance.key
                );
            }
        }
    }

    fn partitions(&self, ctx: &ResolutionContext) -> Result<Vec<Partition>> {
        let Some(from) = &self.from else {
            return Ok(vec![(None, None)]);
        };
        let table = ctx.table(Some(from))?;
        Ok(match &self.groupby {
            None => vec![(None, Some(table.clone()))],
            Some(fields) => table
                .distinct_keys(fields)
                .into_iter()
                .map(|key| {
                    let partition = table.filter_key(fields, &key);
                    (Some(key), Some(partition))
                })
                .collect(),
        })
    }

    fn make_instance(
        &mut self,
        key: Option<Vec<ScalarValue>>,
        partition: Option<DataTable>,
        ctx: &ResolutionContext,
        stamp: u64,
    ) -> Result<GroupInstance> {
        let registry = ScaleRegistry::try_new(
            &self.scales,
            &self.scope(),
            &ctx.with_partition(partition.as_ref()),
            stamp,
        )?;
        let id = self.next_id;
        self.next_id += 1;
        Ok(GroupInstance {
            id,
            key,
            partition,
            registry,
        })
    }
}
