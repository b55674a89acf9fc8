//! Dependency resolution for generic parameters.
//!
//! Parameters whose declared type is another parameter form chains
//! (`X: Type`, `Y: X`, `Z: X`). Before a signature can be substituted:
//!
//! 1. bound values push their runtime type back up the chain
//!    ([`infer_bindings`]);
//! 2. bound values are checked against their declared types
//!    ([`validate_bindings`]);
//! 3. parameters are leveled so every dependency is substituted before its
//!    dependents ([`resolve_dependencies`]). A cycle is fatal.
//!
//! None of these steps touch the registry, so a failure leaves the declaration
//! graph unchanged.

use genus_core::{
    ConstructionError, GenericArg, ParamId, Substitution, TypeId, TypeRef, Value, primitives,
};
use genus_registry::DeclRegistry;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use super::InferenceConflictPolicy;
use crate::assignability::is_instance_of;

/// Parameters grouped by dependency level, each level in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyLevels {
    levels: Vec<Vec<ParamId>>,
}

impl DependencyLevels {
    pub fn levels(&self) -> &[Vec<ParamId>] {
        &self.levels
    }

    /// Parameters in processing order: level by level.
    pub fn iter(&self) -> impl Iterator<Item = ParamId> + '_ {
        self.levels.iter().flatten().copied()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level_of(&self, param: ParamId) -> Option<usize> {
        self.levels.iter().position(|level| level.contains(&param))
    }
}

/// Follow `param`'s binding chain, turning a loop into a construction error.
pub(crate) fn resolve(
    registry: &DeclRegistry,
    subst: &Substitution,
    param: ParamId,
) -> Result<Option<GenericArg>, ConstructionError> {
    subst
        .resolve(param)
        .map_err(|cycle| ConstructionError::CyclicDependency {
            parameter: registry.type_name(TypeRef::Param(cycle.param)),
        })
}

/// The parameter a binding for `param` would land on: `param` itself when
/// unbound, or the unbound end of its alias chain.
fn binding_target(
    registry: &DeclRegistry,
    subst: &Substitution,
    param: ParamId,
) -> Result<Option<ParamId>, ConstructionError> {
    Ok(match resolve(registry, subst, param)? {
        None => Some(param),
        Some(GenericArg::Param(terminal)) => Some(terminal),
        Some(GenericArg::Value(_)) => None,
    })
}

/// Bind unbound type parameters from the runtime types of bound values.
///
/// For every bound parameter `p: T` with `T` unbound, binds `T` to the
/// runtime type of `p`'s value, then continues from `T`.
pub fn infer_bindings(
    registry: &DeclRegistry,
    params: &[ParamId],
    subst: &mut Substitution,
) -> Result<(), ConstructionError> {
    let mut worklist: Vec<ParamId> = params.to_vec();
    worklist.reverse();

    while let Some(param) = worklist.pop() {
        let value = match resolve(registry, subst, param)? {
            Some(GenericArg::Value(value)) => value,
            _ => continue,
        };
        let declared = match registry.param(param)?.ty {
            TypeRef::Param(declared) => declared,
            TypeRef::Type(_) => continue,
        };
        let Some(target) = binding_target(registry, subst, declared)? else {
            continue;
        };

        let inferred = value.runtime_type();
        tracing::trace!(
            param = %registry.type_name(TypeRef::Param(target)),
            inferred = %registry.type_name(TypeRef::Type(inferred)),
            "inferred binding"
        );
        subst.bind(target, Value::Type(inferred));
        worklist.push(target);
    }
    Ok(())
}

/// The concrete type a parameter's declared type resolves to, if known.
fn declared_type(
    registry: &DeclRegistry,
    subst: &Substitution,
    param: ParamId,
) -> Result<Option<TypeId>, ConstructionError> {
    match registry.param(param)?.ty {
        TypeRef::Type(ty) => Ok(Some(ty)),
        TypeRef::Param(declared) => match resolve(registry, subst, declared)? {
            Some(GenericArg::Value(Value::Type(ty))) => Ok(Some(ty)),
            Some(GenericArg::Value(other)) => Err(ConstructionError::InvalidBinding {
                parameter: registry.type_name(TypeRef::Param(declared)),
                reason: format!("expected a type, got {}", other),
            }),
            _ => Ok(None),
        },
    }
}

/// Check every bound value against its parameter's declared type.
pub fn validate_bindings(
    registry: &DeclRegistry,
    params: &[ParamId],
    subst: &Substitution,
    policy: InferenceConflictPolicy,
) -> Result<(), ConstructionError> {
    for &param in params {
        let value = match resolve(registry, subst, param)? {
            Some(GenericArg::Value(value)) => value,
            _ => continue,
        };
        let Some(declared) = declared_type(registry, subst, param)? else {
            continue;
        };

        if declared == primitives::TYPE && !value.is_type() {
            return Err(ConstructionError::InvalidBinding {
                parameter: registry.param(param)?.name.clone(),
                reason: format!("expected a type, got {}", value),
            });
        }
        if policy == InferenceConflictPolicy::Reject
            && !is_instance_of(registry, &value, TypeRef::Type(declared))
        {
            return Err(ConstructionError::InvalidBinding {
                parameter: registry.param(param)?.name.clone(),
                reason: format!(
                    "{} is not an instance of {}",
                    value,
                    registry.type_name(TypeRef::Type(declared))
                ),
            });
        }
    }
    Ok(())
}

/// Level `params` so that every parameter comes after the parameters its
/// declared type depends on.
///
/// A parameter depends on `q` when its declared type is `q`, or an alias
/// chain from `q` ends at `q'`; only dependencies among `params` count.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve_dependencies(
    registry: &DeclRegistry,
    params: &[ParamId],
    subst: &Substitution,
) -> Result<DependencyLevels, ConstructionError> {
    let mut graph: DiGraph<ParamId, ()> = DiGraph::with_capacity(params.len(), params.len());
    let nodes: FxHashMap<ParamId, NodeIndex> = params
        .iter()
        .map(|param| (*param, graph.add_node(*param)))
        .collect();

    for &param in params {
        let TypeRef::Param(declared) = registry.param(param)?.ty else {
            continue;
        };
        let mut dependencies = vec![declared];
        if let Some(GenericArg::Param(terminal)) = resolve(registry, subst, declared)? {
            if terminal != declared {
                dependencies.push(terminal);
            }
        }
        for dependency in dependencies {
            if let Some(from) = nodes.get(&dependency) {
                graph.add_edge(*from, nodes[&param], ());
            }
        }
    }

    let order = toposort(&graph, None).map_err(|cycle| ConstructionError::CyclicDependency {
        parameter: registry.type_name(TypeRef::Param(graph[cycle.node_id()])),
    })?;

    let mut level_of: FxHashMap<NodeIndex, usize> = FxHashMap::default();
    for node in &order {
        let level = graph
            .neighbors_directed(*node, Direction::Incoming)
            .filter_map(|dependency| level_of.get(&dependency))
            .map(|level| level + 1)
            .max()
            .unwrap_or(0);
        level_of.insert(*node, level);
    }

    let mut levels: Vec<Vec<ParamId>> = Vec::new();
    for param in params {
        let level = level_of.get(&nodes[param]).copied().unwrap_or(0);
        if levels.len() <= level {
            levels.resize_with(level + 1, Vec::new);
        }
        levels[level].push(*param);
    }

    tracing::trace!(levels = levels.len(), params = params.len(), "leveled dependencies");
    Ok(DependencyLevels { levels })
}
