//! Call plans: how a call's arguments map onto a resolved candidate.

use genus_core::{Callee, FunctionId, GroupId, Instruction, ParamId, RegistrationError, TypeRef};
use genus_registry::DeclRegistry;
use rustc_hash::FxHashSet;

use super::{CandidateView, MatchFlags, compatible};

/// A compiled argument: the code producing it and its static type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub code: Vec<Instruction>,
    pub ty: TypeRef,
}

impl Argument {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            code: Vec::new(),
            ty: ty.into(),
        }
    }

    pub fn with_code(mut self, code: Vec<Instruction>) -> Self {
        self.code = code;
        self
    }
}

/// The arguments of one call laid out against one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPlan {
    pub callee: FunctionId,
    /// Positional argument indexes and the parameters they fill.
    pub matched_args: Vec<(usize, ParamId)>,
    pub unmatched_args: Vec<usize>,
    /// Keyword argument names and the parameters they fill.
    pub matched_kwargs: Vec<(String, ParamId)>,
    pub unmatched_kwargs: Vec<String>,
    /// Parameters that received nothing and have no default.
    pub missing: Vec<ParamId>,
    /// Call instruction bound to `callee`.
    pub call: Instruction,
    arguments: Vec<Instruction>,
}

impl CallPlan {
    /// Check if the candidate only accepts part of the call.
    pub fn is_partial(&self) -> bool {
        !self.unmatched_args.is_empty() || !self.unmatched_kwargs.is_empty() || !self.missing.is_empty()
    }

    /// How far the candidate is from accepting the call.
    pub fn distance(&self) -> usize {
        self.unmatched_args.len() + self.unmatched_kwargs.len() + self.missing.len()
    }

    /// Matched argument code in call order, followed by the call.
    pub fn instructions(&self) -> Vec<Instruction> {
        let mut code = self.arguments.clone();
        code.push(self.call.clone());
        code
    }

    /// Point the call instruction at `index` of `caller` at this plan's
    /// callee.
    pub fn bind_into(
        &self,
        registry: &mut DeclRegistry,
        caller: FunctionId,
        index: usize,
    ) -> Result<bool, RegistrationError> {
        registry.rebind_call(caller, index, Callee::Function(self.callee))
    }
}

/// Lay the call out against `candidate`, recording every argument that does
/// not fit instead of stopping at the first.
fn plan(
    registry: &DeclRegistry,
    group: GroupId,
    candidate: FunctionId,
    args: &[Argument],
    kwargs: &[(&str, Argument)],
    flags: MatchFlags,
) -> Option<CallPlan> {
    let view = CandidateView::new(registry, candidate)?;
    let signature = view.signature;

    let mut arguments = Vec::new();
    let mut matched_args = Vec::new();
    let mut unmatched_args = Vec::new();
    for (index, arg) in args.iter().enumerate() {
        let accepted = view.positional(index).filter(|param| {
            view.param(*param)
                .is_some_and(|entry| compatible(registry, flags, arg.ty, entry.ty))
        });
        match accepted {
            Some(param) => {
                matched_args.push((index, param));
                arguments.extend(arg.code.iter().cloned());
            }
            None => unmatched_args.push(index),
        }
    }

    let mut missing: Vec<ParamId> = signature
        .positional
        .iter()
        .skip(args.len())
        .copied()
        .filter(|param| !view.has_default(*param))
        .collect();

    let mut supplied: FxHashSet<ParamId> = FxHashSet::default();
    let mut matched_kwargs = Vec::new();
    let mut unmatched_kwargs = Vec::new();
    for (name, arg) in kwargs {
        let target = match view.named(name) {
            Some(param) if supplied.insert(param) => Some(param),
            _ => signature.variadic_named,
        };
        let accepted = target.filter(|param| {
            view.param(*param)
                .is_some_and(|entry| compatible(registry, flags, arg.ty, entry.ty))
        });
        match accepted {
            Some(param) => {
                matched_kwargs.push((name.to_string(), param));
                arguments.extend(arg.code.iter().cloned());
            }
            None => unmatched_kwargs.push(name.to_string()),
        }
    }
    missing.extend(
        signature
            .named
            .iter()
            .copied()
            .filter(|param| !supplied.contains(param) && !view.has_default(*param)),
    );

    let mut call = Instruction::Call {
        callee: Callee::Group(group),
        argc: matched_args.len() + matched_kwargs.len(),
    };
    call.rebind_callee(Callee::Function(candidate));

    Some(CallPlan {
        callee: candidate,
        matched_args,
        unmatched_args,
        matched_kwargs,
        unmatched_kwargs,
        missing,
        call,
        arguments,
    })
}

/// Resolve a call against `group` and describe how each accepting candidate
/// would receive the arguments.
///
/// Full matches come first, in declaration order. With
/// [`MatchFlags::ALLOW_PARTIAL`], partial plans follow, closest first; ties
/// keep declaration order. [`MatchFlags::RECURSIVE`] walks to the parent
/// group until some group yields a full match, collecting partial plans
/// from every group visited.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn match_call(
    registry: &DeclRegistry,
    group: GroupId,
    args: &[Argument],
    kwargs: &[(&str, Argument)],
    flags: MatchFlags,
) -> Vec<CallPlan> {
    let allow_partial = flags.contains(MatchFlags::ALLOW_PARTIAL);
    let mut full = Vec::new();
    let mut partial = Vec::new();
    let mut visited: FxHashSet<GroupId> = FxHashSet::default();
    let mut current = Some(group);

    while let Some(group) = current {
        if !visited.insert(group) {
            break;
        }
        let Some(entry) = registry.get_group(group) else {
            break;
        };

        for candidate in &entry.overloads {
            let Some(plan) = plan(registry, group, *candidate, args, kwargs, flags) else {
                continue;
            };
            if !plan.is_partial() {
                full.push(plan);
            } else if allow_partial {
                partial.push(plan);
            } else {
                tracing::trace!(candidate = %plan.callee, distance = plan.distance(), "partial plan dropped");
            }
        }

        if !full.is_empty() || !flags.contains(MatchFlags::RECURSIVE) {
            break;
        }
        current = entry.parent;
    }

    partial.sort_by_key(CallPlan::distance);
    full.extend(partial);
    full
}
