//! Overload resolution over overload groups.
//!
//! ## Algorithm
//!
//! A candidate is accepted when every rule holds; the first failing rule
//! rejects it:
//!
//! 1. the positional count fits the positional parameters, or a
//!    variadic-positional slot absorbs the excess;
//! 2. the named count fits the named parameters, or a variadic-named slot
//!    absorbs the excess;
//! 3. each positional argument is compatible with its parameter (excess
//!    arguments with the variadic element type);
//! 4. positional parameters past the supplied count have defaults;
//! 5. each named argument matches a named parameter by name, or is absorbed
//!    by the variadic-named slot, and is compatible with it;
//! 6. named parameters that were not supplied have defaults.
//!
//! Compatibility is [`assignable`], or [`are_identical`] under
//! [`MatchFlags::STRICT`]. With [`MatchFlags::RECURSIVE`], an empty group
//! falls back to its parent group; a non-empty local result always wins.
//!
//! Finding nothing is not an error: the result is simply empty.

mod call_plan;

pub use call_plan::{Argument, CallPlan, match_call};

use bitflags::bitflags;
use genus_core::{FunctionId, GroupId, ParamEntry, ParamId, SignatureEntry, TypeRef};
use genus_registry::DeclRegistry;
use rustc_hash::FxHashSet;

use crate::assignability::{are_identical, assignable};

bitflags! {
    /// Options for overload matching.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct MatchFlags: u8 {
        /// Compare types by identity instead of assignability.
        const STRICT = 1 << 0;
        /// Fall back to the parent group when nothing matches locally.
        const RECURSIVE = 1 << 1;
        /// Also report candidates that match only part of the call.
        const ALLOW_PARTIAL = 1 << 2;
    }
}

/// Why a candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnknownCandidate,
    TooManyPositional { supplied: usize, accepted: usize },
    TooManyNamed { supplied: usize, accepted: usize },
    PositionalType { index: usize },
    MissingPositional { param: String },
    UnknownNamed { name: String },
    NamedType { name: String },
    MissingNamed { param: String },
}

/// Type compatibility in the mode selected by the flags.
pub(crate) fn compatible(registry: &DeclRegistry, flags: MatchFlags, arg: TypeRef, declared: TypeRef) -> bool {
    if flags.contains(MatchFlags::STRICT) {
        are_identical(arg, declared)
    } else {
        assignable(registry, arg, declared)
    }
}

/// A candidate's signature with its parameter entries looked up.
pub(crate) struct CandidateView<'r> {
    pub signature: &'r SignatureEntry,
    registry: &'r DeclRegistry,
}

impl<'r> CandidateView<'r> {
    pub fn new(registry: &'r DeclRegistry, f: FunctionId) -> Option<Self> {
        let function = registry.get_function(f)?;
        let signature = registry.get_signature(function.signature)?;
        Some(Self {
            signature,
            registry,
        })
    }

    pub fn param(&self, param: ParamId) -> Option<&'r ParamEntry> {
        self.registry.get_param(param)
    }

    /// The declared named parameter called `name`.
    pub fn named(&self, name: &str) -> Option<ParamId> {
        self.signature
            .named
            .iter()
            .copied()
            .find(|param| self.param(*param).is_some_and(|entry| entry.name == name))
    }

    /// The parameter receiving positional argument `index`.
    pub fn positional(&self, index: usize) -> Option<ParamId> {
        self.signature
            .positional
            .get(index)
            .copied()
            .or(self.signature.variadic_positional)
    }

    pub fn has_default(&self, param: ParamId) -> bool {
        self.param(param).is_some_and(ParamEntry::has_default)
    }

    pub fn name(&self, param: ParamId) -> String {
        self.param(param)
            .map_or_else(|| param.to_string(), |entry| entry.name.clone())
    }
}

/// Check one candidate against the call, stopping at the first failed rule.
pub fn check_candidate(
    registry: &DeclRegistry,
    f: FunctionId,
    positional: &[TypeRef],
    named: &[(&str, TypeRef)],
    flags: MatchFlags,
) -> Result<(), Rejection> {
    let view = CandidateView::new(registry, f).ok_or(Rejection::UnknownCandidate)?;
    let signature = view.signature;

    if positional.len() > signature.positional.len() && signature.variadic_positional.is_none() {
        return Err(Rejection::TooManyPositional {
            supplied: positional.len(),
            accepted: signature.positional.len(),
        });
    }
    if named.len() > signature.named.len() && signature.variadic_named.is_none() {
        return Err(Rejection::TooManyNamed {
            supplied: named.len(),
            accepted: signature.named.len(),
        });
    }

    for (index, arg) in positional.iter().enumerate() {
        let declared = view
            .positional(index)
            .and_then(|param| view.param(param))
            .ok_or(Rejection::PositionalType { index })?;
        if !compatible(registry, flags, *arg, declared.ty) {
            return Err(Rejection::PositionalType { index });
        }
    }
    for param in signature.positional.iter().skip(positional.len()) {
        if !view.has_default(*param) {
            return Err(Rejection::MissingPositional {
                param: view.name(*param),
            });
        }
    }

    let mut supplied: FxHashSet<ParamId> = FxHashSet::default();
    for (name, arg) in named {
        let param = match view.named(name) {
            Some(param) if supplied.insert(param) => param,
            _ => signature.variadic_named.ok_or_else(|| Rejection::UnknownNamed {
                name: name.to_string(),
            })?,
        };
        let declared = view.param(param).ok_or(Rejection::UnknownCandidate)?;
        if !compatible(registry, flags, *arg, declared.ty) {
            return Err(Rejection::NamedType {
                name: name.to_string(),
            });
        }
    }
    for param in &signature.named {
        if !supplied.contains(param) && !view.has_default(*param) {
            return Err(Rejection::MissingNamed {
                param: view.name(*param),
            });
        }
    }
    Ok(())
}

/// Select the candidates of `group` that accept the call, in declaration
/// order.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn get_match(
    registry: &DeclRegistry,
    group: GroupId,
    positional: &[TypeRef],
    named: &[(&str, TypeRef)],
    flags: MatchFlags,
) -> Vec<FunctionId> {
    let mut visited: FxHashSet<GroupId> = FxHashSet::default();
    let mut current = Some(group);

    while let Some(group) = current {
        if !visited.insert(group) {
            break;
        }
        let Some(entry) = registry.get_group(group) else {
            break;
        };

        let matches: Vec<FunctionId> = entry
            .overloads
            .iter()
            .copied()
            .filter(|f| match check_candidate(registry, *f, positional, named, flags) {
                Ok(()) => true,
                Err(rejection) => {
                    tracing::trace!(candidate = %f, ?rejection, "candidate rejected");
                    false
                }
            })
            .collect();

        if !matches.is_empty() || !flags.contains(MatchFlags::RECURSIVE) {
            return matches;
        }
        tracing::trace!(%group, parent = ?entry.parent, "no local match, trying parent group");
        current = entry.parent;
    }
    Vec::new()
}
