//! Signature entries.

use crate::{OwnerSlot, ParamId};

/// Which slot of a signature a parameter occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSlot {
    Positional,
    Named,
    VariadicPositional,
    VariadicNamed,
}

/// An ordered parameter list.
///
/// Names are unique across all four slots. The registry enforces this and
/// the ownership of each parameter; this type only stores the layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignatureEntry {
    pub positional: Vec<ParamId>,
    pub named: Vec<ParamId>,
    pub variadic_positional: Option<ParamId>,
    pub variadic_named: Option<ParamId>,
    /// Owning function or definition. Managed by the registry.
    pub owner: OwnerSlot,
}

impl SignatureEntry {
    /// Create an empty signature.
    pub fn new() -> Self {
        Self::default()
    }

    /// All parameters in declaration order: positional, named,
    /// variadic-positional, variadic-named.
    pub fn parameters(&self) -> impl Iterator<Item = ParamId> + '_ {
        self.positional
            .iter()
            .chain(self.named.iter())
            .copied()
            .chain(self.variadic_positional)
            .chain(self.variadic_named)
    }

    /// Number of parameters across all slots.
    pub fn len(&self) -> usize {
        self.positional.len()
            + self.named.len()
            + usize::from(self.variadic_positional.is_some())
            + usize::from(self.variadic_named.is_some())
    }

    /// Check if the signature has no parameters at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locate `param`: its slot and index within that slot.
    pub fn locate(&self, param: ParamId) -> Option<(ParamSlot, usize)> {
        if let Some(index) = self.positional.iter().position(|p| *p == param) {
            return Some((ParamSlot::Positional, index));
        }
        if let Some(index) = self.named.iter().position(|p| *p == param) {
            return Some((ParamSlot::Named, index));
        }
        if self.variadic_positional == Some(param) {
            return Some((ParamSlot::VariadicPositional, 0));
        }
        if self.variadic_named == Some(param) {
            return Some((ParamSlot::VariadicNamed, 0));
        }
        None
    }
}
