//! Overload groups.

use crate::{FunctionId, GroupId, ScopeId};

/// Same-named callables considered together at a call site.
///
/// Groups reference their functions; they do not own them.
#[derive(Debug, Clone, PartialEq)]
pub struct OverloadGroupEntry {
    pub name: String,
    /// Candidates in declaration order.
    pub overloads: Vec<FunctionId>,
    /// Fallback group for recursive lookup: the enclosing scope's or the
    /// base class's group of the same name.
    pub parent: Option<GroupId>,
    /// Scope the group is registered in.
    pub scope: ScopeId,
}

impl OverloadGroupEntry {
    pub fn new(name: impl Into<String>, scope: ScopeId) -> Self {
        Self {
            name: name.into(),
            overloads: Vec::new(),
            parent: None,
            scope,
        }
    }

    pub fn len(&self) -> usize {
        self.overloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overloads.is_empty()
    }
}
