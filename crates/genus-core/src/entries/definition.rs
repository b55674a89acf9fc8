//! Class, interface and typeclass bodies.

use rustc_hash::FxHashMap;

use crate::{GroupId, MemberKind, Member, Origin, ScopeId, SignatureId, TypeId};

/// Which kind of definition a type entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Class,
    Interface,
    Typeclass,
}

impl DefinitionKind {
    /// Whether this container kind accepts `member`.
    pub fn accepts(self, member: MemberKind) -> bool {
        match self {
            DefinitionKind::Class | DefinitionKind::Interface => true,
            DefinitionKind::Typeclass => !matches!(member, MemberKind::Nested),
        }
    }
}

/// State shared by all definition kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionBody {
    /// Generic parameters, owned by the definition.
    pub signature: SignatureId,
    /// Member namespace. Its parent is the scope the definition is declared in.
    pub scope: ScopeId,
    /// Members in declaration order.
    pub members: Vec<Member>,
    /// Overloads of the definition's constructors.
    pub constructor_group: GroupId,
    /// Set on definitions produced by construction.
    pub origin: Option<Origin>,
}

impl DefinitionBody {
    pub fn new(signature: SignatureId, scope: ScopeId, constructor_group: GroupId) -> Self {
        Self {
            signature,
            scope,
            members: Vec::new(),
            constructor_group,
            origin: None,
        }
    }

    /// Members of one kind, in declaration order.
    pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = Member> + '_ {
        self.members
            .iter()
            .copied()
            .filter(move |member| member.kind() == kind)
    }
}

/// A class definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub body: DefinitionBody,
    /// Single inheritance.
    pub base: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
}

/// An interface definition.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDef {
    pub body: DefinitionBody,
    pub bases: Vec<TypeId>,
}

/// A typeclass definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeclassDef {
    pub body: DefinitionBody,
    pub bases: Vec<TypeId>,
    /// Implemented type -> implementing class.
    pub implementations: FxHashMap<TypeId, TypeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typeclass_rejects_nested_definitions() {
        assert!(!DefinitionKind::Typeclass.accepts(MemberKind::Nested));
        assert!(DefinitionKind::Typeclass.accepts(MemberKind::Method));
        assert!(DefinitionKind::Class.accepts(MemberKind::Nested));
        assert!(DefinitionKind::Interface.accepts(MemberKind::Constructor));
    }
}
