//! Scope-level declarations and overload groups.
//!
//! Free functions declared under the same name in one scope share an
//! overload group. A new group links to the nearest enclosing scope's group
//! of the same name, which recursive overload resolution falls back to.

use genus_core::{
    EntityRef, FunctionId, GroupId, OverloadGroupEntry, Owner, RegistrationError, ScopeId, TypeId,
};

use crate::DeclRegistry;
use crate::scope_tree::Symbol;

impl DeclRegistry {
    fn require_scope(&self, scope: ScopeId) -> Result<(), RegistrationError> {
        if self.scopes.contains(scope) {
            Ok(())
        } else {
            Err(RegistrationError::unknown(scope))
        }
    }

    /// Create a scope nested in `parent`.
    pub fn create_scope(&mut self, parent: ScopeId) -> Result<ScopeId, RegistrationError> {
        self.require_scope(parent)?;
        Ok(self.scopes.create_scope(parent))
    }

    /// Look a name up in `scope` and its ancestors.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<Symbol> {
        self.scopes.lookup(scope, name).map(|(_, symbol)| symbol)
    }

    /// Declare a type under its name in `scope`.
    ///
    /// Definitions have their member scope moved under `scope`.
    pub fn declare_type(&mut self, scope: ScopeId, ty: TypeId) -> Result<(), RegistrationError> {
        self.require_scope(scope)?;
        let entity = EntityRef::Type(ty);
        self.check_attach(entity)?;
        if let Some(body) = self.type_entry(ty)?.body() {
            if self.scopes.is_within(scope, body.scope) {
                return Err(RegistrationError::CyclicNesting {
                    ty,
                    container: ty,
                });
            }
        }
        let name = self.type_entry(ty)?.name.clone();
        if self.scopes.lookup_local(scope, &name).is_some() {
            return Err(RegistrationError::DuplicateName {
                name,
                owner: Owner::Scope(scope),
            });
        }

        self.attach(entity, Owner::Scope(scope))?;
        self.scopes.insert(scope, &name, Symbol::Type(ty));
        if let Some(body) = self.type_entry(ty)?.body() {
            let member_scope = body.scope;
            self.scopes.set_parent(member_scope, scope);
        }
        Ok(())
    }

    /// Declare a free function in `scope`, adding it to the group of its name.
    pub fn declare_function(&mut self, scope: ScopeId, f: FunctionId) -> Result<GroupId, RegistrationError> {
        self.require_scope(scope)?;
        let entity = EntityRef::Function(f);
        self.check_attach(entity)?;
        let name = self.function(f)?.name.clone();
        let existing = match self.scopes.lookup_local(scope, &name) {
            None => None,
            Some(Symbol::Group(group)) => Some(group),
            Some(_) => {
                return Err(RegistrationError::DuplicateName {
                    name,
                    owner: Owner::Scope(scope),
                });
            }
        };

        self.attach(entity, Owner::Scope(scope))?;
        let group = match existing {
            Some(group) => group,
            None => {
                let mut entry = OverloadGroupEntry::new(name.clone(), scope);
                entry.parent = self
                    .scopes
                    .parent(scope)
                    .and_then(|parent| self.scopes.lookup(parent, &name))
                    .and_then(|(_, symbol)| symbol.as_group());
                let group = self.push_group(entry);
                self.scopes.insert(scope, &name, Symbol::Group(group));
                group
            }
        };
        self.group_mut(group)?.overloads.push(f);
        Ok(group)
    }

    /// Remove a free function from `scope`. The name is freed once its group
    /// is empty.
    pub fn undeclare_function(&mut self, scope: ScopeId, f: FunctionId) -> Result<(), RegistrationError> {
        self.check_owner(EntityRef::Function(f), Owner::Scope(scope))?;
        let name = self.function(f)?.name.clone();
        self.detach(EntityRef::Function(f))?;
        if let Some(group) = self.scopes.lookup_local(scope, &name).and_then(|s| s.as_group()) {
            let overloads = &mut self.group_mut(group)?.overloads;
            overloads.retain(|existing| *existing != f);
            if overloads.is_empty() {
                self.scopes.remove(scope, &name);
            }
        }
        Ok(())
    }

    /// The overload group registered as `name` directly in `scope`.
    pub fn group_in(&self, scope: ScopeId, name: &str) -> Option<GroupId> {
        self.scopes.lookup_local(scope, name)?.as_group()
    }

    /// The method group `name` of a definition.
    pub fn method_group(&self, def: TypeId, name: &str) -> Option<GroupId> {
        let scope = self.definition(def).ok()?.scope;
        self.group_in(scope, name)
    }

    /// Candidates of a group, in declaration order.
    pub fn overloads(&self, group: GroupId) -> Result<&[FunctionId], RegistrationError> {
        Ok(&self.group(group)?.overloads)
    }

    /// Override the fallback group of `group`.
    pub fn set_group_parent(&mut self, group: GroupId, parent: Option<GroupId>) -> Result<(), RegistrationError> {
        if let Some(parent) = parent {
            self.group(parent)?;
        }
        self.group_mut(group)?.parent = parent;
        Ok(())
    }
}
