//! Validating parameter-list operations.
//!
//! Every insert checks, in order, that the parameter exists, that it is
//! unowned and that its name is free in the signature, and only then attaches
//! it and pushes it. A failed insert therefore leaves both the signature and
//! the parameter untouched.

use genus_core::{
    EntityRef, Owner, ParamEntry, ParamId, ParamSlot, RegistrationError, SignatureId, TypeId,
    TypeRef,
};

use crate::DeclRegistry;

impl DeclRegistry {
    /// All parameters of `sig` in declaration order.
    pub fn parameters(&self, sig: SignatureId) -> Result<Vec<ParamId>, RegistrationError> {
        Ok(self.signature(sig)?.parameters().collect())
    }

    /// Find a parameter of `sig` by name.
    pub fn find_parameter(&self, sig: SignatureId, name: &str) -> Option<ParamId> {
        let signature = self.get_signature(sig)?;
        signature
            .parameters()
            .find(|param| self.get_param(*param).is_some_and(|entry| entry.name == name))
    }

    /// The slot and index of `param` within its owning signature.
    pub fn param_index(&self, param: ParamId) -> Result<(ParamSlot, usize), RegistrationError> {
        let entity = EntityRef::Param(param);
        let owner = self
            .param(param)?
            .owner
            .get()
            .ok_or(RegistrationError::NotOwned { entity })?;
        let sig = match owner {
            Owner::Signature(sig) => sig,
            _ => return Err(RegistrationError::NotOwned { entity }),
        };
        self.signature(sig)?
            .locate(param)
            .ok_or(RegistrationError::NotMember {
                entity,
                container: owner,
                owner: Some(owner),
            })
    }

    /// Validate that `param` may join `sig`, optionally replacing `replacing`.
    fn check_param_insert(
        &self,
        sig: SignatureId,
        param: ParamId,
        replacing: Option<ParamId>,
    ) -> Result<(), RegistrationError> {
        self.signature(sig)?;
        self.check_attach(EntityRef::Param(param))?;
        self.check_param_name(sig, &self.param(param)?.name, replacing)
    }

    /// Validate that `name` is free in `sig`, ignoring `replacing`.
    fn check_param_name(
        &self,
        sig: SignatureId,
        name: &str,
        replacing: Option<ParamId>,
    ) -> Result<(), RegistrationError> {
        for existing in self.signature(sig)?.parameters() {
            if Some(existing) == replacing {
                continue;
            }
            if self.param(existing)?.name == name {
                return Err(RegistrationError::DuplicateName {
                    name: name.to_string(),
                    owner: Owner::Signature(sig),
                });
            }
        }
        Ok(())
    }

    /// Append a positional parameter.
    pub fn append_positional(&mut self, sig: SignatureId, param: ParamId) -> Result<(), RegistrationError> {
        let index = self.signature(sig)?.positional.len();
        self.insert_positional(sig, index, param)
    }

    /// Insert a positional parameter at `index` (clamped to the end).
    pub fn insert_positional(
        &mut self,
        sig: SignatureId,
        index: usize,
        param: ParamId,
    ) -> Result<(), RegistrationError> {
        self.check_param_insert(sig, param, None)?;
        self.attach(EntityRef::Param(param), Owner::Signature(sig))?;
        let positional = &mut self.signature_mut(sig)?.positional;
        let index = index.min(positional.len());
        positional.insert(index, param);
        Ok(())
    }

    /// Append a named parameter.
    pub fn append_named(&mut self, sig: SignatureId, param: ParamId) -> Result<(), RegistrationError> {
        self.check_param_insert(sig, param, None)?;
        self.attach(EntityRef::Param(param), Owner::Signature(sig))?;
        self.signature_mut(sig)?.named.push(param);
        Ok(())
    }

    /// Replace the variadic-positional slot, returning the old occupant.
    ///
    /// The new parameter is validated before the old one is detached; the
    /// old one may share its name.
    pub fn set_variadic_positional(
        &mut self,
        sig: SignatureId,
        param: Option<ParamId>,
    ) -> Result<Option<ParamId>, RegistrationError> {
        self.replace_variadic(sig, param, ParamSlot::VariadicPositional)
    }

    /// Replace the variadic-named slot, returning the old occupant.
    pub fn set_variadic_named(
        &mut self,
        sig: SignatureId,
        param: Option<ParamId>,
    ) -> Result<Option<ParamId>, RegistrationError> {
        self.replace_variadic(sig, param, ParamSlot::VariadicNamed)
    }

    fn replace_variadic(
        &mut self,
        sig: SignatureId,
        param: Option<ParamId>,
        slot: ParamSlot,
    ) -> Result<Option<ParamId>, RegistrationError> {
        let signature = self.signature(sig)?;
        let old = match slot {
            ParamSlot::VariadicPositional => signature.variadic_positional,
            _ => signature.variadic_named,
        };
        if let Some(new) = param {
            self.check_param_insert(sig, new, old)?;
        }

        // Clear, then set: the slot is never occupied twice.
        if let Some(old) = old {
            self.detach(EntityRef::Param(old))?;
            self.set_variadic_slot(sig, slot, None)?;
        }
        if let Some(new) = param {
            self.attach(EntityRef::Param(new), Owner::Signature(sig))?;
            self.set_variadic_slot(sig, slot, Some(new))?;
        }
        Ok(old)
    }

    fn set_variadic_slot(
        &mut self,
        sig: SignatureId,
        slot: ParamSlot,
        value: Option<ParamId>,
    ) -> Result<(), RegistrationError> {
        let signature = self.signature_mut(sig)?;
        match slot {
            ParamSlot::VariadicPositional => signature.variadic_positional = value,
            _ => signature.variadic_named = value,
        }
        Ok(())
    }

    /// Remove `param` from `sig` and clear its owner.
    ///
    /// The parameter entry itself is kept and may be appended elsewhere.
    pub fn remove_parameter(&mut self, sig: SignatureId, param: ParamId) -> Result<(), RegistrationError> {
        self.check_owner(EntityRef::Param(param), Owner::Signature(sig))?;
        let (slot, index) =
            self.signature(sig)?
                .locate(param)
                .ok_or(RegistrationError::NotMember {
                    entity: EntityRef::Param(param),
                    container: Owner::Signature(sig),
                    owner: Some(Owner::Signature(sig)),
                })?;

        self.detach(EntityRef::Param(param))?;
        let signature = self.signature_mut(sig)?;
        match slot {
            ParamSlot::Positional => {
                signature.positional.remove(index);
            }
            ParamSlot::Named => {
                signature.named.remove(index);
            }
            ParamSlot::VariadicPositional => signature.variadic_positional = None,
            ParamSlot::VariadicNamed => signature.variadic_named = None,
        }
        Ok(())
    }

    /// Create a parameter and append it positionally.
    pub fn add_positional_param(
        &mut self,
        sig: SignatureId,
        entry: ParamEntry,
    ) -> Result<ParamId, RegistrationError> {
        self.check_param_name(sig, &entry.name, None)?;
        let param = self.add_param(entry);
        self.append_positional(sig, param)?;
        Ok(param)
    }

    /// Create a parameter and append it as a named parameter.
    pub fn add_named_param(&mut self, sig: SignatureId, entry: ParamEntry) -> Result<ParamId, RegistrationError> {
        self.check_param_name(sig, &entry.name, None)?;
        let param = self.add_param(entry);
        self.append_named(sig, param)?;
        Ok(param)
    }

    /// Add a generic parameter to a definition's signature.
    pub fn add_generic_param(
        &mut self,
        definition: TypeId,
        name: impl Into<String>,
        ty: impl Into<TypeRef>,
    ) -> Result<ParamId, RegistrationError> {
        let sig = self.definition(definition)?.signature;
        self.add_positional_param(sig, ParamEntry::generic(name, ty))
    }

    /// Check if any parameter of `sig` is still a free variable.
    pub fn is_generic_signature(&self, sig: SignatureId) -> bool {
        self.get_signature(sig).is_some_and(|signature| {
            signature
                .parameters()
                .any(|param| self.get_param(param).is_some_and(ParamEntry::is_open))
        })
    }
}
