// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declaration-phase field registry.

use crate::dynamic::{FieldDescriptor, TypeDescriptor};
use crate::error::{Error, Result};
use crate::tag::StructTag;
use std::collections::HashMap;
use std::sync::Arc;

/// A declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name; derived from the type for anonymous fields.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
    /// Validated tag.
    pub tag: StructTag,
    /// Embedded field.
    pub anonymous: bool,
}

impl FieldSpec {
    pub(crate) fn named(name: &str, type_desc: Arc<TypeDescriptor>, tag: StructTag) -> Self {
        Self {
            name: name.to_string(),
            type_desc,
            tag,
            anonymous: false,
        }
    }

    pub(crate) fn anonymous(type_desc: Arc<TypeDescriptor>, tag: StructTag) -> Self {
        Self {
            name: type_desc.display_name(),
            type_desc,
            tag,
            anonymous: true,
        }
    }

    fn to_descriptor(&self) -> FieldDescriptor {
        let field = FieldDescriptor::new(self.name.clone(), self.type_desc.clone())
            .with_tag(self.tag.clone());
        if self.anonymous {
            field.embedded()
        } else {
            field
        }
    }
}

/// Named fields keyed by name, anonymous fields in declaration order.
///
/// Named fields carry a sequence number so the synthesized type lists them
/// in the order they were (last) declared.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    named: HashMap<String, (u64, FieldSpec)>,
    next_seq: u64,
    anonymous: Vec<FieldSpec>,
}

impl Registry {
    /// Declare a named field.
    ///
    /// Names are unique across named fields and the derived names of
    /// anonymous fields.
    pub fn add_named(&mut self, spec: FieldSpec) -> Result<()> {
        self.check_named(&spec.name)?;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.named.insert(spec.name.clone(), (seq, spec));
        Ok(())
    }

    /// Forget a named field. Returns whether it existed.
    pub fn remove_named(&mut self, name: &str) -> bool {
        self.named.remove(name).is_some()
    }

    /// Declare an anonymous field.
    pub fn add_anonymous(&mut self, spec: FieldSpec) -> Result<()> {
        self.check_anonymous(&spec.type_desc)?;
        self.anonymous.push(spec);
        Ok(())
    }

    /// Fails with `FieldAlreadyExists` if `name` is taken.
    pub fn check_named(&self, name: &str) -> Result<()> {
        if self.named.contains_key(name) || self.anonymous_by_name(name) {
            return Err(Error::FieldAlreadyExists(name.to_string()));
        }
        Ok(())
    }

    /// Fails if an anonymous field of type `ty` exists, or if its derived
    /// name is taken.
    pub fn check_anonymous(&self, ty: &TypeDescriptor) -> Result<()> {
        if self.anonymous.iter().any(|f| *f.type_desc == *ty) {
            return Err(Error::AnonymousFieldAlreadyExists(ty.to_string()));
        }
        self.check_named(&ty.display_name())
    }

    pub fn clear_anonymous(&mut self) {
        self.anonymous.clear();
    }

    pub fn clear(&mut self) {
        self.named.clear();
        self.anonymous.clear();
    }

    /// Named fields in declaration order.
    pub fn named_fields(&self) -> Vec<&FieldSpec> {
        let mut fields: Vec<_> = self.named.values().collect();
        fields.sort_by_key(|(seq, _)| *seq);
        fields.into_iter().map(|(_, spec)| spec).collect()
    }

    pub fn anonymous_fields(&self) -> &[FieldSpec] {
        &self.anonymous
    }

    /// Synthesize the record type: anonymous fields first, then named ones.
    pub fn synthesize(&self, type_name: &str) -> TypeDescriptor {
        let fields = self
            .anonymous
            .iter()
            .chain(self.named_fields())
            .map(FieldSpec::to_descriptor)
            .collect();
        TypeDescriptor::struct_type(type_name, fields)
    }

    fn anonymous_by_name(&self, name: &str) -> bool {
        self.anonymous.iter().any(|f| f.name == name)
    }
}
