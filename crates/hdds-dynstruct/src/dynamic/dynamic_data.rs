// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DynamicData container for runtime data manipulation.

use crate::dynamic::{
    DynamicType, DynamicValue, FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind,
};
use crate::error::{Error, Result};
use std::sync::Arc;

/// A value together with its type descriptor.
///
/// Writes are type checked: a field only accepts a value whose descriptor is
/// equal to the field's declared type.
#[derive(Debug, Clone)]
pub struct DynamicData {
    /// Type descriptor.
    descriptor: Arc<TypeDescriptor>,
    /// Actual value.
    value: DynamicValue,
}

impl DynamicData {
    /// Create a zero-valued instance of `descriptor`.
    pub fn new(descriptor: &Arc<TypeDescriptor>) -> Self {
        Self {
            descriptor: descriptor.clone(),
            value: Self::zero_value(descriptor),
        }
    }

    /// Capture a typed value.
    pub fn from_typed<T: DynamicType>(value: &T) -> Self {
        Self {
            descriptor: T::type_descriptor(),
            value: value.to_dynamic(),
        }
    }

    /// Assemble from parts the caller already knows to agree.
    pub(crate) fn from_parts(descriptor: Arc<TypeDescriptor>, value: DynamicValue) -> Self {
        Self { descriptor, value }
    }

    /// Get the type descriptor.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Get the type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Get the underlying value.
    pub fn value(&self) -> &DynamicValue {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut DynamicValue {
        &mut self.value
    }

    /// Type assertion: the whole value as `T`.
    pub fn to_typed<T: DynamicType>(&self) -> Result<T> {
        let expected = T::type_descriptor();
        if *self.descriptor != *expected {
            return Err(Error::incompatible(&self.descriptor, &expected));
        }
        T::from_dynamic(&self.value).ok_or_else(|| Error::incompatible(&self.descriptor, &expected))
    }

    /// Get a field value by name.
    pub fn get<T: DynamicType>(&self, name: &str) -> Result<T> {
        self.get_field(name)?.to_typed()
    }

    /// Set a field value by name.
    pub fn set<T: DynamicType>(&mut self, name: &str, value: T) -> Result<()> {
        self.set_field(name, DynamicData::from_typed(&value))
    }

    /// Copy of a field, with the field's own descriptor.
    ///
    /// Fields of embedded structs are promoted: when no direct field has
    /// `name`, the shallowest unambiguous match inside embedded structs is
    /// used.
    pub fn get_field(&self, name: &str) -> Result<DynamicData> {
        let (path, field_type) = self.named_slot(name)?;
        let value = self
            .value
            .slot_path(&path)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))?;
        Ok(Self::from_parts(field_type, value.clone()))
    }

    /// Replace a field; `data` must have the field's exact type.
    pub fn set_field(&mut self, name: &str, data: DynamicData) -> Result<()> {
        let (path, field_type) = self.named_slot(name)?;
        if *field_type != *data.descriptor {
            return Err(Error::incompatible(&field_type, &data.descriptor));
        }
        let slot = self
            .value
            .slot_path_mut(&path)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))?;
        *slot = data.value;
        Ok(())
    }

    /// Copy of the embedded field of type `ty`.
    pub fn embedded(&self, ty: &TypeDescriptor) -> Result<DynamicData> {
        let index = self.embedded_slot(ty)?;
        let field_type = self
            .descriptor
            .fields()
            .and_then(|fields| fields.get(index))
            .map(|f| f.type_desc.clone());
        match (field_type, self.value.slot(index)) {
            (Some(field_type), Some(value)) => Ok(Self::from_parts(field_type, value.clone())),
            _ => Err(Error::AnonymousFieldNotFound(ty.to_string())),
        }
    }

    /// Replace the embedded field whose type is `data`'s type.
    pub fn set_embedded(&mut self, data: DynamicData) -> Result<()> {
        let index = self.embedded_slot(&data.descriptor)?;
        let slot = self
            .value
            .slot_mut(index)
            .ok_or_else(|| Error::AnonymousFieldNotFound(data.descriptor.to_string()))?;
        *slot = data.value;
        Ok(())
    }

    /// Iterate over `(field, value)` pairs (for structs).
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &DynamicValue)> {
        let fields = self.descriptor.fields().unwrap_or_default();
        let values = self.value.as_struct().unwrap_or_default();
        fields.iter().zip(values.iter())
    }

    /// Zero value of a type.
    ///
    /// Sequences and maps start empty, arrays hold zeroed elements, optional
    /// and `any` slots start null.
    pub fn zero_value(descriptor: &TypeDescriptor) -> DynamicValue {
        match &descriptor.kind {
            TypeKind::Primitive(p) => Self::default_primitive(*p),
            TypeKind::Struct(fields) => DynamicValue::Struct(
                fields
                    .iter()
                    .map(|f| Self::zero_value(&f.type_desc))
                    .collect(),
            ),
            TypeKind::Sequence(_) => DynamicValue::Sequence(Vec::new()),
            TypeKind::Array(arr) => {
                DynamicValue::Array(vec![Self::zero_value(&arr.element_type); arr.length])
            }
            TypeKind::Map(_) => DynamicValue::Map(Vec::new()),
            TypeKind::Optional(_) | TypeKind::Any => DynamicValue::Null,
        }
    }

    /// Create default value for a primitive.
    fn default_primitive(kind: PrimitiveKind) -> DynamicValue {
        match kind {
            PrimitiveKind::Bool => DynamicValue::Bool(false),
            PrimitiveKind::U8 => DynamicValue::U8(0),
            PrimitiveKind::U16 => DynamicValue::U16(0),
            PrimitiveKind::U32 => DynamicValue::U32(0),
            PrimitiveKind::U64 => DynamicValue::U64(0),
            PrimitiveKind::I8 => DynamicValue::I8(0),
            PrimitiveKind::I16 => DynamicValue::I16(0),
            PrimitiveKind::I32 => DynamicValue::I32(0),
            PrimitiveKind::I64 => DynamicValue::I64(0),
            PrimitiveKind::F32 => DynamicValue::F32(0.0),
            PrimitiveKind::F64 => DynamicValue::F64(0.0),
            PrimitiveKind::Char => DynamicValue::Char('\0'),
            PrimitiveKind::String => DynamicValue::String(String::new()),
        }
    }

    /// Slot path of `name`, searching embedded structs breadth first.
    ///
    /// Two matches at the same depth make the name ambiguous (not found).
    fn named_slot(&self, name: &str) -> Result<(Vec<usize>, Arc<TypeDescriptor>)> {
        let mut level: Vec<(Vec<usize>, &TypeDescriptor)> = vec![(Vec::new(), &*self.descriptor)];

        while !level.is_empty() {
            let mut found = Vec::new();
            let mut next = Vec::new();
            for (path, desc) in level.iter().map(|(p, d)| (p, *d)) {
                let Some(fields) = desc.fields() else {
                    continue;
                };
                for (i, field) in fields.iter().enumerate() {
                    let mut child = path.clone();
                    child.push(i);
                    if field.name == name {
                        found.push((child, field.type_desc.clone()));
                    } else if field.embedded && field.type_desc.is_struct() {
                        next.push((child, &*field.type_desc));
                    }
                }
            }
            match found.len() {
                0 => level = next,
                1 => return Ok(found.remove(0)),
                _ => break,
            }
        }

        Err(Error::FieldNotFound(name.to_string()))
    }

    fn embedded_slot(&self, ty: &TypeDescriptor) -> Result<usize> {
        self.descriptor
            .embedded_index(ty)
            .ok_or_else(|| Error::AnonymousFieldNotFound(ty.to_string()))
    }
}

impl PartialEq for DynamicData {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor && self.value == other.value
    }
}
