// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value types.

use crate::dynamic::DynamicData;

/// A dynamic value of any describable type.
///
/// Struct values are positional; the owning [`TypeDescriptor`] supplies the
/// field names.
///
/// [`TypeDescriptor`]: crate::dynamic::TypeDescriptor
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    // Primitives
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),

    // Composites
    Struct(Vec<DynamicValue>),
    Sequence(Vec<DynamicValue>),
    Array(Vec<DynamicValue>),
    Map(Vec<(DynamicValue, DynamicValue)>),
    /// Content of an `any` slot, with its own descriptor.
    Dynamic(Box<DynamicData>),
    /// Present value of an optional whose inner type is itself nullable
    /// (`Option<Option<T>>`, `Option<AnyValue>`).
    Some(Box<DynamicValue>),

    // Special
    /// Absent optional, empty `any`.
    Null,
}

impl DynamicValue {
    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as u32.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as sequence.
    pub fn as_sequence(&self) -> Option<&[DynamicValue]> {
        match self {
            Self::Sequence(v) | Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get struct slots.
    pub fn as_struct(&self) -> Option<&[DynamicValue]> {
        match self {
            Self::Struct(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get map entries.
    pub fn as_map(&self) -> Option<&[(DynamicValue, DynamicValue)]> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get the content of an `any` slot.
    pub fn as_dynamic(&self) -> Option<&DynamicData> {
        match self {
            Self::Dynamic(v) => Some(v),
            _ => None,
        }
    }

    /// Struct slot by position.
    pub fn slot(&self, index: usize) -> Option<&DynamicValue> {
        self.as_struct()?.get(index)
    }

    /// Mutable struct slot by position.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut DynamicValue> {
        match self {
            Self::Struct(v) => v.get_mut(index),
            _ => None,
        }
    }

    /// Nested struct slot, one index per level.
    pub fn slot_path(&self, path: &[usize]) -> Option<&DynamicValue> {
        path.iter().try_fold(self, |v, &i| v.slot(i))
    }

    /// Mutable nested struct slot.
    pub fn slot_path_mut(&mut self, path: &[usize]) -> Option<&mut DynamicValue> {
        path.iter().try_fold(self, |v, &i| v.slot_mut(i))
    }

    /// Map lookup.
    pub fn map_get(&self, key: &DynamicValue) -> Option<&DynamicValue> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Zero check used by `omitempty`.
    ///
    /// Structs, non-empty `any` slots and present nested optionals are never
    /// empty.
    pub fn is_empty_value(&self) -> bool {
        match self {
            Self::Bool(v) => !v,
            Self::U8(v) => *v == 0,
            Self::U16(v) => *v == 0,
            Self::U32(v) => *v == 0,
            Self::U64(v) => *v == 0,
            Self::I8(v) => *v == 0,
            Self::I16(v) => *v == 0,
            Self::I32(v) => *v == 0,
            Self::I64(v) => *v == 0,
            Self::F32(v) => *v == 0.0,
            Self::F64(v) => *v == 0.0,
            Self::Char(v) => *v == '\0',
            Self::String(v) => v.is_empty(),
            Self::Sequence(v) | Self::Array(v) => v.is_empty(),
            Self::Map(v) => v.is_empty(),
            Self::Null => true,
            Self::Struct(_) | Self::Dynamic(_) | Self::Some(_) => false,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Struct(_) => "struct",
            Self::Sequence(_) => "sequence",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Dynamic(_) => "dynamic",
            Self::Some(_) => "some",
            Self::Null => "null",
        }
    }
}

macro_rules! impl_from_primitive {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for DynamicValue {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_from_primitive!(bool, Bool);
impl_from_primitive!(u8, U8);
impl_from_primitive!(u16, U16);
impl_from_primitive!(u32, U32);
impl_from_primitive!(u64, U64);
impl_from_primitive!(i8, I8);
impl_from_primitive!(i16, I16);
impl_from_primitive!(i32, I32);
impl_from_primitive!(i64, I64);
impl_from_primitive!(f32, F32);
impl_from_primitive!(f64, F64);
impl_from_primitive!(char, Char);
impl_from_primitive!(String, String);

impl From<&str> for DynamicValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<DynamicValue>> From<Vec<T>> for DynamicValue {
    fn from(v: Vec<T>) -> Self {
        Self::Sequence(v.into_iter().map(Into::into).collect())
    }
}
