// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static Rust types that map onto the dynamic type model.
//!
//! | Rust type | Type kind |
//! |-----------|-----------|
//! | `bool`, integers, floats, `char`, `String` | `Primitive` |
//! | `Vec<T>` | `Sequence` |
//! | `[T; N]` | `Array` |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | `Map`, keyed by [`MapContainer`](crate::dynamic::MapContainer) |
//! | `Option<T>` | `Optional` |
//! | [`AnyValue`] | `Any` |
//! | structs declared with [`dynamic_struct!`](crate::dynamic_struct) | `Struct` |
//!
//! Channels, closures and trait objects have no counterpart.

use crate::dynamic::{DynamicData, DynamicValue, PrimitiveKind, TypeDescriptor};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;

/// A type with a runtime descriptor.
///
/// Two types are the same dynamic type exactly when their descriptors are
/// equal.
pub trait DynamicType: Sized {
    /// Descriptor of the implementing type.
    fn type_descriptor() -> Arc<TypeDescriptor>;

    /// Convert to a dynamic value.
    fn to_dynamic(&self) -> DynamicValue;

    /// Convert back from a dynamic value; `None` if the shape differs.
    fn from_dynamic(value: &DynamicValue) -> Option<Self>;
}

macro_rules! impl_dynamic_primitive {
    ($ty:ty, $variant:ident) => {
        impl DynamicType for $ty {
            fn type_descriptor() -> Arc<TypeDescriptor> {
                Arc::new(TypeDescriptor::primitive(PrimitiveKind::$variant))
            }

            fn to_dynamic(&self) -> DynamicValue {
                DynamicValue::$variant(*self)
            }

            fn from_dynamic(value: &DynamicValue) -> Option<Self> {
                match value {
                    DynamicValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

impl_dynamic_primitive!(bool, Bool);
impl_dynamic_primitive!(u8, U8);
impl_dynamic_primitive!(u16, U16);
impl_dynamic_primitive!(u32, U32);
impl_dynamic_primitive!(u64, U64);
impl_dynamic_primitive!(i8, I8);
impl_dynamic_primitive!(i16, I16);
impl_dynamic_primitive!(i32, I32);
impl_dynamic_primitive!(i64, I64);
impl_dynamic_primitive!(f32, F32);
impl_dynamic_primitive!(f64, F64);
impl_dynamic_primitive!(char, Char);

impl DynamicType for String {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::primitive(PrimitiveKind::String))
    }

    fn to_dynamic(&self) -> DynamicValue {
        DynamicValue::String(self.clone())
    }

    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl<T: DynamicType> DynamicType for Vec<T> {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::sequence(T::type_descriptor()))
    }

    fn to_dynamic(&self) -> DynamicValue {
        DynamicValue::Sequence(self.iter().map(T::to_dynamic).collect())
    }

    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        match value {
            DynamicValue::Sequence(items) => items.iter().map(T::from_dynamic).collect(),
            _ => None,
        }
    }
}

impl<T: DynamicType, const N: usize> DynamicType for [T; N] {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::array(T::type_descriptor(), N))
    }

    fn to_dynamic(&self) -> DynamicValue {
        DynamicValue::Array(self.iter().map(T::to_dynamic).collect())
    }

    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        match value {
            DynamicValue::Array(items) if items.len() == N => {
                let elems: Vec<T> = items.iter().map(T::from_dynamic).collect::<Option<_>>()?;
                elems.try_into().ok()
            }
            _ => None,
        }
    }
}

impl<T: DynamicType> DynamicType for Option<T> {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::optional(T::type_descriptor()))
    }

    /// A present value is boxed in [`DynamicValue::Some`] when `T` is
    /// nullable itself, so `Some(None)` stays distinct from `None`.
    fn to_dynamic(&self) -> DynamicValue {
        match self {
            Some(v) if T::type_descriptor().is_nullable() => {
                DynamicValue::Some(Box::new(v.to_dynamic()))
            }
            Some(v) => v.to_dynamic(),
            None => DynamicValue::Null,
        }
    }

    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        let nullable = T::type_descriptor().is_nullable();
        match value {
            DynamicValue::Null => Some(None),
            DynamicValue::Some(inner) if nullable => T::from_dynamic(inner).map(Some),
            DynamicValue::Some(_) => None,
            _ if nullable => None,
            other => T::from_dynamic(other).map(Some),
        }
    }
}

impl<K, V> DynamicType for HashMap<K, V>
where
    K: DynamicType + Eq + Hash,
    V: DynamicType,
{
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::map(K::type_descriptor(), V::type_descriptor()))
    }

    fn to_dynamic(&self) -> DynamicValue {
        DynamicValue::Map(
            self.iter()
                .map(|(k, v)| (k.to_dynamic(), v.to_dynamic()))
                .collect(),
        )
    }

    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        value
            .as_map()?
            .iter()
            .map(|(k, v)| Some((K::from_dynamic(k)?, V::from_dynamic(v)?)))
            .collect()
    }
}

impl<K, V> DynamicType for BTreeMap<K, V>
where
    K: DynamicType + Ord,
    V: DynamicType,
{
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::btree_map(K::type_descriptor(), V::type_descriptor()))
    }

    fn to_dynamic(&self) -> DynamicValue {
        DynamicValue::Map(
            self.iter()
                .map(|(k, v)| (k.to_dynamic(), v.to_dynamic()))
                .collect(),
        )
    }

    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        value
            .as_map()?
            .iter()
            .map(|(k, v)| Some((K::from_dynamic(k)?, V::from_dynamic(v)?)))
            .collect()
    }
}

/// A value of any dynamic type, or nothing.
///
/// Fields declared with an `AnyValue` sample have the `any` kind: they hold a
/// value of whatever type was last stored, together with its descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnyValue(Option<Box<DynamicData>>);

impl AnyValue {
    /// The empty value.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap a typed value.
    pub fn new<T: DynamicType>(value: T) -> Self {
        Self(Some(Box::new(DynamicData::from_typed(&value))))
    }

    /// Wrap dynamic data.
    pub fn from_data(data: DynamicData) -> Self {
        Self(Some(Box::new(data)))
    }

    /// True when nothing is stored.
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Stored data.
    pub fn data(&self) -> Option<&DynamicData> {
        self.0.as_deref()
    }

    /// Stored value as `T`, if it has exactly that type.
    pub fn downcast<T: DynamicType>(&self) -> Option<T> {
        self.0.as_ref()?.to_typed().ok()
    }
}

impl DynamicType for AnyValue {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::any())
    }

    fn to_dynamic(&self) -> DynamicValue {
        match &self.0 {
            Some(data) => DynamicValue::Dynamic(data.clone()),
            None => DynamicValue::Null,
        }
    }

    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        match value {
            DynamicValue::Null => Some(Self::none()),
            DynamicValue::Dynamic(data) => Some(Self(Some(data.clone()))),
            _ => None,
        }
    }
}
