// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Output destinations for the untyped accessors.

use crate::dynamic::{DynamicData, DynamicType, TypeDescriptor};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Something a field value can be copied into.
pub trait Receiver {
    /// Static type of the destination.
    fn target_type(&self) -> Arc<TypeDescriptor>;

    /// Store `data`; fails with `IncompatibleTypes` unless the types are
    /// identical.
    fn receive(&mut self, data: DynamicData) -> Result<()>;
}

impl<T: DynamicType> Receiver for T {
    fn target_type(&self) -> Arc<TypeDescriptor> {
        T::type_descriptor()
    }

    fn receive(&mut self, data: DynamicData) -> Result<()> {
        *self = data.to_typed()?;
        Ok(())
    }
}

/// A `DynamicData` destination is typed by its current descriptor.
impl Receiver for DynamicData {
    fn target_type(&self) -> Arc<TypeDescriptor> {
        self.descriptor().clone()
    }

    fn receive(&mut self, data: DynamicData) -> Result<()> {
        if **self.descriptor() != **data.descriptor() {
            return Err(Error::incompatible(data.descriptor(), self.descriptor()));
        }
        *self = data;
        Ok(())
    }
}

/// Destination argument of `get_field_value_dyn` and friends.
///
/// Only [`Target::Ref`] can receive a value; the other variants model the
/// misuse cases callers may construct from untyped input.
pub enum Target<'a> {
    /// A value passed by value.
    Value(DynamicData),
    /// A typed destination that is not bound to storage.
    Null(Arc<TypeDescriptor>),
    /// A bound destination.
    Ref(&'a mut dyn Receiver),
}

impl<'a> Target<'a> {
    /// By-value target.
    pub fn value<T: DynamicType>(value: T) -> Self {
        Target::Value(DynamicData::from_typed(&value))
    }

    /// Unbound target of type `T`.
    pub fn null<T: DynamicType>() -> Self {
        Target::Null(T::type_descriptor())
    }

    /// Static type of the destination.
    pub fn target_type(&self) -> Arc<TypeDescriptor> {
        match self {
            Target::Value(data) => data.descriptor().clone(),
            Target::Null(ty) => ty.clone(),
            Target::Ref(r) => r.target_type(),
        }
    }

    /// The receiver, or the contract violation.
    pub(crate) fn bind(self) -> Result<&'a mut dyn Receiver> {
        match self {
            Target::Value(_) => Err(Error::ValueMustBePointer),
            Target::Null(_) => Err(Error::ValueCannotBeNil),
            Target::Ref(r) => Ok(r),
        }
    }
}

impl<'a, T: DynamicType> From<&'a mut T> for Target<'a> {
    fn from(r: &'a mut T) -> Self {
        Target::Ref(r)
    }
}

impl<'a, T: DynamicType> From<Option<&'a mut T>> for Target<'a> {
    fn from(r: Option<&'a mut T>) -> Self {
        match r {
            Some(r) => Target::Ref(r),
            None => Target::null::<T>(),
        }
    }
}

impl<'a> From<&'a mut DynamicData> for Target<'a> {
    fn from(r: &'a mut DynamicData) -> Self {
        Target::Ref(r)
    }
}
