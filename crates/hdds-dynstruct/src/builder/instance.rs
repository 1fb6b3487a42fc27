// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared handle to a built instance.

use crate::dynamic::{DynamicData, DynamicType, TypeDescriptor};
use crate::error::Result;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Handle to the live instance of a synthesized type.
///
/// Clones share storage with each other and with the [`Builder`] that
/// produced them: a write through any handle is seen by later builder reads.
/// After [`Builder::reset`] the builder forgets the instance but existing
/// handles keep it alive.
///
/// [`Builder`]: crate::Builder
/// [`Builder::reset`]: crate::Builder::reset
#[derive(Clone)]
pub struct Instance {
    descriptor: Arc<TypeDescriptor>,
    data: Arc<Mutex<DynamicData>>,
}

impl Instance {
    pub(crate) fn new(data: DynamicData) -> Self {
        Self {
            descriptor: data.descriptor().clone(),
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// The synthesized type.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Copy of the current value.
    pub fn snapshot(&self) -> DynamicData {
        self.data.lock().clone()
    }

    /// Read a field as `T`.
    pub fn get<T: DynamicType>(&self, name: &str) -> Result<T> {
        self.data.lock().get(name)
    }

    /// Write a field from `T`.
    pub fn set<T: DynamicType>(&self, name: &str, value: T) -> Result<()> {
        self.data.lock().set(name, value)
    }

    /// Copy of a field.
    pub fn get_field(&self, name: &str) -> Result<DynamicData> {
        self.data.lock().get_field(name)
    }

    /// Replace a field with type-checked dynamic data.
    pub fn set_field(&self, name: &str, data: DynamicData) -> Result<()> {
        self.data.lock().set_field(name, data)
    }

    /// True when both handles share storage.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&DynamicData) -> R) -> R {
        f(&self.data.lock())
    }

    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(&mut DynamicData) -> R) -> R {
        f(&mut self.data.lock())
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.descriptor.to_string())
            .field("value", self.data.lock().value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::FieldDescriptor;

    fn instance() -> Instance {
        let desc = Arc::new(TypeDescriptor::struct_type(
            "",
            vec![FieldDescriptor::new("Count", u64::type_descriptor())],
        ));
        Instance::new(DynamicData::new(&desc))
    }

    #[test]
    fn test_clones_share_storage() {
        let a = instance();
        let b = a.clone();
        a.set("Count", 5u64).expect("set");
        assert_eq!(b.get::<u64>("Count").expect("get"), 5);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&instance()));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let a = instance();
        let snap = a.snapshot();
        a.set("Count", 1u64).expect("set");
        assert_eq!(snap.get::<u64>("Count").expect("get"), 0);
        assert_eq!(a.descriptor().to_string(), "struct { Count: u64 }");
    }
}
