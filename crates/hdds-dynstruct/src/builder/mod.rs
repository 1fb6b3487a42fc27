// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime record builder.
//!
//! A [`Builder`] collects field declarations while *open*, synthesizes a
//! record type and one zero-valued instance on [`Builder::build`], and then
//! serves type-checked reads and writes until [`Builder::reset`].
//!
//! ```text
//!            add_field / remove_field / add_anonymous_field
//!                         +--------+
//!                         v        |
//!   Builder::new() --> [ Open ] ---+
//!                         |   ^
//!                  build  |   |  reset
//!                         v   |
//!                      [ Built ] --> get_field / get_field_value / set_field
//! ```
//!
//! Every method takes one lock for its whole duration, so a `Builder` can be
//! shared between threads behind an `Arc`.

mod instance;
mod registry;
mod target;

pub use instance::Instance;
pub use registry::FieldSpec;
pub use target::{Receiver, Target};

use crate::config::{BuilderConfig, ResetPolicy};
use crate::dynamic::{DynamicData, DynamicType, TypeDescriptor};
use crate::error::{Error, Result};
use crate::tag::StructTag;
use parking_lot::Mutex;
use registry::Registry;
use std::fmt;
use std::sync::Arc;

/// Builder lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Accepting declarations.
    Open,
    /// Holding a built instance.
    Built,
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderState::Open => f.write_str("open"),
            BuilderState::Built => f.write_str("built"),
        }
    }
}

struct Inner {
    config: BuilderConfig,
    registry: Registry,
    instance: Option<Instance>,
}

impl Inner {
    fn ensure_open(&self, op: &str) -> Result<()> {
        if self.instance.is_some() {
            log::debug!("[dynstruct] {} rejected: instance already built", op);
            return Err(Error::InstanceAlreadyBuilt);
        }
        Ok(())
    }

    fn built(&self) -> Result<&Instance> {
        self.instance.as_ref().ok_or(Error::InstanceNotBuilt)
    }
}

/// Runtime record type builder.
///
/// # Example
///
/// ```
/// use hdds_dynstruct::Builder;
///
/// let builder = Builder::new();
/// builder.add_field("Name", String::new(), &[r#"json:"name""#]).unwrap();
/// builder.add_field("Age", 0i64, &[r#"json:"age,omitempty""#]).unwrap();
///
/// let instance = builder.build().unwrap();
/// instance.set("Name", "Ada".to_string()).unwrap();
///
/// let mut name = String::new();
/// builder.get_field_value("Name", &mut name).unwrap();
/// assert_eq!(name, "Ada");
///
/// let mut wrong = 0i64;
/// assert!(builder.get_field_value("Name", &mut wrong).is_err());
/// ```
pub struct Builder {
    inner: Mutex<Inner>,
}

impl Builder {
    /// Create an open builder with the default configuration.
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// Create an open builder.
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                config,
                registry: Registry::default(),
                instance: None,
            }),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> BuilderConfig {
        self.inner.lock().config.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BuilderState {
        if self.inner.lock().instance.is_some() {
            BuilderState::Built
        } else {
            BuilderState::Open
        }
    }

    /// True between `build` and `reset`.
    pub fn is_built(&self) -> bool {
        self.state() == BuilderState::Built
    }

    // ------------------------------------------------------------------
    // Declaration
    // ------------------------------------------------------------------

    /// Declare a field with the type of `sample`.
    ///
    /// Only the type of `sample` is kept: the built field starts at the zero
    /// value. `tags` are joined with a space and must form a valid struct tag.
    ///
    /// # Errors
    ///
    /// `InstanceAlreadyBuilt`, `FieldAlreadyExists`, `InvalidTag`, checked
    /// in that order.
    pub fn add_field<T: DynamicType>(&self, name: &str, _sample: T, tags: &[&str]) -> Result<()> {
        self.add_field_with_type(name, T::type_descriptor(), tags)
    }

    /// Declare a field from a type descriptor.
    ///
    /// Accepts descriptors of previously built records, which nests them.
    pub fn add_field_with_type(
        &self,
        name: &str,
        type_desc: Arc<TypeDescriptor>,
        tags: &[&str],
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.ensure_open("add_field")?;
        inner.registry.check_named(name).map_err(rejected("add_field"))?;
        let tag = parse_tags(tags)?;
        log::trace!("[dynstruct] add_field {}: {} `{}`", name, type_desc, tag);
        inner
            .registry
            .add_named(FieldSpec::named(name, type_desc, tag))
            .map_err(rejected("add_field"))
    }

    /// Forget a named field. Unknown names are ignored.
    ///
    /// # Errors
    ///
    /// `InstanceAlreadyBuilt`.
    pub fn remove_field(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.ensure_open("remove_field")?;
        if inner.registry.remove_named(name) {
            log::trace!("[dynstruct] remove_field {}", name);
        }
        Ok(())
    }

    /// Declare an embedded field with the type of `sample`.
    ///
    /// The field is named after its type (see
    /// [`TypeDescriptor::display_name`]) and is looked up by type.
    ///
    /// # Errors
    ///
    /// `InstanceAlreadyBuilt`, `AnonymousFieldAlreadyExists`, `InvalidTag`,
    /// and `FieldAlreadyExists` when the derived name is already taken.
    pub fn add_anonymous_field<T: DynamicType>(&self, _sample: T, tags: &[&str]) -> Result<()> {
        self.add_anonymous_field_with_type(T::type_descriptor(), tags)
    }

    /// Declare an embedded field from a type descriptor.
    pub fn add_anonymous_field_with_type(
        &self,
        type_desc: Arc<TypeDescriptor>,
        tags: &[&str],
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.ensure_open("add_anonymous_field")?;
        inner
            .registry
            .check_anonymous(&type_desc)
            .map_err(rejected("add_anonymous_field"))?;
        let tag = parse_tags(tags)?;
        log::trace!("[dynstruct] add_anonymous_field {} `{}`", type_desc, tag);
        inner
            .registry
            .add_anonymous(FieldSpec::anonymous(type_desc, tag))
            .map_err(rejected("add_anonymous_field"))
    }

    /// Named field names, in declaration order.
    pub fn field_names(&self) -> Vec<String> {
        self.inner
            .lock()
            .registry
            .named_fields()
            .into_iter()
            .map(|f| f.name.clone())
            .collect()
    }

    /// Derived names of the anonymous fields, in declaration order.
    pub fn anonymous_field_names(&self) -> Vec<String> {
        self.inner
            .lock()
            .registry
            .anonymous_fields()
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }

    /// Declared fields as they will be laid out: anonymous first.
    pub fn fields(&self) -> Vec<FieldSpec> {
        let inner = self.inner.lock();
        inner
            .registry
            .anonymous_fields()
            .iter()
            .chain(inner.registry.named_fields())
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Synthesize the record type and its zero-valued instance.
    ///
    /// # Errors
    ///
    /// `InstanceAlreadyBuilt` if called again before [`reset`](Self::reset);
    /// the existing instance is kept.
    pub fn build(&self) -> Result<Instance> {
        let mut inner = self.inner.lock();
        inner.ensure_open("build")?;

        let descriptor = Arc::new(inner.registry.synthesize(&inner.config.type_name));
        let instance = Instance::new(DynamicData::new(&descriptor));
        log::debug!(
            "[dynstruct] built {} ({} fields)",
            descriptor,
            descriptor.fields().map_or(0, <[_]>::len)
        );
        inner.instance = Some(instance.clone());
        Ok(instance)
    }

    /// Drop the instance and reopen the builder.
    ///
    /// Anonymous fields are always discarded. Named fields survive under
    /// [`ResetPolicy::KeepNamedFields`] and are discarded under
    /// [`ResetPolicy::ClearAll`].
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.instance = None;
        let policy = inner.config.reset_policy;
        match policy {
            ResetPolicy::KeepNamedFields => inner.registry.clear_anonymous(),
            ResetPolicy::ClearAll => inner.registry.clear(),
        }
        log::debug!("[dynstruct] reset ({})", policy);
    }

    /// Handle to the live instance.
    ///
    /// # Errors
    ///
    /// `InstanceNotBuilt`.
    pub fn instance(&self) -> Result<Instance> {
        self.inner.lock().built().cloned()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Copy of a field, with its type.
    ///
    /// Anonymous fields answer to their derived name; fields of embedded
    /// records are promoted.
    ///
    /// # Errors
    ///
    /// `InstanceNotBuilt`, `FieldNotFound`.
    pub fn get_field(&self, name: &str) -> Result<DynamicData> {
        let inner = self.inner.lock();
        inner.built()?.get_field(name)
    }

    /// Copy a field into `out`.
    ///
    /// # Errors
    ///
    /// `InstanceNotBuilt`, `FieldNotFound`, and `IncompatibleTypes` unless the
    /// field type is exactly `T`.
    pub fn get_field_value<T: DynamicType>(&self, name: &str, out: &mut T) -> Result<()> {
        self.get_field_value_dyn(name, Target::Ref(out))
    }

    /// Copy a field into an untyped destination.
    ///
    /// Checks run in order: built, destination is a reference, destination
    /// is bound, field exists, types match.
    pub fn get_field_value_dyn<'a>(&self, name: &str, out: impl Into<Target<'a>>) -> Result<()> {
        let inner = self.inner.lock();
        let instance = inner.built()?;
        let receiver = out.into().bind()?;
        let field = instance.get_field(name)?;
        receiver.receive(field)
    }

    /// Copy of the anonymous field of type `T`.
    ///
    /// # Errors
    ///
    /// `InstanceNotBuilt`, `AnonymousFieldNotFound`.
    pub fn get_anonymous_field<T: DynamicType>(&self) -> Result<DynamicData> {
        self.get_anonymous_field_dyn(&T::type_descriptor())
    }

    /// Copy of the anonymous field whose type is `ty`.
    pub fn get_anonymous_field_dyn(&self, ty: &TypeDescriptor) -> Result<DynamicData> {
        let inner = self.inner.lock();
        inner.built()?.with(|data| data.embedded(ty))
    }

    /// Copy the anonymous field of type `T` into `out`.
    pub fn get_anonymous_field_value<T: DynamicType>(&self, out: &mut T) -> Result<()> {
        self.get_anonymous_field_value_dyn(&T::type_descriptor(), Target::Ref(out))
    }

    /// Copy the anonymous field whose type is `ty` into an untyped
    /// destination.
    ///
    /// Same checks as [`get_field_value_dyn`](Self::get_field_value_dyn),
    /// with `AnonymousFieldNotFound` for a missing type.
    pub fn get_anonymous_field_value_dyn<'a>(
        &self,
        ty: &TypeDescriptor,
        out: impl Into<Target<'a>>,
    ) -> Result<()> {
        let inner = self.inner.lock();
        let instance = inner.built()?;
        let receiver = out.into().bind()?;
        let field = instance.with(|data| data.embedded(ty))?;
        receiver.receive(field)
    }

    /// Write a field from `T`.
    ///
    /// # Errors
    ///
    /// `InstanceNotBuilt`, `FieldNotFound`, `IncompatibleTypes`.
    pub fn set_field<T: DynamicType>(&self, name: &str, value: T) -> Result<()> {
        self.set_field_dyn(name, DynamicData::from_typed(&value))
    }

    /// Write a field from dynamic data of the field's exact type.
    pub fn set_field_dyn(&self, name: &str, data: DynamicData) -> Result<()> {
        let inner = self.inner.lock();
        inner.built()?.set_field(name, data)
    }

    /// Write the anonymous field of type `T`.
    ///
    /// # Errors
    ///
    /// `InstanceNotBuilt`, `AnonymousFieldNotFound`.
    pub fn set_anonymous_field<T: DynamicType>(&self, value: T) -> Result<()> {
        self.set_anonymous_field_dyn(DynamicData::from_typed(&value))
    }

    /// Write the anonymous field whose type is `data`'s type.
    pub fn set_anonymous_field_dyn(&self, data: DynamicData) -> Result<()> {
        let inner = self.inner.lock();
        inner.built()?.with_mut(|d| d.set_embedded(data))
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Builder")
            .field("config", &inner.config)
            .field("registry", &inner.registry)
            .field("instance", &inner.instance)
            .finish()
    }
}

fn rejected(op: &'static str) -> impl Fn(Error) -> Error {
    move |e| {
        log::debug!("[dynstruct] {} rejected: {}", op, e);
        e
    }
}

fn parse_tags(tags: &[&str]) -> Result<StructTag> {
    StructTag::join(tags).map_err(|e| {
        log::debug!("[dynstruct] invalid tag {:?}: {}", tags, e);
        Error::InvalidTag(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_state_transitions() {
        let builder = Builder::new();
        assert_eq!(builder.state(), BuilderState::Open);

        builder.build().expect("build");
        assert_eq!(builder.state(), BuilderState::Built);
        assert_eq!(
            builder.build().expect_err("second build").kind(),
            ErrorKind::InstanceAlreadyBuilt
        );

        builder.reset();
        assert!(!builder.is_built());
        builder.build().expect("rebuild");
    }

    #[test]
    fn test_mutations_rejected_after_build() {
        let builder = Builder::new();
        builder.add_field("A", 0u8, &[]).expect("add");
        builder.build().expect("build");

        assert_eq!(builder.add_field("B", 0u8, &[]), Err(Error::InstanceAlreadyBuilt));
        assert_eq!(builder.remove_field("A"), Err(Error::InstanceAlreadyBuilt));
        assert_eq!(
            builder.add_anonymous_field(0u8, &[]),
            Err(Error::InstanceAlreadyBuilt)
        );
        assert_eq!(builder.field_names(), vec!["A".to_string()]);
    }

    #[test]
    fn test_accessors_require_build() {
        let builder = Builder::new();
        builder.add_field("A", 0u8, &[]).expect("add");
        let mut out = 0u8;

        assert_eq!(builder.get_field("A"), Err(Error::InstanceNotBuilt));
        assert_eq!(builder.get_field_value("A", &mut out), Err(Error::InstanceNotBuilt));
        assert_eq!(
            builder.get_anonymous_field::<u8>(),
            Err(Error::InstanceNotBuilt)
        );
        assert_eq!(
            builder.get_anonymous_field_value(&mut out),
            Err(Error::InstanceNotBuilt)
        );
        assert_eq!(builder.set_field("A", 1u8), Err(Error::InstanceNotBuilt));
        assert!(builder.instance().is_err());
    }

    #[test]
    fn test_invalid_tag_leaves_registry_unchanged() {
        let builder = Builder::new();
        let err = builder
            .add_field("A", 0u8, &[r#"json:"a""#, r#"json:"b""#])
            .expect_err("duplicate key");
        assert_eq!(err.kind(), ErrorKind::InvalidTag);

        let err = builder
            .add_anonymous_field(String::new(), &[r#"json:"a"xml:"b""#])
            .expect_err("missing separator");
        assert_eq!(err.kind(), ErrorKind::InvalidTag);

        assert!(builder.fields().is_empty());
    }

    #[test]
    fn test_duplicate_reported_before_invalid_tag() {
        let builder = Builder::new();
        builder.add_field("Name", String::new(), &[]).expect("add");
        builder.add_anonymous_field(0i64, &[]).expect("anonymous");
        let bad = [r#"json:"a" bad"#];

        assert_eq!(
            builder.add_field("Name", String::new(), &bad),
            Err(Error::FieldAlreadyExists("Name".into()))
        );
        assert_eq!(
            builder.add_anonymous_field(0i64, &bad),
            Err(Error::AnonymousFieldAlreadyExists("i64".into()))
        );
        // fresh declarations still see the tag error
        assert_eq!(
            builder.add_field("Other", 0u8, &bad).map_err(|e| e.kind()),
            Err(ErrorKind::InvalidTag)
        );
        assert_eq!(builder.fields().len(), 2);
    }

    #[test]
    fn test_dyn_precondition_order() {
        let builder = Builder::new();
        builder.add_field("Name", String::new(), &[]).expect("add");

        // not built wins over every other problem
        assert_eq!(
            builder.get_field_value_dyn("Missing", Target::value(1i64)),
            Err(Error::InstanceNotBuilt)
        );

        builder.build().expect("build");
        assert_eq!(
            builder.get_field_value_dyn("Missing", Target::value(1i64)),
            Err(Error::ValueMustBePointer)
        );
        assert_eq!(
            builder.get_field_value_dyn("Missing", None::<&mut i64>),
            Err(Error::ValueCannotBeNil)
        );
        let mut out = 0i64;
        assert_eq!(
            builder.get_field_value_dyn("Missing", &mut out),
            Err(Error::FieldNotFound("Missing".into()))
        );
        assert_eq!(
            builder
                .get_field_value_dyn("Name", &mut out)
                .expect_err("mismatch")
                .kind(),
            ErrorKind::IncompatibleTypes
        );
    }

    #[test]
    fn test_clear_all_policy() {
        let builder = Builder::with_config(BuilderConfig::new().reset_policy(ResetPolicy::ClearAll));
        builder.add_field("A", 0u8, &[]).expect("add");
        builder.add_anonymous_field(false, &[]).expect("anonymous");
        builder.build().expect("build");

        builder.reset();
        assert!(builder.fields().is_empty());
    }

    #[test]
    fn test_type_name_from_config() {
        let builder = Builder::with_config(BuilderConfig::new().type_name("Row"));
        let instance = builder.build().expect("build");
        assert_eq!(instance.descriptor().name, "Row");
    }
}
