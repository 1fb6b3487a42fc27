// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the builder and the dynamic data container.

use crate::dynamic::TypeDescriptor;
use crate::tag::TagParseError;

/// Errors returned by [`Builder`](crate::Builder) and
/// [`DynamicData`](crate::dynamic::DynamicData) operations.
///
/// Every variant is a caller contract violation; none is transient. A failed
/// operation leaves the registry and the instance untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    // ========================================================================
    // Declaration Errors
    // ========================================================================
    /// A named field with this name is already declared.
    FieldAlreadyExists(String),
    /// An anonymous field of this type is already declared.
    AnonymousFieldAlreadyExists(String),
    /// Tag text failed the struct-tag grammar.
    InvalidTag(TagParseError),

    // ========================================================================
    // State Errors
    // ========================================================================
    /// Mutation or second build attempted after `build`.
    InstanceAlreadyBuilt,
    /// Accessor called before `build`.
    InstanceNotBuilt,

    // ========================================================================
    // Accessor Errors
    // ========================================================================
    /// Destination passed by value instead of by reference.
    ValueMustBePointer,
    /// Destination reference is unbound.
    ValueCannotBeNil,
    /// No field with this name in the synthesized type.
    FieldNotFound(String),
    /// No anonymous field of this type in the synthesized type.
    AnonymousFieldNotFound(String),
    /// Destination type differs from the field type.
    IncompatibleTypes {
        /// Declared type of the field.
        field_type: String,
        /// Static type of the destination.
        value_type: String,
    },
}

impl Error {
    /// Build an `IncompatibleTypes` error from two descriptors.
    pub fn incompatible(field_type: &TypeDescriptor, value_type: &TypeDescriptor) -> Self {
        Error::IncompatibleTypes {
            field_type: field_type.to_string(),
            value_type: value_type.to_string(),
        }
    }

    /// Kind of this error, for matching without the context payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FieldAlreadyExists(_) => ErrorKind::FieldAlreadyExists,
            Error::AnonymousFieldAlreadyExists(_) => ErrorKind::AnonymousFieldAlreadyExists,
            Error::InvalidTag(_) => ErrorKind::InvalidTag,
            Error::InstanceAlreadyBuilt => ErrorKind::InstanceAlreadyBuilt,
            Error::InstanceNotBuilt => ErrorKind::InstanceNotBuilt,
            Error::ValueMustBePointer => ErrorKind::ValueMustBePointer,
            Error::ValueCannotBeNil => ErrorKind::ValueCannotBeNil,
            Error::FieldNotFound(_) => ErrorKind::FieldNotFound,
            Error::AnonymousFieldNotFound(_) => ErrorKind::AnonymousFieldNotFound,
            Error::IncompatibleTypes { .. } => ErrorKind::IncompatibleTypes,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Declaration
            Error::FieldAlreadyExists(name) => write!(f, "Field already exists: {}", name),
            Error::AnonymousFieldAlreadyExists(ty) => {
                write!(f, "Anonymous field already exists: {}", ty)
            }
            Error::InvalidTag(e) => write!(f, "Invalid tag: {}", e),
            // State
            Error::InstanceAlreadyBuilt => write!(f, "Instance already built"),
            Error::InstanceNotBuilt => write!(f, "Instance not built"),
            // Accessors
            Error::ValueMustBePointer => write!(f, "Value must be a pointer"),
            Error::ValueCannotBeNil => write!(f, "Value cannot be nil"),
            Error::FieldNotFound(name) => write!(f, "Field not found: {}", name),
            Error::AnonymousFieldNotFound(ty) => write!(f, "Anonymous field not found: {}", ty),
            Error::IncompatibleTypes {
                field_type,
                value_type,
            } => write!(
                f,
                "Incompatible types: field is {}, value is {}",
                field_type, value_type
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidTag(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TagParseError> for Error {
    fn from(e: TagParseError) -> Self {
        Error::InvalidTag(e)
    }
}

/// Payload-free discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FieldAlreadyExists,
    AnonymousFieldAlreadyExists,
    InvalidTag,
    InstanceAlreadyBuilt,
    InstanceNotBuilt,
    ValueMustBePointer,
    ValueCannotBeNil,
    FieldNotFound,
    AnonymousFieldNotFound,
    IncompatibleTypes,
}

/// Convenient alias for results using the crate [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
