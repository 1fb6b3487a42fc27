// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hdds-dynstruct - Runtime record types
//!
//! Build record types at runtime from `(name, sample, tags)` declarations,
//! get one zero-valued instance, and read or write its fields with exact type
//! checks. Meant for data whose shape is only known at runtime (schema-driven
//! JSON or database mapping) where an untyped key/value map is too loose.
//!
//! ## Quick Start
//!
//! ```rust
//! use hdds_dynstruct::{Builder, Result};
//!
//! fn main() -> Result<()> {
//!     let builder = Builder::new();
//!     builder.add_field("Name", String::new(), &[r#"json:"name""#])?;
//!     builder.add_field("Age", 0i64, &[r#"json:"age,omitempty""#])?;
//!     builder.add_field("Password", String::new(), &[r#"json:"-""#])?;
//!
//!     let instance = builder.build()?;
//!     instance.set("Name", "Ada".to_string())?;
//!
//!     let mut age = -1i64;
//!     builder.get_field_value("Age", &mut age)?;
//!     assert_eq!(age, 0);
//!
//!     # #[cfg(feature = "json")]
//!     assert_eq!(instance.to_json().unwrap(), r#"{"name":"Ada"}"#);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  Builder   declare -> build -> typed get/set -> reset         |
//! +---------------------------------------------------------------+
//! |  tag       struct-tag grammar (`json:"name,omitempty"`)       |
//! +---------------------------------------------------------------+
//! |  dynamic   TypeDescriptor | DynamicValue | DynamicData | JSON |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Builder`] | Declaration registry and owner of the built instance |
//! | [`Instance`] | Shared handle to the built instance |
//! | [`DynamicType`] | Maps a Rust type to its runtime descriptor |
//! | [`StructTag`] | Validated field tag |
//! | [`Error`] | Every contract violation, matchable via [`Error::kind`] |
//!
//! ## Features
//!
//! - `json` (default): serde `Serialize` for instances and tag-aware JSON
//!   decoding through `serde_json`.

#[macro_use]
mod macros;

pub mod builder;
pub mod config;
pub mod dynamic;
mod error;
pub mod tag;

pub use builder::{Builder, BuilderState, FieldSpec, Instance, Receiver, Target};
pub use config::{BuilderConfig, ResetPolicy};
pub use dynamic::{AnyValue, DynamicData, DynamicType, DynamicValue, TypeDescriptor};
pub use error::{Error, ErrorKind, Result};
pub use tag::{StructTag, TagParseError};

#[cfg(feature = "json")]
pub use dynamic::JsonError;
