// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic type model
//!
//! Runtime type manipulation without compile-time type knowledge: the
//! substrate on which [`Builder`](crate::Builder) synthesizes record types.
//!
//! # Features
//!
//! - **TypeDescriptor**: Runtime type description (primitives, structs, sequences, maps, ...)
//! - **DynamicData**: Type-checked data container with field access
//! - **DynamicType**: Mapping from static Rust types to descriptors and values
//! - **JSON Support**: Tag-driven serde encoding/decoding (`json` feature)
//!
//! # Example
//!
//! ```rust
//! use hdds_dynstruct::dynamic::{DynamicData, DynamicType, FieldDescriptor, TypeDescriptor};
//! use std::sync::Arc;
//!
//! let descriptor = Arc::new(TypeDescriptor::struct_type(
//!     "SensorReading",
//!     vec![
//!         FieldDescriptor::new("sensor_id", u32::type_descriptor()),
//!         FieldDescriptor::new("temperature", f64::type_descriptor()),
//!     ],
//! ));
//!
//! let mut data = DynamicData::new(&descriptor);
//! data.set("sensor_id", 42u32).unwrap();
//! data.set("temperature", 23.5f64).unwrap();
//!
//! let temp: f64 = data.get("temperature").unwrap();
//! assert_eq!(temp, 23.5);
//! assert!(data.get::<i64>("sensor_id").is_err());
//! ```

mod dynamic_data;
mod dynamic_type;
#[cfg(feature = "json")]
mod json;
mod type_descriptor;
mod value;

pub use dynamic_data::DynamicData;
pub use dynamic_type::{AnyValue, DynamicType};
#[cfg(feature = "json")]
pub use json::JsonError;
pub use type_descriptor::{
    ArrayDescriptor, FieldDescriptor, MapContainer, MapDescriptor, PrimitiveKind, TypeDescriptor,
    TypeKind,
};
pub use value::DynamicValue;
