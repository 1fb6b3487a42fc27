// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tag-driven JSON encoding and decoding.
//!
//! Struct fields are keyed by the name in their `json` tag, or by the field
//! name when the tag gives none. The tag name `-` drops a field and the
//! `omitempty` option drops it while it holds its zero value. Untagged
//! embedded records are flattened into their parent: a shallower field hides
//! a deeper one with the same key, and two candidates at the same depth hide
//! each other unless exactly one of them is tagged.
//!
//! Decoding merges into an existing value. Keys match exactly first, then
//! case-insensitively; unknown keys are ignored; `null` clears optionals,
//! `any` slots, sequences and maps and leaves everything else unchanged.

use crate::config::{DEFAULT_TAG_KEY, TAG_OPT_OMITEMPTY, TAG_SKIP};
use crate::dynamic::{
    AnyValue, ArrayDescriptor, DynamicData, DynamicType, DynamicValue, PrimitiveKind,
    TypeDescriptor, TypeKind,
};
use crate::Instance;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// JSON encoding/decoding error.
#[derive(Debug)]
pub enum JsonError {
    /// Malformed JSON text, or a value serde_json refused to encode.
    Json(serde_json::Error),
    /// JSON value of the wrong shape for the field.
    TypeMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },
    /// Number that does not fit the field type.
    OutOfRange {
        path: String,
        ty: String,
        value: String,
    },
    /// Map key that cannot be parsed as the key type.
    InvalidKey { path: String, key: String },
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::TypeMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "cannot decode JSON {} into {} at {}",
                found,
                expected,
                display_path(path)
            ),
            Self::OutOfRange { path, ty, value } => write!(
                f,
                "JSON number {} overflows {} at {}",
                value,
                ty,
                display_path(path)
            ),
            Self::InvalidKey { path, key } => {
                write!(f, "invalid map key {:?} at {}", key, display_path(path))
            }
        }
    }
}

impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for JsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

// ============================================================================
// Field plan
// ============================================================================

/// One JSON key of a struct and where its value lives.
#[derive(Debug)]
struct KeyedField<'a> {
    key: String,
    path: Vec<usize>,
    ty: &'a TypeDescriptor,
    omit_empty: bool,
    tagged: bool,
}

/// JSON keys of a struct type, in field order, after flattening.
fn keyed_fields(desc: &TypeDescriptor) -> Vec<KeyedField<'_>> {
    let mut candidates = Vec::new();
    collect_fields(desc, &mut Vec::new(), &mut candidates);

    // Dominant field per key: shallowest, then the single tagged one.
    let mut keep = vec![true; candidates.len()];
    for i in 0..candidates.len() {
        let same_key: Vec<usize> = (0..candidates.len())
            .filter(|&j| candidates[j].key == candidates[i].key)
            .collect();
        if same_key.len() < 2 {
            continue;
        }
        let depth = same_key
            .iter()
            .map(|&j| candidates[j].path.len())
            .min()
            .unwrap_or_default();
        let shallow: Vec<usize> = same_key
            .iter()
            .copied()
            .filter(|&j| candidates[j].path.len() == depth)
            .collect();
        let tagged: Vec<usize> = shallow
            .iter()
            .copied()
            .filter(|&j| candidates[j].tagged)
            .collect();
        let winner = match (shallow.as_slice(), tagged.as_slice()) {
            ([only], _) | (_, [only]) => Some(*only),
            _ => None,
        };
        if Some(i) != winner {
            keep[i] = false;
        }
    }

    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(field, keep)| keep.then_some(field))
        .collect()
}

fn collect_fields<'a>(
    desc: &'a TypeDescriptor,
    prefix: &mut Vec<usize>,
    out: &mut Vec<KeyedField<'a>>,
) {
    let Some(fields) = desc.fields() else {
        return;
    };
    for (i, field) in fields.iter().enumerate() {
        let entry = field.tag.get(DEFAULT_TAG_KEY);
        let tag_name = entry.map_or("", |e| e.name.as_str());
        if tag_name == TAG_SKIP && entry.is_some_and(|e| e.options.is_empty()) {
            continue;
        }

        prefix.push(i);
        if field.embedded && tag_name.is_empty() && field.type_desc.is_struct() {
            collect_fields(&field.type_desc, prefix, out);
        } else {
            out.push(KeyedField {
                key: if tag_name.is_empty() {
                    field.name.clone()
                } else {
                    tag_name.to_string()
                },
                path: prefix.clone(),
                ty: &field.type_desc,
                omit_empty: entry.is_some_and(|e| e.has_option(TAG_OPT_OMITEMPTY)),
                tagged: !tag_name.is_empty(),
            });
        }
        prefix.pop();
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// A value paired with its type, for serialization.
struct Typed<'a> {
    ty: &'a TypeDescriptor,
    value: &'a DynamicValue,
}

impl Serialize for Typed<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match (&self.ty.kind, self.value) {
            (TypeKind::Struct(_), DynamicValue::Struct(_)) => {
                let fields = keyed_fields(self.ty);
                let mut map = serializer.serialize_map(None)?;
                for field in &fields {
                    let Some(value) = self.value.slot_path(&field.path) else {
                        continue;
                    };
                    if field.omit_empty && is_empty(field.ty, value) {
                        continue;
                    }
                    map.serialize_entry(&field.key, &Typed { ty: field.ty, value })?;
                }
                map.end()
            }
            (TypeKind::Sequence(elem), DynamicValue::Sequence(items))
            | (
                TypeKind::Array(ArrayDescriptor {
                    element_type: elem, ..
                }),
                DynamicValue::Array(items),
            ) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Typed { ty: elem, value: item })?;
                }
                seq.end()
            }
            (TypeKind::Map(map_desc), DynamicValue::Map(entries)) => {
                let mut keyed = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = map_key_text(k).ok_or_else(|| {
                        S::Error::custom(format!("unsupported map key type {}", map_desc.key_type))
                    })?;
                    keyed.push((key, v));
                }
                keyed.sort_by(|a, b| a.0.cmp(&b.0));
                let mut map = serializer.serialize_map(Some(keyed.len()))?;
                for (key, value) in &keyed {
                    map.serialize_entry(key, &Typed { ty: &map_desc.value_type, value })?;
                }
                map.end()
            }
            (TypeKind::Optional(_) | TypeKind::Any, DynamicValue::Null) => serializer.serialize_none(),
            (TypeKind::Optional(inner), DynamicValue::Some(value)) => {
                Typed { ty: inner, value }.serialize(serializer)
            }
            (TypeKind::Optional(inner), value) => Typed { ty: inner, value }.serialize(serializer),
            (TypeKind::Any, DynamicValue::Dynamic(data)) => data.serialize(serializer),
            (TypeKind::Primitive(_), value) => serialize_primitive(value, serializer),
            (_, value) => Err(S::Error::custom(format!(
                "{} value does not match type {}",
                value.variant_name(),
                self.ty
            ))),
        }
    }
}

/// `omitempty` test: optionals and `any` slots are empty only when null.
fn is_empty(ty: &TypeDescriptor, value: &DynamicValue) -> bool {
    match ty.kind {
        TypeKind::Optional(_) | TypeKind::Any => value.is_null(),
        _ => value.is_empty_value(),
    }
}

fn serialize_primitive<S: Serializer>(value: &DynamicValue, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        DynamicValue::Bool(v) => serializer.serialize_bool(*v),
        DynamicValue::U8(v) => serializer.serialize_u8(*v),
        DynamicValue::U16(v) => serializer.serialize_u16(*v),
        DynamicValue::U32(v) => serializer.serialize_u32(*v),
        DynamicValue::U64(v) => serializer.serialize_u64(*v),
        DynamicValue::I8(v) => serializer.serialize_i8(*v),
        DynamicValue::I16(v) => serializer.serialize_i16(*v),
        DynamicValue::I32(v) => serializer.serialize_i32(*v),
        DynamicValue::I64(v) => serializer.serialize_i64(*v),
        DynamicValue::F32(v) => serializer.serialize_f32(*v),
        DynamicValue::F64(v) => serializer.serialize_f64(*v),
        DynamicValue::Char(v) => serializer.serialize_char(*v),
        DynamicValue::String(v) => serializer.serialize_str(v),
        other => Err(S::Error::custom(format!(
            "{} is not a primitive value",
            other.variant_name()
        ))),
    }
}

/// Text form of a map key; JSON object keys are strings.
fn map_key_text(key: &DynamicValue) -> Option<String> {
    match key {
        DynamicValue::String(v) => Some(v.clone()),
        DynamicValue::Char(v) => Some(v.to_string()),
        DynamicValue::U8(v) => Some(v.to_string()),
        DynamicValue::U16(v) => Some(v.to_string()),
        DynamicValue::U32(v) => Some(v.to_string()),
        DynamicValue::U64(v) => Some(v.to_string()),
        DynamicValue::I8(v) => Some(v.to_string()),
        DynamicValue::I16(v) => Some(v.to_string()),
        DynamicValue::I32(v) => Some(v.to_string()),
        DynamicValue::I64(v) => Some(v.to_string()),
        _ => None,
    }
}

impl Serialize for DynamicData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Typed {
            ty: self.descriptor(),
            value: self.value(),
        }
        .serialize(serializer)
    }
}

impl Serialize for Instance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.with(|data| data.serialize(serializer))
    }
}

// ============================================================================
// Decoding
// ============================================================================

fn json_kind(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn mismatch(path: &str, ty: &TypeDescriptor, json: &Value) -> JsonError {
    JsonError::TypeMismatch {
        path: path.to_string(),
        expected: ty.to_string(),
        found: json_kind(json),
    }
}

/// Merge `json` into `target`, which holds a value of type `ty`.
fn merge(ty: &TypeDescriptor, target: &mut DynamicValue, json: &Value, path: &str) -> Result<(), JsonError> {
    if json.is_null() {
        match &ty.kind {
            TypeKind::Optional(_) | TypeKind::Any => *target = DynamicValue::Null,
            TypeKind::Sequence(_) => *target = DynamicValue::Sequence(Vec::new()),
            TypeKind::Map(_) => *target = DynamicValue::Map(Vec::new()),
            _ => {}
        }
        return Ok(());
    }

    match &ty.kind {
        TypeKind::Primitive(kind) => {
            *target = decode_primitive(*kind, ty, json, path)?;
        }
        TypeKind::Struct(_) => {
            let Value::Object(object) = json else {
                return Err(mismatch(path, ty, json));
            };
            let fields = keyed_fields(ty);
            for (key, item) in object {
                let field = fields
                    .iter()
                    .find(|f| f.key == *key)
                    .or_else(|| fields.iter().find(|f| f.key.to_lowercase() == key.to_lowercase()));
                let Some(field) = field else {
                    continue;
                };
                let Some(slot) = target.slot_path_mut(&field.path) else {
                    continue;
                };
                merge(field.ty, slot, item, &join_path(path, &field.key))?;
            }
        }
        TypeKind::Sequence(elem) => {
            let Value::Array(items) = json else {
                return Err(mismatch(path, ty, json));
            };
            let mut decoded = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let mut value = DynamicData::zero_value(elem);
                merge(elem, &mut value, item, &format!("{}[{}]", path, i))?;
                decoded.push(value);
            }
            *target = DynamicValue::Sequence(decoded);
        }
        TypeKind::Array(arr) => {
            let Value::Array(items) = json else {
                return Err(mismatch(path, ty, json));
            };
            let mut decoded = Vec::with_capacity(arr.length);
            for i in 0..arr.length {
                let mut value = match target.as_sequence().and_then(|v| v.get(i)) {
                    Some(existing) if i < items.len() => existing.clone(),
                    _ => DynamicData::zero_value(&arr.element_type),
                };
                if let Some(item) = items.get(i) {
                    merge(&arr.element_type, &mut value, item, &format!("{}[{}]", path, i))?;
                }
                decoded.push(value);
            }
            *target = DynamicValue::Array(decoded);
        }
        TypeKind::Map(map_desc) => {
            let Value::Object(object) = json else {
                return Err(mismatch(path, ty, json));
            };
            let mut entries = target.as_map().map(<[_]>::to_vec).unwrap_or_default();
            for (key, item) in object {
                let item_path = join_path(path, key);
                let key_value = decode_map_key(&map_desc.key_type, key, &item_path)?;
                let mut value = DynamicData::zero_value(&map_desc.value_type);
                merge(&map_desc.value_type, &mut value, item, &item_path)?;
                match entries.iter_mut().find(|(k, _)| *k == key_value) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key_value, value)),
                }
            }
            *target = DynamicValue::Map(entries);
        }
        TypeKind::Optional(inner) => {
            let mut value = match &*target {
                DynamicValue::Null => DynamicData::zero_value(inner),
                DynamicValue::Some(present) => (**present).clone(),
                other => other.clone(),
            };
            merge(inner, &mut value, json, path)?;
            *target = if inner.is_nullable() {
                DynamicValue::Some(Box::new(value))
            } else {
                value
            };
        }
        TypeKind::Any => {
            *target = json_to_any(json).to_dynamic();
        }
    }
    Ok(())
}

fn decode_primitive(
    kind: PrimitiveKind,
    ty: &TypeDescriptor,
    json: &Value,
    path: &str,
) -> Result<DynamicValue, JsonError> {
    let out_of_range = || JsonError::OutOfRange {
        path: path.to_string(),
        ty: ty.to_string(),
        value: json.to_string(),
    };

    if kind.is_integer() {
        let Value::Number(n) = json else {
            return Err(mismatch(path, ty, json));
        };
        if n.is_f64() {
            return Err(out_of_range());
        }
        let wide: i128 = match (n.as_i64(), n.as_u64()) {
            (Some(v), _) => i128::from(v),
            (None, Some(v)) => i128::from(v),
            (None, None) => return Err(out_of_range()),
        };
        let value = match kind {
            PrimitiveKind::U8 => u8::try_from(wide).ok().map(DynamicValue::U8),
            PrimitiveKind::U16 => u16::try_from(wide).ok().map(DynamicValue::U16),
            PrimitiveKind::U32 => u32::try_from(wide).ok().map(DynamicValue::U32),
            PrimitiveKind::U64 => u64::try_from(wide).ok().map(DynamicValue::U64),
            PrimitiveKind::I8 => i8::try_from(wide).ok().map(DynamicValue::I8),
            PrimitiveKind::I16 => i16::try_from(wide).ok().map(DynamicValue::I16),
            PrimitiveKind::I32 => i32::try_from(wide).ok().map(DynamicValue::I32),
            _ => i64::try_from(wide).ok().map(DynamicValue::I64),
        };
        return value.ok_or_else(out_of_range);
    }

    match (kind, json) {
        (PrimitiveKind::Bool, Value::Bool(v)) => Ok(DynamicValue::Bool(*v)),
        (PrimitiveKind::F64, Value::Number(n)) => n.as_f64().map(DynamicValue::F64).ok_or_else(out_of_range),
        (PrimitiveKind::F32, Value::Number(n)) => {
            let wide = n.as_f64().ok_or_else(out_of_range)?;
            let narrow = wide as f32;
            if narrow.is_infinite() {
                return Err(out_of_range());
            }
            Ok(DynamicValue::F32(narrow))
        }
        (PrimitiveKind::String, Value::String(v)) => Ok(DynamicValue::String(v.clone())),
        (PrimitiveKind::Char, Value::String(v)) => {
            let mut chars = v.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(DynamicValue::Char(c)),
                _ => Err(mismatch(path, ty, json)),
            }
        }
        _ => Err(mismatch(path, ty, json)),
    }
}

fn decode_map_key(ty: &TypeDescriptor, key: &str, path: &str) -> Result<DynamicValue, JsonError> {
    let invalid = || JsonError::InvalidKey {
        path: path.to_string(),
        key: key.to_string(),
    };
    let TypeKind::Primitive(kind) = ty.kind else {
        return Err(invalid());
    };
    if kind.is_integer() {
        let number: serde_json::Number = key.parse().map_err(|_| invalid())?;
        return decode_primitive(kind, ty, &Value::Number(number), path);
    }
    decode_primitive(kind, ty, &Value::String(key.to_string()), path).map_err(|_| invalid())
}

/// Untyped JSON as `any` content: bool, f64, String, `Vec<AnyValue>` or
/// `BTreeMap<String, AnyValue>`.
fn json_to_any(json: &Value) -> AnyValue {
    match json {
        Value::Null => AnyValue::none(),
        Value::Bool(v) => AnyValue::new(*v),
        Value::Number(n) => AnyValue::new(n.as_f64().unwrap_or_default()),
        Value::String(v) => AnyValue::new(v.clone()),
        Value::Array(items) => AnyValue::new(items.iter().map(json_to_any).collect::<Vec<_>>()),
        Value::Object(object) => AnyValue::new(
            object
                .iter()
                .map(|(k, v)| (k.clone(), json_to_any(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

// ============================================================================
// Public entry points
// ============================================================================

impl DynamicData {
    /// Decode a fresh zero value of `descriptor`, then merge `json` into it.
    pub fn from_json(descriptor: &Arc<TypeDescriptor>, json: &Value) -> Result<Self, JsonError> {
        let mut data = Self::new(descriptor);
        data.merge_json(json)?;
        Ok(data)
    }

    /// Merge a JSON value into this value.
    ///
    /// On error the value may be partially updated.
    pub fn merge_json(&mut self, json: &Value) -> Result<(), JsonError> {
        let descriptor = self.descriptor().clone();
        merge(&descriptor, self.value_mut(), json, "")
    }

    /// Encode as a JSON value.
    pub fn to_json_value(&self) -> Result<Value, JsonError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Encode as compact JSON text.
    pub fn to_json(&self) -> Result<String, JsonError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Instance {
    /// Encode the current value as compact JSON text.
    pub fn to_json(&self) -> Result<String, JsonError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encode the current value as indented JSON text.
    pub fn to_json_pretty(&self) -> Result<String, JsonError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Merge a JSON value into the instance.
    ///
    /// The instance is left untouched on error.
    pub fn merge_json(&self, json: &Value) -> Result<(), JsonError> {
        self.with_mut(|data| {
            let mut staged = data.clone();
            staged.merge_json(json)?;
            *data = staged;
            Ok(())
        })
    }

    /// Parse JSON text and merge it into the instance.
    pub fn merge_json_str(&self, text: &str) -> Result<(), JsonError> {
        let json: Value = serde_json::from_str(text)?;
        self.merge_json(&json)
    }
}
