// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.
//!
//! Descriptor equality is type identity: two fields have the same type
//! exactly when their descriptors compare equal (name, shape, field tags).

use crate::tag::StructTag;
use std::fmt;
use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    String,
}

impl PrimitiveKind {
    /// Intrinsic type name (the Rust spelling).
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "String",
        }
    }

    /// Signed or unsigned integer.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::I8 | Self::I16 | Self::I32 | Self::I64
        )
    }

    /// Floating point.
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Record with ordered fields.
    Struct(Vec<FieldDescriptor>),
    /// Growable sequence.
    Sequence(Arc<TypeDescriptor>),
    /// Fixed-length array.
    Array(ArrayDescriptor),
    /// Key/value map.
    Map(MapDescriptor),
    /// Value that may be absent.
    Optional(Arc<TypeDescriptor>),
    /// Any value, carried with its own descriptor.
    Any,
}

impl TypeKind {
    /// Lowercase label of the kind.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primitive(p) => p.name(),
            Self::Struct(_) => "struct",
            Self::Sequence(_) => "sequence",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Optional(_) => "optional",
            Self::Any => "any",
        }
    }
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name (empty for unnamed types).
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a primitive type descriptor, named after the primitive.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(kind.name(), TypeKind::Primitive(kind))
    }

    /// Create a struct type descriptor.
    pub fn struct_type(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Struct(fields))
    }

    /// Unnamed sequence of `element`.
    pub fn sequence(element: Arc<TypeDescriptor>) -> Self {
        Self::new("", TypeKind::Sequence(element))
    }

    /// Unnamed array of `length` elements.
    pub fn array(element: Arc<TypeDescriptor>, length: usize) -> Self {
        Self::new("", TypeKind::Array(ArrayDescriptor::new(element, length)))
    }

    /// Unnamed hash map.
    pub fn map(key: Arc<TypeDescriptor>, value: Arc<TypeDescriptor>) -> Self {
        Self::new("", TypeKind::Map(MapDescriptor::new(key, value)))
    }

    /// Unnamed ordered map.
    pub fn btree_map(key: Arc<TypeDescriptor>, value: Arc<TypeDescriptor>) -> Self {
        Self::new(
            "",
            TypeKind::Map(MapDescriptor::new(key, value).container(MapContainer::BTree)),
        )
    }

    /// Unnamed optional.
    pub fn optional(inner: Arc<TypeDescriptor>) -> Self {
        Self::new("", TypeKind::Optional(inner))
    }

    /// The `any` type.
    pub fn any() -> Self {
        Self::new("", TypeKind::Any)
    }

    /// Optional and `any` types, whose zero value is null.
    pub fn is_nullable(&self) -> bool {
        matches!(self.kind, TypeKind::Optional(_) | TypeKind::Any)
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name == name)
    }

    /// Index of the embedded field whose type is `ty`.
    pub fn embedded_index(&self, ty: &TypeDescriptor) -> Option<usize> {
        self.fields()?
            .iter()
            .position(|f| f.embedded && *f.type_desc == *ty)
    }

    /// Name used for an embedded field of this type.
    ///
    /// The intrinsic name when there is one, the kind label otherwise, with
    /// the first character upper-cased.
    pub fn display_name(&self) -> String {
        let base = if self.name.is_empty() {
            self.kind.label()
        } else {
            self.name.as_str()
        };
        let mut chars = base.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            return f.write_str(&self.name);
        }
        match &self.kind {
            TypeKind::Primitive(p) => f.write_str(p.name()),
            TypeKind::Struct(fields) => {
                f.write_str("struct {")?;
                for (i, field) in fields.iter().enumerate() {
                    f.write_str(if i == 0 { " " } else { ", " })?;
                    if field.embedded {
                        write!(f, "{}", field.type_desc)?;
                    } else {
                        write!(f, "{}: {}", field.name, field.type_desc)?;
                    }
                }
                f.write_str(if fields.is_empty() { "}" } else { " }" })
            }
            TypeKind::Sequence(elem) => write!(f, "Vec<{}>", elem),
            TypeKind::Array(arr) => write!(f, "[{}; {}]", arr.element_type, arr.length),
            TypeKind::Map(map) => write!(
                f,
                "{}<{}, {}>",
                map.container.name(),
                map.key_type,
                map.value_type
            ),
            TypeKind::Optional(inner) => write!(f, "Option<{}>", inner),
            TypeKind::Any => f.write_str("any"),
        }
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
    /// Raw and parsed tag metadata.
    pub tag: StructTag,
    /// Embedded (anonymous) field.
    pub embedded: bool,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
            tag: StructTag::empty(),
            embedded: false,
        }
    }

    /// Attach a tag.
    pub fn with_tag(mut self, tag: StructTag) -> Self {
        self.tag = tag;
        self
    }

    /// Mark as embedded.
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

/// Array type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    /// Fixed length.
    pub length: usize,
}

impl ArrayDescriptor {
    /// Create array descriptor.
    pub fn new(element_type: Arc<TypeDescriptor>, length: usize) -> Self {
        Self {
            element_type,
            length,
        }
    }
}

/// Container backing a map type. Part of the map's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MapContainer {
    /// `HashMap`.
    #[default]
    Hash,
    /// `BTreeMap`.
    BTree,
}

impl MapContainer {
    /// Rust container name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hash => "HashMap",
            Self::BTree => "BTreeMap",
        }
    }
}

/// Map type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDescriptor {
    /// Key type.
    pub key_type: Arc<TypeDescriptor>,
    /// Value type.
    pub value_type: Arc<TypeDescriptor>,
    /// Backing container.
    pub container: MapContainer,
}

impl MapDescriptor {
    /// Create a hash map descriptor.
    pub fn new(key_type: Arc<TypeDescriptor>, value_type: Arc<TypeDescriptor>) -> Self {
        Self {
            key_type,
            value_type,
            container: MapContainer::Hash,
        }
    }

    /// Set the backing container.
    #[must_use]
    pub fn container(mut self, container: MapContainer) -> Self {
        self.container = container;
        self
    }
}
