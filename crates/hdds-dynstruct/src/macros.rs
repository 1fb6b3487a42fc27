// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

/// Declare a struct and implement [`DynamicType`](crate::dynamic::DynamicType)
/// for it.
///
/// The descriptor is named after the struct and lists the fields in
/// declaration order. Field tags are not expressible here; build tagged
/// record types with a [`Builder`](crate::Builder) instead.
///
/// ```
/// use hdds_dynstruct::{dynamic_struct, Builder};
///
/// dynamic_struct! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Person {
///         pub name: String,
///         pub age: i64,
///     }
/// }
///
/// let builder = Builder::new();
/// builder.add_field("Owner", Person::default(), &[]).unwrap();
/// builder.build().unwrap();
///
/// let mut owner = Person { name: "x".into(), age: 3 };
/// builder.get_field_value("Owner", &mut owner).unwrap();
/// assert_eq!(owner, Person::default());
/// ```
#[macro_export]
macro_rules! dynamic_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::dynamic::DynamicType for $name {
            fn type_descriptor() -> ::std::sync::Arc<$crate::dynamic::TypeDescriptor> {
                ::std::sync::Arc::new($crate::dynamic::TypeDescriptor::struct_type(
                    stringify!($name),
                    vec![
                        $(
                            $crate::dynamic::FieldDescriptor::new(
                                stringify!($field),
                                <$fty as $crate::dynamic::DynamicType>::type_descriptor(),
                            ),
                        )*
                    ],
                ))
            }

            fn to_dynamic(&self) -> $crate::dynamic::DynamicValue {
                $crate::dynamic::DynamicValue::Struct(vec![
                    $( $crate::dynamic::DynamicType::to_dynamic(&self.$field), )*
                ])
            }

            fn from_dynamic(value: &$crate::dynamic::DynamicValue) -> Option<Self> {
                let mut slots = value.as_struct()?.iter();
                let decoded = Self {
                    $(
                        $field: <$fty as $crate::dynamic::DynamicType>::from_dynamic(
                            slots.next()?,
                        )?,
                    )*
                };
                if slots.next().is_some() {
                    return None;
                }
                Some(decoded)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::dynamic::{DynamicType, DynamicValue, TypeKind};

    dynamic_struct! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Sample {
            id: u32,
            labels: Vec<String>,
        }
    }

    dynamic_struct! {
        #[derive(Debug, Default, PartialEq)]
        struct Unit {}
    }

    #[test]
    fn test_descriptor_lists_fields_in_order() {
        let desc = Sample::type_descriptor();
        assert_eq!(desc.name, "Sample");
        let names: Vec<_> = desc
            .fields()
            .expect("struct")
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "labels"]);
        assert!(matches!(Unit::type_descriptor().kind, TypeKind::Struct(ref f) if f.is_empty()));
    }

    #[test]
    fn test_struct_conversion() {
        let sample = Sample {
            id: 9,
            labels: vec!["a".into()],
        };
        let value = sample.to_dynamic();
        assert_eq!(value.slot(0), Some(&DynamicValue::U32(9)));
        assert_eq!(Sample::from_dynamic(&value), Some(sample));
        assert_eq!(Sample::from_dynamic(&DynamicValue::Struct(vec![])), None);
        assert_eq!(Unit::from_dynamic(&DynamicValue::Struct(vec![])), Some(Unit {}));
    }
}
