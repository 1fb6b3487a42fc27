// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::float_cmp)] // Tests compare exact stored values
#![allow(clippy::doc_markdown)] // Test documentation
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::items_after_statements)] // Test helpers
#![allow(clippy::too_many_lines)] // Example/test code

//! Typed field access integration tests
//!
//! Zero values, exact type checks, complex field types, anonymous fields and
//! untyped destinations.

use hdds_dynstruct::{
    dynamic_struct, AnyValue, Builder, DynamicData, DynamicType, Error, ErrorKind, Target,
};
use std::collections::{BTreeMap, HashMap};

dynamic_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Address {
        pub street: String,
        pub city: String,
    }
}

dynamic_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Person {
        pub name: String,
        pub address: Address,
        pub aliases: Vec<String>,
    }
}

fn built(decl: impl FnOnce(&Builder)) -> Builder {
    let builder = Builder::new();
    decl(&builder);
    builder.build().expect("build");
    builder
}

// ============================================================================
// Zero values and type checks
// ============================================================================

#[test]
fn test_fields_start_at_zero_value() {
    let builder = built(|b| {
        b.add_field("Name", String::from("John"), &[]).expect("name");
        b.add_field("Age", 30i64, &[]).expect("age");
        b.add_field("Score", 9.5f64, &[]).expect("score");
        b.add_field("Active", true, &[]).expect("active");
    });

    let mut name = String::from("sentinel");
    builder.get_field_value("Name", &mut name).expect("name");
    assert_eq!(name, "");

    let mut age = -1i64;
    builder.get_field_value("Age", &mut age).expect("age");
    assert_eq!(age, 0);

    let mut score = -1.0f64;
    builder.get_field_value("Score", &mut score).expect("score");
    assert_eq!(score, 0.0);

    let mut active = true;
    builder.get_field_value("Active", &mut active).expect("active");
    assert!(!active);
}

#[test]
fn test_write_then_read() {
    let builder = built(|b| {
        b.add_field("Name", String::new(), &[]).expect("name");
        b.add_field("Age", 0i64, &[]).expect("age");
    });

    builder.set_field("Name", "Ada".to_string()).expect("write name");
    builder.set_field("Age", 36i64).expect("write age");

    let mut name = String::new();
    let mut age = 0i64;
    builder.get_field_value("Name", &mut name).expect("name");
    builder.get_field_value("Age", &mut age).expect("age");
    assert_eq!((name.as_str(), age), ("Ada", 36));

    let field = builder.get_field("Age").expect("field");
    assert_eq!(field.type_name(), "i64");
    assert_eq!(field.to_typed::<i64>().expect("typed"), 36);
}

#[test]
fn test_incompatible_destination_left_untouched() {
    let builder = built(|b| {
        b.add_field("Name", String::new(), &[]).expect("name");
        b.add_field("Scores", HashMap::<String, i32>::new(), &[]).expect("map");
    });
    builder.set_field("Name", "Ada".to_string()).expect("write");

    let mut age = 42i64;
    let err = builder.get_field_value("Name", &mut age).expect_err("string into i64");
    assert_eq!(
        err,
        Error::IncompatibleTypes {
            field_type: "String".into(),
            value_type: "i64".into(),
        }
    );
    assert_eq!(age, 42);

    // same kind, different element type
    let mut wrong = HashMap::<String, i64>::new();
    let err = builder.get_field_value("Scores", &mut wrong).expect_err("map type");
    assert_eq!(err.kind(), ErrorKind::IncompatibleTypes);

    // same entries, different container
    let mut sorted = BTreeMap::<String, i32>::new();
    let err = builder.get_field_value("Scores", &mut sorted).expect_err("container");
    assert_eq!(
        err,
        Error::IncompatibleTypes {
            field_type: "HashMap<String, i32>".into(),
            value_type: "BTreeMap<String, i32>".into(),
        }
    );
}

#[test]
fn test_no_numeric_widening() {
    let builder = built(|b| {
        b.add_field("Small", 0i32, &[]).expect("i32");
    });

    let mut wide = 0i64;
    assert_eq!(
        builder.get_field_value("Small", &mut wide).map_err(|e| e.kind()),
        Err(ErrorKind::IncompatibleTypes)
    );
    assert_eq!(
        builder.set_field("Small", 1i64).map_err(|e| e.kind()),
        Err(ErrorKind::IncompatibleTypes)
    );
    let mut exact = 5i32;
    builder.get_field_value("Small", &mut exact).expect("exact type");
    assert_eq!(exact, 0);
}

#[test]
fn test_unknown_field() {
    let builder = built(|b| {
        b.add_field("Name", String::new(), &[]).expect("name");
    });
    let mut out = String::new();
    assert_eq!(
        builder.get_field_value("name", &mut out),
        Err(Error::FieldNotFound("name".into()))
    );
    assert_eq!(builder.get_field("Nope"), Err(Error::FieldNotFound("Nope".into())));
}

// ============================================================================
// Complex field types
// ============================================================================

#[test]
fn test_sequence_and_map_fields() {
    let builder = built(|b| {
        b.add_field("Tags", vec!["seed".to_string()], &[]).expect("tags");
        b.add_field("Scores", HashMap::<String, i32>::new(), &[]).expect("scores");
    });

    let mut tags = vec!["stale".to_string()];
    builder.get_field_value("Tags", &mut tags).expect("tags");
    assert!(tags.is_empty());

    let mut scores = HashMap::new();
    scores.insert("math".to_string(), 90i32);
    scores.insert("art".to_string(), 75i32);
    builder.set_field("Scores", scores.clone()).expect("write");
    builder.set_field("Tags", vec!["a".to_string(), "b".to_string()]).expect("write");

    let mut read_scores = HashMap::new();
    builder.get_field_value("Scores", &mut read_scores).expect("scores");
    assert_eq!(read_scores, scores);
    builder.get_field_value("Tags", &mut tags).expect("tags");
    assert_eq!(tags, vec!["a", "b"]);
}

#[test]
fn test_array_and_optional_fields() {
    let builder = built(|b| {
        b.add_field("Point", [1.0f32, 2.0, 3.0], &[]).expect("array");
        b.add_field("Parent", Some(7u64), &[]).expect("optional");
    });

    let mut point = [9.0f32; 3];
    builder.get_field_value("Point", &mut point).expect("point");
    assert_eq!(point, [0.0; 3]);

    let mut parent = Some(1u64);
    builder.get_field_value("Parent", &mut parent).expect("parent");
    assert_eq!(parent, None);

    builder.set_field("Parent", Some(11u64)).expect("write");
    builder.get_field_value("Parent", &mut parent).expect("parent");
    assert_eq!(parent, Some(11));

    let mut wrong_len = [0.0f32; 2];
    assert_eq!(
        builder.get_field_value("Point", &mut wrong_len).map_err(|e| e.kind()),
        Err(ErrorKind::IncompatibleTypes)
    );
}

#[test]
fn test_nested_optional_fields_keep_presence() {
    let builder = built(|b| {
        b.add_field("Twice", None::<Option<i64>>, &[]).expect("nested optional");
        b.add_field("Boxed", None::<AnyValue>, &[]).expect("optional any");
    });

    let mut twice = Some(Some(1i64));
    builder.get_field_value("Twice", &mut twice).expect("zero");
    assert_eq!(twice, None);

    builder.set_field("Twice", Some(None::<i64>)).expect("write");
    builder.get_field_value("Twice", &mut twice).expect("read");
    assert_eq!(twice, Some(None));

    builder.set_field("Twice", Some(Some(3i64))).expect("write");
    builder.get_field_value("Twice", &mut twice).expect("read");
    assert_eq!(twice, Some(Some(3)));

    builder.set_field("Boxed", Some(AnyValue::none())).expect("write");
    let mut boxed = None::<AnyValue>;
    builder.get_field_value("Boxed", &mut boxed).expect("read");
    assert_eq!(boxed, Some(AnyValue::none()));
}

#[test]
fn test_nested_struct_field() {
    let builder = built(|b| {
        b.add_field("Owner", Person::default(), &[]).expect("owner");
    });

    let mut owner = Person {
        name: "x".into(),
        ..Person::default()
    };
    builder.get_field_value("Owner", &mut owner).expect("owner");
    assert_eq!(owner, Person::default());

    let ada = Person {
        name: "Ada".into(),
        address: Address {
            street: "1 Analytical Way".into(),
            city: "London".into(),
        },
        aliases: vec!["Countess".into()],
    };
    builder.set_field("Owner", ada.clone()).expect("write");
    builder.get_field_value("Owner", &mut owner).expect("owner");
    assert_eq!(owner, ada);

    // nested fields are reachable through the dynamic view
    let data = builder.get_field("Owner").expect("owner");
    assert_eq!(data.type_name(), "Person");
    let address = data.get_field("address").expect("address");
    assert_eq!(address.get::<String>("city").expect("city"), "London");

    let mut wrong = Address::default();
    assert_eq!(
        builder.get_field_value("Owner", &mut wrong).map_err(|e| e.kind()),
        Err(ErrorKind::IncompatibleTypes)
    );
}

#[test]
fn test_any_field_holds_any_value() {
    let builder = built(|b| {
        b.add_field("Extra", AnyValue::none(), &[]).expect("any");
    });

    let mut extra = AnyValue::new(1u8);
    builder.get_field_value("Extra", &mut extra).expect("extra");
    assert!(extra.is_none());

    builder.set_field("Extra", AnyValue::new(5i64)).expect("i64");
    builder.get_field_value("Extra", &mut extra).expect("extra");
    assert_eq!(extra.downcast::<i64>(), Some(5));
    assert_eq!(extra.downcast::<String>(), None);

    builder
        .set_field("Extra", AnyValue::new(vec!["x".to_string()]))
        .expect("sequence");
    builder.get_field_value("Extra", &mut extra).expect("extra");
    assert_eq!(extra.downcast::<Vec<String>>(), Some(vec!["x".to_string()]));

    // the any slot itself is typed: a bare i64 is not an `any`
    assert_eq!(
        builder.set_field("Extra", 5i64).map_err(|e| e.kind()),
        Err(ErrorKind::IncompatibleTypes)
    );
}

// ============================================================================
// Anonymous fields
// ============================================================================

#[test]
fn test_anonymous_field_lookup_by_type() {
    let builder = built(|b| {
        b.add_field("Regular", String::new(), &[]).expect("regular");
        b.add_anonymous_field(0i64, &[]).expect("i64");
        b.add_anonymous_field(Address::default(), &[]).expect("address");
    });

    let field = builder.get_anonymous_field::<i64>().expect("i64");
    assert_eq!(field.to_typed::<i64>().expect("typed"), 0);

    builder.set_anonymous_field(12i64).expect("write");
    let mut out = 0i64;
    builder.get_anonymous_field_value(&mut out).expect("read");
    assert_eq!(out, 12);

    // also reachable by derived name
    assert_eq!(builder.get_field("I64").expect("by name").to_typed::<i64>(), Ok(12));

    assert_eq!(
        builder.get_anonymous_field::<String>().map_err(|e| e.kind()),
        Err(ErrorKind::AnonymousFieldNotFound)
    );
    let mut wrong = 0u32;
    assert_eq!(
        builder.get_anonymous_field_value(&mut wrong).map_err(|e| e.kind()),
        Err(ErrorKind::AnonymousFieldNotFound)
    );
}

#[test]
fn test_embedded_fields_are_promoted() {
    let builder = built(|b| {
        b.add_anonymous_field(Address::default(), &[]).expect("address");
        b.add_field("Name", String::new(), &[]).expect("name");
    });

    builder.set_field("city", "Oslo".to_string()).expect("promoted write");
    let mut city = String::new();
    builder.get_field_value("city", &mut city).expect("promoted read");
    assert_eq!(city, "Oslo");

    let mut address = Address::default();
    builder.get_anonymous_field_value(&mut address).expect("embedded");
    assert_eq!(address.city, "Oslo");
    assert_eq!(address.street, "");
}

// ============================================================================
// Untyped destinations
// ============================================================================

#[test]
fn test_target_contract() {
    let builder = built(|b| {
        b.add_field("Name", String::new(), &[]).expect("name");
        b.add_anonymous_field(0i64, &[]).expect("i64");
    });
    let i64_type = i64::type_descriptor();

    assert_eq!(
        builder.get_field_value_dyn("Name", Target::value(String::new())),
        Err(Error::ValueMustBePointer)
    );
    assert_eq!(
        builder.get_field_value_dyn("Name", None::<&mut String>),
        Err(Error::ValueCannotBeNil)
    );
    assert_eq!(
        builder.get_anonymous_field_value_dyn(&i64_type, Target::value(0i64)),
        Err(Error::ValueMustBePointer)
    );
    assert_eq!(
        builder.get_anonymous_field_value_dyn(&i64_type, Target::null::<i64>()),
        Err(Error::ValueCannotBeNil)
    );

    let mut name = String::from("x");
    builder.get_field_value_dyn("Name", Some(&mut name)).expect("bound option");
    assert_eq!(name, "");
}

#[test]
fn test_dynamic_data_destination() {
    let builder = built(|b| {
        b.add_field("Tags", Vec::<String>::new(), &[]).expect("tags");
    });
    builder.set_field("Tags", vec!["a".to_string()]).expect("write");

    let mut out = DynamicData::new(&Vec::<String>::type_descriptor());
    builder.get_field_value_dyn("Tags", &mut out).expect("read");
    assert_eq!(out.to_typed::<Vec<String>>().expect("typed"), vec!["a"]);

    let mut wrong = DynamicData::new(&Vec::<i32>::type_descriptor());
    assert_eq!(
        builder.get_field_value_dyn("Tags", &mut wrong).map_err(|e| e.kind()),
        Err(ErrorKind::IncompatibleTypes)
    );
}

#[test]
fn test_random_writes_read_back() {
    let mut rng = fastrand::Rng::with_seed(42);
    let builder = built(|b| {
        for i in 0..16 {
            b.add_field(&format!("F{}", i), 0u64, &[]).expect("field");
        }
    });

    let mut expected = [0u64; 16];
    for _ in 0..500 {
        let i = rng.usize(0..16);
        if rng.bool() {
            let value = rng.u64(..);
            builder.set_field(&format!("F{}", i), value).expect("write");
            expected[i] = value;
        } else {
            let mut out = 0u64;
            builder.get_field_value(&format!("F{}", i), &mut out).expect("read");
            assert_eq!(out, expected[i], "field F{}", i);
        }
    }
}
