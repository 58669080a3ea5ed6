use crate::php::{DecodeOptions, Document, ErrorKind, Key, PhpError, PhpString, Value, decode, decode_str};

fn decode_ok(input: &str) -> Document {
	decode_str(input, &DecodeOptions::default()).expect("payload decodes")
}

fn root_value(doc: &Document) -> &Value {
	doc.get(doc.root()).expect("root exists")
}

fn array_items(doc: &Document) -> Vec<(Key, Value)> {
	let Value::Array(entries) = root_value(doc) else {
		panic!("expected array root");
	};
	entries
		.iter()
		.map(|entry| (entry.key.clone(), doc.get(entry.value).expect("child exists").clone()))
		.collect()
}

#[test]
fn decodes_scalars() {
	assert_eq!(root_value(&decode_ok("N;")), &Value::Null);
	assert_eq!(root_value(&decode_ok("b:1;")), &Value::Bool(true));
	assert_eq!(root_value(&decode_ok("b:0;")), &Value::Bool(false));
	assert_eq!(root_value(&decode_ok("i:-42;")), &Value::Int(-42));
	assert_eq!(root_value(&decode_ok("d:0.1;")), &Value::Float(0.1));
	assert_eq!(root_value(&decode_ok("d:1.0E+25;")), &Value::Float(1.0e25));
	assert_eq!(root_value(&decode_ok("s:5:\"hello\";")), &Value::String(PhpString::from("hello")));
}

#[test]
fn decodes_non_finite_floats() {
	assert_eq!(root_value(&decode_ok("d:INF;")), &Value::Float(f64::INFINITY));
	assert_eq!(root_value(&decode_ok("d:-INF;")), &Value::Float(f64::NEG_INFINITY));
	assert!(matches!(root_value(&decode_ok("d:NAN;")), Value::Float(v) if v.is_nan()));
}

#[test]
fn string_length_is_in_bytes() {
	let doc = decode_ok("s:6:\"héllo\";");
	assert_eq!(root_value(&doc), &Value::String(PhpString::from("héllo")));
}

#[test]
fn string_may_contain_terminator_like_bytes() {
	let doc = decode_ok("s:5:\"a\";b;\";");
	assert_eq!(root_value(&doc), &Value::String(PhpString::from("a\";b;")));
}

#[test]
fn array_preserves_insertion_order() {
	let doc = decode_ok("a:3:{s:1:\"b\";i:1;i:7;i:2;s:1:\"a\";i:3;}");
	let items = array_items(&doc);
	assert_eq!(
		items,
		vec![
			(Key::Str("b".into()), Value::Int(1)),
			(Key::Int(7), Value::Int(2)),
			(Key::Str("a".into()), Value::Int(3)),
		]
	);
}

#[test]
fn numeric_string_keys_become_integers() {
	let doc = decode_ok("a:3:{s:1:\"5\";i:1;s:2:\"05\";i:2;s:2:\"-3\";i:3;}");
	let keys: Vec<Key> = array_items(&doc).into_iter().map(|(key, _)| key).collect();
	assert_eq!(keys, vec![Key::Int(5), Key::Str("05".into()), Key::Int(-3)]);
}

#[test]
fn duplicate_array_key_keeps_first_position_and_last_value() {
	let doc = decode_ok("a:3:{i:0;s:1:\"a\";i:1;s:1:\"b\";i:0;s:1:\"c\";}");
	let items = array_items(&doc);
	assert_eq!(
		items,
		vec![(Key::Int(0), Value::String("c".into())), (Key::Int(1), Value::String("b".into())),]
	);
}

#[test]
fn object_keeps_raw_mangled_keys() {
	let input = b"O:3:\"Foo\":3:{s:1:\"a\";i:1;s:4:\"\0*\0b\";i:2;s:6:\"\0Foo\0c\";i:3;}";
	let doc = decode(input, &DecodeOptions::default()).expect("object decodes");
	let Value::Object(object) = root_value(&doc) else {
		panic!("expected object root");
	};
	assert_eq!(object.class_name.as_ref(), "Foo");
	let keys: Vec<&[u8]> = object.properties.iter().map(|entry| entry.raw_key.as_bytes()).collect();
	assert_eq!(keys, vec![b"a".as_slice(), b"\0*\0b".as_slice(), b"\0Foo\0c".as_slice()]);
}

#[test]
fn custom_object_keeps_payload() {
	let doc = decode_ok("C:11:\"ArrayObject\":21:{x:i:0;a:0:{};m:a:0:{}}");
	let Value::CustomObject(custom) = root_value(&doc) else {
		panic!("expected custom object root");
	};
	assert_eq!(custom.class_name.as_ref(), "ArrayObject");
	assert_eq!(custom.payload, PhpString::from("x:i:0;a:0:{};m:a:0:{}"));
}

#[test]
fn value_reference_targets_php_slot() {
	// slots: 1 = outer array, 2 = inner array, 3 = "x"
	let doc = decode_ok("a:2:{i:0;a:1:{i:0;s:1:\"x\";}i:1;R:3;}");
	let items = array_items(&doc);
	let Value::Reference(target) = items[1].1 else {
		panic!("expected reference entry");
	};
	assert_eq!(doc.get(target), Some(&Value::String("x".into())));
}

#[test]
fn keys_do_not_occupy_slots() {
	// slots: 1 = array, 2 = i:10, 3 = i:20
	let doc = decode_ok("a:3:{s:1:\"a\";i:10;s:1:\"b\";i:20;s:1:\"c\";R:3;}");
	let items = array_items(&doc);
	let Value::Reference(target) = items[2].1 else {
		panic!("expected reference entry");
	};
	assert_eq!(doc.get(target), Some(&Value::Int(20)));
}

#[test]
fn object_reference_to_self_is_allowed() {
	let doc = decode_ok("O:4:\"Node\":1:{s:4:\"self\";r:1;}");
	let Value::Object(object) = root_value(&doc) else {
		panic!("expected object root");
	};
	let child = doc.get(object.properties[0].value).expect("property exists");
	assert_eq!(child, &Value::Reference(doc.root()));
}

#[test]
fn object_reference_slot_aliases_its_target() {
	// slots: 1 = array, 2 = object, 3 = r:2 (aliases the object)
	let doc = decode_ok("a:3:{i:0;O:8:\"stdClass\":0:{}i:1;r:2;i:2;R:3;}");
	let items = array_items(&doc);
	let (Value::Reference(first), Value::Reference(second)) = (&items[1].1, &items[2].1) else {
		panic!("expected two references");
	};
	assert_eq!(first, second);
	assert!(matches!(doc.get(*second), Some(Value::Object(_))));
}

#[test]
fn forward_reference_is_dangling() {
	let err = decode_str("a:1:{i:0;R:5;}", &DecodeOptions::default()).expect_err("slot 5 does not exist yet");
	assert_eq!(err.kind(), ErrorKind::DanglingReference);
	assert_eq!(err.to_string(), "dangling reference to slot 5");
}

#[test]
fn zero_slot_is_dangling() {
	let err = decode_str("a:1:{i:0;R:0;}", &DecodeOptions::default()).expect_err("slot 0 never exists");
	assert!(matches!(err, PhpError::DanglingReference { .. }));
}

#[test]
fn fix_nulls_restores_stripped_protected_prefix() {
	let doc = decode_ok("O:3:\"Foo\":1:{s:7:\"*name\";s:3:\"bob\";}");
	let Value::Object(object) = root_value(&doc) else {
		panic!("expected object root");
	};
	assert_eq!(object.properties[0].raw_key.as_bytes(), b"\0*\0name");
}

#[test]
fn fix_nulls_restores_stripped_private_prefix() {
	let doc = decode_ok("O:3:\"Foo\":1:{s:9:\"Fooname\";i:1;}");
	let Value::Object(object) = root_value(&doc) else {
		panic!("expected object root");
	};
	assert_eq!(object.properties[0].raw_key.as_bytes(), b"\0Foo\0name");
}

#[test]
fn fix_nulls_unescapes_textual_nul_spellings() {
	let doc = decode_ok(r#"O:3:"Foo":2:{s:7:"\0*\0name";i:1;s:7:"\u0000Foo\u0000id";i:2;}"#);
	let Value::Object(object) = root_value(&doc) else {
		panic!("expected object root");
	};
	assert_eq!(object.properties[0].raw_key.as_bytes(), b"\0*\0name");
	assert_eq!(object.properties[1].raw_key.as_bytes(), b"\0Foo\0id");
}

#[test]
fn strict_mode_rejects_stripped_nulls() {
	let err = decode_str("O:3:\"Foo\":1:{s:7:\"*name\";s:3:\"bob\";}", &DecodeOptions::strict()).expect_err("strict decode should fail");
	assert!(matches!(err, PhpError::StringLengthMismatch { declared: 7, found: 5, .. }));
}

#[test]
fn fix_nulls_does_not_touch_plain_strings() {
	let err = decode_str("s:7:\"*name\";", &DecodeOptions::default()).expect_err("value strings are never repaired");
	assert!(matches!(err, PhpError::StringLengthMismatch { declared: 7, .. }));
}

#[test]
fn rejects_non_scalar_array_key() {
	let err = decode_str("a:1:{N;i:1;}", &DecodeOptions::default()).expect_err("null key should fail");
	assert!(matches!(err, PhpError::InvalidArrayKey { at: 5 }));
}

#[test]
fn rejects_unknown_tag() {
	let err = decode_str("x:1;", &DecodeOptions::default()).expect_err("unknown tag should fail");
	assert!(matches!(err, PhpError::UnknownTag { at: 0, tag: 'x' }));
}

#[test]
fn rejects_invalid_integer() {
	let err = decode_str("i:12a;", &DecodeOptions::default()).expect_err("bad integer should fail");
	assert!(matches!(err, PhpError::InvalidNumber { at: 2, ref text } if text == "12a"));
}

#[test]
fn rejects_truncated_array() {
	let err = decode_str("a:2:{i:0;i:1;", &DecodeOptions::default()).expect_err("truncated payload should fail");
	assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn trailing_garbage_is_rejected_unless_allowed() {
	let err = decode_str("N;junk", &DecodeOptions::default()).expect_err("trailing data should fail");
	assert!(matches!(err, PhpError::TrailingData { at: 2, rem: 4 }));

	let opt = DecodeOptions {
		allow_trailing: true,
		..DecodeOptions::default()
	};
	let doc = decode_str("N;junk", &opt).expect("trailing data allowed");
	assert_eq!(root_value(&doc), &Value::Null);
}

#[test]
fn surrounding_whitespace_is_ignored() {
	let doc = decode_ok("  \ni:3;\n");
	assert_eq!(root_value(&doc), &Value::Int(3));
}

#[test]
fn depth_limit_is_enforced() {
	let opt = DecodeOptions {
		max_depth: 2,
		..DecodeOptions::default()
	};
	let err = decode_str("a:1:{i:0;a:1:{i:0;a:0:{}}}", &opt).expect_err("third level exceeds limit");
	assert!(matches!(err, PhpError::DepthExceeded { max_depth: 2 }));
}

#[test]
fn oversized_string_length_is_a_mismatch() {
	let err = decode_str("s:18446744073709551615:\"x\";", &DecodeOptions::default()).expect_err("huge length should fail");
	assert!(matches!(err, PhpError::StringLengthMismatch { declared: usize::MAX, found: 1, .. }));
}

#[test]
fn oversized_property_key_length_is_repaired_or_rejected() {
	let repaired = decode_str("O:1:\"A\":1:{s:18446744073709551615:\"x\";i:1;}", &DecodeOptions::default()).expect("key is kept as found");
	let Value::Object(object) = root_value(&repaired) else {
		panic!("expected object root");
	};
	assert_eq!(object.properties[0].raw_key.as_bytes(), b"x");

	let err = decode_str("O:1:\"A\":1:{s:18446744073709551615:\"x\";i:1;}", &DecodeOptions::strict()).expect_err("strict decode should fail");
	assert!(matches!(err, PhpError::StringLengthMismatch { declared: usize::MAX, .. }));
}
