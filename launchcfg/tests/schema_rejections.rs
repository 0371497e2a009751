// SPDX-License-Identifier: Apache-2.0

// Well-formed JSON that is not a valid configuration

use launchcfg::{parse_config, schema, ErrorKind, Key, ParseError, SchemaError};

macro_rules! rejects {
    ($($name:ident: $doc:expr => $expected:expr;)*) => {
        $(
            paste::paste! {
                #[test_log::test]
                fn [<test_rejects_ $name>]() {
                    let doc: &str = $doc;
                    let tokens = flattok::tokenize(doc.as_bytes()).unwrap();
                    assert!(!schema::validate(doc.as_bytes(), &tokens));
                    assert_eq!(
                        parse_config(doc).unwrap_err(),
                        ParseError::Schema($expected),
                        "document: {}",
                        doc
                    );
                }
            }
        )*
    };
}

rejects! {
    array_root: r#"[{"configuration": []}]"# => SchemaError::InvalidRoot;
    scalar_root: "42" => SchemaError::InvalidRoot;
    second_root_member: r#"{"configuration": [], "version": 2}"# => SchemaError::InvalidRoot;
    misspelled_root_key: r#"{"Configuration": []}"# => SchemaError::MissingConfiguration;
    object_entries: r#"{"configuration": {"name": "a"}}"# => SchemaError::EntriesNotArray;
    string_entry: r#"{"configuration": ["a"]}"# => SchemaError::EntryNotObject { entry: 0 };
    empty_entry: r#"{"configuration": [{}]}"# => SchemaError::TooFewKeys { entry: 0, found: 0 };
    missing_name: r#"{"configuration": [{"location": "x", "offset": 0, "buttons": []}]}"#
        => SchemaError::MissingKey { entry: 0, key: Key::Name };
    missing_location: r#"{"configuration": [{"name": "a", "offset": 0, "buttons": []}]}"#
        => SchemaError::MissingKey { entry: 0, key: Key::Location };
    missing_buttons: r#"{"configuration": [{"name": "a", "location": "x", "offset": 0}]}"#
        => SchemaError::MissingKey { entry: 0, key: Key::Buttons };
    unknown_key: r#"{"configuration": [{"name": "a", "location": "x", "buttons": [], "delay": 1}]}"#
        => SchemaError::UnknownKey { entry: 0 };
    key_prefix_is_not_a_key: r#"{"configuration": [{"nam": "a", "location": "x", "buttons": []}]}"#
        => SchemaError::UnknownKey { entry: 0 };
    duplicate_first: r#"{"configuration": [{"buttons": [], "buttons": [], "name": "a", "location": "x"}]}"#
        => SchemaError::DuplicateKey { entry: 0, key: Key::Buttons };
    duplicate_last: r#"{"configuration": [{"name": "a", "location": "x", "buttons": [], "location": "y"}]}"#
        => SchemaError::DuplicateKey { entry: 0, key: Key::Location };
    numeric_location: r#"{"configuration": [{"name": "a", "location": 5, "buttons": []}]}"#
        => SchemaError::WrongValueKind { entry: 0, key: Key::Location };
    string_offset: r#"{"configuration": [{"name": "a", "location": "x", "offset": "0x10", "buttons": []}]}"#
        => SchemaError::WrongValueKind { entry: 0, key: Key::Offset };
    nested_buttons: r#"{"configuration": [{"name": "a", "location": "x", "buttons": [["A"]]}]}"#
        => SchemaError::ButtonNotString { entry: 0 };
    bad_second_entry: r#"{"configuration": [{"name": "a", "location": "x", "buttons": []}, {"name": "b"}]}"#
        => SchemaError::TooFewKeys { entry: 1, found: 1 };
}

#[test_log::test]
fn test_schema_errors_have_schema_kind() {
    let err = parse_config(r#"{"configuration": 1}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(
        err.to_string(),
        "invalid configuration: \"configuration\" must be an array"
    );
}
