// SPDX-License-Identifier: Apache-2.0

use flattok::{tokenize, ErrKind, Kind, Token};

const LAUNCHER_CONFIG: &str = r#"
{
    "configuration": [
        {
            "name": "default",
            "location": "SD:/arm9loaderhax.bin",
            "buttons": []
        },
        {
            "name": "recovery",
            "location": "SD:/recovery.bin",
            "offset": 0x1A,
            "buttons": ["R", "Start"]
        }
    ]
}
"#;

fn texts<'a>(src: &'a str, tokens: &[Token]) -> Vec<&'a str> {
    tokens
        .iter()
        .map(|t| core::str::from_utf8(t.text(src.as_bytes())).unwrap())
        .collect()
}

#[test_log::test]
fn test_launcher_config_layout() {
    let tokens = tokenize(LAUNCHER_CONFIG.as_bytes()).unwrap();

    assert_eq!(tokens.len(), 21);
    assert_eq!(tokens[0].kind, Kind::Object);
    assert_eq!(tokens[0].child_count, 1);
    assert_eq!(tokens[2].kind, Kind::Array);
    assert_eq!(tokens[2].child_count, 2);
    assert_eq!(tokens[3].kind, Kind::Object);
    assert_eq!(tokens[3].child_count, 3);
    assert_eq!(tokens[9].kind, Kind::Array);
    assert_eq!(tokens[9].child_count, 0);
    assert_eq!(tokens[10].kind, Kind::Object);
    assert_eq!(tokens[10].child_count, 4);

    let scalars: Vec<_> = tokens
        .iter()
        .copied()
        .filter(|t| !t.is_container())
        .collect();
    assert_eq!(
        texts(LAUNCHER_CONFIG, &scalars),
        vec![
            "configuration",
            "name",
            "default",
            "location",
            "SD:/arm9loaderhax.bin",
            "buttons",
            "name",
            "recovery",
            "location",
            "SD:/recovery.bin",
            "offset",
            "0x1A",
            "buttons",
            "R",
            "Start",
        ]
    );
}

#[test_log::test]
fn test_primitive_kinds() {
    let src = "[true, false, null, -3, 12abc]";
    let tokens = tokenize(src.as_bytes()).unwrap();
    assert!(tokens[1..].iter().all(|t| t.kind == Kind::Primitive));
    assert_eq!(
        texts(src, &tokens[1..]),
        vec!["true", "false", "null", "-3", "12abc"]
    );
}

#[test_log::test]
fn test_rejects_malformed_documents() {
    let cases: &[(&str, ErrKind)] = &[
        ("", ErrKind::EmptyStream),
        ("{", ErrKind::UnfinishedStream),
        (r#"{"configuration": [}"#, ErrKind::ExpectedArrayItem),
        (r#"{configuration: []}"#, ErrKind::ExpectedObjectKey),
        (r#"{"a": [1, 2,]}"#, ErrKind::TrailingComma),
        (r#"{"a": 1} x"#, ErrKind::ContentEnded),
    ];
    for (src, kind) in cases {
        let err = tokenize(src.as_bytes()).expect_err(src);
        assert_eq!(err.kind(), *kind, "input {:?} gave {:?}", src, err);
    }
}
