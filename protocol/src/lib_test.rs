use super::*;

#[test]
fn theme_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Theme::Dark).expect("encode"), "\"dark\"");
    assert_eq!(serde_json::to_string(&Theme::Unknown).expect("encode"), "\"unknown\"");
}

#[test]
fn theme_labels_are_capitalized() {
    assert_eq!(Theme::Dark.label(), "Dark");
    assert_eq!(Theme::Light.label(), "Light");
    assert_eq!(Theme::Unknown.label(), "Unknown");
    assert_eq!(Theme::Light.to_string(), "light");
}

#[test]
fn set_dark_omits_absent_ignore_flag() {
    let raw = encode_command(&Command::SetDark { enabled: true, ignore_if_dark: None }).expect("encode");
    assert_eq!(raw, r#"{"op":"set_dark","enabled":true}"#);
}

#[test]
fn set_dark_decodes_without_ignore_flag() {
    let cmd = decode_command(r#"{"op":"set_dark","enabled":false}"#).expect("decode");
    assert_eq!(cmd, Command::SetDark { enabled: false, ignore_if_dark: None });
}

#[test]
fn set_ignore_decodes_from_wire_shape() {
    let cmd = decode_command(r#"{"op":"set_ignore_if_dark","ignore":true}"#).expect("decode");
    assert_eq!(cmd, Command::SetIgnoreIfDark { ignore: true });
}

#[test]
fn get_theme_round_trips() {
    let raw = encode_command(&Command::GetTheme).expect("encode");
    assert_eq!(decode_command(&raw).expect("decode"), Command::GetTheme);
}

#[test]
fn theme_reply_wire_shape() {
    let raw = encode_reply(&Reply::Theme(Theme::Light)).expect("encode");
    assert_eq!(raw, r#"{"kind":"theme","value":"light"}"#);
    assert_eq!(decode_reply(r#"{"kind":"ack"}"#).expect("decode"), Reply::Ack);
}

#[test]
fn decode_rejects_unknown_operation() {
    let err = decode_command(r#"{"op":"invert"}"#).expect_err("should fail");
    assert!(matches!(err, ProtocolError::Decode(_)));
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_reply("not json").is_err());
}
