use super::*;

#[test]
fn parse_defaults_to_global_enable() {
    let cfg = Config::parse(None, None).expect("defaults");
    assert_eq!(cfg, Config { scope: Scope::Global, absent_policy: AbsentPolicy::Enable });
    assert_eq!(cfg, Config::default());
}

#[test]
fn parse_accepts_per_origin_and_auto_detect() {
    let cfg = Config::parse(Some("per_origin"), Some(" auto_detect ")).expect("overrides");
    assert_eq!(cfg.scope, Scope::PerOrigin);
    assert_eq!(cfg.absent_policy, AbsentPolicy::AutoDetect);
}

#[test]
fn parse_accepts_disable_policy() {
    let cfg = Config::parse(Some("global"), Some("disable")).expect("overrides");
    assert_eq!(cfg.absent_policy, AbsentPolicy::Disable);
}

#[test]
fn parse_rejects_unknown_scope() {
    let err = Config::parse(Some("session"), None).expect_err("should fail");
    assert_eq!(err, ConfigError::Unknown { var: SCOPE_VAR, value: "session".into() });
    assert_eq!(err.to_string(), "unknown NOPHOTON_SCOPE: session");
}

#[test]
fn parse_rejects_unknown_policy() {
    let err = Config::parse(None, Some("sometimes")).expect_err("should fail");
    assert!(matches!(err, ConfigError::Unknown { var: ABSENT_POLICY_VAR, .. }));
}
