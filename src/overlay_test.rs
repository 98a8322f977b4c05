use super::*;
use crate::page::Element;
use crate::test_support::FakePage;

fn controller(page: FakePage) -> OverlayController<FakePage> {
    OverlayController::new(page, AbsentPolicy::Enable)
}

// =============================================================
// Idempotence
// =============================================================

#[test]
fn apply_twice_leaves_one_stylesheet() {
    let mut ctl = controller(FakePage::light());
    ctl.apply_overlay().expect("apply");
    ctl.apply_overlay().expect("apply again");
    assert_eq!(ctl.page().style_count(STYLE_ID), 1);
    assert!(ctl.is_active());
}

#[test]
fn remove_twice_leaves_none_without_error() {
    let mut ctl = controller(FakePage::light());
    ctl.apply_overlay().expect("apply");
    ctl.remove_overlay().expect("remove");
    ctl.remove_overlay().expect("remove again");
    assert_eq!(ctl.page().style_count(STYLE_ID), 0);
    assert!(!ctl.is_active());
}

#[test]
fn remove_on_fresh_page_is_noop() {
    let mut ctl = controller(FakePage::unknown());
    ctl.remove_overlay().expect("remove");
    assert!(!ctl.is_active());
}

#[test]
fn apply_surfaces_page_errors() {
    let mut page = FakePage::light();
    page.fail_writes = true;
    let mut ctl = controller(page);
    assert!(ctl.apply_overlay().is_err());
    assert!(!ctl.is_active());
}

// =============================================================
// set_dark_enabled
// =============================================================

#[test]
fn disabling_removes_overlay() {
    let mut ctl = controller(FakePage::light());
    ctl.set_dark_enabled(true, None).expect("enable");
    assert!(ctl.is_active());
    ctl.set_dark_enabled(false, None).expect("disable");
    assert!(!ctl.is_active());
}

#[test]
fn ignore_if_dark_skips_dark_page() {
    let mut ctl = controller(FakePage::dark());
    ctl.set_dark_enabled(true, Some(true)).expect("enable");
    assert!(!ctl.is_active());
}

#[test]
fn ignore_if_dark_still_applies_to_light_page() {
    let mut ctl = controller(FakePage::light());
    ctl.set_dark_enabled(true, Some(true)).expect("enable");
    assert!(ctl.is_active());
}

#[test]
fn enabling_without_ignore_applies_to_dark_page() {
    let mut ctl = controller(FakePage::dark());
    ctl.set_dark_enabled(true, Some(false)).expect("enable");
    assert!(ctl.is_active());
}

#[test]
fn omitted_ignore_flag_keeps_previous_value() {
    let mut ctl = controller(FakePage::dark());
    ctl.set_ignore_if_dark(true).expect("ignore");
    ctl.set_dark_enabled(true, None).expect("enable");
    assert!(ctl.preferences().ignore_if_dark);
    assert!(!ctl.is_active());
}

#[test]
fn repeated_enable_does_not_duplicate_stylesheet() {
    let mut ctl = controller(FakePage::light());
    for _ in 0..3 {
        ctl.set_dark_enabled(true, None).expect("enable");
    }
    assert_eq!(ctl.page().style_count(STYLE_ID), 1);
}

// =============================================================
// set_ignore_if_dark
// =============================================================

#[test]
fn turning_ignore_on_removes_overlay_from_dark_page() {
    let mut ctl = controller(FakePage::dark());
    ctl.set_dark_enabled(true, Some(false)).expect("enable");
    assert!(ctl.is_active());

    ctl.set_ignore_if_dark(true).expect("ignore");
    assert!(!ctl.is_active());
}

#[test]
fn turning_ignore_on_keeps_overlay_on_light_page() {
    let mut ctl = controller(FakePage::light());
    ctl.set_dark_enabled(true, Some(false)).expect("enable");
    ctl.set_ignore_if_dark(true).expect("ignore");
    assert!(ctl.is_active());
}

#[test]
fn turning_ignore_off_reapplies_for_enabled_dark_page() {
    let mut ctl = controller(FakePage::dark());
    ctl.set_dark_enabled(true, Some(true)).expect("enable");
    assert!(!ctl.is_active());

    ctl.set_ignore_if_dark(false).expect("unignore");
    assert!(ctl.is_active());
}

#[test]
fn turning_ignore_off_respects_disabled_flag() {
    let mut ctl = controller(FakePage::unknown());
    ctl.set_dark_enabled(false, None).expect("disable");
    ctl.set_ignore_if_dark(false).expect("unignore");
    assert!(!ctl.is_active());
}

#[test]
fn ignore_toggle_with_auto_detect_applies_only_to_unknown_pages() {
    let mut unknown = OverlayController::new(FakePage::unknown(), AbsentPolicy::AutoDetect);
    unknown.set_ignore_if_dark(false).expect("unignore");
    assert!(unknown.is_active());

    let mut light = OverlayController::new(FakePage::light(), AbsentPolicy::AutoDetect);
    light.set_ignore_if_dark(false).expect("unignore");
    assert!(!light.is_active());
}

// =============================================================
// Detection with overlay present
// =============================================================

#[test]
fn theme_measures_page_without_overlay() {
    let mut ctl = controller(FakePage::light());
    ctl.set_dark_enabled(true, Some(false)).expect("enable");
    assert!(ctl.is_active());
    assert_eq!(ctl.theme(), Theme::Light);
    assert!(ctl.page().styles.iter().all(|(_, enabled)| *enabled));
}

#[test]
fn failed_resume_reinserts_a_painting_stylesheet() {
    let mut page = FakePage::light();
    page.fail_resume = true;
    let mut ctl = controller(page);
    ctl.apply_overlay().expect("apply");

    assert_eq!(ctl.theme(), Theme::Light);
    assert!(ctl.is_active());
    assert_eq!(ctl.page().styles, vec![(STYLE_ID.to_owned(), true)]);
}

#[test]
fn ignore_on_light_page_is_stable_across_reconciles() {
    let mut ctl = controller(FakePage::light());
    ctl.set_dark_enabled(true, Some(true)).expect("enable");
    for _ in 0..3 {
        ctl.reconcile().expect("reconcile");
        assert!(ctl.is_active());
    }
}

// =============================================================
// restore
// =============================================================

#[test]
fn restore_enabled_applies_unless_ignored_dark() {
    let mut ctl = controller(FakePage::light());
    assert!(ctl.restore(Preferences { dark_mode: Some(true), ignore_if_dark: true }).expect("restore"));
    assert!(ctl.is_active());

    let mut ctl = controller(FakePage::dark());
    ctl.restore(Preferences { dark_mode: Some(true), ignore_if_dark: true }).expect("restore");
    assert!(!ctl.is_active());
}

#[test]
fn restore_with_absent_flag_follows_policy() {
    let absent = Preferences { dark_mode: None, ignore_if_dark: false };

    let mut enable = OverlayController::new(FakePage::light(), AbsentPolicy::Enable);
    enable.restore(absent).expect("restore");
    assert!(enable.is_active());

    let mut disable = OverlayController::new(FakePage::unknown(), AbsentPolicy::Disable);
    disable.restore(absent).expect("restore");
    assert!(!disable.is_active());

    let mut auto_light = OverlayController::new(FakePage::light(), AbsentPolicy::AutoDetect);
    auto_light.restore(absent).expect("restore");
    assert!(!auto_light.is_active());

    let mut auto_dark = OverlayController::new(FakePage::dark(), AbsentPolicy::AutoDetect);
    auto_dark.restore(absent).expect("restore");
    assert!(!auto_dark.is_active());

    let mut auto_unknown = OverlayController::new(FakePage::unknown(), AbsentPolicy::AutoDetect);
    auto_unknown.restore(absent).expect("restore");
    assert!(auto_unknown.is_active());

    let absent_ignoring = Preferences { dark_mode: None, ignore_if_dark: true };
    let mut auto_ignoring = OverlayController::new(FakePage::unknown(), AbsentPolicy::AutoDetect);
    auto_ignoring.restore(absent_ignoring).expect("restore");
    assert!(!auto_ignoring.is_active());
}

#[test]
fn restore_keeps_commanded_enable_flag() {
    let mut ctl = controller(FakePage::dark());
    ctl.set_dark_enabled(true, None).expect("enable");
    let applied = ctl.restore(Preferences { dark_mode: Some(false), ignore_if_dark: true }).expect("restore");
    assert!(applied);
    assert_eq!(ctl.preferences(), Preferences { dark_mode: Some(true), ignore_if_dark: true });
    assert!(!ctl.is_active());
}

#[test]
fn restore_fills_enable_flag_after_ignore_command() {
    let mut ctl = controller(FakePage::light());
    ctl.set_ignore_if_dark(false).expect("unignore");
    assert!(ctl.is_active());

    let applied = ctl.restore(Preferences { dark_mode: Some(false), ignore_if_dark: true }).expect("restore");
    assert!(applied);
    assert_eq!(ctl.preferences(), Preferences { dark_mode: Some(false), ignore_if_dark: false });
    assert!(!ctl.is_active());
}

#[test]
fn restore_after_both_flags_commanded_is_skipped() {
    let mut ctl = controller(FakePage::light());
    ctl.set_dark_enabled(false, Some(false)).expect("disable");
    let applied = ctl.restore(Preferences { dark_mode: Some(true), ignore_if_dark: true }).expect("restore");
    assert!(!applied);
    assert!(!ctl.is_active());
    assert_eq!(ctl.preferences(), Preferences { dark_mode: Some(false), ignore_if_dark: false });
}

// =============================================================
// handle
// =============================================================

#[test]
fn handle_get_theme_reports_classification() {
    let mut ctl = controller(FakePage::unknown().with_class(Element::Root, "theme-dark"));
    assert_eq!(ctl.handle(Command::GetTheme), Reply::Theme(Theme::Dark));
    assert!(!ctl.is_active());
}

#[test]
fn handle_set_commands_ack_and_apply() {
    let mut ctl = controller(FakePage::dark());
    assert_eq!(ctl.handle(Command::SetDark { enabled: true, ignore_if_dark: None }), Reply::Ack);
    assert!(ctl.is_active());
    assert_eq!(ctl.handle(Command::SetIgnoreIfDark { ignore: true }), Reply::Ack);
    assert!(!ctl.is_active());
}

#[test]
fn handle_acks_even_when_page_write_fails() {
    let mut page = FakePage::light();
    page.fail_writes = true;
    let mut ctl = controller(page);
    assert_eq!(ctl.handle(Command::SetDark { enabled: true, ignore_if_dark: None }), Reply::Ack);
    assert!(!ctl.is_active());
}
