use loader::{defaults, load_settings, Settings, Severity};
use std::fs;
use tempfile::tempdir;

#[test]
fn defaults_watch_request_superglobals() {
    let settings = Settings::default();
    let sg = &settings.nonce_verification.superglobals;
    assert_eq!(sg.get("$_POST"), Some(&Severity::Error));
    assert_eq!(sg.get("$_FILES"), Some(&Severity::Error));
    assert_eq!(sg.get("$_GET"), Some(&Severity::Warning));
    assert_eq!(sg.get("$_REQUEST"), Some(&Severity::Warning));
    assert!(settings.nonce_verification.enabled);
    assert!(!settings.global_override.treat_files_as_scoped);
}

#[test]
fn loads_yaml_and_keeps_defaults_for_missing_sections() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("wpsec.yml");
    fs::write(
        &path,
        r#"global_override:
  custom_protected_globals: [my_plugin_state]
  custom_test_classes: [My_TestCase]
"#,
    )?;
    let settings = load_settings(&path)?;
    assert_eq!(
        settings.global_override.custom_protected_globals,
        ["my_plugin_state"]
    );
    assert!(settings.global_override.enabled);
    assert_eq!(settings.nonce_verification.superglobals.len(), 4);
    Ok(())
}

#[test]
fn loads_json() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("wpsec.json");
    fs::write(
        &path,
        r#"{"nonce_verification": {"enabled": false, "superglobals": {"$_COOKIE": "warning"}}}"#,
    )?;
    let settings = load_settings(&path)?;
    assert!(!settings.nonce_verification.enabled);
    assert_eq!(settings.nonce_verification.superglobals.len(), 1);
    Ok(())
}

#[test]
fn rejects_unknown_fields() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("wpsec.yaml");
    fs::write(&path, "nonce_verification:\n  custom_nonce_functions: [x]\n")?;
    let err = load_settings(&path).unwrap_err();
    assert!(err.downcast_ref::<serde_yaml::Error>().is_some());
    Ok(())
}

#[test]
fn rejects_superglobal_without_dollar() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("wpsec.yaml");
    fs::write(&path, "nonce_verification:\n  superglobals:\n    _POST: error\n")?;
    let err = load_settings(&path).unwrap_err();
    assert!(format!("{err:#}").contains("'_POST'"));
    Ok(())
}

#[test]
fn rejects_unsupported_extension() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("wpsec.ini");
    fs::write(&path, "x=1")?;
    let err = load_settings(&path).unwrap_err();
    assert!(err.to_string().contains("unsupported settings format"));
    Ok(())
}

#[test]
fn curated_lists_cover_core_names() {
    assert!(defaults::WP_GLOBALS.contains(&"wpdb"));
    assert!(defaults::WP_GLOBALS.contains(&"post"));
    assert!(defaults::SANITIZING_FUNCTIONS.contains(&"sanitize_text_field"));
    assert!(defaults::UNSLASHING_SANITIZING_FUNCTIONS.contains(&"absint"));
    assert!(defaults::TEST_CLASSES.contains(&"WP_UnitTestCase"));
    assert_eq!(defaults::VERIFICATION_FUNCTIONS.len(), 3);
}
