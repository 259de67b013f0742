use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn folio_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_folio"))
}

/// Run the binary with a scrubbed environment rooted at `home`.
fn folio(home: &Path, lang: Option<&str>, args: &[&str]) -> Output {
    let mut command = Command::new(folio_bin());
    command
        .env_clear()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("FOLIO_LOG", "off")
        .args(args);
    if let Some(lang) = lang {
        command.env("LANG", lang);
    }
    command.output().expect("run folio binary")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn locale_follows_language_until_chosen() {
    let home = tempdir().expect("tempdir");

    let first = folio(home.path(), Some("es_PE.UTF-8"), &["locale", "show", "--json"]);
    assert!(first.status.success());
    let json = stdout_json(&first);
    assert_eq!(json["locale"], "es");
    assert_eq!(json["switch_label"], "EN");
    assert_eq!(json["switch_aria_label"], "Switch to English");

    let set = folio(home.path(), Some("es_PE.UTF-8"), &["locale", "set", "en"]);
    assert!(set.status.success());
    assert_eq!(stdout_text(&set), "en");

    let prefs = home.path().join("config/folio/preferences.json");
    let stored: Value = serde_json::from_str(&fs::read_to_string(&prefs).expect("prefs")).unwrap();
    assert_eq!(stored["locale"], "en");

    let detect = folio(home.path(), Some("es_PE.UTF-8"), &["locale", "detect", "--json"]);
    let json = stdout_json(&detect);
    assert_eq!(json["locale"], "en");
    assert_eq!(json["source"], "stored");
}

#[test]
fn translate_uses_active_locale_and_echoes_unknown_keys() {
    let home = tempdir().expect("tempdir");

    let about = folio(home.path(), Some("es_CL.UTF-8"), &["t", "nav.about"]);
    assert_eq!(stdout_text(&about), "Acerca de");

    let missing = folio(home.path(), None, &["t", "nav.nowhere", "--json"]);
    assert!(missing.status.success());
    let json = stdout_json(&missing);
    assert_eq!(json["value"], "nav.nowhere");
    assert_eq!(json["found"], false);
    assert_eq!(json["locale"], "en");
}

#[test]
fn malformed_table_serves_builtin_text_but_fails_check() {
    let home = tempdir().expect("tempdir");
    let table = home.path().join("bad.json");
    fs::write(&table, r#"{ "en": { "nav": { "about": 42 } } }"#).expect("write table");
    let table = table.to_str().unwrap();

    let about = folio(home.path(), None, &["t", "nav.about", "--table", table]);
    assert!(about.status.success());
    assert_eq!(stdout_text(&about), "About");

    let check = folio(home.path(), None, &["check", "--table", table]);
    assert_eq!(check.status.code(), Some(3));
}

#[test]
fn theme_toggle_persists_explicit_choice() {
    let home = tempdir().expect("tempdir");

    let shown = folio(home.path(), None, &["theme", "show", "--json"]);
    let json = stdout_json(&shown);
    assert_eq!(json["mode"], "system");
    assert_eq!(json["resolved"], "light");
    assert_eq!(json["toggle_label"], "Switch to dark theme");

    let toggled = folio(home.path(), None, &["theme", "toggle", "--json"]);
    assert_eq!(stdout_json(&toggled)["mode"], "dark");

    let again = folio(home.path(), None, &["theme", "show", "--json"]);
    let json = stdout_json(&again);
    assert_eq!(json["mode"], "dark");
    assert_eq!(json["toggle_label"], "Switch to light theme");
}

#[test]
fn check_fails_on_asymmetric_table() {
    let home = tempdir().expect("tempdir");
    let table = home.path().join("table.json");
    fs::write(
        &table,
        r#"{ "en": { "a": "A", "b": "B" }, "es": { "a": "Á" } }"#,
    )
    .expect("write table");

    let output = folio(
        home.path(),
        None,
        &["check", "--table", table.to_str().unwrap(), "--json"],
    );
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["status"], "incomplete");
    assert_eq!(json["locales"][1]["missing"][0], "b");
}

#[test]
fn type_prints_reveal_schedule() {
    let home = tempdir().expect("tempdir");
    let output = folio(
        home.path(),
        None,
        &["type", "Hi", "--speed-ms", "100", "--delay-ms", "300", "--json"],
    );
    assert!(output.status.success());
    let frames = stdout_json(&output);
    let frames = frames.as_array().expect("array of frames");
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[1]["elapsed_ms"], 400);
    assert_eq!(frames[1]["display_text"], "H");
    assert_eq!(frames[2]["display_text"], "Hi");
    assert_eq!(frames[2]["is_complete"], true);
}

#[test]
fn invalid_config_reports_error_json() {
    let home = tempdir().expect("tempdir");
    let config = home.path().join("folio.toml");
    fs::write(&config, "[typewriter]\nspeed_ms = 0\n").expect("write config");

    let output = folio(
        home.path(),
        None,
        &["--config", config.to_str().unwrap(), "type", "x", "--json"],
    );
    assert_eq!(output.status.code(), Some(1));
    let error: Value = serde_json::from_slice(&output.stderr).expect("stderr is JSON");
    assert_eq!(error["status"], "error");
    assert!(
        error["error"]
            .as_str()
            .unwrap()
            .contains("typewriter.speed_ms must be > 0")
    );
}
