//! Settings persistence tests.

use mentorboard::mode::EditMode;
use mentorboard::settings::Settings;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.json"));
    assert_eq!(settings, Settings::default());
    assert!(settings.show_colors);
    assert_eq!(settings.export_file_name, "WIDA-Explain-Draft.txt");
    assert!(!settings.rollback_on_cancel);
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let settings = Settings {
        show_colors: false,
        default_mode: EditMode::Discourse,
        lessons_dir: Some(PathBuf::from("/srv/lessons")),
        rollback_on_cancel: true,
        ..Settings::default()
    };
    settings.save_to(&path).unwrap();

    assert_eq!(Settings::load_from(&path), settings);
}

#[test]
fn test_malformed_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "show_colors = false").unwrap();

    assert!(Settings::try_load(&path).is_err());
    assert_eq!(Settings::load_from(&path), Settings::default());
}

#[test]
fn test_invalid_values_are_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "drag_activation_distance": -3.0, "export_file_name": "../escape.txt", "default_mode": "PHRASE" }"#,
    )
    .unwrap();

    let settings = Settings::load_from(&path);
    assert_eq!(settings.drag_activation_distance, 5.0);
    assert_eq!(settings.export_file_name, "WIDA-Explain-Draft.txt");
    assert_eq!(settings.default_mode, EditMode::Phrase);
}
