use fingerbox_joinery::{BoxDimensions, InMemoryKernel, TabSizing};
use fingerbox_settings::{Config, SettingsError};
use tempfile::TempDir;

fn custom_config() -> Config {
    let mut config = Config::new();
    config.name = "Tool Tray".to_string();
    config.dimensions = BoxDimensions::new(120.0, 200.0, 45.0, 3.0);
    config.tabs = TabSizing::absolute(12.0);
    config
}

#[test]
fn test_toml_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tray.toml");

    let config = custom_config();
    config.save_to_file(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("name = \"Tool Tray\""));
    assert!(content.contains("[dimensions]"));
    assert!(content.contains("scale = \"absolute\""));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tray.json");

    let config = custom_config();
    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fingerbox").join("nested").join("config.toml");

    Config::new().save_to_file(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_save_under_a_file_reports_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, "occupied").unwrap();

    let err = Config::new()
        .save_to_file(&blocker.join("config.toml"))
        .unwrap_err();
    assert!(matches!(err, SettingsError::IoError(_)));
    assert!(err.to_string().starts_with("I/O error: "));
}

#[test]
fn test_partial_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("partial.toml");
    std::fs::write(&path, "name = \"Small\"\n").unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.name, "Small");
    assert_eq!(loaded.dimensions, BoxDimensions::default());
    assert_eq!(loaded.tabs, TabSizing::default());
}

#[test]
fn test_load_or_default_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.toml");

    let loaded = Config::load_or_default(&path).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_invalid_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(
        &path,
        "[dimensions]\nwidth = 10.0\nlength = 30.0\nheight = 10.0\nmaterial_thickness = 6.0\n",
    )
    .unwrap();

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::InvalidSetting { ref key, .. }) if key == "dimensions"
    ));

    let garbled = temp_dir.path().join("garbled.json");
    std::fs::write(&garbled, "{ not json").unwrap();
    assert!(matches!(
        Config::load_from_file(&garbled),
        Err(SettingsError::JsonError(_))
    ));
}

#[test]
fn test_invalid_config_is_not_saved() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    let mut config = Config::new();
    config.dimensions.height = -1.0;
    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());

    assert!(matches!(
        Config::new().save_to_file(&temp_dir.path().join("config.ini")),
        Err(SettingsError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_loaded_config_assembles() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tray.toml");
    custom_config().save_to_file(&path).unwrap();

    let config = Config::load_from_file(&path).unwrap();
    let mut kernel = InMemoryKernel::new(config.tolerance);
    let root = kernel.root();
    let assembled = config.assembler().assemble(&mut kernel, root).unwrap();

    assert_eq!(assembled.joints.len(), 2);
    assert_eq!(assembled.layout.tab_count(), 17);
}
