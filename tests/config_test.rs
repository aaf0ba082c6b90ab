use tempfile::TempDir;

#[test]
fn test_config_lifecycle() {
    // Create a temporary directory for test config
    let temp_dir = TempDir::new().unwrap();

    // Override the config path for testing
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    // Test that config doesn't exist initially
    assert!(!livepad::config::Config::exists().unwrap());

    // Create and save a config
    let config = livepad::config::Config::new();
    config.save().unwrap();

    // Verify it exists now
    assert!(livepad::config::Config::exists().unwrap());

    // Load and verify values
    let loaded = livepad::config::Config::load().unwrap();
    assert_eq!(loaded.default_play_mode, "once");
    assert!(loaded.autoload_recent);
    assert!(!loaded.normalize_clip_names);

    // Test config mutation
    let mut config = livepad::config::Config::load().unwrap();
    config.set_value("default_play_mode", "loop").unwrap();
    config.set_value("normalize_clip_names", "true").unwrap();
    config.save().unwrap();

    // Verify mutations persisted
    let reloaded = livepad::config::Config::load().unwrap();
    assert_eq!(reloaded.default_play_mode, "loop");
    assert!(reloaded.normalize_clip_names);

    // Test invalid key and invalid values
    let mut config = livepad::config::Config::load().unwrap();
    assert!(config.set_value("invalid_key", "value").is_err());
    assert!(config.set_value("default_play_mode", "bounce").is_err());
    assert!(config.set_value("autoload_recent", "maybe").is_err());
}
