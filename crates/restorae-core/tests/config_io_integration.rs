//! Config persistence against a scratch home directory.
//!
//! Runs as its own test binary so redirecting HOME cannot race other tests.

use restorae_core::{Config, ConfigError};

#[test]
fn config_persists_and_reloads_from_disk() {
    let home = tempfile::tempdir().unwrap();
    std::env::set_var("HOME", home.path());
    std::env::set_var("RESTORAE_ENV", "dev");

    // First load writes the defaults.
    let mut cfg = Config::load().unwrap();
    assert_eq!(cfg.session.default_preset, "panic-attack");

    cfg.set("session.default_preset", "overwhelm").unwrap();
    cfg.set("notifications.volume", "75").unwrap();
    assert!(matches!(
        cfg.set("session.no_such_key", "x"),
        Err(ConfigError::UnknownKey(_))
    ));

    let reloaded = Config::load().unwrap();
    assert_eq!(reloaded.session.default_preset, "overwhelm");
    assert_eq!(reloaded.notifications.volume, 75);

    let path = home.path().join(".config/restorae-dev/config.toml");
    assert!(std::fs::metadata(path).is_ok());
}
