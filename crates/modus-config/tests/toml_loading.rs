//! Integration tests for layered configuration loading.
//!
//! Uses figment::Jail for sandboxed env var and file manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use modus_config::ModusConfig;
use modus_core::{SeverityMode, severity_mode};
use pretty_assertions::assert_eq;

#[test]
fn loads_mode_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", r#"mode = "warn""#)?;

        let figment = Figment::from(Serialized::defaults(ModusConfig::default()))
            .merge(Toml::file("config.toml"));
        let config = ModusConfig::from_figment(&figment).expect("config loads");

        assert_eq!(config.mode, SeverityMode::Warn);
        Ok(())
    });
}

#[test]
fn no_sources_means_throw() {
    Jail::expect_with(|_jail| {
        let config = ModusConfig::load().expect("config loads");
        assert_eq!(config.mode, SeverityMode::Throw);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".modus")?;
        jail.create_file(".modus/config.toml", r#"mode = "off""#)?;

        let config = ModusConfig::load().expect("config loads");
        assert_eq!(config.mode, SeverityMode::Off);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".modus")?;
        jail.create_file(".modus/config.toml", r#"mode = "off""#)?;
        jail.set_env("MODUS_MODE", "warn");

        let config = ModusConfig::load().expect("config loads");
        assert_eq!(config.mode, SeverityMode::Warn);
        Ok(())
    });
}

#[test]
fn unknown_mode_is_an_error() {
    Jail::expect_with(|jail| {
        jail.set_env("MODUS_MODE", "loud");

        let err = ModusConfig::load().unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
        Ok(())
    });
}

#[test]
fn load_and_install_sets_process_default() {
    Jail::expect_with(|jail| {
        jail.set_env("MODUS_MODE", "warn");

        let config = ModusConfig::load_and_install().expect("config loads");
        assert_eq!(config.mode, SeverityMode::Warn);
        assert_eq!(severity_mode(), SeverityMode::Warn);

        ModusConfig::default().install();
        assert_eq!(severity_mode(), SeverityMode::Throw);
        Ok(())
    });
}
