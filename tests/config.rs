#[cfg(test)]
mod tests {
    use taskflow::libs::config::{Config, GeneralConfig, SyncConfig, DEFAULT_SYNC_INTERVAL_SECS};
    use taskflow::libs::project::ProjectMode;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext { _temp_dir: temp_dir }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_without_file_yields_defaults(_ctx: &mut ConfigTestContext) {
        let config = Config::read().unwrap();
        assert_eq!(config.general.default_mode, ProjectMode::Personal);
        assert_eq!(config.sync.interval_secs, DEFAULT_SYNC_INTERVAL_SECS);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_roundtrip(_ctx: &mut ConfigTestContext) {
        let config = Config {
            general: GeneralConfig {
                default_mode: ProjectMode::Professional,
                timezone_offset_minutes: -300,
            },
            sync: SyncConfig { interval_secs: 120 },
        };
        config.save().unwrap();

        let loaded = Config::read().unwrap();
        assert_eq!(loaded, config);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file_fills_missing_sections(_ctx: &mut ConfigTestContext) {
        let path = taskflow::libs::data_storage::DataStorage::new()
            .get_path("config.json")
            .unwrap();
        std::fs::write(
            &path,
            r#"{"general": {"default_mode": "professional", "timezone_offset_minutes": 60}}"#,
        )
        .unwrap();

        let config = Config::read().unwrap();
        assert_eq!(config.general.default_mode, ProjectMode::Professional);
        assert_eq!(config.general.timezone_offset_minutes, 60);
        assert_eq!(config.sync.interval_secs, DEFAULT_SYNC_INTERVAL_SECS);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_malformed_file_is_an_error(_ctx: &mut ConfigTestContext) {
        let path = taskflow::libs::data_storage::DataStorage::new()
            .get_path("config.json")
            .unwrap();
        std::fs::write(&path, "not json at all").unwrap();

        assert!(Config::read().is_err());
    }
}
