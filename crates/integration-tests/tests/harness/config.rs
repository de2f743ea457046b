//! Config fixtures for the test server

use vox_config::Config;

/// Gateway config with two speakers and fast supervisor sweeps
pub fn test_config() -> Config {
    let config: Config = toml::from_str(
        r#"
        [broker]
        default_timeout_secs = 5
        sweep_interval_ms = 20

        [speakers.mari]
        languages = ["et"]

        [speakers.voiceA]
        languages = ["en"]
        "#,
    )
    .expect("fixture config must parse");

    config.validate().expect("fixture config must validate");
    config
}

/// Same fixture but with a one second call budget, for timeout tests
pub fn short_timeout_config() -> Config {
    let mut config = test_config();
    config.broker.default_timeout_secs = 1;
    config
}
