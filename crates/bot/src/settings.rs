//! Layered configuration loading
//!
//! Precedence, lowest first: built-in defaults, the TOML file, then
//! `TRIARB_<SECTION>__<KEY>` environment variables.

use std::collections::HashMap;
use std::env;
use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};

use triarb_core::BotConfig;

pub const ENV_PREFIX: &str = "TRIARB";
/// Overrides the config file location; the file is then mandatory
pub const CONFIG_ENV: &str = "TRIARB_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "triarb.toml";

/// Load and validate settings from the process environment
pub fn load_settings() -> anyhow::Result<BotConfig> {
    match env::var(CONFIG_ENV) {
        Ok(path) => load_settings_from(Path::new(&path), true, None),
        Err(_) => load_settings_from(Path::new(DEFAULT_CONFIG_FILE), false, None),
    }
}

/// Load and validate settings from `path`.
///
/// `vars` replaces the process environment when given.
pub fn load_settings_from(
    path: &Path,
    required: bool,
    vars: Option<HashMap<String, String>>,
) -> anyhow::Result<BotConfig> {
    let file = path
        .to_str()
        .with_context(|| format!("config path {} is not valid UTF-8", path.display()))?;

    let settings = Config::builder()
        .add_source(File::new(file, FileFormat::Toml).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(vars),
        )
        .build()
        .with_context(|| format!("loading configuration from {}", path.display()))?;

    let config: BotConfig = settings
        .try_deserialize()
        .context("deserializing configuration")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use triarb_core::LogFormat;

    fn temp_toml(name: &str, body: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("triarb-{}-{}.toml", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults_without_file() {
        let config =
            load_settings_from(Path::new("/nonexistent/triarb.toml"), false, vars(&[])).unwrap();

        assert_eq!(config.detection.reference_currency.as_str(), "usdt");
        assert_eq!(config.detection.fee, 0.002);
        assert_eq!(config.provider.base_url, "https://api.huobi.pro");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_required_file_missing() {
        assert!(load_settings_from(Path::new("/nonexistent/triarb.toml"), true, vars(&[])).is_err());
    }

    #[test]
    fn test_file_values() {
        let path = temp_toml(
            "file",
            r#"
[detection]
reference_currency = "BTC"
book_levels = 3

[report]
min_volume = 10.0

[logging]
format = "json"
"#,
        );
        let config = load_settings_from(&path, true, vars(&[])).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.detection.reference_currency.as_str(), "btc");
        assert_eq!(config.detection.book_levels, 3);
        assert_eq!(config.detection.scan_interval_ms, 1_000);
        assert_eq!(config.report.min_volume, 10.0);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_env_overrides_file() {
        let path = temp_toml("env", "[detection]\nfee = 0.001\nscan_interval_ms = 500\n");
        let config = load_settings_from(
            &path,
            true,
            vars(&[
                ("TRIARB_DETECTION__FEE", "0.003"),
                ("TRIARB_PROVIDER__MAX_RETRIES", "5"),
            ]),
        )
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.detection.fee, 0.003);
        assert_eq!(config.detection.scan_interval_ms, 500);
        assert_eq!(config.provider.max_retries, 5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = load_settings_from(
            Path::new("/nonexistent/triarb.toml"),
            false,
            vars(&[("TRIARB_DETECTION__FEE", "1.5")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("fee"), "unexpected: {err}");
    }
}
