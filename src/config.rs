//! User configuration (`config.toml`).

use directories::ProjectDirs;
use jotcalc_engine::engine::NumberLocale;
use jotcalc_engine::timezone::LocalZone;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    format: Option<FormatSection>,
    time: Option<TimeSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FormatSection {
    group_separator: Option<String>,
    decimal_separator: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimeSection {
    local_zone: Option<String>,
}

/// Settings after validation. Anything missing or rejected keeps its default.
#[derive(Debug, Default, PartialEq)]
pub struct Config {
    pub locale: NumberLocale,
    pub local_zone: Option<LocalZone>,
}

pub fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("me", "shoryuken", "jotcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Load the config from `config_file`, or from the default location.
/// Problems are returned as warnings; they never stop the program.
pub fn load_config(config_file: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.map(Path::to_path_buf).or_else(default_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let content = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            return (Config::default(), warnings);
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                return (Config::default(), warnings);
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            return (Config::default(), warnings);
        }
    };

    let (config, parse_warnings) = parse_config(&content);
    warnings.extend(
        parse_warnings
            .into_iter()
            .map(|w| format!("{}: {}", path.display(), w)),
    );
    (config, warnings)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut config = Config::default();

    let file = match toml::from_str::<ConfigFile>(content) {
        Ok(file) => file,
        Err(err) => {
            warnings.push(format!("Failed to parse: {}", err));
            return (config, warnings);
        }
    };

    if let Some(format) = file.format {
        let mut locale = config.locale.clone();
        if let Some(group) = format.group_separator {
            locale.group_separator = group;
        }
        if let Some(decimal) = format.decimal_separator {
            locale.decimal_separator = decimal;
        }
        if locale.decimal_separator.is_empty() {
            warnings.push("format.decimal_separator must not be empty".to_string());
        } else if locale.decimal_separator == locale.group_separator {
            warnings.push(format!(
                "format.decimal_separator and format.group_separator are both '{}'",
                locale.decimal_separator
            ));
        } else {
            config.locale = locale;
        }
    }

    if let Some(zone) = file.time.and_then(|t| t.local_zone) {
        match LocalZone::parse(&zone) {
            Some(local) => config.local_zone = Some(local),
            None => warnings.push(format!("Unknown time zone '{}' in time.local_zone", zone)),
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;

    #[test]
    fn default_config_path_is_deterministic() {
        // Should never panic and should either be Some(path) or None.
        let _ = default_config_path();
    }

    #[test]
    fn test_empty_config_is_default() {
        let (config, warnings) = parse_config("");
        assert_eq!(config, Config::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_full_config() {
        let content = r#"
[format]
group_separator = "."
decimal_separator = ","

[time]
local_zone = "Asia/Kolkata"
"#;
        let (config, warnings) = parse_config(content);
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(config.locale.group_separator, ".");
        assert_eq!(config.locale.decimal_separator, ",");
        assert_eq!(config.local_zone, Some(LocalZone::Named(Tz::Asia__Kolkata)));
    }

    #[test]
    fn test_zone_abbreviation() {
        let (config, _) = parse_config("[time]\nlocal_zone = \"est\"\n");
        assert_eq!(config.local_zone, Some(LocalZone::Named(Tz::America__New_York)));
    }

    #[test]
    fn test_unknown_field_is_warning() {
        let (config, warnings) = parse_config("[format]\nthousands = \" \"\n");
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
    }

    #[test]
    fn test_clashing_separators_keep_default() {
        let (config, warnings) = parse_config("[format]\ndecimal_separator = \",\"\n");
        assert_eq!(config.locale, NumberLocale::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unknown_zone_is_warning() {
        let (config, warnings) = parse_config("[time]\nlocal_zone = \"Mars/Olympus\"\n");
        assert!(config.local_zone.is_none());
        assert!(warnings[0].contains("Mars/Olympus"));
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let path = std::env::temp_dir().join("jotcalc_no_such_config.toml");
        let (config, warnings) = load_config(Some(path.as_path()));
        assert_eq!(config, Config::default());
        assert!(warnings[0].contains("not found"));
    }
}
