//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseConfig, HattoriConfig};
use super::secret::secret_string;
use crate::domain::errors::HattoriError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into HattoriConfig
/// 4. Applies environment variable overrides (HATTORI_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`HattoriError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, the TOML is malformed, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use hattori::config::loader::load_config;
///
/// let config = load_config("hattori.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<HattoriConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HattoriError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        HattoriError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text
pub fn load_config_str(contents: &str) -> Result<HattoriConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: HattoriConfig = toml::from_str(&contents)
        .map_err(|e| HattoriError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        HattoriError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| HattoriError::Configuration(format!("Invalid placeholder pattern: {}", e)))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(HattoriError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        HattoriError::Configuration(format!("Invalid value '{}' for {}", value, name))
    })
}

/// Applies environment variable overrides using HATTORI_* prefix
///
/// Environment variables follow the pattern: HATTORI_<SECTION>_<KEY>
/// For example: HATTORI_DATABASE_CONNECTION_STRING, HATTORI_ANONYMIZATION_LOCALE
fn apply_env_overrides(config: &mut HattoriConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("HATTORI_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("HATTORI_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_override("HATTORI_APPLICATION_DRY_RUN", &val)?;
    }

    // Database overrides
    if let Ok(val) = std::env::var("HATTORI_DATABASE_CONNECTION_STRING") {
        match config.database {
            Some(ref mut database) => database.connection_string = secret_string(val),
            None => config.database = Some(DatabaseConfig::new(secret_string(val))),
        }
    }
    if let Ok(val) = std::env::var("HATTORI_DATABASE_MAX_CONNECTIONS") {
        if let Some(ref mut database) = config.database {
            database.max_connections = parse_override("HATTORI_DATABASE_MAX_CONNECTIONS", &val)?;
        }
    }

    // Anonymization overrides
    if let Ok(val) = std::env::var("HATTORI_ANONYMIZATION_LOCALE") {
        config.anonymization.locale = Some(val);
    }
    if let Ok(val) = std::env::var("HATTORI_ANONYMIZATION_BATCH_SIZE") {
        config.anonymization.batch_size =
            parse_override("HATTORI_ANONYMIZATION_BATCH_SIZE", &val)?;
    }
    if let Ok(val) = std::env::var("HATTORI_ANONYMIZATION_SEED") {
        config.anonymization.seed = Some(parse_override("HATTORI_ANONYMIZATION_SEED", &val)?);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("HATTORI_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("HATTORI_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("HATTORI_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

// Overrides read process-wide variables
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
