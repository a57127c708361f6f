use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

use super::types::{AutoAcceptConfig, HookMode};

pub const CONFIG_PATH_ENV: &str = "AUTO_ACCEPT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "auto-accept.toml";

/// `AUTO_ACCEPT_CONFIG`, else `./auto-accept.toml` if present, else the
/// per-user config directory.
pub fn default_config_path() -> PathBuf {
    if let Ok(v) = std::env::var(CONFIG_PATH_ENV) {
        if !v.trim().is_empty() {
            return PathBuf::from(shellexpand::tilde(&v).into_owned());
        }
    }

    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return local.to_path_buf();
    }

    dirs::config_dir()
        .map(|d| d.join("auto-accept").join("config.toml"))
        .unwrap_or_else(|| local.to_path_buf())
}

/// Loads the file if present (defaults otherwise), then applies
/// `AUTO_ACCEPT_*` env overrides. Does not validate; callers decide when
/// validation failures are fatal.
pub fn load(path: &Path) -> Result<AutoAcceptConfig, ConfigError> {
    let mut cfg: AutoAcceptConfig = if path.exists() {
        let s = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str::<AutoAcceptConfig>(&s).map_err(|e| ConfigError::Parse(e.into()))?
    } else {
        AutoAcceptConfig::default()
    };

    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}

/// Defaults plus env overrides, ignoring any file on disk.
pub fn reset() -> Result<AutoAcceptConfig, ConfigError> {
    let mut cfg = AutoAcceptConfig::default();
    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}

pub fn save(cfg: &AutoAcceptConfig, path: &Path) -> Result<(), ConfigError> {
    let body = toml::to_string_pretty(cfg).map_err(|e| ConfigError::Parse(e.into()))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    std::fs::write(path, body).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn apply_env_overrides(cfg: &mut AutoAcceptConfig) -> Result<(), ConfigError> {
    if let Some(v) = env_nonempty("AUTO_ACCEPT_ENABLED") {
        cfg.enabled = parse_bool("AUTO_ACCEPT_ENABLED", &v)?;
    }
    if let Some(v) = env_nonempty("AUTO_ACCEPT_SESSION_TIMEOUT_SECS") {
        cfg.session_timeout_secs = parse_num("AUTO_ACCEPT_SESSION_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = env_nonempty("AUTO_ACCEPT_MAX_ACCEPTS") {
        cfg.max_auto_accepts = parse_num("AUTO_ACCEPT_MAX_ACCEPTS", &v)?;
    }
    if let Some(v) = env_nonempty("AUTO_ACCEPT_ALLOWED_OPERATIONS") {
        cfg.allowed_operations = split_csv(&v);
    }
    if let Some(v) = env_nonempty("AUTO_ACCEPT_WHITELIST_PATTERNS") {
        cfg.whitelist_patterns = split_csv(&v);
    }
    if let Some(v) = env_nonempty("AUTO_ACCEPT_BYPASS_PATTERNS") {
        cfg.bypass_patterns = split_csv(&v);
    }
    if let Some(v) = env_nonempty("AUTO_ACCEPT_DANGER_PATTERNS") {
        cfg.danger_patterns = split_csv(&v);
    }
    if let Some(v) = env_nonempty("AUTO_ACCEPT_SAFETY_CHECKS") {
        cfg.safety_checks_enabled = parse_bool("AUTO_ACCEPT_SAFETY_CHECKS", &v)?;
    }
    if let Some(v) = env_nonempty("AUTO_ACCEPT_HOOK_MODE") {
        cfg.hook_mode = match v.trim().to_ascii_lowercase().as_str() {
            "passive" => HookMode::Passive,
            "active" => HookMode::Active,
            _ => {
                return Err(ConfigError::EnvInvalid {
                    key: "AUTO_ACCEPT_HOOK_MODE".to_string(),
                    value: v,
                })
            }
        };
    }
    if let Some(v) = env_nonempty("AUTO_ACCEPT_AUDIT_LOG") {
        cfg.audit_log_path = shellexpand::tilde(&v).into_owned();
    }
    if let Some(v) = env_nonempty("AUTO_ACCEPT_LOG_DIR") {
        cfg.log_dir = shellexpand::tilde(&v).into_owned();
    }
    Ok(())
}

fn env_nonempty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

fn parse_bool(key: &str, v: &str) -> Result<bool, ConfigError> {
    match v.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::EnvInvalid {
            key: key.to_string(),
            value: v.to_string(),
        }),
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, v: &str) -> Result<T, ConfigError> {
    v.trim().parse::<T>().map_err(|_| ConfigError::EnvInvalid {
        key: key.to_string(),
        value: v.to_string(),
    })
}

fn split_csv(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
