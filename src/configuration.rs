use std::env;

use crate::store::UpdatePolicy;

/// Runtime settings loaded from environment variables (and `.env`).
///
/// | Env Var                | Default         |
/// |------------------------|-----------------|
/// | `CARTON_APP_NAME`      | `carton_record` |
/// | `CARTON_LOG_FILTER`    | `info`          |
/// | `CARTON_UPDATE_POLICY` | `lenient`       |
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub app_name: String,
    pub log_filter: String,
    pub update_policy: UpdatePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "carton_record".to_string(),
            log_filter: "info".to_string(),
            update_policy: UpdatePolicy::Lenient,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let app_name = lookup("CARTON_APP_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.app_name);

        let log_filter = lookup("CARTON_LOG_FILTER")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        let update_policy = match lookup("CARTON_UPDATE_POLICY") {
            Some(value) => value
                .parse::<UpdatePolicy>()
                .map_err(|e| anyhow::anyhow!("CARTON_UPDATE_POLICY: {}", e))?,
            None => defaults.update_policy,
        };

        Ok(Self {
            app_name,
            log_filter,
            update_policy,
        })
    }
}
