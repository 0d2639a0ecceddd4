use std::{env, fs, path::Path};

use crate::{errors::Error, Result};

/// Process-wide configuration, read once at startup and shared read-only.
///
/// Provider protocol constants (endpoint, business id, sign secret) are not
/// deployment configuration and live in the provider adapter crate.
#[derive(Clone, Debug)]
pub struct Config {
    pub bot_token: String,
    /// Operator-only chat for detailed error reports. `None` disables the
    /// forwarding; user-facing notices are unaffected.
    pub log_channel: Option<i64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let bot_token = env_str("BOT_TOKEN").unwrap_or_default();
        if bot_token.trim().is_empty() {
            return Err(Error::Config(
                "BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        // An absent or unparsable LOG_CHANNEL just disables operator
        // forwarding; it is not a startup error.
        let log_channel = env_str("LOG_CHANNEL").and_then(|s| s.trim().parse::<i64>().ok());

        Ok(Self {
            bot_token,
            log_channel,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
