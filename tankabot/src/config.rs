use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    ConfigLoadFailed { source: figment::Error },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub name: String,
    pub database_url: String,
    pub num_concurrent_analyzer_jobs: usize,
    pub max_retry: u32,
    pub retry_interval_secs: u64,
    pub random_post_frequency_per_day: u32,
    pub candidate_keep_n: i64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "tankabot".to_owned(),
            database_url: "postgres://localhost/tankabot".to_owned(),
            num_concurrent_analyzer_jobs: 4,
            max_retry: 5,
            retry_interval_secs: 5,
            random_post_frequency_per_day: 4,
            candidate_keep_n: 50,
        }
    }
}

impl BotConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    /// `with_retry` treats `max_retry` as an attempt count and loops
    /// `0..max_retry`; a configured `0` would run the loop zero times and
    /// leave it with no error to return. Clamp to at least one attempt,
    /// the way `num_concurrent_analyzer_jobs` is clamped to `[1, 10]`.
    pub fn max_retry(&self) -> u32 {
        self.max_retry.max(1)
    }
}

/// Layer defaults, `config.toml`, then `TANKABOT_`-prefixed environment
/// variables, last one wins.
pub fn load() -> Result<BotConfig> {
    Figment::from(Serialized::defaults(BotConfig::default()))
        .merge(Toml::file("config.toml"))
        .merge(Env::prefixed("TANKABOT_"))
        .extract()
        .context(ConfigLoadFailedError)
}
