//! `[store]` section configuration.
//!
//! Describes how to reach the remote content store (a Sanity-style GROQ
//! query API).

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{env, time::Duration};

/// `[store]` section in archive.toml - content store connection.
///
/// # Example
/// ```toml
/// [store]
/// project_id = "k2tkuvlp"
/// dataset = "production"
/// api_version = "2023-05-03"
/// use_cdn = true
/// token_env = "SANITY_API_TOKEN"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Project identifier, used as the API subdomain. Required.
    #[serde(default)]
    pub project_id: String,

    /// Dataset holding the posts and categories.
    #[serde(default = "defaults::store::dataset")]
    #[educe(Default = defaults::store::dataset())]
    pub dataset: String,

    /// Dated API version (`YYYY-MM-DD`) or `1`.
    #[serde(default = "defaults::store::api_version")]
    #[educe(Default = defaults::store::api_version())]
    pub api_version: String,

    /// Query the edge cache (`apicdn`) instead of the live API.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub use_cdn: bool,

    /// Name of the environment variable holding an optional read token.
    #[serde(default = "defaults::store::token_env")]
    #[educe(Default = defaults::store::token_env())]
    pub token_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "defaults::store::timeout_secs")]
    #[educe(Default = defaults::store::timeout_secs())]
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// API host for this project, e.g. `k2tkuvlp.apicdn.sanity.io`.
    pub fn host(&self) -> String {
        let api = if self.use_cdn { "apicdn" } else { "api" };
        format!("{}.{api}.sanity.io", self.project_id)
    }

    /// Base query endpoint, without query-string parameters.
    pub fn query_endpoint(&self) -> String {
        format!(
            "https://{}/v{}/data/query/{}",
            self.host(),
            self.api_version,
            self.dataset
        )
    }

    /// Read token from the configured environment variable, if set and non-blank.
    pub fn token(&self) -> Option<String> {
        env::var(&self.token_env)
            .ok()
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty())
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
