use std::time::Duration;

use anyhow::Context;

const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Server settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
    pub omdb_timeout: Duration,
    pub allowed_origins: Vec<String>,
    pub bind_host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(v) => v.trim().parse().with_context(|| format!("invalid PORT: {v}"))?,
            None => 3000,
        };

        let omdb_timeout = match get("OMDB_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.trim()
                    .parse()
                    .with_context(|| format!("invalid OMDB_TIMEOUT_SECS: {v}"))?,
            ),
            None => cinefav_metadata::omdb::DEFAULT_TIMEOUT,
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec![DEFAULT_ORIGIN.to_string()]);

        Ok(Self {
            omdb_api_key: get("OMDB_API_KEY"),
            omdb_base_url: get("OMDB_BASE_URL")
                .unwrap_or_else(|| cinefav_metadata::omdb::DEFAULT_BASE_URL.to_string()),
            omdb_timeout,
            allowed_origins,
            bind_host: get("CINEFAV_BIND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}
