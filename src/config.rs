use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;

const DEFAULT_TTL_MINUTES: u64 = 60 * 24;
const MAX_TTL_MINUTES: u64 = 60 * 24 * 365;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_minutes: u64,
}

impl JwtConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is required")?;
        if database_url.trim().is_empty() {
            bail!("DATABASE_URL must not be empty");
        }

        let secret = lookup("JWT_SECRET").context("JWT_SECRET is required")?;
        if secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        // zero, unset and unparsable all fall back to a day
        let ttl_minutes = lookup("JWT_TTL_MINUTES")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_TTL_MINUTES);
        if ttl_minutes > MAX_TTL_MINUTES {
            bail!("JWT_TTL_MINUTES must be at most {MAX_TTL_MINUTES} (one year)");
        }

        let jwt = JwtConfig {
            secret,
            issuer: lookup("JWT_ISSUER")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "authgate".into()),
            ttl_minutes,
        };

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Ok(Self {
            database_url,
            max_connections,
            jwt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_required_values_and_defaults() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/authgate"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .expect("config should load");

        assert_eq!(cfg.database_url, "postgres://localhost/authgate");
        assert_eq!(cfg.jwt.secret, "s3cret");
        assert_eq!(cfg.jwt.issuer, "authgate");
        assert_eq!(cfg.jwt.ttl(), Duration::from_secs(24 * 60 * 60));
        assert_eq!(cfg.max_connections, 10);
    }

    #[test]
    fn rejects_missing_or_blank_secret() {
        let missing = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/authgate",
        )]));
        assert!(missing.is_err());

        let blank = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/authgate"),
            ("JWT_SECRET", "   "),
        ]));
        let msg = blank.unwrap_err().to_string();
        assert!(msg.contains("JWT_SECRET"));
    }

    #[test]
    fn rejects_missing_database_url() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn zero_ttl_falls_back_to_default() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/authgate"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_MINUTES", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl_minutes, 24 * 60);
    }

    #[test]
    fn oversized_ttl_is_rejected() {
        for ttl in ["525601", "10000000000", "18446744073709551615"] {
            let err = AppConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/authgate"),
                ("JWT_SECRET", "s3cret"),
                ("JWT_TTL_MINUTES", ttl),
            ]))
            .unwrap_err();
            assert!(err.to_string().contains("JWT_TTL_MINUTES"), "ttl {ttl}");
        }

        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/authgate"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_MINUTES", "525600"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl(), Duration::from_secs(365 * 24 * 60 * 60));
    }

    #[test]
    fn ttl_conversion_saturates() {
        let jwt = JwtConfig {
            secret: "s3cret".into(),
            issuer: "authgate".into(),
            ttl_minutes: u64::MAX,
        };
        assert_eq!(jwt.ttl(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn explicit_ttl_and_issuer_are_used() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/authgate"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_MINUTES", "15"),
            ("JWT_ISSUER", "accounts"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl(), Duration::from_secs(15 * 60));
        assert_eq!(cfg.jwt.issuer, "accounts");
    }
}
