use std::env;

use crate::{Error, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn init() -> Result<Config> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| Error::Config("DATABASE_URL must be set".to_string()))?;

        if database_url.trim().is_empty() {
            return Err(Error::Config("DATABASE_URL cannot be empty".to_string()));
        }

        let max_connections = parse_max_connections(env::var("DATABASE_MAX_CONNECTIONS").ok())?;

        Ok(Config {
            database_url,
            max_connections,
        })
    }
}

fn parse_max_connections(value: Option<String>) -> Result<u32> {
    let Some(value) = value else {
        return Ok(DEFAULT_MAX_CONNECTIONS);
    };

    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Config(format!(
            "DATABASE_MAX_CONNECTIONS must be a positive integer, got `{value}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_connections_defaults_when_unset() {
        assert_eq!(parse_max_connections(None).unwrap(), DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn max_connections_accepts_positive_numbers() {
        assert_eq!(parse_max_connections(Some(" 25 ".to_string())).unwrap(), 25);
    }

    #[test]
    fn malformed_max_connections_is_a_config_error() {
        for bad in ["ten", "-1", "0", ""] {
            let err = parse_max_connections(Some(bad.to_string())).unwrap_err();
            assert!(
                matches!(err, Error::Config(ref msg) if msg.contains("DATABASE_MAX_CONNECTIONS")),
                "unexpected error for {bad:?}: {err:?}"
            );
        }
    }
}
