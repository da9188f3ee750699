use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub min_conn: u32,
    pub max_conn: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub run_migrations: bool,
    pub port: u16,
    pub otel_endpoint: Option<String>,
    pub dev_mode: bool,
    pub enable_file_log: bool,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let run_migrations = parse_bool("RUN_MIGRATIONS", &run_migrations_str)?;

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let min_conn = optional_u32("DB_MIN_CONN", 1)?;
        let max_conn = optional_u32("DB_MAX_CONN", 5)?;

        if min_conn > max_conn {
            return Err(anyhow!(
                "DB_MIN_CONN ({min_conn}) must not exceed DB_MAX_CONN ({max_conn})"
            ));
        }

        let otel_endpoint = std::env::var("OTEL_ENDPOINT")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let dev_mode = std::env::var("DEV_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let enable_file_log = std::env::var("ENABLE_FILE_LOG")
            .map(|v| v == "true")
            .unwrap_or(false);

        Ok(Self {
            database: DatabaseConfig {
                url: database_url,
                min_conn,
                max_conn,
            },
            run_migrations,
            port,
            otel_endpoint,
            dev_mode,
            enable_file_log,
        })
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(anyhow!("{name} must be 'true' or 'false', got '{other}'")),
    }
}

fn optional_u32(name: &str, default: u32) -> Result<u32> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("{name} must be a valid u32 integer")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_migrations_accepts_only_literal_booleans() {
        assert!(parse_bool("RUN_MIGRATIONS", "true").unwrap());
        assert!(!parse_bool("RUN_MIGRATIONS", "false").unwrap());

        let err = parse_bool("RUN_MIGRATIONS", "yes").unwrap_err();
        assert!(err.to_string().contains("RUN_MIGRATIONS"));
        assert!(err.to_string().contains("yes"));
    }

    #[test]
    fn optional_u32_falls_back_when_unset() {
        let value = optional_u32("CATALOG_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
