//! Configuration for Products API

use core_config::{AppInfo, FromEnv, app_info, env_flag, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

const DEFAULT_PORT: u16 = 3000;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Apply pending migrations on boot (`RUN_MIGRATIONS`)
    pub run_migrations: bool,
    /// Wrap product updates in one transaction (`PRODUCTS_ATOMIC_VARIANT_REPLACEMENT`)
    pub atomic_variant_replacement: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env_with_default_port(DEFAULT_PORT)?;
        let run_migrations = env_flag("RUN_MIGRATIONS", true)?;
        let atomic_variant_replacement = env_flag("PRODUCTS_ATOMIC_VARIANT_REPLACEMENT", false)?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            run_migrations,
            atomic_variant_replacement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 5] = [
        "PORT",
        "DATABASE_URL",
        "DB_NAME",
        "RUN_MIGRATIONS",
        "PRODUCTS_ATOMIC_VARIANT_REPLACEMENT",
    ];

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(VARS, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.app.name, "products_api");
            assert!(config.run_migrations);
            assert!(!config.atomic_variant_replacement);
            assert!(config.database.url().ends_with("/catalog"));
        });
    }

    #[test]
    fn test_overrides() {
        temp_env::with_vars(
            [
                ("PORT", Some("4000")),
                ("DATABASE_URL", Some("postgres://u:p@db:5432/shop")),
                ("RUN_MIGRATIONS", Some("false")),
                ("PRODUCTS_ATOMIC_VARIANT_REPLACEMENT", Some("1")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.server.port, 4000);
                assert_eq!(config.database.url(), "postgres://u:p@db:5432/shop");
                assert!(!config.run_migrations);
                assert!(config.atomic_variant_replacement);
            },
        );
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        temp_env::with_var("RUN_MIGRATIONS", Some("sometimes"), || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("RUN_MIGRATIONS"));
        });
    }
}
