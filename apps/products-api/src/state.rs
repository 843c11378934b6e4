//! Application state management

use database::postgres::DatabaseConnection;

/// Shared application state
///
/// Cloning is cheap: the connection is a handle onto the pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
}
