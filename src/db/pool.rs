//! Database connection pool management

use std::sync::Arc;

use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use thiserror::Error;
use tokio_postgres::NoTls;
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::info;

/// Database-related errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::CreatePoolError),
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),
    #[error("Pool get error: {0}")]
    PoolGet(#[from] deadpool_postgres::PoolError),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    pool: Pool,
}

impl DbPool {
    /// Create a new database pool from a connection string.
    ///
    /// `sslmode=require` in the URL switches to rustls with the webpki roots,
    /// which hosted Postgres providers expect.
    pub fn new(database_url: &str, max_connections: Option<usize>) -> Result<Self, DbError> {
        let url = url::Url::parse(database_url)
            .map_err(|e| DbError::Config(format!("Invalid database URL: {}", e)))?;

        let host = url.host_str()
            .ok_or_else(|| DbError::Config("Missing host in database URL".to_string()))?
            .to_string();
        let dbname = url.path().trim_start_matches('/').to_string();
        let tls = requires_tls(&url);

        let mut cfg = Config::new();
        cfg.url = Some(database_url.to_string());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        if let Some(max) = max_connections {
            cfg.pool = Some(PoolConfig::new(max));
        }

        let pool = if tls {
            cfg.create_pool(Some(Runtime::Tokio1), tls_connector()?)?
        } else {
            cfg.create_pool(Some(Runtime::Tokio1), NoTls)?
        };

        info!(
            host = %host,
            dbname = %dbname,
            tls = tls,
            "Database pool created"
        );

        Ok(DbPool { pool })
    }

    /// Get a connection from the pool
    pub async fn get(&self) -> Result<deadpool_postgres::Object, DbError> {
        Ok(self.pool.get().await?)
    }

    /// Test the database connection
    pub async fn test_connection(&self) -> Result<(), DbError> {
        let client = self.get().await?;
        client.query_one("SELECT 1", &[]).await?;
        info!("Database connection test successful");
        Ok(())
    }
}

fn requires_tls(url: &url::Url) -> bool {
    url.query_pairs()
        .any(|(key, value)| key == "sslmode" && value == "require")
}

fn tls_connector() -> Result<MakeRustlsConnect, DbError> {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| DbError::Config(format!("TLS configuration: {}", e)))?
    .with_root_certificates(roots)
    .with_no_client_auth();

    Ok(MakeRustlsConnect::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_tls_from_sslmode() {
        let hosted = url::Url::parse("postgres://u:p@db.example.co:5432/postgres?sslmode=require").unwrap();
        let local = url::Url::parse("postgres://u:p@localhost/postgres").unwrap();
        let disabled = url::Url::parse("postgres://u:p@localhost/postgres?sslmode=disable").unwrap();

        assert!(requires_tls(&hosted));
        assert!(!requires_tls(&local));
        assert!(!requires_tls(&disabled));
    }

    #[test]
    fn test_rejects_url_without_host() {
        assert!(matches!(DbPool::new("not a url", None), Err(DbError::Config(_))));
    }
}
