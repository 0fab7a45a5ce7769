use std::env;

// ============================================================================
// Configuration
// ============================================================================
//
// Environment-driven, with defaults that match a local single-node setup.
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Scylla,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP API binds to (`ORDERS_BIND_ADDR`).
    pub bind_addr: String,
    /// ScyllaDB contact point (`ORDERS_SCYLLA_NODE`).
    pub scylla_node: String,
    /// Keyspace holding the documents table (`ORDERS_KEYSPACE`).
    pub keyspace: String,
    /// Currency code stamped on every order total (`ORDERS_CURRENCY`).
    pub currency: String,
    /// `ORDERS_STORE` = `scylla` (default) or `memory` (non-durable).
    pub store: StoreBackend,
}

impl Config {
    pub fn from_env() -> Self {
        let store = match env::var("ORDERS_STORE").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            _ => StoreBackend::Scylla,
        };

        Self {
            bind_addr: env_or("ORDERS_BIND_ADDR", "0.0.0.0:8080"),
            scylla_node: env_or("ORDERS_SCYLLA_NODE", "127.0.0.1:9042"),
            keyspace: env_or("ORDERS_KEYSPACE", "orders_ks"),
            currency: env_or("ORDERS_CURRENCY", "MXN"),
            store,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_environment() {
        // Only assert on keys the test environment does not set.
        let config = Config::from_env();
        assert!(!config.bind_addr.is_empty());
        assert!(!config.currency.is_empty());
        assert!(!config.keyspace.is_empty());
    }
}
