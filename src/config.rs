use std::path::PathBuf;

/// Index construction configuration
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Number of indexer shards; documents are dispatched round-robin.
    pub num_shards: usize,
    /// Capacity of each shard's input queue.
    pub queue_capacity: usize,
    /// Run shards on dedicated worker threads. The inline mode exists
    /// for deterministic debugging and produces identical output.
    pub threaded: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            num_shards: num_cpus::get().max(1),
            queue_capacity: 1000,
            threaded: true,
        }
    }
}

impl IndexConfig {
    pub fn with_num_shards(mut self, num_shards: usize) -> Self {
        self.num_shards = num_shards.max(1);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_threaded(mut self, threaded: bool) -> Self {
        self.threaded = threaded;
        self
    }
}

/// Search service configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listening host name or address; empty means all interfaces.
    pub host: String,
    pub port: u16,
    /// Optional directory with a static web app, served under `/app`.
    pub static_app_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 5000,
            static_app_dir: None,
        }
    }
}

impl ServerConfig {
    /// The socket address string to bind.
    pub fn bind_addr(&self) -> String {
        let host = if self.host.is_empty() {
            "0.0.0.0"
        } else {
            self.host.as_str()
        };
        format!("{}:{}", host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_index_config() {
        let config = IndexConfig::default();
        assert!(config.num_shards >= 1);
        assert_eq!(config.queue_capacity, 1000);
        assert!(config.threaded);
    }

    #[test]
    fn test_index_config_builder() {
        let config = IndexConfig::default()
            .with_num_shards(0)
            .with_queue_capacity(10)
            .with_threaded(false);
        assert_eq!(config.num_shards, 1);
        assert_eq!(config.queue_capacity, 10);
        assert!(!config.threaded);
    }

    #[test]
    fn test_server_bind_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");

        let config = ServerConfig {
            host: "localhost".to_owned(),
            port: 8080,
            static_app_dir: None,
        };
        assert_eq!(config.bind_addr(), "localhost:8080");
    }
}
