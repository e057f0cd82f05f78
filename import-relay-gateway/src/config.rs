//! Configuration for the gRPC import gateway.

/// Configuration for the gRPC channel to the import service.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Endpoint URI, e.g. `http://localhost:50051`. A `dns:///` target
    /// delegates resolution to the native resolver.
    pub endpoint: String,
    /// Per-call deadline in milliseconds.
    pub request_timeout_ms: u64,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// HTTP/2 keepalive ping interval in seconds.
    pub keepalive_interval_secs: u64,
    /// HTTP/2 keepalive ping timeout in seconds.
    pub keepalive_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:50051".to_string(),
            request_timeout_ms: 30_000,
            connect_timeout_ms: 5_000,
            keepalive_interval_secs: 30,
            keepalive_timeout_secs: 10,
        }
    }
}

impl GatewayConfig {
    /// Create a config for the given endpoint with default timeouts.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }
}
