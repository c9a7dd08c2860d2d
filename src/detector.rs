//! Public IP detection.

use crate::error::Result;

/// Echo service that returns the caller's address as the whole body.
pub const DEFAULT_IP_SERVICE: &str = "http://checkip.amazonaws.com/";

/// Looks up the caller's public address with a single HTTP GET.
pub struct IpDetector {
    client: reqwest::Client,
    service: String,
}

impl IpDetector {
    /// Create a detector for the default echo service.
    pub fn new() -> Self {
        Self::with_service(DEFAULT_IP_SERVICE.to_string())
    }

    /// Create a detector for a custom echo service (for testing).
    pub fn with_service(service: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            service,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Fetch the current public address.
    ///
    /// The body is trimmed and returned as-is; it is not parsed as an IP.
    pub async fn detect(&self) -> Result<String> {
        let text = self.client.get(&self.service).send().await?.text().await?;
        let ip = text.trim().to_string();
        tracing::debug!("Detected address {} from {}", ip, self.service);
        Ok(ip)
    }
}

impl Default for IpDetector {
    fn default() -> Self {
        Self::new()
    }
}
