//! Proxied request addressing.
//!
//! The relay forwards a request to whatever URL is carried in its `url`
//! query parameter. Addresses are assembled by plain concatenation; the
//! embedded target URL is intentionally not percent-encoded, matching what
//! the relay parses.

/// One proxied target: a relay plus the host:port it forwards to.
///
/// Created per verification run and discarded after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    relay_base_url: String,
    target_host: String,
    target_port: u16,
}

impl ProxyTarget {
    /// Build a proxy target. Returns `None` for an empty target host: a
    /// relay that never received the host address cannot forward anywhere.
    pub fn new(
        relay_base_url: impl Into<String>,
        target_host: impl Into<String>,
        target_port: u16,
    ) -> Option<Self> {
        let target_host = target_host.into();
        if target_host.is_empty() {
            return None;
        }

        Some(Self {
            relay_base_url: relay_base_url.into(),
            target_host,
            target_port,
        })
    }

    /// Host the relay forwards to.
    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    /// Proxied base URL for the target application.
    pub fn url(&self) -> String {
        format!(
            "{}/proxy?url=http://{}:{}",
            self.relay_base_url, self.target_host, self.target_port
        )
    }

    /// Proxied URL for one endpoint on the target application.
    ///
    /// The path lands inside the `url` query parameter, so the relay
    /// forwards to `http://<host>:<port><path>`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url(), path)
    }
}
