//! Host allow-list.
//!
//! # Design Decisions
//! - Host matching is case-insensitive (per HTTP spec)
//! - The port is part of the host; `example.com:8080` must be listed as such
//! - Empty list = every host accepted

/// Hostnames permitted to reach the server.
#[derive(Debug, Clone, Default)]
pub struct AllowedHosts {
    hosts: Vec<String>,
}

impl AllowedHosts {
    /// Create an allow-list.
    /// Hosts are normalized to lowercase for case-insensitive matching.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns true if a request for `host` may be served.
    pub fn permits(&self, host: Option<&str>) -> bool {
        if self.hosts.is_empty() {
            return true;
        }
        host.is_some_and(|host| self.hosts.iter().any(|h| h.eq_ignore_ascii_case(host)))
    }
}
