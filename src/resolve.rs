use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, SystemTime};

/// Sanitize hostname by keeping only valid characters (alphanumeric, dots, hyphens)
/// Returns None if the result is empty
pub fn sanitize_hostname(hostname: &str) -> Option<String> {
    // Also handle case where user included port like "example.com:8080"
    let hostname = hostname.split(':').next().unwrap_or(hostname);

    let sanitized: String = hostname
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '.' || *c == '-')
        .collect();

    if sanitized.is_empty() { None } else { Some(sanitized) }
}

/// Resolve a sanitized hostname to its first address.
pub async fn resolve_host(hostname: &str) -> Option<IpAddr> {
    match tokio::net::lookup_host(&format!("{hostname}:80")).await {
        Ok(mut addrs) => addrs.next().map(|addr| addr.ip()),
        Err(_) => None,
    }
}

#[derive(Debug, Clone)]
pub struct HostCacheEntry {
    ip_address: IpAddr,
    cached_at: SystemTime,
    ttl: Duration,
}

impl HostCacheEntry {
    pub fn new(ip_address: IpAddr, ttl_seconds: u64) -> Self {
        Self {
            ip_address,
            cached_at: SystemTime::now(),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    pub fn is_expired(&self) -> bool {
        SystemTime::now()
            .duration_since(self.cached_at)
            .map_or(true, |elapsed| elapsed > self.ttl)
    }
}

/// TTL-bounded hostname-to-address cache, so repeated probes of the same
/// target do not hit DNS every time.
#[derive(Default)]
pub struct HostCache {
    cache: HashMap<String, HostCacheEntry>,
}

impl HostCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hostname: String, entry: HostCacheEntry) {
        self.cache.insert(hostname, entry);
    }

    pub fn valid_ip(&self, hostname: &str) -> Option<IpAddr> {
        self.cache
            .get(hostname)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.ip_address)
    }

    pub fn clean_expired(&mut self, hostname: &str) {
        if self.cache.get(hostname).is_some_and(|e| e.is_expired()) {
            self.cache.remove(hostname);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_port_and_invalid_characters() {
        assert_eq!(
            sanitize_hostname("example.com:8080"),
            Some("example.com".to_string())
        );
        assert_eq!(
            sanitize_hostname("my_host!.example.com"),
            Some("myhost.example.com".to_string())
        );
        assert_eq!(sanitize_hostname("!!??"), None);
        assert_eq!(sanitize_hostname(""), None);
    }

    #[test]
    fn cache_honors_ttl() {
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        let mut cache = HostCache::new();

        cache.insert("fresh".to_string(), HostCacheEntry::new(ip, 3600));
        assert_eq!(cache.valid_ip("fresh"), Some(ip));

        cache.insert("stale".to_string(), HostCacheEntry::new(ip, 0));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.valid_ip("stale"), None);
        cache.clean_expired("stale");
        assert_eq!(cache.valid_ip("stale"), None);
    }
}
