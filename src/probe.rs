use std::net::IpAddr;
use std::time::Duration;

use surge_ping::{Client, Config, IcmpPacket, PingIdentifier, PingSequence};
use thiserror::Error;

use crate::resolve::{HostCache, HostCacheEntry, resolve_host, sanitize_hostname};
use crate::wait::{Fault, FaultKind};

const DNS_TTL_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not resolve host {0}")]
    Resolve(String),
    #[error("icmp socket error: {0}")]
    Socket(String),
    #[error("no reply from {0}")]
    Unreachable(IpAddr),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Fault for ProbeError {
    fn kind(&self) -> FaultKind {
        match self {
            ProbeError::Resolve(_) => FaultKind::Resolve,
            ProbeError::Socket(_) => FaultKind::Socket,
            ProbeError::Unreachable(_) => FaultKind::Unreachable,
            ProbeError::Io(_) => FaultKind::Io,
        }
    }
}

/// Sends single ICMP echo probes and reports the round-trip time.
///
/// A probe closure slots directly into [`wait_for`](crate::wait::wait_for)
/// as a reachability predicate, retrying on `Unreachable` and `Resolve`.
pub struct Prober {
    runtime: tokio::runtime::Runtime,
    cache: HostCache,
    timeout: Duration,
}

impl Prober {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        Ok(Self {
            runtime: tokio::runtime::Runtime::new()?,
            cache: HostCache::new(),
            timeout,
        })
    }

    /// Resolves `target` (IP literal or hostname) and pings it once.
    pub fn probe(&mut self, target: &str) -> Result<Duration, ProbeError> {
        let ip = self.lookup(target)?;
        let rtt = self.runtime.block_on(ping_once(ip, self.timeout))?;
        log::debug!("{target} ({ip}) answered in {:.1} ms", rtt.as_secs_f64() * 1000.0);
        Ok(rtt)
    }

    fn lookup(&mut self, target: &str) -> Result<IpAddr, ProbeError> {
        // Try parsing as IP address first
        if let Ok(ip) = target.parse::<IpAddr>() {
            return Ok(ip);
        }

        self.cache.clean_expired(target);
        if let Some(ip) = self.cache.valid_ip(target) {
            return Ok(ip);
        }

        let hostname =
            sanitize_hostname(target).ok_or_else(|| ProbeError::Resolve(target.to_string()))?;
        let ip = self
            .runtime
            .block_on(resolve_host(&hostname))
            .ok_or_else(|| ProbeError::Resolve(target.to_string()))?;
        self.cache
            .insert(target.to_string(), HostCacheEntry::new(ip, DNS_TTL_SECS));
        Ok(ip)
    }
}

async fn ping_once(target_ip: IpAddr, timeout: Duration) -> Result<Duration, ProbeError> {
    let config = Config::default();
    let client = Client::new(&config).map_err(|e| ProbeError::Socket(e.to_string()))?;

    let mut pinger = client.pinger(target_ip, PingIdentifier(1)).await;
    pinger.timeout(timeout);

    match pinger.ping(PingSequence(1), &[]).await {
        Ok((IcmpPacket::V4(_), duration)) | Ok((IcmpPacket::V6(_), duration)) => Ok(duration),
        Err(_) => Err(ProbeError::Unreachable(target_ip)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_errors_carry_their_fault_kind() {
        assert_eq!(
            ProbeError::Resolve("x".into()).kind(),
            FaultKind::Resolve
        );
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        assert_eq!(ProbeError::Unreachable(ip).kind(), FaultKind::Unreachable);
        assert_eq!(
            ProbeError::Socket("denied".into()).kind(),
            FaultKind::Socket
        );
    }
}
