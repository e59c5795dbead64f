//! Client identity resolution
//!
//! The visitor is identified by their network address: the first entry of
//! `X-Forwarded-For` when a reverse proxy supplies one, otherwise the TCP
//! peer. The header is trusted as-is, so the proxy in front of this
//! server must overwrite it. Addresses are only ever persisted as a
//! SHA-256 digest.

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use sha2::{Digest, Sha256};
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Resolved address of the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    address: String,
}

impl ClientIdentity {
    pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        // Decoded as latin-1 so a header with non-ASCII bytes still wins over the peer
        let forwarded = headers
            .get(FORWARDED_FOR_HEADER)
            .map(|h| h.as_bytes().iter().map(|&b| char::from(b)).collect::<String>())
            .filter(|s| !s.is_empty())
            .and_then(|s| s.split(',').next().map(|ip| ip.trim().to_string()));

        let address = forwarded
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_default();

        Self { address }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Stable pseudonymous key for this caller
    pub fn voter_hash(&self) -> String {
        hash_address(&self.address)
    }

    /// Only `127.0.0.1` and `::1` count as local
    pub fn is_loopback(&self) -> bool {
        match self.address.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) => ip == Ipv4Addr::LOCALHOST,
            Ok(IpAddr::V6(ip)) => ip == Ipv6Addr::LOCALHOST,
            Err(_) => false,
        }
    }
}

pub fn hash_address(address: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(address.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Self::resolve(&parts.headers, peer))
    }
}
