use std::collections::HashMap;
use std::net::Ipv4Addr;

use crate::resolver::DomainInfo;
use crate::Name;

/// Server address hints, keyed either by a name server's host name or by a
/// zone that was delegated to a server with glue. Entries are never
/// authoritative and never expire.
#[derive(Debug, Default, Clone)]
pub struct IpCache {
    entries: HashMap<Name, Ipv4Addr>,
}

impl IpCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &Name) -> Option<Ipv4Addr> {
        self.entries.get(name).copied()
    }

    /// Later writes win.
    pub fn insert(&mut self, name: Name, ip: Ipv4Addr) {
        self.entries.insert(name, ip);
    }

    /// Longest cached suffix of `name`, starting with the full name and
    /// dropping one label at a time. The root is never a key.
    pub fn closest(&self, name: &Name) -> Option<(Name, Ipv4Addr)> {
        name.iter_subdomains()
            .rev()
            .find_map(|suffix| self.get(&suffix).map(|ip| (suffix, ip)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Completed per-domain lookups.
#[derive(Debug, Default, Clone)]
pub struct ResponseCache {
    entries: HashMap<Name, DomainInfo>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, domain: &Name) -> Option<&DomainInfo> {
        self.entries.get(domain)
    }

    pub fn insert(&mut self, domain: Name, info: DomainInfo) {
        self.entries.insert(domain, info);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Cache {
    pub ips: IpCache,
    pub responses: ResponseCache,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }
}
