use std::net::Ipv4Addr;

use crate::cache::IpCache;
use crate::{Message, Name, RecordData};

/// The servers a response points at: the NS targets from the authority
/// section and the glue addresses from the additional section, both kept in
/// the order the response lists them.
#[derive(Clone, Default, Debug)]
pub struct Referral {
    zone: Option<Name>,
    hosts: Vec<Name>,
    glue: Vec<(Name, Ipv4Addr)>,
}

impl Referral {
    pub fn new(message: &Message) -> Self {
        let mut zone = None;
        let mut hosts = Vec::new();

        for record in &message.authorities {
            if let RecordData::Ns(host) = &record.data {
                zone.get_or_insert_with(|| record.name.clone());
                hosts.push(host.clone());
            }
        }

        let glue = message
            .additionals
            .iter()
            .filter_map(|record| match record.data {
                RecordData::A(ip) => Some((record.name.clone(), ip)),
                _ => None,
            })
            .collect();

        Self { zone, hosts, glue }
    }

    /// Stores each glue address under the NS target it belongs to, and the
    /// delegated zone under the first of those.
    pub fn remember(&self, cache: &mut IpCache) {
        let mut delegated = self
            .glue
            .iter()
            .filter(|(owner, _)| self.hosts.contains(owner))
            .peekable();

        if let (Some(zone), Some((_, ip))) = (&self.zone, delegated.peek()) {
            if !zone.is_root() {
                cache.insert(zone.clone(), *ip);
            }
        }

        for (host, ip) in delegated {
            cache.insert(host.clone(), *ip);
        }
    }

    /// Glue addresses in section order, each once.
    pub fn addresses(&self) -> Vec<Ipv4Addr> {
        let mut addresses: Vec<Ipv4Addr> = Vec::with_capacity(self.glue.len());
        for (_, ip) in &self.glue {
            if !addresses.contains(ip) {
                addresses.push(*ip);
            }
        }
        addresses
    }

    pub fn has_glue(&self, host: &Name) -> bool {
        self.glue.iter().any(|(owner, _)| owner == host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResourceRecord;

    fn ns(zone: &str, host: &str) -> ResourceRecord {
        ResourceRecord::new(Name::new(zone), 3600, RecordData::Ns(Name::new(host)))
    }

    fn a(owner: &str, ip: [u8; 4]) -> ResourceRecord {
        ResourceRecord::new(Name::new(owner), 3600, RecordData::A(ip.into()))
    }

    #[test]
    fn pairs_glue_by_owner_name() {
        let mut message = Message::default();
        message.add_authority(ns("example.test", "ns1.example.test"));
        message.add_authority(ns("example.test", "ns2.example.test"));
        // listed in the opposite order of the NS records
        message.add_additional(a("ns2.example.test", [10, 0, 0, 2]));
        message.add_additional(a("ns1.example.test", [10, 0, 0, 1]));

        let mut cache = IpCache::new();
        Referral::new(&message).remember(&mut cache);

        assert_eq!(
            cache.get(&Name::new("ns1.example.test")),
            Some(Ipv4Addr::new(10, 0, 0, 1))
        );
        assert_eq!(
            cache.get(&Name::new("ns2.example.test")),
            Some(Ipv4Addr::new(10, 0, 0, 2))
        );
        assert_eq!(
            cache.get(&Name::new("example.test")),
            Some(Ipv4Addr::new(10, 0, 0, 2))
        );
    }

    #[test]
    fn ignores_glue_for_unlisted_hosts() {
        let mut message = Message::default();
        message.add_authority(ns("example.test", "ns1.example.test"));
        message.add_additional(a("stray.example.test", [10, 9, 9, 9]));

        let referral = Referral::new(&message);
        let mut cache = IpCache::new();
        referral.remember(&mut cache);

        assert!(cache.is_empty());
        assert!(!referral.has_glue(&Name::new("ns1.example.test")));
        // still a candidate to ask, just not a cache entry
        assert_eq!(referral.addresses(), [Ipv4Addr::new(10, 9, 9, 9)]);
    }

    #[test]
    fn skips_duplicate_addresses() {
        let mut message = Message::default();
        message.add_authority(ns("test", "a.nic.test"));
        message.add_authority(ns("test", "b.nic.test"));
        message.add_additional(a("a.nic.test", [10, 0, 0, 1]));
        message.add_additional(a("b.nic.test", [10, 0, 0, 1]));
        message.add_additional(a("b.nic.test", [10, 0, 0, 3]));

        assert_eq!(
            Referral::new(&message).addresses(),
            [Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 3)]
        );
    }
}
