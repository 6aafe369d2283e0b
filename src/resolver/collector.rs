use std::fmt::Display;
use std::net::IpAddr;

use tracing::debug;

use super::{Resolver, Session};
use crate::transport::Transport;
use crate::{DnsError, Name, RecordData, RecordType};

/// `alias` is the owner of the CNAME record, `name` its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub alias: Name,
    pub name: Name,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub name: Name,
    pub address: IpAddr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailExchange {
    pub name: Name,
    pub preference: u16,
    pub exchange: Name,
}

/// Everything found for one domain, one list per record type in discovery
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainInfo {
    pub cnames: Vec<Alias>,
    pub ipv4: Vec<Address>,
    pub ipv6: Vec<Address>,
    pub mail: Vec<MailExchange>,
}

impl DomainInfo {
    pub fn is_empty(&self) -> bool {
        self.cnames.is_empty() && self.ipv4.is_empty() && self.ipv6.is_empty() && self.mail.is_empty()
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is an alias for {}", self.alias, self.name)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.address {
            IpAddr::V4(address) => write!(f, "{} has IPV4 address {}", self.name, address),
            IpAddr::V6(address) => write!(f, "{} has IPv6 address {}", self.name, address),
        }
    }
}

impl Display for MailExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} mail is handled by {} {}",
            self.name, self.preference, self.exchange
        )
    }
}

/// One line per entry: CNAME, then A, AAAA and MX.
impl Display for DomainInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for alias in &self.cnames {
            writeln!(f, "{alias}")?;
        }
        for address in self.ipv4.iter().chain(&self.ipv6) {
            writeln!(f, "{address}")?;
        }
        for exchange in &self.mail {
            writeln!(f, "{exchange}")?;
        }
        Ok(())
    }
}

impl<T: Transport> Resolver<T> {
    /// Cached result for `domain` if this session already has one,
    /// otherwise a fresh [`Resolver::collect_info`].
    pub async fn info(&self, domain: &str, session: &mut Session) -> Result<DomainInfo, DnsError> {
        let name = Name::parse(domain)?;
        if let Some(info) = session.cache.responses.get(&name) {
            debug!(%name, "answered from response cache");
            return Ok(info.clone());
        }

        self.collect_info(domain, session).await
    }

    /// Runs separate CNAME, A, AAAA and MX lookups for `domain` and caches
    /// the combined result.
    pub async fn collect_info(
        &self,
        domain: &str,
        session: &mut Session,
    ) -> Result<DomainInfo, DnsError> {
        let name = Name::parse(domain)?;
        let mut info = DomainInfo::default();

        let response = self.lookup(&name, RecordType::Cname, session).await;
        for record in response.answers {
            if let RecordData::Cname(target) = record.data {
                info.cnames.push(Alias {
                    alias: record.name,
                    name: target,
                });
            }
        }

        let response = self.lookup(&name, RecordType::A, session).await;
        for record in response.answers {
            if let RecordData::A(address) = record.data {
                info.ipv4.push(Address {
                    name: record.name,
                    address: address.into(),
                });
            }
        }

        let response = self.lookup(&name, RecordType::Aaaa, session).await;
        for record in response.answers {
            if let RecordData::Aaaa(address) = record.data {
                info.ipv6.push(Address {
                    name: record.name,
                    address: address.into(),
                });
            }
        }

        let response = self.lookup(&name, RecordType::Mx, session).await;
        for record in response.answers {
            if let RecordData::Mx {
                preference,
                exchange,
            } = record.data
            {
                info.mail.push(MailExchange {
                    name: record.name,
                    preference,
                    exchange,
                });
            }
        }

        session.cache.responses.insert(name, info.clone());

        Ok(info)
    }
}
