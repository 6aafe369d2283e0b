use std::net::Ipv4Addr;

use async_recursion::async_recursion;
use tracing::{debug, warn};

use super::referral::Referral;
use super::{Resolver, Session};
use crate::transport::Transport;
use crate::{Message, Name, RecordData, RecordType, TransportError};

#[derive(Debug)]
pub enum Outcome {
    /// An answer, or an SOA saying there is nothing further down.
    Resolved,
    /// Every server the response pointed at was tried without success, or
    /// it pointed nowhere.
    Unresolved,
    /// The server asked did not produce a usable reply.
    Unreachable(TransportError),
}

/// Result of asking one server and following whatever it referred to.
#[derive(Debug)]
pub struct Walk {
    pub message: Message,
    pub outcome: Outcome,
}

impl Walk {
    fn resolved(message: Message) -> Self {
        Self {
            message,
            outcome: Outcome::Resolved,
        }
    }

    fn unresolved(message: Message) -> Self {
        Self {
            message,
            outcome: Outcome::Unresolved,
        }
    }

    fn unreachable(err: TransportError) -> Self {
        Self {
            message: Message::default(),
            outcome: Outcome::Unreachable(err),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, Outcome::Resolved)
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self.outcome, Outcome::Unreachable(_))
    }
}

impl<T: Transport> Resolver<T> {
    /// Asks `server` about `name`, then works down through the glue and name
    /// servers it refers to until one of them resolves the question.
    #[async_recursion]
    pub(super) async fn walk_from(
        &self,
        name: &Name,
        qtype: RecordType,
        server: Ipv4Addr,
        session: &mut Session,
        depth: usize,
        hops: usize,
    ) -> Walk {
        if hops > self.config.max_referrals {
            warn!(%name, %qtype, %server, "too many referrals, giving up on this path");
            return Walk::unresolved(Message::default());
        }

        session.queries += 1;
        let message = match self
            .transport
            .query(name, qtype, server, self.config.timeout)
            .await
        {
            Ok(message) => message,
            Err(err) => {
                debug!(%server, %err, "server failed");
                return Walk::unreachable(err);
            }
        };

        if !message.answers.is_empty() {
            return Walk::resolved(message);
        }

        let referral = Referral::new(&message);
        let mut last = None;

        if !message.additionals.is_empty() {
            if !message.authorities.is_empty() {
                referral.remember(&mut session.cache.ips);
            }

            for ip in referral.addresses() {
                debug!(%name, %ip, "following glue");
                let walk = self
                    .walk_from(name, qtype, ip, session, depth, hops + 1)
                    .await;
                if walk.is_resolved() {
                    return walk;
                }
                last = Some(walk.message);
            }
        }

        let mut end_of_zone = false;
        for record in &message.authorities {
            match &record.data {
                RecordData::Ns(host) if !referral.has_glue(host) => {
                    let Some(ip) = self.ns_address(host, session, depth).await else {
                        debug!(%host, "no address for name server");
                        continue;
                    };

                    debug!(%name, %host, %ip, "following name server");
                    let walk = self
                        .walk_from(name, qtype, ip, session, depth, hops + 1)
                        .await;
                    if walk.is_resolved() {
                        return walk;
                    }
                    last = Some(walk.message);
                }
                RecordData::Soa { .. } => {
                    end_of_zone = true;
                    break;
                }
                _ => {}
            }
        }

        if end_of_zone {
            return Walk::resolved(message);
        }

        Walk::unresolved(last.unwrap_or(message))
    }

    /// Address of a name server known only by name: a cached hint, or a
    /// full lookup of its A record one level deeper. A host that already
    /// failed, or whose lookup encloses this one, is not looked up again.
    async fn ns_address(
        &self,
        host: &Name,
        session: &mut Session,
        depth: usize,
    ) -> Option<Ipv4Addr> {
        if let Some(ip) = session.cache.ips.get(host) {
            return Some(ip);
        }

        if session.ns_failed.contains(host) {
            return None;
        }
        if !session.ns_pending.insert(host.clone()) {
            debug!(%host, "name server lookup already in progress");
            return None;
        }

        let response = self.resolve(host, RecordType::A, session, depth + 1).await;
        session.ns_pending.remove(host);

        let ip = response.answers.iter().find_map(|record| match record.data {
            RecordData::A(ip) => Some(ip),
            _ => None,
        });

        match ip {
            Some(ip) => {
                session.cache.ips.insert(host.clone(), ip);
                Some(ip)
            }
            None => {
                session.ns_failed.insert(host.clone());
                None
            }
        }
    }
}
