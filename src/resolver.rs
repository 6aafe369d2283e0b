use std::collections::HashSet;
use std::net::Ipv4Addr;

use async_recursion::async_recursion;
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::transport::Transport;
use crate::{Message, Name, RecordData, RecordType};

mod collector;
pub use collector::{Address, Alias, DomainInfo, MailExchange};

mod config;
pub use config::{
    ResolverConfig, RootFailurePolicy, DEFAULT_MAX_DEPTH, DEFAULT_MAX_REFERRALS, DEFAULT_TIMEOUT,
    ROOT_SERVERS,
};

mod referral;

mod walker;
pub use walker::{Outcome, Walk};

/// State shared by every lookup of one run: both caches and a count of the
/// queries sent since it was last taken.
#[derive(Debug, Default)]
pub struct Session {
    pub cache: Cache,
    queries: usize,
    /// Name servers whose address is being looked up by an enclosing
    /// lookup. Reset for every top-level lookup.
    ns_pending: HashSet<Name>,
    /// Name servers whose address could not be found during the current
    /// top-level lookup.
    ns_failed: HashSet<Name>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queries(&self) -> usize {
        self.queries
    }

    pub fn take_queries(&mut self) -> usize {
        std::mem::take(&mut self.queries)
    }

    fn start_lookup(&mut self) {
        self.ns_pending.clear();
        self.ns_failed.clear();
    }
}

/// Iterative resolver starting at the root servers.
pub struct Resolver<T> {
    transport: T,
    config: ResolverConfig,
}

impl<T: Transport> Resolver<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ResolverConfig::default())
    }

    pub fn with_config(transport: T, config: ResolverConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves one (name, type) pair. The returned message is empty when
    /// nothing could be found.
    pub async fn lookup(&self, name: &Name, qtype: RecordType, session: &mut Session) -> Message {
        session.start_lookup();
        self.resolve(name, qtype, session, 0).await
    }

    /// Asks a single server and follows its referrals.
    pub async fn walk(
        &self,
        name: &Name,
        qtype: RecordType,
        server: Ipv4Addr,
        session: &mut Session,
    ) -> Walk {
        session.start_lookup();
        self.walk_from(name, qtype, server, session, 0, 0).await
    }

    #[async_recursion]
    async fn resolve(
        &self,
        name: &Name,
        qtype: RecordType,
        session: &mut Session,
        depth: usize,
    ) -> Message {
        if depth > self.config.max_depth {
            warn!(%name, %qtype, depth, "lookup nested too deeply");
            return Message::default();
        }

        // Only the first root gets the warm start; a hint that failed once
        // will not do better on the next round.
        let mut hint = session.cache.ips.closest(name);
        let mut last = Message::default();

        for &root in &self.config.root_servers {
            let walk = match hint.take() {
                Some((zone, ip)) if ip != root => {
                    debug!(%name, %zone, %ip, "starting from cached server");
                    let walk = self.walk_from(name, qtype, ip, session, depth, 0).await;
                    if walk.is_resolved() {
                        walk
                    } else {
                        debug!(%name, %ip, "cached server did not resolve, starting at root");
                        self.walk_from(name, qtype, root, session, depth, 0).await
                    }
                }
                _ => self.walk_from(name, qtype, root, session, depth, 0).await,
            };

            if let Outcome::Unreachable(err) = &walk.outcome {
                match self.config.root_failure {
                    RootFailurePolicy::FailFast => {
                        debug!(%name, %root, %err, "root server failed, giving up");
                        return Message::default();
                    }
                    RootFailurePolicy::TryNextRoot => {
                        debug!(%name, %root, %err, "root server failed, trying next");
                        last = walk.message;
                        continue;
                    }
                }
            }

            let message = walk.message;

            if let Some(first) = message.answers.first() {
                if qtype != RecordType::Cname {
                    if let RecordData::Cname(target) = &first.data {
                        debug!(%name, %target, "looking up cname");
                        let target = target.clone();
                        return self.resolve(&target, qtype, session, depth + 1).await;
                    }
                }
                return message;
            }

            if message.starts_with_soa() {
                debug!(%name, %qtype, "got SOA");
                return message;
            }

            last = message;
        }

        last
    }
}
