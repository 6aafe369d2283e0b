#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rootwalk::resolver::{Resolver, ResolverConfig, ROOT_SERVERS};
use rootwalk::transport::Transport;
use rootwalk::{Message, Name, RecordData, RecordType, ResourceRecord, TransportError};

type Key = (Ipv4Addr, Name, RecordType);

/// Transport answering from a script. Anything not scripted times out.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<Key, Message>>,
    calls: Mutex<Vec<Key>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, server: Ipv4Addr, name: &str, qtype: RecordType, reply: Message) {
        self.replies
            .lock()
            .unwrap()
            .insert((server, Name::new(name), qtype), reply);
    }

    pub fn on_roots(&self, name: &str, qtype: RecordType, reply: Message) {
        for root in ROOT_SERVERS {
            self.on(root, name, qtype, reply.clone());
        }
    }

    pub fn calls(&self) -> Vec<Key> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn servers_asked(&self) -> Vec<Ipv4Addr> {
        self.calls().into_iter().map(|(server, _, _)| server).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn query(
        &self,
        name: &Name,
        qtype: RecordType,
        server: Ipv4Addr,
        _timeout: Duration,
    ) -> Result<Message, TransportError> {
        let key = (server, name.clone(), qtype);
        self.calls.lock().unwrap().push(key.clone());

        self.replies
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(TransportError::Timeout)
    }
}

pub fn resolver(transport: &Arc<MockTransport>) -> Resolver<Arc<MockTransport>> {
    Resolver::new(Arc::clone(transport))
}

pub fn resolver_with(
    transport: &Arc<MockTransport>,
    config: ResolverConfig,
) -> Resolver<Arc<MockTransport>> {
    Resolver::with_config(Arc::clone(transport), config)
}

pub fn ip(addr: &str) -> Ipv4Addr {
    addr.parse().unwrap()
}

pub fn a(owner: &str, addr: &str) -> ResourceRecord {
    ResourceRecord::new(Name::new(owner), 300, RecordData::A(ip(addr)))
}

pub fn aaaa(owner: &str, addr: &str) -> ResourceRecord {
    let addr: Ipv6Addr = addr.parse().unwrap();
    ResourceRecord::new(Name::new(owner), 300, RecordData::Aaaa(addr))
}

pub fn cname(owner: &str, target: &str) -> ResourceRecord {
    ResourceRecord::new(Name::new(owner), 300, RecordData::Cname(Name::new(target)))
}

pub fn mx(owner: &str, preference: u16, exchange: &str) -> ResourceRecord {
    ResourceRecord::new(
        Name::new(owner),
        300,
        RecordData::Mx {
            preference,
            exchange: Name::new(exchange),
        },
    )
}

pub fn ns(zone: &str, host: &str) -> ResourceRecord {
    ResourceRecord::new(Name::new(zone), 3600, RecordData::Ns(Name::new(host)))
}

pub fn soa(zone: &str) -> ResourceRecord {
    ResourceRecord::new(
        Name::new(zone),
        3600,
        RecordData::Soa {
            mname: Name::new(&format!("ns.{zone}")),
            rname: Name::new(&format!("hostmaster.{zone}")),
            serial: 1,
            refresh: 7200,
            retry: 3600,
            expire: 1209600,
            minimum: 300,
        },
    )
}

pub fn answer(records: Vec<ResourceRecord>) -> Message {
    let mut message = Message::default();
    for record in records {
        message.add_answer(record);
    }
    message
}

/// Delegation of `zone` to `servers`, with glue for those that carry an
/// address.
pub fn referral(zone: &str, servers: &[(&str, Option<&str>)]) -> Message {
    let mut message = Message::default();
    for (host, addr) in servers {
        message.add_authority(ns(zone, host));
        if let Some(addr) = addr {
            message.add_additional(a(host, addr));
        }
    }
    message
}

pub fn negative(zone: &str) -> Message {
    let mut message = Message::default();
    message.add_authority(soa(zone));
    message
}
