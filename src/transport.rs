use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{Message, Name, RecordType, TransportError};

mod udp;
pub use udp::{UdpTransport, DNS_PORT};

/// One question to one server. Implementations keep no state between
/// calls; a timeout or an unusable reply comes back as an error so the
/// resolver can move on to the next candidate.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn query(
        &self,
        name: &Name,
        qtype: RecordType,
        server: Ipv4Addr,
        timeout: Duration,
    ) -> Result<Message, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn query(
        &self,
        name: &Name,
        qtype: RecordType,
        server: Ipv4Addr,
        timeout: Duration,
    ) -> Result<Message, TransportError> {
        (**self).query(name, qtype, server, timeout).await
    }
}
