use std::io::Cursor;
use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::debug;

use super::Transport;
use crate::{Message, Name, Networkable, Question, RecordType, TransportError};

pub const DNS_PORT: u16 = 53;

// http://www.dnsflagday.net/2020/
const RECV_BUFFER_SIZE: usize = 1232;

const RCODE_SERVFAIL: u8 = 2;
const RCODE_NOTIMP: u8 = 4;
const RCODE_REFUSED: u8 = 5;

/// Plain DNS over UDP, one socket per exchange.
#[derive(Debug, Clone)]
pub struct UdpTransport {
    port: u16,
}

impl UdpTransport {
    pub fn new() -> Self {
        Self::with_port(DNS_PORT)
    }

    pub fn with_port(port: u16) -> Self {
        Self { port }
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn query(
        &self,
        name: &Name,
        qtype: RecordType,
        server: Ipv4Addr,
        timeout: Duration,
    ) -> Result<Message, TransportError> {
        let id = rand::random::<u16>();
        let query = Message::query(id, Question::new(name.clone(), qtype));

        let sock = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        // Connecting drops datagrams from any other source
        sock.connect((server, self.port)).await?;
        sock.send(&query.to_bytes()).await?;

        debug!(%server, %name, %qtype, id, "query sent");

        let mut buf = [0; RECV_BUFFER_SIZE];
        let len = tokio::time::timeout(timeout, sock.recv(&mut buf))
            .await
            .map_err(|_| TransportError::Timeout)??;

        let response = Message::from_bytes(&mut Cursor::new(&buf[..len]))?;
        check_response(id, &response)?;

        debug!(
            %server,
            answers = response.answers.len(),
            authorities = response.authorities.len(),
            additionals = response.additionals.len(),
            "response received"
        );

        Ok(response)
    }
}

fn check_response(id: u16, response: &Message) -> Result<(), TransportError> {
    let flags = response.header.flags;

    if response.header.id != id {
        return Err(TransportError::Protocol(format!(
            "response id {} does not match query id {}",
            response.header.id, id
        )));
    }

    if !flags.qr() {
        return Err(TransportError::Protocol("reply is not a response".into()));
    }

    if flags.tc() {
        // No TCP fallback, use whatever fit in the datagram
        debug!("response truncated");
    }

    match flags.rcode() {
        code @ (RCODE_SERVFAIL | RCODE_NOTIMP | RCODE_REFUSED) => Err(TransportError::Protocol(
            format!("server answered with rcode {code}"),
        )),
        _ => Ok(()),
    }
}
