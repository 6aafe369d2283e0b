use std::io::Cursor;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use rootwalk::transport::{Transport, UdpTransport};
use rootwalk::{
    Flags, Header, Message, Name, Networkable, RecordData, RecordType, ResourceRecord,
    TransportError,
};
use tokio::net::UdpSocket;

const LOCALHOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Answers a single query by letting `reply` turn it into a response.
async fn serve_once<F>(reply: F) -> SocketAddr
where
    F: FnOnce(Message) -> Message + Send + 'static,
{
    let socket = UdpSocket::bind((LOCALHOST, 0)).await.unwrap();
    let addr = socket.local_addr().unwrap();

    tokio::spawn(async move {
        let mut buf = [0u8; 512];
        let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
        let query = Message::from_bytes(&mut Cursor::new(&buf[..len])).unwrap();
        let response = reply(query);
        socket.send_to(&response.to_bytes(), peer).await.unwrap();
    });

    addr
}

fn response_to(query: &Message, rcode: u8) -> Message {
    let mut flags = Flags::default();
    flags.set_qr(true);
    flags.set_aa(true);
    flags.set_rcode(rcode);

    let mut response = Message::new(Header::new(query.header.id, flags));
    for question in &query.questions {
        response.add_question(question.clone());
    }
    response
}

#[tokio::test]
async fn test_udp_query_returns_parsed_answer() {
    let addr = serve_once(|query| {
        assert!(!query.header.flags.rd());
        assert_eq!(query.questions[0].type_, RecordType::A);

        let mut response = response_to(&query, 0);
        response.add_answer(ResourceRecord::new(
            query.questions[0].name.clone(),
            300,
            RecordData::A(Ipv4Addr::new(10, 0, 0, 2)),
        ));
        response
    })
    .await;

    let transport = UdpTransport::with_port(addr.port());
    let response = transport
        .query(
            &Name::new("example.test"),
            RecordType::A,
            LOCALHOST,
            Duration::from_secs(2),
        )
        .await
        .unwrap();

    assert_eq!(response.answers.len(), 1);
    assert_eq!(
        response.answers[0].data,
        RecordData::A(Ipv4Addr::new(10, 0, 0, 2))
    );
}

#[tokio::test]
async fn test_udp_query_passes_nxdomain_through() {
    let addr = serve_once(|query| response_to(&query, 3)).await;

    let transport = UdpTransport::with_port(addr.port());
    let response = transport
        .query(
            &Name::new("missing.test"),
            RecordType::A,
            LOCALHOST,
            Duration::from_secs(2),
        )
        .await
        .unwrap();

    assert_eq!(response.header.flags.rcode(), 3);
}

#[tokio::test]
async fn test_udp_query_times_out() {
    // bound but never answers
    let silent = UdpSocket::bind((LOCALHOST, 0)).await.unwrap();
    let port = silent.local_addr().unwrap().port();

    let transport = UdpTransport::with_port(port);
    let result = transport
        .query(
            &Name::new("example.test"),
            RecordType::A,
            LOCALHOST,
            Duration::from_millis(100),
        )
        .await;

    assert!(matches!(result, Err(TransportError::Timeout)));
}

#[tokio::test]
async fn test_udp_query_rejects_wrong_id() {
    let addr = serve_once(|query| {
        let mut response = response_to(&query, 0);
        response.header.id = query.header.id.wrapping_add(1);
        response
    })
    .await;

    let transport = UdpTransport::with_port(addr.port());
    let result = transport
        .query(
            &Name::new("example.test"),
            RecordType::A,
            LOCALHOST,
            Duration::from_secs(2),
        )
        .await;

    assert!(matches!(result, Err(TransportError::Protocol(_))));
}

#[tokio::test]
async fn test_udp_query_rejects_refused() {
    let addr = serve_once(|query| response_to(&query, 5)).await;

    let transport = UdpTransport::with_port(addr.port());
    let result = transport
        .query(
            &Name::new("example.test"),
            RecordType::Mx,
            LOCALHOST,
            Duration::from_secs(2),
        )
        .await;

    assert!(matches!(result, Err(TransportError::Protocol(_))));
}
