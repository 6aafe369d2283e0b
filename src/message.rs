use std::io::Cursor;

use bytes::{Bytes, BytesMut};
use tracing::instrument;

use super::{Header, Networkable, Question, ResourceRecord};
use crate::{DnsError, Flags};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            ..Default::default()
        }
    }

    /// Builds an iterative query: recursion desired is left clear since
    /// every server asked is expected to answer or refer, not recurse.
    pub fn query(id: u16, question: Question) -> Self {
        let mut flags = Flags::default();
        flags.set_rd(false);

        let mut message = Self::new(Header::new(id, flags));
        message.add_question(question);
        message
    }

    pub fn add_question(&mut self, question: Question) {
        self.header.num_questions += 1;
        self.questions.push(question)
    }

    pub fn add_answer(&mut self, answer: ResourceRecord) {
        self.header.num_answers += 1;
        self.answers.push(answer)
    }

    pub fn add_authority(&mut self, answer: ResourceRecord) {
        self.header.num_authorities += 1;
        self.authorities.push(answer)
    }

    pub fn add_additional(&mut self, answer: ResourceRecord) {
        self.header.num_additionals += 1;
        self.additionals.push(answer)
    }

    /// True when no section carries a record.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.authorities.is_empty() && self.additionals.is_empty()
    }

    /// An SOA leading the authority section marks an authoritative
    /// negative or empty answer.
    pub fn starts_with_soa(&self) -> bool {
        self.authorities.first().is_some_and(ResourceRecord::is_soa)
    }
}

impl Networkable for Message {
    #[instrument(level = "debug", skip_all)]
    fn to_bytes(&self) -> Bytes {
        let mut header = self.header.clone();
        header.num_questions = self.questions.len() as u16;
        header.num_answers = self.answers.len() as u16;
        header.num_authorities = self.authorities.len() as u16;
        header.num_additionals = self.additionals.len() as u16;

        let mut response = BytesMut::new();
        response.extend_from_slice(&header.to_bytes());

        for question in self.questions.iter() {
            response.extend_from_slice(&question.to_bytes())
        }

        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            response.extend_from_slice(&record.to_bytes())
        }

        response.into()
    }

    #[instrument(level = "debug", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let header = Header::from_bytes(bytes)?;

        let mut questions = Vec::new();
        for _ in 0..header.num_questions {
            questions.push(Question::from_bytes(bytes)?);
        }

        let mut answers = Vec::new();
        for _ in 0..header.num_answers {
            answers.push(ResourceRecord::from_bytes(bytes)?);
        }

        let mut authorities = Vec::new();
        for _ in 0..header.num_authorities {
            authorities.push(ResourceRecord::from_bytes(bytes)?);
        }

        let mut additionals = Vec::new();
        for _ in 0..header.num_additionals {
            additionals.push(ResourceRecord::from_bytes(bytes)?);
        }

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::{Name, RecordData, RecordType};

    // Referral for example.test from a TLD server: one NS with glue, names
    // compressed against the question.
    const REFERRAL: &[u8] = &[
        0x12, 0x34, 0x80, 0x00, 0, 1, 0, 0, 0, 1, 0, 1, // header
        7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 4, b't', b'e', b's', b't', 0, 0, 1, 0, 1,
        // authority: example.test NS ns1.example.test
        0xc0, 0x0c, 0, 2, 0, 1, 0, 0, 0x0e, 0x10, 0, 6, 3, b'n', b's', b'1', 0xc0, 0x0c,
        // additional: ns1.example.test A 10.0.0.1
        0xc0, 0x2a, 0, 1, 0, 1, 0, 0, 0x0e, 0x10, 0, 4, 10, 0, 0, 1,
    ];

    #[test]
    fn decodes_referral() {
        let message = Message::from_bytes(&mut Cursor::new(REFERRAL)).unwrap();

        assert!(message.header.flags.qr());
        assert_eq!(
            message.questions,
            [Question::new(Name::new("example.test"), RecordType::A)]
        );
        assert!(message.answers.is_empty());
        assert_eq!(
            message.authorities[0].data,
            RecordData::Ns(Name::new("ns1.example.test"))
        );
        assert_eq!(message.additionals[0].name, Name::new("ns1.example.test"));
        assert_eq!(
            message.additionals[0].data,
            RecordData::A(Ipv4Addr::new(10, 0, 0, 1))
        );
        assert!(!message.starts_with_soa());
    }

    #[test]
    fn rejects_truncated_section() {
        let cut = &REFERRAL[..REFERRAL.len() - 2];
        assert_eq!(
            Message::from_bytes(&mut Cursor::new(cut)),
            Err(DnsError::FormatError)
        );
    }

    #[test]
    fn query_keeps_recursion_off() {
        let query = Message::query(7, Question::new(Name::new("example.test"), RecordType::Mx));
        let bytes = query.to_bytes();

        assert_eq!(&bytes[..4], &[0, 7, 0, 0]);
        assert_eq!(&bytes[4..6], &[0, 1]);
        assert_eq!(&bytes[bytes.len() - 4..], &[0, 15, 0, 1]);
    }

    #[test]
    fn detects_leading_soa() {
        let mut message = Message::default();
        message.add_authority(ResourceRecord::new(
            Name::new("test"),
            300,
            RecordData::Soa {
                mname: Name::new("ns.test"),
                rname: Name::new("hostmaster.test"),
                serial: 1,
                refresh: 2,
                retry: 3,
                expire: 4,
                minimum: 5,
            },
        ));

        assert!(message.starts_with_soa());
        assert!(!message.is_empty());
    }
}
