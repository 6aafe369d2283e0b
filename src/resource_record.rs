use std::io::Cursor;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use derivative::Derivative;
use tracing::instrument;

use super::{Name, Networkable};
use crate::question::CLASS_IN;
use crate::{DnsError, RecordType};

mod record_data;
pub use record_data::RecordData;

#[derive(Derivative)]
#[derivative(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,
    pub type_: RecordType,
    pub class: u16,
    #[derivative(PartialEq = "ignore")]
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(name: Name, ttl: u32, data: RecordData) -> Self {
        Self {
            name,
            type_: data.record_type(),
            class: CLASS_IN,
            ttl,
            data,
        }
    }

    pub fn is_soa(&self) -> bool {
        self.type_ == RecordType::Soa
    }
}

impl Networkable for ResourceRecord {
    #[instrument(level = "trace", skip_all)]
    fn to_bytes(&self) -> Bytes {
        let mut ret = BytesMut::new();
        ret.extend_from_slice(&self.name.to_bytes());
        ret.put_u16(self.type_.to_int());
        ret.put_u16(self.class);
        ret.put_u32(self.ttl);
        let data = self.data.to_bytes();
        ret.put_u16(data.len() as u16);
        ret.extend_from_slice(&data);

        ret.into()
    }

    #[instrument(level = "trace", skip_all)]
    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let name = Name::from_bytes(bytes)?;

        if bytes.remaining() < 10 {
            return Err(DnsError::FormatError);
        }

        let type_ = RecordType::from_int(bytes.get_u16());
        let class = bytes.get_u16();
        let ttl = bytes.get_u32();
        let data_length = bytes.get_u16();

        let data = RecordData::from_bytes(type_, data_length, bytes)?;

        Ok(Self {
            name,
            type_,
            class,
            ttl,
            data,
        })
    }
}
