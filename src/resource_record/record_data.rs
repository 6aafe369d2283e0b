use std::io::Cursor;
use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::{DnsError, Name, Networkable, RecordType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Ns(Name),
    Cname(Name),
    Soa {
        mname: Name,
        rname: Name,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Mx {
        preference: u16,
        exchange: Name,
    },
    Txt(String),
    Aaaa(Ipv6Addr),
    Other(Bytes),
}

impl RecordData {
    pub fn from_bytes(
        type_: RecordType,
        rd_length: u16,
        bytes: &mut Cursor<&[u8]>,
    ) -> Result<Self, DnsError> {
        let rd_length = rd_length as usize;
        if bytes.remaining() < rd_length {
            return Err(DnsError::FormatError);
        }
        let end = bytes.position() + rd_length as u64;

        let data = match type_ {
            RecordType::A => {
                if rd_length != 4 {
                    return Err(DnsError::FormatError);
                }
                Self::A(bytes.get_u32().into())
            }
            RecordType::Aaaa => {
                if rd_length != 16 {
                    return Err(DnsError::FormatError);
                }
                Self::Aaaa(bytes.get_u128().into())
            }
            RecordType::Ns => Self::Ns(Name::from_bytes(bytes)?),
            RecordType::Cname => Self::Cname(Name::from_bytes(bytes)?),
            RecordType::Mx => {
                if rd_length < 3 {
                    return Err(DnsError::FormatError);
                }
                let preference = bytes.get_u16();
                let exchange = Name::from_bytes(bytes)?;
                Self::Mx {
                    preference,
                    exchange,
                }
            }
            RecordType::Soa => {
                let mname = Name::from_bytes(bytes)?;
                let rname = Name::from_bytes(bytes)?;
                if bytes.remaining() < 20 {
                    return Err(DnsError::FormatError);
                }
                Self::Soa {
                    mname,
                    rname,
                    serial: bytes.get_u32(),
                    refresh: bytes.get_u32(),
                    retry: bytes.get_u32(),
                    expire: bytes.get_u32(),
                    minimum: bytes.get_u32(),
                }
            }
            RecordType::Txt => {
                let mut text = String::new();
                let mut left = rd_length;
                while left > 0 {
                    let len = bytes.get_u8() as usize;
                    if len + 1 > left {
                        return Err(DnsError::FormatError);
                    }
                    let chunk = bytes.copy_to_bytes(len);
                    text.push_str(&String::from_utf8_lossy(&chunk));
                    left -= len + 1;
                }
                Self::Txt(text)
            }
            other => {
                trace!("keeping record data of type {} opaque", other);
                Self::Other(bytes.copy_to_bytes(rd_length))
            }
        };

        // Names inside the data may not run past the declared length
        if bytes.position() != end {
            return Err(DnsError::FormatError);
        }

        Ok(data)
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut ret = BytesMut::new();
        match self {
            Self::A(addr) => ret.put_u32((*addr).into()),
            Self::Aaaa(addr) => ret.put_u128((*addr).into()),
            Self::Ns(name) | Self::Cname(name) => ret.extend_from_slice(&name.to_bytes()),
            Self::Mx {
                preference,
                exchange,
            } => {
                ret.put_u16(*preference);
                ret.extend_from_slice(&exchange.to_bytes());
            }
            Self::Soa {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => {
                ret.extend_from_slice(&mname.to_bytes());
                ret.extend_from_slice(&rname.to_bytes());
                for value in [serial, refresh, retry, expire, minimum] {
                    ret.put_u32(*value);
                }
            }
            Self::Txt(text) => {
                for chunk in text.as_bytes().chunks(255) {
                    ret.put_u8(chunk.len() as u8);
                    ret.extend_from_slice(chunk);
                }
            }
            Self::Other(data) => ret.extend_from_slice(data),
        }
        ret.into()
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A(_) => RecordType::A,
            Self::Ns(_) => RecordType::Ns,
            Self::Cname(_) => RecordType::Cname,
            Self::Soa { .. } => RecordType::Soa,
            Self::Mx { .. } => RecordType::Mx,
            Self::Txt(_) => RecordType::Txt,
            Self::Aaaa(_) => RecordType::Aaaa,
            Self::Other(_) => RecordType::Unknown,
        }
    }
}
