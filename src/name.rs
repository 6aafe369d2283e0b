use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::io::Cursor;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::Networkable;
use crate::DnsError;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 253;

/// A domain name. Comparison and hashing ignore ASCII case, and a trailing
/// dot is dropped on construction so `example.test.` and `Example.Test` are
/// the same key.
#[derive(Debug, Clone)]
pub struct Name {
    /// This is the domain name
    /// E.g. www.google.com
    pub name: String,

    /// This is a vector of all the indices where a label starts
    /// E.g. www.google.com would have a split_indices of [0, 4, 11]
    pub split_indices: Vec<usize>,
}

impl Name {
    pub fn new(name: &str) -> Self {
        let name = name.strip_suffix('.').unwrap_or(name);

        let mut split_indices = Vec::new();
        if !name.is_empty() {
            split_indices.push(0);
            split_indices.extend(name.match_indices('.').map(|(i, _)| i + 1));
        }

        Self {
            name: name.to_owned(),
            split_indices,
        }
    }

    /// Validates user supplied input before building the name.
    pub fn parse(input: &str) -> Result<Self, DnsError> {
        let trimmed = input.trim();
        let bare = trimmed.strip_suffix('.').unwrap_or(trimmed);

        if bare.is_empty() || bare.len() > MAX_NAME_LEN || !bare.is_ascii() {
            return Err(DnsError::InvalidName(input.to_owned()));
        }

        let labels_ok = bare
            .split('.')
            .all(|label| !label.is_empty() && label.len() <= MAX_LABEL_LEN);
        if !labels_ok {
            return Err(DnsError::InvalidName(input.to_owned()));
        }

        Ok(Self::new(bare))
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    /// Get larger and larger subdomains
    /// Eg www.google.com -> [com, google.com, www.google.com]
    pub fn iter_subdomains(&self) -> impl DoubleEndedIterator<Item = Name> + '_ {
        self.split_indices
            .iter()
            .rev()
            .map(|i| Name::new(&self.name[*i..]))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.name.split('.').filter(|label| !label.is_empty())
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.name.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0);
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Networkable for Name {
    fn to_bytes(&self) -> Bytes {
        let mut ret = BytesMut::new();

        for section in self.labels() {
            ret.put_u8(section.len() as u8);
            ret.extend_from_slice(section.as_bytes());
        }

        ret.put_u8(0);

        ret.into()
    }

    fn from_bytes(bytes: &mut Cursor<&[u8]>) -> Result<Self, DnsError> {
        let mut parts: Vec<String> = Vec::new();

        // Where to continue once the first compression pointer is followed
        let mut resume = None;
        // Pointers have to jump strictly backwards, which rules out loops
        let mut limit = bytes.position();

        loop {
            if !bytes.has_remaining() {
                return Err(DnsError::FormatError);
            }

            let len = bytes.get_u8();
            if len == 0 {
                break;
            }

            match len & 0b1100_0000 {
                0b1100_0000 => {
                    // Compressed
                    if !bytes.has_remaining() {
                        return Err(DnsError::FormatError);
                    }
                    let pointer = (((len & 0b0011_1111) as u64) << 8) | (bytes.get_u8() as u64);
                    if pointer >= limit {
                        return Err(DnsError::FormatError);
                    }
                    if resume.is_none() {
                        resume = Some(bytes.position());
                    }
                    limit = pointer;
                    bytes.set_position(pointer);
                }
                0 => {
                    // Uncompressed
                    let len = len as usize;
                    if bytes.remaining() < len {
                        return Err(DnsError::FormatError);
                    }

                    let chars = bytes.copy_to_bytes(len);
                    let s = std::str::from_utf8(&chars).or(Err(DnsError::FormatError))?;
                    parts.push(s.to_owned());
                }
                _ => return Err(DnsError::FormatError),
            }
        }

        if let Some(position) = resume {
            bytes.set_position(position);
        }

        Ok(Self::new(&parts.join(".")))
    }
}
