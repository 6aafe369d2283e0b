use std::fmt::Display;

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

#[derive(FromPrimitive, ToPrimitive, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    Unknown = 0,
    A = 1,
    Ns = 2,
    Cname = 5,
    Soa = 6,
    Ptr = 12,
    Hinfo = 13,
    Mx = 15,
    Txt = 16,
    Aaaa = 28,
    Srv = 33,
    Opt = 41,
    Ds = 43,
    Rrsig = 46,
    Nsec = 47,
    Dnskey = 48,
    Nsec3 = 50,
}

impl RecordType {
    /// Codes this crate has no name for map to `Unknown`.
    pub fn from_int(code: u16) -> Self {
        Self::from_u16(code).unwrap_or(Self::Unknown)
    }

    pub fn to_int(self) -> u16 {
        self.to_u16().unwrap_or(0)
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "UNKNOWN",
            Self::A => "A",
            Self::Ns => "NS",
            Self::Cname => "CNAME",
            Self::Soa => "SOA",
            Self::Ptr => "PTR",
            Self::Hinfo => "HINFO",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Aaaa => "AAAA",
            Self::Srv => "SRV",
            Self::Opt => "OPT",
            Self::Ds => "DS",
            Self::Rrsig => "RRSIG",
            Self::Nsec => "NSEC",
            Self::Dnskey => "DNSKEY",
            Self::Nsec3 => "NSEC3",
        };
        f.write_str(s)
    }
}
