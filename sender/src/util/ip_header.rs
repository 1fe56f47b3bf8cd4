use std::net::Ipv4Addr;

use crate::error::{Result, SenderError};

pub const IPV4_HEADER_LEN: usize = 20;
pub const IPPROTO_TCP: u8 = 6;

// IPv4 header struct (no options, IHL is always 5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Header {
    pub version: u8,
    pub ihl: u8, // unit of 4 bytes
    pub tos: u8,
    pub total_length: u16, // IP header + TCP header + payload, in bytes
    pub identification: u16,
    pub flags_fragment: u16, // flags (3 bits) + fragment offset (13 bits)
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
}

impl Ipv4Header {
    // Parse the first 20 bytes of a buffer into the header fields
    pub fn parse(header_bytes: &[u8]) -> Result<Self> {
        if header_bytes.len() < IPV4_HEADER_LEN {
            return Err(SenderError::Truncated {
                what: "IPv4 header",
                needed: IPV4_HEADER_LEN,
                got: header_bytes.len(),
            });
        }
        let b = header_bytes;

        Ok(Ipv4Header {
            version: b[0] >> 4,
            ihl: b[0] & 0x0F,
            tos: b[1],
            total_length: u16::from_be_bytes([b[2], b[3]]),
            identification: u16::from_be_bytes([b[4], b[5]]),
            flags_fragment: u16::from_be_bytes([b[6], b[7]]),
            ttl: b[8],
            protocol: b[9],
            checksum: u16::from_be_bytes([b[10], b[11]]),
            source: Ipv4Addr::new(b[12], b[13], b[14], b[15]),
            destination: Ipv4Addr::new(b[16], b[17], b[18], b[19]),
        })
    }

    // Serialize the header in network byte order
    pub fn as_bytes(&self) -> [u8; IPV4_HEADER_LEN] {
        let mut res = [0u8; IPV4_HEADER_LEN];
        res[0] = (self.version << 4) | (self.ihl & 0x0F);
        res[1] = self.tos;
        res[2..4].copy_from_slice(&self.total_length.to_be_bytes());
        res[4..6].copy_from_slice(&self.identification.to_be_bytes());
        res[6..8].copy_from_slice(&self.flags_fragment.to_be_bytes());
        res[8] = self.ttl;
        res[9] = self.protocol;
        res[10..12].copy_from_slice(&self.checksum.to_be_bytes());
        res[12..16].copy_from_slice(&self.source.octets());
        res[16..20].copy_from_slice(&self.destination.octets());
        res
    }

    pub fn header_len(&self) -> usize {
        self.ihl as usize * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ipv4Header {
        Ipv4Header {
            version: 4,
            ihl: 5,
            tos: 0,
            total_length: 67,
            identification: 54321,
            flags_fragment: 0,
            ttl: 255,
            protocol: IPPROTO_TCP,
            checksum: 0xBEEF,
            source: Ipv4Addr::new(11, 111, 1, 2),
            destination: Ipv4Addr::new(172, 17, 0, 2),
        }
    }

    #[test]
    fn test_field_offsets() {
        let bytes = sample().as_bytes();
        assert_eq!(bytes[0], 0x45);
        assert_eq!(bytes[1], 0);
        assert_eq!(&bytes[2..4], &[0x00, 0x43]);
        assert_eq!(&bytes[4..6], &54321u16.to_be_bytes());
        assert_eq!(&bytes[6..8], &[0, 0]);
        assert_eq!(bytes[8], 255);
        assert_eq!(bytes[9], 6);
        assert_eq!(&bytes[10..12], &[0xBE, 0xEF]);
        assert_eq!(&bytes[12..16], &[11, 111, 1, 2]);
        assert_eq!(&bytes[16..20], &[172, 17, 0, 2]);
    }

    #[test]
    fn test_parse_reads_back_fields() {
        let header = sample();
        let parsed = Ipv4Header::parse(&header.as_bytes()).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.header_len(), 20);
    }

    #[test]
    fn test_parse_short_buffer() {
        let err = Ipv4Header::parse(&[0x45; 19]).unwrap_err();
        assert!(matches!(
            err,
            SenderError::Truncated { needed: 20, got: 19, .. }
        ));
    }
}
