use std::net::Ipv4Addr;

use super::checksum::internet_checksum;

pub const PSEUDO_HEADER_LEN: usize = 12;

/// TCP pseudo-header. Checksum input only, never transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoHeader {
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub protocol: u8,
    pub tcp_length: u16, // TCP header + payload
}

impl PseudoHeader {
    pub fn as_bytes(&self) -> [u8; PSEUDO_HEADER_LEN] {
        let mut res = [0u8; PSEUDO_HEADER_LEN];
        res[0..4].copy_from_slice(&self.source.octets());
        res[4..8].copy_from_slice(&self.destination.octets());
        // res[8] stays zero
        res[9] = self.protocol;
        res[10..12].copy_from_slice(&self.tcp_length.to_be_bytes());
        res
    }

    /// Pseudo-header followed by the serialized TCP segment.
    pub fn checksum_input(&self, tcp_segment: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PSEUDO_HEADER_LEN + tcp_segment.len());
        buf.extend_from_slice(&self.as_bytes());
        buf.extend_from_slice(tcp_segment);
        buf
    }

    /// TCP checksum over pseudo-header ++ segment. The scratch buffer lives
    /// only for the duration of this call.
    pub fn tcp_checksum(&self, tcp_segment: &[u8]) -> u16 {
        internet_checksum(&self.checksum_input(tcp_segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ip_header::IPPROTO_TCP;

    fn sample(tcp_length: u16) -> PseudoHeader {
        PseudoHeader {
            source: Ipv4Addr::new(11, 111, 1, 2),
            destination: Ipv4Addr::new(172, 17, 0, 2),
            protocol: IPPROTO_TCP,
            tcp_length,
        }
    }

    #[test]
    fn test_layout() {
        let bytes = sample(47).as_bytes();
        assert_eq!(bytes, [11, 111, 1, 2, 172, 17, 0, 2, 0, 6, 0x00, 0x2F]);
    }

    #[test]
    fn test_checksum_input_concatenates() {
        let segment = [0xAAu8; 25];
        let input = sample(25).checksum_input(&segment);
        assert_eq!(input.len(), PSEUDO_HEADER_LEN + 25);
        assert_eq!(&input[..PSEUDO_HEADER_LEN], &sample(25).as_bytes());
        assert_eq!(&input[PSEUDO_HEADER_LEN..], &segment);
    }

    #[test]
    fn test_tcp_checksum_matches_manual_sum() {
        let segment = [0x01, 0x02, 0x03];
        let pseudo = sample(3);
        let mut manual = pseudo.as_bytes().to_vec();
        manual.extend_from_slice(&segment);
        assert_eq!(pseudo.tcp_checksum(&segment), internet_checksum(&manual));
    }
}
