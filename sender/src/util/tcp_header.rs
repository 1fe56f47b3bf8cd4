use crate::error::{Result, SenderError};

pub const TCP_HEADER_LEN: usize = 20;

pub const TCP_FIN: u8 = 0b0000_0001;
pub const TCP_SYN: u8 = 0b0000_0010;
pub const TCP_RST: u8 = 0b0000_0100;
pub const TCP_PSH: u8 = 0b0000_1000;
pub const TCP_ACK: u8 = 0b0001_0000;
pub const TCP_URG: u8 = 0b0010_0000;

// TCP header struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpHeader {
    pub source_port: u16,
    pub destination_port: u16,
    pub sequence_number: u32,
    pub ack_number: u32,
    pub header_length: u8, // unit of 4 bytes
    pub flags: u8,         // URG, ACK, PSH, RST, SYN, FIN (each 1 bit)
    pub window_size: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
}

impl TcpHeader {
    // Parse the first 20 bytes of a buffer into the header fields
    pub fn parse(header_bytes: &[u8]) -> Result<Self> {
        if header_bytes.len() < TCP_HEADER_LEN {
            return Err(SenderError::Truncated {
                what: "TCP header",
                needed: TCP_HEADER_LEN,
                got: header_bytes.len(),
            });
        }
        let b = header_bytes;

        Ok(TcpHeader {
            source_port: u16::from_be_bytes([b[0], b[1]]),
            destination_port: u16::from_be_bytes([b[2], b[3]]),
            sequence_number: u32::from_be_bytes([b[4], b[5], b[6], b[7]]),
            ack_number: u32::from_be_bytes([b[8], b[9], b[10], b[11]]),
            header_length: b[12] >> 4, // get the first 4 bits
            flags: b[13] & 0b0011_1111, // get the last 6 bits
            window_size: u16::from_be_bytes([b[14], b[15]]),
            checksum: u16::from_be_bytes([b[16], b[17]]),
            urgent_pointer: u16::from_be_bytes([b[18], b[19]]),
        })
    }

    // Convert the header to a byte array
    pub fn as_bytes(&self) -> [u8; TCP_HEADER_LEN] {
        let mut res = [0u8; TCP_HEADER_LEN];
        res[0..2].copy_from_slice(&self.source_port.to_be_bytes());
        res[2..4].copy_from_slice(&self.destination_port.to_be_bytes());
        res[4..8].copy_from_slice(&self.sequence_number.to_be_bytes());
        res[8..12].copy_from_slice(&self.ack_number.to_be_bytes());
        res[12] = self.header_length << 4;
        res[13] = self.flags & 0b0011_1111;
        res[14..16].copy_from_slice(&self.window_size.to_be_bytes());
        res[16..18].copy_from_slice(&self.checksum.to_be_bytes());
        res[18..20].copy_from_slice(&self.urgent_pointer.to_be_bytes());
        res
    }

    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }
}
