use std::net::Ipv4Addr;

use log::debug;

use crate::error::{Result, SenderError};
use crate::util::checksum::internet_checksum;
use crate::util::ip_header::{Ipv4Header, IPPROTO_TCP, IPV4_HEADER_LEN};
use crate::util::pseudo_header::PseudoHeader;
use crate::util::tcp_header::{TcpHeader, TCP_ACK, TCP_HEADER_LEN, TCP_SYN};

pub const DEFAULT_TTL: u8 = 255;
pub const DEFAULT_WINDOW: u16 = 5840;

/// Largest payload that keeps the 16-bit total length in range
pub const MAX_PAYLOAD: usize = u16::MAX as usize - IPV4_HEADER_LEN - TCP_HEADER_LEN;

/// Addresses, ports and numbering for one segment
#[derive(Debug, Clone)]
pub struct ConnectionParameters {
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub source_port: u16,
    pub destination_port: u16,
    pub sequence_number: u32,
    pub ack_number: u32,
    pub identification: u16,
    pub payload: Vec<u8>,
}

/// Which of the two hand-built segments is being produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Syn,
    DataAck,
}

/// Byte range the IPv4 header checksum is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IpChecksumScope {
    /// The 20-byte IPv4 header only
    #[default]
    Header,
    /// `total_length` bytes of the zero-checksum datagram, TCP header and
    /// payload included
    TotalLength,
}

/// Populate both headers for `kind`, with checksum fields left at zero.
///
/// A SYN always carries sequence and acknowledgment 0; the data segment
/// takes whatever numbers the caller asserts.
pub fn build_headers(
    params: &ConnectionParameters,
    kind: SegmentKind,
) -> Result<(Ipv4Header, TcpHeader)> {
    if params.payload.len() > MAX_PAYLOAD {
        return Err(SenderError::PayloadTooLarge(params.payload.len()));
    }
    let total_length = (IPV4_HEADER_LEN + TCP_HEADER_LEN + params.payload.len()) as u16;

    let ip = Ipv4Header {
        version: 4,
        ihl: 5,
        tos: 0,
        total_length,
        identification: params.identification,
        flags_fragment: 0,
        ttl: DEFAULT_TTL,
        protocol: IPPROTO_TCP,
        checksum: 0,
        source: params.source,
        destination: params.destination,
    };

    let (flags, sequence_number, ack_number) = match kind {
        SegmentKind::Syn => (TCP_SYN, 0, 0),
        SegmentKind::DataAck => (TCP_ACK, params.sequence_number, params.ack_number),
    };

    let tcp = TcpHeader {
        source_port: params.source_port,
        destination_port: params.destination_port,
        sequence_number,
        ack_number,
        header_length: 5,
        flags,
        window_size: DEFAULT_WINDOW,
        checksum: 0,
        urgent_pointer: 0,
    };

    Ok((ip, tcp))
}

/// A fully assembled IPv4 + TCP + payload datagram
#[derive(Debug, Clone)]
pub struct Packet {
    ip: Ipv4Header,
    tcp: TcpHeader,
    buffer: Vec<u8>,
}

impl Packet {
    /// Lay out `ip ++ tcp ++ payload` and fill in both checksums.
    ///
    /// `ip.total_length` is rewritten to the length actually laid out.
    pub fn assemble(
        mut ip: Ipv4Header,
        mut tcp: TcpHeader,
        payload: &[u8],
        scope: IpChecksumScope,
    ) -> Result<Self> {
        if payload.len() > MAX_PAYLOAD {
            return Err(SenderError::PayloadTooLarge(payload.len()));
        }
        ip.total_length = (IPV4_HEADER_LEN + TCP_HEADER_LEN + payload.len()) as u16;
        ip.checksum = 0;
        tcp.checksum = 0;

        let mut buffer = Vec::with_capacity(IPV4_HEADER_LEN + TCP_HEADER_LEN + payload.len());
        buffer.extend_from_slice(&ip.as_bytes());
        buffer.extend_from_slice(&tcp.as_bytes());
        buffer.extend_from_slice(payload);

        let ip_region = match scope {
            IpChecksumScope::Header => IPV4_HEADER_LEN,
            IpChecksumScope::TotalLength => ip.total_length as usize,
        };
        ip.checksum = internet_checksum(&buffer[..ip_region]);
        buffer[10..12].copy_from_slice(&ip.checksum.to_be_bytes());

        let pseudo = pseudo_header_for(&ip, buffer.len() - IPV4_HEADER_LEN);
        tcp.checksum = pseudo.tcp_checksum(&buffer[IPV4_HEADER_LEN..]);
        buffer[IPV4_HEADER_LEN..IPV4_HEADER_LEN + TCP_HEADER_LEN].copy_from_slice(&tcp.as_bytes());

        debug!(
            "assembled {} bytes: flags={:02x} seq={} ack={} ip_csum={:04x} tcp_csum={:04x}",
            buffer.len(),
            tcp.flags,
            tcp.sequence_number,
            tcp.ack_number,
            ip.checksum,
            tcp.checksum
        );

        Ok(Packet { ip, tcp, buffer })
    }

    /// Build headers for `kind` from `params` and assemble them.
    pub fn build(
        params: &ConnectionParameters,
        kind: SegmentKind,
        scope: IpChecksumScope,
    ) -> Result<Self> {
        let (ip, tcp) = build_headers(params, kind)?;
        Self::assemble(ip, tcp, &params.payload, scope)
    }

    pub fn ip_header(&self) -> &Ipv4Header {
        &self.ip
    }

    pub fn tcp_header(&self) -> &TcpHeader {
        &self.tcp
    }

    pub fn payload(&self) -> &[u8] {
        &self.buffer[IPV4_HEADER_LEN + TCP_HEADER_LEN..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

fn pseudo_header_for(ip: &Ipv4Header, tcp_length: usize) -> PseudoHeader {
    PseudoHeader {
        source: ip.source,
        destination: ip.destination,
        protocol: ip.protocol,
        tcp_length: tcp_length as u16,
    }
}

/// Recompute the IPv4 header checksum over a received datagram.
/// Returns 0 when the stored checksum is consistent.
pub fn verify_ip_checksum(datagram: &[u8]) -> Result<u16> {
    let ip = Ipv4Header::parse(datagram)?;
    let len = ip.header_len();
    if datagram.len() < len {
        return Err(SenderError::Truncated {
            what: "IPv4 header",
            needed: len,
            got: datagram.len(),
        });
    }
    Ok(internet_checksum(&datagram[..len]))
}

/// Recompute the TCP checksum (pseudo-header included) over a datagram.
/// Returns 0 when the stored checksum is consistent.
pub fn verify_tcp_checksum(datagram: &[u8]) -> Result<u16> {
    let ip = Ipv4Header::parse(datagram)?;
    let end = ip.total_length as usize;
    let start = ip.header_len();
    if datagram.len() < end || end < start + TCP_HEADER_LEN {
        return Err(SenderError::Truncated {
            what: "TCP segment",
            needed: end.max(start + TCP_HEADER_LEN),
            got: datagram.len(),
        });
    }
    let segment = &datagram[start..end];
    Ok(pseudo_header_for(&ip, segment.len()).tcp_checksum(segment))
}
