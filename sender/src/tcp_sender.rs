use std::net::{Ipv4Addr, SocketAddrV4};

use log::{debug, error, info};

use crate::error::Result;
use crate::packet::{ConnectionParameters, IpChecksumScope, Packet, SegmentKind};
use crate::transport::Transmit;
use crate::util::util::printable;

// Sender status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Init,
    SynSent,  // SYN handed to the transport (or the send failed)
    DataSent, // ACK + data handed to the transport, no reply ever read
    Done,
}

/// Everything the two segments are built from
#[derive(Debug, Clone)]
pub struct SenderConfig {
    pub source: Ipv4Addr,
    pub destination: SocketAddrV4,
    pub source_port: u16,
    pub identification: u16,
    pub syn_payload: Vec<u8>,
    pub data_payload: Vec<u8>,
    pub data_seq: u32,
    pub data_ack: u32,
    pub ip_checksum_scope: IpChecksumScope,
}

/// Outcome of one segment
#[derive(Debug)]
pub struct SegmentReport {
    pub kind: SegmentKind,
    pub length: usize,
    pub sent: Option<usize>, // None when the send failed
}

/// Fires a SYN and then an ACK + data segment without waiting for a reply.
///
/// This is not a TCP handshake: the peer's SYN-ACK is never read, and the
/// second segment's sequence and acknowledgment numbers are asserted by
/// configuration rather than learned from the peer.
pub struct Sender<T: Transmit> {
    transport: T,
    config: SenderConfig,
    status: Status,
    reports: Vec<SegmentReport>,
}

impl<T: Transmit> Sender<T> {
    pub fn new(transport: T, config: SenderConfig) -> Self {
        Sender {
            transport,
            config,
            status: Status::Init,
            reports: Vec::with_capacity(2),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // Start the sender
    pub fn start(&mut self) -> Result<&[SegmentReport]> {
        loop {
            match self.status {
                Status::Init => {
                    self.send_segment(SegmentKind::Syn)?;
                    self.status = Status::SynSent;
                }
                // No read here: the data segment goes out whatever happened to the SYN
                Status::SynSent => {
                    self.send_segment(SegmentKind::DataAck)?;
                    self.status = Status::DataSent;
                }
                Status::DataSent => {
                    self.status = Status::Done;
                }
                Status::Done => break,
            }
        }
        Ok(&self.reports)
    }

    fn params_for(&self, kind: SegmentKind) -> ConnectionParameters {
        let (payload, sequence_number, ack_number) = match kind {
            SegmentKind::Syn => (self.config.syn_payload.clone(), 0, 0),
            SegmentKind::DataAck => (
                self.config.data_payload.clone(),
                self.config.data_seq,
                self.config.data_ack,
            ),
        };
        ConnectionParameters {
            source: self.config.source,
            destination: *self.config.destination.ip(),
            source_port: self.config.source_port,
            destination_port: self.config.destination.port(),
            sequence_number,
            ack_number,
            identification: self.config.identification,
            payload,
        }
    }

    // Build one segment from scratch and hand it to the transport.
    // A failed send is logged and recorded; anything else is returned.
    fn send_segment(&mut self, kind: SegmentKind) -> Result<()> {
        let params = self.params_for(kind);
        let packet = Packet::build(&params, kind, self.config.ip_checksum_scope)?;
        debug!(
            "{:?} segment payload: \"{}\"",
            kind,
            printable(packet.payload())
        );

        let sent = match self.transport.send(packet.as_bytes(), self.config.destination) {
            Ok(n) => {
                match kind {
                    SegmentKind::Syn => info!("SYN packet sent ({} bytes)", n),
                    SegmentKind::DataAck => {
                        info!("Data packet sent after handshake ({} bytes)", n)
                    }
                }
                Some(n)
            }
            Err(e) if !e.is_fatal() => {
                error!("{}", e);
                None
            }
            Err(e) => return Err(e),
        };

        self.reports.push(SegmentReport {
            kind,
            length: packet.len(),
            sent,
        });
        Ok(())
    }
}
