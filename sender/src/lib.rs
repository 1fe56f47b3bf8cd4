//! Hand-built IPv4/TCP segments sent over a raw socket with `IP_HDRINCL`.
//!
//! Headers are encoded field by field in network byte order, both
//! checksums are computed here (the TCP one over the pseudo-header), and
//! the finished datagram is handed to the kernel untouched.

pub mod error;
pub mod packet;
pub mod tcp_sender;
pub mod transport;
pub mod util;
