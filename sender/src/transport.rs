use std::io;
use std::mem;
use std::net::SocketAddrV4;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use log::{debug, info, trace};

use crate::error::{Result, SenderError};
use crate::util::util::hex_dump;

/// Something an assembled datagram can be handed to
pub trait Transmit {
    fn send(&mut self, datagram: &[u8], destination: SocketAddrV4) -> Result<usize>;
}

/// Raw IPv4 socket requesting the TCP protocol number.
///
/// The descriptor is closed when the socket is dropped, on every exit path.
#[derive(Debug)]
pub struct RawSocket {
    fd: OwnedFd,
}

impl RawSocket {
    /// Open the socket. Fails without CAP_NET_RAW.
    pub fn open() -> Result<Self> {
        // SAFETY: socket(2) takes no pointers; a negative return is handled below
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_RAW, libc::IPPROTO_TCP) };
        if fd < 0 {
            return Err(SenderError::SocketCreation(io::Error::last_os_error()));
        }
        debug!("raw socket opened (fd {})", fd);
        // SAFETY: fd was just returned by socket(2) and is owned by nobody else
        Ok(RawSocket {
            fd: unsafe { OwnedFd::from_raw_fd(fd) },
        })
    }

    /// Tell the kernel outgoing buffers already carry an IP header.
    pub fn enable_header_inclusion(&self) -> Result<()> {
        let one: libc::c_int = 1;
        // SAFETY: optval points at a live c_int and optlen is its exact size
        let ret = unsafe {
            libc::setsockopt(
                self.fd.as_raw_fd(),
                libc::IPPROTO_IP,
                libc::IP_HDRINCL,
                &one as *const libc::c_int as *const libc::c_void,
                mem::size_of::<libc::c_int>() as libc::socklen_t,
            )
        };
        if ret < 0 {
            return Err(SenderError::Configuration(io::Error::last_os_error()));
        }
        debug!("IP_HDRINCL enabled");
        Ok(())
    }

    /// Open and switch to header-inclusion mode in one step.
    pub fn open_with_header_inclusion() -> Result<Self> {
        let socket = Self::open()?;
        socket.enable_header_inclusion()?;
        Ok(socket)
    }
}

impl Transmit for RawSocket {
    fn send(&mut self, datagram: &[u8], destination: SocketAddrV4) -> Result<usize> {
        // SAFETY: sockaddr_in is plain old data; all-zero is a valid value
        let mut addr: libc::sockaddr_in = unsafe { mem::zeroed() };
        addr.sin_family = libc::AF_INET as libc::sa_family_t;
        addr.sin_port = destination.port().to_be();
        addr.sin_addr = libc::in_addr {
            s_addr: u32::from_ne_bytes(destination.ip().octets()),
        };

        // SAFETY: the buffer pointer and length come from the same slice, and
        // the address length is the size of the sockaddr_in it points at
        let sent = unsafe {
            libc::sendto(
                self.fd.as_raw_fd(),
                datagram.as_ptr() as *const libc::c_void,
                datagram.len(),
                0,
                &addr as *const libc::sockaddr_in as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
            )
        };
        if sent < 0 {
            return Err(SenderError::Transmission(io::Error::last_os_error()));
        }
        trace!("sent to {}:\n{}", destination, hex_dump(datagram));
        Ok(sent as usize)
    }
}

/// Logs each datagram instead of putting it on the wire
#[derive(Debug, Default)]
pub struct DryRun {
    pub sent: usize,
}

impl Transmit for DryRun {
    fn send(&mut self, datagram: &[u8], destination: SocketAddrV4) -> Result<usize> {
        self.sent += 1;
        info!(
            "dry run: {} bytes for {}\n{}",
            datagram.len(),
            destination,
            hex_dump(datagram)
        );
        Ok(datagram.len())
    }
}
