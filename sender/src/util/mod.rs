pub mod checksum;
pub mod ip_header;
pub mod pseudo_header;
pub mod tcp_header;
pub mod util;
