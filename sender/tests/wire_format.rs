//! Datagram layout checks against hand-computed bytes

use std::net::Ipv4Addr;

use rawsyn_sender::packet::{
    verify_ip_checksum, verify_tcp_checksum, ConnectionParameters, IpChecksumScope, Packet,
    SegmentKind,
};

fn params(payload: &[u8]) -> ConnectionParameters {
    ConnectionParameters {
        source: Ipv4Addr::new(11, 111, 1, 2),
        destination: Ipv4Addr::new(172, 17, 0, 2),
        source_port: 1234,
        destination_port: 1234,
        sequence_number: 1,
        ack_number: 1,
        identification: 54321,
        payload: payload.to_vec(),
    }
}

#[test]
fn syn_datagram_matches_reference_bytes() {
    let payload = b"Hello, this is the payload!";
    let packet = Packet::build(&params(payload), SegmentKind::Syn, IpChecksumScope::Header).unwrap();

    #[rustfmt::skip]
    let expected_headers: [u8; 40] = [
        // IPv4
        0x45, 0x00, 0x00, 0x43, 0xD4, 0x31, 0x00, 0x00,
        0xFF, 0x06, 0x2E, 0xFF, 11, 111, 1, 2,
        172, 17, 0, 2,
        // TCP
        0x04, 0xD2, 0x04, 0xD2, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x50, 0x02, 0x16, 0xD0,
        0x53, 0xC9, 0x00, 0x00,
    ];

    assert_eq!(&packet.as_bytes()[..40], &expected_headers);
    assert_eq!(&packet.as_bytes()[40..], payload);
    assert_eq!(verify_ip_checksum(packet.as_bytes()).unwrap(), 0);
    assert_eq!(verify_tcp_checksum(packet.as_bytes()).unwrap(), 0);
}

#[test]
fn odd_and_even_payloads_verify() {
    for payload in [&b"a"[..], b"ab", b"abc", b"This is data after the handshake."] {
        let packet =
            Packet::build(&params(payload), SegmentKind::DataAck, IpChecksumScope::Header).unwrap();
        assert_eq!(packet.len(), 40 + payload.len());
        assert_eq!(verify_ip_checksum(packet.as_bytes()).unwrap(), 0);
        assert_eq!(verify_tcp_checksum(packet.as_bytes()).unwrap(), 0);
    }
}
