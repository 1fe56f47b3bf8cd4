// Internet checksum (RFC 1071)

/// One's-complement sum of `data` as big-endian 16-bit words, complemented.
///
/// An odd trailing byte is padded with a zero byte on the right. The caller
/// must zero any checksum field inside `data` before computing a fresh value;
/// running it over a buffer whose checksum field is already filled in yields
/// 0 when the buffer is intact.
pub fn internet_checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    let mut words = data.chunks_exact(2);
    for word in &mut words {
        sum = sum.wrapping_add(u16::from_be_bytes([word[0], word[1]]) as u32);
    }
    if let [last] = words.remainder() {
        sum = sum.wrapping_add((*last as u32) << 8);
    }

    // Fold carries back in until the sum fits in 16 bits
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !sum as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_empty_buffer() {
        assert_eq!(internet_checksum(&[]), 0xFFFF);
    }

    #[test]
    fn test_all_zero_even_buffers() {
        for len in (0..64).step_by(2) {
            assert_eq!(internet_checksum(&vec![0u8; len]), 0xFFFF, "len {}", len);
        }
    }

    #[test]
    fn test_two_words() {
        // 0x0001 + 0xF203 = 0xF204, complement 0x0DFB
        assert_eq!(internet_checksum(&[0x00, 0x01, 0xF2, 0x03]), 0x0DFB);
    }

    #[test]
    fn test_odd_length_pads_right() {
        assert_eq!(internet_checksum(&[0xAB]), !0xAB00u16);
        assert_eq!(
            internet_checksum(&[0x12, 0x34, 0x56]),
            internet_checksum(&[0x12, 0x34, 0x56, 0x00])
        );
    }

    #[test]
    fn test_carry_folding() {
        // 0xFFFF + 0x0001 = 0x10000 -> folds to 0x0001
        assert_eq!(internet_checksum(&[0xFF, 0xFF, 0x00, 0x01]), !0x0001u16);
        assert_eq!(internet_checksum(&[0xFF; 64]), 0x0000);
    }

    #[test]
    fn test_rfc1071_example() {
        let data = [0x00, 0x01, 0xF2, 0x03, 0xF4, 0xF5, 0xF6, 0xF7];
        assert_eq!(internet_checksum(&data), !0xDDF2u16);
    }

    #[test]
    fn test_known_ipv4_header() {
        let header = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xC0, 0xA8,
            0x00, 0x01, 0xC0, 0xA8, 0x00, 0xC7,
        ];
        assert_eq!(internet_checksum(&header), 0xB861);
    }

    #[test]
    fn test_stored_checksum_verifies_to_zero() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let len = rng.gen_range(1..256) * 2;
            let mut buf: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            buf[0] = 0;
            buf[1] = 0;
            let csum = internet_checksum(&buf);
            buf[0..2].copy_from_slice(&csum.to_be_bytes());
            assert_eq!(internet_checksum(&buf), 0);
        }
    }
}
