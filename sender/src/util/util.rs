// Render a buffer as 16-byte rows of hex, prefixed with the row offset
pub fn hex_dump(buf: &[u8]) -> String {
    let mut out = String::with_capacity(buf.len() * 3 + buf.len() / 16 * 8);
    for (row, chunk) in buf.chunks(16).enumerate() {
        if row > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{:04x}:", row * 16));
        for byte in chunk {
            out.push_str(&format!(" {:02x}", byte));
        }
    }
    out
}

// Payload text for log lines, with non-printable bytes escaped
pub fn printable(buf: &[u8]) -> String {
    buf.iter()
        .flat_map(|b| std::ascii::escape_default(*b))
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump_rows() {
        let buf: Vec<u8> = (0..18).collect();
        let dump = hex_dump(&buf);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0000: 00 01 02"));
        assert_eq!(lines[1], "0010: 10 11");
    }

    #[test]
    fn test_hex_dump_empty() {
        assert_eq!(hex_dump(&[]), "");
    }

    #[test]
    fn test_printable_escapes() {
        assert_eq!(printable(b"hi\n\x01"), "hi\\n\\x01");
    }
}
