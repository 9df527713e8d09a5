//! Fixed-width name field decoding.
//!
//! Task names arrive in fixed-size `char` arrays. The kernel side writes a
//! single terminating zero byte but does not zero-pad the remainder, so
//! anything after the first zero byte is garbage from earlier tasks. When no
//! zero byte is present at all, the whole buffer is the name.

/// Decode a fixed-width, zero-terminated name buffer.
///
/// Stops dead at the first zero byte. Bytes that are not valid UTF-8 are
/// replaced with `U+FFFD`.
pub fn decode_name(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_at_first_zero() {
        assert_eq!(decode_name(b"ab\0cd"), "ab");
    }

    #[test]
    fn test_unterminated_uses_whole_buffer() {
        assert_eq!(decode_name(b"xyz"), "xyz");
    }

    #[test]
    fn test_all_zero_is_empty() {
        assert_eq!(decode_name(&[0u8; 16]), "");
        assert_eq!(decode_name(&[]), "");
    }

    #[test]
    fn test_garbage_after_terminator_ignored() {
        let mut buf = [b'Z'; 16];
        buf[..8].copy_from_slice(b"kworker\0");
        assert_eq!(decode_name(&buf), "kworker");
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        assert_eq!(decode_name(&[b'a', 0xff, 0]), "a\u{fffd}");
    }
}
