//! Base64 VLQ encoding used by the `mappings` field of v3 source maps.

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const VLQ_SHIFT: u32 = 5;
const VLQ_CONTINUATION: u64 = 1 << VLQ_SHIFT;
const VLQ_MASK: u64 = VLQ_CONTINUATION - 1;

/// Appends the base64 VLQ encoding of `value` to `out`.
pub fn encode_vlq(out: &mut String, value: i64) {
    // Sign goes in the lowest bit.
    let mut rest = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = rest & VLQ_MASK;
        rest >>= VLQ_SHIFT;
        if rest > 0 {
            digit |= VLQ_CONTINUATION;
        }
        out.push(BASE64[digit as usize] as char);
        if rest == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: i64) -> String {
        let mut out = String::new();
        encode_vlq(&mut out, value);
        out
    }

    #[test]
    fn test_small_values() {
        assert_eq!(encoded(0), "A");
        assert_eq!(encoded(1), "C");
        assert_eq!(encoded(-1), "D");
        assert_eq!(encoded(15), "e");
    }

    #[test]
    fn test_multi_digit_values() {
        assert_eq!(encoded(16), "gB");
        assert_eq!(encoded(-16), "hB");
        assert_eq!(encoded(1000), "w+B");
    }
}
