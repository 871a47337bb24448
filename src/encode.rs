use crate::Result;

/// Textual encodings understood by the codec.
/// The tag is passed explicitly at every conversion, it is never stored on the data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Hex,
    Ascii,
    Base64,
}

/// Decodes text of the given encoding into a byte vector.
pub fn decode(text: &str, encoding: Encoding) -> Result<Vec<u8>> {
    match encoding {
        Encoding::Hex => hex::from_hex(text),
        Encoding::Ascii => Ok(ascii::from_ascii(text)),
        Encoding::Base64 => base64::from_base64(text),
    }
}

/// Encodes a byte slice into text of the given encoding. Encoding never fails.
pub fn encode(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Hex => hex::to_hex(bytes),
        Encoding::Ascii => ascii::to_ascii(bytes),
        Encoding::Base64 => base64::to_base64(bytes),
    }
}

pub mod hex {
    use crate::{Error, Result};

    /// Converts a single hex digit to its value.
    fn digit(c: char) -> Result<u8> {
        c.to_digit(16)
            .map(|v| v as u8)
            .ok_or(Error::InvalidHexDigit(c))
    }

    /// Converts a hex string into a byte vector. Every pair of digits becomes one byte,
    /// so the input length must be even.
    pub fn from_hex(hex: &str) -> Result<Vec<u8>> {
        let chars: Vec<char> = hex.chars().collect();
        if chars.len() % 2 != 0 {
            return Err(Error::OddHexLength(chars.len()));
        }

        let mut bytes = Vec::with_capacity(chars.len() / 2);
        for pair in chars.chunks_exact(2) {
            bytes.push(digit(pair[0])? << 4 | digit(pair[1])?);
        }
        Ok(bytes)
    }

    /// Converts bytes to a lowercase hex string, two digits per byte.
    pub fn to_hex(bytes: &[u8]) -> String {
        let mut hex = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            hex.extend(format!("{:02x}", b).chars());
        }
        hex
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(from_hex("ffff").unwrap(), vec![0xff, 0xff]);
        assert_eq!(from_hex("0fff").unwrap(), vec![0x0f, 0xff]);
        assert_eq!(from_hex("").unwrap(), Vec::<u8>::new());
        assert!(matches!(from_hex("fff"), Err(Error::OddHexLength(3))));
        assert!(matches!(from_hex("zz"), Err(Error::InvalidHexDigit('z'))));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x0f, 0xff]), "0fff");
        assert_eq!(to_hex(&[]), "");
    }
}

pub mod base64 {
    use crate::{Error, Result};

    pub const ALPHABET: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    /// Converts a base64 character to its 6-bit value.
    fn sextet(c: char) -> Result<u8> {
        match c {
            'A'..='Z' => Ok(c as u8 - b'A'),
            'a'..='z' => Ok(c as u8 - b'a' + 26),
            '0'..='9' => Ok(c as u8 - b'0' + 52),
            '+' => Ok(62),
            '/' => Ok(63),
            _ => Err(Error::InvalidBase64Char(c)),
        }
    }

    /// Converts a base64 string into a byte vector. The input length must be a multiple
    /// of 4, with at most two '=' pad characters at the very end. The pad count shortens
    /// the output, a padded group of 4 characters decodes to 2 or 1 bytes instead of 3.
    pub fn from_base64(text: &str) -> Result<Vec<u8>> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() % 4 != 0 {
            return Err(Error::InvalidBase64Length(chars.len()));
        }

        let body_len = match chars.iter().position(|&c| c == '=') {
            Some(pos) => {
                if chars.len() - pos > 2 || chars[pos..].iter().any(|&c| c != '=') {
                    return Err(Error::MisplacedPad);
                }
                pos
            }
            None => chars.len(),
        };

        let mut bytes = Vec::with_capacity(chars.len() / 4 * 3);
        for group in chars[..body_len].chunks(4) {
            let mut buf = 0u32;
            for &c in group {
                buf = buf << 6 | u32::from(sextet(c)?);
            }
            // left-align a short trailing group to the full 24 bits
            buf <<= 6 * (4 - group.len());

            bytes.push((buf >> 16) as u8);
            if group.len() >= 3 {
                bytes.push((buf >> 8) as u8);
            }
            if group.len() == 4 {
                bytes.push(buf as u8);
            }
        }
        Ok(bytes)
    }

    /// Encodes a byte slice into base64. A trailing group of 1 or 2 bytes is padded
    /// with "==" or "=" respectively.
    pub fn to_base64(bytes: &[u8]) -> String {
        let mut string = String::with_capacity((bytes.len() + 2) / 3 * 4);
        for chunk in bytes.chunks(3) {
            let mut buf = 0u32;
            for &b in chunk {
                buf = buf << 8 | u32::from(b);
            }
            buf <<= 8 * (3 - chunk.len());

            string.push(ALPHABET[(buf >> 18) as usize & 63] as char);
            string.push(ALPHABET[(buf >> 12) as usize & 63] as char);
            if chunk.len() >= 2 {
                string.push(ALPHABET[(buf >> 6) as usize & 63] as char);
            }
            if chunk.len() == 3 {
                string.push(ALPHABET[buf as usize & 63] as char);
            }
            string.extend(std::iter::repeat('=').take(3 - chunk.len()));
        }
        string
    }

    #[test]
    fn test_to_base64() {
        assert_eq!(to_base64(b"Man"), "TWFu");
        assert_eq!(to_base64(b"Ma"), "TWE=");
        assert_eq!(to_base64(b"M"), "TQ==");
        assert_eq!(to_base64(b""), "");
    }

    #[test]
    fn test_from_base64() {
        assert_eq!(from_base64("TWFu").unwrap(), b"Man");
        assert_eq!(from_base64("TWE=").unwrap(), b"Ma");
        assert_eq!(from_base64("TQ==").unwrap(), b"M");
        assert_eq!(from_base64("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_from_base64_rejects() {
        assert!(matches!(
            from_base64("TWFuT"),
            Err(Error::InvalidBase64Length(5))
        ));
        assert!(matches!(
            from_base64("TW!u"),
            Err(Error::InvalidBase64Char('!'))
        ));
        assert!(matches!(from_base64("T==="), Err(Error::MisplacedPad)));
        assert!(matches!(from_base64("TW=u"), Err(Error::MisplacedPad)));
    }
}

pub mod ascii {

    /// Converts text into bytes, one byte per character code.
    /// The inverse of [`to_ascii`] for every byte value, not just the 7-bit range.
    pub fn from_ascii(ascii: &str) -> Vec<u8> {
        Vec::from_iter(ascii.chars().map(|c| c as u8))
    }

    /// Converts a byte slice into text, one character per byte value.
    pub fn to_ascii(bytes: &[u8]) -> String {
        String::from_iter(bytes.iter().map(|&v| v as char))
    }

    #[test]
    fn test_ascii() {
        assert_eq!(from_ascii("abc"), vec![b'a', b'b', b'c']);
        assert_eq!(to_ascii(&[b'a', b'b', b'c']), "abc");
        assert_eq!(to_ascii(&[]), "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn dispatch_matches_challenge_vectors() {
        let hex_s = "49276d206b696c6c696e6720796f757220627261696e206c696b65206120706f69736f6e6f7573206d757368726f6f6d";
        let ascii_s = "I'm killing your brain like a poisonous mushroom";
        let base64_s = "SSdtIGtpbGxpbmcgeW91ciBicmFpbiBsaWtlIGEgcG9pc29ub3VzIG11c2hyb29t";

        let bytes = decode(hex_s, Encoding::Hex).unwrap();
        assert_eq!(decode(ascii_s, Encoding::Ascii).unwrap(), bytes);
        assert_eq!(decode(base64_s, Encoding::Base64).unwrap(), bytes);

        assert_eq!(encode(&bytes, Encoding::Hex), hex_s);
        assert_eq!(encode(&bytes, Encoding::Ascii), ascii_s);
        assert_eq!(encode(&bytes, Encoding::Base64), base64_s);
    }

    #[test]
    fn random_round_trips() {
        let mut rng = rand::thread_rng();
        for len in 0..64 {
            let mut bytes = vec![0u8; len];
            rng.fill_bytes(&mut bytes);

            for enc in [Encoding::Hex, Encoding::Ascii, Encoding::Base64] {
                assert_eq!(decode(&encode(&bytes, enc), enc).unwrap(), bytes);
            }
        }
    }

    #[test]
    fn decoded_lengths_are_exact() {
        // hex: len / 2, base64: len / 4 * 3 minus the pad count
        assert_eq!(decode("00ff17", Encoding::Hex).unwrap().len(), 3);
        assert_eq!(decode("TWFuTWE=", Encoding::Base64).unwrap().len(), 5);
        assert_eq!(decode("TQ==", Encoding::Base64).unwrap().len(), 1);
    }
}
