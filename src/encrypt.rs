pub mod xor {
    use crate::{Error, Result};

    /// XORs two byte slices of the same length pairwise.
    pub fn fixed_xor(lhs: &[u8], rhs: &[u8]) -> Result<Vec<u8>> {
        if lhs.len() != rhs.len() {
            return Err(Error::LengthMismatch {
                left: lhs.len(),
                right: rhs.len(),
            });
        }
        Ok(lhs.iter().zip(rhs.iter()).map(|(u, v)| u ^ v).collect())
    }

    /// XORs every byte of the slice with a single key byte.
    pub fn single_byte_xor(bytes: &[u8], key: u8) -> Vec<u8> {
        bytes.iter().map(|&u| u ^ key).collect()
    }

    /// XORs a byte slice with a repeating key, also known as Vigenere encryption.
    /// The same call decrypts, XOR is its own inverse.
    pub fn repeating_key_xor(bytes: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        Ok(bytes
            .iter()
            .zip(key.iter().cycle())
            .map(|(u, v)| u ^ v)
            .collect())
    }

    #[test]
    fn test_fixed_xor() {
        use crate::encode::hex::{from_hex, to_hex};

        let lhs = from_hex("1c0111001f010100061a024b53535009181c").unwrap();
        let rhs = from_hex("686974207468652062756c6c277320657965").unwrap();
        let xored = fixed_xor(&lhs, &rhs).unwrap();
        assert_eq!(to_hex(&xored), "746865206b696420646f6e277420706c6179");

        // commutative and its own inverse
        assert_eq!(fixed_xor(&rhs, &lhs).unwrap(), xored);
        assert_eq!(fixed_xor(&xored, &rhs).unwrap(), lhs);
    }

    #[test]
    fn test_fixed_xor_length_mismatch() {
        assert!(matches!(
            fixed_xor(&[0x80], &[0x38, 0x01]),
            Err(Error::LengthMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn test_single_byte_xor() {
        assert_eq!(single_byte_xor(&[0x80, 0x00], 0x38), vec![0xb8, 0x38]);
        assert_eq!(single_byte_xor(&[], 0x38), Vec::<u8>::new());
    }

    #[test]
    fn test_repeating_key_xor() {
        use crate::encode::hex::from_hex;

        let encrypted = repeating_key_xor(
            b"Burning 'em, if you ain't quick and nimble\nI go crazy when I hear a cymbal",
            b"ICE",
        )
        .unwrap();
        let res = from_hex("0b3637272a2b2e63622c2e69692a23693a2a3c6324202d623d63343c2a26226324272765272a282b2f20430a652e2c652a3124333a653e2b2027630c692b20283165286326302e27282f").unwrap();

        assert_eq!(encrypted, res);
    }

    #[test]
    fn test_repeating_key_xor_involution() {
        use rand::RngCore;

        let mut rng = rand::thread_rng();
        let mut data = vec![0u8; 97];
        rng.fill_bytes(&mut data);

        let once = repeating_key_xor(&data, b"terminator x").unwrap();
        let twice = repeating_key_xor(&once, b"terminator x").unwrap();
        assert_eq!(twice, data);

        assert!(matches!(repeating_key_xor(&data, b""), Err(Error::EmptyKey)));
    }
}

pub mod ecb {
    use bytes::{BufMut, BytesMut};
    use openssl::cipher::Cipher;
    use openssl::cipher_ctx::CipherCtx;

    use crate::{Error, Result};

    pub const BLOCK: usize = 16;

    /// Pads the buffer to a whole number of blocks with PKCS#7.
    /// An already aligned buffer gains a full block of padding.
    fn pkcs7_pad(buf: &mut BytesMut, len: usize) {
        let pad = len - buf.len() % len;
        buf.put_bytes(pad as u8, pad);
    }

    /// Checks for valid PKCS#7 padding and strips it.
    fn pkcs7_strip(padded: &[u8]) -> Result<&[u8]> {
        let pad = *padded.last().ok_or(Error::BadPadding)? as usize;
        if pad == 0 || pad > padded.len() {
            return Err(Error::BadPadding);
        }
        let (text, tail) = padded.split_at(padded.len() - pad);
        if tail.iter().all(|&v| v as usize == pad) {
            Ok(text)
        } else {
            Err(Error::BadPadding)
        }
    }

    fn init_ctx(key: &[u8], encrypt: bool) -> Result<CipherCtx> {
        if key.len() != BLOCK {
            return Err(Error::BadKeyLength(key.len()));
        }
        let mut ctx = CipherCtx::new()?;
        if encrypt {
            ctx.encrypt_init(Some(Cipher::aes_128_ecb()), Some(key), None)?;
        } else {
            ctx.decrypt_init(Some(Cipher::aes_128_ecb()), Some(key), None)?;
        }
        // the crate applies PKCS#7 itself
        ctx.set_padding(false);
        Ok(ctx)
    }

    /// Encrypts with AES-128-ECB, applying PKCS#7 padding first. The key must be 16 bytes.
    pub fn aes_128_ecb_encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let mut ctx = init_ctx(key, true)?;

        let mut buf = BytesMut::with_capacity(plaintext.len() + BLOCK);
        buf.put(plaintext);
        pkcs7_pad(&mut buf, BLOCK);

        let mut output = Vec::with_capacity(buf.len());
        ctx.cipher_update_vec(&buf, &mut output)?;
        ctx.cipher_final_vec(&mut output)?;
        Ok(output)
    }

    /// Decrypts AES-128-ECB ciphertext and strips the PKCS#7 padding.
    pub fn aes_128_ecb_decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let mut ctx = init_ctx(key, false)?;

        let mut output = Vec::with_capacity(ciphertext.len());
        ctx.cipher_update_vec(ciphertext, &mut output)?;
        ctx.cipher_final_vec(&mut output)?;
        Ok(pkcs7_strip(&output)?.to_vec())
    }

    #[test]
    fn test_pkcs7_pad() {
        let mut buf = BytesMut::new();
        buf.put(b"YELLOW SUBMARINE".as_slice());
        pkcs7_pad(&mut buf, 20);
        assert_eq!(&buf[..], b"YELLOW SUBMARINE\x04\x04\x04\x04");
    }

    #[test]
    fn test_pkcs7_strip() {
        assert_eq!(
            pkcs7_strip(b"ICE ICE BABY\x04\x04\x04\x04").unwrap(),
            b"ICE ICE BABY"
        );
        assert!(pkcs7_strip(b"ICE ICE BABY\x05\x05\x05\x05").is_err());
        assert!(pkcs7_strip(b"ICE ICE BABY\x01\x02\x03\x04").is_err());
    }

    #[test]
    fn test_aes_128_ecb_round_trip() {
        let key = b"YELLOW SUBMARINE";
        let plaintext = b"In ecstasy in the back of me";

        let ciphertext = aes_128_ecb_encrypt(plaintext, key).unwrap();
        assert_eq!(ciphertext.len() % BLOCK, 0);
        assert_ne!(&ciphertext[..], &plaintext[..]);

        let decrypted = aes_128_ecb_decrypt(&ciphertext, key).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_aes_128_ecb_key_length() {
        assert!(matches!(
            aes_128_ecb_encrypt(b"data", b"short key"),
            Err(Error::BadKeyLength(9))
        ));
    }
}
