pub mod freq {

    /// Reference English letter frequencies for a..=z, cf. the Wikipedia letter
    /// frequency table.
    pub const ENGLISH_FREQS: [f64; 26] = [
        0.08167, 0.01492, 0.02782, 0.04253, 0.12702, 0.02228, 0.02015, 0.06094, 0.06966, 0.00153,
        0.00772, 0.04025, 0.02406, 0.06749, 0.07507, 0.01929, 0.00095, 0.05987, 0.06327, 0.09056,
        0.02758, 0.00978, 0.02360, 0.00150, 0.01974, 0.00074,
    ];

    /// True for bytes an English plaintext can consist of, printable ASCII or a line feed.
    pub fn is_printable(byte: u8) -> bool {
        (0x20..=0x7e).contains(&byte) || byte == b'\n'
    }

    /// Per-letter occurrence counts plus the total number of letters seen.
    /// Built fresh for every scoring call.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct LetterCounts {
        pub counts: [u32; 26],
        pub total: u32,
    }

    /// Case-folds A-Z and a-z into 26 buckets. Every other byte is ignored.
    pub fn count_letters(bytes: &[u8]) -> LetterCounts {
        let mut letters = LetterCounts::default();
        for &b in bytes {
            if b.is_ascii_alphabetic() {
                letters.counts[(b.to_ascii_lowercase() - b'a') as usize] += 1;
                letters.total += 1;
            }
        }
        letters
    }

    /// Chi-squared goodness of fit of the letter counts against the English
    /// reference distribution. Lower means more English-like. Input without a
    /// single letter scores infinity instead of dividing by zero.
    pub fn chi_squared(bytes: &[u8]) -> f64 {
        let letters = count_letters(bytes);
        if letters.total == 0 {
            return f64::INFINITY;
        }

        letters
            .counts
            .iter()
            .zip(ENGLISH_FREQS.iter())
            .map(|(&observed, &freq)| {
                let expected = f64::from(letters.total) * freq;
                let diff = f64::from(observed) - expected;
                diff * diff / expected
            })
            .sum()
    }

    #[test]
    fn test_is_printable() {
        assert!(is_printable(b' '));
        assert!(is_printable(b'~'));
        assert!(is_printable(b'\n'));
        assert!(!is_printable(0x1f));
        assert!(!is_printable(0x7f));
    }

    #[test]
    fn test_count_letters_case_folds() {
        let letters = count_letters(b"AaBb zz!? 123");
        assert_eq!(letters.counts[0], 2);
        assert_eq!(letters.counts[1], 2);
        assert_eq!(letters.counts[25], 2);
        assert_eq!(letters.total, 6);
    }

    #[test]
    fn test_chi_squared_ranks_english_lower() {
        let english = b"the quick brown fox jumps over the lazy dog";
        let gibberish = b"zzzzqqqqjjjjxxxxzzzzqqqqjjjjxxxx";
        assert!(chi_squared(english) < chi_squared(gibberish));
    }

    #[test]
    fn test_chi_squared_sentinel() {
        assert_eq!(chi_squared(b""), f64::INFINITY);
        assert_eq!(chi_squared(b"0123 !?\n\x07"), f64::INFINITY);
    }
}

pub mod single_byte {
    use super::freq::{chi_squared, is_printable};
    use crate::encrypt::xor::single_byte_xor;

    /// A candidate key byte paired with its chi-squared score. Lower scores rank first.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct KeyCandidate {
        pub score: f64,
        pub key: u8,
    }

    /// Scores all 256 single-byte keys against the ciphertext and returns the best
    /// `top_n` candidates, ascending by score. With `require_printable` set, a key
    /// whose plaintext contains a non-printable byte scores infinity but stays in
    /// the pool, so ties still break by ascending key value.
    pub fn recover_single_byte_key(
        ciphertext: &[u8],
        top_n: usize,
        require_printable: bool,
    ) -> Vec<KeyCandidate> {
        let mut scoreboard: Vec<KeyCandidate> = (0..=u8::MAX)
            .map(|key| {
                let plaintext = single_byte_xor(ciphertext, key);
                let score = if require_printable && !plaintext.iter().all(|&v| is_printable(v)) {
                    f64::INFINITY
                } else {
                    chi_squared(&plaintext)
                };
                KeyCandidate { score, key }
            })
            .collect();

        scoreboard.sort_by(|a, b| a.score.total_cmp(&b.score));
        scoreboard.truncate(top_n);
        scoreboard
    }

    #[test]
    fn test_recover_single_byte_key() {
        use crate::encode::hex::from_hex;

        let ciphertext =
            from_hex("1b37373331363f78151b7f2b783431333d78397828372d363c78373e783a393b3736")
                .unwrap();
        let best = recover_single_byte_key(&ciphertext, 3, true);

        assert_eq!(best.len(), 3);
        assert_eq!(best[0].key, 0x58);
        assert!(best[0].score < best[1].score);
        assert_eq!(
            single_byte_xor(&ciphertext, best[0].key),
            b"Cooking MC's like a pound of bacon"
        );
    }

    #[test]
    fn test_degenerate_ciphertext_breaks_ties_by_key() {
        // every key scores infinity, the stable sort keeps key order
        let best = recover_single_byte_key(&[0x00, 0xff], 4, true);
        assert_eq!(best[0].key, 0);
        assert_eq!(best[1].key, 1);
        assert!(best[0].score.is_infinite());
    }

    #[test]
    fn test_top_n_clamps_to_pool() {
        assert_eq!(recover_single_byte_key(b"abc", 500, false).len(), 256);
    }
}

pub mod multibyte {
    use super::single_byte::recover_single_byte_key;
    use crate::encrypt::xor::repeating_key_xor;
    use crate::{Error, Result};

    pub const DEFAULT_MIN_KEY_LENGTH: usize = 2;
    pub const DEFAULT_MAX_KEY_LENGTH: usize = 40;
    pub const DEFAULT_SAMPLE_BLOCKS: usize = 10;

    /// Bit-level Hamming distance between two byte slices of the same length,
    /// the popcount of their XOR.
    pub fn hamming(lhs: &[u8], rhs: &[u8]) -> Result<u32> {
        if lhs.len() != rhs.len() {
            return Err(Error::LengthMismatch {
                left: lhs.len(),
                right: rhs.len(),
            });
        }
        Ok(lhs
            .iter()
            .zip(rhs.iter())
            .map(|(u, v)| (u ^ v).count_ones())
            .sum())
    }

    /// A trial key length with its normalized average Hamming distance. Lower is better.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct KeyLengthScore {
        pub score: f64,
        pub length: usize,
    }

    /// Average Hamming distance over `sample_blocks` pairs of adjacent,
    /// non-overlapping blocks at offsets 0, 2L, 4L, .., divided by the length.
    /// Correctly aligned blocks decrypt to English under the same key bytes and
    /// differ in fewer bits than a wrong alignment. None if the ciphertext is too
    /// short to take the samples.
    fn key_length_score(ciphertext: &[u8], length: usize, sample_blocks: usize) -> Option<f64> {
        if sample_blocks == 0 || ciphertext.len() < 2 * sample_blocks * length {
            return None;
        }

        let mut distance = 0u32;
        for i in 0..sample_blocks {
            let offset = 2 * i * length;
            let first = &ciphertext[offset..offset + length];
            let second = &ciphertext[offset + length..offset + 2 * length];
            distance += first
                .iter()
                .zip(second.iter())
                .map(|(u, v)| (u ^ v).count_ones())
                .sum::<u32>();
        }
        Some(f64::from(distance) / (sample_blocks * length) as f64)
    }

    /// Scores every candidate key length in `min_len..=max_len`, sorted ascending
    /// by normalized distance with ties broken by the shorter length. Lengths the
    /// ciphertext is too short to sample are skipped; if that leaves no candidate
    /// at all, the call fails.
    pub fn key_length_scores(
        ciphertext: &[u8],
        min_len: usize,
        max_len: usize,
        sample_blocks: usize,
    ) -> Result<Vec<KeyLengthScore>> {
        let mut scoreboard: Vec<KeyLengthScore> = (min_len.max(1)..=max_len)
            .filter_map(|length| {
                key_length_score(ciphertext, length, sample_blocks)
                    .map(|score| KeyLengthScore { score, length })
            })
            .collect();

        if scoreboard.is_empty() {
            return Err(Error::InsufficientCiphertext {
                min: min_len,
                max: max_len,
            });
        }

        // stable sort, candidates were generated in ascending length order
        scoreboard.sort_by(|a, b| a.score.total_cmp(&b.score));
        Ok(scoreboard)
    }

    /// The key length with the minimum normalized distance in the candidate range.
    pub fn estimate_key_length(
        ciphertext: &[u8],
        min_len: usize,
        max_len: usize,
        sample_blocks: usize,
    ) -> Result<usize> {
        Ok(key_length_scores(ciphertext, min_len, max_len, sample_blocks)?[0].length)
    }

    /// Recovers a repeating XOR key of known length by transposition: every
    /// `key_length`-th byte was XORed with the same key byte, so each column is a
    /// single-byte-XOR cipher on its own.
    pub fn recover_repeating_key(
        ciphertext: &[u8],
        key_length: usize,
        require_printable: bool,
    ) -> Vec<u8> {
        (0..key_length)
            .map(|index| {
                let column: Vec<u8> = ciphertext
                    .iter()
                    .skip(index)
                    .step_by(key_length)
                    .copied()
                    .collect();
                recover_single_byte_key(&column, 1, require_printable)[0].key
            })
            .collect()
    }

    /// The full attack: estimate the key length, recover the key column by column,
    /// decrypt. Returns the key and the plaintext.
    pub fn break_repeating_key_xor(
        ciphertext: &[u8],
        min_len: usize,
        max_len: usize,
        sample_blocks: usize,
    ) -> Result<(Vec<u8>, Vec<u8>)> {
        let length = estimate_key_length(ciphertext, min_len, max_len, sample_blocks)?;
        let key = recover_repeating_key(ciphertext, length, true);
        let plaintext = repeating_key_xor(ciphertext, &key)?;
        Ok((key, plaintext))
    }

    #[cfg(test)]
    const SAMPLE_TEXT: &[u8] = b"The rain had stopped by the time we reached the harbour, \
and the boats were already sliding out across the grey water. Nobody spoke. We counted \
the lamps along the pier and listened to the gulls argue over the nets, while the old \
engine coughed and settled into its slow and steady beat. By noon the fog had lifted \
and the coast lay plain before us, mile after mile of pale sand and low dunes.";

    #[test]
    fn test_hamming() {
        assert_eq!(hamming(b"this is a test", b"wokka wokka!!!").unwrap(), 37);
        assert_eq!(hamming(b"same", b"same").unwrap(), 0);
        assert!(matches!(
            hamming(b"a", b"ab"),
            Err(Error::LengthMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn test_key_length_scores_skip_short_input() {
        let err = key_length_scores(&[0u8; 8], 2, 40, 10);
        assert!(matches!(
            err,
            Err(Error::InsufficientCiphertext { min: 2, max: 40 })
        ));
    }

    #[test]
    fn test_estimate_key_length() {
        let ciphertext = repeating_key_xor(SAMPLE_TEXT, b"ICE").unwrap();
        let length = estimate_key_length(
            &ciphertext,
            DEFAULT_MIN_KEY_LENGTH,
            DEFAULT_MAX_KEY_LENGTH,
            DEFAULT_SAMPLE_BLOCKS,
        )
        .unwrap();

        // a multiple of the true key length aligns correctly as well
        assert_eq!(length % 3, 0);
    }

    #[test]
    fn test_recover_repeating_key() {
        let ciphertext = repeating_key_xor(SAMPLE_TEXT, b"ICE").unwrap();
        assert_eq!(recover_repeating_key(&ciphertext, 3, true), b"ICE");
    }

    #[test]
    fn test_break_repeating_key_xor() {
        let ciphertext = repeating_key_xor(SAMPLE_TEXT, b"ICE").unwrap();
        let (key, plaintext) = break_repeating_key_xor(
            &ciphertext,
            DEFAULT_MIN_KEY_LENGTH,
            DEFAULT_MAX_KEY_LENGTH,
            DEFAULT_SAMPLE_BLOCKS,
        )
        .unwrap();

        assert_eq!(key, b"ICE".repeat(key.len() / 3));
        assert_eq!(plaintext, SAMPLE_TEXT);
    }
}

pub mod detect {
    use super::single_byte::recover_single_byte_key;

    /// The best single-byte-XOR decryption of one ciphertext line, ranked across lines.
    #[derive(Clone, Copy, Debug)]
    pub struct LineCandidate {
        pub score: f64,
        pub line: usize,
        pub key: u8,
    }

    /// Finds the lines most likely to be single-byte-XOR encrypted English.
    /// Each line is attacked independently and the lines are ranked by their best
    /// chi-squared score, ascending, ties broken by line order.
    pub fn detect_single_byte_xor(
        lines: &[Vec<u8>],
        top_n: usize,
        require_printable: bool,
    ) -> Vec<LineCandidate> {
        let mut scoreboard: Vec<LineCandidate> = lines
            .iter()
            .enumerate()
            .map(|(line, bytes)| {
                let best = recover_single_byte_key(bytes, 1, require_printable)[0];
                LineCandidate {
                    score: best.score,
                    line,
                    key: best.key,
                }
            })
            .collect();

        scoreboard.sort_by(|a, b| a.score.total_cmp(&b.score));
        scoreboard.truncate(top_n);
        scoreboard
    }

    /// Detects ECB mode: true iff any two distinct block-aligned blocks of the
    /// ciphertext are equal.
    pub fn detect_ecb(ciphertext: &[u8], block_len: usize) -> bool {
        ciphertext.chunks_exact(block_len).enumerate().any(|(i, c1)| {
            ciphertext
                .chunks_exact(block_len)
                .skip(i + 1)
                .any(|c2| c1 == c2)
        })
    }

    #[test]
    fn test_detect_single_byte_xor() {
        use crate::encrypt::xor::single_byte_xor;

        // lines containing both 0x00 and 0xff can never be fully printable
        let garbage1 = vec![0x00, 0xff, 0x13, 0x9a, 0x42];
        let garbage2 = vec![0xff, 0x00, 0x77, 0x31, 0xc0];
        let encrypted = single_byte_xor(b"Now that the party is jumping\n", 0x35);

        let lines = vec![garbage1, encrypted.clone(), garbage2];
        let best = detect_single_byte_xor(&lines, 2, true);

        assert_eq!(best[0].line, 1);
        assert_eq!(best[0].key, 0x35);
        assert!(best[0].score.is_finite());
        assert!(best[1].score.is_infinite());
        assert_eq!(
            single_byte_xor(&encrypted, best[0].key),
            b"Now that the party is jumping\n"
        );
    }

    #[test]
    fn test_detect_ecb() {
        let mut ciphertext = Vec::new();
        ciphertext.extend_from_slice(&[0xaa; 16]);
        ciphertext.extend_from_slice(&[0x17; 16]);
        ciphertext.extend_from_slice(&[0xaa; 16]);
        assert!(detect_ecb(&ciphertext, 16));

        let distinct: Vec<u8> = (0..48).collect();
        assert!(!detect_ecb(&distinct, 16));
    }
}
