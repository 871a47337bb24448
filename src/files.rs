use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::encode::{self, Encoding};
use crate::Result;

/// Reads a whole encoded file into bytes, stripping line breaks before decoding.
/// Encoded dumps are usually wrapped in lines and the breaks are not part of the data.
pub fn file_to_bytes(path: impl AsRef<Path>, encoding: Encoding) -> Result<Vec<u8>> {
    let mut text = String::new();
    File::open(path)?.read_to_string(&mut text)?;
    text.retain(|c| c != '\n' && c != '\r');
    encode::decode(&text, encoding)
}

/// Reads a file of newline-delimited hex strings, decoding each line independently.
pub fn hex_lines(path: impl AsRef<Path>) -> Result<Vec<Vec<u8>>> {
    let mut lines = Vec::new();
    for line in BufReader::new(File::open(path)?).lines() {
        lines.push(encode::hex::from_hex(line?.trim())?);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_line_wrapped_base64() {
        let path = std::env::temp_dir().join("xorbreak_test_blob.txt");
        std::fs::write(&path, "TWFu\nTWFu\nTWE=\n").unwrap();

        let bytes = file_to_bytes(&path, Encoding::Base64).unwrap();
        assert_eq!(bytes, b"ManManMa");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn reads_hex_lines_independently() {
        let path = std::env::temp_dir().join("xorbreak_test_lines.txt");
        std::fs::write(&path, "686974\n746865\n").unwrap();

        let lines = hex_lines(&path).unwrap();
        assert_eq!(lines, vec![b"hit".to_vec(), b"the".to_vec()]);

        std::fs::remove_file(&path).unwrap();
    }
}
