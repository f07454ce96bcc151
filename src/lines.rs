//! Lossy line reading.
//!
//! Host files and probe output are not guaranteed to be UTF-8. Lines are
//! read as raw bytes and decoded with invalid sequences replaced by
//! U+FFFD, so one bad byte never ends the read.

use std::io::{self, BufRead};

/// Decode one raw line, dropping a trailing `\n` or `\r\n`.
pub fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Iterator over the lossily decoded lines of a reader.
pub struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LossyLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => Some(Ok(decode_line(&self.buf))),
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_endings() {
        assert_eq!(decode_line(b"plain\n"), "plain");
        assert_eq!(decode_line(b"dos\r\n"), "dos");
        assert_eq!(decode_line(b"last"), "last");
    }

    #[test]
    fn replaces_invalid_bytes() {
        assert_eq!(decode_line(b"caf\xe9\n"), "caf\u{FFFD}");
    }

    #[test]
    fn keeps_reading_past_invalid_lines() {
        let input: &[u8] = b"Welcome to caf\xe9 host\nCentOS release 6\n";
        let lines: Vec<String> = LossyLines::new(input).map(|l| l.unwrap()).collect();
        assert_eq!(
            lines,
            vec!["Welcome to caf\u{FFFD} host".to_string(), "CentOS release 6".to_string()]
        );
    }

    #[test]
    fn empty_input_has_no_lines() {
        let input: &[u8] = b"";
        assert_eq!(LossyLines::new(input).count(), 0);
    }
}
