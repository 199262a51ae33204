//! Lazy text streams over chunked response bodies.
//!
//! # Design
//! `TextStream` turns each `read` on the underlying body into exactly one
//! decoded `String`, so callers see progress as the server produces it
//! (image pulls emit one JSON line per progress event). Bytes of a
//! multi-byte character split across two reads are held back by
//! `Utf8Decoder` and emitted with the next read.
//!
//! The stream owns the reader. Dropping it mid-iteration closes the
//! connection; nothing else is needed to cancel.

use std::fmt;
use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

use tracing::debug;

use crate::error::ClientError;

const CHUNK_SIZE: usize = 8 * 1024;

/// Incremental UTF-8 decoder that keeps an incomplete trailing sequence
/// between calls. Invalid bytes decode to U+FFFD.
#[derive(Debug, Default, Clone)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `pending + bytes` as forms complete characters.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        let mut start = 0;
        while start < self.pending.len() {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(text) => {
                    out.push_str(text);
                    start = self.pending.len();
                }
                Err(err) => {
                    let valid_end = start + err.valid_up_to();
                    out.push_str(std::str::from_utf8(&self.pending[start..valid_end]).unwrap_or_default());
                    start = valid_end;
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start += len;
                        }
                        // Incomplete sequence at the end: wait for more bytes.
                        None => break,
                    }
                }
            }
        }
        self.pending.drain(..start);
        out
    }

    /// Bytes held back waiting for the rest of a character.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }
}

/// Forward-only iterator of decoded text chunks from a streamed response.
///
/// Yields one item per underlying read and ends when the body reports EOF.
/// A read error is yielded once; the stream is fused afterwards.
pub struct TextStream {
    reader: Option<Box<dyn Read + Send>>,
    decoder: Utf8Decoder,
    buf: Vec<u8>,
}

impl TextStream {
    pub fn new(reader: Box<dyn Read + Send>) -> Self {
        Self {
            reader: Some(reader),
            decoder: Utf8Decoder::new(),
            buf: vec![0; CHUNK_SIZE],
        }
    }

    /// Drain the remaining chunks into one string.
    pub fn collect_text(self) -> Result<String, ClientError> {
        self.collect()
    }
}

impl Iterator for TextStream {
    type Item = Result<String, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        loop {
            match reader.read(&mut self.buf) {
                Ok(0) => {
                    debug!("stream finished");
                    self.reader = None;
                    return None;
                }
                Ok(n) => return Some(Ok(self.decoder.decode(&self.buf[..n]))),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.reader = None;
                    return Some(Err(ClientError::Io(e)));
                }
            }
        }
    }
}

impl FusedIterator for TextStream {}

impl fmt::Debug for TextStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStream")
            .field("open", &self.reader.is_some())
            .field("pending", &self.decoder.pending().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Hands out one queued chunk per `read` and counts calls.
    struct ChunkedReader {
        chunks: VecDeque<Vec<u8>>,
        reads: Arc<AtomicUsize>,
        fail_after: Option<usize>,
    }

    impl ChunkedReader {
        fn new(chunks: &[&[u8]]) -> (Self, Arc<AtomicUsize>) {
            let reads = Arc::new(AtomicUsize::new(0));
            let reader = Self {
                chunks: chunks.iter().map(|c| c.to_vec()).collect(),
                reads: Arc::clone(&reads),
                fail_after: None,
            };
            (reader, reads)
        }
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_after.is_some_and(|limit| n >= limit) {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
            }
            match self.chunks.pop_front() {
                Some(chunk) => {
                    let n = buf.len().min(chunk.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    if n < chunk.len() {
                        self.chunks.push_front(chunk[n..].to_vec());
                    }
                    Ok(n)
                }
                None => Ok(0),
            }
        }
    }

    #[test]
    fn yields_one_string_per_chunk() {
        let (reader, reads) = ChunkedReader::new(&[b"first", b"second", b"third"]);
        let chunks: Vec<String> = TextStream::new(Box::new(reader))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(chunks, vec!["first", "second", "third"]);
        assert_eq!(reads.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn empty_body_yields_nothing() {
        let (reader, reads) = ChunkedReader::new(&[]);
        let mut stream = TextStream::new(Box::new(reader));
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn multibyte_character_split_across_reads() {
        // "é" is 0xC3 0xA9, "€" is 0xE2 0x82 0xAC.
        let (reader, _) = ChunkedReader::new(&[b"caf\xC3", b"\xA9 ", b"\xE2\x82", b"\xAC"]);
        let chunks: Vec<String> = TextStream::new(Box::new(reader))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(chunks, vec!["caf", "é ", "", "€"]);
        assert_eq!(chunks.concat(), "café €");
    }

    #[test]
    fn early_drop_stops_reading() {
        let (reader, reads) = ChunkedReader::new(&[b"a", b"b", b"c"]);
        let mut stream = TextStream::new(Box::new(reader));
        assert_eq!(stream.next().unwrap().unwrap(), "a");
        drop(stream);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn read_error_is_yielded_once() {
        let (mut reader, _) = ChunkedReader::new(&[b"a", b"b"]);
        reader.fail_after = Some(1);
        let mut stream = TextStream::new(Box::new(reader));
        assert_eq!(stream.next().unwrap().unwrap(), "a");
        assert!(matches!(stream.next(), Some(Err(ClientError::Io(_)))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn collect_text_concatenates() {
        let (reader, _) = ChunkedReader::new(&[b"{\"status\":\"Pulling\"}\n", b"{\"status\":\"Done\"}\n"]);
        let text = TextStream::new(Box::new(reader)).collect_text().unwrap();
        assert_eq!(text, "{\"status\":\"Pulling\"}\n{\"status\":\"Done\"}\n");
    }

    #[test]
    fn chunk_larger_than_buffer_spans_reads() {
        let big = vec![b'x'; CHUNK_SIZE + 100];
        let (reader, reads) = ChunkedReader::new(&[&big]);
        let chunks: Vec<String> = TextStream::new(Box::new(reader))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(chunks.iter().map(String::len).collect::<Vec<_>>(), vec![CHUNK_SIZE, 100]);
        assert_eq!(reads.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
        assert!(decoder.pending().is_empty());
    }

    #[test]
    fn decoder_holds_incomplete_tail() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"\xF0\x9F"), "");
        assert_eq!(decoder.pending(), b"\xF0\x9F");
        assert_eq!(decoder.decode(b"\x93\xA6!"), "\u{1F4E6}!");
        assert!(decoder.pending().is_empty());
    }
}
