//! Server-sent events decoding

use std::collections::VecDeque;

use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tracing::warn;

use super::ByteStream;
use crate::domain::DomainError;

/// Largest frame the decoder will hold; bigger ones are skipped
pub const MAX_FRAME_BYTES: usize = 1 << 20;

/// Incremental SSE frame decoder
///
/// Bytes are buffered until a blank line closes a frame, so events and even
/// multi-byte characters may be split across network chunks. Only `data:`
/// fields are kept; several of them in one frame are joined with `\n`.
/// A frame over the size limit is dropped whole, up to its blank line.
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already searched for a blank line
    scanned: usize,
    /// Set while skipping the rest of an oversized frame
    discarding: bool,
    max_frame: usize,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_max_frame(MAX_FRAME_BYTES)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_frame(max_frame: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            discarding: false,
            max_frame: max_frame.max(1),
        }
    }

    /// Feeds one chunk and returns the payloads of every completed frame
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer
            .extend(chunk.iter().copied().filter(|byte| *byte != b'\r'));

        let mut payloads = Vec::new();
        let mut start = 0;
        // One byte back: the blank line may straddle the previous chunk
        let mut from = self.scanned.saturating_sub(1);

        while let Some(offset) = find_blank_line(&self.buffer[from..]) {
            let end = from + offset;
            let frame = &self.buffer[start..end];

            if self.discarding {
                self.discarding = false;
            } else if frame.len() > self.max_frame {
                warn!(size = frame.len(), limit = self.max_frame, "Dropping oversized SSE frame");
            } else if let Some(data) = frame_data(frame) {
                payloads.push(data);
            }

            start = end + 2;
            from = start;
        }

        self.buffer.drain(..start);

        if self.buffer.len() > self.max_frame {
            if !self.discarding {
                warn!(limit = self.max_frame, "Dropping oversized SSE frame");
                self.discarding = true;
            }
            // Last byte stays so a blank line split over chunks is still seen
            let keep_from = self.buffer.len() - 1;
            self.buffer.drain(..keep_from);
        }

        self.scanned = self.buffer.len();
        payloads
    }

    /// Bytes of an unfinished frame still waiting for its blank line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn find_blank_line(bytes: &[u8]) -> Option<usize> {
    bytes.windows(2).position(|w| w == b"\n\n")
}

fn frame_data(frame: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(frame);
    let lines: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.strip_prefix(' ').unwrap_or(value))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Turns a response body into a stream of event payloads
///
/// A trailing frame without its closing blank line is dropped.
pub fn sse_data_stream(bytes: ByteStream) -> BoxStream<'static, Result<String, DomainError>> {
    let state = (bytes, SseDecoder::new(), VecDeque::new());

    stream::unfold(state, |(mut bytes, mut decoder, mut pending)| async move {
        loop {
            if let Some(data) = pending.pop_front() {
                return Some((Ok(data), (bytes, decoder, pending)));
            }

            match bytes.next().await? {
                Ok(chunk) => pending.extend(decoder.push(&chunk)),
                Err(e) => return Some((Err(e), (bytes, decoder, pending))),
            }
        }
    })
    .boxed()
}
