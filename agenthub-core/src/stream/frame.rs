//! Line framing for `text/event-stream` response bodies.
//!
//! The decoder buffers raw bytes and only decodes complete lines, so a
//! multibyte character split across two network chunks is reassembled
//! before it is turned into text.

const DATA_PREFIX: &str = "data: ";

#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one body chunk and returns the payloads of every `data: ` line
    /// completed by it. The trailing partial line stays buffered.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        let mut start = 0;

        while let Some(offset) = self.buffer[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            if let Some(payload) = data_payload(&self.buffer[start..end]) {
                payloads.push(payload);
            }
            start = end + 1;
        }

        self.buffer.drain(..start);
        payloads
    }

    /// Flushes a final line that was not terminated by a newline.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        data_payload(&rest)
    }

    /// Number of bytes waiting for a line terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let text = String::from_utf8_lossy(line);
    text.strip_prefix(DATA_PREFIX).map(str::to_string)
}
