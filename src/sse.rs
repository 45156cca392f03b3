//! SSE (Server-Sent Events) frame parser for the push channel.
//!
//! Accepts both `data:{...}` and `data: {...}`, CRLF or LF line endings,
//! and frames split across arbitrary chunk boundaries.

/// One dispatched SSE event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    /// `event:` field, if the server set one.
    pub event: Option<String>,
    /// Joined `data:` lines (multi-line data is joined with `\n`).
    pub data: String,
}

/// Incremental decoder. Feed raw chunks in arrival order; completed
/// frames come back as soon as their terminating blank line arrives.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(frame) = self.process_line(line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flush a trailing frame that was never terminated by a blank line.
    pub fn finish(mut self) -> Option<SseFrame> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest).trim_end_matches('\r').to_string();
            if let Some(frame) = self.process_line(&line) {
                return Some(frame);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        // Comment line, used for keep-alives.
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame { event, data })
    }
}

/// Parse a complete SSE body into frames.
pub fn parse_sse_frames(bytes: &[u8]) -> Vec<SseFrame> {
    let mut decoder = SseDecoder::new();
    let mut frames = decoder.feed(bytes);
    frames.extend(decoder.finish());
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_format() {
        let frames = parse_sse_frames(b"data: {\"root\":{}}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "{\"root\":{}}");
    }

    #[test]
    fn parses_compact_format() {
        let frames = parse_sse_frames(b"data:{\"root\":{\"tag\":\"p\"}}\n\n");
        assert_eq!(frames[0].data, "{\"root\":{\"tag\":\"p\"}}");
    }

    #[test]
    fn skips_keepalive_comments() {
        let frames = parse_sse_frames(b":\n\n: keep-alive\n\ndata: x\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "x");
    }

    #[test]
    fn handles_crlf_and_event_names() {
        let frames = parse_sse_frames(b"event: snapshot\r\ndata: 1\r\n\r\n");
        assert_eq!(frames[0].event.as_deref(), Some("snapshot"));
        assert_eq!(frames[0].data, "1");
    }

    #[test]
    fn joins_multiline_data() {
        let frames = parse_sse_frames(b"data: a\ndata: b\n\n");
        assert_eq!(frames[0].data, "a\nb");
    }

    #[test]
    fn frames_survive_chunk_splits() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"da").is_empty());
        assert!(decoder.feed(b"ta: hel").is_empty());
        assert!(decoder.feed(b"lo\n").is_empty());
        let frames = decoder.feed(b"\ndata: next\n\n");
        let data: Vec<_> = frames.iter().map(|f| f.data.as_str()).collect();
        assert_eq!(data, ["hello", "next"]);
    }

    #[test]
    fn unterminated_tail_is_flushed_on_finish() {
        let frames = parse_sse_frames(b"data: first\n\ndata: tail");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].data, "tail");
    }
}
