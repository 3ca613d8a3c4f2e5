//! Incremental decoding of Anthropic's SSE stream into text deltas.
//!
//! Frames arrive as `event:`/`data:` line pairs separated by blank lines;
//! chunk boundaries do not align with frame boundaries, so bytes are
//! buffered until a full frame is available.

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;

use super::LlmError;

#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    event_type: String,
    delta: Option<StreamDelta>,
    error: Option<StreamErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamErrorBody {
    message: String,
}

/// Outcome of decoding one SSE frame.
#[derive(Debug, PartialEq)]
enum FrameOutcome {
    /// A text delta to forward to the consumer.
    Text(String),
    /// Terminal `message_stop` frame.
    Done,
    /// Mid-stream error reported by the API.
    Error(String),
    /// Anything else (message_start, pings, non-text deltas).
    Skip,
}

fn decode_frame(frame: &str) -> FrameOutcome {
    for line in frame.lines() {
        let Some(data) = line.strip_prefix("data: ") else {
            continue;
        };
        let Ok(event) = serde_json::from_str::<StreamEvent>(data) else {
            continue;
        };
        match event.event_type.as_str() {
            "content_block_delta" => {
                if let Some(text) = event.delta.and_then(|d| d.text) {
                    return FrameOutcome::Text(text);
                }
            }
            "message_stop" => return FrameOutcome::Done,
            "error" => {
                let message = event
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "unknown stream error".to_string());
                return FrameOutcome::Error(message);
            }
            _ => {}
        }
    }
    FrameOutcome::Skip
}

/// A live streaming LLM call. `next_text` yields text deltas in order until
/// the model stops or the connection drops.
pub struct LlmStream {
    inner: BoxStream<'static, reqwest::Result<Bytes>>,
    buf: String,
    done: bool,
}

impl LlmStream {
    pub(super) fn new(response: reqwest::Response) -> Self {
        Self {
            inner: response.bytes_stream().boxed(),
            buf: String::new(),
            done: false,
        }
    }

    pub async fn next_text(&mut self) -> Option<Result<String, LlmError>> {
        loop {
            // Drain complete frames already buffered
            while let Some(pos) = self.buf.find("\n\n") {
                let frame = self.buf[..pos].to_string();
                self.buf.drain(..pos + 2);
                match decode_frame(&frame) {
                    FrameOutcome::Text(text) => return Some(Ok(text)),
                    FrameOutcome::Done => {
                        self.done = true;
                        return None;
                    }
                    FrameOutcome::Error(message) => {
                        self.done = true;
                        return Some(Err(LlmError::Stream(message)));
                    }
                    FrameOutcome::Skip => {}
                }
            }

            if self.done {
                return None;
            }

            match self.inner.next().await {
                Some(Ok(chunk)) => self.buf.push_str(&String::from_utf8_lossy(&chunk)),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(LlmError::Http(e)));
                }
                None => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_frame_text_delta() {
        let frame = "event: content_block_delta\n\
            data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hello\"}}";
        assert_eq!(decode_frame(frame), FrameOutcome::Text("Hello".to_string()));
    }

    #[test]
    fn test_decode_frame_message_stop() {
        let frame = "event: message_stop\ndata: {\"type\":\"message_stop\"}";
        assert_eq!(decode_frame(frame), FrameOutcome::Done);
    }

    #[test]
    fn test_decode_frame_skips_message_start() {
        let frame = "event: message_start\n\
            data: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_1\"}}";
        assert_eq!(decode_frame(frame), FrameOutcome::Skip);
    }

    #[test]
    fn test_decode_frame_error() {
        let frame = "event: error\n\
            data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}";
        assert_eq!(
            decode_frame(frame),
            FrameOutcome::Error("Overloaded".to_string())
        );
    }

    #[test]
    fn test_decode_frame_ping_is_skipped() {
        let frame = "event: ping\ndata: {\"type\": \"ping\"}";
        assert_eq!(decode_frame(frame), FrameOutcome::Skip);
    }
}
