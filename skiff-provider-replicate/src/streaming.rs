//! SSE transcoding from the prediction stream endpoint to [`StreamPart`]s.
//!
//! Replicate delivers incremental output as server-sent events:
//!
//!   event: output
//!   data: Hello
//!
//!   (blank line terminates the event)
//!
//! Only `output` and `done` events are meaningful. `output` data is raw
//! model text, not JSON — whitespace in it is significant.

use futures::{Stream, StreamExt};
use reqwest::Response;
use skiff_types::{FinishReason, StreamHandle, StreamPart, TokenUsage};

/// Wrap an HTTP response body into a [`StreamHandle`] emitting [`StreamPart`]s.
pub(crate) fn stream_prediction(response: Response) -> StreamHandle {
    let byte_stream = response.bytes_stream();
    StreamHandle {
        receiver: Box::pin(transcode_sse(byte_stream)),
    }
}

/// Parse a raw byte stream into a stream of [`StreamPart`]s.
///
/// Single pass, arrival order, no buffering beyond one SSE event. The
/// stream terminates after the first finish part — once `done` arrives,
/// no further input is read or emitted — or when the underlying byte
/// stream ends or errors.
fn transcode_sse(
    byte_stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
) -> impl Stream<Item = StreamPart> + Send + 'static {
    async_stream::stream! {
        let mut decoder = SseDecoder::new();
        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut line_buf = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield StreamPart::Error(format!("stream read error: {e}"));
                    return;
                }
            };

            let chunk_str = match std::str::from_utf8(&chunk) {
                Ok(s) => s,
                Err(e) => {
                    yield StreamPart::Error(format!("UTF-8 decode error: {e}"));
                    return;
                }
            };

            // Append to the line buffer and process complete lines, keeping
            // any incomplete line for the next chunk.
            line_buf.push_str(chunk_str);
            while let Some(newline_pos) = line_buf.find('\n') {
                let line = line_buf[..newline_pos].trim_end_matches('\r').to_string();
                line_buf.drain(..=newline_pos);

                if let Some(part) = decoder.process_line(&line) {
                    let finished = matches!(part, StreamPart::Finish { .. });
                    yield part;
                    if finished {
                        return;
                    }
                }
            }
        }

        // The upstream closed without a `done` event. Flush any event left
        // in the decoder (a final block may lack its trailing blank line).
        if !line_buf.is_empty() {
            if let Some(part) = decoder.process_line(line_buf.trim_end_matches('\r')) {
                yield part;
                return;
            }
        }
        if let Some(part) = decoder.dispatch() {
            yield part;
        }
    }
}

/// Accumulates one SSE event across `event:` / `data:` lines.
struct SseDecoder {
    /// The current event name (from `event:` lines).
    event: Option<String>,
    /// The current data payload (from `data:` lines; may be multi-line).
    data: String,
    /// Whether any `data:` line has been seen for the current event.
    has_data: bool,
}

impl SseDecoder {
    fn new() -> Self {
        Self {
            event: None,
            data: String::new(),
            has_data: false,
        }
    }

    /// Feed one line. A blank line dispatches the accumulated event and may
    /// produce a part.
    fn process_line(&mut self, line: &str) -> Option<StreamPart> {
        if line.is_empty() {
            return self.dispatch();
        }

        if let Some(rest) = line.strip_prefix("event:") {
            self.event = Some(strip_field_space(rest).to_string());
        } else if let Some(rest) = line.strip_prefix("data:") {
            // Only the single space after the colon is framing; everything
            // beyond it is payload. Trimming here would corrupt token
            // fragments like " world".
            if self.has_data {
                self.data.push('\n');
            }
            self.data.push_str(strip_field_space(rest));
            self.has_data = true;
        }
        // Comment lines (`:` prefix) and unknown fields are ignored.

        None
    }

    /// Dispatch the accumulated event name + data.
    ///
    /// `output` carries an incremental text fragment; `done` finishes the
    /// stream with a stop reason and zeroed usage (the API does not report
    /// token counts). All other event names produce nothing.
    fn dispatch(&mut self) -> Option<StreamPart> {
        let event = self.event.take();
        let data = std::mem::take(&mut self.data);
        self.has_data = false;

        match event.as_deref() {
            Some("output") => Some(StreamPart::TextDelta(data)),
            Some("done") => Some(StreamPart::Finish {
                reason: FinishReason::Stop,
                usage: TokenUsage::default(),
            }),
            _ => None,
        }
    }
}

/// Strip the optional single space after an SSE field colon.
fn strip_field_space(value: &str) -> &str {
    value.strip_prefix(' ').unwrap_or(value)
}
