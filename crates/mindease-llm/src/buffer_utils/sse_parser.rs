use anyhow::Result;
use futures::{Stream, StreamExt};

use super::buffering::CircularLineBuffer;
use crate::traits::EventStream;
use crate::StreamEvent;

/// Strategy pattern for parsing different SSE payload shapes
pub trait SseLineParser: Send {
    /// Parse a data line into stream events
    fn parse_data_line(&self, data: &str) -> Result<Vec<StreamEvent>>;

    /// Check if this line signals end of stream
    fn is_done_marker(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

/// Generic SSE stream parser using circular buffer
///
/// The stream ends after the done marker. A body that closes before the
/// marker was seen yields a final error so callers can tell an aborted
/// reply from a finished one.
pub fn parse_sse_stream<S, B, E, P>(byte_stream: S, parser: P) -> EventStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
    P: SseLineParser + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(byte_stream);
        let mut buffer = CircularLineBuffer::with_capacity(4096);
        let mut done = false;

        'outer: while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(bytes.as_ref());

                    while let Some(line_result) = buffer.next_line() {
                        match line_result {
                            Ok(line) => {
                                let Some(data) = line.strip_prefix("data:").map(str::trim) else {
                                    continue;
                                };

                                if parser.is_done_marker(data) {
                                    if !done {
                                        yield Ok(StreamEvent::Done { finish_reason: None });
                                    }
                                    done = true;
                                    break 'outer;
                                }

                                match parser.parse_data_line(data) {
                                    Ok(events) => {
                                        for event in events {
                                            if matches!(event, StreamEvent::Done { .. }) {
                                                if done {
                                                    continue;
                                                }
                                                done = true;
                                            }
                                            yield Ok(event);
                                        }
                                    }
                                    Err(e) => yield Err(e),
                                }
                            }
                            Err(e) => yield Err(e),
                        }
                    }
                }
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {}", e));
                    break;
                }
            }
        }

        if !done {
            tracing::warn!("completion stream closed before the done marker");
            yield Err(anyhow::anyhow!("Stream ended before completion"));
        }
    })
}
