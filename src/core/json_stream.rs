//! Streaming JSON array input and output.
//!
//! The request body is framed element by element so records can be
//! transformed while the rest of the array is still arriving.

use crate::core::transform::UtmTransformer;
use crate::domain::model::Record;
use crate::utils::error::{Result, TransformError};
use futures::{Stream, StreamExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    /// Before the opening `[`.
    Start,
    /// After `[`: an element or `]`.
    FirstElement,
    /// After `,`: an element is required.
    NextElement,
    InElement,
    /// After an element: `,` or `]`.
    AfterElement,
    Done,
}

/// Incremental splitter for a top-level JSON array of objects. Bytes may be
/// pushed in chunks of any size, including chunks that cut through strings
/// or multi-byte characters.
#[derive(Debug)]
pub struct JsonArrayFramer {
    state: FrameState,
    element: Vec<u8>,
    depth: usize,
    in_string: bool,
    escaped: bool,
    offset: usize,
}

impl Default for JsonArrayFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonArrayFramer {
    pub fn new() -> Self {
        Self {
            state: FrameState::Start,
            element: Vec::new(),
            depth: 0,
            in_string: false,
            escaped: false,
            offset: 0,
        }
    }

    /// Feeds a chunk and returns the records it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<Record>> {
        let mut records = Vec::new();

        for &byte in chunk {
            self.offset += 1;
            match self.state {
                FrameState::InElement => {
                    self.element.push(byte);
                    if self.scan(byte) {
                        records.push(self.take_element()?);
                        self.state = FrameState::AfterElement;
                    }
                }
                _ if byte.is_ascii_whitespace() => {}
                FrameState::Start => match byte {
                    b'[' => self.state = FrameState::FirstElement,
                    _ => return Err(self.unexpected(byte, "'['")),
                },
                FrameState::FirstElement | FrameState::NextElement => match byte {
                    b']' if self.state == FrameState::FirstElement => {
                        self.state = FrameState::Done
                    }
                    b'{' => self.begin_element(),
                    _ => return Err(self.unexpected(byte, "a JSON object")),
                },
                FrameState::AfterElement => match byte {
                    b',' => self.state = FrameState::NextElement,
                    b']' => self.state = FrameState::Done,
                    _ => return Err(self.unexpected(byte, "',' or ']'")),
                },
                FrameState::Done => return Err(self.unexpected(byte, "end of input")),
            }
        }

        Ok(records)
    }

    /// Checks that the array was closed.
    pub fn finish(&self) -> Result<()> {
        if self.state == FrameState::Done {
            Ok(())
        } else {
            Err(TransformError::InvalidStream {
                message: format!("unexpected end of input at byte {}", self.offset),
            })
        }
    }

    fn begin_element(&mut self) {
        self.element.clear();
        self.element.push(b'{');
        self.depth = 1;
        self.in_string = false;
        self.escaped = false;
        self.state = FrameState::InElement;
    }

    /// Tracks nesting for one byte of an element; true when it closes the element.
    fn scan(&mut self, byte: u8) -> bool {
        if self.in_string {
            match byte {
                _ if self.escaped => self.escaped = false,
                b'\\' => self.escaped = true,
                b'"' => self.in_string = false,
                _ => {}
            }
            return false;
        }

        match byte {
            b'"' => self.in_string = true,
            b'{' | b'[' => self.depth += 1,
            b'}' | b']' => {
                self.depth -= 1;
                return self.depth == 0;
            }
            _ => {}
        }
        false
    }

    fn take_element(&mut self) -> Result<Record> {
        let record = serde_json::from_slice(&self.element)?;
        self.element.clear();
        Ok(record)
    }

    fn unexpected(&self, byte: u8, expected: &str) -> TransformError {
        TransformError::InvalidStream {
            message: format!(
                "expected {} at byte {}, found {:?}",
                expected,
                self.offset,
                char::from(byte)
            ),
        }
    }
}

/// Lazily decodes records from a stream of body chunks.
pub fn decode_records<S, B, E>(chunks: S) -> impl Stream<Item = Result<Record>> + Send
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::fmt::Display + Send,
{
    async_stream::try_stream! {
        let mut framer = JsonArrayFramer::new();
        let mut chunks = Box::pin(chunks);

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| TransformError::InvalidStream {
                message: format!("failed to read request body: {}", e),
            })?;
            for record in framer.push(chunk.as_ref())? {
                yield record;
            }
        }

        framer.finish()?;
    }
}

/// Transforms records one at a time and serializes them as a JSON array.
///
/// The first item is `[` plus the first record (or `[]` for an empty
/// input), then `,` plus each following record, then `]`. An error ends the
/// stream; anything already yielded stays yielded.
pub fn encode_array<S>(
    records: S,
    transformer: UtmTransformer,
) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = Result<Record>> + Send + 'static,
{
    async_stream::try_stream! {
        let mut records = Box::pin(records);
        let mut count = 0usize;

        while let Some(record) = records.next().await {
            let record = transformer.transform(record?)?;
            let json = serde_json::to_string(&record)?;
            let chunk = if count == 0 { format!("[{}", json) } else { format!(",{}", json) };
            count += 1;
            yield chunk;
        }

        tracing::debug!("Transformed {} records", count);
        let closing = if count == 0 { "[]" } else { "]" };
        yield closing.to_string();
    }
}
