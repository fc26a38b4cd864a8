//! Generic newline-delimited JSON splitter with partial-chunk buffering.
//!
//! Generalizes the same incremental line-accumulation idiom the PTY layer
//! already uses for 4096-byte reader chunks: append to an owned buffer,
//! split on `\n`, keep the last (possibly incomplete) piece around for the
//! next call.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A newline-delimited JSON parser that maps each parsed line to zero or
/// more `T`s, generic over what `T` is (an adapter picks its own event
/// type).
pub struct JsonLinesParser<T> {
    buffer: String,
    map_line: Box<dyn FnMut(Value) -> Vec<T> + Send>,
    non_json_handler: Option<Box<dyn FnMut(&str) -> Vec<T> + Send>>,
}

impl<T> JsonLinesParser<T> {
    /// `map_line` converts one parsed JSON value into zero or more items.
    pub fn new(map_line: impl FnMut(Value) -> Vec<T> + Send + 'static) -> Self {
        Self {
            buffer: String::new(),
            map_line: Box::new(map_line),
            non_json_handler: None,
        }
    }

    /// Attach a handler for lines that fail to parse as JSON. Without one,
    /// such lines are silently dropped.
    #[must_use]
    pub fn with_non_json_handler(mut self, handler: impl FnMut(&str) -> Vec<T> + Send + 'static) -> Self {
        self.non_json_handler = Some(Box::new(handler));
        self
    }

    /// Feed a chunk of bytes (decoded lossily as UTF-8), returning items
    /// produced by every completed line in this and prior unflushed
    /// chunks, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<T> {
        let text = String::from_utf8_lossy(chunk);
        self.feed_str(&text)
    }

    /// Feed already-decoded text. Kept separate from [`Self::feed`] so
    /// tests can avoid round-tripping through bytes.
    pub fn feed_str(&mut self, chunk: &str) -> Vec<T> {
        self.buffer.push_str(chunk);
        let mut items = Vec::new();

        loop {
            let Some(newline_pos) = self.buffer.find('\n') else {
                break;
            };
            let line = self.buffer[..newline_pos].to_string();
            self.buffer.drain(..=newline_pos);
            items.extend(self.process_line(&line));
        }

        items
    }

    /// Drain a terminal non-empty buffer by re-feeding with an appended
    /// newline. Call once the underlying stream has ended.
    pub fn flush(&mut self) -> Vec<T> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let remainder = std::mem::take(&mut self.buffer);
        self.feed_str(&format!("{remainder}\n"))
    }

    fn process_line(&mut self, line: &str) -> Vec<T> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => (self.map_line)(value),
            Err(_) => match self.non_json_handler.as_mut() {
                Some(handler) => handler(trimmed),
                None => Vec::new(),
            },
        }
    }
}

/// Convenience for adapters whose `T` is itself `Deserialize` and whose map
/// function doesn't need the raw [`Value`].
pub fn parse_typed<T: DeserializeOwned>(value: Value) -> Option<T> {
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_complete_line_is_parsed() {
        let mut parser = JsonLinesParser::new(|v| vec![v["type"].as_str().unwrap_or_default().to_string()]);
        let items = parser.feed_str("{\"type\":\"ready\"}\n");
        assert_eq!(items, vec!["ready".to_string()]);
    }

    #[test]
    fn incomplete_trailing_line_is_buffered() {
        let mut parser = JsonLinesParser::new(|v| vec![v["type"].as_str().unwrap_or_default().to_string()]);
        let items = parser.feed_str("{\"type\":\"ready\"}\n{\"type\":\"par");
        assert_eq!(items, vec!["ready".to_string()]);
        let items = parser.feed_str("tial\"}\n");
        assert_eq!(items, vec!["partial".to_string()]);
    }

    #[test]
    fn chunk_split_invariance() {
        let input = "{\"type\":\"a\"}\n{\"type\":\"b\"}\n{\"type\":\"c\"}\n";
        let collect = |splits: &[&str]| {
            let mut parser =
                JsonLinesParser::new(|v| vec![v["type"].as_str().unwrap_or_default().to_string()]);
            let mut out = Vec::new();
            for part in splits {
                out.extend(parser.feed_str(part));
            }
            out
        };

        let whole = collect(&[input]);
        let split_mid_line = collect(&[&input[..15], &input[15..]]);
        let split_many = collect(&[&input[..5], &input[5..20], &input[20..]]);

        assert_eq!(whole, split_mid_line);
        assert_eq!(whole, split_many);
    }

    #[test]
    fn non_json_line_falls_back_to_handler() {
        let mut parser = JsonLinesParser::new(|_| Vec::new())
            .with_non_json_handler(|line| vec![format!("raw:{line}")]);
        let items = parser.feed_str("Loading...\n{\"type\":\"ready\"}\n");
        assert_eq!(items, vec!["raw:Loading...".to_string()]);
    }

    #[test]
    fn non_json_line_is_dropped_without_handler() {
        let mut parser = JsonLinesParser::new(|_| Vec::<String>::new());
        let items = parser.feed_str("not json at all\n");
        assert!(items.is_empty());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut parser = JsonLinesParser::new(|v| vec![v["type"].as_str().unwrap_or_default().to_string()]);
        let items = parser.feed_str("\n\n{\"type\":\"a\"}\n\n");
        assert_eq!(items, vec!["a".to_string()]);
    }

    #[test]
    fn flush_drains_a_trailing_incomplete_line() {
        let mut parser = JsonLinesParser::new(|v| vec![v["type"].as_str().unwrap_or_default().to_string()]);
        parser.feed_str("{\"type\":\"a\"}\n{\"type\":\"b\"}");
        let items = parser.flush();
        assert_eq!(items, vec!["b".to_string()]);
    }

    #[test]
    fn flush_on_empty_buffer_is_a_no_op() {
        let mut parser = JsonLinesParser::new(|_| Vec::<String>::new());
        assert!(parser.flush().is_empty());
    }
}
