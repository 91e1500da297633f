//! Newline framing and message decoding for the stdin side.
//!
//! Pure parsing, no I/O: the binary's read loop feeds raw chunks into
//! [`LineFramer::push`] and decodes each returned line with
//! [`decode_line`].

use serde_json::Value;

/// Accumulates raw bytes and yields complete newline-delimited records.
///
/// The trailing fragment after the last newline stays buffered until a
/// later chunk completes it, so every complete line is delivered exactly
/// once no matter how the input is fragmented. Lines that are empty after
/// trimming are dropped. This buffer is the only state the bridge carries
/// across records.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    /// Create an empty framer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the complete lines it finishes, in order.
    ///
    /// The buffer stays raw bytes so a multibyte character split across a
    /// chunk boundary reassembles before text conversion; only complete
    /// lines are decoded. Invalid UTF-8 within a complete line is replaced
    /// rather than rejected — malformed bytes are the decoder's concern,
    /// not the framer's.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line);
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        lines
    }
}

/// Decode one framed line into a JSON value.
pub fn decode_line(line: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(line)
}

/// Best-effort recovery of an `id` from a line that failed to decode.
///
/// Heuristic: when two JSON objects were glued together without a
/// newline, the text contains a `}{` boundary; re-closing the first half
/// often yields a parseable object whose `id` can correlate the parse
/// error with its caller. This is explicitly best-effort — it may return
/// `None` for most malformed shapes and must never fail louder than that.
pub fn recover_id(line: &str) -> Option<Value> {
    let (first, _) = line.split_once("}{")?;
    let candidate = format!("{first}}}");
    let value: Value = serde_json::from_str(&candidate).ok()?;
    value.get("id").cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_complete_line() {
        let mut framer = LineFramer::new();
        let lines = framer.push(b"{\"a\":1}\n");
        assert_eq!(lines, vec!["{\"a\":1}"]);
    }

    #[test]
    fn test_partial_line_held_back() {
        let mut framer = LineFramer::new();
        assert!(framer.push(b"{\"a\"").is_empty());
        assert!(framer.push(b":1").is_empty());
        let lines = framer.push(b"}\n");
        assert_eq!(lines, vec!["{\"a\":1}"]);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut framer = LineFramer::new();
        let lines = framer.push(b"one\ntwo\nthree\n");
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_chunk_boundary_inside_second_line() {
        let mut framer = LineFramer::new();
        let lines = framer.push(b"first\nsec");
        assert_eq!(lines, vec!["first"]);
        let lines = framer.push(b"ond\n");
        assert_eq!(lines, vec!["second"]);
    }

    #[test]
    fn test_byte_at_a_time_delivery() {
        let input = b"{\"id\":1}\n{\"id\":2}\n";
        let mut framer = LineFramer::new();
        let mut lines = Vec::new();
        for byte in input {
            lines.extend(framer.push(&[*byte]));
        }
        assert_eq!(lines, vec!["{\"id\":1}", "{\"id\":2}"]);
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let line = r#"{"id":1,"params":"café"}"#;
        let mut input = line.as_bytes().to_vec();
        input.push(b'\n');
        // Split between the two bytes of the 'é' encoding (0xC3 0xA9).
        let split = input.iter().position(|&b| b == 0xC3).unwrap() + 1;

        let mut framer = LineFramer::new();
        assert!(framer.push(&input[..split]).is_empty());
        assert_eq!(framer.push(&input[split..]), vec![line]);
    }

    #[test]
    fn test_byte_at_a_time_multibyte_delivery() {
        let line = r#"{"jsonrpc":"2.0","id":1,"params":{"q":"naïve résumé"}}"#;
        let mut input = line.as_bytes().to_vec();
        input.push(b'\n');

        let mut framer = LineFramer::new();
        let mut lines = Vec::new();
        for byte in &input {
            lines.extend(framer.push(&[*byte]));
        }
        assert_eq!(lines, vec![line]);
    }

    #[test]
    fn test_blank_lines_dropped() {
        let mut framer = LineFramer::new();
        let lines = framer.push(b"\n   \n{\"a\":1}\n\n");
        assert_eq!(lines, vec!["{\"a\":1}"]);
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let mut framer = LineFramer::new();
        let lines = framer.push(b"  {\"a\":1}  \r\n");
        assert_eq!(lines, vec!["{\"a\":1}"]);
    }

    #[test]
    fn test_fragment_survives_across_pushes() {
        let mut framer = LineFramer::new();
        assert!(framer.push(b"tail without newline").is_empty());
        assert!(framer.push(b" continues").is_empty());
        let lines = framer.push(b" and ends\n");
        assert_eq!(lines, vec!["tail without newline continues and ends"]);
    }

    #[test]
    fn test_decode_line() {
        assert_eq!(decode_line("{\"a\":1}").unwrap(), json!({"a": 1}));
        assert!(decode_line("{\"truncated").is_err());
    }

    #[test]
    fn test_recover_id_from_glued_objects() {
        let line = r#"{"jsonrpc":"2.0","id":9}{"jsonrpc":"2.0","id":10}"#;
        assert_eq!(recover_id(line), Some(json!(9)));
    }

    #[test]
    fn test_recover_id_gives_up_quietly() {
        assert_eq!(recover_id("not json at all"), None);
        assert_eq!(recover_id("{\"id\":1"), None);
        // Boundary found but the first half still isn't parseable.
        assert_eq!(recover_id("oops}{\"id\":2}"), None);
        // First half parses but has no id.
        assert_eq!(recover_id(r#"{"jsonrpc":"2.0"}{"id":3}"#), None);
    }
}
