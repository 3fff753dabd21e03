//! Best-effort parsing of an incomplete JSON document.
//!
//! Local models that only stream raw text produce the structured response
//! one token at a time. [`parse_partial_json`] cuts the text back to the
//! last point where it can be closed into valid JSON, keeping an unfinished
//! string value as-is, and parses the result.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Key,
    Colon,
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object(Expect),
    Array(Expect),
}

#[derive(Debug)]
struct Scanner {
    stack: Vec<Frame>,
    /// Byte offset and closing suffix of the last valid cut point.
    checkpoint: Option<(usize, String)>,
    top_level_done: bool,
}

impl Scanner {
    fn closers(&self) -> String {
        self.stack
            .iter()
            .rev()
            .map(|frame| match frame {
                Frame::Object(_) => '}',
                Frame::Array(_) => ']',
            })
            .collect()
    }

    fn mark(&mut self, end: usize) {
        self.checkpoint = Some((end, self.closers()));
    }

    fn expecting_key(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::Object(Expect::Key)))
    }

    fn expecting_value(&self) -> bool {
        match self.stack.last() {
            Some(Frame::Object(expect)) => *expect == Expect::Value,
            Some(Frame::Array(expect)) => *expect == Expect::Value,
            None => !self.top_level_done,
        }
    }

    fn set_expect(&mut self, next: Expect) {
        match self.stack.last_mut() {
            Some(Frame::Object(expect)) | Some(Frame::Array(expect)) => *expect = next,
            None => {}
        }
    }

    /// A value just finished at byte offset `end`.
    fn value_done(&mut self, end: usize) {
        if self.stack.is_empty() {
            self.top_level_done = true;
        } else {
            self.set_expect(Expect::CommaOrEnd);
        }
        self.mark(end);
    }
}

/// Strip markdown code fences around a JSON payload. The closing fence may
/// still be missing while the model is streaming.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let without_opening = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_opening
        .strip_suffix("```")
        .unwrap_or(without_opening)
        .trim()
}

/// Parse a possibly-truncated JSON document.
///
/// Returns `None` when nothing usable has been produced yet.
pub fn parse_partial_json(text: &str) -> Option<Value> {
    let text = strip_code_fences(text);
    if text.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }
    let repaired = repair(text)?;
    serde_json::from_str(&repaired).ok()
}

fn repair(text: &str) -> Option<String> {
    let mut scanner = Scanner {
        stack: Vec::new(),
        checkpoint: None,
        top_level_done: false,
    };
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'{' if scanner.expecting_value() => {
                scanner.stack.push(Frame::Object(Expect::Key));
                i += 1;
                scanner.mark(i);
            }
            b'[' if scanner.expecting_value() => {
                scanner.stack.push(Frame::Array(Expect::Value));
                i += 1;
                scanner.mark(i);
            }
            b'}' if matches!(
                scanner.stack.last(),
                Some(Frame::Object(Expect::Key | Expect::CommaOrEnd))
            ) =>
            {
                scanner.stack.pop();
                i += 1;
                scanner.value_done(i);
            }
            b']' if matches!(
                scanner.stack.last(),
                Some(Frame::Array(Expect::Value | Expect::CommaOrEnd))
            ) =>
            {
                scanner.stack.pop();
                i += 1;
                scanner.value_done(i);
            }
            b':' if matches!(scanner.stack.last(), Some(Frame::Object(Expect::Colon))) => {
                scanner.set_expect(Expect::Value);
                i += 1;
            }
            b',' => {
                match scanner.stack.last() {
                    Some(Frame::Object(Expect::CommaOrEnd)) => scanner.set_expect(Expect::Key),
                    Some(Frame::Array(Expect::CommaOrEnd)) => scanner.set_expect(Expect::Value),
                    _ => return finish(text, &scanner, None),
                }
                i += 1;
            }
            b'"' if scanner.expecting_key() || scanner.expecting_value() => {
                let is_key = scanner.expecting_key();
                match scan_string(bytes, i + 1) {
                    StringEnd::Closed(end) => {
                        if is_key {
                            scanner.set_expect(Expect::Colon);
                        } else {
                            scanner.value_done(end);
                        }
                        i = end;
                    }
                    StringEnd::Open(safe_end) => {
                        let open = (!is_key).then_some(safe_end);
                        return finish(text, &scanner, open);
                    }
                }
            }
            _ if scanner.expecting_value() => {
                let end = bytes[i..]
                    .iter()
                    .position(|c| matches!(c, b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r'))
                    .map_or(bytes.len(), |offset| i + offset);
                let token = &text[i..end];
                if serde_json::from_str::<Value>(token).is_err() {
                    return finish(text, &scanner, None);
                }
                scanner.value_done(end);
                i = end;
            }
            _ => return finish(text, &scanner, None),
        }
    }

    finish(text, &scanner, None)
}

enum StringEnd {
    /// Byte offset just past the closing quote.
    Closed(usize),
    /// Still open; byte offset up to which the content is safe to keep.
    Open(usize),
}

fn scan_string(bytes: &[u8], start: usize) -> StringEnd {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return StringEnd::Closed(i + 1),
            b'\\' => {
                let width = match bytes.get(i + 1) {
                    Some(b'u') => 6,
                    Some(_) => 2,
                    None => return StringEnd::Open(i),
                };
                if i + width > bytes.len() {
                    return StringEnd::Open(i);
                }
                i += width;
            }
            _ => i += 1,
        }
    }
    StringEnd::Open(bytes.len())
}

fn finish(text: &str, scanner: &Scanner, open_string: Option<usize>) -> Option<String> {
    if let Some(safe_end) = open_string {
        // The unfinished string completes a value, so the enclosing frames
        // close exactly as they stand.
        let content = text.get(..safe_end)?;
        return Some(format!("{content}\"{}", scanner.closers()));
    }
    let (end, closers) = scanner.checkpoint.as_ref()?;
    Some(format!("{}{closers}", text.get(..*end)?))
}
