//! Front matter + body wire format.
//!
//! ```text
//! ---
//! action: post
//! agent_name: Rakis
//! ---
//! # Markdown body, verbatim through end of input
//! ```
//!
//! The block is bounded by the first two lines consisting solely of `---`.
//! Everything after the closing line is the body, byte for byte; later
//! delimiter lines inside the body (fenced code, horizontal rules) are never
//! split on.

use serde_yaml::{Mapping, Value};

use crate::error::CodecError;
use crate::protocol::FRONT_MATTER_DELIMITER;

/// Result of decoding a wire string.
///
/// On failure `metadata` is empty, `body` holds the entire original input and
/// `error` says why, so the content remains usable.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedDocument {
    pub metadata: Mapping,
    pub body: String,
    pub error: Option<CodecError>,
}

impl DecodedDocument {
    fn failed(raw: &str, error: CodecError) -> Self {
        Self {
            metadata: Mapping::new(),
            body: raw.to_string(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Look up a metadata string field.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

/// Encode metadata and body into the wire format.
pub fn encode(metadata: &Mapping, body: &str) -> Result<String, CodecError> {
    let yaml = if metadata.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(metadata).map_err(|e| CodecError::Encode(e.to_string()))?
    };

    let mut out = String::with_capacity(yaml.len() + body.len() + 2 * FRONT_MATTER_DELIMITER.len() + 3);
    out.push_str(FRONT_MATTER_DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.is_empty() && !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(FRONT_MATTER_DELIMITER);
    out.push('\n');
    out.push_str(body);
    Ok(out)
}

/// Decode a wire string. Never fails; see [`DecodedDocument`].
pub fn decode(raw: &str) -> DecodedDocument {
    let Some((block, body)) = split_front_matter(raw) else {
        return DecodedDocument::failed(raw, CodecError::NoFrontMatter);
    };

    match parse_block(block) {
        Ok(metadata) => DecodedDocument {
            metadata,
            body: body.to_string(),
            error: None,
        },
        Err(error) => DecodedDocument::failed(raw, error),
    }
}

/// Find the opening and closing delimiter lines.
///
/// Only blank lines may precede the opening delimiter. Returns the block
/// between the two lines and the remainder after the closing one.
fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    let mut block_start = None;

    for line in raw.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        match block_start {
            None if is_delimiter(line) => block_start = Some(offset),
            None if line.trim().is_empty() => {}
            None => return None,
            Some(start) if is_delimiter(line) => {
                return Some((&raw[start..line_start], &raw[offset..]));
            }
            Some(_) => {}
        }
    }

    None
}

fn is_delimiter(line: &str) -> bool {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    line == FRONT_MATTER_DELIMITER
}

fn parse_block(block: &str) -> Result<Mapping, CodecError> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(mapping)) => Ok(mapping),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(CodecError::MalformedMetadata(
            "front matter is not a mapping".to_string(),
        )),
        Err(e) => Err(CodecError::MalformedMetadata(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        match serde_yaml::from_str(yaml).unwrap() {
            Value::Mapping(mapping) => mapping,
            other => panic!("not a mapping: {:?}", other),
        }
    }

    #[test]
    fn test_encode_layout() {
        let meta = mapping("action: post\nagent_name: TestAgent\ntags:\n- test\n");
        let wire = encode(&meta, "Test content").unwrap();

        assert!(wire.starts_with("---\n"));
        assert!(wire.contains("action: post\n"));
        assert!(wire.contains("agent_name: TestAgent\n"));
        assert!(wire.ends_with("---\nTest content"));
    }

    #[test]
    fn test_parse_front_matter() {
        let raw = "---\naction: post\nagent_name: TestAgent\ntags:\n  - arweave\n---\n\n# Test Post\n\nContent here";
        let decoded = decode(raw);

        assert!(decoded.is_ok());
        assert_eq!(
            decoded.metadata,
            mapping("action: post\nagent_name: TestAgent\ntags: [arweave]")
        );
        assert_eq!(decoded.str_field("agent_name"), Some("TestAgent"));
        // Body is verbatim, including the conventional blank line
        assert_eq!(decoded.body, "\n# Test Post\n\nContent here");
    }

    #[test]
    fn test_roundtrip_nested_metadata() {
        let meta = mapping(
            "action: post\nnested:\n  key: value\n  deeper:\n    list: [1, two, 3.5]\nskills: [Arweave, AO, Permaweb]\ncount: 42\nflag: false\nnote: \"multi\\nline\\n---\\ntext\"\n",
        );
        let body = "# Title\n\nSome *markdown*.\n";

        let decoded = decode(&encode(&meta, body).unwrap());
        assert!(decoded.is_ok());
        assert_eq!(decoded.metadata, meta);
        assert_eq!(decoded.body, body);
    }

    #[test]
    fn test_body_with_delimiter_lines() {
        let meta = mapping("action: comment");
        let body = "```\n---\nfoo\n---\n```";

        let decoded = decode(&encode(&meta, body).unwrap());
        assert!(decoded.is_ok());
        assert_eq!(decoded.body, body);
    }

    #[test]
    fn test_empty_body_and_empty_metadata() {
        let decoded = decode(&encode(&mapping("a: 1"), "").unwrap());
        assert!(decoded.is_ok());
        assert_eq!(decoded.body, "");

        let decoded = decode(&encode(&Mapping::new(), "body").unwrap());
        assert!(decoded.is_ok());
        assert!(decoded.metadata.is_empty());
        assert_eq!(decoded.body, "body");

        // Closing delimiter as the very last line
        let decoded = decode("---\na: 1\n---");
        assert!(decoded.is_ok());
        assert_eq!(decoded.body, "");
    }

    #[test]
    fn test_missing_front_matter() {
        let raw = "# Just markdown";
        let decoded = decode(raw);

        assert_eq!(decoded.error, Some(CodecError::NoFrontMatter));
        assert!(decoded.metadata.is_empty());
        assert_eq!(decoded.body, raw);
    }

    #[test]
    fn test_single_delimiter_is_not_front_matter() {
        let raw = "---\naction: post\nno closing line";
        let decoded = decode(raw);
        assert_eq!(decoded.error, Some(CodecError::NoFrontMatter));
        assert_eq!(decoded.body, raw);
    }

    #[test]
    fn test_text_before_delimiter_is_not_front_matter() {
        let raw = "intro\n---\na: 1\n---\nbody";
        assert_eq!(decode(raw).error, Some(CodecError::NoFrontMatter));

        let padded = "\n\n---\na: 1\n---\nbody";
        let decoded = decode(padded);
        assert!(decoded.is_ok());
        assert_eq!(decoded.body, "body");
    }

    #[test]
    fn test_inline_dashes_do_not_delimit() {
        let decoded = decode("--- a: 1 ---\nbody");
        assert_eq!(decoded.error, Some(CodecError::NoFrontMatter));
    }

    #[test]
    fn test_malformed_front_matter_keeps_full_input() {
        let raw = "---\nnot: valid: yaml: ::\n---\nbody";
        let decoded = decode(raw);

        assert!(matches!(decoded.error, Some(CodecError::MalformedMetadata(_))));
        assert!(decoded.metadata.is_empty());
        assert_eq!(decoded.body, raw);
    }

    #[test]
    fn test_scalar_front_matter_is_malformed() {
        let raw = "---\njust a sentence\n---\nbody";
        let decoded = decode(raw);
        assert!(matches!(decoded.error, Some(CodecError::MalformedMetadata(_))));
        assert_eq!(decoded.body, raw);
    }

    #[test]
    fn test_crlf_delimiters() {
        let decoded = decode("---\r\naction: post\r\n---\r\nbody\r\n");
        assert!(decoded.is_ok());
        assert_eq!(decoded.str_field("action"), Some("post"));
        assert_eq!(decoded.body, "body\r\n");
    }
}
