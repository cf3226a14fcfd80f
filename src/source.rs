//! Pattern library scanning.
//!
//! A library is plain text: pattern blocks separated by blank lines. Each
//! block carries optional annotation lines followed by one RLE document:
//!
//! ```text
//! #N "blinker"          <- name (first #N only)
//! #O JHC 3/70           <- originator / discoverer
//! #C Phase of a         <- free comments, any number
//! #C traffic light.
//! x = 3, y = 1, rule = B3/S23
//! 3o!
//! ```
//!
//! This module does three cheap things before any simulation happens:
//!
//! - [`split_blocks`] cuts the library into blocks.
//! - [`BlockFeatures::scan`] computes coarse flags for a block so obviously
//!   unusable blocks can be dropped without decoding, and so reports can say
//!   what was seen.
//! - [`Annotation::parse`] reads the `#N` / `#O` / `#C` lines that the document
//!   assembler later turns into catalog entries and viewer labels.

bitflags::bitflags! {
    /// Coarse features detected in a raw block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BlockFeatures: u32 {
        const HAS_NAME        = 1 << 0;
        const HAS_ORIGINATOR  = 1 << 1;
        const HAS_COMMENT     = 1 << 2;
        const HAS_HEADER      = 1 << 3;
        const HAS_RULE        = 1 << 4;
        const HAS_PERIOD_HINT = 1 << 5;
    }
}

impl BlockFeatures {
    /// Scan `block` for coarse features.
    ///
    /// This is a heuristic: `HAS_RULE` only means the rule id appears
    /// somewhere, the decoder still has to find it after the header.
    pub fn scan(block: &str) -> Self {
        let mut features = BlockFeatures::empty();

        for line in block.lines() {
            let line = line.trim_start();
            if line.starts_with("#CXRLE") {
                continue;
            }
            if line.starts_with("#N") {
                features |= BlockFeatures::HAS_NAME;
            } else if line.starts_with("#O") {
                features |= BlockFeatures::HAS_ORIGINATOR;
            } else if line.starts_with("#C") || line.starts_with("#c") {
                features |= BlockFeatures::HAS_COMMENT;
            } else if !line.starts_with('#') && regex!(r"^x\s*=").is_match(line) {
                features |= BlockFeatures::HAS_HEADER;
            }
        }

        if block.to_ascii_uppercase().contains("B3/S23") {
            features |= BlockFeatures::HAS_RULE;
        }

        if let Some(end) = block.rfind('!') {
            if block[end + 1..].trim_start().starts_with('%') {
                features |= BlockFeatures::HAS_PERIOD_HINT;
            }
        }

        features
    }

    /// Whether the block can possibly decode.
    pub fn is_decodable(&self) -> bool {
        self.contains(BlockFeatures::HAS_HEADER | BlockFeatures::HAS_RULE)
    }
}

/// Split a library into blocks at blank lines.
///
/// Runs of blank lines count as one separator; blocks are returned without
/// surrounding blank lines and with `\n` line endings.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

/// Annotation lines of one pattern block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub name: Option<String>,
    pub originator: Option<String>,
    pub comments: Vec<String>,
}

impl Annotation {
    /// Parse the comment section of a block (the text before the header).
    pub fn parse(comments: &str) -> Self {
        let mut annotation = Annotation::default();

        for line in comments.lines() {
            let line = line.trim_end();
            if line.starts_with("#CXRLE") {
                continue;
            }
            let Some((tag, text)) = split_tag(line) else {
                continue;
            };
            match tag {
                'N' | 'O' if text.is_empty() => {}
                'N' if annotation.name.is_none() => annotation.name = Some(text.to_string()),
                'O' if annotation.originator.is_none() => annotation.originator = Some(text.to_string()),
                'N' | 'O' | 'C' | 'c' => annotation.comments.push(text.to_string()),
                _ => {}
            }
        }

        annotation
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.originator.is_none() && self.comments.is_empty()
    }

    /// Text shown by a viewer label: the name, then the originator in
    /// brackets on a second line. Comments are left out; they are usually too
    /// long for a label.
    ///
    /// The line break is the two characters `\n`, as the viewer expects, and
    /// double quotes become single quotes so the text can sit inside `"..."`.
    pub fn display_text(&self) -> String {
        let text = match (&self.name, &self.originator) {
            (Some(name), Some(originator)) => format!("{name}\\n[{originator}]"),
            (Some(name), None) => name.clone(),
            (None, Some(originator)) => format!("[{originator}]"),
            (None, None) => String::new(),
        };
        text.replace('"', "'")
    }
}

/// `"#C text"` -> `('C', "text")`.
fn split_tag(line: &str) -> Option<(char, &str)> {
    let rest = line.strip_prefix('#')?;
    let tag = rest.chars().next()?;
    let text = &rest[tag.len_utf8()..];
    Some((tag, text.strip_prefix(' ').unwrap_or(text).trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_blank_line_runs() {
        let text = "#N a\nx = 1, y = 1, rule = B3/S23\no!\n\n\n\n#N b\nx = 2, y = 1, rule = B3/S23\n2o!\n   \n";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("#N a"));
        assert!(blocks[1].ends_with("2o!"));
    }

    #[test]
    fn splits_crlf_input() {
        let blocks = split_blocks("x = 1, y = 1, rule = B3/S23\r\no!\r\n\r\nx = 1, y = 1, rule = B3/S23\r\no!");
        assert_eq!(blocks, vec!["x = 1, y = 1, rule = B3/S23\no!", "x = 1, y = 1, rule = B3/S23\no!"]);
    }

    #[test]
    fn scans_features() {
        let block = "#N \"big\"\n#O DRH\n#C note\nx = 5, y = 5, rule = b3/s23\n5o!%1200";
        let features = BlockFeatures::scan(block);
        assert_eq!(features, BlockFeatures::all());
        assert!(features.is_decodable());

        let bare = BlockFeatures::scan("#C just words");
        assert_eq!(bare, BlockFeatures::HAS_COMMENT);
        assert!(!bare.is_decodable());

        let other_rule = BlockFeatures::scan("x = 1, y = 1, rule = B36/S23\no!");
        assert!(!other_rule.is_decodable());
    }

    #[test]
    fn parses_annotation_lines() {
        let a = Annotation::parse("#N \"blinker\"\n#O JHC 3/70\n#C Example of \"+c*c\" symmetry.\n#C Second line.\n");
        assert_eq!(a.name.as_deref(), Some("\"blinker\""));
        assert_eq!(a.originator.as_deref(), Some("JHC 3/70"));
        assert_eq!(a.comments, vec!["Example of \"+c*c\" symmetry.", "Second line."]);
        assert_eq!(a.display_text(), "'blinker'\\n[JHC 3/70]");
    }

    #[test]
    fn annotation_edge_cases() {
        let none = Annotation::parse("");
        assert!(none.is_empty());
        assert_eq!(none.display_text(), "");

        let orphan = Annotation::parse("#O MDN\n#CXRLE Pos=1,2\n");
        assert_eq!(orphan.display_text(), "[MDN]");
        assert!(orphan.comments.is_empty());

        let twice = Annotation::parse("#N first\n#N second\n");
        assert_eq!(twice.name.as_deref(), Some("first"));
        assert_eq!(twice.comments, vec!["second"]);
    }
}
