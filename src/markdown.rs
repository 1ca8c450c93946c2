use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use crate::app_config::{PronunciationRule, TimingConfig};

// @module: Markdown normalization into a narration script

// @const: Heading line regex
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#{1,6})\s+(.*)$").unwrap()
});

// @const: List item line regex (bulleted or numbered)
static LIST_ITEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+(.*)$").unwrap()
});

// @const: Horizontal rule regex
static HORIZONTAL_RULE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$").unwrap()
});

// @const: Code fence delimiter regex
static CODE_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:```|~~~)").unwrap()
});

// @const: Blockquote marker regex
static BLOCKQUOTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:>\s?)+").unwrap()
});

static IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap()
});

static LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap()
});

static REFERENCE_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]*)\]\[[^\]]*\]").unwrap()
});

static INLINE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`([^`]*)`").unwrap()
});

static BOLD_ITALIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*{1,3}([^*]+)\*{1,3}").unwrap()
});

static UNDERSCORE_STRONG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"__([^_]+)__").unwrap()
});

static UNDERSCORE_EMPHASIS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[\s(])_([^_]+)_($|[\s).,;:!?])").unwrap()
});

static STRIKETHROUGH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"~~([^~]+)~~").unwrap()
});

static HTML_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?[A-Za-z][^>]*>").unwrap()
});

// @const: Sentence terminator followed by whitespace
static SENTENCE_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?]["')\]]*\s+"#).unwrap()
});

/// Kind of pause requested by the document structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseKind {
    /// Breathing room after a heading
    Section,
    /// Short beat before a list item
    ListItem,
}

impl PauseKind {
    /// Duration of this pause under the given timing configuration
    pub fn duration_secs(&self, timing: &TimingConfig) -> f64 {
        match self {
            Self::Section => timing.section_pause_secs,
            Self::ListItem => timing.list_pause_secs,
        }
    }
}

/// One span of the narration script: literal text or a pause request.
///
/// Pauses are a tagged variant rather than sentinel substrings so that no
/// downstream stage ever has to string-replace marker tokens out of prose.
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    /// Literal text to be spoken and displayed
    Text(String),
    /// Silence requested at this position
    Pause(PauseKind),
}

/// Flattened narration script derived from one Markdown document
#[derive(Debug, Clone)]
pub struct NarrationScript {
    /// Document title, derived from the source filename
    pub title: String,

    /// Ordered spans of the script
    pub spans: Vec<Span>,
}

impl NarrationScript {
    /// Parse raw Markdown into a narration script.
    ///
    /// Headings emit their text followed by a section pause; list items emit
    /// a list pause followed by their text; consecutive plain lines collapse
    /// into one paragraph span. Fence lines and horizontal rules are dropped.
    pub fn from_markdown(title: impl Into<String>, raw: &str) -> Self {
        let mut spans: Vec<Span> = Vec::new();
        let mut paragraph = String::new();
        let mut in_code_fence = false;

        let mut flush_paragraph = |spans: &mut Vec<Span>, paragraph: &mut String| {
            let cleaned = clean_inline(paragraph);
            if !cleaned.is_empty() {
                spans.push(Span::Text(cleaned));
            }
            paragraph.clear();
        };

        for line in raw.lines() {
            if CODE_FENCE_REGEX.is_match(line) {
                in_code_fence = !in_code_fence;
                continue;
            }

            if in_code_fence {
                // Fence body is narrated as ordinary text
                if !paragraph.is_empty() {
                    paragraph.push(' ');
                }
                paragraph.push_str(line.trim());
                continue;
            }

            let trimmed = line.trim();

            if trimmed.is_empty() {
                flush_paragraph(&mut spans, &mut paragraph);
                continue;
            }

            if HORIZONTAL_RULE_REGEX.is_match(trimmed) {
                flush_paragraph(&mut spans, &mut paragraph);
                continue;
            }

            if let Some(caps) = HEADING_REGEX.captures(trimmed) {
                flush_paragraph(&mut spans, &mut paragraph);
                let text = clean_inline(caps.get(2).map_or("", |m| m.as_str()));
                if !text.is_empty() {
                    spans.push(Span::Text(text));
                    spans.push(Span::Pause(PauseKind::Section));
                }
                continue;
            }

            if let Some(caps) = LIST_ITEM_REGEX.captures(trimmed) {
                flush_paragraph(&mut spans, &mut paragraph);
                let text = clean_inline(caps.get(1).map_or("", |m| m.as_str()));
                if !text.is_empty() {
                    spans.push(Span::Pause(PauseKind::ListItem));
                    spans.push(Span::Text(text));
                }
                continue;
            }

            // Plain line, possibly blockquoted; accumulate into the paragraph
            let stripped = BLOCKQUOTE_REGEX.replace(trimmed, "");
            if !paragraph.is_empty() {
                paragraph.push(' ');
            }
            paragraph.push_str(&stripped);
        }

        flush_paragraph(&mut spans, &mut paragraph);

        NarrationScript {
            title: title.into(),
            spans,
        }
    }

    /// Whether the script contains any spoken text at all
    pub fn is_empty(&self) -> bool {
        !self.spans.iter().any(|s| matches!(s, Span::Text(_)))
    }

    /// Display-bound rendering: original spellings verbatim, pauses omitted
    pub fn display_text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            if let Span::Text(text) = span {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(text);
            }
        }
        out
    }

    /// Audio-bound rendering for engines that take plain text.
    ///
    /// The pronunciation table is applied here and nowhere else; pauses are
    /// rendered as paragraph breaks, which neural voices honor naturally.
    pub fn audio_text(&self, rules: &[PronunciationRule]) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span {
                Span::Text(text) => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push(' ');
                    }
                    out.push_str(&apply_pronunciation(text, rules));
                }
                Span::Pause(_) => {
                    while out.ends_with(' ') {
                        out.pop();
                    }
                    if !out.is_empty() {
                        out.push_str("\n\n");
                    }
                }
            }
        }
        out.trim().to_string()
    }

    /// Audio-bound rendering for engines that accept SSML markup.
    ///
    /// Pauses become explicit `<break>` elements with durations taken from
    /// the timing configuration.
    pub fn ssml(&self, voice: &str, rules: &[PronunciationRule], timing: &TimingConfig) -> String {
        let mut body = String::new();
        for span in &self.spans {
            match span {
                Span::Text(text) => {
                    if !body.is_empty() {
                        body.push(' ');
                    }
                    body.push_str(&escape_xml(&apply_pronunciation(text, rules)));
                }
                Span::Pause(kind) => {
                    let millis = (kind.duration_secs(timing) * 1000.0).round() as u64;
                    if millis > 0 {
                        body.push_str(&format!("<break time=\"{}ms\"/>", millis));
                    }
                }
            }
        }

        format!(
            "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\" xml:lang=\"en-US\">\
             <voice name=\"{}\">{}</voice></speak>",
            escape_xml(voice),
            body
        )
    }
}

impl fmt::Display for NarrationScript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Narration Script")?;
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Spans: {}", self.spans.len())?;
        Ok(())
    }
}

/// Strip inline Markdown markup from a single block of text
fn clean_inline(text: &str) -> String {
    let text = IMAGE_REGEX.replace_all(text, "$1");
    let text = LINK_REGEX.replace_all(&text, "$1");
    let text = REFERENCE_LINK_REGEX.replace_all(&text, "$1");
    let text = INLINE_CODE_REGEX.replace_all(&text, "$1");
    let text = BOLD_ITALIC_REGEX.replace_all(&text, "$1");
    let text = UNDERSCORE_STRONG_REGEX.replace_all(&text, "$1");
    let text = UNDERSCORE_EMPHASIS_REGEX.replace_all(&text, "${1}${2}${3}");
    let text = STRIKETHROUGH_REGEX.replace_all(&text, "$1");
    let text = HTML_TAG_REGEX.replace_all(&text, "");

    // Anything the pair-matching regexes missed is dropped outright
    let text = text.replace(['`', '*'], "");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply the pronunciation substitution table to audio-bound text.
///
/// Terms match case-sensitively on word boundaries; the display variant of
/// the script never goes through this function.
pub fn apply_pronunciation(text: &str, rules: &[PronunciationRule]) -> String {
    let mut out = text.to_string();
    for rule in rules {
        if rule.term.is_empty() {
            continue;
        }
        let pattern = format!(r"\b{}\b", regex::escape(&rule.term));
        match Regex::new(&pattern) {
            Ok(re) => {
                out = re.replace_all(&out, rule.spoken.as_str()).into_owned();
            }
            Err(e) => {
                log::warn!("Skipping unusable pronunciation rule '{}': {}", rule.term, e);
            }
        }
    }
    out
}

/// Split a block of text into sentences.
///
/// Cuts after terminal punctuation (plus trailing quotes or brackets)
/// followed by whitespace; text without terminators comes back as one
/// sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last = 0;

    for m in SENTENCE_END_REGEX.find_iter(text) {
        let sentence = text[last..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        last = m.end();
    }

    let tail = text[last..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

/// Escape the five XML special characters for SSML bodies
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
