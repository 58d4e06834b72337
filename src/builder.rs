//! Paragraph construction from tokenized text
//!
//! This module turns measured text into the abstract item sequence the
//! breaker consumes. Width measurement stays behind the [`Measure`] trait:
//! the builder never inspects glyphs itself, it only asks the collaborator
//! for word widths, the interword glue triple, and the hyphen width.
//!
//! # Overview
//!
//! The token vocabulary mirrors what a hyphenation pass produces:
//!
//! - [`Token::Word`] - a run of unbreakable text, becomes a box
//! - [`Token::Gap`] - an interword boundary, becomes glue
//! - [`Token::SoftHyphen`] - an optional hyphenation point, becomes a
//!   flagged penalty carrying the hyphen's width
//! - [`Token::End`] - end of paragraph
//!
//! The builder always closes the sequence with the finishing glue and
//! forcing penalty, so the result satisfies the breaker's invariants.
//!
//! [`tokenize`] derives a token stream from plain text using the Unicode
//! Line Breaking Algorithm (UAX #14) via the `unicode-linebreak` crate:
//! whitespace boundaries become gaps, soft hyphens (U+00AD) become
//! soft-hyphen tokens, and runs not separated by either (including
//! non-breaking spaces) coalesce into a single word.
//!
//! # Example
//!
//! ```rust
//! use parabreak::builder::{tokenize, MonospaceMeasure, ParagraphBuilder};
//!
//! let tokens = tokenize("per Mare per Terras");
//! let builder = ParagraphBuilder::new(MonospaceMeasure::default());
//! let par = builder.build(&tokens);
//! assert!(par.validate().is_ok());
//! ```

use crate::item::Paragraph;
use unicode_linebreak::linebreaks;

// ============================================================================
// Tokens
// ============================================================================

/// One element of the tokenized paragraph text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word or word fragment; becomes a box.
    Word(String),

    /// An interword boundary; becomes glue.
    Gap,

    /// An optional hyphenation point inside a word; becomes a flagged
    /// penalty.
    SoftHyphen,

    /// End of the paragraph. Tokens after this are ignored.
    End,
}

// ============================================================================
// Measurement collaborator
// ============================================================================

/// The glue triple a measurer chooses for interword space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlueSpec {
    /// Natural width of the space.
    pub width: f64,

    /// Stretchability of the space.
    pub stretch: f64,

    /// Shrinkability of the space.
    pub shrink: f64,
}

impl GlueSpec {
    /// Create a glue triple.
    pub fn new(width: f64, stretch: f64, shrink: f64) -> Self {
        Self {
            width,
            stretch,
            shrink,
        }
    }
}

/// Width measurement collaborator.
///
/// Implementations typically wrap a font or rendering environment; the
/// core never queries anything else about the text.
pub trait Measure {
    /// Width of a word or word fragment.
    fn word_width(&self, word: &str) -> f64;

    /// The (width, stretch, shrink) triple used for interword glue.
    fn space_glue(&self) -> GlueSpec;

    /// Width of the hyphen inserted when a soft-hyphen break is taken.
    fn hyphen_width(&self) -> f64;
}

/// Trivial measurer: every character is one unit wide.
///
/// Useful for tests and for breaking monospaced text, where the unit is
/// one character cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    /// Glue triple used for interword spaces.
    pub space: GlueSpec,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            space: GlueSpec::new(1.0, 1.0, 0.5),
        }
    }
}

impl Measure for MonospaceMeasure {
    fn word_width(&self, word: &str) -> f64 {
        word.chars().count() as f64
    }

    fn space_glue(&self) -> GlueSpec {
        self.space
    }

    fn hyphen_width(&self) -> f64 {
        1.0
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds well-formed paragraphs from token streams.
///
/// # Example
///
/// ```rust
/// use parabreak::builder::{MonospaceMeasure, ParagraphBuilder, Token};
///
/// let builder = ParagraphBuilder::new(MonospaceMeasure::default());
/// let par = builder.build(&[
///     Token::Word("hy".to_string()),
///     Token::SoftHyphen,
///     Token::Word("phen".to_string()),
/// ]);
/// // box, penalty, box, finishing glue, forcing penalty
/// assert_eq!(par.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ParagraphBuilder<M> {
    measurer: M,
    hyphen_penalty: f64,
}

impl<M: Measure> ParagraphBuilder<M> {
    /// Create a builder around a measurer. The hyphen penalty cost
    /// defaults to 50, TeX's traditional `\hyphenpenalty`.
    pub fn new(measurer: M) -> Self {
        Self {
            measurer,
            hyphen_penalty: 50.0,
        }
    }

    /// Set the cost charged for breaking at a soft hyphen.
    #[must_use]
    pub fn with_hyphen_penalty(mut self, penalty: f64) -> Self {
        self.hyphen_penalty = penalty;
        self
    }

    /// Convert a token stream into a finished paragraph.
    pub fn build(&self, tokens: &[Token]) -> Paragraph {
        let mut par = Paragraph::with_capacity(tokens.len() + 2);
        for token in tokens {
            match token {
                Token::Word(word) => par.push_box(self.measurer.word_width(word)),
                Token::Gap => {
                    let glue = self.measurer.space_glue();
                    par.push_glue(glue.width, glue.stretch, glue.shrink);
                }
                Token::SoftHyphen => {
                    par.push_penalty(self.measurer.hyphen_width(), self.hyphen_penalty, true)
                }
                Token::End => break,
            }
        }
        par.finish();
        par
    }

    /// Tokenize plain text and build it in one step.
    pub fn build_text(&self, text: &str) -> Paragraph {
        self.build(&tokenize(text))
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

/// Split plain text into paragraph tokens.
///
/// Break opportunities come from UAX #14; only those backed by whitespace
/// become [`Token::Gap`] (runs of whitespace collapse to one gap), and
/// only those backed by a soft hyphen (U+00AD) become
/// [`Token::SoftHyphen`]. Other opportunities, e.g. after an explicit
/// hyphen or between CJK characters, do not split words here: the spec of
/// a gap is an interword boundary, so such runs stay one box.
///
/// # Example
///
/// ```rust
/// use parabreak::builder::{tokenize, Token};
///
/// let tokens = tokenize("co\u{AD}operate now");
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Word("co".to_string()),
///         Token::SoftHyphen,
///         Token::Word("operate".to_string()),
///         Token::Gap,
///         Token::Word("now".to_string()),
///     ]
/// );
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut start = 0;

    for (end, _) in linebreaks(text) {
        let segment = &text[start..end];
        start = end;

        let trimmed = segment.trim_end_matches(char::is_whitespace);
        let had_gap = trimmed.len() < segment.len();
        let (part, soft_hyphen) = match trimmed.strip_suffix('\u{AD}') {
            Some(rest) => (rest, true),
            None => (trimmed, false),
        };
        word.push_str(part);

        if soft_hyphen {
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word)));
                tokens.push(Token::SoftHyphen);
            }
        } else if had_gap {
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word)));
            }
            if !tokens.is_empty() && !matches!(tokens.last(), Some(Token::Gap)) {
                tokens.push(Token::Gap);
            }
        }
        // An opportunity with neither whitespace nor a soft hyphen keeps
        // accumulating into the current word.
    }

    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    while matches!(tokens.last(), Some(Token::Gap)) {
        tokens.pop();
    }
    tokens
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    fn words(tokens: &[Token]) -> Vec<&str> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Word(w) => Some(w.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_tokenize_two_words() {
        let tokens = tokenize("Hello world");
        assert_eq!(
            tokens,
            vec![
                Token::Word("Hello".to_string()),
                Token::Gap,
                Token::Word("world".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_collapses_whitespace_runs() {
        let tokens = tokenize("a  \t b");
        assert_eq!(
            tokens,
            vec![
                Token::Word("a".to_string()),
                Token::Gap,
                Token::Word("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_ignores_leading_and_trailing_whitespace() {
        let tokens = tokenize("  padded  ");
        assert_eq!(tokens, vec![Token::Word("padded".to_string())]);
    }

    #[test]
    fn test_tokenize_soft_hyphen() {
        let tokens = tokenize("hy\u{AD}phen");
        assert_eq!(
            tokens,
            vec![
                Token::Word("hy".to_string()),
                Token::SoftHyphen,
                Token::Word("phen".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_newline_acts_as_gap() {
        let tokens = tokenize("one\ntwo");
        assert_eq!(words(&tokens), vec!["one", "two"]);
        assert!(tokens.contains(&Token::Gap));
    }

    #[test]
    fn test_tokenize_non_breaking_space_stays_in_word() {
        let tokens = tokenize("10\u{A0}kg");
        assert_eq!(tokens, vec![Token::Word("10\u{A0}kg".to_string())]);
    }

    #[test]
    fn test_tokenize_explicit_hyphen_does_not_split() {
        let tokens = tokenize("self-contained");
        assert_eq!(tokens, vec![Token::Word("self-contained".to_string())]);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_monospace_measure() {
        let measure = MonospaceMeasure::default();
        assert_eq!(measure.word_width("abcde"), 5.0);
        assert_eq!(measure.word_width(""), 0.0);
        assert_eq!(measure.hyphen_width(), 1.0);
        assert_eq!(measure.space_glue().width, 1.0);
    }

    #[test]
    fn test_build_word_gap_word() {
        let builder = ParagraphBuilder::new(MonospaceMeasure::default());
        let par = builder.build_text("foo bar");

        assert_eq!(par.len(), 5);
        assert_eq!(par.items()[0], Item::Box { width: 3.0 });
        assert!(par.items()[1].is_glue());
        assert_eq!(par.items()[2], Item::Box { width: 3.0 });
        assert!(par.validate().is_ok());
    }

    #[test]
    fn test_build_soft_hyphen_penalty() {
        let builder =
            ParagraphBuilder::new(MonospaceMeasure::default()).with_hyphen_penalty(120.0);
        let par = builder.build_text("hy\u{AD}phen");

        assert_eq!(par.items()[1], Item::penalty(1.0, 120.0, true));
    }

    #[test]
    fn test_build_stops_at_end_token() {
        let builder = ParagraphBuilder::new(MonospaceMeasure::default());
        let par = builder.build(&[
            Token::Word("kept".to_string()),
            Token::End,
            Token::Word("dropped".to_string()),
        ]);

        // One box plus the terminator pair.
        assert_eq!(par.len(), 3);
        assert!(par.validate().is_ok());
    }

    #[test]
    fn test_build_empty_token_stream_is_valid() {
        let builder = ParagraphBuilder::new(MonospaceMeasure::default());
        let par = builder.build(&[]);
        assert_eq!(par.len(), 2);
        assert!(par.validate().is_ok());
    }
}
