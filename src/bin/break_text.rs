//! Demonstration driver: break plain text into optimally filled lines.
//!
//! Reads text from a file (or stdin), treats blank-line separated chunks
//! as paragraphs, breaks each against the given width schedule with a
//! one-unit-per-character measure, and prints the broken lines. With
//! `--json` a summary of breakpoints and ratios is emitted instead.
//!
//! ```sh
//! echo "the quick brown fox jumps over the lazy dog" | \
//!   cargo run --bin break_text -- --widths 20
//! ```

use anyhow::Context;
use clap::Parser;
use parabreak::breaker::{BreakResult, BreakerOptions, TotalFitBreaker};
use parabreak::builder::{tokenize, MonospaceMeasure, ParagraphBuilder, Token};
use parabreak::item::{Item, Paragraph};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Break plain text into optimally filled lines")]
struct Args {
  /// Line width schedule in character cells; the last entry repeats
  #[arg(long, value_delimiter = ',', default_value = "72")]
  widths: Vec<f64>,

  /// Maximum tolerated adjustment ratio (default: unbounded)
  #[arg(long)]
  threshold: Option<f64>,

  /// Prefer this many more (positive) or fewer (negative) lines
  #[arg(long, default_value_t = 0)]
  looseness: i32,

  /// Demerits for two hyphenated line endings in a row
  #[arg(long, default_value_t = 0.0)]
  flagged_demerits: f64,

  /// Demerits for a fitness class jump between consecutive lines
  #[arg(long, default_value_t = 0.0)]
  fitness_demerits: f64,

  /// Cost of breaking at a soft hyphen
  #[arg(long, default_value_t = 50.0)]
  hyphen_penalty: f64,

  /// Emit a JSON summary instead of the broken text
  #[arg(long)]
  json: bool,

  /// Input file; stdin when omitted
  input: Option<PathBuf>,
}

#[derive(Serialize)]
struct LineReport {
  line: usize,
  start: usize,
  end: usize,
  ratio: f64,
}

#[derive(Serialize)]
struct ParagraphReport {
  lines: usize,
  demerits: f64,
  breaks: Vec<LineReport>,
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  let text = match &args.input {
    Some(path) => {
      fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    }
    None => io::read_to_string(io::stdin()).context("reading stdin")?,
  };

  let mut options = BreakerOptions::new()
    .with_looseness(args.looseness)
    .with_flagged_demerits(args.flagged_demerits)
    .with_fitness_demerits(args.fitness_demerits);
  if let Some(threshold) = args.threshold {
    options = options.with_threshold(threshold);
  }

  let mut breaker = TotalFitBreaker::with_options(options);
  let builder =
    ParagraphBuilder::new(MonospaceMeasure::default()).with_hyphen_penalty(args.hyphen_penalty);

  let mut reports = Vec::new();
  let mut first = true;
  for chunk in text.split("\n\n").filter(|c| !c.trim().is_empty()) {
    let tokens = tokenize(chunk);
    let paragraph = builder.build(&tokens);
    let result = breaker
      .break_paragraph(&paragraph, &args.widths)
      .context("breaking paragraph")?;

    if args.json {
      reports.push(summarize(&result));
    } else {
      if !first {
        println!();
      }
      for line in render_lines(&tokens, &paragraph, &result) {
        println!("{}", line);
      }
    }
    first = false;
  }

  if args.json {
    println!("{}", serde_json::to_string_pretty(&reports)?);
  }
  Ok(())
}

fn summarize(result: &BreakResult) -> ParagraphReport {
  let breaks = (1..=result.line_count())
    .map(|line| {
      let (start, end) = result.line_range(line).unwrap_or((0, 0));
      LineReport {
        line,
        start,
        end,
        ratio: result.ratios[line],
      }
    })
    .collect();
  ParagraphReport {
    lines: result.line_count(),
    demerits: result.demerits,
    breaks,
  }
}

/// Re-render the broken paragraph as text, one string per line.
///
/// Boxes map back to word tokens in order; glue at a breakpoint is
/// discarded and a flagged penalty break gains a visible hyphen.
fn render_lines(tokens: &[Token], paragraph: &Paragraph, result: &BreakResult) -> Vec<String> {
  let mut words = tokens.iter().filter_map(|t| match t {
    Token::Word(w) => Some(w.as_str()),
    _ => None,
  });

  let mut lines = Vec::new();
  let mut current = String::new();
  let mut next_break = 1;

  for (index, item) in paragraph.items().iter().enumerate() {
    if next_break < result.breakpoints.len() && result.breakpoints[next_break] == index {
      if item.is_flagged() {
        current.push('-');
      }
      lines.push(std::mem::take(&mut current));
      next_break += 1;
      continue;
    }
    match item {
      Item::Box { .. } => {
        if let Some(word) = words.next() {
          current.push_str(word);
        }
      }
      Item::Glue { .. } => {
        if !current.is_empty() {
          current.push(' ');
        }
      }
      Item::Penalty { .. } => {}
    }
  }
  if !current.is_empty() {
    lines.push(current);
  }
  lines
}
