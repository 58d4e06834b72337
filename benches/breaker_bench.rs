//! Benchmarks for the total-fit breaker
//!
//! Measures the dynamic program over paragraph sizes that bracket typical
//! use (a short paragraph up to a very long one), plus the plain-text
//! front end (tokenize + build).
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench --bench breaker_bench
//! ```

use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use parabreak::breaker::BreakerOptions;
use parabreak::breaker::TotalFitBreaker;
use parabreak::builder::tokenize;
use parabreak::builder::MonospaceMeasure;
use parabreak::builder::ParagraphBuilder;
use parabreak::item::Paragraph;

// ============================================================================
// Helper Functions
// ============================================================================

const WORDS: &[&str] = &[
  "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dogs", "while", "seventeen",
  "typographers", "argue", "about", "spacing", "and", "rivers", "of", "white",
];

/// Deterministic sample text of `n` words.
fn sample_text(n: usize) -> String {
  let mut text = String::new();
  for i in 0..n {
    if i > 0 {
      text.push(' ');
    }
    text.push_str(WORDS[i % WORDS.len()]);
  }
  text
}

fn sample_paragraph(n: usize) -> Paragraph {
  let builder = ParagraphBuilder::new(MonospaceMeasure::default());
  builder.build_text(&sample_text(n))
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_break(c: &mut Criterion) {
  let mut group = c.benchmark_group("total_fit_break");
  for &size in &[50_usize, 500, 5000] {
    let paragraph = sample_paragraph(size);
    group.bench_with_input(
      BenchmarkId::new("uniform_width", size),
      &paragraph,
      |b, paragraph| {
        let mut breaker = TotalFitBreaker::new();
        b.iter(|| {
          breaker
            .break_paragraph(black_box(paragraph), black_box(&[60.0]))
            .unwrap()
        });
      },
    );
    group.bench_with_input(
      BenchmarkId::new("ragged_schedule", size),
      &paragraph,
      |b, paragraph| {
        let mut breaker = TotalFitBreaker::with_options(
          BreakerOptions::new()
            .with_fitness_demerits(100.0)
            .with_flagged_demerits(100.0),
        );
        b.iter(|| {
          breaker
            .break_paragraph(black_box(paragraph), black_box(&[48.0, 56.0, 60.0]))
            .unwrap()
        });
      },
    );
  }
  group.finish();
}

fn bench_build(c: &mut Criterion) {
  let mut group = c.benchmark_group("tokenize_and_build");
  for &size in &[500_usize, 5000] {
    let text = sample_text(size);
    group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
      let builder = ParagraphBuilder::new(MonospaceMeasure::default());
      b.iter(|| builder.build(&tokenize(black_box(text))));
    });
  }
  group.finish();
}

criterion_group!(benches, bench_break, bench_build);
criterion_main!(benches);
