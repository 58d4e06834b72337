//! Optimal paragraph line breaking (Knuth-Plass total fit)
//!
//! parabreak computes the set of line breaks that minimizes total
//! demerits for a paragraph of boxes, glue, and penalties, given a
//! schedule of line lengths. See the [`breaker`] module for the
//! algorithm and the [`builder`] module for turning measured text into
//! paragraph items.

pub mod breaker;
pub mod builder;
pub mod error;
pub mod item;

pub use breaker::{
    break_paragraph, BreakResult, BreakerOptions, FitnessClass, OverfullPolicy, TotalFitBreaker,
};
pub use builder::{tokenize, GlueSpec, Measure, MonospaceMeasure, ParagraphBuilder, Token};
pub use error::{BreakError, Error, ParagraphError, Result};
pub use item::{Item, Paragraph, FORCED_BREAK, INFINITE_PENALTY};
