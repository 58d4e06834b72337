//! Total-fit line breaking algorithm
//!
//! This module implements optimal paragraph breaking following
//! Knuth & Plass, "Breaking Paragraphs into Lines" (1981): a dynamic
//! program over a frontier of *active nodes*, each recording a feasible
//! breakpoint, the number of the line ending there, its fitness class,
//! and the minimum demerits needed to reach it.
//!
//! # Overview
//!
//! The breaker walks the item sequence once. At every legal breakpoint it
//! rescans the active list: for each active node it computes the
//! adjustment ratio of the tentative line from that node to the current
//! position, deactivates nodes whose lines have become over-full beyond
//! their shrinkability, and collects the best feasible predecessor per
//! fitness class. Up to four new active nodes are then inserted for the
//! breakpoint. After the scan the best terminal node is selected
//! (optionally biased by the looseness parameter) and the breakpoint
//! sequence is reconstructed by walking predecessor links.
//!
//! Nodes live in an arena owned by the breaker; deactivation merely
//! unlinks a node from the active chain, so predecessor chains stay
//! intact for reconstruction.
//!
//! # Example
//!
//! ```rust
//! use parabreak::breaker::TotalFitBreaker;
//! use parabreak::item::Paragraph;
//!
//! let mut par = Paragraph::new();
//! par.push_box(3.0);
//! par.push_glue(1.0, 1.0, 1.0);
//! par.push_box(3.0);
//! par.finish();
//!
//! let mut breaker = TotalFitBreaker::new();
//! let result = breaker.break_paragraph(&par, &[10.0]).unwrap();
//! assert_eq!(result.breakpoints, vec![0, 4]);
//! ```
//!
//! # References
//!
//! - Knuth & Plass, Software: Practice and Experience 11 (1981), 1119-1184.

use crate::error::{BreakError, Result};
use crate::item::{Item, Paragraph, FORCED_BREAK, INFINITE_PENALTY};

// ============================================================================
// Fitness classes
// ============================================================================

/// Fitness classification of a line, derived from its adjustment ratio.
///
/// Lines whose classes differ by more than one step between consecutive
/// breaks incur the configured fitness-change demerits, which discourages
/// visually jarring loose/tight alternation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitnessClass {
    /// Ratio below -0.5: the line is noticeably shrunk.
    Tight,

    /// Ratio in [-0.5, 0.5]: close to natural width.
    Normal,

    /// Ratio in (0.5, 1.0]: noticeably stretched.
    Loose,

    /// Ratio above 1.0: stretched past its stretchability.
    VeryLoose,
}

impl FitnessClass {
    /// All classes in index order.
    pub const ALL: [FitnessClass; 4] = [
        FitnessClass::Tight,
        FitnessClass::Normal,
        FitnessClass::Loose,
        FitnessClass::VeryLoose,
    ];

    /// Classify an adjustment ratio.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < -0.5 {
            Self::Tight
        } else if ratio <= 0.5 {
            Self::Normal
        } else if ratio <= 1.0 {
            Self::Loose
        } else {
            Self::VeryLoose
        }
    }

    /// Numeric index of the class (0 = tight .. 3 = very loose).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Tight => 0,
            Self::Normal => 1,
            Self::Loose => 2,
            Self::VeryLoose => 3,
        }
    }

    /// Distance between two classes in steps.
    #[inline]
    pub fn distance(self, other: Self) -> usize {
        (self.index() as i32 - other.index() as i32).unsigned_abs() as usize
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// What to do when no feasible break exists and the frontier drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverfullPolicy {
    /// Admit a single overfull line (reported with ratio -1) and continue.
    #[default]
    Recover,

    /// Return [`BreakError::Overfull`] to the caller instead.
    Surface,
}

/// Tuning parameters for the breaker.
///
/// The defaults reproduce a pure minimum-demerits fit: any stretch is
/// tolerated and neither hyphen pairs nor fitness changes are penalized.
///
/// # Example
///
/// ```rust
/// use parabreak::breaker::BreakerOptions;
///
/// let options = BreakerOptions::new()
///     .with_threshold(1.5)
///     .with_flagged_demerits(100.0)
///     .with_fitness_demerits(100.0);
/// assert_eq!(options.looseness, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakerOptions {
    /// Upper bound on the tolerated adjustment ratio. Candidate lines
    /// whose ratio exceeds this are skipped; ratios below -1 always
    /// deactivate the predecessor.
    pub threshold: f64,

    /// Bias towards this many more (positive) or fewer (negative) lines
    /// than the demerit-optimal solution.
    pub looseness: i32,

    /// Demerits added when two consecutive breakpoints are both flagged
    /// (two hyphenated lines in a row).
    pub flagged_demerits: f64,

    /// Demerits added when consecutive lines' fitness classes differ by
    /// more than one step.
    pub fitness_demerits: f64,

    /// Recovery behaviour when the active list drains.
    pub overfull: OverfullPolicy,
}

impl Default for BreakerOptions {
    fn default() -> Self {
        Self {
            threshold: f64::INFINITY,
            looseness: 0,
            flagged_demerits: 0.0,
            fitness_demerits: 0.0,
            overfull: OverfullPolicy::Recover,
        }
    }
}

impl BreakerOptions {
    /// Create options with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the adjustment ratio threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the looseness bias.
    #[must_use]
    pub fn with_looseness(mut self, looseness: i32) -> Self {
        self.looseness = looseness;
        self
    }

    /// Set the flagged-pair demerits.
    #[must_use]
    pub fn with_flagged_demerits(mut self, demerits: f64) -> Self {
        self.flagged_demerits = demerits;
        self
    }

    /// Set the fitness-change demerits.
    #[must_use]
    pub fn with_fitness_demerits(mut self, demerits: f64) -> Self {
        self.fitness_demerits = demerits;
        self
    }

    /// Set the overfull recovery policy.
    #[must_use]
    pub fn with_overfull_policy(mut self, policy: OverfullPolicy) -> Self {
        self.overfull = policy;
        self
    }
}

// ============================================================================
// Result
// ============================================================================

/// Chosen breakpoints and per-line adjustment ratios for one paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakResult {
    /// Item indices at which each line ends. `breakpoints[0]` is always 0
    /// (the paragraph start) and the final entry is the index of the
    /// forcing terminal penalty.
    pub breakpoints: Vec<usize>,

    /// Adjustment ratio chosen for each line, indexed by line number.
    /// The entry at index 0 is unused and holds NaN. A recovered overfull
    /// line reports exactly -1.
    pub ratios: Vec<f64>,

    /// Total demerits of the chosen solution.
    pub demerits: f64,
}

impl BreakResult {
    /// Number of lines in the chosen solution.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.breakpoints.len() - 1
    }

    /// Item range `(start, end)` of line `k` (1-based): the line runs from
    /// breakpoint k-1 to breakpoint k.
    pub fn line_range(&self, k: usize) -> Option<(usize, usize)> {
        if k == 0 || k >= self.breakpoints.len() {
            return None;
        }
        Some((self.breakpoints[k - 1], self.breakpoints[k]))
    }
}

// ============================================================================
// Active nodes
// ============================================================================

/// One tentative breakpoint on the search frontier.
///
/// The prefix sums use the "after" convention: they include everything up
/// to and past this breakpoint's discardable items, so the tentative line
/// from this node to position b measures `sum_w(b) - total_width`.
#[derive(Debug, Clone, Copy)]
struct Node {
    position: usize,
    line: usize,
    fitness: FitnessClass,
    total_width: f64,
    total_stretch: f64,
    total_shrink: f64,
    total_demerits: f64,
    previous: Option<usize>,
    ratio: f64,
    link: Option<usize>,
}

impl Node {
    fn start() -> Self {
        Self {
            position: 0,
            line: 0,
            fitness: FitnessClass::Normal,
            total_width: 0.0,
            total_stretch: 0.0,
            total_shrink: 0.0,
            total_demerits: 0.0,
            previous: None,
            ratio: 0.0,
            link: None,
        }
    }
}

// ============================================================================
// Breaker
// ============================================================================

/// Paragraph breaker implementing the total-fit dynamic program.
///
/// A breaker owns its node arena and may be reused for further paragraphs
/// after a call returns (the arena is cleared at the start of each call).
/// It is not meant to be shared between threads during a call; break
/// paragraphs in parallel with independent instances.
///
/// # Example
///
/// ```rust
/// use parabreak::breaker::{BreakerOptions, TotalFitBreaker};
/// use parabreak::item::Paragraph;
///
/// let mut par = Paragraph::new();
/// par.push_box(4.0);
/// par.push_glue(1.0, 1.0, 1.0);
/// par.push_box(4.0);
/// par.finish();
///
/// let mut breaker = TotalFitBreaker::with_options(
///     BreakerOptions::new().with_threshold(2.0),
/// );
/// let result = breaker.break_paragraph(&par, &[9.0]).unwrap();
/// assert_eq!(result.line_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TotalFitBreaker {
    options: BreakerOptions,
    nodes: Vec<Node>,
    head: Option<usize>,
    last_deactivated: Option<usize>,
    sum_width: f64,
    sum_stretch: f64,
    sum_shrink: f64,
}

impl TotalFitBreaker {
    /// Create a breaker with default options.
    pub fn new() -> Self {
        Self::with_options(BreakerOptions::default())
    }

    /// Create a breaker with the given options.
    pub fn with_options(options: BreakerOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            head: None,
            last_deactivated: None,
            sum_width: 0.0,
            sum_stretch: 0.0,
            sum_shrink: 0.0,
        }
    }

    /// The breaker's current options.
    #[inline]
    pub fn options(&self) -> &BreakerOptions {
        &self.options
    }

    /// Replace the breaker's options.
    pub fn set_options(&mut self, options: BreakerOptions) {
        self.options = options;
    }

    /// Break a paragraph against a schedule of line lengths.
    ///
    /// `line_lengths[k]` is the target length of line k+1; the last entry
    /// is reused for all further lines.
    ///
    /// # Errors
    ///
    /// - [`crate::ParagraphError::MissingTerminator`] when the paragraph
    ///   lacks its finishing glue and forcing penalty.
    /// - [`BreakError::EmptyLineLengths`] / [`BreakError::InvalidLineLength`]
    ///   for a bad schedule.
    /// - [`BreakError::Overfull`] when no feasible break exists and the
    ///   policy is [`OverfullPolicy::Surface`].
    pub fn break_paragraph(
        &mut self,
        paragraph: &Paragraph,
        line_lengths: &[f64],
    ) -> Result<BreakResult> {
        paragraph.validate()?;
        if line_lengths.is_empty() {
            return Err(BreakError::EmptyLineLengths.into());
        }
        for (index, &value) in line_lengths.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(BreakError::InvalidLineLength { index, value }.into());
            }
        }

        self.reset();
        self.nodes.push(Node::start());
        self.head = Some(0);

        // While the schedule still varies (line numbers below j0) the inner
        // scan must handle each line-number group in its own pass; with a
        // looseness bias the groups are kept apart for every line number.
        let j0 = if self.options.looseness == 0 {
            constant_tail(line_lengths)
        } else {
            usize::MAX
        };

        for b in 0..paragraph.len() {
            match paragraph.items()[b] {
                Item::Box { width } => self.sum_width += width,
                Item::Glue {
                    width,
                    stretch,
                    shrink,
                } => {
                    if b > 0 && paragraph.items()[b - 1].is_box() {
                        self.try_break_at(paragraph, b, line_lengths, j0)?;
                    }
                    self.sum_width += width;
                    self.sum_stretch += stretch;
                    self.sum_shrink += shrink;
                }
                Item::Penalty { penalty, .. } => {
                    if penalty < INFINITE_PENALTY {
                        self.try_break_at(paragraph, b, line_lengths, j0)?;
                    }
                }
            }
        }

        let chosen = self.choose_terminal();
        Ok(self.reconstruct(chosen))
    }

    /// Rescan the active list at legal breakpoint `b`.
    fn try_break_at(
        &mut self,
        paragraph: &Paragraph,
        b: usize,
        line_lengths: &[f64],
        j0: usize,
    ) -> Result<()> {
        let forced = paragraph.items()[b].is_forced_break();
        let mut prev: Option<usize> = None;
        let mut cur = self.head;
        let mut after_sums: Option<(f64, f64, f64)> = None;

        while cur.is_some() {
            // Best feasible predecessor per fitness class for this pass.
            let mut best_demerits = [f64::INFINITY; 4];
            let mut best_prev: [Option<usize>; 4] = [None; 4];
            let mut best_ratio = [0.0_f64; 4];
            let mut least = f64::INFINITY;

            while let Some(a) = cur {
                let next = self.nodes[a].link;
                let line = self.nodes[a].line + 1;
                let ratio = self.adjustment_ratio(paragraph, a, b, line_lengths, line);

                if ratio < -1.0 || forced {
                    // Unlink from the active chain; the arena keeps the
                    // node alive for predecessor traversal.
                    match prev {
                        Some(p) => self.nodes[p].link = next,
                        None => self.head = next,
                    }
                    self.nodes[a].link = None;
                    self.last_deactivated = Some(a);
                } else {
                    prev = Some(a);
                }

                if ratio >= -1.0 && ratio <= self.options.threshold {
                    let (demerits, class) = self.demerits_and_class(paragraph, a, b, ratio);
                    let slot = class.index();
                    if demerits < best_demerits[slot] {
                        best_demerits[slot] = demerits;
                        best_prev[slot] = Some(a);
                        best_ratio[slot] = ratio;
                        if demerits < least {
                            least = demerits;
                        }
                    }
                }

                cur = next;
                if let Some(n) = cur {
                    if self.nodes[n].line >= line && line < j0 {
                        break;
                    }
                }
            }

            if least < f64::INFINITY {
                let (tw, ty, tz) =
                    *after_sums.get_or_insert_with(|| sums_after(paragraph, b, self.sum_width, self.sum_stretch, self.sum_shrink));
                for class in FitnessClass::ALL {
                    let slot = class.index();
                    let Some(parent) = best_prev[slot] else { continue };
                    if best_demerits[slot] > least + self.options.fitness_demerits {
                        continue;
                    }
                    let index = self.nodes.len();
                    self.nodes.push(Node {
                        position: b,
                        line: self.nodes[parent].line + 1,
                        fitness: class,
                        total_width: tw,
                        total_stretch: ty,
                        total_shrink: tz,
                        total_demerits: best_demerits[slot],
                        previous: Some(parent),
                        ratio: best_ratio[slot],
                        link: cur,
                    });
                    match prev {
                        Some(p) => self.nodes[p].link = Some(index),
                        None => self.head = Some(index),
                    }
                    prev = Some(index);
                }
            }
        }

        if self.head.is_none() {
            match self.options.overfull {
                OverfullPolicy::Surface => {
                    return Err(BreakError::Overfull { position: b }.into());
                }
                OverfullPolicy::Recover => self.recover_at(paragraph, b),
            }
        }
        Ok(())
    }

    /// Admit one overfull line: install a single active node at `b` whose
    /// predecessor is the most recently deactivated node, with the
    /// adjustment ratio pinned at -1.
    fn recover_at(&mut self, paragraph: &Paragraph, b: usize) {
        let parent = self
            .last_deactivated
            .expect("active list drained without deactivating any node");
        let (tw, ty, tz) = sums_after(
            paragraph,
            b,
            self.sum_width,
            self.sum_stretch,
            self.sum_shrink,
        );
        let index = self.nodes.len();
        self.nodes.push(Node {
            position: b,
            line: self.nodes[parent].line + 1,
            fitness: FitnessClass::Normal,
            total_width: tw,
            total_stretch: ty,
            total_shrink: tz,
            total_demerits: self.nodes[parent].total_demerits,
            previous: Some(parent),
            ratio: -1.0,
            link: None,
        });
        self.head = Some(index);
    }

    /// Adjustment ratio of the tentative line from node `a` to break `b`,
    /// which would become line number `line`.
    fn adjustment_ratio(
        &self,
        paragraph: &Paragraph,
        a: usize,
        b: usize,
        line_lengths: &[f64],
        line: usize,
    ) -> f64 {
        let node = &self.nodes[a];
        let target = line_length(line_lengths, line);

        let mut length = self.sum_width - node.total_width;
        if let Item::Penalty { width, .. } = paragraph.items()[b] {
            length += width;
        }

        if length < target {
            let stretch = self.sum_stretch - node.total_stretch;
            if stretch > 0.0 {
                (target - length) / stretch
            } else {
                f64::INFINITY
            }
        } else if length > target {
            let shrink = self.sum_shrink - node.total_shrink;
            if shrink > 0.0 {
                (target - length) / shrink
            } else {
                f64::INFINITY
            }
        } else {
            0.0
        }
    }

    /// Cumulative demerits and fitness class of the line a -> b at `ratio`.
    fn demerits_and_class(
        &self,
        paragraph: &Paragraph,
        a: usize,
        b: usize,
        ratio: f64,
    ) -> (f64, FitnessClass) {
        let node = &self.nodes[a];
        let item = &paragraph.items()[b];
        let badness = 100.0 * ratio.abs().powi(3);
        let penalty = item.penalty_value();

        let base = if penalty >= 0.0 {
            (1.0 + badness + penalty).powi(2)
        } else if penalty > FORCED_BREAK {
            (1.0 + badness).powi(2) - penalty * penalty
        } else {
            (1.0 + badness).powi(2)
        };

        let class = FitnessClass::from_ratio(ratio);
        let mut demerits = base;
        if item.is_flagged() && paragraph.items()[node.position].is_flagged() {
            demerits += self.options.flagged_demerits;
        }
        if class.distance(node.fitness) > 1 {
            demerits += self.options.fitness_demerits;
        }
        (demerits + node.total_demerits, class)
    }

    /// Pick the terminal node: minimum demerits, then the looseness bias.
    fn choose_terminal(&self) -> usize {
        let mut best: Option<usize> = None;
        let mut cur = self.head;
        while let Some(i) = cur {
            let better = match best {
                None => true,
                Some(b) => self.nodes[i].total_demerits < self.nodes[b].total_demerits,
            };
            if better {
                best = Some(i);
            }
            cur = self.nodes[i].link;
        }
        let best = best.expect("terminal scan left the active list empty");

        let looseness = self.options.looseness;
        if looseness == 0 {
            return best;
        }

        // Among the terminal candidates, prefer the line count closest to
        // the optimum that moves in the requested direction, within |q|.
        let optimum = self.nodes[best].line as i64;
        let mut alternative: Option<usize> = None;
        let mut cur = self.head;
        while let Some(i) = cur {
            let delta = self.nodes[i].line as i64 - optimum;
            let sign_ok = (looseness > 0 && delta > 0) || (looseness < 0 && delta < 0);
            if sign_ok && delta.unsigned_abs() <= looseness.unsigned_abs() as u64 {
                let better = match alternative {
                    None => true,
                    Some(alt) => {
                        let alt_delta = (self.nodes[alt].line as i64 - optimum).unsigned_abs();
                        delta.unsigned_abs() < alt_delta
                            || (delta.unsigned_abs() == alt_delta
                                && self.nodes[i].total_demerits < self.nodes[alt].total_demerits)
                    }
                };
                if better {
                    alternative = Some(i);
                }
            }
            cur = self.nodes[i].link;
        }
        alternative.unwrap_or(best)
    }

    /// Walk predecessor links back from the chosen node.
    fn reconstruct(&self, chosen: usize) -> BreakResult {
        let lines = self.nodes[chosen].line;
        let mut breakpoints = vec![0_usize; lines + 1];
        let mut ratios = vec![f64::NAN; lines + 1];

        let mut cur = Some(chosen);
        while let Some(i) = cur {
            let node = &self.nodes[i];
            breakpoints[node.line] = node.position;
            if node.line > 0 {
                ratios[node.line] = node.ratio;
            }
            cur = node.previous;
        }

        BreakResult {
            breakpoints,
            ratios,
            demerits: self.nodes[chosen].total_demerits,
        }
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.last_deactivated = None;
        self.sum_width = 0.0;
        self.sum_stretch = 0.0;
        self.sum_shrink = 0.0;
    }
}

impl Default for TotalFitBreaker {
    fn default() -> Self {
        Self::new()
    }
}

/// Break a paragraph with default options.
///
/// Convenience wrapper over [`TotalFitBreaker`] for one-off calls.
pub fn break_paragraph(paragraph: &Paragraph, line_lengths: &[f64]) -> Result<BreakResult> {
    TotalFitBreaker::new().break_paragraph(paragraph, line_lengths)
}

// ============================================================================
// Helpers
// ============================================================================

/// Target length of line `line` (1-based); the schedule's last entry is
/// reused past its end.
#[inline]
fn line_length(line_lengths: &[f64], line: usize) -> f64 {
    line_lengths[(line - 1).min(line_lengths.len() - 1)]
}

/// First line number from which the schedule is constant.
fn constant_tail(line_lengths: &[f64]) -> usize {
    let mut j = line_lengths.len();
    while j > 1 && line_lengths[j - 2] == line_lengths[j - 1] {
        j -= 1;
    }
    j
}

/// Prefix sums for a node created at break `b`: the running sums plus any
/// glue from `b` up to the next box. Penalty widths contribute nothing; a
/// forcing penalty strictly after `b` also ends the line's reach.
fn sums_after(
    paragraph: &Paragraph,
    b: usize,
    sum_width: f64,
    sum_stretch: f64,
    sum_shrink: f64,
) -> (f64, f64, f64) {
    let mut tw = sum_width;
    let mut ty = sum_stretch;
    let mut tz = sum_shrink;
    for (i, item) in paragraph.items().iter().enumerate().skip(b) {
        match *item {
            Item::Box { .. } => break,
            Item::Glue {
                width,
                stretch,
                shrink,
            } => {
                tw += width;
                ty += stretch;
                tz += shrink;
            }
            Item::Penalty { .. } => {
                if item.is_forced_break() && i > b {
                    break;
                }
            }
        }
    }
    (tw, ty, tz)
}

// ============================================================================
// Unit Tests
// ============================================================================
