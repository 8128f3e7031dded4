//! Breaking a paragraph into lines.
//!
//! This module implements the central algorithm of the engine: taking one
//! horizontal list holding a complete paragraph and cutting it into lines
//! of the right width, stacked in a vertical list with the correct
//! interline spacing.
//!
//! Unlike Knuth's TeX, which chooses globally optimal breakpoints by
//! minimizing demerits over the whole paragraph (TeX.2021 part 39), this
//! breaker works in a single pass: each line is extended to the last
//! legal breakpoint that still fits and is cut there, with no lookahead
//! past the first overflow. If not even the first breakpoint fits, the
//! overlong segment is taken verbatim. That fallback keeps the algorithm
//! moving forward, so a paragraph is always typeset in one traversal no
//! matter how contradictory its parameters are.

use crate::ds::{self, HList, Horizontal, MathKind, VList, Vertical};
use crate::params::Parameters;
use crate::shape::ParagraphShape;
use crate::trace::{LineReport, TerminalTrace, TraceSink};
use core::Glue;
use core::Scaled;
use core::WideGlue;

/// The paragraph builder.
///
/// The builder is configured once with a set of [Parameters] and then
/// turns one horizontal list into one vertical list per call to
/// [`Breaker::build`]. It holds no per-paragraph state between calls;
/// distinct builders are fully independent.
pub struct Breaker {
    params: Parameters,
    trace: Box<dyn TraceSink>,
}

impl Default for Breaker {
    fn default() -> Self {
        Self::new()
    }
}

impl Breaker {
    /// Creates a builder that traces to the terminal.
    pub fn new() -> Breaker {
        Breaker::with_trace(Box::new(TerminalTrace))
    }

    /// Creates a builder that traces to the provided sink.
    pub fn with_trace(trace: Box<dyn TraceSink>) -> Breaker {
        Breaker {
            params: Default::default(),
            trace,
        }
    }

    /// Injects the layout parameters consulted by every subsequent
    /// [`Breaker::build`] call.
    pub fn set_parameters(&mut self, params: Parameters) {
        self.params = params;
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Breaks a paragraph into lines.
    ///
    /// The input list is consumed. The result is a vertical list holding
    /// one finished line box per line of the paragraph, interleaved with
    /// interline glue (and interline penalties, when configured), ready
    /// to be appended to the page.
    ///
    /// If `shape` is provided it overrides the shape the parameters would
    /// give (fixed width, or hanging indentation when the hanging
    /// parameters are set).
    ///
    /// This operation cannot fail: contradictory parameters produce
    /// degenerate lines, reported through the trace sink when
    /// `tracing_paragraphs` is positive, and the paragraph still typesets
    /// to completion.
    pub fn build(&mut self, list: HList, shape: Option<&ParagraphShape>) -> VList {
        let derived;
        let shape = match shape {
            Some(shape) => shape,
            None => {
                derived = ParagraphShape::from_parameters(&self.params);
                &derived
            }
        };
        Builder {
            params: &self.params,
            shape,
            trace: self.trace.as_mut(),
            line: 0,
            prev_depth: None,
            in_math: false,
        }
        .run(list)
    }
}

/// Per-paragraph state of one [`Breaker::build`] call.
struct Builder<'a> {
    params: &'a Parameters,
    shape: &'a ParagraphShape,
    trace: &'a mut dyn TraceSink,
    /// Index of the line being built, from 0.
    line: usize,
    /// Depth of the previous line, if a line has been emitted.
    prev_depth: Option<Scaled>,
    /// Whether the position reached so far is inside a math region.
    in_math: bool,
}

impl Builder<'_> {
    fn run(mut self, mut list: HList) -> VList {
        // A paragraph's explicit trailing space is insignificant.
        if let Some(Horizontal::Glue(_)) = list.last() {
            list.remove(list.len() - 1);
        }
        // Terminate the paragraph: forbid a break before \parfillskip,
        // then force one after it. The forced penalty is the one
        // breakpoint every paragraph is guaranteed to cut at.
        list.push(
            ds::Penalty {
                value: ds::Penalty::INFINITE,
            }
            .into(),
        );
        list.push(Horizontal::Glue(self.params.par_fill_skip));
        list.push(
            ds::Penalty {
                value: ds::Penalty::EJECT,
            }
            .into(),
        );

        let mut out = VList::new();
        if !self.params.par_skip.is_zero() {
            out.push(Vertical::Glue(self.params.par_skip));
        }

        let nodes = list.into_nodes();
        let mut start = 0;
        while start < nodes.len() {
            start = self.break_line(&nodes, start, &mut out);
            self.line += 1;
        }
        out
    }

    /// Builds the line starting at `start` and appends it to `out`,
    /// returning the index the next line starts at. The returned index is
    /// always past `start`.
    fn break_line(&mut self, nodes: &[Horizontal], start: usize, out: &mut VList) -> usize {
        let (indent, line_width) = self.shape.line(self.line);
        let budget = line_width
            .saturating_sub(self.params.left_skip.width)
            .saturating_sub(self.params.right_skip.width);

        let mut scanner = Scanner {
            nodes,
            pos: start,
            line_start: start,
            in_math: self.in_math,
        };
        let mut acc = WideGlue::default();
        let mut feasible: Option<usize> = None;
        let cut;
        loop {
            let candidate = scanner.next_break(&mut acc);
            if acc.width > budget {
                // First fit: cut at the last breakpoint that fit. If none
                // fit, take the overlong first segment verbatim rather
                // than emit an empty line.
                cut = feasible.unwrap_or(candidate);
                break;
            }
            if candidate == nodes.len() {
                // The rest of the paragraph fits on this line.
                cut = candidate;
                break;
            }
            if let Horizontal::Penalty(p) = &nodes[candidate] {
                if p.forces_break() {
                    cut = candidate;
                    break;
                }
            }
            feasible = Some(candidate);
            scanner.step(&mut acc);
        }

        let mut line = HList::new();
        line.push(Horizontal::Glue(self.params.left_skip));
        for node in &nodes[start..cut] {
            line.push(node.clone());
        }
        let mut next = cut;
        if let Some(node) = nodes.get(cut) {
            match node {
                // A forced penalty or a discretionary ends the line itself.
                Horizontal::Penalty(p) if p.forces_break() => {
                    line.push(node.clone());
                    next += 1;
                }
                Horizontal::Discretionary(_) => {
                    line.push(node.clone());
                    next += 1;
                }
                // Glue, kerns and finite penalties at the cut are consumed.
                Horizontal::Glue(_) | Horizontal::Kern(_) | Horizontal::Penalty(_) => {
                    next += 1;
                }
                // A math marker at the cut opens the next line.
                Horizontal::Char(_) | Horizontal::Math(_) => {}
            }
        }
        // The next line never starts with leftover interword space,
        // kerns or finite penalties.
        while nodes.get(next).is_some_and(Horizontal::is_discardable) {
            next += 1;
        }
        line.push(Horizontal::Glue(self.params.right_skip));
        line.set_shift_amount(indent);

        let natural = line.width();
        let set = line.spread_to(line_width);
        if self.params.tracing_paragraphs > 0 {
            self.trace.line(&LineReport {
                line: self.line,
                break_at: cut,
                natural,
                target: line_width,
                set,
            });
        }

        if let Some(prev_depth) = self.prev_depth {
            if self.params.inter_line_penalty != 0 {
                out.push(Vertical::Penalty(ds::Penalty {
                    value: self.params.inter_line_penalty,
                }));
            }
            out.push(Vertical::Glue(self.interline_glue(prev_depth, line.height())));
        }
        self.prev_depth = Some(line.depth());
        out.push(Vertical::HList(line));

        // Carry the math state across the break.
        for node in &nodes[start..next] {
            if let Horizontal::Math(m) = node {
                self.in_math = matches!(m.kind, MathKind::Before);
            }
        }
        next
    }

    /// The glue separating the previous line from one of the given height.
    ///
    /// Normally \baselineskip less the previous depth and the new height,
    /// so consecutive baselines sit \baselineskip apart; but when that
    /// leaves less than \lineskiplimit between the boxes, \lineskip is
    /// used verbatim instead.
    ///
    /// TeX.2021.679.
    fn interline_glue(&self, prev_depth: Scaled, height: Scaled) -> Glue {
        let gap = self
            .params
            .baseline_skip
            .width
            .saturating_sub(prev_depth)
            .saturating_sub(height);
        if gap < self.params.line_skip_limit {
            self.params.line_skip
        } else {
            Glue {
                width: gap,
                ..self.params.baseline_skip
            }
        }
    }
}

/// Walks a horizontal list classifying legal breakpoints.
///
/// The scanner advances monotonically, adding the width of everything it
/// traverses to an accumulator. A position is a legal breakpoint when:
///
/// - it holds glue whose predecessor precedes a break (a char or a
///   discretionary), outside math mode;
/// - it holds a kern immediately followed by glue, outside math mode;
/// - it holds a penalty below [`ds::Penalty::INFINITE`];
/// - it holds an after-math marker immediately followed by glue; or
/// - it holds a discretionary.
///
/// No breakpoint is ever reported at the position a line starts at, so
/// every emitted line consumes at least one node. Leading discardable
/// nodes are accumulated and passed over by the same rule.
struct Scanner<'a> {
    nodes: &'a [Horizontal],
    pos: usize,
    line_start: usize,
    in_math: bool,
}

impl Scanner<'_> {
    /// Returns the index of the next legal breakpoint at or after the
    /// current position, or the length of the list if there is none
    /// before the end. The width of every node strictly before the
    /// returned index is added to `acc`; the breakpoint node itself is
    /// not yet accumulated.
    fn next_break(&mut self, acc: &mut WideGlue) -> usize {
        while self.pos < self.nodes.len() {
            if self.pos > self.line_start && self.breakpoint_here() {
                return self.pos;
            }
            self.step(acc);
        }
        self.nodes.len()
    }

    /// Steps over the node at the current position, adding its width
    /// (and, for glue, its elastic components) to `acc` and tracking the
    /// math state.
    fn step(&mut self, acc: &mut WideGlue) {
        match &self.nodes[self.pos] {
            Horizontal::Glue(g) => acc.add_glue(g),
            Horizontal::Math(m) => {
                self.in_math = matches!(m.kind, MathKind::Before);
                acc.add_width(m.width);
            }
            node => acc.add_width(node.width()),
        }
        self.pos += 1;
    }

    fn breakpoint_here(&self) -> bool {
        match &self.nodes[self.pos] {
            Horizontal::Glue(_) => !self.in_math && self.nodes[self.pos - 1].precedes_break(),
            Horizontal::Kern(_) => {
                !self.in_math
                    && matches!(self.nodes.get(self.pos + 1), Some(Horizontal::Glue(_)))
            }
            Horizontal::Penalty(p) => !p.forbids_break(),
            Horizontal::Math(m) => {
                matches!(m.kind, MathKind::After)
                    && matches!(self.nodes.get(self.pos + 1), Some(Horizontal::Glue(_)))
            }
            Horizontal::Discretionary(_) => true,
            Horizontal::Char(_) => false,
        }
    }
}
