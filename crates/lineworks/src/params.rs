//! Layout parameters consulted by the paragraph builder.

use core::{Glue, GlueOrder, Scaled};

/// The layout parameters of a paragraph.
///
/// The engine treats these as opaque inputs: it never writes to them, and
/// the surrounding pipeline is responsible for populating them before a
/// paragraph is built. The names follow the TeX primitives they
/// correspond to.
///
/// The `Default` implementation carries the values plain TeX assigns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    /// `\hsize`: the nominal line width.
    pub hsize: Scaled,
    /// `\leftskip`: glue placed at the left end of every line.
    pub left_skip: Glue,
    /// `\rightskip`: glue placed at the right end of every line.
    pub right_skip: Glue,
    /// `\parskip`: glue placed above the paragraph when nonzero.
    pub par_skip: Glue,
    /// `\parfillskip`: the glue that pads out the last line.
    pub par_fill_skip: Glue,
    /// `\baselineskip`: the target distance between consecutive baselines.
    pub baseline_skip: Glue,
    /// `\lineskip`: the glue used between lines that would otherwise come
    /// closer than `line_skip_limit`.
    pub line_skip: Glue,
    /// `\lineskiplimit`: the minimum gap at which the baseline rule still
    /// applies.
    pub line_skip_limit: Scaled,
    /// `\hangafter`: how many lines the hanging indentation applies to.
    /// Zero means no hanging indentation.
    pub hang_after: i32,
    /// `\hangindent`: the hanging indentation. Zero means none.
    pub hang_indent: Scaled,
    /// `\interlinepenalty`: penalty emitted between consecutive lines
    /// when nonzero.
    pub inter_line_penalty: i32,
    /// `\tracingparagraphs`: positive values enable line-decision
    /// reports through the trace sink.
    pub tracing_paragraphs: i32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            // 6.5in, as plain.tex sets it.
            hsize: Scaled(30785863),
            left_skip: Glue::ZERO,
            right_skip: Glue::ZERO,
            // 0pt plus 1pt
            par_skip: Glue {
                stretch: Scaled::ONE,
                ..Glue::ZERO
            },
            // 0pt plus 1fil
            par_fill_skip: Glue {
                stretch: Scaled::ONE,
                stretch_order: GlueOrder::Fil,
                ..Glue::ZERO
            },
            baseline_skip: Glue {
                width: Scaled::ONE * 12,
                ..Glue::ZERO
            },
            line_skip: Glue {
                width: Scaled::ONE,
                ..Glue::ZERO
            },
            line_skip_limit: Scaled::ZERO,
            hang_after: 0,
            hang_indent: Scaled::ZERO,
            inter_line_penalty: 0,
            tracing_paragraphs: 0,
        }
    }
}
