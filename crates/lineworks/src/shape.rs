//! Paragraph shapes.
//!
//! A shape maps a line index to the pair (indent, width) the line must be
//! set to. Most paragraphs use the same width for every line; hanging
//! indentation and explicit `\parshape`-style tables cover the rest.

use crate::params::Parameters;
use core::Scaled;

/// The per-line (indent, width) policy governing line breaking.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParagraphShape {
    /// Every line is `width` wide with no indentation.
    Fixed { width: Scaled },
    /// The first `|hang_after|` lines are indented by `hang_indent` and
    /// narrowed by its absolute value; the rest are full width.
    Hanging {
        hang_after: i32,
        hang_indent: Scaled,
        width: Scaled,
    },
    /// An explicit (indent, width) entry per line; the last entry repeats
    /// for every line past the end of the table.
    Explicit { lines: Vec<(Scaled, Scaled)> },
}

impl ParagraphShape {
    /// The shape the parameters imply when no explicit shape is given:
    /// hanging indentation when both hanging parameters are set, fixed
    /// `\hsize` otherwise.
    pub fn from_parameters(params: &Parameters) -> ParagraphShape {
        if params.hang_after != 0 && params.hang_indent != Scaled::ZERO {
            ParagraphShape::Hanging {
                hang_after: params.hang_after,
                hang_indent: params.hang_indent,
                width: params.hsize,
            }
        } else {
            ParagraphShape::Fixed {
                width: params.hsize,
            }
        }
    }

    /// The (indent, width) pair for the line with the given index.
    ///
    /// An empty explicit table resolves every line to (0, 0); the engine
    /// never rejects a malformed shape, it just produces degenerate
    /// lines.
    pub fn line(&self, index: usize) -> (Scaled, Scaled) {
        match self {
            ParagraphShape::Fixed { width } => (Scaled::ZERO, *width),
            ParagraphShape::Hanging {
                hang_after,
                hang_indent,
                width,
            } => {
                if index < hang_after.unsigned_abs() as usize {
                    (*hang_indent, width.saturating_sub(hang_indent.abs()))
                } else {
                    (Scaled::ZERO, *width)
                }
            }
            ParagraphShape::Explicit { lines } => match lines.get(index).or(lines.last()) {
                Some(&(indent, width)) => (indent, width),
                None => (Scaled::ZERO, Scaled::ZERO),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed() {
        let shape = ParagraphShape::Fixed {
            width: Scaled::ONE * 300,
        };
        for index in 0..5 {
            assert_eq!(shape.line(index), (Scaled::ZERO, Scaled::ONE * 300));
        }
    }

    #[test]
    fn hanging() {
        let shape = ParagraphShape::Hanging {
            hang_after: 2,
            hang_indent: Scaled::ONE * 20,
            width: Scaled::ONE * 300,
        };
        assert_eq!(shape.line(0), (Scaled::ONE * 20, Scaled::ONE * 280));
        assert_eq!(shape.line(1), (Scaled::ONE * 20, Scaled::ONE * 280));
        assert_eq!(shape.line(2), (Scaled::ZERO, Scaled::ONE * 300));
        assert_eq!(shape.line(100), (Scaled::ZERO, Scaled::ONE * 300));
    }

    #[test]
    fn hanging_negative_count_and_indent() {
        let shape = ParagraphShape::Hanging {
            hang_after: -1,
            hang_indent: -Scaled::ONE * 20,
            width: Scaled::ONE * 300,
        };
        // A negative indent hangs on the right: the line is still
        // narrowed by the absolute value.
        assert_eq!(shape.line(0), (-Scaled::ONE * 20, Scaled::ONE * 280));
        assert_eq!(shape.line(1), (Scaled::ZERO, Scaled::ONE * 300));
    }

    #[test]
    fn explicit_repeats_last_entry() {
        let shape = ParagraphShape::Explicit {
            lines: vec![
                (Scaled::ONE * 30, Scaled::ONE * 270),
                (Scaled::ZERO, Scaled::ONE * 300),
            ],
        };
        assert_eq!(shape.line(0), (Scaled::ONE * 30, Scaled::ONE * 270));
        assert_eq!(shape.line(1), (Scaled::ZERO, Scaled::ONE * 300));
        assert_eq!(shape.line(7), (Scaled::ZERO, Scaled::ONE * 300));
    }

    #[test]
    fn empty_explicit_table() {
        let shape = ParagraphShape::Explicit { lines: vec![] };
        assert_eq!(shape.line(0), (Scaled::ZERO, Scaled::ZERO));
    }

    #[test]
    fn derived_from_parameters() {
        let mut params = Parameters {
            hsize: Scaled::ONE * 300,
            ..Default::default()
        };
        assert_eq!(
            ParagraphShape::from_parameters(&params),
            ParagraphShape::Fixed {
                width: Scaled::ONE * 300,
            },
        );
        // Setting only one of the hanging parameters leaves the shape fixed.
        params.hang_indent = Scaled::ONE * 20;
        assert_eq!(
            ParagraphShape::from_parameters(&params),
            ParagraphShape::Fixed {
                width: Scaled::ONE * 300,
            },
        );
        params.hang_after = 2;
        assert_eq!(
            ParagraphShape::from_parameters(&params),
            ParagraphShape::Hanging {
                hang_after: 2,
                hang_indent: Scaled::ONE * 20,
                width: Scaled::ONE * 300,
            },
        );
    }
}
