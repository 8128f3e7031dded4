//! Paragraph tracing.
//!
//! When the `tracing_paragraphs` parameter is positive the engine reports
//! every line decision it takes to a [TraceSink]: where the line was cut,
//! what its natural width was against the target, and whether the glue
//! had to stretch or shrink. Lines whose elastic capacity was exhausted
//! are classified as overfull or underfull. The reports are pure
//! observations; the chosen breaks never depend on the sink.

use crate::ds::{GlueSet, GlueSign};
use colored::*;
use core::GlueOrder;
use core::Scaled;

/// Record of a single line decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineReport {
    /// Index of the line within its paragraph, from 0.
    pub line: usize,
    /// Index of the node in the prepared paragraph the line was cut at.
    pub break_at: usize,
    /// Natural width of the line's material before the glue was set.
    pub natural: Scaled,
    /// The width the line was set to.
    pub target: Scaled,
    /// How the glue was set to reach the target.
    pub set: GlueSet,
}

impl LineReport {
    /// Classifies the line when its elastic capacity fell short:
    /// overfull if the material could not shrink enough, underfull if
    /// stretch was needed and none was available.
    pub fn fullness(&self) -> Option<Fullness> {
        if self.set.shortfall == Scaled::ZERO {
            return None;
        }
        match self.set.sign {
            GlueSign::Shrinking => Some(Fullness::Overfull),
            GlueSign::Stretching => Some(Fullness::Underfull),
            GlueSign::Normal => None,
        }
    }
}

/// Diagnostic classification of a line whose glue could not reach the
/// target width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fullness {
    Overfull,
    Underfull,
}

/// Implementations of this trait receive paragraph tracing output.
pub trait TraceSink {
    fn line(&mut self, report: &LineReport);
}

/// Writes reports to the standard error stream, in the style of TeX's
/// log output.
pub struct TerminalTrace;

impl TraceSink for TerminalTrace {
    fn line(&mut self, report: &LineReport) {
        eprintln!(
            "@ line {}: cut at node {}, natural {} for target {}, {}",
            report.line,
            report.break_at,
            report.natural,
            report.target,
            describe_set(&report.set),
        );
        match report.fullness() {
            Some(Fullness::Overfull) => eprintln!(
                "{} ({} too wide) at line {}",
                "Overfull \\hbox".bold(),
                report.set.shortfall.to_string().bright_yellow(),
                report.line,
            ),
            Some(Fullness::Underfull) => eprintln!(
                "{} ({} unfilled) at line {}",
                "Underfull \\hbox".bold(),
                report.set.shortfall.to_string().bright_yellow(),
                report.line,
            ),
            None => {}
        }
    }
}

fn describe_set(set: &GlueSet) -> String {
    let sign = match set.sign {
        GlueSign::Normal => return "rigid".into(),
        GlueSign::Stretching => "stretching",
        GlueSign::Shrinking => "shrinking",
    };
    match set.order {
        GlueOrder::Normal => sign.into(),
        GlueOrder::Fil => format!("{sign} fil"),
        GlueOrder::Fill => format!("{sign} fill"),
        GlueOrder::Filll => format!("{sign} filll"),
    }
}

/// A sink that records every report, for inspection in tests.
///
/// Cloning the sink clones a shared handle to the same reports, so a
/// test can keep one handle while the breaker owns the other.
#[derive(Clone, Default)]
pub struct Capture {
    reports: std::rc::Rc<std::cell::RefCell<Vec<LineReport>>>,
}

impl Capture {
    pub fn new() -> Capture {
        Default::default()
    }

    pub fn reports(&self) -> Vec<LineReport> {
        self.reports.borrow().clone()
    }
}

impl TraceSink for Capture {
    fn line(&mut self, report: &LineReport) {
        self.reports.borrow_mut().push(report.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(set: GlueSet) -> LineReport {
        LineReport {
            line: 0,
            break_at: 5,
            natural: Scaled::ONE * 90,
            target: Scaled::ONE * 100,
            set,
        }
    }

    #[test]
    fn fullness_classification() {
        let fits = report(GlueSet {
            sign: GlueSign::Stretching,
            order: GlueOrder::Normal,
            shortfall: Scaled::ZERO,
        });
        assert_eq!(fits.fullness(), None);
        let underfull = report(GlueSet {
            sign: GlueSign::Stretching,
            order: GlueOrder::Normal,
            shortfall: Scaled::ONE * 10,
        });
        assert_eq!(underfull.fullness(), Some(Fullness::Underfull));
        let overfull = report(GlueSet {
            sign: GlueSign::Shrinking,
            order: GlueOrder::Normal,
            shortfall: Scaled::ONE * 3,
        });
        assert_eq!(overfull.fullness(), Some(Fullness::Overfull));
    }

    #[test]
    fn capture_shares_reports_across_clones() {
        let capture = Capture::new();
        let mut handle = capture.clone();
        handle.line(&report(GlueSet::default()));
        assert_eq!(capture.reports().len(), 1);
    }

    #[test]
    fn set_descriptions() {
        assert_eq!(describe_set(&GlueSet::default()), "rigid");
        assert_eq!(
            describe_set(&GlueSet {
                sign: GlueSign::Stretching,
                order: GlueOrder::Fil,
                shortfall: Scaled::ZERO,
            }),
            "stretching fil",
        );
    }
}
