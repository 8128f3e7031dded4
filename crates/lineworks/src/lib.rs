//! # Lineworks
//!
//! Lineworks is the paragraph line-breaking engine of the Knuth/TeX
//! box-and-glue model. It is independent of the TeX language: the input
//! is a horizontal list of already-measured nodes (characters, glue,
//! kerns, penalties, discretionary breaks, math markers) together with a
//! set of layout parameters, and the output is a vertical list of
//! finished line boxes interleaved with interline glue, ready for page
//! assembly. Tokenization, macro expansion, font metrics and the
//! backend document writers all live upstream or downstream of this
//! crate.
//!
//! The breaker is a single-pass first-fit algorithm rather than Knuth's
//! optimum-fit dynamic program: each line is cut at the last legal
//! breakpoint that still fits its width. It never fails; contradictory
//! parameters produce degenerate lines and, when tracing is enabled,
//! diagnostics.
//!
//! This is a basic example of breaking a paragraph set in a fake
//! fixed-width font (6pt per character):
//!
//! ```
//! use core::Scaled;
//! use lineworks::ds;
//! use lineworks::params::Parameters;
//! use lineworks::Breaker;
//!
//! let list = lineworks::testutil::hlist(lineworks::testutil::text(
//!     "lineworks breaks paragraphs into lines",
//! ));
//!
//! let mut breaker = Breaker::new();
//! breaker.set_parameters(Parameters {
//!     hsize: Scaled::ONE * 100,
//!     ..Default::default()
//! });
//! let page = breaker.build(list, None);
//!
//! let lines: Vec<&ds::HList> = page
//!     .iter()
//!     .filter_map(|v| match v {
//!         ds::Vertical::HList(line) => Some(line),
//!         _ => None,
//!     })
//!     .collect();
//! assert_eq!(lines.len(), 3);
//! // Every line is set to exactly \hsize.
//! for line in lines {
//!     assert_eq!(line.width(), Scaled::ONE * 100);
//! }
//! ```

pub mod breaker;
pub mod ds;
pub mod params;
pub mod shape;
pub mod testutil;
pub mod trace;

pub use breaker::Breaker;
