//! Utilities for building measured box lists tersely.
//!
//! The engine consumes lists whose nodes already carry their dimensions;
//! in real use those come from a font subsystem. Tests don't want to
//! carry font metrics around, so this module fakes a fixed-width font:
//! every character box is 6pt wide, 7pt high and 2pt deep, and every
//! space becomes the same interword glue. This is the same idea as the
//! `text()` function of the Boxworks DSL, minus the parser.

use crate::ds::{self, HList, Horizontal};
use core::{Glue, Scaled};

/// A character box in the fake test font: 6pt wide, 7pt high, 2pt deep.
pub fn char_node(c: char) -> ds::Char {
    ds::Char {
        char: c,
        font: 0,
        width: Scaled::ONE * 6,
        height: Scaled::ONE * 7,
        depth: Scaled::ONE * 2,
    }
}

/// The interword glue used by [`text`]: 6pt plus 3pt minus 2pt.
pub fn space() -> Glue {
    Glue {
        width: Scaled::ONE * 6,
        stretch: Scaled::ONE * 3,
        shrink: Scaled::ONE * 2,
        ..Glue::ZERO
    }
}

/// Converts a string into measured char and glue nodes.
///
/// Whitespace becomes the [`space`] glue and every other character a
/// [`char_node`] box.
pub fn text(s: &str) -> Vec<Horizontal> {
    s.chars()
        .map(|c| {
            if c.is_whitespace() {
                space().into()
            } else {
                char_node(c).into()
            }
        })
        .collect()
}

/// Builds a horizontal list from the given nodes.
pub fn hlist(nodes: impl IntoIterator<Item = Horizontal>) -> HList {
    let mut list = HList::new();
    for node in nodes {
        list.push(node);
    }
    list
}
