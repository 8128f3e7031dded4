//! Data structures for boxes and their friends.
//!
//! This module implements the subset of TeX.2021 part 10 that the line
//! breaker works with: the atoms of typeset horizontal material, the
//! horizontal list a paragraph arrives as, and the vertical list its
//! finished lines leave in. Nodes arrive already measured; character
//! dimensions come from whatever font subsystem produced them and are
//! opaque here.

use core::Glue;
use core::GlueOrder;
use core::Scaled;
use core::WideGlue;

/// Horizontal node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Horizontal {
    Char(Char),
    Glue(Glue),
    Kern(Kern),
    Penalty(Penalty),
    Discretionary(Discretionary),
    Math(Math),
}

impl Horizontal {
    /// Width this node contributes to the list it appears in.
    ///
    /// For glue this is the natural width; for a discretionary it is the
    /// width of the material shown when no break is taken there.
    pub fn width(&self) -> Scaled {
        match self {
            Horizontal::Char(c) => c.width,
            Horizontal::Glue(g) => g.width,
            Horizontal::Kern(k) => k.width,
            Horizontal::Penalty(_) => Scaled::ZERO,
            Horizontal::Discretionary(d) => d.no_break_width(),
            Horizontal::Math(m) => m.width,
        }
    }

    pub fn height(&self) -> Scaled {
        match self {
            Horizontal::Char(c) => c.height,
            Horizontal::Discretionary(d) => {
                d.no_break
                    .iter()
                    .fold(Scaled::ZERO, |h, n| std::cmp::max(h, n.height()))
            }
            _ => Scaled::ZERO,
        }
    }

    pub fn depth(&self) -> Scaled {
        match self {
            Horizontal::Char(c) => c.depth,
            Horizontal::Discretionary(d) => {
                d.no_break
                    .iter()
                    .fold(Scaled::ZERO, |h, n| std::cmp::max(h, n.depth()))
            }
            _ => Scaled::ZERO,
        }
    }

    /// Whether a glue node that comes after this node may be broken.
    ///
    /// In Knuth's TeX this function is essentially undefined for char nodes;
    /// the calling code checks for chars separately and follows the same
    /// path as if the function returned true, so we return true here.
    /// Glue, kerns, penalties and math markers never precede a break:
    /// this is what lets an infinite penalty in front of a glue node
    /// protect that glue from being broken at.
    ///
    /// This function is defined in TeX.2021.148.
    pub fn precedes_break(&self) -> bool {
        matches!(self, Horizontal::Char(_) | Horizontal::Discretionary(_))
    }

    /// Whether this node is silently dropped when it would otherwise open
    /// a new line.
    ///
    /// Only glue, kerns and finite penalties are discardable. Infinite and
    /// eject penalties survive a break, which is how the terminator
    /// material appended to a paragraph reaches its final line.
    pub fn is_discardable(&self) -> bool {
        match self {
            Horizontal::Glue(_) | Horizontal::Kern(_) => true,
            Horizontal::Penalty(p) => p.is_finite(),
            Horizontal::Char(_) | Horizontal::Discretionary(_) | Horizontal::Math(_) => false,
        }
    }
}

impl From<Char> for Horizontal {
    fn from(value: Char) -> Self {
        Horizontal::Char(value)
    }
}
impl From<Glue> for Horizontal {
    fn from(value: Glue) -> Self {
        Horizontal::Glue(value)
    }
}
impl From<Kern> for Horizontal {
    fn from(value: Kern) -> Self {
        Horizontal::Kern(value)
    }
}
impl From<Penalty> for Horizontal {
    fn from(value: Penalty) -> Self {
        Horizontal::Penalty(value)
    }
}
impl From<Discretionary> for Horizontal {
    fn from(value: Discretionary) -> Self {
        Horizontal::Discretionary(value)
    }
}
impl From<Math> for Horizontal {
    fn from(value: Math) -> Self {
        Horizontal::Math(value)
    }
}

/// A character in a specific font, with its measured dimensions.
///
/// Described in TeX.2021.134. In Knuth's TeX the dimensions live in the
/// font metric arrays; here the node carries them because font metrics
/// are an external collaborator of the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Char {
    pub char: char,
    pub font: u32,
    pub width: Scaled,
    pub height: Scaled,
    pub depth: Scaled,
}

/// A kern.
///
/// A rigid space: like glue, but with no capacity to stretch or shrink.
///
/// Described in TeX.2021.155.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kern {
    pub width: Scaled,
}

/// A penalty.
///
/// Described in TeX.2021.157.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Penalty {
    pub value: i32,
}

impl Penalty {
    /// Any penalty at least this big is considered infinite and no
    /// break will be allowed for such high values.
    pub const INFINITE: i32 = 10000;

    /// Any penalty this small or smaller will result in a forced break.
    pub const EJECT: i32 = -10000;

    /// Whether a break at this penalty is forbidden.
    pub fn forbids_break(&self) -> bool {
        self.value >= Penalty::INFINITE
    }

    /// Whether this penalty forces a break.
    pub fn forces_break(&self) -> bool {
        self.value <= Penalty::EJECT
    }

    /// Whether this penalty is neither infinite nor forcing.
    pub fn is_finite(&self) -> bool {
        !self.forbids_break() && !self.forces_break()
    }
}

/// A discretionary break.
///
/// The node offers alternate material depending on whether a line break
/// is taken at it: `no_break` is shown when no break occurs, `pre_break`
/// ends the line when a break occurs, and `post_break` opens the next
/// line. The sub-lists may only contain chars and kerns.
///
/// Described in TeX.2021.145.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Discretionary {
    pub no_break: Vec<Horizontal>,
    pub pre_break: Vec<Horizontal>,
    pub post_break: Vec<Horizontal>,
}

impl Discretionary {
    pub fn new() -> Self {
        Default::default()
    }

    /// Width of the material shown when no break is taken here.
    pub fn no_break_width(&self) -> Scaled {
        self.no_break
            .iter()
            .fold(Scaled::ZERO, |w, n| w.saturating_add(n.width()))
    }
}

/// A marker placed before or after math mode.
///
/// The width is the math surround spacing. Breaking behaves differently
/// around these markers: glue inside a math region is never broken at,
/// and an after-math marker followed by glue is itself a legal breakpoint.
///
/// Described in TeX.2021.147.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Math {
    pub kind: MathKind,
    pub width: Scaled,
}

/// Which side of a math region a [Math] node marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MathKind {
    Before,
    After,
}

/// Description of whether the glue in a list should stretch, shrink, or
/// remain rigid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlueSign {
    #[default]
    Normal,
    Stretching,
    Shrinking,
}

/// How the glue in a list was set when the list was packaged to a width.
///
/// Described in TeX.2021.135 (the glue sign and glue order fields of a
/// box node). Unlike Knuth's TeX, which records a glue-set ratio and has
/// shipout apply it, [`HList::spread_to`] rewrites the glue widths
/// directly, so this record exists for diagnostics rather than rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlueSet {
    pub sign: GlueSign,
    pub order: GlueOrder,
    /// Width the elastic capacity could not cover: the missing stretch of
    /// an underfull line, or the missing shrink of an overfull one.
    pub shortfall: Scaled,
}

/// A box made from a horizontal list.
///
/// Described in TeX.2021.135. The aggregate dimensions are maintained
/// incrementally as nodes are appended, never by rescanning the list:
/// the width and the per-order stretch and shrink are running sums, and
/// the height and depth are running maxima.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HList {
    width: Scaled,
    height: Scaled,
    depth: Scaled,
    /// How much this box should be moved right when it appears in a
    /// vertical list; the line breaker stores the paragraph-shape indent
    /// here.
    shift_amount: Scaled,
    set: GlueSet,
    glue: WideGlue,
    list: Vec<Horizontal>,
}

impl HList {
    /// Returns an empty hlist, corresponding to the TeX snippet `\hbox{}`.
    ///
    /// Described in TeX.2021.136.
    pub fn new() -> Self {
        Default::default()
    }

    /// The recorded width of the box.
    ///
    /// Until [`HList::spread_to`] is called this is the natural width of
    /// the contents; afterwards it is the spread target.
    pub fn width(&self) -> Scaled {
        self.width
    }

    /// The natural width of the contents as they currently stand.
    pub fn natural_width(&self) -> Scaled {
        self.glue.width
    }

    pub fn height(&self) -> Scaled {
        self.height
    }

    pub fn depth(&self) -> Scaled {
        self.depth
    }

    pub fn shift_amount(&self) -> Scaled {
        self.shift_amount
    }

    pub fn set_shift_amount(&mut self, shift_amount: Scaled) {
        self.shift_amount = shift_amount;
    }

    /// How the glue was set by the last call to [`HList::spread_to`].
    pub fn glue_set(&self) -> GlueSet {
        self.set
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Horizontal> {
        self.list.get(index)
    }

    pub fn last(&self) -> Option<&Horizontal> {
        self.list.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Horizontal> {
        self.list.iter()
    }

    /// Consumes the box and returns its nodes.
    pub fn into_nodes(self) -> Vec<Horizontal> {
        self.list
    }

    /// Appends a node, updating the aggregate dimensions.
    pub fn push(&mut self, node: Horizontal) {
        match &node {
            Horizontal::Glue(g) => self.glue.add_glue(g),
            node => self.glue.add_width(node.width()),
        }
        self.width = self.glue.width;
        self.height = std::cmp::max(self.height, node.height());
        self.depth = std::cmp::max(self.depth, node.depth());
        self.list.push(node);
    }

    /// Removes and returns the node at `index`.
    ///
    /// The width and elastic aggregates are adjusted incrementally; the
    /// height and depth maxima are recomputed only if the removed node
    /// could have set them.
    ///
    /// Panics if `index` is out of bounds, like `Vec::remove`.
    pub fn remove(&mut self, index: usize) -> Horizontal {
        let node = self.list.remove(index);
        match &node {
            Horizontal::Glue(g) => self.glue.remove_glue(g),
            node => self.glue.remove_width(node.width()),
        }
        self.width = self.glue.width;
        if node.height() == self.height || node.depth() == self.depth {
            self.height = Scaled::ZERO;
            self.depth = Scaled::ZERO;
            for node in &self.list {
                self.height = std::cmp::max(self.height, node.height());
                self.depth = std::cmp::max(self.depth, node.depth());
            }
        }
        node
    }

    /// Stretches or shrinks the glue in the list so that the recorded
    /// width is exactly `target`.
    ///
    /// The difference between `target` and the current width is
    /// distributed across the glue nodes whose stretch (or shrink) has
    /// the dominant order, proportionally to each node's own component.
    /// The distribution is exact: integer shares are used and the last
    /// participating node absorbs the rounding remainder. Glue of a lower
    /// order than the dominant one is left untouched.
    ///
    /// Finite shrink never exceeds its capacity; if the requested shrink
    /// is larger, every finite-shrink glue shrinks fully and the returned
    /// [GlueSet] records the overfull amount. The recorded width becomes
    /// `target` in every case.
    pub fn spread_to(&mut self, target: Scaled) -> GlueSet {
        let delta = target.saturating_sub(self.width);
        self.width = target;
        let set = if delta > Scaled::ZERO {
            self.stretch_by(delta)
        } else if delta < Scaled::ZERO {
            self.shrink_by(-delta)
        } else {
            GlueSet::default()
        };
        self.set = set;
        set
    }

    fn stretch_by(&mut self, delta: Scaled) -> GlueSet {
        let (total, order) = self.glue.stretch.dominant();
        if total == Scaled::ZERO {
            return GlueSet {
                sign: GlueSign::Stretching,
                order: GlueOrder::Normal,
                shortfall: delta,
            };
        }
        self.distribute(delta, total, order, GlueSign::Stretching);
        GlueSet {
            sign: GlueSign::Stretching,
            order,
            shortfall: Scaled::ZERO,
        }
    }

    fn shrink_by(&mut self, need: Scaled) -> GlueSet {
        let (total, order) = self.glue.shrink.dominant();
        if total == Scaled::ZERO {
            return GlueSet {
                sign: GlueSign::Shrinking,
                order: GlueOrder::Normal,
                shortfall: need,
            };
        }
        if order == GlueOrder::Normal && total < need {
            // Finite glue never shrinks by more than its capacity.
            for node in &mut self.list {
                if let Horizontal::Glue(g) = node {
                    if g.shrink_order == GlueOrder::Normal {
                        g.width = g.width.saturating_sub(g.shrink);
                    }
                }
            }
            self.glue.width = self.glue.width.saturating_sub(total);
            return GlueSet {
                sign: GlueSign::Shrinking,
                order,
                shortfall: need.saturating_sub(total),
            };
        }
        self.distribute(-need, total, order, GlueSign::Shrinking);
        GlueSet {
            sign: GlueSign::Shrinking,
            order,
            shortfall: Scaled::ZERO,
        }
    }

    fn distribute(&mut self, delta: Scaled, total: Scaled, order: GlueOrder, sign: GlueSign) {
        let component = |g: &Glue| -> Scaled {
            match sign {
                GlueSign::Stretching if g.stretch_order == order => g.stretch,
                GlueSign::Shrinking if g.shrink_order == order => g.shrink,
                _ => Scaled::ZERO,
            }
        };
        let last = self
            .list
            .iter()
            .rposition(|n| matches!(n, Horizontal::Glue(g) if component(g) != Scaled::ZERO));
        let Some(last) = last else { return };
        let mut applied = Scaled::ZERO;
        for (i, node) in self.list.iter_mut().enumerate() {
            let Horizontal::Glue(g) = node else { continue };
            let c = component(g);
            if c == Scaled::ZERO {
                continue;
            }
            // Integer proportional share; the last participating node
            // absorbs the rounding remainder so the applied total is
            // exactly `delta`.
            let share = if i == last {
                delta.saturating_sub(applied)
            } else {
                Scaled((delta.0 as i64 * c.0 as i64 / total.0 as i64) as i32)
            };
            g.width = g.width.saturating_add(share);
            applied = applied.saturating_add(share);
            if i == last {
                break;
            }
        }
        self.glue.width = self.glue.width.saturating_add(applied);
    }
}

/// Vertical node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Vertical {
    HList(HList),
    Glue(Glue),
    Penalty(Penalty),
}

impl From<HList> for Vertical {
    fn from(value: HList) -> Self {
        Vertical::HList(value)
    }
}
impl From<Glue> for Vertical {
    fn from(value: Glue) -> Self {
        Vertical::Glue(value)
    }
}
impl From<Penalty> for Vertical {
    fn from(value: Penalty) -> Self {
        Vertical::Penalty(value)
    }
}

/// A box made from a vertical list.
///
/// The line breaker returns one of these per paragraph: the finished
/// lines interleaved with interline glue and penalties.
///
/// Described in TeX.2021.137, with the height and depth accounting of
/// TeX.2021.669-671: the depth is the depth of the last box, and
/// everything above the last baseline counts towards the height.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VList {
    width: Scaled,
    height: Scaled,
    depth: Scaled,
    list: Vec<Vertical>,
}

impl VList {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn width(&self) -> Scaled {
        self.width
    }

    pub fn height(&self) -> Scaled {
        self.height
    }

    pub fn depth(&self) -> Scaled {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Vertical> {
        self.list.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vertical> {
        self.list.iter()
    }

    /// Consumes the box and returns its nodes.
    pub fn into_nodes(self) -> Vec<Vertical> {
        self.list
    }

    /// Appends a node, updating the aggregate dimensions.
    pub fn push(&mut self, node: Vertical) {
        match &node {
            Vertical::HList(h) => {
                self.height = self.height.saturating_add(self.depth).saturating_add(h.height());
                self.depth = h.depth();
                self.width = std::cmp::max(self.width, h.width().saturating_add(h.shift_amount()));
            }
            Vertical::Glue(g) => {
                self.height = self.height.saturating_add(self.depth).saturating_add(g.width);
                self.depth = Scaled::ZERO;
            }
            Vertical::Penalty(_) => {}
        }
        self.list.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    fn glue(width: i32, stretch: i32, shrink: i32) -> Glue {
        Glue {
            width: Scaled(width),
            stretch: Scaled(stretch),
            shrink: Scaled(shrink),
            ..Glue::ZERO
        }
    }

    #[test]
    fn hlist_aggregates() {
        let mut list = HList::new();
        list.push(testutil::char_node('a').into());
        list.push(testutil::space().into());
        list.push(testutil::char_node('b').into());
        assert_eq!(list.len(), 3);
        assert_eq!(list.width(), Scaled::ONE * 18);
        assert_eq!(list.height(), Scaled::ONE * 7);
        assert_eq!(list.depth(), Scaled::ONE * 2);
    }

    #[test]
    fn remove_updates_aggregates() {
        let mut list = HList::new();
        list.push(testutil::char_node('a').into());
        list.push(testutil::space().into());
        let removed = list.remove(1);
        assert_eq!(removed, testutil::space().into());
        assert_eq!(list.len(), 1);
        assert_eq!(list.width(), Scaled::ONE * 6);
        let removed = list.remove(0);
        assert_eq!(removed, testutil::char_node('a').into());
        assert_eq!(list.width(), Scaled::ZERO);
        assert_eq!(list.height(), Scaled::ZERO);
        assert_eq!(list.depth(), Scaled::ZERO);
    }

    #[test]
    fn spread_distributes_proportionally() {
        let mut list = HList::new();
        list.push(glue(0, 3, 0).into());
        list.push(glue(0, 3, 0).into());
        list.push(glue(0, 4, 0).into());
        let set = list.spread_to(Scaled(10));
        assert_eq!(set.sign, GlueSign::Stretching);
        assert_eq!(set.shortfall, Scaled::ZERO);
        assert_eq!(list.width(), Scaled(10));
        assert_eq!(list.natural_width(), Scaled(10));
        let widths: Vec<Scaled> = list.iter().map(Horizontal::width).collect();
        assert_eq!(widths, vec![Scaled(3), Scaled(3), Scaled(4)]);
    }

    #[test]
    fn spread_remainder_goes_to_last_elastic_node() {
        let mut list = HList::new();
        list.push(glue(0, 1, 0).into());
        list.push(glue(0, 1, 0).into());
        list.push(glue(0, 1, 0).into());
        list.spread_to(Scaled(10));
        let widths: Vec<Scaled> = list.iter().map(Horizontal::width).collect();
        assert_eq!(widths, vec![Scaled(3), Scaled(3), Scaled(4)]);
        assert_eq!(list.natural_width(), Scaled(10));
    }

    #[test]
    fn spread_prefers_higher_order() {
        let mut list = HList::new();
        list.push(glue(0, 5, 0).into());
        let fil = Glue {
            stretch: Scaled(1),
            stretch_order: GlueOrder::Fil,
            ..Glue::ZERO
        };
        list.push(fil.into());
        let set = list.spread_to(Scaled(10));
        assert_eq!(set.order, GlueOrder::Fil);
        let widths: Vec<Scaled> = list.iter().map(Horizontal::width).collect();
        // The finite stretch is ignored entirely.
        assert_eq!(widths, vec![Scaled(0), Scaled(10)]);
    }

    #[test]
    fn spread_shrink_is_capped() {
        let mut list = HList::new();
        list.push(testutil::char_node('a').into());
        list.push(glue(10, 0, 3).into());
        let natural = list.width();
        let set = list.spread_to(natural - Scaled(10));
        assert_eq!(set.sign, GlueSign::Shrinking);
        assert_eq!(set.shortfall, Scaled(7));
        assert_eq!(list.width(), natural - Scaled(10));
        // The glue gave up its full shrink and no more.
        assert_eq!(list.get(1).unwrap().width(), Scaled(7));
    }

    #[test]
    fn spread_with_no_stretch_is_underfull() {
        let mut list = HList::new();
        list.push(testutil::char_node('a').into());
        let set = list.spread_to(list.width() + Scaled(5));
        assert_eq!(set.sign, GlueSign::Stretching);
        assert_eq!(set.shortfall, Scaled(5));
    }

    #[test]
    fn spread_is_idempotent() {
        let mut list = HList::new();
        list.push(glue(0, 3, 0).into());
        list.push(glue(0, 7, 0).into());
        list.spread_to(Scaled(100));
        let first: Vec<Scaled> = list.iter().map(Horizontal::width).collect();
        list.spread_to(Scaled(100));
        let second: Vec<Scaled> = list.iter().map(Horizontal::width).collect();
        assert_eq!(first, second);
        assert_eq!(list.width(), Scaled(100));
    }

    #[test]
    fn vlist_baseline_accounting() {
        let mut line_1 = HList::new();
        line_1.push(testutil::char_node('a').into());
        let mut line_2 = HList::new();
        line_2.push(
            Char {
                height: Scaled::ONE * 9,
                ..testutil::char_node('b')
            }
            .into(),
        );
        let mut out = VList::new();
        out.push(line_1.into());
        out.push(
            Glue {
                width: Scaled::ONE,
                ..Glue::ZERO
            }
            .into(),
        );
        out.push(line_2.into());
        // 7 + (2 + 1) + 9 above the last baseline, and the last depth below.
        assert_eq!(out.height(), Scaled::ONE * 19);
        assert_eq!(out.depth(), Scaled::ONE * 2);
        assert_eq!(out.width(), Scaled::ONE * 6);
    }

    #[test]
    fn discretionary_measures_its_no_break_material() {
        let disc = Discretionary {
            no_break: vec![Kern { width: Scaled::ONE * 3 }.into()],
            pre_break: vec![testutil::char_node('-').into()],
            post_break: vec![],
        };
        let node: Horizontal = disc.into();
        assert_eq!(node.width(), Scaled::ONE * 3);
        assert!(!node.is_discardable());
        assert!(node.precedes_break());
    }
}
