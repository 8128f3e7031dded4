//! Core types and abstractions used in Lineworks.
//!
//!

use std::fmt::Write;

/// Scaled numbers.
///
/// This is a fixed-width numeric type used throughout TeX.
/// This type is defined and described in part 7 "arithmetic with scaled
/// dimensions" starting at TeX.2021.99.
///
/// This numeric type has 15 bits for the integer part,
/// 16 bits for the fractional part, and a single signed bit.
/// The inner value is the number multiplied by 2^16.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scaled(pub i32);

impl Scaled {
    /// Representation of the number 0 as a [Scaled].
    pub const ZERO: Scaled = Scaled(0);

    /// Representation of the number 1 as a [Scaled].
    pub const ONE: Scaled = Scaled(1 << 16);

    /// Representation of the number 2 as a [Scaled].
    pub const TWO: Scaled = Scaled(1 << 17);

    /// Maximum possible dimension in TeX, which is (2^30-1)/2^16.
    ///
    /// This is _not_ the maximum size of the Rust scaled number type, which is (2^31-1)/2^16.
    ///
    /// Defined in TeX.2021.421.
    pub const MAX_DIMEN: Scaled = Scaled((1 << 30) - 1);

    /// Create a scaled number corresponding to the provided positive integer.
    ///
    /// Scaled numbers are in the range `(-2^14, 2^14)`.
    /// If _i_ is outside this range an overflow error is returned.
    pub fn from_integer(i: i32) -> Result<Scaled, OverflowError> {
        if i >= (1 << 14) || i <= -(1 << 14) {
            Err(OverflowError {})
        } else {
            Ok(Scaled(Scaled::ONE.0 * i))
        }
    }

    /// Creates a scaled number from an integer part, a fractional part and
    /// a unit.
    ///
    /// The fractional part is a scaled number in the range `[0, 1)`, most
    /// easily obtained from [`Scaled::from_decimal_digits`]. The result is
    /// always in points; e.g. `Scaled::new(1, Scaled::ZERO, ScaledUnit::Inch)`
    /// is the dimension `72.26999pt`.
    ///
    /// The conversion is performed as in TeX.2021.457-458.
    pub fn new(
        integer_part: i32,
        fractional_part: Scaled,
        unit: ScaledUnit,
    ) -> Result<Scaled, OverflowError> {
        let value = Scaled::from_integer(integer_part)? + fractional_part;
        let (n, d) = unit.conversion_fraction();
        if (n, d) == (1, 1) {
            return Ok(value);
        }
        let (converted, _) = value.xn_over_d(n, d)?;
        Ok(converted)
    }

    /// Creates a scaled number in `[0, 1)` from a sequence of decimal digits.
    ///
    /// The digits are the digits after the decimal point; e.g. `&[7, 5]`
    /// gives the scaled number for `0.75`.
    ///
    /// TeX.2021.102.
    pub fn from_decimal_digits(digits: &[u8]) -> Scaled {
        let mut a = 0;
        for d in digits.iter().rev() {
            a = (a + (*d as i32) * Scaled::TWO.0) / 10
        }
        Scaled((a + 1) / 2)
    }

    /// Calculates the integer division _xn_/_d_ and remainder, where _x_ is this scaled number
    /// and _n_ and _d_ are integers in the range `[0,2^16]`.
    ///
    /// This function appears in TeX.2021.107. Knuth is working with 32-bit integers
    /// and so calculating this number is tricky without overflowing. E.g. _xn_ may
    /// be larger than `2^32-1` even if the final result is in range.
    /// TeX has an algorithm that calculates the exact value without overflowing,
    /// in the case when the final result is in range.
    ///
    /// Our implementation simply uses 64-bit integers.
    pub fn xn_over_d(&self, n: i32, d: i32) -> Result<(Scaled, Scaled), OverflowError> {
        debug_assert!(n <= 0o200000);
        debug_assert!(d <= 0o200000);
        let mut b: i64 = self.0.into();
        b *= n as i64; // can't overflow because |b|<=2^31 and |n|<=2^16
        let remainder: i32 = (b % (d as i64)).try_into().expect("d<=2^16 so b%d<2^16");
        b /= d as i64;
        if b < -(Scaled::MAX_DIMEN.0 as i64) || b > Scaled::MAX_DIMEN.0 as i64 {
            return Err(OverflowError {});
        }
        let b: i32 = b.try_into().expect("b in (-2^30, +2^30)");
        Ok((Scaled(b), Scaled(remainder)))
    }

    /// TeX.2021.105
    pub fn nx_plus_y(self, mut n: i32, y: Scaled) -> Result<Scaled, OverflowError> {
        let max_answer = Scaled::MAX_DIMEN;
        if n == 0 {
            return Ok(y);
        }
        let mut x = self;
        if n < 0 {
            n = -n;
            x = -x;
        }
        if x <= (max_answer - y) / n && -x <= (max_answer + y) / n {
            Ok(x * n + y)
        } else {
            Err(OverflowError {})
        }
    }

    /// Addition that saturates at the maximum dimension instead of overflowing.
    ///
    /// Knuth's TeX mostly assumes dimension arithmetic stays in range and
    /// reports an overflow error otherwise. The line breaker instead clamps
    /// at ±[`Scaled::MAX_DIMEN`] so that a degenerate paragraph still
    /// typesets to completion.
    pub fn saturating_add(self, rhs: Scaled) -> Scaled {
        Scaled(
            self.0
                .saturating_add(rhs.0)
                .clamp(-Scaled::MAX_DIMEN.0, Scaled::MAX_DIMEN.0),
        )
    }

    /// Subtraction that saturates at the maximum dimension instead of overflowing.
    pub fn saturating_sub(self, rhs: Scaled) -> Scaled {
        Scaled(
            self.0
                .saturating_sub(rhs.0)
                .clamp(-Scaled::MAX_DIMEN.0, Scaled::MAX_DIMEN.0),
        )
    }

    pub fn integer_part(self) -> i32 {
        self.0 / Scaled::ONE.0
    }

    pub fn fractional_part(self) -> Scaled {
        self % Scaled::ONE.0
    }

    pub fn abs(self) -> Scaled {
        Scaled(self.0.abs())
    }
}

#[derive(Debug)]
pub struct OverflowError;

impl std::fmt::Display for OverflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "arithmetic overflow on a scaled number")
    }
}

impl std::error::Error for OverflowError {}

impl std::fmt::Display for Scaled {
    // TeX.2021.103
    fn fmt(&self, fm: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = *self;
        // Integer part
        if s < Scaled::ZERO && s.integer_part() == 0 {
            write!(fm, "-")?;
        }
        write!(fm, "{}.", s.integer_part())?;
        // Fractional part
        let mut f = s.abs().fractional_part() * 10 + Scaled(5);
        let mut delta = Scaled(10);
        loop {
            if delta > Scaled::ONE {
                // round the last digit
                f = f + Scaled(0o100000 - 50000);
            }
            fm.write_char(char::from_digit(f.integer_part().try_into().unwrap(), 10).unwrap())?;
            f = f.fractional_part() * 10;
            delta = delta * 10;
            if f <= delta {
                break;
            }
        }
        // Units
        write!(fm, "pt")?;
        Ok(())
    }
}

impl std::ops::Add<Scaled> for Scaled {
    type Output = Scaled;
    fn add(self, rhs: Scaled) -> Self::Output {
        Scaled(self.0 + rhs.0)
    }
}
impl std::ops::Sub<Scaled> for Scaled {
    type Output = Scaled;
    fn sub(self, rhs: Scaled) -> Self::Output {
        Scaled(self.0 - rhs.0)
    }
}

impl std::ops::Mul<i32> for Scaled {
    type Output = Scaled;
    fn mul(self, rhs: i32) -> Self::Output {
        Scaled(self.0 * rhs)
    }
}

impl std::ops::Div<i32> for Scaled {
    type Output = Scaled;
    fn div(self, rhs: i32) -> Self::Output {
        Scaled(self.0 / rhs)
    }
}

impl std::ops::Rem<i32> for Scaled {
    type Output = Scaled;
    fn rem(self, rhs: i32) -> Self::Output {
        Scaled(self.0 % rhs)
    }
}

impl std::ops::Neg for Scaled {
    type Output = Scaled;
    fn neg(self) -> Self::Output {
        Scaled(-self.0)
    }
}

/// Unit used to define a scaled integer
///
/// Defined in TeX.2021.458 and chapter 10 of the TeX book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaledUnit {
    Point,
    Pica,
    Inch,
    BigPoint,
    Centimeter,
    Millimeter,
    DidotPoint,
    Cicero,
    ScaledPoint,
}

impl ScaledUnit {
    /// Parses a unit from a two character abbreviation.
    ///
    /// E.g., `"pc"` is parsed to [`ScaledUnit::Pica`].
    /// These abbreviations are defined in TeX.2021.458 and chapter 10 of the TeX book.
    pub fn parse(s: &str) -> Option<Self> {
        use ScaledUnit::*;
        Some(match s {
            "pt" => Point,
            "pc" => Pica,
            "in" => Inch,
            "bp" => BigPoint,
            "cm" => Centimeter,
            "mm" => Millimeter,
            "dd" => DidotPoint,
            "cc" => Cicero,
            "sp" => ScaledPoint,
            _ => return None,
        })
    }

    /// Returns the fraction needed to convert to/from this unit to points.
    ///
    /// The return value is of the form (_n_, _d_).
    /// If a scaled number represents _x_ in these units (e.g. _x_ [`ScaledUnit::Pica`]),
    ///     then it is _y_=_nx_/_d_ points.
    ///
    /// Defined in TeX.2021.458.
    pub fn conversion_fraction(&self) -> (i32, i32) {
        use ScaledUnit::*;
        match self {
            Point => (1, 1),
            Pica => (12, 1),
            Inch => (7227, 100),
            BigPoint => (7227, 7200),
            Centimeter => (7227, 254),
            Millimeter => (7227, 2540),
            DidotPoint => (1238, 1157),
            Cicero => (14856, 1157),
            ScaledPoint => (1, 1 << 16),
        }
    }
}

/// Glue.
///
/// An elastic space with a natural width plus the capacity to stretch and
/// shrink. In Knuth's TeX this struct is not passed around directly; instead
/// Knuth essentially uses `std::rc::Rc<Glue>`.
/// This optimization is based on the fact that very few distinct glue
/// values appear in a document, and that the pointer takes up less
/// space than the struct.
/// We might consider performing such an optimization.
///
/// Described in TeX.2021.150.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glue {
    pub width: Scaled,
    pub stretch: Scaled,
    pub stretch_order: GlueOrder,
    pub shrink: Scaled,
    pub shrink_order: GlueOrder,
}

impl Glue {
    /// Glue with no width and no capacity to stretch or shrink.
    pub const ZERO: Glue = Glue {
        width: Scaled::ZERO,
        stretch: Scaled::ZERO,
        stretch_order: GlueOrder::Normal,
        shrink: Scaled::ZERO,
        shrink_order: GlueOrder::Normal,
    };

    pub fn is_zero(&self) -> bool {
        *self == Glue::ZERO
    }
}

/// Order of infinity of a glue stretch or shrink.
///
/// When setting a list of boxes, TeX stretches or shrinks glue boxes.
/// In some cases it is desirable that TeX only stretches some subset of the
/// glue boxes.
/// For example, when setting centered text, TeX only stretches the two glue
/// boxes at each end of the list and leaves all other glue intact.
///
/// To achieve this, each glue stretch or shrink has an order of infinity.
/// If a list contains glue of some order (e.g. [GlueOrder::Fil]),
/// then glues of a lower order (e.g. [GlueOrder::Normal]) are not stretched
/// or shrunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlueOrder {
    #[default]
    Normal,
    Fil,
    Fill,
    Filll,
}

impl GlueOrder {
    /// Parses an infinite glue order from a keyword.
    pub fn parse(s: &str) -> Option<Self> {
        use GlueOrder::*;
        Some(match s {
            "fil" => Fil,
            "fill" => Fill,
            "filll" => Filll,
            _ => return None,
        })
    }
}

/// Sums of glue stretch or shrink, bucketed by order of infinity.
///
/// The individual stretch (or shrink) components of a span of glue cannot
/// be collapsed into one number: an infinite order dominates every lower
/// order completely. So we keep one running total per order and resolve
/// the dominant one at the end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlueTotals {
    pub normal: Scaled,
    pub fil: Scaled,
    pub fill: Scaled,
    pub filll: Scaled,
}

impl GlueTotals {
    pub fn add(&mut self, value: Scaled, order: GlueOrder) {
        let bucket = self.bucket(order);
        *bucket = bucket.saturating_add(value);
    }

    pub fn remove(&mut self, value: Scaled, order: GlueOrder) {
        let bucket = self.bucket(order);
        *bucket = bucket.saturating_sub(value);
    }

    pub fn get(&self, order: GlueOrder) -> Scaled {
        match order {
            GlueOrder::Normal => self.normal,
            GlueOrder::Fil => self.fil,
            GlueOrder::Fill => self.fill,
            GlueOrder::Filll => self.filll,
        }
    }

    /// Returns the total for the highest order with a nonzero total,
    /// together with that order.
    ///
    /// If every total is zero the result is `(Scaled::ZERO, GlueOrder::Normal)`.
    pub fn dominant(&self) -> (Scaled, GlueOrder) {
        if self.filll != Scaled::ZERO {
            (self.filll, GlueOrder::Filll)
        } else if self.fill != Scaled::ZERO {
            (self.fill, GlueOrder::Fill)
        } else if self.fil != Scaled::ZERO {
            (self.fil, GlueOrder::Fil)
        } else {
            (self.normal, GlueOrder::Normal)
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == GlueTotals::default()
    }

    fn bucket(&mut self, order: GlueOrder) -> &mut Scaled {
        match order {
            GlueOrder::Normal => &mut self.normal,
            GlueOrder::Fil => &mut self.fil,
            GlueOrder::Fill => &mut self.fill,
            GlueOrder::Filll => &mut self.filll,
        }
    }
}

/// An accumulator of glue across a span of a list.
///
/// This type answers "does this span fit in this much space": it records
/// the natural width of everything traversed plus the per-order stretch
/// and shrink totals of the glue in the span. It is pure measurement
/// state and is never stored in a box list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WideGlue {
    pub width: Scaled,
    pub stretch: GlueTotals,
    pub shrink: GlueTotals,
}

impl WideGlue {
    /// Adds a piece of glue: its natural width and its elastic components.
    pub fn add_glue(&mut self, glue: &Glue) {
        self.width = self.width.saturating_add(glue.width);
        self.stretch.add(glue.stretch, glue.stretch_order);
        self.shrink.add(glue.shrink, glue.shrink_order);
    }

    /// Adds a rigid width with no elastic component.
    pub fn add_width(&mut self, width: Scaled) {
        self.width = self.width.saturating_add(width);
    }

    /// Removes a piece of glue previously added with [`WideGlue::add_glue`].
    pub fn remove_glue(&mut self, glue: &Glue) {
        self.width = self.width.saturating_sub(glue.width);
        self.stretch.remove(glue.stretch, glue.stretch_order);
        self.shrink.remove(glue.shrink, glue.shrink_order);
    }

    /// Removes a rigid width previously added with [`WideGlue::add_width`].
    pub fn remove_width(&mut self, width: Scaled) {
        self.width = self.width.saturating_sub(width);
    }
}
