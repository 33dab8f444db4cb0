//! Fixed-point arithmetic for deterministic script values.
//!
//! Every value read from script files is a decimal with a fixed number of
//! fractional digits, stored as a scaled integer. Parsing is exact: text never
//! passes through a float, so `0.1` is exactly ten hundredths.
//!
//! Multiplication and division use `i128` intermediates. Both rounding modes
//! are odd functions (`f(-x) == -f(x)`), so applying a change scaled by `m`
//! and then by `-m` always restores the original value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Rounding applied when a result has more precision than its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Drop the excess digits (`2.7 -> 2`, `-2.7 -> -2`).
    TowardZero,
    /// Round any excess up in magnitude (`2.1 -> 3`, `-2.1 -> -3`).
    AwayFromZero,
}

/// Divides with the requested rounding. `d` must be non-zero.
fn divide(n: i128, d: i128, rounding: Rounding) -> i128 {
    let quotient = n / d;
    match rounding {
        Rounding::TowardZero => quotient,
        Rounding::AwayFromZero => {
            if n % d == 0 {
                quotient
            } else if (n < 0) == (d < 0) {
                quotient + 1
            } else {
                quotient - 1
            }
        }
    }
}

fn saturate(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Errors produced when parsing a decimal literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFixedError {
    #[error("'{0}' is not a decimal number")]
    Invalid(String),
    #[error("'{text}' has more than {digits} fractional digits")]
    Precision { text: String, digits: u32 },
    #[error("'{0}' is out of range")]
    Overflow(String),
}

/// Fixed-point value with `SCALE` units per 1.0.
///
/// `SCALE` must be a power of ten.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedPoint<const SCALE: i64>(pub i64);

/// Hundredths. The default precision for script values.
pub type Centesimal = FixedPoint<100>;

/// Thousandths, for stats that need finer steps (e.g. morale).
pub type Millesimal = FixedPoint<1000>;

pub type Fixed = Centesimal;

impl<const SCALE: i64> FixedPoint<SCALE> {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(SCALE);

    /// Number of decimal digits after the point.
    pub const fn fractional_digits() -> u32 {
        let mut digits = 0;
        let mut s = SCALE;
        while s > 1 {
            s /= 10;
            digits += 1;
        }
        digits
    }

    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Create from an integer (e.g. 5 -> 500 at scale 100).
    #[inline]
    pub const fn from_int(v: i64) -> Self {
        Self(v.saturating_mul(SCALE))
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Truncate to an integer (rounds toward zero).
    #[inline]
    pub const fn to_int(self) -> i64 {
        self.0 / SCALE
    }

    pub fn to_int_rounded(self, rounding: Rounding) -> i64 {
        saturate(divide(self.0 as i128, SCALE as i128, rounding))
    }

    /// Display-only conversion.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiply with explicit rounding of the excess precision.
    pub fn mul_rounded(self, other: Self, rounding: Rounding) -> Self {
        Self(saturate(divide(
            self.0 as i128 * other.0 as i128,
            SCALE as i128,
            rounding,
        )))
    }

    /// Multiply and round the product to a whole number in one step.
    pub fn mul_to_int(self, other: Self, rounding: Rounding) -> i64 {
        saturate(divide(
            self.0 as i128 * other.0 as i128,
            SCALE as i128 * SCALE as i128,
            rounding,
        ))
    }

    /// Multiply by a whole number.
    pub fn mul_int(self, v: i64) -> Self {
        Self(self.0.saturating_mul(v))
    }

    /// Convert to another precision, truncating digits that do not fit.
    pub fn rescale<const OTHER: i64>(self) -> FixedPoint<OTHER> {
        FixedPoint(saturate(divide(
            self.0 as i128 * OTHER as i128,
            SCALE as i128,
            Rounding::TowardZero,
        )))
    }
}

impl<const SCALE: i64> Add for FixedPoint<SCALE> {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl<const SCALE: i64> AddAssign for FixedPoint<SCALE> {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl<const SCALE: i64> Sub for FixedPoint<SCALE> {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl<const SCALE: i64> SubAssign for FixedPoint<SCALE> {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl<const SCALE: i64> Neg for FixedPoint<SCALE> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl<const SCALE: i64> Mul for FixedPoint<SCALE> {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        self.mul_rounded(other, Rounding::TowardZero)
    }
}

impl<const SCALE: i64> Div for FixedPoint<SCALE> {
    type Output = Self;
    #[inline]
    fn div(self, other: Self) -> Self {
        if other.0 == 0 {
            return Self::ZERO; // Safe default for division by zero
        }
        Self(saturate(divide(
            self.0 as i128 * SCALE as i128,
            other.0 as i128,
            Rounding::TowardZero,
        )))
    }
}

impl<const SCALE: i64> FromStr for FixedPoint<SCALE> {
    type Err = ParseFixedError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseFixedError::Invalid(text.to_string());
        let overflow = || ParseFixedError::Overflow(text.to_string());

        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = Self::fractional_digits();
        let fraction = fraction.trim_end_matches('0');
        if fraction.len() as u32 > digits {
            return Err(ParseFixedError::Precision {
                text: text.to_string(),
                digits,
            });
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let fraction: i64 = if fraction.is_empty() {
            0
        } else {
            let value: i64 = fraction.parse().map_err(|_| invalid())?;
            value * 10i64.pow(digits - fraction.len() as u32)
        };

        let raw = whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(fraction))
            .ok_or_else(overflow)?;
        Ok(Self(if negative { -raw } else { raw }))
    }
}

impl<const SCALE: i64> fmt::Display for FixedPoint<SCALE> {
    /// Shortest exact decimal: `10`, `1.5`, `-0.25`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = SCALE.unsigned_abs();
        let magnitude = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = magnitude / scale;
        let fraction = magnitude % scale;
        if fraction == 0 {
            return write!(f, "{}{}", sign, whole);
        }
        let digits = Self::fractional_digits() as usize;
        let fraction = format!("{:0width$}", fraction, width = digits);
        write!(f, "{}{}.{}", sign, whole, fraction.trim_end_matches('0'))
    }
}

impl<const SCALE: i64> fmt::Debug for FixedPoint<SCALE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Fixed::ZERO.0, 0);
        assert_eq!(Fixed::ONE.0, 100);
        assert_eq!(Millesimal::ONE.0, 1000);
        assert_eq!(Fixed::fractional_digits(), 2);
        assert_eq!(Millesimal::fractional_digits(), 3);
    }

    #[test]
    fn test_parse() {
        assert_eq!("3".parse::<Fixed>(), Ok(Fixed::from_raw(300)));
        assert_eq!("-1.25".parse::<Fixed>(), Ok(Fixed::from_raw(-125)));
        assert_eq!("0.5".parse::<Fixed>(), Ok(Fixed::from_raw(50)));
        assert_eq!(".5".parse::<Fixed>(), Ok(Fixed::from_raw(50)));
        assert_eq!("+2.10".parse::<Fixed>(), Ok(Fixed::from_raw(210)));
        assert_eq!("0.755".parse::<Millesimal>(), Ok(Millesimal::from_raw(755)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "0.125".parse::<Fixed>(),
            Err(ParseFixedError::Precision { digits: 2, .. })
        ));
        assert!(matches!("abc".parse::<Fixed>(), Err(ParseFixedError::Invalid(_))));
        assert!(matches!("1.2.3".parse::<Fixed>(), Err(ParseFixedError::Invalid(_))));
        assert!(matches!("-".parse::<Fixed>(), Err(ParseFixedError::Invalid(_))));
        assert!(matches!(
            "99999999999999999999".parse::<Fixed>(),
            Err(ParseFixedError::Overflow(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Fixed::from_raw(1000).to_string(), "10");
        assert_eq!(Fixed::from_raw(150).to_string(), "1.5");
        assert_eq!(Fixed::from_raw(-25).to_string(), "-0.25");
        assert_eq!(Fixed::from_raw(5).to_string(), "0.05");
        assert_eq!(Millesimal::from_raw(755).to_string(), "0.755");
    }

    #[test]
    fn test_multiply() {
        assert_eq!(Fixed::from_int(2) * Fixed::from_int(3), Fixed::from_int(6));
        // 0.05 x 0.5 = 0.025, truncated to 0.02
        assert_eq!(Fixed::from_raw(5) * Fixed::from_raw(50), Fixed::from_raw(2));
        assert_eq!(Fixed::from_raw(5).mul_rounded(Fixed::from_raw(50), Rounding::AwayFromZero), Fixed::from_raw(3));
        assert_eq!(Fixed::from_raw(-5).mul_rounded(Fixed::from_raw(50), Rounding::AwayFromZero), Fixed::from_raw(-3));
    }

    #[test]
    fn test_mul_to_int() {
        // 2.5 x 1 -> 2 or 3
        assert_eq!(Fixed::from_raw(250).mul_to_int(Fixed::ONE, Rounding::TowardZero), 2);
        assert_eq!(Fixed::from_raw(250).mul_to_int(Fixed::ONE, Rounding::AwayFromZero), 3);
        assert_eq!(Fixed::from_raw(-250).mul_to_int(Fixed::ONE, Rounding::AwayFromZero), -3);
        assert_eq!(Fixed::from_raw(1000).mul_to_int(Fixed::from_int(2), Rounding::TowardZero), 20);
    }

    #[test]
    fn test_divide() {
        assert_eq!(Fixed::from_int(6) / Fixed::from_int(2), Fixed::from_int(3));
        assert_eq!(Fixed::from_int(1) / Fixed::ZERO, Fixed::ZERO);
    }

    #[test]
    fn test_rescale() {
        assert_eq!(Fixed::from_raw(125).rescale::<1000>(), Millesimal::from_raw(1250));
        assert_eq!(Millesimal::from_raw(1259).rescale::<100>(), Fixed::from_raw(125));
        assert_eq!(Millesimal::from_raw(-1259).rescale::<100>(), Fixed::from_raw(-125));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn script_value() -> impl Strategy<Value = i64> {
            -10_000_000..=10_000_000i64
        }

        fn rounding() -> impl Strategy<Value = Rounding> {
            prop_oneof![Just(Rounding::TowardZero), Just(Rounding::AwayFromZero)]
        }

        proptest! {
            /// Rounding is odd, so a scaled change and its negation cancel.
            #[test]
            fn mul_rounded_is_odd(a in script_value(), b in script_value(), r in rounding()) {
                let x = Fixed::from_raw(a);
                let y = Fixed::from_raw(b);
                prop_assert_eq!(x.mul_rounded(-y, r), -x.mul_rounded(y, r));
                prop_assert_eq!(x.mul_to_int(-y, r), -x.mul_to_int(y, r));
            }

            #[test]
            fn mul_is_commutative(a in script_value(), b in script_value()) {
                prop_assert_eq!(Fixed::from_raw(a) * Fixed::from_raw(b), Fixed::from_raw(b) * Fixed::from_raw(a));
            }

            #[test]
            fn mul_one_is_identity(a in script_value()) {
                prop_assert_eq!(Fixed::from_raw(a) * Fixed::ONE, Fixed::from_raw(a));
            }

            #[test]
            fn away_from_zero_never_smaller(a in script_value(), b in script_value()) {
                let toward = Fixed::from_raw(a).mul_rounded(Fixed::from_raw(b), Rounding::TowardZero);
                let away = Fixed::from_raw(a).mul_rounded(Fixed::from_raw(b), Rounding::AwayFromZero);
                prop_assert!(away.abs() >= toward.abs());
                prop_assert!((away - toward).abs() <= Fixed::from_raw(1));
            }

            /// Display output parses back to the same value.
            #[test]
            fn display_parses_back(a in (i64::MIN + 1)..=i64::MAX) {
                let x = Fixed::from_raw(a);
                prop_assert_eq!(x.to_string().parse::<Fixed>(), Ok(x));
            }
        }
    }
}
