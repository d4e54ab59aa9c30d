//! Exact monetary amounts.
//!
//! Amounts are held as a whole number of cents so that balance arithmetic is
//! exact. On the JSON wire an amount is a plain decimal number (`1250.5`), and
//! in SQLite it is an INTEGER column holding cents.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A signed amount of money in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// No money at all.
    pub const ZERO: Money = Money(0);

    /// Create an amount from a whole number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create an amount from whole currency units, e.g. `Money::from_units(500)` is 500.00.
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// The amount in cents.
    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// The magnitude of the amount.
    ///
    /// Returns `None` for `i64::MIN` cents, which has no positive counterpart.
    pub const fn checked_abs(self) -> Option<Self> {
        match self.0.checked_abs() {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Convert a decimal amount into cents, rounding half away from zero.
    ///
    /// Rounding works on the shortest decimal representation of `value`, the
    /// digits a client would have written, so `1.005` is 101 cents even though
    /// the nearest `f64` is slightly below it.
    ///
    /// Returns `None` if `value` is not finite or does not fit in cents.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }

        // `Display` for `f64` never uses exponent notation.
        let text = value.abs().to_string();
        let (units, fraction) = text.split_once('.').unwrap_or((&text, ""));
        let units: i64 = units.parse().ok()?;

        let mut digits = fraction.chars().filter_map(|c| c.to_digit(10)).map(i64::from);
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|digit| digit >= 5);

        let cents = units
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths + i64::from(round_up))?;

        if value.is_sign_negative() {
            Some(Self(-cents))
        } else {
            Some(Self(cents))
        }
    }

    /// The amount as a decimal number of currency units.
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();

        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

/// Amounts are written as JSON numbers, which are exact up to 2^53 cents.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;

        Money::from_decimal(value).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Float(value), &"a finite monetary amount")
        })
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(cents) => Ok(Money(cents)),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}
