//! Planck-denominated balances
//!
//! All value in the marketplace moves in plancks, the smallest unit of DOT.
//! One DOT is 10^10 plancks, matching the chain's 10-decimal convention.
//! Balances are unsigned and every arithmetic operation is checked.

use crate::error::MarketError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plancks per DOT (10 decimal places)
pub const PLANCKS_PER_DOT: u128 = 10_000_000_000;

/// A non-negative amount of DOT, held in plancks
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Balance(pub u128);

impl Balance {
    /// The zero balance
    pub const ZERO: Self = Self(0);

    /// Wrap a raw planck count
    pub const fn from_plancks(plancks: u128) -> Self {
        Self(plancks)
    }

    /// Convert whole DOT to plancks
    pub const fn from_dot(dot: u64) -> Self {
        Self(dot as u128 * PLANCKS_PER_DOT)
    }

    /// Get the raw planck count
    pub fn plancks(&self) -> u128 {
        self.0
    }

    /// Check if the balance is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Self) -> Result<Self, MarketError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MarketError::BalanceOverflow)
    }

    /// Checked subtraction; a balance never goes below zero
    pub fn checked_sub(self, other: Self) -> Result<Self, MarketError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(MarketError::BalanceUnderflow)
    }

    /// Saturating addition, for aggregate totals
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Take a percentage cut (0-100), truncating remainders
    pub fn percentage(self, percent: u8) -> Result<Self, MarketError> {
        let value = self
            .0
            .checked_mul(percent as u128)
            .ok_or(MarketError::BalanceOverflow)?
            / 100;
        Ok(Self(value))
    }

    /// Render as whole DOT with four decimal places, e.g. `0.1000 DOT`
    pub fn format_dot(&self) -> String {
        let dot = self.0 as f64 / PLANCKS_PER_DOT as f64;
        format!("{dot:.4} DOT")
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_dot())
    }
}

impl From<u128> for Balance {
    fn from(plancks: u128) -> Self {
        Self(plancks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dot() {
        assert_eq!(Balance::from_dot(1), Balance::from_plancks(10_000_000_000));
        assert_eq!(Balance::from_dot(0), Balance::ZERO);
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Balance::from_plancks(u128::MAX);
        assert!(max.checked_add(Balance::from_plancks(1)).is_err());
        assert_eq!(
            Balance::from_dot(1).checked_add(Balance::from_dot(2)).unwrap(),
            Balance::from_dot(3)
        );
    }

    #[test]
    fn test_checked_sub_never_negative() {
        let one = Balance::from_dot(1);
        let two = Balance::from_dot(2);
        assert!(one.checked_sub(two).is_err());
        assert_eq!(two.checked_sub(one).unwrap(), one);
    }

    #[test]
    fn test_percentage_split() {
        let payment = Balance::from_plancks(1_000_000_000);
        let fee = payment.percentage(2).unwrap();
        assert_eq!(fee, Balance::from_plancks(20_000_000));
        let remainder = payment.checked_sub(fee).unwrap();
        assert_eq!(fee.checked_add(remainder).unwrap(), payment);
    }

    #[test]
    fn test_percentage_truncates() {
        let odd = Balance::from_plancks(3);
        assert_eq!(odd.percentage(50).unwrap(), Balance::from_plancks(1));
        assert_eq!(odd.percentage(0).unwrap(), Balance::ZERO);
        assert_eq!(odd.percentage(100).unwrap(), odd);
    }

    #[test]
    fn test_format_dot() {
        assert_eq!(Balance::from_plancks(1_000_000_000).format_dot(), "0.1000 DOT");
        assert_eq!(Balance::from_dot(1).format_dot(), "1.0000 DOT");
        assert_eq!(Balance::ZERO.format_dot(), "0.0000 DOT");
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&Balance::from_plancks(42)).unwrap();
        assert_eq!(json, "42");
    }
}
