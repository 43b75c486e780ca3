//! # Coins and Coin Sets
//!
//! A [`Coin`] is a (denomination, amount) pair; a [`CoinSet`] is an ordered
//! sequence of coins with at most one entry per denomination.
//!
//! ## Text form
//!
//! Coins parse from `<amount><denom>` (`100uabc`) and coin sets from a
//! comma-separated list (`100uabc,5uatom`). The empty string is the empty
//! set. Amounts serialize as decimal strings so that values beyond the
//! range of JSON numbers survive a round trip.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoinError;

/// A non-negative token amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Wrap a raw integer.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// The raw integer value.
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Whether this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The value as an `i64`, or `None` when it does not fit.
    pub fn to_i64(&self) -> Option<i64> {
        i64::try_from(self.0).ok()
    }

    /// Checked addition.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoinError::InvalidAmount(s.to_string()));
        }
        s.parse::<u128>()
            .map(Amount)
            .map_err(|_| CoinError::InvalidAmount(s.to_string()))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Returns `Ok` when `denom` matches `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let bytes = denom.as_bytes();
    let well_formed = (3..=128).contains(&bytes.len())
        && bytes[0].is_ascii_alphabetic()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-'));
    if well_formed {
        Ok(())
    } else {
        Err(CoinError::InvalidDenom(denom.to_string()))
    }
}

/// A single (denomination, amount) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CoinRepr")]
pub struct Coin {
    denom: String,
    amount: Amount,
}

#[derive(Deserialize)]
struct CoinRepr {
    denom: String,
    amount: Amount,
}

impl TryFrom<CoinRepr> for Coin {
    type Error = CoinError;

    fn try_from(repr: CoinRepr) -> Result<Self, Self::Error> {
        Coin::new(repr.denom, repr.amount)
    }
}

impl Coin {
    /// Create a coin, validating the denomination.
    pub fn new(denom: impl Into<String>, amount: impl Into<Amount>) -> Result<Self, CoinError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        Ok(Self {
            denom,
            amount: amount.into(),
        })
    }

    /// The denomination.
    pub fn denom(&self) -> &str {
        &self.denom
    }

    /// The amount.
    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinError::InvalidCoin(s.to_string()))?;
        if split == 0 {
            return Err(CoinError::InvalidCoin(s.to_string()));
        }
        let (amount, denom) = s.split_at(split);
        Coin::new(denom, amount.parse::<Amount>()?)
    }
}

/// An ordered sequence of coins with at most one entry per denomination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct CoinSet(Vec<Coin>);

impl CoinSet {
    /// Build a coin set, rejecting duplicate denominations. Order is kept.
    pub fn new(coins: Vec<Coin>) -> Result<Self, CoinError> {
        for (i, coin) in coins.iter().enumerate() {
            if coins[..i].iter().any(|c| c.denom == coin.denom) {
                return Err(CoinError::DuplicateDenom(coin.denom.clone()));
            }
        }
        Ok(Self(coins))
    }

    /// The empty set.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// A set holding exactly one coin.
    pub fn single(coin: Coin) -> Self {
        Self(vec![coin])
    }

    /// Number of denominations in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no coins.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the coins in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// The coins as a slice.
    pub fn as_slice(&self) -> &[Coin] {
        &self.0
    }

    /// The amount held for `denom`, zero when absent.
    pub fn amount_of(&self, denom: &str) -> Amount {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or(Amount::ZERO)
    }

    /// Whether any coin carries a zero amount.
    pub fn has_zero(&self) -> bool {
        self.0.iter().any(|c| c.amount.is_zero())
    }

    /// Merge `other` into a new set, summing amounts per denomination.
    /// Denominations new to `self` are appended in `other`'s order.
    pub fn checked_add(&self, other: &CoinSet) -> Result<CoinSet, CoinError> {
        let mut merged = self.0.clone();
        for coin in &other.0 {
            match merged.iter_mut().find(|c| c.denom == coin.denom) {
                Some(existing) => {
                    existing.amount = existing
                        .amount
                        .checked_add(coin.amount)
                        .ok_or_else(|| CoinError::Overflow(coin.denom.clone()))?;
                }
                None => merged.push(coin.clone()),
            }
        }
        Ok(CoinSet(merged))
    }

    /// Whether both sets hold the same amount for every denomination,
    /// ignoring order and zero entries.
    pub fn same_totals(&self, other: &CoinSet) -> bool {
        let covers = |a: &CoinSet, b: &CoinSet| a.iter().all(|c| b.amount_of(&c.denom) == c.amount);
        covers(self, other) && covers(other, self)
    }
}

impl TryFrom<Vec<Coin>> for CoinSet {
    type Error = CoinError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        CoinSet::new(coins)
    }
}

impl From<CoinSet> for Vec<Coin> {
    fn from(set: CoinSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a CoinSet {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for CoinSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

impl FromStr for CoinSet {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(CoinSet::empty());
        }
        let coins = s
            .split(',')
            .map(str::parse::<Coin>)
            .collect::<Result<Vec<_>, _>>()?;
        CoinSet::new(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coin() {
        let coin: Coin = "100uabc".parse().unwrap();
        assert_eq!(coin.denom(), "uabc");
        assert_eq!(coin.amount(), Amount::new(100));
        assert_eq!(coin.to_string(), "100uabc");
    }

    #[test]
    fn test_parse_coin_with_path_denom() {
        let coin: Coin = "7ibc/27394FB092D2ECCD56123C74F36E4C1F".parse().unwrap();
        assert_eq!(coin.denom(), "ibc/27394FB092D2ECCD56123C74F36E4C1F");
    }

    #[test]
    fn test_parse_coin_rejects_garbage() {
        assert!(matches!("uabc".parse::<Coin>(), Err(CoinError::InvalidCoin(_))));
        assert!(matches!("100".parse::<Coin>(), Err(CoinError::InvalidCoin(_))));
        assert!(matches!("100ua".parse::<Coin>(), Err(CoinError::InvalidDenom(_))));
        assert!(matches!("100 uabc".parse::<Coin>(), Err(CoinError::InvalidDenom(_))));
    }

    #[test]
    fn test_amount_overflow_rejected() {
        let too_big = format!("{}0uabc", u128::MAX);
        assert!(matches!(too_big.parse::<Coin>(), Err(CoinError::InvalidAmount(_))));
    }

    #[test]
    fn test_denom_rules() {
        assert!(validate_denom("uabc").is_ok());
        assert!(validate_denom("a.b").is_ok());
        assert!(validate_denom("ab").is_err());
        assert!(validate_denom("1abc").is_err());
        assert!(validate_denom(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_coin_set_rejects_duplicates() {
        let err = "1uabc,2uabc".parse::<CoinSet>().unwrap_err();
        assert_eq!(err, CoinError::DuplicateDenom("uabc".into()));
    }

    #[test]
    fn test_coin_set_keeps_order() {
        let set: CoinSet = "5uxyz,1uabc".parse().unwrap();
        let denoms: Vec<&str> = set.iter().map(Coin::denom).collect();
        assert_eq!(denoms, vec!["uxyz", "uabc"]);
        assert_eq!(set.to_string(), "5uxyz,1uabc");
    }

    #[test]
    fn test_empty_string_is_empty_set() {
        let set: CoinSet = "".parse().unwrap();
        assert!(set.is_empty());
        assert_eq!(set, CoinSet::empty());
    }

    #[test]
    fn test_checked_add_merges() {
        let a: CoinSet = "5uabc,1uxyz".parse().unwrap();
        let b: CoinSet = "3uxyz,2uatom".parse().unwrap();
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.to_string(), "5uabc,4uxyz,2uatom");
    }

    #[test]
    fn test_checked_add_overflow() {
        let a = CoinSet::single(Coin::new("uabc", u128::MAX).unwrap());
        let b = CoinSet::single(Coin::new("uabc", 1u128).unwrap());
        assert_eq!(a.checked_add(&b), Err(CoinError::Overflow("uabc".into())));
    }

    #[test]
    fn test_same_totals_ignores_order() {
        let a: CoinSet = "5uabc,1uxyz".parse().unwrap();
        let b: CoinSet = "1uxyz,5uabc".parse().unwrap();
        let c: CoinSet = "1uxyz,4uabc".parse().unwrap();
        assert!(a.same_totals(&b));
        assert!(!a.same_totals(&c));
    }

    #[test]
    fn test_to_i64_range() {
        assert_eq!(Amount::new(42).to_i64(), Some(42));
        assert_eq!(Amount::new(i64::MAX as u128).to_i64(), Some(i64::MAX));
        assert_eq!(Amount::new(i64::MAX as u128 + 1).to_i64(), None);
    }

    #[test]
    fn test_serde_shape() {
        let set: CoinSet = "100uabc".parse().unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!([{"denom": "uabc", "amount": "100"}]));
        let back: CoinSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_serde_rejects_duplicates_and_bad_denoms() {
        let dup = serde_json::json!([
            {"denom": "uabc", "amount": "1"},
            {"denom": "uabc", "amount": "2"}
        ]);
        assert!(serde_json::from_value::<CoinSet>(dup).is_err());
        let bad = serde_json::json!({"denom": "u", "amount": "1"});
        assert!(serde_json::from_value::<Coin>(bad).is_err());
    }
}
