//! Token distributions and samples
//!
//! A [`TokenDistribution`] is an insertion-ordered token -> log-probability
//! map for one position; a [`Sample`] is the sequence of positions in
//! rendering order.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Errors from decoding distributions
#[derive(Error, Debug)]
pub enum DistributionError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A log-probability that may be missing or malformed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogProbValue {
    /// Natural-log probability, typically <= 0
    Numeric(f64),
    /// Anything that is not a number (including NaN)
    Invalid,
}

impl LogProbValue {
    /// Classify a float; NaN is not a usable log-probability.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            LogProbValue::Invalid
        } else {
            LogProbValue::Numeric(value)
        }
    }

    /// Classify an arbitrary JSON value
    pub fn from_json(value: &serde_json::Value) -> Self {
        value
            .as_f64()
            .map(Self::from_f64)
            .unwrap_or(LogProbValue::Invalid)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LogProbValue::Numeric(v) => Some(*v),
            LogProbValue::Invalid => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, LogProbValue::Numeric(_))
    }

    /// Probability `exp(logprob)`
    pub fn probability(&self) -> Option<f64> {
        self.as_f64().map(f64::exp)
    }

    /// Strict "greater than" used for top-token selection.
    ///
    /// `Invalid` ranks below every numeric value, so equal values never
    /// replace an earlier entry.
    fn outranks(&self, other: &LogProbValue) -> bool {
        match (self, other) {
            (LogProbValue::Numeric(a), LogProbValue::Numeric(b)) => a > b,
            (LogProbValue::Numeric(_), LogProbValue::Invalid) => true,
            (LogProbValue::Invalid, _) => false,
        }
    }
}

impl From<f64> for LogProbValue {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<f32> for LogProbValue {
    fn from(value: f32) -> Self {
        Self::from_f64(value as f64)
    }
}

impl From<Option<f64>> for LogProbValue {
    fn from(value: Option<f64>) -> Self {
        value.map(Self::from_f64).unwrap_or(LogProbValue::Invalid)
    }
}

/// Token -> log-probability map for a single position.
///
/// Keys are unique. Re-inserting a token replaces its value but keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenDistribution {
    entries: Vec<(String, LogProbValue)>,
}

impl TokenDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a token's log-probability.
    ///
    /// Linear key scan; distributions are expected to be small (top-k).
    pub fn insert(&mut self, token: impl Into<String>, logprob: impl Into<LogProbValue>) {
        let token = token.into();
        let logprob = logprob.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = logprob,
            None => self.entries.push((token, logprob)),
        }
    }

    pub fn with(mut self, token: impl Into<String>, logprob: impl Into<LogProbValue>) -> Self {
        self.insert(token, logprob);
        self
    }

    pub fn get(&self, token: &str) -> Option<LogProbValue> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, lp)| *lp)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, LogProbValue)> {
        self.entries.iter().map(|(t, lp)| (t.as_str(), *lp))
    }

    /// Entry with the highest log-probability.
    ///
    /// Ties go to the entry inserted first. Returns `None` when empty.
    pub fn top(&self) -> Option<(&str, LogProbValue)> {
        let mut iter = self.iter();
        let mut best = iter.next()?;
        for candidate in iter {
            if candidate.1.outranks(&best.1) {
                best = candidate;
            }
        }
        Some(best)
    }
}

impl<K, V> FromIterator<(K, V)> for TokenDistribution
where
    K: Into<String>,
    V: Into<LogProbValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dist = TokenDistribution::new();
        for (token, logprob) in iter {
            dist.insert(token, logprob);
        }
        dist
    }
}

impl<'de> Deserialize<'de> for TokenDistribution {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = TokenDistribution;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of token to log-probability")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut dist = TokenDistribution::new();
                while let Some((token, value)) = map.next_entry::<String, serde_json::Value>()? {
                    dist.insert(token, LogProbValue::from_json(&value));
                }
                Ok(dist)
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}

/// Ordered sequence of distributions, one per rendered position
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Sample(Vec<TokenDistribution>);

impl Sample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `[{"token": logprob, ...}, ...]`, keeping key order
    pub fn from_json_str(json: &str) -> Result<Self, DistributionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn push(&mut self, dist: TokenDistribution) {
        self.0.push(dist);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TokenDistribution> {
        self.0.iter()
    }

    pub fn distributions(&self) -> &[TokenDistribution] {
        &self.0
    }
}

impl From<Vec<TokenDistribution>> for Sample {
    fn from(dists: Vec<TokenDistribution>) -> Self {
        Self(dists)
    }
}

impl FromIterator<TokenDistribution> for Sample {
    fn from_iter<I: IntoIterator<Item = TokenDistribution>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Sample {
    type Item = &'a TokenDistribution;
    type IntoIter = std::slice::Iter<'a, TokenDistribution>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_picks_highest() {
        let dist: TokenDistribution = [("a", -0.1), ("b", -2.0)].into_iter().collect();
        assert_eq!(dist.top(), Some(("a", LogProbValue::Numeric(-0.1))));

        let dist: TokenDistribution = [("low", -3.0), ("high", -0.01), ("mid", -1.0)]
            .into_iter()
            .collect();
        assert_eq!(dist.top().map(|(t, _)| t), Some("high"));
    }

    #[test]
    fn test_top_tie_goes_to_first() {
        let dist: TokenDistribution = [("x", -0.5), ("y", -0.5), ("z", -0.7)].into_iter().collect();
        assert_eq!(dist.top().map(|(t, _)| t), Some("x"));
    }

    #[test]
    fn test_top_prefers_numeric_over_invalid() {
        let dist = TokenDistribution::new()
            .with("bad", LogProbValue::Invalid)
            .with("ok", -9.0);
        assert_eq!(dist.top(), Some(("ok", LogProbValue::Numeric(-9.0))));

        let all_bad = TokenDistribution::new()
            .with("first", LogProbValue::Invalid)
            .with("second", LogProbValue::Invalid);
        assert_eq!(all_bad.top(), Some(("first", LogProbValue::Invalid)));
    }

    #[test]
    fn test_top_empty() {
        assert_eq!(TokenDistribution::new().top(), None);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut dist = TokenDistribution::new();
        dist.insert("a", -1.0);
        dist.insert("b", -2.0);
        dist.insert("a", -0.5);

        let tokens: Vec<_> = dist.iter().map(|(t, _)| t).collect();
        assert_eq!(tokens, vec!["a", "b"]);
        assert_eq!(dist.get("a"), Some(LogProbValue::Numeric(-0.5)));
        assert_eq!(dist.len(), 2);
    }

    #[test]
    fn test_nan_is_invalid() {
        assert_eq!(LogProbValue::from(f64::NAN), LogProbValue::Invalid);
        assert_eq!(LogProbValue::from(None::<f64>), LogProbValue::Invalid);
        assert!(LogProbValue::from(-1.0f32).is_numeric());
    }

    #[test]
    fn test_probability() {
        let p = LogProbValue::Numeric(-2.0).probability().unwrap();
        assert!((p - 0.1353).abs() < 1e-4);
        assert_eq!(LogProbValue::Invalid.probability(), None);
    }

    #[test]
    fn test_json_preserves_key_order() {
        let sample = Sample::from_json_str(r#"[{"zeta": -1.0, "alpha": -0.2, "mid": -0.5}]"#).unwrap();
        let tokens: Vec<_> = sample.distributions()[0].iter().map(|(t, _)| t).collect();
        assert_eq!(tokens, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_json_non_numeric_values() {
        let json = r#"[{"num": -0.3, "int": -1, "str": "oops", "nil": null, "flag": true}]"#;
        let sample = Sample::from_json_str(json).unwrap();
        let dist = &sample.distributions()[0];

        let num = dist.get("num").and_then(|v| v.as_f64()).unwrap();
        assert!((num + 0.3).abs() < 1e-12);
        assert_eq!(dist.get("int"), Some(LogProbValue::Numeric(-1.0)));
        assert_eq!(dist.get("str"), Some(LogProbValue::Invalid));
        assert_eq!(dist.get("nil"), Some(LogProbValue::Invalid));
        assert_eq!(dist.get("flag"), Some(LogProbValue::Invalid));
    }

    #[test]
    fn test_json_sample_order_and_errors() {
        let sample = Sample::from_json_str(r#"[{"The": -0.01}, {" cat": -0.7}, {}]"#).unwrap();
        assert_eq!(sample.len(), 3);
        assert_eq!(sample.distributions()[1].top().map(|(t, _)| t), Some(" cat"));
        assert!(sample.distributions()[2].is_empty());

        assert!(Sample::from_json_str(r#"{"not": "a list"}"#).is_err());
        assert!(Sample::from_json_str("[1, 2]").is_err());
    }
}
