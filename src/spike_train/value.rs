//! Metadata values attached to spike trains.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// An opaque metadata value, e.g., the characteristic frequency of a fiber or a stimulus label.
/// Values are only compared for equality and ordered for grouping, never interpreted.
///
/// Floats are compared with [`f64::total_cmp`], so that values can be used as grouping keys.
/// Both zeros are the same value: `Float(-0.0) == Float(0.0)`.
/// Values of different variants are ordered as Bool < Int < Float < Text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) => 1,
            Value::Float(_) => 2,
            Value::Text(_) => 3,
        }
    }
}

/// Maps `-0.0` to `0.0`, so that both zeros compare and hash as the same value.
fn canonical(x: f64) -> f64 {
    x + 0.0
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(x) => canonical(*x).to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_value_ordering() {
        assert!(Value::from(1) < Value::from(2));
        assert!(Value::from(-0.5) < Value::from(0.5));
        assert!(Value::from("hsr") < Value::from("msr"));

        // across variants
        assert!(Value::from(true) < Value::from(0));
        assert!(Value::from(1000) < Value::from(0.0));
        assert!(Value::from(1e9) < Value::from("a"));

        // an integer is not a float
        assert_ne!(Value::from(1), Value::from(1.0));
    }

    #[test]
    fn test_value_signed_zero() {
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
        assert!(Value::Float(-0.0) < Value::Float(f64::MIN_POSITIVE));
        assert!(Value::Float(-f64::MIN_POSITIVE) < Value::Float(0.0));

        let values: HashSet<Value> = [Value::Float(-0.0), Value::Float(0.0)].into_iter().collect();
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_value_hash() {
        let values: HashSet<Value> = [
            Value::from(1.5),
            Value::from(1.5),
            Value::from("lsr"),
            Value::from("lsr"),
            Value::from(3),
        ]
        .into_iter()
        .collect();
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_value_serde() {
        let values: Vec<Value> = serde_json::from_str(r#"[true, 1000, 0.25, "hsr"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Bool(true),
                Value::Int(1000),
                Value::Float(0.25),
                Value::Text("hsr".to_string())
            ]
        );
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[true,1000,0.25,"hsr"]"#
        );
    }
}
