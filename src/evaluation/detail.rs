//! Flag evaluation results

use serde::{Deserialize, Serialize};
use std::fmt;

use super::reason::{ErrorKind, EvaluationReason};
use crate::model::Value;

/// The value of a flag evaluation along with how it was chosen
///
/// `variation_index` is `None` when the caller's default value was returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct EvaluationDetail<T> {
    #[serde(default)]
    value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variation_index: Option<i32>,
    reason: EvaluationReason,
}

impl<T> EvaluationDetail<T> {
    /// Create a detail from its parts
    pub fn new(reason: EvaluationReason, variation_index: Option<i32>, value: T) -> Self {
        Self {
            value,
            variation_index,
            reason,
        }
    }

    /// Same as [`new`](Self::new) with the arguments in value-first order
    pub fn from_value(value: T, variation_index: Option<i32>, reason: EvaluationReason) -> Self {
        Self::new(reason, variation_index, value)
    }

    /// The result value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the result value
    pub fn into_value(self) -> T {
        self.value
    }

    /// Index of the returned variation, `None` for the default value
    pub fn variation_index(&self) -> Option<i32> {
        self.variation_index
    }

    /// Why this value was chosen
    pub fn reason(&self) -> &EvaluationReason {
        &self.reason
    }

    /// True if the caller's default value was returned
    pub fn is_default_value(&self) -> bool {
        self.variation_index.is_none()
    }

    /// Convert the value while keeping the index and reason
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> EvaluationDetail<U> {
        EvaluationDetail {
            value: f(self.value),
            variation_index: self.variation_index,
            reason: self.reason,
        }
    }
}

impl EvaluationDetail<Value> {
    /// A result that fell back to `default_value` because of an error
    pub fn error(error_kind: ErrorKind, default_value: Value) -> Self {
        Self::new(EvaluationReason::error(error_kind), None, default_value)
    }
}

/// `{reason,index,value}`, with `null` for a missing index
impl<T: fmt::Display> fmt::Display for EvaluationDetail<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variation_index {
            Some(index) => write!(f, "{{{},{index},{}}}", self.reason, self.value),
            None => write!(f, "{{{},null,{}}}", self.reason, self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail() {
        let d = EvaluationDetail::error(ErrorKind::WrongType, Value::from("x"));
        assert!(d.is_default_value());
        assert_eq!(d.reason().error_kind(), Some(ErrorKind::WrongType));
        assert_eq!(d.value(), &Value::from("x"));
    }

    #[test]
    fn test_display() {
        let d = EvaluationDetail::from_value(true, Some(1), EvaluationReason::off());
        assert_eq!(d.to_string(), "{OFF,1,true}");
        let d = EvaluationDetail::error(ErrorKind::FlagNotFound, Value::Null);
        assert_eq!(d.to_string(), "{ERROR(FLAG_NOT_FOUND),null,null}");
    }

    #[test]
    fn test_map_keeps_metadata() {
        let d = EvaluationDetail::from_value(Value::from(3), Some(0), EvaluationReason::fallthrough())
            .map(|v| v.as_int());
        assert_eq!(d.into_value(), 3);
    }
}
