//! Why a flag evaluation produced its value

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error as StdError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Error attached to an [`EvaluationReason::exception`] reason
pub type ReasonCause = Arc<dyn StdError + Send + Sync>;

/// The general category of an [`EvaluationReason`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonKind {
    /// The flag was off and returned its off variation
    Off,
    /// No targets or rules matched, so the fallthrough variation was used
    Fallthrough,
    /// The context was individually targeted
    TargetMatch,
    /// A rule matched
    RuleMatch,
    /// A prerequisite flag was off or did not return the required variation
    PrerequisiteFailed,
    /// Evaluation failed and the caller's default was returned
    Error,
}

impl ReasonKind {
    /// Wire name, e.g. `RULE_MATCH`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Fallthrough => "FALLTHROUGH",
            Self::TargetMatch => "TARGET_MATCH",
            Self::RuleMatch => "RULE_MATCH",
            Self::PrerequisiteFailed => "PREREQUISITE_FAILED",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for ReasonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong for an [`ReasonKind::Error`] reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The client was not able to establish a connection to the service
    ClientNotReady,
    /// The flag key did not match any known flag
    FlagNotFound,
    /// The flag data was internally inconsistent
    MalformedFlag,
    /// No context was supplied
    UserNotSpecified,
    /// The flag's variation type did not match the requested type
    WrongType,
    /// An unexpected error stopped evaluation
    Exception,
}

impl ErrorKind {
    /// Wire name, e.g. `FLAG_NOT_FOUND`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientNotReady => "CLIENT_NOT_READY",
            Self::FlagNotFound => "FLAG_NOT_FOUND",
            Self::MalformedFlag => "MALFORMED_FLAG",
            Self::UserNotSpecified => "USER_NOT_SPECIFIED",
            Self::WrongType => "WRONG_TYPE",
            Self::Exception => "EXCEPTION",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describes the way a flag value was determined
///
/// Serializes as `{"kind": ...}` plus the fields of the variant. The cause of
/// an exception reason is kept for local diagnostics only and never written.
#[derive(Clone)]
pub enum EvaluationReason {
    /// The flag was off
    Off,
    /// No targets or rules matched
    Fallthrough,
    /// The context was individually targeted
    TargetMatch,
    /// A rule matched
    RuleMatch {
        /// Zero-based position of the matched rule
        rule_index: i32,
        /// Unique identifier of the rule, if it has one
        rule_id: Option<String>,
    },
    /// A prerequisite flag failed
    PrerequisiteFailed {
        /// Key of the first prerequisite that failed
        prerequisite_key: String,
    },
    /// Evaluation failed
    Error {
        /// What went wrong
        error_kind: ErrorKind,
        /// Underlying error, only for [`ErrorKind::Exception`]
        cause: Option<ReasonCause>,
    },
}

impl EvaluationReason {
    /// The flag was off
    pub fn off() -> Self {
        Self::Off
    }

    /// No targets or rules matched
    pub fn fallthrough() -> Self {
        Self::Fallthrough
    }

    /// The context was individually targeted
    pub fn target_match() -> Self {
        Self::TargetMatch
    }

    /// The rule at `rule_index` matched
    pub fn rule_match(rule_index: i32, rule_id: Option<String>) -> Self {
        Self::RuleMatch { rule_index, rule_id }
    }

    /// The prerequisite flag `prerequisite_key` failed
    pub fn prerequisite_failed(prerequisite_key: impl Into<String>) -> Self {
        Self::PrerequisiteFailed {
            prerequisite_key: prerequisite_key.into(),
        }
    }

    /// An error reason with no cause
    pub fn error(error_kind: ErrorKind) -> Self {
        Self::Error {
            error_kind,
            cause: None,
        }
    }

    /// An [`ErrorKind::Exception`] reason carrying the error that stopped evaluation
    pub fn exception(cause: impl StdError + Send + Sync + 'static) -> Self {
        Self::Error {
            error_kind: ErrorKind::Exception,
            cause: Some(Arc::new(cause)),
        }
    }

    /// The general category of this reason
    pub fn kind(&self) -> ReasonKind {
        match self {
            Self::Off => ReasonKind::Off,
            Self::Fallthrough => ReasonKind::Fallthrough,
            Self::TargetMatch => ReasonKind::TargetMatch,
            Self::RuleMatch { .. } => ReasonKind::RuleMatch,
            Self::PrerequisiteFailed { .. } => ReasonKind::PrerequisiteFailed,
            Self::Error { .. } => ReasonKind::Error,
        }
    }

    /// The matched rule's index, or -1 for other kinds
    pub fn rule_index(&self) -> i32 {
        match self {
            Self::RuleMatch { rule_index, .. } => *rule_index,
            _ => -1,
        }
    }

    /// The matched rule's identifier, if any
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Self::RuleMatch { rule_id, .. } => rule_id.as_deref(),
            _ => None,
        }
    }

    /// The failed prerequisite's key
    pub fn prerequisite_key(&self) -> Option<&str> {
        match self {
            Self::PrerequisiteFailed { prerequisite_key } => Some(prerequisite_key),
            _ => None,
        }
    }

    /// What went wrong, for error reasons
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Error { error_kind, .. } => Some(*error_kind),
            _ => None,
        }
    }

    /// The error that stopped evaluation, for exception reasons
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Error { cause: Some(cause), .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl PartialEq for EvaluationReason {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Off, Self::Off)
            | (Self::Fallthrough, Self::Fallthrough)
            | (Self::TargetMatch, Self::TargetMatch) => true,
            (
                Self::RuleMatch { rule_index: a, rule_id: a_id },
                Self::RuleMatch { rule_index: b, rule_id: b_id },
            ) => a == b && a_id == b_id,
            (
                Self::PrerequisiteFailed { prerequisite_key: a },
                Self::PrerequisiteFailed { prerequisite_key: b },
            ) => a == b,
            (
                Self::Error { error_kind: a, cause: a_cause },
                Self::Error { error_kind: b, cause: b_cause },
            ) => {
                // Causes have no structural equality; only the same instance matches
                let same_cause = match (a_cause, b_cause) {
                    (None, None) => true,
                    (Some(x), Some(y)) => Arc::ptr_eq(x, y),
                    _ => false,
                };
                a == b && same_cause
            }
            _ => false,
        }
    }
}

impl Eq for EvaluationReason {}

impl Hash for EvaluationReason {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Self::RuleMatch { rule_index, rule_id } => {
                rule_index.hash(state);
                rule_id.hash(state);
            }
            Self::PrerequisiteFailed { prerequisite_key } => prerequisite_key.hash(state),
            Self::Error { error_kind, cause } => {
                error_kind.hash(state);
                cause.as_ref().map(|c| Arc::as_ptr(c) as *const () as usize).hash(state);
            }
            _ => {}
        }
    }
}

/// `RULE_MATCH(1,id)`, `PREREQUISITE_FAILED(key)`, `ERROR(FLAG_NOT_FOUND)`, `OFF`
impl fmt::Display for EvaluationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleMatch { rule_index, rule_id } => match rule_id {
                Some(id) => write!(f, "{}({rule_index},{id})", self.kind()),
                None => write!(f, "{}({rule_index})", self.kind()),
            },
            Self::PrerequisiteFailed { prerequisite_key } => {
                write!(f, "{}({prerequisite_key})", self.kind())
            }
            Self::Error { error_kind, cause } => match cause {
                Some(cause) => write!(f, "{}({error_kind},{cause})", self.kind()),
                None => write!(f, "{}({error_kind})", self.kind()),
            },
            _ => f.write_str(self.kind().as_str()),
        }
    }
}

impl fmt::Debug for EvaluationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvaluationReason({self})")
    }
}

impl Serialize for EvaluationReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("kind", &self.kind())?;
        match self {
            Self::RuleMatch { rule_index, rule_id } => {
                map.serialize_entry("ruleIndex", rule_index)?;
                if let Some(id) = rule_id {
                    map.serialize_entry("ruleId", id)?;
                }
            }
            Self::PrerequisiteFailed { prerequisite_key } => {
                map.serialize_entry("prerequisiteKey", prerequisite_key)?;
            }
            Self::Error { error_kind, .. } => {
                map.serialize_entry("errorKind", error_kind)?;
            }
            _ => {}
        }
        map.end()
    }
}

/// Wire form; unknown properties are ignored
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReasonRepr {
    kind: ReasonKind,
    rule_index: Option<i32>,
    rule_id: Option<String>,
    prerequisite_key: Option<String>,
    error_kind: Option<ErrorKind>,
}

impl ReasonRepr {
    /// Assemble the reason, or name the payload property that was missing
    fn into_reason(self) -> Result<EvaluationReason, &'static str> {
        Ok(match self.kind {
            ReasonKind::Off => EvaluationReason::Off,
            ReasonKind::Fallthrough => EvaluationReason::Fallthrough,
            ReasonKind::TargetMatch => EvaluationReason::TargetMatch,
            ReasonKind::RuleMatch => {
                let rule_index = self.rule_index.ok_or("ruleIndex")?;
                EvaluationReason::rule_match(rule_index, self.rule_id)
            }
            ReasonKind::PrerequisiteFailed => {
                EvaluationReason::prerequisite_failed(self.prerequisite_key.ok_or("prerequisiteKey")?)
            }
            ReasonKind::Error => EvaluationReason::error(self.error_kind.ok_or("errorKind")?),
        })
    }
}

impl<'de> Deserialize<'de> for EvaluationReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ReasonRepr::deserialize(deserializer)?
            .into_reason()
            .map_err(serde::de::Error::missing_field)
    }
}
