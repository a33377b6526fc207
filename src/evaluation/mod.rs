//! Flag evaluation results and the reasons behind them

pub mod detail;
pub mod reason;

pub use detail::EvaluationDetail;
pub use reason::{ErrorKind, EvaluationReason, ReasonCause, ReasonKind};
