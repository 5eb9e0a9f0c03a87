//! Block messages raised by the worker flow.
//!
//! Every variant is recoverable: the flow state is left untouched and the
//! worker may retry immediately.

use sarms_core::Language;

use crate::flow::FlowStep;

/// A validation failure or unmet precondition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// One or both line fields are empty
    #[error("enter both a from and a to line")]
    MissingLines,

    /// A line field is not an integer
    #[error("lines must be whole numbers")]
    NonNumericLines,

    /// A line lies outside the allowed range
    #[error("lines must be between {min} and {max}")]
    LinesOutOfRange {
        /// Lowest accepted line
        min: i64,
        /// Highest accepted line
        max: i64,
    },

    /// `from` is after `to`
    #[error("from line cannot be greater than to line")]
    FromGreaterThanTo,

    /// The worker already has a running task
    #[error("you already have an active task; end it before starting another")]
    AlreadyActive,

    /// Ending was requested with nothing running
    #[error("there is no active task to end")]
    NoActiveTask,

    /// Department id is not in the catalog
    #[error("unknown department `{0}`")]
    UnknownDepartment(String),

    /// Task is not offered by the selected department
    #[error("task `{task}` is not offered by department `{department}`")]
    UnknownTask {
        /// Selected department
        department: String,
        /// Requested task
        task: String,
    },

    /// Zone id is not in the catalog
    #[error("unknown zone `{0}`")]
    UnknownZone(String),

    /// The action does not apply to the current step
    #[error("{action} is not available while {step}")]
    NotAllowed {
        /// Attempted action
        action: &'static str,
        /// Step the flow was in
        step: FlowStep,
    },
}

impl FlowError {
    /// The message shown to the worker in `lang`.
    pub fn message(&self, lang: Language) -> String {
        match lang {
            Language::En => self.to_string(),
            Language::Ar => match self {
                Self::MissingLines => "أدخل رقم البداية ورقم النهاية".to_string(),
                Self::NonNumericLines => "أدخل أرقامًا صحيحة".to_string(),
                Self::LinesOutOfRange { min, max } => {
                    format!("يجب أن تكون الخطوط بين {} و {}", min, max)
                }
                Self::FromGreaterThanTo => "رقم البداية أكبر من رقم النهاية".to_string(),
                Self::AlreadyActive => "لديك مهمة نشطة، أنهِها قبل بدء مهمة جديدة".to_string(),
                Self::NoActiveTask => "لا توجد مهمة نشطة".to_string(),
                Self::UnknownDepartment(_) | Self::UnknownTask { .. } | Self::UnknownZone(_) => {
                    "اختيار غير صالح".to_string()
                }
                Self::NotAllowed { .. } => "هذا الإجراء غير متاح الآن".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_localized() {
        let err = FlowError::LinesOutOfRange { min: 1, max: 20 };
        assert_eq!(err.message(Language::En), "lines must be between 1 and 20");
        assert!(err.message(Language::Ar).contains("20"));
        assert_ne!(
            FlowError::AlreadyActive.message(Language::En),
            FlowError::AlreadyActive.message(Language::Ar)
        );
    }
}
