//! Error taxonomy for the page builder.
//!
//! Only `MissingUiElement` is fatal (startup precondition). Everything else
//! is reported by the caller and the action becomes a no-op.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("unknown element type: `{0}`")]
    UnknownElementType(String),

    #[error("palette item missing data-type attribute")]
    MissingTypeTag,

    #[error("unknown drop zone: `{0}`")]
    UnknownZone(String),

    #[error("unknown canvas element: `{0}`")]
    UnknownElement(String),

    #[error("could not find required UI element `#{0}`")]
    MissingUiElement(String),

    #[error("form field `#{0}` not found")]
    MissingFormField(String),

    #[error("id `{0}` is already in use")]
    DuplicateId(String),

    #[error("invalid builder config: {0}")]
    InvalidConfig(String),

    /// An unexpected failure reported by the host environment.
    #[error("host error: {0}")]
    Host(String),
}

impl BuilderError {
    /// Whether this error should abort initialization of the whole component.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingUiElement(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_ui_is_fatal() {
        assert!(BuilderError::MissingUiElement("delete-element".into()).is_fatal());
        assert!(!BuilderError::UnknownElementType("video".into()).is_fatal());
        assert!(!BuilderError::MissingFormField("element-size".into()).is_fatal());
    }

    #[test]
    fn messages_name_the_offender() {
        let err = BuilderError::UnknownElementType("video".into());
        assert_eq!(err.to_string(), "unknown element type: `video`");
    }
}
