pub type ClockResult<T> = Result<T, ClockError>;

#[derive(thiserror::Error, Debug)]
pub enum ClockError {
    #[error("missing glyph assets: {}", .names.join(", "))]
    MissingAssets { names: Vec<String> },

    #[error("asset decode error: '{name}': {message}")]
    AssetDecode { name: String, message: String },

    #[error("invalid numeric input for {field}: '{input}' is not a non-negative integer")]
    InvalidNumericInput { field: String, input: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("empty sequence: no frames to encode")]
    EmptySequence,

    #[error(
        "inconsistent frame size: frame {index} is {}x{}, expected {}x{}",
        .got.0, .got.1, .expected.0, .expected.1
    )]
    InconsistentFrameSize {
        index: usize,
        expected: (u32, u32),
        got: (u32, u32),
    },

    #[error("encoding error ({codec}): {message}")]
    Encoding { codec: String, message: String },

    #[error("fatal encoding error: primary failed ({primary}); fallback failed ({fallback})")]
    FatalEncoding {
        primary: Box<ClockError>,
        fallback: Box<ClockError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClockError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encoding(codec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            codec: codec.into(),
            message: message.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, input: impl Into<String>) -> Self {
        Self::InvalidNumericInput {
            field: field.into(),
            input: input.into(),
        }
    }

    /// Errors that end the process instead of being reported and retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingAssets { .. } | Self::AssetDecode { .. } | Self::FatalEncoding { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_assets_lists_every_name() {
        let err = ClockError::MissingAssets {
            names: vec!["3.png".to_string(), "colon.png".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("3.png"));
        assert!(msg.contains("colon.png"));
    }

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ClockError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ClockError::encoding("libx264", "boom")
                .to_string()
                .contains("encoding error (libx264):")
        );
        assert!(
            ClockError::invalid_input("hours", "abc")
                .to_string()
                .contains("'abc'")
        );
    }

    #[test]
    fn fatal_classification() {
        assert!(ClockError::MissingAssets { names: vec![] }.is_fatal());
        assert!(
            ClockError::FatalEncoding {
                primary: Box::new(ClockError::encoding("a", "x")),
                fallback: Box::new(ClockError::encoding("b", "y")),
            }
            .is_fatal()
        );
        assert!(!ClockError::EmptySequence.is_fatal());
        assert!(!ClockError::invalid_input("hours", "-1").is_fatal());
        assert!(!ClockError::encoding("libx264", "x").is_fatal());
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ClockError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
