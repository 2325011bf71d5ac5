//! Configuration errors raised while declaring styles and creators.
//!
//! Everything here is a setup-time failure: the constructor that received the
//! malformed input returns the error synchronously, before any theme
//! resolution or rendering is attempted. Nothing in this crate retries.

/// Errors produced while building style descriptors, creators, or sheets.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A style descriptor value was not a rule block, a registered style
    /// reference, or a deferred theme variable.
    #[error("style block `{block}` in {context} must be a rule map, got {found}")]
    InvalidBlock {
        /// Name of the offending top-level entry.
        block: String,
        /// The constructor that received the descriptor.
        context: &'static str,
        /// Short description of the value that was found.
        found: &'static str,
    },

    /// A style sheet still contained unresolved theme variables when it was
    /// handed to the registration primitive.
    #[error("cannot register block `{block}`: it still contains theme variables")]
    UnresolvedVariable {
        /// Name of the block holding the deferred value.
        block: String,
    },

    /// A stylesheet extension referenced a style reference that was never
    /// registered.
    #[error("unknown style reference under block `{block}` in stylesheet extension")]
    UnknownReference {
        /// Name of the block holding the dangling reference.
        block: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_block_message() {
        let err = ConfigError::InvalidBlock {
            block: "title".into(),
            context: "component",
            found: "a number",
        };
        let msg = err.to_string();
        assert!(msg.contains("title"));
        assert!(msg.contains("component"));
        assert!(msg.contains("a number"));
    }

    #[test]
    fn unresolved_variable_message() {
        let err = ConfigError::UnresolvedVariable {
            block: "label".into(),
        };
        assert!(err.to_string().contains("label"));
    }
}
