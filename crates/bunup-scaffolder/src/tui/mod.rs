//! CLI prompts using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod create;
#[cfg(feature = "tui")]
mod init;

#[cfg(feature = "tui")]
pub use create::{run_create, CreateArgs};
#[cfg(feature = "tui")]
pub use init::run_init;

/// Whether an error came from the user cancelling a prompt (Esc / Ctrl-C)
pub fn is_cancelled(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::Interrupted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupted_is_cancelled() {
        let err = anyhow::Error::from(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(is_cancelled(&err));
        assert!(is_cancelled(&err.context("while prompting")));
    }

    #[test]
    fn test_other_errors_are_not_cancelled() {
        let err = anyhow::anyhow!("Setup cancelled.");
        assert!(!is_cancelled(&err));
    }
}
