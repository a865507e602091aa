//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::TreeFileNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::InvalidTreeFile { .. } => crate::exitcode::DATAERR,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use std::path::PathBuf;

    #[test]
    fn given_layered_errors_when_mapping_exit_codes_then_sysexits_match() {
        let not_found: CliError =
            ApplicationError::TreeFileNotFound(PathBuf::from("org.toml")).into();
        assert_eq!(not_found.exit_code(), crate::exitcode::NOINPUT);

        let domain: CliError = ApplicationError::from(DomainError::RootNotTogglable).into();
        assert_eq!(domain.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(domain.to_string(), "the virtual root cannot be toggled");

        let usage = CliError::Usage("config exists".into());
        assert_eq!(usage.exit_code(), crate::exitcode::USAGE);
    }
}
