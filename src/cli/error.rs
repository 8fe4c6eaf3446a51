//! CLI-level errors (wraps infrastructure errors)

use std::io;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
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

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::from(e).into()
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
                InfraError::Selector { .. } => crate::exitcode::SOFTWARE,
                InfraError::Application(app) => application_exit_code(app),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Config { .. } => crate::exitcode::CONFIG,
        ApplicationError::Domain(domain) => domain_exit_code(domain),
        ApplicationError::OperationFailed { source, .. } => {
            if let Some(domain) = source.downcast_ref::<DomainError>() {
                return domain_exit_code(domain);
            }
            match source.downcast_ref::<io::Error>().map(io::Error::kind) {
                Some(io::ErrorKind::NotFound) => crate::exitcode::NOINPUT,
                Some(io::ErrorKind::PermissionDenied) => crate::exitcode::CANTCREAT,
                Some(io::ErrorKind::InvalidData) => crate::exitcode::DATAERR,
                _ => crate::exitcode::IOERR,
            }
        }
    }
}

fn domain_exit_code(e: &DomainError) -> i32 {
    match e {
        DomainError::Read { source, .. } if source.kind() == io::ErrorKind::InvalidData => {
            crate::exitcode::DATAERR
        }
        DomainError::Read { .. } | DomainError::Write(_) => crate::exitcode::IOERR,
        _ => crate::exitcode::DATAERR,
    }
}
