use std::io::Error as IoError;
use std::string::FromUtf8Error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FirewallError>;

#[derive(Error, Debug)]
pub enum FirewallError {
    #[error("Failed to execute firewall listing command '{command}'")]
    ListingExecution {
        command: String,
        #[source]
        inner: IoError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl FirewallError {
    pub fn execution(command: impl Into<String>, error: IoError) -> Self {
        Self::ListingExecution {
            command: command.into(),
            inner: error,
        }
    }
}

/// Failures while turning `iptables -L -vn` output into rule records
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid UTF-8 output from firewall listing")]
    Encoding(#[source] FromUtf8Error),

    #[error("Firewall listing header has no '{column}' column: '{header}'")]
    MissingColumn {
        column: &'static str,
        header: String,
    },
}

impl ParseError {
    pub fn missing_column(column: &'static str, header: impl Into<String>) -> Self {
        Self::MissingColumn {
            column,
            header: header.into(),
        }
    }
}
