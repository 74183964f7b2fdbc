use crate::pipeline::stage::Stage;
use config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Config error: unknown {key} '{value}'")]
    Setting { key: &'static str, value: String },
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("Statement error: {stage} statement {index} failed ({preview}): {source}")]
    Statement {
        stage: Stage,
        index: usize,
        preview: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("Statement error: {stage} statement {index} timed out after {seconds} s ({preview})")]
    StatementTimeout {
        stage: Stage,
        index: usize,
        preview: String,
        seconds: u64,
    },
}

impl Error {
    /// Stage and 1-based index of the statement that stopped the run, if any.
    pub fn failed_statement(&self) -> Option<(Stage, usize)> {
        match self {
            Error::Statement { stage, index, .. }
            | Error::StatementTimeout { stage, index, .. } => Some((*stage, *index)),
            _ => None,
        }
    }
}
