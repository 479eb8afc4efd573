use compile_api::CompileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Compile service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Nothing matched: {0}")]
    NotFound(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Compilation request failed: {0}")]
    Compile(#[from] CompileError),
}

impl From<compile_api::Error> for Error {
    fn from(e: compile_api::Error) -> Self {
        match e {
            compile_api::Error::NotFound(what) => Error::NotFound(what),
            other => Error::ServiceUnavailable(other.to_string()),
        }
    }
}
