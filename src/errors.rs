use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepromptError {
    #[error("configuration error: {0}")] Config(String),
    #[error("upstream transport error: {0}")] Transport(String),
    #[error("malformed response: {0}")] Malformed(String),
}
