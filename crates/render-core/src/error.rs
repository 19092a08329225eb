use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unbalanced scissor commands: {0}")]
    UnbalancedScissor(String),
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<&str> for RenderError {
    fn from(s: &str) -> Self {
        RenderError::Backend(s.to_string())
    }
}
