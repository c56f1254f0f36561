use anyhow::Error;

pub struct CapturedError {
    pub inner: Error,
    pub hint: Option<String>,
}

impl CapturedError {
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<Error> for CapturedError {
    fn from(inner: Error) -> Self {
        Self { inner, hint: None }
    }
}
