use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unrecognized {kind} code in stored data: {value:?}")]
    UnknownCode { kind: &'static str, value: String },
}

impl CoreError {
    pub fn unknown_code(kind: &'static str, value: &str) -> Self {
        CoreError::UnknownCode {
            kind,
            value: value.to_string(),
        }
    }
}
