#[derive(Debug, Clone, PartialEq)]
pub struct FieldCoercionError {
    pub pointer: String,
    pub message: String,
}

impl FieldCoercionError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            pointer: format!("/{field}"),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldCoercionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.pointer, self.message)
    }
}

impl std::error::Error for FieldCoercionError {}
