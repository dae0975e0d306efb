use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("File is empty or has no data rows")]
    EmptyFile,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No dataset available: {0}")]
    NoDataset(String),

    #[error("{0}")]
    Custom(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = AppError::MissingColumns(vec!["Abertura".into(), "Conta".into()]);
        assert_eq!(err.to_string(), "Missing required columns: Abertura, Conta");
    }

    #[test]
    fn test_serializes_as_display_string() {
        let err = AppError::NoDataset("loader failed".into());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"No dataset available: loader failed\"");
    }
}
