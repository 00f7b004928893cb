use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} is not initialized")]
    NotInitialized(String),
    #[error("failed to initialize {store} - {reason}")]
    Initialize { store: String, reason: String },
    #[error("invalid entry: {0}")]
    InvalidEntry(String),
    #[error("backend read failed: {0}")]
    BackendRead(String),
    #[error("backend write failed: {0}")]
    BackendWrite(String),
}

impl StoreError {
    pub fn not_initialized(store: &str) -> Self { Self::NotInitialized(store.to_string()) }

    pub fn initialize(store: &str, reason: impl ToString) -> Self {
        Self::Initialize { store: store.to_string(), reason: reason.to_string() }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            StoreError::NotInitialized(_) => 2001,
            StoreError::Initialize { .. } => 2002,
            StoreError::InvalidEntry(_) => 2101,
            StoreError::BackendRead(_) => 2201,
            StoreError::BackendWrite(_) => 2202,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_store() {
        assert_eq!(StoreError::not_initialized("SeaOrmBackend").to_string(), "SeaOrmBackend is not initialized");
        assert_eq!(
            StoreError::initialize("JsonFileBackend", "bad json").to_string(),
            "failed to initialize JsonFileBackend - bad json"
        );
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            StoreError::not_initialized("x"),
            StoreError::initialize("x", "y"),
            StoreError::InvalidEntry("x".into()),
            StoreError::BackendRead("x".into()),
            StoreError::BackendWrite("x".into()),
        ];
        let mut codes: Vec<u16> = all.iter().map(StoreError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
