/// Failures at the pipeline's external boundaries (provider, store, filesystem).
///
/// Extraction and rendering faults have their own types next to the code that
/// raises them (`ExtractError`, `RenderError`).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Weather fetch failed: {0}")]
    FetchFailure(String),

    #[error("Store unavailable: DATABASE_URL is not set")]
    StoreUnavailable,

    #[error("Failed to store observation: {0}")]
    StoreFailure(#[source] sqlx::Error),

    #[error("Failed to query weather history: {0}")]
    QueryFailure(#[source] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AppError::FetchFailure("OpenWeatherMap returned HTTP 401".to_string());
        assert_eq!(
            err.to_string(),
            "Weather fetch failed: OpenWeatherMap returned HTTP 401"
        );

        assert!(AppError::StoreUnavailable
            .to_string()
            .contains("DATABASE_URL"));

        let err = AppError::QueryFailure(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("Failed to query weather history"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
