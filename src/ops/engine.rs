//! Engine lifecycle controls and database maintenance.

use crate::client::{ApiClient, ApiError, ClearOutcome, EngineStatus};

use super::Notices;

/// The slice of the API that engine control needs.
pub trait EngineApi {
    async fn start_engine(&self) -> Result<EngineStatus, ApiError>;
    async fn pause_engine(&self) -> Result<EngineStatus, ApiError>;
    async fn resume_engine(&self) -> Result<EngineStatus, ApiError>;
    async fn stop_engine(&self) -> Result<EngineStatus, ApiError>;
    async fn clear_database(&self) -> Result<ClearOutcome, ApiError>;
}

impl EngineApi for ApiClient {
    async fn start_engine(&self) -> Result<EngineStatus, ApiError> {
        ApiClient::start_engine(self).await
    }

    async fn pause_engine(&self) -> Result<EngineStatus, ApiError> {
        ApiClient::pause_engine(self).await
    }

    async fn resume_engine(&self) -> Result<EngineStatus, ApiError> {
        ApiClient::resume_engine(self).await
    }

    async fn stop_engine(&self) -> Result<EngineStatus, ApiError> {
        ApiClient::stop_engine(self).await
    }

    async fn clear_database(&self) -> Result<ClearOutcome, ApiError> {
        ApiClient::clear_database(self).await
    }
}

pub async fn start_engine(api: &impl EngineApi, notices: &Notices) -> bool {
    match api.start_engine().await {
        Ok(status) => {
            notices.success(
                "Engine started",
                status
                    .message
                    .unwrap_or_else(|| "The processing engine is now running".to_string()),
            );
            true
        }
        Err(err) => {
            notices.error("Failed to start engine", err.message());
            false
        }
    }
}

pub async fn pause_engine(api: &impl EngineApi, notices: &Notices) -> bool {
    match api.pause_engine().await {
        Ok(status) => {
            notices.info(
                "Engine paused",
                status
                    .message
                    .unwrap_or_else(|| "The processing engine has been paused".to_string()),
            );
            true
        }
        Err(err) => {
            notices.error("Failed to pause engine", err.message());
            false
        }
    }
}

pub async fn resume_engine(api: &impl EngineApi, notices: &Notices) -> bool {
    match api.resume_engine().await {
        Ok(status) => {
            notices.success(
                "Engine resumed",
                status
                    .message
                    .unwrap_or_else(|| "The processing engine is running again".to_string()),
            );
            true
        }
        Err(err) => {
            notices.error("Failed to resume engine", err.message());
            false
        }
    }
}

pub async fn stop_engine(api: &impl EngineApi, notices: &Notices) -> bool {
    match api.stop_engine().await {
        Ok(status) => {
            notices.success(
                "Engine stopped",
                status
                    .message
                    .unwrap_or_else(|| "The processing engine has been stopped".to_string()),
            );
            true
        }
        Err(err) => {
            notices.error("Failed to stop engine", err.message());
            false
        }
    }
}

/// Wipe all tasks and workers. The backend refuses while the engine runs;
/// its rejection message is surfaced verbatim.
pub async fn clear_database(api: &impl EngineApi, notices: &Notices) -> bool {
    match api.clear_database().await {
        Ok(outcome) => {
            notices.success(
                "Database cleared",
                format!(
                    "Removed {} tasks and {} workers",
                    outcome.tasks_deleted.unwrap_or(0),
                    outcome.workers_deleted.unwrap_or(0)
                ),
            );
            true
        }
        Err(err) => {
            notices.error("Failed to clear database", err.message());
            false
        }
    }
}
