use tracing::error;

use dashboard_domain::{ReportDownload, ReportFormat};

use crate::dtos::ResultDetail;
use crate::{AppError, AppState};

pub async fn result_detail(state: &AppState, id: &str) -> Result<ResultDetail, AppError> {
    let result = state.webservice.get_result(id).await.map_err(|err| {
        error!("failed to load result {}: {}", id, err);
        AppError::from(err)
    })?;
    let task = state.webservice.get_task(&result.task).await.map_err(|err| {
        error!("failed to load task {} for result {}: {}", result.task, id, err);
        AppError::from(err)
    })?;
    Ok(ResultDetail { task, result })
}

pub async fn download_result(
    state: &AppState,
    id: &str,
    format: ReportFormat,
) -> Result<ReportDownload, AppError> {
    state
        .webservice
        .download_result(id, format)
        .await
        .map_err(|err| {
            error!("failed to download result {}: {}", id, err);
            AppError::from(err)
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{result, state, task, RecordingWebservice};

    #[tokio::test]
    async fn result_detail_loads_owning_task() {
        let webservice = Arc::new(RecordingWebservice {
            tasks: vec![task("42", "Home")],
            results: vec![result("7", "42")],
            ..RecordingWebservice::default()
        });
        let detail = result_detail(&state(webservice.clone()), "7")
            .await
            .expect("detail");
        assert_eq!(detail.task.name, "Home");
        assert_eq!(webservice.calls(), vec!["get_result:7", "get_task:42"]);
    }

    #[tokio::test]
    async fn missing_result_is_not_found() {
        let webservice = Arc::new(RecordingWebservice::default());
        let err = result_detail(&state(webservice), "7").await.expect_err("missing");
        assert!(matches!(err, AppError::NotFound));
    }
}
