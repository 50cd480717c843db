use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use minijinja::{context, Value};
use url::Url;

use dashboard_application::commands::task_commands;
use dashboard_application::queries::task_queries;
use dashboard_application::{AppError, RuleForm, TaskForm, ValidationErrors};
use dashboard_domain::{Standard, Task};

use crate::error::HttpError;
use crate::extract::FormBody;
use crate::state::WebState;
use crate::views::PageMeta;

pub async fn show_task(
    State(state): State<WebState>,
    page: PageMeta,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let detail = task_queries::task_detail(&state.app, &id).await?;
    state.views.page(StatusCode::OK, "task.html", &page, detail)
}

pub async fn new_task_form(
    State(state): State<WebState>,
    page: PageMeta,
) -> Result<Response, HttpError> {
    render_new(&state, &page, StatusCode::OK, &TaskForm::default(), &ValidationErrors::default())
}

pub async fn create_task(
    State(state): State<WebState>,
    page: PageMeta,
    FormBody(form): FormBody<TaskForm>,
) -> Result<Response, HttpError> {
    match task_commands::create_task(&state.app, &form).await {
        Ok(task) => Ok(Redirect::to(&task_location(&task.id)).into_response()),
        Err(AppError::Validation(errors)) => {
            render_new(&state, &page, StatusCode::BAD_REQUEST, &form, &errors)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn edit_task_form(
    State(state): State<WebState>,
    page: PageMeta,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let (task, form) = task_queries::task_form(&state.app, &id).await?;
    render_edit(&state, &page, StatusCode::OK, &task, &form, &ValidationErrors::default())
}

pub async fn edit_task(
    State(state): State<WebState>,
    page: PageMeta,
    Path(id): Path<String>,
    FormBody(form): FormBody<TaskForm>,
) -> Result<Response, HttpError> {
    match task_commands::edit_task(&state.app, &id, &form).await {
        Ok(()) => Ok(Redirect::to(&task_location(&id)).into_response()),
        Err(AppError::Validation(errors)) => {
            let task = task_queries::get_task(&state.app, &id).await?;
            render_edit(&state, &page, StatusCode::BAD_REQUEST, &task, &form, &errors)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_task_confirm(
    State(state): State<WebState>,
    page: PageMeta,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let task = task_queries::get_task(&state.app, &id).await?;
    state
        .views
        .page(StatusCode::OK, "delete.html", &page, context! { task => task })
}

pub async fn delete_task(
    State(state): State<WebState>,
    Path(id): Path<String>,
) -> Result<Redirect, HttpError> {
    task_commands::delete_task(&state.app, &id).await?;
    Ok(Redirect::to("/?deleted"))
}

pub async fn run_task(
    State(state): State<WebState>,
    Path(id): Path<String>,
) -> Result<Redirect, HttpError> {
    task_commands::run_task(&state.app, &id).await?;
    Ok(Redirect::to(&task_location(&id)))
}

pub async fn ignore_rule(
    State(state): State<WebState>,
    page: PageMeta,
    Path(id): Path<String>,
    FormBody(form): FormBody<RuleForm>,
) -> Result<Response, HttpError> {
    match task_commands::ignore_rule(&state.app, &id, &form).await {
        Ok(()) => Ok(Redirect::to(&task_location(&id)).into_response()),
        Err(AppError::Validation(errors)) => {
            render_task_with_errors(&state, &page, &id, &errors).await
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn unignore_rule(
    State(state): State<WebState>,
    page: PageMeta,
    Path(id): Path<String>,
    FormBody(form): FormBody<RuleForm>,
) -> Result<Response, HttpError> {
    match task_commands::unignore_rule(&state.app, &id, &form).await {
        Ok(()) => Ok(Redirect::to(&task_location(&id)).into_response()),
        Err(AppError::Validation(errors)) => {
            render_task_with_errors(&state, &page, &id, &errors).await
        }
        Err(err) => Err(err.into()),
    }
}

/// `/tasks/{id}` with the id percent-encoded as a single segment.
pub fn task_location(id: &str) -> String {
    let Ok(mut url) = Url::parse("http://dashboard.invalid/tasks") else {
        return "/".to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(id);
    }
    url.path().to_string()
}

fn standards() -> Vec<&'static str> {
    Standard::ALL.iter().map(Standard::as_str).collect()
}

fn render_new(
    state: &WebState,
    page: &PageMeta,
    status: StatusCode,
    form: &TaskForm,
    errors: &ValidationErrors,
) -> Result<Response, HttpError> {
    state.views.page(
        status,
        "new.html",
        page,
        context! { form => form, errors => errors, standards => standards() },
    )
}

async fn render_task_with_errors(
    state: &WebState,
    page: &PageMeta,
    id: &str,
    errors: &ValidationErrors,
) -> Result<Response, HttpError> {
    let detail = task_queries::task_detail(&state.app, id).await?;
    state.views.page(
        StatusCode::BAD_REQUEST,
        "task.html",
        page,
        context! { errors => errors, ..Value::from_serialize(&detail) },
    )
}

fn render_edit(
    state: &WebState,
    page: &PageMeta,
    status: StatusCode,
    task: &Task,
    form: &TaskForm,
    errors: &ValidationErrors,
) -> Result<Response, HttpError> {
    state.views.page(
        status,
        "edit.html",
        page,
        context! { task => task, form => form, errors => errors, standards => standards() },
    )
}
