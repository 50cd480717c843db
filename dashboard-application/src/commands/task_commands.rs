use std::collections::BTreeMap;

use tracing::{error, info};
use url::Url;

use dashboard_domain::{Standard, Task, TaskAttributes};

use crate::dtos::{RuleForm, TaskForm, ValidationErrors};
use crate::{AppError, AppState};

pub async fn create_task(state: &AppState, form: &TaskForm) -> Result<Task, AppError> {
    let attrs = validate_task_form(form).map_err(AppError::Validation)?;
    let task = state
        .webservice
        .create_task(&attrs)
        .await
        .map_err(|err| {
            error!("failed to create task: {}", err);
            AppError::from(err)
        })?;
    info!(task_id = %task.id, url = %task.url, "task created");
    Ok(task)
}

pub async fn edit_task(state: &AppState, id: &str, form: &TaskForm) -> Result<(), AppError> {
    let attrs = validate_task_form(form).map_err(AppError::Validation)?;
    state.webservice.update_task(id, &attrs).await.map_err(|err| {
        error!("failed to edit task {}: {}", id, err);
        AppError::from(err)
    })?;
    info!(task_id = %id, "task edited");
    Ok(())
}

pub async fn delete_task(state: &AppState, id: &str) -> Result<(), AppError> {
    state.webservice.delete_task(id).await.map_err(|err| {
        error!("failed to delete task {}: {}", id, err);
        AppError::from(err)
    })?;
    info!(task_id = %id, "task deleted");
    Ok(())
}

pub async fn run_task(state: &AppState, id: &str) -> Result<(), AppError> {
    state.webservice.run_task(id).await.map_err(|err| {
        error!("failed to run task {}: {}", id, err);
        AppError::from(err)
    })?;
    info!(task_id = %id, "task run requested");
    Ok(())
}

pub async fn ignore_rule(state: &AppState, id: &str, form: &RuleForm) -> Result<(), AppError> {
    let rule = validate_rule(form)?;
    state.webservice.ignore_rule(id, &rule).await.map_err(|err| {
        error!("failed to ignore rule {} on task {}: {}", rule, id, err);
        AppError::from(err)
    })?;
    info!(task_id = %id, rule = %rule, "rule ignored");
    Ok(())
}

pub async fn unignore_rule(state: &AppState, id: &str, form: &RuleForm) -> Result<(), AppError> {
    let rule = validate_rule(form)?;
    state.webservice.unignore_rule(id, &rule).await.map_err(|err| {
        error!("failed to unignore rule {} on task {}: {}", rule, id, err);
        AppError::from(err)
    })?;
    info!(task_id = %id, rule = %rule, "rule unignored");
    Ok(())
}

fn validate_rule(form: &RuleForm) -> Result<String, AppError> {
    let rule = form.rule.trim();
    if rule.is_empty() {
        let mut errors = ValidationErrors::default();
        errors.add("rule", "A rule code is required");
        return Err(AppError::Validation(errors));
    }
    Ok(rule.to_string())
}

pub fn validate_task_form(form: &TaskForm) -> Result<TaskAttributes, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = form.name.trim();
    if name.is_empty() {
        errors.add("name", "A name is required");
    }

    let url = form.url.trim();
    if url.is_empty() {
        errors.add("url", "A URL is required");
    } else if !is_web_url(url) {
        errors.add("url", "Please enter a valid http or https URL");
    }

    let standard = if form.standard.trim().is_empty() {
        Standard::default()
    } else {
        Standard::parse(&form.standard).unwrap_or_else(|| {
            errors.add("standard", "Please choose a valid standard");
            Standard::default()
        })
    };

    let timeout = parse_millis(&form.timeout, "timeout", &mut errors);
    let wait = parse_millis(&form.wait, "wait", &mut errors);
    let headers = parse_headers(&form.headers, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut ignore = Vec::new();
    for rule in split_lines(&form.ignore) {
        if !ignore.contains(&rule) {
            ignore.push(rule);
        }
    }

    Ok(TaskAttributes {
        name: name.to_string(),
        url: url.to_string(),
        standard,
        ignore,
        timeout,
        wait,
        actions: split_lines(&form.actions),
        hide_elements: non_empty(&form.hide_elements),
        headers,
        schedule: non_empty(&form.schedule),
    })
}

fn is_web_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn parse_millis(raw: &str, field: &str, errors: &mut ValidationErrors) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, "Must be a whole number of milliseconds");
            None
        }
    }
}

fn parse_headers(raw: &str, errors: &mut ValidationErrors) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    for line in split_lines(raw) {
        match line.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                headers.insert(name.trim().to_string(), value.trim().to_string());
            }
            _ => errors.add("headers", "Headers must be in the form 'Name: value'"),
        }
    }
    headers
}

fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
