use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use dashboard_domain::{Task, TaskResult};

/// Raw task form as posted by the browser. Everything is a string so that
/// a half-filled form can be echoed back untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    pub name: String,
    pub url: String,
    pub standard: String,
    pub timeout: String,
    pub wait: String,
    pub ignore: String,
    pub actions: String,
    pub hide_elements: String,
    pub headers: String,
    pub schedule: String,
}

impl TaskForm {
    pub fn from_task(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            url: task.url.clone(),
            standard: task.standard.as_str().to_string(),
            timeout: task.timeout.map(|v| v.to_string()).unwrap_or_default(),
            wait: task.wait.map(|v| v.to_string()).unwrap_or_default(),
            ignore: task.ignore.join("\n"),
            actions: task.actions.join("\n"),
            hide_elements: task.hide_elements.clone().unwrap_or_default(),
            headers: task
                .headers
                .iter()
                .map(|(name, value)| format!("{}: {}", name, value))
                .collect::<Vec<_>>()
                .join("\n"),
            schedule: task.schedule.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleForm {
    pub rule: String,
}

/// Field name to message, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    pub task: Task,
    pub results: Vec<TaskResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultDetail {
    pub task: Task,
    pub result: TaskResult,
}
