// Task entity
// A configured accessibility test target, owned by pa11y-webservice

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::task_result::TaskResult;
use crate::value_objects::Standard;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub standard: Standard,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<u64>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_elements: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_result: Option<TaskResult>,
}

impl Task {
    pub fn ignores(&self, rule: &str) -> bool {
        self.ignore.iter().any(|item| item == rule)
    }
}

/// Writable task fields, sent on create and edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttributes {
    pub name: String,
    pub url: String,
    pub standard: Standard,
    pub ignore: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait: Option<u64>,
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_elements: Option<String>,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

impl From<&Task> for TaskAttributes {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            url: task.url.clone(),
            standard: task.standard,
            ignore: task.ignore.clone(),
            timeout: task.timeout,
            wait: task.wait,
            actions: task.actions.clone(),
            hide_elements: task.hide_elements.clone(),
            headers: task.headers.clone(),
            schedule: task.schedule.clone(),
        }
    }
}
