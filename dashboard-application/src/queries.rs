pub mod result_queries;
pub mod task_queries;
