pub mod fallback_handlers;
pub mod home_handlers;
pub mod result_handlers;
pub mod task_handlers;
