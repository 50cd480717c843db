pub mod task_commands;
