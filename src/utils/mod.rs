//! Small helpers shared by the dashboard, the API and the CLI.

pub mod format;
