pub mod jobs;

pub use jobs::{register_refresh_jobs, RefreshServices};
