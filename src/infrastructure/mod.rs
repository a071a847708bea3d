pub mod backlog;
pub mod model;
pub mod transcript;
