pub mod archive;
pub mod dispatch;
pub mod jobs;
pub mod operations;
pub mod photos;
