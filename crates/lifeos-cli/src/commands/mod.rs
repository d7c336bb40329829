pub mod config;
pub mod dashboard;
pub mod finance;
pub mod goal;
pub mod memory;
pub mod mentor;
pub mod report;
pub mod review;
pub mod settings;
pub mod task;
