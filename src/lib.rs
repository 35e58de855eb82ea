pub mod app;
pub mod clock;
pub mod config;
pub mod duration;
pub mod extract;
pub mod models;
pub mod scan;
pub mod source;
pub mod storage;
