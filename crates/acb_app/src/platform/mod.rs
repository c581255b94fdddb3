mod app;
mod config;
mod effects;
mod files;
mod tabulate;
mod ui;

pub use app::run_app;
