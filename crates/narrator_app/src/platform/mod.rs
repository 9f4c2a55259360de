mod app;
mod args;
mod logging;
mod render;

pub use app::run_app;
