//! Presentation layer: terminal output for the CLI.

pub mod report;

pub use report::{describe_image, render_showcase, render_thumbnails, save_png};
