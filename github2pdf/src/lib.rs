pub mod cli;

pub use cli::{output_file_name, run, run_with, Cli};
