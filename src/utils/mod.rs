pub mod environment;
pub mod paths;
pub mod terminal;
pub mod timestamps;

pub use environment::{get_claude_dir, get_projects_dir};
pub use paths::{format_path_with_tilde, shell_quote};
pub use terminal::strip_ansi_codes;
pub use timestamps::{format_relative_timestamp, format_timestamp};
