pub mod environment;
pub mod logging;
pub mod paths;
pub mod terminal;

pub use environment::get_data_dir;
pub use paths::{expand_tilde, format_path_with_tilde, validate_file_size, write_atomic};
pub use terminal::{preview_line, strip_ansi_codes};
