//! YAML configuration: exclude patterns and scan options.
//!
//! Settings come from built-in defaults, then a global file in the user's
//! home directory, then a file in the scanned project. Later sources win.

pub mod io;
pub mod path;
pub mod structure;

pub use io::{load_config, load_config_file, load_config_from};
pub use path::{global_config_path, global_config_path_in, home_dir, project_config_paths};
pub use structure::{Config, PartialConfig, PartialScanOptions, ScanOptionsConfig};
