pub mod filename;
pub mod report;
pub mod writer;

pub use filename::{law_filename, sanitize_component, summary_filename};
pub use report::format_report;
pub use writer::{ensure_output_dir, render_law_json, write_law};
