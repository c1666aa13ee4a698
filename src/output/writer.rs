use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use super::filename::summary_filename;
use crate::api::{LawDetail, LawSummary};
use crate::error::{Result, TaxlawError};

/// Render a law body the way it is stored on disk: two-space indented JSON,
/// original key order, non-ASCII left as is, trailing newline.
pub fn render_law_json(body: &serde_json::Value) -> Result<String> {
    let mut json = serde_json::to_string_pretty(body)?;
    json.push('\n');
    Ok(json)
}

/// Write one law into `output_dir`, replacing any previous file of the same name
pub fn write_law(output_dir: &Path, summary: &LawSummary, detail: &LawDetail) -> Result<PathBuf> {
    let path = output_dir.join(summary_filename(summary));
    let json = render_law_json(&detail.body)?;

    fs::write(&path, json).map_err(|e| TaxlawError::io(&path, e))?;
    debug!("Wrote {} ({})", path.display(), detail.lookup.as_str());

    Ok(path)
}

/// Create the output directory and its parents
pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|e| TaxlawError::io(output_dir, e))
}
