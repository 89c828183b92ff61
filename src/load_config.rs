//! Loads a YAML options file into [`Options`].
//!
//! This is the only place untrusted YAML is parsed. Secrets do not belong in
//! the file; credential fields left out fall back to environment variables
//! during normalization (see [`crate::config`]).

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::config::Options;

/// Read and parse a YAML options file.
pub fn load_options<P: AsRef<Path>>(path: P) -> Result<Options> {
    let path_ref = path.as_ref();
    info!(options_path = ?path_ref, "Loading publish options from file");

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(options_path = ?path_ref, "Options file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, options_path = ?path_ref, "Failed to read options file");
            return Err(anyhow::anyhow!(
                "Failed to read options file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let options: Options = match serde_yaml::from_str(&content) {
        Ok(options) => {
            info!(options_path = ?path_ref, "Parsed options YAML successfully");
            options
        }
        Err(e) => {
            error!(error = ?e, options_path = ?path_ref, "Failed to parse options YAML");
            return Err(anyhow::anyhow!("Failed to parse options YAML: {e}"));
        }
    };

    Ok(options)
}
