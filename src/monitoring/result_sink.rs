//! Run report persistence
//!
//! One JSON document per run, 2-space indented, overwriting the previous
//! file at the same path.

use crate::monitoring::types::RunReport;
use crate::utils::AppError;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub struct ResultSink;

impl ResultSink {
    /// Write `report` to `path`, logging instead of failing on errors
    pub fn save(report: &RunReport, path: &Path) {
        match Self::try_save(report, path) {
            Ok(()) => info!(path = %path.display(), "Results saved"),
            Err(e) => error!(path = %path.display(), error = %e, "Error saving results"),
        }
    }

    pub fn try_save(report: &RunReport, path: &Path) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a previously saved report
    pub fn load(path: &Path) -> Result<RunReport, AppError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
