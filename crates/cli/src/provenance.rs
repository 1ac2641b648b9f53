//! `<trace>.provenance.json`: what produced a replay trace and with which setup.

use crate::script::{RunSetup, Trace};
use anyhow::{Context, Result};
use quadrilateral::api::NamedQuadrilateralCategory;
use serde::{Deserialize, Serialize};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callsite {
    pub file: String,
    pub line: u32,
}

/// Sidecar written next to every replay trace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplaySidecar {
    pub code_rev: String,
    pub library_version: String,
    pub callsite: Callsite,
    pub script: PathBuf,
    pub setup: RunSetup,
    pub ticks: usize,
    pub changes: usize,
    pub final_category: NamedQuadrilateralCategory,
    pub trace: PathBuf,
}

impl ReplaySidecar {
    #[track_caller]
    pub fn describe(script: &Path, trace_path: &Path, trace: &Trace) -> Self {
        let here = Location::caller();
        Self {
            code_rev: code_rev(),
            library_version: quadrilateral::VERSION.to_string(),
            callsite: Callsite {
                file: here.file().to_string(),
                line: here.line(),
            },
            script: script.to_path_buf(),
            setup: trace.setup.clone(),
            ticks: trace.ticks.len(),
            changes: trace.changes.len(),
            final_category: trace
                .ticks
                .last()
                .map_or(trace.initial_category, |t| t.category),
            trace: trace_path.to_path_buf(),
        }
    }

    /// Write the sidecar beside `self.trace` and return its path.
    pub fn write(&self) -> Result<PathBuf> {
        let path = sidecar_path(&self.trace);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        fs::write(&path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

/// `runs/trace.json` -> `runs/trace.provenance.json`.
pub fn sidecar_path(trace: &Path) -> PathBuf {
    let stem = trace
        .file_stem()
        .map_or_else(|| "trace".into(), |s| s.to_string_lossy().into_owned());
    trace.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
pub fn code_rev() -> String {
    let baked = option_env!("GIT_COMMIT").map(str::to_string);
    let runtime = std::env::var("GIT_COMMIT").ok();
    baked
        .into_iter()
        .chain(runtime)
        .find(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_string())
}
