//! Loader for the end-to-end cases under `tests/programs/`.
//!
//! A case is a directory with a `case.yaml` descriptor next to the
//! `program.mpy` source it describes, plus whatever expectation files the
//! descriptor names. Directories without a descriptor are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseClass {
    RuntimeSuccess,
    FrontendError,
    RuntimeError,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Expectations {
    pub exit_code: i32,
    pub stdout_file: Option<String>,
    pub stderr_contains: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaseDescriptor {
    pub class: CaseClass,
    pub expected: Expectations,
}

#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub dir: PathBuf,
    pub program_path: PathBuf,
    pub descriptor: CaseDescriptor,
}

impl Case {
    /// Reads an expectation file named by the descriptor, relative to the
    /// case directory.
    pub fn read_text(&self, file_name: &str) -> Result<String> {
        let path = self.dir.join(file_name);
        fs::read_to_string(&path)
            .with_context(|| format!("Case '{}': cannot read {}", self.name, path.display()))
    }
}

pub fn load_cases(root: &Path) -> Result<Vec<Case>> {
    let listing =
        fs::read_dir(root).with_context(|| format!("Listing case root {}", root.display()))?;

    let mut cases = Vec::new();
    for candidate in listing {
        if let Some(case) = probe_case_dir(&candidate?.path())? {
            cases.push(case);
        }
    }
    ensure!(!cases.is_empty(), "Case root {} holds no cases", root.display());

    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

/// Turns one directory entry into a case, or `None` when it is not a case
/// directory at all.
fn probe_case_dir(dir: &Path) -> Result<Option<Case>> {
    let descriptor_path = dir.join("case.yaml");
    if !dir.is_dir() || !descriptor_path.exists() {
        return Ok(None);
    }

    let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
        bail!("Case directory {} has a non-UTF-8 name", dir.display());
    };
    let program_path = dir.join("program.mpy");
    ensure!(
        program_path.exists(),
        "Case '{name}' has a descriptor but no program.mpy"
    );

    let raw = fs::read_to_string(&descriptor_path)
        .with_context(|| format!("Case '{name}': cannot read case.yaml"))?;
    let descriptor = serde_yaml::from_str(&raw)
        .with_context(|| format!("Case '{name}': malformed case.yaml"))?;

    Ok(Some(Case {
        name: name.to_string(),
        dir: dir.to_path_buf(),
        program_path,
        descriptor,
    }))
}
