//! Project-file save/load.
//!
//! A project file is a single JSON document. Load is atomic: the incoming
//! text is fully parsed and validated before the caller ever sees a
//! `Project`, so a malformed file can never half-replace a live model.

use loopscene_core::{LoopsceneError, LoopsceneResult};

use crate::project::Project;
use crate::validate::validate_project;

/// Serialize a project to its on-disk JSON form.
///
/// Struct field order is fixed, so the same project always yields the same
/// bytes.
pub fn to_json_string(project: &Project) -> LoopsceneResult<String> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Parse and validate a project file. Returns the new project only if the
/// whole document is well-formed; otherwise the caller's live project is
/// left untouched.
pub fn from_json_str(text: &str) -> LoopsceneResult<Project> {
    let project: Project = serde_json::from_str(text)?;
    validate_project(&project).map_err(|errors| {
        LoopsceneError::Validation(
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        )
    })?;
    Ok(project)
}
