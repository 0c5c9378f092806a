use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the subcommand and its resolved parameters.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self { command, params }
    }
}

/// Provenance document shared by sidecars and `polyvol report`.
#[track_caller]
pub fn document(payload: &Payload, outputs: &[String]) -> Value {
    let callsite = Location::caller();
    json!({
        "code_rev": code_rev(),
        "polyvol_version": polyvol::VERSION,
        "command": payload.command,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "params": payload.params,
        "outputs": outputs
    })
}

/// Write `<artifact>.provenance.json` next to `artifact`.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let doc = document(&payload, &[artifact.display().to_string()]);
    let sidecar = sidecar_path(artifact);
    if let Some(dir) = sidecar.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(&doc)?;
    fs::write(&sidecar, bytes).with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

/// `runs/cube10.json` → `runs/cube10.provenance.json`.
fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// Commit the binary was built from: `GIT_COMMIT` at build time, then at
/// run time, then `git rev-parse HEAD`.
pub fn code_rev() -> String {
    let built = option_env!("GIT_COMMIT").map(str::to_owned);
    let runtime = std::env::var("GIT_COMMIT").ok();
    [built, runtime]
        .into_iter()
        .flatten()
        .find(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_owned())
}
