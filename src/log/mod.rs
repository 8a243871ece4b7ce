use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::provider::CompletionRequest;

/// Per-transaction stage artifacts: the instruction pair sent to the
/// text-generation service and the raw response it returned. Diagnostics
/// only; nothing reads these back.
pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

#[derive(Serialize)]
struct StageRecord<'a> {
    stage: &'a str,
    logged_at: DateTime<Utc>,
    model: &'a str,
    system: &'a str,
    user: &'a str,
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join(".deprompt").join("tx").join(tx.to_string())
}

pub fn save_stage(
    stage: &str,
    req: &CompletionRequest,
    raw_response: &str,
    tx: Uuid,
    root: &str,
    save_request: bool,
    save_response: bool,
) -> anyhow::Result<SavedPaths> {
    let dir = tx_dir(Path::new(root), tx);
    fs::create_dir_all(&dir)?;

    let mut request_path = None;
    let mut response_path = None;

    if save_request {
        let record = StageRecord {
            stage,
            logged_at: Utc::now(),
            model: &req.model,
            system: &req.system,
            user: &req.user,
        };
        let p = dir.join(format!("{stage}.request.json"));
        fs::write(&p, to_string_pretty(&record)?)?;
        request_path = Some(p);
    }

    if save_response {
        let p = dir.join(format!("{stage}.response.txt"));
        fs::write(&p, raw_response)?;
        response_path = Some(p);
    }

    Ok(SavedPaths { dir, request: request_path, response: response_path })
}

pub fn print_saved_paths(stage: &str, saved: &SavedPaths) {
    println!("debug[{stage}]: artifacts directory: {}", saved.dir.display());
    if let Some(p) = &saved.request {
        println!("debug[{stage}]: request saved at: {}", p.display());
    } else {
        println!("debug[{stage}]: request not saved (flag off)");
    }
    if let Some(p) = &saved.response {
        println!("debug[{stage}]: response saved at: {}", p.display());
    } else {
        println!("debug[{stage}]: response not saved (flag off)");
    }
    std::io::stdout().flush().ok();
}

pub fn print_stage_debug(stage: &str, req: &CompletionRequest, raw_response: &str) {
    eprintln!(
        "\n===== DEBUG [{stage}]: REQUEST ({}) =====\n[SYSTEM]\n{}\n\n[USER]\n{}\n",
        req.model, req.system, req.user
    );
    eprintln!("===== DEBUG [{stage}]: RAW RESPONSE =====\n{}\n", raw_response);
    std::io::stderr().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> CompletionRequest {
        CompletionRequest {
            system: "sys".into(),
            user: "usr".into(),
            model: "gpt-3.5-turbo".into(),
            max_tokens: None,
        }
    }

    #[test]
    fn save_stage_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let tx = Uuid::new_v4();
        let saved = save_stage("analysis", &req(), "raw body", tx, dir.path().to_str().unwrap(), true, true).unwrap();
        let request = fs::read_to_string(saved.request.unwrap()).unwrap();
        assert!(request.contains("\"stage\": \"analysis\""));
        assert!(request.contains("\"system\": \"sys\""));
        let response = fs::read_to_string(saved.response.unwrap()).unwrap();
        assert_eq!(response, "raw body");
        assert!(saved.dir.ends_with(Path::new(".deprompt/tx").join(tx.to_string())));
    }

    #[test]
    fn save_stage_respects_flags() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_stage("improve", &req(), "x", Uuid::new_v4(), dir.path().to_str().unwrap(), false, false).unwrap();
        assert!(saved.request.is_none());
        assert!(saved.response.is_none());
    }
}
