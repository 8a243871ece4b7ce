use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{Args, ProviderKind, Variant};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    pub root: String,
    pub deprompt_out: String,
    pub provider: ProviderKind,
    pub variant: Variant,
    /// Per-stage model ids: analysis/improvement run on a cheap model,
    /// question generation on a reasoning model.
    pub analysis_model: String,
    pub improve_model: String,
    pub question_model: String,
    pub validation_model: String,
    pub max_analysis_tokens: u32,
    pub max_improve_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: "2026-08-01".into(),
            root: ".".into(),
            deprompt_out: ".deprompt".into(),
            provider: ProviderKind::OpenAI,
            variant: Variant::Full,
            analysis_model: "gpt-3.5-turbo".into(),
            improve_model: "gpt-3.5-turbo".into(),
            question_model: "o3-mini".into(),
            validation_model: "gpt-4o-mini".into(),
            max_analysis_tokens: 300,
            max_improve_tokens: 1000,
            timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let raw = fs_err::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        let cfg: Config =
            toml::from_str(&raw).with_context(|| format!("failed to parse config file {path}"))?;
        Ok(cfg)
    }

    /// Flags the user actually passed win over file values; unset flags
    /// leave the file (or default) value alone.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(root) = &args.root {
            self.root = root.clone();
        }
        if let Some(provider) = args.provider {
            self.provider = provider;
        }
        if let Some(variant) = args.variant {
            self.variant = variant;
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: Config = toml::from_str("variant = \"fast\"\nquestion_model = \"o1\"").unwrap();
        assert_eq!(cfg.variant, Variant::Fast);
        assert_eq!(cfg.question_model, "o1");
        assert_eq!(cfg.analysis_model, "gpt-3.5-turbo");
        assert_eq!(cfg.timeout_secs, 120);
    }

    #[test]
    fn file_values_survive_unset_cli_flags() {
        use clap::Parser;
        let mut cfg: Config = toml::from_str("variant = \"fast\"\ntimeout_secs = 5").unwrap();
        let args = Args::parse_from(["deprompt", "--prompt", "p"]);
        cfg.apply_args(&args);
        assert_eq!(cfg.variant, Variant::Fast);
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.root, ".");
    }

    #[test]
    fn explicit_cli_flags_override_file_values() {
        use clap::Parser;
        let mut cfg: Config = toml::from_str("variant = \"fast\"\ntimeout_secs = 5").unwrap();
        let args = Args::parse_from([
            "deprompt", "--variant", "full", "--timeout-secs", "30", "--root", "/tmp/x",
        ]);
        cfg.apply_args(&args);
        assert_eq!(cfg.variant, Variant::Full);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.root, "/tmp/x");
    }

    #[test]
    fn load_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deprompt.toml");
        fs_err::write(&path, "improve_model = \"gpt-4o\"").unwrap();
        let cfg = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.improve_model, "gpt-4o");
    }
}
