use anyhow::{Context, Result};
use uuid::Uuid;

use crate::cli::Variant;
use crate::config::Config;
use crate::knowledge::ModelCatalog;
use crate::log;
use crate::prompt;
use crate::provider::{Completion, CompletionRequest};
use crate::wire::{decode_or_default, ContextAnalysis, ImprovementResult};

pub mod sections;

/// Fast-variant literals for sections the improver left empty; the full
/// variant issues dedicated follow-up calls instead.
const DEFAULT_EXPLANATION: &str =
    "The improved prompt enhances clarity, structure, and context specificity.";
const DEFAULT_CONSIDERATIONS: &str =
    "Consider refining this prompt further based on specific model responses.";

/// The enhancement pipeline: context analysis, prompt improvement, fallback
/// fills for missing sections, validation, assembly. Strictly sequential per
/// stage; only the two independent fallback calls overlap. All dependencies
/// are injected at construction, nothing here is process-global.
pub struct Enhancer<'a> {
    pub provider: &'a dyn Completion,
    pub catalog: &'a ModelCatalog,
    pub cfg: &'a Config,
}

/// Per-run knobs carried alongside the transaction id.
#[derive(Debug, Clone, Copy)]
pub struct RunOpts {
    pub tx: Uuid,
    pub save_request: bool,
    pub save_response: bool,
    pub debug: bool,
}

impl<'a> Enhancer<'a> {
    /// Runs the whole pipeline. Returns a fully populated result or the
    /// first propagated failure; never a partial result.
    pub async fn enhance(
        &self,
        original_prompt: &str,
        context: &str,
        target_model: &str,
        opts: RunOpts,
    ) -> Result<ImprovementResult> {
        let analysis = self.analyze(context, original_prompt, opts).await?;

        let profile = self.catalog.lookup(target_model);
        let model_note = profile.considerations_first_line().to_string();

        let improve_req = CompletionRequest {
            system: prompt::system_prompt_improve(&analysis, &model_note),
            user: prompt::user_prompt_improve(original_prompt),
            model: self.cfg.improve_model.clone(),
            max_tokens: Some(self.cfg.max_improve_tokens),
        };
        let raw = self
            .stage_call("improve", &improve_req, opts)
            .await
            .context("error generating improved prompt")?;
        let split = sections::split_sections(&raw);

        let (explanation, considerations) = self
            .resolve_commentary(original_prompt, &split, opts)
            .await?;

        let validation_report = match self.cfg.variant {
            Variant::Fast => prompt::templated_validation_report(),
            Variant::Full => {
                let analysis_json = serde_json::to_string_pretty(&analysis)?;
                let req = CompletionRequest {
                    system: prompt::system_prompt_validation(
                        context,
                        original_prompt,
                        &split.improved_prompt,
                        &analysis_json,
                        target_model,
                        &analysis.domain,
                    ),
                    user: "Evaluate the improved prompt.".to_string(),
                    model: self.cfg.validation_model.clone(),
                    max_tokens: None,
                };
                self.stage_call("validation", &req, opts)
                    .await
                    .context("error validating improved prompt")?
            }
        };

        // Pure aggregation; every field is populated by now.
        Ok(ImprovementResult {
            analysis,
            improved_prompt: split.improved_prompt,
            explanation,
            considerations,
            validation_report,
        })
    }

    /// One structured-analysis call. Decode failures never propagate: the
    /// fixed fallback record is substituted and the raw text is kept as a
    /// diagnostic on stderr.
    async fn analyze(
        &self,
        context: &str,
        original_prompt: &str,
        opts: RunOpts,
    ) -> Result<ContextAnalysis> {
        let system = match self.cfg.variant {
            Variant::Fast => prompt::system_prompt_analysis_fast(),
            Variant::Full => prompt::system_prompt_analysis_full(),
        };
        let req = CompletionRequest {
            system,
            user: prompt::user_prompt_analysis(context, original_prompt),
            model: self.cfg.analysis_model.clone(),
            max_tokens: Some(self.cfg.max_analysis_tokens),
        };
        let raw = self
            .stage_call("analysis", &req, opts)
            .await
            .context("error analyzing context")?;

        let (mut analysis, diag) = decode_or_default(&raw, ContextAnalysis::fallback());
        if let Some(diag) = diag {
            eprintln!("warn[analysis]: using fallback analysis: {diag}");
        }
        let cap = match self.cfg.variant {
            Variant::Fast => Some(3),
            Variant::Full => None,
        };
        analysis.normalize(cap);
        Ok(analysis)
    }

    /// Two-stage resolution for explanation/considerations: take the
    /// improver's section when non-empty, otherwise synthesize it from the
    /// (original, improved) pair. The two synth calls are independent and
    /// run concurrently when both are needed; in the full variant their
    /// failures fail the request.
    async fn resolve_commentary(
        &self,
        original_prompt: &str,
        split: &sections::Sections,
        opts: RunOpts,
    ) -> Result<(String, String)> {
        if self.cfg.variant == Variant::Fast {
            let explanation = if split.explanation.is_empty() {
                DEFAULT_EXPLANATION.to_string()
            } else {
                split.explanation.clone()
            };
            let considerations = if split.considerations.is_empty() {
                DEFAULT_CONSIDERATIONS.to_string()
            } else {
                split.considerations.clone()
            };
            return Ok((explanation, considerations));
        }

        let pair = prompt::user_prompt_pair(original_prompt, &split.improved_prompt);
        let explanation_req = CompletionRequest {
            system: prompt::system_prompt_explanation(),
            user: pair.clone(),
            model: self.cfg.improve_model.clone(),
            max_tokens: None,
        };
        let considerations_req = CompletionRequest {
            system: prompt::system_prompt_considerations(),
            user: pair,
            model: self.cfg.improve_model.clone(),
            max_tokens: None,
        };

        match (split.explanation.is_empty(), split.considerations.is_empty()) {
            (false, false) => Ok((split.explanation.clone(), split.considerations.clone())),
            (true, false) => {
                let e = self.stage_call("explanation", &explanation_req, opts).await?;
                Ok((e.trim().to_string(), split.considerations.clone()))
            }
            (false, true) => {
                let c = self.stage_call("considerations", &considerations_req, opts).await?;
                Ok((split.explanation.clone(), c.trim().to_string()))
            }
            (true, true) => {
                let (e, c) = futures::join!(
                    self.stage_call("explanation", &explanation_req, opts),
                    self.stage_call("considerations", &considerations_req, opts),
                );
                Ok((e?.trim().to_string(), c?.trim().to_string()))
            }
        }
    }

    async fn stage_call(
        &self,
        stage: &str,
        req: &CompletionRequest,
        opts: RunOpts,
    ) -> Result<String> {
        let raw = self.provider.complete(req, opts.debug).await?;
        let saved = log::save_stage(
            stage,
            req,
            &raw,
            opts.tx,
            &self.cfg.root,
            opts.save_request,
            opts.save_response,
        )?;
        if opts.debug {
            log::print_saved_paths(stage, &saved);
            log::print_stage_debug(stage, req, &raw);
        }
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{ComplexityLevel, FormatType};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Scripted {
        responses: Mutex<Vec<Result<String, String>>>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<String, String>>) -> Self {
            Self { responses: Mutex::new(responses), seen: Mutex::new(Vec::new()) }
        }

        fn stages_seen(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.system.lines().next().unwrap_or("").to_string())
                .collect()
        }
    }

    #[async_trait]
    impl Completion for Scripted {
        async fn complete(&self, req: &CompletionRequest, _debug: bool) -> Result<String> {
            self.seen.lock().unwrap().push(req.clone());
            let mut responses = self.responses.lock().unwrap();
            assert!(!responses.is_empty(), "unexpected extra call: {}", req.system);
            match responses.remove(0) {
                Ok(s) => Ok(s),
                Err(e) => Err(anyhow::anyhow!(e)),
            }
        }
    }

    const ANALYSIS_JSON: &str = r#"{"domain":"content marketing","critical_requirements":["SEO friendly"],"format_type":"creative","complexity_level":"low"}"#;
    const THREE_SECTIONS: &str = "[Improved Prompt]\nWrite a 1200-word blog post about Rust.\n---\n[Explanation of Changes]\nAdded length and audience.\n---\n[Additional Considerations]\nTry a different tone for social media.";

    fn cfg(variant: Variant, dir: &std::path::Path) -> Config {
        Config {
            variant,
            root: dir.to_str().unwrap().to_string(),
            ..Config::default()
        }
    }

    fn opts() -> RunOpts {
        RunOpts { tx: Uuid::new_v4(), save_request: false, save_response: false, debug: false }
    }

    #[tokio::test]
    async fn full_pipeline_populates_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Scripted::new(vec![
            Ok(ANALYSIS_JSON.into()),
            Ok(THREE_SECTIONS.into()),
            Ok("COMPLETENESS: 9/10\nFinal confidence score: 0.91".into()),
        ]);
        let catalog = ModelCatalog::builtin();
        let cfg = cfg(Variant::Full, dir.path());
        let enhancer = Enhancer { provider: &provider, catalog: &catalog, cfg: &cfg };

        let result = enhancer
            .enhance("Write a blog post", "", "gpt-4o", opts())
            .await
            .unwrap();

        assert_eq!(result.analysis.domain, "content marketing");
        assert_eq!(result.analysis.format_type, FormatType::Creative);
        assert_eq!(result.improved_prompt, "Write a 1200-word blog post about Rust.");
        assert_ne!(result.improved_prompt, "Write a blog post");
        assert_eq!(result.explanation, "Added length and audience.");
        assert_eq!(result.considerations, "Try a different tone for social media.");
        assert!(result.validation_report.contains("0.91"));

        // Improvement instruction embeds the analysis and the model note.
        let seen = provider.seen.lock().unwrap();
        assert!(seen[1].system.contains("content marketing"));
        assert!(seen[1].system.contains("Model note: - Superior performance"));
        assert!(seen[2].system.contains("Target model: gpt-4o"));
    }

    #[tokio::test]
    async fn unparseable_analysis_is_absorbed_into_the_fallback_record() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Scripted::new(vec![
            Ok("I could not produce JSON, sorry.".into()),
            Ok(THREE_SECTIONS.into()),
            Ok("report".into()),
        ]);
        let catalog = ModelCatalog::builtin();
        let cfg = cfg(Variant::Full, dir.path());
        let enhancer = Enhancer { provider: &provider, catalog: &catalog, cfg: &cfg };

        let result = enhancer.enhance("prompt", "ctx", "", opts()).await.unwrap();
        assert_eq!(result.analysis.domain, "general");
        assert_eq!(result.analysis.complexity_level, ComplexityLevel::Medium);
        assert_eq!(result.analysis.critical_requirements.len(), 3);
        assert!(!result.improved_prompt.is_empty());
    }

    #[tokio::test]
    async fn missing_sections_trigger_concurrent_fallback_calls_in_full_variant() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Scripted::new(vec![
            Ok(ANALYSIS_JSON.into()),
            Ok("[Improved Prompt]\nImproved text without the other sections.".into()),
            Ok("Synthesized explanation.".into()),
            Ok("Synthesized considerations.".into()),
            Ok("report".into()),
        ]);
        let catalog = ModelCatalog::builtin();
        let cfg = cfg(Variant::Full, dir.path());
        let enhancer = Enhancer { provider: &provider, catalog: &catalog, cfg: &cfg };

        let result = enhancer.enhance("prompt", "", "", opts()).await.unwrap();
        assert_eq!(result.improved_prompt, "Improved text without the other sections.");
        assert_eq!(result.explanation, "Synthesized explanation.");
        assert_eq!(result.considerations, "Synthesized considerations.");

        let stages = provider.stages_seen();
        assert!(stages[2].contains("explaining a prompt rewrite"));
        assert!(stages[3].contains("advising on a rewritten prompt"));
    }

    #[tokio::test]
    async fn fast_variant_uses_literal_fallbacks_and_templated_validation() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Scripted::new(vec![
            Ok(ANALYSIS_JSON.into()),
            Ok("[Improved Prompt]\nBetter prompt.".into()),
        ]);
        let catalog = ModelCatalog::builtin();
        let cfg = cfg(Variant::Fast, dir.path());
        let enhancer = Enhancer { provider: &provider, catalog: &catalog, cfg: &cfg };

        let result = enhancer.enhance("prompt", "", "gpt-4o-mini", opts()).await.unwrap();
        assert_eq!(result.explanation, DEFAULT_EXPLANATION);
        assert_eq!(result.considerations, DEFAULT_CONSIDERATIONS);
        assert!(result.validation_report.contains("Final confidence score: 0.85"));
        // Exactly two service calls: analysis and improvement.
        assert_eq!(provider.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn fast_variant_caps_requirements_at_three() {
        let dir = tempfile::tempdir().unwrap();
        let many = r#"{"domain":"d","critical_requirements":["1","2","3","4","5"],"format_type":"other","complexity_level":"high"}"#;
        let provider = Scripted::new(vec![Ok(many.into()), Ok(THREE_SECTIONS.into())]);
        let catalog = ModelCatalog::builtin();
        let cfg = cfg(Variant::Fast, dir.path());
        let enhancer = Enhancer { provider: &provider, catalog: &catalog, cfg: &cfg };

        let result = enhancer.enhance("p", "", "", opts()).await.unwrap();
        assert_eq!(result.analysis.critical_requirements, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn improvement_failure_fails_the_whole_request() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Scripted::new(vec![
            Ok(ANALYSIS_JSON.into()),
            Err("quota exceeded".into()),
        ]);
        let catalog = ModelCatalog::builtin();
        let cfg = cfg(Variant::Full, dir.path());
        let enhancer = Enhancer { provider: &provider, catalog: &catalog, cfg: &cfg };

        let err = enhancer.enhance("p", "", "", opts()).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("error generating improved prompt"));
        assert!(msg.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn empty_improver_output_still_yields_the_documented_literal() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Scripted::new(vec![Ok(ANALYSIS_JSON.into()), Ok("".into())]);
        let catalog = ModelCatalog::builtin();
        let cfg = cfg(Variant::Fast, dir.path());
        let enhancer = Enhancer { provider: &provider, catalog: &catalog, cfg: &cfg };

        let result = enhancer.enhance("p", "", "", opts()).await.unwrap();
        assert_eq!(result.improved_prompt, sections::NO_IMPROVED_PROMPT);
    }
}
