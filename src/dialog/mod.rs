use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::knowledge::ModelCatalog;
use crate::prompt;
use crate::provider::{Completion, CompletionRequest};
use crate::wire::{ConversationTurn, DialogOutcome};
use crate::log;

/// Explicit per-call state, derived once from the supplied history. There is
/// no persisted dialog object; the caller replays the full history on every
/// call and COMPLETE is signalled through the outcome, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    AwaitingFirstQuestion,
    AwaitingFollowup,
}

pub fn state_of(history: &[ConversationTurn]) -> DialogState {
    if history.is_empty() {
        DialogState::AwaitingFirstQuestion
    } else {
        DialogState::AwaitingFollowup
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Walks the history two turns at a time (turn 2k = question, 2k+1 = answer).
/// A trailing unanswered question is silently dropped.
pub fn pair_turns(history: &[ConversationTurn]) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    let mut i = 0;
    while i + 1 < history.len() {
        pairs.push(QaPair {
            question: history[i].content.clone(),
            answer: history[i + 1].content.clone(),
        });
        i += 2;
    }
    pairs
}

/// Renders the gathered Q&A as the free-text context block consumed by the
/// enhancement pipeline.
pub fn format_transcript(history: &[ConversationTurn]) -> String {
    pair_turns(history)
        .iter()
        .map(|p| format!("Q: {}\nA: {}", p.question, p.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Context block when the dialog degrades to manual mode: the pairs already
/// gathered, followed by the free-text answer. Neither part is required.
pub fn transcript_with_manual(history: &[ConversationTurn], manual: &str) -> String {
    let transcript = format_transcript(history);
    let manual = manual.trim();
    match (transcript.is_empty(), manual.is_empty()) {
        (true, _) => manual.to_string(),
        (false, true) => transcript,
        (false, false) => format!("{transcript}\n\n{manual}"),
    }
}

const COMPLETE_SENTINEL: &str = "COMPLETE";

/// One dialog turn: decide whether one more clarifying question is needed or
/// the context gathering is done. Transport failures propagate; the caller
/// degrades to manual free-text context instead of retrying.
pub async fn next_question(
    provider: &dyn Completion,
    catalog: &ModelCatalog,
    cfg: &Config,
    history: &[ConversationTurn],
    target_model: &str,
    original_prompt: &str,
    tx: Uuid,
    save_request: bool,
    save_response: bool,
    debug: bool,
) -> Result<DialogOutcome> {
    let considerations = catalog.lookup(target_model).considerations;
    let state = state_of(history);

    let system = match state {
        DialogState::AwaitingFirstQuestion => {
            prompt::system_prompt_first_question(original_prompt, &considerations)
        }
        DialogState::AwaitingFollowup => {
            let qa_json = serde_json::to_string_pretty(&pair_turns(history))?;
            prompt::system_prompt_followup(original_prompt, &qa_json, &considerations)
        }
    };

    let req = CompletionRequest {
        system,
        user: prompt::user_prompt_next_question(),
        model: cfg.question_model.clone(),
        max_tokens: None,
    };

    let raw = provider.complete(&req, debug).await?;
    let saved = log::save_stage("question", &req, &raw, tx, &cfg.root, save_request, save_response)?;
    if debug {
        log::print_saved_paths("question", &saved);
        log::print_stage_debug("question", &req, &raw);
    }

    let text = raw.trim();
    // The first-question instruction cannot produce the sentinel, so the
    // first turn never completes.
    if state == DialogState::AwaitingFollowup && text.eq_ignore_ascii_case(COMPLETE_SENTINEL) {
        return Ok(DialogOutcome::Complete);
    }
    Ok(DialogOutcome::Question(text.to_string()))
}
