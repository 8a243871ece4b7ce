use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use uuid::Uuid;

mod cli;
mod config;
mod dialog;
mod errors;
mod knowledge;
mod log;
mod pipeline;
mod prompt;
mod provider;
mod ux;
mod wire;

use pipeline::RunOpts;
use wire::{ConversationTurn, DialogOutcome, Role};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = cli::Args::parse();

    let mut cfg = match &args.config {
        Some(path) => config::Config::load(path)?,
        None => config::Config::default(),
    };
    cfg.apply_args(&args);

    let tx = Uuid::new_v4();
    if args.debug {
        println!("debug: flag enabled; transaction {tx}");
    }

    let prov = provider::make_provider(cfg.provider, cfg.timeout_secs)?;
    let catalog = knowledge::ModelCatalog::builtin();
    if args.debug {
        println!("debug: {} model profiles loaded", catalog.known_ids().len());
    }

    let original_prompt = match &args.prompt {
        Some(p) if !p.trim().is_empty() => p.clone(),
        _ => ux::ask("What prompt should be improved?"),
    };
    if original_prompt.trim().is_empty() {
        anyhow::bail!("no prompt provided");
    }

    let opts = RunOpts {
        tx,
        save_request: args.save_request,
        save_response: args.save_response,
        debug: args.debug,
    };

    let mut context = args.context.clone().unwrap_or_default();
    if args.interactive {
        let mut history: Vec<ConversationTurn> = Vec::new();
        let block = match gather_context(
            prov.as_ref(), &catalog, &cfg, &args.target_model, &original_prompt, opts, &mut history,
        )
        .await
        {
            Ok(()) => dialog::format_transcript(&history),
            // Dialog degrades to manual mode: report, take free text, and
            // keep whatever was already answered.
            Err(e) => {
                eprintln!("Context dialog unavailable ({e}); switching to manual context.");
                let manual = ux::ask("Describe your use case and any constraints (free text):");
                dialog::transcript_with_manual(&history, &manual)
            }
        };
        if !block.is_empty() {
            context = if context.is_empty() {
                block
            } else {
                format!("{context}\n\n{block}")
            };
        }
    }

    let spinner = (args.progress && !args.debug).then(|| {
        let s = ProgressBar::new_spinner();
        s.set_style(ProgressStyle::default_spinner());
        s.set_message("Enhancing prompt...");
        s.enable_steady_tick(Duration::from_millis(120));
        s
    });

    let enhancer = pipeline::Enhancer { provider: prov.as_ref(), catalog: &catalog, cfg: &cfg };
    let result = enhancer.enhance(&original_prompt, &context, &args.target_model, opts).await;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    ux::show_result(&result?);
    Ok(())
}

/// Question/answer loop over the stateless dialog: the full history is
/// replayed into every call, and the loop ends on the completion signal or
/// an empty answer (the dangling question is then dropped from the
/// transcript). The caller owns the history so answered pairs survive a
/// mid-dialog failure.
async fn gather_context(
    provider: &dyn provider::Completion,
    catalog: &knowledge::ModelCatalog,
    cfg: &config::Config,
    target_model: &str,
    original_prompt: &str,
    opts: RunOpts,
    history: &mut Vec<ConversationTurn>,
) -> anyhow::Result<()> {
    println!("Gathering context; answer each question, or press Enter to stop.\n");

    loop {
        let outcome = dialog::next_question(
            provider,
            catalog,
            cfg,
            history,
            target_model,
            original_prompt,
            opts.tx,
            opts.save_request,
            opts.save_response,
            opts.debug,
        )
        .await?;

        match outcome {
            DialogOutcome::Complete => {
                println!("Context gathering complete.\n");
                break;
            }
            DialogOutcome::Question(q) => {
                let answer = ux::ask(&q);
                history.push(ConversationTurn { role: Role::System, content: q });
                if answer.is_empty() {
                    break;
                }
                history.push(ConversationTurn { role: Role::User, content: answer });
            }
        }
    }

    Ok(())
}
