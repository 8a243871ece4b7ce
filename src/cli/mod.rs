use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "open-ai", alias = "openai")]
    OpenAI,
    #[value(alias = "anthropic")]
    Anthropic,
    #[value(alias = "ollama")]
    Ollama,
}

/// Pipeline richness. `fast` is the low-latency path: minimal analysis
/// shape, literal fallbacks, templated validation. `full` adds the rich
/// analysis fields, dedicated fallback calls, and live validation.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Fast,
    Full,
}

#[derive(Parser, Debug)]
#[command(name="deprompt", version, about="Prompt engineering assistant: rewrites a prompt for a chosen target model")]
pub struct Args {
    /// The prompt to improve.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Free-text background for the prompt; skipped when gathering
    /// context interactively.
    #[arg(long)]
    pub context: Option<String>,

    /// Target model id the prompt is tuned for; empty means general purpose.
    #[arg(long, default_value = "")]
    pub target_model: String,

    /// Gather context through a question/answer dialog before enhancing.
    #[arg(long, default_value_t = false)]
    pub interactive: bool,

    /// Unset flags defer to the config file, then to built-in defaults.
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub root: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value_t = true)]
    pub save_request: bool,

    #[arg(long, default_value_t = true)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[arg(long, default_value_t = true)]
    pub progress: bool,

    #[arg(long)]
    pub config: Option<String>,
}
