use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use parley_llm::{CompletionRequest, ConversationTurn};

/// Parley chat client
#[derive(Debug, Parser)]
#[command(name = "parley", about = "Chat with OpenAI and Anthropic models through one interface")]
pub struct Args {
    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "parley.toml", env = "PARLEY_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send one prompt to one provider
    Chat(ChatArgs),
    /// Send one prompt to both providers concurrently
    Compare(CompareArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    Openai,
    Anthropic,
}

#[derive(Debug, clap::Args)]
pub struct ChatArgs {
    /// Provider to talk to
    #[arg(short, long, value_enum, env = "PARLEY_PROVIDER")]
    pub provider: Provider,

    /// Model override
    #[arg(short, long)]
    pub model: Option<String>,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Request visible reasoning
    #[arg(long)]
    pub reasoning: bool,

    /// Reasoning token budget (Anthropic only)
    #[arg(long, requires = "reasoning")]
    pub budget: Option<u32>,

    /// System prompt
    #[arg(long)]
    pub system: Option<String>,

    /// Print deltas as they arrive
    #[arg(long)]
    pub stream: bool,

    pub prompt: String,
}

impl ChatArgs {
    pub fn to_request(&self) -> CompletionRequest {
        let mut conversation = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            conversation.push(ConversationTurn::system(system.as_str()));
        }
        conversation.push(ConversationTurn::user(self.prompt.as_str()));

        let mut request = CompletionRequest::new(conversation)
            .with_reasoning(self.reasoning)
            .with_stream(self.stream);
        request.model.clone_from(&self.model);
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;
        request.reasoning_budget = self.budget;
        request
    }
}

#[derive(Debug, clap::Args)]
pub struct CompareArgs {
    /// Request visible reasoning from both providers
    #[arg(long)]
    pub reasoning: bool,

    /// Read both replies as streams
    #[arg(long)]
    pub stream: bool,

    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use parley_llm::Role;

    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn chat_flags_build_the_request() {
        let args = parse(&[
            "parley",
            "chat",
            "--provider",
            "anthropic",
            "--model",
            "claude-opus-4-1",
            "--max-tokens",
            "256",
            "--reasoning",
            "--budget",
            "2048",
            "--system",
            "be brief",
            "why is the sky blue?",
        ]);

        let Command::Chat(chat) = args.command else {
            panic!("expected chat");
        };
        assert_eq!(chat.provider, Provider::Anthropic);

        let request = chat.to_request();
        assert_eq!(request.model.as_deref(), Some("claude-opus-4-1"));
        assert_eq!(request.max_tokens, Some(256));
        assert_eq!(request.temperature, None);
        assert!(request.reasoning_enabled);
        assert_eq!(request.reasoning_budget, Some(2048));
        assert_eq!(request.conversation.len(), 2);
        assert_eq!(request.conversation[0].role, Role::System);
        assert_eq!(request.conversation[1].content, "why is the sky blue?");
    }

    #[test]
    fn budget_requires_reasoning() {
        let err = Args::try_parse_from(["parley", "chat", "-p", "anthropic", "--budget", "10", "hi"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn compare_takes_a_prompt() {
        let args = parse(&["parley", "--config", "custom.toml", "compare", "--reasoning", "2+2?"]);

        assert_eq!(args.config, PathBuf::from("custom.toml"));
        let Command::Compare(compare) = args.command else {
            panic!("expected compare");
        };
        assert!(compare.reasoning);
        assert!(!compare.stream);
        assert_eq!(compare.prompt, "2+2?");
    }
}
