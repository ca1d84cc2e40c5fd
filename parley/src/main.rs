#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::Write;

use anyhow::Context;
use args::{Args, ChatArgs, Command, CompareArgs, Provider};
use clap::Parser;
use futures_util::StreamExt;
use parley_config::Config;
use parley_llm::quick::quick_chat;
use parley_llm::{AnthropicAdapter, ChatAdapter, CompletionResult, LlmError, OpenAiAdapter, StreamEvent, render_result};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load_or_default(&args.config)?;

    // Initialize telemetry
    parley_telemetry::init(&config.telemetry)?;

    tracing::debug!(config_path = %args.config.display(), "configuration loaded");

    match &args.command {
        Command::Chat(chat) => run_chat(&config, chat).await,
        Command::Compare(compare) => run_compare(&config, compare).await,
    }
}

fn build_adapter(config: &Config, provider: Provider) -> anyhow::Result<Box<dyn ChatAdapter>> {
    let adapter: Box<dyn ChatAdapter> = match provider {
        Provider::Openai => Box::new(OpenAiAdapter::from_config(&config.openai).context("building OpenAI adapter")?),
        Provider::Anthropic => {
            Box::new(AnthropicAdapter::from_config(&config.anthropic).context("building Anthropic adapter")?)
        }
    };
    Ok(adapter)
}

async fn run_chat(config: &Config, args: &ChatArgs) -> anyhow::Result<()> {
    let adapter = build_adapter(config, args.provider)?;
    let request = args.to_request();

    if !args.stream {
        let result = adapter.complete(&request).await?;
        println!("{}", render_result(&result));
        return Ok(());
    }

    let mut events = adapter.complete_stream(&request).await?;
    let mut stdout = std::io::stdout();

    // Answer text on stdout, reasoning on stderr
    while let Some(event) = events.next().await {
        let event = event?;
        let to_stderr = event.is_reasoning();
        let (StreamEvent::TextDelta(text) | StreamEvent::ReasoningDelta(text)) = event else {
            continue;
        };

        if to_stderr {
            eprint!("{text}");
        } else {
            write!(stdout, "{text}")?;
            stdout.flush()?;
        }
    }

    writeln!(stdout)?;
    Ok(())
}

async fn run_compare(config: &Config, args: &CompareArgs) -> anyhow::Result<()> {
    let openai = OpenAiAdapter::from_config(&config.openai).context("building OpenAI adapter")?;
    let anthropic = AnthropicAdapter::from_config(&config.anthropic).context("building Anthropic adapter")?;

    let (openai_result, anthropic_result) = tokio::join!(
        quick_chat(&openai, &args.prompt, args.reasoning, args.stream),
        quick_chat(&anthropic, &args.prompt, args.reasoning, args.stream),
    );

    let failures = [
        print_section(&openai, &openai_result),
        print_section(&anthropic, &anthropic_result),
    ]
    .into_iter()
    .filter(|ok| !ok)
    .count();

    if failures == 2 {
        anyhow::bail!("both providers failed");
    }
    Ok(())
}

/// Print one provider's outcome; returns whether it succeeded
fn print_section(adapter: &dyn ChatAdapter, outcome: &Result<CompletionResult, LlmError>) -> bool {
    println!("=== {} ===", adapter.provider());

    let ok = match outcome {
        Ok(result) => {
            println!("{}", render_result(result));
            true
        }
        Err(e) => {
            tracing::error!(provider = %adapter.provider(), error = %e, "completion failed");
            println!("error: {e}");
            false
        }
    };

    println!();
    ok
}
