//! ai-responses-cli: send one prompt as a background job and print the structured result.
//!
//! Usage:
//!   ai-responses-cli ask [--model <m>] [--effort <e>] [--image <path|url>] <prompt...>
//!   ai-responses-cli get <response-id>
//!
//! Output is `{"response": <decoded>, "metadata": <run metadata>}` on stdout.

use ai_lib_responses::client::ImageRef;
use ai_lib_responses::{Effort, GenerationOptions, Prompt, ResponsesClient};
use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize)]
struct Reply {
    response: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "ask" => cmd_ask(&args[2..]).await,
        "get" => cmd_get(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("ai-responses-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"ai-responses-cli - background jobs on the OpenAI Responses API

USAGE:
    ai-responses-cli <COMMAND> [OPTIONS]

COMMANDS:
    ask [--model <m>] [--effort <e>] [--image <path|url>] <prompt...>
                                Submit a prompt and wait for the structured reply
    get <response-id>           Fetch the current state of a job
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    OPENAI_API_KEY              API key (required)
    OPENAI_BASE_URL             API base URL
    AI_RESPONSES_POLL_INTERVAL_MS, AI_RESPONSES_POLL_DEADLINE_SECS
                                Polling cadence and deadline
    RUST_LOG                    Log filter (default: info)"#
    );
}

async fn cmd_ask(args: &[String]) -> anyhow::Result<()> {
    let mut options = GenerationOptions::default();
    let mut image = None;
    let mut words = Vec::new();

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--model" => {
                options.model = it.next().context("--model needs a value")?.clone();
            }
            "--effort" => {
                let value = it.next().context("--effort needs a value")?;
                options.effort = value.parse::<Effort>().map_err(|e| anyhow!(e))?;
            }
            "--image" => {
                let value = it.next().context("--image needs a value")?;
                image = Some(if value.starts_with("http://")
                    || value.starts_with("https://")
                    || value.starts_with("data:")
                {
                    ImageRef::Url(value.clone())
                } else {
                    ImageRef::File(value.into())
                });
            }
            other => words.push(other.to_string()),
        }
    }
    if words.is_empty() {
        bail!("missing prompt");
    }

    let mut prompt = Prompt::new(words.join(" "))
        .instructions("Answer the user's request.")
        .developer_message("Reply with a single JSON object whose `response` field holds the answer.");
    if let Some(image) = image {
        prompt = prompt.image(image);
    }

    let schema = json!({"response": {"type": "string"}});
    let properties = schema.as_object().cloned().unwrap_or_default();

    let client = ResponsesClient::new()?;
    let generation = client
        .generate_structured::<Reply>(&prompt, properties, &options)
        .await?;

    let out = json!({
        "response": generation.output,
        "metadata": generation.metadata,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

async fn cmd_get(args: &[String]) -> anyhow::Result<()> {
    let id = args.first().context("missing response id")?;
    let client = ResponsesClient::new()?;
    let resp = client.get(id).await?;
    println!("{}", serde_json::to_string_pretty(&resp)?);
    Ok(())
}
