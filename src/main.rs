use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use compiler_bot::{BotConfig, Commands, Confirmation, StaticConfirmation};
use compiler_core::{Embed, Reply};
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name shown as the author of replies
    #[arg(long, default_value = "terminal")]
    author: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List languages available to use with the compiler
    Languages,
    /// List compilers available for one language
    Info { language: String },
    /// Print a starter template
    Template { template: String },
    /// Compile a message containing a fenced code block
    Compile {
        /// Language (uses its default compiler) or exact compiler name
        target: String,
        /// File holding the message; stdin when omitted (pair with --yes)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Asks on the terminal before anything is sent
struct TerminalConfirmation;

#[async_trait]
impl Confirmation for TerminalConfirmation {
    async fn confirm(&self, preview: &Embed) -> bool {
        print_embed(preview);
        print!("Run it? [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let answer = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await;

        matches!(answer, Ok(Ok(line)) if line.trim().eq_ignore_ascii_case("y"))
    }
}

fn print_embed(embed: &Embed) {
    println!("== {} ==", embed.title);
    if let Some(url) = &embed.url {
        println!("<{}>", url);
    }
    if let Some(description) = &embed.description {
        println!("{}", description);
    }
    for field in &embed.fields {
        println!("-- {}\n{}", field.name, field.value);
    }
    println!();
}

fn print_reply(reply: &Reply) {
    match reply {
        Reply::Text(text) => println!("{}", text),
        Reply::Embed(embed) => print_embed(embed),
        Reply::Pages(pages) => {
            for (idx, page) in pages.iter().enumerate() {
                println!("[page {}/{}]", idx + 1, pages.len());
                print_embed(page);
            }
        }
    }
}

fn read_message(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut message = String::new();
            io::stdin().read_to_string(&mut message)?;
            Ok(message)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = BotConfig::load(args.config.as_deref())?;
    let commands = Commands::from_config(&config)?;
    let author = args.author.as_str();

    let reply = match &args.command {
        Command::Languages => Some(commands.languages(author).await),
        Command::Info { language } => Some(commands.language_info(author, language).await),
        Command::Template { template } => Some(commands.template(author, template).await),
        Command::Compile { target, file, yes } => {
            let message = read_message(file.as_ref())?;
            if *yes {
                commands
                    .compile(author, target, &message, &StaticConfirmation(true))
                    .await
            } else {
                commands
                    .compile(author, target, &message, &TerminalConfirmation)
                    .await
            }
        }
    };

    if let Some(reply) = reply {
        print_reply(&reply);
    }

    Ok(())
}
