use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    HttpNewsProxy, KeywordExtractor, SearchController, SearchSession, SearchState,
    DEFAULT_INITIAL_QUERY,
};
use shared::domain::SortKey;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod commands;
mod surface;

use commands::{parse_command, Command, HELP};
use surface::TerminalSurface;

#[derive(Parser, Debug)]
#[command(name = "newsdesk", about = "Browse news search results through the newsdesk proxy")]
struct Args {
    /// Base URL of the news proxy (the server crate).
    #[arg(long, env = "NEWSDESK_PROXY_URL", default_value = "http://127.0.0.1:3000")]
    proxy_url: url::Url,

    /// Query fetched on startup.
    #[arg(long, default_value = DEFAULT_INITIAL_QUERY)]
    query: String,

    /// Initial sort order.
    #[arg(long, default_value_t = SortKey::PublishedAt)]
    sort: SortKey,

    /// Extra words to leave out of keyword tags, on top of the built-in list.
    #[arg(long = "stop-word")]
    stop_words: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let proxy = HttpNewsProxy::new(args.proxy_url.as_str()).context("failed to build http client")?;
    let keywords = KeywordExtractor::with_stop_words(
        client_core::keywords::DEFAULT_STOP_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(args.stop_words),
    );
    let state = SearchState::new(args.query).with_sort_key(args.sort);
    let session = SearchSession::new(state).with_keywords(keywords);
    let mut controller = SearchController::new(proxy, TerminalSurface::new(io::stdout()), session);

    println!("{HELP}");
    controller.initial_load().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("newsdesk> ");
        io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Event(event))) => {
                if controller.handle(event).await.is_none() {
                    println!("nothing to do");
                }
            }
            Ok(Some(Command::Open(number))) => match controller.surface().card(number) {
                Some(card) => println!("{}", card.link),
                None => println!("no card {number} on this page"),
            },
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(Command::Quit)) => break,
            Err(message) => println!("{message}"),
        }
    }

    Ok(())
}
