//! Parsing of the line-oriented commands typed at the prompt.

use client_core::SearchEvent;
use shared::domain::SortKey;

pub const CATEGORIES: [&str; 7] = [
    "General",
    "Business",
    "Technology",
    "Entertainment",
    "Sports",
    "Science",
    "Health",
];

pub const HELP: &str = "\
commands:
  search <text>       search for <text>
  category <label>    browse a category (general, business, technology, ...)
  sort <key>          relevancy | popularity | publishedAt
  next | prev         move between result pages
  open <n>            print the link of card <n>
  help                show this help
  quit                exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(SearchEvent),
    Open(usize),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => Command::Event(SearchEvent::Submit(rest.to_string())),
        "category" | "c" => {
            let label = CATEGORIES
                .iter()
                .find(|c| c.eq_ignore_ascii_case(rest))
                .ok_or_else(|| {
                    format!("unknown category '{rest}'; try one of {}", CATEGORIES.join(", "))
                })?;
            Command::Event(SearchEvent::SelectCategory(label.to_string()))
        }
        "sort" => {
            let key = rest.parse::<SortKey>().map_err(|e| e.to_string())?;
            Command::Event(SearchEvent::ChangeSort(key))
        }
        "next" | "n" => Command::Event(SearchEvent::NextPage),
        "prev" | "p" => Command::Event(SearchEvent::PrevPage),
        "open" | "o" => {
            let index = rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| format!("'{rest}' is not a card number"))?;
            Command::Open(index)
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}
