//! Plain-text rendering surface.

use std::io::Write;

use client_core::{ArticleCard, Pagination, RenderSurface};

pub struct TerminalSurface<W: Write> {
    out: W,
    cards: Vec<ArticleCard>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cards: Vec::new(),
        }
    }

    pub fn card(&self, number: usize) -> Option<&ArticleCard> {
        number.checked_sub(1).and_then(|idx| self.cards.get(idx))
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        if let Err(error) = writeln!(self.out, "{}", text.as_ref()) {
            tracing::warn!(%error, "failed to write to terminal");
        }
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.line("loading...");
        }
    }

    fn show_query(&mut self, query: &str) {
        self.line(format!("showing results for \"{query}\""));
    }

    fn reflect_input(&mut self, text: &str) {
        self.line(format!("> search {text}"));
    }

    fn render_results(&mut self, cards: &[ArticleCard]) {
        self.cards = cards.to_vec();
        for (idx, card) in cards.iter().enumerate() {
            let tags = card
                .keywords
                .iter()
                .map(|k| format!("#{k}"))
                .collect::<Vec<_>>()
                .join(" ");
            self.line(format!("[{}] {}", idx + 1, card.title));
            self.line(format!("    {}", card.source_line));
            if !tags.is_empty() {
                self.line(format!("    {tags}"));
            }
            self.line(format!("    {}", card.description));
            self.line(format!("    read more: {}", card.link));
            self.line(format!("    image: {}", card.image_url));
        }
    }

    fn render_no_results(&mut self, query: &str) {
        self.cards.clear();
        self.line(format!("No results found for \"{query}\"."));
    }

    fn render_error(&mut self, message: &str) {
        self.cards.clear();
        self.line(format!(
            "{}. Please try again later.",
            message.trim_end_matches('.')
        ));
    }

    fn set_result_count(&mut self, total_results: u64) {
        self.line(format!("{total_results} results"));
    }

    fn set_pagination(&mut self, pagination: &Pagination) {
        let flag = |enabled: bool| if enabled { "on" } else { "off" };
        self.line(format!(
            "page {}  (prev: {}, next: {})",
            pagination,
            flag(pagination.prev_enabled),
            flag(pagination.next_enabled)
        ));
    }
}
