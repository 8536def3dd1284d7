//! Fetch sequencing on top of [`SearchState`].
//!
//! Each accepted event issues a [`FetchTicket`]. Completions are applied only
//! for the newest ticket, so a slow earlier request can never overwrite the
//! results of a later one.

use shared::protocol::{ProxyQuery, ResultPage};
use tracing::{debug, warn};

use crate::{
    card::ArticleCard,
    error::FetchError,
    keywords::KeywordExtractor,
    state::{SearchEvent, SearchState, Transition},
    surface::RenderSurface,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: ProxyQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &ProxyQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Rendered,
    Failed,
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    state: SearchState,
    keywords: KeywordExtractor,
    issued: u64,
}

impl SearchSession {
    pub fn new(state: SearchState) -> Self {
        Self {
            state,
            keywords: KeywordExtractor::default(),
            issued: 0,
        }
    }

    pub fn with_keywords(mut self, keywords: KeywordExtractor) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    /// Applies `event` and, if it calls for a fetch, shows the loading state
    /// and returns the ticket describing the request to send.
    pub fn begin<R>(&mut self, event: &SearchEvent, surface: &mut R) -> Option<FetchTicket>
    where
        R: RenderSurface + ?Sized,
    {
        if self.state.apply(event) == Transition::Ignored {
            debug!(?event, "event does not change the result page");
            return None;
        }

        if let SearchEvent::SelectCategory(_) = event {
            surface.reflect_input(self.state.query());
        }

        self.issued += 1;
        let ticket = FetchTicket {
            seq: self.issued,
            query: self.state.to_query(),
        };
        debug!(
            seq = ticket.seq,
            query = %ticket.query.q,
            page = ticket.query.page,
            sort_by = %ticket.query.sort_by,
            "issuing news fetch"
        );

        surface.set_loading(true);
        surface.show_query(self.state.query());
        Some(ticket)
    }

    /// Applies the outcome of `ticket`'s request. Outcomes of superseded
    /// tickets are dropped without touching state or surface.
    pub fn complete<R>(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<ResultPage, FetchError>,
        surface: &mut R,
    ) -> Completion
    where
        R: RenderSurface + ?Sized,
    {
        if ticket.seq != self.issued {
            debug!(
                seq = ticket.seq,
                latest = self.issued,
                "dropping result of superseded fetch"
            );
            return Completion::Stale;
        }

        let completion = match outcome {
            Ok(page) => {
                self.state.record_total(page.total_results);
                surface.set_result_count(page.total_results);
                if page.articles.is_empty() {
                    surface.render_no_results(&ticket.query.q);
                } else {
                    let cards: Vec<ArticleCard> = page
                        .articles
                        .iter()
                        .map(|article| ArticleCard::from_article(article, &self.keywords))
                        .collect();
                    surface.render_results(&cards);
                }
                Completion::Rendered
            }
            Err(err) => {
                warn!(error = %err, seq = ticket.seq, "news fetch failed");
                self.state.clear_total();
                surface.render_error(&err.user_message());
                surface.set_result_count(0);
                Completion::Failed
            }
        };

        surface.set_pagination(&self.state.pagination());
        surface.set_loading(false);
        completion
    }
}
