use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{ProxyBody, ProxyQuery, ResultPage, NEWS_ROUTE};
use tracing::{debug, info};

pub mod card;
pub mod error;
pub mod keywords;
pub mod session;
pub mod state;
pub mod surface;

pub use card::ArticleCard;
pub use error::FetchError;
pub use keywords::KeywordExtractor;
pub use session::{Completion, FetchTicket, SearchSession};
pub use state::{Pagination, SearchEvent, SearchState, Transition, DEFAULT_INITIAL_QUERY};
pub use surface::RenderSurface;

const PROXY_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of result pages. The production implementation talks to the news
/// proxy over HTTP; tests substitute scripted fakes.
#[async_trait]
pub trait NewsProxy: Send + Sync {
    async fn fetch_page(&self, query: &ProxyQuery) -> Result<ResultPage, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpNewsProxy {
    http: Client,
    base_url: String,
}

impl HttpNewsProxy {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(PROXY_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn news_url(&self) -> String {
        format!("{}{}", self.base_url, NEWS_ROUTE)
    }
}

#[async_trait]
impl NewsProxy for HttpNewsProxy {
    async fn fetch_page(&self, query: &ProxyQuery) -> Result<ResultPage, FetchError> {
        let response = self.http.get(self.news_url()).query(query).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(status = %status, bytes = bytes.len(), "news proxy answered");

        let body: ProxyBody = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(err) if status.is_success() => return Err(FetchError::InvalidBody(err)),
            Err(_) => ProxyBody::default(),
        };

        if !status.is_success() {
            return Err(FetchError::Rejected(body.failure_message()));
        }
        body.into_page().map_err(FetchError::Rejected)
    }
}

/// Drives one [`SearchSession`] against a proxy and a rendering surface.
pub struct SearchController<P, R> {
    proxy: P,
    surface: R,
    session: SearchSession,
}

impl<P: NewsProxy, R: RenderSurface> SearchController<P, R> {
    pub fn new(proxy: P, surface: R, session: SearchSession) -> Self {
        Self {
            proxy,
            surface,
            session,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn into_surface(self) -> R {
        self.surface
    }

    /// Runs one full fetch-and-render cycle for `event`. Returns `None` when
    /// the event left the result page unchanged.
    pub async fn handle(&mut self, event: SearchEvent) -> Option<Completion> {
        let ticket = self.session.begin(&event, &mut self.surface)?;
        let outcome = self.proxy.fetch_page(ticket.query()).await;
        let completion = self.session.complete(&ticket, outcome, &mut self.surface);
        info!(
            query = %ticket.query().q,
            page = ticket.query().page,
            ?completion,
            "search cycle finished"
        );
        Some(completion)
    }

    pub async fn initial_load(&mut self) -> Option<Completion> {
        self.handle(SearchEvent::InitialLoad).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
