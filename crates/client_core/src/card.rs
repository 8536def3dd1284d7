use shared::domain::Article;

use crate::keywords::KeywordExtractor;

const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M %p";

/// Everything a rendering surface needs to draw one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    pub source_line: String,
    pub title: String,
    pub keywords: Vec<String>,
    pub description: String,
    pub link: String,
    pub image_url: String,
}

impl ArticleCard {
    pub fn from_article(article: &Article, keywords: &KeywordExtractor) -> Self {
        Self {
            source_line: format!(
                "{} · {}",
                article.source.name,
                format_published_at(article)
            ),
            title: article.title.clone(),
            keywords: keywords.extract(&article.keyword_text()),
            description: article.description_or_fallback().to_string(),
            link: article.url.clone(),
            image_url: article.image_url().to_string(),
        }
    }
}

fn format_published_at(article: &Article) -> String {
    match article.published_at_utc() {
        Some(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        None => article.published_at.clone(),
    }
}
