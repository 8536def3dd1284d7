use crate::{card::ArticleCard, state::Pagination};

/// The UI layer the controller draws on. Implementations own presentation
/// only; all state decisions are made before these calls.
pub trait RenderSurface {
    fn set_loading(&mut self, loading: bool);
    /// "Showing results for ..." heading.
    fn show_query(&mut self, query: &str);
    /// Writes text back into the search input.
    fn reflect_input(&mut self, text: &str);
    fn render_results(&mut self, cards: &[ArticleCard]);
    fn render_no_results(&mut self, query: &str);
    fn render_error(&mut self, message: &str);
    fn set_result_count(&mut self, total_results: u64);
    fn set_pagination(&mut self, pagination: &Pagination);
}
