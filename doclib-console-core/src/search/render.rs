use std::fmt::Write;

use crate::contract::SearchResultItem;
use crate::escape::escape_html;

use super::state::ResultArea;

pub const LOADING_TEXT: &str = "Searching...";
pub const NO_RESULTS_HINT: &str = "Try different keywords or adjust the search mode";
pub const FAILED_TEXT: &str = "Search failed, please try again later";

/// Message shown when a query returned nothing. The query is escaped.
pub fn no_results_message(query: &str) -> String {
    format!("No results for \"{}\"", escape_html(query))
}

impl ResultArea {
    pub fn render(&self) -> String {
        match self {
            ResultArea::Blank => String::new(),
            ResultArea::Loading => format!(
                r#"<div class="flex items-center justify-center py-8"><div class="spinner"></div><span class="ml-3 text-secondary">{LOADING_TEXT}</span></div>"#
            ),
            ResultArea::Results(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| render_item(index, item))
                .collect(),
            ResultArea::NoResults { query } => format!(
                r#"<div class="empty-state"><p class="font-medium">{}</p><p class="text-sm mt-2">{NO_RESULTS_HINT}</p></div>"#,
                no_results_message(query)
            ),
            ResultArea::Failed => format!(
                r#"<div class="p-4 text-error text-center"><p>{FAILED_TEXT}</p></div>"#
            ),
        }
    }
}

fn render_item(index: usize, item: &SearchResultItem) -> String {
    let mut html = String::new();
    let delay = index as f64 * 0.05;
    let _ = write!(
        html,
        r#"<div class="p-4 border-b transition-all hover:bg-gray-50" style="animation: fadeIn 0.3s ease {delay:.2}s both;">"#
    );
    let _ = write!(
        html,
        r#"<h3 class="font-semibold text-primary">{}</h3>"#,
        escape_html(&item.title)
    );
    let _ = write!(
        html,
        r#"<p class="text-sm text-secondary mt-1 font-mono">{}</p>"#,
        escape_html(&item.path)
    );
    let _ = write!(
        html,
        r#"<p class="text-sm text-secondary mt-2 line-clamp-2">{}</p>"#,
        escape_html(&item.content)
    );
    let _ = write!(
        html,
        r#"<div class="flex items-center gap-4 mt-2"><span class="text-xs text-tertiary">Score: {:.2}</span>"#,
        item.score
    );
    if let Some(chunk) = item.chunk_index {
        let _ = write!(
            html,
            r#"<span class="text-xs text-tertiary">Chunk: {chunk}</span>"#
        );
    }
    html.push_str("</div></div>");
    html
}
