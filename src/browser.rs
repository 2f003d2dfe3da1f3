//! Article browsing state: search filter, bookmarks, and selection.
//!
//! `ArticleBrowser` owns the article list and a `BrowserState`. All
//! mutations are synchronous and happen inside input handlers; the
//! filtered view is memoized as a list of indices and recomputed only when
//! the query or the article list changes.
use crate::article::Article;
use std::collections::HashSet;

// ============================================================================
// Filter Engine
// ============================================================================

/// Case-insensitive substring match on title or category.
///
/// An empty query matches everything.
pub fn matches_query(article: &Article, query_lower: &str) -> bool {
    query_lower.is_empty()
        || article.title.to_lowercase().contains(query_lower)
        || article.category.to_lowercase().contains(query_lower)
}

/// Ordered subsequence of `articles` whose title or category contains `query`.
pub fn filter_articles<'a>(articles: &'a [Article], query: &str) -> Vec<&'a Article> {
    let query_lower = query.to_lowercase();
    articles
        .iter()
        .filter(|a| matches_query(a, &query_lower))
        .collect()
}

fn filter_indices(articles: &[Article], query: &str) -> Vec<usize> {
    let query_lower = query.to_lowercase();
    articles
        .iter()
        .enumerate()
        .filter(|(_, a)| matches_query(a, &query_lower))
        .map(|(i, _)| i)
        .collect()
}

// ============================================================================
// State
// ============================================================================

/// Mutable per-instance state. Nothing here outlives the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserState {
    pub search_query: String,
    pub bookmarked: HashSet<String>,
    pub selected: Option<String>,
    /// Entry animation gate; set once and never cleared.
    pub ready: bool,
}

/// Which of the two visual states the browser is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserView<'a> {
    Grid,
    Detail(&'a Article),
}

/// A card in the grid view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCard<'a> {
    pub article: &'a Article,
    pub bookmarked: bool,
}

/// Everything the detail overlay needs to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView<'a> {
    pub article: &'a Article,
    pub paragraphs: Vec<&'a str>,
    pub bookmarked: bool,
}

// ============================================================================
// Article Browser
// ============================================================================

pub struct ArticleBrowser {
    articles: Vec<Article>,
    state: BrowserState,
    /// Indices into `articles` passing the current query.
    filtered: Vec<usize>,
}

impl ArticleBrowser {
    pub fn new(articles: Vec<Article>) -> Self {
        let filtered = (0..articles.len()).collect();
        Self {
            articles,
            state: BrowserState::default(),
            filtered,
        }
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    // -- Search --

    pub fn search_query(&self) -> &str {
        &self.state.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.state.search_query {
            return;
        }
        self.state.search_query = query;
        self.refilter();
    }

    /// Append a character to the query; returns the new query length.
    pub fn push_search_char(&mut self, c: char) -> usize {
        self.state.search_query.push(c);
        self.refilter();
        self.state.search_query.chars().count()
    }

    pub fn pop_search_char(&mut self) {
        if self.state.search_query.pop().is_some() {
            self.refilter();
        }
    }

    fn refilter(&mut self) {
        self.filtered = filter_indices(&self.articles, &self.state.search_query);
        tracing::debug!(
            query = %self.state.search_query,
            matches = self.filtered.len(),
            "Recomputed filtered articles"
        );
    }

    /// Articles passing the current query, in source order.
    pub fn filtered(&self) -> impl Iterator<Item = &Article> + '_ {
        self.filtered.iter().map(|&i| &self.articles[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    // -- Bookmarks --

    /// Flip bookmark membership for `id` and return the new membership.
    ///
    /// Leaves query and selection untouched.
    pub fn toggle_bookmark(&mut self, id: &str) -> bool {
        let now_bookmarked = if self.state.bookmarked.remove(id) {
            false
        } else {
            self.state.bookmarked.insert(id.to_string());
            true
        };
        tracing::debug!(id, bookmarked = now_bookmarked, "Toggled bookmark");
        now_bookmarked
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.state.bookmarked.contains(id)
    }

    pub fn bookmark_count(&self) -> usize {
        self.state.bookmarked.len()
    }

    // -- Selection --

    /// Open the detail view for `id`. The most recent selection wins.
    pub fn select(&mut self, id: &str) {
        if let Some(previous) = self.state.selected.as_deref() {
            if previous != id {
                tracing::debug!(previous, id, "Replacing selection");
            }
        }
        self.state.selected = Some(id.to_string());
    }

    /// Return to the grid. Returns the id that was selected, if any.
    pub fn dismiss(&mut self) -> Option<String> {
        self.state.selected.take()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.state.selected.as_deref()
    }

    /// The selected article. With duplicate ids, the first record wins.
    pub fn selected_article(&self) -> Option<&Article> {
        let id = self.state.selected.as_deref()?;
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn view(&self) -> BrowserView<'_> {
        match self.selected_article() {
            Some(article) => BrowserView::Detail(article),
            None => BrowserView::Grid,
        }
    }

    // -- Ready gate --

    pub fn is_ready(&self) -> bool {
        self.state.ready
    }

    /// Open the entry-animation gate. Idempotent.
    pub fn mark_ready(&mut self) {
        if !self.state.ready {
            self.state.ready = true;
            tracing::debug!("Browser ready");
        }
    }

    // -- View models --

    /// Filtered articles minus the selected one.
    pub fn grid_cards(&self) -> Vec<GridCard<'_>> {
        let selected = self.state.selected.as_deref();
        self.filtered()
            .filter(|a| Some(a.id.as_str()) != selected)
            .map(|article| GridCard {
                article,
                bookmarked: self.is_bookmarked(&article.id),
            })
            .collect()
    }

    pub fn detail_view(&self) -> Option<DetailView<'_>> {
        let article = self.selected_article()?;
        Some(DetailView {
            article,
            paragraphs: article.paragraphs(),
            bookmarked: self.is_bookmarked(&article.id),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
