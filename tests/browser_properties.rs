//! Property tests for the browser's filter, bookmark, and selection rules.
//!
//! Operations are generated as arbitrary sequences and applied to a fresh
//! browser; after each step the observable views must agree with a direct
//! recomputation from the article list.

use newsdeck::article::{default_articles, Article};
use newsdeck::browser::{filter_articles, ArticleBrowser, BrowserView};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Query(String),
    Push(char),
    Pop,
    Bookmark(usize),
    Select(usize),
    Dismiss,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::sample::select(vec!["", "tech", "CLIMATE", "a", "zzz", "re", "Space"])
            .prop_map(|q| Op::Query(q.to_string())),
        prop::sample::select(vec!['a', 'e', 'T', 'x', ' ', 'é']).prop_map(Op::Push),
        Just(Op::Pop),
        (0usize..8).prop_map(Op::Bookmark),
        (0usize..8).prop_map(Op::Select),
        Just(Op::Dismiss),
    ]
}

fn article(id: usize, title: String, category: String) -> Article {
    Article {
        id: id.to_string(),
        title,
        category,
        subcategory: String::new(),
        time_ago: String::new(),
        location: String::new(),
        image: String::new(),
        gradient_colors: None,
        content: None,
        source: String::new(),
        trending: None,
    }
}

fn articles_strategy() -> impl Strategy<Value = Vec<Article>> {
    prop::collection::vec(("[a-cA-Cé ]{0,10}", "[a-cA-CÉ]{0,6}"), 0..16).prop_map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, (title, category))| article(i, title, category))
            .collect()
    })
}

fn contains_ignoring_case(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(&query.to_lowercase())
}

fn id_for(index: usize) -> String {
    // Indices past the sample set produce unknown ids
    (index + 1).to_string()
}

fn expected_grid<'a>(articles: &'a [Article], query: &str, selected: Option<&str>) -> Vec<&'a str> {
    filter_articles(articles, query)
        .into_iter()
        .filter(|a| Some(a.id.as_str()) != selected)
        .map(|a| a.id.as_str())
        .collect()
}

proptest! {
    #[test]
    fn proptest_filter_keeps_exactly_the_matching_articles(
        articles in articles_strategy(),
        query in "[a-cA-Cé ]{0,3}",
    ) {
        let result = filter_articles(&articles, &query);

        // Order-preserving subsequence: ids are source positions
        let positions: Vec<usize> = result
            .iter()
            .map(|a| a.id.parse::<usize>().unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        for (article, &pos) in result.iter().zip(&positions) {
            prop_assert_eq!(*article, &articles[pos]);
        }

        for (pos, article) in articles.iter().enumerate() {
            let matches = contains_ignoring_case(&article.title, &query)
                || contains_ignoring_case(&article.category, &query);
            prop_assert_eq!(positions.contains(&pos), matches, "article {:?}", article);
        }

        if query.is_empty() {
            prop_assert_eq!(result.len(), articles.len());
        }
    }

    #[test]
    fn proptest_grid_matches_filter_minus_selection(
        ops in prop::collection::vec(op_strategy(), 0..40)
    ) {
        let articles = default_articles();
        let mut browser = ArticleBrowser::new(articles.clone());

        for op in ops {
            match op {
                Op::Query(q) => browser.set_search_query(q),
                Op::Push(c) => {
                    browser.push_search_char(c);
                }
                Op::Pop => browser.pop_search_char(),
                Op::Bookmark(i) => {
                    browser.toggle_bookmark(&id_for(i));
                }
                Op::Select(i) => browser.select(&id_for(i)),
                Op::Dismiss => {
                    browser.dismiss();
                }
            }

            let grid: Vec<&str> = browser
                .grid_cards()
                .iter()
                .map(|card| card.article.id.as_str())
                .collect();
            let expected = expected_grid(&articles, browser.search_query(), browser.selected_id());
            prop_assert_eq!(grid, expected);
            prop_assert_eq!(
                browser.filtered_len(),
                filter_articles(&articles, browser.search_query()).len()
            );
        }
    }

    #[test]
    fn proptest_bookmark_toggle_is_an_involution(
        indices in prop::collection::vec(0usize..6, 0..30)
    ) {
        let mut browser = ArticleBrowser::new(default_articles());
        browser.set_search_query("e");
        let before_query = browser.search_query().to_string();

        for &i in &indices {
            browser.toggle_bookmark(&id_for(i));
        }
        for &i in &indices {
            let id = id_for(i);
            let expected = indices.iter().filter(|&&j| j == i).count() % 2 == 1;
            prop_assert_eq!(browser.is_bookmarked(&id), expected);
        }

        // Undo every toggle in reverse
        for &i in indices.iter().rev() {
            browser.toggle_bookmark(&id_for(i));
        }
        prop_assert_eq!(browser.bookmark_count(), 0);
        prop_assert_eq!(browser.search_query(), before_query.as_str());
        prop_assert_eq!(browser.selected_id(), None);
    }

    #[test]
    fn proptest_filter_is_case_insensitive(query in "[a-zA-Z ]{0,8}") {
        let articles = default_articles();
        let lower: Vec<&str> = filter_articles(&articles, &query.to_lowercase())
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        let upper: Vec<&str> = filter_articles(&articles, &query.to_uppercase())
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        prop_assert_eq!(lower, upper);
    }
}

#[test]
fn test_unknown_selection_stays_in_grid_view() {
    let mut browser = ArticleBrowser::new(default_articles());
    browser.select("999");
    assert_eq!(browser.view(), BrowserView::Grid);
    assert!(browser.detail_view().is_none());
    assert_eq!(browser.grid_cards().len(), 6);
}
