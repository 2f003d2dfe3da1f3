//! Article records and the sources they come from.
//!
//! Articles are immutable once loaded. They come either from the built-in
//! sample set (`default_articles`) or from a JSON file (`load_articles`)
//! using the same camelCase field names as the sample data.
use crate::util::strip_control_chars;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Paragraph shown in the detail view when an article carries no content.
pub const PLACEHOLDER_PARAGRAPH: &str =
    "Full article content would appear here. This is a placeholder for the complete story.";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ArticleSourceError {
    #[error("Failed to read articles file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid article JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Articles file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Article
// ============================================================================

/// A single news item with display metadata and optional body content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub category: String,
    pub subcategory: String,
    pub time_ago: String,
    pub location: String,
    /// Image URI; resolved by the rendering surface, never fetched here.
    pub image: String,
    /// Overlay tint tokens, `[from, to]` (e.g. `from-blue-500/20`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_colors: Option<[String; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending: Option<bool>,
}

impl Article {
    /// Body paragraphs, or the single placeholder paragraph when absent.
    pub fn paragraphs(&self) -> Vec<&str> {
        match &self.content {
            Some(content) => content.iter().map(String::as_str).collect(),
            None => vec![PLACEHOLDER_PARAGRAPH],
        }
    }

    pub fn is_trending(&self) -> bool {
        self.trending.unwrap_or(false)
    }

    /// Strip terminal control sequences from every display string.
    ///
    /// SEC-001: article files are user-supplied and rendered verbatim.
    fn sanitize(mut self) -> Self {
        fn clean(s: &mut String) {
            if let std::borrow::Cow::Owned(cleaned) = strip_control_chars(s) {
                *s = cleaned;
            }
        }

        clean(&mut self.title);
        clean(&mut self.category);
        clean(&mut self.subcategory);
        clean(&mut self.time_ago);
        clean(&mut self.location);
        clean(&mut self.source);
        if let Some(content) = self.content.as_mut() {
            content.iter_mut().for_each(clean);
        }
        self
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Maximum accepted size of an articles file (1 MB).
const MAX_FILE_SIZE: u64 = 1_048_576;

/// Load an ordered article list from a JSON array on disk.
///
/// Duplicate ids are logged and kept; see `duplicate_ids`.
pub fn load_articles(path: &Path) -> Result<Vec<Article>, ArticleSourceError> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_FILE_SIZE {
        return Err(ArticleSourceError::TooLarge(format!(
            "Articles file is {} bytes (max {} bytes)",
            meta.len(),
            MAX_FILE_SIZE
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let articles: Vec<Article> = serde_json::from_str(&content)?;
    let articles: Vec<Article> = articles.into_iter().map(Article::sanitize).collect();

    for id in duplicate_ids(&articles) {
        tracing::warn!(id = %id, "Duplicate article id, both records will be shown");
    }

    tracing::info!(
        path = %path.display(),
        count = articles.len(),
        "Loaded articles"
    );
    Ok(articles)
}

/// Ids that occur more than once, in order of first repetition.
pub fn duplicate_ids(articles: &[Article]) -> Vec<&str> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(articles.len());
    let mut dupes = Vec::new();
    for article in articles {
        let count = seen.entry(article.id.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            dupes.push(article.id.as_str());
        }
    }
    dupes
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    title: &str,
    category: &str,
    subcategory: &str,
    time_ago: &str,
    location: &str,
    image: &str,
    gradient: [&str; 2],
    source: &str,
    trending: Option<bool>,
    content: &[&str],
) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        time_ago: time_ago.to_string(),
        location: location.to_string(),
        image: image.to_string(),
        gradient_colors: Some(gradient.map(str::to_string)),
        content: Some(content.iter().map(|p| p.to_string()).collect()),
        source: source.to_string(),
        trending,
    }
}

/// The built-in sample set shown when no articles are supplied.
pub fn default_articles() -> Vec<Article> {
    vec![
        sample(
            "1",
            "Breaking: Major Tech Company Announces Revolutionary AI Platform",
            "Technology",
            "Artificial Intelligence",
            "15 min ago",
            "San Francisco",
            "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=1600&h=900&fit=crop&q=80",
            ["from-blue-500/20", "to-purple-500/20"],
            "Tech News Daily",
            Some(true),
            &[
                "In a groundbreaking announcement today, a leading technology company unveiled its latest artificial intelligence platform that promises to revolutionize how businesses interact with machine learning systems.",
                "The new platform integrates advanced natural language processing with real-time data analysis, enabling companies to make faster, more informed decisions based on AI-driven insights.",
                "Industry experts are calling this development a significant leap forward in accessible AI technology, potentially democratizing advanced machine learning capabilities for businesses of all sizes.",
                "The platform will be available in beta testing next month, with full commercial release planned for the end of the year.",
            ],
        ),
        sample(
            "2",
            "Global Markets Rally on Positive Economic Indicators",
            "Business",
            "Markets",
            "1 hour ago",
            "New York",
            "https://images.unsplash.com/photo-1611974789855-9c2a0a7236a3?w=1600&h=900&fit=crop&q=80",
            ["from-green-500/20", "to-emerald-500/20"],
            "Financial Times",
            Some(true),
            &[
                "Stock markets around the world experienced significant gains today following the release of encouraging economic data from major economies.",
                "The positive momentum was driven by better-than-expected employment figures and consumer confidence indices, suggesting robust economic recovery.",
                "Analysts predict continued market strength in the coming weeks, though they caution investors to remain vigilant about potential volatility.",
            ],
        ),
        sample(
            "3",
            "Climate Summit Reaches Historic Agreement on Carbon Reduction",
            "Environment",
            "Climate Change",
            "2 hours ago",
            "Geneva",
            "https://images.unsplash.com/photo-1569163139394-de4798aa62b6?w=1600&h=900&fit=crop&q=80",
            ["from-green-500/20", "to-teal-500/20"],
            "Global News Network",
            None,
            &[
                "World leaders at the International Climate Summit have reached a landmark agreement committing to aggressive carbon reduction targets over the next decade.",
                "The accord includes binding commitments from 150 nations to reduce greenhouse gas emissions by 50% by 2035, marking the most ambitious climate action plan to date.",
                "Environmental organizations have praised the agreement while emphasizing the critical importance of implementation and enforcement.",
            ],
        ),
        sample(
            "4",
            "Medical Breakthrough: New Treatment Shows Promise for Rare Disease",
            "Health",
            "Medical Research",
            "3 hours ago",
            "Boston",
            "https://images.unsplash.com/photo-1576091160399-112ba8d25d1d?w=1600&h=900&fit=crop&q=80",
            ["from-red-500/20", "to-pink-500/20"],
            "Medical Journal Today",
            None,
            &[
                "Researchers at a leading medical institution have announced a significant breakthrough in treating a rare genetic disorder that affects thousands worldwide.",
                "The new treatment approach combines gene therapy with targeted medication, showing remarkable results in early clinical trials.",
                "Patients in the trial experienced substantial improvement in symptoms, offering hope to families affected by this previously untreatable condition.",
            ],
        ),
        sample(
            "5",
            "Space Agency Announces Plans for Mars Colony by 2040",
            "Science",
            "Space Exploration",
            "4 hours ago",
            "Houston",
            "https://images.unsplash.com/photo-1614728894747-a83421e2b9c9?w=1600&h=900&fit=crop&q=80",
            ["from-purple-500/20", "to-indigo-500/20"],
            "Space News",
            None,
            &[
                "The national space agency has unveiled ambitious plans to establish a permanent human settlement on Mars within the next two decades.",
                "The multi-phase project will begin with robotic missions to prepare infrastructure, followed by crewed missions to establish the initial colony.",
                "Scientists and engineers are working on revolutionary life support systems and sustainable resource utilization technologies to make the Mars colony viable.",
            ],
        ),
        sample(
            "6",
            "Education Reform: New Initiative Aims to Transform Learning",
            "Education",
            "Policy",
            "5 hours ago",
            "Washington",
            "https://images.unsplash.com/photo-1503676260728-1c00da094a0b?w=1600&h=900&fit=crop&q=80",
            ["from-yellow-500/20", "to-orange-500/20"],
            "Education Weekly",
            None,
            &[
                "A comprehensive education reform initiative has been announced, focusing on personalized learning and technology integration in classrooms.",
                "The program will provide funding for schools to adopt innovative teaching methods and digital learning platforms.",
                "Educators and parents have expressed optimism about the potential impact on student engagement and academic outcomes.",
            ],
        ),
    ]
}

// ============================================================================
// Tests
// ============================================================================
