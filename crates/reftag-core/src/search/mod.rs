//! Keyword search over the image corpus, scored against the live vocabulary.

mod scoring;
mod tiers;

use crate::models::{Category, ImageRecord, ScoredImage, SearchResponse, SearchTier};

pub use tiers::SearchPolicy;

pub const NO_MATCH_WARNING: &str = "no matching images found";
pub const EMPTY_CORPUS_WARNING: &str = "no images available to search";
pub const EMPTY_KEYWORDS_ERROR: &str = "at least one non-empty keyword is required";
pub const CONFIGURATION_MISSING_ERROR: &str =
    "no active vocabulary configuration; search space is empty";

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Matched {
        results: Vec<ScoredImage>,
        tier: SearchTier,
        candidates: usize,
    },
    NoMatch {
        candidates: usize,
    },
    EmptyQuery,
    EmptyCorpus,
    ConfigurationMissing,
}

impl SearchOutcome {
    #[must_use]
    pub fn into_response(self, keywords: Vec<String>) -> SearchResponse {
        match self {
            Self::Matched {
                results,
                tier,
                candidates,
            } => SearchResponse {
                keywords,
                results,
                tier: Some(tier),
                candidates,
                ..SearchResponse::default()
            },
            Self::NoMatch { candidates } => SearchResponse {
                keywords,
                candidates,
                warning: Some(NO_MATCH_WARNING.to_string()),
                ..SearchResponse::default()
            },
            Self::EmptyCorpus => SearchResponse {
                keywords,
                warning: Some(EMPTY_CORPUS_WARNING.to_string()),
                ..SearchResponse::default()
            },
            Self::EmptyQuery => {
                SearchResponse::failed(keywords, "VALIDATION_FAILED", EMPTY_KEYWORDS_ERROR)
            }
            Self::ConfigurationMissing => SearchResponse::failed(
                keywords,
                "CONFIGURATION_MISSING",
                CONFIGURATION_MISSING_ERROR,
            ),
        }
    }
}

/// Lowercases, trims and deduplicates keywords, dropping blanks. Order is kept.
#[must_use]
pub fn normalize_keywords<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut out = Vec::<String>::new();
    for keyword in raw {
        let keyword = keyword.as_ref().trim().to_lowercase();
        if keyword.is_empty() || out.contains(&keyword) {
            continue;
        }
        out.push(keyword);
    }
    out
}

/// Scores `images` for `keywords` against `categories` and applies the threshold
/// fallback of `policy`. Keywords are normalized here; callers may pass raw input.
#[must_use]
pub fn search<S: AsRef<str>>(
    keywords: &[S],
    images: &[ImageRecord],
    categories: &[Category],
    policy: &SearchPolicy,
) -> SearchOutcome {
    let keywords = normalize_keywords(keywords);
    if keywords.is_empty() {
        return SearchOutcome::EmptyQuery;
    }
    if categories.is_empty() {
        return SearchOutcome::ConfigurationMissing;
    }
    if images.is_empty() {
        return SearchOutcome::EmptyCorpus;
    }

    let scored = images
        .iter()
        .map(|image| scoring::score_image(image, &keywords, categories))
        .collect::<Vec<_>>();

    match policy.select(scored) {
        Some((results, tier)) => SearchOutcome::Matched {
            results,
            tier,
            candidates: images.len(),
        },
        None => SearchOutcome::NoMatch {
            candidates: images.len(),
        },
    }
}
