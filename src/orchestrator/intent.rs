//! Keyword-scored intent classification
//!
//! The table is data (category → keyword list) so it can be loaded from
//! configuration and tested independently of the orchestrator.

use std::collections::HashMap;

/// Scores messages against per-category keyword sets.
pub struct IntentTable {
    categories: HashMap<String, Vec<String>>,
    default_category: String,
}

impl IntentTable {
    pub fn new(categories: HashMap<String, Vec<String>>, default_category: impl Into<String>) -> Self {
        Self {
            categories,
            default_category: default_category.into(),
        }
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// Category names known to the table.
    pub fn categories(&self) -> impl Iterator<Item = &String> {
        self.categories.keys()
    }

    /// Pick the category whose keywords best match the message.
    ///
    /// Each matched keyword (case-insensitive substring) contributes one
    /// point. Ties and all-zero scores resolve to the default category.
    pub fn classify(&self, message: &str) -> String {
        let lowered = message.to_lowercase();

        let mut best: Option<(&str, usize)> = None;
        let mut tied = false;
        for (category, keywords) in &self.categories {
            let score = keywords
                .iter()
                .filter(|k| lowered.contains(&k.to_lowercase()))
                .count();
            match best {
                Some((_, top)) if score > top => {
                    best = Some((category, score));
                    tied = false;
                }
                Some((_, top)) if score == top => tied = true,
                None => best = Some((category, score)),
                _ => {}
            }
        }

        match best {
            Some((category, score)) if score > 0 && !tied => category.to_string(),
            _ => self.default_category.clone(),
        }
    }
}
