use serde::{Deserialize, Serialize};

use crate::utm::assemble_link;

/// Raw form input, exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub base_url: String,
    pub source: String,
    pub medium: String,
    pub campaign: String,
    pub term: String,
    pub content: String,
}

/// Normalized UTM parameter slugs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtmParams {
    pub source: String,
    pub medium: String,
    pub campaign: String,
    pub term: String,
    pub content: String,
}

impl UtmParams {
    /// Query pairs in fixed key order. `utm_term` and `utm_content` only
    /// appear when non-empty.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            ("utm_source", self.source.as_str()),
            ("utm_medium", self.medium.as_str()),
            ("utm_campaign", self.campaign.as_str()),
        ];
        if !self.term.is_empty() {
            pairs.push(("utm_term", self.term.as_str()));
        }
        if !self.content.is_empty() {
            pairs.push(("utm_content", self.content.as_str()));
        }
        pairs
    }
}

/// One row of link history. Field order matches the persisted column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmRecord {
    pub base_url: String,
    pub source: String,
    pub medium: String,
    pub campaign: String,
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub content: String,
    pub generated_link: String,
}

impl UtmRecord {
    /// Builds a record from an already slash-terminated base URL and
    /// normalized params, deriving the link.
    pub fn new(base_url: String, params: UtmParams) -> Self {
        let generated_link = assemble_link(&base_url, &params);
        Self {
            base_url,
            source: params.source,
            medium: params.medium,
            campaign: params.campaign,
            term: params.term,
            content: params.content,
            generated_link,
        }
    }

    pub fn params(&self) -> UtmParams {
        UtmParams {
            source: self.source.clone(),
            medium: self.medium.clone(),
            campaign: self.campaign.clone(),
            term: self.term.clone(),
            content: self.content.clone(),
        }
    }

    /// Recomputes the link from the other six fields.
    pub fn derive_link(&self) -> String {
        assemble_link(&self.base_url, &self.params())
    }

    pub fn is_consistent(&self) -> bool {
        self.derive_link() == self.generated_link
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.base_url.clone(),
            self.source.clone(),
            self.medium.clone(),
            self.campaign.clone(),
            self.term.clone(),
            self.content.clone(),
            self.generated_link.clone(),
        ]
    }

    /// Positional decode. Missing trailing cells read as empty.
    pub fn from_row(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            base_url: cell(0),
            source: cell(1),
            medium: cell(2),
            campaign: cell(3),
            term: cell(4),
            content: cell(5),
            generated_link: cell(6),
        }
    }
}
