//! Category descriptions keyed by section title

use std::collections::HashMap;

const DEFAULT_DESCRIPTIONS: &[(&str, &str)] = &[
    (
        "Family, birth and relationships",
        "Managing key life events and family responsibilities, from registering a birth to caring for others",
    ),
    (
        "Work and employment",
        "Find a job, develop skills, or manage employment changes",
    ),
    (
        "Money and financial support",
        "Get help with money, benefits, taxes or government payments",
    ),
    (
        "Travel, ID and citizenship",
        "Travel, drive or prove your identity and status",
    ),
    // Sitemap spelling of the same category
    (
        "Travel, ID and Citizenship",
        "Travel, drive or prove your identity and status",
    ),
    (
        "Business and trade",
        "Start, manage or grow a business, and understand legal and tax obligations",
    ),
    (
        "Public safety",
        "Reporting crime, raising a concern and safeguarding",
    ),
];

/// Summaries shown for each known section
///
/// Lookup is by exact section title. Unknown titles resolve to an empty
/// string rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDescriptions {
    entries: HashMap<String, String>,
}

impl SectionDescriptions {
    /// A table with no entries
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or replace the description of `section`
    pub fn insert(&mut self, section: impl Into<String>, description: impl Into<String>) {
        self.entries.insert(section.into(), description.into());
    }

    /// Description of `section`, empty when unknown
    pub fn get(&self, section: &str) -> &str {
        self.entries.get(section).map(String::as_str).unwrap_or("")
    }

    /// Number of known sections
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no section is known
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SectionDescriptions {
    fn default() -> Self {
        DEFAULT_DESCRIPTIONS.iter().copied().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SectionDescriptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut descriptions = Self::empty();
        descriptions.extend(iter);
        descriptions
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for SectionDescriptions {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (section, description) in iter {
            self.insert(section, description);
        }
    }
}
