//! Candidate name → photo path lookup, with an initials fallback.
//!
//! Strategies are tried in order; the first hit wins:
//!   1. exact key
//!   2. uppercased name as key
//!   3. substring match in either direction (uppercased), in key order

use std::collections::BTreeMap;

type Strategy = fn(&BTreeMap<String, String>, &str) -> Option<String>;

const STRATEGIES: [Strategy; 3] = [exact_match, case_insensitive_match, substring_match];

#[derive(Debug, Clone, Default)]
pub struct PhotoDirectory {
    entries: BTreeMap<String, String>,
}

impl PhotoDirectory {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        // Entries without a path can never resolve.
        let entries = entries
            .into_iter()
            .filter(|(_, path)| !path.trim().is_empty())
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        STRATEGIES
            .iter()
            .find_map(|strategy| strategy(&self.entries, name))
    }
}

fn exact_match(entries: &BTreeMap<String, String>, name: &str) -> Option<String> {
    entries.get(name).cloned()
}

fn case_insensitive_match(entries: &BTreeMap<String, String>, name: &str) -> Option<String> {
    entries.get(&name.to_uppercase()).cloned()
}

fn substring_match(entries: &BTreeMap<String, String>, name: &str) -> Option<String> {
    let upper = name.to_uppercase();
    entries
        .iter()
        .find(|(key, _)| upper.contains(key.as_str()) || key.contains(upper.as_str()))
        .map(|(_, path)| path.clone())
}

/// First letter of each word, at most two.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect()
}
