//! The prompt catalog.
//!
//! Prompts ship as a JSON asset embedded in the binary and are validated once
//! at startup. After that the catalog is read-only.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Synthetic category that matches every prompt.
pub const ALL_CATEGORY: &str = "All";

const EMBEDDED_PROMPTS: &str = include_str!("../assets/prompts.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub id: u32,
    pub category: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug)]
pub enum CatalogError {
    Parse(String),
    Empty,
    DuplicateId(u32),
    EmptyField { id: u32, field: &'static str },
    ReservedCategory(u32),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "Invalid prompt catalog: {}", e),
            CatalogError::Empty => write!(f, "Prompt catalog is empty"),
            CatalogError::DuplicateId(id) => write!(f, "Duplicate prompt id {}", id),
            CatalogError::EmptyField { id, field } => {
                write!(f, "Prompt {} has an empty {}", id, field)
            }
            CatalogError::ReservedCategory(id) => {
                write!(f, "Prompt {} uses the reserved category '{}'", id, ALL_CATEGORY)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Clone)]
pub struct PromptCatalog {
    prompts: Vec<PromptRecord>,
}

impl PromptCatalog {
    /// Load the catalog compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_PROMPTS)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let prompts: Vec<PromptRecord> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(prompts)
    }

    /// Build a catalog from records, rejecting duplicate ids and blank fields.
    pub fn new(prompts: Vec<PromptRecord>) -> Result<Self, CatalogError> {
        if prompts.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for prompt in &prompts {
            if !seen.insert(prompt.id) {
                return Err(CatalogError::DuplicateId(prompt.id));
            }
            let fields = [
                ("category", &prompt.category),
                ("title", &prompt.title),
                ("body", &prompt.body),
            ];
            for (field, value) in fields {
                if value.trim().is_empty() {
                    return Err(CatalogError::EmptyField { id: prompt.id, field });
                }
            }
            if prompt.category == ALL_CATEGORY {
                return Err(CatalogError::ReservedCategory(prompt.id));
            }
        }

        Ok(Self { prompts })
    }

    pub fn list(&self) -> &[PromptRecord] {
        &self.prompts
    }

    pub fn get(&self, id: u32) -> Option<&PromptRecord> {
        self.prompts.iter().find(|p| p.id == id)
    }

    /// "All" followed by each distinct category in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORY.to_string()];
        for prompt in &self.prompts {
            if !categories.contains(&prompt.category) {
                categories.push(prompt.category.clone());
            }
        }
        categories
    }

    pub fn filter(&self, category: &str) -> Vec<&PromptRecord> {
        if category == ALL_CATEGORY {
            return self.prompts.iter().collect();
        }
        self.prompts
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }
}
