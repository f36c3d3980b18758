use anyhow::{bail, Result};
use std::collections::HashMap;

/// Tracks which source label produced each slug in one output column, so two
/// distinct labels can never be folded into the same category.
///
/// A qualifier separates slugs that are meant to repeat, e.g. the same
/// affordability measure once as original and once as revised value.
#[derive(Debug)]
pub struct SlugRegistry {
    column: &'static str,
    seen: HashMap<(String, String), String>,
}

impl SlugRegistry {
    pub fn new(column: &'static str) -> Self {
        Self {
            column,
            seen: HashMap::new(),
        }
    }

    pub fn register(&mut self, label: &str, slug: String) -> Result<String> {
        self.register_qualified("", label, slug)
    }

    /// Record `label` → `slug` under `qualifier` and hand the slug back.
    pub fn register_qualified(
        &mut self,
        qualifier: &str,
        label: &str,
        slug: String,
    ) -> Result<String> {
        let key = (qualifier.to_string(), slug);
        match self.seen.get(&key) {
            Some(existing) if existing != label => bail!(
                "column `{}`: labels `{}` and `{}` both map to `{}`",
                self.column,
                existing,
                label,
                key.1
            ),
            Some(_) => {}
            None => {
                self.seen.insert(key.clone(), label.to_string());
            }
        }
        Ok(key.1)
    }

    /// Number of distinct categories seen so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
