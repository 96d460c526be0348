use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::types::{Module, Section};

/// Name of the module index file inside a content directory
pub const MODULES_FILE: &str = "modules.json";

/// Directory holding per-section documents
pub const SECTIONS_DIR: &str = "sections";

/// Reads learning content from a directory laid out as
/// `modules.json` plus `sections/<module-id>/<section-id>.json`
#[derive(Debug, Clone)]
pub struct ContentLoader {
    content_dir: PathBuf,
}

/// `modules.json` is normally wrapped in an object, but older exports are a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum ModulesDocument {
    Wrapped { modules: Vec<Value> },
    Bare(Vec<Value>),
}

impl ModulesDocument {
    /// Entries that are not module objects are skipped, the rest keep their order
    fn into_modules(self) -> Vec<Module> {
        let entries = match self {
            ModulesDocument::Wrapped { modules } => modules,
            ModulesDocument::Bare(modules) => modules,
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                if !entry.is_object() {
                    tracing::warn!("Skipping module entry at index {}: not an object", index);
                    return None;
                }
                Module::deserialize(entry)
                    .inspect_err(|e| tracing::warn!("Skipping module entry at index {}: {}", index, e))
                    .ok()
            })
            .collect()
    }
}

impl ContentLoader {
    /// Create a loader rooted at a content directory
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Get the content directory
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Get the path of the module index
    pub fn modules_path(&self) -> PathBuf {
        self.content_dir.join(MODULES_FILE)
    }

    /// Get the path of a section document
    pub fn section_path(&self, module_id: &str, section_id: &str) -> PathBuf {
        self.content_dir
            .join(SECTIONS_DIR)
            .join(module_id)
            .join(format!("{section_id}.json"))
    }

    /// Check if a section document exists
    pub fn has_section(&self, module_id: &str, section_id: &str) -> bool {
        self.section_path(module_id, section_id).exists()
    }

    /// Load all learning modules from the module index
    pub fn load_modules(&self) -> Result<Vec<Module>> {
        let path = self.modules_path();
        tracing::info!("Loading modules from {}", path.display());

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read module index: {}", path.display()))?;
        let document: ModulesDocument = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse module index: {}", path.display()))?;

        let modules = document.into_modules();
        validate_modules(&modules)?;

        tracing::info!("Loaded {} modules", modules.len());
        Ok(modules)
    }

    /// Load a specific learning section
    pub fn load_section(&self, module_id: &str, section_id: &str) -> Result<Section> {
        validate_id("Module", module_id)?;
        validate_id("Section", section_id)?;

        let path = self.section_path(module_id, section_id);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Section {section_id} not found"))?;
        let section: Section = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse section: {}", path.display()))?;

        validate_section(&section)?;
        Ok(section)
    }

    /// Load the module index and replace every section summary that has a
    /// full section document on disk
    pub fn load_all(&self) -> Result<Vec<Module>> {
        let mut modules = self.load_modules()?;

        for module in &mut modules {
            for section in &mut module.sections {
                if !is_valid_id(&module.id) || !is_valid_id(&section.id) {
                    tracing::debug!(
                        "Skipping hydration of {}/{}: id is not a content slug",
                        module.id,
                        section.id
                    );
                    continue;
                }
                if !self.has_section(&module.id, &section.id) {
                    continue;
                }

                match self.load_section(&module.id, &section.id) {
                    Ok(full) => *section = full,
                    Err(e) => {
                        tracing::warn!(
                            "Keeping summary for section {}/{}: {:#}",
                            module.id,
                            section.id,
                            e
                        );
                    }
                }
            }
        }

        Ok(modules)
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_lowercase() || c == '-')
}

fn validate_id(kind: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("{kind} ID is required");
    }
    if !is_valid_id(id) {
        bail!("Invalid {} ID format", kind.to_lowercase());
    }
    Ok(())
}

fn validate_modules(modules: &[Module]) -> Result<()> {
    for (index, module) in modules.iter().enumerate() {
        if module.id.is_empty() || module.title.is_empty() {
            bail!("Module at index {index} is missing required fields (id, title)");
        }
    }
    Ok(())
}

fn validate_section(section: &Section) -> Result<()> {
    if section.id.is_empty() || section.module_id.is_empty() || section.title.is_empty() {
        bail!("Section is missing required fields (id, moduleId, title)");
    }
    if section.content.is_empty() {
        tracing::warn!("Section {} has no content", section.id);
    }
    Ok(())
}
