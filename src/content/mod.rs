//! Portfolio content: the array-driven data behind each page section.
//!
//! DESIGN
//! ======
//! Content is data, not code: one YAML document describes hero, about,
//! services, projects, blog teaser, certifications and theme. It is loaded
//! once at startup (operator file or the built-in placeholder) and shared
//! read-only.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use time::Date;

const BUILTIN_CONTENT: &str = include_str!("default_content.yaml");

/// Category value that disables the gallery filter.
pub const ALL_CATEGORIES: &str = "all";

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content file read failed: {0}")]
    Read(#[from] std::io::Error),
    #[error("content parse failed: {0}")]
    Parse(#[from] serde_yaml::Error),
}

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    pub headline: String,
    pub tagline: String,
    pub cta_label: String,
    pub cta_href: String,
    #[serde(default)]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct About {
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    #[serde(with = "iso_date")]
    pub published: Date,
    pub read_minutes: u32,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    pub title: String,
    pub issuer: String,
    /// Free-form, e.g. `2024-05`.
    #[serde(default)]
    pub issued: Option<String>,
    #[serde(default)]
    pub credential_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub default_mode: ThemeMode,
    pub accent: String,
}

// =============================================================================
// PORTFOLIO
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioContent {
    pub hero: Hero,
    pub about: About,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub blog: Vec<BlogPost>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    pub theme: Theme,
}

impl PortfolioContent {
    /// Load from `path`, or the built-in placeholder content when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid content YAML.
    pub fn load(path: Option<&Path>) -> Result<Self, ContentError> {
        match path {
            Some(path) => Self::from_yaml(&std::fs::read_to_string(path)?),
            None => Self::builtin(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ContentError::Parse`] for malformed YAML or missing sections.
    pub fn from_yaml(yaml: &str) -> Result<Self, ContentError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// # Errors
    ///
    /// Only fails if the bundled document is broken.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_yaml(BUILTIN_CONTENT)
    }

    /// Gallery filter. [`ALL_CATEGORIES`] returns every project; matching is
    /// case-insensitive.
    #[must_use]
    pub fn projects_in(&self, category: &str) -> Vec<&Project> {
        if category.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return self.projects.iter().collect();
        }
        self.projects
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Distinct project categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.projects
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(c.to_ascii_lowercase()))
            .collect()
    }

    #[must_use]
    pub fn featured_projects(&self) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.featured).collect()
    }

    /// Blog teaser: newest `limit` posts.
    #[must_use]
    pub fn latest_posts(&self, limit: usize) -> Vec<&BlogPost> {
        let mut posts: Vec<&BlogPost> = self.blog.iter().collect();
        posts.sort_by(|a, b| b.published.cmp(&a.published));
        posts.truncate(limit);
        posts
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
