//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading the site configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub keywords: Option<Vec<String>>,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,
    pub permalink: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub category_dir: String,

    // Writing
    pub new_post_name: String,
    pub default_layout: String,
    pub render_drafts: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Home page
    #[serde(default)]
    pub profile: ProfileConfig,

    // Date format
    pub date_format: String,

    // Pagination
    pub per_page: usize,
    pub pagination_dir: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Devlog".to_string(),
            description: String::new(),
            keywords: None,
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            permalink: "posts/:year/:month/:day/:title/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            category_dir: "category".to_string(),

            new_post_name: ":title.md".to_string(),
            default_layout: "post".to_string(),
            render_drafts: false,
            highlight: HighlightConfig::default(),

            profile: ProfileConfig::default(),

            date_format: "YYYY-MM-DD".to_string(),

            per_page: 10,
            pagination_dir: "page".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Profile data for the introduction panel on the home page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Display name, falls back to the site author when empty
    pub name: String,
    /// Short greeting line above the name
    pub greeting: String,
    /// One-line bio under the name
    pub tagline: String,
    /// Avatar image path, relative to the source directory
    pub avatar: String,
    /// Social links shown in the introduction panel
    #[serde(default)]
    pub links: Vec<ProfileLink>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            greeting: "Nice to Meet You,".to_string(),
            tagline: String::new(),
            avatar: String::new(),
            links: Vec::new(),
        }
    }
}

impl ProfileConfig {
    /// Resolve the display name against the site author
    pub fn display_name(&self, author: &str) -> String {
        if self.name.is_empty() {
            author.to_string()
        } else {
            self.name.clone()
        }
    }
}

/// A single social link in the introduction panel
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProfileLink {
    pub name: String,
    pub url: String,
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Devlog");
        assert_eq!(config.per_page, 10);
        assert_eq!(config.category_dir, "category");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
per_page: 20
profile:
  tagline: I build things for the web.
  avatar: images/profile.png
  links:
    - name: GitHub
      url: https://github.com/test
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.per_page, 20);
        assert_eq!(config.profile.tagline, "I build things for the web.");
        assert_eq!(config.profile.links.len(), 1);
        assert_eq!(config.profile.links[0].name, "GitHub");
    }

    #[test]
    fn test_profile_display_name_falls_back_to_author() {
        let profile = ProfileConfig::default();
        assert_eq!(profile.display_name("Jane"), "Jane");

        let named = ProfileConfig {
            name: "Dev".to_string(),
            ..Default::default()
        };
        assert_eq!(named.display_name("Jane"), "Dev");
    }
}
