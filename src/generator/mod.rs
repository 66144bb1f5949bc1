//! Generator module - generates static HTML files using built-in Tera templates

use anyhow::Result;
use std::fs;

use tera::Context;
use walkdir::WalkDir;

use crate::content::Post;
use crate::helpers::{
    absolutize_urls, category_url, escape_xml, format_date, page_url, strip_invalid_xml_chars,
    url_for,
};
use crate::taxonomy::{count_categories, filter_posts, CategoryCounts, SelectedCategory};
use crate::templates::{
    CategoryItem, ConfigData, NavPost, PaginationData, PostData, ProfileData, ProfileLinkData,
    SiteData, TemplateRenderer,
};
use crate::Devlog;

/// Number of entries included in the Atom feed
const FEED_LIMIT: usize = 20;

/// Static site generator using Tera templates
pub struct Generator {
    devlog: Devlog,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(devlog: &Devlog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            devlog: devlog.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        fs::create_dir_all(&self.devlog.public_dir)?;

        // Copy source assets (thumbnails, images, etc.)
        self.copy_source_assets()?;

        let counts = count_categories(posts);

        // Home pages for the All bucket and every category
        self.generate_home_pages(posts, &counts)?;

        // Individual post pages
        self.generate_post_pages(posts, &counts)?;

        // Atom feed
        self.generate_atom_feed(posts)?;

        // Post index for client-side use
        self.generate_post_index(posts)?;

        Ok(())
    }

    /// Render one home page for a selection, ready to serve
    ///
    /// Shared between static generation and the dev server's live preview;
    /// a pure recomputation from the post list each time.
    pub fn render_home_page(
        &self,
        posts: &[Post],
        counts: &CategoryCounts,
        selected: &SelectedCategory,
        page_num: usize,
    ) -> Result<String> {
        let config = &self.devlog.config;
        let visible = filter_posts(posts, selected);

        let per_page = config.per_page.max(1);
        let total_pages = visible.len().div_ceil(per_page).max(1);
        let page_num = page_num.clamp(1, total_pages);

        let start = (page_num - 1) * per_page;
        let end = (start + per_page).min(visible.len());
        let page_posts: Vec<PostData> = visible[start..end]
            .iter()
            .map(|p| self.post_to_data(p))
            .collect();

        let pagination = PaginationData {
            per_page,
            total: total_pages,
            current: page_num,
            current_url: page_url(config, selected, page_num),
            prev: page_num.saturating_sub(1),
            prev_link: if page_num > 1 {
                page_url(config, selected, page_num - 1)
            } else {
                String::new()
            },
            next: if page_num < total_pages {
                page_num + 1
            } else {
                0
            },
            next_link: if page_num < total_pages {
                page_url(config, selected, page_num + 1)
            } else {
                String::new()
            },
        };

        let site_data = self.build_site_data(posts, counts);
        let mut context = self.create_base_context(&site_data);
        context.insert("categories", &self.build_category_items(counts, selected));
        context.insert("selected_category", selected.label());
        context.insert("page_posts", &page_posts);
        context.insert("pagination", &pagination);
        context.insert("is_home", &true);
        context.insert("current_path", &pagination.current_url);

        self.renderer.render("index.html", &context)
    }

    /// Generate paginated home pages for every selection
    fn generate_home_pages(&self, posts: &[Post], counts: &CategoryCounts) -> Result<()> {
        let mut selections = vec![SelectedCategory::All];
        selections.extend(
            counts
                .labels()
                .map(|label| SelectedCategory::Label(label.to_string())),
        );

        for selected in &selections {
            let visible = filter_posts(posts, selected);
            let per_page = self.devlog.config.per_page.max(1);
            let total_pages = visible.len().div_ceil(per_page).max(1);

            for page_num in 1..=total_pages {
                let html = self.render_home_page(posts, counts, selected, page_num)?;

                let rel = self.home_rel_path(selected, page_num);
                let output_path = self.devlog.public_dir.join(rel).join("index.html");
                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&output_path, html)?;
                tracing::debug!("Generated: {:?}", output_path);
            }
        }

        tracing::info!("Generated home pages for {} selections", selections.len());
        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[Post], counts: &CategoryCounts) -> Result<()> {
        let site_data = self.build_site_data(posts, counts);

        for (i, post) in posts.iter().enumerate() {
            // posts are newest-first, so the previous post is the older one
            let prev_post = posts.get(i + 1).map(|p| NavPost {
                title: p.title.clone(),
                path: format!("/{}", p.path.trim_start_matches('/')),
            });
            let next_post = (i > 0).then(|| NavPost {
                title: posts[i - 1].title.clone(),
                path: format!("/{}", posts[i - 1].path.trim_start_matches('/')),
            });

            let mut context = self.create_base_context(&site_data);
            context.insert("page_title", &post.title);
            context.insert(
                "page_date",
                &post.date.format("%Y-%m-%d").to_string(),
            );
            context.insert("page_content", &post.content);
            context.insert("page_categories", &post.categories);
            context.insert("current_path", &post.path);
            context.insert("prev_post", &prev_post);
            context.insert("next_post", &next_post);

            let html = self.renderer.render("post.html", &context)?;

            // Strip leading slash from path to avoid creating absolute paths
            let clean_path = post.path.trim_start_matches('/');
            let output_path = self.devlog.public_dir.join(clean_path).join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
            }
            fs::write(&output_path, &html)
                .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate the Atom feed
    fn generate_atom_feed(&self, posts: &[Post]) -> Result<()> {
        let config = &self.devlog.config;
        let base_url = config.url.trim_end_matches('/');

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}/atom.xml\" rel=\"self\"/>\n",
            base_url
        ));
        feed.push_str(&format!("  <link href=\"{}/\"/>\n", base_url));
        feed.push_str(&format!(
            "  <updated>{}</updated>\n",
            chrono::Utc::now().to_rfc3339()
        ));
        feed.push_str(&format!("  <id>{}/</id>\n", base_url));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for post in posts.iter().take(FEED_LIMIT) {
            let path = if post.path.starts_with('/') {
                post.path.clone()
            } else {
                format!("/{}", post.path)
            };
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
            feed.push_str(&format!("    <link href=\"{}{}\"/>\n", base_url, path));
            feed.push_str(&format!("    <id>{}{}</id>\n", base_url, path));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                post.date.to_rfc3339()
            ));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                post.date.to_rfc3339()
            ));
            for category in &post.categories {
                feed.push_str(&format!(
                    "    <category term=\"{}\"/>\n",
                    escape_xml(category)
                ));
            }
            let content = absolutize_urls(&post.content, base_url);
            let content = strip_invalid_xml_chars(&content);
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                content
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        let output_path = self.devlog.public_dir.join("atom.xml");
        fs::write(&output_path, feed)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Generate the post index (JSON)
    fn generate_post_index(&self, posts: &[Post]) -> Result<()> {
        let index: Vec<serde_json::Value> = posts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "title": p.title,
                    "url": format!("/{}", p.path.trim_start_matches('/')),
                    "summary": p.summary,
                    "date": p.date.format("%Y-%m-%d").to_string(),
                    "categories": p.categories,
                })
            })
            .collect();

        let output_path = self.devlog.public_dir.join("posts.json");
        let json = serde_json::to_string_pretty(&index)?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated posts.json");

        Ok(())
    }

    /// Copy source assets (images, etc.) to the public directory
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.devlog.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let ext = path.extension().and_then(|e| e.to_str());

                // Markdown files are processed separately
                if matches!(ext, Some("md") | Some("markdown")) {
                    continue;
                }

                if path
                    .components()
                    .any(|c| c.as_os_str() == "_posts" || c.as_os_str() == "_drafts")
                {
                    continue;
                }

                let relative = path.strip_prefix(source_dir)?;
                let dest = self.devlog.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }

    /// Build site data for templates
    fn build_site_data(&self, posts: &[Post], counts: &CategoryCounts) -> SiteData {
        SiteData {
            posts: posts.iter().map(|p| self.post_to_data(p)).collect(),
            categories: counts.clone(),
            post_count: posts.len(),
        }
    }

    /// Build the category filter entries, `All` first
    fn build_category_items(
        &self,
        counts: &CategoryCounts,
        selected: &SelectedCategory,
    ) -> Vec<CategoryItem> {
        counts
            .iter()
            .map(|(name, count)| CategoryItem {
                name: name.to_string(),
                count,
                url: category_url(&self.devlog.config, name),
                selected: selected.label() == name,
            })
            .collect()
    }

    /// Map a post to its template representation
    fn post_to_data(&self, post: &Post) -> PostData {
        let config = &self.devlog.config;
        PostData {
            id: post.id.clone(),
            title: post.title.clone(),
            date: format_date(&post.date, &config.date_format),
            summary: post.summary.clone(),
            categories: post.categories.clone(),
            thumbnail: post.thumbnail.as_ref().map(|t| url_for(config, t)),
            path: format!("/{}", post.path.trim_start_matches('/')),
            permalink: post.permalink.clone(),
        }
    }

    /// Build config data for templates
    fn build_config_data(&self) -> ConfigData {
        let config = &self.devlog.config;
        ConfigData {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
            per_page: config.per_page,
            keyword: config
                .keywords
                .as_ref()
                .map(|k| k.join(", "))
                .unwrap_or_default(),
        }
    }

    /// Build introduction panel data for templates
    fn build_profile_data(&self) -> ProfileData {
        let config = &self.devlog.config;
        let profile = &config.profile;
        ProfileData {
            name: profile.display_name(&config.author),
            greeting: profile.greeting.clone(),
            tagline: profile.tagline.clone(),
            avatar: if profile.avatar.is_empty() {
                String::new()
            } else {
                url_for(config, &profile.avatar)
            },
            links: profile
                .links
                .iter()
                .map(|l| ProfileLinkData {
                    name: l.name.clone(),
                    url: l.url.clone(),
                })
                .collect(),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self, site_data: &SiteData) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("config", &self.build_config_data());
        context.insert("profile", &self.build_profile_data());
        context.insert(
            "current_year",
            &chrono::Local::now().format("%Y").to_string(),
        );
        context
    }

    /// Output directory of a home page, relative to the public directory
    fn home_rel_path(&self, selected: &SelectedCategory, page_num: usize) -> String {
        let config = &self.devlog.config;
        let base = match selected {
            SelectedCategory::All => String::new(),
            SelectedCategory::Label(label) => format!(
                "{}/{}/",
                config.category_dir,
                slug::slugify(label)
            ),
        };

        if page_num <= 1 {
            base
        } else {
            format!("{}{}/{}/", base, config.pagination_dir, page_num)
        }
    }
}
