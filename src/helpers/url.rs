//! URL helper functions

use crate::config::SiteConfig;
use crate::taxonomy::{SelectedCategory, ALL_CATEGORY};

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/blog/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = url_for(config, path);
    format!("{}{}", base, path)
}

/// Root-relative URL of a category's first home page
///
/// `All` maps to the site root; labels map to `category/<slug>/`.
pub fn category_url(config: &SiteConfig, label: &str) -> String {
    if label == ALL_CATEGORY {
        url_for(config, "")
    } else {
        url_for(
            config,
            &format!("{}/{}/", config.category_dir, slug::slugify(label)),
        )
    }
}

/// Root-relative URL of page `n` within a selection's home pages
///
/// Page 1 is the selection's base URL; later pages nest under the
/// pagination directory.
pub fn page_url(config: &SiteConfig, selected: &SelectedCategory, page_num: usize) -> String {
    let base = category_url(config, selected.label());
    if page_num <= 1 {
        base
    } else {
        format!("{}{}/{}/", base, config.pagination_dir, page_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            root: "/blog/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/blog/css/style.css");
        assert_eq!(url_for(&config, "about/"), "/blog/about/");
        assert_eq!(url_for(&config, ""), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/blog/about/"
        );
    }

    #[test]
    fn test_category_url() {
        let config = test_config();
        assert_eq!(category_url(&config, "All"), "/blog/");
        assert_eq!(category_url(&config, "Web Dev"), "/blog/category/web-dev/");
    }

    #[test]
    fn test_page_url() {
        let config = test_config();
        let all = SelectedCategory::All;
        let web = SelectedCategory::Label("Web".to_string());
        assert_eq!(page_url(&config, &all, 1), "/blog/");
        assert_eq!(page_url(&config, &all, 3), "/blog/page/3/");
        assert_eq!(page_url(&config, &web, 1), "/blog/category/web/");
        assert_eq!(page_url(&config, &web, 2), "/blog/category/web/page/2/");
    }
}
