//! Category aggregation and selection
//!
//! The home page is driven by three small pieces of pure logic: a count of
//! posts per category (with a synthetic `All` bucket), a selection resolved
//! once from the `category` query parameter, and a filter predicate over
//! the post list. Everything here is a total function over its inputs.

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::content::Post;

/// Label of the synthetic bucket matching every post
pub const ALL_CATEGORY: &str = "All";

/// Mapping from category label to post count
///
/// `All` is always present, always first, and equals the number of posts
/// (not the number of category tags, since a post may carry several).
/// Remaining labels keep first-seen order from the post list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCounts(IndexMap<String, usize>);

impl CategoryCounts {
    /// Count of posts under a label, 0 when the label is unknown
    pub fn get(&self, label: &str) -> usize {
        self.0.get(label).copied().unwrap_or(0)
    }

    /// Total number of posts (the `All` bucket)
    pub fn total(&self) -> usize {
        self.get(ALL_CATEGORY)
    }

    /// Whether a label is present (including `All`)
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    /// Iterate labels and counts in display order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Labels excluding the `All` bucket, in first-seen order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str()).filter(|k| *k != ALL_CATEGORY)
    }

    /// Number of entries, counting the `All` bucket
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Count posts per category over an ordered post list
///
/// Each of a post's category labels increments its key by exactly 1, and
/// `All` is incremented once per post regardless of how many labels the
/// post carries, including zero.
pub fn count_categories(posts: &[Post]) -> CategoryCounts {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    counts.insert(ALL_CATEGORY.to_string(), 0);

    for post in posts {
        for category in &post.categories {
            *counts.entry(category.clone()).or_insert(0) += 1;
        }
        // once per post, independent of its category count
        *counts.entry(ALL_CATEGORY.to_string()).or_insert(0) += 1;
    }

    CategoryCounts(counts)
}

/// The category selection for a home page render
///
/// Resolved exactly once at the boundary from the raw `category` query
/// parameter; the rest of the code only ever sees this variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedCategory {
    /// Show every post
    All,
    /// Show posts carrying this label; unknown labels yield an empty list
    Label(String),
}

impl SelectedCategory {
    /// Resolve a single raw parameter value
    ///
    /// Absent and empty values normalize to `All`.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None => SelectedCategory::All,
            Some(value) => {
                let value = value.trim();
                if value.is_empty() || value == ALL_CATEGORY {
                    SelectedCategory::All
                } else {
                    SelectedCategory::Label(value.to_string())
                }
            }
        }
    }

    /// Resolve a raw query string such as `category=Web&foo=1`
    ///
    /// The parameter may be absent, appear once, or be repeated; the first
    /// `category` pair wins. Values are percent-decoded with `+` as space.
    pub fn from_query(query: &str) -> Self {
        let raw = query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == "category").then_some(value)
        });

        match raw {
            None => SelectedCategory::All,
            Some(value) => {
                let value = value.replace('+', " ");
                let decoded = percent_decode_str(&value).decode_utf8_lossy();
                SelectedCategory::from_param(Some(&decoded))
            }
        }
    }

    /// The label to display and mark as active
    pub fn label(&self) -> &str {
        match self {
            SelectedCategory::All => ALL_CATEGORY,
            SelectedCategory::Label(label) => label,
        }
    }

    /// Whether a post belongs to the current selection
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            SelectedCategory::All => true,
            SelectedCategory::Label(label) => post.categories.iter().any(|c| c == label),
        }
    }
}

impl std::fmt::Display for SelectedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The visible subset of posts for a selection
///
/// Identity for `All`; otherwise every post whose categories contain the
/// selected label, in input order. Re-deriving from the same inputs always
/// yields the same subset.
pub fn filter_posts<'a>(posts: &'a [Post], selected: &SelectedCategory) -> Vec<&'a Post> {
    posts.iter().filter(|p| selected.matches(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn post_with_categories(title: &str, categories: &[&str]) -> Post {
        let mut post = Post::new(
            title.to_string(),
            Local::now(),
            format!("_posts/{}.md", slug::slugify(title)),
        );
        post.categories = categories.iter().map(|c| c.to_string()).collect();
        post
    }

    #[test]
    fn all_bucket_equals_post_count() {
        let posts = vec![
            post_with_categories("One", &["Web"]),
            post_with_categories("Two", &["Mobile", "Web"]),
            post_with_categories("Three", &[]),
        ];

        let counts = count_categories(&posts);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.get(ALL_CATEGORY), posts.len());
    }

    #[test]
    fn per_category_counts_match_membership() {
        let posts = vec![
            post_with_categories("One", &["Web"]),
            post_with_categories("Two", &["Mobile", "Web"]),
            post_with_categories("Three", &[]),
        ];

        let counts = count_categories(&posts);
        assert_eq!(counts.get("Web"), 2);
        assert_eq!(counts.get("Mobile"), 1);
        assert_eq!(counts.get("Rust"), 0);
    }

    #[test]
    fn empty_list_yields_all_zero() {
        let counts = count_categories(&[]);
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.len(), 1);
        assert!(counts.contains(ALL_CATEGORY));
    }

    #[test]
    fn post_without_categories_counts_toward_all() {
        // The bucket counts posts, not category tags.
        let posts = vec![post_with_categories("Untagged", &[])];
        let counts = count_categories(&posts);
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.labels().count(), 0);
    }

    #[test]
    fn all_is_first_and_labels_keep_first_seen_order() {
        let posts = vec![
            post_with_categories("One", &["Web"]),
            post_with_categories("Two", &["Mobile", "Web"]),
        ];

        let counts = count_categories(&posts);
        let order: Vec<&str> = counts.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec![ALL_CATEGORY, "Web", "Mobile"]);
    }

    #[test]
    fn filter_by_all_is_identity() {
        let posts = vec![
            post_with_categories("One", &["Web"]),
            post_with_categories("Two", &["Mobile", "Web"]),
            post_with_categories("Three", &[]),
        ];

        let visible = filter_posts(&posts, &SelectedCategory::All);
        assert_eq!(visible.len(), posts.len());
        assert_eq!(visible[0].title, "One");
        assert_eq!(visible[2].title, "Three");
    }

    #[test]
    fn filter_by_label_keeps_matching_posts_in_order() {
        let posts = vec![
            post_with_categories("One", &["Web"]),
            post_with_categories("Two", &["Mobile", "Web"]),
            post_with_categories("Three", &[]),
        ];

        let selected = SelectedCategory::Label("Web".to_string());
        let visible = filter_posts(&posts, &selected);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].title, "One");
        assert_eq!(visible[1].title, "Two");
    }

    #[test]
    fn filter_by_unknown_label_is_empty_not_an_error() {
        let posts = vec![post_with_categories("One", &["Web"])];
        let selected = SelectedCategory::Label("Gamedev".to_string());
        assert!(filter_posts(&posts, &selected).is_empty());
    }

    #[test]
    fn selection_normalizes_missing_and_empty_to_all() {
        assert_eq!(SelectedCategory::from_param(None), SelectedCategory::All);
        assert_eq!(SelectedCategory::from_param(Some("")), SelectedCategory::All);
        assert_eq!(
            SelectedCategory::from_param(Some("  ")),
            SelectedCategory::All
        );
        assert_eq!(SelectedCategory::from_param(Some("All")), SelectedCategory::All);
        assert_eq!(
            SelectedCategory::from_param(Some("Web")),
            SelectedCategory::Label("Web".to_string())
        );
    }

    #[test]
    fn query_string_resolves_first_category_pair() {
        assert_eq!(SelectedCategory::from_query(""), SelectedCategory::All);
        assert_eq!(
            SelectedCategory::from_query("page=2"),
            SelectedCategory::All
        );
        assert_eq!(
            SelectedCategory::from_query("category=Web"),
            SelectedCategory::Label("Web".to_string())
        );
        assert_eq!(
            SelectedCategory::from_query("category=Web&category=Mobile"),
            SelectedCategory::Label("Web".to_string())
        );
        assert_eq!(
            SelectedCategory::from_query("category="),
            SelectedCategory::All
        );
    }

    #[test]
    fn query_values_are_percent_decoded() {
        assert_eq!(
            SelectedCategory::from_query("category=Web%20Dev"),
            SelectedCategory::Label("Web Dev".to_string())
        );
        assert_eq!(
            SelectedCategory::from_query("category=Web+Dev"),
            SelectedCategory::Label("Web Dev".to_string())
        );
    }

    #[test]
    fn aggregation_matches_filter_cardinality() {
        let posts = vec![
            post_with_categories("One", &["Web"]),
            post_with_categories("Two", &["Mobile", "Web"]),
            post_with_categories("Three", &["Mobile"]),
            post_with_categories("Four", &[]),
        ];

        let counts = count_categories(&posts);
        for label in counts.labels() {
            let selected = SelectedCategory::Label(label.to_string());
            assert_eq!(counts.get(label), filter_posts(&posts, &selected).len());
        }
    }
}
