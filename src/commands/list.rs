//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::taxonomy::count_categories;
use crate::Devlog;

/// List site content by type
pub fn run(devlog: &Devlog, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(devlog);

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                let categories = if post.categories.is_empty() {
                    String::new()
                } else {
                    format!(" #{}", post.categories.join(" #"))
                };
                println!(
                    "  {} - {}{} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    categories,
                    post.source
                );
            }
        }
        "category" | "categories" => {
            let posts = loader.load_posts()?;
            let counts = count_categories(&posts);
            // minus the All bucket
            println!("Categories ({}):", counts.len().saturating_sub(1));
            for (name, count) in counts.iter() {
                println!("  {} ({})", name, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, category",
                content_type
            );
        }
    }

    Ok(())
}
