//! Create a new post

use anyhow::Result;
use std::fs;

use crate::Devlog;

/// Create a new post or draft
pub fn create_post(devlog: &Devlog, title: &str, layout: &str, path: Option<&str>) -> Result<()> {
    let now = chrono::Local::now();

    let target_dir = match layout {
        "draft" => devlog.source_dir.join("_drafts"),
        _ => devlog.source_dir.join("_posts"),
    };

    fs::create_dir_all(&target_dir)?;

    // Generate filename
    let filename = if let Some(p) = path {
        format!("{}.md", p)
    } else {
        let post_name = &devlog.config.new_post_name;
        let slug = slug::slugify(title);

        post_name
            .replace(":title", &slug)
            .replace(":year", &now.format("%Y").to_string())
            .replace(":month", &now.format("%m").to_string())
            .replace(":day", &now.format("%d").to_string())
    };

    let file_path = target_dir.join(&filename);

    // Load scaffold template
    let scaffold_path = devlog
        .base_dir
        .join("scaffolds")
        .join(format!("{}.md", layout));
    let scaffold_content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        // Default scaffold
        r#"---
title: {{ title }}
date: {{ date }}
summary:
categories:
---
"#
        .to_string()
    };

    let content = scaffold_content
        .replace("{{ title }}", title)
        .replace("{{ date }}", &now.format("%Y-%m-%d %H:%M:%S").to_string());

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

/// Run the new command
pub fn run(devlog: &Devlog, title: &str, layout: Option<&str>) -> Result<()> {
    let layout = layout.unwrap_or(&devlog.config.default_layout);
    create_post(devlog, title, layout, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Devlog;

    #[test]
    fn test_create_post_writes_scaffolded_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("source/_posts")).unwrap();
        let devlog = Devlog::new(dir.path()).unwrap();

        create_post(&devlog, "My First Post", "post", None).unwrap();

        let file = dir.path().join("source/_posts/my-first-post.md");
        assert!(file.exists());
        let content = std::fs::read_to_string(file).unwrap();
        assert!(content.contains("title: My First Post"));
    }

    #[test]
    fn test_create_post_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("source/_posts")).unwrap();
        let devlog = Devlog::new(dir.path()).unwrap();

        create_post(&devlog, "Dup", "post", None).unwrap();
        assert!(create_post(&devlog, "Dup", "post", None).is_err());
    }
}
