//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Devlog;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("source/_posts"))?;
    fs::create_dir_all(target_dir.join("source/_drafts"))?;
    fs::create_dir_all(target_dir.join("source/images"))?;
    fs::create_dir_all(target_dir.join("scaffolds"))?;

    // Create default _config.yml
    let config_content = r#"# Devlog Configuration

# Site
title: My Devlog
description: ''
keywords:
author: John Doe
language: en

# URL
url: http://example.com
root: /
permalink: posts/:year/:month/:day/:title/

# Directory
source_dir: source
public_dir: public
category_dir: category

# Writing
new_post_name: :title.md
default_layout: post
render_drafts: false
highlight:
  theme: base16-ocean.dark
  line_number: false

# Home page introduction panel
profile:
  greeting: Nice to Meet You,
  tagline: I build things for the web.
  avatar: images/profile.png
  links:
    - name: GitHub
      url: https://github.com/username

# Date format
date_format: YYYY-MM-DD

# Pagination
per_page: 10
pagination_dir: page
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    // Create scaffold templates
    let post_scaffold = r#"---
title: {{ title }}
date: {{ date }}
summary:
categories:
thumbnail:
---
"#;

    let draft_scaffold = r#"---
title: {{ title }}
summary:
categories:
published: false
---
"#;

    fs::write(target_dir.join("scaffolds/post.md"), post_scaffold)?;
    fs::write(target_dir.join("scaffolds/draft.md"), draft_scaffold)?;

    // Create sample posts covering the category filter states: multiple
    // categories, a single one, and none at all
    let now = chrono::Local::now();
    let date = now.format("%Y-%m-%d %H:%M:%S");

    let welcome_post = format!(
        r#"---
title: Welcome to Devlog
date: {date}
summary: A quick tour of your new blog.
categories:
  - Web
---

Welcome to your new blog! Posts live under `source/_posts` as markdown
files with YAML front-matter.

## Create a new post

```bash
$ devlog new "My New Post"
```

## Preview locally

```bash
$ devlog server
```

## Generate static files

```bash
$ devlog generate
```
"#
    );

    let categories_post = format!(
        r#"---
title: Organizing Posts with Categories
date: {date}
summary: How the category filter on the home page works.
categories:
  - Web
  - Mobile
---

Every category you use shows up in the home page filter with a post
count, and the synthetic `All` entry always counts every post. A post
may carry several categories, one, or none at all.
"#
    );

    let notes_post = format!(
        r#"---
title: Untitled Notes
date: {date}
summary: A post without any category still shows up under All.
---

Posts without categories are only reachable through the `All` filter.
"#
    );

    fs::write(
        target_dir.join("source/_posts/welcome-to-devlog.md"),
        welcome_post,
    )?;
    fs::write(
        target_dir.join("source/_posts/organizing-posts-with-categories.md"),
        categories_post,
    )?;
    fs::write(target_dir.join("source/_posts/untitled-notes.md"), notes_post)?;

    Ok(())
}

/// Run the init command with an existing Devlog instance
pub fn run(devlog: &Devlog) -> Result<()> {
    init_site(&devlog.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::ContentLoader;
    use crate::taxonomy::count_categories;
    use crate::Devlog;

    #[test]
    fn test_init_creates_loadable_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("_config.yml").exists());
        assert!(dir.path().join("scaffolds/post.md").exists());

        let devlog = Devlog::new(dir.path()).unwrap();
        let posts = ContentLoader::new(&devlog).load_posts().unwrap();
        assert_eq!(posts.len(), 3);

        let counts = count_categories(&posts);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.get("Web"), 2);
        assert_eq!(counts.get("Mobile"), 1);
    }
}
