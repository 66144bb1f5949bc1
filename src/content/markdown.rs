//! Markdown rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::strip_html;

/// Character budget for summaries derived from the post body
const SUMMARY_MAX_CHARS: usize = 160;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted =
                        self.highlight_code(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Derive a card summary from rendered HTML
    ///
    /// Used when the frontmatter carries no `summary` field: tags are
    /// stripped and the text truncated at a character boundary.
    pub fn summarize(html_content: &str) -> String {
        let text = strip_html(html_content);
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        if text.chars().count() <= SUMMARY_MAX_CHARS {
            text
        } else {
            let truncated: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
            format!("{}…", truncated.trim_end())
        }
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = match self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        {
            Some(theme) => theme,
            None => return format!("<pre><code>{}</code></pre>", escape_html(code)),
        };

        let highlighted = match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to highlight code block: {}", e);
                format!("<pre><code>{}</code></pre>", escape_html(code))
            }
        };

        if self.line_numbers {
            let line_count = code.lines().count().max(1);
            let gutter: String = (1..=line_count)
                .map(|n| format!("<span class=\"line-number\">{}</span>\n", n))
                .collect();
            format!(
                "<figure class=\"highlight\"><div class=\"gutter\">{}</div>{}</figure>",
                gutter, highlighted
            )
        } else {
            format!("<figure class=\"highlight\">{}</figure>", highlighted)
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Title\n\nHello *world*.").unwrap();
        assert!(html.contains("<h1>"));
        assert!(html.contains("<em>world</em>"));
    }

    #[test]
    fn test_render_highlights_fenced_code() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("```rust\nfn main() {}\n```")
            .unwrap();
        assert!(html.contains("class=\"highlight\""));
    }

    #[test]
    fn test_summarize_strips_tags_and_truncates() {
        let html = "<p>Hello <strong>world</strong>, this is the body.</p>";
        assert_eq!(
            MarkdownRenderer::summarize(html),
            "Hello world, this is the body."
        );

        let long = format!("<p>{}</p>", "word ".repeat(100));
        let summary = MarkdownRenderer::summarize(&long);
        assert!(summary.chars().count() <= SUMMARY_MAX_CHARS + 1);
        assert!(summary.ends_with('…'));
    }
}
