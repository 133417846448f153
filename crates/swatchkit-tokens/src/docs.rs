//! HTML swatches documenting the compiled tokens.
//!
//! Each generator reads one category from the [`TokenContext`] and produces
//! a fragment that references the real custom properties, so the pattern
//! library shows whatever the stylesheet currently defines.

use std::path::{Path, PathBuf};

use crate::compiler::{write_if_changed, TokenError};
use crate::model::{Category, CategoryTokens, TokenContext};

/// File names of every swatch this module can generate.
pub const GENERATED_FILES: [&str; 7] = [
    "colors.html",
    "text-weights.html",
    "text-leading.html",
    "typography.html",
    "spacing.html",
    "fonts.html",
    "viewports.html",
];

const PANGRAM: &str = "The quick brown fox jumps over the lazy dog.";

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod \
tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";

/// A generated swatch file.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDoc {
    pub file_name: &'static str,
    pub html: String,
}

/// Render every swatch the context has tokens for.
pub fn render_token_docs(ctx: &TokenContext) -> Vec<TokenDoc> {
    let generators: [(&'static str, Category, fn(&CategoryTokens) -> String); 7] = [
        ("colors.html", Category::Colors, colors),
        ("text-weights.html", Category::Weights, weights),
        ("text-leading.html", Category::Leading, leading),
        ("typography.html", Category::Sizes, typography),
        ("spacing.html", Category::Spacing, spacing),
        ("fonts.html", Category::Fonts, fonts),
        ("viewports.html", Category::Viewports, viewports),
    ];

    generators
        .into_iter()
        .filter_map(|(file_name, category, render)| {
            let tokens = ctx.category(category)?;
            Some(TokenDoc {
                file_name,
                html: render(tokens),
            })
        })
        .collect()
}

/// Write the swatches into `dir`, skipping files whose content is unchanged.
///
/// Returns the paths of all swatches that exist after the call.
pub fn write_token_docs(ctx: &TokenContext, dir: &Path) -> Result<Vec<PathBuf>, TokenError> {
    let mut written = Vec::new();

    for doc in render_token_docs(ctx) {
        let path = dir.join(doc.file_name);
        if write_if_changed(&path, &doc.html)? {
            tracing::debug!("Generated token swatch {}", path.display());
        }
        written.push(path);
    }

    Ok(written)
}

/// Escape text for embedding in HTML content or attribute values.
pub fn escape_html(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

fn colors(tokens: &CategoryTokens) -> String {
    let items: Vec<String> = tokens
        .tokens
        .iter()
        .map(|t| {
            format!(
                r#"  <div class="swatch">
    <div class="swatch-color" style="background-color: var({prop});"></div>
    <div class="swatch-info">
      <strong>{name}</strong><br>
      <code>var({prop})</code> <span class="token-value" data-var="{prop}"></span>
    </div>
  </div>"#,
                prop = t.property,
                name = escape_html(&t.name),
            )
        })
        .collect();

    format!(
        r#"<style>
  .swatch-grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(150px, 1fr)); gap: 1rem; }}
  .swatch {{ border: 1px solid #ddd; border-radius: 8px; overflow: hidden; }}
  .swatch-color {{ height: 100px; width: 100%; }}
  .swatch-info {{ padding: 0.5rem; font-family: monospace; font-size: 0.9rem; }}
</style>
<div class="swatch-grid">
{}
</div>
"#,
        items.join("\n")
    )
}

fn weights(tokens: &CategoryTokens) -> String {
    let items: Vec<String> = tokens
        .tokens
        .iter()
        .map(|t| {
            format!(
                r#"  <div style="font-weight: var({prop})">{name} ({value}) - {PANGRAM}</div>"#,
                prop = t.property,
                name = escape_html(&t.name),
                value = escape_html(&t.value),
            )
        })
        .collect();

    format!(
        "<div style=\"display: grid; gap: 1rem;\">\n{}\n</div>\n",
        items.join("\n")
    )
}

fn leading(tokens: &CategoryTokens) -> String {
    let items: Vec<String> = tokens
        .tokens
        .iter()
        .filter(|t| t.slug != "base" && t.slug != "ratio")
        .map(|t| {
            format!(
                r#"  <div style="line-height: var({prop})">
    <div class="meta"><strong>{name}</strong> <code>var({prop})</code> <span class="token-value" data-var="{prop}"></span></div>
    <p>{LOREM}</p>
  </div>"#,
                prop = t.property,
                name = escape_html(&t.name),
            )
        })
        .collect();

    format!("<div class=\"flow\">\n{}\n</div>\n", items.join("\n\n"))
}

fn typography(tokens: &CategoryTokens) -> String {
    let items: Vec<String> = tokens
        .tokens
        .iter()
        .map(|t| {
            format!(
                r#"  <div style="font-size: var({prop})">{name} <span class="token-value" data-var="{prop}"></span></div>"#,
                prop = t.property,
                name = escape_html(&t.name),
            )
        })
        .collect();

    format!(
        r#"<style>
  .type-ladder > * {{ margin-bottom: 1.5rem; line-height: 1.2; }}
  .type-ladder .token-value {{ display: block; font-size: 0.875rem; font-family: monospace; }}
</style>
<div class="type-ladder">
{}
</div>
"#,
        items.join("\n")
    )
}

fn spacing(tokens: &CategoryTokens) -> String {
    let items: Vec<String> = tokens
        .tokens
        .iter()
        .map(|t| {
            format!(
                r#"  <div class="spacing-item">
    <div class="spacing-box" style="width: var({prop}); height: var({prop});"></div>
    <div><strong>{name}</strong> <code>var({prop})</code> <span class="token-value" data-var="{prop}"></span></div>
  </div>"#,
                prop = t.property,
                name = escape_html(&t.name),
            )
        })
        .collect();

    format!(
        r#"<style>
  .spacing-list {{ display: flex; flex-direction: column; gap: 1rem; }}
  .spacing-item {{ display: flex; align-items: center; gap: 1rem; }}
  .spacing-box {{ background: var(--color-primary, #000); min-height: 10px; }}
</style>
<div class="spacing-list">
{}
</div>
"#,
        items.join("\n")
    )
}

fn fonts(tokens: &CategoryTokens) -> String {
    let items: Vec<String> = tokens
        .tokens
        .iter()
        .map(|t| {
            format!(
                r#"  <div style="font-family: var({prop}); margin-bottom: 2rem;">
    <strong>{name}</strong> <code class="token-value" data-var="{prop}">var({prop})</code>
    <p>{PANGRAM}</p>
  </div>"#,
                prop = t.property,
                name = escape_html(&t.name),
            )
        })
        .collect();

    format!("<div class=\"font-stack\">\n{}\n</div>\n", items.join("\n"))
}

fn viewports(tokens: &CategoryTokens) -> String {
    let items: Vec<String> = tokens
        .tokens
        .iter()
        .map(|t| {
            format!(
                r#"  <div class="viewport-item"><strong>{name}</strong> <code>var({prop})</code> <span class="viewport-value">{value}</span></div>"#,
                prop = t.property,
                name = escape_html(&t.name),
                value = escape_html(&t.value),
            )
        })
        .collect();

    format!(
        r#"<style>
  .viewport-list {{ display: flex; flex-direction: column; gap: 0.75rem; font-family: monospace; }}
  .viewport-item {{ display: flex; gap: 1rem; padding: 0.5rem; }}
  .viewport-value {{ margin-left: auto; font-weight: bold; }}
</style>
<div class="viewport-list">
{}
</div>
"#,
        items.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompiledToken;
    use std::fs;
    use tempfile::tempdir;

    fn context() -> TokenContext {
        TokenContext {
            viewports: None,
            categories: vec![
                CategoryTokens {
                    category: Category::Colors,
                    title: "Colors".into(),
                    tokens: vec![CompiledToken {
                        name: "Primary".into(),
                        slug: "primary".into(),
                        property: "--color-primary".into(),
                        value: "#3b82f6".into(),
                    }],
                },
                CategoryTokens {
                    category: Category::Leading,
                    title: "Leading".into(),
                    tokens: vec![
                        CompiledToken {
                            name: "base".into(),
                            slug: "base".into(),
                            property: "--leading-base".into(),
                            value: "1.5".into(),
                        },
                        CompiledToken {
                            name: "tight".into(),
                            slug: "tight".into(),
                            property: "--leading-tight".into(),
                            value: "1.1".into(),
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn renders_only_present_categories() {
        let docs = render_token_docs(&context());
        let names: Vec<&str> = docs.iter().map(|d| d.file_name).collect();
        assert_eq!(names, vec!["colors.html", "text-leading.html"]);
    }

    #[test]
    fn references_prefixed_properties() {
        let docs = render_token_docs(&context());
        assert!(docs[0].html.contains("background-color: var(--color-primary);"));
        assert!(docs[0].html.contains("<strong>Primary</strong>"));
    }

    #[test]
    fn escapes_token_names() {
        let mut context = context();
        context.categories[0].tokens[0].name = "a<b".into();

        let docs = render_token_docs(&context);

        assert!(docs[0].html.contains("<strong>a&lt;b</strong>"));
        assert!(!docs[0].html.contains("a<b"));
    }

    #[test]
    fn escapes_source() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn leading_swatch_omits_scale_parameters() {
        let docs = render_token_docs(&context());
        let leading = &docs[1].html;
        assert!(leading.contains("var(--leading-tight)"));
        assert!(!leading.contains("var(--leading-base)"));
    }

    #[test]
    fn writes_swatches_to_directory() {
        let temp = tempdir().unwrap();
        let written = write_token_docs(&context(), temp.path()).unwrap();

        assert_eq!(written.len(), 2);
        let html = fs::read_to_string(temp.path().join("colors.html")).unwrap();
        assert!(html.contains("--color-primary"));
    }
}
