//! Layout slots and fragment templates.
//!
//! Page layouts are plain HTML with comment placeholders such as
//! `<!-- SIDEBAR -->`. They are parsed once into a [`Layout`] and filled
//! from typed [`Slots`], so substitution never depends on placeholder order
//! or on text that a previous substitution inserted. Sidebar and swatch
//! fragments are rendered with minijinja.

use minijinja::{context, AutoEscape, Environment};
pub use swatchkit_tokens::escape_html;

/// A named placeholder in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Sidebar,
    Content,
    HeadExtras,
    CssPath,
    Title,
}

impl Slot {
    /// Parse the inside of a `<!-- ... -->` comment.
    ///
    /// Names compare case-insensitively with `-` and `_` interchangeable.
    /// `SIDEBAR_LINKS` and `SWATCHES` are accepted for older layouts.
    pub fn from_placeholder(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "sidebar" | "sidebar-links" => Some(Slot::Sidebar),
            "content" | "swatches" => Some(Slot::Content),
            "head-extras" => Some(Slot::HeadExtras),
            "css-path" => Some(Slot::CssPath),
            "title" => Some(Slot::Title),
            _ => None,
        }
    }
}

/// Values for a layout's slots. Unset slots render empty.
#[derive(Debug, Clone, Default)]
pub struct Slots<'a> {
    pub sidebar: &'a str,
    pub content: &'a str,
    pub head_extras: &'a str,
    pub css_path: &'a str,
    pub title: &'a str,
}

impl Slots<'_> {
    fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Sidebar => self.sidebar,
            Slot::Content => self.content,
            Slot::HeadExtras => self.head_extras,
            Slot::CssPath => self.css_path,
            Slot::Title => self.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Slot(Slot),
}

/// A parsed layout template.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    segments: Vec<Segment>,
}

impl Layout {
    /// Split a layout into literal text and slots. Comments that do not
    /// name a slot stay as text.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = source;

        while let Some(start) = rest.find("<!--") {
            let after_open = &rest[start + 4..];
            let Some(end) = after_open.find("-->") else {
                break;
            };

            match Slot::from_placeholder(&after_open[..end]) {
                Some(slot) => {
                    text.push_str(&rest[..start]);
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Slot(slot));
                }
                None => text.push_str(&rest[..start + 4 + end + 3]),
            }

            rest = &after_open[end + 3..];
        }

        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Self { segments }
    }

    /// Whether the layout contains `slot`.
    pub fn has_slot(&self, slot: Slot) -> bool {
        self.segments.contains(&Segment::Slot(slot))
    }

    /// Fill every slot.
    pub fn render(&self, slots: &Slots<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(slot) => out.push_str(slots.get(*slot)),
            }
        }
        out
    }
}

/// A sidebar group.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavSection {
    /// Section heading
    pub name: String,
    /// Links to the section's swatches
    pub items: Vec<NavLink>,
}

/// A sidebar link.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavLink {
    /// Swatch anchor id
    pub id: String,
    /// Display label
    pub name: String,
}

/// Data for one swatch block or preview page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SwatchView {
    pub id: String,
    pub name: String,
    pub section: String,
    /// Raw swatch HTML
    pub content: String,
    /// Raw description HTML
    pub description: Option<String>,
    /// Link from the index page to the standalone preview
    pub preview_href: String,
}

/// Fragment renderer using minijinja.
///
/// Auto-escaping is disabled: swatch HTML is embedded raw, and the
/// `escape_html` filter handles labels and the code viewer.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in fragments.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("escape_html", escape_html);

        env.add_template("sidebar.html", SIDEBAR_TEMPLATE)?;
        env.add_template("swatch.html", SWATCH_TEMPLATE)?;
        env.add_template("preview.html", PREVIEW_CONTENT_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render the sidebar: a heading per section and one anchor per swatch.
    pub fn render_sidebar(&self, sections: &[NavSection]) -> Result<String, minijinja::Error> {
        self.env
            .get_template("sidebar.html")?
            .render(context! { sections => sections })
    }

    /// Render a swatch block for the index page.
    pub fn render_swatch(&self, swatch: &SwatchView) -> Result<String, minijinja::Error> {
        self.env
            .get_template("swatch.html")?
            .render(context! { swatch => swatch })
    }

    /// Render the body of a standalone preview page.
    pub fn render_preview(&self, swatch: &SwatchView) -> Result<String, minijinja::Error> {
        self.env
            .get_template("preview.html")?
            .render(context! { swatch => swatch })
    }
}

const SIDEBAR_TEMPLATE: &str = r##"{% for section in sections %}<h3>{{ section.name | escape_html }}</h3>
{% for item in section.items %}<a href="#{{ item.id }}">{{ item.name | escape_html }}</a>
{% endfor %}{% endfor %}"##;

const SWATCH_TEMPLATE: &str = r##"<section id="{{ swatch.id }}" class="swatch">
  <h2>{{ swatch.name | escape_html }} <small>({{ swatch.section | escape_html }})</small></h2>
{% if swatch.description %}  <div class="swatch-description">{{ swatch.description }}</div>
{% endif %}  <div class="preview">{{ swatch.content }}</div>
  <p><a class="preview-link" href="{{ swatch.preview_href }}">Open standalone preview</a></p>
  <pre><code>{{ swatch.content | escape_html }}</code></pre>
</section>
"##;

const PREVIEW_CONTENT_TEMPLATE: &str = r##"{{ swatch.content }}
<details class="swatch-source">
  <summary>Source</summary>
  <pre><code>{{ swatch.content | escape_html }}</code></pre>
</details>
"##;

/// Built-in page layout.
pub const DEFAULT_LAYOUT: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title><!-- TITLE --></title>
  <link rel="stylesheet" href="<!-- CSS_PATH -->tokens.css">
  <link rel="stylesheet" href="<!-- CSS_PATH -->styles.css">
  <!-- HEAD_EXTRAS -->
</head>
<body>
  <div class="swatchkit-layout">
    <nav class="swatchkit-sidebar">
      <!-- SIDEBAR -->
    </nav>
    <main class="swatchkit-main">
      <!-- CONTENT -->
    </main>
  </div>
  <script src="js/swatches.js"></script>
</body>
</html>
"##;

/// Built-in layout for standalone previews.
pub const DEFAULT_PREVIEW_LAYOUT: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title><!-- TITLE --></title>
  <link rel="stylesheet" href="<!-- CSS_PATH -->tokens.css">
  <link rel="stylesheet" href="<!-- CSS_PATH -->styles.css">
</head>
<body>
  <!-- CONTENT -->
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_slots_and_keeps_other_comments() {
        let layout = Layout::parse("<head><!-- HEAD_EXTRAS --></head><!-- note --><!--content-->");

        assert!(layout.has_slot(Slot::HeadExtras));
        assert!(layout.has_slot(Slot::Content));
        assert!(!layout.has_slot(Slot::Sidebar));

        let html = layout.render(&Slots {
            head_extras: "<meta>",
            content: "<p>x</p>",
            ..Default::default()
        });
        assert_eq!(html, "<head><meta></head><!-- note --><p>x</p>");
    }

    #[test]
    fn substitution_is_not_reentrant() {
        let layout = Layout::parse("<!-- SIDEBAR -->|<!-- CONTENT -->");

        let html = layout.render(&Slots {
            sidebar: "<!-- CONTENT -->",
            content: "body",
            ..Default::default()
        });
        assert_eq!(html, "<!-- CONTENT -->|body");
    }

    #[test]
    fn accepts_legacy_placeholders() {
        let layout = Layout::parse("<!-- SIDEBAR_LINKS --><!-- SWATCHES -->");
        assert!(layout.has_slot(Slot::Sidebar));
        assert!(layout.has_slot(Slot::Content));
    }

    #[test]
    fn unterminated_comment_is_text() {
        let layout = Layout::parse("a <!-- CONTENT");
        assert_eq!(layout.render(&Slots::default()), "a <!-- CONTENT");
    }

    #[test]
    fn repeated_slots_render_each_time() {
        let layout = Layout::parse("<!-- CSS_PATH -->a.css <!-- css-path -->b.css");
        let html = layout.render(&Slots {
            css_path: "../css/",
            ..Default::default()
        });
        assert_eq!(html, "../css/a.css ../css/b.css");
    }

    #[test]
    fn renders_sidebar() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render_sidebar(&[NavSection {
                name: "Patterns".into(),
                items: vec![NavLink {
                    id: "hero".into(),
                    name: "hero".into(),
                }],
            }])
            .unwrap();

        assert_eq!(html, "<h3>Patterns</h3>\n<a href=\"#hero\">hero</a>\n");
    }

    #[test]
    fn escapes_names_in_sidebar_and_headings() {
        let engine = TemplateEngine::new().unwrap();
        let sidebar = engine
            .render_sidebar(&[NavSection {
                name: "a<b".into(),
                items: vec![NavLink {
                    id: "a-b".into(),
                    name: "a<b".into(),
                }],
            }])
            .unwrap();
        let block = engine
            .render_swatch(&SwatchView {
                id: "a-b".into(),
                name: "a<b".into(),
                section: "x&y".into(),
                content: "<b>raw</b>".into(),
                description: None,
                preview_href: "preview/a-b/".into(),
            })
            .unwrap();

        assert_eq!(sidebar, "<h3>a&lt;b</h3>\n<a href=\"#a-b\">a&lt;b</a>\n");
        assert!(block.contains("<h2>a&lt;b <small>(x&amp;y)</small></h2>"));
        assert!(block.contains("<div class=\"preview\"><b>raw</b></div>"));
    }

    #[test]
    fn renders_swatch_block_with_escaped_source() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine
            .render_swatch(&SwatchView {
                id: "hero".into(),
                name: "hero".into(),
                section: "Patterns".into(),
                content: "<div>Hi</div>".into(),
                description: Some("<p>Intro</p>".into()),
                preview_href: "preview/hero/".into(),
            })
            .unwrap();

        assert!(html.contains("<section id=\"hero\" class=\"swatch\">"));
        assert!(html.contains("<div class=\"preview\"><div>Hi</div></div>"));
        assert!(html.contains("<pre><code>&lt;div&gt;Hi&lt;/div&gt;</code></pre>"));
        assert!(html.contains("<div class=\"swatch-description\"><p>Intro</p></div>"));
        assert!(html.contains("href=\"preview/hero/\""));
    }
}
