//! Site assembler: catalog to index page, preview pages and script bundle.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::assets::AssetPipeline;
use crate::scanner::{Catalog, Section, Swatch, PATTERNS_SECTION, TOKENS_SECTION};
use crate::templates::{escape_html, Layout, NavLink, NavSection, Slots, SwatchView, TemplateEngine};

/// Directory, relative to the output root, holding standalone previews.
pub const PREVIEW_DIR: &str = "preview";

/// Directory, relative to the output root, holding stylesheets.
pub const CSS_DIR: &str = "css";

/// Display order of sections: "Design Tokens" first, "Patterns" last,
/// everything else alphabetical in between.
pub fn section_order(a: &str, b: &str) -> Ordering {
    fn rank(name: &str) -> u8 {
        match name {
            TOKENS_SECTION => 0,
            PATTERNS_SECTION => 2,
            _ => 1,
        }
    }

    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// A standalone preview page.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewPage {
    /// Path relative to the output directory
    pub path: PathBuf,
    pub html: String,
}

/// Everything the assembler produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub index_html: String,
    pub previews: Vec<PreviewPage>,
    pub script_bundle: String,
}

/// Renders a [`Catalog`] into pages.
pub struct SiteAssembler {
    engine: TemplateEngine,
    layout: Layout,
    preview_layout: Layout,
    title: String,
    head_extras: String,
}

impl SiteAssembler {
    pub fn new(
        layout: &str,
        preview_layout: &str,
        title: impl Into<String>,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            engine: TemplateEngine::new()?,
            layout: Layout::parse(layout),
            preview_layout: Layout::parse(preview_layout),
            title: title.into(),
            head_extras: String::new(),
        })
    }

    /// Markup inserted at the `head-extras` slot of the main layout.
    pub fn with_head_extras(mut self, head_extras: impl Into<String>) -> Self {
        self.head_extras = head_extras.into();
        self
    }

    pub fn assemble(&self, catalog: &Catalog) -> Result<Site, minijinja::Error> {
        let mut sections: Vec<&Section> = catalog.sections.iter().collect();
        sections.sort_by(|a, b| section_order(&a.name, &b.name));

        let nav: Vec<NavSection> = sections
            .iter()
            .map(|section| NavSection {
                name: section.name.clone(),
                items: catalog
                    .section_swatches(section)
                    .map(|s| NavLink {
                        id: s.id.clone(),
                        name: s.name.clone(),
                    })
                    .collect(),
            })
            .collect();
        let sidebar = self.engine.render_sidebar(&nav)?;

        let mut blocks = Vec::new();
        let mut previews = Vec::new();

        for section in &sections {
            for swatch in catalog.section_swatches(section) {
                let view = swatch_view(swatch, &section.name);
                blocks.push(self.engine.render_swatch(&view)?);
                previews.push(self.preview_page(swatch, &view)?);
            }
        }

        let content = blocks.join("\n");
        let index_html = self.layout.render(&Slots {
            sidebar: &sidebar,
            content: &content,
            head_extras: &self.head_extras,
            css_path: &format!("{}/", CSS_DIR),
            title: &escape_html(&self.title),
        });

        Ok(Site {
            index_html,
            previews,
            script_bundle: AssetPipeline::bundle_scripts(&catalog.scripts),
        })
    }

    fn preview_page(&self, swatch: &Swatch, view: &SwatchView) -> Result<PreviewPage, minijinja::Error> {
        let dir = Path::new(PREVIEW_DIR).join(swatch.preview_path());
        let body = self.engine.render_preview(view)?;
        let css_path = relative_css_path(&dir);

        let html = self.preview_layout.render(&Slots {
            content: &body,
            css_path: &css_path,
            title: &escape_html(&swatch.name),
            ..Default::default()
        });

        Ok(PreviewPage {
            path: dir.join("index.html"),
            html,
        })
    }
}

/// Relative URL from a page in `dir` (relative to the output root) back to
/// the shared CSS directory.
pub fn relative_css_path(dir: &Path) -> String {
    let depth = dir.components().count();
    format!("{}{}/", "../".repeat(depth), CSS_DIR)
}

fn swatch_view(swatch: &Swatch, section: &str) -> SwatchView {
    let href: Vec<String> = Path::new(PREVIEW_DIR)
        .join(swatch.preview_path())
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    SwatchView {
        id: swatch.id.clone(),
        name: swatch.name.clone(),
        section: section.to_string(),
        content: swatch.content.clone(),
        description: swatch.description.clone(),
        preview_href: format!("{}/", href.join("/")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{DEFAULT_LAYOUT, DEFAULT_PREVIEW_LAYOUT};
    use pretty_assertions::assert_eq;

    fn swatch(id: &str, section_slug: Option<&str>, content: &str) -> Swatch {
        Swatch {
            id: id.into(),
            name: id.into(),
            content: content.into(),
            description: None,
            section_slug: section_slug.map(str::to_string),
            assets: Vec::new(),
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            swatches: vec![
                swatch("button", Some("components"), "<button>Go</button>"),
                swatch("colors", Some("tokens"), "<div>colors</div>"),
                swatch("hero", None, "<div>Hi</div>"),
                swatch("stack", Some("layouts"), "<div class=stack></div>"),
            ],
            sections: vec![
                Section {
                    name: PATTERNS_SECTION.into(),
                    slug: None,
                    swatches: vec![2],
                },
                Section {
                    name: "Layouts".into(),
                    slug: Some("layouts".into()),
                    swatches: vec![3],
                },
                Section {
                    name: TOKENS_SECTION.into(),
                    slug: Some("tokens".into()),
                    swatches: vec![1],
                },
                Section {
                    name: "Components".into(),
                    slug: Some("components".into()),
                    swatches: vec![0],
                },
            ],
            scripts: Vec::new(),
        }
    }

    fn assembler() -> SiteAssembler {
        SiteAssembler::new(DEFAULT_LAYOUT, DEFAULT_PREVIEW_LAYOUT, "Library").unwrap()
    }

    #[test]
    fn orders_tokens_first_and_patterns_last() {
        let mut names = vec!["Patterns", "utilities", "Design Tokens", "Components", "Layouts"];
        names.sort_by(|a, b| section_order(a, b));
        assert_eq!(
            names,
            vec!["Design Tokens", "Components", "Layouts", "utilities", "Patterns"]
        );
    }

    #[test]
    fn order_is_independent_of_input_permutation() {
        let base = ["Patterns", "Design Tokens", "Zeta", "Alpha"];
        let expected = vec!["Design Tokens", "Alpha", "Zeta", "Patterns"];

        for rotation in 0..base.len() {
            let mut names: Vec<&str> = base.iter().cycle().skip(rotation).take(base.len()).copied().collect();
            names.reverse();
            names.sort_by(|a, b| section_order(a, b));
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn sidebar_follows_section_order() {
        let site = assembler().assemble(&catalog()).unwrap();
        let html = &site.index_html;

        let tokens = html.find("<h3>Design Tokens</h3>").unwrap();
        let components = html.find("<h3>Components</h3>").unwrap();
        let layouts = html.find("<h3>Layouts</h3>").unwrap();
        let patterns = html.find("<h3>Patterns</h3>").unwrap();

        assert!(tokens < components && components < layouts && layouts < patterns);
        assert!(html.contains("<a href=\"#hero\">hero</a>"));
        assert!(html.contains("<title>Library</title>"));
        assert!(html.contains("href=\"css/tokens.css\""));
    }

    #[test]
    fn writes_one_preview_per_swatch_at_its_depth() {
        let site = assembler().assemble(&catalog()).unwrap();

        let paths: Vec<PathBuf> = site.previews.iter().map(|p| p.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("preview/tokens/colors/index.html"),
                PathBuf::from("preview/components/button/index.html"),
                PathBuf::from("preview/layouts/stack/index.html"),
                PathBuf::from("preview/hero/index.html"),
            ]
        );

        let hero = &site.previews[3].html;
        assert!(hero.contains("href=\"../../css/tokens.css\""));
        assert!(hero.contains("&lt;div&gt;Hi&lt;/div&gt;"));
        assert!(hero.contains("<title>hero</title>"));

        let button = &site.previews[1].html;
        assert!(button.contains("href=\"../../../css/tokens.css\""));
    }

    #[test]
    fn links_blocks_to_standalone_previews() {
        let site = assembler().assemble(&catalog()).unwrap();
        assert!(site.index_html.contains("href=\"preview/components/button/\""));
        assert!(site.index_html.contains("href=\"preview/hero/\""));
    }

    #[test]
    fn computes_css_path_from_depth() {
        assert_eq!(relative_css_path(Path::new("preview/hero")), "../../css/");
        assert_eq!(relative_css_path(Path::new("preview/a/b")), "../../../css/");
        assert_eq!(relative_css_path(Path::new("")), "css/");
    }

    #[test]
    fn escapes_page_titles() {
        let mut named = swatch("a-b", None, "<p>x</p>");
        named.name = "a<b".into();
        let catalog = Catalog {
            swatches: vec![named],
            sections: vec![Section {
                name: PATTERNS_SECTION.into(),
                slug: None,
                swatches: vec![0],
            }],
            scripts: Vec::new(),
        };

        let layout = "<title><!-- TITLE --></title>";
        let site = SiteAssembler::new(layout, layout, "A & B")
            .unwrap()
            .assemble(&catalog)
            .unwrap();

        assert_eq!(site.index_html, "<title>A &amp; B</title>");
        assert_eq!(site.previews[0].html, "<title>a&lt;b</title>");
    }

    #[test]
    fn fills_head_extras() {
        let site = SiteAssembler::new("<head><!-- HEAD_EXTRAS --></head>", "", "x")
            .unwrap()
            .with_head_extras("<link rel=\"icon\">")
            .assemble(&Catalog::default())
            .unwrap();

        assert_eq!(site.index_html, "<head><link rel=\"icon\"></head>");
        assert!(site.previews.is_empty());
    }
}
