//! Token file documents and the compiled token context.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::fluid::ViewportRange;

/// The seven token categories, in compilation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Viewports,
    Colors,
    Weights,
    Leading,
    Sizes,
    Spacing,
    Fonts,
}

impl Category {
    /// Compilation order. Viewports come first because sizes and spacing
    /// read them for fluid derivation.
    pub const ALL: [Category; 7] = [
        Category::Viewports,
        Category::Colors,
        Category::Weights,
        Category::Leading,
        Category::Sizes,
        Category::Spacing,
        Category::Fonts,
    ];

    /// JSON file name inside the tokens directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Category::Viewports => "viewports.json",
            Category::Colors => "colors.json",
            Category::Weights => "text-weights.json",
            Category::Leading => "text-leading.json",
            Category::Sizes => "text-sizes.json",
            Category::Spacing => "spacing.json",
            Category::Fonts => "fonts.json",
        }
    }

    /// Custom property prefix, placed between `--` and the item slug.
    pub fn prefix(self) -> &'static str {
        match self {
            Category::Viewports => "viewport-",
            Category::Colors => "color-",
            Category::Weights => "weight-",
            Category::Leading => "leading-",
            Category::Sizes => "s",
            Category::Spacing => "space-",
            Category::Fonts => "font-",
        }
    }

    /// Comment heading used when the file carries no `title`.
    pub fn default_title(self) -> &'static str {
        match self {
            Category::Viewports => "Viewports",
            Category::Colors => "Colors",
            Category::Weights => "Text Weights",
            Category::Leading => "Text Leading",
            Category::Sizes => "Text Sizes",
            Category::Spacing => "Spacing",
            Category::Fonts => "Fonts",
        }
    }

    /// Whether items of this category may be fluid `min`/`max` pairs.
    pub fn supports_fluid(self) -> bool {
        matches!(self, Category::Sizes | Category::Spacing)
    }

    /// Custom property name for an item slug in this category.
    pub fn property(self, slug: &str) -> String {
        format!("--{}{}", self.prefix(), slug)
    }
}

/// One category document: `{ "title": ..., "items": [...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFile {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub items: Vec<TokenItem>,

    /// File-level ratio for deriving a missing fluid bound.
    #[serde(default)]
    pub fluid_ratio: Option<f64>,

    /// Modular scale base (leading only).
    #[serde(default)]
    pub base: Option<f64>,

    /// Modular scale ratio (leading only).
    #[serde(default)]
    pub ratio: Option<f64>,
}

/// A single token declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenItem {
    #[serde(default)]
    pub name: String,

    /// Literal CSS value. Takes precedence over any fluid bounds.
    #[serde(default)]
    pub value: Option<Value>,

    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub max: Option<f64>,

    #[serde(default)]
    pub fluid_ratio: Option<f64>,

    /// Step into the leading modular scale.
    #[serde(default)]
    pub step: Option<f64>,
}

/// How an item should be emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind<'a> {
    Static(&'a Value),
    Fluid { min: Option<f64>, max: Option<f64> },
    Step(f64),
    Empty,
}

impl TokenItem {
    /// Classify the item. `value` wins over bounds, bounds win over `step`.
    pub fn kind(&self) -> ItemKind<'_> {
        if let Some(value) = &self.value {
            return ItemKind::Static(value);
        }
        if self.min.is_some() || self.max.is_some() {
            return ItemKind::Fluid {
                min: self.min,
                max: self.max,
            };
        }
        match self.step {
            Some(step) => ItemKind::Step(step),
            None => ItemKind::Empty,
        }
    }
}

/// Render a literal JSON value as CSS text.
///
/// Strings are used verbatim, numbers in their shortest form, and arrays
/// (font stacks) are joined with `, `. Objects and nulls have no CSS form.
pub fn css_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(parts) => {
            let parts: Vec<String> = parts.iter().filter_map(css_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

/// Keys of `viewports.json` that describe the document rather than a breakpoint.
const VIEWPORT_METADATA_KEYS: [&str; 4] = ["title", "description", "meta", "$schema"];

/// The parsed `viewports.json` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewports {
    pub title: Option<String>,

    /// Named breakpoints in authoring order.
    pub breakpoints: Vec<(String, Value)>,
}

impl Viewports {
    /// Split a flat viewports mapping into metadata and breakpoints.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let title = map.get("title").and_then(Value::as_str).map(str::to_string);

        let breakpoints = map
            .iter()
            .filter(|(key, _)| !VIEWPORT_METADATA_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self { title, breakpoints }
    }

    /// Width of a breakpoint in pixels, when it is numeric.
    pub fn width(&self, name: &str) -> Option<f64> {
        self.breakpoints
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_f64())
    }

    /// The `min`/`max` pair required for fluid derivation.
    pub fn range(&self) -> Option<ViewportRange> {
        Some(ViewportRange {
            min: self.width("min")?,
            max: self.width("max")?,
        })
    }
}

/// A custom property produced by the compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledToken {
    /// Name as authored.
    pub name: String,
    pub slug: String,
    /// Full property name, e.g. `--color-primary`.
    pub property: String,
    /// CSS value text.
    pub value: String,
}

/// All tokens emitted for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTokens {
    pub category: Category,
    pub title: String,
    pub tokens: Vec<CompiledToken>,
}

/// Everything compiled during one build.
///
/// Built fresh by each compilation and handed to the documentation and
/// utility generators; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenContext {
    pub viewports: Option<Viewports>,
    pub categories: Vec<CategoryTokens>,
}

impl TokenContext {
    /// Tokens of one category, if it produced any.
    pub fn category(&self, category: Category) -> Option<&CategoryTokens> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.tokens.is_empty())
    }

    pub fn token_count(&self) -> usize {
        self.categories.iter().map(|c| c.tokens.len()).sum()
    }

    /// Render the `:root` block, one commented section per category.
    ///
    /// Returns `None` when no category produced a token.
    pub fn to_css(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let blocks: Vec<String> = self
            .categories
            .iter()
            .filter(|c| !c.tokens.is_empty())
            .map(|c| {
                let mut block = format!("  /* {} */\n", c.title);
                for token in &c.tokens {
                    block.push_str(&format!("  {}: {};\n", token.property, token.value));
                }
                block
            })
            .collect();

        Some(format!(":root {{\n{}}}\n", blocks.join("\n")))
    }
}
