//! Utility classes derived from the compiled tokens.

use std::path::{Path, PathBuf};

use crate::compiler::{write_if_changed, TokenError};
use crate::model::{Category, TokenContext};

/// File name of the default utility stylesheet.
pub const UTILITIES_CSS_FILE: &str = "utilities.css";

/// Turns a token context into utility CSS inside an output directory.
pub trait UtilityGenerator {
    /// Generate utilities for `ctx` into `out_dir`.
    ///
    /// Returns the written file, or `None` when there was nothing to emit.
    fn generate(&self, ctx: &TokenContext, out_dir: &Path) -> Result<Option<PathBuf>, TokenError>;
}

/// Single-property utility classes for each token category.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUtilities;

impl DefaultUtilities {
    /// Class prefix and CSS properties for each category.
    fn rules(category: Category) -> &'static [(&'static str, &'static str)] {
        match category {
            Category::Colors => &[("color", "color"), ("bg", "background-color")],
            Category::Fonts => &[("font", "font-family")],
            Category::Weights => &[("weight", "font-weight")],
            Category::Leading => &[("leading", "line-height")],
            Category::Sizes => &[("text", "font-size")],
            Category::Spacing => &[("gap", "gap")],
            Category::Viewports => &[],
        }
    }

    /// Render the stylesheet text, or `None` for an empty context.
    pub fn render(&self, ctx: &TokenContext) -> Option<String> {
        let mut css = String::new();

        for tokens in &ctx.categories {
            let rules = Self::rules(tokens.category);
            if rules.is_empty() {
                continue;
            }

            for token in &tokens.tokens {
                if tokens.category == Category::Leading
                    && (token.slug == "base" || token.slug == "ratio")
                {
                    continue;
                }
                for (class, property) in rules {
                    css.push_str(&format!(
                        ".{}-{} {{\n  {}: var({});\n}}\n",
                        class, token.slug, property, token.property
                    ));
                }
            }
        }

        if css.is_empty() {
            None
        } else {
            Some(css)
        }
    }
}

impl UtilityGenerator for DefaultUtilities {
    fn generate(&self, ctx: &TokenContext, out_dir: &Path) -> Result<Option<PathBuf>, TokenError> {
        let Some(css) = self.render(ctx) else {
            return Ok(None);
        };

        let path = out_dir.join(UTILITIES_CSS_FILE);
        write_if_changed(&path, &css)?;
        Ok(Some(path))
    }
}
