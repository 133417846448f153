//! Token compiler: category JSON files to a single `:root` stylesheet.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::fluid::{self, FluidBounds, DEFAULT_FLUID_RATIO};
use crate::model::{
    css_value, Category, CategoryTokens, CompiledToken, ItemKind, TokenContext, TokenFile,
    Viewports,
};
use crate::slug::slug;

/// File name of the generated stylesheet.
pub const TOKENS_CSS_FILE: &str = "tokens.css";

/// Leading names taken by the generated `--leading-base`/`--leading-ratio`.
const RESERVED_LEADING: [&str; 2] = ["base", "ratio"];

/// Errors that stop a category from being read at all.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A recoverable problem surfaced during compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWarning {
    pub category: Category,
    pub message: String,
}

impl std::fmt::Display for TokenWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.category.file_name(), self.message)
    }
}

/// Result of compiling a tokens directory.
#[derive(Debug, Clone, Default)]
pub struct CompiledTokens {
    pub context: TokenContext,
    pub warnings: Vec<TokenWarning>,
}

impl CompiledTokens {
    /// The generated stylesheet, or `None` when nothing was emitted.
    pub fn css(&self) -> Option<String> {
        self.context.to_css()
    }
}

/// Reads the token categories from one directory.
#[derive(Debug, Clone)]
pub struct TokenCompiler {
    tokens_dir: PathBuf,
}

impl TokenCompiler {
    pub fn new(tokens_dir: impl Into<PathBuf>) -> Self {
        Self {
            tokens_dir: tokens_dir.into(),
        }
    }

    /// Compile every category in order.
    ///
    /// Missing files are skipped silently. Malformed files and fluid items
    /// without usable viewports become warnings; the remaining categories
    /// still compile.
    pub fn compile(&self) -> CompiledTokens {
        let mut out = CompiledTokens::default();

        for category in Category::ALL {
            let path = self.tokens_dir.join(category.file_name());

            let document = match read_document(&path) {
                Ok(Some(document)) => document,
                Ok(None) => continue,
                Err(e) => {
                    warn(&mut out.warnings, category, e.to_string());
                    continue;
                }
            };

            let compiled = match category {
                Category::Viewports => compile_viewports(document, &mut out),
                _ => match serde_json::from_value::<TokenFile>(document) {
                    Ok(file) => compile_items(category, &file, &mut out),
                    Err(e) => {
                        let err = TokenError::Json {
                            path: path.clone(),
                            source: e,
                        };
                        warn(&mut out.warnings, category, err.to_string());
                        continue;
                    }
                },
            };

            if let Some(tokens) = compiled.filter(|c| !c.tokens.is_empty()) {
                tracing::debug!(
                    "Compiled {} {} tokens",
                    tokens.tokens.len(),
                    category.default_title()
                );
                out.context.categories.push(tokens);
            }
        }

        out
    }

    /// Compile and write `tokens.css` into `css_dir`.
    ///
    /// Nothing is written when no tokens were produced. An existing file
    /// with identical content is left untouched.
    pub fn compile_to(&self, css_dir: &Path) -> Result<CompiledTokens, TokenError> {
        let compiled = self.compile();

        if let Some(css) = compiled.css() {
            let path = css_dir.join(TOKENS_CSS_FILE);
            if write_if_changed(&path, &css)? {
                tracing::info!("Generated {}", path.display());
            }
        }

        Ok(compiled)
    }
}

/// Write `contents` to `path` unless the file already holds exactly that.
///
/// Returns whether a write happened. Parent directories are created.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<bool, TokenError> {
    let io_err = |source| TokenError::Io {
        path: path.to_path_buf(),
        source,
    };

    match fs::read_to_string(path) {
        Ok(existing) if existing == contents => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(e)),
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)?;

    Ok(true)
}

fn read_document(path: &Path) -> Result<Option<Value>, TokenError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(TokenError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| TokenError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn warn(warnings: &mut Vec<TokenWarning>, category: Category, message: String) {
    tracing::warn!("{}: {}", category.file_name(), message);
    warnings.push(TokenWarning { category, message });
}

fn compile_viewports(document: Value, out: &mut CompiledTokens) -> Option<CategoryTokens> {
    let Some(map) = document.as_object() else {
        warn(
            &mut out.warnings,
            Category::Viewports,
            "expected an object of named widths".to_string(),
        );
        return None;
    };

    let viewports = Viewports::from_map(map);
    let tokens = viewport_tokens(&viewports);
    let title = viewports
        .title
        .clone()
        .unwrap_or_else(|| Category::Viewports.default_title().to_string());

    out.context.viewports = Some(viewports);

    Some(CategoryTokens {
        category: Category::Viewports,
        title,
        tokens,
    })
}

fn viewport_tokens(viewports: &Viewports) -> Vec<CompiledToken> {
    viewports
        .breakpoints
        .iter()
        .filter_map(|(name, value)| {
            let css = match value {
                Value::Number(n) => format!("{}px", n),
                other => css_value(other)?,
            };
            token(Category::Viewports, name, css)
        })
        .collect()
}

fn compile_items(
    category: Category,
    file: &TokenFile,
    out: &mut CompiledTokens,
) -> Option<CategoryTokens> {
    let title = file
        .title
        .clone()
        .unwrap_or_else(|| category.default_title().to_string());

    let mut statics = Vec::new();
    let mut fluids = Vec::new();
    let mut steps = Vec::new();

    for item in &file.items {
        if category == Category::Leading && RESERVED_LEADING.contains(&slug(&item.name).as_str()) {
            warn(
                &mut out.warnings,
                category,
                format!(
                    "{:?} is reserved for the file-level base and ratio; skipping item",
                    item.name
                ),
            );
            continue;
        }

        match item.kind() {
            ItemKind::Static(value) => match css_value(value) {
                Some(css) => statics.extend(token(category, &item.name, css)),
                None => tracing::debug!("Skipping {:?}: value has no CSS form", item.name),
            },
            ItemKind::Fluid { min, max } if category.supports_fluid() => {
                let ratio = item
                    .fluid_ratio
                    .or(file.fluid_ratio)
                    .unwrap_or(DEFAULT_FLUID_RATIO);
                match FluidBounds::derive(min, max, ratio) {
                    Ok(Some(bounds)) => fluids.push((item.name.as_str(), bounds)),
                    Ok(None) => {}
                    Err(e) => warn(
                        &mut out.warnings,
                        category,
                        format!("{:?}: {}; skipping item", item.name, e),
                    ),
                }
            }
            ItemKind::Step(step) if category == Category::Leading => {
                steps.push((item.name.as_str(), step));
            }
            _ => tracing::debug!("Skipping {:?}: no value for {}", item.name, title),
        }
    }

    let mut tokens = Vec::new();

    if category == Category::Leading {
        tokens.extend(leading_tokens(file, &steps, out));
    }

    if !fluids.is_empty() {
        tokens.extend(fluid_tokens(category, &fluids, out));
    }

    tokens.extend(statics);

    Some(CategoryTokens {
        category,
        title,
        tokens,
    })
}

fn fluid_tokens(
    category: Category,
    items: &[(&str, FluidBounds)],
    out: &mut CompiledTokens,
) -> Vec<CompiledToken> {
    let Some(range) = out.context.viewports.as_ref().and_then(Viewports::range) else {
        warn(
            &mut out.warnings,
            category,
            "fluid values need viewports.json with numeric min and max; skipping fluid tokens"
                .to_string(),
        );
        return Vec::new();
    };

    if let Err(e) = fluid::check_viewports(range) {
        warn(
            &mut out.warnings,
            category,
            format!("{}; skipping fluid tokens", e),
        );
        return Vec::new();
    }

    let mut tokens = Vec::with_capacity(items.len());
    for (name, bounds) in items {
        match fluid::clamp(*bounds, range) {
            Ok(css) => tokens.extend(token(category, name, css)),
            Err(e) => warn(
                &mut out.warnings,
                category,
                format!("{:?}: {}; skipping item", name, e),
            ),
        }
    }
    tokens
}

fn leading_tokens(
    file: &TokenFile,
    steps: &[(&str, f64)],
    out: &mut CompiledTokens,
) -> Vec<CompiledToken> {
    let mut tokens = Vec::new();

    if let Some(base) = file.base {
        tokens.extend(token(Category::Leading, "base", fluid::format_number(base)));
    }
    if let Some(ratio) = file.ratio {
        tokens.extend(token(Category::Leading, "ratio", fluid::format_number(ratio)));
    }

    if steps.is_empty() {
        return tokens;
    }

    if file.base.is_none() || file.ratio.is_none() {
        warn(
            &mut out.warnings,
            Category::Leading,
            "step values need both base and ratio; skipping step tokens".to_string(),
        );
        return tokens;
    }

    for (name, step) in steps {
        let css = format!(
            "calc(var(--leading-base) * pow(var(--leading-ratio), {}))",
            fluid::format_number(*step)
        );
        tokens.extend(token(Category::Leading, name, css));
    }

    tokens
}

fn token(category: Category, name: &str, value: String) -> Option<CompiledToken> {
    let slug = slug(name);
    if slug.is_empty() {
        tracing::debug!("Skipping token {:?}: name has no identifier characters", name);
        return None;
    }

    Some(CompiledToken {
        name: name.to_string(),
        property: category.property(&slug),
        slug,
        value,
    })
}
