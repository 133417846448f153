//! Resolved build settings.

use std::path::{Path, PathBuf};

/// Immutable paths and flags for one build.
///
/// Every path is absolute, anchored at `cwd`. Construct with
/// [`BuildSettings::new`] and adjust with the `with_*` methods before the
/// build starts; builders only ever borrow it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSettings {
    /// Working directory the output safety check is measured against
    pub cwd: PathBuf,

    /// Pattern source directory
    pub source_dir: PathBuf,

    /// Output directory, deleted and recreated by every build
    pub out_dir: PathBuf,

    /// Project CSS directory receiving the token stylesheet
    pub css_dir: PathBuf,

    /// Directory holding the token JSON files
    pub tokens_dir: PathBuf,

    /// Directory receiving generated token swatches
    pub token_docs_dir: PathBuf,

    /// Exclusion globs applied to entry names during scanning
    pub exclude: Vec<String>,

    /// Mirror `css_dir` into the output
    pub copy_css: bool,

    /// Minify the output copy of the token stylesheet
    pub minify_css: bool,

    /// Generate token documentation swatches
    pub token_docs: bool,

    /// Site title
    pub title: String,
}

impl BuildSettings {
    /// Default layout relative to `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let source_dir = cwd.join("swatchkit");
        let tokens_dir = source_dir.join("tokens");

        Self {
            out_dir: cwd.join("public").join("swatchkit"),
            css_dir: cwd.join("css"),
            token_docs_dir: tokens_dir.clone(),
            tokens_dir,
            source_dir,
            exclude: Vec::new(),
            copy_css: true,
            minify_css: false,
            token_docs: true,
            title: "Pattern Library".to_string(),
            cwd,
        }
    }

    /// Set the source directory. Token directories that still point at the
    /// default location under the old source follow it.
    pub fn with_source_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = self.resolve(dir);
        let old_tokens = self.source_dir.join("tokens");
        let new_tokens = dir.join("tokens");

        if self.tokens_dir == old_tokens {
            self.tokens_dir = new_tokens.clone();
        }
        if self.token_docs_dir == old_tokens {
            self.token_docs_dir = new_tokens;
        }
        self.source_dir = dir;
        self
    }

    pub fn with_out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = self.resolve(dir);
        self
    }

    pub fn with_css_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.css_dir = self.resolve(dir);
        self
    }

    pub fn with_tokens_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.tokens_dir = self.resolve(dir);
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Resolve `path` against the working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    pub fn dist_css_dir(&self) -> PathBuf {
        self.out_dir.join("css")
    }

    pub fn dist_js_dir(&self) -> PathBuf {
        self.out_dir.join("js")
    }

    pub fn preview_dir(&self) -> PathBuf {
        self.out_dir.join("preview")
    }

    pub fn output_file(&self) -> PathBuf {
        self.out_dir.join("index.html")
    }

    pub fn script_bundle_file(&self) -> PathBuf {
        self.dist_js_dir().join("swatches.js")
    }

    pub fn tokens_css_file(&self) -> PathBuf {
        self.css_dir.join(swatchkit_tokens::TOKENS_CSS_FILE)
    }

    pub fn project_layout(&self) -> PathBuf {
        self.source_dir.join("_layout.html")
    }

    pub fn project_preview_layout(&self) -> PathBuf {
        self.source_dir.join("_preview.html")
    }
}
