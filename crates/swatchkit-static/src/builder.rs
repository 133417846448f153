//! Build orchestrator.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use swatchkit_tokens::{
    write_token_docs, DefaultUtilities, TokenCompiler, TokenError, TokenWarning, UtilityGenerator,
    TOKENS_CSS_FILE,
};

use crate::assembler::{SiteAssembler, CSS_DIR};
use crate::assets::{copy_dir, AssetPipeline};
use crate::scanner::{self, ScanError};
use crate::settings::BuildSettings;
use crate::templates::{DEFAULT_LAYOUT, DEFAULT_PREVIEW_LAYOUT};

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildReport {
    /// Number of sections in the sidebar
    pub sections: usize,

    /// Number of swatches rendered
    pub swatches: usize,

    /// Number of standalone preview pages written
    pub previews: usize,

    /// Number of compiled design tokens
    pub tokens: usize,

    /// Recoverable token problems
    pub warnings: Vec<TokenWarning>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that halt a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Refusing to use {path} as output directory: {reason}")]
    UnsafeOutputDir { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Tokens(#[from] TokenError),
}

impl From<ScanError> for BuildError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::RootNotFound(path) => BuildError::SourceNotFound(path),
            ScanError::Io { path, source } => BuildError::Io { path, source },
        }
    }
}

/// Check that `out_dir` is safe to delete and recreate.
///
/// The output must sit at least two segments below `cwd`: the working
/// directory itself and a direct child such as `dist` are rejected, as is
/// anything outside it. Paths are compared lexically after resolving `.`
/// and `..`.
pub fn validate_output_dir(cwd: &Path, out_dir: &Path) -> Result<(), BuildError> {
    let cwd = normalize(cwd);
    let out = normalize(&cwd.join(out_dir));

    let unsafe_dir = |reason: &str| BuildError::UnsafeOutputDir {
        path: out.clone(),
        reason: reason.to_string(),
    };

    let Ok(relative) = out.strip_prefix(&cwd) else {
        return Err(unsafe_dir("it is outside the working directory"));
    };

    match relative.components().count() {
        0 => Err(unsafe_dir("it is the working directory")),
        1 => Err(unsafe_dir(
            "it is a top-level directory of the project; use a nested path such as dist/swatchkit",
        )),
        _ => Ok(()),
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Pattern library builder.
pub struct SiteBuilder<'a> {
    settings: &'a BuildSettings,
}

impl<'a> SiteBuilder<'a> {
    pub fn new(settings: &'a BuildSettings) -> Self {
        Self { settings }
    }

    /// Run one full build: tokens, scan, assemble, write.
    ///
    /// Nothing is deleted unless the source directory exists and the output
    /// directory passes [`validate_output_dir`].
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let settings = self.settings;

        if !settings.source_dir.is_dir() {
            return Err(BuildError::SourceNotFound(settings.source_dir.clone()));
        }
        validate_output_dir(&settings.cwd, &settings.out_dir)?;

        self.clean_output()?;

        // Tokens
        let compiled = TokenCompiler::new(&settings.tokens_dir).compile_to(&settings.css_dir)?;
        if settings.token_docs && !compiled.context.is_empty() {
            write_token_docs(&compiled.context, &settings.token_docs_dir)?;
        }

        // Stylesheets
        if settings.copy_css && settings.css_dir.is_dir() {
            let dest = settings.dist_css_dir();
            let copied = copy_dir(&settings.css_dir, &dest).map_err(io_at(&dest))?;
            tracing::debug!("Copied {} stylesheets", copied);
        }
        if let Some(css) = compiled.css() {
            let css = if settings.minify_css {
                AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                    tracing::warn!("Failed to minify {}: {}", TOKENS_CSS_FILE, e);
                    css
                })
            } else {
                css
            };
            write(&settings.dist_css_dir().join(TOKENS_CSS_FILE), &css)?;
        }
        let utilities = DefaultUtilities.generate(&compiled.context, &settings.dist_css_dir())?;
        let head_extras = utilities
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| {
                format!(
                    "<link rel=\"stylesheet\" href=\"{}/{}\">",
                    CSS_DIR,
                    name.to_string_lossy()
                )
            })
            .unwrap_or_default();

        // Content
        let catalog = scanner::scan(&settings.source_dir, &settings.exclude)?;
        let preview_dir = settings.preview_dir();
        scanner::mirror_assets(&catalog, &preview_dir).map_err(io_at(&preview_dir))?;

        let layout = self.load_layout(&settings.project_layout(), DEFAULT_LAYOUT)?;
        let preview_layout =
            self.load_layout(&settings.project_preview_layout(), DEFAULT_PREVIEW_LAYOUT)?;

        let site = SiteAssembler::new(&layout, &preview_layout, settings.title.as_str())?
            .with_head_extras(head_extras)
            .assemble(&catalog)?;

        write(&settings.output_file(), &site.index_html)?;
        for page in &site.previews {
            write(&settings.out_dir.join(&page.path), &page.html)?;
        }
        write(&settings.script_bundle_file(), &site.script_bundle)?;

        Ok(BuildReport {
            sections: catalog.sections.len(),
            swatches: catalog.swatches.len(),
            previews: site.previews.len(),
            tokens: compiled.context.token_count(),
            warnings: compiled.warnings,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: settings.out_dir.clone(),
        })
    }

    fn clean_output(&self) -> Result<(), BuildError> {
        let out = &self.settings.out_dir;
        match fs::remove_dir_all(out) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_at(out)(e)),
        }

        for dir in [
            self.settings.out_dir.clone(),
            self.settings.dist_css_dir(),
            self.settings.dist_js_dir(),
        ] {
            fs::create_dir_all(&dir).map_err(io_at(&dir))?;
        }
        Ok(())
    }

    /// A project override from the source directory, or the built-in layout.
    fn load_layout(&self, path: &Path, default: &str) -> Result<String, BuildError> {
        match fs::read_to_string(path) {
            Ok(layout) => {
                tracing::debug!("Using layout {}", path.display());
                Ok(layout)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(default.to_string()),
            Err(e) => Err(io_at(path)(e)),
        }
    }
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> BuildError + '_ {
    move |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_at(parent))?;
    }
    fs::write(path, contents).map_err(io_at(path))
}
