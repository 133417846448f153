//! Configuration file loading (swatchkit.toml).

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use swatchkit_static::BuildSettings;

/// Default config file name, relative to the working directory.
pub const CONFIG_FILE: &str = "swatchkit.toml";

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProjectConfig {
    /// Pattern source directory
    pub input: Option<String>,
    pub out_dir: Option<String>,
    /// Project CSS directory
    pub css: Option<String>,
    /// Token JSON directory
    pub tokens: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_true")]
    pub copy_css: bool,
    #[serde(default)]
    pub minify_css: bool,
    #[serde(default = "default_true")]
    pub token_docs: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            copy_css: true,
            minify_css: false,
            token_docs: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::debug!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

/// Merge file values and CLI overrides into build settings. CLI wins.
pub fn resolve(
    cwd: &Path,
    file: &ConfigFile,
    input: Option<&Path>,
    out_dir: Option<&Path>,
) -> BuildSettings {
    let mut settings = BuildSettings::new(cwd);

    if let Some(input) = input.or(file.project.input.as_deref().map(Path::new)) {
        settings = settings.with_source_dir(input);
    }
    if let Some(out) = out_dir.or(file.project.out_dir.as_deref().map(Path::new)) {
        settings = settings.with_out_dir(out);
    }
    if let Some(css) = &file.project.css {
        settings = settings.with_css_dir(css);
    }
    if let Some(tokens) = &file.project.tokens {
        settings = settings.with_tokens_dir(tokens);
    }
    if let Some(title) = &file.project.title {
        settings.title = title.clone();
    }

    settings.exclude = file.project.exclude.clone();
    settings.copy_css = file.build.copy_css;
    settings.minify_css = file.build.minify_css;
    settings.token_docs = file.build.token_docs;

    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let config = load_config(&temp.path().join(CONFIG_FILE)).unwrap();
        let settings = resolve(temp.path(), &config, None, None);

        assert_eq!(settings, BuildSettings::new(temp.path()));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "[project\ninput = ").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn reads_project_and_build_tables() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[project]
input = "patterns"
out_dir = "dist/library"
css = "styles"
exclude = ["*.draft.html", "wip*"]
title = "Acme UI"

[build]
copy_css = false
minify_css = true
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let settings = resolve(Path::new("/work"), &config, None, None);

        assert_eq!(settings.source_dir, PathBuf::from("/work/patterns"));
        assert_eq!(settings.tokens_dir, PathBuf::from("/work/patterns/tokens"));
        assert_eq!(settings.out_dir, PathBuf::from("/work/dist/library"));
        assert_eq!(settings.css_dir, PathBuf::from("/work/styles"));
        assert_eq!(settings.exclude, vec!["*.draft.html", "wip*"]);
        assert_eq!(settings.title, "Acme UI");
        assert!(!settings.copy_css);
        assert!(settings.minify_css);
        assert!(settings.token_docs);
    }

    #[test]
    fn cli_values_win() {
        let config: ConfigFile = toml::from_str(
            r#"
[project]
input = "patterns"
out_dir = "dist/library"
"#,
        )
        .unwrap();

        let settings = resolve(
            Path::new("/work"),
            &config,
            Some(Path::new("ui")),
            Some(Path::new("build/ui")),
        );

        assert_eq!(settings.source_dir, PathBuf::from("/work/ui"));
        assert_eq!(settings.out_dir, PathBuf::from("/work/build/ui"));
    }
}
