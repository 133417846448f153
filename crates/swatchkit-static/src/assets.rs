//! Asset pipeline: directory mirroring, script bundling and CSS minification.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::scanner::Script;

/// Placeholder written when no swatch ships a script.
pub const EMPTY_BUNDLE: &str = "// No swatch scripts found\n";

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Concatenate collected scripts, each isolated in its own IIFE.
    pub fn bundle_scripts(scripts: &[Script]) -> String {
        if scripts.is_empty() {
            return EMPTY_BUNDLE.to_string();
        }

        scripts
            .iter()
            .map(|script| {
                format!(
                    "/* --- {} --- */\n(function() {{\n{}\n}})();\n",
                    script.label,
                    script.source.trim_end()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

/// Recursively copy `src` into `dest`, overwriting existing files.
///
/// Entries whose name starts with `.` or `_` are skipped along with
/// everything beneath them.
pub fn copy_dir(src: &Path, dest: &Path) -> io::Result<u64> {
    let mut copied = 0;

    let walker = WalkDir::new(src)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_reserved(e.file_name()));

    for entry in walker {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn is_reserved(name: &std::ffi::OsStr) -> bool {
    name.to_str()
        .map(|n| n.starts_with('.') || n.starts_with('_'))
        .unwrap_or(false)
}
