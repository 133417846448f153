//! Content scanner: pattern tree to sections and swatches.
//!
//! The pattern root is read in two passes. Immediate subdirectories without
//! an `index.html` are section containers whose entries become swatches.
//! Root-level `.html` files and root-level directories that do have an
//! `index.html` are collected into the trailing "Patterns" section.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use swatchkit_tokens::{slug, title_case};
use walkdir::WalkDir;

use crate::assets::copy_dir;

/// Heading of the section built from the `tokens` directory.
pub const TOKENS_SECTION: &str = "Design Tokens";

/// Heading of the section holding root-level swatches.
pub const PATTERNS_SECTION: &str = "Patterns";

const INDEX_FILE: &str = "index.html";
const DESCRIPTION_FILE: &str = "description.html";

/// Errors that stop a scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Pattern directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One renderable example.
#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    /// Unique anchor and preview directory name
    pub id: String,

    /// Display label
    pub name: String,

    /// Raw HTML body
    pub content: String,

    /// Raw HTML from `description.html`
    pub description: Option<String>,

    /// Slug of the containing section, `None` for root-level swatches
    pub section_slug: Option<String>,

    /// Sibling files and directories mirrored into the preview directory
    pub assets: Vec<PathBuf>,
}

impl Swatch {
    /// Preview directory relative to the preview root.
    pub fn preview_path(&self) -> PathBuf {
        match &self.section_slug {
            Some(section) => Path::new(section).join(&self.id),
            None => PathBuf::from(&self.id),
        }
    }
}

/// A named group of swatches, referencing [`Catalog::swatches`] by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub slug: Option<String>,
    pub swatches: Vec<usize>,
}

/// A script collected for the shared bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// Provenance shown in the bundle, e.g. `tokens/script.js`
    pub label: String,
    pub source: String,
}

/// Result of a scan. Sections are in discovery order; see
/// [`crate::assembler::section_order`] for display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub swatches: Vec<Swatch>,
    pub sections: Vec<Section>,
    pub scripts: Vec<Script>,
}

impl Catalog {
    /// Swatches of a section in scan order.
    pub fn section_swatches<'a>(&'a self, section: &'a Section) -> impl Iterator<Item = &'a Swatch> {
        section.swatches.iter().filter_map(|&i| self.swatches.get(i))
    }

    pub fn swatch(&self, id: &str) -> Option<&Swatch> {
        self.swatches.iter().find(|s| s.id == id)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}

/// Match an entry name against an exclusion pattern.
///
/// Supports exact names, `prefix*`, `*suffix` and `*substring*`; any other
/// use of `*` is compared literally.
pub fn matches_glob(name: &str, pattern: &str) -> bool {
    let starts = pattern.starts_with('*');
    let ends = pattern.ends_with('*') && pattern.len() > 1;

    match (starts, ends) {
        (true, true) => name.contains(&pattern[1..pattern.len() - 1]),
        (false, true) => name.starts_with(&pattern[..pattern.len() - 1]),
        (true, false) if pattern.len() > 1 => name.ends_with(&pattern[1..]),
        (true, false) => true,
        (false, false) => name == pattern,
    }
}

/// Whether an entry name is skipped: reserved `.`/`_` names and exclusions.
pub fn is_skipped(name: &str, exclude: &[String]) -> bool {
    name.starts_with('.') || name.starts_with('_') || exclude.iter().any(|p| matches_glob(name, p))
}

/// Scan a pattern root.
pub fn scan(dir: &Path, exclude: &[String]) -> Result<Catalog, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::RootNotFound(dir.to_path_buf()));
    }

    let mut scanner = Scanner {
        exclude,
        catalog: Catalog::default(),
        ids: HashSet::new(),
    };

    let entries = list_dir(dir).map_err(|source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    // Section pass
    for entry in entries.iter().filter(|e| e.is_dir && !is_skipped(&e.name, exclude)) {
        if entry.path.join(INDEX_FILE).is_file() {
            continue;
        }

        let name = if entry.name == "tokens" {
            TOKENS_SECTION.to_string()
        } else {
            title_case(&entry.name)
        };
        let section_slug = slug(&entry.name);

        let swatches = scanner.scan_section(&entry.path, &entry.name, &section_slug);
        if swatches.is_empty() {
            tracing::debug!("Skipping empty section {}", entry.path.display());
            continue;
        }

        scanner.add_section(name, Some(section_slug), swatches);
    }

    // Root pass
    let mut root = Vec::new();
    for entry in entries.iter().filter(|e| !is_skipped(&e.name, exclude)) {
        if entry.is_dir {
            if entry.path.join(INDEX_FILE).is_file() {
                root.extend(scanner.directory_swatch(entry, None));
            }
        } else if entry.name.ends_with(".html") {
            root.extend(scanner.file_swatch(entry, None));
        }
    }

    if !root.is_empty() {
        scanner.add_section(PATTERNS_SECTION.to_string(), None, root);
    }

    tracing::debug!(
        "Scanned {} swatches in {} sections",
        scanner.catalog.swatches.len(),
        scanner.catalog.sections.len()
    );

    Ok(scanner.catalog)
}

/// Copy every directory swatch's assets into its preview directory.
///
/// Returns the number of swatches that had assets.
pub fn mirror_assets(catalog: &Catalog, preview_root: &Path) -> io::Result<usize> {
    let mut mirrored = 0;

    for swatch in catalog.swatches.iter().filter(|s| !s.assets.is_empty()) {
        let dest = preview_root.join(swatch.preview_path());
        fs::create_dir_all(&dest)?;

        for asset in &swatch.assets {
            let Some(name) = asset.file_name() else {
                continue;
            };
            if asset.is_dir() {
                copy_dir(asset, &dest.join(name))?;
            } else {
                fs::copy(asset, dest.join(name))?;
            }
        }
        mirrored += 1;
    }

    Ok(mirrored)
}

struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Directory entries sorted by name. Non-UTF-8 names are skipped.
fn list_dir(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let path = entry.path().to_path_buf();
        entries.push(Entry {
            is_dir: path.is_dir(),
            name: name.to_string(),
            path,
        });
    }

    Ok(entries)
}

struct Scanner<'a> {
    exclude: &'a [String],
    catalog: Catalog,
    ids: HashSet<String>,
}

impl Scanner<'_> {
    /// Add a section, merging into an existing one with the same heading.
    fn add_section(&mut self, name: String, slug: Option<String>, swatches: Vec<usize>) {
        match self.catalog.sections.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                tracing::debug!("Merging swatches into section {}", name);
                existing.swatches.extend(swatches);
            }
            None => self.catalog.sections.push(Section {
                name,
                slug,
                swatches,
            }),
        }
    }

    fn scan_section(&mut self, dir: &Path, dir_name: &str, section_slug: &str) -> Vec<usize> {
        let entries = match list_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to read section {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut swatches = Vec::new();
        for entry in entries.iter().filter(|e| !is_skipped(&e.name, self.exclude)) {
            if entry.is_dir {
                if entry.path.join(INDEX_FILE).is_file() {
                    swatches.extend(self.directory_swatch(entry, Some(section_slug)));
                }
            } else if entry.name.ends_with(".html") {
                swatches.extend(self.file_swatch(entry, Some(section_slug)));
            } else if entry.name.ends_with(".js") {
                self.collect_script(&entry.path, format!("{}/{}", dir_name, entry.name));
            }
        }

        swatches
    }

    fn file_swatch(&mut self, entry: &Entry, section_slug: Option<&str>) -> Option<usize> {
        let content = read_optional(&entry.path)?;
        let name = entry.name.trim_end_matches(".html").to_string();
        let id = self.unique_id(&name);

        Some(self.push(Swatch {
            id,
            name,
            content,
            description: None,
            section_slug: section_slug.map(str::to_string),
            assets: Vec::new(),
        }))
    }

    fn directory_swatch(&mut self, entry: &Entry, section_slug: Option<&str>) -> Option<usize> {
        let content = read_optional(&entry.path.join(INDEX_FILE))?;
        let description_path = entry.path.join(DESCRIPTION_FILE);
        let description = description_path
            .is_file()
            .then(|| read_optional(&description_path))
            .flatten();

        let mut assets = Vec::new();
        match list_dir(&entry.path) {
            Ok(children) => {
                for child in children {
                    if child.name == INDEX_FILE
                        || child.name == DESCRIPTION_FILE
                        || child.name.starts_with('.')
                        || child.name.starts_with('_')
                    {
                        continue;
                    }
                    if !child.is_dir && child.name.ends_with(".js") {
                        self.collect_script(&child.path, format!("{}/{}", entry.name, child.name));
                    }
                    assets.push(child.path);
                }
            }
            Err(e) => tracing::warn!("Failed to list {}: {}", entry.path.display(), e),
        }

        let id = self.unique_id(&entry.name);

        Some(self.push(Swatch {
            id,
            name: entry.name.clone(),
            content,
            description,
            section_slug: section_slug.map(str::to_string),
            assets,
        }))
    }

    fn collect_script(&mut self, path: &Path, label: String) {
        if let Some(source) = read_optional(path) {
            self.catalog.scripts.push(Script { label, source });
        }
    }

    fn push(&mut self, swatch: Swatch) -> usize {
        self.catalog.swatches.push(swatch);
        self.catalog.swatches.len() - 1
    }

    /// Slug of `name`, suffixed with `-2`, `-3`, ... when already taken.
    fn unique_id(&mut self, name: &str) -> String {
        let mut base = slug(name);
        if base.is_empty() {
            base = "swatch".to_string();
        }

        let mut id = base.clone();
        let mut n = 2;
        while self.ids.contains(&id) {
            id = format!("{}-{}", base, n);
            n += 1;
        }

        self.ids.insert(id.clone());
        id
    }
}

/// Read a file, logging and returning `None` on failure.
fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}
