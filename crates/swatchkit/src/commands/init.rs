//! Scaffold a pattern library in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use swatchkit_static::BuildSettings;
use swatchkit_static::templates::DEFAULT_LAYOUT;
use swatchkit_tokens::{write_token_docs, TokenCompiler};

/// What happened to one scaffolded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Created,
    Replaced,
    Kept,
}

/// Run the init command.
pub fn run(settings: &BuildSettings, force: bool) -> Result<()> {
    tracing::info!("Initializing swatchkit...");

    for dir in [&settings.source_dir, &settings.tokens_dir, &settings.css_dir] {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            tracing::info!("Created {}", dir.display());
        }
    }

    for (name, contents) in BLUEPRINT_TOKENS {
        scaffold(&settings.tokens_dir.join(name), contents, force)?;
    }
    scaffold(&settings.tokens_dir.join("script.js"), TOKEN_SCRIPT, force)?;
    scaffold(&settings.css_dir.join("styles.css"), STARTER_STYLES, force)?;
    scaffold(&settings.project_layout(), DEFAULT_LAYOUT, force)?;

    let compiled = TokenCompiler::new(&settings.tokens_dir).compile_to(&settings.css_dir)?;
    if settings.token_docs && !compiled.context.is_empty() {
        write_token_docs(&compiled.context, &settings.token_docs_dir)?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'swatchkit build --watch' to start working on your patterns.");

    Ok(())
}

/// Write `contents` to `path`. An existing file is kept, or with `force`
/// renamed to `<file>.bak` first.
fn scaffold(path: &Path, contents: &str, force: bool) -> Result<Outcome> {
    let outcome = if path.exists() {
        if !force {
            tracing::warn!("{} already exists. Use --force to overwrite.", path.display());
            return Ok(Outcome::Kept);
        }

        let mut backup = path.as_os_str().to_owned();
        backup.push(".bak");
        fs::rename(path, &backup)
            .with_context(|| format!("Failed to back up {}", path.display()))?;
        tracing::info!("Backed up {} to {}", path.display(), Path::new(&backup).display());
        Outcome::Replaced
    } else {
        Outcome::Created
    };

    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(outcome)
}

const BLUEPRINT_TOKENS: [(&str, &str); 7] = [
    (
        "colors.json",
        r##"{
  "title": "Colors",
  "items": [
    { "name": "Dark", "value": "#1f2937" },
    { "name": "Light", "value": "#f9fafb" },
    { "name": "Primary", "value": "#3b82f6" },
    { "name": "Secondary", "value": "#8b5cf6" },
    { "name": "Accent", "value": "#f59e0b" }
  ]
}
"##,
    ),
    (
        "text-weights.json",
        r#"{
  "title": "Text Weights",
  "items": [
    { "name": "Regular", "value": 400 },
    { "name": "Medium", "value": 500 },
    { "name": "Bold", "value": 700 }
  ]
}
"#,
    ),
    (
        "text-leading.json",
        r#"{
  "title": "Text Leading",
  "base": 1.5,
  "ratio": 1.125,
  "items": [
    { "name": "Flat", "step": -2 },
    { "name": "Fine", "step": -1 },
    { "name": "Standard", "step": 0 },
    { "name": "Loose", "step": 1 }
  ]
}
"#,
    ),
    (
        "viewports.json",
        r#"{
  "title": "Viewports",
  "min": 320,
  "max": 1240
}
"#,
    ),
    (
        "text-sizes.json",
        r#"{
  "title": "Text Sizes",
  "fluidRatio": 1.125,
  "items": [
    { "name": "0", "min": 14, "max": 16 },
    { "name": "1", "min": 16, "max": 18 },
    { "name": "2", "min": 18, "max": 24 },
    { "name": "3", "min": 24, "max": 32 },
    { "name": "4", "min": 32 },
    { "name": "Base", "value": "1rem" }
  ]
}
"#,
    ),
    (
        "spacing.json",
        r#"{
  "title": "Spacing",
  "items": [
    { "name": "XS", "min": 8, "max": 10 },
    { "name": "S", "min": 16, "max": 20 },
    { "name": "M", "min": 24, "max": 30 },
    { "name": "L", "min": 32, "max": 40 },
    { "name": "Gutter", "value": "1.5rem" }
  ]
}
"#,
    ),
    (
        "fonts.json",
        r#"{
  "title": "Fonts",
  "items": [
    { "name": "Base", "value": ["system-ui", "-apple-system", "sans-serif"] },
    { "name": "Mono", "value": ["ui-monospace", "SFMono-Regular", "monospace"] }
  ]
}
"#,
    ),
];

const TOKEN_SCRIPT: &str = r#"// Show the resolved value next to each .token-value element.
document.querySelectorAll('.token-value').forEach((el) => {
  const prop = el.getAttribute('data-var');
  if (!prop) return;

  const computed = getComputedStyle(document.documentElement).getPropertyValue(prop).trim();
  if (computed) {
    const hint = document.createElement('span');
    hint.className = 'token-computed';
    hint.textContent = ` (${computed})`;
    el.appendChild(hint);
  }
});
"#;

const STARTER_STYLES: &str = r#"body {
  font-family: var(--font-base, system-ui, sans-serif);
  font-size: var(--s1, 1rem);
  line-height: var(--leading-standard, 1.5);
  color: var(--color-dark, #1f2937);
  background: var(--color-light, #f9fafb);
  margin: 0;
}

.swatchkit-layout {
  display: grid;
  grid-template-columns: 16rem 1fr;
  min-height: 100vh;
}

.swatchkit-sidebar {
  padding: var(--space-m, 1.5rem);
  border-right: 1px solid #e5e7eb;
}

.swatchkit-sidebar a {
  display: block;
}

.swatchkit-main {
  padding: var(--space-l, 2rem);
}

.swatch {
  margin-bottom: var(--space-l, 2rem);
}

.swatch .preview {
  padding: var(--space-m, 1.5rem);
  border: 1px solid #e5e7eb;
}

.swatch pre {
  overflow-x: auto;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scaffolds_project_and_compiles_tokens() {
        let temp = tempdir().unwrap();
        let settings = BuildSettings::new(temp.path());

        run(&settings, false).unwrap();

        for (name, _) in BLUEPRINT_TOKENS {
            assert!(settings.tokens_dir.join(name).is_file(), "{name}");
        }
        assert!(settings.project_layout().is_file());
        assert!(settings.css_dir.join("styles.css").is_file());

        let css = fs::read_to_string(settings.tokens_css_file()).unwrap();
        assert!(css.contains("--color-primary: #3b82f6;"));
        assert!(css.contains("--s1: clamp("));
        assert!(css.contains("--leading-standard: calc("));
        assert!(settings.token_docs_dir.join("colors.html").is_file());
    }

    #[test]
    fn keeps_existing_files_without_force() {
        let temp = tempdir().unwrap();
        let settings = BuildSettings::new(temp.path());
        fs::create_dir_all(&settings.css_dir).unwrap();
        fs::write(settings.css_dir.join("styles.css"), "/* mine */").unwrap();

        run(&settings, false).unwrap();

        assert_eq!(
            fs::read_to_string(settings.css_dir.join("styles.css")).unwrap(),
            "/* mine */"
        );
        assert!(!settings.css_dir.join("styles.css.bak").exists());
    }

    #[test]
    fn force_backs_up_before_replacing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("styles.css");
        fs::write(&path, "/* mine */").unwrap();

        let outcome = scaffold(&path, "body {}", true).unwrap();

        assert_eq!(outcome, Outcome::Replaced);
        assert_eq!(fs::read_to_string(&path).unwrap(), "body {}");
        assert_eq!(
            fs::read_to_string(temp.path().join("styles.css.bak")).unwrap(),
            "/* mine */"
        );
        assert_eq!(scaffold(&path, "x", false).unwrap(), Outcome::Kept);
        assert_eq!(
            scaffold(&temp.path().join("new.css"), "x", false).unwrap(),
            Outcome::Created
        );
    }
}
