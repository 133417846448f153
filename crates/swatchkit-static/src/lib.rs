//! Pattern library site builder for swatchkit.
//!
//! Scans a directory of HTML swatches, compiles the design tokens next to
//! it, and writes a browsable index page with one standalone preview per
//! swatch.

pub mod assembler;
pub mod assets;
pub mod builder;
pub mod scanner;
pub mod settings;
pub mod templates;

pub use assembler::{section_order, PreviewPage, Site, SiteAssembler};
pub use assets::{copy_dir, AssetPipeline};
pub use builder::{validate_output_dir, BuildError, BuildReport, SiteBuilder};
pub use scanner::{scan, Catalog, ScanError, Script, Section, Swatch};
pub use settings::BuildSettings;
pub use templates::{Layout, Slot, Slots, TemplateEngine};
