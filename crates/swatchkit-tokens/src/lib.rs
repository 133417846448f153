//! Design token compiler for swatchkit.
//!
//! Reads the JSON token categories (viewports, colors, weights, leading,
//! sizes, spacing, fonts), turns them into CSS custom properties with fluid
//! `clamp()` values where requested, and exposes the compiled context to the
//! documentation and utility-class generators.

pub mod compiler;
pub mod docs;
pub mod fluid;
pub mod model;
pub mod slug;
pub mod utilities;

pub use compiler::{
    write_if_changed, CompiledTokens, TokenCompiler, TokenError, TokenWarning, TOKENS_CSS_FILE,
};
pub use docs::{escape_html, render_token_docs, write_token_docs, TokenDoc, GENERATED_FILES};
pub use fluid::{clamp, FluidBounds, FluidError, ViewportRange, DEFAULT_FLUID_RATIO};
pub use model::{Category, CategoryTokens, CompiledToken, TokenContext, TokenFile, TokenItem, Viewports};
pub use slug::{slug, title_case};
pub use utilities::{DefaultUtilities, UtilityGenerator, UTILITIES_CSS_FILE};
