//! # imgui-font-showcase
//!
//! Loading and combining fonts with [imgui-rs][imgui-rs], rendered with
//! [imgui-rs-vulkan-renderer][renderer] in a [winit][winit] window.
//!
//! ## What it shows
//!
//! - A text font loaded from the `data` directory with Latin Extended glyph ranges, so Polish
//!   text renders where imgui's default font shows `?`.
//! - Icons merged into that text font (merge mode), so text and icons mix without switching
//!   fonts. Icons can be made monospaced, bigger and vertically re-centered.
//! - A font compiled into the binary, gzip compressed.
//! - A character debugger printing code points and UTF-8 bytes of a string.
//!
//! ## How it works
//!
//! - [`App`] is the application shim: `setup` runs once before the first frame, `update` and
//!   `draw` run every frame, input, window and message hooks run as events arrive.
//!
//! - [`System`] owns the window, the Vulkan objects and the imgui context. It calls
//!   [`App::setup`], builds and uploads the font atlas, then runs the event loop.
//!
//! - [`FontCatalog`] holds [`FontRequest`]s in atlas order. Requests in merge mode inject their
//!   glyphs in the previous font. [`FontCatalog::load`] returns named [`FontId`] handles
//!   to push while drawing.
//!
//! ```no_run
//! use imgui_font_showcase::{settings::Settings, FontShowcase, System};
//!
//! let settings = Settings::default();
//! let app = FontShowcase::new(&settings.data_dir, settings.fonts.clone());
//! System::new(&settings.window)?.run(app)?;
//! # Ok::<(), imgui_font_showcase::ShowcaseError>(())
//! ```
//!
//! ## Features
//!
//! ### gpu-allocator
//!
//! Allocates the renderer's buffers and images with [gpu-allocator][gpu-allocator] instead of
//! plain Vulkan allocations.
//!
//! [imgui-rs]: https://github.com/imgui-rs/imgui-rs
//! [renderer]: https://github.com/adrien-ben/imgui-rs-vulkan-renderer
//! [winit]: https://github.com/rust-windowing/winit
//! [gpu-allocator]: https://github.com/Traverse-Research/gpu-allocator
//! [`FontId`]: imgui::FontId

pub mod app;
pub mod encoding;
mod error;
pub mod fonts;
pub mod settings;
mod showcase;

pub use app::{App, AppEvent, System, VulkanContext};
pub use error::*;
pub use fonts::{FontCatalog, FontData, FontRequest, GlyphRanges, LoadedFont, LoadedFonts};
pub use showcase::*;
