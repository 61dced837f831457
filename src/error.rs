use ash::vk;
use imgui_rs_vulkan_renderer::RendererError;
use std::path::PathBuf;
use thiserror::Error;

/// Crates error type.
#[derive(Debug, Error)]
pub enum ShowcaseError {
    /// Errors coming from calls to Vulkan functions.
    #[error("A Vulkan error occured: {0}")]
    Vulkan(#[from] vk::Result),

    /// Errors coming from the imgui Vulkan renderer.
    #[error("A renderer error occured: {0}")]
    Renderer(#[from] RendererError),

    #[cfg(feature = "gpu-allocator")]
    #[error("A gpu allocator error occured: {0}")]
    GpuAllocator(#[from] gpu_allocator::AllocationError),

    #[error("Failed to create the window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("An event loop error occured: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Io errors.
    #[error("A io error occured: {0}")]
    Io(#[from] std::io::Error),

    /// A font file could not be read.
    #[error("Could not load font file {}: {source}", .path.display())]
    FontNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid glyph ranges: {0}")]
    InvalidGlyphRanges(String),

    /// A merge request was registered before any base font.
    #[error("Font '{0}' is in merge mode but no font was loaded before it")]
    MergeWithoutBase(String),

    #[error("No font named '{0}' was loaded")]
    UnknownFont(String),

    #[error("Failed to parse settings: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("Failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// Initialization errors.
    #[error("An error occured when initializing the application: {0}")]
    Init(String),
}

pub type ShowcaseResult<T> = Result<T, ShowcaseError>;

impl From<std::ffi::NulError> for ShowcaseError {
    fn from(error: std::ffi::NulError) -> Self {
        Self::Init(format!("string contains an interior nul byte: {error}"))
    }
}
