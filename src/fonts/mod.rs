//! Font registration.
//!
//! A [`FontCatalog`] is an ordered list of [`FontRequest`]s. Each request that is not in
//! merge mode becomes a font of the imgui atlas. Requests in merge mode inject their glyphs
//! into the previous font, which allows mixing text and icons without switching fonts.

pub mod embedded;
mod glyph_ranges;
pub mod icons;

pub use glyph_ranges::*;

use crate::{ShowcaseError, ShowcaseResult};
use imgui::{Context, FontConfig, FontId, FontSource};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

/// Where the bytes of a font come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FontData {
    /// imgui's built-in ProggyClean.
    Default,
    /// A TrueType file. Relative paths are resolved against the catalog's data directory.
    File(PathBuf),
    /// TrueType data compiled into the binary.
    Embedded(&'static [u8]),
    /// Gzip compressed TrueType data compiled into the binary.
    Compressed(&'static [u8]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontRequest {
    pub name: String,
    pub data: FontData,
    pub size_pixels: f32,
    pub glyph_ranges: GlyphRanges,
    pub merge: bool,
    pub glyph_min_advance_x: f32,
    pub glyph_offset: [f32; 2],
}

impl FontRequest {
    pub fn new(name: impl Into<String>, data: FontData, size_pixels: f32) -> Self {
        Self {
            name: name.into(),
            data,
            size_pixels,
            glyph_ranges: GlyphRanges::DEFAULT,
            merge: false,
            glyph_min_advance_x: 0.0,
            glyph_offset: [0.0, 0.0],
        }
    }

    pub fn default_font(name: impl Into<String>, size_pixels: f32) -> Self {
        Self::new(name, FontData::Default, size_pixels)
    }

    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>, size_pixels: f32) -> Self {
        Self::new(name, FontData::File(path.into()), size_pixels)
    }

    pub fn embedded(name: impl Into<String>, data: &'static [u8], size_pixels: f32) -> Self {
        Self::new(name, FontData::Embedded(data), size_pixels)
    }

    pub fn compressed(name: impl Into<String>, data: &'static [u8], size_pixels: f32) -> Self {
        Self::new(name, FontData::Compressed(data), size_pixels)
    }

    pub fn glyph_ranges(mut self, glyph_ranges: GlyphRanges) -> Self {
        self.glyph_ranges = glyph_ranges;
        self
    }

    /// Inject the glyphs into the previously registered font.
    pub fn merged(mut self) -> Self {
        self.merge = true;
        self
    }

    pub fn glyph_min_advance_x(mut self, advance: f32) -> Self {
        self.glyph_min_advance_x = advance;
        self
    }

    pub fn glyph_offset(mut self, offset: [f32; 2]) -> Self {
        self.glyph_offset = offset;
        self
    }

    fn config(&self, scale: f32) -> FontConfig {
        FontConfig {
            size_pixels: self.size_pixels * scale,
            glyph_ranges: self.glyph_ranges.to_imgui(),
            glyph_min_advance_x: self.glyph_min_advance_x * scale,
            glyph_offset: [self.glyph_offset[0] * scale, self.glyph_offset[1] * scale],
            name: Some(format!("{}, {}px", self.name, self.size_pixels)),
            ..FontConfig::default()
        }
    }
}

/// Height and vertical offset of icons.
///
/// Merged icons should keep the height of the font they are merged in. Bigger icons
/// get 8 more pixels and, when merged, are moved down by half of that to stay centered.
pub fn icon_metrics(base_size: f32, merge: bool, big: bool) -> (f32, f32) {
    let mut height = if merge { base_size } else { base_size + 4.0 };
    let mut offset_y = 0.0;
    if big {
        height += 8.0;
        if merge {
            offset_y = 8.0 / 2.0;
        }
    }
    (height, offset_y)
}

/// A font of the atlas, usable with `Ui::push_font`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFont {
    pub name: String,
    pub id: FontId,
    pub size_pixels: f32,
    /// Number of requests merged into this font, the base one excluded.
    pub merged_sources: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedFonts {
    fonts: Vec<LoadedFont>,
}

impl LoadedFonts {
    pub fn get(&self, name: &str) -> Option<FontId> {
        self.fonts.iter().find(|font| font.name == name).map(|font| font.id)
    }

    pub fn require(&self, name: &str) -> ShowcaseResult<FontId> {
        self.get(name)
            .ok_or_else(|| ShowcaseError::UnknownFont(name.to_owned()))
    }

    /// The font imgui uses when none is pushed: the first one added to the atlas.
    pub fn default_font(&self) -> Option<&LoadedFont> {
        self.fonts.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedFont> {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FontCatalog {
    data_dir: PathBuf,
    requests: Vec<FontRequest>,
}

impl FontCatalog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            requests: Vec::new(),
        }
    }

    pub fn with(mut self, request: FontRequest) -> Self {
        self.add(request);
        self
    }

    pub fn add(&mut self, request: FontRequest) -> &mut Self {
        self.requests.push(request);
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn requests(&self) -> &[FontRequest] {
        &self.requests
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Splits requests into atlas fonts: a base request followed by its merged requests.
    fn groups(&self) -> ShowcaseResult<Vec<&[FontRequest]>> {
        let mut groups = Vec::new();
        let mut start = None;
        for (index, request) in self.requests.iter().enumerate() {
            match (request.merge, start) {
                (true, None) => return Err(ShowcaseError::MergeWithoutBase(request.name.clone())),
                (true, Some(_)) => {}
                (false, None) => start = Some(index),
                (false, Some(begin)) => {
                    groups.push(&self.requests[begin..index]);
                    start = Some(index);
                }
            }
        }
        if let Some(begin) = start {
            groups.push(&self.requests[begin..]);
        }
        Ok(groups)
    }

    fn read(&self, request: &FontRequest) -> ShowcaseResult<Option<Cow<'static, [u8]>>> {
        let data = match &request.data {
            FontData::Default => None,
            FontData::File(path) => {
                let path = self.resolve(path);
                log::debug!("Reading font '{}' from {}", request.name, path.display());
                let data = std::fs::read(&path)
                    .map_err(|source| ShowcaseError::FontNotFound { path, source })?;
                Some(Cow::Owned(data))
            }
            FontData::Embedded(data) => Some(Cow::Borrowed(*data)),
            FontData::Compressed(data) => Some(Cow::Owned(embedded::inflate(data)?)),
        };
        Ok(data)
    }

    /// Adds every font to the atlas of `imgui`.
    ///
    /// The atlas texture must be rebuilt afterwards. `scale` is applied to sizes and offsets,
    /// pass the HiDPI factor of the window.
    pub fn load(&self, imgui: &mut Context, scale: f32) -> ShowcaseResult<LoadedFonts> {
        let mut fonts = Vec::new();
        for group in self.groups()? {
            let blobs = group
                .iter()
                .map(|request| self.read(request))
                .collect::<ShowcaseResult<Vec<_>>>()?;

            let sources = group
                .iter()
                .zip(&blobs)
                .map(|(request, blob)| match blob {
                    Some(data) => FontSource::TtfData {
                        data: &**data,
                        size_pixels: request.size_pixels * scale,
                        config: Some(request.config(scale)),
                    },
                    None => FontSource::DefaultFontData {
                        config: Some(request.config(scale)),
                    },
                })
                .collect::<Vec<_>>();

            let id = imgui.fonts().add_font(&sources);
            let base = &group[0];
            log::debug!(
                "Added font '{}' ({}px) with {} merged source(s)",
                base.name,
                base.size_pixels,
                group.len() - 1
            );

            fonts.push(LoadedFont {
                name: base.name.clone(),
                id,
                size_pixels: base.size_pixels,
                merged_sources: group.len() - 1,
            });
        }

        log::info!("Loaded {} font(s) into the atlas", fonts.len());
        Ok(LoadedFonts { fonts })
    }
}

/// Builds the atlas texture on the CPU side and returns its size.
///
/// Renderers upload the texture themselves, this is what they call under the hood.
pub fn build_atlas(imgui: &mut Context) -> [u32; 2] {
    let texture = imgui.fonts().build_rgba32_texture();
    log::debug!("Font atlas is {}x{}", texture.width, texture.height);
    [texture.width, texture.height]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(groups: &[&[FontRequest]]) -> Vec<Vec<String>> {
        groups
            .iter()
            .map(|group| group.iter().map(|r| r.name.clone()).collect())
            .collect()
    }

    #[test]
    fn merged_requests_join_the_previous_font() {
        let catalog = FontCatalog::new("data")
            .with(FontRequest::default_font("default", 13.0))
            .with(FontRequest::file("text", "text.ttf", 16.0))
            .with(FontRequest::file("icons", "icons.ttf", 16.0).merged())
            .with(FontRequest::file("more icons", "icons.ttf", 16.0).merged())
            .with(FontRequest::embedded("mono", &[], 10.0));

        let groups = catalog.groups().unwrap();

        assert_eq!(
            names(&groups),
            vec![
                vec!["default"],
                vec!["text", "icons", "more icons"],
                vec!["mono"]
            ]
        );
    }

    #[test]
    fn leading_merge_is_rejected() {
        let catalog =
            FontCatalog::new("data").with(FontRequest::file("icons", "i.ttf", 16.0).merged());

        assert!(matches!(
            catalog.groups(),
            Err(ShowcaseError::MergeWithoutBase(name)) if name == "icons"
        ));
    }

    #[test]
    fn empty_catalog_has_no_group() {
        assert!(FontCatalog::new("data").groups().unwrap().is_empty());
    }

    #[test]
    fn relative_paths_resolve_against_data_dir() {
        let catalog = FontCatalog::new("some/data");

        assert_eq!(
            catalog.resolve(Path::new("font.ttf")),
            PathBuf::from("some/data/font.ttf")
        );
        let absolute = std::env::temp_dir().join("font.ttf");
        assert_eq!(catalog.resolve(&absolute), absolute);
    }

    #[test]
    fn missing_file_names_the_resolved_path() {
        let catalog = FontCatalog::new("does/not/exist");
        let request = FontRequest::file("ghost", "ghost.ttf", 16.0);

        match catalog.read(&request) {
            Err(ShowcaseError::FontNotFound { path, .. }) => {
                assert_eq!(path, PathBuf::from("does/not/exist/ghost.ttf"))
            }
            other => panic!("unexpected result: {:?}", other.map(|d| d.map(|d| d.len()))),
        }
    }

    #[test]
    fn config_is_scaled() {
        let request = FontRequest::file("icons", "icons.ttf", 16.0)
            .glyph_min_advance_x(13.0)
            .glyph_offset([0.0, 4.0]);

        let config = request.config(2.0);

        assert_eq!(config.size_pixels, 32.0);
        assert_eq!(config.glyph_min_advance_x, 26.0);
        assert_eq!(config.glyph_offset, [0.0, 8.0]);
        assert_eq!(config.name.as_deref(), Some("icons, 16px"));
    }

    #[test]
    fn icon_metrics_follow_merge_and_size() {
        assert_eq!(icon_metrics(16.0, true, false), (16.0, 0.0));
        assert_eq!(icon_metrics(16.0, true, true), (24.0, 4.0));
        assert_eq!(icon_metrics(16.0, false, false), (20.0, 0.0));
        assert_eq!(icon_metrics(16.0, false, true), (28.0, 0.0));
    }
}
