use imgui::{Context, Font, FontId};
use imgui_font_showcase::{
    fonts::{build_atlas, embedded, icons},
    settings::FontSettings,
    App, FontCatalog, FontRequest, FontShowcase, GlyphRanges, ShowcaseError, DEFAULT_FONT,
    EMBEDDED_FONT, ICON_FONT, TEXT_FONT,
};
use std::{
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

// imgui allows a single active context per process.
static IMGUI: Mutex<()> = Mutex::new(());

fn context() -> (MutexGuard<'static, ()>, Context) {
    let guard = IMGUI.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut imgui = Context::create();
    imgui.set_ini_filename(None);
    imgui.io_mut().display_size = [1024.0, 768.0];
    (guard, imgui)
}

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Whether `c` was rasterized into `font`. The atlas must be built.
fn has_glyph(imgui: &mut Context, font: FontId, c: char) -> bool {
    let font = imgui.fonts().get_font(font).expect("font is in the atlas");
    let raw = font as *const Font as *mut imgui::sys::ImFont;
    unsafe { !imgui::sys::ImFont_FindGlyphNoFallback(raw, c as imgui::sys::ImWchar).is_null() }
}

fn icon_chars() -> Vec<char> {
    icons::ALL
        .iter()
        .filter_map(|(_, icon)| icon.chars().next())
        .collect()
}

#[test]
fn merged_fonts_share_an_atlas_slot() {
    let (_guard, mut imgui) = context();
    let catalog = FontCatalog::new(data_dir())
        .with(
            FontRequest::file("text", "DejaVuSansCondensed.ttf", 16.0)
                .glyph_ranges(GlyphRanges::LATIN_EXTENDED),
        )
        .with(
            FontRequest::file("icons", "DejaVuSans.ttf", 16.0)
                .glyph_ranges(GlyphRanges::ICONS)
                .merged(),
        );

    let fonts = catalog.load(&mut imgui, 1.0).unwrap();

    assert_eq!(fonts.len(), 1);
    assert_eq!(imgui.fonts().fonts().len(), 1);
    let text = fonts.iter().next().unwrap();
    assert_eq!(text.name, "text");
    assert_eq!(text.merged_sources, 1);
    assert!(fonts.get("icons").is_none());
}

#[test]
fn every_source_kind_loads() {
    let (_guard, mut imgui) = context();
    static MONO: std::sync::OnceLock<Vec<u8>> = std::sync::OnceLock::new();
    let mono: &'static [u8] = MONO.get_or_init(|| embedded::mono_ttf().unwrap());

    let catalog = FontCatalog::new(data_dir())
        .with(FontRequest::default_font("default", 13.0))
        .with(FontRequest::file("file", data_dir().join("DejaVuSans.ttf"), 16.0))
        .with(FontRequest::embedded("embedded", mono, 12.0))
        .with(FontRequest::compressed("compressed", embedded::MONO_TTF_GZ, 10.0));

    let fonts = catalog.load(&mut imgui, 2.0).unwrap();

    let ids = fonts.iter().map(|font| font.id).collect::<Vec<_>>();
    assert_eq!(ids.len(), 4);
    assert_eq!(imgui.fonts().fonts(), ids);
    assert_eq!(fonts.default_font().unwrap().name, "default");
    assert_eq!(fonts.require("compressed").unwrap(), ids[3]);

    let [width, height] = build_atlas(&mut imgui);
    assert!(width > 0 && height > 0);
}

#[test]
fn missing_font_file_fails_the_load() {
    let (_guard, mut imgui) = context();
    let catalog =
        FontCatalog::new(data_dir()).with(FontRequest::file("ghost", "ghost.ttf", 16.0));

    match catalog.load(&mut imgui, 1.0) {
        Err(ShowcaseError::FontNotFound { path, .. }) => {
            assert_eq!(path, data_dir().join("ghost.ttf"))
        }
        other => panic!("expected a missing font error, got {:?}", other.map(|f| f.len())),
    }
}

#[test]
fn unknown_font_name_is_an_error() {
    let (_guard, mut imgui) = context();
    let fonts = FontCatalog::new(data_dir())
        .with(FontRequest::default_font("default", 13.0))
        .load(&mut imgui, 1.0)
        .unwrap();

    assert!(matches!(
        fonts.require("nope"),
        Err(ShowcaseError::UnknownFont(name)) if name == "nope"
    ));
}

#[test]
fn showcase_setup_registers_its_fonts() {
    let (_guard, mut imgui) = context();
    let mut showcase = FontShowcase::new(data_dir(), FontSettings::default());

    showcase.setup(&mut imgui, 1.0).unwrap();

    let names = showcase
        .fonts()
        .iter()
        .map(|font| font.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec![DEFAULT_FONT, TEXT_FONT, EMBEDDED_FONT]);
    assert!(showcase.fonts().get(TEXT_FONT).is_some());
    assert!(showcase.fonts().get(ICON_FONT).is_none());
}

#[test]
fn showcase_with_separate_icons_has_four_fonts() {
    let (_guard, mut imgui) = context();
    let settings = FontSettings {
        merge_icons: false,
        ..FontSettings::default()
    };
    let mut showcase = FontShowcase::new(data_dir(), settings);

    showcase.setup(&mut imgui, 1.0).unwrap();

    assert_eq!(showcase.fonts().len(), 4);
    assert!(showcase.fonts().get(ICON_FONT).is_some());
}

#[test]
fn showcase_draws_frames() {
    let (_guard, mut imgui) = context();
    let mut showcase = FontShowcase::new(data_dir(), FontSettings::default());
    showcase.setup(&mut imgui, 1.0).unwrap();
    build_atlas(&mut imgui);

    for _ in 0..2 {
        let ui = imgui.new_frame();
        showcase.draw(ui);
        let draw_data = imgui.render();
        assert!(draw_data.total_vtx_count > 0);
    }
}

#[test]
fn showcase_setup_fails_without_data() {
    let (_guard, mut imgui) = context();
    let mut showcase = FontShowcase::new("no/such/dir", FontSettings::default());

    assert!(matches!(
        showcase.setup(&mut imgui, 1.0),
        Err(ShowcaseError::FontNotFound { .. })
    ));
}

#[test]
fn atlas_holds_polish_letters_and_merged_icons() {
    let (_guard, mut imgui) = context();
    let mut showcase = FontShowcase::new(data_dir(), FontSettings::default());
    showcase.setup(&mut imgui, 1.0).unwrap();
    build_atlas(&mut imgui);

    let default = showcase.fonts().require(DEFAULT_FONT).unwrap();
    let text = showcase.fonts().require(TEXT_FONT).unwrap();

    assert!(!has_glyph(&mut imgui, default, 'ś'));
    for c in "ćńóśźżąęł".chars() {
        assert!(has_glyph(&mut imgui, text, c), "text font misses {c}");
    }
    for c in icon_chars() {
        assert!(has_glyph(&mut imgui, text, c), "icon {c} is not merged");
        assert!(!has_glyph(&mut imgui, default, c));
    }
}

#[test]
fn separate_icons_and_basic_latin_follow_settings() {
    let (_guard, mut imgui) = context();
    let settings = FontSettings {
        extended_latin: false,
        merge_icons: false,
        ..FontSettings::default()
    };
    let mut showcase = FontShowcase::new(data_dir(), settings);
    showcase.setup(&mut imgui, 1.0).unwrap();
    build_atlas(&mut imgui);

    let text = showcase.fonts().require(TEXT_FONT).unwrap();
    let icon_font = showcase.fonts().require(ICON_FONT).unwrap();

    assert!(has_glyph(&mut imgui, text, 'ó'));
    assert!(!has_glyph(&mut imgui, text, 'ś'));
    for c in icon_chars() {
        assert!(!has_glyph(&mut imgui, text, c));
        assert!(has_glyph(&mut imgui, icon_font, c));
    }
}
