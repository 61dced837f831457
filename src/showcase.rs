//! The font examples window.

use crate::{
    app::App,
    encoding::encoding_table,
    fonts::{
        embedded, icon_metrics, icons::*, FontCatalog, FontRequest, GlyphRanges, LoadedFonts,
    },
    settings::FontSettings,
    ShowcaseResult,
};
use imgui::{Condition, Context, FontId, TreeNodeFlags, Ui};
use std::path::PathBuf;

pub const DEFAULT_FONT: &str = "ProggyClean";
pub const TEXT_FONT: &str = "DejaVu Sans Condensed";
pub const ICON_FONT: &str = "DejaVu Sans symbols";
pub const EMBEDDED_FONT: &str = "DejaVu Sans Mono (embedded)";

const DEFAULT_FONT_SIZE: f32 = 13.0;
const ICON_MIN_ADVANCE_X: f32 = 13.0;

const POLISH_GREETING: &str = "Witaj świecie !";
const POLISH_LETTERS: &str = "Some polish characters: ć, ń, ó, ś, ź, ż, ą, ę, ł.";
const FONTS_DOC_URL: &str = "https://github.com/ocornut/imgui/blob/master/docs/FONTS.md";
const NOTE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.5];

/// Fonts registered by the showcase, in atlas order.
pub fn font_catalog(data_dir: impl Into<PathBuf>, settings: &FontSettings) -> FontCatalog {
    let text_ranges = if settings.extended_latin {
        GlyphRanges::LATIN_EXTENDED
    } else {
        GlyphRanges::DEFAULT
    };
    let (icon_size, icon_offset_y) =
        icon_metrics(settings.text_size, settings.merge_icons, settings.big_icons);

    let mut icons = FontRequest::file(ICON_FONT, "DejaVuSans.ttf", icon_size)
        .glyph_ranges(GlyphRanges::ICONS)
        .glyph_min_advance_x(ICON_MIN_ADVANCE_X)
        .glyph_offset([0.0, icon_offset_y]);
    if settings.merge_icons {
        icons = icons.merged();
    }

    FontCatalog::new(data_dir)
        .with(FontRequest::default_font(DEFAULT_FONT, DEFAULT_FONT_SIZE))
        .with(
            FontRequest::file(TEXT_FONT, "DejaVuSansCondensed.ttf", settings.text_size)
                .glyph_ranges(text_ranges),
        )
        .with(icons)
        .with(FontRequest::compressed(
            EMBEDDED_FONT,
            embedded::MONO_TTF_GZ,
            settings.embedded_size,
        ))
}

/// Handles resolved once the atlas holds the fonts.
#[derive(Debug, Clone, Copy)]
struct Handles {
    text: FontId,
    icons: FontId,
    embedded: FontId,
}

pub struct FontShowcase {
    catalog: FontCatalog,
    settings: FontSettings,
    fonts: LoadedFonts,
    handles: Option<Handles>,
    custom_string: String,
    last_message: Option<String>,
}

impl FontShowcase {
    pub fn new(data_dir: impl Into<PathBuf>, settings: FontSettings) -> Self {
        Self {
            catalog: font_catalog(data_dir, &settings),
            settings,
            fonts: LoadedFonts::default(),
            handles: None,
            custom_string: "0-éàî-°C".to_owned(),
            last_message: None,
        }
    }

    pub fn fonts(&self) -> &LoadedFonts {
        &self.fonts
    }

    fn draw_contents(&mut self, ui: &Ui, handles: Handles) {
        ui.spacing();
        ui.collapsing_header("Default font", TreeNodeFlags::LEAF);
        ui.text("Hello, world!");
        ui.spacing();

        ui.collapsing_header("Special characters", TreeNodeFlags::LEAF);
        let missing = GlyphRanges::DEFAULT.missing_chars(POLISH_GREETING);
        ui.text(POLISH_GREETING);
        ui.same_line();
        ui.text_colored(
            NOTE_COLOR,
            format!(
                "<-- {} character(s) not loaded in this font: {}",
                missing.len(),
                missing.iter().collect::<String>()
            ),
        );
        {
            let _text = ui.push_font(handles.text);
            ui.text(POLISH_GREETING);
            ui.same_line();
            ui.text_colored(NOTE_COLOR, "<-- with another font, it's rendered correctly !");
            ui.text(POLISH_LETTERS);
        }
        if !self.settings.extended_latin {
            ui.text_disabled("Latin Extended glyphs are disabled in the settings.");
        }
        ui.dummy([0.0, 10.0]);

        ui.collapsing_header("Icons", TreeNodeFlags::LEAF);
        {
            let _text = ui.push_font(handles.text);
            let all_icons = ALL.iter().map(|(_, icon)| *icon).collect::<Vec<_>>().join(" ");
            if handles.icons == handles.text {
                ui.text(format!("Icons are loaded too ! {}", ICON_CHECK));
                ui.text_wrapped(format!(
                    "The glyphs are merged into another font, allowing to mix text and {} without changing font.",
                    ICON_SUN
                ));
                ui.button(format!("{} Cut it !", ICON_SCISSORS));
                ui.same_line();
                ui.button(format!("{} Mad button !", ICON_FROWN));
                ui.same_line();
                ui.button(format!("{} Ring it !", ICON_TELEPHONE));
                ui.text(all_icons);
            } else {
                ui.text("Icons are loaded as a separate font, text needs a font switch:");
                let _icons = ui.push_font(handles.icons);
                ui.text(all_icons);
            }
        }
        if self.settings.big_icons {
            ui.text_disabled("Icons are loaded bigger on purpose.");
        }
        ui.text_disabled("Note: the embedded icon set is NOT complete.");
        ui.dummy([0.0, 10.0]);

        {
            let _embedded = ui.push_font(handles.embedded);
            ui.collapsing_header("Embedded font", TreeNodeFlags::LEAF);
            ui.text("This text is rendered with DejaVu Sans Mono.");
            ui.text("The font has been loaded from the program binary.");
        }
        ui.dummy([0.0, 10.0]);

        ui.collapsing_header("Character debugger", TreeNodeFlags::LEAF);
        ui.text_disabled("Helps debugging incorrectly rendered characters.");
        if let Some(_node) = ui.tree_node("Static string literal") {
            encoding_table(ui, "##static", POLISH_GREETING);
        }
        if let Some(_node) = ui.tree_node("Dynamic text") {
            ui.input_text("Custom string", &mut self.custom_string).build();
            encoding_table(ui, "##dynamic", &self.custom_string);
        }
        ui.dummy([0.0, 10.0]);

        ui.collapsing_header("Loaded fonts", TreeNodeFlags::LEAF);
        match self.fonts.default_font() {
            Some(font) => ui.text(format!("Default font: {}", font.name)),
            None => ui.text("Default font: [None]"),
        }
        ui.same_line();
        ui.text_disabled(" (first font of the atlas)");
        for font in self.fonts.iter() {
            ui.bullet_text(format!(
                "{}, {}px, {} merged source(s)",
                font.name, font.size_pixels, font.merged_sources
            ));
        }
        if let Some(message) = &self.last_message {
            ui.text_disabled(format!("Last message: {message}"));
        }
        ui.dummy([0.0, 10.0]);

        ui.separator();
        ui.text("More");
        ui.text_wrapped("For more advanced font loading examples, please refer to : ");
        ui.text(FONTS_DOC_URL);
        ui.dummy([0.0, 10.0]);

        ui.dummy([0.0, 10.0]);
        ui.collapsing_header("Style editor", TreeNodeFlags::LEAF);
        ui.show_default_style_editor();
    }
}

impl App for FontShowcase {
    fn setup(&mut self, imgui: &mut Context, hidpi_factor: f64) -> ShowcaseResult<()> {
        self.fonts = self.catalog.load(imgui, hidpi_factor as f32)?;

        let text = self.fonts.require(TEXT_FONT)?;
        let icons = if self.settings.merge_icons {
            text
        } else {
            self.fonts.require(ICON_FONT)?
        };
        self.handles = Some(Handles {
            text,
            icons,
            embedded: self.fonts.require(EMBEDDED_FONT)?,
        });
        Ok(())
    }

    fn draw(&mut self, ui: &Ui) {
        let Some(handles) = self.handles else {
            return;
        };

        ui.window("Font Examples")
            .position([5.0, 5.0], Condition::Once)
            .size([600.0 - 10.0, 600.0 - 10.0], Condition::Once)
            .build(|| self.draw_contents(ui, handles));
    }

    fn window_resized(&mut self, width: u32, height: u32) {
        log::debug!("Showcase window resized to {}x{}", width, height);
    }

    fn got_message(&mut self, message: &str) {
        log::info!("Received message: {}", message);
        self.last_message = Some(message.to_owned());
    }
}
