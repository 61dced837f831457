use imgui_font_showcase::{settings::Settings, FontShowcase, System};
use simple_logger::SimpleLogger;
use std::{error::Error, path::PathBuf};

fn main() -> Result<(), Box<dyn Error>> {
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(settings_path.as_deref())?;

    SimpleLogger::new().with_level(settings.log_level).init()?;
    log::debug!("Settings: {:?}", settings);

    let system = System::new(&settings.window)?;
    system
        .message_proxy()
        .send_event(format!("Fonts are read from {}", settings.data_dir.display()))?;
    let app = FontShowcase::new(&settings.data_dir, settings.fonts.clone());
    system.run(app)?;

    Ok(())
}
