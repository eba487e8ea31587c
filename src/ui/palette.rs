use crossterm::style::Color;
use once_cell::sync::OnceCell;

#[derive(Copy, Clone, Debug)]
pub enum PaletteKind {
    Light,
    Dark,
}

pub struct Palette {
    pub info: Color,
    pub success: Color,
    pub error: Color,
    pub rule: Color,
    pub index: Color,
    pub prompt: Color,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            info: Color::Blue,
            success: Color::DarkGreen,
            error: Color::DarkRed,
            rule: Color::DarkGrey,
            index: Color::DarkCyan,
            prompt: Color::Black,
        }
    }

    pub fn dark() -> Self {
        Self {
            info: Color::Cyan,
            success: Color::Green,
            error: Color::Red,
            rule: Color::DarkGrey,
            index: Color::Yellow,
            prompt: Color::White,
        }
    }
}

impl From<PaletteKind> for Palette {
    fn from(kind: PaletteKind) -> Self {
        match kind {
            PaletteKind::Light => Self::light(),
            PaletteKind::Dark => Self::dark(),
        }
    }
}

static PALETTE: OnceCell<Palette> = OnceCell::new();

pub fn configure_palette(kind: PaletteKind) {
    let _ = PALETTE.set(Palette::from(kind));
}

pub fn get_palette() -> &'static Palette {
    PALETTE.get_or_init(Palette::dark)
}

pub fn detect_palette_kind_from_env() -> PaletteKind {
    // COLORFGBG looks like "15;0" (fg;bg) or "default;8"
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').last().and_then(|s| s.parse::<u8>().ok()) {
            // 0-7 are the dark backgrounds
            return if bg >= 8 {
                PaletteKind::Light
            } else {
                PaletteKind::Dark
            };
        }
    }

    PaletteKind::Dark
}
