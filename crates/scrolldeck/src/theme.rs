use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub panel_background: Color32,
    pub particle: Color32,
    pub title_size: f32,
    pub body_size: f32,
    pub notes_size: f32,
    pub chrome_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x05, 0x06, 0x0C),
            foreground: Color32::from_rgb(0xC9, 0xCE, 0xDF),
            heading_color: Color32::from_rgb(0xEC, 0xEF, 0xF8),
            muted: Color32::from_rgb(0x7A, 0x80, 0x99),
            accent: Color32::from_rgb(0x6C, 0x8C, 0xFF),
            panel_background: Color32::from_rgb(0x10, 0x13, 0x25),
            particle: Color32::WHITE,
            title_size: 64.0,
            body_size: 28.0,
            notes_size: 20.0,
            chrome_size: 14.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(0xF7, 0xF8, 0xFC),
            foreground: Color32::from_rgb(0x2A, 0x2E, 0x3E),
            heading_color: Color32::from_rgb(0x16, 0x1B, 0x2E),
            muted: Color32::from_rgb(0x8A, 0x8F, 0xA3),
            accent: Color32::from_rgb(0x3D, 0x5C, 0xCC),
            panel_background: Color32::WHITE,
            particle: Color32::from_rgb(0x10, 0x13, 0x25),
            title_size: 64.0,
            body_size: 28.0,
            notes_size: 20.0,
            chrome_size: 14.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }
}
