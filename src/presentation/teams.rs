// Team colors and short display names

use egui::Color32;

pub const DEFAULT_TEAM_COLOR: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);

struct TeamStyle {
    name: &'static str,
    color: Color32,
    short_name: &'static str,
}

// Names as published by the timing providers, including the Ergast constructor spellings
static TEAM_STYLES: [TeamStyle; 16] = [
    TeamStyle {
        name: "Red Bull Racing",
        color: Color32::from_rgb(0x36, 0x71, 0xC6),
        short_name: "Red Bull",
    },
    TeamStyle {
        name: "Red Bull",
        color: Color32::from_rgb(0x36, 0x71, 0xC6),
        short_name: "Red Bull",
    },
    TeamStyle {
        name: "Ferrari",
        color: Color32::from_rgb(0xE8, 0x00, 0x2D),
        short_name: "Ferrari",
    },
    TeamStyle {
        name: "Mercedes",
        color: Color32::from_rgb(0x00, 0xD2, 0xBE),
        short_name: "Mercedes",
    },
    TeamStyle {
        name: "McLaren",
        color: Color32::from_rgb(0xFF, 0x80, 0x00),
        short_name: "McLaren",
    },
    TeamStyle {
        name: "Aston Martin",
        color: Color32::from_rgb(0x00, 0x6F, 0x62),
        short_name: "Aston Martin",
    },
    TeamStyle {
        name: "Kick Sauber",
        color: Color32::from_rgb(0x00, 0xE7, 0x01),
        short_name: "Sauber",
    },
    TeamStyle {
        name: "Sauber",
        color: Color32::from_rgb(0x00, 0xE7, 0x01),
        short_name: "Sauber",
    },
    TeamStyle {
        name: "Haas F1 Team",
        color: Color32::from_rgb(0xB6, 0xBA, 0xBD),
        short_name: "Haas",
    },
    TeamStyle {
        name: "RB",
        color: Color32::from_rgb(0x66, 0x92, 0xFF),
        short_name: "VCARB",
    },
    TeamStyle {
        name: "RB F1 Team",
        color: Color32::from_rgb(0x66, 0x92, 0xFF),
        short_name: "VCARB",
    },
    TeamStyle {
        name: "Williams",
        color: Color32::from_rgb(0x00, 0xAE, 0xEF),
        short_name: "Williams",
    },
    TeamStyle {
        name: "Alpine",
        color: Color32::from_rgb(0x00, 0x90, 0xFF),
        short_name: "Alpine",
    },
    TeamStyle {
        name: "Alpine F1 Team",
        color: Color32::from_rgb(0x00, 0x90, 0xFF),
        short_name: "Alpine",
    },
    TeamStyle {
        name: "Mercedes-AMG Petronas F1 Team",
        color: Color32::from_rgb(0x00, 0xD2, 0xBE),
        short_name: "Mercedes",
    },
    TeamStyle {
        name: "Scuderia Ferrari",
        color: Color32::from_rgb(0xE8, 0x00, 0x2D),
        short_name: "Ferrari",
    },
];

fn style_for(team_name: &str) -> Option<&'static TeamStyle> {
    TEAM_STYLES.iter().find(|s| s.name == team_name)
}

/// Bar color for a team, neutral grey when the team is not in the palette
pub fn team_color(team_name: &str) -> Color32 {
    style_for(team_name)
        .map(|s| s.color)
        .unwrap_or(DEFAULT_TEAM_COLOR)
}

/// Shorter team name for the results table, unknown teams keep their name
pub fn team_display_name(team_name: &str) -> &str {
    style_for(team_name)
        .map(|s| s.short_name)
        .unwrap_or(team_name)
}

/// `#RRGGBB` form of an opaque color
pub fn hex_color(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}
