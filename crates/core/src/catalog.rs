//! Fixed style catalogs.
//!
//! Fonts, color palettes, quote placements and aspect ratios are closed
//! enumerations so that an invalid selection cannot be represented. Each
//! catalog's first entry is its default.

use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Font {
    #[default]
    Montserrat,
    Playfair,
    Oswald,
    Lato,
    Raleway,
    Merriweather,
    Pacifico,
    Caveat,
    Lobster,
    Roboto,
}

impl Font {
    pub const ALL: [Font; 10] = [
        Font::Montserrat,
        Font::Playfair,
        Font::Oswald,
        Font::Lato,
        Font::Raleway,
        Font::Merriweather,
        Font::Pacifico,
        Font::Caveat,
        Font::Lobster,
        Font::Roboto,
    ];

    /// Short label shown on the selector button.
    pub fn name(self) -> &'static str {
        match self {
            Font::Playfair => "Playfair",
            other => other.family(),
        }
    }

    /// Font family name passed to the backend.
    pub fn family(self) -> &'static str {
        match self {
            Font::Montserrat => "Montserrat",
            Font::Playfair => "Playfair Display",
            Font::Oswald => "Oswald",
            Font::Lato => "Lato",
            Font::Raleway => "Raleway",
            Font::Merriweather => "Merriweather",
            Font::Pacifico => "Pacifico",
            Font::Caveat => "Caveat",
            Font::Lobster => "Lobster",
            Font::Roboto => "Roboto",
        }
    }

    /// Case-insensitive lookup by label or family name.
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim();
        Self::ALL.into_iter().find(|font| {
            font.name().eq_ignore_ascii_case(needle) || font.family().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorPalette {
    #[default]
    AlpineSnow,
    GoldenHour,
    SunsetGlow,
    ForestCanopy,
    OceanDeep,
    EarthyClay,
    MistyMorning,
    Wildflower,
    ClassicBlack,
    VibrantAqua,
}

impl ColorPalette {
    pub const ALL: [ColorPalette; 10] = [
        ColorPalette::AlpineSnow,
        ColorPalette::GoldenHour,
        ColorPalette::SunsetGlow,
        ColorPalette::ForestCanopy,
        ColorPalette::OceanDeep,
        ColorPalette::EarthyClay,
        ColorPalette::MistyMorning,
        ColorPalette::Wildflower,
        ColorPalette::ClassicBlack,
        ColorPalette::VibrantAqua,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorPalette::AlpineSnow => "Alpine Snow",
            ColorPalette::GoldenHour => "Golden Hour",
            ColorPalette::SunsetGlow => "Sunset Glow",
            ColorPalette::ForestCanopy => "Forest Canopy",
            ColorPalette::OceanDeep => "Ocean Deep",
            ColorPalette::EarthyClay => "Earthy Clay",
            ColorPalette::MistyMorning => "Misty Morning",
            ColorPalette::Wildflower => "Wildflower",
            ColorPalette::ClassicBlack => "Classic Black",
            ColorPalette::VibrantAqua => "Vibrant Aqua",
        }
    }

    /// Hex color code the quote text must use.
    pub fn text_color(self) -> &'static str {
        match self {
            ColorPalette::AlpineSnow => "#FFFFFF",
            ColorPalette::GoldenHour => "#FFD700",
            ColorPalette::SunsetGlow => "#FF8C00",
            ColorPalette::ForestCanopy => "#228B22",
            ColorPalette::OceanDeep => "#00008B",
            ColorPalette::EarthyClay => "#A0522D",
            ColorPalette::MistyMorning => "#B0C4DE",
            ColorPalette::Wildflower => "#DA70D6",
            ColorPalette::ClassicBlack => "#000000",
            ColorPalette::VibrantAqua => "#00FFFF",
        }
    }

    /// RGB of the selector swatch.
    pub fn swatch(self) -> [u8; 3] {
        match self {
            ColorPalette::AlpineSnow => [255, 255, 255],
            ColorPalette::GoldenHour => [250, 204, 21],
            ColorPalette::SunsetGlow => [249, 115, 22],
            ColorPalette::ForestCanopy => [21, 128, 61],
            ColorPalette::OceanDeep => [30, 64, 175],
            ColorPalette::EarthyClay => [133, 77, 14],
            ColorPalette::MistyMorning => [148, 163, 184],
            ColorPalette::Wildflower => [218, 112, 214],
            ColorPalette::ClassicBlack => [0, 0, 0],
            ColorPalette::VibrantAqua => [34, 211, 238],
        }
    }

    /// Shadow or outline description applied to the quote text.
    pub fn shadow(self) -> &'static str {
        match self {
            ColorPalette::AlpineSnow => "a subtle black shadow",
            ColorPalette::GoldenHour => "a soft dark brown shadow",
            ColorPalette::SunsetGlow => "a deep purple shadow",
            ColorPalette::ForestCanopy => "a light mossy green glow",
            ColorPalette::OceanDeep => "a bright white outline",
            ColorPalette::EarthyClay => "a soft cream outline",
            ColorPalette::MistyMorning => "a dark grey shadow",
            ColorPalette::Wildflower => "a crisp white shadow",
            ColorPalette::ClassicBlack => "a subtle white shadow",
            ColorPalette::VibrantAqua => "a deep blue shadow",
        }
    }

    /// Case-insensitive lookup by name or hex code.
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim();
        Self::ALL.into_iter().find(|palette| {
            palette.name().eq_ignore_ascii_case(needle)
                || palette.text_color().eq_ignore_ascii_case(needle)
                || palette.name().replace(' ', "-").eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for ColorPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Zone of the image the quote is rendered in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QuotePlacement {
    #[default]
    Top,
    Center,
    Bottom,
}

impl QuotePlacement {
    pub const ALL: [QuotePlacement; 3] = [
        QuotePlacement::Top,
        QuotePlacement::Center,
        QuotePlacement::Bottom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QuotePlacement::Top => "Top",
            QuotePlacement::Center => "Center",
            QuotePlacement::Bottom => "Bottom",
        }
    }

    /// Value used inside the prompt.
    pub fn value(self) -> &'static str {
        match self {
            QuotePlacement::Top => "top",
            QuotePlacement::Center => "center",
            QuotePlacement::Bottom => "bottom",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim();
        Self::ALL
            .into_iter()
            .find(|placement| placement.value().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for QuotePlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Aspect ratios accepted by the image generation model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    #[default]
    Square,
    Landscape,
    Story,
    Classic,
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Story,
        AspectRatio::Classic,
        AspectRatio::Portrait,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AspectRatio::Square => "Square (1:1)",
            AspectRatio::Landscape => "Landscape (16:9)",
            AspectRatio::Story => "Story (9:16)",
            AspectRatio::Classic => "Classic (4:3)",
            AspectRatio::Portrait => "Portrait (3:4)",
        }
    }

    /// Wire value sent to the backend.
    pub fn value(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Story => "9:16",
            AspectRatio::Classic => "4:3",
            AspectRatio::Portrait => "3:4",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim();
        Self::ALL.into_iter().find(|ratio| ratio.value() == needle)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// The quote styling currently chosen by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StyleSelection {
    pub font: Font,
    pub palette: ColorPalette,
    pub placement: QuotePlacement,
}
