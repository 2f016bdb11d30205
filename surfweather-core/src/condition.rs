//! WMO weather-code mapping for display.
//!
//! See <https://open-meteo.com/en/docs#weathervariables> for the code table.

/// Weather condition categories mapped from WMO codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherCondition {
    #[default]
    Clear,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    RainShowers,
    SnowShowers,
    Thunderstorm,
}

impl WeatherCondition {
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51 | 53 | 55 | 56 | 57 => Self::Drizzle,
            61 | 63 | 66 => Self::Rain,
            65 | 67 => Self::HeavyRain,
            71 | 73 | 75 | 77 => Self::Snow,
            80 | 81 | 82 => Self::RainShowers,
            85 | 86 => Self::SnowShowers,
            95 | 96 | 99 => Self::Thunderstorm,
            // Unknown codes render as plain cloud cover.
            _ => Self::Overcast,
        }
    }

    /// German label, matching the rest of the user-facing surface.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Klar",
            Self::MainlyClear => "Überwiegend klar",
            Self::PartlyCloudy => "Teilweise bewölkt",
            Self::Overcast => "Bedeckt",
            Self::Fog => "Nebel",
            Self::Drizzle => "Nieselregen",
            Self::Rain => "Regen",
            Self::HeavyRain => "Starker Regen",
            Self::Snow => "Schneefall",
            Self::RainShowers => "Regenschauer",
            Self::SnowShowers => "Schneeschauer",
            Self::Thunderstorm => "Gewitter",
        }
    }

    /// Single glyph for the terminal strips.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::MainlyClear => "🌤",
            Self::PartlyCloudy => "⛅",
            Self::Overcast => "☁",
            Self::Fog => "🌫",
            Self::Drizzle => "🌦",
            Self::Rain | Self::HeavyRain | Self::RainShowers => "🌧",
            Self::Snow | Self::SnowShowers => "❄",
            Self::Thunderstorm => "⛈",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_sky() {
        assert_eq!(WeatherCondition::from_wmo_code(0), WeatherCondition::Clear);
    }

    #[test]
    fn cloud_cover_codes() {
        assert_eq!(
            WeatherCondition::from_wmo_code(1),
            WeatherCondition::MainlyClear
        );
        assert_eq!(
            WeatherCondition::from_wmo_code(2),
            WeatherCondition::PartlyCloudy
        );
        assert_eq!(
            WeatherCondition::from_wmo_code(3),
            WeatherCondition::Overcast
        );
    }

    #[test]
    fn rain_codes() {
        assert_eq!(WeatherCondition::from_wmo_code(61), WeatherCondition::Rain);
        assert_eq!(
            WeatherCondition::from_wmo_code(65),
            WeatherCondition::HeavyRain
        );
        assert_eq!(
            WeatherCondition::from_wmo_code(80),
            WeatherCondition::RainShowers
        );
    }

    #[test]
    fn snow_codes() {
        assert_eq!(WeatherCondition::from_wmo_code(71), WeatherCondition::Snow);
        assert_eq!(
            WeatherCondition::from_wmo_code(85),
            WeatherCondition::SnowShowers
        );
    }

    #[test]
    fn thunderstorm_codes() {
        for code in [95, 96, 99] {
            assert_eq!(
                WeatherCondition::from_wmo_code(code),
                WeatherCondition::Thunderstorm
            );
        }
    }

    #[test]
    fn unknown_codes_fall_back_to_overcast() {
        assert_eq!(
            WeatherCondition::from_wmo_code(42),
            WeatherCondition::Overcast
        );
        assert_eq!(
            WeatherCondition::from_wmo_code(-1),
            WeatherCondition::Overcast
        );
    }

    #[test]
    fn labels_are_german() {
        assert_eq!(WeatherCondition::Clear.label(), "Klar");
        assert_eq!(WeatherCondition::Thunderstorm.label(), "Gewitter");
    }
}
