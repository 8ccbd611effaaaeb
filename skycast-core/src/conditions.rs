//! Display mapping for WMO weather codes.

/// A WMO weather code with its display description and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub code: i32,
    pub description: &'static str,
    pub icon: &'static str,
}

static CONDITIONS: [Condition; 28] = [
    Condition { code: 0, description: "Clear sky", icon: "☀️" },
    Condition { code: 1, description: "Mainly clear", icon: "🌤️" },
    Condition { code: 2, description: "Partly cloudy", icon: "⛅" },
    Condition { code: 3, description: "Overcast", icon: "☁️" },
    Condition { code: 45, description: "Fog", icon: "🌫️" },
    Condition { code: 48, description: "Depositing rime fog", icon: "🌫️" },
    Condition { code: 51, description: "Light drizzle", icon: "🌦️" },
    Condition { code: 53, description: "Moderate drizzle", icon: "🌦️" },
    Condition { code: 55, description: "Dense drizzle", icon: "🌧️" },
    Condition { code: 56, description: "Light freezing drizzle", icon: "🌨️" },
    Condition { code: 57, description: "Dense freezing drizzle", icon: "🌨️" },
    Condition { code: 61, description: "Slight rain", icon: "🌦️" },
    Condition { code: 63, description: "Moderate rain", icon: "🌧️" },
    Condition { code: 65, description: "Heavy rain", icon: "🌧️" },
    Condition { code: 66, description: "Light freezing rain", icon: "🌨️" },
    Condition { code: 67, description: "Heavy freezing rain", icon: "🌨️" },
    Condition { code: 71, description: "Slight snow fall", icon: "🌨️" },
    Condition { code: 73, description: "Moderate snow fall", icon: "❄️" },
    Condition { code: 75, description: "Heavy snow fall", icon: "❄️" },
    Condition { code: 77, description: "Snow grains", icon: "🌨️" },
    Condition { code: 80, description: "Slight rain showers", icon: "🌦️" },
    Condition { code: 81, description: "Moderate rain showers", icon: "🌧️" },
    Condition { code: 82, description: "Violent rain showers", icon: "⛈️" },
    Condition { code: 85, description: "Slight snow showers", icon: "🌨️" },
    Condition { code: 86, description: "Heavy snow showers", icon: "❄️" },
    Condition { code: 95, description: "Thunderstorm", icon: "⛈️" },
    Condition { code: 96, description: "Thunderstorm with hail", icon: "⛈️" },
    Condition { code: 99, description: "Thunderstorm with heavy hail", icon: "⛈️" },
];

/// Look up the display entry for a WMO weather code.
///
/// Unknown codes fall back to code 0 ("Clear sky"). Never fails.
pub fn describe(code: i32) -> &'static Condition {
    CONDITIONS
        .iter()
        .find(|condition| condition.code == code)
        .unwrap_or(&CONDITIONS[0])
}
