//! Category and Level Styling

use app_config::HdiCategory;
use serde::Serialize;

/// Fallback color for unknown levels
const DEFAULT_COLOR: &str = "#1f77b4";

/// Visual style of an HDI band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStyle {
    /// Accent color
    pub color: &'static str,
    /// Heading icon
    pub icon: &'static str,
    /// Card background tint
    pub background: &'static str,
    /// Gauge step color
    pub step_color: &'static str,
}

impl CategoryStyle {
    pub fn for_category(category: HdiCategory) -> Self {
        match category {
            HdiCategory::VeryHigh => Self {
                color: "#2E7D32",
                icon: "🏆",
                background: "#E8F5E9",
                step_color: "#A5D6A7",
            },
            HdiCategory::High => Self {
                color: "#689F38",
                icon: "🌟",
                background: "#F1F8E9",
                step_color: "#C8E6C9",
            },
            HdiCategory::Medium => Self {
                color: "#FFA000",
                icon: "📊",
                background: "#FFF8E1",
                step_color: "#FFE0B2",
            },
            HdiCategory::Low => Self {
                color: "#D32F2F",
                icon: "📉",
                background: "#FFEBEE",
                step_color: "#FFCDD2",
            },
        }
    }
}

/// Development recommendations for an HDI band
pub fn recommendations(category: HdiCategory) -> [&'static str; 3] {
    match category {
        HdiCategory::VeryHigh => [
            "✅ Maintain current development strategies",
            "✅ Focus on sustainability and innovation",
            "✅ Consider supporting less developed nations",
        ],
        HdiCategory::High => [
            "📈 Continue investments in education and healthcare",
            "📈 Strengthen social safety nets",
            "📈 Promote economic diversification",
        ],
        HdiCategory::Medium => [
            "🎯 Prioritize education accessibility",
            "🎯 Improve healthcare infrastructure",
            "🎯 Create stable economic policies",
        ],
        HdiCategory::Low => [
            "⚠️ Focus on basic education and literacy",
            "⚠️ Improve access to clean water and healthcare",
            "⚠️ Develop stable governance and reduce conflict",
        ],
    }
}

/// Accent color of a happiness level, red through green
pub fn level_color(level: i64) -> &'static str {
    match level {
        1 => "#D32F2F",
        2 => "#F44336",
        3 => "#FF5722",
        4 => "#FF9800",
        5 => "#FFC107",
        6 => "#8BC34A",
        7 => "#4CAF50",
        8 => "#2E7D32",
        _ => DEFAULT_COLOR,
    }
}

/// Emoji of a happiness level
pub fn level_emoji(level: i64) -> &'static str {
    match level {
        1 => "😢",
        2 => "😔",
        3 => "😕",
        4 => "😐",
        5 => "🙂",
        6 => "😊",
        7 => "😄",
        8 => "🤗",
        _ => "📊",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_are_distinct() {
        let colors: Vec<_> = HdiCategory::ALL
            .iter()
            .map(|c| CategoryStyle::for_category(*c).color)
            .collect();
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn test_three_recommendations_each() {
        for category in HdiCategory::ALL {
            assert!(recommendations(category).iter().all(|r| !r.is_empty()));
        }
        assert!(recommendations(HdiCategory::Low)[0].contains("literacy"));
    }

    #[test]
    fn test_unknown_level_fallbacks() {
        assert_eq!(level_color(8), "#2E7D32");
        assert_eq!(level_color(0), DEFAULT_COLOR);
        assert_eq!(level_emoji(1), "😢");
        assert_eq!(level_emoji(9), "📊");
    }
}
