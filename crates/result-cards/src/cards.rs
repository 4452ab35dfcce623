//! Result Cards

use crate::style::{level_color, level_emoji, recommendations, CategoryStyle};
use crate::CardError;
use app_config::{HdiCategory, Theme};
use inference_engine::PredictionResult;
use serde::Serialize;
use tracing::debug;

/// Number of probabilities shown on the happiness card
const TOP_PROBABILITIES: usize = 4;

/// Probability as a percentage with one decimal, e.g. `45.7%`
pub fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

fn escape(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

/// HDI regression result card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HdiCard {
    pub value: f64,
    pub category: HdiCategory,
    pub style: CategoryStyle,
    pub interpretation: Option<String>,
    pub recommendations: [&'static str; 3],
}

impl HdiCard {
    /// Build the card from a regression result
    pub fn from_result(result: &PredictionResult) -> Result<Self, CardError> {
        let category = result
            .hdi_category()
            .ok_or_else(|| CardError::NotHdi(result.category.clone()))?;
        Ok(Self {
            value: result.value,
            category,
            style: CategoryStyle::for_category(category),
            interpretation: result.interpretation.clone(),
            recommendations: recommendations(category),
        })
    }

    pub fn render_html(&self, theme: &Theme) -> String {
        let style = &self.style;
        let mut html = format!(
            r#"<div class="result-card hdi" style="background: linear-gradient(135deg, {bg} 0%, white 100%); border-left: 5px solid {color}; border-radius: 10px; padding: 25px; margin: 20px 0; color: {text};">
  <div style="display: flex; align-items: center; justify-content: space-between;">
    <div>
      <h2 style="color: {color}; margin: 0;">{icon} HDI Prediction Result</h2>
      <p style="font-size: 0.9em; margin-top: 5px;">Human Development Index Analysis</p>
    </div>
    <div style="text-align: right;">
      <h1 style="color: {color}; margin: 0; font-size: 3em;">{value:.3}</h1>
      <span class="badge" style="background: {color}; color: white; padding: 5px 15px; border-radius: 20px; font-weight: bold;">{category}</span>
    </div>
  </div>
</div>
"#,
            bg = style.background,
            color = style.color,
            text = theme.text,
            icon = style.icon,
            value = self.value,
            category = self.category,
        );

        if let Some(text) = &self.interpretation {
            html.push_str(&format!(
                "<div class=\"interpretation\">💡 <strong>Interpretation:</strong> {}</div>\n",
                escape(text)
            ));
        }

        html.push_str("<h3>📋 Development Recommendations</h3>\n<ul>\n");
        for rec in self.recommendations {
            html.push_str(&format!("  <li>{}</li>\n", escape(rec)));
        }
        html.push_str("</ul>\n");

        debug!("Rendered HDI card for {:.3} ({})", self.value, self.category);
        html
    }
}

/// Happiness classification result card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HappinessCard {
    pub level: i64,
    pub label: String,
    pub color: &'static str,
    pub emoji: &'static str,
    pub confidence: f64,
    pub interpretation: Option<String>,
    /// Highest class probabilities, descending
    pub top_probabilities: Vec<(String, f64)>,
}

impl HappinessCard {
    /// Build the card from a classification result
    pub fn from_result(result: &PredictionResult) -> Result<Self, CardError> {
        let confidence = result
            .confidence
            .ok_or(CardError::NotClassification("confidence"))?;
        let level = result.level();

        let mut top_probabilities: Vec<(String, f64)> = result
            .probabilities
            .iter()
            .flatten()
            .map(|(name, p)| (name.clone(), *p))
            .collect();
        top_probabilities.sort_by(|a, b| b.1.total_cmp(&a.1));
        top_probabilities.truncate(TOP_PROBABILITIES);

        Ok(Self {
            level,
            label: result.category.clone(),
            color: level_color(level),
            emoji: level_emoji(level),
            confidence,
            interpretation: result.interpretation.clone(),
            top_probabilities,
        })
    }

    pub fn render_html(&self, theme: &Theme) -> String {
        let mut html = format!(
            r#"<div class="result-card happiness" style="background: linear-gradient(135deg, {bg} 0%, white 100%); border-left: 5px solid {color}; border-radius: 10px; padding: 25px; margin: 20px 0; color: {text};">
  <div style="text-align: center;">
    <span style="font-size: 4em;">{emoji}</span>
    <h2 style="color: {color}; margin: 10px 0;">Happiness Level: {level}</h2>
    <span class="badge" style="background: {color}; color: white; padding: 8px 20px; border-radius: 20px; font-weight: bold; font-size: 1.2em;">{label}</span>
    <p style="margin-top: 15px; font-size: 1.1em;">Confidence: {confidence}</p>
  </div>
</div>
"#,
            bg = theme.card_background,
            color = self.color,
            text = theme.text,
            emoji = self.emoji,
            level = self.level,
            label = escape(&self.label),
            confidence = percent(self.confidence),
        );

        if let Some(text) = &self.interpretation {
            html.push_str(&format!(
                "<div class=\"interpretation\">💡 <strong>Analysis:</strong> {}</div>\n",
                escape(text)
            ));
        }

        if !self.top_probabilities.is_empty() {
            html.push_str("<h3>📊 Confidence Distribution</h3>\n<div class=\"metrics\">\n");
            for (name, p) in &self.top_probabilities {
                html.push_str(&format!(
                    "  <div class=\"metric\"><span class=\"label\">{}</span> <span class=\"value\">{}</span></div>\n",
                    escape(name),
                    percent(*p)
                ));
            }
            html.push_str("</div>\n");
        }

        debug!("Rendered happiness card for level {}", self.level);
        html
    }
}

/// Side-by-side view of the latest prediction of each model
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    pub hdi: Option<HdiCard>,
    pub happiness: Option<HappinessCard>,
}

impl Comparison {
    pub fn new(hdi: Option<HdiCard>, happiness: Option<HappinessCard>) -> Self {
        Self { hdi, happiness }
    }

    pub fn render_html(&self, theme: &Theme) -> String {
        let mut html = format!(
            "<h3>🔄 Prediction Comparison</h3>\n<div class=\"comparison\" style=\"display: flex; gap: 20px; background: {}; color: {};\">\n",
            theme.card_background, theme.text
        );

        html.push_str("  <div class=\"column\">\n    <h4>📈 HDI Prediction</h4>\n");
        match &self.hdi {
            Some(card) => {
                html.push_str(&format!(
                    "    <div class=\"metric\"><span class=\"label\">HDI Score</span> <span class=\"value\" style=\"color: {}\">{:.3}</span> <span class=\"delta\">{}</span></div>\n",
                    card.style.color, card.value, card.category
                ));
            }
            None => html.push_str("    <p class=\"info\">Run HDI prediction to see results</p>\n"),
        }
        html.push_str("  </div>\n");

        html.push_str("  <div class=\"column\">\n    <h4>😊 Happiness Prediction</h4>\n");
        match &self.happiness {
            Some(card) => {
                html.push_str(&format!(
                    "    <div class=\"metric\"><span class=\"label\">Happiness Level</span> <span class=\"value\" style=\"color: {}\">Level {}</span> <span class=\"delta\">{} confidence</span></div>\n",
                    card.color,
                    card.level,
                    percent(card.confidence)
                ));
            }
            None => {
                html.push_str("    <p class=\"info\">Run Happiness prediction to see results</p>\n")
            }
        }
        html.push_str("  </div>\n</div>\n");
        html
    }
}
