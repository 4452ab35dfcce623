//! Chart Specs
//!
//! Figures are emitted as Plotly-compatible JSON (`{"data": [...], "layout": {...}}`)
//! so any Plotly front end can render them unchanged.

use crate::style::CategoryStyle;
use analytics::{CategoryCount, CorrelationMatrix, FeatureCorrelation, Histogram, TrendlineScatter};
use app_config::{HdiCategory, HdiThresholds, Theme};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// HDI the gauge delta is measured against
pub const GAUGE_REFERENCE: f64 = 0.7;

const TRANSPARENT: &str = "rgba(0,0,0,0)";

fn region_fill(category: HdiCategory) -> &'static str {
    match category {
        HdiCategory::Low => "red",
        HdiCategory::Medium => "orange",
        HdiCategory::High => "lightgreen",
        HdiCategory::VeryHigh => "green",
    }
}

/// Gauge for a predicted HDI with one colored step per band
pub fn hdi_gauge(value: f64, category: HdiCategory, thresholds: &HdiThresholds) -> Value {
    let steps: Vec<Value> = HdiCategory::ALL
        .iter()
        .map(|&c| {
            let (lo, hi) = thresholds.bounds(c);
            json!({"range": [lo, hi], "color": CategoryStyle::for_category(c).step_color})
        })
        .collect();

    json!({
        "data": [{
            "type": "indicator",
            "mode": "gauge+number+delta",
            "value": value,
            "domain": {"x": [0, 1], "y": [0, 1]},
            "title": {"text": "HDI Score", "font": {"size": 24}},
            "delta": {"reference": GAUGE_REFERENCE, "increasing": {"color": "green"}},
            "gauge": {
                "axis": {"range": [0, 1], "tickwidth": 1, "tickcolor": "darkblue"},
                "bar": {"color": CategoryStyle::for_category(category).color},
                "bgcolor": "white",
                "borderwidth": 2,
                "bordercolor": "gray",
                "steps": steps,
                "threshold": {
                    "line": {"color": "red", "width": 4},
                    "thickness": 0.75,
                    "value": value
                }
            }
        }],
        "layout": {
            "paper_bgcolor": TRANSPARENT,
            "font": {"color": "darkblue", "family": "Arial"},
            "height": 300
        }
    })
}

/// Bar chart of class probabilities with the most likely level highlighted
pub fn happiness_probability_chart(
    probabilities: &BTreeMap<String, f64>,
    theme: &Theme,
) -> Value {
    let max = probabilities
        .values()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let levels: Vec<&str> = probabilities.keys().map(String::as_str).collect();
    let probs: Vec<f64> = probabilities.values().copied().collect();
    let colors: Vec<&str> = probs
        .iter()
        .map(|p| {
            if *p == max {
                theme.primary.as_str()
            } else {
                theme.muted.as_str()
            }
        })
        .collect();
    let text: Vec<String> = probs.iter().map(|p| crate::percent(*p)).collect();

    json!({
        "data": [{
            "type": "bar",
            "x": levels,
            "y": probs,
            "marker": {"color": colors},
            "text": text,
            "textposition": "auto"
        }],
        "layout": {
            "title": {"text": "Prediction Confidence by Level"},
            "xaxis": {"title": {"text": "Happiness Level"}},
            "yaxis": {"title": {"text": "Probability"}, "range": [0, 1]},
            "paper_bgcolor": TRANSPARENT,
            "plot_bgcolor": TRANSPARENT,
            "height": 350
        }
    })
}

/// Pre-binned HDI histogram with shaded category regions
pub fn hdi_histogram(histogram: &Histogram, thresholds: &HdiThresholds, theme: &Theme) -> Value {
    let centers: Vec<f64> = histogram
        .edges
        .windows(2)
        .map(|w| (w[0] + w[1]) / 2.0)
        .collect();
    let widths: Vec<f64> = histogram.edges.windows(2).map(|w| w[1] - w[0]).collect();

    let shapes: Vec<Value> = HdiCategory::ALL
        .iter()
        .map(|&c| {
            let (lo, hi) = thresholds.bounds(c);
            json!({
                "type": "rect",
                "xref": "x",
                "yref": "paper",
                "x0": lo,
                "x1": hi,
                "y0": 0,
                "y1": 1,
                "fillcolor": region_fill(c),
                "opacity": 0.1,
                "line": {"width": 0}
            })
        })
        .collect();
    let annotations: Vec<Value> = HdiCategory::ALL
        .iter()
        .map(|&c| {
            let (lo, _) = thresholds.bounds(c);
            json!({
                "x": lo,
                "y": 1,
                "xref": "x",
                "yref": "paper",
                "text": c.as_str(),
                "showarrow": false,
                "xanchor": "left"
            })
        })
        .collect();

    json!({
        "data": [{
            "type": "bar",
            "name": "Distribution",
            "x": centers,
            "y": histogram.counts,
            "width": widths,
            "marker": {"color": theme.primary},
            "opacity": 0.7
        }],
        "layout": {
            "title": {"text": "HDI Distribution by Category"},
            "xaxis": {"title": {"text": "HDI Index"}},
            "yaxis": {"title": {"text": "Count"}},
            "shapes": shapes,
            "annotations": annotations,
            "height": 400,
            "showlegend": false
        }
    })
}

/// Annotated correlation heatmap
pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Value {
    let text: Vec<Vec<String>> = matrix
        .values
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| v.map(|r| format!("{r:.2}")).unwrap_or_default())
                .collect()
        })
        .collect();

    json!({
        "data": [{
            "type": "heatmap",
            "x": matrix.columns,
            "y": matrix.columns,
            "z": matrix.values,
            "text": text,
            "texttemplate": "%{text}",
            "colorscale": "RdBu",
            "reversescale": true,
            "zmin": -1,
            "zmax": 1
        }],
        "layout": {
            "title": {"text": "Feature Correlation Matrix"},
            "height": 500
        }
    })
}

/// Horizontal bar chart of the features most correlated with HDI
pub fn top_correlations_chart(correlations: &[FeatureCorrelation], theme: &Theme) -> Value {
    let features: Vec<&str> = correlations.iter().map(|c| c.feature.as_str()).collect();
    let values: Vec<f64> = correlations.iter().map(|c| c.correlation).collect();

    json!({
        "data": [{
            "type": "bar",
            "orientation": "h",
            "x": values,
            "y": features,
            "marker": {"color": theme.primary}
        }],
        "layout": {
            "title": {"text": format!("Top {} Features Correlated with HDI", correlations.len())},
            "xaxis": {"title": {"text": "Absolute Correlation"}},
            "yaxis": {"title": {"text": "Feature"}, "categoryorder": "total ascending"},
            "height": 400
        }
    })
}

/// Pie of dataset records per HDI category
pub fn hdi_category_pie(counts: &[CategoryCount]) -> Value {
    let labels: Vec<&str> = counts.iter().map(|c| c.category.as_str()).collect();
    let values: Vec<usize> = counts.iter().map(|c| c.count).collect();
    let colors: Vec<&str> = counts
        .iter()
        .map(|c| CategoryStyle::for_category(c.category).color)
        .collect();

    json!({
        "data": [{
            "type": "pie",
            "labels": labels,
            "values": values,
            "marker": {"colors": colors}
        }],
        "layout": {
            "title": {"text": "Distribution by HDI Category"},
            "height": 350
        }
    })
}

/// GDP against HDI with the fitted trendline
pub fn gdp_vs_hdi_scatter(scatter: &TrendlineScatter, theme: &Theme) -> Value {
    let x_min = scatter.x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = scatter.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    json!({
        "data": [
            {
                "type": "scatter",
                "mode": "markers",
                "name": "Countries",
                "x": scatter.x,
                "y": scatter.y,
                "marker": {"color": theme.primary}
            },
            {
                "type": "scatter",
                "mode": "lines",
                "name": format!("OLS (R² = {:.3})", scatter.fit.r_squared),
                "x": [x_min, x_max],
                "y": [scatter.fit.at(x_min), scatter.fit.at(x_max)],
                "line": {"color": theme.primary}
            }
        ],
        "layout": {
            "title": {"text": "GDP per Capita vs HDI Index"},
            "xaxis": {"title": {"text": "GDP per Capita (USD)"}},
            "yaxis": {"title": {"text": "HDI Index"}},
            "height": 400
        }
    })
}
