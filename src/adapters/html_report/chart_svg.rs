//! Inline SVG line chart of the asset value trajectories.

use chrono::NaiveDate;

use crate::domain::dates::format_date;

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

pub struct Series<'a> {
    pub label: &'a str,
    pub color: &'a str,
    pub values: &'a [f64],
}

/// Draws every series on a shared y axis. Points are spaced by interval index,
/// so a shorter series simply stops early.
pub fn value_chart_svg(series: &[Series<'_>], date_labels: &[NaiveDate]) -> String {
    let points = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    if points == 0 {
        return String::new();
    }

    let (min_value, max_value) = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let range = (max_value - min_value).max(1.0);

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let x_scale =
        |i: usize| -> f64 { MARGIN_LEFT + (i as f64 / (points - 1).max(1) as f64) * plot_width };
    let y_scale =
        |v: f64| -> f64 { MARGIN_TOP + plot_height - ((v - min_value) / range) * plot_height };

    let mut svg = format!(
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    );
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    svg.push_str(&format!(
        "  <line x1=\"{l}\" y1=\"{t}\" x2=\"{l}\" y2=\"{b}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{l}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        l = MARGIN_LEFT,
        b = CHART_HEIGHT - MARGIN_BOTTOM,
        r = CHART_WIDTH - MARGIN_RIGHT
    ));

    for (y, value) in [
        (MARGIN_TOP + 5.0, max_value),
        (CHART_HEIGHT - MARGIN_BOTTOM - 5.0, min_value),
    ] {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{:.2}</text>\n",
            MARGIN_LEFT - 5.0,
            y,
            value
        ));
    }

    if let (Some(first), Some(last)) = (date_labels.first(), date_labels.last()) {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"start\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            MARGIN_LEFT,
            CHART_HEIGHT - 10.0,
            format_date(*first)
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            CHART_WIDTH - MARGIN_RIGHT,
            CHART_HEIGHT - 10.0,
            format_date(*last)
        ));
    }

    for (n, s) in series.iter().enumerate() {
        if s.values.is_empty() {
            continue;
        }
        let coords: Vec<String> = s
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:.1},{:.1}", x_scale(i), y_scale(*v)))
            .collect();
        svg.push_str(&format!(
            "  <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            coords.join(" "),
            s.color
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" fill=\"{}\">{}</text>\n",
            MARGIN_LEFT + 10.0 + n as f64 * 150.0,
            MARGIN_TOP - 10.0,
            s.color,
            s.label
        ));
    }

    svg.push_str("</svg>");
    svg
}
