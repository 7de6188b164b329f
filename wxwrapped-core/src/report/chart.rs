//! Highcharts chart descriptions.
//!
//! Field names follow the Highcharts options object, so a [`Chart`]
//! serializes straight into what `Highcharts.chart(id, options)` expects.

use serde::Serialize;

use crate::aggregate::{bucket_key, BucketSeries, GROUP_CHATS_BUCKET, OTHER_BUCKET};
use crate::timeline::{ReferenceZone, Window};
use crate::types::Thread;
use crate::userdata::UserData;

/// A fixed list of colours, cycled when there are more series than entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub &'static [&'static str]);

impl Palette {
    pub fn color(&self, i: usize) -> &'static str {
        if self.0.is_empty() {
            return "#999999";
        }
        self.0[i % self.0.len()]
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().map(|c| c.to_string()).collect()
    }
}

/// ColorBrewer "Set1": nine colours that stay distinct side by side.
pub const CONTRASTY: Palette = Palette(&[
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf",
    "#999999",
]);

/// [`CONTRASTY`] at 60% opacity, for overlapping scatter points.
pub const CONTRASTY_TRANSLUCENT: Palette = Palette(&[
    "rgba(228, 26, 28, 0.6)",
    "rgba(55, 126, 184, 0.6)",
    "rgba(77, 175, 74, 0.6)",
    "rgba(152, 78, 163, 0.6)",
    "rgba(255, 127, 0, 0.6)",
    "rgba(255, 255, 51, 0.6)",
    "rgba(166, 86, 40, 0.6)",
    "rgba(247, 129, 191, 0.6)",
    "rgba(153, 153, 153, 0.6)",
]);

/// Day-of-year offsets of each month start in a non-leap year, plus year end.
const MONTH_TICKS: [u32; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Area,
    Scatter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(rename = "type")]
    pub kind: ChartType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Text {
    pub text: String,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTitle {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl AxisTitle {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            enabled: true,
            text: Some(text.into()),
        }
    }

    pub fn hidden() -> Self {
        Self {
            enabled: false,
            text: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub title: AxisTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickmark_placement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_positions: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Axis {
    pub fn titled(title: AxisTitle) -> Self {
        Self {
            title,
            categories: None,
            tickmark_placement: None,
            tick_positions: None,
            min: None,
            max: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub shared: bool,
    pub value_suffix: String,
}

/// Points of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    /// One value per x-axis category
    Counts(Vec<u64>),
    /// `[x, y]` pairs
    Points(Vec<(u32, f64)>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Counts(v) => v.len(),
            SeriesData::Points(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub name: String,
    pub data: SeriesData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A complete chart description.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub chart: ChartOptions,
    pub title: Text,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<Text>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_options: Option<serde_json::Value>,
    pub series: Vec<Series>,
}

/// Stacked area chart of messages sent per month, one series per bucket.
///
/// `series` should come from [`crate::aggregate::sent_by_bucket`] over
/// `windows`; its order (busiest bucket first) is kept.
pub fn sent_by_category_chart(series: &[BucketSeries], windows: &[Window], palette: Palette) -> Chart {
    let mut x_axis = Axis::titled(AxisTitle::hidden());
    x_axis.categories = Some(windows.iter().map(Window::label).collect());
    x_axis.tickmark_placement = Some("on".to_string());

    Chart {
        chart: ChartOptions {
            kind: ChartType::Area,
            zoom_type: None,
        },
        title: Text::new("Messages sent"),
        subtitle: Some(Text::new("per month, by category")),
        colors: palette.to_vec(),
        x_axis,
        y_axis: Axis::titled(AxisTitle::text("Messages sent")),
        tooltip: Some(Tooltip {
            shared: true,
            value_suffix: " messages".to_string(),
        }),
        plot_options: Some(serde_json::json!({
            "area": {
                "stacking": "normal",
                "lineWidth": 1,
            }
        })),
        series: series
            .iter()
            .map(|s| Series {
                name: s.key.clone(),
                data: SeriesData::Counts(s.counts.clone()),
                color: None,
            })
            .collect(),
    }
}

/// Every sent message as a dot: day of year against time of day.
///
/// One series per category (by display name), then group chats, then
/// everything else. Each thread lands in exactly one series.
pub fn sent_messages_scatter(
    threads: &[Thread],
    userdata: &UserData,
    window: &Window,
    zone: &ReferenceZone,
    palette: Palette,
    title: &str,
) -> Chart {
    let mut groups: Vec<(String, String)> = userdata
        .categories_as_list()
        .iter()
        .filter(|c| c.slug() != OTHER_BUCKET && c.slug() != GROUP_CHATS_BUCKET)
        .map(|c| (c.slug().to_string(), c.display_name().to_string()))
        .collect();
    groups.push((GROUP_CHATS_BUCKET.to_string(), "Group Chats".to_string()));
    groups.push((OTHER_BUCKET.to_string(), "Other".to_string()));

    let series = groups
        .into_iter()
        .enumerate()
        .map(|(i, (key, name))| {
            let points = threads
                .iter()
                .filter(|t| bucket_key(t) == key)
                .flat_map(|t| t.messages.iter())
                .filter(|m| m.sent && window.contains(m.timestamp))
                .map(|m| (zone.day_of_year(m.timestamp), zone.hour_of_day(m.timestamp)))
                .collect();
            Series {
                name,
                data: SeriesData::Points(points),
                color: Some(palette.color(i).to_string()),
            }
        })
        .collect();

    let mut x_axis = Axis::titled(AxisTitle::text("Day of Year"));
    x_axis.tick_positions = Some(MONTH_TICKS.to_vec());

    let mut y_axis = Axis::titled(AxisTitle::text(format!(
        "Hour of Day (UTC{:+})",
        zone.offset().local_minus_utc() / 3600
    )));
    y_axis.min = Some(0.0);
    y_axis.max = Some(24.0);
    y_axis.tick_positions = Some(vec![0, 4, 8, 12, 16, 20, 24]);

    Chart {
        chart: ChartOptions {
            kind: ChartType::Scatter,
            zoom_type: Some("xy".to_string()),
        },
        title: Text::new(title),
        subtitle: None,
        colors: Vec::new(),
        x_axis,
        y_axis,
        tooltip: None,
        plot_options: Some(serde_json::json!({
            "scatter": {
                "marker": { "radius": 3 }
            }
        })),
        series,
    }
}
