//! HTML rendering for charts and tables.

use super::chart::Chart;
use super::table::Table;

const HIGHCHARTS_SRC: &str = "https://code.highcharts.com/highcharts.js";

/// Something that renders to an HTML fragment.
pub trait Render {
    fn render(&self) -> String;
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A chart in its own container, drawn by Highcharts on load.
pub struct HighchartRenderer<'a> {
    pub container_id: String,
    pub chart: &'a Chart,
}

impl<'a> HighchartRenderer<'a> {
    pub fn new(container_id: impl Into<String>, chart: &'a Chart) -> Self {
        Self {
            container_id: container_id.into(),
            chart,
        }
    }
}

impl Render for HighchartRenderer<'_> {
    fn render(&self) -> String {
        let options = serde_json::to_string(self.chart)
            .unwrap_or_else(|_| "{}".to_string())
            // Keep "</script>" inside strings from closing the tag
            .replace("</", "<\\/");
        let id = escape_html(&self.container_id);
        format!(
            "<div id=\"{id}\" class=\"chart\"></div>\n<script>Highcharts.chart('{id}', {options});</script>\n"
        )
    }
}

/// A ranking table.
pub struct TableRenderer<'a> {
    pub table: &'a Table,
}

impl<'a> TableRenderer<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }
}

impl Render for TableRenderer<'_> {
    fn render(&self) -> String {
        let table = self.table;
        let mut html = String::new();
        html.push_str("<section class=\"table\">\n");
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(&table.title)));
        if let Some(subtitle) = &table.subtitle {
            html.push_str(&format!("<p class=\"subtitle\">{}</p>\n", escape_html(subtitle)));
        }
        html.push_str("<table>\n<thead><tr>");
        for header in &table.headers {
            html.push_str(&format!("<th>{}</th>", header));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &table.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n</section>\n");
        html
    }
}

/// Wrap rendered fragments in a standalone page.
pub fn render_page(title: &str, fragments: &[String]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str(&format!("<script src=\"{}\"></script>\n", HIGHCHARTS_SRC));
    html.push_str(
        "<style>\nbody { font-family: sans-serif; max-width: 960px; margin: 2em auto; }\n\
         .chart { height: 480px; margin-bottom: 3em; }\n\
         table { border-collapse: collapse; margin-bottom: 3em; }\n\
         th, td { padding: 4px 12px; text-align: right; }\n\
         td:first-child { text-align: left; }\n\
         .subtitle { color: #666; }\n</style>\n",
    );
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    for fragment in fragments {
        html.push_str(fragment);
    }
    html.push_str("</body>\n</html>\n");
    html
}
