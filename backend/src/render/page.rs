//! Full dashboard page: every chart container as inline SVG, the tooltip, and
//! the map command log for the browser-side replay script.

use crate::error::{AnalyticsError, AnalyticsResult, ErrorContext};
use crate::services::filter::FilterState;

use super::map_commands::MapCommand;
use super::surface::Surface;
use super::svg::escape;

/// Everything the page shows.
pub struct Page<'a> {
    pub title: &'a str,
    pub surface: &'a Surface,
    /// Chart container ids in display order
    pub charts: &'a [&'a str],
    pub map_container: &'a str,
    pub map_commands: &'a [MapCommand],
    pub filter: &'a FilterState,
    pub checksum: &'a str,
}

const REPLAY_SCRIPT: &str = r#"
(function () {
  var commands = JSON.parse(document.getElementById('map-commands').textContent);
  if (typeof L === 'undefined') {
    var el = document.getElementById('map-indicator');
    if (el) { el.textContent = 'Map library failed to load'; }
    return;
  }
  var maps = {}, layers = {};
  commands.forEach(function (c) {
    switch (c.op) {
      case 'create_map': maps[c.map] = L.map(c.container); break;
      case 'add_tile_layer': layers[c.layer] = L.tileLayer(c.url, { attribution: c.attribution }).addTo(maps[c.map]); break;
      case 'add_marker': layers[c.layer] = L.marker([c.point.latitude, c.point.longitude]).bindPopup(c.popup).addTo(maps[c.map]); break;
      case 'create_cluster_group': layers[c.layer] = L.markerClusterGroup().addTo(maps[c.map]); break;
      case 'add_to_cluster': layers[c.cluster].addLayer(L.marker([c.point.latitude, c.point.longitude]).bindPopup(c.popup)); break;
      case 'create_heat_layer': layers[c.layer] = L.heatLayer(c.points.map(function (p) { return [p.latitude, p.longitude]; }), { radius: c.radius, blur: c.blur }).addTo(maps[c.map]); break;
      case 'fit_bounds': maps[c.map].fitBounds([[c.south_west.latitude, c.south_west.longitude], [c.north_east.latitude, c.north_east.longitude]], { padding: [c.padding, c.padding] }); break;
      case 'set_view': maps[c.map].setView([c.center.latitude, c.center.longitude], c.zoom); break;
      case 'show_indicator': document.getElementById('map-indicator').textContent = c.indicator.message || 'No data'; break;
    }
  });
})();
"#;

fn filter_summary(filter: &FilterState) -> String {
    if filter.is_empty() {
        return "All sightings".to_string();
    }
    let mut parts = Vec::new();
    if let Some(start) = filter.start {
        parts.push(format!("from {}", start));
    }
    if let Some(end) = filter.end {
        parts.push(format!("to {}", end));
    }
    if !filter.shapes.is_empty() {
        let shapes: Vec<&str> = filter.shapes.iter().map(String::as_str).collect();
        parts.push(format!("shape {}", shapes.join(" / ")));
    }
    if let Some(country) = &filter.country {
        parts.push(format!("country {}", country));
    }
    parts.join(", ")
}

/// Render the page as a standalone HTML document.
pub fn render_page(page: &Page<'_>) -> AnalyticsResult<String> {
    let commands = serde_json::to_string(page.map_commands)
        .map_err(|e| {
            AnalyticsError::write_with_context(
                e.to_string(),
                ErrorContext::new("render_page").with_entity(page.title),
            )
        })?
        .replace("</", "<\\/");

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{}</title></head><body>\n", escape(page.title)));
    html.push_str(&format!(
        "<header><h1>{}</h1><p class=\"filter\">{}</p></header>\n",
        escape(page.title),
        escape(&filter_summary(page.filter))
    ));

    for id in page.charts {
        if let Some(svg) = page.surface.to_svg(id) {
            html.push_str(&format!(
                "<section class=\"chart\" id=\"chart-{}\">{}</section>\n",
                escape(id),
                svg
            ));
        }
    }

    if let Some(map) = page.surface.container(page.map_container) {
        html.push_str(&format!(
            "<section class=\"map\"><div id=\"{}\" style=\"width:{}px;height:{}px\"></div>\
             <p id=\"map-indicator\"></p></section>\n",
            escape(&map.id),
            map.width,
            map.height
        ));
    }

    let tooltip = page.surface.tooltip();
    html.push_str(&format!(
        "<div id=\"tooltip\" style=\"position:absolute;left:{}px;top:{}px;display:{}\">{}</div>\n",
        tooltip.x,
        tooltip.y,
        if tooltip.visible { "block" } else { "none" },
        escape(&tooltip.content)
    ));

    html.push_str(&format!(
        "<script type=\"application/json\" id=\"map-commands\">{}</script>\n",
        commands
    ));
    html.push_str(&format!("<script>{}</script>\n", REPLAY_SCRIPT));
    html.push_str(&format!(
        "<footer>Dataset checksum <code>{}</code></footer>\n</body></html>\n",
        escape(page.checksum)
    ));
    Ok(html)
}
