//! SVG serialization of surface containers.

use std::f64::consts::PI;
use std::fmt::Write;

use super::chart::format_value;
use super::surface::{Container, Mark, Shape};

/// Escape text for use in SVG content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.sin(), cy - r * angle.cos())
}

/// Path for an annular sector; `inner == 0` gives a pie wedge.
fn arc_path(cx: f64, cy: f64, inner: f64, outer: f64, start: f64, end: f64) -> String {
    let sweep = end - start;
    if sweep >= 2.0 * PI - 1e-9 {
        // A single arc cannot close on itself; draw two halves.
        let mid = start + PI;
        return format!(
            "{} {}",
            arc_path(cx, cy, inner, outer, start, mid),
            arc_path(cx, cy, inner, outer, mid, start + 2.0 * PI)
        );
    }

    let large = if sweep > PI { 1 } else { 0 };
    let (ox1, oy1) = polar(cx, cy, outer, start);
    let (ox2, oy2) = polar(cx, cy, outer, end);
    let mut d = format!(
        "M{:.2},{:.2} A{:.2},{:.2} 0 {} 1 {:.2},{:.2}",
        ox1, oy1, outer, outer, large, ox2, oy2
    );
    if inner > 0.0 {
        let (ix2, iy2) = polar(cx, cy, inner, end);
        let (ix1, iy1) = polar(cx, cy, inner, start);
        let _ = write!(
            d,
            " L{:.2},{:.2} A{:.2},{:.2} 0 {} 0 {:.2},{:.2} Z",
            ix2, iy2, inner, inner, large, ix1, iy1
        );
    } else {
        let _ = write!(d, " L{:.2},{:.2} Z", cx, cy);
    }
    d
}

fn attributes(mark: &Mark) -> String {
    let mut attrs = format!(r#" class="{}""#, mark.class);
    if let Some(fill) = &mark.fill {
        let _ = write!(attrs, r#" fill="{}""#, escape(fill));
    }
    if let Some(stroke) = &mark.stroke {
        let _ = write!(attrs, r#" stroke="{}""#, escape(stroke));
    }
    if let Some(opacity) = mark.opacity {
        let _ = write!(attrs, r#" fill-opacity="{:.3}""#, opacity);
    }
    if let Some(interaction) = &mark.interaction {
        let hover = &interaction.hover;
        let _ = write!(
            attrs,
            r#" data-label="{}" data-value="{}""#,
            escape(&hover.label),
            format_value(hover.value)
        );
        if let Some(p) = hover.percent {
            let _ = write!(attrs, r#" data-percent="{:.1}""#, p);
        }
        if let Some((dimension, value)) = &interaction.filter {
            let dimension = match dimension {
                crate::services::filter::Dimension::Shape => "shape",
                crate::services::filter::Dimension::Country => "country",
            };
            let _ = write!(
                attrs,
                r#" data-filter-dimension="{}" data-filter-value="{}""#,
                dimension,
                escape(value)
            );
        }
    }
    attrs
}

fn mark_svg(mark: &Mark) -> String {
    let attrs = attributes(mark);
    let title = mark
        .interaction
        .as_ref()
        .map(|i| format!("<title>{}</title>", escape(&i.hover.text())))
        .unwrap_or_default();

    match &mark.shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
        } => format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"{}>{}</rect>"#,
            x, y, width, height, attrs, title
        ),
        Shape::Circle { cx, cy, r } => format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}"{}>{}</circle>"#,
            cx, cy, r, attrs, title
        ),
        Shape::Line { x1, y1, x2, y2 } => format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"{}/>"#,
            x1, y1, x2, y2, attrs
        ),
        Shape::Polyline { points } => {
            let pts: Vec<String> = points
                .iter()
                .map(|(x, y)| format!("{:.2},{:.2}", x, y))
                .collect();
            format!(
                r#"<polyline points="{}" fill="none"{}/>"#,
                pts.join(" "),
                attrs
            )
        }
        Shape::Arc {
            cx,
            cy,
            inner,
            outer,
            start,
            end,
        } => format!(
            r#"<path d="{}"{}>{}</path>"#,
            arc_path(*cx, *cy, *inner, *outer, *start, *end),
            attrs,
            title
        ),
        Shape::Text {
            x,
            y,
            content,
            anchor,
        } => format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="{}"{}>{}</text>"#,
            x,
            y,
            anchor.as_str(),
            attrs,
            escape(content)
        ),
    }
}

/// Serialize one container as a standalone SVG element.
pub fn container_svg(container: &Container) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{}" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="sans-serif" font-size="11">"#,
        escape(&container.id),
        container.width,
        container.height,
        container.width,
        container.height
    );
    for mark in &container.marks {
        svg.push('\n');
        svg.push_str(&mark_svg(mark));
    }
    svg.push_str("\n</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::{Anchor, HoverInfo};
    use crate::services::filter::Dimension;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn test_interactive_mark_attributes() {
        let mut container = Container::new("shapes", 200.0, 100.0);
        container.push(
            Mark::new(
                Shape::Rect {
                    x: 0.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                },
                "bar",
            )
            .fill("#1f77b4")
            .hover(HoverInfo {
                label: "Disk".to_string(),
                value: 2.0,
                percent: Some(50.0),
            })
            .filter_on(Some(Dimension::Shape), "Disk"),
        );
        container.push(Mark::text(5.0, 5.0, "A & B", Anchor::Middle, "label"));

        let svg = container.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"data-filter-dimension="shape""#));
        assert!(svg.contains(r#"data-percent="50.0""#));
        assert!(svg.contains("A &amp; B"));
    }

    #[test]
    fn test_full_circle_arc_is_two_halves() {
        let d = arc_path(50.0, 50.0, 20.0, 40.0, 0.0, 2.0 * PI);
        assert_eq!(d.matches('M').count(), 2);
    }
}
