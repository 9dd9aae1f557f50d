//! SVG and HTML output for a joined view.
//!
//! Everything here is string building over precomputed data: colors and
//! tooltip text come from the join, geometry is already in screen space.

mod legend;
mod page;
mod path;

use std::borrow::Cow;
use std::fmt::Write as _;

use choropleth_shared::{ClassificationScale, JoinedView, LegendAxis};

use legend::render_legend;
use page::render_page;
use path::path_data;

pub const MAP_WIDTH: u32 = 960;
pub const MAP_HEIGHT: u32 = 600;

/// The rendered map in both served forms.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    pub svg: String,
    pub html: String,
}

pub fn render_map(
    view: &JoinedView<'_>,
    scale: &ClassificationScale,
    axis: &LegendAxis,
) -> MapDocument {
    let svg = render_svg(view, scale, axis);
    let html = render_page(&svg);
    MapDocument { svg, html }
}

/// Standalone SVG: legend first, then one path per region in view order.
pub fn render_svg(view: &JoinedView<'_>, scale: &ClassificationScale, axis: &LegendAxis) -> String {
    let mut out = String::with_capacity(view.regions.len() * 256);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="choropleth" width="{MAP_WIDTH}" height="{MAP_HEIGHT}" viewBox="0 0 {MAP_WIDTH} {MAP_HEIGHT}">"#
    );

    render_legend(&mut out, scale, axis);

    out.push_str(r#"<g class="counties">"#);
    for joined in &view.regions {
        let _ = write!(
            out,
            r#"<path class="county" data-fips="{}" data-education="{}""#,
            escape_xml(joined.id().as_str()),
            joined.metric()
        );
        if let Some(label) = joined.label() {
            let _ = write!(
                out,
                r#" data-label="{}" data-detail="{}""#,
                escape_xml(&label.title),
                escape_xml(&label.detail)
            );
        }
        let _ = write!(
            out,
            r#" fill="{}" d="{}"/>"#,
            joined.fill,
            path_data(&joined.region.geometry)
        );
    }
    out.push_str("</g></svg>");
    out
}

/// Escape text for use in XML character data and double-quoted attributes.
pub fn escape_xml(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }
    let mut escaped = String::with_capacity(raw.len() + 16);
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use choropleth_shared::{
        Geometry, LegendAxis, Region, RegionId, StatRecord, education_scale, join,
    };

    use super::{escape_xml, render_map, render_svg};

    fn region(id: u64) -> Region {
        Region {
            id: RegionId::from(id),
            geometry: Geometry::Polygon(vec![vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 0.0]]]),
        }
    }

    fn record(id: u64, area_name: &str, metric: f64) -> StatRecord {
        StatRecord {
            id: RegionId::from(id),
            state: "AL".to_string(),
            area_name: area_name.to_string(),
            metric,
        }
    }

    #[test]
    fn escape_xml_handles_markup_and_quotes() {
        assert_eq!(escape_xml("plain"), "plain");
        assert_eq!(
            escape_xml(r#"<b>"O'Brien" & co</b>"#),
            "&lt;b&gt;&quot;O&#39;Brien&quot; &amp; co&lt;/b&gt;"
        );
    }

    #[test]
    fn one_path_per_region_in_region_order() {
        let regions = vec![region(3), region(1), region(2)];
        let stats = vec![record(1, "Autauga County", 21.9)];
        let scale = education_scale().expect("scale");
        let axis = LegendAxis::education().expect("axis");
        let view = join(&regions, &stats, &scale);

        let svg = render_svg(&view, &scale, &axis);

        assert_eq!(svg.matches(r#"<path class="county""#).count(), 3);
        let order: Vec<usize> = ["\"3\"", "\"1\"", "\"2\""]
            .iter()
            .map(|id| svg.find(&format!("data-fips={id}")).expect("path present"))
            .collect();
        assert!(order[0] < order[1] && order[1] < order[2]);
        assert!(svg.find(r#"id="legend""#) < svg.find(r#"class="counties""#));
    }

    #[test]
    fn matched_path_carries_label_and_palette_fill() {
        let regions = vec![region(1001)];
        let stats = vec![record(1001, "Autauga County", 21.9)];
        let scale = education_scale().expect("scale");
        let axis = LegendAxis::education().expect("axis");
        let view = join(&regions, &stats, &scale);

        let svg = render_svg(&view, &scale, &axis);
        let expected_fill = scale.color_for(21.9);

        assert!(svg.contains(&format!(
            r#"<path class="county" data-fips="1001" data-education="21.9" data-label="Autauga County, AL" data-detail="21.9% with Bachelor&#39;s degree or higher" fill="{expected_fill}" d="M0,0L4,0L4,3Z"/>"#
        )));
    }

    #[test]
    fn unmatched_path_has_zero_education_fallback_fill_and_no_label() {
        let regions = vec![region(2)];
        let scale = education_scale().expect("scale");
        let axis = LegendAxis::education().expect("axis");
        let view = join(&regions, &[], &scale);

        let svg = render_svg(&view, &scale, &axis);

        assert!(svg.contains(
            r##"<path class="county" data-fips="2" data-education="0" fill="#cccccc" d="M0,0L4,0L4,3Z"/>"##
        ));
        assert!(!svg.contains("data-label"));
    }

    #[test]
    fn labels_are_escaped() {
        let regions = vec![region(5)];
        let stats = vec![record(5, "<script>alert(1)</script>", 10.0)];
        let scale = education_scale().expect("scale");
        let axis = LegendAxis::education().expect("axis");
        let view = join(&regions, &stats, &scale);

        let svg = render_svg(&view, &scale, &axis);

        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;alert(1)&lt;/script&gt;, AL"));
    }

    #[test]
    fn document_embeds_svg_in_page() {
        let regions = vec![region(1)];
        let scale = education_scale().expect("scale");
        let axis = LegendAxis::education().expect("axis");
        let view = join(&regions, &[], &scale);

        let doc = render_map(&view, &scale, &axis);

        assert!(doc.svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" id="choropleth" width="960" height="600""#));
        assert!(doc.html.contains(&doc.svg));
    }
}
