use std::fmt::Write as _;

use choropleth_shared::{ClassificationScale, LegendAxis};

use super::escape_xml;

pub const LEGEND_CAPTION: &str = "Education level (%)";
pub const LEGEND_OFFSET_Y: u32 = 40;
const SWATCH_HEIGHT: u32 = 8;
const TICK_SIZE: u32 = 13;
const TICK_PADDING: u32 = 3;

/// Legend group: one swatch per bucket laid along `axis`, a caption, and a
/// bottom axis with a tick at every break. Breaks are the axis ticks, or the
/// scale's thresholds when the axis has none.
pub fn render_legend(out: &mut String, scale: &ClassificationScale, axis: &LegendAxis) {
    let breaks = if axis.ticks().is_empty() {
        scale.thresholds()
    } else {
        axis.ticks()
    };

    let _ = write!(
        out,
        r#"<g class="key" id="legend" transform="translate(0,{LEGEND_OFFSET_Y})">"#
    );

    for ((lower, upper), color) in scale
        .bucket_extents(breaks, axis.domain())
        .into_iter()
        .zip(scale.palette())
    {
        let x = axis.position(lower);
        let width = (axis.position(upper) - x).max(0.0);
        let _ = write!(
            out,
            r#"<rect height="{SWATCH_HEIGHT}" x="{x}" width="{width}" fill="{color}"/>"#
        );
    }

    let _ = write!(
        out,
        r##"<text class="caption" x="{}" y="-6" fill="#000" text-anchor="start" font-weight="bold">{}</text>"##,
        axis.range().0,
        escape_xml(LEGEND_CAPTION)
    );

    out.push_str(
        r#"<g class="axis" fill="none" font-size="10" font-family="sans-serif" text-anchor="middle">"#,
    );
    for &threshold in breaks {
        let _ = write!(
            out,
            r##"<g class="tick" opacity="1" transform="translate({},0)"><line stroke="#000" y2="{TICK_SIZE}"/><text fill="#000" y="{}" dy="0.71em">{}</text></g>"##,
            axis.position(threshold),
            TICK_SIZE + TICK_PADDING,
            tick_label(threshold)
        );
    }
    out.push_str("</g></g>");
}

/// Whole-percent tick label, e.g. `12%` for 11.6625.
pub fn tick_label(value: f64) -> String {
    let rounded = value.round();
    format!("{}%", if rounded == 0.0 { 0.0 } else { rounded })
}
