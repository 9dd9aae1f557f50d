use super::escape_xml;

pub const PAGE_TITLE: &str = "United States Educational Attainment";
pub const PAGE_DESCRIPTION: &str =
    "Percentage of adults age 25 and older with a bachelor's degree or higher (2010-2014)";

const STYLE: &str = r#"<style>
body { font-family: sans-serif; margin: 0; padding: 24px; background: #fff; color: #222; }
#title { margin: 0 0 4px; text-align: center; }
#description { margin-bottom: 12px; text-align: center; }
#choropleth { display: block; margin: 0 auto; }
.county { stroke: #fff; stroke-width: 0.2px; }
.county:hover { stroke: #000; stroke-width: 1px; }
#tooltip { position: absolute; display: none; padding: 6px 8px; background: rgba(255, 255, 204, 0.95); border: 1px solid #999; border-radius: 4px; font-size: 12px; pointer-events: none; }
</style>"#;

// Labels are read from data attributes and inserted as text nodes only.
const SCRIPT: &str = r##"<script>
(() => {
  const tooltip = document.getElementById("tooltip");
  for (const county of document.querySelectorAll("#choropleth .county")) {
    county.addEventListener("mouseover", (event) => {
      const title = county.dataset.label;
      if (!title) return;
      const strong = document.createElement("strong");
      strong.textContent = title;
      tooltip.replaceChildren(strong, document.createElement("br"), county.dataset.detail || "");
      tooltip.dataset.education = county.dataset.education;
      tooltip.style.display = "block";
      tooltip.style.left = event.pageX + 10 + "px";
      tooltip.style.top = event.pageY - 28 + "px";
    });
    county.addEventListener("mouseout", () => {
      tooltip.style.display = "none";
    });
  }
})();
</script>"##;

/// Full HTML document around an already rendered SVG.
pub fn render_page(svg: &str) -> String {
    let title = escape_xml(PAGE_TITLE);
    let mut page = String::with_capacity(svg.len() + STYLE.len() + SCRIPT.len() + 512);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>");
    page.push_str(&title);
    page.push_str("</title>\n");
    page.push_str(STYLE);
    page.push_str("\n</head>\n<body>\n<h1 id=\"title\">");
    page.push_str(&title);
    page.push_str("</h1>\n<div id=\"description\">");
    page.push_str(&escape_xml(PAGE_DESCRIPTION));
    page.push_str("</div>\n");
    page.push_str(svg);
    page.push_str("\n<div id=\"tooltip\"></div>\n");
    page.push_str(SCRIPT);
    page.push_str("\n</body>\n</html>\n");
    page
}
