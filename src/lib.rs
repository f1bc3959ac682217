pub mod event;
pub mod layout;
pub mod measure;
pub mod palette;
pub mod parser;
pub mod svg;
pub mod timeline;

use wasm_bindgen::prelude::*;

use chrono::NaiveDate;
use event::DateRange;
use layout::{LayoutEngine, TimelineLayout};
use parser::Parser;
use svg::SvgRenderer;
pub use timeline::{RenderError, RenderOptions, Timeline};

/// Parse `source` and lay it out for `options`.
pub fn layout_source(
    source: &str,
    options: &RenderOptions,
) -> Result<(Timeline, TimelineLayout), RenderError> {
    let doc = Parser::new(source).parse()?;
    let timeline = Timeline::from_document(&doc, options)?;
    let layout = LayoutEngine::default().layout(&timeline);
    if layout.is_degraded() {
        tracing::warn!(title = %timeline.title, "layout saturated, some boxes may overlap");
    }
    Ok((timeline, layout))
}

/// Parse, lay out and render `source` to SVG.
pub fn render_svg(source: &str, options: &RenderOptions) -> Result<String, RenderError> {
    let (timeline, layout) = layout_source(source, options)?;
    Ok(SvgRenderer::default().render(&timeline, &layout))
}

/// Parse and lay out `source`, returning the placements as JSON.
pub fn render_json(source: &str, options: &RenderOptions) -> Result<String, RenderError> {
    let (timeline, layout) = layout_source(source, options)?;
    let out = serde_json::json!({
        "title": timeline.title,
        "range": timeline.range,
        "events": timeline.events,
        "colors": timeline.colors,
        "layout": layout,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Render an event file to SVG. Without `from`/`to` the current calendar
/// year is shown. `colors` takes `Owner=#hex` pairs separated by `;`.
#[wasm_bindgen(js_name = "timelineToSvg")]
pub fn timeline_to_svg(
    source: &str,
    from: Option<String>,
    to: Option<String>,
    show_today: Option<bool>,
    colors: Option<String>,
) -> Result<String, String> {
    let options = wasm_options(from, to, show_today, colors)?;
    render_svg(source, &options).map_err(|e| e.to_string())
}

/// Same inputs as `timelineToSvg`, returning the layout as JSON.
#[wasm_bindgen(js_name = "timelineLayout")]
pub fn timeline_layout(
    source: &str,
    from: Option<String>,
    to: Option<String>,
    show_today: Option<bool>,
    colors: Option<String>,
) -> Result<String, String> {
    let options = wasm_options(from, to, show_today, colors)?;
    render_json(source, &options).map_err(|e| e.to_string())
}

fn wasm_options(
    from: Option<String>,
    to: Option<String>,
    show_today: Option<bool>,
    colors: Option<String>,
) -> Result<RenderOptions, String> {
    let today = js_today().ok_or("Could not read the current date")?;
    let range = match (from, to) {
        (Some(from), Some(to)) => {
            let start = parser::parse_date(&from, 0).map_err(|e| e.to_string())?;
            let end = parser::parse_date(&to, 0).map_err(|e| e.to_string())?;
            DateRange::custom(start, end)
        }
        _ => DateRange::calendar_year(today),
    };
    let mut options = RenderOptions::new(range, today);
    options.show_today = show_today.unwrap_or(true);
    if let Some(list) = colors {
        let overrides = palette::parse_owner_colors(&list).map_err(|e| e.to_string())?;
        options.palette = options.palette.with_known(overrides);
    }
    Ok(options)
}

fn js_today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
}
