use crate::event::RangeKind;
use crate::layout::{Annotation, PlacedBox, SinglePlacement, TimelineLayout, TreeLayout};
use crate::measure::TextMetrics;
use crate::timeline::Timeline;
use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

const AXIS_COLOR: &str = "#34495e";
const TRUNK_COLOR: &str = "#7f8c8d";
const ARROW_COLOR: &str = "#555555";
const DROP_COLOR: &str = "#bdc3c7";
const TODAY_COLOR: &str = "#e74c3c";
const TEXT_COLOR: &str = "#2c3e50";

pub struct SvgRenderer {
    metrics: TextMetrics,
    width: f64,
    height: f64,
    margin_left: f64,
    margin_right: f64,
    margin_top: f64,
    margin_bottom: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
            width: 1600.0,
            height: 900.0,
            margin_left: 40.0,
            margin_right: 40.0,
            margin_top: 90.0,
            margin_bottom: 150.0,
        }
    }
}

/// Maps layout coordinates (days, levels) to pixels.
struct Frame {
    left: f64,
    top: f64,
    plot_width: f64,
    plot_height: f64,
    x_max: f64,
    y_limit: f64,
}

impl Frame {
    fn x(&self, days: f64) -> f64 {
        let span = if self.x_max > 0.0 { self.x_max } else { 1.0 };
        self.left + days / span * self.plot_width
    }

    fn y(&self, level: f64) -> f64 {
        let half = self.plot_height / 2.0;
        self.top + half - level / self.y_limit * half
    }

    fn bottom(&self) -> f64 {
        self.top + self.plot_height
    }
}

impl SvgRenderer {
    pub fn render(&self, timeline: &Timeline, layout: &TimelineLayout) -> String {
        let mut svg = String::new();
        let frame = Frame {
            left: self.margin_left,
            top: self.margin_top,
            plot_width: self.width - self.margin_left - self.margin_right,
            plot_height: self.height - self.margin_top - self.margin_bottom,
            x_max: layout.bounds.x_max - layout.bounds.x_min,
            y_limit: layout.bounds.y_limit,
        };

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        let _ = writeln!(
            svg,
            r##"<defs>
  <marker id="arrow" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse">
    <path d="M 0 0 L 10 5 L 0 10 z" fill="{ARROW_COLOR}" />
  </marker>
</defs>
<style>
  .title {{ font-family: sans-serif; font-size: 22px; font-weight: bold; fill: {TEXT_COLOR}; }}
  .stamp {{ font-family: sans-serif; font-size: 12px; fill: #555555; }}
  .box {{ fill: #fff; stroke-width: 1.5; }}
  .box-text {{ font-family: sans-serif; fill: {TEXT_COLOR}; }}
  .box-owner {{ font-weight: bold; }}
  .axis {{ stroke: {AXIS_COLOR}; stroke-width: 2; }}
  .tick {{ font-family: sans-serif; font-size: 11px; fill: {AXIS_COLOR}; }}
  .stem {{ stroke-width: 1; stroke-opacity: 0.5; }}
  .trunk {{ stroke: {TRUNK_COLOR}; stroke-width: 2; stroke-opacity: 0.5; stroke-dasharray: 6 4; }}
  .connector {{ stroke-width: 1.5; }}
  .delay {{ stroke: {ARROW_COLOR}; stroke-width: 0.9; marker-end: url(#arrow); }}
  .delay-text {{ font-family: sans-serif; font-size: 10px; font-weight: bold; fill: {ARROW_COLOR}; stroke: #fff; stroke-width: 3; paint-order: stroke; }}
  .drop {{ stroke: {DROP_COLOR}; stroke-width: 1; stroke-dasharray: 1 3; }}
  .today {{ stroke: {TODAY_COLOR}; stroke-width: 1.5; stroke-opacity: 0.8; stroke-dasharray: 6 4; }}
  .today-text {{ font-family: sans-serif; font-size: 12px; font-weight: bold; fill: {TODAY_COLOR}; }}
  .legend {{ font-family: sans-serif; font-size: 12px; fill: {TEXT_COLOR}; }}
</style>"##
        );

        // Behind everything
        if let Some(today) = layout.today {
            self.render_today(&mut svg, &frame, today.date, today.x);
        }
        self.render_axis(&mut svg, &frame, timeline);

        // Stems, trunks, arrows
        for single in &layout.singles {
            let color = timeline.colors.color(&timeline.events[single.placed.event].owner);
            self.render_stem(&mut svg, &frame, single, color);
        }
        for tree in &layout.trees {
            self.render_trunk(&mut svg, &frame, timeline, tree);
        }
        for annotation in &layout.annotations {
            self.render_annotation(&mut svg, &frame, annotation);
        }

        // Label boxes on top
        for single in &layout.singles {
            self.render_box(&mut svg, &frame, timeline, &single.placed, single.date);
        }
        for tree in &layout.trees {
            for branch in &tree.branches {
                self.render_box(&mut svg, &frame, timeline, &branch.placed, tree.date);
            }
        }

        self.render_header(&mut svg, timeline);
        self.render_legend(&mut svg, &frame, timeline);

        let _ = writeln!(svg, "</svg>");
        svg
    }

    fn render_header(&self, svg: &mut String, timeline: &Timeline) {
        let _ = writeln!(
            svg,
            r#"<text class="stamp" x="20" y="22">Generated: {}</text>"#,
            timeline.generated_on.format("%d/%m/%Y")
        );
        if !timeline.title.is_empty() {
            let _ = writeln!(
                svg,
                r#"<text class="title" x="{}" y="55" text-anchor="middle">Timeline: {}</text>"#,
                self.width / 2.0,
                escape_xml(&timeline.title)
            );
        }
    }

    fn render_axis(&self, svg: &mut String, frame: &Frame, timeline: &Timeline) {
        let y0 = frame.y(0.0);
        let _ = writeln!(
            svg,
            r#"<line class="axis" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
            frame.x(0.0),
            y0,
            frame.x(frame.x_max),
            y0
        );

        let bottom = frame.bottom();
        let _ = writeln!(
            svg,
            r#"<line class="axis" x1="{}" y1="{}" x2="{}" y2="{}" stroke-width="1" />"#,
            frame.x(0.0),
            bottom,
            frame.x(frame.x_max),
            bottom
        );

        for month in month_starts(timeline.range.start, timeline.range.end) {
            let x = frame.x(timeline.range.offset(month));
            let _ = writeln!(
                svg,
                r#"<line class="axis" x1="{}" y1="{}" x2="{}" y2="{}" stroke-width="1" />"#,
                x,
                bottom,
                x,
                bottom + 5.0
            );
            let _ = writeln!(
                svg,
                r#"<text class="tick" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                x,
                bottom + 18.0,
                month.format("%b-%y")
            );
        }
    }

    fn render_today(&self, svg: &mut String, frame: &Frame, date: NaiveDate, x: f64) {
        let px = frame.x(x);
        let _ = writeln!(
            svg,
            r#"<line class="today" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
            px,
            frame.top,
            px,
            frame.bottom()
        );
        // label sits just left of the line
        let label_x = frame.x(x - frame.x_max * 0.008);
        let _ = writeln!(
            svg,
            r#"<text class="today-text" x="{}" y="{}" text-anchor="end"><tspan x="{}" dy="0">TODAY</tspan><tspan x="{}" dy="14">{}</tspan></text>"#,
            label_x,
            frame.top + 14.0,
            label_x,
            label_x,
            date.format("%-d %B %Y")
        );
    }

    fn render_stem(&self, svg: &mut String, frame: &Frame, single: &SinglePlacement, color: &str) {
        let x = frame.x(single.placed.anchor);
        let _ = writeln!(
            svg,
            r#"<line class="stem" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" />"#,
            x,
            frame.y(0.0),
            x,
            frame.y(single.placed.level),
            color
        );
        let _ = writeln!(
            svg,
            r#"<circle cx="{}" cy="{}" r="4.5" fill="{}" />"#,
            x,
            frame.y(0.0),
            color
        );
    }

    fn render_trunk(&self, svg: &mut String, frame: &Frame, timeline: &Timeline, tree: &TreeLayout) {
        let x = frame.x(tree.trunk_x);
        let root_color = tree
            .branches
            .first()
            .map(|b| timeline.colors.color(&timeline.events[b.placed.event].owner))
            .unwrap_or(AXIS_COLOR);

        let _ = writeln!(
            svg,
            r#"<line class="trunk" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
            x,
            frame.y(0.0),
            x,
            frame.y(tree.trunk_height)
        );

        for branch in &tree.branches {
            let color = timeline.colors.color(&timeline.events[branch.placed.event].owner);
            let y = frame.y(branch.placed.level);
            let _ = writeln!(
                svg,
                r#"<line class="connector" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" />"#,
                x,
                y,
                frame.x(branch.connector_end),
                y,
                color
            );
            let _ = writeln!(svg, r#"<circle cx="{}" cy="{}" r="3" fill="{}" />"#, x, y, color);
        }

        let _ = writeln!(
            svg,
            r##"<circle cx="{}" cy="{}" r="5" fill="{}" stroke="#fff" stroke-width="1.5" />"##,
            x,
            frame.y(0.0),
            root_color
        );
    }

    fn render_annotation(&self, svg: &mut String, frame: &Frame, annotation: &Annotation) {
        let y = frame.y(annotation.level);

        if let Some(drop_x) = annotation.drop_line {
            let x = frame.x(drop_x);
            let _ = writeln!(
                svg,
                r#"<line class="drop" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
                x,
                frame.y(0.0),
                x,
                y
            );
        }

        let _ = writeln!(
            svg,
            r#"<line class="delay" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
            frame.x(annotation.tail),
            y,
            frame.x(annotation.head),
            y
        );

        // text goes on the baseline side of the arrow
        let (text_y, baseline) = if annotation.level > 0.0 {
            (frame.y(annotation.level - 0.25), "hanging")
        } else {
            (frame.y(annotation.level + 0.25), "auto")
        };
        let _ = writeln!(
            svg,
            r#"<text class="delay-text" x="{}" y="{}" text-anchor="middle" dominant-baseline="{}">{}</text>"#,
            frame.x(annotation.text_x),
            text_y,
            baseline,
            escape_xml(&annotation.label)
        );
    }

    fn render_box(
        &self,
        svg: &mut String,
        frame: &Frame,
        timeline: &Timeline,
        placed: &PlacedBox,
        date: NaiveDate,
    ) {
        let Some(event) = timeline.events.get(placed.event) else {
            return;
        };
        let lines = self.metrics.label_lines(
            &event.owner,
            &event.label,
            &date.format("%-d-%b").to_string(),
        );
        let owner_lines = crate::measure::wrap(&event.owner.to_uppercase(), self.metrics.owner_wrap).len();

        // The box is exactly the area the layout reserved; text shrinks to fit.
        let bounds = placed.bounds();
        let x = frame.x(bounds.x_min);
        let y = frame.y(bounds.y_max);
        let w = frame.x(bounds.x_max) - x;
        let h = frame.y(bounds.y_min) - y;
        let (text_w, text_h) = self.metrics.box_size(&lines);
        let scale = (w / text_w).min(h / text_h).min(1.0);
        let font_size = self.metrics.font_size * scale;
        let line_height = self.metrics.line_height * scale;
        let cx = frame.x(placed.anchor);
        let cy = frame.y(placed.level);

        let _ = writeln!(svg, r#"<g class="event">"#);
        let _ = writeln!(
            svg,
            r#"<rect class="box" x="{}" y="{}" width="{}" height="{}" rx="5" stroke="{}" />"#,
            x,
            y,
            w,
            h,
            timeline.colors.color(&event.owner)
        );
        let mut text_y = cy - lines.len() as f64 * line_height / 2.0 + line_height * 0.8;
        for (i, line) in lines.iter().enumerate() {
            let class = if i < owner_lines {
                "box-text box-owner"
            } else {
                "box-text"
            };
            let _ = writeln!(
                svg,
                r#"<text class="{}" x="{}" y="{}" font-size="{:.2}" text-anchor="middle">{}</text>"#,
                class,
                cx,
                text_y,
                font_size,
                escape_xml(line)
            );
            text_y += line_height;
        }
        let _ = writeln!(svg, "</g>");
    }

    fn render_legend(&self, svg: &mut String, frame: &Frame, timeline: &Timeline) {
        let mut x = frame.left;
        let y = frame.bottom() + 50.0;
        let _ = writeln!(
            svg,
            r#"<text class="legend" x="{}" y="{}" font-weight="bold">Owners</text>"#,
            x,
            y - 18.0
        );

        for (owner, color) in &timeline.colors.entries {
            let name = if owner.is_empty() { "N/A" } else { owner.as_str() };
            let _ = writeln!(
                svg,
                r#"<rect x="{}" y="{}" width="14" height="10" fill="{}" />"#,
                x,
                y - 9.0,
                color
            );
            let _ = writeln!(
                svg,
                r#"<text class="legend" x="{}" y="{}">{}</text>"#,
                x + 20.0,
                y,
                escape_xml(name)
            );
            x += 20.0 + self.metrics.text_width(name) + 24.0;
        }

        let _ = writeln!(
            svg,
            r#"<line class="delay" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
            x,
            y - 4.0,
            x + 20.0,
            y - 4.0
        );
        let _ = writeln!(
            svg,
            r#"<text class="legend" x="{}" y="{}">Days of delay</text>"#,
            x + 26.0,
            y
        );

        if timeline.range.kind == RangeKind::Custom {
            let _ = writeln!(
                svg,
                r#"<text class="legend" x="{}" y="{}">Custom period: {} - {}</text>"#,
                frame.left,
                y + 30.0,
                timeline.range.start.format("%d/%m/%Y"),
                timeline.range.end.format("%d/%m/%Y")
            );
        }
    }
}

/// First day of every month inside `[start, end]`.
fn month_starts(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = if start.day() == 1 {
        Some(start)
    } else {
        next_month(start)
    };
    while let Some(month) = current {
        if month > end {
            break;
        }
        months.push(month);
        current = next_month(month);
    }
    months
}

fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
