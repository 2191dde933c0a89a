//! HTML dashboard generation
//!
//! Generates a self-contained one-pager dashboard with embedded CSS and
//! JavaScript. Every view is computed up front by the transformer and embedded
//! as JSON; the page script only looks views up and draws them. Works offline.

use crate::config::{is_hex_color, DEFAULT_HEADER_COLOR, DEFAULT_SECTION_COLOR, DEFAULT_TITLE};
use crate::dataset::Dataset;
use crate::schema::Docket;
use crate::view::{Transformer, ViewResult};

/// Placeholder option shown before a judiciary is chosen
pub const SELECT_PLACEHOLDER: &str = "Select a Judiciary";

/// Presentation settings for the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    pub title: String,
    pub header_color: String,
    pub section_color: String,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        DashboardOptions {
            title: DEFAULT_TITLE.to_string(),
            header_color: DEFAULT_HEADER_COLOR.to_string(),
            section_color: DEFAULT_SECTION_COLOR.to_string(),
        }
    }
}

/// Render the interactive dashboard for a dataset
pub fn render_html_dashboard(dataset: &Dataset, options: &DashboardOptions) -> String {
    let views = Transformer::new(dataset).all_views();
    let title = html_escape(&options.title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{theme}{css}</style>
</head>
<body data-status="empty">
    <div class="container">
        {header}
        {selector}
        <h3 id="op-label" class="judiciary-name"></h3>
        <div class="dockets">
            {criminal}
            {civil}
        </div>
        {footer}
    </div>
    <script>window.__opViews = {views};</script>
    <script>{js}</script>
</body>
</html>"#,
        title = title,
        theme = render_theme(options),
        css = inline_css(),
        header = render_header(&title),
        selector = render_selector(&dataset.distinct_judiciaries()),
        criminal = render_docket_column(Docket::Criminal),
        civil = render_docket_column(Docket::Civil),
        footer = render_footer(dataset),
        views = embed_views_json(&views),
        js = inline_javascript(),
    )
}

/// Serialize views for a `<script>` element
///
/// `<`, `>` and `&` are written as JSON unicode escapes so that string
/// content can never close the element.
fn embed_views_json(views: &[ViewResult]) -> String {
    serde_json::to_string(views)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// CSS custom properties for the configured colours
fn render_theme(options: &DashboardOptions) -> String {
    format!(
        "\n:root {{\n    --op-header: {};\n    --op-section: {};\n}}\n",
        safe_color(&options.header_color, DEFAULT_HEADER_COLOR),
        safe_color(&options.section_color, DEFAULT_SECTION_COLOR),
    )
}

fn safe_color<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if is_hex_color(value) {
        value
    } else {
        fallback
    }
}

/// Render header section
fn render_header(escaped_title: &str) -> String {
    format!(
        r#"<header>
    <h1>{title}</h1>
</header>"#,
        title = escaped_title,
    )
}

/// Render the judiciary selector; option values index the embedded views
fn render_selector(judiciaries: &[&str]) -> String {
    let options: String = judiciaries
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(
                "\n            <option value=\"{}\">{}</option>",
                i + 1,
                html_escape(name)
            )
        })
        .collect();

    format!(
        r#"<div class="selector">
        <select id="op-judiciary" aria-label="Judiciary">
            <option value="0">{placeholder}</option>{options}
        </select>
    </div>"#,
        placeholder = SELECT_PLACEHOLDER,
        options = options,
    )
}

/// Render one docket column: key events, CCR chart, adjournment reasons
fn render_docket_column(docket: Docket) -> String {
    let id = match docket {
        Docket::Criminal => "criminal",
        Docket::Civil => "civil",
    };

    format!(
        r#"<section class="docket" id="op-{id}">
                <h4 class="docket-heading">{heading}</h4>
                <h5 class="section-heading">Summary of Key Court Events</h5>
                <table class="op-table" id="op-{id}-metrics">
                    <thead><tr><th>Variable</th><th>Value</th></tr></thead>
                    <tbody></tbody>
                </table>
                <h5 class="section-heading">Case Clearance Rate (CCR)</h5>
                <div class="chart-label">{chart_title}</div>
                <canvas class="op-chart" id="op-{id}-ccr" height="240"></canvas>
                <h5 class="section-heading">Top Three Reasons for Adjournments</h5>
                <table class="op-table" id="op-{id}-reasons">
                    <thead><tr><th>Rank</th><th>Reason</th><th>Number</th><th>Percent</th></tr></thead>
                    <tbody></tbody>
                </table>
            </section>"#,
        id = id,
        heading = docket.heading(),
        chart_title = docket.chart_title(),
    )
}

fn render_footer(dataset: &Dataset) -> String {
    let source = dataset
        .source()
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    format!(
        r#"<footer>
    <p>Generated by onepager from <code>{}</code></p>
</footer>"#,
        html_escape(&source)
    )
}

/// Inline CSS styles
fn inline_css() -> &'static str {
    r#"
* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #111827;
    background: #ffffff;
}

.container {
    max-width: 1400px;
    margin: 0 auto;
    padding: 2rem;
}

header h1 {
    text-align: center;
    font-size: 2rem;
    font-weight: 700;
    margin-bottom: 1rem;
}

.selector {
    width: 50%;
    margin: 0 auto 1rem;
}

.selector select {
    width: 100%;
    padding: 0.5rem;
    font-size: 1rem;
    border: 1px solid #d1d5db;
    border-radius: 4px;
}

.judiciary-name {
    text-align: center;
    min-height: 1.6em;
    margin-bottom: 1rem;
}

body[data-status="no_data"] .judiciary-name,
body[data-status="missing_fields"] .judiciary-name {
    color: #b91c1c;
}

.dockets {
    display: flex;
    flex-wrap: wrap;
    gap: 2rem;
    justify-content: space-between;
}

.docket {
    flex: 1 1 45%;
    min-width: 320px;
}

.docket-heading {
    background: var(--op-header);
    color: white;
    padding: 10px;
}

.section-heading {
    background: var(--op-section);
    color: white;
    padding: 10px;
    margin-top: 1rem;
}

.op-table {
    width: 100%;
    border-collapse: collapse;
    font-size: 0.875rem;
}

.op-table th,
.op-table td {
    text-align: left;
    padding: 0.4rem 0.6rem;
    border-bottom: 1px solid #e5e7eb;
}

.op-table th {
    background: #f9fafb;
    font-weight: 600;
}

.chart-label {
    font-size: 0.875rem;
    color: #6b7280;
    margin: 0.5rem 0;
    text-align: center;
}

.op-chart {
    width: 100%;
    display: block;
}

footer {
    margin-top: 2rem;
    padding-top: 1rem;
    border-top: 1px solid #e5e7eb;
    color: #6b7280;
    font-size: 0.75rem;
    text-align: center;
}

@media (prefers-color-scheme: dark) {
    body { background: #111827; color: #f9fafb; }
    .op-table th { background: #1f2937; }
    .op-table th, .op-table td { border-bottom-color: #374151; }
}
"#
}

/// Inline JavaScript: view lookup, table filling, bar charts
fn inline_javascript() -> &'static str {
    r#"
(function() {
    var views = window.__opViews || [];
    var current = 0;

    function isDark() { return !!(window.matchMedia && window.matchMedia('(prefers-color-scheme: dark)').matches); }

    function fillTable(id, rows, keys) {
        var tbody = document.querySelector('#' + id + ' tbody');
        if (!tbody) return;
        tbody.textContent = '';
        rows.forEach(function(row) {
            var tr = document.createElement('tr');
            keys.forEach(function(key) {
                var td = document.createElement('td');
                td.textContent = row[key];
                tr.appendChild(td);
            });
            tbody.appendChild(tr);
        });
    }

    function drawBarChart(id, series) {
        var el = document.getElementById(id);
        if (!el) return;
        el.width = el.offsetWidth || 480;
        var ctx = el.getContext('2d'), W = el.width, H = el.height;
        ctx.clearRect(0, 0, W, H);
        var pts = (series && series.points) || [];
        if (pts.length === 0) return;

        var lP = 52, rP = 8, tP = 16, bP = 40;
        var cW = W - lP - rP, cH = H - tP - bP;
        var dark = isDark(), fg = dark ? '#9ca3af' : '#6b7280', grd = dark ? '#374151' : '#e5e7eb';
        var color = getComputedStyle(document.documentElement).getPropertyValue('--op-header').trim() || '#006400';
        var mx = 100;
        pts.forEach(function(p) { if (p.value > mx) mx = p.value; });

        ctx.font = '10px system-ui,sans-serif';
        for (var t = 0; t <= 4; t++) {
            var yv = mx * t / 4, yp = tP + cH - (t / 4) * cH;
            ctx.fillStyle = fg; ctx.textAlign = 'right';
            ctx.fillText(yv.toFixed(0), lP - 4, yp + 4);
            ctx.strokeStyle = grd; ctx.lineWidth = 0.5;
            ctx.beginPath(); ctx.moveTo(lP, yp); ctx.lineTo(lP + cW, yp); ctx.stroke();
        }

        var bW = cW / pts.length, gap = Math.max(4, bW * 0.3);
        pts.forEach(function(p, i) {
            var v = Math.max(0, p.value);
            var bh = (v / mx) * cH;
            var bx = lP + i * bW + gap / 2;
            ctx.fillStyle = color;
            ctx.fillRect(bx, tP + cH - bh, bW - gap, bh);
            ctx.fillStyle = dark ? '#f9fafb' : '#111827'; ctx.textAlign = 'center';
            ctx.fillText(p.value.toFixed(1), lP + i * bW + bW / 2, tP + cH - bh - 4);
            ctx.fillStyle = fg;
            ctx.fillText(p.period, lP + i * bW + bW / 2, tP + cH + 14);
        });

        ctx.fillStyle = fg; ctx.textAlign = 'center';
        ctx.fillText(series.x_label, lP + cW / 2, H - 6);
        ctx.save();
        ctx.translate(12, tP + cH / 2); ctx.rotate(-Math.PI / 2);
        ctx.fillText(series.y_label, 0, 0);
        ctx.restore();
    }

    function show(index) {
        current = (index >= 0 && index < views.length) ? index : 0;
        var view = views[current];
        if (!view) return;
        document.body.dataset.status = view.status;
        document.getElementById('op-label').textContent = view.label;
        ['criminal', 'civil'].forEach(function(key) {
            var docket = view[key];
            fillTable('op-' + key + '-metrics', docket.metrics, ['Variable', 'Value']);
            fillTable('op-' + key + '-reasons', docket.reasons, ['Rank', 'Reason', 'Number', 'Percent']);
            drawBarChart('op-' + key + '-ccr', docket.ccr);
        });
    }

    document.addEventListener('DOMContentLoaded', function() {
        var select = document.getElementById('op-judiciary');
        if (!select) return;
        select.addEventListener('change', function() { show(parseInt(this.value, 10)); });
        window.addEventListener('resize', function() { show(current); });
        show(parseInt(select.value, 10));
    });
})();
"#
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
