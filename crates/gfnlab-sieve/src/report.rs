//! Human-readable renderings of a [`GfnReport`].
//!
//! Three flavours: the on-page step-by-step HTML, the HTML email body with
//! an observation table and an inline chart, and a plain-text version used
//! as the email's text part. None of them computes anything new.

use std::fmt::Write;

use crate::calculator::GfnReport;

/// Render a measured value the way the report prints it: shortest
/// round-trip form, integral values keep a trailing `.0` (`500.0`, `45.3`).
/// Very small or large magnitudes use a signed, two-digit exponent
/// (`1e-05`, `1e+16`).
pub fn fmt_num(value: f64) -> String {
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Sieve numbers are whole in practice and print without a fraction.
pub fn fmt_factor(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        fmt_num(value)
    }
}

/// Step-by-step explanation shown under the form.
pub fn steps_html(report: &GfnReport) -> String {
    let mut out = String::new();
    out.push_str("<strong>Formula:</strong><br>");
    out.push_str("P(%) = (Weight Retained / Total Weight) × 100<br>");
    out.push_str("P × F = P% × Sieve Factor<br><br>");
    out.push_str("<strong>Step-by-Step Calculations:</strong><br>");
    let _ = write!(out, "Total Weight = {}g<br><br>", fmt_num(report.total_weight));

    for r in &report.records {
        let _ = write!(
            out,
            "Sieve No. {}:<br>- Weight Retained = {}g<br>- P(%) = {}%<br>- P × F = {}<br><br>",
            fmt_factor(r.factor),
            fmt_num(r.weight),
            fmt_num(r.percentage),
            fmt_num(r.weighted_product),
        );
    }

    let total_pf = fmt_num(report.total_pf);
    let _ = write!(out, "<strong>Σ(P × F) = {total_pf}</strong><br>");
    let _ = write!(
        out,
        "<strong>GFN = Σ(P × F) / 100 = {total_pf} / 100 = <span class=\"gfn-value\">{}</span></strong><br>",
        fmt_num(report.gfn)
    );
    out
}

/// HTML email body. `chart_cid` is the content id of the inline chart.
pub fn email_html(report: &GfnReport, chart_cid: &str, signature: &str) -> String {
    let mut out = String::from(
        r#"<h2>Observation Table</h2>
<table border="1" cellpadding="6" cellspacing="0">
<tr><th>Sieve No.</th><th>Weight (g)</th><th>P (%)</th><th>P × F</th></tr>
"#,
    );
    for r in &report.records {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            fmt_factor(r.factor),
            fmt_num(r.weight),
            fmt_num(r.percentage),
            fmt_num(r.weighted_product),
        );
    }
    out.push_str("</table><br><h2>Calculation Explanation</h2>\n");

    let total = fmt_num(report.total_weight);
    let _ = writeln!(out, "<p>Total Weight = {total}g</p>");

    for r in &report.records {
        let (f, w, p, pf) = (
            fmt_factor(r.factor),
            fmt_num(r.weight),
            fmt_num(r.percentage),
            fmt_num(r.weighted_product),
        );
        let _ = writeln!(
            out,
            "<p><strong>Sieve {f}:</strong><br>\n\
             Weight Retained = {w}g<br>\n\
             P(%) = ({w} / {total}) × 100 = {p}%<br>\n\
             P × F = {p} × {f} = {pf}</p>"
        );
    }

    let _ = write!(
        out,
        "<p><strong>Σ(P × F) = {}</strong><br>\n\
         <strong>GFN = {}</strong></p>\n\
         <h2>Graph:</h2>\n\
         <img src=\"cid:{chart_cid}\" alt=\"Sieve Analysis Graph\"><br><br>\n\
         Regards,<br>{signature}\n",
        fmt_num(report.total_pf),
        fmt_num(report.gfn),
    );
    out
}

/// Line-oriented explanation.
pub fn plain_text(report: &GfnReport) -> String {
    let mut out = String::new();
    out.push_str("Formula:\n");
    out.push_str("  P(%) = (Weight Retained / Total Weight) × 100\n");
    out.push_str("  P × F = P% × Sieve Factor\n\n");
    let _ = writeln!(out, "Total Weight = {}g\n", fmt_num(report.total_weight));

    for r in &report.records {
        let _ = writeln!(
            out,
            "Sieve No. {}: weight {}g, P = {}%, P × F = {}",
            fmt_factor(r.factor),
            fmt_num(r.weight),
            fmt_num(r.percentage),
            fmt_num(r.weighted_product),
        );
    }

    let total_pf = fmt_num(report.total_pf);
    let _ = writeln!(out, "\nΣ(P × F) = {total_pf}");
    let _ = writeln!(out, "GFN = Σ(P × F) / 100 = {total_pf} / 100 = {}", fmt_num(report.gfn));
    out
}
