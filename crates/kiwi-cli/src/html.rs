//! Static HTML rates page.
//!
//! [`render_page`] is a pure function of a [`RenderedView`]; the view already
//! carries "now", so the same view always yields the same page.

use std::io::Write;
use std::path::Path;

use kiwi_core::render::{LastChange, RateRow, RenderedView};
use kiwi_core::Timestamp;
use tempfile::NamedTempFile;

const STYLE: &str = r#"        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f5f5;
        }
        h1 {
            color: #333;
            text-align: center;
        }
        .last-updated {
            text-align: center;
            color: #666;
            margin-bottom: 30px;
        }
        .bank-section {
            background: white;
            margin-bottom: 30px;
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        h2 {
            color: #2c5282;
            margin-top: 0;
            border-bottom: 2px solid #2c5282;
            padding-bottom: 10px;
        }
        table {
            width: 100%;
            border-collapse: collapse;
        }
        th {
            background-color: #2c5282;
            color: white;
            padding: 12px;
            text-align: left;
            font-weight: 600;
        }
        td {
            padding: 12px;
            border-bottom: 1px solid #e2e8f0;
        }
        tr:hover {
            background-color: #f7fafc;
        }
        tr.recent-change {
            background-color: #fffbea;
        }
        .rate {
            font-weight: 600;
            color: #2c5282;
        }
        .rate-change-positive {
            color: #c53030;
        }
        .rate-change-negative {
            color: #2f855a;
        }
        .rate-change-neutral {
            color: #718096;
        }
        .new-product-badge {
            display: inline-block;
            margin-left: 6px;
            padding: 2px 6px;
            border-radius: 4px;
            background-color: #2f855a;
            color: white;
            font-size: 0.75em;
            font-weight: 700;
        }
        .days-ago {
            color: #718096;
            font-size: 0.9em;
        }
        .bank-dates {
            margin-top: 12px;
            color: #666;
            font-size: 0.9em;
        }
        .empty {
            text-align: center;
            color: #666;
        }
"#;

/// Escapes text for HTML element content and attribute values.
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

fn date(ts: Timestamp) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Global summary text, e.g. `2025-12-10 (5 days ago)`.
pub fn last_change_label(last_change: &LastChange) -> String {
    match last_change {
        LastChange::Changed { at, days_ago } => format!("{} ({days_ago} days ago)", date(*at)),
        LastChange::NoChanges => "No changes detected".to_string(),
    }
}

fn render_row(out: &mut String, row: &RateRow) {
    if row.is_recent_change {
        out.push_str("                <tr class=\"recent-change\">\n");
    } else {
        out.push_str("                <tr>\n");
    }

    let badge = if row.is_new_product {
        " <span class=\"new-product-badge\">NEW</span>"
    } else {
        ""
    };
    out.push_str(&format!(
        "                    <td>{}{badge}</td>\n",
        escape(&row.product_name)
    ));
    out.push_str(&format!("                    <td>{}</td>\n", escape(&row.term)));
    out.push_str(&format!(
        "                    <td class=\"rate\">{}%</td>\n",
        row.rate_display()
    ));
    out.push_str(&format!(
        "                    <td class=\"{}\">({})</td>\n",
        row.direction.css_class(),
        escape(&row.delta_display())
    ));
    out.push_str(&format!(
        "                    <td>{} <span class=\"days-ago\">({} days ago)</span></td>\n",
        date(row.updated_at),
        row.days_since_update
    ));
    out.push_str("                </tr>\n");
}

/// Renders the full page.
pub fn render_page(view: &RenderedView) -> String {
    let mut out = String::new();
    out.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
         <title>Kiwi Rates - NZ Home Loan Rates</title>\n    <style>\n",
    );
    out.push_str(STYLE);
    out.push_str("    </style>\n</head>\n<body>\n    <h1>Kiwi Rates</h1>\n");
    out.push_str(&format!(
        "    <p class=\"last-updated\">Last rate change: {}</p>\n",
        escape(&last_change_label(&view.last_change))
    ));

    if view.is_empty() {
        out.push_str("    <p class=\"empty\">No rate data available.</p>\n");
    }

    let generated = view.now.format("%Y-%m-%d %H:%M:%S").to_string();
    for bank in view.banks.iter().filter(|b| !b.rows.is_empty()) {
        out.push_str("\n    <div class=\"bank-section\">\n");
        out.push_str(&format!(
            "        <h2>{}</h2>\n",
            escape(&bank.bank.display_name())
        ));
        out.push_str(
            "        <table>\n            <thead>\n                <tr>\n                    \
             <th>Product</th>\n                    <th>Term</th>\n                    \
             <th>Rate</th>\n                    <th>Change</th>\n                    \
             <th>Last Updated</th>\n                </tr>\n            </thead>\n            \
             <tbody>\n",
        );
        for row in &bank.rows {
            render_row(&mut out, row);
        }
        out.push_str("            </tbody>\n        </table>\n");

        let reported = bank
            .bank_last_updated
            .map_or_else(|| "Not reported".to_string(), date);
        out.push_str(&format!(
            "        <div class=\"bank-dates\">\n            \
             <p>Bank last updated: {}</p>\n            \
             <p>Page generated: {generated}</p>\n        </div>\n",
            escape(&reported)
        ));
        out.push_str("    </div>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Writes the page atomically, creating parent directories.
pub fn write_page(path: &Path, html: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(html.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
