use colored::Colorize;
use recast::error::Result;
use recast::table::Table;
use recast::value::{Shape, Value};
use unicode_width::UnicodeWidthStr;

const COLUMN_GAP: &str = "  ";
const ASC_MARKER: &str = "▲";
const DESC_MARKER: &str = "▼";

/// Scalars print as text, containers and records as compact JSON.
fn cell_text(value: &Value) -> String {
    match value.shape() {
        Shape::Scalar => value.to_text(),
        _ => serde_json::to_string(value).unwrap_or_else(|_| value.to_text()),
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

pub fn print_value(value: &Value) {
    println!("{}", cell_text(value));
}

pub fn print_pairs(pairs: &[(Value, Value)]) {
    if pairs.is_empty() {
        println!("No records found.");
        return;
    }
    let keys: Vec<String> = pairs.iter().map(|(k, _)| cell_text(k)).collect();
    let width = keys.iter().map(|k| k.width()).max().unwrap_or(0);
    for (key, (_, value)) in keys.iter().zip(pairs) {
        println!("{}{}{}", pad(key, width).yellow(), COLUMN_GAP, cell_text(value));
    }
}

pub fn print_table(table: &Table) -> Result<()> {
    let columns = table.columns();
    let asc = table.asc_name();

    let headers: Vec<String> = columns
        .iter()
        .map(|c| {
            let order = c.sort_order();
            if order.is_empty() {
                return c.title();
            }
            let marker = if order == asc {
                ASC_MARKER
            } else {
                DESC_MARKER
            };
            format!("{} {}", c.title(), marker)
        })
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in table.rows() {
        row?;
        let cells = columns.values()?;
        rows.push(cells.iter().map(cell_text).collect());
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.width())
                .chain(std::iter::once(h.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    println!("{}", header_line.join(COLUMN_GAP).trim_end().bold());

    if rows.is_empty() {
        println!("{}", "No records found.".dimmed());
    }
    for row in &rows {
        let line: Vec<String> = row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        println!("{}", line.join(COLUMN_GAP).trim_end());
    }

    let classes = table.css_classes();
    if !classes.is_empty() {
        println!("\n{} {}", "class:".dimmed(), classes.join(" "));
    }

    if table.request().is_some() || table.has_link_builder() {
        println!();
        let title_width = columns.iter().map(|c| c.title().width()).max().unwrap_or(0);
        for column in &columns {
            let href = column.sort_href()?;
            println!("{}{}{}", pad(&column.title(), title_width).cyan(), COLUMN_GAP, href);
        }
    }
    Ok(())
}
