//! Overview table: one row per aggregated template.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use qctrend_model::{DashSettings, ModalityCollection, NewestDate};

pub fn print_overview(collection: &ModalityCollection, settings: &DashSettings) {
    println!("{}", settings.header);

    let mut table = Table::new();
    table.set_header(
        (0..5)
            .map(|index| header_cell(settings.table_headers.get(index)))
            .collect::<Vec<_>>(),
    );
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if let Some(column) = table.column_mut(3) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    for (modality, templates) in collection.iter() {
        for template in templates {
            table.add_row(vec![
                Cell::new(modality),
                Cell::new(&template.label),
                date_cell(template.newest_date),
                days_cell(template.days_since, settings.days_since_limit),
                Cell::new(template.status),
            ]);
        }
    }
    println!("{table}");
    println!(
        "Last update {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
}

fn header_cell(text: Option<&String>) -> Cell {
    Cell::new(text.map(String::as_str).unwrap_or(""))
        .add_attribute(Attribute::Bold)
}

fn date_cell(newest_date: NewestDate) -> Cell {
    match newest_date {
        NewestDate::Date(_) => Cell::new(newest_date),
        NewestDate::Error => Cell::new(newest_date).fg(Color::Red),
    }
}

/// Stale templates (elapsed days at or past the limit) and the unknown
/// sentinel are highlighted.
fn days_cell(days_since: i64, days_since_limit: i64) -> Cell {
    let cell = Cell::new(days_since);
    if days_since >= days_since_limit || days_since < 0 {
        cell.fg(Color::Red)
    } else {
        cell
    }
}
