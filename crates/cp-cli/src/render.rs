//! Terminal tables for command output

use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use cp_models::{Roster, TaskInstance};
use cp_schedule::{GridCell, GridRow, Utilization, WorkloadGrid};

use crate::commands::{OccurrenceReport, WorkloadReport};

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn utilization_color(utilization: Utilization) -> Color {
    match utilization {
        Utilization::Overloaded => Color::Red,
        Utilization::Optimal => Color::Green,
        Utilization::UnderUtilized => Color::Yellow,
    }
}

fn assignee_name(instance: &TaskInstance, roster: &Roster) -> String {
    match instance.assigned_employee_id {
        Some(id) => roster
            .get(id)
            .map(|employee| employee.name.clone())
            .unwrap_or_else(|| id.to_string()),
        None => "-".to_string(),
    }
}

fn day_label(date: NaiveDate, date_format: &str) -> String {
    format!("{} {}", date.format("%a"), date.format(date_format))
}

pub fn occurrences_table(report: &OccurrenceReport, roster: &Roster, date_format: &str) -> Table {
    let mut table = new_table();
    table.set_header(header(&["Date", "Hours", "Assignee", "Kind"]));

    for instance in &report.instances {
        let kind = if instance.is_exception() {
            Cell::new("exception").fg(Color::Cyan)
        } else if instance.is_recurring_instance() {
            Cell::new("recurring")
        } else {
            Cell::new("one-off")
        };
        table.add_row(vec![
            Cell::new(day_label(instance.instance_date, date_format)),
            Cell::new(format!("{:.1}", instance.estimated_time)),
            Cell::new(assignee_name(instance, roster)),
            kind,
        ]);
    }

    table
}

fn workload_cells(cell: &GridCell) -> Vec<Cell> {
    let color = utilization_color(cell.utilization);
    vec![
        Cell::new(format!("{:.1}", cell.workload.hours)),
        Cell::new(format!("{:.1}", cell.workload.capacity)),
        Cell::new(format!("{:.0}%", cell.workload.percentage)).fg(color),
        Cell::new(cell.utilization).fg(color),
    ]
}

pub fn workload_table(report: &WorkloadReport, date_format: &str) -> Table {
    let mut table = new_table();
    table.set_header(header(&["Date", "Hours", "Capacity", "Load", "Status"]));

    for cell in &report.row.cells {
        let mut row = vec![Cell::new(day_label(cell.date, date_format))];
        row.extend(workload_cells(cell));
        table.add_row(row);
    }

    let summary = report.row.summary();
    let total = GridCell {
        date: report.range.end,
        workload: summary,
        utilization: summary.utilization(),
    };
    let mut row = vec![Cell::new("Total").add_attribute(Attribute::Bold)];
    row.extend(workload_cells(&total));
    table.add_row(row);

    table
}

fn grid_row(row: &GridRow) -> Vec<Cell> {
    let mut cells = vec![Cell::new(&row.label)];
    cells.extend(row.cells.iter().map(|cell| {
        let text = if cell.workload.capacity > 0.0 {
            format!("{:.1}/{:.1}", cell.workload.hours, cell.workload.capacity)
        } else {
            format!("{:.1}", cell.workload.hours)
        };
        Cell::new(text).fg(utilization_color(cell.utilization))
    }));
    cells.push(Cell::new(format!("{}", row.overloaded_days())));
    cells
}

/// Employees down, dates across, each cell `hours/capacity`
pub fn grid_table(grid: &WorkloadGrid, date_format: &str) -> Table {
    let mut table = new_table();

    let mut titles = vec![Cell::new("Employee").add_attribute(Attribute::Bold)];
    titles.extend(
        grid.range
            .days()
            .map(|date| Cell::new(day_label(date, date_format)).add_attribute(Attribute::Bold)),
    );
    titles.push(Cell::new("Overloaded").add_attribute(Attribute::Bold));
    table.set_header(titles);

    for row in &grid.rows {
        table.add_row(grid_row(row));
    }
    let mut team = grid_row(&grid.team);
    if let Some(label) = team.first_mut() {
        *label = Cell::new(&grid.team.label).add_attribute(Attribute::Bold);
    }
    table.add_row(team);

    table
}
