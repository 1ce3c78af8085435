//! Employee x date workload matrix

use chrono::NaiveDate;
use cp_core::calendar::DateRange;
use cp_core::config::LimitsConfig;
use cp_core::result::PlanResult;
use cp_core::traits::Id;
use cp_models::{Roster, Task};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::expander::instances_for_date;
use crate::workload::{daily_workload, total, DailyWorkload, Utilization};

/// One calendar cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub workload: DailyWorkload,
    pub utilization: Utilization,
}

/// One employee (or the team) across the grid's dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    /// `None` for the team row
    pub employee_id: Option<Id>,
    pub label: String,
    pub cells: Vec<GridCell>,
}

impl GridRow {
    pub fn total_hours(&self) -> f64 {
        total(self.cells.iter().map(|c| c.workload.hours))
    }

    pub fn total_capacity(&self) -> f64 {
        total(self.cells.iter().map(|c| c.workload.capacity))
    }

    pub fn overloaded_days(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.utilization == Utilization::Overloaded)
            .count()
    }

    /// Utilization of the whole row
    pub fn summary(&self) -> DailyWorkload {
        DailyWorkload::new(self.total_hours(), self.total_capacity())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadGrid {
    pub range: DateRange,
    pub rows: Vec<GridRow>,
    pub team: GridRow,
}

impl WorkloadGrid {
    /// Compute every cell of `range` for each roster employee and the team
    #[instrument(skip_all, fields(range = %range, tasks = tasks.len(), employees = roster.len()))]
    pub fn build(
        range: DateRange,
        tasks: &[Task],
        roster: &Roster,
        limits: &LimitsConfig,
    ) -> PlanResult<Self> {
        limits.check_range(range)?;

        let mut rows: Vec<GridRow> = roster
            .iter()
            .map(|employee| GridRow {
                employee_id: Some(employee.id),
                label: employee.name.clone(),
                cells: Vec::new(),
            })
            .collect();
        let mut team = GridRow {
            employee_id: None,
            label: "Team".to_string(),
            cells: Vec::new(),
        };

        for date in range.days() {
            let instances = instances_for_date(tasks, date, roster);
            for row in rows.iter_mut() {
                let workload = daily_workload(date, &instances, roster, row.employee_id);
                row.cells.push(cell(date, workload));
            }
            team.cells
                .push(cell(date, daily_workload(date, &instances, roster, None)));
        }

        debug!(overloaded_team_days = team.overloaded_days(), "Workload grid built");
        Ok(Self { range, rows, team })
    }

    pub fn row(&self, employee_id: Id) -> Option<&GridRow> {
        self.rows.iter().find(|r| r.employee_id == Some(employee_id))
    }
}

fn cell(date: NaiveDate, workload: DailyWorkload) -> GridCell {
    GridCell {
        date,
        workload,
        utilization: workload.utilization(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use cp_core::calendar::WeekdaySet;
    use cp_core::config::PlannerConfig;
    use cp_models::{Employee, WeeklyRule};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grid_for_one_week() {
        let ada = Employee::new(Uuid::new_v4(), "Ada", 40.0);
        let bob = Employee::new(Uuid::new_v4(), "Bob", 40.0);
        let roster = Roster::new(vec![ada.clone(), bob.clone()]);

        let week = DateRange::new(date(2024, 2, 5), date(2024, 2, 11)).unwrap();
        let migration = Task::once(Uuid::new_v4(), "Migration", DateRange::new(date(2024, 2, 5), date(2024, 2, 9)).unwrap(), 40.0)
            .assigned_to(ada.id);
        let standup = Task::weekly(
            Uuid::new_v4(),
            "Standup",
            week,
            WeeklyRule::new(WeekdaySet::from_days([Weekday::Mon]), 2.0),
        )
        .assigned_to(ada.id);

        let grid = WorkloadGrid::build(week, &[migration, standup], &roster, &PlannerConfig::default().limits).unwrap();

        let ada_row = grid.row(ada.id).unwrap();
        assert_eq!(ada_row.cells.len(), 7);
        assert_eq!(ada_row.cells[0].workload.hours, 10.0);
        assert_eq!(ada_row.cells[0].utilization, Utilization::Overloaded);
        assert_eq!(ada_row.cells[2].utilization, Utilization::Optimal);
        assert_eq!(ada_row.cells[5].workload, DailyWorkload::ZERO);
        assert_eq!(ada_row.total_hours(), 42.0);
        assert_eq!(ada_row.overloaded_days(), 1);

        let bob_row = grid.row(bob.id).unwrap();
        assert_eq!(bob_row.total_hours(), 0.0);
        assert_eq!(bob_row.total_capacity(), 40.0);

        assert_eq!(grid.team.total_hours(), 42.0);
        assert_eq!(grid.team.total_capacity(), 80.0);
        assert_eq!(grid.team.summary().utilization(), Utilization::Optimal);
    }

    #[test]
    fn test_range_limit() {
        let mut limits = PlannerConfig::default().limits;
        limits.max_range_days = 7;
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 8)).unwrap();
        let err = WorkloadGrid::build(range, &[], &Roster::default(), &limits).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_cells_serialize_flat() {
        let grid = WorkloadGrid::build(
            DateRange::single(date(2024, 1, 1)),
            &[],
            &Roster::default(),
            &PlannerConfig::default().limits,
        )
        .unwrap();
        let json = serde_json::to_value(&grid.team.cells[0]).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["percentage"], 0.0);
        assert_eq!(json["utilization"], "under-utilized");
    }
}
