//! Column visibility for the energy-records table.

use ei_core::EnergyRecord;
use ei_core::format::{format_cost, format_date, format_energy};

/// Columns the energy table knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Id,
    Date,
    Sector,
    Location,
    EnergyConsumed,
    Cost,
    CreatedBy,
    CreatedAt,
}

impl ColumnKind {
    /// Cell text for `record` in this column.
    pub fn value(self, record: &EnergyRecord) -> String {
        match self {
            ColumnKind::Id => record.id.clone(),
            ColumnKind::Date => format_date(&record.date),
            ColumnKind::Sector => record.sector.clone(),
            ColumnKind::Location => record.location.clone(),
            ColumnKind::EnergyConsumed => format_energy(record.energy_consumed),
            ColumnKind::Cost => format_cost(record.cost),
            ColumnKind::CreatedBy => record.created_by.clone(),
            ColumnKind::CreatedAt => format_date(&record.created_at),
        }
    }

    /// Long identifiers get the full value as a hover tooltip.
    pub fn has_tooltip(self) -> bool {
        matches!(self, ColumnKind::Id | ColumnKind::CreatedBy)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub kind: ColumnKind,
    pub label: &'static str,
    pub width: f32,
    pub visible: bool,
    pub required: bool,
}

impl ColumnDescriptor {
    const fn new(kind: ColumnKind, label: &'static str, width: f32) -> Self {
        Self {
            kind,
            label,
            width,
            visible: true,
            required: false,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

pub fn default_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new(ColumnKind::Id, "ID", 250.0).required(),
        ColumnDescriptor::new(ColumnKind::Date, "Date", 120.0),
        ColumnDescriptor::new(ColumnKind::Sector, "Sector", 100.0),
        ColumnDescriptor::new(ColumnKind::Location, "Location", 150.0),
        ColumnDescriptor::new(ColumnKind::EnergyConsumed, "Consumed", 140.0),
        ColumnDescriptor::new(ColumnKind::Cost, "Cost", 100.0),
        ColumnDescriptor::new(ColumnKind::CreatedBy, "Created By", 250.0),
        ColumnDescriptor::new(ColumnKind::CreatedAt, "Created At", 140.0),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self {
            columns: default_columns(),
        }
    }
}

impl ColumnSet {
    pub fn all(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn visible(&self) -> impl Iterator<Item = &ColumnDescriptor> + '_ {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    pub fn is_visible(&self, kind: ColumnKind) -> bool {
        self.columns.iter().any(|c| c.kind == kind && c.visible)
    }

    /// Case-insensitive lookup by header label.
    pub fn kind_for_label(&self, label: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|c| c.label.eq_ignore_ascii_case(label.trim()))
            .map(|c| c.kind)
    }

    /// Flip visibility of `kind`. Required columns are left alone.
    pub fn toggle(&mut self, kind: ColumnKind) {
        if let Some(column) = self
            .columns
            .iter_mut()
            .find(|c| c.kind == kind && !c.required)
        {
            column.visible = !column.visible;
        }
    }

    pub fn reset(&mut self) {
        self.columns = default_columns();
    }
}
