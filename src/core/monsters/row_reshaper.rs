use thiserror::Error;

use super::monster_models::{MonsterRow, ReshapedRow, SheetSchema};

/// Data in the sheet does not match the expected schema.
///
/// Row numbers are spreadsheet rows, so the header is row 1.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Sheet has no header row")]
    MissingHeader,
    #[error("Header is missing required column '{0}'")]
    MissingColumn(String),
    #[error("Row {row} has {cells} cells but the header only has {columns}")]
    RowTooWide {
        row: usize,
        cells: usize,
        columns: usize,
    },
    #[error("Row {row} is missing a value for '{column}'")]
    MissingField { row: usize, column: String },
    #[error("Row {row} has non-numeric '{column}' value '{value}'")]
    InvalidType {
        row: usize,
        column: String,
        value: String,
    },
}

/// Positions of the schema columns inside the header row.
struct ColumnLayout {
    name: usize,
    role: usize,
    kind: usize,
    triggers: Vec<usize>,
    width: usize,
}

impl ColumnLayout {
    fn from_header(header: &[String], schema: &SheetSchema) -> Result<Self, SchemaError> {
        let find = |column: &str| {
            header
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| SchemaError::MissingColumn(column.to_string()))
        };

        let name = find(&schema.name_column)?;
        let role = find(&schema.role_column)?;
        let kind = find(&schema.type_column)?;
        find(&schema.id_column)?;

        let triggers = header
            .iter()
            .enumerate()
            .filter(|(_, h)| !schema.is_reserved(h))
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            name,
            role,
            kind,
            triggers,
            width: header.len(),
        })
    }
}

/// Splits the grid into one [`ReshapedRow`] per data row.
///
/// Rows shorter than the header have absent trailing cells. Rows with no
/// content at all are skipped.
pub fn reshape_rows(
    grid: &[Vec<String>],
    schema: &SheetSchema,
) -> Result<Vec<ReshapedRow>, SchemaError> {
    let (header, data) = grid.split_first().ok_or(SchemaError::MissingHeader)?;
    let layout = ColumnLayout::from_header(header, schema)?;

    let mut rows = Vec::with_capacity(data.len());
    for (index, cells) in data.iter().enumerate() {
        // +1 for 1-based rows, +1 for the header.
        let row_number = index + 2;

        if cells.len() > layout.width {
            return Err(SchemaError::RowTooWide {
                row: row_number,
                cells: cells.len(),
                columns: layout.width,
            });
        }

        if cells.iter().all(|c| c.trim().is_empty()) {
            tracing::warn!("Skipping blank row {}", row_number);
            continue;
        }

        rows.push(reshape_row(cells, row_number, &layout, schema)?);
    }

    Ok(rows)
}

fn reshape_row(
    cells: &[String],
    row_number: usize,
    layout: &ColumnLayout,
    schema: &SheetSchema,
) -> Result<ReshapedRow, SchemaError> {
    let cell = |i: usize| cells.get(i).map(String::as_str);

    let required = |i: usize, column: &str| {
        cell(i)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SchemaError::MissingField {
                row: row_number,
                column: column.to_string(),
            })
    };

    let name = required(layout.name, &schema.name_column)?.to_string();
    let role = required(layout.role, &schema.role_column)?.to_string();
    let raw_kind = required(layout.kind, &schema.type_column)?;
    let kind = raw_kind
        .trim()
        .parse::<i64>()
        .map_err(|_| SchemaError::InvalidType {
            row: row_number,
            column: schema.type_column.clone(),
            value: raw_kind.to_string(),
        })?;

    let trigger_bag = layout
        .triggers
        .iter()
        .filter_map(|&i| cell(i))
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.to_lowercase())
        .collect();

    Ok(ReshapedRow {
        monster: MonsterRow { name, role, kind },
        trigger_bag,
    })
}
