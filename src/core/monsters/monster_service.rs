// The export pipeline: fetch rows, reshape them, normalize each trigger bag,
// assemble the document and hand it to the writer.
//
// Everything here works on plain strings and structs. The HTTP client and
// the file writer live in infra and plug in through the two traits below,
// which keeps the whole run testable with in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

use super::monster_models::{
    ExportSummary, MonsterCommand, OutputDocument, SheetGrid, SheetSchema,
};
use super::row_reshaper::{reshape_rows, SchemaError};
use super::trigger_normalizer::normalize_triggers;

/// Errors that abort an export run. None of them leave partial output.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Failed to fetch sheet: {0}")]
    Fetch(String),
    #[error("Sheet does not match the expected schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("Failed to write output: {0}")]
    Write(String),
}

/// Where the rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLocation {
    pub spreadsheet_id: String,
    pub range: String,
}

/// Source of raw spreadsheet rows.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_rows(&self, location: &SheetLocation) -> Result<SheetGrid, ExportError>;
}

/// Sink for the finished document. Must write all targets or none.
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    async fn write_document(&self, document: &OutputDocument) -> Result<(), ExportError>;
}

/// Reshapes the grid, normalizes every row's triggers and assembles the document.
pub fn build_document(
    grid: &[Vec<String>],
    schema: &SheetSchema,
) -> Result<OutputDocument, SchemaError> {
    let rows = reshape_rows(grid, schema)?;

    let commands = rows
        .into_iter()
        .map(|row| {
            let triggers = normalize_triggers(&row.trigger_bag);
            tracing::debug!(
                "{}: {} raw trigger(s) -> {} normalized",
                row.monster.name,
                row.trigger_bag.len(),
                triggers.len()
            );
            MonsterCommand {
                triggers,
                name: row.monster.name,
                role: row.monster.role,
                kind: row.monster.kind,
            }
        })
        .collect();

    Ok(OutputDocument::assemble(commands))
}

pub struct MonsterExportService<S: SheetSource, W: DocumentWriter> {
    source: S,
    writer: W,
    location: SheetLocation,
    schema: SheetSchema,
}

impl<S, W> MonsterExportService<S, W>
where
    S: SheetSource,
    W: DocumentWriter,
{
    pub fn new(source: S, writer: W, location: SheetLocation, schema: SheetSchema) -> Self {
        Self {
            source,
            writer,
            location,
            schema,
        }
    }

    /// Runs the whole export once.
    pub async fn run(&self) -> Result<ExportSummary, ExportError> {
        tracing::info!(
            "Loading data from spreadsheet {} ({})",
            self.location.spreadsheet_id,
            self.location.range
        );
        let grid = self.source.fetch_rows(&self.location).await?;
        tracing::info!("Fetched {} row(s) including header", grid.len());

        tracing::info!("Transforming data");
        let document = build_document(&grid, &self.schema)?;

        let summary = ExportSummary {
            commands: document.commands.len(),
            triggers: document.trigger_count(),
        };

        tracing::info!("Saving output");
        self.writer.write_document(&document).await?;

        Ok(summary)
    }
}
