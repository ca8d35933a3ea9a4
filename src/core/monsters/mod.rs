pub mod monster_models;
pub mod monster_service;
pub mod row_reshaper;
pub mod trigger_normalizer;

pub use monster_models::{OutputDocument, SheetGrid, SheetSchema};
pub use monster_service::{
    DocumentWriter, ExportError, MonsterExportService, SheetLocation, SheetSource,
};
