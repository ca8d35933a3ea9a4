use serde::{Deserialize, Serialize};

/// Raw cell grid as returned by the spreadsheet. Row 0 is the header.
pub type SheetGrid = Vec<Vec<String>>;

/// Column names the export depends on. Every other column is a trigger column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSchema {
    pub name_column: String,
    pub role_column: String,
    pub type_column: String,
    pub id_column: String,
}

impl SheetSchema {
    /// Returns true for columns that never feed the trigger bag.
    pub fn is_reserved(&self, column: &str) -> bool {
        column == self.name_column
            || column == self.role_column
            || column == self.type_column
            || column == self.id_column
    }
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self {
            name_column: "name".to_string(),
            role_column: "role".to_string(),
            type_column: "type".to_string(),
            id_column: "id".to_string(),
        }
    }
}

/// Fixed projection of one data row, before triggers are normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterRow {
    pub name: String,
    pub role: String,
    pub kind: i64,
}

/// One reshaped row: the fixed projection plus its raw trigger bag.
///
/// The bag is already lower-cased and free of absent or blank cells, in
/// header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReshapedRow {
    pub monster: MonsterRow,
    pub trigger_bag: Vec<String>,
}

/// A monster as it appears in the output document.
///
/// Field order matters: it is the key order of the serialized object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterCommand {
    pub triggers: Vec<String>,
    pub name: String,
    pub role: String,
    #[serde(rename = "type")]
    pub kind: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeLabel {
    pub id: i64,
    pub label: String,
}

impl TypeLabel {
    /// The static rarity table. Never derived from sheet data.
    pub fn defaults() -> Vec<TypeLabel> {
        vec![
            TypeLabel {
                id: 1,
                label: "Legendary".to_string(),
            },
            TypeLabel {
                id: 0,
                label: "Rare".to_string(),
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub types: Vec<TypeLabel>,
    pub commands: Vec<MonsterCommand>,
}

impl OutputDocument {
    /// Merges the static type table with the commands, keeping row order.
    pub fn assemble(commands: Vec<MonsterCommand>) -> Self {
        Self {
            types: TypeLabel::defaults(),
            commands,
        }
    }

    pub fn trigger_count(&self) -> usize {
        self.commands.iter().map(|c| c.triggers.len()).sum()
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub commands: usize,
    pub triggers: usize,
}
