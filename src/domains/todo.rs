use serde::{Deserialize, Serialize};

/// One row of the `todoItems` table, serialized with the column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "itemDescription")]
    pub item_description: String,
}
