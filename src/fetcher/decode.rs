//! Row → word record decoding

use crate::compiler::COLUMNS;
use crate::model::{Attribute, WordRecord};
use crate::sql::SqlValue;
use crate::store::Row;

/// Decode one row in projection order, enforcing the record invariants
pub fn decode_row(row: &Row) -> Result<WordRecord, String> {
    if row.len() != COLUMNS.len() {
        return Err(format!(
            "expected {} columns, got {}",
            COLUMNS.len(),
            row.len()
        ));
    }

    let text = match row.get(0) {
        Some(SqlValue::Text(text)) => text.clone(),
        Some(other) => return Err(format!("text: expected text, got {}", other.type_name())),
        None => return Err("text: missing".to_string()),
    };

    let mut word = WordRecord::new(text);
    for attr in Attribute::ALL {
        let column = attr.index() + 1;
        match row.get(column) {
            Some(SqlValue::Integer(value)) => *word.score_mut(attr) = *value,
            Some(other) => {
                return Err(format!(
                    "{}: expected integer, got {}",
                    COLUMNS[column],
                    other.type_name()
                ))
            }
            None => return Err(format!("{}: missing", COLUMNS[column])),
        }
    }

    word.check()?;
    Ok(word)
}
