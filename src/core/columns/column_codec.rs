use thiserror::Error;

/// Errors raised by the column label codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColumnError {
    #[error("column index must be positive, got {0}")]
    InvalidIndex(i64),
    #[error("invalid column label: {0:?}")]
    InvalidLabel(String),
}

/// Converts a 1-based column index to its spreadsheet label
/// (A, B, …, Z, AA, AB, …).
///
/// Columns follow bijective base-26 numbering: there is no zero digit, so
/// Z (26) is followed by AA (27), not BA.
pub fn column_label(index: i64) -> Result<String, ColumnError> {
    if index <= 0 {
        return Err(ColumnError::InvalidIndex(index));
    }

    let mut idx = index;
    let mut letters = Vec::new();
    while idx > 0 {
        let letter_index = ((idx - 1) % 26) as u8;
        letters.push(b'A' + letter_index);
        idx = (idx - 1) / 26;
    }
    // Digits come out least-significant first.
    letters.reverse();

    // Letters are ASCII uppercase by construction.
    Ok(String::from_utf8(letters).unwrap_or_default())
}

/// Labels for columns 1 through `count`, in order.
///
/// A zero count yields an empty list; a negative count is an error.
pub fn column_labels(count: i64) -> Result<Vec<String>, ColumnError> {
    if count < 0 {
        return Err(ColumnError::InvalidIndex(count));
    }
    (1..=count).map(column_label).collect()
}

/// Inverse of [`column_label`]: A=1, Z=26, AA=27, …
pub fn column_index(label: &str) -> Result<i64, ColumnError> {
    if label.is_empty() {
        return Err(ColumnError::InvalidLabel(label.to_string()));
    }

    let mut index = 0i64;
    for c in label.chars() {
        if !c.is_ascii_uppercase() {
            return Err(ColumnError::InvalidLabel(label.to_string()));
        }
        // Labels past 13 letters exceed i64; treat them as invalid rather
        // than overflowing.
        index = index
            .checked_mul(26)
            .and_then(|v| v.checked_add(c as i64 - 'A' as i64 + 1))
            .ok_or_else(|| ColumnError::InvalidLabel(label.to_string()))?;
    }
    Ok(index)
}
