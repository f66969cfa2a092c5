use crate::errors::AppResult;
use crate::models::Record;
use polars::prelude::*;
use std::collections::HashMap;

/// Converts records into a DataFrame of nullable string columns.
///
/// The column set is the union of all record keys, in order of first
/// appearance across the records. A record missing a field gets a null in
/// that column. No index column is added.
///
/// Records with no fields at all produce no columns, so a collection made only
/// of empty records yields a zero-width frame.
pub fn records_to_dataframe(records: Vec<Record>) -> AppResult<DataFrame> {
    let height = records.len();
    let mut names: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<Vec<Option<String>>> = Vec::new();

    for (row, record) in records.into_iter().enumerate() {
        for (name, value) in record.into_fields() {
            let index = match positions.get(&name) {
                Some(&index) => index,
                None => {
                    let index = names.len();
                    positions.insert(name.clone(), index);
                    names.push(name);
                    columns.push(vec![None; height]);
                    index
                }
            };
            columns[index][row] = value;
        }
    }

    let series: Vec<Series> = names
        .iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name, values))
        .collect();

    Ok(DataFrame::new(series)?)
}
