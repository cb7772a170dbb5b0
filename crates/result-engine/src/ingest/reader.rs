use super::normalizer::normalize_header;
use super::record::{CellValue, MarkRecord, MarkSheet};
use super::IngestError;
use std::io::Read;

/// Decodes a CSV mark sheet into header-ordered rows. Missing trailing cells become blanks.
pub(crate) fn read_sheet<R: Read>(reader: R) -> Result<MarkSheet, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(|header| header.is_empty()) {
        return Err(IngestError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row: MarkRecord = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let cell = record
                    .get(index)
                    .map(CellValue::from_raw)
                    .unwrap_or(CellValue::Blank);
                (header.clone(), cell)
            })
            .collect();
        rows.push(row);
    }

    Ok(MarkSheet { headers, rows })
}
