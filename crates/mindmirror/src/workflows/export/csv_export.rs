use super::ExportError;
use crate::workflows::assessment::RespondentRecord;
use serde_json::{Map, Value};
use std::io::Write;

/// Schemaless CSV export of respondent rows.
///
/// The header is taken from the first row's keys; later rows are projected onto
/// it, so extra keys are dropped and missing keys become empty fields.
pub struct CsvExporter;

impl CsvExporter {
    pub fn export(rows: &[Value]) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        Self::write_to(rows, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn export_records(records: &[RespondentRecord]) -> Result<String, ExportError> {
        let rows = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Self::export(&rows)
    }

    pub fn write_to<W: Write>(rows: &[Value], output: W) -> Result<(), ExportError> {
        let Some(first) = rows.first() else {
            return Ok(());
        };
        let header: Vec<&str> = as_object(first, 0)?.keys().map(String::as_str).collect();

        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(output);
        // The header row is quoted like every data row.
        writer.write_record(&header)?;

        for (index, row) in rows.iter().enumerate() {
            let object = as_object(row, index)?;
            let fields = header
                .iter()
                .map(|key| field_text(object.get(*key)))
                .collect::<Result<Vec<_>, _>>()?;
            writer.write_record(&fields)?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn as_object(row: &Value, index: usize) -> Result<&Map<String, Value>, ExportError> {
    row.as_object()
        .ok_or(ExportError::NotAnObject { row: index })
}

fn field_text(value: Option<&Value>) -> Result<String, ExportError> {
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(nested @ (Value::Array(_) | Value::Object(_))) => serde_json::to_string(nested)?,
    })
}
