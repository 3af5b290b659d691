mod csv_export;

pub use csv_export::CsvExporter;

#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
    NotAnObject { row: usize },
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Csv(err) => write!(f, "failed to write CSV: {}", err),
            ExportError::Json(err) => write!(f, "failed to serialize export row: {}", err),
            ExportError::Io(err) => write!(f, "failed to flush CSV output: {}", err),
            ExportError::NotAnObject { row } => {
                write!(f, "export row {} is not a JSON object", row)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Csv(err) => Some(err),
            ExportError::Json(err) => Some(err),
            ExportError::Io(err) => Some(err),
            ExportError::NotAnObject { .. } => None,
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
