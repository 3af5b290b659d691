use metrics_exporter_prometheus::PrometheusHandle;
use mindmirror::config::AssetConfig;
use mindmirror::error::AppError;
use mindmirror::workflows::assessment::RespondentRecord;
use mindmirror::workflows::booklet::{
    render_pdf, Booklet, BookletAssembler, CoverImage, PageComposer,
};
use mindmirror::workflows::corpus::{AssetSource, CorpusIndex, DirectoryAssets};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared booklet pipeline; one corpus cache serves every request.
#[derive(Clone)]
pub(crate) struct BookletService {
    source: Arc<dyn AssetSource>,
    assembler: Arc<BookletAssembler>,
    cover_image: Option<String>,
    back_cover_image: Option<String>,
}

impl BookletService {
    pub(crate) fn new(source: Arc<dyn AssetSource>) -> Self {
        let corpus = Arc::new(CorpusIndex::new(Arc::clone(&source)));
        let assembler = BookletAssembler::new(PageComposer::new(corpus));
        Self {
            source,
            assembler: Arc::new(assembler),
            cover_image: None,
            back_cover_image: None,
        }
    }

    pub(crate) fn from_config(config: &AssetConfig) -> Self {
        let source: Arc<dyn AssetSource> = Arc::new(DirectoryAssets::new(config.root.clone()));
        let mut service = Self::new(source);
        service.cover_image = config.cover_image.clone();
        service.back_cover_image = config.back_cover_image.clone();
        service
    }

    pub(crate) fn build(&self, record: &RespondentRecord) -> Booklet {
        let cover = self.load_cover(self.cover_image.as_deref());
        let back_cover = self.load_cover(self.back_cover_image.as_deref());
        self.assembler.assemble(record, cover, back_cover)
    }

    /// Artifact name and PDF bytes.
    pub(crate) fn render(&self, record: &RespondentRecord) -> Result<(String, Vec<u8>), AppError> {
        let booklet = self.build(record);
        let bytes = render_pdf(&booklet)?;
        Ok((booklet.file_name, bytes))
    }

    /// Thank-you letter name and PDF bytes.
    pub(crate) fn render_thank_you(&self, record: &RespondentRecord) -> Result<(String, Vec<u8>), AppError> {
        let letter = self.assembler.thank_you(record);
        let bytes = render_pdf(&letter)?;
        Ok((letter.file_name, bytes))
    }

    fn load_cover(&self, path: Option<&str>) -> Option<CoverImage> {
        let path = path?;
        match self.source.fetch_bytes(path) {
            Ok(bytes) => Some(CoverImage::new(path, bytes)),
            Err(err) => {
                warn!(path, error = %err, "cover image unavailable; omitting page");
                None
            }
        }
    }
}

pub(crate) fn read_json(path: &Path) -> Result<Value, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&raw)?;
    Ok(value)
}

pub(crate) fn read_record(path: &Path) -> Result<RespondentRecord, AppError> {
    let value = read_json(path)?;
    let record = serde_json::from_value(value)?;
    Ok(record)
}

pub(crate) fn read_rows(path: &Path) -> Result<Vec<Value>, AppError> {
    match read_json(path)? {
        Value::Array(rows) => Ok(rows),
        _ => Err(AppError::InvalidInput(format!(
            "{} must contain a JSON array of records",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmirror::workflows::corpus::InMemoryAssets;

    #[test]
    fn missing_covers_are_omitted() {
        let mut service = BookletService::new(Arc::new(InMemoryAssets::new()));
        service.cover_image = Some("/covers/front.jpg".to_string());

        let booklet = service.build(&RespondentRecord::default());
        assert!(booklet.cover.is_none());
        assert_eq!(booklet.page_count(), 9);
    }

    #[test]
    fn thank_you_letter_has_a_fixed_name() {
        let service = BookletService::new(Arc::new(InMemoryAssets::new()));
        let (file_name, bytes) = service
            .render_thank_you(&RespondentRecord::default())
            .expect("letter renders");
        assert_eq!(file_name, "mindmirror3d-thank-you.pdf");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn render_names_the_artifact_after_the_respondent() {
        let service = BookletService::new(Arc::new(InMemoryAssets::new()));
        let record = RespondentRecord {
            full_name: Some("Ada Lovelace".to_string()),
            ..RespondentRecord::default()
        };

        let (file_name, bytes) = service.render(&record).expect("booklet renders");
        assert_eq!(file_name, "ada_lovelace_booklet.pdf");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
