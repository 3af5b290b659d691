use super::composer::{ComposedPage, PageComposer, PageSpec, ReportContext};
use super::layout::{DrawOp, PageCanvas, PAGE_BACKGROUND};
use crate::workflows::assessment::{DimensionSet, IllustrationCategory, RespondentRecord};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub const BOOKLET_SUFFIX: &str = "_booklet.pdf";
pub const THANK_YOU_FILE_NAME: &str = "mindmirror3d-thank-you.pdf";

/// Full-page image supplied by the caller for the cover or back cover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverImage {
    pub label: String,
    #[serde(skip)]
    pub data: Arc<[u8]>,
}

impl CoverImage {
    pub fn new(label: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Every page of one respondent's booklet, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booklet {
    pub file_name: String,
    pub display_name: String,
    pub canvas: PageCanvas,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<CoverImage>,
    pub pages: Vec<ComposedPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_cover: Option<CoverImage>,
}

impl Booklet {
    /// Cover, content pages and back cover.
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.cover.is_some()) + usize::from(self.back_cover.is_some())
    }

    pub fn overflow_lines(&self) -> usize {
        self.pages.iter().map(|page| page.overflow_lines).sum()
    }
}

/// Trait table, leading trait, head, need table, leading need, body, legs.
pub fn default_pages() -> Vec<PageSpec> {
    vec![
        PageSpec::ScoreTable {
            set: DimensionSet::Traits,
        },
        PageSpec::Narrative {
            set: DimensionSet::Traits,
            rank: 1,
        },
        PageSpec::Illustrated {
            set: DimensionSet::Traits,
            category: IllustrationCategory::Head,
        },
        PageSpec::ScoreTable {
            set: DimensionSet::Needs,
        },
        PageSpec::Narrative {
            set: DimensionSet::Needs,
            rank: 1,
        },
        PageSpec::Illustrated {
            set: DimensionSet::Needs,
            category: IllustrationCategory::Body,
        },
        PageSpec::Illustrated {
            set: DimensionSet::Traits,
            category: IllustrationCategory::Legs,
        },
    ]
}

/// Lowercased display name with everything outside `[a-z0-9@._-]` replaced.
pub fn booklet_file_name(record: &RespondentRecord) -> String {
    let stem: String = record
        .display_name()
        .to_lowercase()
        .chars()
        .map(|ch| match ch {
            'a'..='z' | '0'..='9' | '@' | '.' | '_' | '-' => ch,
            _ => '_',
        })
        .collect();
    format!("{stem}{BOOKLET_SUFFIX}")
}

#[derive(Debug, Clone)]
pub struct BookletAssembler {
    composer: PageComposer,
    pages: Vec<PageSpec>,
}

impl BookletAssembler {
    pub fn new(composer: PageComposer) -> Self {
        Self {
            composer,
            pages: default_pages(),
        }
    }

    pub fn with_pages(mut self, pages: Vec<PageSpec>) -> Self {
        self.pages = pages;
        self
    }

    /// Content pages in order. A text cover opens the booklet and a back note
    /// closes it whenever the matching cover image is not supplied.
    pub fn assemble(
        &self,
        record: &RespondentRecord,
        cover: Option<CoverImage>,
        back_cover: Option<CoverImage>,
    ) -> Booklet {
        let context = ReportContext::from_record(record);
        let canvas = self.composer.canvas();

        let specs = cover
            .is_none()
            .then_some(PageSpec::TitleCover)
            .into_iter()
            .chain(self.pages.iter().copied())
            .chain(back_cover.is_none().then_some(PageSpec::BackNote));
        let pages: Vec<ComposedPage> = specs.map(|spec| self.page(spec, &context)).collect();

        let booklet = Booklet {
            file_name: booklet_file_name(record),
            display_name: record.display_name(),
            canvas,
            cover,
            pages,
            back_cover,
        };

        info!(
            file_name = %booklet.file_name,
            pages = booklet.page_count(),
            complete = context.outcome.is_complete(),
            overflow_lines = booklet.overflow_lines(),
            "booklet assembled"
        );

        booklet
    }

    /// Single-page thank-you letter addressed to the respondent.
    pub fn thank_you(&self, record: &RespondentRecord) -> Booklet {
        let context = ReportContext::from_record(record);
        let page = self.page(PageSpec::ThankYouLetter, &context);

        info!(has_symbol = page.has_image(), "thank-you letter assembled");

        Booklet {
            file_name: THANK_YOU_FILE_NAME.to_string(),
            display_name: context.display_name,
            canvas: self.composer.canvas(),
            cover: None,
            pages: vec![page],
            back_cover: None,
        }
    }

    fn page(&self, spec: PageSpec, context: &ReportContext) -> ComposedPage {
        let canvas = self.composer.canvas();
        let mut page = self.composer.compose(spec, context);
        page.ops.insert(
            0,
            DrawOp::Rect {
                x: 0.0,
                y: 0.0,
                width: canvas.width,
                height: canvas.height,
                color: PAGE_BACKGROUND,
            },
        );
        page
    }
}
