use super::layout::{
    wrap, Align, Cursor, DrawOp, FontStyle, PageBuilder, PageCanvas, TextStyle, ACCENT, RULE,
};
use crate::workflows::assessment::{
    AssessmentOutcome, AssetKeyMapper, Dimension, DimensionSet, IllustrationCategory, Ranking,
    RespondentRecord,
};
use crate::workflows::corpus::{CorpusId, CorpusIndex};
use serde::{Deserialize, Serialize};
use std::io::Cursor as ByteCursor;
use std::sync::Arc;
use tracing::{debug, warn};

pub const BRAND_LINE: &str = "MindMirror3D";
pub const THANK_YOU_SYMBOL: &str = "/symbol.png";

const COVER_TITLE: &str = "Personalized Personality Report";
const COVER_TAGLINE: &str = "A Deep Look Into Who You Are";
const BACK_NOTE: &str = "Created by MindMirror3D";
const THANK_YOU_BODY: [&str; 3] = [
    "Thank you for taking the MindMirror3D journey.",
    "Your sculpture and booklet were created with care, precision, and deep respect for who you are. \
     This is more than a report: it\u{2019}s a reflection of your inner landscape, your strengths, \
     and your unique way of moving through the world.",
    "We hope this serves as a meaningful guide for self-understanding, connection, and growth.",
];
const THANK_YOU_CLOSING: [&str; 2] = ["With appreciation,", "The MindMirror3D Team"];
const SYMBOL_SIZE: f32 = 57.6;

const IMAGE_TARGET_WIDTH: f32 = 150.0;
const IMAGE_GUTTER: f32 = 14.0;

const TITLE: TextStyle = TextStyle::new(20.0, FontStyle::Bold).aligned(Align::Center);
const SUBTITLE: TextStyle = TextStyle::new(11.0, FontStyle::Italic).aligned(Align::Center);
const BODY: TextStyle = TextStyle::new(11.0, FontStyle::Regular);
const ROW: TextStyle = TextStyle::new(12.0, FontStyle::Regular);
const HEADLINE: TextStyle = TextStyle::new(14.0, FontStyle::Bold).colored(ACCENT);
const FOOTER: TextStyle = TextStyle::new(8.0, FontStyle::Italic)
    .colored(ACCENT)
    .aligned(Align::Center);
const COVER_BRAND: TextStyle = TextStyle::new(22.0, FontStyle::Bold);
const COVER_HEADING: TextStyle = TextStyle::new(16.0, FontStyle::Bold);
const TAGLINE: TextStyle = TextStyle::new(12.0, FontStyle::Italic);
const LETTER_TITLE: TextStyle = TextStyle::new(24.0, FontStyle::Regular).aligned(Align::Center);
const LETTER_BODY: TextStyle = TextStyle::new(11.5, FontStyle::Regular);

/// Descriptor of one page of the booklet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageSpec {
    /// Text cover naming the respondent.
    TitleCover,
    /// Closing page with the brand credit.
    BackNote,
    /// Single-page letter thanking the respondent.
    ThankYouLetter,
    ScoreTable {
        set: DimensionSet,
    },
    /// Long-form description of the dimension at `rank` (1-based).
    Narrative {
        set: DimensionSet,
        rank: usize,
    },
    Illustrated {
        set: DimensionSet,
        category: IllustrationCategory,
    },
}

/// Rendering program of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedPage {
    pub spec: PageSpec,
    pub ops: Vec<DrawOp>,
    pub overflow_lines: usize,
}

impl ComposedPage {
    pub fn texts(&self) -> Vec<&str> {
        self.ops.iter().filter_map(DrawOp::text_content).collect()
    }

    pub fn has_image(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Image { .. }))
    }
}

/// Per-respondent inputs shared by every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportContext {
    pub display_name: String,
    pub outcome: AssessmentOutcome,
    pub completion_date: String,
}

impl ReportContext {
    pub fn from_record(record: &RespondentRecord) -> Self {
        Self {
            display_name: record.display_name(),
            outcome: AssessmentOutcome::from_record(record),
            completion_date: record.completion_date_label(),
        }
    }
}

/// Parameters of the text-around-image layout shared by every illustrated page.
#[derive(Debug, Clone, PartialEq)]
pub struct IllustratedPage {
    pub title: String,
    pub subtitle: String,
    pub image_path: String,
    pub corpus: CorpusId,
    pub corpus_key: String,
    pub fallback: Vec<String>,
    pub dominant_labels: (&'static str, &'static str),
}

#[derive(Debug, Clone)]
struct LoadedImage {
    data: Arc<[u8]>,
    pixel_width: u32,
    pixel_height: u32,
}

/// Two generic sentences used when a category has no narrative for a pair.
pub fn fallback_paragraphs(category: IllustrationCategory, first: &str, second: &str) -> Vec<String> {
    match category {
        IllustrationCategory::Head => vec![
            format!("Your way of thinking is shaped by {first} and {second}."),
            format!("Together, {first} and {second} guide how you make sense of the world around you."),
        ],
        IllustrationCategory::Body => vec![
            format!("Your energy comes from {first} and {second}."),
            format!("When {first} and {second} are cared for, you feel most at home in yourself."),
        ],
        IllustrationCategory::Legs => vec![
            format!("{first} and {second} carry you forward."),
            format!("They set the pace at which you move toward the goals that matter to you."),
        ],
    }
}

/// Builds page rendering programs from scores and corpora.
#[derive(Debug, Clone)]
pub struct PageComposer {
    corpus: Arc<CorpusIndex>,
    canvas: PageCanvas,
}

impl PageComposer {
    pub fn new(corpus: Arc<CorpusIndex>) -> Self {
        Self {
            corpus,
            canvas: PageCanvas::default(),
        }
    }

    pub fn canvas(&self) -> PageCanvas {
        self.canvas
    }

    pub fn compose(&self, spec: PageSpec, context: &ReportContext) -> ComposedPage {
        let mut builder = PageBuilder::new(self.canvas);

        match spec {
            PageSpec::TitleCover => self.title_cover(&mut builder, &context.display_name),
            PageSpec::BackNote => self.back_note(&mut builder),
            PageSpec::ThankYouLetter => self.thank_you_letter(&mut builder, &context.display_name),
            PageSpec::ScoreTable { set }
            | PageSpec::Narrative { set, .. }
            | PageSpec::Illustrated { set, .. } => match set {
                DimensionSet::Traits => {
                    self.scored_page(&mut builder, spec, context.outcome.big_five.as_ref(), context)
                }
                DimensionSet::Needs => {
                    self.scored_page(&mut builder, spec, context.outcome.basic_needs.as_ref(), context)
                }
            },
        }

        let (ops, overflow_lines) = builder.finish();
        if overflow_lines > 0 {
            debug!(?spec, overflow_lines, "page text exceeded the bottom margin");
        }

        ComposedPage {
            spec,
            ops,
            overflow_lines,
        }
    }

    fn scored_page<D: Dimension>(
        &self,
        builder: &mut PageBuilder,
        spec: PageSpec,
        ranking: Option<&Ranking<D>>,
        context: &ReportContext,
    ) {
        let Some(ranking) = ranking else {
            let start = builder.start();
            builder.line(start, D::SET.not_completed_message(), self.canvas.left(), BODY);
            return;
        };

        match spec {
            PageSpec::ScoreTable { .. } => self.score_table(builder, ranking, &context.completion_date),
            PageSpec::Narrative { rank, .. } => self.narrative(builder, ranking, rank),
            PageSpec::Illustrated { category, .. } => self.illustrated(builder, ranking, category),
            PageSpec::TitleCover | PageSpec::BackNote | PageSpec::ThankYouLetter => {}
        }
    }

    fn title_cover(&self, builder: &mut PageBuilder, name: &str) {
        let left = self.canvas.left();
        let start = Cursor::at(self.canvas.top() + 20.0);
        let mut cursor = builder.line(start, BRAND_LINE, left, COVER_BRAND);
        cursor = cursor.advance(8.0);
        cursor = builder.line(cursor, COVER_TITLE, left, COVER_HEADING);
        cursor = cursor.advance(10.0);

        let prepared = wrap(
            &format!("Prepared for: {name}"),
            ROW.font,
            ROW.size,
            self.canvas.content_width(),
        );
        cursor = builder.lines(cursor, &prepared, left, ROW);
        cursor = cursor.advance(6.0);
        builder.line(cursor, COVER_TAGLINE, left, TAGLINE);
    }

    fn back_note(&self, builder: &mut PageBuilder) {
        let middle = Cursor::at(self.canvas.height / 2.0);
        builder.line(
            middle,
            BACK_NOTE,
            self.canvas.center_x(),
            TAGLINE.aligned(Align::Center),
        );
    }

    /// Greeting, three paragraphs and a two-line closing, with the brand symbol
    /// centered near the bottom edge when the asset store has one.
    fn thank_you_letter(&self, builder: &mut PageBuilder, name: &str) {
        let left = self.canvas.left();
        let start = Cursor::at(self.canvas.top() + 20.0);
        let mut cursor = builder.line(start, "Thank You", self.canvas.center_x(), LETTER_TITLE);
        cursor = cursor.advance(12.0);
        cursor = builder.line(cursor, format!("Dear {name},"), left, LETTER_BODY);
        cursor = cursor.advance(LETTER_BODY.line_height() / 2.0);

        for (index, paragraph) in THANK_YOU_BODY.iter().enumerate() {
            if index > 0 {
                cursor = cursor.advance(LETTER_BODY.line_height());
            }
            let lines = wrap(
                paragraph,
                LETTER_BODY.font,
                LETTER_BODY.size,
                self.canvas.content_width(),
            );
            cursor = builder.lines(cursor, &lines, left, LETTER_BODY);
        }

        cursor = cursor.advance(23.0);
        let closing: Vec<String> = THANK_YOU_CLOSING.iter().map(|line| line.to_string()).collect();
        builder.lines(cursor, &closing, left, BODY);

        if let Some(symbol) = self.load_image(THANK_YOU_SYMBOL) {
            let ratio = symbol.pixel_height as f32 / symbol.pixel_width as f32;
            let (width, height) = if ratio > 1.0 {
                (SYMBOL_SIZE / ratio, SYMBOL_SIZE)
            } else {
                (SYMBOL_SIZE, SYMBOL_SIZE * ratio)
            };
            builder.push(DrawOp::Image {
                path: THANK_YOU_SYMBOL.to_string(),
                x: self.canvas.center_x() - width / 2.0,
                y: self.canvas.height - 72.0,
                width,
                height,
                data: symbol.data,
            });
        }
    }

    fn score_table<D: Dimension>(&self, builder: &mut PageBuilder, ranking: &Ranking<D>, date: &str) {
        let subtitle = [
            format!("Based on the online test you took on {date},"),
            "here are your result scores.".to_string(),
        ];
        let mut cursor = self.heading(builder, table_title(D::SET), &subtitle);
        let line_height = ROW.line_height();

        for entry in &ranking.ranked {
            let baseline = cursor.y + ROW.size;
            builder.push(DrawOp::text(entry.label, self.canvas.left(), baseline, ROW));
            builder.push(DrawOp::text(
                format!("{}%", entry.display_percentile),
                self.canvas.right(),
                baseline,
                ROW.aligned(Align::Right),
            ));

            let bar_y = cursor.y + line_height + 2.0;
            let bar_width = self.canvas.content_width() * f32::from(entry.display_percentile) / 100.0;
            builder.rect(self.canvas.left(), bar_y, bar_width, 4.0, ACCENT);
            builder.rule(Cursor::at(bar_y + 10.0), RULE, 0.5);
            cursor = cursor.advance(line_height + 18.0);
        }

        cursor = cursor.advance(BODY.line_height());
        match ranking.dominant_pair {
            Some(pair) => {
                let (first, second) = pair.labels();
                cursor = builder.line(
                    cursor,
                    format!("Dominant pair: {first} & {second}"),
                    self.canvas.left(),
                    HEADLINE,
                );
                cursor = cursor.advance(BODY.line_height() / 2.0);
                let summary = format!(
                    "Based on the {} test, your strongest {} are {first} and {second}.",
                    D::SET.label(),
                    set_noun(D::SET),
                );
                let lines = wrap(&summary, BODY.font, BODY.size, self.canvas.content_width());
                builder.lines(cursor, &lines, self.canvas.left(), BODY);
            }
            None => {
                builder.line(cursor, insufficient_data(D::SET), self.canvas.left(), BODY);
            }
        }

        self.footer(builder);
    }

    fn narrative<D: Dimension>(&self, builder: &mut PageBuilder, ranking: &Ranking<D>, rank: usize) {
        let Some(entry) = ranking.at_rank(rank) else {
            let start = builder.start();
            builder.line(start, insufficient_data(D::SET), self.canvas.left(), BODY);
            return;
        };

        let title = format!("Your {} {}", ordinal(rank), set_title_noun(D::SET));
        let subtitle = [format!("{} \u{2022} {}%", entry.label, entry.percentile)];
        let cursor = self.heading(builder, &title, &subtitle);

        let fallback = vec![
            format!("{} is one of the defining parts of who you are.", entry.label),
            format!(
                "With a score of {}%, it is number {rank} among your {} results.",
                entry.percentile,
                D::SET.label(),
            ),
        ];
        let paragraphs = self.corpus.lookup_or(
            CorpusId::descriptions(D::SET),
            entry.key.corpus_name(),
            fallback,
        );
        self.flow_paragraphs(builder, cursor, &paragraphs);
        self.footer(builder);
    }

    fn illustrated<D: Dimension>(
        &self,
        builder: &mut PageBuilder,
        ranking: &Ranking<D>,
        category: IllustrationCategory,
    ) {
        let Some(pair) = ranking.dominant_pair else {
            let start = builder.start();
            builder.line(start, insufficient_data(D::SET), self.canvas.left(), BODY);
            return;
        };

        let key = AssetKeyMapper::asset_key(&pair, category);
        let (first, second) = pair.labels();
        let page = IllustratedPage {
            title: category.title().to_string(),
            subtitle: format!("{first} & {second}"),
            image_path: key.image_path(),
            corpus: CorpusId::for_category(category),
            corpus_key: key.corpus_key(),
            fallback: fallback_paragraphs(category, first, second),
            dominant_labels: (first, second),
        };
        self.illustrated_page(builder, &page);
    }

    /// Text flowing around a right-aligned illustration.
    ///
    /// The first paragraph fills the column left of the image for as many lines
    /// as the image spans plus one; the rest continues at full width below both.
    /// Without a usable image every paragraph is laid out at full width.
    pub fn illustrated_page(&self, builder: &mut PageBuilder, page: &IllustratedPage) {
        let cursor = self.heading(builder, &page.title, &[page.subtitle.clone()]);
        let paragraphs = self
            .corpus
            .lookup_or(page.corpus, &page.corpus_key, page.fallback.clone());

        let image_op = match self.load_image(&page.image_path) {
            Some(image) => Some(self.flow_around_image(builder, cursor, &paragraphs, page, image)),
            None => {
                self.flow_paragraphs(builder, cursor, &paragraphs);
                None
            }
        };

        self.footer(builder);
        if let Some(op) = image_op {
            builder.push(op);
        }
    }

    fn flow_around_image(
        &self,
        builder: &mut PageBuilder,
        cursor: Cursor,
        paragraphs: &[String],
        page: &IllustratedPage,
        image: LoadedImage,
    ) -> DrawOp {
        let ratio = image.pixel_height as f32 / image.pixel_width as f32;
        let available = (self.canvas.bottom() - cursor.y).max(0.0);
        let mut width = IMAGE_TARGET_WIDTH.min(self.canvas.content_width());
        let mut height = width * ratio;
        if height > available {
            height = available;
            width = height / ratio;
        }

        let image_x = self.canvas.right() - width;
        let column_width = (image_x - IMAGE_GUTTER - self.canvas.left()).max(0.0);
        let line_height = BODY.line_height();

        let (first, rest) = match paragraphs.split_first() {
            Some((first, rest)) => (first.as_str(), rest),
            None => ("", paragraphs),
        };
        let column_lines = wrap(first, BODY.font, BODY.size, column_width);
        let fit = (height / line_height).floor() as usize + 1;
        let kept = fit.min(column_lines.len());
        let continuation = column_lines[kept..].join(" ");

        let column_end = builder.lines(cursor, &column_lines[..kept], self.canvas.left(), BODY);
        let image_end = cursor.advance(height);
        let below = column_end.max(image_end).advance(line_height);

        let mut remaining: Vec<String> = Vec::with_capacity(rest.len() + 1);
        if !continuation.trim().is_empty() {
            remaining.push(continuation);
        }
        remaining.extend(rest.iter().cloned());
        self.flow_paragraphs(builder, below, &remaining);

        debug!(
            path = %page.image_path,
            kept,
            deferred = column_lines.len() - kept,
            "text flowed around illustration"
        );

        DrawOp::Image {
            path: page.image_path.clone(),
            x: image_x,
            y: cursor.y,
            width,
            height,
            data: image.data,
        }
    }

    /// Full-width paragraphs separated by one blank line.
    fn flow_paragraphs(&self, builder: &mut PageBuilder, cursor: Cursor, paragraphs: &[String]) -> Cursor {
        let mut cursor = cursor;
        for (index, paragraph) in paragraphs.iter().enumerate() {
            if index > 0 {
                cursor = cursor.advance(BODY.line_height());
            }
            let lines = wrap(paragraph, BODY.font, BODY.size, self.canvas.content_width());
            cursor = builder.lines(cursor, &lines, self.canvas.left(), BODY);
        }
        cursor
    }

    fn heading(&self, builder: &mut PageBuilder, title: &str, subtitle: &[String]) -> Cursor {
        let start = builder.start();
        let mut cursor = builder.line(start, title, self.canvas.center_x(), TITLE);
        cursor = cursor.advance(4.0);
        cursor = builder.lines(cursor, subtitle, self.canvas.center_x(), SUBTITLE);
        cursor = cursor.advance(8.0);
        builder.rule(cursor, RULE, 0.75);
        cursor.advance(16.0)
    }

    fn footer(&self, builder: &mut PageBuilder) {
        let baseline = self.canvas.height - self.canvas.margin / 2.0;
        builder.push(DrawOp::text(BRAND_LINE, self.canvas.center_x(), baseline, FOOTER));
    }

    fn load_image(&self, path: &str) -> Option<LoadedImage> {
        let bytes = match self.corpus.source().fetch_bytes(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path, error = %err, "illustration unavailable; laying out text only");
                return None;
            }
        };

        let dimensions = image::io::Reader::new(ByteCursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)
            .and_then(|reader| reader.into_dimensions());

        match dimensions {
            Ok((pixel_width, pixel_height)) if pixel_width > 0 && pixel_height > 0 => {
                Some(LoadedImage {
                    data: Arc::from(bytes),
                    pixel_width,
                    pixel_height,
                })
            }
            Ok(_) => {
                warn!(path, "illustration has no pixels; laying out text only");
                None
            }
            Err(err) => {
                warn!(path, error = %err, "illustration could not be decoded; laying out text only");
                None
            }
        }
    }
}

fn table_title(set: DimensionSet) -> &'static str {
    match set {
        DimensionSet::Traits => "Big Five Personality Results",
        DimensionSet::Needs => "Basic Needs Results",
    }
}

fn set_noun(set: DimensionSet) -> &'static str {
    match set {
        DimensionSet::Traits => "traits",
        DimensionSet::Needs => "needs",
    }
}

fn set_title_noun(set: DimensionSet) -> &'static str {
    match set {
        DimensionSet::Traits => "Trait",
        DimensionSet::Needs => "Need",
    }
}

fn insufficient_data(set: DimensionSet) -> String {
    format!("Not enough {} data to determine a dominant pair.", set.label())
}

fn ordinal(rank: usize) -> String {
    match rank {
        1 => "Leading".to_string(),
        2 => "Second".to_string(),
        3 => "Third".to_string(),
        4 => "Fourth".to_string(),
        5 => "Fifth".to_string(),
        other => format!("#{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::booklet::layout::text_width;
    use crate::workflows::corpus::InMemoryAssets;
    use image::{ImageOutputFormat, Rgb as Pixel, RgbImage};
    use serde_json::json;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Pixel([200, 120, 40]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut ByteCursor::new(&mut bytes), ImageOutputFormat::Png)
            .expect("png encodes");
        bytes
    }

    fn record_with(traits: Vec<i64>, needs: Vec<i64>) -> RespondentRecord {
        RespondentRecord {
            email: Some("reader@example.com".to_string()),
            bigfive_answers: Some(traits.into_iter().map(|value| json!(value)).collect()),
            basicneeds_answers: Some(needs.into_iter().map(|value| json!(value)).collect()),
            ..RespondentRecord::default()
        }
    }

    fn neutral_context() -> ReportContext {
        ReportContext::from_record(&record_with(vec![3; 50], vec![5; 35]))
    }

    fn composer(assets: InMemoryAssets) -> PageComposer {
        PageComposer::new(Arc::new(CorpusIndex::new(Arc::new(assets))))
    }

    #[test]
    fn incomplete_answers_render_a_single_line() {
        let context = ReportContext::from_record(&record_with(vec![3; 49], vec![]));
        let composer = composer(InMemoryAssets::new());

        for spec in [
            PageSpec::ScoreTable {
                set: DimensionSet::Traits,
            },
            PageSpec::Illustrated {
                set: DimensionSet::Needs,
                category: IllustrationCategory::Body,
            },
        ] {
            let page = composer.compose(spec, &context);
            assert_eq!(page.ops.len(), 1);
            assert_eq!(page.spec, spec);
        }

        let page = composer.compose(
            PageSpec::Narrative {
                set: DimensionSet::Traits,
                rank: 1,
            },
            &context,
        );
        assert_eq!(
            page.texts(),
            vec!["Big Five test not completed or invalid answers."]
        );
    }

    #[test]
    fn score_table_lists_rows_in_ranked_order_with_display_values() {
        let page = composer(InMemoryAssets::new()).compose(
            PageSpec::ScoreTable {
                set: DimensionSet::Needs,
            },
            &neutral_context(),
        );
        let texts = page.texts();

        let rows: Vec<&str> = texts
            .iter()
            .copied()
            .filter(|text| text.ends_with('%'))
            .collect();
        assert_eq!(rows, vec!["100%", "99%", "98%", "97%", "96%"]);

        let survival = texts.iter().position(|text| *text == "Survival");
        let fun = texts.iter().position(|text| *text == "Fun");
        assert!(survival < fun);
        assert!(texts.contains(&"Dominant pair: Survival & Love"));
        assert!(texts.contains(&BRAND_LINE));
        assert!(texts
            .join(" ")
            .contains("your strongest needs are Survival and Love."));
    }

    #[test]
    fn score_table_subtitle_names_completion_date() {
        let context = ReportContext {
            completion_date: "March 2, 2025".to_string(),
            ..neutral_context()
        };
        let page = composer(InMemoryAssets::new()).compose(
            PageSpec::ScoreTable {
                set: DimensionSet::Traits,
            },
            &context,
        );
        assert!(page
            .texts()
            .contains(&"Based on the online test you took on March 2, 2025,"));
    }

    #[test]
    fn missing_narrative_uses_fallback_sentences_for_pair_labels() {
        let page = composer(InMemoryAssets::new()).compose(
            PageSpec::Illustrated {
                set: DimensionSet::Needs,
                category: IllustrationCategory::Body,
            },
            &neutral_context(),
        );
        let body = page.texts().join(" ");
        assert!(body.contains("Your energy comes from Survival and Love."));
        assert!(body.contains("When Survival and Love are cared for"));
        assert!(!page.has_image());
    }

    #[test]
    fn narrative_page_reads_description_corpus() {
        let assets = InMemoryAssets::new()
            .with_text("/texts/needs.txt", "Survival: You value safety and steady ground.");
        let page = composer(assets).compose(
            PageSpec::Narrative {
                set: DimensionSet::Needs,
                rank: 1,
            },
            &neutral_context(),
        );
        let texts = page.texts();
        assert!(texts.contains(&"Your Leading Need"));
        assert!(texts.contains(&"You value safety and steady ground."));
    }

    #[test]
    fn illustrated_page_draws_image_last_without_distortion() {
        let paragraph = "word ".repeat(300);
        let assets = InMemoryAssets::new()
            .with_bytes("/bodies/SL-B.jpg", png(60, 90))
            .with_text(
                "/texts/bodies.txt",
                &format!("SL-B1: {paragraph}\nSL-B2: Second paragraph."),
            );
        let page = composer(assets).compose(
            PageSpec::Illustrated {
                set: DimensionSet::Needs,
                category: IllustrationCategory::Body,
            },
            &neutral_context(),
        );

        let Some(DrawOp::Image {
            path,
            x,
            y,
            width,
            height,
            ..
        }) = page.ops.last()
        else {
            panic!("image must be the last op");
        };
        assert_eq!(path, "/bodies/SL-B.jpg");
        assert!((width / height - 60.0 / 90.0).abs() < 1e-3);
        assert!((x + width - 356.0).abs() < 1e-3);

        let canvas = PageCanvas::default();
        let image_left = *x;
        let image_bottom = y + height;
        for op in &page.ops {
            if let DrawOp::Text {
                text, x: tx, y: ty, ..
            } = op
            {
                if *ty > *y && *ty <= image_bottom && text.as_str() != "Your Body" {
                    let right = tx + text_width(text, FontStyle::Regular, 11.0);
                    assert!(right <= image_left, "{text} overlaps the image");
                }
                assert!(*ty <= canvas.height);
            }
        }
        assert!(page.overflow_lines > 0);
        assert!(!page.texts().contains(&"Second paragraph."));
    }

    #[test]
    fn tall_images_are_clamped_to_remaining_space() {
        let assets = InMemoryAssets::new().with_bytes("/heads/OC-H.jpg", png(10, 400));
        let page = composer(assets).compose(
            PageSpec::Illustrated {
                set: DimensionSet::Traits,
                category: IllustrationCategory::Head,
            },
            &neutral_context(),
        );

        let Some(DrawOp::Image {
            y, width, height, ..
        }) = page.ops.last()
        else {
            panic!("image must be the last op");
        };
        let canvas = PageCanvas::default();
        assert!((y + height - canvas.bottom()).abs() < 1e-3);
        assert!((width / height - 10.0 / 400.0).abs() < 1e-4);
    }

    #[test]
    fn title_cover_names_the_respondent() {
        let context = ReportContext {
            display_name: "Ada Lovelace".to_string(),
            ..neutral_context()
        };
        let page = composer(InMemoryAssets::new()).compose(PageSpec::TitleCover, &context);
        assert_eq!(
            page.texts(),
            vec![
                BRAND_LINE,
                "Personalized Personality Report",
                "Prepared for: Ada Lovelace",
                "A Deep Look Into Who You Are",
            ]
        );
        assert!(!page.has_image());
    }

    #[test]
    fn back_note_is_centered_mid_page() {
        let page = composer(InMemoryAssets::new()).compose(PageSpec::BackNote, &neutral_context());
        let canvas = PageCanvas::default();
        match page.ops.as_slice() {
            [DrawOp::Text { text, x, align, .. }] => {
                assert_eq!(text, "Created by MindMirror3D");
                assert_eq!(*x, canvas.center_x());
                assert_eq!(*align, Align::Center);
            }
            other => panic!("unexpected ops: {other:?}"),
        }
    }

    #[test]
    fn thank_you_letter_greets_by_name_and_centers_symbol() {
        let assets = InMemoryAssets::new().with_bytes(THANK_YOU_SYMBOL, png(300, 300));
        let context = ReportContext {
            display_name: "Grace".to_string(),
            ..neutral_context()
        };
        let page = composer(assets).compose(PageSpec::ThankYouLetter, &context);

        let texts = page.texts();
        assert_eq!(texts[0], "Thank You");
        assert_eq!(texts[1], "Dear Grace,");
        assert!(texts
            .join(" ")
            .contains("Thank you for taking the MindMirror3D journey."));
        assert_eq!(
            &texts[texts.len() - 2..],
            &["With appreciation,", "The MindMirror3D Team"]
        );

        let Some(DrawOp::Image { x, width, height, .. }) = page.ops.last() else {
            panic!("symbol must be drawn last");
        };
        let canvas = PageCanvas::default();
        assert!((x + width / 2.0 - canvas.center_x()).abs() < 1e-3);
        assert!((width - height).abs() < 1e-3);
        assert_eq!(page.overflow_lines, 0);
    }

    #[test]
    fn thank_you_letter_without_symbol_is_text_only() {
        let page = composer(InMemoryAssets::new()).compose(PageSpec::ThankYouLetter, &neutral_context());
        assert!(!page.has_image());
        assert_eq!(page.texts()[1], "Dear reader,");
    }

    #[test]
    fn undecodable_image_falls_back_to_full_width_text() {
        let assets = InMemoryAssets::new()
            .with_bytes("/legs/OC-L.jpg", b"not an image".to_vec())
            .with_text("/texts/legs.txt", "OC-L1: Steady steps.");
        let page = composer(assets).compose(
            PageSpec::Illustrated {
                set: DimensionSet::Traits,
                category: IllustrationCategory::Legs,
            },
            &neutral_context(),
        );
        assert!(!page.has_image());
        assert!(page.texts().contains(&"Steady steps."));
    }
}
