use super::assembler::{Booklet, CoverImage};
use super::layout::{text_width, Align, DrawOp, FontStyle, PageCanvas, Rgb};
use super::BookletError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::warn;

/// Serializes a booklet into one PDF document.
pub fn render_pdf(booklet: &Booklet) -> Result<Vec<u8>, BookletError> {
    let mut writer = PdfWriter::new(booklet.canvas);

    if let Some(cover) = &booklet.cover {
        writer.cover_page(cover)?;
    }
    for page in &booklet.pages {
        writer.content_page(&page.ops)?;
    }
    if let Some(back_cover) = &booklet.back_cover {
        writer.cover_page(back_cover)?;
    }

    writer.finish()
}

struct PdfWriter {
    doc: Document,
    canvas: PageCanvas,
    pages_id: ObjectId,
    fonts_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

#[derive(Default)]
struct PageResources {
    images: Vec<(String, ObjectId)>,
}

impl PageResources {
    fn xobjects(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        for (name, id) in &self.images {
            dict.set(name.as_bytes().to_vec(), Object::Reference(*id));
        }
        dict
    }
}

impl PdfWriter {
    fn new(canvas: PageCanvas) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for style in FontStyle::ordered() {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => style.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(style.resource_name(), Object::Reference(font_id));
        }
        let fonts_id = doc.add_object(fonts);

        Self {
            doc,
            canvas,
            pages_id,
            fonts_id,
            page_ids: Vec::new(),
        }
    }

    fn cover_page(&mut self, cover: &CoverImage) -> Result<(), BookletError> {
        let Some(image_id) = self.embed_image(&cover.label, &cover.data) else {
            return Ok(());
        };

        let resources = PageResources {
            images: vec![("Im1".to_string(), image_id)],
        };
        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(self.canvas.width),
                    real(0.0),
                    real(0.0),
                    real(self.canvas.height),
                    real(0.0),
                    real(0.0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
            Operation::new("Q", vec![]),
        ];

        self.add_page(operations, &resources)
    }

    fn content_page(&mut self, ops: &[DrawOp]) -> Result<(), BookletError> {
        let mut resources = PageResources::default();
        let mut operations = Vec::new();

        for op in ops {
            match op {
                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => {
                    operations.push(Operation::new("q", vec![]));
                    operations.push(fill_color(*color));
                    operations.push(Operation::new(
                        "re",
                        vec![
                            real(*x),
                            real(self.flip(*y + *height)),
                            real(*width),
                            real(*height),
                        ],
                    ));
                    operations.push(Operation::new("f", vec![]));
                    operations.push(Operation::new("Q", vec![]));
                }
                DrawOp::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    width,
                    color,
                } => {
                    operations.push(Operation::new("q", vec![]));
                    operations.push(stroke_color(*color));
                    operations.push(Operation::new("w", vec![real(*width)]));
                    operations.push(Operation::new("m", vec![real(*x1), real(self.flip(*y1))]));
                    operations.push(Operation::new("l", vec![real(*x2), real(self.flip(*y2))]));
                    operations.push(Operation::new("S", vec![]));
                    operations.push(Operation::new("Q", vec![]));
                }
                DrawOp::Text {
                    text,
                    x,
                    y,
                    size,
                    font,
                    color,
                    align,
                } => {
                    let width = text_width(text, *font, *size);
                    let left = match align {
                        Align::Left => *x,
                        Align::Center => *x - width / 2.0,
                        Align::Right => *x - width,
                    };
                    operations.push(Operation::new("BT", vec![]));
                    operations.push(fill_color(*color));
                    operations.push(Operation::new(
                        "Tf",
                        vec![Object::Name(font.resource_name().as_bytes().to_vec()), real(*size)],
                    ));
                    operations.push(Operation::new("Td", vec![real(left), real(self.flip(*y))]));
                    operations.push(Operation::new(
                        "Tj",
                        vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
                    ));
                    operations.push(Operation::new("ET", vec![]));
                }
                DrawOp::Image {
                    path,
                    x,
                    y,
                    width,
                    height,
                    data,
                } => {
                    let Some(image_id) = self.embed_image(path, data) else {
                        continue;
                    };
                    let name = format!("Im{}", resources.images.len() + 1);
                    operations.push(Operation::new("q", vec![]));
                    operations.push(Operation::new(
                        "cm",
                        vec![
                            real(*width),
                            real(0.0),
                            real(0.0),
                            real(*height),
                            real(*x),
                            real(self.flip(*y + *height)),
                        ],
                    ));
                    operations.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
                    operations.push(Operation::new("Q", vec![]));
                    resources.images.push((name, image_id));
                }
            }
        }

        self.add_page(operations, &resources)
    }

    fn add_page(&mut self, operations: Vec<Operation>, resources: &PageResources) -> Result<(), BookletError> {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|err| BookletError::Pdf(err.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => self.fonts_id,
                "XObject" => resources.xobjects(),
            },
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn embed_image(&mut self, label: &str, data: &[u8]) -> Option<ObjectId> {
        let decoded = match image::load_from_memory(data) {
            Ok(decoded) => decoded.to_rgb8(),
            Err(err) => {
                warn!(image = label, error = %err, "skipping undecodable image");
                return None;
            }
        };

        let (width, height) = decoded.dimensions();
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            decoded.into_raw(),
        );
        Some(self.doc.add_object(stream))
    }

    fn flip(&self, y: f32) -> f32 {
        self.canvas.height - y
    }

    fn finish(mut self) -> Result<Vec<u8>, BookletError> {
        if self.page_ids.is_empty() {
            return Err(BookletError::Empty);
        }

        let kids: Vec<Object> = self.page_ids.iter().copied().map(Object::Reference).collect();
        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                real(0.0),
                real(0.0),
                real(self.canvas.width),
                real(self.canvas.height),
            ],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|err| BookletError::Pdf(err.to_string()))?;
        Ok(buffer)
    }
}

fn real(value: f32) -> Object {
    Object::from(value)
}

fn fill_color(color: Rgb) -> Operation {
    let [r, g, b] = color.components();
    Operation::new("rg", vec![real(r), real(g), real(b)])
}

fn stroke_color(color: Rgb) -> Operation {
    let [r, g, b] = color.components();
    Operation::new("RG", vec![real(r), real(g), real(b)])
}

/// Encodes text for the standard fonts' WinAnsi encoding; unmapped characters
/// become `?`.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}
