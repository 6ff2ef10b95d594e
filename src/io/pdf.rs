use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::layout::Geometry;

const MM_TO_PT: f32 = 72.0 / 25.4;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// An image decoded and re-encoded as baseline JPEG, ready to embed as a
/// `DCTDecode` XObject.
#[derive(Debug, Clone)]
pub struct JpegImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl JpegImage {
    /// Decode any supported image format (the QR provider returns PNG)
    /// and transcode to RGB JPEG.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, image::ImageError> {
        let decoded = image::load_from_memory(raw)?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut data = Vec::new();
        JpegEncoder::new_with_quality(&mut data, 90).encode(
            rgb.as_raw(),
            width,
            height,
            image::ExtendedColorType::Rgb8,
        )?;

        Ok(Self {
            data,
            width,
            height,
        })
    }
}

struct PendingImage {
    name: String,
    jpeg: Vec<u8>,
    width_px: u32,
    height_px: u32,
}

/// Content of one page under construction. Coordinates are millimeters
/// measured from the top-left corner; conversion to PDF points happens at
/// the operation level.
pub struct PageBuilder {
    operations: Vec<Operation>,
    images: Vec<PendingImage>,
    height_pt: f32,
}

impl PageBuilder {
    fn x_pt(&self, x_mm: f32) -> f32 {
        x_mm * MM_TO_PT
    }

    fn y_pt(&self, y_mm: f32) -> f32 {
        self.height_pt - y_mm * MM_TO_PT
    }

    /// Place a single line of text with its baseline at `y_mm` from the top.
    pub fn text(&mut self, x_mm: f32, y_mm: f32, size_pt: f32, bold: bool, text: &str) {
        let font = if bold { FONT_BOLD } else { FONT_REGULAR };
        self.operations.push(Operation::new("BT", vec![]));
        self.operations
            .push(Operation::new("Tf", vec![font.into(), size_pt.into()]));
        self.operations.push(Operation::new(
            "Td",
            vec![self.x_pt(x_mm).into(), self.y_pt(y_mm).into()],
        ));
        self.operations
            .push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.operations.push(Operation::new("ET", vec![]));
    }

    /// Stroke a rectangle. `y_mm` is the top edge.
    pub fn rect(
        &mut self,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: f32,
        color: (f32, f32, f32),
        line_width_pt: f32,
    ) {
        let x = self.x_pt(x_mm);
        let y = self.y_pt(y_mm + height_mm);
        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "RG",
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
        self.operations
            .push(Operation::new("w", vec![line_width_pt.into()]));
        self.operations.push(Operation::new(
            "re",
            vec![
                x.into(),
                y.into(),
                (width_mm * MM_TO_PT).into(),
                (height_mm * MM_TO_PT).into(),
            ],
        ));
        self.operations.push(Operation::new("S", vec![]));
        self.operations.push(Operation::new("Q", vec![]));
    }

    /// Draw an image scaled into the given box. `y_mm` is the top edge.
    pub fn image(&mut self, image: JpegImage, x_mm: f32, y_mm: f32, width_mm: f32, height_mm: f32) {
        let name = format!("Im{}", self.images.len());
        let x = self.x_pt(x_mm);
        let y = self.y_pt(y_mm + height_mm);

        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "cm",
            vec![
                (width_mm * MM_TO_PT).into(),
                0.0_f32.into(),
                0.0_f32.into(),
                (height_mm * MM_TO_PT).into(),
                x.into(),
                y.into(),
            ],
        ));
        self.operations
            .push(Operation::new("Do", vec![name.as_str().into()]));
        self.operations.push(Operation::new("Q", vec![]));

        self.images.push(PendingImage {
            name,
            jpeg: image.data,
            width_px: image.width,
            height_px: image.height,
        });
    }
}

/// Minimal multi-page PDF writer over lopdf: fixed Helvetica fonts, one
/// content stream per page, images as JPEG XObjects. Output contains no
/// timestamps or random identifiers, so identical input produces
/// byte-identical documents.
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    width_pt: f32,
    height_pt: f32,
}

impl PdfWriter {
    pub fn new(geometry: &Geometry) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            width_pt: geometry.width_mm * MM_TO_PT,
            height_pt: geometry.height_mm * MM_TO_PT,
        }
    }

    pub fn begin_page(&self) -> PageBuilder {
        PageBuilder {
            operations: Vec::new(),
            images: Vec::new(),
            height_pt: self.height_pt,
        }
    }

    pub fn finish_page(&mut self, page: PageBuilder) -> Result<(), lopdf::Error> {
        let content = Content {
            operations: page.operations,
        };
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.encode()?));

        let has_images = !page.images.is_empty();
        let mut xobjects = Dictionary::new();
        for image in page.images {
            let stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => image.width_px as i64,
                    "Height" => image.height_px as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8_i64,
                    "Filter" => "DCTDecode",
                },
                image.jpeg,
            );
            let id = self.doc.add_object(stream);
            xobjects.set(image.name, id);
        }

        let mut resources = dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                },
                FONT_BOLD => dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica-Bold",
                },
            },
        };
        if has_images {
            resources.set("XObject", xobjects);
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Resources" => resources,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Assemble the page tree and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>, lopdf::Error> {
        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();
        let count = kids.len() as i64;

        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![
                    0.0_f32.into(),
                    0.0_f32.into(),
                    self.width_pt.into(),
                    self.height_pt.into(),
                ],
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        self.doc.save_to(&mut out)?;
        Ok(out)
    }
}
