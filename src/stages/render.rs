use tracing::{debug, warn};

use crate::error::LabelError;
use crate::io::pdf::{JpegImage, PageBuilder, PdfWriter};
use crate::layout::{
    BODY_SIZE_PT, BODY_WRAP_COLS, BORDER_COLOR, BORDER_INSET_MM, BORDER_LINE_PT, Geometry,
    LINE_HEIGHT_MM, LOGO_HEIGHT_MM, LOGO_TOP_MM, LOGO_WIDTH_MM, MARGIN_MM, Orientation,
    PageLayoutState, PageSize, QR_SIZE_MM, TITLE_GAP_MM, TITLE_SIZE_PT, TITLE_TOP_MM, wrap_text,
};
use crate::models::{LabelBatch, LabelRecord, RenderedDocument};
use crate::qr::ImageProvider;

/// Static header logo, identical on every page.
const LOGO_PNG: &[u8] = include_bytes!("../../assets/logo.png");

/// Configuration for the rendering stage.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub page_size: PageSize,
    pub orientation: Orientation,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A5,
            orientation: Orientation::Landscape,
        }
    }
}

/// Render a batch into a paginated document, one page per record, in
/// batch order.
///
/// Per record:
/// 1. Strip the encoding artifact from every textual field
/// 2. Fetch the QR image; on any failure keep going without it
/// 3. Draw the fixed decoration (logo, upper-half border)
/// 4. Flow title and wrapped body text down the page
/// 5. Center the owner/creator block in the leftover space
/// 6. Place revision/position in the corner and record the mail address
///
/// A QR failure is page-local; the only batch-level failure is a document
/// that cannot be produced at all.
pub async fn render(
    batch: &LabelBatch,
    config: &RenderConfig,
    provider: &dyn ImageProvider,
) -> Result<RenderedDocument, LabelError> {
    let geometry = Geometry::new(config.page_size, config.orientation);
    let mut writer = PdfWriter::new(&geometry);

    let logo = JpegImage::from_bytes(LOGO_PNG)
        .map_err(|err| LabelError::Render(format!("embedded logo failed to decode: {err}")))?;

    let mut mail_addresses = Vec::with_capacity(batch.len());
    for (index, record) in batch.iter().enumerate() {
        let record = record.sanitized();

        // One fetch per page, even when payloads repeat.
        let qr = match provider.fetch(&record.qr_data).await {
            Ok(bytes) => match JpegImage::from_bytes(&bytes) {
                Ok(image) => Some(image),
                Err(err) => {
                    warn!("page {}: fetched QR image failed to decode: {err}", index + 1);
                    None
                }
            },
            Err(err) => {
                warn!("page {}: QR fetch failed: {err}", index + 1);
                None
            }
        };

        let mut page = writer.begin_page();
        compose_page(&mut page, &record, qr, logo.clone(), &geometry);
        writer
            .finish_page(page)
            .map_err(|err| LabelError::Render(err.to_string()))?;

        mail_addresses.push(record.mail.clone());
        debug!("rendered page {} for '{}'", index + 1, record.title());
    }

    let bytes = writer
        .finish()
        .map_err(|err| LabelError::Render(err.to_string()))?;

    Ok(RenderedDocument {
        bytes,
        page_count: batch.len(),
        mail_addresses,
    })
}

fn compose_page(
    page: &mut PageBuilder,
    record: &LabelRecord,
    qr: Option<JpegImage>,
    logo: JpegImage,
    geometry: &Geometry,
) {
    // Fixed decoration: border outlining the upper half, logo top-right.
    page.rect(
        BORDER_INSET_MM,
        BORDER_INSET_MM,
        geometry.width_mm - 2.0 * BORDER_INSET_MM,
        geometry.half_height_mm() - 2.0 * BORDER_INSET_MM,
        BORDER_COLOR,
        BORDER_LINE_PT,
    );
    page.image(
        logo,
        geometry.width_mm - BORDER_INSET_MM - 2.0 - LOGO_WIDTH_MM,
        LOGO_TOP_MM,
        LOGO_WIDTH_MM,
        LOGO_HEIGHT_MM,
    );

    if let Some(image) = qr {
        page.image(
            image,
            geometry.width_mm - MARGIN_MM - QR_SIZE_MM,
            TITLE_TOP_MM + 4.0,
            QR_SIZE_MM,
            QR_SIZE_MM,
        );
    }

    page.text(MARGIN_MM, TITLE_TOP_MM, TITLE_SIZE_PT, true, &record.title());

    let mut state = PageLayoutState::new(TITLE_TOP_MM + TITLE_GAP_MM);
    for line in wrap_text(&record.content, BODY_WRAP_COLS) {
        page.text(MARGIN_MM, state.position(), BODY_SIZE_PT, false, &line);
        state.advance(LINE_HEIGHT_MM);
    }

    // Center the trailing metadata block in whatever is left of the
    // upper half instead of leaving it flush under the body.
    state.center_in_leftover(geometry.half_height_mm(), MARGIN_MM);

    page.text(
        MARGIN_MM,
        state.position(),
        BODY_SIZE_PT,
        false,
        &format!("Owner: {}", record.owner),
    );
    state.advance(LINE_HEIGHT_MM);
    page.text(
        MARGIN_MM,
        state.position(),
        BODY_SIZE_PT,
        false,
        &format!("Creator: {}", record.creator),
    );

    // Revision and position sit in a fixed corner of the label area.
    page.text(
        geometry.width_mm - MARGIN_MM - 45.0,
        geometry.half_height_mm() - 3.0,
        BODY_SIZE_PT,
        false,
        &format!("Rev {} / Pos {}", record.revision, record.position),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::input::RawEntries;
    use crate::models::ENCODING_ARTIFACT;
    use crate::qr::FetchError;
    use crate::stages::normalize::{NormalizeOptions, normalize};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubProvider {
        png: Vec<u8>,
    }

    #[async_trait]
    impl ImageProvider for StubProvider {
        async fn fetch(&self, _payload: &str) -> Result<Vec<u8>, FetchError> {
            Ok(self.png.clone())
        }
    }

    /// Fails only for one payload, so a single page loses its image.
    struct FailingProvider {
        fail_payload: String,
        png: Vec<u8>,
    }

    #[async_trait]
    impl ImageProvider for FailingProvider {
        async fn fetch(&self, payload: &str) -> Result<Vec<u8>, FetchError> {
            if payload == self.fail_payload {
                Err(FetchError::Status(503))
            } else {
                Ok(self.png.clone())
            }
        }
    }

    fn png_fixture() -> Vec<u8> {
        let mut buffer = Vec::new();
        let image = image::RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 0]));
        image::DynamicImage::ImageRgb8(image)
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageFormat::Png,
            )
            .unwrap();
        buffer
    }

    fn entry(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn batch_of(entries: Vec<HashMap<String, String>>) -> LabelBatch {
        normalize(RawEntries::Structured(entries), &NormalizeOptions::default())
    }

    #[tokio::test]
    async fn test_render_produces_one_page_per_record() {
        let batch = batch_of(vec![
            entry(&[("customer", "Acme"), ("qr_data", "P-1")]),
            entry(&[("customer", "Globex"), ("qr_data", "P-2")]),
            entry(&[("customer", "Initech")]),
        ]);
        let provider = StubProvider { png: png_fixture() };

        let document = render(&batch, &RenderConfig::default(), &provider)
            .await
            .unwrap();

        assert_eq!(document.page_count, 3);
        let parsed = lopdf::Document::load_mem(&document.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let entries = vec![
            entry(&[("customer", "Acme"), ("content", "mixed hardware")]),
            entry(&[("customer", "Globex")]),
        ];
        let provider = StubProvider { png: png_fixture() };
        let config = RenderConfig::default();

        let first = render(&batch_of(entries.clone()), &config, &provider)
            .await
            .unwrap();
        let second = render(&batch_of(entries), &config, &provider)
            .await
            .unwrap();

        assert_eq!(first.bytes, second.bytes);
    }

    #[tokio::test]
    async fn test_qr_failure_is_page_local() {
        let batch = batch_of(vec![
            entry(&[("customer", "First"), ("qr_data", "ok-1")]),
            entry(&[("customer", "Second"), ("qr_data", "broken")]),
            entry(&[("customer", "Third"), ("qr_data", "ok-2")]),
        ]);
        let provider = FailingProvider {
            fail_payload: "broken".to_string(),
            png: png_fixture(),
        };

        let document = render(&batch, &RenderConfig::default(), &provider)
            .await
            .unwrap();

        assert_eq!(document.page_count, 3);
        let parsed = lopdf::Document::load_mem(&document.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
        // The failed page still carries its text content.
        let text = parsed.extract_text(&[2]).unwrap();
        assert!(text.contains("Second"));
    }

    #[tokio::test]
    async fn test_undecodable_image_is_page_local() {
        let batch = batch_of(vec![entry(&[("customer", "Acme")])]);
        let provider = StubProvider {
            png: b"not an image".to_vec(),
        };

        let document = render(&batch, &RenderConfig::default(), &provider)
            .await
            .unwrap();
        assert_eq!(document.page_count, 1);
    }

    #[tokio::test]
    async fn test_two_record_scenario_defaults_and_mail_policy() {
        let batch = batch_of(vec![
            entry(&[
                ("customer", "Acme"),
                ("order", "PO-17"),
                ("content", "mixed hardware"),
                ("owner", "Dock 4"),
                ("creator", "jdoe"),
                ("revision", "R3"),
                ("position", "A-01"),
                ("mail", "first@example.com"),
                ("qr_data", "P-1"),
            ]),
            entry(&[("customer", "Globex"), ("mail", "second@example.com")]),
        ]);
        let provider = StubProvider { png: png_fixture() };

        let document = render(&batch, &RenderConfig::default(), &provider)
            .await
            .unwrap();

        assert_eq!(document.page_count, 2);
        // Last record wins for the notification address.
        assert_eq!(document.final_address(), Some("second@example.com"));
        assert_eq!(
            document.mail_addresses,
            vec!["first@example.com", "second@example.com"]
        );

        let parsed = lopdf::Document::load_mem(&document.bytes).unwrap();
        let page_one = parsed.extract_text(&[1]).unwrap();
        assert!(page_one.contains("Owner: Dock 4"));
        let page_two = parsed.extract_text(&[2]).unwrap();
        assert!(page_two.contains("Owner: Default Owner"));
    }

    #[tokio::test]
    async fn test_render_strips_encoding_artifact() {
        let corrupted = format!("Dock{} 4", ENCODING_ARTIFACT);
        let batch = batch_of(vec![entry(&[
            ("customer", "Acme"),
            ("owner", corrupted.as_str()),
        ])]);
        let provider = StubProvider { png: png_fixture() };

        let document = render(&batch, &RenderConfig::default(), &provider)
            .await
            .unwrap();

        let parsed = lopdf::Document::load_mem(&document.bytes).unwrap();
        let text = parsed.extract_text(&[1]).unwrap();
        assert!(text.contains("Owner: Dock 4"));
        assert!(!text.contains(ENCODING_ARTIFACT));
    }

    #[tokio::test]
    async fn test_render_empty_batch_yields_empty_document() {
        let provider = StubProvider { png: png_fixture() };
        let document = render(&LabelBatch::default(), &RenderConfig::default(), &provider)
            .await
            .unwrap();

        assert_eq!(document.page_count, 0);
        assert!(document.final_address().is_none());
        assert!(document.bytes.starts_with(b"%PDF"));
    }
}
