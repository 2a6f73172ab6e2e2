//! Raster export: rasterize a mounted document and slice the image onto A4 pages.

use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::Bytes;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::{debug, info};

use super::surface::RenderSurface;
use super::{ExportError, ExportFormat, ExportedFile};
use crate::layout::page::{mm_to_pt, paginate, PageGeometry};
use crate::templates::RenderedDocument;

/// Resource name of the shared page image.
const IMAGE_NAME: &str = "Im0";

/// Remote images load from any origin regardless of these options.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Device pixels per CSS pixel.
    pub scale: f32,
    pub background: Rgb<u8>,
    /// Let the document reference `file://` resources.
    pub allow_local_files: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: Rgb([255, 255, 255]),
            allow_local_files: false,
        }
    }
}

/// Turns a rendered document into pixels, covering its full scroll height.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, target: &RenderedDocument, options: &RasterOptions) -> anyhow::Result<RgbaImage>;
}

/// Rasterizes the document mounted as `element_id` into an A4 PDF named `filename`.
pub async fn export_raster(
    surface: &RenderSurface,
    rasterizer: &dyn Rasterizer,
    element_id: &str,
    filename: &str,
) -> Result<ExportedFile, ExportError> {
    let target = surface.resolve(element_id).await?;
    let options = RasterOptions::default();

    let raster = rasterizer
        .rasterize(&target, &options)
        .await
        .context("Rasterization failed")?;
    debug!("Rasterized '{element_id}' to {}x{} px", raster.width(), raster.height());

    let opaque = flatten_onto(&raster, options.background);
    let geometry = PageGeometry::a4();
    let pdf = tokio::task::spawn_blocking(move || compose_pdf(&opaque, geometry))
        .await
        .context("PDF composition task failed")??;

    info!("Exported '{element_id}' as {filename} ({} bytes)", pdf.len());
    Ok(ExportedFile {
        filename: filename.to_string(),
        format: ExportFormat::Pdf,
        bytes: Bytes::from(pdf),
    })
}

/// Composites `image` over an opaque `background`.
pub fn flatten_onto(image: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let blend = |c: u8, bg: u8| {
            let (c, bg, a) = (u16::from(c), u16::from(bg), u16::from(a));
            ((c * a + bg * (255 - a) + 127) / 255) as u8
        };
        Rgb([
            blend(r, background[0]),
            blend(g, background[1]),
            blend(b, background[2]),
        ])
    })
}

/// Builds a PDF with one page per page-height of `image` drawn at full page width.
///
/// Every page references the same image object, shifted up by one page height
/// per page and clipped by the media box.
pub fn compose_pdf(image: &RgbImage, geometry: PageGeometry) -> anyhow::Result<Vec<u8>> {
    let (px_width, px_height) = image.dimensions();
    if px_width == 0 || px_height == 0 {
        bail!("Rasterizer produced an empty image ({px_width}x{px_height})");
    }

    let page_width = geometry.width_pt();
    let page_height = geometry.height_pt();
    let image_height_mm = geometry.image_height_mm(px_width, px_height);
    let image_height = mm_to_pt(image_height_mm);
    let placements = paginate(image_height_mm, geometry.height_mm);

    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();

    let mut image_stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(px_width)),
            "Height" => Object::Integer(i64::from(px_height)),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        image.as_raw().clone(),
    );
    image_stream.compress().context("Failed to compress page image")?;
    let image_id = document.add_object(image_stream);

    let resources_id = document.add_object(dictionary! {
        "XObject" => dictionary! { IMAGE_NAME => image_id },
    });

    let mut page_ids = Vec::with_capacity(placements.len());
    for placement in &placements {
        // PDF origin is bottom-left; the image top sits `offset` below the page top.
        let y = page_height - image_height - mm_to_pt(placement.offset_mm);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        page_width.into(),
                        0.into(),
                        0.into(),
                        image_height.into(),
                        0.into(),
                        y.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = document.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i32,
        }),
    );

    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    document.save_to(&mut out).context("Failed to write PDF")?;
    debug!(
        "Composed {} page(s) for a {:.1} mm tall image",
        page_ids.len(),
        image_height_mm
    );
    Ok(out)
}
