//! Page geometry for raster export: ISO A4 and the image-slicing pagination.
//!
//! Lengths are millimetres until the PDF writer converts them to points.

use serde::Serialize;

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

const POINTS_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageGeometry {
    pub fn a4() -> Self {
        PageGeometry {
            width_mm: A4_WIDTH_MM,
            height_mm: A4_HEIGHT_MM,
        }
    }

    pub fn width_pt(&self) -> f32 {
        mm_to_pt(self.width_mm)
    }

    pub fn height_pt(&self) -> f32 {
        mm_to_pt(self.height_mm)
    }

    /// Height of a `px_width × px_height` raster drawn at full page width.
    pub fn image_height_mm(&self, px_width: u32, px_height: u32) -> f32 {
        if px_width == 0 {
            return 0.0;
        }
        px_height as f32 * self.width_mm / px_width as f32
    }
}

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Where the full image is drawn on one page.
///
/// `offset_mm` is the distance from the page top to the image top; it is 0 on
/// the first page and one page height further up (negative) on each next page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImagePlacement {
    pub page_index: usize,
    pub offset_mm: f32,
}

/// Slices an image of `image_height_mm` into pages of `page_height_mm`.
///
/// The whole image is redrawn on every page, shifted up by one page height per
/// page, until no unrendered height remains. Always yields at least one page.
pub fn paginate(image_height_mm: f32, page_height_mm: f32) -> Vec<ImagePlacement> {
    let mut placements = vec![ImagePlacement {
        page_index: 0,
        offset_mm: 0.0,
    }];

    if page_height_mm <= 0.0 {
        return placements;
    }

    let mut height_left = image_height_mm - page_height_mm;
    while height_left > 0.0 {
        let page_index = placements.len();
        placements.push(ImagePlacement {
            page_index,
            offset_mm: -(page_index as f32) * page_height_mm,
        });
        height_left -= page_height_mm;
    }

    placements
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_image_fits_one_page() {
        let pages = paginate(120.0, A4_HEIGHT_MM);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].offset_mm, 0.0);
    }

    #[test]
    fn test_exact_page_height_is_one_page() {
        assert_eq!(paginate(A4_HEIGHT_MM, A4_HEIGHT_MM).len(), 1);
    }

    #[test]
    fn test_page_count_is_ceiling_of_ratio() {
        for height in [10.0_f32, 296.0, 298.0, 400.0, 594.0, 600.0, 1000.0, 2970.0] {
            let expected = (height / A4_HEIGHT_MM).ceil() as usize;
            assert_eq!(
                paginate(height, A4_HEIGHT_MM).len(),
                expected,
                "height {height}"
            );
        }
    }

    #[test]
    fn test_each_page_shifts_by_one_page_height() {
        let pages = paginate(800.0, A4_HEIGHT_MM);
        assert_eq!(pages.len(), 3);
        for pair in pages.windows(2) {
            let step = pair[0].offset_mm - pair[1].offset_mm;
            assert!((step - A4_HEIGHT_MM).abs() < 1e-3);
        }
        assert_eq!(pages[2].page_index, 2);
    }

    #[test]
    fn test_empty_image_still_yields_a_page() {
        assert_eq!(paginate(0.0, A4_HEIGHT_MM).len(), 1);
    }

    #[test]
    fn test_image_height_follows_aspect_ratio() {
        let a4 = PageGeometry::a4();
        // 1632×2244 px raster → 210 × 288.75 mm
        let h = a4.image_height_mm(1632, 2244);
        assert!((h - 288.75).abs() < 1e-3);
        assert_eq!(a4.image_height_mm(0, 100), 0.0);
    }

    #[test]
    fn test_a4_in_points() {
        let a4 = PageGeometry::a4();
        assert!((a4.width_pt() - 595.28).abs() < 0.01);
        assert!((a4.height_pt() - 841.89).abs() < 0.01);
    }
}
