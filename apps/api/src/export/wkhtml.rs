use std::path::PathBuf;

use anyhow::{bail, Context};
use async_trait::async_trait;
use image::{ImageFormat, RgbaImage};
use tokio::process::Command;
use tracing::debug;

use super::raster::{RasterOptions, Rasterizer};
use crate::templates::RenderedDocument;

/// Rasterizes through the `wkhtmltoimage` command-line renderer.
///
/// The page is rendered at `width_px × scale` device pixels and as tall as its
/// content, so nothing below the fold is lost. wkhtmltoimage fetches remote
/// images from any origin by default; local file access stays off unless
/// `RasterOptions::allow_local_files` is set.
pub struct WkhtmlRasterizer {
    binary: PathBuf,
}

impl WkhtmlRasterizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }

    fn command(&self, options: &RasterOptions, width: u32) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--quiet")
            .args(["--format", "png"])
            .arg("--zoom")
            .arg(options.scale.to_string())
            .arg("--width")
            .arg(width.to_string());
        if options.allow_local_files {
            cmd.arg("--enable-local-file-access");
        }
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Rasterizer for WkhtmlRasterizer {
    async fn rasterize(&self, target: &RenderedDocument, options: &RasterOptions) -> anyhow::Result<RgbaImage> {
        let workdir = tempfile::tempdir().context("Failed to create rasterizer workdir")?;
        let input = workdir.path().join("resume.html");
        let output = workdir.path().join("resume.png");

        tokio::fs::write(&input, &target.html)
            .await
            .context("Failed to write rasterizer input")?;

        let width = (target.width_px as f32 * options.scale).round() as u32;
        debug!("Running {} at {width}px wide", self.binary.display());

        let result = self
            .command(options, width)
            .arg(&input)
            .arg(&output)
            .output()
            .await
            .with_context(|| format!("Failed to launch {}", self.binary.display()))?;

        if !result.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.binary.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            );
        }

        let png = tokio::fs::read(&output)
            .await
            .context("Rasterizer produced no image")?;
        let image = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .context("Rasterizer output is not a valid PNG")?;
        Ok(image.to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateId;

    #[tokio::test]
    async fn test_missing_binary_reports_launch_failure() {
        let rasterizer = WkhtmlRasterizer::new("/nonexistent/wkhtmltoimage");
        let target = RenderedDocument {
            template: TemplateId::Modern,
            html: "<p>x</p>".to_string(),
            width_px: 816,
        };
        let err = rasterizer
            .rasterize(&target, &RasterOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to launch"));
    }

    #[test]
    fn test_command_carries_zoom_and_width() {
        let rasterizer = WkhtmlRasterizer::new("wkhtmltoimage");
        let cmd = rasterizer.command(&RasterOptions::default(), 1632);
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--quiet",
                "--format",
                "png",
                "--zoom",
                "2",
                "--width",
                "1632"
            ]
        );
    }

    #[test]
    fn test_command_enables_local_files_on_request() {
        let rasterizer = WkhtmlRasterizer::new("wkhtmltoimage");
        let options = RasterOptions {
            allow_local_files: true,
            ..RasterOptions::default()
        };
        let cmd = rasterizer.command(&options, 816);
        let last = cmd.as_std().get_args().last().map(|a| a.to_string_lossy().into_owned());
        assert_eq!(last.as_deref(), Some("--enable-local-file-access"));
    }
}
