// src/rendering/export.rs

use super::chart;
use super::layout::TableLayout;
use super::painter;
use crate::analysis::trends::TrendView;
use crate::error::{PtError, Result};
use crate::state::AppState;
use cairo::{Context, Format, ImageSurface, PdfSurface, SvgSurface};
use std::fs::File;
use std::path::Path;

pub const TABLE_SIZE: (f64, f64) = (1800.0, 1000.0);
pub const CHART_SIZE: (f64, f64) = (1000.0, 650.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Pdf,
    Svg,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Pdf, ImageFormat::Svg];

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Pdf => "pdf",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG Image",
            ImageFormat::Pdf => "PDF Document",
            ImageFormat::Svg => "SVG Vector",
        }
    }

    /// Guessed from the file extension, case-insensitive
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

/// Creates the right surface for `format`, runs `draw` on it and flushes to `path`
fn render_to_file<F>(path: &Path, format: ImageFormat, width: f64, height: f64, draw: F) -> Result<()>
where
    F: Fn(&Context) -> Result<()>,
{
    match format {
        ImageFormat::Png => {
            let surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
            {
                let cr = Context::new(&surface)?;
                draw(&cr)?;
            }
            let mut file = File::create(path)?;
            surface.write_to_png(&mut file)?;
        }
        ImageFormat::Pdf => {
            let surface = PdfSurface::new(width, height, path)?;
            {
                let cr = Context::new(&surface)?;
                draw(&cr)?;
                cr.status()?;
            }
            surface.finish();
        }
        ImageFormat::Svg => {
            let surface = SvgSurface::new(width, height, Some(path))?;
            {
                let cr = Context::new(&surface)?;
                draw(&cr)?;
                cr.status()?;
            }
            surface.finish();
        }
    }
    log::info!("Exported {} to {:?}", format.extension().to_uppercase(), path);
    Ok(())
}

pub fn export_table(state: &AppState, path: &Path, format: ImageFormat) -> Result<()> {
    let (w, h) = TABLE_SIZE;
    let layout = TableLayout::compute(&state.elements, w, h);
    render_to_file(path, format, w, h, |cr| {
        painter::draw_table(cr, state, &layout)?;
        Ok(())
    })
}

pub fn export_chart(view: &TrendView, path: &Path, format: ImageFormat, dark: bool) -> Result<()> {
    if format == ImageFormat::Svg {
        return Err(PtError::Export("Trend charts export as PNG or PDF".to_string()));
    }
    let (w, h) = CHART_SIZE;
    render_to_file(path, format, w, h, |cr| chart::draw_on_cairo(cr, view, w, h, dark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrefStore;
    use crate::io::dataset;
    use std::fs;
    use std::path::PathBuf;

    fn state(dir: &Path) -> AppState {
        AppState::new(dataset::bundled().unwrap(), PrefStore::new(dir.join("prefs")))
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path(&PathBuf::from("t.PNG")), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path(&PathBuf::from("a/b.svg")), Some(ImageFormat::Svg));
        assert_eq!(ImageFormat::from_path(&PathBuf::from("noext")), None);
        assert_eq!(ImageFormat::from_path(&PathBuf::from("x.jpg")), None);
    }

    #[test]
    fn test_table_exports_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let mut st = state(dir.path());
        st.select_trend("density").unwrap();

        for format in ImageFormat::ALL {
            let path = dir.path().join(format!("table.{}", format.extension()));
            export_table(&st, &path, format).unwrap();
            let bytes = fs::read(&path).unwrap();
            assert!(!bytes.is_empty());
            match format {
                ImageFormat::Png => assert_eq!(&bytes[1..4], b"PNG"),
                ImageFormat::Pdf => assert!(bytes.starts_with(b"%PDF")),
                ImageFormat::Svg => assert!(String::from_utf8_lossy(&bytes).contains("<svg")),
            }
        }
    }

    #[test]
    fn test_chart_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut st = state(dir.path());
        st.select_trend("ionizationEnergy").unwrap();
        let view = st.trend.as_ref().unwrap();

        let png = dir.path().join("chart.png");
        export_chart(view, &png, ImageFormat::Png, false).unwrap();
        assert!(fs::metadata(&png).unwrap().len() > 0);

        let svg = dir.path().join("chart.svg");
        assert!(matches!(export_chart(view, &svg, ImageFormat::Svg, false), Err(PtError::Export(_))));
        assert!(!svg.exists());
    }
}
