// src/rendering/chart.rs

use crate::analysis::trends::{period_color, TrendView};
use crate::error::{PtError, Result};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;
use plotters_cairo::CairoBackend;

/// Value range of the plotted points with 10% headroom on both sides.
/// Non-negative data never pads below zero.
pub fn value_range(view: &TrendView) -> Option<(f64, f64)> {
    let mut values = view.chart.iter().flat_map(|s| s.points.iter().map(|p| p.value));
    let first = values.next()?;
    let (lo, hi) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = if hi > lo { (hi - lo) * 0.1 } else { lo.abs().max(1.0) * 0.1 };
    let bottom = if lo >= 0.0 { (lo - pad).max(0.0) } else { lo - pad };
    Some((bottom, hi + pad))
}

/// One line per period across the main-block groups, with symbols on each point
pub fn draw_trend_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &TrendView,
    dark: bool,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let def = view.definition();
    let (bg, fg) = if dark {
        (RGBColor(30, 32, 38), RGBColor(230, 230, 230))
    } else {
        (WHITE, RGBColor(40, 40, 45))
    };
    root.fill(&bg)?;

    let Some((lo, hi)) = value_range(view) else {
        let (w, h) = root.dim_in_pixel();
        let style = ("sans-serif", 18).into_font().color(&fg);
        root.draw_text(
            "No main-group data for this trend",
            &style,
            (w as i32 / 2 - 140, h as i32 / 2),
        )?;
        return Ok(());
    };

    let mut chart = ChartBuilder::on(root)
        .caption(
            format!("Periodic Trend: {}", def.name),
            ("sans-serif", 20).into_font().color(&fg),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..19f64, lo..hi)?;

    let group_label = |v: &f64| {
        if *v >= 1.0 && *v <= 18.0 && v.fract() == 0.0 {
            format!("{}", *v as i32)
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .x_labels(20)
        .x_label_formatter(&group_label)
        .x_desc("Group")
        .y_desc(format!("{} ({})", def.name, def.unit))
        .axis_desc_style(("sans-serif", 15).into_font().color(&fg))
        .label_style(("sans-serif", 12).into_font().color(&fg))
        .axis_style(fg)
        .bold_line_style(fg.mix(0.15))
        .light_line_style(fg.mix(0.05))
        .draw()?;

    for series in &view.chart {
        let (r, g, b) = period_color(series.period);
        let color = RGBColor(r, g, b);
        let points: Vec<(f64, f64)> = series.points.iter().map(|p| (p.group as f64, p.value)).collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(format!("Period {}", series.period))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart.draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 5, color.filled())))?;

        chart.draw_series(series.points.iter().map(|p| {
            Text::new(
                p.symbol.clone(),
                (p.group as f64 + 0.15, p.value),
                ("sans-serif", 11).into_font().color(&fg),
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(bg.mix(0.85))
        .border_style(fg.mix(0.4))
        .label_font(("sans-serif", 12).into_font().color(&fg))
        .draw()?;

    Ok(())
}

/// Renders the chart onto any cairo context (widget, PNG or PDF surface)
pub fn draw_on_cairo(cr: &cairo::Context, view: &TrendView, width: f64, height: f64, dark: bool) -> Result<()> {
    let backend = CairoBackend::new(cr, (width as u32, height as u32))
        .map_err(|e| PtError::Render(format!("{:?}", e)))?;
    let root = backend.into_drawing_area();
    draw_trend_chart(&root, view, dark).map_err(|e| PtError::Render(e.to_string()))?;
    root.present().map_err(|e| PtError::Render(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::trends::{self, TrendKey};
    use crate::io::dataset;
    use crate::model::elements::fixtures::element;

    #[test]
    fn test_value_range_pads() {
        let elements = dataset::bundled().unwrap();
        let view = trends::compute(&elements, TrendKey::Electronegativity).unwrap();
        let (lo, hi) = value_range(&view).unwrap();
        let plotted: Vec<f64> = view.chart.iter().flat_map(|s| s.points.iter().map(|p| p.value)).collect();
        assert!(plotted.iter().all(|v| *v > lo && *v < hi));
        assert!(lo >= 0.0);
    }

    #[test]
    fn test_value_range_empty_chart() {
        // Only a transition metal has data, so nothing lands in the chart
        let mut fe = element(26, "Fe", Some(8), 4);
        fe.density = Some(7.874);
        let view = trends::compute(&[fe], TrendKey::Density).unwrap();
        assert!(view.chart.is_empty());
        assert_eq!(value_range(&view), None);
    }

    #[test]
    fn test_single_point_still_has_span() {
        let mut na = element(11, "Na", Some(1), 3);
        na.melting_point = Some(370.87);
        let view = trends::compute(&[na], TrendKey::MeltingPoint).unwrap();
        let (lo, hi) = value_range(&view).unwrap();
        assert!(hi > lo);
    }

    #[test]
    fn test_negative_values_keep_lower_padding() {
        let mut li = element(3, "Li", Some(1), 2);
        li.melting_point = Some(-20.0);
        let mut be = element(4, "Be", Some(2), 2);
        be.melting_point = Some(-5.0);
        let view = trends::compute(&[li, be], TrendKey::MeltingPoint).unwrap();
        let (lo, hi) = value_range(&view).unwrap();
        assert!(lo < -20.0);
        assert!(hi > -5.0);
    }

    #[test]
    fn test_renders_to_image_surface() {
        let elements = dataset::bundled().unwrap();
        let view = trends::compute(&elements, TrendKey::AtomicRadius).unwrap();
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 800, 500).unwrap();
        let cr = cairo::Context::new(&surface).unwrap();
        draw_on_cairo(&cr, &view, 800.0, 500.0, false).unwrap();
        draw_on_cairo(&cr, &view, 800.0, 500.0, true).unwrap();
    }
}
