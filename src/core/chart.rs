use crate::core::Metric;
use crate::utils::error::{MetricsError, Result};
use plotters::prelude::*;

pub const CHART_SIZE: (u32, u32) = (800, 500);

fn chart_error<E: std::fmt::Display>(e: E) -> MetricsError {
    MetricsError::ChartError {
        message: e.to_string(),
    }
}

/// y 軸範圍：永遠包含 0，上方留 10% 空間
fn value_range(values: &[f64]) -> (f64, f64) {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let min = values.iter().copied().fold(0.0_f64, f64::min);
    let top = if max > 0.0 { max * 1.1 } else { 1.0 };
    let bottom = if min < 0.0 { min * 1.1 } else { 0.0 };
    (bottom, top)
}

/// 以 SVG 字串輸出長條圖，每個郵遞區號一根長條。
///
/// 沒有任何資料時回傳錯誤；呼叫端應先確認欄位有值。
pub fn render_bar_chart(metric: Metric, points: &[(&str, f64)]) -> Result<String> {
    if points.is_empty() {
        return Err(MetricsError::ChartError {
            message: format!("no {} values to plot", metric),
        });
    }

    let style = metric.chart_style();
    let (r, g, b) = style.color;
    let bar_color = RGBColor(r, g, b);
    let labels: Vec<String> = points.iter().map(|(p, _)| p.to_string()).collect();
    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let (bottom, top) = value_range(&values);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(style.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(90)
            .build_cartesian_2d((0..values.len()).into_segmented(), bottom..top)
            .map_err(chart_error)?;

        let label_for = |x: &SegmentValue<usize>| match x {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Postcode")
            .y_desc(style.y_label)
            .x_labels(values.len())
            .x_label_formatter(&label_for)
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(values.iter().enumerate().map(|(i, v)| {
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
                    bar_color.filled(),
                );
                bar.set_margin(0, 0, 12, 12);
                bar
            }))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}
