use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    symbols::Marker,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};
use statlab_stats::normal;

const SAMPLES: u32 = 160;
/// Curves are drawn out to this many standard deviations.
const TAIL_SDS: f64 = 3.5;

/// A normal curve to plot.
#[derive(Debug, Clone, Copy)]
pub struct Curve {
    pub name: &'static str,
    pub mean: f64,
    pub sd: f64,
    pub color: Color,
}

/// Overlapping normal curves on shared axes.
#[derive(Debug)]
pub struct BellCurves<'a> {
    curves: &'a [Curve],
}

impl<'a> BellCurves<'a> {
    pub fn new(curves: &'a [Curve]) -> Self {
        Self { curves }
    }

    fn x_bounds(&self) -> [f64; 2] {
        let lo = self
            .curves
            .iter()
            .map(|c| c.mean - TAIL_SDS * c.sd)
            .fold(f64::INFINITY, f64::min);
        let hi = self
            .curves
            .iter()
            .map(|c| c.mean + TAIL_SDS * c.sd)
            .fold(f64::NEG_INFINITY, f64::max);
        if lo.is_finite() && hi.is_finite() && hi > lo {
            [lo, hi]
        } else {
            [-1.0, 1.0]
        }
    }

    fn points(curve: &Curve, [lo, hi]: [f64; 2]) -> Vec<(f64, f64)> {
        (0..=SAMPLES)
            .map(|i| {
                let x = lo + (hi - lo) * f64::from(i) / f64::from(SAMPLES);
                (x, normal::normal_pdf(x, curve.mean, curve.sd))
            })
            .collect()
    }
}

impl Widget for BellCurves<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let x_bounds = self.x_bounds();
        let data = self
            .curves
            .iter()
            .map(|curve| Self::points(curve, x_bounds))
            .collect::<Vec<_>>();
        let y_max = data
            .iter()
            .flatten()
            .map(|&(_, y)| y)
            .fold(0.0, f64::max);
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

        let datasets = self
            .curves
            .iter()
            .zip(&data)
            .map(|(curve, points)| {
                Dataset::default()
                    .name(curve.name)
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::new().fg(curve.color))
                    .data(points)
            })
            .collect::<Vec<_>>();
        let x_axis = Axis::default()
            .bounds(x_bounds)
            .style(Style::new().fg(Color::DarkGray))
            .labels([
                format!("{:.0}", x_bounds[0]),
                format!("{:.0}", f64::midpoint(x_bounds[0], x_bounds[1])),
                format!("{:.0}", x_bounds[1]),
            ]);
        let y_axis = Axis::default().bounds([0.0, y_max]);
        Chart::new(datasets)
            .x_axis(x_axis)
            .y_axis(y_axis)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_cover_every_curve() {
        let curves = [
            Curve {
                name: "A",
                mean: 0.0,
                sd: 10.0,
                color: Color::Cyan,
            },
            Curve {
                name: "B",
                mean: 30.0,
                sd: 10.0,
                color: Color::Magenta,
            },
        ];
        assert_eq!(BellCurves::new(&curves).x_bounds(), [-35.0, 65.0]);
        assert_eq!(BellCurves::new(&[]).x_bounds(), [-1.0, 1.0]);
    }

    #[test]
    fn test_points_peak_at_mean() {
        let curve = Curve {
            name: "A",
            mean: 0.0,
            sd: 1.0,
            color: Color::Cyan,
        };
        let points = BellCurves::points(&curve, [-1.0, 1.0]);
        assert_eq!(points.len(), 161);
        let peak = points.iter().max_by(|a, b| a.1.total_cmp(&b.1)).unwrap();
        assert!(peak.0.abs() < 1e-12);
    }
}
