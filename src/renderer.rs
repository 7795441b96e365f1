//! # ASCII Chart Rendering
//!
//! Terminal rendering of the speed curves for `--ascii`. Each series is
//! plotted one column per grid sample, with labelled Y-axis ticks on the
//! left and the speed range underneath. The optimum, when given, is drawn as
//! `X` instead of `•` so it can be spotted on both charts.

use crate::CurveSample;

const ROWS: usize = 16;
/// Space for Y-axis labels plus the axis line
const Y_AXIS_WIDTH: usize = 9;
/// Widest chart drawn; longer series are thinned to fit
const MAX_COLUMNS: usize = 72;

/// Format an axis value with precision that suits its magnitude
fn format_axis_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 10_000.0 {
        format!("{:.0}k", value / 1000.0)
    } else if magnitude >= 100.0 {
        format!("{value:.0}")
    } else if magnitude >= 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

/// Pick at most `MAX_COLUMNS` evenly spread indices, always keeping the ends.
fn column_indices(len: usize) -> Vec<usize> {
    if len <= MAX_COLUMNS {
        return (0..len).collect();
    }
    (0..MAX_COLUMNS)
        .map(|c| c * (len - 1) / (MAX_COLUMNS - 1))
        .collect()
}

/// Render one `(x, y)` series as an ASCII chart.
///
/// `marker_x` highlights the column whose x value is closest to it.
pub fn render_series(title: &str, points: &[(f64, f64)], marker_x: Option<f64>) -> String {
    let mut out = format!("{title}\n");
    if points.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let columns = column_indices(points.len());
    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (_, y)| {
            (min.min(*y), max.max(*y))
        });
    let span = max_y - min_y;

    let value_to_row = |y: f64| {
        if span <= f64::EPSILON {
            return ROWS / 2;
        }
        let normalized = (y - min_y) / span;
        ((1.0 - normalized) * (ROWS as f64 - 1.0)).round() as usize
    };

    let marker_column = marker_x.and_then(|mx| {
        columns
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = (points[**a].0 - mx).abs();
                let db = (points[**b].0 - mx).abs();
                da.total_cmp(&db)
            })
            .map(|(column, _)| column)
    });

    let mut grid = vec![vec![' '; columns.len() + Y_AXIS_WIDTH]; ROWS];
    for row in grid.iter_mut() {
        row[Y_AXIS_WIDTH - 1] = '│';
    }

    // Labels at top, middle and bottom rows
    for y in [max_y, (min_y + max_y) / 2.0, min_y] {
        let row = value_to_row(y);
        let label = format!("{:>width$}", format_axis_value(y), width = Y_AXIS_WIDTH - 2);
        for (i, ch) in label.chars().take(Y_AXIS_WIDTH - 2).enumerate() {
            grid[row][i] = ch;
        }
    }

    for (column, index) in columns.iter().enumerate() {
        let row = value_to_row(points[*index].1);
        grid[row][column + Y_AXIS_WIDTH] = if Some(column) == marker_column {
            'X'
        } else {
            '•'
        };
    }

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    // Speed axis below the chart
    let padding = " ".repeat(Y_AXIS_WIDTH - 1);
    out.push_str(&padding);
    out.push('└');
    out.push_str(&"─".repeat(columns.len()));
    out.push('\n');

    let left = format!("{:.1} km/h", points[columns[0]].0);
    let right = format!("{:.1} km/h", points[columns[columns.len() - 1]].0);
    let gap = columns.len().saturating_sub(left.len() + right.len()).max(1);
    out.push_str(&" ".repeat(Y_AXIS_WIDTH));
    out.push_str(&left);
    out.push_str(&" ".repeat(gap));
    out.push_str(&right);
    out.push('\n');
    out
}

/// Render both curves, marking the optimal speed on each.
pub fn render_curves(sample: &CurveSample, optimum_speed: Option<f64>) -> String {
    let mut out = render_series("Speed vs coverage (ha/h)", &sample.coverage, optimum_speed);
    out.push('\n');
    out.push_str(&render_series("Speed vs total cost", &sample.cost, optimum_speed));
    out
}

/// Print both curves to stdout.
pub fn draw_ascii(sample: &CurveSample, optimum_speed: Option<f64>) {
    print!("{}", render_curves(sample, optimum_speed));
}
