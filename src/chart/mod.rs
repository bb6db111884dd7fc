mod canvas;

pub use canvas::BrailleCanvas;

/// Plot `values` as a connected line filling the canvas. The y axis runs from
/// zero (or the series minimum, if negative) up to the series maximum.
pub fn plot_series(canvas: &mut BrailleCanvas, values: &[i64]) {
    let (width, height) = (canvas.dot_width(), canvas.dot_height());
    if values.is_empty() || width == 0 || height == 0 {
        return;
    }

    let max = values.iter().copied().max().unwrap_or(0);
    let min = values.iter().copied().min().unwrap_or(0).min(0);
    let range = (max - min).max(1) as f64;
    let last_x = (width - 1) as f64;
    let last_y = (height - 1) as f64;
    let x_step = if values.len() > 1 {
        last_x / (values.len() - 1) as f64
    } else {
        0.0
    };

    let dot = |i: usize, value: i64| {
        let x = (i as f64 * x_step).round() as i32;
        let y = (last_y - (value - min) as f64 / range * last_y).round() as i32;
        (x, y)
    };

    let mut prev = dot(0, values[0]);
    canvas.set(prev.0, prev.1);
    for (i, &value) in values.iter().enumerate().skip(1) {
        let next = dot(i, value);
        canvas.line(prev, next);
        prev = next;
    }
}
