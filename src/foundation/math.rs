/// `n` evenly spaced values from `a` to `b` inclusive. A single sample sits at `a`.
pub(crate) fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![a],
        _ => {
            let step = (b - a) / ((n - 1) as f64);
            (0..n)
                .map(|i| if i == n - 1 { b } else { a + (i as f64) * step })
                .collect()
        }
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Piecewise-linear interpolation of `(xs, ys)` at `q`, holding the end values outside the range.
///
/// `xs` must be sorted ascending and the same length as `ys` (non-empty).
pub(crate) fn interp1(xs: &[f64], ys: &[f64], q: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let last = xs.len() - 1;
    if q <= xs[0] {
        return ys[0];
    }
    if q >= xs[last] {
        return ys[last];
    }

    // First abscissa >= q; guaranteed in 1..=last by the checks above.
    let j = xs.partition_point(|&x| x < q);
    let (x0, x1) = (xs[j - 1], xs[j]);
    let span = x1 - x0;
    if x1 == q || span <= 0.0 {
        return ys[j];
    }
    lerp(ys[j - 1], ys[j], (q - x0) / span)
}
