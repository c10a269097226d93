//! Regression diagnostics for value targets, evaluated on the host in `f64`.

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len() as f64;
    values.sum::<f64>() / n
}

fn population_variance(values: &[f64]) -> f64 {
    let mu = mean(values.iter().copied());
    mean(values.iter().map(|&v| (v - mu).powi(2)))
}

/// Population variance (no degrees-of-freedom correction).
pub fn variance(values: &[f32]) -> f64 {
    let values: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    population_variance(&values)
}

pub fn mean_squared_error(targets: &[f32], predictions: &[f32]) -> f64 {
    mean(
        targets
            .iter()
            .zip(predictions)
            .map(|(&t, &p)| (p as f64 - t as f64).powi(2)),
    )
}

/// `1 - Var(targets - predictions) / Var(targets)`.
///
/// Constant targets divide by zero and yield NaN or an infinity.
pub fn explained_variance(targets: &[f32], predictions: &[f32]) -> f64 {
    let residuals: Vec<f64> = targets
        .iter()
        .zip(predictions)
        .map(|(&t, &p)| t as f64 - p as f64)
        .collect();
    1.0 - population_variance(&residuals) / variance(targets)
}
