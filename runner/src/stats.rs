/// Mean and population standard deviation (divides by N) of `values`.
///
/// Returns `None` for an empty slice.
pub fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    Some((mean, variance.sqrt()))
}

/// std / mean; non-finite when the mean is zero
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    mean_and_std(values).map(|(mean, std)| std / mean)
}
