/// Computes `ln(sum(exp(v)))` without overflowing on large inputs.
///
/// ### Example:
/// ```rust
/// use product_sniffer::utils::log_sum_exp;
///
/// let total = log_sum_exp(&[0.0_f64.ln(), 1.0_f64.ln(), 3.0_f64.ln()]);
/// assert!((total - 4.0_f64.ln()).abs() < 1e-12);
/// ```
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }

    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}
