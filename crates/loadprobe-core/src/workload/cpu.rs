/// Computes `sum(sqrt(i) / ln(i + 1))` for `i` in `1..=iterations`.
///
/// The result is passed through [`std::hint::black_box`] so the loop
/// survives optimisation even when callers discard it. Zero iterations
/// return `0.0`.
pub fn run(iterations: u64) -> f64 {
    let mut acc = 0.0_f64;
    for i in 1..=iterations {
        let x = i as f64;
        acc += x.sqrt() / (x + 1.0).ln();
    }
    std::hint::black_box(acc)
}
