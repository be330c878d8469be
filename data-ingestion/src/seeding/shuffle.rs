/// Linear congruential generator (Numerical Recipes constants) yielding
/// floats in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        f64::from(self.state) / 4_294_967_296.0
    }
}

/// Fisher–Yates shuffle driven by [`Lcg`]. Same seed and input order give the
/// same output order.
pub fn shuffle_deterministic<T: Clone>(items: &[T], seed: u32) -> Vec<T> {
    let mut next = items.to_vec();
    let mut rng = Lcg::new(seed);
    for i in (1..next.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64).floor() as usize;
        next.swap(i, j);
    }
    next
}
