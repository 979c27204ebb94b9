//! Small helpers shared by tests, benchmarks and the fuzz target.

/// A deterministic splitmix64 generator.
///
/// Streams produced from the same seed are identical on every platform,
/// which keeps accuracy checks reproducible.
///
/// ```
/// use biased_quantiles::util::Xorshift;
///
/// let mut a = Xorshift::new(1972);
/// let mut b = Xorshift::new(1972);
/// assert_eq!(a.next_val(), b.next_val());
/// assert!(a.next_below(10) < 10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Xorshift {
    seed: u64,
}

impl Xorshift {
    /// Create a generator from `seed`
    pub fn new(seed: u64) -> Xorshift {
        Xorshift { seed }
    }

    /// The next 64 bits of the stream
    pub fn next_val(&mut self) -> u64 {
        // implementation inspired by
        // https://github.com/astocko/xorshift/blob/master/src/splitmix64.rs
        use std::num::Wrapping as w;

        let mut z = w(self.seed) + w(0x9E37_79B9_7F4A_7C15_u64);
        let nxt_seed = z.0;
        z = (z ^ (z >> 30)) * w(0xBF58_476D_1CE4_E5B9_u64);
        z = (z ^ (z >> 27)) * w(0x94D0_49BB_1331_11EB_u64);
        self.seed = nxt_seed;
        (z ^ (z >> 31)).0
    }

    /// The next value reduced into `[0, bound)`
    pub fn next_below(&mut self, bound: u64) -> u64 {
        assert!(bound != 0);
        self.next_val() % bound
    }
}
