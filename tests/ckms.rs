mod integration {
    mod ckms {
        use biased_quantiles::ckms::{Targets, CKMS};
        use biased_quantiles::util::Xorshift;
        use biased_quantiles::Error;

        const TARGETS: [(f64, f64); 4] = [(0.5, 0.05), (0.9, 0.01), (0.95, 0.005), (0.99, 0.001)];

        fn fill(seed: u64, n: usize) -> (CKMS<u32>, Vec<u32>) {
            let targets = Targets::new(TARGETS.iter().cloned()).unwrap();
            let mut ckms = CKMS::new(targets);
            let mut xshft = Xorshift::new(seed);
            let mut samples = Vec::with_capacity(n);
            for _ in 0..n {
                let v = xshft.next_below(100_000) as u32;
                samples.push(v);
                ckms.insert(v);
            }
            samples.sort();
            (ckms, samples)
        }

        // Distance from `desired` to the ranks occupied by `v` in `sorted`.
        fn rank_error(sorted: &[u32], v: u32, desired: f64) -> f64 {
            let lo = sorted.iter().take_while(|&&x| x < v).count() as f64;
            let hi = sorted.iter().take_while(|&&x| x <= v).count() as f64;
            if desired < lo {
                lo - desired
            } else if desired > hi {
                desired - hi
            } else {
                0.0
            }
        }

        #[test]
        fn million_uniform_samples() {
            let window = 1_000_000;
            let (mut ckms, samples) = fill(99, window);
            assert_eq!(window, ckms.count());

            let targets = ckms.targets().clone();
            for target in &targets {
                let q = target.quantile();
                let estimate = ckms.query(q).unwrap();
                let actual = samples[((window as f64) * q) as usize - 1];
                let err = ((estimate as f64) - (actual as f64)).abs() / (actual as f64);
                assert!(
                    err <= target.error(),
                    "{}: estimate={} actual={} off={:.6}",
                    target,
                    estimate,
                    actual,
                    err
                );
            }

            // memory stays far below the stream length
            assert!(ckms.len() < window / 100, "retained {}", ckms.len());
        }

        #[test]
        fn rank_error_within_targets() {
            let window = 100_000;
            let (mut ckms, samples) = fill(1972, window);

            for &(q, error) in TARGETS.iter() {
                let estimate = ckms.query(q).unwrap();
                let off = rank_error(&samples, estimate, q * (window as f64));
                assert!(
                    off <= error * (window as f64),
                    "q={} estimate={} rank off by {}",
                    q,
                    estimate,
                    off
                );
            }
        }

        #[test]
        fn rank_error_over_seeds() {
            let window = 100_000;
            for seed in 1..11 {
                let (mut ckms, samples) = fill(seed, window);
                for &(q, error) in TARGETS.iter() {
                    let estimate = ckms.query(q).unwrap();
                    let off = rank_error(&samples, estimate, q * (window as f64));
                    assert!(
                        off <= error * (window as f64),
                        "seed={} q={} estimate={} rank off by {}",
                        seed,
                        q,
                        estimate,
                        off
                    );
                }
            }
        }

        #[test]
        fn bounded_memory() {
            let (mut small, _) = fill(1972, 20_000);
            let (mut large, _) = fill(1972, 200_000);
            small.query(0.5).unwrap();
            large.query(0.5).unwrap();

            assert!(large.len() < 200_000 / 50);
            // ten times the input, well under ten times the summary
            assert!(large.len() < small.len() * 5);
        }

        #[test]
        fn monotone_over_targets() {
            let (mut ckms, _) = fill(7, 50_000);
            let mut last = 0;
            for q in &[0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.95, 0.99, 0.999] {
                let v = ckms.query(*q).unwrap();
                assert!(last <= v, "q={} gave {} after {}", q, v, last);
                last = v;
            }
        }

        #[test]
        fn repeated_queries_agree() {
            let (mut ckms, _) = fill(42, 10_000);
            let first: Vec<u32> = TARGETS
                .iter()
                .map(|&(q, _)| ckms.query(q).unwrap())
                .collect();
            let len = ckms.len();
            let second: Vec<u32> = TARGETS
                .iter()
                .map(|&(q, _)| ckms.query(q).unwrap())
                .collect();
            assert_eq!(first, second);
            assert_eq!(len, ckms.len());
        }

        #[test]
        fn single_value_and_empty() {
            let targets = Targets::new(TARGETS.iter().cloned()).unwrap();
            let mut ckms = CKMS::<f64>::new(targets);
            assert_eq!(Err(Error::EmptyStream), ckms.query(0.5));

            ckms.insert(3.25);
            for &(q, _) in TARGETS.iter() {
                assert_eq!(Ok(3.25), ckms.query(q));
            }
            assert_eq!(Ok(3.25), ckms.query(0.123));
        }
    }

    mod greenwald_khanna {
        use biased_quantiles::ckms::{Targets, CKMS};
        use biased_quantiles::greenwald_khanna::Stream;
        use biased_quantiles::util::Xorshift;

        fn rank_of(sorted: &[u32], v: u32) -> (usize, usize) {
            let lo = sorted.iter().take_while(|&&x| x < v).count();
            let hi = sorted.iter().take_while(|&&x| x <= v).count();
            (lo, hi)
        }

        #[test]
        fn agrees_with_ckms() {
            let n = 100_000;
            let (q, epsilon) = (0.9, 0.01);
            let mut stream = Stream::new(q, epsilon).unwrap();
            let mut ckms = CKMS::new(Targets::new(vec![(q, epsilon)]).unwrap());
            let mut xshft = Xorshift::new(1972);
            let mut samples = Vec::with_capacity(n);
            for _ in 0..n {
                let v = xshft.next_below(100_000) as u32;
                samples.push(v);
                stream.insert(v);
                ckms.insert(v);
            }
            samples.sort();
            assert_eq!(n, stream.count());

            let desired = q * (n as f64);
            let bound = epsilon * (n as f64);
            let gk = stream.query(q).unwrap();
            let biased = ckms.query(q).unwrap();
            for &v in &[gk, biased] {
                let (lo, hi) = rank_of(&samples, v);
                assert!(
                    (lo as f64) <= desired + bound && (hi as f64) >= desired - bound,
                    "{} holds ranks {}..{}, wanted {} +/- {}",
                    v,
                    lo,
                    hi,
                    desired,
                    bound
                );
            }

            // Both summaries sit well under the stream length.
            assert!(stream.len() < n / 50);
            assert!(ckms.len() < n / 50);
        }
    }
}
