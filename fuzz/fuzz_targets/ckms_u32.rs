#![no_main]
use libfuzzer_sys::fuzz_target;

use std::io::Cursor;

use biased_quantiles::ckms::{Targets, CKMS};
use biased_quantiles::util::Xorshift;
use biased_quantiles::Error;
use byteorder::{BigEndian, ReadBytesExt};

fuzz_target!(|data: &[u8]| {
    let mut cursor = Cursor::new(data);

    // unbounded, out of range pairs must be rejected rather than panic
    let q: f64 = match cursor.read_f64::<BigEndian>() {
        Ok(res) => res,
        Err(_) => return,
    };
    let error: f64 = match cursor.read_f64::<BigEndian>() {
        Ok(res) => res,
        Err(_) => return,
    };
    // bounded 2**16
    let upper_bound: u32 = match cursor.read_u32::<BigEndian>() {
        Ok(res) => res % 65_536,
        Err(_) => return,
    };
    let buffer_capacity: u16 = match cursor.read_u16::<BigEndian>() {
        Ok(res) => res,
        Err(_) => return,
    };
    // unbounded
    let seed: u64 = match cursor.read_u64::<BigEndian>() {
        Ok(res) => res,
        Err(_) => return,
    };

    let targets = match Targets::new(vec![(q, error), (0.99, 0.001)]) {
        Ok(targets) => targets,
        Err(_) => return,
    };
    let mut xshft = Xorshift::new(seed);
    let mut ckms = CKMS::<u32>::with_buffer_capacity(targets, buffer_capacity as usize);
    assert_eq!(Err(Error::EmptyStream), ckms.query(q));
    let mut mn = u32::max_value();
    let mut mx = u32::min_value();
    for _ in 0..(upper_bound as usize) {
        let v = xshft.next_val() as u32;
        mn = mn.min(v);
        mx = mx.max(v);
        ckms.insert(v);
    }
    if upper_bound > 0 {
        let v = ckms.query(q).unwrap();
        assert!(mn <= v && v <= mx);
        assert_eq!(upper_bound as usize, ckms.count());
    }
});
