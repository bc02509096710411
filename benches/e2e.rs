#![feature(test)]

extern crate test;

use test::Bencher;

use polyroll::{dice::roller::FastRand, roll::roll_with};

#[bench]
fn e2e_basic(b: &mut Bencher) {
	let mut rng = FastRand::default();
	b.iter(|| roll_with(["4d8+4"], &mut rng).unwrap().total);
}

#[bench]
fn e2e_complex(b: &mut Bencher) {
	let mut rng = FastRand::default();
	b.iter(|| {
		roll_with(["4d6L! + 2d10R{1}C{>8} - 3d6*2 + 1d{hope,fear}"], &mut rng)
			.unwrap()
			.total
	});
}
