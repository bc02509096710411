use core::iter;

use crate::dice::{
	modifier::{Comparison, Explode, ReplaceFrom},
	pipeline::{run, PoolState, MAX_REROLL_ATTEMPTS, MAX_UNIQUE_REJECTIONS},
	roller::{Iter, Max, Roller},
	RollOptions, RollRecord, Rolls, Total,
};

#[test]
fn minus_below_zero() {
	let options = RollOptions::builder().quantity(2).sides(1).minus(10).build();
	let rolled = Max.roll(&options).unwrap();
	assert_eq!(rolled.total, Total::Numeric(-8));

	let state = run(PoolState::new(vec![1, 1]), &options, &mut Max).unwrap();
	assert_eq!(state.total, -8);
}

#[test]
fn multiply_before_plus() {
	assert_eq!(roll_iter("2d1*2+3", [1, 1]).total, Total::Numeric(7));
}

#[test]
fn multiply_total_after_plus() {
	assert_eq!(roll_iter("2d1+3**2", [1, 1]).total, Total::Numeric(10));
}

#[test]
fn full_arithmetic_order() {
	assert_eq!(roll_iter("2d6**2-1+3*2", [2, 3]).total, Total::Numeric(24));
}

#[test]
fn reroll() {
	let rolled = roll_iter("2d6R{1}", [1, 1, 4, 5]);
	assert_eq!(rolled.raw_rolls, Rolls::Numeric(vec![1, 1]));
	assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![4, 5]));
}

#[test]
fn reroll_limit() {
	let options: RollOptions = "1d6R{1}2".parse().unwrap();
	let mut roller = Iter::new([1, 1, 1, 4]);
	let rolled = roller.roll(&options).unwrap();
	assert_eq!(rolled.total, Total::Numeric(1));
	assert!(roller.can_roll());
}

#[test]
fn reroll_ceiling() {
	let options: RollOptions = "1d6R{<7}".parse().unwrap();
	let draws = 1 + MAX_REROLL_ATTEMPTS as usize;
	let mut roller = Iter::new(iter::repeat(3).take(draws + 1));
	let rolled = roller.roll(&options).unwrap();
	assert_eq!(rolled.total, Total::Numeric(3));

	// Exactly one value should be left over
	assert!(roller.can_roll());
	let _ = roller.next(6);
	assert!(!roller.can_roll());
}

#[test]
fn replace_in_order() {
	assert_eq!(
		roll_iter("3d6V{1=2,>4=6}", [1, 5, 3]).modified_rolls,
		Rolls::Numeric(vec![2, 6, 3])
	);
	assert_eq!(roll_iter("1d6V{1=2,2=3}", [1]).total, Total::Numeric(3));
}

#[test]
fn replace_either_side_of_comparison() {
	let cmp = Comparison {
		greater_than: Some(5),
		less_than: Some(2),
	};
	let options = RollOptions::builder()
		.quantity(3)
		.sides(6)
		.replace(ReplaceFrom::Matching(cmp), 3)
		.build();
	let rolled = Iter::new([1, 6, 4]).roll(&options).unwrap();
	assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![3, 3, 4]));
	assert!(ReplaceFrom::Matching(cmp).matches(6));
	assert!(!ReplaceFrom::Exact(2).matches(3));
}

#[test]
fn cap() {
	assert_eq!(
		roll_iter("3d6C{>4,<2}", [1, 6, 3]).modified_rolls,
		Rolls::Numeric(vec![2, 4, 3])
	);
}

#[test]
fn explode_each() {
	let rolled = roll_iter("2d6!", [6, 6, 6, 1]);
	assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![6, 6, 6, 1]));
	assert_eq!(rolled.total, Total::Numeric(19));
}

#[test]
fn explode_uses_real_maximum() {
	// The capped 6 no longer explodes; the roller would panic if another die were drawn
	let rolled = roll_iter("2d6C{>5}!", [6, 2]);
	assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![5, 2]));
}

#[test]
fn explode_recursive() {
	let options = RollOptions::builder()
		.quantity(1)
		.sides(6)
		.explode(Explode::Recursive { limit: 5 })
		.build();
	let rolled = Iter::new([6, 6, 6, 2]).roll(&options).unwrap();
	assert_eq!(rolled.total, Total::Numeric(20));

	let options = RollOptions::builder()
		.quantity(1)
		.sides(6)
		.explode(Explode::Recursive { limit: 2 })
		.build();
	let rolled = Iter::new([6, 6, 6]).roll(&options).unwrap();
	assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![6, 6, 6]));
}

#[test]
fn unique() {
	let rolled = roll_iter("3d6U", [2, 2, 5, 2, 3]);
	assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![2, 3, 5]));
}

#[test]
fn unique_exceptions() {
	assert_eq!(roll_iter("3d6U{1}", [1, 1, 1]).total, Total::Numeric(3));
}

#[test]
fn unique_falls_back_to_free_faces() {
	let options: RollOptions = "2d2U".parse().unwrap();
	let draws = 2 + MAX_UNIQUE_REJECTIONS as usize + 1;
	let mut roller = Iter::new(iter::repeat(1).take(draws));
	let rolled = roller.roll(&options).unwrap();
	assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![1, 2]));
	assert!(!roller.can_roll());
}

#[test]
fn cap_before_unique() {
	assert_eq!(
		roll_iter("3d6C{>4}U", [5, 6, 1, 3]).modified_rolls,
		Rolls::Numeric(vec![4, 3, 1])
	);
}

#[test]
fn reroll_before_explode() {
	assert_eq!(roll_iter("1d6!R{6}", [6, 2]).total, Total::Numeric(2));
}

#[test]
fn drop_lowest() {
	let rolled = roll_iter("4d6L", [3, 1, 6, 4]);
	assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![3, 4, 6]));
	assert_eq!(rolled.total, Total::Numeric(13));
}

#[test]
fn drop_highest() {
	assert_eq!(roll_iter("4d6H2", [3, 1, 6, 4]).total, Total::Numeric(4));
}

#[test]
fn drop_matching() {
	let rolled = roll_iter("5d6D{1,>5}", [1, 6, 3, 1, 4]);
	assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![3, 4]));
}

#[test]
fn drop_matching_before_counts() {
	assert_eq!(roll_iter("5d6D{1}L", [1, 1, 3, 4, 5]).total, Total::Numeric(9));
}

#[test]
fn keep() {
	assert_eq!(roll_iter("4d6K", [3, 1, 6, 4]).modified_rolls, Rolls::Numeric(vec![6]));
	assert_eq!(roll_iter("4d6KL2", [3, 1, 6, 4]).total, Total::Numeric(4));

	let options = RollOptions::builder()
		.quantity(4)
		.sides(6)
		.keep_highest(1)
		.keep_lowest(1)
		.build();
	let rolled = Iter::new([3, 1, 6, 4]).roll(&options).unwrap();
	assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![1, 6]));
}

#[test]
fn keep_matches_equivalent_drop() {
	let kept = roll_iter("5d10K3", [7, 2, 9, 4, 4]);
	let dropped = roll_iter("5d10L2", [7, 2, 9, 4, 4]);
	assert_eq!(kept.modified_rolls, dropped.modified_rolls);
	assert_eq!(kept.total, dropped.total);
}

fn roll_iter<const N: usize>(notation: &str, values: [u32; N]) -> RollRecord<'static> {
	let options: RollOptions = notation.parse().unwrap();
	let mut roller = Iter::new(values);
	let rolled = roller.roll(&options).unwrap().into_owned();
	assert!(!roller.can_roll(), "not every value was rolled for {notation}");
	rolled
}
