use crate::dice::{
	modifier::Explode,
	roller::{FastRand, Iter, Max, Roller, Val},
	Arithmetic, Error, RollOptions, RollRecord, Rolls, Sides, Total,
};

#[test]
fn single_d20() {
	let options = RollOptions::default();
	let rolled = rolls_successfully_and_in_range(&options);
	assert_eq!(rolled.raw_rolls.len(), 1);
	assert_eq!(*rolled.options, options);
}

#[test]
fn double_d8() {
	let options = RollOptions::new(2, 8);
	let rolled = rolls_successfully_and_in_range(&options);
	assert_eq!(rolled.raw_rolls.len(), 2);
	assert_eq!(rolled.raw_rolls, rolled.modified_rolls);
}

#[test]
fn hundred_d42s() {
	let options = RollOptions::new(100, 42);
	let rolled = rolls_successfully_and_in_range(&options);
	assert_eq!(rolled.raw_rolls.len(), 100);
}

#[test]
fn exploding_max_d4s() {
	let options = RollOptions::builder().quantity(255).sides(4).explode(Explode::Each).build();
	let rolled = rolls_successfully_and_in_range(&options);

	let Rolls::Numeric(raw) = &rolled.raw_rolls else {
		panic!("expected numeric rolls");
	};
	let Rolls::Numeric(modified) = &rolled.modified_rolls else {
		panic!("expected numeric rolls");
	};

	let maxed = raw.iter().filter(|roll| **roll == 4).count();
	assert!(maxed > 0);
	assert_eq!(modified.len(), 255 + maxed);
	rolls_in_range(&modified[255..], 4);
}

#[test]
fn all_dice_sides_occur() {
	let options = RollOptions::new(20, 20);
	let mut roller = FastRand::default();
	let mut seen = Vec::new();

	for _ in 1..=100 {
		let rolled = roller.roll(&options).unwrap();
		let Rolls::Numeric(raw) = rolled.raw_rolls else {
			panic!("expected numeric rolls");
		};
		seen.extend(raw);
	}

	for side in 1..=20 {
		assert!(seen.contains(&side), "side {side} never rolled");
	}
}

#[test]
fn seeded_rollers_match() {
	let options = RollOptions::new(10, 100);
	let a = FastRand::with_seed(0x750c_38d5_7440).roll(&options).unwrap();
	let b = FastRand::with_seed(0x750c_38d5_7440).roll(&options).unwrap();
	assert_eq!(a.raw_rolls, b.raw_rolls);
	assert_eq!(a.total, b.total);
}

#[test]
fn fastrand_roller_from_rng() {
	let options = RollOptions::new(10, 100);
	let a = FastRand::new(fastrand::Rng::with_seed(7)).roll(&options).unwrap();
	let b = FastRand::with_seed(7).roll(&options).unwrap();
	assert_eq!(a.raw_rolls, b.raw_rolls);
}

#[test]
fn builder_sides() {
	let options = RollOptions::builder().quantity(2).sides(12).build();
	assert_eq!(options.sides, Sides::from(12));
	assert_eq!(options, RollOptions::new(2, 12));
}

#[test]
fn val_roller() {
	let options = RollOptions::new(4, 6);
	let rolled = Val(3).roll(&options).unwrap();
	assert_eq!(rolled.raw_rolls, Rolls::Numeric(vec![3, 3, 3, 3]));
	assert_eq!(rolled.total, Total::Numeric(12));
}

#[test]
fn max_roller() {
	let options = RollOptions::new(3, 8);
	let rolled = Max.roll(&options).unwrap();
	assert_eq!(rolled.raw_rolls, Rolls::Numeric(vec![8, 8, 8]));
	assert_eq!(rolled.total, Total::Numeric(24));
}

#[test]
fn iter_roller() {
	let mut roller = Iter::new([1, 2, 3, 6]);
	let three = RollOptions::new(3, 6);
	let rolled = roller.roll(&three).unwrap();
	assert_eq!(rolled.raw_rolls, Rolls::Numeric(vec![1, 2, 3]));
	assert!(roller.can_roll());

	let one = RollOptions::new(1, 6);
	let rolled = roller.roll(&one).unwrap();
	assert_eq!(rolled.total, Total::Numeric(6));
	assert!(!roller.can_roll());
}

#[test]
fn roller_through_mutable_reference() {
	let mut roller = Max;
	let borrowed = &mut roller;
	assert_eq!(borrowed.roll_die(12).unwrap(), 12);
}

#[test]
fn out_of_range_roller() {
	let options = RollOptions::new(1, 6);
	let result = Val(7).roll(&options);
	assert!(matches!(result, Err(Error::OutOfRange { max: 6, value: 6 })));

	let result = Val(0).roll(&options);
	assert!(matches!(result, Err(Error::OutOfRange { max: 6, value: u32::MAX })));
}

#[test]
fn custom_faces() {
	let options = RollOptions::with_faces(2, ["heads", "tails", "edge"]);
	let rolled = Iter::new([2, 1]).roll(&options).unwrap();
	assert_eq!(rolled.raw_rolls, Rolls::Custom(vec!["tails".into(), "heads".into()]));
	assert_eq!(rolled.modified_rolls, rolled.raw_rolls);
	assert_eq!(rolled.total, Total::Custom("tails, heads".into()));
	assert_eq!(rolled.total.as_numeric(), None);
}

#[test]
fn custom_faces_ignore_modifiers() {
	let options = RollOptions::builder()
		.quantity(1)
		.faces(["x", "y"])
		.plus(5)
		.explode(Explode::Each)
		.build();
	let rolled = Max.roll(&options).unwrap();
	assert_eq!(rolled.modified_rolls, Rolls::Custom(vec!["y".into()]));
	assert_eq!(rolled.total, Total::Custom("y".into()));
}

#[test]
fn subtracting_pool_keeps_own_total() {
	let options = RollOptions::builder().quantity(1).sides(6).subtract().build();
	let rolled = Max.roll(&options).unwrap();
	assert_eq!(rolled.total, Total::Numeric(6));
	assert_eq!(rolled.signed_total().unwrap(), Total::Numeric(-6));
}

#[test]
fn total_overflow() {
	let options = RollOptions::builder().quantity(1).sides(6).plus(i32::MAX).build();
	let result = Max.roll(&options);
	assert!(matches!(result, Err(Error::Overflow(..))));
	assert!(result.unwrap_err().to_string().contains("overflow"));
}

#[test]
fn determinism() {
	assert!(RollOptions::new(3, 1).is_deterministic());
	assert!(RollOptions::with_faces(2, ["only"]).is_deterministic());
	assert!(!RollOptions::new(1, 6).is_deterministic());
}

#[test]
fn plain_strips_modifiers() {
	let options = RollOptions::builder()
		.quantity(4)
		.sides(6)
		.drop_lowest(1)
		.subtract()
		.key("stats")
		.build();
	let plain = options.plain();
	assert!(plain.modifiers.is_empty());
	assert_eq!(plain.quantity, 4);
	assert_eq!(plain.sides, Sides::Numeric(6));
	assert_eq!(plain.arithmetic, Arithmetic::Subtract);
	assert_eq!(plain.key.as_deref(), Some("stats"));
}

#[test]
fn record_into_owned() {
	let options = RollOptions::new(2, 6);
	let owned: RollRecord<'static> = Max.roll(&options).unwrap().into_owned();
	drop(options);
	assert_eq!(owned.total, Total::Numeric(12));
}

fn rolls_successfully_and_in_range(options: &RollOptions) -> RollRecord<'_> {
	let result = FastRand::default().roll(options);
	assert!(result.is_ok());

	let rolled = result.unwrap();
	let Rolls::Numeric(raw) = &rolled.raw_rolls else {
		panic!("expected numeric rolls");
	};
	rolls_in_range(raw, options.sides.count());

	rolled
}

fn rolls_in_range(rolls: &[i32], sides: u32) {
	let max = i32::try_from(sides).unwrap();
	assert!(rolls.iter().all(|roll| (1..=max).contains(roll)));
}
