use crate::{
	dice::{
		modifier::{Comparison, ReplaceFrom},
		RollOptions,
	},
	notation::{is_dice_notation, to_description, to_notation, validate_notation, DiceNotation, Error},
	parse::parse,
};

#[test]
fn canonical_notation() {
	for (input, canonical) in [
		("4d6", "4d6"),
		("4D6l", "4d6L"),
		("1d6H1", "1d6H"),
		("8d6L2H3", "8d6H3L2"),
		("2d20k", "2d20K"),
		("4d20kl2", "4d20KL2"),
		("6d6d{1, >5, <2}", "6d6D{1,>5,<2}"),
		("3d6v{1=2,>4=6}", "3d6V{1=2,>4=6}"),
		("4d6!R{1}3C{>5}", "4d6C{>5}R{1}3!"),
		("4d6U{1,2}", "4d6U{1,2}"),
		("2d6**2-1+3*2", "2d6+3-1*2**2"),
		("1d20+2+3", "1d20+5"),
		("2d{heads,tails}", "2d{heads,tails}"),
	] {
		let options: RollOptions = input.parse().unwrap();
		assert_eq!(options.to_string(), canonical, "canonical form of {input}");
	}
}

#[test]
fn two_sided_replacement_renders_as_pairs() {
	let cmp = Comparison {
		greater_than: Some(5),
		less_than: Some(2),
	};
	let options = RollOptions::builder()
		.quantity(3)
		.sides(6)
		.replace(ReplaceFrom::Matching(cmp), 3)
		.build();
	assert_eq!(options.to_string(), "3d6V{>5=3,<2=3}");
}

#[test]
fn empty_cap_is_not_rendered() {
	let options = RollOptions::builder().quantity(3).sides(6).cap(Comparison::default()).build();
	assert!(Comparison::default().is_empty());
	assert_eq!(options.to_string(), "3d6");
	assert_eq!(to_description(&options), ["Roll 3 6-sided dice"]);
}

#[test]
fn round_trip() {
	for input in [
		"4d6L",
		"2d20H!+3",
		"10d10D{1,>9}KL3R{<3}2",
		"6d8C{>6,<2}V{1=2,>5=8}U{4}",
		"3d6*2-1**3",
		"1d{a,b,c}",
	] {
		let options: RollOptions = input.parse().unwrap();
		let rendered: RollOptions = options.to_string().parse().unwrap();
		assert_eq!(rendered, options, "round trip of {input}");
	}
}

#[test]
fn multiple_term_notation() {
	let options = parse("-1d4 + 2d6L - 1d8!").unwrap();
	assert_eq!(to_notation(&options), "-1d4+2d6L-1d8!");
	assert_eq!(parse(&to_notation(&options)).unwrap(), options);
	assert_eq!(to_notation(&[]), "");
}

#[test]
fn plain_descriptions() {
	assert_eq!(to_description(&RollOptions::new(1, 20)), ["Roll 1 20-sided die"]);
	assert_eq!(
		to_description(&RollOptions::with_faces(2, ["a", "b"])),
		["Roll 2 dice with the following sides: a, b"]
	);
}

#[test]
fn every_modifier_description() {
	let options: RollOptions = "4d6C{>5}H2D{1,3}KL2V{1=2}R{1,>5}!U{1}+1-2*3**4".parse().unwrap();
	assert_eq!(
		to_description(&options),
		[
			"Roll 4 6-sided dice",
			"No Rolls greater than [5]",
			"Drop highest 2",
			"Drop [1] and [3]",
			"Keep lowest 2",
			"Replace [1] with [2]",
			"Reroll [1] and greater than [5]",
			"Exploding Dice",
			"No Duplicate Rolls (except [1])",
			"Add 1",
			"Subtract 2",
			"Multiply dice by 3",
			"Multiply total by 4",
		]
	);
}

#[test]
fn reroll_descriptions() {
	let options: RollOptions = "4d6R{1}1".parse().unwrap();
	assert_eq!(to_description(&options)[1], "Reroll [1] (up to 1 time)");

	let options: RollOptions = "4d6R{1,2,<2}".parse().unwrap();
	assert_eq!(to_description(&options)[1], "Reroll [1] and [2] and less than [2]");
}

#[test]
fn dice_notation_trims() {
	let notation = DiceNotation::new("\t1d20 + 4 \n").unwrap();
	assert_eq!(notation.as_str(), "1d20 + 4");
	assert_eq!(notation.to_string(), "1d20 + 4");
	assert_eq!(notation.options()[0].modifiers.plus, Some(4));

	let parsed: DiceNotation = " 2d6 ".parse().unwrap();
	assert_eq!(parsed.into_options(), [RollOptions::new(2, 6)]);
}

#[test]
fn dice_notation_rejects_invalid() {
	let err = DiceNotation::new("4d6 X").unwrap_err();
	assert_eq!(err.input, "4d6 X");
	assert!(DiceNotation::new("").is_err());
}

#[test]
fn notation_predicate() {
	assert!(is_dice_notation("4d6L"));
	assert!(is_dice_notation("  1d20 + 2d6 - 1d4  "));
	assert!(is_dice_notation("1d{a,b}"));
	assert!(!is_dice_notation(""));
	assert!(!is_dice_notation("d6"));
	assert!(!is_dice_notation("4d6 X"));
	assert!(!is_dice_notation("twenty"));
}

#[test]
fn validated_notation() {
	let validated = validate_notation(" 4d6L + 1d{a,b} ").unwrap();
	assert_eq!(validated.notation.as_str(), "4d6L + 1d{a,b}");
	assert_eq!(validated.canonical, ["4d6L", "1d{a,b}"]);
	assert_eq!(validated.description.len(), 2);
	assert_eq!(validated.description[1], ["Roll 1 die with the following sides: a, b"]);
}

#[test]
fn notation_validation_errors() {
	assert!(matches!(validate_notation("4d6 X"), Err(Error::Parse(..))));
	assert!(matches!(validate_notation("2d6L2"), Err(Error::Invalid(..))));
	assert!(matches!(validate_notation("1d6+7d6U"), Err(Error::Invalid(..))));

	let Err(Error::Parse(err)) = validate_notation("d20") else {
		panic!("expected a parse error");
	};
	assert_eq!(err.suggestion.as_deref(), Some("1d20"));
}
