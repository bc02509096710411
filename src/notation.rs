//! Validated notation strings and rendering of [`RollOptions`] back into notation and human-readable descriptions.

use alloc::{
	format,
	string::{String, ToString},
	vec,
	vec::Vec,
};
use core::fmt;

use crate::dice::{
	modifier::{Comparison, Explode, Modifiers, ReplaceFrom, Unique},
	Arithmetic, RollOptions, Sides,
};
#[cfg(feature = "parse")]
use crate::{
	dice::{validate, ValidationError},
	parse,
};

/// Notation string that is guaranteed to match the grammar.
/// Leading and trailing whitespace is trimmed on creation.
///
/// # Examples
/// ```
/// use polyroll::notation::DiceNotation;
///
/// let notation = DiceNotation::new("  2d20H!+3 ")?;
/// assert_eq!(notation.as_str(), "2d20H!+3");
/// assert_eq!(notation.options().len(), 1);
/// # Ok::<(), polyroll::parse::Error>(())
/// ```
#[cfg(feature = "parse")]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiceNotation {
	/// Trimmed notation
	raw: String,

	/// Options parsed from the notation
	options: Vec<RollOptions>,
}

#[cfg(feature = "parse")]
impl DiceNotation {
	/// Parses and wraps a notation string.
	///
	/// # Errors
	/// If the trimmed string doesn't match the grammar, the parse error is returned.
	pub fn new(notation: &str) -> Result<Self, parse::Error> {
		let raw = notation.trim();
		let options = parse::parse(raw)?;
		Ok(Self {
			raw: raw.to_string(),
			options,
		})
	}

	/// Gets the notation string.
	#[must_use]
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Gets the options for every term of the notation.
	#[must_use]
	#[inline]
	pub fn options(&self) -> &[RollOptions] {
		&self.options
	}

	/// Takes ownership of the options for every term of the notation.
	#[must_use]
	#[inline]
	pub fn into_options(self) -> Vec<RollOptions> {
		self.options
	}
}

#[cfg(feature = "parse")]
impl core::str::FromStr for DiceNotation {
	type Err = parse::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

#[cfg(feature = "parse")]
impl fmt::Display for DiceNotation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

/// Checks whether a string is valid dice notation. Never fails; whitespace around the notation is ignored.
///
/// # Examples
/// ```
/// use polyroll::notation::is_dice_notation;
///
/// assert!(is_dice_notation("4d6L"));
/// assert!(is_dice_notation(" 1d20 + 2d6 "));
/// assert!(!is_dice_notation("4 d 6"));
/// assert!(!is_dice_notation("hello"));
/// ```
#[cfg(feature = "parse")]
#[must_use]
pub fn is_dice_notation(candidate: &str) -> bool {
	DiceNotation::new(candidate).is_ok()
}

/// Everything known about a notation string that parsed and validated successfully
#[cfg(feature = "parse")]
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Validated {
	/// Notation that was validated
	pub notation: DiceNotation,

	/// Canonical notation for each term
	pub canonical: Vec<String>,

	/// Description of each term
	pub description: Vec<Vec<String>>,
}

/// Parses a notation string and validates every term of it, without rolling anything.
///
/// # Errors
/// If the notation doesn't parse, or any of its terms fail validation, an error variant is returned.
///
/// # Examples
/// ```
/// use polyroll::notation::{validate_notation, Error};
///
/// let validated = validate_notation("4d6l")?;
/// assert_eq!(validated.canonical, ["4d6L"]);
/// assert_eq!(validated.description[0], ["Roll 4 6-sided dice", "Drop lowest"]);
///
/// assert!(matches!(validate_notation("4d6L4"), Err(Error::Invalid(..))));
/// assert!(matches!(validate_notation("4d6X"), Err(Error::Parse(..))));
/// # Ok::<(), Error>(())
/// ```
#[cfg(feature = "parse")]
pub fn validate_notation(notation: &str) -> Result<Validated, Error> {
	let notation = DiceNotation::new(notation)?;
	for options in notation.options() {
		validate(options)?;
	}

	Ok(Validated {
		canonical: notation.options().iter().map(ToString::to_string).collect(),
		description: notation.options().iter().map(to_description).collect(),
		notation,
	})
}

/// An error resulting from validating notation
#[cfg(feature = "parse")]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// The notation didn't match the grammar
	#[error(transparent)]
	Parse(#[from] parse::Error),

	/// The notation parsed, but describes dice that can't be rolled
	#[error(transparent)]
	Invalid(#[from] ValidationError),
}

impl fmt::Display for Sides {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Numeric(sides) => write!(f, "{sides}"),
			Self::Faces(faces) => write!(f, "{{{}}}", faces.join(",")),
		}
	}
}

impl fmt::Display for RollOptions {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is the canonical notation for the pool, ignoring its [`Arithmetic`]: a lowercase `d`, uppercase
	/// modifier letters, and modifiers in the order cap, drop, keep, replace, reroll, explode, unique, plus, minus,
	/// multiply, multiply total.
	///
	/// # Examples
	/// ```
	/// use polyroll::dice::RollOptions;
	///
	/// let options: RollOptions = "4D6+2 r{1} l c{<2}".parse()?;
	/// assert_eq!(options.to_string(), "4d6C{<2}LR{1}+2");
	/// # Ok::<(), polyroll::parse::Error>(())
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}d{}", self.quantity, self.sides)?;
		write_modifiers(f, &self.modifiers)
	}
}

/// Writes every present modifier in canonical order.
fn write_modifiers(f: &mut impl fmt::Write, mods: &Modifiers) -> fmt::Result {
	if let Some(cap) = mods.cap.as_ref().filter(|cap| !cap.is_empty()) {
		write!(f, "C{{{}}}", comparison_list(cap).join(","))?;
	}

	if let Some(drop) = &mods.drop {
		write_count(f, 'H', drop.highest)?;
		write_count(f, 'L', drop.lowest)?;

		let mut conds = drop.exact.iter().map(ToString::to_string).collect::<Vec<_>>();
		conds.extend(comparison_list(&drop.comparison()));
		if !conds.is_empty() {
			write!(f, "D{{{}}}", conds.join(","))?;
		}
	}

	if let Some(keep) = &mods.keep {
		if let Some(count) = keep.highest {
			write!(f, "K{}", count_suffix(count))?;
		}
		if let Some(count) = keep.lowest {
			write!(f, "KL{}", count_suffix(count))?;
		}
	}

	if !mods.replace.is_empty() {
		let pairs = mods
			.replace
			.iter()
			.flat_map(|replace| match replace.from {
				ReplaceFrom::Exact(from) => vec![format!("{from}={}", replace.to)],
				// Each side of a comparison becomes its own pair, which replaces exactly the same values
				ReplaceFrom::Matching(cmp) => comparison_list(&cmp)
					.into_iter()
					.map(|cond| format!("{cond}={}", replace.to))
					.collect(),
			})
			.collect::<Vec<_>>();
		write!(f, "V{{{}}}", pairs.join(","))?;
	}

	if let Some(reroll) = &mods.reroll {
		let mut conds = reroll.exact.iter().map(ToString::to_string).collect::<Vec<_>>();
		conds.extend(comparison_list(&Comparison {
			greater_than: reroll.greater_than,
			less_than: reroll.less_than,
		}));
		write!(f, "R{{{}}}", conds.join(","))?;
		if let Some(max) = reroll.max {
			write!(f, "{max}")?;
		}
	}

	if mods.explode.is_some() {
		f.write_char('!')?;
	}

	match &mods.unique {
		Some(Unique::All) => f.write_char('U')?,
		Some(Unique::Except(values)) => write!(f, "U{{{}}}", join_values(values, ","))?,
		None => {}
	}

	if let Some(plus) = mods.plus {
		write!(f, "+{plus}")?;
	}
	if let Some(minus) = mods.minus {
		write!(f, "-{minus}")?;
	}
	if let Some(multiply) = mods.multiply {
		write!(f, "*{multiply}")?;
	}
	if let Some(multiply_total) = mods.multiply_total {
		write!(f, "**{multiply_total}")?;
	}

	Ok(())
}

/// Writes a drop token with its count, omitting a count of 1.
fn write_count(f: &mut impl fmt::Write, token: char, count: Option<u32>) -> fmt::Result {
	match count {
		Some(count) => write!(f, "{token}{}", count_suffix(count)),
		None => Ok(()),
	}
}

/// Count as written after a token: nothing for 1, the number otherwise.
fn count_suffix(count: u32) -> String {
	if count == 1 {
		String::new()
	} else {
		count.to_string()
	}
}

/// Renders each side of a comparison as a `>n` or `<n` condition.
fn comparison_list(cmp: &Comparison) -> Vec<String> {
	cmp.greater_than
		.map(|gt| format!(">{gt}"))
		.into_iter()
		.chain(cmp.less_than.map(|lt| format!("<{lt}")))
		.collect()
}

/// Joins values with a separator.
fn join_values(values: &[i32], sep: &str) -> String {
	values.iter().map(ToString::to_string).collect::<Vec<_>>().join(sep)
}

/// Renders the canonical notation for a full expression, joining terms by their [`Arithmetic`].
///
/// # Examples
/// ```
/// use polyroll::{notation::to_notation, parse::parse};
///
/// let options = parse("1d20 + 2d6L - 1d8")?;
/// assert_eq!(to_notation(&options), "1d20+2d6L-1d8");
/// # Ok::<(), polyroll::parse::Error>(())
/// ```
#[must_use]
pub fn to_notation(options: &[RollOptions]) -> String {
	let mut notation = String::new();
	for (idx, opts) in options.iter().enumerate() {
		match opts.arithmetic {
			Arithmetic::Subtract => notation.push('-'),
			Arithmetic::Add if idx > 0 => notation.push('+'),
			Arithmetic::Add => {}
		}
		notation.push_str(&opts.to_string());
	}
	notation
}

/// Describes a pool in plain sentences: first the dice themselves, then each modifier in canonical order.
///
/// # Examples
/// ```
/// use polyroll::{dice::RollOptions, notation::to_description};
///
/// let options: RollOptions = "4d6R{1}3L".parse()?;
/// assert_eq!(to_description(&options), ["Roll 4 6-sided dice", "Drop lowest", "Reroll [1] (up to 3 times)"]);
/// # Ok::<(), polyroll::parse::Error>(())
/// ```
#[must_use]
pub fn to_description(options: &RollOptions) -> Vec<String> {
	let mut lines = vec![describe_dice(options)];
	let mods = &options.modifiers;

	if let Some(cap) = &mods.cap {
		if let Some(gt) = cap.greater_than {
			lines.push(format!("No Rolls greater than [{gt}]"));
		}
		if let Some(lt) = cap.less_than {
			lines.push(format!("No Rolls less than [{lt}]"));
		}
	}

	if let Some(drop) = &mods.drop {
		if let Some(count) = drop.highest {
			lines.push(counted("Drop highest", count));
		}
		if let Some(count) = drop.lowest {
			lines.push(counted("Drop lowest", count));
		}
		if !drop.exact.is_empty() {
			lines.push(format!("Drop {}", bracket_list(&drop.exact)));
		}
		if let Some(gt) = drop.greater_than {
			lines.push(format!("Drop greater than [{gt}]"));
		}
		if let Some(lt) = drop.less_than {
			lines.push(format!("Drop less than [{lt}]"));
		}
	}

	if let Some(keep) = &mods.keep {
		if let Some(count) = keep.highest {
			lines.push(counted("Keep highest", count));
		}
		if let Some(count) = keep.lowest {
			lines.push(counted("Keep lowest", count));
		}
	}

	for replace in &mods.replace {
		lines.push(format!("Replace {} with [{}]", describe_from(&replace.from), replace.to));
	}

	if let Some(reroll) = &mods.reroll {
		let mut targets = Vec::new();
		if !reroll.exact.is_empty() {
			targets.push(bracket_list(&reroll.exact));
		}
		if let Some(gt) = reroll.greater_than {
			targets.push(format!("greater than [{gt}]"));
		}
		if let Some(lt) = reroll.less_than {
			targets.push(format!("less than [{lt}]"));
		}

		let mut line = format!("Reroll {}", and_list(&targets));
		if let Some(max) = reroll.max {
			line.push_str(&format!(" (up to {max} {})", if max == 1 { "time" } else { "times" }));
		}
		lines.push(line);
	}

	match mods.explode {
		Some(Explode::Each) => lines.push(String::from("Exploding Dice")),
		Some(Explode::Recursive { limit }) => lines.push(format!("Exploding Dice (up to {limit} times)")),
		None => {}
	}

	match &mods.unique {
		Some(Unique::All) => lines.push(String::from("No Duplicate Rolls")),
		Some(Unique::Except(values)) => {
			lines.push(format!("No Duplicate Rolls (except {})", bracket_list(values)));
		}
		None => {}
	}

	if let Some(plus) = mods.plus {
		lines.push(format!("Add {plus}"));
	}
	if let Some(minus) = mods.minus {
		lines.push(format!("Subtract {minus}"));
	}
	if let Some(multiply) = mods.multiply {
		lines.push(format!("Multiply dice by {multiply}"));
	}
	if let Some(multiply_total) = mods.multiply_total {
		lines.push(format!("Multiply total by {multiply_total}"));
	}

	lines
}

/// Describes the dice of a pool without any modifiers.
fn describe_dice(options: &RollOptions) -> String {
	let noun = if options.quantity == 1 { "die" } else { "dice" };
	match &options.sides {
		Sides::Numeric(sides) => format!("Roll {} {sides}-sided {noun}", options.quantity),
		Sides::Faces(faces) => format!(
			"Roll {} {noun} with the following sides: {}",
			options.quantity,
			faces.join(", ")
		),
	}
}

/// Describes what a replacement matches.
fn describe_from(from: &ReplaceFrom) -> String {
	match from {
		ReplaceFrom::Exact(val) => format!("[{val}]"),
		ReplaceFrom::Matching(cmp) => {
			let mut parts = Vec::new();
			if let Some(gt) = cmp.greater_than {
				parts.push(format!("greater than [{gt}]"));
			}
			if let Some(lt) = cmp.less_than {
				parts.push(format!("less than [{lt}]"));
			}
			and_list(&parts)
		}
	}
}

/// Appends a count to a phrase unless it's 1.
fn counted(phrase: &str, count: u32) -> String {
	if count == 1 {
		phrase.to_string()
	} else {
		format!("{phrase} {count}")
	}
}

/// Lists values as `[1]`, `[1] and [2]`, or `[1], [2] and [3]`.
fn bracket_list(values: &[i32]) -> String {
	and_list(&values.iter().map(|val| format!("[{val}]")).collect::<Vec<_>>())
}

/// Joins phrases with commas and a final "and".
fn and_list(items: &[String]) -> String {
	match items {
		[] => String::new(),
		[only] => only.clone(),
		[init @ .., last] => format!("{} and {last}", init.join(", ")),
	}
}
