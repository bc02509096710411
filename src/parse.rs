//! Parser generators and [`FromStr`] implementations for dice notation.
//!
//! A notation string is one or more dice terms joined by `+` or `-`. Each term is a quantity, a `d` (either case),
//! and either a number of sides or a `{}`-wrapped list of faces, followed by any number of modifiers in any order.
//! The modifiers of a term are scanned into a flat list of tokens first, then merged into a single [`Modifiers`].

use alloc::{
	format,
	string::{String, ToString},
	vec::Vec,
};
use core::str::FromStr;

use chumsky::prelude::*;

use crate::dice::{
	modifier::{Comparison, Drop, Explode, Keep, Modifiers, Replace, ReplaceFrom, Reroll, Unique},
	Arithmetic, RollOptions, Sides,
};

/// Extra parser configuration used by every parser in this module
type Extra<'src> = extra::Err<Rich<'src, char>>;

/// A single value condition inside of a `{}` list, such as `3`, `>5`, or `<2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Condition {
	Exact(i32),
	GreaterThan(i32),
	LessThan(i32),
}

/// A single modifier as written in notation, before merging
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
	DropHighest(u32),
	DropLowest(u32),
	DropMatching(Vec<Condition>),
	KeepHighest(u32),
	KeepLowest(u32),
	Reroll(Vec<Condition>, Option<u32>),
	Cap(Comparison),
	Replace(Vec<Replace>),
	Unique(Option<Vec<i32>>),
	Explode,
	Plus(i32),
	Minus(i32),
	Multiply(i32),
	MultiplyTotal(i32),
}

/// Generates a parser for whitespace tolerated between tokens.
fn ws<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
	one_of(" \t\r\n").repeated()
}

/// Generates a parser for an unsigned decimal integer, allowing leading zeros.
fn uint<'src, T>() -> impl Parser<'src, &'src str, T, Extra<'src>> + Clone
where
	T: FromStr,
	T::Err: ToString,
{
	text::digits(10)
		.at_least(1)
		.collect::<String>()
		.try_map(|digits, span| {
			digits
				.parse()
				.map_err(|err: T::Err| Rich::custom(span, format!("\"{digits}\": {}", err.to_string())))
		})
}

/// Generates a parser for a condition inside of a `{}` list (e.g. `3`, `>5`, `<2`).
fn condition<'src>() -> impl Parser<'src, &'src str, Condition, Extra<'src>> + Clone {
	choice((
		just('>').ignore_then(uint()).map(Condition::GreaterThan),
		just('<').ignore_then(uint()).map(Condition::LessThan),
		uint().map(Condition::Exact),
	))
}

/// Generates a parser for a comparison-only condition inside of a `{}` list (e.g. `>5`, `<2`).
fn bound<'src>() -> impl Parser<'src, &'src str, Comparison, Extra<'src>> + Clone {
	choice((
		just('>').ignore_then(uint()).map(Comparison::greater_than),
		just('<').ignore_then(uint()).map(Comparison::less_than),
	))
}

/// Generates a parser for a replacement pair inside of a `{}` list (e.g. `1=2`, `>5=6`).
fn replacement<'src>() -> impl Parser<'src, &'src str, Replace, Extra<'src>> + Clone {
	condition()
		.then_ignore(just('='))
		.then(uint())
		.map(|(from, to)| Replace {
			from: match from {
				Condition::Exact(val) => ReplaceFrom::Exact(val),
				Condition::GreaterThan(val) => ReplaceFrom::Matching(Comparison::greater_than(val)),
				Condition::LessThan(val) => ReplaceFrom::Matching(Comparison::less_than(val)),
			},
			to,
		})
}

/// Generates a parser for a non-empty, comma-separated, `{}`-delimited list of items.
fn list<'src, T>(
	item: impl Parser<'src, &'src str, T, Extra<'src>> + Clone,
) -> impl Parser<'src, &'src str, Vec<T>, Extra<'src>> + Clone {
	item.padded_by(ws())
		.separated_by(just(','))
		.at_least(1)
		.collect::<Vec<_>>()
		.delimited_by(just('{'), just('}'))
}

/// Generates a parser for a single modifier token (e.g. `L`, `H2`, `R{1}3`, `V{1=2}`, `!`, `+3`, `**2`).
fn modifier<'src>() -> impl Parser<'src, &'src str, Token, Extra<'src>> + Clone {
	let count = uint::<u32>().or_not().map(|count| count.unwrap_or(1));

	// Flat arithmetic must not swallow the quantity of a following dice term (`1d20+2d6`)
	let not_dice = one_of("dD").not();

	choice((
		// Keep lowest (e.g. KL, KL2)
		one_of("kK")
			.then(one_of("lL"))
			.ignore_then(count.clone())
			.map(Token::KeepLowest),
		// Keep highest (e.g. K, K2)
		one_of("kK").ignore_then(count.clone()).map(Token::KeepHighest),
		// Drop highest (e.g. H, H2)
		one_of("hH").ignore_then(count.clone()).map(Token::DropHighest),
		// Drop lowest (e.g. L, L2)
		one_of("lL").ignore_then(count).map(Token::DropLowest),
		// Drop matching (e.g. D{1,>5})
		one_of("dD").ignore_then(list(condition())).map(Token::DropMatching),
		// Reroll (e.g. R{1}, R{<3}2)
		one_of("rR")
			.ignore_then(list(condition()))
			.then(uint().or_not())
			.map(|(conds, max)| Token::Reroll(conds, max)),
		// Cap (e.g. C{>5,<2})
		one_of("cC").ignore_then(list(bound())).map(|bounds| {
			Token::Cap(bounds.into_iter().fold(Comparison::default(), |acc, bound| Comparison {
				greater_than: bound.greater_than.or(acc.greater_than),
				less_than: bound.less_than.or(acc.less_than),
			}))
		}),
		// Replace (e.g. V{1=2,>5=6})
		one_of("vV").ignore_then(list(replacement())).map(Token::Replace),
		// Unique (e.g. U, U{1,2})
		one_of("uU").ignore_then(list(uint()).or_not()).map(Token::Unique),
		// Explode
		just('!').to(Token::Explode),
		// Arithmetic (e.g. **2, *2, +3, -1)
		just("**").then(ws()).ignore_then(uint()).map(Token::MultiplyTotal),
		just('*').then(ws()).ignore_then(uint()).map(Token::Multiply),
		just('+')
			.then(ws())
			.ignore_then(uint())
			.then_ignore(not_dice.clone())
			.map(Token::Plus),
		just('-')
			.then(ws())
			.ignore_then(uint())
			.then_ignore(not_dice)
			.map(Token::Minus),
	))
}

/// Generates a parser for the `{}`-delimited faces of custom dice.
/// Faces containing a comma are split on it, otherwise every character is its own face.
fn faces<'src>() -> impl Parser<'src, &'src str, Vec<String>, Extra<'src>> + Clone {
	none_of("{}")
		.repeated()
		.at_least(1)
		.collect::<String>()
		.delimited_by(just('{'), just('}'))
		.try_map(|faces, span| {
			let faces = if faces.contains(',') {
				faces.split(',').map(ToString::to_string).collect::<Vec<_>>()
			} else {
				faces.chars().map(String::from).collect()
			};

			if faces.iter().any(String::is_empty) {
				Err(Rich::custom(span, "custom dice faces can't be empty"))
			} else {
				Ok(faces)
			}
		})
}

/// Generates a parser that handles a single dice term like "4d6", "2d20H", "1d{a,b,c}", or "4d6L!+2".
/// Whitespace isn't allowed anywhere inside of the quantity, separator, and sides, but is allowed between modifiers.
pub fn term<'src>() -> impl Parser<'src, &'src str, RollOptions, Extra<'src>> + Clone {
	let sides = choice((uint().map(Sides::Numeric), faces().map(Sides::Faces)));

	uint::<u32>()
		.then_ignore(one_of("dD"))
		.then(sides)
		.then(ws().ignore_then(modifier()).repeated().collect::<Vec<_>>())
		.map(|((quantity, sides), tokens)| RollOptions {
			quantity,
			sides,
			modifiers: merge(tokens),
			arithmetic: Arithmetic::Add,
			key: None,
		})
}

/// Generates a parser that handles full notation: one or more dice terms joined by `+` or `-`, expecting the end
/// of input afterward. A sign on the first term is allowed.
pub fn notation<'src>() -> impl Parser<'src, &'src str, Vec<RollOptions>, Extra<'src>> + Clone {
	let sign = choice((just('+').to(Arithmetic::Add), just('-').to(Arithmetic::Subtract)));

	let first = sign
		.clone()
		.then_ignore(ws())
		.or_not()
		.then(term())
		.map(|(sign, options)| RollOptions {
			arithmetic: sign.unwrap_or_default(),
			..options
		});
	let rest = ws()
		.ignore_then(sign)
		.then_ignore(ws())
		.then(term())
		.map(|(arithmetic, options)| RollOptions { arithmetic, ..options });

	first
		.then(rest.repeated().collect::<Vec<_>>())
		.map(|(first, mut rest)| {
			rest.insert(0, first);
			rest
		})
		.then_ignore(end())
}

/// Merges every scanned modifier token into a single set of modifiers.
/// Flat additions and subtractions accumulate, lists extend, and everything else takes the last value given.
fn merge(tokens: Vec<Token>) -> Modifiers {
	let mut mods = Modifiers::default();

	for token in tokens {
		match token {
			Token::DropHighest(count) => mods.drop.get_or_insert_with(Drop::default).highest = Some(count),
			Token::DropLowest(count) => mods.drop.get_or_insert_with(Drop::default).lowest = Some(count),
			Token::DropMatching(conds) => {
				let drop = mods.drop.get_or_insert_with(Drop::default);
				for cond in conds {
					match cond {
						Condition::Exact(val) => drop.exact.push(val),
						Condition::GreaterThan(val) => drop.greater_than = Some(val),
						Condition::LessThan(val) => drop.less_than = Some(val),
					}
				}
			}
			Token::KeepHighest(count) => mods.keep.get_or_insert_with(Keep::default).highest = Some(count),
			Token::KeepLowest(count) => mods.keep.get_or_insert_with(Keep::default).lowest = Some(count),
			Token::Reroll(conds, max) => {
				let reroll = mods.reroll.get_or_insert_with(Reroll::default);
				for cond in conds {
					match cond {
						Condition::Exact(val) => reroll.exact.push(val),
						Condition::GreaterThan(val) => reroll.greater_than = Some(val),
						Condition::LessThan(val) => reroll.less_than = Some(val),
					}
				}
				if max.is_some() {
					reroll.max = max;
				}
			}
			Token::Cap(cmp) => {
				let cap = mods.cap.get_or_insert_with(Comparison::default);
				cap.greater_than = cmp.greater_than.or(cap.greater_than);
				cap.less_than = cmp.less_than.or(cap.less_than);
			}
			Token::Replace(pairs) => mods.replace.extend(pairs),
			Token::Unique(exceptions) => {
				mods.unique = Some(match (mods.unique.take(), exceptions) {
					(Some(Unique::Except(mut existing)), Some(exceptions)) => {
						existing.extend(exceptions);
						Unique::Except(existing)
					}
					(_, Some(exceptions)) => Unique::Except(exceptions),
					(Some(existing), None) => existing,
					(None, None) => Unique::All,
				});
			}
			Token::Explode => mods.explode = Some(Explode::Each),
			Token::Plus(val) => mods.plus = Some(mods.plus.unwrap_or(0).saturating_add(val)),
			Token::Minus(val) => mods.minus = Some(mods.minus.unwrap_or(0).saturating_add(val)),
			Token::Multiply(val) => mods.multiply = Some(val),
			Token::MultiplyTotal(val) => mods.multiply_total = Some(val),
		}
	}

	mods
}

/// Parses a notation string into one [`RollOptions`] per term.
///
/// Leading or trailing whitespace is not trimmed here and makes the input invalid; see
/// [`DiceNotation`](crate::notation::DiceNotation) for the trimming entry point.
///
/// # Errors
/// If the input doesn't match the grammar, an [`Error`] describing where it went wrong is returned, including a
/// suggested correction when the input looks like a common typo.
///
/// # Examples
/// ```
/// use polyroll::{dice::{modifier::Drop, Arithmetic}, parse::parse};
///
/// let options = parse("4d6L")?;
/// assert_eq!(options.len(), 1);
/// assert_eq!(options[0].quantity, 4);
/// assert_eq!(options[0].modifiers.drop, Some(Drop { lowest: Some(1), ..Drop::default() }));
///
/// let options = parse("1d20+2d6-1d8")?;
/// assert_eq!(options.len(), 3);
/// assert_eq!(options[2].arithmetic, Arithmetic::Subtract);
///
/// let err = parse("4 d 6").unwrap_err();
/// assert_eq!(err.suggestion.as_deref(), Some("4d6"));
/// # Ok::<(), polyroll::parse::Error>(())
/// ```
pub fn parse(input: &str) -> Result<Vec<RollOptions>, Error> {
	notation()
		.parse(input)
		.into_result()
		.map_err(|errs| Error::from_rich(input, &errs))
}

/// Checks whether a string parses without building any error information.
fn parses(input: &str) -> bool {
	notation().parse(input).into_result().is_ok()
}

/// Attempts to guess the notation a user meant to type, returning a correction only if it actually parses.
///
/// Recognised typos are stray whitespace (`4 d 6`), missing quantities (`d6`), and a missing separator in a bare
/// two or three digit number (`46`).
#[must_use]
pub fn suggest(input: &str) -> Option<String> {
	let mut candidate = input.chars().filter(|chr| !chr.is_whitespace()).collect::<String>();
	candidate = insert_missing_quantities(&candidate);
	if (2..=3).contains(&candidate.len()) && candidate.chars().all(|chr| chr.is_ascii_digit()) {
		candidate.insert(1, 'd');
	}

	(candidate != input && parses(&candidate)).then_some(candidate)
}

/// Inserts a quantity of 1 in front of any separator that doesn't have one (`d6` → `1d6`, `1d4+d6` → `1d4+1d6`).
fn insert_missing_quantities(input: &str) -> String {
	let mut fixed = String::with_capacity(input.len().saturating_add(2));
	let mut prev = None;
	let mut chars = input.chars().peekable();

	while let Some(chr) = chars.next() {
		let starts_term = matches!(prev, None | Some('+' | '-'));
		let next_is_sides = chars.peek().is_some_and(|next| next.is_ascii_digit() || *next == '{');
		if starts_term && matches!(chr, 'd' | 'D') && next_is_sides {
			fixed.push('1');
		}
		fixed.push(chr);
		prev = Some(chr);
	}

	fixed
}

/// An error resulting from parsing dice notation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid dice notation \"{input}\" at \"{offending}\": {reason}")]
#[non_exhaustive]
pub struct Error {
	/// Full input that failed to parse
	pub input: String,

	/// Portion of the input from the point parsing failed onward
	pub offending: String,

	/// Byte range of the input the failure was reported at
	pub span: core::ops::Range<usize>,

	/// Description of what went wrong
	pub reason: String,

	/// Likely correction for the input, if one could be guessed
	pub suggestion: Option<String>,
}

impl Error {
	/// Builds an error from the first of a set of errors reported by the parser.
	fn from_rich(input: &str, errs: &[Rich<'_, char>]) -> Self {
		let (span, reason) = errs.first().map_or_else(
			|| (0..input.len(), String::from("unrecognised input")),
			|err| ((*err.span()).into_range(), err.to_string()),
		);

		Self {
			input: input.to_string(),
			offending: input.get(span.start..).unwrap_or_default().to_string(),
			span,
			reason,
			suggestion: suggest(input),
		}
	}

	/// Builds an error for input that parsed, but not as the single dice term that was expected.
	fn not_single(input: &str, terms: usize) -> Self {
		Self {
			input: input.to_string(),
			offending: input.to_string(),
			span: 0..input.len(),
			reason: format!("expected a single dice term, found {terms}"),
			suggestion: None,
		}
	}
}

impl FromStr for RollOptions {
	type Err = Error;

	/// Parses a single dice term. Multiple terms joined with `+`/`-` are rejected, use [`parse()`] for those.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut terms = parse(s)?;
		match terms.len() {
			1 => Ok(terms.remove(0)),
			len => Err(Error::not_single(s, len)),
		}
	}
}
