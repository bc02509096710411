//! Rolling full expressions: normalising arguments into pools, rolling each pool, and combining the results.

use alloc::{
	borrow::Cow,
	format,
	string::{String, ToString},
	vec::Vec,
};
use core::fmt;

#[cfg(all(feature = "fastrand", feature = "std"))]
use crate::dice::roller::FastRand;
#[cfg(feature = "parse")]
use crate::parse;
use crate::dice::{pipeline, validate, Arithmetic, Error as DiceError, RollOptions, RollRecord, Roller, Rolls, Total};

/// Anything that can be rolled
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RollArgument<'a> {
	/// A single die with the given number of sides
	Sides(u32),

	/// Dice notation, which may contain several pools
	#[cfg(feature = "parse")]
	Notation(Cow<'a, str>),

	/// A single fully-described pool
	Options(Cow<'a, RollOptions>),
}

impl RollArgument<'_> {
	/// Normalises the argument into the pools it describes.
	///
	/// # Errors
	/// If the argument is notation that doesn't parse, an error variant is returned.
	pub fn into_options(self) -> Result<Vec<RollOptions>, Error> {
		Ok(match self {
			Self::Sides(sides) => Vec::from([RollOptions::new(1, sides)]),
			#[cfg(feature = "parse")]
			Self::Notation(notation) => parse::parse(notation.trim())?,
			Self::Options(options) => Vec::from([options.into_owned()]),
		})
	}
}

impl From<u32> for RollArgument<'_> {
	#[inline]
	fn from(sides: u32) -> Self {
		Self::Sides(sides)
	}
}

#[cfg(feature = "parse")]
impl<'a> From<&'a str> for RollArgument<'a> {
	#[inline]
	fn from(notation: &'a str) -> Self {
		Self::Notation(Cow::Borrowed(notation))
	}
}

#[cfg(feature = "parse")]
impl From<String> for RollArgument<'_> {
	#[inline]
	fn from(notation: String) -> Self {
		Self::Notation(Cow::Owned(notation))
	}
}

impl From<RollOptions> for RollArgument<'_> {
	#[inline]
	fn from(options: RollOptions) -> Self {
		Self::Options(Cow::Owned(options))
	}
}

impl<'a> From<&'a RollOptions> for RollArgument<'a> {
	#[inline]
	fn from(options: &'a RollOptions) -> Self {
		Self::Options(Cow::Borrowed(options))
	}
}

/// Kind of values an expression's pools produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum ResultType {
	/// Every pool has numbered faces
	Numeric,

	/// Every pool has labelled faces
	Custom,

	/// Some pools are numbered and some are labelled
	Mixed,
}

/// Representation of the result from rolling a full expression
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::exhaustive_structs)]
pub struct RollResult<'a> {
	/// Result of each pool, in order
	pub records: Vec<RollRecord<'a>>,

	/// Combined total. Numeric pools are summed (subtracting pools are negated) when every pool is numeric,
	/// otherwise every pool's total is joined into a string.
	pub total: Total,

	/// Kind of values the pools produced
	pub kind: ResultType,
}

impl<'a> RollResult<'a> {
	/// Combines the records of several rolled pools into a single result.
	///
	/// # Errors
	/// If the numeric total overflows, an error variant is returned.
	pub fn from_records(records: Vec<RollRecord<'a>>) -> Result<Self, Error> {
		let numeric = records.iter().filter(|record| record.options.sides.is_numeric()).count();
		let kind = if numeric == records.len() {
			ResultType::Numeric
		} else if numeric == 0 {
			ResultType::Custom
		} else {
			ResultType::Mixed
		};

		let totals = records
			.iter()
			.map(RollRecord::signed_total)
			.collect::<Result<Vec<_>, _>>()?;
		let total = match kind {
			ResultType::Numeric => {
				let mut sum: i32 = 0;
				for (record, total) in records.iter().zip(&totals) {
					sum = total
						.as_numeric()
						.and_then(|total| sum.checked_add(total))
						.ok_or_else(|| DiceError::Overflow(record.options.as_ref().clone()))?;
				}
				Total::Numeric(sum)
			}
			ResultType::Custom | ResultType::Mixed => Total::Custom(
				totals
					.iter()
					.map(ToString::to_string)
					.collect::<Vec<_>>()
					.join(", "),
			),
		};

		Ok(Self { records, total, kind })
	}

	/// Every raw roll of every pool, in order.
	pub fn raw_results(&self) -> impl Iterator<Item = RawRoll<'_>> {
		self.records.iter().flat_map(|record| {
			let rolls: Vec<RawRoll<'_>> = match &record.raw_rolls {
				Rolls::Numeric(rolls) => rolls.iter().copied().map(RawRoll::Numeric).collect(),
				Rolls::Custom(rolls) => rolls.iter().map(|face| RawRoll::Face(face.as_str())).collect(),
			};
			rolls
		})
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> RollResult<'static> {
		RollResult {
			records: self.records.into_iter().map(RollRecord::into_owned).collect(),
			total: self.total,
			kind: self.kind,
		}
	}
}

/// A single unmodified roll from any pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum RawRoll<'a> {
	/// Numbered die value
	Numeric(i32),

	/// Labelled face
	Face(&'a str),
}

impl fmt::Display for RawRoll<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Numeric(val) => write!(f, "{val}"),
			Self::Face(face) => f.write_str(face),
		}
	}
}

/// Trait to allow creation of expanded descriptions with an optional max number of individual listed results where
/// applicable
pub trait Describe {
	/// Builds a detailed string with additional information about non-deterministic elements.
	/// Any elements that can have a different result between multiple rolls should list all of the specific individual
	/// results that occurred (ideally, up to `list_limit` of them).
	#[must_use]
	fn describe(&self, list_limit: Option<usize>) -> String;
}

impl Describe for RollRecord<'_> {
	/// Builds a string of the pool the roll is from, a list of all of the individual modified dice, and the total.
	///
	/// If `list_limit` is specified and there are more rolls than it, the list of rolled dice will be truncated and
	/// appended with "X more..." (where X is the remaining roll count past the max).
	///
	/// # Examples
	/// ```
	/// use polyroll::{dice::{roller::{Iter as IterRoller, Roller}, RollOptions}, roll::Describe};
	///
	/// let options: RollOptions = "4d6L".parse()?;
	/// let rolled = IterRoller::new([3, 1, 6, 4]).roll(&options)?;
	/// assert_eq!(rolled.describe(None), "4d6L[3, 4, 6] = 13");
	/// assert_eq!(rolled.describe(Some(2)), "4d6L[3, 4, 1 more...] = 13");
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	fn describe(&self, list_limit: Option<usize>) -> String {
		let list_limit = list_limit.unwrap_or(usize::MAX);
		let rolls = match &self.modified_rolls {
			Rolls::Numeric(rolls) => rolls.iter().map(ToString::to_string).collect::<Vec<_>>(),
			Rolls::Custom(rolls) => rolls.clone(),
		};
		let truncated = rolls.len().saturating_sub(list_limit);

		format!(
			"{}[{}{}] = {}",
			self.options,
			rolls.iter().take(list_limit).cloned().collect::<Vec<_>>().join(", "),
			if truncated > 0 {
				format!(", {truncated} more...")
			} else {
				String::new()
			},
			self.total
		)
	}
}

impl Describe for RollResult<'_> {
	/// Describes every pool (see [`RollRecord::describe()`]) joined by their signs.
	///
	/// [`RollRecord::describe()`]: ./trait.Describe.html#method.describe-1
	fn describe(&self, list_limit: Option<usize>) -> String {
		let mut description = String::new();
		for (idx, record) in self.records.iter().enumerate() {
			match record.options.arithmetic {
				Arithmetic::Subtract => description.push_str(if idx > 0 { " - " } else { "-" }),
				Arithmetic::Add if idx > 0 => description.push_str(" + "),
				Arithmetic::Add => {}
			}
			description.push_str(&record.describe(list_limit));
		}
		description
	}
}

impl fmt::Display for RollResult<'_> {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is equivalent to calling [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Rolls any number of arguments with the given roller and combines them into a single result.
///
/// Each argument is normalised to one or more pools, every pool is validated, and only then is anything rolled.
///
/// # Errors
/// If any notation fails to parse, any pool fails validation, or there's an issue while rolling or totalling, an
/// error variant is returned.
///
/// # Examples
/// ```
/// use polyroll::{dice::{roller::Max as MaxRoller, RollOptions}, roll::{roll_with, RollArgument, ResultType}};
///
/// let rolled = roll_with([RollArgument::from("2d6+1"), RollArgument::from(20_u32)], &mut MaxRoller)?;
/// assert_eq!(rolled.total.as_numeric(), Some(33));
/// assert_eq!(rolled.kind, ResultType::Numeric);
///
/// let coin = RollOptions::with_faces(1, ["heads", "tails"]);
/// let rolled = roll_with([RollArgument::from(&coin), RollArgument::from("1d6")], &mut MaxRoller)?;
/// assert_eq!(rolled.total.to_string(), "tails, 6");
/// assert_eq!(rolled.kind, ResultType::Mixed);
/// # Ok::<(), polyroll::roll::Error>(())
/// ```
pub fn roll_with<'a, A>(args: impl IntoIterator<Item = A>, rng: &mut impl Roller) -> Result<RollResult<'static>, Error>
where
	A: Into<RollArgument<'a>>,
{
	let mut pools = Vec::new();
	for arg in args {
		pools.extend(arg.into().into_options()?);
	}
	for options in &pools {
		validate(options).map_err(DiceError::from)?;
	}

	let records = pools
		.iter()
		.map(|options| pipeline::execute(options, rng).map(RollRecord::into_owned))
		.collect::<Result<Vec<_>, _>>()?;
	RollResult::from_records(records)
}

/// Rolls any number of arguments with a fresh [`FastRand`] roller. See [`roll_with()`] for details.
///
/// # Errors
/// If any notation fails to parse, any pool fails validation, or there's an issue while rolling or totalling, an
/// error variant is returned.
///
/// # Examples
/// ```
/// use polyroll::roll::roll;
///
/// let rolled = roll(["4d6L"])?;
/// let total = rolled.total.as_numeric().unwrap();
/// assert!((3..=18).contains(&total));
/// # Ok::<(), polyroll::roll::Error>(())
/// ```
#[cfg(all(feature = "fastrand", feature = "std"))]
pub fn roll<'a, A>(args: impl IntoIterator<Item = A>) -> Result<RollResult<'static>, Error>
where
	A: Into<RollArgument<'a>>,
{
	roll_with(args, &mut FastRand::default())
}

/// A game system layered on top of the core: it decides what to roll and how to read the outcome.
pub trait Game {
	/// Interpretation of a roll in the game's terms
	type Output;

	/// Pools to roll for this game.
	fn options(&self) -> Vec<RollOptions>;

	/// Interprets a roll in the game's terms.
	fn interpret(&self, rolled: &RollResult<'_>) -> Self::Output;
}

/// Outcome of rolling for a [`Game`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::exhaustive_structs)]
pub struct GameRoll<T> {
	/// Result of each pool, in order
	pub rolls: Vec<RollRecord<'static>>,

	/// Combined total of every pool
	pub total: Total,

	/// Game-specific interpretation
	pub result: T,
}

/// Rolls the pools a game asks for and lets the game interpret the result.
///
/// # Errors
/// If any pool fails validation, or there's an issue while rolling or totalling, an error variant is returned.
pub fn roll_game<G: Game>(game: &G, rng: &mut impl Roller) -> Result<GameRoll<G::Output>, Error> {
	let rolled = roll_with(game.options(), rng)?;
	let result = game.interpret(&rolled);
	Ok(GameRoll {
		rolls: rolled.records,
		total: rolled.total,
		result,
	})
}

/// Error that can occur while rolling an expression
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// Notation failed to parse
	#[cfg(feature = "parse")]
	#[error(transparent)]
	Parse(#[from] parse::Error),

	/// Dice-related error (validation, rolling, or totalling)
	#[error(transparent)]
	Dice(#[from] DiceError),
}
