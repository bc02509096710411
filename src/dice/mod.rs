//! All functionality for directly describing pools of dice, rolling them, and working with their resulting rolls.
//!
//! This is the home of the dice "primitives". For rolling full (possibly multi-pool) expressions, see
//! [`roll`](crate::roll).

pub mod modifier;
pub mod pipeline;
pub mod roller;
pub mod validate;

use alloc::{
	borrow::{Cow, ToOwned},
	string::String,
	vec::Vec,
};
use core::fmt;

pub use self::{
	modifier::{Modifiers, ModifierKind},
	roller::Roller,
	validate::{validate, ValidationError},
};
use self::modifier::{Comparison, Drop, Explode, Keep, Replace, ReplaceFrom, Reroll, Unique};

/// Faces that the dice of a pool can land on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum Sides {
	/// Numbered faces from 1 up to and including the given number
	Numeric(u32),

	/// Labelled faces, in order
	Faces(Vec<String>),
}

impl Sides {
	/// Number of faces a die has.
	#[must_use]
	pub fn count(&self) -> u32 {
		match self {
			Self::Numeric(sides) => *sides,
			Self::Faces(faces) => u32::try_from(faces.len()).unwrap_or(u32::MAX),
		}
	}

	/// Checks whether the faces are plain numbers.
	#[must_use]
	#[inline]
	pub const fn is_numeric(&self) -> bool {
		matches!(self, Self::Numeric(..))
	}
}

impl From<u32> for Sides {
	#[inline]
	fn from(sides: u32) -> Self {
		Self::Numeric(sides)
	}
}

/// How a pool's total contributes to the total of the expression it belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum Arithmetic {
	/// Pool total is added
	#[default]
	Add,

	/// Pool total is subtracted
	Subtract,
}

/// A single pool of dice: how many to roll, what faces they have, and the modifiers to apply to the results.
/// One of these exists per `±NdM...` term of a notation string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)]
pub struct RollOptions {
	/// Number of dice to roll
	pub quantity: u32,

	/// Faces of each die
	pub sides: Sides,

	/// Modifiers to apply to rolls from this pool
	pub modifiers: Modifiers,

	/// Whether this pool adds to or subtracts from the overall total
	pub arithmetic: Arithmetic,

	/// Optional label to tell pools apart
	pub key: Option<String>,
}

impl RollOptions {
	/// Creates a new pool with a given quantity and number of sides, without any modifiers.
	#[must_use]
	pub const fn new(quantity: u32, sides: u32) -> Self {
		Self {
			quantity,
			sides: Sides::Numeric(sides),
			modifiers: Modifiers {
				drop: None,
				keep: None,
				reroll: None,
				explode: None,
				unique: None,
				cap: None,
				replace: Vec::new(),
				plus: None,
				minus: None,
				multiply: None,
				multiply_total: None,
			},
			arithmetic: Arithmetic::Add,
			key: None,
		}
	}

	/// Creates a new pool of dice with labelled faces.
	#[must_use]
	pub fn with_faces(quantity: u32, faces: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			sides: Sides::Faces(faces.into_iter().map(Into::into).collect()),
			..Self::new(quantity, 0)
		}
	}

	/// Creates a new pool matching this one but without any modifiers.
	#[must_use]
	pub fn plain(&self) -> Self {
		Self {
			quantity: self.quantity,
			sides: self.sides.clone(),
			modifiers: Modifiers::default(),
			arithmetic: self.arithmetic,
			key: self.key.clone(),
		}
	}

	/// Checks whether rolling the pool will always yield the same result (every die has a single face).
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		self.sides.count() == 1
	}

	/// Creates a new dice builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}
}

impl Default for RollOptions {
	/// Creates the default pool (1d20).
	#[inline]
	fn default() -> Self {
		Self::new(1, 20)
	}
}

/// Values of the dice in a pool, either plain numbers or face labels
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum Rolls {
	/// Numbered dice
	Numeric(Vec<i32>),

	/// Labelled dice
	Custom(Vec<String>),
}

impl Rolls {
	/// Number of dice.
	#[must_use]
	pub fn len(&self) -> usize {
		match self {
			Self::Numeric(rolls) => rolls.len(),
			Self::Custom(rolls) => rolls.len(),
		}
	}

	/// Checks whether there are no dice at all.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl fmt::Display for Rolls {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The rolls are written as a comma-separated list with no surrounding brackets.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Numeric(rolls) => write_list(f, rolls),
			Self::Custom(rolls) => write_list(f, rolls),
		}
	}
}

/// Writes a comma-separated list of displayable items.
fn write_list(f: &mut fmt::Formatter<'_>, items: &[impl fmt::Display]) -> fmt::Result {
	for (idx, item) in items.iter().enumerate() {
		if idx > 0 {
			f.write_str(", ")?;
		}
		write!(f, "{item}")?;
	}
	Ok(())
}

/// Aggregate of a set of rolls
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum Total {
	/// Sum of numbered dice after all arithmetic
	Numeric(i32),

	/// Labelled faces joined together
	Custom(String),
}

impl Total {
	/// Gets the numeric value of the total, if it is numeric.
	#[must_use]
	pub const fn as_numeric(&self) -> Option<i32> {
		match self {
			Self::Numeric(total) => Some(*total),
			Self::Custom(..) => None,
		}
	}
}

impl fmt::Display for Total {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Numeric(total) => write!(f, "{total}"),
			Self::Custom(total) => f.write_str(total),
		}
	}
}

/// Representation of the result from rolling a single pool of dice
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::exhaustive_structs)]
pub struct RollRecord<'a> {
	/// Options that were rolled to produce this
	pub options: Cow<'a, RollOptions>,

	/// Dice as they were originally rolled, before any modifiers
	pub raw_rolls: Rolls,

	/// Dice after every modifier has been applied
	pub modified_rolls: Rolls,

	/// Total of the modified dice, including any arithmetic modifiers.
	/// This is never negated by the pool's [`Arithmetic`].
	pub total: Total,
}

impl RollRecord<'_> {
	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> RollRecord<'static> {
		RollRecord {
			options: Cow::Owned(self.options.into_owned()),
			raw_rolls: self.raw_rolls,
			modified_rolls: self.modified_rolls,
			total: self.total,
		}
	}

	/// Contribution of this pool to an overall total: the pool's total, negated if the pool subtracts.
	///
	/// # Errors
	/// If negating the total overflows, an error variant is returned.
	pub fn signed_total(&self) -> Result<Total, Error> {
		Ok(match (&self.total, self.options.arithmetic) {
			(Total::Numeric(total), Arithmetic::Subtract) => Total::Numeric(
				total
					.checked_neg()
					.ok_or_else(|| Error::Overflow(self.options.as_ref().to_owned()))?,
			),
			(total, _) => total.clone(),
		})
	}
}

/// An error resulting from a dice operation
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The options describe a pool that can't be rolled.
	///
	/// # Examples
	/// ```
	/// use polyroll::dice::{roller::{FastRand as FastRandRoller, Roller}, Error, RollOptions};
	///
	/// let options = RollOptions::builder().quantity(2).sides(6).drop_lowest(2).build();
	/// assert!(matches!(FastRandRoller::default().roll(&options), Err(Error::Invalid(..))));
	/// ```
	#[error(transparent)]
	Invalid(#[from] ValidationError),

	/// There was an integer overflow when performing mathematical operations on roll values.
	#[error("integer overflow while totalling {0}")]
	Overflow(RollOptions),

	/// A [`Roller`] produced a value outside of the range it was asked for.
	/// This is a bug in the roller, not a problem with the dice being rolled.
	#[error("roller produced {value}, which is outside of [0, {max})")]
	OutOfRange {
		/// Exclusive upper bound that was requested
		max: u32,

		/// Value that was produced
		value: u32,
	},
}

/// Builds [`RollOptions`] with a fluent interface.
///
/// # Examples
///
/// ## Basic dice
/// ```
/// use polyroll::dice::RollOptions;
///
/// let options = RollOptions::builder().quantity(2).sides(6).build();
/// assert_eq!(options, RollOptions::new(2, 6));
/// ```
///
/// ## Multiple modifiers
/// ```
/// use polyroll::dice::{modifier::{Drop, Explode}, RollOptions};
///
/// let options = RollOptions::builder().quantity(4).sides(6).drop_lowest(1).explode(Explode::Each).plus(2).build();
/// assert_eq!(options.modifiers.drop, Some(Drop { lowest: Some(1), ..Drop::default() }));
/// assert_eq!(options.modifiers.explode, Some(Explode::Each));
/// assert_eq!(options.modifiers.plus, Some(2));
/// assert_eq!(options.to_string(), "4d6L!+2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(RollOptions);

impl Builder {
	/// Sets the number of dice to roll.
	#[must_use]
	pub const fn quantity(mut self, quantity: u32) -> Self {
		self.0.quantity = quantity;
		self
	}

	/// Sets the number of sides per die.
	#[must_use]
	pub fn sides(mut self, sides: u32) -> Self {
		self.0.sides = sides.into();
		self
	}

	/// Sets labelled faces for every die.
	#[must_use]
	pub fn faces(mut self, faces: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.0.sides = Sides::Faces(faces.into_iter().map(Into::into).collect());
		self
	}

	/// Makes the pool subtract from the overall total rather than add to it.
	#[must_use]
	pub const fn subtract(mut self) -> Self {
		self.0.arithmetic = Arithmetic::Subtract;
		self
	}

	/// Sets the pool's key.
	#[must_use]
	pub fn key(mut self, key: impl Into<String>) -> Self {
		self.0.key = Some(key.into());
		self
	}

	/// Adds a drop highest modifier.
	#[must_use]
	pub fn drop_highest(mut self, count: u32) -> Self {
		self.0.modifiers.drop.get_or_insert_with(Drop::default).highest = Some(count);
		self
	}

	/// Adds a drop lowest modifier.
	#[must_use]
	pub fn drop_lowest(mut self, count: u32) -> Self {
		self.0.modifiers.drop.get_or_insert_with(Drop::default).lowest = Some(count);
		self
	}

	/// Adds values to drop wherever they appear.
	#[must_use]
	pub fn drop_exact(mut self, values: impl IntoIterator<Item = i32>) -> Self {
		self.0
			.modifiers
			.drop
			.get_or_insert_with(Drop::default)
			.exact
			.extend(values);
		self
	}

	/// Adds a comparison of values to drop.
	#[must_use]
	pub fn drop_matching(mut self, cmp: Comparison) -> Self {
		let drop = self.0.modifiers.drop.get_or_insert_with(Drop::default);
		drop.greater_than = cmp.greater_than.or(drop.greater_than);
		drop.less_than = cmp.less_than.or(drop.less_than);
		self
	}

	/// Adds a keep highest modifier.
	#[must_use]
	pub fn keep_highest(mut self, count: u32) -> Self {
		self.0.modifiers.keep.get_or_insert_with(Keep::default).highest = Some(count);
		self
	}

	/// Adds a keep lowest modifier.
	#[must_use]
	pub fn keep_lowest(mut self, count: u32) -> Self {
		self.0.modifiers.keep.get_or_insert_with(Keep::default).lowest = Some(count);
		self
	}

	/// Sets the reroll modifier.
	#[must_use]
	pub fn reroll(mut self, reroll: Reroll) -> Self {
		self.0.modifiers.reroll = Some(reroll);
		self
	}

	/// Sets the explode modifier.
	#[must_use]
	pub const fn explode(mut self, explode: Explode) -> Self {
		self.0.modifiers.explode = Some(explode);
		self
	}

	/// Sets the unique modifier.
	#[must_use]
	pub fn unique(mut self, unique: Unique) -> Self {
		self.0.modifiers.unique = Some(unique);
		self
	}

	/// Sets the cap modifier.
	#[must_use]
	pub const fn cap(mut self, cap: Comparison) -> Self {
		self.0.modifiers.cap = Some(cap);
		self
	}

	/// Adds a replacement.
	#[must_use]
	pub fn replace(mut self, from: ReplaceFrom, to: i32) -> Self {
		self.0.modifiers.replace.push(Replace { from, to });
		self
	}

	/// Sets the flat amount to add.
	#[must_use]
	pub const fn plus(mut self, plus: i32) -> Self {
		self.0.modifiers.plus = Some(plus);
		self
	}

	/// Sets the flat amount to subtract.
	#[must_use]
	pub const fn minus(mut self, minus: i32) -> Self {
		self.0.modifiers.minus = Some(minus);
		self
	}

	/// Sets the multiplier for the pool's sum.
	#[must_use]
	pub const fn multiply(mut self, multiply: i32) -> Self {
		self.0.modifiers.multiply = Some(multiply);
		self
	}

	/// Sets the multiplier for the pool's final total.
	#[must_use]
	pub const fn multiply_total(mut self, multiply_total: i32) -> Self {
		self.0.modifiers.multiply_total = Some(multiply_total);
		self
	}

	/// Finalizes the options.
	#[must_use]
	pub fn build(self) -> RollOptions {
		self.0
	}
}
