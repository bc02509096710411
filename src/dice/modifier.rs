//! Modifier option model: the configuration for every kind of modifier that can be attached to a pool of dice.
//!
//! These types are plain data. How they are applied lives in [`pipeline`](super::pipeline), how they are checked
//! lives in [`validate`](super::validate), and how they are written back out as notation lives in
//! [`notation`](crate::notation).

use alloc::vec::Vec;
use core::fmt;

/// Every modifier that may be attached to a single pool of dice.
///
/// Each kind is either entirely present or entirely absent. Regardless of the order they were written in, they are
/// always applied in the same order: reroll, replace, cap, explode, unique, drop/keep, multiply, plus, minus,
/// multiply total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)]
pub struct Modifiers {
	/// Remove dice from the pool before totalling
	pub drop: Option<Drop>,

	/// Restrict the pool to its highest or lowest dice before totalling
	pub keep: Option<Keep>,

	/// Reroll dice that match a condition
	pub reroll: Option<Reroll>,

	/// Add dice for every die that rolls its maximum face
	pub explode: Option<Explode>,

	/// Prevent duplicate values in the pool
	pub unique: Option<Unique>,

	/// Clamp dice values into a range
	pub cap: Option<Comparison>,

	/// Swap matching dice values for another value, applied in order
	pub replace: Vec<Replace>,

	/// Flat amount added to the pool's sum
	pub plus: Option<i32>,

	/// Flat amount subtracted from the pool's sum
	pub minus: Option<i32>,

	/// Multiplier for the pool's sum, applied before plus and minus
	pub multiply: Option<i32>,

	/// Multiplier for the pool's total, applied after plus and minus
	pub multiply_total: Option<i32>,
}

impl Modifiers {
	/// Checks whether no modifiers are present at all.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

/// Comparison against die values, used by caps, drops, rerolls, and replacements.
/// A value matches if it is strictly greater than `greater_than` or strictly less than `less_than`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)]
pub struct Comparison {
	/// Match values strictly above this
	pub greater_than: Option<i32>,

	/// Match values strictly below this
	pub less_than: Option<i32>,
}

impl Comparison {
	/// Creates a comparison that matches values strictly greater than the given one.
	#[must_use]
	pub const fn greater_than(val: i32) -> Self {
		Self {
			greater_than: Some(val),
			less_than: None,
		}
	}

	/// Creates a comparison that matches values strictly less than the given one.
	#[must_use]
	pub const fn less_than(val: i32) -> Self {
		Self {
			greater_than: None,
			less_than: Some(val),
		}
	}

	/// Checks whether a value satisfies either side of the comparison.
	///
	/// # Examples
	/// ```
	/// use polyroll::dice::modifier::Comparison;
	///
	/// let cmp = Comparison { greater_than: Some(5), less_than: Some(2) };
	/// assert!(cmp.matches(6));
	/// assert!(cmp.matches(1));
	/// assert!(!cmp.matches(5));
	/// assert!(!cmp.matches(2));
	/// ```
	#[must_use]
	pub fn matches(&self, val: i32) -> bool {
		self.greater_than.is_some_and(|gt| val > gt) || self.less_than.is_some_and(|lt| val < lt)
	}

	/// Checks whether neither side of the comparison is set.
	#[must_use]
	pub const fn is_empty(&self) -> bool {
		self.greater_than.is_none() && self.less_than.is_none()
	}
}

/// Removes dice from a pool.
/// Exact values and comparisons are removed first, then the lowest and highest counts are taken from what remains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)]
pub struct Drop {
	/// Number of highest dice to drop
	pub highest: Option<u32>,

	/// Number of lowest dice to drop
	pub lowest: Option<u32>,

	/// Values to drop wherever they appear
	pub exact: Vec<i32>,

	/// Drop every value above this
	pub greater_than: Option<i32>,

	/// Drop every value below this
	pub less_than: Option<i32>,
}

impl Drop {
	/// Total number of dice dropped by count (highest plus lowest).
	#[must_use]
	pub fn count(&self) -> u64 {
		u64::from(self.highest.unwrap_or(0)).saturating_add(u64::from(self.lowest.unwrap_or(0)))
	}

	/// Comparison portion of the drop, if any.
	#[must_use]
	pub const fn comparison(&self) -> Comparison {
		Comparison {
			greater_than: self.greater_than,
			less_than: self.less_than,
		}
	}
}

/// Keeps only the highest and/or lowest dice of a pool, which is the same as dropping all of the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)]
pub struct Keep {
	/// Number of highest dice to keep
	pub highest: Option<u32>,

	/// Number of lowest dice to keep
	pub lowest: Option<u32>,
}

impl Keep {
	/// Total number of dice kept.
	#[must_use]
	pub fn count(&self) -> u64 {
		u64::from(self.highest.unwrap_or(0)).saturating_add(u64::from(self.lowest.unwrap_or(0)))
	}
}

/// Rerolls dice matching any of its conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)]
pub struct Reroll {
	/// Values that trigger a reroll
	pub exact: Vec<i32>,

	/// Reroll every value above this
	pub greater_than: Option<i32>,

	/// Reroll every value below this
	pub less_than: Option<i32>,

	/// Maximum number of times a single die may be rerolled
	pub max: Option<u32>,
}

impl Reroll {
	/// Checks whether a value should be rerolled.
	#[must_use]
	pub fn matches(&self, val: i32) -> bool {
		self.exact.contains(&val)
			|| Comparison {
				greater_than: self.greater_than,
				less_than: self.less_than,
			}
			.matches(val)
	}
}

/// Adds dice for every die that lands on its maximum face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Explode {
	/// Each die currently on its maximum face adds exactly one new die (`!`).
	Each,

	/// Added dice that also land on their maximum face explode again, up to `limit` explosions in total.
	Recursive {
		/// Maximum number of dice that may be added
		limit: u32,
	},
}

/// Prevents duplicate values within a pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Unique {
	/// Every die must be unique (`U`)
	All,

	/// Every die must be unique apart from these values, which may repeat (`U{1,2}`)
	Except(Vec<i32>),
}

impl Unique {
	/// Values that are allowed to appear more than once.
	#[must_use]
	pub fn exceptions(&self) -> &[i32] {
		match self {
			Self::All => &[],
			Self::Except(values) => values,
		}
	}
}

/// What a [`Replace`] matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum ReplaceFrom {
	/// A single exact value
	Exact(i32),

	/// Any value satisfying the comparison
	Matching(Comparison),
}

impl ReplaceFrom {
	/// Checks whether a value should be replaced.
	#[must_use]
	pub fn matches(&self, val: i32) -> bool {
		match self {
			Self::Exact(expected) => val == *expected,
			Self::Matching(cmp) => cmp.matches(val),
		}
	}
}

/// Replaces dice matching `from` with the value `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)]
pub struct Replace {
	/// Values to replace
	pub from: ReplaceFrom,

	/// Replacement value
	pub to: i32,
}

/// Kinds of modifiers (and the core dice shape) that validation can complain about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ModifierKind {
	/// Number or list of sides
	Sides,
	/// Number of dice
	Quantity,
	/// Drop modifier
	Drop,
	/// Keep modifier
	Keep,
	/// Reroll modifier
	Reroll,
	/// Explode modifier
	Explode,
	/// Unique modifier
	Unique,
	/// Cap modifier
	Cap,
	/// Replace modifier
	Replace,
	/// Plus modifier
	Plus,
	/// Minus modifier
	Minus,
	/// Multiply modifier
	Multiply,
	/// Multiply total modifier
	MultiplyTotal,
}

impl fmt::Display for ModifierKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Sides => "sides",
			Self::Quantity => "quantity",
			Self::Drop => "drop",
			Self::Keep => "keep",
			Self::Reroll => "reroll",
			Self::Explode => "explode",
			Self::Unique => "unique",
			Self::Cap => "cap",
			Self::Replace => "replace",
			Self::Plus => "plus",
			Self::Minus => "minus",
			Self::Multiply => "multiply",
			Self::MultiplyTotal => "multiply total",
		})
	}
}
