//! Sources of randomness for rolling dice, along with deterministic stand-ins for testing.

use core::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;

use super::{pipeline, validate, Error, RollOptions, RollRecord};

/// Uniform integer generator that all dice rolls are drawn from.
///
/// Implementors only need to provide [`Roller::next()`]. Everything else in the crate (raw rolls, rerolls,
/// explosions, uniqueness redraws) goes through [`Roller::roll_die()`], which turns the zero-based draw into a
/// one-based face and verifies that the implementation kept its side of the contract.
pub trait Roller {
	/// Draws an integer in the range `[0, max)`. `max` is never zero when called by this crate.
	#[must_use]
	fn next(&mut self, max: u32) -> u32;

	/// Rolls a single die with the given number of faces, returning its one-based face number.
	///
	/// # Errors
	/// If the roller produces a value outside of `[0, faces)`, [`Error::OutOfRange`] is returned.
	///
	/// # Examples
	/// ```
	/// use polyroll::dice::roller::{Max as MaxRoller, Roller};
	///
	/// assert_eq!(MaxRoller.roll_die(20)?, 20);
	/// # Ok::<(), polyroll::dice::Error>(())
	/// ```
	fn roll_die(&mut self, faces: u32) -> Result<u32, Error> {
		let value = self.next(faces);
		if value < faces {
			// value < faces <= u32::MAX, so this can't overflow
			Ok(value.saturating_add(1))
		} else {
			Err(Error::OutOfRange { max: faces, value })
		}
	}

	/// Validates a pool of dice, rolls it, and applies all of its modifiers to the rolls.
	///
	/// # Errors
	/// If the options fail validation, or the roller misbehaves, or the total overflows, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use polyroll::dice::{roller::{Iter as IterRoller, Roller}, RollOptions, Rolls, Total};
	///
	/// let options: RollOptions = "4d6L".parse()?;
	/// let rolled = IterRoller::new([3, 1, 6, 4]).roll(&options)?;
	/// assert_eq!(rolled.raw_rolls, Rolls::Numeric(vec![3, 1, 6, 4]));
	/// assert_eq!(rolled.modified_rolls, Rolls::Numeric(vec![3, 4, 6]));
	/// assert_eq!(rolled.total, Total::Numeric(13));
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	fn roll<'o>(&mut self, options: &'o RollOptions) -> Result<RollRecord<'o>, Error>
	where
		Self: Sized,
	{
		validate(options)?;
		pipeline::execute(options, self)
	}
}

impl<R: Roller + ?Sized> Roller for &mut R {
	#[inline]
	fn next(&mut self, max: u32) -> u32 {
		(**self).next(max)
	}
}

/// Generates rolls with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Default fastrand roller
/// ```
/// use polyroll::{dice::roller::FastRand as FastRandRoller, roll::roll_with};
///
/// let mut roller = FastRandRoller::default();
/// let _ = roll_with(["4d6L"], &mut roller)?;
/// let _ = roll_with(["1d20+5"], &mut roller)?;
/// # Ok::<(), polyroll::roll::Error>(())
/// ```
///
/// ## Manually seeded fastrand roller
/// ```
/// use polyroll::{dice::roller::FastRand as FastRandRoller, roll::roll_with};
///
/// let a = roll_with(["10d20"], &mut FastRandRoller::with_seed(0x750c38d574400))?;
/// let b = roll_with(["10d20"], &mut FastRandRoller::with_seed(0x750c38d574400))?;
/// assert_eq!(a.total, b.total);
/// # Ok::<(), polyroll::roll::Error>(())
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Default))]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	/// Draws a value using the [`fastrand::Rng`] the roller was created with.
	#[inline]
	fn next(&mut self, max: u32) -> u32 {
		if max > 0 {
			self.0.u32(..max)
		} else {
			0
		}
	}
}

/// Generates rolls that always land on a specific face.
///
/// # Examples
/// ```
/// use polyroll::{dice::roller::Val as ValRoller, roll::roll_with};
///
/// let rolled = roll_with(["4d6"], &mut ValRoller(3))?;
/// assert_eq!(rolled.total.as_numeric(), Some(12));
/// # Ok::<(), polyroll::roll::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub u32);

impl Roller for Val {
	/// Draws the zero-based index of the configured face. A face of `0` wraps around and is reported as out of range.
	#[inline]
	fn next(&mut self, _max: u32) -> u32 {
		self.0.wrapping_sub(1)
	}
}

/// Generates rolls that always land on their highest face.
///
/// # Examples
/// ```
/// use polyroll::{dice::roller::Max as MaxRoller, roll::roll_with};
///
/// let rolled = roll_with(["2d20"], &mut MaxRoller)?;
/// assert_eq!(rolled.total.as_numeric(), Some(40));
/// # Ok::<(), polyroll::roll::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	#[inline]
	fn next(&mut self, max: u32) -> u32 {
		max.saturating_sub(1)
	}
}

/// Generates rolls from an iterator of one-based face numbers. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use polyroll::{dice::{roller::Iter as IterRoller, Rolls}, roll::roll_with};
///
/// let mut roller = IterRoller::new([1, 2, 3, 4, 6]);
/// let rolled = roll_with(["5d6"], &mut roller)?;
/// assert_eq!(rolled.records[0].modified_rolls, Rolls::Numeric(vec![1, 2, 3, 4, 6]));
/// # Ok::<(), polyroll::roll::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u32>>(Peekable<I>);

impl<I: Iterator<Item = u32>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new roller that uses the given iterator to provide roll values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = u32>> Roller for Iter<I> {
	/// Draws the zero-based index of the next face from the iterator.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn next(&mut self, _max: u32) -> u32 {
		self.0.next().expect("iterator is finished").wrapping_sub(1)
	}
}
