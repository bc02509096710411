//! The modifier pipeline: raw die values in, modified values and a total out.
//!
//! Each modifier kind is a stateless stage that takes the in-flight [`PoolState`] and hands back a new one. The
//! stages always run in the same order, no matter what order the modifiers were written in:
//!
//! reroll → replace → cap → explode → unique → drop/keep → sum → multiply → plus → minus → multiply total

use alloc::{borrow::Cow, string::String, vec::Vec};
use core::cmp;

use super::{
	modifier::{Comparison, Explode},
	Error, RollOptions, RollRecord, Roller, Rolls, Sides, Total,
};

/// Maximum number of times a single die will be rerolled. Once reached, the last value drawn is kept.
pub const MAX_REROLL_ATTEMPTS: u32 = 99;

/// Maximum number of redraws made by rejection sampling for a single duplicate die before falling back to drawing
/// directly from the faces that are still free.
pub const MAX_UNIQUE_REJECTIONS: u32 = 99;

/// In-flight state of a pool as it passes through the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::exhaustive_structs)]
pub struct PoolState {
	/// Current die values
	pub rolls: Vec<i32>,

	/// Running total. Stays at zero until the sum stage has run.
	pub total: i32,
}

impl PoolState {
	/// Creates a new state from raw die values.
	#[must_use]
	pub const fn new(rolls: Vec<i32>) -> Self {
		Self { rolls, total: 0 }
	}
}

/// A single stage of the pipeline
type Stage<R> = fn(PoolState, &RollOptions, &mut R) -> Result<PoolState, Error>;

/// Rolls a pool of dice and runs the result through the pipeline.
/// Pools with labelled faces skip every modifier; their total is the rolled faces joined together.
///
/// No validation is performed here, see [`Roller::roll()`] for the checked entry point.
///
/// # Errors
/// If the roller misbehaves or the total overflows, an error variant is returned.
pub fn execute<'o>(options: &'o RollOptions, rng: &mut impl Roller) -> Result<RollRecord<'o>, Error> {
	match &options.sides {
		Sides::Numeric(sides) => {
			let raw = (0..options.quantity)
				.map(|_| draw(rng, *sides))
				.collect::<Result<Vec<_>, _>>()?;
			let state = run(PoolState::new(raw.clone()), options, rng)?;

			Ok(RollRecord {
				options: Cow::Borrowed(options),
				raw_rolls: Rolls::Numeric(raw),
				modified_rolls: Rolls::Numeric(state.rolls),
				total: Total::Numeric(state.total),
			})
		}

		Sides::Faces(faces) => {
			let count = options.sides.count();
			let raw = (0..options.quantity)
				.map(|_| {
					let face = rng.roll_die(count)?;
					usize::try_from(face)
						.ok()
						.and_then(|face| faces.get(face.saturating_sub(1)))
						.cloned()
						.ok_or(Error::OutOfRange { max: count, value: face })
				})
				.collect::<Result<Vec<String>, _>>()?;
			let total = raw.join(", ");

			Ok(RollRecord {
				options: Cow::Borrowed(options),
				raw_rolls: Rolls::Custom(raw.clone()),
				modified_rolls: Rolls::Custom(raw),
				total: Total::Custom(total),
			})
		}
	}
}

/// Runs already-rolled values through every stage of the pipeline in order.
///
/// # Errors
/// If the roller misbehaves or the total overflows, an error variant is returned.
///
/// # Examples
/// ```
/// use polyroll::dice::{pipeline::{run, PoolState}, roller::Max as MaxRoller, RollOptions};
///
/// let options: RollOptions = "2d1+3**2".parse()?;
/// let state = run(PoolState::new(vec![1, 1]), &options, &mut MaxRoller)?;
/// assert_eq!(state.total, 10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run<R: Roller>(state: PoolState, options: &RollOptions, rng: &mut R) -> Result<PoolState, Error> {
	let stages: [Stage<R>; 11] = [
		reroll,
		replace,
		cap,
		explode,
		unique,
		drop_keep,
		sum,
		multiply,
		plus,
		minus,
		multiply_total,
	];
	stages.iter().try_fold(state, |state, stage| stage(state, options, rng))
}

/// Rolls a single die and converts it to a die value.
fn draw(rng: &mut impl Roller, sides: u32) -> Result<i32, Error> {
	let face = rng.roll_die(sides)?;
	i32::try_from(face).map_err(|_err| Error::OutOfRange { max: sides, value: face })
}

/// Highest face of a die, as a die value. Validated pools never exceed [`MAX_SIDES`](super::validate::MAX_SIDES).
fn max_face(options: &RollOptions) -> i32 {
	i32::try_from(options.sides.count()).unwrap_or(i32::MAX)
}

/// Clamps a value to the bounds of a comparison.
fn clamp(val: i32, cmp: &Comparison) -> i32 {
	match (cmp.greater_than, cmp.less_than) {
		(Some(gt), _) if val > gt => gt,
		(_, Some(lt)) if val < lt => lt,
		_ => val,
	}
}

fn reroll<R: Roller>(mut state: PoolState, options: &RollOptions, rng: &mut R) -> Result<PoolState, Error> {
	let Some(reroll) = &options.modifiers.reroll else {
		return Ok(state);
	};

	let limit = reroll.max.map_or(MAX_REROLL_ATTEMPTS, |max| max.min(MAX_REROLL_ATTEMPTS));
	let sides = options.sides.count();
	for roll in &mut state.rolls {
		let mut attempts = 0;
		while attempts < limit && reroll.matches(*roll) {
			*roll = draw(rng, sides)?;
			attempts += 1;
		}
	}

	Ok(state)
}

fn replace<R: Roller>(mut state: PoolState, options: &RollOptions, _rng: &mut R) -> Result<PoolState, Error> {
	for replacement in &options.modifiers.replace {
		for roll in &mut state.rolls {
			if replacement.from.matches(*roll) {
				*roll = replacement.to;
			}
		}
	}

	Ok(state)
}

fn cap<R: Roller>(mut state: PoolState, options: &RollOptions, _rng: &mut R) -> Result<PoolState, Error> {
	if let Some(cap) = &options.modifiers.cap {
		for roll in &mut state.rolls {
			*roll = clamp(*roll, cap);
		}
	}

	Ok(state)
}

fn explode<R: Roller>(mut state: PoolState, options: &RollOptions, rng: &mut R) -> Result<PoolState, Error> {
	let Some(explode) = options.modifiers.explode else {
		return Ok(state);
	};

	// Explosions are judged against the die's real maximum face, not whatever a cap or replacement left behind
	let max = max_face(options);
	let sides = options.sides.count();
	let mut pending = state.rolls.iter().filter(|roll| **roll == max).count();

	match explode {
		Explode::Each => {
			for _ in 0..pending {
				let roll = draw(rng, sides)?;
				state.rolls.push(roll);
			}
		}

		Explode::Recursive { limit } => {
			let mut added = 0;
			while pending > 0 && added < limit {
				let roll = draw(rng, sides)?;
				state.rolls.push(roll);
				added += 1;
				pending -= 1;
				if roll == max {
					pending += 1;
				}
			}
		}
	}

	Ok(state)
}

fn unique<R: Roller>(mut state: PoolState, options: &RollOptions, rng: &mut R) -> Result<PoolState, Error> {
	let Some(unique) = &options.modifiers.unique else {
		return Ok(state);
	};

	let exceptions = unique.exceptions();
	let sides = options.sides.count();
	for idx in 0..state.rolls.len() {
		let (seen, rest) = state.rolls.split_at_mut(idx);
		let Some(roll) = rest.first_mut() else {
			break;
		};

		if exceptions.contains(roll) || !seen.contains(roll) {
			continue;
		}

		*roll = redraw_unique(seen, exceptions, sides, rng)?;
	}

	Ok(state)
}

/// Draws a value that doesn't collide with any already-seen value, unless it's one of the exceptions.
fn redraw_unique(seen: &[i32], exceptions: &[i32], sides: u32, rng: &mut impl Roller) -> Result<i32, Error> {
	let acceptable = |val: &i32| exceptions.contains(val) || !seen.contains(val);

	let mut last = 0;
	for _ in 0..MAX_UNIQUE_REJECTIONS {
		last = draw(rng, sides)?;
		if acceptable(&last) {
			return Ok(last);
		}
	}

	// Rejection sampling has been unlucky, so pick directly from whatever faces are left
	let max = i32::try_from(sides).unwrap_or(i32::MAX);
	let free = (1..=max).filter(acceptable).collect::<Vec<_>>();
	let Ok(count) = u32::try_from(free.len()) else {
		return Ok(last);
	};
	if count == 0 {
		// Only reachable when explosions have grown the pool past the number of faces
		return Ok(last);
	}

	let pick = rng.roll_die(count)?;
	usize::try_from(pick)
		.ok()
		.and_then(|pick| free.get(pick.saturating_sub(1)))
		.copied()
		.ok_or(Error::OutOfRange { max: count, value: pick })
}

fn drop_keep<R: Roller>(mut state: PoolState, options: &RollOptions, _rng: &mut R) -> Result<PoolState, Error> {
	let modifiers = &options.modifiers;
	if modifiers.drop.is_none() && modifiers.keep.is_none() {
		return Ok(state);
	}

	state.rolls.sort_unstable();

	if let Some(drop) = &modifiers.drop {
		let cmp = drop.comparison();
		state.rolls.retain(|roll| !drop.exact.contains(roll) && !cmp.matches(*roll));
		drop_counts(&mut state.rolls, to_usize(drop.lowest), to_usize(drop.highest));
	}

	if let Some(keep) = &modifiers.keep {
		let len = state.rolls.len();
		match (keep.lowest.map(to_usize_val), keep.highest.map(to_usize_val)) {
			// Keeping from both ends drops the middle
			(Some(low), Some(high)) if low.saturating_add(high) < len => {
				state.rolls.drain(low..len - high);
			}
			(Some(..), Some(..)) | (None, None) => {}
			(None, Some(high)) => drop_counts(&mut state.rolls, len.saturating_sub(high), 0),
			(Some(low), None) => drop_counts(&mut state.rolls, 0, len.saturating_sub(low)),
		}
	}

	Ok(state)
}

/// Removes a number of dice from each end of a sorted list of rolls.
fn drop_counts(rolls: &mut Vec<i32>, lowest: usize, highest: usize) {
	let lowest = cmp::min(lowest, rolls.len());
	rolls.drain(..lowest);
	let highest = cmp::min(highest, rolls.len());
	rolls.truncate(rolls.len() - highest);
}

fn to_usize(count: Option<u32>) -> usize {
	count.map_or(0, to_usize_val)
}

fn to_usize_val(count: u32) -> usize {
	usize::try_from(count).unwrap_or(usize::MAX)
}

fn sum<R: Roller>(mut state: PoolState, options: &RollOptions, _rng: &mut R) -> Result<PoolState, Error> {
	state.total = state
		.rolls
		.iter()
		.try_fold(0i32, |sum, roll| sum.checked_add(*roll))
		.ok_or_else(|| Error::Overflow(options.clone()))?;
	Ok(state)
}

fn multiply<R: Roller>(state: PoolState, options: &RollOptions, _rng: &mut R) -> Result<PoolState, Error> {
	adjust_total(state, options, options.modifiers.multiply, i32::checked_mul)
}

fn plus<R: Roller>(state: PoolState, options: &RollOptions, _rng: &mut R) -> Result<PoolState, Error> {
	adjust_total(state, options, options.modifiers.plus, i32::checked_add)
}

fn minus<R: Roller>(state: PoolState, options: &RollOptions, _rng: &mut R) -> Result<PoolState, Error> {
	adjust_total(state, options, options.modifiers.minus, i32::checked_sub)
}

fn multiply_total<R: Roller>(state: PoolState, options: &RollOptions, _rng: &mut R) -> Result<PoolState, Error> {
	adjust_total(state, options, options.modifiers.multiply_total, i32::checked_mul)
}

/// Applies a checked operation between the running total and an optional modifier value.
fn adjust_total(
	mut state: PoolState,
	options: &RollOptions,
	val: Option<i32>,
	op: fn(i32, i32) -> Option<i32>,
) -> Result<PoolState, Error> {
	if let Some(val) = val {
		state.total = op(state.total, val).ok_or_else(|| Error::Overflow(options.clone()))?;
	}
	Ok(state)
}
