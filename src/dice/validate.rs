//! Checks that a [`RollOptions`] describes a pool that can actually be rolled.

use alloc::{format, string::String};

use super::{modifier::ModifierKind, RollOptions, Sides};

/// A pool whose shape or modifiers make it impossible to roll
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {reason}")]
#[non_exhaustive]
pub struct ValidationError {
	/// Part of the pool that is invalid
	pub kind: ModifierKind,

	/// Human-readable explanation
	pub reason: String,
}

impl ValidationError {
	/// Creates a new validation error.
	#[must_use]
	pub fn new(kind: ModifierKind, reason: impl Into<String>) -> Self {
		Self {
			kind,
			reason: reason.into(),
		}
	}
}

/// Highest number of sides a numeric die may have, so that every face fits in a die value.
pub const MAX_SIDES: u32 = i32::MAX.unsigned_abs();

/// Validates a pool, stopping at the first problem found.
///
/// Checks are made in this order: sides and quantity, drop and keep counts, unique against the number of faces, cap
/// ordering, and finally reroll values against the face range. Validating options that already passed will always
/// pass again.
///
/// # Errors
/// The first violated constraint is returned as a [`ValidationError`].
///
/// # Examples
/// ```
/// use polyroll::dice::{modifier::ModifierKind, validate, RollOptions};
///
/// assert!(validate(&RollOptions::new(4, 6)).is_ok());
///
/// let options = RollOptions::builder().quantity(2).sides(6).drop_lowest(2).build();
/// assert_eq!(validate(&options).unwrap_err().kind, ModifierKind::Drop);
/// ```
pub fn validate(options: &RollOptions) -> Result<(), ValidationError> {
	check_shape(options)?;
	check_drop_keep(options)?;
	check_unique(options)?;
	check_cap(options)?;
	check_reroll(options)?;
	Ok(())
}

/// Sides must be positive and at most [`MAX_SIDES`] (or a non-empty list of faces) and there must be at least one die.
fn check_shape(options: &RollOptions) -> Result<(), ValidationError> {
	match &options.sides {
		Sides::Numeric(0) => {
			return Err(ValidationError::new(ModifierKind::Sides, "dice must have at least one side"));
		}
		Sides::Numeric(sides) if *sides > MAX_SIDES => {
			return Err(ValidationError::new(
				ModifierKind::Sides,
				format!("dice can have at most {MAX_SIDES} sides, not {sides}"),
			));
		}
		Sides::Faces(faces) if faces.is_empty() => {
			return Err(ValidationError::new(ModifierKind::Sides, "custom dice must have at least one face"));
		}
		_ => {}
	}

	if options.quantity == 0 {
		return Err(ValidationError::new(ModifierKind::Quantity, "at least one die must be rolled"));
	}

	Ok(())
}

/// Dropping or keeping must leave something to do: the counts have to be strictly less than the quantity.
fn check_drop_keep(options: &RollOptions) -> Result<(), ValidationError> {
	let quantity = u64::from(options.quantity);

	if let Some(drop) = &options.modifiers.drop {
		if drop.count() >= quantity {
			return Err(ValidationError::new(
				ModifierKind::Drop,
				format!(
					"cannot drop {} dice from a pool of {}",
					drop.count(),
					options.quantity
				),
			));
		}
	}

	if let Some(keep) = &options.modifiers.keep {
		if keep.count() >= quantity {
			return Err(ValidationError::new(
				ModifierKind::Keep,
				format!(
					"cannot keep {} dice from a pool of {}",
					keep.count(),
					options.quantity
				),
			));
		}
	}

	Ok(())
}

/// Unique dice need at least as many faces as there are dice.
fn check_unique(options: &RollOptions) -> Result<(), ValidationError> {
	if options.modifiers.unique.is_some() && options.quantity > options.sides.count() {
		return Err(ValidationError::new(
			ModifierKind::Unique,
			format!(
				"cannot roll {} unique dice with only {} faces",
				options.quantity,
				options.sides.count()
			),
		));
	}

	Ok(())
}

/// A cap's lower bound must sit below its upper bound.
fn check_cap(options: &RollOptions) -> Result<(), ValidationError> {
	if let Some(cap) = &options.modifiers.cap {
		if let (Some(gt), Some(lt)) = (cap.greater_than, cap.less_than) {
			if lt >= gt {
				return Err(ValidationError::new(
					ModifierKind::Cap,
					format!("less than value ({lt}) must be below the greater than value ({gt})"),
				));
			}
		}
	}

	Ok(())
}

/// Exact reroll values must be faces the dice can actually land on.
fn check_reroll(options: &RollOptions) -> Result<(), ValidationError> {
	let (Some(reroll), Sides::Numeric(sides)) = (&options.modifiers.reroll, &options.sides) else {
		return Ok(());
	};

	let max = i64::from(*sides);
	if let Some(val) = reroll.exact.iter().find(|val| !(1..=max).contains(&i64::from(**val))) {
		return Err(ValidationError::new(
			ModifierKind::Reroll,
			format!("cannot reroll {val} on a die with faces 1 to {sides}"),
		));
	}

	Ok(())
}
