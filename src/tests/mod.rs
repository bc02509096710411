#[cfg(all(feature = "fastrand", feature = "std"))]
mod dice;
#[cfg(feature = "parse")]
mod notation;
#[cfg(feature = "parse")]
mod pipeline;
