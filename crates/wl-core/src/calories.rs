//! Calorie estimation.

/// Calories burned per minute at the reference body weight.
pub const CALORIES_PER_MINUTE: f64 = 5.0;

/// Weight at which [`CALORIES_PER_MINUTE`] applies unscaled.
pub const REFERENCE_WEIGHT_KG: f64 = 70.0;

/// Estimates calories burned for a workout.
///
/// Scales linearly with both arguments; either being zero yields zero.
/// Inputs are expected to be validated as finite and non-negative.
pub fn estimate_calories(weight_kg: f64, duration_min: f64) -> f64 {
    duration_min * CALORIES_PER_MINUTE * (weight_kg / REFERENCE_WEIGHT_KG)
}
