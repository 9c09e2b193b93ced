//! Billable length rounding and pricing.

/// Slack for floating-point noise when the used length is an exact multiple of the unit.
const LENGTH_EPSILON: f64 = 1e-9;

/// Rounds `content_length + header_allowance` up to a multiple of `billing_unit`.
///
/// An empty roll (`content_length <= 0`) bills nothing, header included.
pub fn billable_length(content_length: f64, header_allowance: f64, billing_unit: f64) -> f64 {
    if content_length <= 0.0 {
        return 0.0;
    }
    let used = content_length + header_allowance;
    let units = ((used - LENGTH_EPSILON) / billing_unit).ceil().max(1.0);
    units * billing_unit
}

/// Price of `billable_length` inches at `price_per_foot`.
pub fn cost(billable_length: f64, price_per_foot: f64) -> f64 {
    billable_length / 12.0 * price_per_foot
}
