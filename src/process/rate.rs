use tracing::debug;

/// Turn per-interval counter values into per-second rates.
///
/// `values` and `times` must already be in the same (time-sorted) order. The
/// first point is passed through unchanged; every later point is divided by
/// the time elapsed since its predecessor. Points whose interval is not
/// strictly positive, or whose value is missing, come back as `None`.
pub fn derive_rates(values: &[Option<f64>], times: &[f64]) -> Vec<Option<f64>> {
    debug_assert_eq!(values.len(), times.len());

    values
        .iter()
        .enumerate()
        .map(|(k, value)| {
            let value = (*value)?;
            if k == 0 {
                return Some(value);
            }
            let dt = times[k] - times[k - 1];
            if dt > 0.0 {
                Some(value / dt)
            } else {
                debug!(row = k, dt, "dropping rate point with non-positive interval");
                None
            }
        })
        .collect()
}
