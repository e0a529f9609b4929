//! Bound-enforcing arithmetic on resource records.
//!
//! Explicit spends go through [`apply_delta`], which projects the whole record
//! first and rejects the change if any resource would leave its bound. Passive
//! generation uses [`apply_saturating`], which clamps instead.

use sim_core::{ConstraintViolation, ResourceBounds, ResourceKind, Resources};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaMode {
    Add,
    Subtract,
}

/// Whether every resource lies within its bound.
pub fn within_bounds(resources: &Resources, bounds: &ResourceBounds) -> bool {
    resources
        .iter()
        .all(|(kind, value)| bounds.get(kind).contains(value))
}

fn project(resources: &Resources, delta: &Resources, mode: DeltaMode) -> Resources {
    let mut out = *resources;
    for kind in ResourceKind::ALL {
        let v = match mode {
            DeltaMode::Add => resources.get(kind) + delta.get(kind),
            DeltaMode::Subtract => resources.get(kind) - delta.get(kind),
        };
        out.set(kind, v);
    }
    out
}

/// All-or-nothing application of `delta`.
///
/// Returns the projected record, or the first (ledger order) resource that
/// would leave its bound. The input is never modified.
pub fn apply_delta(
    resources: &Resources,
    delta: &Resources,
    mode: DeltaMode,
    bounds: &ResourceBounds,
) -> Result<Resources, ConstraintViolation> {
    let projected = project(resources, delta, mode);
    for (kind, value) in projected.iter() {
        let b = bounds.get(kind);
        if !b.contains(value) {
            return Err(ConstraintViolation {
                resource: kind,
                projected: value,
                min: b.min,
                max: b.max,
            });
        }
    }
    Ok(projected)
}

/// Application of `delta` that clamps each resource to its bound.
pub fn apply_saturating(
    resources: &Resources,
    delta: &Resources,
    mode: DeltaMode,
    bounds: &ResourceBounds,
) -> Resources {
    let mut out = project(resources, delta, mode);
    for kind in ResourceKind::ALL {
        out.set(kind, bounds.get(kind).clamp(out.get(kind)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    #[test]
    fn spend_within_bounds() {
        let b = ResourceBounds::default();
        let r = Resources::from_units(1000, 100, 0, 0, 0);
        let cost = Resources::from_units(100, 50, 0, 0, 0);
        let out = apply_delta(&r, &cost, DeltaMode::Subtract, &b).unwrap();
        assert_eq!(out, Resources::from_units(900, 50, 0, 0, 0));
    }

    #[test]
    fn overspend_rejects_whole_delta() {
        let b = ResourceBounds::default();
        let r = Resources::from_units(1000, 10, 0, 0, 0);
        let cost = Resources::from_units(100, 50, 0, 0, 0);
        let err = apply_delta(&r, &cost, DeltaMode::Subtract, &b).unwrap_err();
        assert_eq!(err.resource, ResourceKind::Energy);
        assert_eq!(err.projected, Decimal::from(-40));
        assert_eq!(r, Resources::from_units(1000, 10, 0, 0, 0));
    }

    #[test]
    fn overflow_reports_max() {
        let b = ResourceBounds::default();
        let r = Resources::from_units(999_995, 0, 0, 0, 0);
        let gain = Resources::from_units(10, 0, 0, 0, 0);
        let err = apply_delta(&r, &gain, DeltaMode::Add, &b).unwrap_err();
        assert_eq!(err.resource, ResourceKind::Credits);
        assert_eq!(err.max, Decimal::from(1_000_000));
    }

    #[test]
    fn saturating_clamps_at_max() {
        let b = ResourceBounds::default();
        let r = Resources::from_units(999_995, 9_999, 0, 0, 1_000);
        let rates = Resources::from_units(10, 5, 2, 3, 1);
        let out = apply_saturating(&r, &rates, DeltaMode::Add, &b);
        assert_eq!(out, Resources::from_units(1_000_000, 10_000, 2, 3, 1_000));
        assert!(within_bounds(&out, &b));
    }

    fn resources() -> impl Strategy<Value = Resources> {
        (0i64..=1_000_000, 0i64..=10_000, 0i64..=10_000, 0i64..=10_000, 0i64..=1_000)
            .prop_map(|(c, e, m, f, i)| Resources::from_units(c, e, m, f, i))
    }

    fn deltas() -> impl Strategy<Value = Resources> {
        (0i64..=50_000, 0i64..=2_000, 0i64..=2_000, 0i64..=2_000, 0i64..=200)
            .prop_map(|(c, e, m, f, i)| Resources::from_units(c, e, m, f, i))
    }

    proptest! {
        #[test]
        fn results_always_within_bounds(r in resources(), d in deltas(), add in any::<bool>()) {
            let b = ResourceBounds::default();
            let mode = if add { DeltaMode::Add } else { DeltaMode::Subtract };
            match apply_delta(&r, &d, mode, &b) {
                Ok(out) => prop_assert!(within_bounds(&out, &b)),
                Err(v) => prop_assert!(!b.get(v.resource).contains(v.projected)),
            }
            prop_assert!(within_bounds(&apply_saturating(&r, &d, mode, &b), &b));
        }

        #[test]
        fn add_then_subtract_is_identity(r in resources(), d in deltas()) {
            let b = ResourceBounds::default();
            if let Ok(up) = apply_delta(&r, &d, DeltaMode::Add, &b) {
                let down = apply_delta(&up, &d, DeltaMode::Subtract, &b).unwrap();
                prop_assert_eq!(down, r);
            }
        }
    }
}
