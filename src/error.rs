use thiserror::Error;

/// Top-level error type for the civitas solver.
#[derive(Debug, Error)]
pub enum CivitasError {
    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Errors raised when a city specification is structurally unusable.
///
/// Field-range checking is the job of the schema layer that produces the
/// spec; these cover only the invariants the spatial solver itself depends
/// on (ordered, contiguous rings and positive scalars).
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("city spec defines no rings")]
    NoRings,

    #[error("ring {name}: radius range [{from}, {to}] is not ascending")]
    InvalidRingRadii { name: String, from: f64, to: f64 },

    #[error("ring {name} starts at {from} but the previous ring ends at {prev_to}")]
    RingsNotContiguous {
        name: String,
        from: f64,
        prev_to: f64,
    },

    #[error("population must be positive")]
    ZeroPopulation,

    #[error("walk radius must be positive, got {0}")]
    InvalidWalkRadius(f64),
}

/// Convenience type alias for results using [`CivitasError`].
pub type Result<T> = std::result::Result<T, CivitasError>;
