use crate::source::StorageError;

/// A grid file whose layout cannot be reconciled with the mesh
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Inconsistent {
    #[error("{axis} extent {stored} of `{name}` leaves a fractional number of boundary guard cells around {interior} interior points")]
    FractionalGuards {
        name: String,
        axis: char,
        stored: usize,
        interior: usize,
    },
    #[error("`{name}` has {file_guards} {axis}-boundary guard cells in the grid file, which neither matches the {mesh_guards} local guard cells or more, nor zero")]
    UnresolvableGuards {
        name: String,
        axis: char,
        file_guards: usize,
        mesh_guards: usize,
    },
    #[error("expecting a 2D variable, but `{name}` is 1D with {len} elements")]
    AmbiguousShape { name: String, len: usize },
    #[error("3D variable `{name}` has incorrect size {stored} (expecting {local})")]
    LocalZMismatch {
        name: String,
        stored: usize,
        local: usize,
    },
    #[error("number of dimensions of `{name}` incorrect: expected {expected}, found {found}")]
    WrongDimensions {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("local {axis} extent {local} around {interior} interior points does not give a whole guard width")]
    GuardWidth {
        axis: char,
        local: usize,
        interior: usize,
    },
    #[error("grid file declares {declared} y-boundary guard cells, but `{name}` holds {derived}")]
    DeclaredYGuards {
        name: String,
        declared: i32,
        derived: usize,
    },
    #[error("domain length {zlength} in the periodic coordinate does not give a positive whole number of periods in 2π")]
    InvalidZPeriod { zlength: f64 },
    #[error("{axis} extent {stored} of `{name}` is smaller than the {interior} interior points of the mesh")]
    ExtentMismatch {
        name: String,
        axis: char,
        stored: usize,
        interior: usize,
    },
}

/// A read that passed every layout check but failed in the storage backend
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Could not fetch data for `{variable}`: {source}")]
pub struct BackendFailure {
    pub variable: String,
    pub source: StorageError,
}

impl BackendFailure {
    pub(crate) fn new(variable: &str, source: StorageError) -> Self {
        Self {
            variable: variable.into(),
            source,
        }
    }
}
