use super::{DataSource, Destination, StorageError};
use ndarray::{Array2, Array3};
use num_traits::{NumCast, ToPrimitive};
use std::collections::BTreeMap;

/// Element data of a stored variable, flattened in row-major order
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Values {
    Int(Vec<i32>),
    Real(Vec<f64>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(values) => values.len(),
            Self::Real(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named variable held by a [`MemorySource`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredVariable {
    shape: Vec<usize>,
    values: Values,
}

impl StoredVariable {
    /// `shape` is empty for a scalar. The number of values must match the shape.
    pub fn new(name: &str, shape: Vec<usize>, values: Values) -> Result<Self, StorageError> {
        let expected: usize = shape.iter().product();

        if expected != values.len() {
            return Err(StorageError::Shape {
                name: name.into(),
                shape,
                len: values.len(),
            });
        }

        Ok(Self { shape, values })
    }

    /// declared shape, empty for scalars
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    /// shape as reported through [`DataSource::size`]
    fn extent(&self) -> Vec<usize> {
        if self.shape.is_empty() {
            vec![1]
        } else {
            self.shape.clone()
        }
    }
}

/// Grid file contents held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    variables: BTreeMap<String, StoredVariable>,
    attributes: BTreeMap<(String, String), String>,
    origin: [usize; 3],
    valid: bool,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            variables: BTreeMap::new(),
            attributes: BTreeMap::new(),
            origin: [0; 3],
            valid: true,
        }
    }

    /// mark the storage unreadable
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn global_origin(&self) -> [usize; 3] {
        self.origin
    }

    pub fn insert(&mut self, name: &str, variable: StoredVariable) {
        self.variables.insert(name.into(), variable);
    }

    /// add a variable with an explicit shape
    pub fn add_array<V: Into<Values>>(
        &mut self,
        name: &str,
        shape: &[usize],
        values: V,
    ) -> Result<(), StorageError> {
        let variable = StoredVariable::new(name, shape.to_vec(), values.into())?;
        self.insert(name, variable);
        Ok(())
    }

    pub fn add_int(&mut self, name: &str, value: i32) {
        self.insert(
            name,
            StoredVariable {
                shape: Vec::new(),
                values: Values::Int(vec![value]),
            },
        );
    }

    pub fn add_real(&mut self, name: &str, value: f64) {
        self.insert(
            name,
            StoredVariable {
                shape: Vec::new(),
                values: Values::Real(vec![value]),
            },
        );
    }

    /// add a one dimensional integer variable
    pub fn add_ints(&mut self, name: &str, values: Vec<i32>) {
        self.insert(
            name,
            StoredVariable {
                shape: vec![values.len()],
                values: Values::Int(values),
            },
        );
    }

    /// add a one dimensional real variable
    pub fn add_reals(&mut self, name: &str, values: Vec<f64>) {
        self.insert(
            name,
            StoredVariable {
                shape: vec![values.len()],
                values: Values::Real(values),
            },
        );
    }

    pub fn add_field2d(&mut self, name: &str, values: &Array2<f64>) {
        let (nx, ny) = values.dim();
        self.insert(
            name,
            StoredVariable {
                shape: vec![nx, ny],
                values: Values::Real(values.iter().copied().collect()),
            },
        );
    }

    pub fn add_field3d(&mut self, name: &str, values: &Array3<f64>) {
        let (nx, ny, nz) = values.dim();
        self.insert(
            name,
            StoredVariable {
                shape: vec![nx, ny, nz],
                values: Values::Real(values.iter().copied().collect()),
            },
        );
    }

    /// set a string attribute. The empty group holds file level attributes.
    pub fn add_attribute(&mut self, group: &str, name: &str, value: &str) {
        self.attributes
            .insert((group.into(), name.into()), value.into());
    }

    pub fn variable(&self, name: &str) -> Option<&StoredVariable> {
        self.variables.get(name)
    }

    /// all variables, sorted by name
    pub fn variables(&self) -> impl Iterator<Item = (&str, &StoredVariable)> {
        self.variables
            .iter()
            .map(|(name, variable)| (name.as_str(), variable))
    }

    /// all attributes as `(group, name, value)`
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.attributes
            .iter()
            .map(|((group, name), value)| (group.as_str(), name.as_str(), value.as_str()))
    }
}

impl DataSource for MemorySource {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn size(&self, name: &str) -> Vec<usize> {
        if !self.valid {
            return Vec::new();
        }

        self.variables
            .get(name)
            .map(StoredVariable::extent)
            .unwrap_or_default()
    }

    fn read(
        &mut self,
        dest: Destination<'_>,
        name: &str,
        counts: &[usize],
    ) -> Result<(), StorageError> {
        if !self.valid {
            return Err(StorageError::Invalid);
        }

        let variable = self
            .variables
            .get(name)
            .ok_or_else(|| StorageError::Missing(name.into()))?;

        let shape = variable.extent();

        if counts.len() != shape.len() {
            return Err(StorageError::Rank {
                name: name.into(),
                rank: shape.len(),
                counts: counts.len(),
            });
        }

        let requested: usize = counts.iter().product();

        if dest.len() != requested {
            return Err(StorageError::DestinationLength {
                name: name.into(),
                len: dest.len(),
                requested,
            });
        }

        // origin components past the rank of the variable must stay at zero
        let out_of_bounds = (0..shape.len().max(3)).any(|dim| {
            let origin = self.origin.get(dim).copied().unwrap_or(0);
            match shape.get(dim) {
                Some(extent) => origin + counts[dim] > *extent,
                None => origin != 0,
            }
        });

        if out_of_bounds {
            return Err(StorageError::OutOfBounds {
                name: name.into(),
                origin: self.origin,
                counts: counts.to_vec(),
                shape,
            });
        }

        let start: Vec<usize> = (0..shape.len())
            .map(|dim| self.origin.get(dim).copied().unwrap_or(0))
            .collect();

        let indices = hyperslab_indices(&shape, &start, counts);

        match (dest, variable.values()) {
            (Destination::Int(buffer), Values::Int(values)) => {
                copy_converted(values.as_slice(), &indices, buffer, name)
            }
            (Destination::Int(buffer), Values::Real(values)) => {
                copy_converted(values.as_slice(), &indices, buffer, name)
            }
            (Destination::Real(buffer), Values::Int(values)) => {
                copy_converted(values.as_slice(), &indices, buffer, name)
            }
            (Destination::Real(buffer), Values::Real(values)) => {
                copy_converted(values.as_slice(), &indices, buffer, name)
            }
            (Destination::Float(buffer), Values::Int(values)) => {
                copy_converted(values.as_slice(), &indices, buffer, name)
            }
            (Destination::Float(buffer), Values::Real(values)) => {
                copy_converted(values.as_slice(), &indices, buffer, name)
            }
        }
    }

    fn attribute(&self, group: &str, name: &str) -> Option<String> {
        if !self.valid {
            return None;
        }

        self.attributes
            .get(&(group.to_string(), name.to_string()))
            .cloned()
    }

    fn set_global_origin(&mut self, origin: [usize; 3]) {
        self.origin = origin;
    }

    fn close(&mut self) {
        self.valid = false;
    }
}

/// flat row-major indices of the block `start .. start + counts` of an array of `shape`
fn hyperslab_indices(shape: &[usize], start: &[usize], counts: &[usize]) -> Vec<usize> {
    let rank = shape.len();

    let mut strides = vec![1; rank];
    for dim in (0..rank.saturating_sub(1)).rev() {
        strides[dim] = strides[dim + 1] * shape[dim + 1];
    }

    let total: usize = counts.iter().product();
    let mut indices = Vec::with_capacity(total);

    if total == 0 {
        return indices;
    }

    let mut position = vec![0; rank];

    loop {
        let flat = (0..rank)
            .map(|dim| (start[dim] + position[dim]) * strides[dim])
            .sum();
        indices.push(flat);

        // advance the last dimension fastest
        let mut dim = rank;
        loop {
            if dim == 0 {
                return indices;
            }
            dim -= 1;

            position[dim] += 1;
            if position[dim] < counts[dim] {
                break;
            }
            position[dim] = 0;
        }
    }
}

fn copy_converted<S, D>(
    values: &[S],
    indices: &[usize],
    buffer: &mut [D],
    name: &str,
) -> Result<(), StorageError>
where
    S: ToPrimitive + Copy,
    D: NumCast,
{
    for (slot, index) in buffer.iter_mut().zip(indices) {
        *slot = NumCast::from(values[*index])
            .ok_or_else(|| StorageError::Conversion { name: name.into() })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_with_block() -> MemorySource {
        let mut source = MemorySource::new();
        let values: Vec<f64> = (0..24).map(|x| x as f64).collect();
        source.add_array("block", &[2, 3, 4], values).unwrap();
        source
    }

    #[test]
    fn scalar_reports_unit_size() {
        let mut source = MemorySource::new();
        source.add_int("nx", 8);

        assert_eq!(source.size("nx"), vec![1]);
        assert_eq!(source.size("ny"), Vec::<usize>::new());
    }

    #[test]
    fn read_row_at_origin() {
        let mut source = source_with_block();
        source.set_global_origin([1, 2, 0]);

        let mut row = [0.0; 4];
        source
            .read(Destination::Real(&mut row), "block", &[1, 1, 4])
            .unwrap();

        assert_eq!(row, [20.0, 21.0, 22.0, 23.0]);
    }

    #[test]
    fn read_strided_block() {
        let mut source = source_with_block();
        source.set_global_origin([0, 1, 2]);

        let mut block = [0; 4];
        source
            .read(Destination::Int(&mut block), "block", &[2, 1, 2])
            .unwrap();

        assert_eq!(block, [6, 7, 18, 19]);
    }

    #[test]
    fn read_past_extent_fails() {
        let mut source = source_with_block();
        source.set_global_origin([0, 2, 0]);

        let mut column = [0.0; 2];
        let result = source.read(Destination::Real(&mut column), "block", &[1, 2, 1]);

        assert!(matches!(result, Err(StorageError::OutOfBounds { .. })));
    }

    #[test]
    fn origin_beyond_rank_must_be_zero() {
        let mut source = MemorySource::new();
        source.add_reals("psi", vec![1.0, 2.0]);
        source.set_global_origin([0, 1, 0]);

        let mut value = [0.0];
        let result = source.read(Destination::Real(&mut value), "psi", &[1]);

        assert!(matches!(result, Err(StorageError::OutOfBounds { .. })));
    }

    #[test]
    fn shape_must_match_values() {
        let mut source = MemorySource::new();
        let result = source.add_array("bad", &[2, 2], vec![1.0, 2.0, 3.0]);

        assert!(matches!(result, Err(StorageError::Shape { .. })));
    }

    #[test]
    fn invalid_source_hides_everything() {
        let mut source = source_with_block();
        source.add_attribute("", "title", "test");
        source.invalidate();

        assert!(source.size("block").is_empty());
        assert_eq!(source.attribute("", "title"), None);
    }
}
