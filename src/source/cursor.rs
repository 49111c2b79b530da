use super::{DataSource, Destination, StorageError};

/// Scoped global origin of a [`DataSource`]
///
/// The origin is set on construction and reset to `[0, 0, 0]` when the cursor is dropped.
pub struct Cursor<'a, S: DataSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: DataSource + ?Sized> Cursor<'a, S> {
    /// borrow `source` and move its global origin to `origin`
    pub fn at(source: &'a mut S, origin: [usize; 3]) -> Self {
        source.set_global_origin(origin);
        Self { source }
    }

    /// reposition the origin within the same read sequence
    pub fn move_to(&mut self, origin: [usize; 3]) {
        self.source.set_global_origin(origin);
    }

    pub fn read(
        &mut self,
        dest: Destination<'_>,
        name: &str,
        counts: &[usize],
    ) -> Result<(), StorageError> {
        self.source.read(dest, name, counts)
    }
}

impl<'a, S: DataSource + ?Sized> Drop for Cursor<'a, S> {
    fn drop(&mut self) {
        self.source.set_global_origin([0; 3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySource;

    #[test]
    fn origin_reset_on_drop() {
        let mut source = MemorySource::new();
        source.add_ints("offsets", vec![10, 11, 12, 13]);

        {
            let mut cursor = Cursor::at(&mut source, [2, 0, 0]);
            let mut buffer = [0; 2];
            cursor
                .read(Destination::Int(&mut buffer), "offsets", &[2])
                .unwrap();
            assert_eq!(buffer, [12, 13]);
        }

        assert_eq!(source.global_origin(), [0, 0, 0]);
    }

    #[test]
    fn origin_reset_after_failed_read() {
        let mut source = MemorySource::new();
        source.add_ints("offsets", vec![10, 11]);

        {
            let mut cursor = Cursor::at(&mut source, [1, 0, 0]);
            let mut buffer = [0; 4];
            assert!(cursor
                .read(Destination::Int(&mut buffer), "offsets", &[4])
                .is_err());
        }

        assert_eq!(source.global_origin(), [0, 0, 0]);
    }
}
