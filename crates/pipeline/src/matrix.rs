//! The item × feature matrix.

use data_loader::ItemId;
use std::collections::HashMap;

/// One fixed-width feature row per item, stored row-major.
///
/// Row order is corpus order and doubles as the tie-break order when
/// ranking. Every row has exactly `dim()` values and every id appears once.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    ids: Vec<ItemId>,
    values: Vec<f64>,
    positions: HashMap<ItemId, usize>,
}

impl FeatureMatrix {
    /// Wrap an assembled value buffer.
    ///
    /// `ids` must be distinct and `values.len()` must equal
    /// `ids.len() * columns.len()`; the assembler guarantees both.
    pub(crate) fn from_parts(columns: Vec<String>, ids: Vec<ItemId>, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), ids.len() * columns.len());
        let positions = ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();
        Self {
            columns,
            ids,
            values,
            positions,
        }
    }

    /// Column names in layout order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Width of every row
    pub fn dim(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in row order
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// The row at `pos`. Panics if `pos >= len()`.
    pub fn row(&self, pos: usize) -> &[f64] {
        let dim = self.dim();
        &self.values[pos * dim..(pos + 1) * dim]
    }

    /// Feature vector of an item
    pub fn vector(&self, id: ItemId) -> Option<&[f64]> {
        self.position(id).map(|pos| self.row(pos))
    }

    /// `(id, row)` pairs in row order
    pub fn rows(&self) -> impl Iterator<Item = (ItemId, &[f64])> + '_ {
        self.ids
            .iter()
            .enumerate()
            .map(move |(pos, &id)| (id, self.row(pos)))
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_access() {
        let matrix = FeatureMatrix::from_parts(
            vec!["a".to_string(), "b".to_string()],
            vec![10, 20],
            vec![0.1, 0.2, 0.3, 0.4],
        );

        assert_eq!(matrix.dim(), 2);
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.vector(20), Some(&[0.3, 0.4][..]));
        assert_eq!(matrix.vector(30), None);
        assert_eq!(matrix.position(10), Some(0));

        let ids: Vec<ItemId> = matrix.rows().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![10, 20]);
    }
}
