use std::collections::HashMap;

use log::debug;

use crate::config::*;
use crate::history::VotingHistory;

/// The votes of every legislator in every division of a history.
///
/// Rows are legislators in order of first appearance, columns are divisions
/// sorted by number. A cell is 1 for an aye, -1 for a no and 0 otherwise,
/// including when the legislator did not take part in the division.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VotingMatrix {
    row_index: HashMap<String, usize>,
    row_names: Vec<String>,
    col_index: HashMap<u32, usize>,
    col_divisions: Vec<u32>,
    cells: Vec<Vec<i8>>,
}

impl VotingMatrix {
    pub fn from_history(history: &VotingHistory) -> VotingMatrix {
        let mut row_index: HashMap<String, usize> = HashMap::new();
        let mut row_names: Vec<String> = Vec::new();
        let mut col_index: HashMap<u32, usize> = HashMap::new();
        let mut col_divisions: Vec<u32> = Vec::new();

        // First sweep: the indexes.
        for (division_nr, division) in history.divisions().iter() {
            col_index.insert(*division_nr, col_divisions.len());
            col_divisions.push(*division_nr);
            for vote in division.votes.iter() {
                if !row_index.contains_key(&vote.name) {
                    row_index.insert(vote.name.clone(), row_names.len());
                    row_names.push(vote.name.clone());
                }
            }
        }

        // Second sweep: the votes.
        let mut cells: Vec<Vec<i8>> = vec![vec![0; col_divisions.len()]; row_names.len()];
        for (col, division) in history.divisions().values().enumerate() {
            for vote in division.votes.iter() {
                if let Some(row) = row_index.get(&vote.name) {
                    cells[*row][col] = match vote.decision() {
                        Decision::Aye => 1,
                        Decision::No => -1,
                        Decision::Other(_) => 0,
                    };
                }
            }
        }
        debug!(
            "from_history: matrix of {} legislators x {} divisions",
            row_names.len(),
            col_divisions.len()
        );

        VotingMatrix {
            row_index,
            row_names,
            col_index,
            col_divisions,
            cells,
        }
    }

    /// (number of legislators, number of divisions)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_names.len(), self.col_divisions.len())
    }

    pub fn get(&self, name: &str, division_nr: u32) -> Option<i8> {
        let row = self.row_index.get(name)?;
        let col = self.col_index.get(&division_nr)?;
        Some(self.cells[*row][*col])
    }

    pub fn legislators(&self) -> &[String] {
        &self.row_names
    }

    pub fn divisions(&self) -> &[u32] {
        &self.col_divisions
    }

    pub fn row_of(&self, name: &str) -> Option<usize> {
        self.row_index.get(name).cloned()
    }

    pub fn column_of(&self, division_nr: u32) -> Option<usize> {
        self.col_index.get(&division_nr).cloned()
    }

    /// The legislator names and their votes, row by row.
    pub fn rows(&self) -> impl Iterator<Item = (&String, &Vec<i8>)> {
        self.row_names.iter().zip(self.cells.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::small_history;

    #[test]
    fn matrix_of_small_history() {
        let m = VotingMatrix::from_history(&small_history());
        assert_eq!(m.shape(), (5, 3));
        assert_eq!(m.divisions(), &[1, 2, 3]);
        assert_eq!(m.legislators()[0], "Anna");
        assert_eq!(m.row_of("Dora"), Some(3));
        assert_eq!(m.column_of(3), Some(2));

        assert_eq!(m.get("Anna", 1), Some(1));
        assert_eq!(m.get("Anna", 2), Some(1));
        assert_eq!(m.get("Bob", 2), Some(-1));
        assert_eq!(m.get("Carl", 1), Some(-1));
        // Did not take part.
        assert_eq!(m.get("Dora", 1), Some(0));
        assert_eq!(m.get("Eve", 2), Some(0));
        assert_eq!(m.get("Nobody", 1), None);
        assert_eq!(m.get("Anna", 99), None);

        let rows: Vec<(&String, &Vec<i8>)> = m.rows().collect();
        assert_eq!(rows[4].1, &vec![0, 0, 1]);
    }
}
