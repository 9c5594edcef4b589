//! Sliding-tile puzzle board
//!
//! The board holds a permutation of `0..size²` where the value `size² - 1`
//! is the blank. Grid position `i` shows the tile whose home is `tiles[i]`.
//! Shuffling performs legal random moves starting from the solved state, so
//! every board it produces is solvable by construction.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{SHUFFLE_STEPS, SHUFFLE_STEPS_SMALL};
use crate::scores::ScoreSink;

/// Result of a tile tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Tap on a non-adjacent tile, or the board is already solved
    Ignored,
    /// Tile slid into the blank
    Moved,
    /// The move completed the picture
    Solved,
}

/// A selectable puzzle picture. Changing the picture re-shuffles the board;
/// the URL is only ever touched by the web layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleImage {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

pub const PUZZLE_IMAGES: [PuzzleImage; 3] = [
    PuzzleImage {
        id: "horse",
        name: "Lucky Horse",
        url: "https://images.unsplash.com/photo-1553284965-83fd3e82fa5a?q=80&w=800&auto=format&fit=crop",
    },
    PuzzleImage {
        id: "puppy",
        name: "Golden Puppy",
        url: "https://images.unsplash.com/photo-1591160690555-5debfba289f0?q=80&w=800&auto=format&fit=crop",
    },
    PuzzleImage {
        id: "cat",
        name: "Fortune Cat",
        url: "https://images.unsplash.com/photo-1514888286974-6c03e2ca1dba?q=80&w=800&auto=format&fit=crop",
    },
];

/// Grid-adjacent indices (up/down/left/right), fewer at edges and corners
pub fn adjacent_indices(index: usize, size: usize) -> Vec<usize> {
    let row = index / size;
    let col = index % size;
    let mut neighbors = Vec::with_capacity(4);

    if row > 0 {
        neighbors.push(index - size);
    }
    if row < size - 1 {
        neighbors.push(index + size);
    }
    if col > 0 {
        neighbors.push(index - 1);
    }
    if col < size - 1 {
        neighbors.push(index + 1);
    }

    neighbors
}

/// An active puzzle session: the tile permutation plus its move counter and
/// derived solved flag. Replaced wholesale on reshuffle or settings change.
#[derive(Debug, Clone)]
pub struct PuzzleBoard {
    size: usize,
    tiles: Vec<usize>,
    /// Position of the blank, kept in sync with `tiles`
    blank_pos: usize,
    moves: u32,
    solved: bool,
}

impl PuzzleBoard {
    /// Build a freshly shuffled, always-solvable board. `size` is clamped
    /// to at least 2; the UI offers 2-4.
    pub fn shuffled(size: usize, seed: u64) -> Self {
        let (board, _walk) = Self::shuffled_with_walk(size, seed);
        board
    }

    /// Shuffle and also return the blank's position before each step of the
    /// walk, oldest first. Replaying those positions in reverse as moves
    /// restores the solved state.
    pub(crate) fn shuffled_with_walk(size: usize, seed: u64) -> (Self, Vec<usize>) {
        let size = size.max(2);
        let count = size * size;
        let blank_value = count - 1;
        let mut tiles: Vec<usize> = (0..count).collect();
        let mut rng = Pcg32::seed_from_u64(seed);

        let steps = if size == 2 {
            SHUFFLE_STEPS_SMALL
        } else {
            SHUFFLE_STEPS
        };

        let mut blank_pos = blank_value;
        let mut last_pos = usize::MAX;
        let mut walk = Vec::with_capacity(steps as usize);

        for _ in 0..steps {
            // Never step straight back to where the blank just came from;
            // back-and-forth pairs would cancel out and weaken the shuffle.
            let valid: Vec<usize> = adjacent_indices(blank_pos, size)
                .into_iter()
                .filter(|&p| p != last_pos)
                .collect();
            if valid.is_empty() {
                continue;
            }
            let target = valid[rng.random_range(0..valid.len())];

            tiles.swap(blank_pos, target);
            walk.push(blank_pos);
            last_pos = blank_pos;
            blank_pos = target;
        }

        let board = Self {
            size,
            tiles,
            blank_pos,
            moves: 0,
            solved: false,
        };
        (board, walk)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[usize] {
        &self.tiles
    }

    /// The tile value that renders as the empty cell
    pub fn blank_value(&self) -> usize {
        self.size * self.size - 1
    }

    pub fn blank_index(&self) -> usize {
        self.blank_pos
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Slide the tile at `target` into the blank if they are adjacent.
    /// Taps on non-adjacent tiles are silently ignored, as is any tap once
    /// the board is solved. The first transition into the solved state is
    /// reported to the sink; a later reshuffle arms the report again.
    pub fn apply_move(&mut self, target: usize, sink: &mut dyn ScoreSink) -> MoveOutcome {
        if self.solved || target >= self.tiles.len() {
            return MoveOutcome::Ignored;
        }
        if !adjacent_indices(self.blank_pos, self.size).contains(&target) {
            return MoveOutcome::Ignored;
        }

        self.tiles.swap(self.blank_pos, target);
        self.blank_pos = target;
        self.moves += 1;

        if check_solved(&self.tiles) {
            self.solved = true;
            sink.report_puzzle_solved();
            log::info!("puzzle solved in {} moves", self.moves);
            return MoveOutcome::Solved;
        }
        MoveOutcome::Moved
    }
}

/// True iff every tile sits on its home position
pub fn check_solved(tiles: &[usize]) -> bool {
    tiles.iter().enumerate().all(|(index, &tile)| tile == index)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Default)]
    struct CountingSink {
        puzzle_reports: u32,
    }

    impl ScoreSink for CountingSink {
        fn report_catch_score(&mut self, _value: u32) {}

        fn report_puzzle_solved(&mut self) {
            self.puzzle_reports += 1;
        }
    }

    fn is_permutation(tiles: &[usize]) -> bool {
        let mut seen = vec![false; tiles.len()];
        for &tile in tiles {
            if tile >= tiles.len() || seen[tile] {
                return false;
            }
            seen[tile] = true;
        }
        true
    }

    #[test]
    fn test_shuffled_board_is_fresh() {
        for size in 2..=4 {
            let board = PuzzleBoard::shuffled(size, 7);
            assert_eq!(board.tiles().len(), size * size);
            assert!(is_permutation(board.tiles()));
            assert_eq!(board.moves(), 0);
            assert!(!board.is_solved());
            assert_eq!(board.tiles()[board.blank_index()], board.blank_value());
        }
    }

    #[test]
    fn test_reverse_walk_restores_identity() {
        for size in 2..=4 {
            for seed in 0..20 {
                let (mut board, walk) = PuzzleBoard::shuffled_with_walk(size, seed);
                let mut sink = CountingSink::default();

                // Undo the shuffle: each step recorded where the blank came
                // from, which is exactly the tile to slide back into it. The
                // walk may have passed through the solved state on the way,
                // so the replay stops at the first solve.
                for &target in walk.iter().rev() {
                    let outcome = board.apply_move(target, &mut sink);
                    if outcome == MoveOutcome::Solved {
                        break;
                    }
                    assert_eq!(outcome, MoveOutcome::Moved);
                }

                assert!(board.is_solved());
                assert!(check_solved(board.tiles()));
                assert_eq!(sink.puzzle_reports, 1);
            }
        }
    }

    #[test]
    fn test_adjacent_indices_corners_and_center() {
        // 3x3 corner has two neighbors
        let mut corner = adjacent_indices(0, 3);
        corner.sort_unstable();
        assert_eq!(corner, vec![1, 3]);

        // 3x3 center has four
        let mut center = adjacent_indices(4, 3);
        center.sort_unstable();
        assert_eq!(center, vec![1, 3, 5, 7]);

        // 3x3 edge has three
        let mut edge = adjacent_indices(5, 3);
        edge.sort_unstable();
        assert_eq!(edge, vec![2, 4, 8]);
    }

    #[test]
    fn test_apply_move_rejects_non_adjacent() {
        let mut board = PuzzleBoard::shuffled(3, 11);
        let mut sink = CountingSink::default();

        let blank = board.blank_index();
        let non_adjacent = (0..9)
            .find(|&i| i != blank && !adjacent_indices(blank, 3).contains(&i))
            .unwrap();

        let before = board.tiles().to_vec();
        assert_eq!(
            board.apply_move(non_adjacent, &mut sink),
            MoveOutcome::Ignored
        );
        assert_eq!(board.tiles(), &before[..]);
        assert_eq!(board.moves(), 0);
    }

    #[test]
    fn test_apply_move_swaps_adjacent() {
        let mut board = PuzzleBoard::shuffled(3, 11);
        let mut sink = CountingSink::default();

        let blank = board.blank_index();
        let target = adjacent_indices(blank, 3)[0];
        let moved_tile = board.tiles()[target];

        assert_ne!(board.apply_move(target, &mut sink), MoveOutcome::Ignored);
        assert_eq!(board.tiles()[blank], moved_tile);
        assert_eq!(board.blank_index(), target);
        assert_eq!(board.moves(), 1);
    }

    #[test]
    fn test_moves_ignored_after_solve() {
        let (mut board, walk) = PuzzleBoard::shuffled_with_walk(2, 3);
        let mut sink = CountingSink::default();
        for &target in walk.iter().rev() {
            board.apply_move(target, &mut sink);
        }
        assert!(board.is_solved());

        let frozen = board.tiles().to_vec();
        let moves = board.moves();
        for target in 0..4 {
            assert_eq!(board.apply_move(target, &mut sink), MoveOutcome::Ignored);
        }
        assert_eq!(board.tiles(), &frozen[..]);
        assert_eq!(board.moves(), moves);
        assert_eq!(sink.puzzle_reports, 1);
    }

    #[test]
    fn test_check_solved_identity_only() {
        assert!(check_solved(&[0, 1, 2, 3]));

        // Two tiles swapped from identity is not solved
        assert!(!check_solved(&[1, 0, 2, 3]));
        assert!(!check_solved(&[0, 1, 3, 2]));
    }

    #[test]
    fn test_reshuffle_resets_session() {
        let first = PuzzleBoard::shuffled(4, 42);
        let second = PuzzleBoard::shuffled(4, 43);

        assert_eq!(second.moves(), 0);
        assert!(!second.is_solved());
        assert!(is_permutation(second.tiles()));
        // Different seeds almost surely disagree somewhere
        assert_ne!(first.tiles(), second.tiles());
    }

    proptest! {
        #[test]
        fn prop_shuffle_always_valid_and_solvable(size in 2usize..=4, seed in any::<u64>()) {
            let (mut board, walk) = PuzzleBoard::shuffled_with_walk(size, seed);
            prop_assert!(is_permutation(board.tiles()));

            let mut sink = CountingSink::default();
            for &target in walk.iter().rev() {
                board.apply_move(target, &mut sink);
            }
            prop_assert!(board.is_solved());
        }

        #[test]
        fn prop_move_changes_state_iff_adjacent(seed in any::<u64>(), target in 0usize..9) {
            let mut board = PuzzleBoard::shuffled(3, seed);
            let mut sink = CountingSink::default();
            let before = board.tiles().to_vec();
            let adjacent = adjacent_indices(board.blank_index(), 3).contains(&target);

            let outcome = board.apply_move(target, &mut sink);
            if adjacent {
                prop_assert_ne!(outcome, MoveOutcome::Ignored);
                prop_assert_ne!(board.tiles(), &before[..]);
                prop_assert_eq!(board.moves(), 1);
            } else {
                prop_assert_eq!(outcome, MoveOutcome::Ignored);
                prop_assert_eq!(board.tiles(), &before[..]);
                prop_assert_eq!(board.moves(), 0);
            }
        }
    }
}
