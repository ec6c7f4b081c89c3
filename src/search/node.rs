//! Search tree nodes and the four MCTS phases.
//!
//! Nodes live in a per-tree arena and point back to their parent by index,
//! so ownership only runs from the arena to the nodes. Selection and
//! backpropagation walk the tree in loops rather than by recursion.

use crate::{GameError, GameState, Player};
use log::trace;
use std::fmt::Debug;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Index of a node inside its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// Win and play counters of a node, or of a move after merging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub wins: u64,
    pub plays: u64,
}

impl NodeStats {
    pub fn new(wins: u64, plays: u64) -> Self {
        Self { wins, plays }
    }

    /// Fraction of plays won; 0 for a node nobody visited.
    pub fn win_ratio(&self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            self.wins as f64 / self.plays as f64
        }
    }
}

/// A node in the Monte Carlo Search Tree.
#[derive(Debug, Clone)]
pub struct SearchNode<M> {
    /// Playouts through this node won by `player`.
    wins: u64,
    /// Playouts through this node.
    plays: u64,
    /// The player whose move produced this node.
    player: Player,
    parent: Option<NodeId>,
    /// Expanded moves in insertion order.
    children: Vec<(M, NodeId)>,
}

impl<M: Copy + Eq + Debug> SearchNode<M> {
    fn new(player: Player, parent: Option<NodeId>) -> Self {
        Self {
            wins: 0,
            plays: 0,
            player,
            parent,
            children: Vec::new(),
        }
    }

    pub fn stats(&self) -> NodeStats {
        NodeStats::new(self.wins, self.plays)
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[(M, NodeId)] {
        &self.children
    }

    /// Calculates the UCB1 score of this node.
    ///
    /// # Arguments
    /// * `total_plays` - Plays recorded at the root of the tree.
    /// * `exploration` - The constant under the square root.
    pub fn ucb1(&self, total_plays: u64, exploration: f64) -> f64 {
        if self.plays == 0 {
            return f64::INFINITY;
        }
        let plays = self.plays as f64;
        self.wins as f64 / plays + (exploration * (total_plays as f64).ln() / plays).sqrt()
    }
}

/// One worker's private search tree.
#[derive(Debug, Clone)]
pub struct SearchTree<M> {
    nodes: Vec<SearchNode<M>>,
}

impl<M: Copy + Eq + Debug> SearchTree<M> {
    /// Creates a tree holding only a root tagged with `root_player`.
    pub fn new(root_player: Player) -> Self {
        Self {
            nodes: vec![SearchNode::new(root_player, None)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<M> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<M> {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn add_child(&mut self, parent: NodeId, mv: M, player: Player) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SearchNode::new(player, Some(parent)));
        self.get_mut(parent).children.push((mv, id));
        id
    }

    /// Picks the child with the highest UCB1 score. Ties go to the child
    /// expanded first.
    pub fn best_child(
        &self,
        id: NodeId,
        total_plays: u64,
        exploration: f64,
    ) -> Option<(M, NodeId)> {
        let mut best: Option<(M, NodeId)> = None;
        let mut best_score = f64::NEG_INFINITY;
        for &(mv, child) in &self.get(id).children {
            let score = self.get(child).ucb1(total_plays, exploration);
            if best.is_none() || score > best_score {
                best = Some((mv, child));
                best_score = score;
            }
        }
        best
    }

    /// Descends from `from` to the node that should be expanded next.
    ///
    /// The descent stops at a terminal position or at the first node that
    /// still has untried moves. Each move taken is applied to `state`, which
    /// ends up describing the returned node.
    pub fn select_to_expand<S>(
        &self,
        from: NodeId,
        state: &mut S,
        exploration: f64,
    ) -> Result<NodeId, GameError>
    where
        S: GameState<Move = M>,
    {
        let total_plays = self.get(self.root()).plays;
        let mut current = from;

        loop {
            if state.is_terminal() {
                return Ok(current);
            }
            let legal = state.get_possible_moves().len();
            if self.get(current).children.len() < legal {
                return Ok(current);
            }
            let Some((mv, child)) = self.best_child(current, total_plays, exploration) else {
                return Ok(current);
            };
            trace!("select {:?} -> node {}", mv, child.0);
            state.make_move(mv)?;
            current = child;
        }
    }

    /// Adds one child for a random untried move of `id` and plays that move
    /// on `state`.
    ///
    /// Returns `id` itself when the position is terminal.
    pub fn expand<S, R>(
        &mut self,
        id: NodeId,
        state: &mut S,
        rng: &mut R,
    ) -> Result<NodeId, GameError>
    where
        S: GameState<Move = M>,
        R: Rng + ?Sized,
    {
        if state.is_terminal() {
            return Ok(id);
        }

        let node = self.get(id);
        let untried: Vec<M> = state
            .get_possible_moves()
            .into_iter()
            .filter(|mv| !node.children.iter().any(|(tried, _)| tried == mv))
            .collect();
        let Some(&mv) = untried.choose(rng) else {
            return Ok(id);
        };

        let mover = state.get_current_player();
        state.make_move(mv)?;
        Ok(self.add_child(id, mv, mover))
    }

    /// Records one finished playout on `id` and all of its ancestors.
    ///
    /// `winner` is `None` for a draw, which counts as a play for everyone
    /// and a win for no one.
    pub fn backpropagate(&mut self, id: NodeId, winner: Option<Player>) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.plays += 1;
            if winner == Some(node.player) {
                node.wins += 1;
            }
            current = node.parent;
        }
    }

    /// The root move with the best win ratio, first expanded on ties.
    pub fn best_move(&self) -> Option<M> {
        let mut best = None;
        let mut best_ratio = -1.0;
        for &(mv, child) in &self.get(self.root()).children {
            let ratio = self.get(child).stats().win_ratio();
            if ratio > best_ratio {
                best = Some(mv);
                best_ratio = ratio;
            }
        }
        best
    }

    /// Move and counters of every root child.
    pub fn root_stats(&self) -> Vec<(M, NodeStats)> {
        self.get(self.root())
            .children
            .iter()
            .map(|&(mv, child)| (mv, self.get(child).stats()))
            .collect()
    }
}

/// Plays random moves on `state` until the game ends.
///
/// Returns the winner, or `None` when the board fills up first. A position
/// that is already won reports the player who made the winning move.
pub fn simulate<S, R>(state: &mut S, rng: &mut R) -> Result<Option<Player>, GameError>
where
    S: GameState,
    R: Rng + ?Sized,
{
    if state.is_won() {
        return Ok(Some(state.get_current_player().opponent()));
    }

    while state.has_empty_cell() {
        let moves = state.get_possible_moves();
        let Some(&mv) = moves.choose(rng) else {
            break;
        };
        let mover = state.get_current_player();
        state.make_move(mv)?;
        if state.is_won() {
            return Ok(Some(mover));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::connect4::{Connect4Move, Connect4State, Rules};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(11)
    }

    #[test]
    fn test_ucb1_formula() {
        let mut tree = SearchTree::new(Player::A);
        let mut state = Connect4State::new(Rules::default()).unwrap();
        let child = tree.expand(tree.root(), &mut state, &mut rng()).unwrap();
        tree.backpropagate(child, Some(Player::A));
        tree.backpropagate(child, Some(Player::B));

        let expected = 0.5 + (1.96 * (4f64).ln() / 2.0).sqrt();
        assert!((tree.get(child).ucb1(4, 1.96) - expected).abs() < 1e-12);

        let mut state = Connect4State::new(Rules::default()).unwrap();
        let unvisited = tree.expand(tree.root(), &mut state, &mut rng()).unwrap();
        assert_eq!(tree.get(unvisited).ucb1(4, 1.96), f64::INFINITY);
    }

    #[test]
    fn test_expand_tags_mover_and_never_repeats() {
        let start = Connect4State::new(Rules::default()).unwrap();
        let mut tree = SearchTree::new(start.get_current_player());
        let mut rng = rng();

        for _ in 0..4 {
            let mut state = start.clone();
            let child = tree.expand(tree.root(), &mut state, &mut rng).unwrap();
            assert_ne!(child, tree.root());
            assert_eq!(tree.get(child).player(), Player::A);
            assert_eq!(tree.get(child).parent(), Some(tree.root()));
            assert_eq!(state.piece_count(), 1);
        }

        let mut moves: Vec<Connect4Move> =
            tree.root_stats().into_iter().map(|(mv, _)| mv).collect();
        moves.sort();
        assert_eq!(moves, (0..4).map(Connect4Move).collect::<Vec<_>>());

        // Fully expanded: nothing left to add at the root.
        let mut state = start.clone();
        assert_eq!(tree.expand(tree.root(), &mut state, &mut rng).unwrap(), tree.root());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_node_ids_follow_arena_order() {
        let start = Connect4State::new(Rules::default()).unwrap();
        let mut tree = SearchTree::new(start.get_current_player());
        let mut rng = rng();

        for expected in 1..=4 {
            let mut state = start.clone();
            let child = tree.expand(tree.root(), &mut state, &mut rng).unwrap();
            assert_eq!(child, NodeId(expected));
            assert_eq!(tree.len(), expected + 1);
        }
        let ids: Vec<NodeId> = tree
            .get(tree.root())
            .children()
            .iter()
            .map(|&(_, id)| id)
            .collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]);
    }

    #[test]
    fn test_expand_terminal_is_noop() {
        let mut state = Connect4State::new(Rules::new(2, 2, 1, true)).unwrap();
        state.apply(0).unwrap();
        let mut tree = SearchTree::new(state.get_current_player());
        let before = state.clone();
        assert_eq!(tree.expand(tree.root(), &mut state, &mut rng()).unwrap(), tree.root());
        assert_eq!(state, before);
    }

    #[test]
    fn test_select_stops_at_untried_moves() {
        let start = Connect4State::new(Rules::default()).unwrap();
        let mut tree = SearchTree::new(start.get_current_player());
        let mut rng = rng();

        let mut state = start.clone();
        let child = tree.expand(tree.root(), &mut state, &mut rng).unwrap();
        tree.backpropagate(child, None);

        let mut state = start.clone();
        assert_eq!(tree.select_to_expand(tree.root(), &mut state, 1.96).unwrap(), tree.root());
        assert_eq!(state.piece_count(), 0);
    }

    #[test]
    fn test_select_descends_fully_expanded_root() {
        let start = Connect4State::new(Rules::default()).unwrap();
        let mut tree = SearchTree::new(start.get_current_player());
        let mut rng = rng();
        for _ in 0..4 {
            let mut state = start.clone();
            let child = tree.expand(tree.root(), &mut state, &mut rng).unwrap();
            let winner = simulate(&mut state, &mut rng).unwrap();
            tree.backpropagate(child, winner);
        }

        let mut state = start.clone();
        let selected = tree.select_to_expand(tree.root(), &mut state, 1.96).unwrap();
        assert_eq!(tree.get(selected).parent(), Some(tree.root()));
        assert_eq!(state.piece_count(), 1);
    }

    #[test]
    fn test_best_child_ties_go_to_first_expanded() {
        let start = Connect4State::new(Rules::default()).unwrap();
        let mut tree = SearchTree::new(start.get_current_player());
        let mut rng = rng();
        let mut children = Vec::new();
        for _ in 0..2 {
            let mut state = start.clone();
            let child = tree.expand(tree.root(), &mut state, &mut rng).unwrap();
            tree.backpropagate(child, None);
            children.push(child);
        }
        let (_, picked) = tree.best_child(tree.root(), 2, 1.96).unwrap();
        assert_eq!(picked, children[0]);
    }

    #[test]
    fn test_backpropagate_counts_up_to_root() {
        let start = Connect4State::new(Rules::default()).unwrap();
        let mut tree = SearchTree::new(start.get_current_player());
        let mut rng = rng();
        let mut state = start.clone();
        let first = tree.expand(tree.root(), &mut state, &mut rng).unwrap();
        let second = tree.expand(first, &mut state, &mut rng).unwrap();
        assert_eq!(tree.get(second).player(), Player::B);

        tree.backpropagate(second, Some(Player::B));
        tree.backpropagate(second, Some(Player::A));
        tree.backpropagate(second, None);

        assert_eq!(tree.get(second).stats(), NodeStats::new(1, 3));
        assert_eq!(tree.get(first).stats(), NodeStats::new(1, 3));
        // Root is tagged with A, the player to move at the start.
        assert_eq!(tree.get(tree.root()).stats(), NodeStats::new(1, 3));
    }

    #[test]
    fn test_simulate_reports_existing_winner() {
        let mut state = Connect4State::new(Rules::new(2, 2, 1, true)).unwrap();
        state.apply(1).unwrap();
        assert_eq!(simulate(&mut state, &mut rng()).unwrap(), Some(Player::A));
    }

    #[test]
    fn test_simulate_draw_on_unwinnable_board() {
        // One row of four alternating pieces can never hold four of a kind.
        let mut state = Connect4State::new(Rules::new(1, 4, 4, true)).unwrap();
        assert_eq!(simulate(&mut state, &mut rng()).unwrap(), None);
        assert!(!state.has_empty_cell());
    }

    #[test]
    fn test_simulate_credits_the_mover() {
        // Every first move wins immediately.
        let mut state =
            Connect4State::with_first_player(Rules::new(3, 3, 1, true), Player::B).unwrap();
        assert_eq!(simulate(&mut state, &mut rng()).unwrap(), Some(Player::B));
        assert_eq!(state.piece_count(), 1);
    }

    #[test]
    fn test_best_move_prefers_ratio() {
        let start = Connect4State::new(Rules::default()).unwrap();
        let mut tree = SearchTree::new(start.get_current_player());
        let mut rng = rng();
        assert_eq!(tree.best_move(), None);

        let mut state = start.clone();
        let loser = tree.expand(tree.root(), &mut state, &mut rng).unwrap();
        tree.backpropagate(loser, Some(Player::B));
        let mut state = start.clone();
        let winner = tree.expand(tree.root(), &mut state, &mut rng).unwrap();
        tree.backpropagate(winner, Some(Player::A));

        let winning_move = tree
            .get(tree.root())
            .children()
            .iter()
            .find(|(_, id)| *id == winner)
            .map(|(mv, _)| *mv);
        assert_eq!(tree.best_move(), winning_move);
    }
}
