//! Lane geometry and per-lane state.
//!
//! A game board is five parallel lanes of seven rows each. Row 3 is the
//! neutral middle pile and is never a placement target. Rows 0-2 are the
//! host's side, rows 4-6 the guest's; rows mirror by `row <-> 6 - row`.

use serde::Serialize;

use super::cards_types::{Card, PlacedCard, Side};

pub const LANE_COUNT: usize = 5;
pub const LANE_ROWS: usize = 7;
pub const MIDDLE_ROW: usize = 3;

/// Rows that can be placed into, in ascending order.
pub const PLACEMENT_ROWS: [usize; 6] = [0, 1, 2, 4, 5, 6];

/// The row adjacent to the middle on a side: where that side enters a lane
/// and where a middle capture is triggered from.
#[inline]
pub fn breach_row(side: Side) -> usize {
    match side {
        Side::Host => 2,
        Side::Guest => 4,
    }
}

/// The farthest row of a side's advance; landing here wins the lane.
#[inline]
pub fn win_row(side: Side) -> usize {
    match side {
        Side::Host => 6,
        Side::Guest => 0,
    }
}

/// The three rows on a side's own half of the lane.
#[inline]
pub fn home_rows(side: Side) -> [usize; 3] {
    match side {
        Side::Host => [0, 1, 2],
        Side::Guest => [4, 5, 6],
    }
}

#[inline]
pub fn is_own_side_row(side: Side, row: usize) -> bool {
    match side {
        Side::Host => row < MIDDLE_ROW,
        Side::Guest => row > MIDDLE_ROW,
    }
}

#[inline]
pub fn mirror_row(row: usize) -> usize {
    (LANE_ROWS - 1) - row
}

/// The next placement row outward from `row` in `side`'s advance direction
/// (toward the opponent's edge), skipping the middle. None past the edge.
#[inline]
pub fn next_row_outward(side: Side, row: usize) -> Option<usize> {
    let next = match side {
        Side::Host => row + 1,
        Side::Guest => row.checked_sub(1)?,
    };
    if next >= LANE_ROWS {
        return None;
    }
    if next == MIDDLE_ROW {
        next_row_outward(side, next)
    } else {
        Some(next)
    }
}

/// Rows strictly between the side's breach row and `row`, middle excluded.
/// These are the rows a move must already hold to avoid skipping ahead.
pub fn rows_between_breach(side: Side, row: usize) -> Vec<usize> {
    let breach = breach_row(side);
    let (lo, hi) = if breach < row { (breach, row) } else { (row, breach) };
    ((lo + 1)..hi).filter(|&r| r != MIDDLE_ROW).collect()
}

/// One of the five lanes: seven bottom-to-top row stacks plus lane flags.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Lane {
    pub rows: [Vec<PlacedCard>; LANE_ROWS],
    /// Which side currently owns the middle pile, if any. Transitions
    /// None -> Some(side) on capture and back to None only on an ace wipe.
    pub advantage: Option<Side>,
    /// Set exactly once, permanently, when a side reaches its win row.
    pub won_by: Option<Side>,
    /// The most recent offensive card placed in this lane; constrains the
    /// suit/kind of the next placement.
    pub last_played: Option<Card>,
}

impl Lane {
    pub fn top_card(&self, row: usize) -> Option<&PlacedCard> {
        self.rows[row].last()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.is_empty())
    }

    pub fn card_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }

    /// Cards a side owns anywhere in the lane (middle included).
    pub fn cards_owned_by(&self, side: Side) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|p| p.owned_by == side)
            .count()
    }

    /// The row of the side's most-offensive card: the furthest placement row
    /// along its advance direction whose top card the side owns. The middle
    /// pile never counts.
    pub fn most_offensive_row(&self, side: Side) -> Option<usize> {
        let owned = |&row: &usize| {
            self.top_card(row)
                .map(|p| p.owned_by == side)
                .unwrap_or(false)
        };
        match side {
            Side::Host => PLACEMENT_ROWS.iter().rev().find(|r| owned(r)).copied(),
            Side::Guest => PLACEMENT_ROWS.iter().find(|r| owned(r)).copied(),
        }
    }

    /// The side's most-offensive card itself.
    pub fn most_offensive(&self, side: Side) -> Option<PlacedCard> {
        self.most_offensive_row(side)
            .and_then(|row| self.top_card(row).copied())
    }
}
