// src/locomotion/gait.rs
//! Diagonal-pair gait: only one diagonal pair may be stepping at a time.
//!
//! Each `tick` is one resumption of the endless loop
//! "keep asking pair A to step until both its legs have settled, then do the
//! same for pair B". The loop itself lives in the caller's frame cadence.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LegId {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl LegId {
    pub const ALL: [LegId; 4] = [
        LegId::FrontLeft,
        LegId::FrontRight,
        LegId::BackLeft,
        LegId::BackRight,
    ];

    pub fn pair(self) -> DiagonalPair {
        match self {
            LegId::FrontLeft | LegId::BackRight => DiagonalPair::A,
            LegId::FrontRight | LegId::BackLeft => DiagonalPair::B,
        }
    }
}

/// A = front-left + back-right, B = front-right + back-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DiagonalPair {
    #[default]
    A,
    B,
}

impl DiagonalPair {
    pub fn legs(self) -> [LegId; 2] {
        match self {
            DiagonalPair::A => [LegId::FrontLeft, LegId::BackRight],
            DiagonalPair::B => [LegId::FrontRight, LegId::BackLeft],
        }
    }

    pub fn other(self) -> Self {
        match self {
            DiagonalPair::A => DiagonalPair::B,
            DiagonalPair::B => DiagonalPair::A,
        }
    }
}

/// The only view of the legs the scheduler gets.
pub trait GaitLegs {
    fn request_move(&mut self, leg: LegId);
    fn is_moving(&self, leg: LegId) -> bool;
}

#[derive(Clone, Debug, Default)]
pub struct GaitScheduler {
    active: DiagonalPair,
    primed: bool,
}

impl GaitScheduler {
    pub fn active_pair(&self) -> DiagonalPair {
        self.active
    }

    /// Advance one frame. Switches pairs only once the active pair has been
    /// asked at least once and neither of its legs is still stepping.
    pub fn tick(&mut self, legs: &mut impl GaitLegs) {
        if self.primed && !self.active.legs().iter().any(|&leg| legs.is_moving(leg)) {
            self.active = self.active.other();
            debug!("Gait: pair {:?} settled, handing over to {:?}", self.active.other(), self.active);
        }
        for leg in self.active.legs() {
            legs.request_move(leg);
        }
        self.primed = true;
    }
}
