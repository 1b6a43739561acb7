//! Procedural gecko locomotion: diagonal-pair stepping, standoff steering and
//! constrained head/eye tracking, driven once per frame by Bevy.

pub mod locomotion;
