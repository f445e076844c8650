//! Background tasks.

pub mod interaction_sweeper;
