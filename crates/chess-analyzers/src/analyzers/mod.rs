pub mod captured;
pub mod checkmate;
pub mod fork;
pub mod phase;
pub mod think_time;
