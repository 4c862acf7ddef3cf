pub mod ch;
pub mod graphs;
pub mod queue;
pub mod restrictions;
pub mod utility;
