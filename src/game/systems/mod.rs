pub mod movement;
pub mod ai;
pub mod collision;
pub mod pickup;
pub mod obstacle;
