pub mod directory;
pub mod fare;
pub mod ids;
pub mod lifecycle;
pub mod settlement;
