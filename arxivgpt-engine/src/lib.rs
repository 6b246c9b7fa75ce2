pub mod document;
pub mod outcome;
pub mod planner;
pub mod resolver;
pub mod traits;
pub mod ui;
