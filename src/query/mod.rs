pub mod cache;
pub mod planner;
pub mod types;
pub mod validator;
