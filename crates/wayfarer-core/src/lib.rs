pub mod catalog;
pub mod events;
pub mod geo;
pub mod models;
pub mod persistence;
pub mod planner;
pub mod sources;
pub mod sqlite;
pub mod storage;
pub mod validate;
