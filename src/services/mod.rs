pub mod accounts;
pub mod aggregation;
pub mod catalog;
pub mod filter;
pub mod media;
pub mod preferences;
pub mod providers;
pub mod recommendations;
pub mod rooms;
