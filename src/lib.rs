#[macro_use]
extern crate log;

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod page;
pub mod selection;
pub mod workflow;
