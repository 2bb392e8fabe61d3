//! notepad: a small server-rendered web application whose user and note data
//! can live in SQLite, SurrealDB or an embedded redb file.

pub mod auth;
pub mod config;
pub mod db;
pub mod web;

#[cfg(test)]
mod config_test;
