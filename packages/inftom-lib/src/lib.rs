pub mod automaton;
pub mod config;
pub mod logger;
