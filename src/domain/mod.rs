pub mod command;
pub mod models;
pub mod normalizer;
pub mod settings;
pub mod touch;
pub mod translator;
