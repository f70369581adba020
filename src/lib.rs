pub mod cli;
pub mod field;
pub mod framepace;
pub mod gpu;
pub mod gui;
pub mod links;
pub mod particle;
pub mod render;
pub mod settings;
pub mod theme;
pub mod utils;
