pub mod bitflags;
pub mod clapx;
pub mod compat;
pub mod device;
pub mod history;
pub mod launcher;
pub mod options;
pub mod settings;
pub mod title;
