pub mod brackets;
pub mod config;
pub mod contact;
pub mod contact_synth;
pub mod population;
