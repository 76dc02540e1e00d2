pub mod aggregate;
pub mod brackets;
pub mod contact;
pub mod identity;
pub mod mixing;
pub mod setting;
