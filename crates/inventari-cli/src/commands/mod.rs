pub mod families;
pub mod parse;
