pub mod dates;
pub mod xml;
