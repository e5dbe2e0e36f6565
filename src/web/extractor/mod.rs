mod json;

pub use json::{FromValidate, Json};
