pub mod root;

use super::{
    extractor::{FromValidate, Json},
    HttpError, SharedState,
};
