pub mod sound;
pub mod stream_deck_key;

use serde::Serialize;

/// Standard envelope for single-resource responses.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
