//! Shared response envelope.
//!
//! Resource endpoints answer `{ "data": ... }`.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
