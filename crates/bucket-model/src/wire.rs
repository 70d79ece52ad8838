//! Request and response bodies of the remote array store.

use serde::{Deserialize, Serialize};

use crate::{ArrayId, ArrayRecord};

/// Body of `POST /arrays/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateArrayRequest<'a> {
    pub data: &'a [i64],
    pub is_sorted: bool,
}

impl<'a> CreateArrayRequest<'a> {
    /// New records are always stored unsorted.
    pub fn new(data: &'a [i64]) -> Self {
        Self {
            data,
            is_sorted: false,
        }
    }
}

/// Body of `PUT /arrays/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateArrayRequest<'a> {
    pub data: &'a [i64],
    pub is_sorted: bool,
}

/// Body of `POST /sort/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    pub id: ArrayId,
}

/// Body of `GET /arrays/?page=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    pub count: u64,
    pub results: Vec<ArrayRecord>,
}
