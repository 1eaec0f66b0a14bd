//! Request/response shapes and route paths shared by the server and its
//! clients.

pub mod routes;
pub mod types;

pub use types::{
    AddItemResponse, AdminStatus, DeleteItemRequest, ListQuery, LoginRequest,
    LogsClearResponse, NewItemRequest, PriceInput, SuccessResponse,
};
