//! Data Transfer Objects for REST request/response serialization.
//!
//! Currency amounts are serialized as JSON strings with two decimals.

pub mod common_dto;
pub mod play_dto;
pub mod player_dto;
pub mod report_dto;

pub use common_dto::*;
pub use play_dto::*;
pub use player_dto::*;
pub use report_dto::*;
