pub mod balance_model;
pub mod db_model;
pub mod queries;
pub mod rpc_model;

pub use balance_model::*;
pub use db_model::*;
pub use queries::*;
pub use rpc_model::*;
