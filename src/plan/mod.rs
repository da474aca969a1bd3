pub mod encode;
pub mod store;
pub mod validate;

pub use store::{load, plan_path, save};
pub use validate::decode_and_validate;
