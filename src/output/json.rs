use serde::Serialize;
use serde_json::{json, Value};

use crate::error::CoordinatorError;

/// Wrap a successful result in the `{success, data}` envelope every
/// command's JSON output shares.
pub fn success<T: Serialize>(data: &T) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &CoordinatorError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn print_success<T: Serialize>(data: &T) {
    println!("{}", serde_json::to_string_pretty(&success(data)).unwrap());
}

pub fn print_error(err: &CoordinatorError) {
    println!("{}", serde_json::to_string_pretty(&error(err)).unwrap());
}
