pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Deserialize a piped stdin document into a typed input, if one was piped.
pub fn from_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    match stdin::read_stdin()? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}
