//! Boolean acknowledgement wrapper

use serde::{Deserialize, Serialize};

/// `{"value": true|false}` answer to a yes/no query or acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericResponse {
    pub value: bool,
}

impl GenericResponse {
    pub const fn success() -> Self {
        Self { value: true }
    }

    pub const fn fail() -> Self {
        Self { value: false }
    }

    pub const fn from_bool(value: bool) -> Self {
        Self { value }
    }
}

impl From<bool> for GenericResponse {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape() {
        assert_eq!(
            serde_json::to_value(GenericResponse::success()).unwrap(),
            serde_json::json!({ "value": true })
        );
        assert_eq!(GenericResponse::from(false), GenericResponse::fail());
    }
}
