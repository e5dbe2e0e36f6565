use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Health {
    Ok,
    Pending,
    Warning,
    Error,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_uses_uppercase_names() {
        let cases = [
            (Health::Ok, "OK"),
            (Health::Pending, "PENDING"),
            (Health::Warning, "WARNING"),
            (Health::Error, "ERROR"),
            (Health::Unknown, "UNKNOWN"),
        ];

        for (health, name) in cases {
            assert_eq!(serde_json::to_value(health).unwrap(), json!(name));
            assert_eq!(serde_json::from_value::<Health>(json!(name)).unwrap(), health);
        }
    }

    #[test]
    fn it_returns_err_for_unknown_names() {
        assert!(serde_json::from_value::<Health>(json!("ok")).is_err());
        assert!(serde_json::from_value::<Health>(json!("DEGRADED")).is_err());
    }
}
