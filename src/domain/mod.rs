use serde::{Deserialize, Serialize};

pub mod deadline;

// ==================================================
// EMPLOYEE RECORDS (read endpoint wire format)
// ==================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub email: String,

    #[serde(default)]
    pub name: String,

    #[serde(
        rename = "userId",
        alias = "id",
        default,
        deserialize_with = "de_string_or_number"
    )]
    pub user_id: Option<String>,

    #[serde(
        rename = "phoneNo",
        alias = "phone",
        default,
        deserialize_with = "de_string_or_number"
    )]
    pub phone_no: Option<String>,

    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,

    #[serde(default)]
    pub task: Option<String>,

    // Served as a DeadlineString, but older rows carry bare numbers.
    // Anything unparseable surfaces as "Invalid Deadline" at render time.
    #[serde(default, deserialize_with = "de_string_or_number")]
    pub deadline: Option<String>,
}

impl EmployeeRecord {
    /// A task counts only if it is non-empty after trimming.
    pub fn has_task(&self) -> bool {
        self.task
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn display_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or("—")
    }
}

// ==================================================
// WRITE PAYLOADS
// ==================================================

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentPayload {
    pub email: String,
    #[serde(rename = "phoneNo")]
    pub phone_no: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub task: String,
    pub deadline: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeadlineTriggerPayload {
    pub email: String,
    pub deadline: String,
    #[serde(rename = "graceSeconds")]
    pub grace_seconds: i64,
}

// Helper to accept fields the service serves as either strings or numbers
fn de_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
        Float(f64),
    }

    let opt = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(opt.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    }))
}
