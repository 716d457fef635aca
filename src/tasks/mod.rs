use crate::client::WorkflowClient;
use crate::domain::deadline::{self, GRACE_SECONDS};
use crate::domain::{AssignmentPayload, DeadlineTriggerPayload, EmployeeRecord};
use crate::logging::{log_network_failure, log_success, log_validation_failure};
use anyhow::Result;
use log::warn;

/// Strips whitespace and dashes, then ensures a leading `+` — the
/// nudge workflows only accept E.164-ish numbers.
pub fn normalize_phone(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if cleaned.is_empty() || cleaned.starts_with('+') {
        cleaned
    } else {
        format!("+{}", cleaned)
    }
}

/// Builds the update payload and the matching workflow-trigger payload.
/// The deadline is parsed first so an untrackable string never reaches
/// the database, and re-serialized to the canonical year-first shape.
pub fn build_assignment(
    employee: &EmployeeRecord,
    task: &str,
    due: &str,
) -> Result<(AssignmentPayload, DeadlineTriggerPayload)> {
    let parsed = deadline::parse_deadline(due)?;
    let canonical = deadline::format_db_deadline(parsed);

    let phone = normalize_phone(employee.phone_no.as_deref().unwrap_or_default());

    let payload = AssignmentPayload {
        email: employee.email.clone(),
        phone_no: phone,
        user_id: employee.user_id.clone().unwrap_or_default(),
        task: task.to_string(),
        deadline: canonical.clone(),
        status: "Assigned".to_string(),
    };

    let trigger = DeadlineTriggerPayload {
        email: employee.email.clone(),
        deadline: canonical,
        grace_seconds: GRACE_SECONDS,
    };

    Ok((payload, trigger))
}

/// Two-step assignment: write the record, then start the hosted countdown
/// workflow. Once the write has succeeded the assignment stands — a
/// trigger failure only means the upstream countdown never started, which
/// the next poll makes visible.
pub async fn assign(
    client: &WorkflowClient,
    employee: &EmployeeRecord,
    task: &str,
    due: &str,
) -> Result<()> {
    let (payload, trigger) = build_assignment(employee, task, due)?;

    if let Err(e) = client.assign_task(&payload).await {
        // transport failures are not server rejections
        if e.downcast_ref::<reqwest::Error>().is_some() {
            log_network_failure("task update", &e.to_string());
        } else {
            log_validation_failure(&e.to_string());
        }
        return Err(e);
    }

    match client.trigger_deadline_workflow(&trigger).await {
        Ok(()) => log_success(&format!(
            "Task assigned to {} & timer started",
            employee.name
        )),
        Err(e) => warn!(
            "⚠️ Task saved but deadline workflow failed to start: {}",
            e
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn employee() -> EmployeeRecord {
        serde_json::from_str(
            r#"{
                "email": "asha@example.com",
                "name": "Asha Rao",
                "userId": "101",
                "phoneNo": "91 98765-43210"
            }"#,
        )
        .unwrap()
    }

    #[rstest]
    #[case("91 98765-43210", "+919876543210")]
    #[case("+91 98765 43210", "+919876543210")]
    #[case("9876543210", "+9876543210")]
    #[case("", "")]
    fn phone_normalization(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_phone(raw), expected);
    }

    #[test]
    fn builds_canonical_payload() {
        let (payload, trigger) =
            build_assignment(&employee(), "Prepare Q3 report", "21-03-2025 02:30 PM").unwrap();

        assert_eq!(payload.deadline, "2025-03-21 02:30 PM");
        assert_eq!(payload.status, "Assigned");
        assert_eq!(payload.phone_no, "+919876543210");
        assert_eq!(payload.user_id, "101");

        assert_eq!(trigger.deadline, payload.deadline);
        assert_eq!(trigger.grace_seconds, GRACE_SECONDS);
    }

    #[test]
    fn rejects_untrackable_deadline() {
        assert!(build_assignment(&employee(), "Report", "whenever").is_err());
    }

    #[tokio::test]
    async fn trigger_failure_does_not_fail_the_assignment() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/update")
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("POST", "/trigger")
            .with_status(500)
            .create_async()
            .await;

        let config = crate::config::WorkflowConfig {
            read_url: server.url(),
            update_url: format!("{}/update", server.url()),
            deadline_workflow_url: format!("{}/trigger", server.url()),
        };
        let client = WorkflowClient::new(&config, std::time::Duration::from_secs(2));

        assign(&client, &employee(), "Report", "2025-03-21 02:30 PM")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn write_failure_fails_the_assignment_without_triggering() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/update")
            .with_status(422)
            .with_body(r#"{ "error": { "message": "unknown employee" } }"#)
            .create_async()
            .await;
        let trigger = server
            .mock("POST", "/trigger")
            .expect(0)
            .create_async()
            .await;

        let config = crate::config::WorkflowConfig {
            read_url: server.url(),
            update_url: format!("{}/update", server.url()),
            deadline_workflow_url: format!("{}/trigger", server.url()),
        };
        let client = WorkflowClient::new(&config, std::time::Duration::from_secs(2));

        let err = assign(&client, &employee(), "Report", "2025-03-21 02:30 PM")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unknown employee"));
        trigger.assert_async().await;
    }
}
