//! Integration tests for the ticket, comment and status services

mod support;

use std::io::Write;

use jiralink_core::{CommentService, StatusService, TicketService};
use jiralink_domain::{
    AssigneeData, AttributeData, CommentData, DescriptionData, HttpMethod, JiraError,
    SearchCriteria, StatusData, TicketData,
};
use serde_json::{json, Value};
use support::{test_config, Harness};

fn issue_json(key: &str, summary: &str, status: &str) -> Value {
    json!({
        "id": "10001",
        "key": key,
        "fields": {
            "summary": summary,
            "description": {
                "type": "doc",
                "version": 1,
                "content": [{"type": "paragraph", "content": [
                    {"type": "text", "text": "Hello "},
                    {"type": "text", "text": "world"}
                ]}]
            },
            "status": {"name": status},
            "issuetype": {"name": "Bug"},
            "priority": {"name": "High"},
            "assignee": {"accountId": "abc", "displayName": "Jane Doe"},
            "labels": ["backend"],
            "components": [{"name": "API"}],
            "created": "2024-01-15T10:30:00.000+0000",
            "updated": "2024-01-16T08:00:00.000+0000"
        }
    })
}

fn tickets(harness: &Harness) -> TicketService {
    TicketService::new(harness.dispatcher.clone(), "ABC")
}

#[tokio::test]
async fn test_get_ticket_decodes_details() {
    let harness = Harness::new(&test_config());
    harness.transport.push_json(200, issue_json("ABC-1", "Broken login", "In Progress"));

    let ticket = tickets(&harness).get_ticket("ABC-1").await.unwrap();

    assert_eq!(ticket.key, "ABC-1");
    assert_eq!(ticket.description, "Hello world");
    assert_eq!(ticket.priority.as_deref(), Some("High"));
    assert_eq!(ticket.components, ["API"]);
    assert!(ticket.is_assigned());
    assert!(!ticket.is_resolved());

    let requests = harness.transport.requests();
    assert_eq!(requests[0].method(), HttpMethod::Get);
    assert_eq!(requests[0].endpoint(), "/rest/api/3/issue/ABC-1");
}

#[tokio::test]
async fn test_get_ticket_not_found() {
    let harness = Harness::new(&test_config());
    harness.transport.push_json(404, json!({"errorMessages": ["Issue does not exist"]}));

    let err = tickets(&harness).get_ticket("ABC-404").await.unwrap_err();
    assert!(matches!(err, JiraError::NotFound(_)));
}

#[tokio::test]
async fn test_blank_key_is_rejected_locally() {
    let harness = Harness::new(&test_config());

    let err = tickets(&harness).get_ticket("   ").await.unwrap_err();
    assert!(matches!(err, JiraError::Validation(_)));
    assert_eq!(harness.transport.call_count(), 0);
}

#[tokio::test]
async fn test_search_posts_jql_and_pages() {
    let harness = Harness::new(&test_config());
    harness.transport.push_json(
        200,
        json!({
            "startAt": 0,
            "maxResults": 1,
            "total": 2,
            "issues": [issue_json("ABC-1", "One", "Open")]
        }),
    );

    let criteria = SearchCriteria::for_assignee("ABC", "jdoe").with_status("Open");
    let result = tickets(&harness).search_tickets(&criteria, 1, 0).await.unwrap();

    assert_eq!(result.total, 2);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.next_start_at(), Some(1));

    let request = &harness.transport.requests()[0];
    assert_eq!(request.method(), HttpMethod::Post);
    assert_eq!(request.endpoint(), "/rest/api/3/search");
    assert_eq!(request.body()["jql"], criteria.build_jql());
    assert_eq!(request.body()["maxResults"], 1);
}

#[tokio::test]
async fn test_list_tickets_combines_filters() {
    let harness = Harness::new(&test_config());
    harness.transport.push_json(200, json!({"startAt": 0, "maxResults": 50, "total": 0, "issues": []}));

    let result =
        tickets(&harness).list_tickets(Some("jdoe"), Some("backend"), None, 50, 0).await.unwrap();
    assert!(result.issues.is_empty());

    let jql = harness.transport.requests()[0].body()["jql"].as_str().unwrap().to_string();
    assert!(jql.starts_with("project = ABC"));
    assert!(jql.contains("assignee = jdoe"));
    assert!(jql.contains("backend"));
}

/// Validates create-then-fetch.
///
/// # Test Steps
/// 1. Script the create response (id/key only) and the full issue payload
/// 2. Create a ticket
/// 3. Verify the POST body and the follow-up GET of the returned key
#[tokio::test]
async fn test_create_ticket_fetches_created_issue() {
    let harness = Harness::new(&test_config());
    harness.transport.push_json(201, json!({"id": "10002", "key": "ABC-2", "self": "https://x"}));
    harness.transport.push_json(200, issue_json("ABC-2", "New bug", "Open"));

    let data = TicketData::builder("New bug", "Steps to reproduce", "Bug")
        .priority("High")
        .labels(["backend"])
        .build()
        .unwrap();
    let ticket = tickets(&harness).create_ticket(&data).await.unwrap();

    assert_eq!(ticket.key, "ABC-2");
    assert_eq!(ticket.summary, "New bug");

    let requests = harness.transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].endpoint(), "/rest/api/3/issue");
    assert_eq!(requests[0].body()["fields"]["project"]["key"], "ABC");
    assert_eq!(requests[0].body()["fields"]["issuetype"]["name"], "Bug");
    assert_eq!(requests[1].endpoint(), "/rest/api/3/issue/ABC-2");
}

#[tokio::test]
async fn test_create_ticket_without_key_in_response() {
    let harness = Harness::new(&test_config());
    harness.transport.push_json(201, json!({}));

    let data = TicketData::new("Summary", "", "Task").unwrap();
    let err = tickets(&harness).create_ticket(&data).await.unwrap_err();
    assert!(matches!(err, JiraError::Decode(_)));
}

#[tokio::test]
async fn test_create_ticket_requires_project_key() {
    let harness = Harness::new(&test_config());
    let service = TicketService::new(harness.dispatcher.clone(), "");

    let data = TicketData::new("Summary", "", "Task").unwrap();
    let err = service.create_ticket(&data).await.unwrap_err();
    assert!(matches!(err, JiraError::Config(_)));
    assert_eq!(harness.transport.call_count(), 0);
}

#[tokio::test]
async fn test_update_ticket_refreshes_stale_cache() {
    let harness = Harness::new(&test_config());
    let service = tickets(&harness);
    harness.transport.push_json(200, issue_json("ABC-1", "Old", "Open"));
    harness.transport.push_status(204);
    harness.transport.push_json(200, issue_json("ABC-1", "New", "Open"));

    assert_eq!(service.get_ticket("ABC-1").await.unwrap().summary, "Old");

    let data = TicketData::new("New", "Updated", "Bug").unwrap();
    let updated = service.update_ticket("ABC-1", &data).await.unwrap();
    assert_eq!(updated.summary, "New");

    // The refreshed payload replaced the cached one.
    assert_eq!(service.get_ticket("ABC-1").await.unwrap().summary, "New");
    assert_eq!(harness.transport.call_count(), 3);
}

#[tokio::test]
async fn test_field_updates_send_put_bodies() {
    let harness = Harness::new(&test_config());
    let service = tickets(&harness);

    service
        .change_attribute("ABC-1", &AttributeData::new("priority", "Low").unwrap())
        .await
        .unwrap();
    service
        .reassign_ticket("ABC-1", &AssigneeData::new("jane@example.com").unwrap())
        .await
        .unwrap();
    service
        .edit_description("ABC-1", &DescriptionData::new("Rewritten").unwrap())
        .await
        .unwrap();

    let requests = harness.transport.requests();
    assert!(requests.iter().all(|r| r.method() == HttpMethod::Put));
    assert_eq!(requests[0].body()["fields"]["priority"]["name"], "Low");
    assert_eq!(requests[1].body()["fields"]["assignee"]["name"], "jane@example.com");
    assert_eq!(requests[2].body()["fields"]["description"]["type"], "doc");
}

#[tokio::test]
async fn test_delete_ticket() {
    let harness = Harness::new(&test_config());
    harness.transport.push_status(204);

    tickets(&harness).delete_ticket("ABC-1").await.unwrap();
    assert_eq!(harness.transport.requests()[0].method(), HttpMethod::Delete);
}

#[tokio::test]
async fn test_ticket_history_pages() {
    let harness = Harness::new(&test_config());
    harness.transport.push_json(
        200,
        json!({"values": [{
            "id": "1",
            "author": {"displayName": "Jane"},
            "created": "2024-01-15T10:30:00.000+0000",
            "items": [{"field": "status", "fromString": "Open", "toString": "Done"}]
        }]}),
    );

    let history = tickets(&harness).ticket_history("ABC-1", 10, 5).await.unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].items[0].to.as_deref(), Some("Done"));

    let request = &harness.transport.requests()[0];
    assert_eq!(request.endpoint(), "/rest/api/3/issue/ABC-1/changelog");
    assert_eq!(request.params()["maxResults"].to_string(), "10");
    assert_eq!(request.params()["startAt"].to_string(), "5");
}

#[tokio::test]
async fn test_attach_file() {
    let harness = Harness::new(&test_config());
    harness.transport.push_json(200, json!([{"id": "1", "filename": "log.txt"}]));
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"trace").unwrap();

    let attachments =
        tickets(&harness).attach_file("ABC-1", file.path(), "log.txt").await.unwrap();

    assert_eq!(attachments[0]["filename"], "log.txt");
    assert_eq!(harness.transport.uploads()[0].0, "/rest/api/3/issue/ABC-1/attachments");
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let harness = Harness::new(&test_config());
    let service = CommentService::new(harness.dispatcher.clone());
    let adf = json!({"type": "doc", "content": [
        {"type": "paragraph", "content": [{"type": "text", "text": "Looks good"}]}
    ]});
    harness.transport.push_json(201, json!({"id": "100", "author": {"displayName": "Jane"}, "body": adf}));
    harness.transport.push_json(200, json!({"comments": [{"id": "100", "body": adf}], "total": 1}));
    harness.transport.push_json(200, json!({"id": "100", "body": "Edited"}));
    harness.transport.push_status(204);

    let created =
        service.add_comment("ABC-1", &CommentData::new("Looks good").unwrap()).await.unwrap();
    assert_eq!(created.id, "100");
    assert_eq!(created.body, "Looks good");

    let comments = service.get_comments("ABC-1", 50, 0).await.unwrap();
    assert_eq!(comments.len(), 1);

    let edited = service
        .update_comment("ABC-1", "100", &CommentData::new("Edited").unwrap())
        .await
        .unwrap();
    assert_eq!(edited.body, "Edited");

    service.delete_comment("ABC-1", "100").await.unwrap();

    let endpoints: Vec<_> =
        harness.transport.requests().iter().map(|r| r.endpoint().to_string()).collect();
    assert_eq!(
        endpoints,
        [
            "/rest/api/3/issue/ABC-1/comment",
            "/rest/api/3/issue/ABC-1/comment",
            "/rest/api/3/issue/ABC-1/comment/100",
            "/rest/api/3/issue/ABC-1/comment/100",
        ]
    );
}

fn transitions_json() -> Value {
    json!({"transitions": [
        {"id": "11", "name": "Start", "to": {"name": "In Progress"}},
        {"id": "31", "name": "Finish", "to": {"name": "Done"}, "hasScreen": false}
    ]})
}

#[tokio::test]
async fn test_change_status_matches_case_insensitively() {
    let harness = Harness::new(&test_config());
    let service = StatusService::new(harness.dispatcher.clone());
    harness.transport.push_json(200, transitions_json());
    harness.transport.push_status(204);

    let status = StatusData::new("done").unwrap().with_comment("Shipped").unwrap();
    service.change_status("ABC-1", &status).await.unwrap();

    let requests = harness.transport.requests();
    assert_eq!(requests[1].method(), HttpMethod::Post);
    assert_eq!(requests[1].endpoint(), "/rest/api/3/issue/ABC-1/transitions");
    assert_eq!(requests[1].body()["transition"]["id"], "31");
    assert_eq!(
        requests[1].body()["update"]["comment"][0]["add"]["body"]["content"][0]["content"][0]
            ["text"],
        "Shipped"
    );
}

#[tokio::test]
async fn test_change_status_unknown_target() {
    let harness = Harness::new(&test_config());
    let service = StatusService::new(harness.dispatcher.clone());
    harness.transport.push_json(200, transitions_json());

    let err = service.change_status("ABC-1", &StatusData::new("Archived").unwrap()).await.unwrap_err();

    assert!(matches!(
        err,
        JiraError::TransitionNotFound { ref ticket, ref status } if ticket == "ABC-1" && status == "Archived"
    ));
    assert_eq!(harness.transport.call_count(), 1);
}

#[tokio::test]
async fn test_change_status_ignores_cached_transitions() {
    let harness = Harness::new(&test_config());
    let service = StatusService::new(harness.dispatcher.clone());
    harness.transport.push_json(200, json!({"transitions": []}));
    harness.transport.push_json(200, transitions_json());
    harness.transport.push_status(204);

    assert!(service.available_transitions("ABC-1").await.unwrap().is_empty());
    service.change_status("ABC-1", &StatusData::new("In Progress").unwrap()).await.unwrap();

    assert_eq!(harness.transport.requests()[2].body()["transition"]["id"], "11");
}
