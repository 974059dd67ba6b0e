//! # Issuance over REST
//!
//! The authority's REST surface against a real CSV ledger: issuance,
//! validation, durability across restarts.

#[cfg(test)]
mod tests {
    use crate::harness::AuthorityServer;
    use shared_types::{decode, encode, Ticket, ValidateTicketResponse};
    use std::collections::HashSet;
    use tempfile::tempdir;
    use tk_01_authority::{CsvLedgerStore, LedgerStore, TicketAuthorityApi};

    async fn validate(server: &AuthorityServer, token: &str) -> (u16, serde_json::Value) {
        let response = reqwest::Client::new()
            .post(format!("{}/api/tickets/validate", server.url()))
            .json(&serde_json::json!({ "ticketBase64": token }))
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_issue_then_validate_over_http() {
        let dir = tempdir().unwrap();
        let server = AuthorityServer::start(&dir.path().join("tickets.csv")).await;

        let created = server.create_ticket(7, 3).await;
        assert!(created.success);
        let ticket = decode(&created.ticket_base64).unwrap();
        assert_eq!(ticket, created.ticket);
        assert!(ticket.is_valid(chrono::Utc::now()));

        let (status, body) = validate(&server, &created.ticket_base64).await;
        assert_eq!(status, 200);
        let verdict: ValidateTicketResponse = serde_json::from_value(body).unwrap();
        assert!(verdict.valid);
        assert_eq!(verdict.reason, "valid");
        assert_eq!(verdict.line_number, 3);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_every_issued_ticket_is_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tickets.csv");
        let server = AuthorityServer::start(&path).await;

        let mut handles = Vec::new();
        for i in 0..20 {
            let url = server.url();
            handles.push(tokio::spawn(async move {
                reqwest::Client::new()
                    .post(format!("{url}/api/tickets/create"))
                    .json(&serde_json::json!({ "validityDays": 1, "lineNumber": i }))
                    .send()
                    .await
                    .unwrap()
                    .json::<shared_types::CreateTicketResponse>()
                    .await
                    .unwrap()
                    .ticket_id
            }));
        }
        let mut ids = HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }

        let on_disk: HashSet<String> = CsvLedgerStore::new(&path)
            .load()
            .unwrap()
            .tickets
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(on_disk, ids);

        let listed = server.get_json("/api/tickets").await;
        assert_eq!(listed.as_array().unwrap().len(), 20);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_restart_keeps_tickets_and_never_reuses_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tickets.csv");

        let first = AuthorityServer::start(&path).await;
        let earlier = first.create_ticket(30, 1).await;
        let second = first.create_ticket(30, 2).await;
        first.stop().await;

        let restarted = AuthorityServer::start(&path).await;
        let (_, body) = validate(&restarted, &earlier.ticket_base64).await;
        assert_eq!(body["valid"], true);

        let fresh = restarted.create_ticket(30, 3).await;
        assert_ne!(fresh.ticket_id, earlier.ticket_id);
        assert_ne!(fresh.ticket_id, second.ticket_id);
        assert_eq!(restarted.authority.tickets().len(), 3);

        restarted.stop().await;
    }

    #[tokio::test]
    async fn test_never_issued_and_malformed_tokens() {
        let dir = tempdir().unwrap();
        let server = AuthorityServer::start(&dir.path().join("tickets.csv")).await;

        let stranger = encode(&Ticket::new("TKT-404-1", chrono::Utc::now(), 7, 1));
        let (status, body) = validate(&server, &stranger).await;
        assert_eq!(status, 200);
        assert_eq!(body["valid"], false);
        assert_eq!(body["exists"], false);
        assert_eq!(body["reason"], "not found");

        let (status, body) = validate(&server, "!!not-a-token!!").await;
        assert_eq!(status, 500);
        assert_eq!(body["success"], false);

        let response = reqwest::Client::new()
            .post(format!("{}/api/tickets/create", server.url()))
            .body("{\"validityDays\":")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = tempdir().unwrap();
        let server = AuthorityServer::start(&dir.path().join("tickets.csv")).await;
        let body = reqwest::get(format!("{}/health", server.url()))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "OK");
        server.stop().await;
    }
}
