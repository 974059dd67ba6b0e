//! # Gate Flows
//!
//! A gate on the bus talking to a real authority: online verdicts, the
//! offline fallback, and reports arriving at the authority.

#[cfg(test)]
mod tests {
    use crate::harness::{dead_authority_url, AuthorityServer, GateFixture, StubAuthority, WAIT};
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::{Duration, Utc};
    use shared_bus::topics;
    use shared_types::{encode, GateAction, Ticket, ValidationMode};
    use std::sync::Arc;
    use tempfile::tempdir;
    use tk_01_authority::{AlwaysFail, CsvLedgerStore, FailEveryNth, LedgerStore};
    use tk_02_gate::{GateConfig, GateValidatorApi, ReportFormat};

    #[tokio::test]
    async fn test_issued_ticket_opens_gate_online() {
        let dir = tempdir().unwrap();
        let server = AuthorityServer::start(&dir.path().join("tickets.csv")).await;
        let mut gate = GateFixture::start("001", server.url()).await;

        let created = server.create_ticket(7, 3).await;
        let verdict = gate.present(&created.ticket_base64).await;

        assert_eq!(verdict.gate_id, "001");
        assert_eq!(verdict.ticket_id, created.ticket_id);
        assert!(verdict.valid);
        assert_eq!(verdict.gate_action, GateAction::Open);
        assert_eq!(verdict.validation_mode, ValidationMode::Online);
        assert_eq!(verdict.message, "Ticket is valid");

        gate.stop().await;
        server.stop().await;
    }

    #[tokio::test]
    async fn test_never_issued_ticket_is_refused_online() {
        let dir = tempdir().unwrap();
        let server = AuthorityServer::start(&dir.path().join("tickets.csv")).await;
        let mut gate = GateFixture::start("001", server.url()).await;

        let forged = encode(&Ticket::new("TKT-999-1", Utc::now(), 30, 1));
        let verdict = gate.present(&forged).await;

        assert!(!verdict.valid);
        assert_eq!(verdict.gate_action, GateAction::Closed);
        assert_eq!(verdict.validation_mode, ValidationMode::Online);
        assert_eq!(verdict.message, "Ticket not found in database");

        gate.stop().await;
        server.stop().await;
    }

    #[tokio::test]
    async fn test_unreachable_authority_falls_back_offline() {
        let mut gate = GateFixture::start("001", dead_authority_url()).await;
        let now = Utc::now();

        let fresh = Ticket::new("TKT-1-1", now, 7, 1);
        let verdict = gate.present(&encode(&fresh)).await;
        assert_eq!(verdict.validation_mode, ValidationMode::Offline);
        assert_eq!(verdict.valid, fresh.is_valid(Utc::now()));
        assert!(verdict.valid);
        assert_eq!(verdict.message, "Valid (offline check - expiry only)");

        let ancient = Ticket::new("TKT-2-1", now - Duration::days(3650), 1, 1);
        let verdict = gate.present(&encode(&ancient)).await;
        assert_eq!(verdict.validation_mode, ValidationMode::Offline);
        assert!(!verdict.valid);
        assert_eq!(verdict.gate_action, GateAction::Closed);

        let stats = gate.gate.stats();
        assert_eq!(stats.offline_count, 2);
        assert_eq!(stats.online_count, 0);

        gate.stop().await;
    }

    #[tokio::test]
    async fn test_expired_ticket_refused_in_both_modes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tickets.csv");
        let ancient = Ticket::new("TKT-1-1", Utc::now() - Duration::days(3650), 1, 4);
        CsvLedgerStore::new(&path)
            .persist(std::slice::from_ref(&ancient))
            .unwrap();
        let token = encode(&ancient);

        let server = AuthorityServer::start(&path).await;
        let mut online = GateFixture::start("001", server.url()).await;
        let verdict = online.present(&token).await;
        assert_eq!(verdict.validation_mode, ValidationMode::Online);
        assert!(!verdict.valid);
        assert_eq!(verdict.message, "Ticket expired");
        online.stop().await;
        server.stop().await;

        let mut offline = GateFixture::start("001", dead_authority_url()).await;
        let verdict = offline.present(&token).await;
        assert_eq!(verdict.validation_mode, ValidationMode::Offline);
        assert!(!verdict.valid);
        offline.stop().await;
    }

    #[tokio::test]
    async fn test_injected_fault_routes_offline() {
        let dir = tempdir().unwrap();
        let server =
            AuthorityServer::start_with_faults(&dir.path().join("tickets.csv"), Arc::new(AlwaysFail))
                .await;
        let mut gate = GateFixture::start("001", server.url()).await;

        // Offline admits a never-issued ticket with a plausible date.
        let forged = encode(&Ticket::new("TKT-999-1", Utc::now(), 30, 1));
        let verdict = gate.present(&forged).await;
        assert_eq!(verdict.validation_mode, ValidationMode::Offline);
        assert!(verdict.valid);

        gate.stop().await;
        server.stop().await;
    }

    #[tokio::test]
    async fn test_mode_follows_authority_availability() {
        let dir = tempdir().unwrap();
        let server = AuthorityServer::start_with_faults(
            &dir.path().join("tickets.csv"),
            Arc::new(FailEveryNth::new(2)),
        )
        .await;
        let mut gate = GateFixture::start("001", server.url()).await;
        let created = server.create_ticket(7, 1).await;

        let mut modes = Vec::new();
        for _ in 0..4 {
            modes.push(gate.present(&created.ticket_base64).await.validation_mode);
        }
        assert_eq!(
            modes,
            [
                ValidationMode::Online,
                ValidationMode::Offline,
                ValidationMode::Online,
                ValidationMode::Offline
            ]
        );

        gate.stop().await;
        server.stop().await;
    }

    #[tokio::test]
    async fn test_unsuccessful_answer_routes_offline() {
        let stub = StubAuthority::start(Router::new().route(
            "/api/tickets/validate",
            post(|| async {
                Json(serde_json::json!({ "success": false, "error": "ledger busy" }))
            }),
        ))
        .await;
        let mut gate = GateFixture::start("001", stub.url()).await;

        let fresh = Ticket::new("TKT-1-1", Utc::now(), 7, 1);
        let verdict = gate.present(&encode(&fresh)).await;
        assert_eq!(verdict.validation_mode, ValidationMode::Offline);
        assert!(verdict.valid);

        let stale = Ticket::new("TKT-2-1", Utc::now() - Duration::days(30), 7, 1);
        let verdict = gate.present(&encode(&stale)).await;
        assert_eq!(verdict.validation_mode, ValidationMode::Offline);
        assert!(!verdict.valid);

        gate.stop().await;
    }

    #[tokio::test]
    async fn test_slow_authority_times_out_offline() {
        let stub = StubAuthority::start(Router::new().route(
            "/api/tickets/validate",
            post(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                Json(serde_json::json!({ "success": true, "valid": false }))
            }),
        ))
        .await;
        let mut gate = GateFixture::start_with(GateConfig {
            authority_url: stub.url(),
            connect_timeout_ms: 500,
            request_timeout_ms: 300,
            reconnect_delay_ms: 20,
            ..GateConfig::for_gate("001")
        })
        .await;

        let started = tokio::time::Instant::now();
        let verdict = gate.present(&encode(&Ticket::new("TKT-1-1", Utc::now(), 7, 1))).await;
        assert_eq!(verdict.validation_mode, ValidationMode::Offline);
        assert!(verdict.valid);
        assert!(started.elapsed() < std::time::Duration::from_secs(3));

        gate.stop().await;
    }

    #[tokio::test]
    async fn test_gate_specific_topic() {
        let dir = tempdir().unwrap();
        let server = AuthorityServer::start(&dir.path().join("tickets.csv")).await;
        let mut gate = GateFixture::start("007", server.url()).await;
        let created = server.create_ticket(7, 1).await;

        let verdict = gate
            .present_on(topics::validation_request_for("007"), &created.ticket_base64)
            .await;
        assert_eq!(verdict.gate_id, "007");
        assert!(verdict.valid);

        gate.stop().await;
        server.stop().await;
    }

    #[tokio::test]
    async fn test_tenth_request_reports_to_authority() {
        let dir = tempdir().unwrap();
        let server = AuthorityServer::start(&dir.path().join("tickets.csv")).await;
        let mut gate = GateFixture::start("001", server.url()).await;
        let created = server.create_ticket(7, 1).await;

        for _ in 0..9 {
            gate.present(&created.ticket_base64).await;
        }
        assert_eq!(server.get_json("/api/reports").await["count"], 0);

        gate.present(&created.ticket_base64).await;

        let deadline = tokio::time::Instant::now() + WAIT;
        let listing = loop {
            let listing = server.get_json("/api/reports").await;
            if listing["count"] == 1 {
                break listing;
            }
            assert!(tokio::time::Instant::now() < deadline, "report never arrived");
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        };

        let body = listing["reports"][0]["body"].as_str().unwrap();
        let report: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(report["gateId"], "001");
        assert_eq!(report["totalProcessed"], 10);
        assert_eq!(report["validCount"], 10);
        assert_eq!(report["recentValidations"].as_array().unwrap().len(), 10);

        gate.stop().await;
        server.stop().await;
    }

    #[tokio::test]
    async fn test_xml_reports_are_stored_verbatim() {
        let dir = tempdir().unwrap();
        let server = AuthorityServer::start(&dir.path().join("tickets.csv")).await;
        let mut gate = GateFixture::start_with(GateConfig {
            authority_url: server.url(),
            report_every: 1,
            report_format: ReportFormat::Xml,
            reconnect_delay_ms: 20,
            ..GateConfig::for_gate("004")
        })
        .await;
        let created = server.create_ticket(7, 1).await;
        gate.present(&created.ticket_base64).await;

        let deadline = tokio::time::Instant::now() + WAIT;
        let listing = loop {
            let listing = server.get_json("/api/reports").await;
            if listing["count"] == 1 {
                break listing;
            }
            assert!(tokio::time::Instant::now() < deadline, "report never arrived");
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        };

        let body = listing["reports"][0]["body"].as_str().unwrap();
        assert!(body.starts_with("<?xml"));
        assert!(body.contains("<GateId>004</GateId>"));
        assert!(body.contains(&format!("<TicketId>{}</TicketId>", created.ticket_id)));
        assert!(body.contains("<Mode>online</Mode>"));

        gate.stop().await;
        server.stop().await;
    }

    #[tokio::test]
    async fn test_malformed_request_yields_no_verdict() {
        let mut gate = GateFixture::start("001", dead_authority_url()).await;

        let err = gate.gate.handle_message(b"{\"ticketBase64\":\"@@@\"}").await;
        assert!(err.is_err());
        assert_eq!(gate.gate.stats().total_processed, 0);

        // The loop is still alive after a malformed request.
        let ticket = Ticket::new("TKT-1-1", Utc::now(), 1, 1);
        let verdict = gate.present(&encode(&ticket)).await;
        assert_eq!(verdict.ticket_id, "TKT-1-1");

        gate.stop().await;
    }
}
