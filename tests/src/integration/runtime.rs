//! # Runtime Integration
//!
//! Exercises the JSON command surface over a durable file ledger, including
//! a reopen between sessions.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::Value;
    use tracker_runtime::{CommandHandler, EngineContainer, TrackerConfig};

    fn open(path: &std::path::Path) -> CommandHandler {
        let mut config = TrackerConfig::default();
        config.storage.data_file = path.to_path_buf();
        config.validate().unwrap();
        CommandHandler::new(Arc::new(EngineContainer::new(config).unwrap()))
    }

    async fn run(handler: &CommandHandler, line: &str) -> Value {
        let response = handler.handle_line(line).await;
        serde_json::to_value(&response).unwrap()
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        {
            let handler = open(&path);
            let r = run(
                &handler,
                r#"{"cmd":"scan","actor":{"identity":"planta","role":"mechanic"},"code":"OG971390|202630010002"}"#,
            )
            .await;
            assert_eq!(r["ok"], true);
            assert_eq!(r["data"]["outcome"]["kind"], "created");

            let r = run(
                &handler,
                r#"{"cmd":"scan","actor":{"identity":"despacho","role":"despacho","client":"ACME"},"code":"OG971390|202630010002"}"#,
            )
            .await;
            assert_eq!(r["data"]["record"]["state"], "DISPATCHED");
        }

        let handler = open(&path);
        let r = run(
            &handler,
            r#"{"cmd":"scan","actor":{"identity":"jon","role":"mechanic"},"code":"OG971390|202630010002"}"#,
        )
        .await;
        assert_eq!(r["ok"], true);
        assert_eq!(r["data"]["outcome"]["kind"], "needs_data");
        assert_eq!(r["data"]["record"]["state"], "DISPATCHED");

        let r = run(
            &handler,
            r#"{"cmd":"scan","actor":{"identity":"jon","role":"mechanic"},"code":"OG971390|202630010002","payload":{"kind":"install","plate":"ABC123","odometer":"1000","installer_name":"Jon"}}"#,
        )
        .await;
        assert_eq!(r["data"]["record"]["state"], "INSTALLED");

        let r = run(
            &handler,
            r#"{"cmd":"stats","actor":{"identity":"boss","role":"admin","client":"acme"}}"#,
        )
        .await;
        assert_eq!(r["data"]["total"], 1);
        assert_eq!(r["data"]["installed"], 1);

        let r = run(&handler, r#"{"cmd":"list_clients"}"#).await;
        assert_eq!(r["data"][0]["name"], "ACME");

        let r = run(&handler, r#"{"cmd":"delete_client","name":"ACME"}"#).await;
        assert_eq!(r["ok"], false);
        assert_eq!(r["error"]["kind"], "client_has_records");
    }

    #[tokio::test]
    async fn test_projections_scoped_by_role() {
        let dir = tempfile::tempdir().unwrap();
        let handler = open(&dir.path().join("ledger.json"));

        let r = run(
            &handler,
            r#"{"cmd":"projections","actor":{"identity":"root","role":"superadmin"}}"#,
        )
        .await;
        assert_eq!(r["ok"], true);
        assert_eq!(r["data"]["stats"]["total_samples"], 0);

        let r = run(
            &handler,
            r#"{"cmd":"projections","actor":{"identity":"boss","role":"admin"}}"#,
        )
        .await;
        assert_eq!(r["error"]["kind"], "scope_unresolved");
    }
}
