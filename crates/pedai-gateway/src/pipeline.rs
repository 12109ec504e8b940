// SPDX-FileCopyrightText: 2026 Pedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message pipeline.
//!
//! Every webhook message walks the same stages: persist (idempotently),
//! gate on tenant configuration and business hours, dispatch to the
//! assistant, reply through the platform, and record the outbound message.
//! A failure in the reply leg never fails the webhook: the inbound message
//! is already durable by then.

use chrono::{Datelike, Local, Timelike, Utc};
use pedai_core::types::{conversation_id, MessageContent, NormalizedMessage, Platform, Store};
use pedai_core::{
    AssistantContext, AssistantResponder, HistoryEntry, Message, MessagingPlatform, PedaiError,
};
use pedai_storage::queries::{bot_configs, messages};
use pedai_storage::Database;
use tracing::{debug, info, warn};

/// Number of prior messages handed to the assistant as context.
const HISTORY_LIMIT: usize = 10;

/// Reply used when the responder fails mid-conversation.
const FALLBACK_REPLY: &str = "Obrigado pela mensagem! Em breve retornaremos seu contato.";

/// Terminal state of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Same platform message seen before; nothing was done.
    Duplicate,
    /// Message stored; auto-reply not configured or disabled.
    Persisted,
    /// Message stored; the outside-hours message was sent instead of
    /// dispatching the assistant.
    OutsideHours,
    /// Message stored and an assistant reply was delivered.
    Replied,
    /// Message stored and a reply was produced, but sending it failed.
    ReplyFailed,
}

fn inbound_row(store: &Store, platform: Platform, msg: &NormalizedMessage) -> Message {
    Message {
        id: uuid::Uuid::new_v4().to_string(),
        store_id: store.id.clone(),
        conversation_id: conversation_id(&store.id, &msg.customer_phone),
        customer_phone: msg.customer_phone.clone(),
        customer_name: msg.customer_name.clone(),
        platform: platform.to_string(),
        platform_message_id: msg.platform_message_id.clone(),
        direction: "inbound".to_string(),
        message_type: msg.message_type.clone(),
        content: serde_json::to_string(&msg.content)
            .unwrap_or_else(|_| "{\"kind\":\"empty\"}".to_string()),
        status: "received".to_string(),
        assistant_reply: false,
        created_at: msg.timestamp.to_rfc3339(),
    }
}

fn outbound_row(
    store: &Store,
    platform: Platform,
    to: &str,
    platform_message_id: &str,
    text: &str,
    status: &str,
) -> Message {
    Message {
        id: uuid::Uuid::new_v4().to_string(),
        store_id: store.id.clone(),
        conversation_id: conversation_id(&store.id, to),
        customer_phone: to.to_string(),
        customer_name: None,
        platform: platform.to_string(),
        platform_message_id: platform_message_id.to_string(),
        direction: "outbound".to_string(),
        message_type: "text".to_string(),
        content: serde_json::to_string(&MessageContent::Text {
            text: text.to_string(),
        })
        .unwrap_or_else(|_| "{\"kind\":\"empty\"}".to_string()),
        status: status.to_string(),
        assistant_reply: false,
        created_at: Utc::now().to_rfc3339(),
    }
}

/// Send a text message through the platform and record it.
///
/// Shared by the assistant reply leg and the manual send endpoint. A
/// failed send still leaves an outbound record in `failed` state; the
/// platform never assigned an id, so a local one keeps the row unique.
pub async fn send_and_record(
    db: &Database,
    platform: &dyn MessagingPlatform,
    platform_kind: Platform,
    store: &Store,
    config: &pedai_core::BotConfig,
    to: &str,
    text: &str,
) -> Result<Message, PedaiError> {
    match platform.send(config, to, text).await {
        Ok(sent) => {
            let row = outbound_row(store, platform_kind, to, &sent.0, text, "sent");
            messages::insert_message(db, &row).await?;
            Ok(row)
        }
        Err(e) => {
            let local_id = format!("local:{}", uuid::Uuid::new_v4());
            let row = outbound_row(store, platform_kind, to, &local_id, text, "failed");
            messages::insert_message(db, &row).await?;
            Err(e)
        }
    }
}

/// Run the full inbound pipeline for one normalized message.
pub async fn process_inbound(
    db: &Database,
    responder: &dyn AssistantResponder,
    assistant_enabled: bool,
    platform: &dyn MessagingPlatform,
    platform_kind: Platform,
    store: &Store,
    incoming: NormalizedMessage,
) -> Result<PipelineOutcome, PedaiError> {
    let row = inbound_row(store, platform_kind, &incoming);

    if !messages::insert_message(db, &row).await? {
        debug!(
            store_id = %store.id,
            platform_message_id = %incoming.platform_message_id,
            "duplicate delivery, skipping"
        );
        return Ok(PipelineOutcome::Duplicate);
    }

    let config = match bot_configs::get_bot_config(db, &store.id).await? {
        Some(config) => config,
        None => return Ok(PipelineOutcome::Persisted),
    };

    if !assistant_enabled || !config.auto_reply {
        return Ok(PipelineOutcome::Persisted);
    }

    // Business-hours gate, evaluated in server local time.
    let now = Local::now();
    let hhmm = format!("{:02}:{:02}", now.hour(), now.minute());
    if !config.business_hours.is_open_at(now.weekday(), &hhmm) {
        let sent = send_and_record(
            db,
            platform,
            platform_kind,
            store,
            &config,
            &row.customer_phone,
            &config.business_hours.outside_hours_message,
        )
        .await;
        return match sent {
            Ok(_) => Ok(PipelineOutcome::OutsideHours),
            Err(e) => {
                warn!(store_id = %store.id, error = %e, "outside-hours reply failed");
                Ok(PipelineOutcome::ReplyFailed)
            }
        };
    }

    // Last messages of the conversation, excluding the one just stored,
    // oldest first.
    let mut history: Vec<Message> =
        messages::recent_messages(db, &row.conversation_id, (HISTORY_LIMIT + 1) as i64)
            .await?
            .into_iter()
            .filter(|m| m.id != row.id)
            .take(HISTORY_LIMIT)
            .collect();
    history.reverse();

    let first_contact = history.is_empty();
    let ctx = AssistantContext {
        store_id: store.id.clone(),
        current_message: incoming.content.display_text(),
        customer_phone: row.customer_phone.clone(),
        customer_name: row.customer_name.clone(),
        history: history
            .iter()
            .map(|m| HistoryEntry {
                direction: m.direction.clone(),
                content: m.content().display_text(),
                timestamp: m.created_at.clone(),
            })
            .collect(),
        welcome_message: config.welcome_message.clone(),
    };

    let reply = match responder.respond(&ctx).await {
        Ok(reply) => {
            messages::mark_assistant_processed(db, &row.id).await?;
            reply
        }
        Err(e) => {
            warn!(store_id = %store.id, error = %e, "responder failed, using fallback");
            if first_contact {
                config.welcome_message.clone()
            } else {
                FALLBACK_REPLY.to_string()
            }
        }
    };

    match send_and_record(
        db,
        platform,
        platform_kind,
        store,
        &config,
        &row.customer_phone,
        &reply,
    )
    .await
    {
        Ok(_) => {
            info!(
                store_id = %store.id,
                customer = %row.customer_phone,
                "assistant reply delivered"
            );
            Ok(PipelineOutcome::Replied)
        }
        Err(e) => {
            warn!(store_id = %store.id, error = %e, "reply delivery failed");
            Ok(PipelineOutcome::ReplyFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use pedai_core::types::{BotConfig, PlatformMessageId, StoreStatus};
    use pedai_storage::queries::stores::create_store;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct MockPlatform {
        sent: Mutex<Vec<(String, String)>>,
        fail: AtomicBool,
    }

    impl MockPlatform {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: AtomicBool::new(false),
            }
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessagingPlatform for MockPlatform {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn verify_webhook(&self, _c: &BotConfig, _m: &str, _t: &str) -> bool {
            true
        }

        fn normalize(&self, _p: &serde_json::Value) -> Vec<NormalizedMessage> {
            Vec::new()
        }

        async fn send(
            &self,
            _config: &BotConfig,
            to: &str,
            text: &str,
        ) -> Result<PlatformMessageId, PedaiError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(PedaiError::Channel {
                    message: "mock send failure".into(),
                    source: None,
                });
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push((to.to_string(), text.to_string()));
            Ok(PlatformMessageId(format!("out-{}", sent.len())))
        }
    }

    struct MockResponder {
        reply: Option<String>,
    }

    #[async_trait]
    impl AssistantResponder for MockResponder {
        async fn respond(&self, _ctx: &AssistantContext) -> Result<String, PedaiError> {
            match &self.reply {
                Some(r) => Ok(r.clone()),
                None => Err(PedaiError::Assistant {
                    message: "mock responder down".into(),
                    source: None,
                }),
            }
        }
    }

    fn store() -> Store {
        Store {
            id: "s1".to_string(),
            slug: "loja1".to_string(),
            name: "Loja 1".to_string(),
            status: StoreStatus::Active,
            owner: None,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn incoming(id: &str, text: &str) -> NormalizedMessage {
        NormalizedMessage {
            platform_message_id: id.to_string(),
            customer_phone: "5511999998888".to_string(),
            customer_name: Some("Maria".to_string()),
            message_type: "text".to_string(),
            content: MessageContent::Text {
                text: text.to_string(),
            },
            timestamp: Utc::now(),
        }
    }

    async fn setup(config: Option<BotConfig>) -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();
        create_store(&db, &store()).await.unwrap();
        if let Some(config) = config {
            bot_configs::upsert_bot_config(&db, &config).await.unwrap();
        }
        (db, dir)
    }

    fn enabled_config() -> BotConfig {
        let mut config = BotConfig::new("s1", Platform::Whatsapp);
        config.access_token = Some("tok".to_string());
        config.phone_number_id = Some("123".to_string());
        config
    }

    #[tokio::test]
    async fn replies_and_records_outbound() {
        let (db, _dir) = setup(Some(enabled_config())).await;
        let platform = MockPlatform::new();
        let responder = MockResponder {
            reply: Some("Temos pizza!".to_string()),
        };

        let outcome = process_inbound(
            &db,
            &responder,
            true,
            &platform,
            Platform::Whatsapp,
            &store(),
            incoming("wamid.1", "qual o cardápio?"),
        )
        .await
        .unwrap();

        assert_eq!(outcome, PipelineOutcome::Replied);
        assert_eq!(
            platform.sent(),
            vec![("5511999998888".to_string(), "Temos pizza!".to_string())]
        );

        // Inbound marked as processed, outbound recorded.
        let conv = conversation_id("s1", "5511999998888");
        let msgs = messages::recent_messages(&db, &conv, 10).await.unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].direction, "outbound");
        assert_eq!(msgs[1].direction, "inbound");
        assert!(msgs[1].assistant_reply);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_delivery_is_a_no_op() {
        let (db, _dir) = setup(Some(enabled_config())).await;
        let platform = MockPlatform::new();
        let responder = MockResponder {
            reply: Some("oi".to_string()),
        };

        let first = process_inbound(
            &db,
            &responder,
            true,
            &platform,
            Platform::Whatsapp,
            &store(),
            incoming("wamid.1", "oi"),
        )
        .await
        .unwrap();
        assert_eq!(first, PipelineOutcome::Replied);

        let second = process_inbound(
            &db,
            &responder,
            true,
            &platform,
            Platform::Whatsapp,
            &store(),
            incoming("wamid.1", "oi"),
        )
        .await
        .unwrap();
        assert_eq!(second, PipelineOutcome::Duplicate);
        // No second reply.
        assert_eq!(platform.sent().len(), 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn no_config_persists_without_reply() {
        let (db, _dir) = setup(None).await;
        let platform = MockPlatform::new();
        let responder = MockResponder {
            reply: Some("oi".to_string()),
        };

        let outcome = process_inbound(
            &db,
            &responder,
            true,
            &platform,
            Platform::Whatsapp,
            &store(),
            incoming("wamid.1", "oi"),
        )
        .await
        .unwrap();

        assert_eq!(outcome, PipelineOutcome::Persisted);
        assert!(platform.sent().is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn auto_reply_disabled_persists_without_reply() {
        let mut config = enabled_config();
        config.auto_reply = false;
        let (db, _dir) = setup(Some(config)).await;
        let platform = MockPlatform::new();
        let responder = MockResponder {
            reply: Some("oi".to_string()),
        };

        let outcome = process_inbound(
            &db,
            &responder,
            true,
            &platform,
            Platform::Whatsapp,
            &store(),
            incoming("wamid.1", "oi"),
        )
        .await
        .unwrap();
        assert_eq!(outcome, PipelineOutcome::Persisted);
        assert!(platform.sent().is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn outside_hours_sends_configured_message() {
        let mut config = enabled_config();
        config.business_hours.enabled = true;
        // All days inactive: always closed.
        config.business_hours.outside_hours_message = "Estamos fechados.".to_string();
        let (db, _dir) = setup(Some(config)).await;
        let platform = MockPlatform::new();
        let responder = MockResponder {
            reply: Some("nunca enviado".to_string()),
        };

        let outcome = process_inbound(
            &db,
            &responder,
            true,
            &platform,
            Platform::Whatsapp,
            &store(),
            incoming("wamid.1", "oi"),
        )
        .await
        .unwrap();

        assert_eq!(outcome, PipelineOutcome::OutsideHours);
        assert_eq!(
            platform.sent(),
            vec![("5511999998888".to_string(), "Estamos fechados.".to_string())]
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn responder_failure_on_first_contact_sends_welcome() {
        let mut config = enabled_config();
        config.welcome_message = "Bem-vindo à Loja 1!".to_string();
        let (db, _dir) = setup(Some(config)).await;
        let platform = MockPlatform::new();
        let responder = MockResponder { reply: None };

        let outcome = process_inbound(
            &db,
            &responder,
            true,
            &platform,
            Platform::Whatsapp,
            &store(),
            incoming("wamid.1", "oi"),
        )
        .await
        .unwrap();

        assert_eq!(outcome, PipelineOutcome::Replied);
        assert_eq!(platform.sent()[0].1, "Bem-vindo à Loja 1!");

        // Later failure in an ongoing conversation uses the generic fallback.
        let outcome = process_inbound(
            &db,
            &responder,
            true,
            &platform,
            Platform::Whatsapp,
            &store(),
            incoming("wamid.2", "tem pizza?"),
        )
        .await
        .unwrap();
        assert_eq!(outcome, PipelineOutcome::Replied);
        assert_eq!(platform.sent()[1].1, FALLBACK_REPLY);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn send_failure_does_not_fail_pipeline() {
        let (db, _dir) = setup(Some(enabled_config())).await;
        let platform = MockPlatform::new();
        platform.fail.store(true, Ordering::SeqCst);
        let responder = MockResponder {
            reply: Some("oi".to_string()),
        };

        let outcome = process_inbound(
            &db,
            &responder,
            true,
            &platform,
            Platform::Whatsapp,
            &store(),
            incoming("wamid.1", "oi"),
        )
        .await
        .unwrap();

        assert_eq!(outcome, PipelineOutcome::ReplyFailed);
        // Inbound message is still durable; the outbound attempt is
        // recorded in failed state.
        let conv = conversation_id("s1", "5511999998888");
        let msgs = messages::recent_messages(&db, &conv, 10).await.unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].direction, "outbound");
        assert_eq!(msgs[0].status, "failed");
        assert_eq!(msgs[1].direction, "inbound");
        db.close().await.unwrap();
    }
}
