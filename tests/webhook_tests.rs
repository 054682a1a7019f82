// Event routing, session lifecycle transitions, redelivery and concurrency.

mod common;

use anyhow::Result;
use async_trait::async_trait;
use common::*;
use futures::future::join_all;
use interview_orchestrator::session::{
    InMemorySessionStore, InterviewSession, QuestionSpec, SessionStatus, SessionStore,
    SessionUpdate,
};
use interview_orchestrator::{
    CompletionClient, DisabledCompletionClient, InterviewError, WebhookEvent,
};
use serde_json::json;
use std::sync::{Arc, OnceLock};

#[tokio::test]
async fn test_call_start_redelivery_keeps_active_session() {
    let h = harness(Arc::new(DisabledCompletionClient));
    schedule(&h.store, "call-1", template(3, 30.0)).await;

    h.router.dispatch_at(start_event("call-1", t0()), t0()).await;
    h.router
        .dispatch_at(
            answer_event("call-1", "I led the payments platform team", minutes(1.0)),
            minutes(1.0),
        )
        .await;
    let before = h.session("call-1").await;

    let reply = h.router.dispatch_at(start_event("call-1", minutes(5.0)), minutes(5.0)).await;

    assert!(reply.is_none());
    let after = h.session("call-1").await;
    assert_eq!(after.status, SessionStatus::InProgress);
    assert_eq!(after.started_at, before.started_at);
    assert_eq!(after.started_at, Some(t0()));
    assert_eq!(after.current_question_index, 1);
}

#[tokio::test]
async fn test_duplicate_transcript_does_not_over_advance() {
    let h = harness(Arc::new(DisabledCompletionClient));
    schedule(&h.store, "call-dup", template(3, 30.0)).await;
    h.router.dispatch_at(start_event("call-dup", t0()), t0()).await;

    let event = answer_event("call-dup", "I enjoy building reliable systems", minutes(1.0));
    for _ in 0..3 {
        h.router.dispatch_at(event.clone(), minutes(1.0)).await;
    }

    let session = h.session("call-dup").await;
    assert_eq!(session.current_question_index, 1);
    assert_eq!(session.messages.len(), 1);
}

#[tokio::test]
async fn test_interviewer_and_short_messages_are_logged_without_advancing() {
    let h = harness(Arc::new(DisabledCompletionClient));
    schedule(&h.store, "call-log", template(3, 30.0)).await;

    h.router
        .handle_json(json!({
            "kind": "transcript",
            "callId": "call-log",
            "message": {
                "role": "assistant",
                "content": "Welcome! Let's get started with a long question.",
                "time": 1000
            }
        }))
        .await;
    h.router
        .handle_json(json!({
            "kind": "transcript",
            "callId": "call-log",
            "message": { "role": "user", "content": "  sure  ", "time": 2000 }
        }))
        .await;

    let session = h.session("call-log").await;
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.current_question_index, 0);
}

#[tokio::test]
async fn test_index_never_decreases_across_event_sequence() {
    let h = harness(Arc::new(DisabledCompletionClient));
    schedule(&h.store, "call-seq", template(2, 20.0)).await;

    let events = vec![
        // Transcript arrives before call-start
        answer_event("call-seq", "Hello, I'm ready to begin the interview", minutes(0.1)),
        start_event("call-seq", t0()),
        request_event("call-seq"),
        answer_event("call-seq", "I have worked on compilers for years", minutes(1.0)),
        answer_event("call-seq", "I have worked on compilers for years", minutes(1.0)),
        start_event("call-seq", minutes(2.0)),
        answer_event("call-seq", "And I also maintain a parsing library", minutes(3.0)),
        request_event("call-seq"),
        WebhookEvent::CallEnd {
            call_id: "call-seq".to_string(),
            ended_at: Some(minutes(4.0)),
            cost: Some(0.12),
            report: json!({}),
        },
        answer_event("call-seq", "A late message after the call ended", minutes(5.0)),
        start_event("call-seq", minutes(6.0)),
    ];

    let mut last = 0;
    for event in events {
        h.router.dispatch_at(event, minutes(4.0)).await;
        let index = h.session("call-seq").await.current_question_index;
        assert!(index >= last, "index went from {} to {}", last, index);
        last = index;
    }
    assert_eq!(last, 2);
}

#[tokio::test]
async fn test_completed_session_ignores_further_events() {
    let h = harness(Arc::new(DisabledCompletionClient));
    schedule(&h.store, "call-end", template(2, 20.0)).await;
    h.router.dispatch_at(start_event("call-end", t0()), t0()).await;
    h.router
        .dispatch_at(
            WebhookEvent::CallEnd {
                call_id: "call-end".to_string(),
                ended_at: Some(minutes(8.0)),
                cost: Some(0.5),
                report: json!({}),
            },
            minutes(8.0),
        )
        .await;

    let sealed = h.session("call-end").await;
    assert_eq!(sealed.status, SessionStatus::Completed);
    assert_eq!(sealed.completed_at, Some(minutes(8.0)));
    assert_eq!(sealed.cost, Some(0.5));

    h.router.dispatch_at(start_event("call-end", minutes(9.0)), minutes(9.0)).await;
    h.router
        .dispatch_at(
            answer_event("call-end", "Is anyone still there on the line?", minutes(9.0)),
            minutes(9.0),
        )
        .await;
    h.router
        .dispatch_at(
            WebhookEvent::CallEnd {
                call_id: "call-end".to_string(),
                ended_at: Some(minutes(10.0)),
                cost: Some(0.9),
                report: json!({}),
            },
            minutes(10.0),
        )
        .await;
    // Still answered, with closing remarks
    assert_eq!(h.ask("call-end", minutes(9.0)).await, closing_for("Ada"));

    let after = h.session("call-end").await;
    assert_eq!(after.status, SessionStatus::Completed);
    assert_eq!(after.completed_at, Some(minutes(8.0)));
    assert_eq!(after.ended_at, Some(minutes(8.0)));
    assert_eq!(after.cost, Some(0.5));
    assert_eq!(after.current_question_index, 0);
    assert!(after.messages.is_empty());
}

#[tokio::test]
async fn test_unknown_and_malformed_events_answer_null() {
    let h = harness(Arc::new(DisabledCompletionClient));

    let unknown = json!({ "kind": "speech-update", "callId": "x" });
    assert!(h.router.handle_json(unknown).await.is_none());
    assert!(h.router.handle_json(json!({ "kind": "transcript" })).await.is_none());
    assert!(h.router.handle_json(json!({ "callId": "x" })).await.is_none());
    assert!(h.router.handle_json(json!([1, 2, 3])).await.is_none());
}

#[tokio::test]
async fn test_assistant_request_without_call_id_is_ignored() {
    let h = harness(Arc::new(DisabledCompletionClient));
    assert!(h.router.handle_json(json!({ "kind": "assistant-request" })).await.is_none());
}

#[tokio::test]
async fn test_unknown_session_gets_continuation_utterance() {
    let h = harness(Arc::new(DisabledCompletionClient));

    let reply = h
        .router
        .handle_json(json!({ "kind": "assistant-request", "callId": "nobody" }))
        .await
        .unwrap();

    assert_eq!(reply.content, CONTINUATION);
}

#[tokio::test]
async fn test_events_for_unknown_session_are_ignored() {
    let h = harness(Arc::new(DisabledCompletionClient));

    assert!(h.router.dispatch_at(start_event("ghost", t0()), t0()).await.is_none());
    assert!(h
        .router
        .dispatch_at(answer_event("ghost", "Nobody will ever read this answer", t0()), t0())
        .await
        .is_none());
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_concurrent_transcripts_for_one_session_serialize() {
    let h = Arc::new(harness(Arc::new(DisabledCompletionClient)));
    schedule(&h.store, "call-race", template(5, 30.0)).await;
    h.router.dispatch_at(start_event("call-race", t0()), t0()).await;

    let deliveries = (0..20).map(|i| {
        let h = Arc::clone(&h);
        async move {
            let at = minutes(1.0 + i as f64 / 10.0);
            h.router
                .dispatch_at(
                    answer_event("call-race", &format!("Distinct substantive answer {}", i), at),
                    at,
                )
                .await
        }
    });
    join_all(deliveries).await;

    // Same message delivered concurrently many times
    let dupes = (0..10).map(|_| {
        let h = Arc::clone(&h);
        async move {
            h.router
                .dispatch_at(
                    answer_event("call-race", "A duplicated delivery of one answer", minutes(9.0)),
                    minutes(9.0),
                )
                .await
        }
    });
    join_all(dupes).await;

    let session = h.session("call-race").await;
    assert_eq!(session.messages.len(), 21);
    assert_eq!(session.current_question_index, 5);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let h = harness(Arc::new(DisabledCompletionClient));
    schedule(&h.store, "call-a", template(2, 30.0)).await;
    schedule(&h.store, "call-b", template(2, 30.0)).await;

    h.router.dispatch_at(start_event("call-a", t0()), t0()).await;
    h.router
        .dispatch_at(
            answer_event("call-a", "Answer only for session A", minutes(1.0)),
            minutes(1.0),
        )
        .await;

    assert_eq!(h.session("call-a").await.current_question_index, 1);
    let b = h.session("call-b").await;
    assert_eq!(b.current_question_index, 0);
    assert_eq!(b.status, SessionStatus::Scheduled);
    assert_eq!(h.store.len().await, 2);
    assert!(h.store.get_by_call_id("call-c").await.unwrap().is_none());
}

#[tokio::test]
async fn test_assistant_request_tolerates_mistyped_envelope_fields() {
    let h = harness(Arc::new(DisabledCompletionClient));
    schedule(&h.store, "call-typed", template(2, 30.0)).await;

    let reply = h
        .router
        .handle_json(json!({
            "type": "assistant-request",
            "callId": "call-typed",
            "cost": "0.05",
            "assistantId": 7,
            "timestamp": { "unexpected": true }
        }))
        .await
        .expect("assistant-request always gets a reply");

    assert_eq!(reply.content, "Template question 1?");
}

#[tokio::test]
async fn test_role_labels_are_case_insensitive() {
    let h = harness(Arc::new(DisabledCompletionClient));
    schedule(&h.store, "call-roles", template(3, 30.0)).await;

    for (role, content) in [
        ("Candidate", "I have run Kafka clusters in production"),
        ("USER", "Mostly Rust and Go over the last five years"),
        ("Assistant", "Thanks, let us move on to the next topic"),
    ] {
        let reply = h
            .router
            .handle_json(json!({
                "type": "transcript",
                "callId": "call-roles",
                "message": { "role": role, "content": content, "time": "2025-03-01T14:01:00Z" }
            }))
            .await;
        assert!(reply.is_none());
    }

    let session = h.session("call-roles").await;
    assert_eq!(session.messages.len(), 3);
    assert_eq!(session.current_question_index, 2);
}

#[tokio::test]
async fn test_sessions_sharing_a_template_id_keep_their_own_questions() {
    let h = harness(Arc::new(DisabledCompletionClient));

    let mut first = template(1, 30.0);
    first.id = "shared".to_string();
    schedule(&h.store, "call-a", first).await;

    let mut second = template(3, 30.0);
    second.id = "shared".to_string();
    second.questions = (1..=3)
        .map(|i| QuestionSpec {
            text: format!("B question {}?", i),
            category: "technical".to_string(),
            weight: 1.0,
        })
        .collect();
    schedule(&h.store, "call-b", second).await;

    assert_eq!(h.ask("call-a", t0()).await, "Template question 1?");
    assert_eq!(h.ask("call-b", t0()).await, "B question 1?");

    let (session, template) = h.store.get_with_template("call-b").await.unwrap().unwrap();
    assert_eq!(template.question_count(), 3);
    assert_eq!(session.template_question_count, 3);
}

#[tokio::test]
async fn test_schedule_rejects_session_template_mismatch() {
    let store = InMemorySessionStore::new();
    let session = InterviewSession::new("call-x", "Ada", "Backend Engineer", "tpl-other", 2);

    let err = store.schedule(session, template(2, 30.0)).await.unwrap_err();

    assert!(matches!(err, InterviewError::Validation(_)));
    assert!(store.is_empty().await);
}

/// Ends the call while a follow-up question is still being generated
struct EndsCallDuringGeneration {
    store: OnceLock<Arc<InMemorySessionStore>>,
    call_id: String,
}

#[async_trait]
impl CompletionClient for EndsCallDuringGeneration {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        if let Some(store) = self.store.get() {
            let end = SessionUpdate::End {
                ended_at: None,
                cost: None,
                now: minutes(15.0),
            };
            store.update(&self.call_id, end).await?;
        }
        Ok("What would you do differently on that project next time?".to_string())
    }

    fn name(&self) -> &str {
        "ends-call"
    }
}

#[tokio::test]
async fn test_no_follow_up_question_once_session_ended_during_generation() {
    let completion = Arc::new(EndsCallDuringGeneration {
        store: OnceLock::new(),
        call_id: "call-late".to_string(),
    });
    let h = harness(completion.clone());
    let _ = completion.store.set(h.store.clone());

    schedule(&h.store, "call-late", template(1, 30.0)).await;
    h.router.dispatch_at(start_event("call-late", t0()), t0()).await;
    let answer = answer_event("call-late", "I mostly work on backend services", minutes(2.0));
    h.router.dispatch_at(answer, minutes(2.0)).await;

    assert_eq!(h.ask("call-late", minutes(15.0)).await, closing_for("Ada"));

    let session = h.session("call-late").await;
    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.dynamic_questions.is_empty());
}
