//! End-to-end tests for the reading-history pipeline: raw records through
//! grouping, sessionization, labels, expansion, and deletion against a
//! history store.

use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use manga_shelf::api::{HistoryApi, MemoryHistoryApi};
use manga_shelf::history::{group_records, session_label, HistoryView};
use manga_shelf::model::ReadingRecord;

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn records(json: &str) -> Vec<ReadingRecord> {
    serde_json::from_str(json).unwrap()
}

const NOW: &str = "2026-08-08T12:00:00Z";

#[test]
fn two_records_become_one_title_one_session() {
    // Two separate read events for the same title, half an hour apart.
    let input = records(
        r#"[
            {
                "titleId": {"id": "A", "name": "Ashen Road", "slug": "ashen-road"},
                "chapters": [{"chapterId": "c-1", "chapterNumber": 1, "readAt": "2026-08-08T09:00:00Z"}]
            },
            {
                "titleId": "A",
                "chapters": [{"chapterId": "c-2", "chapterNumber": 2, "readAt": "2026-08-08T09:30:00Z"}]
            }
        ]"#,
    );

    let mut view = HistoryView::new();
    view.set_records(&input, ts(NOW));

    let groups = view.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].chapters.len(), 2);
    assert_eq!(groups[0].last_read_at, ts("2026-08-08T09:30:00Z"));

    let sessions = view.sessions("A");
    assert_eq!(sessions.len(), 1);
    assert_eq!(session_label(&sessions[0].chapters), "Chapters 1-2");
}

#[tokio::test]
async fn expansion_fetches_detail_and_refines_sessions() {
    // The bulk payload is summarized: one chapter plus a count.
    let bulk = records(
        r#"[
            {
                "titleId": {"id": "A", "name": "Ashen Road"},
                "chapters": [{"chapterId": "c-3", "chapterNumber": 3, "readAt": "2026-08-08T10:00:00Z"}],
                "chaptersCount": 3
            }
        ]"#,
    );
    // The store holds the full history.
    let store = MemoryHistoryApi::new(records(
        r#"[
            {
                "titleId": {"id": "A", "name": "Ashen Road"},
                "chapters": [
                    {"chapterId": "c-1", "chapterNumber": 1, "readAt": "2026-08-08T09:00:00Z"},
                    {"chapterId": "c-2", "chapterNumber": 2, "readAt": "2026-08-08T09:20:00Z"},
                    {"chapterId": "c-3", "chapterNumber": 3, "readAt": "2026-08-08T10:00:00Z"}
                ]
            }
        ]"#,
    ));

    let mut view = HistoryView::new();
    view.set_records(&bulk, ts(NOW));
    assert_eq!(view.group("A").unwrap().chapters_read(), 3);

    // Before the detail resolves the summarized chapter keeps rendering.
    let request = view.toggle_expand("A").expect("first expand fetches");
    assert_eq!(view.visible_chapters("A").len(), 1);

    let chapters = store.fetch_title_history("A").await.unwrap();
    view.resolve_detail("A", request.generation, chapters);

    let sessions = view.sessions("A");
    assert_eq!(sessions.len(), 1);
    assert_eq!(session_label(&sessions[0].chapters), "Chapters 1-3");
}

#[tokio::test]
async fn failed_delete_surfaces_message_and_changes_nothing() {
    let snapshot = r#"[
        {
            "titleId": "A",
            "chapters": [{"chapterId": "c-1", "chapterNumber": 1, "readAt": "2026-08-08T09:00:00Z"}]
        }
    ]"#;
    let store = MemoryHistoryApi::new(records(snapshot));
    store.fail_next_delete("history is locked by another session");

    let err = store.delete_history("A", None).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "History update rejected: history is locked by another session"
    );

    // The authoritative data is untouched; re-deriving shows the title.
    let mut view = HistoryView::new();
    view.set_records(&store.fetch_history().await.unwrap(), ts(NOW));
    assert_eq!(view.groups().len(), 1);
}

#[tokio::test]
async fn successful_delete_disappears_on_next_refetch() {
    let store = MemoryHistoryApi::new(records(
        r#"[
            {"titleId": "A", "chapters": [{"chapterId": "c-1", "chapterNumber": 1, "readAt": "2026-08-08T09:00:00Z"}]},
            {"titleId": "B", "chapters": [{"chapterId": "x-1", "chapterNumber": 5, "readAt": "2026-08-08T10:00:00Z"}]}
        ]"#,
    ));

    store.delete_history("A", None).await.unwrap();

    let mut view = HistoryView::new();
    view.set_records(&store.fetch_history().await.unwrap(), ts(NOW));
    let ids: Vec<&str> = view.groups().iter().map(|g| g.title_id.as_str()).collect();
    assert_eq!(ids, vec!["B"]);
}

proptest! {
    /// The same chapter id, however many times and in whatever shape it
    /// arrives, yields exactly one mark per title.
    #[test]
    fn dedup_by_chapter_id_holds(chapter_ids in proptest::collection::vec(0..5u32, 1..20)) {
        let json_records: Vec<String> = chapter_ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                // Alternate between bare and embedded id shapes.
                let chapter_ref = if i % 2 == 0 {
                    format!(r#""ch-{id}""#)
                } else {
                    format!(r#"{{"_id": "ch-{id}"}}"#)
                };
                format!(
                    r#"{{"titleId": "A", "chapters": [{{"chapterId": {chapter_ref}, "chapterNumber": {id}, "readAt": "2026-08-08T09:00:00Z"}}]}}"#
                )
            })
            .collect();
        let input = records(&format!("[{}]", json_records.join(",")));

        let groups = group_records(&input, ts(NOW));
        prop_assert_eq!(groups.len(), 1);

        let mut seen = std::collections::HashSet::new();
        for mark in &groups[0].chapters {
            prop_assert!(seen.insert(mark.id()), "duplicate chapter id {}", mark.id());
        }

        let distinct: std::collections::HashSet<u32> = chapter_ids.iter().copied().collect();
        prop_assert_eq!(groups[0].chapters.len(), distinct.len());
    }

    /// A title is visible exactly when its last read falls inside the
    /// trailing window.
    #[test]
    fn recency_window_holds(age_hours in 0i64..2000) {
        let now = ts(NOW);
        let read_at = now - Duration::hours(age_hours);
        let input = records(&format!(
            r#"[{{"titleId": "A", "readAt": "{}"}}]"#,
            read_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ));

        let groups = group_records(&input, now);
        let visible = age_hours <= 30 * 24;
        prop_assert_eq!(groups.len(), usize::from(visible));
    }
}
