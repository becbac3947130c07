//! Tests for the activity scanner.

mod test_utils;

use chrono::TimeDelta;
use test_utils::*;
use vasari_discord::{
    ActivityScanner, Channel, ChannelKind, MAX_FETCH, Message, Snowflake, since_cursor,
};

#[tokio::test]
async fn test_forum_thread_counts_only_messages_after_boundary() {
    let directory = single_guild();
    let directory = with_burst(directory, IDEAS_THREAD, -120, 2);
    let directory = with_burst(directory, IDEAS_THREAD, 60, 3);

    let report = ActivityScanner::new(&directory).scan(&guild(), since()).await;

    assert_eq!(report.total(), 1);
    let record = &report.records[0];
    assert_eq!(record.id.get(), IDEAS_THREAD);
    assert_eq!(record.message_count, 3);
    assert_eq!(record.name, "[Forum: ideas] Better search");
    assert_eq!(record.kind, ChannelKind::Thread);
    assert_eq!(record.oldest_new_message_at, since() + TimeDelta::seconds(60));
    assert_eq!(record.last_message_at, since() + TimeDelta::seconds(62));
}

#[tokio::test]
async fn test_records_are_ranked_by_count() {
    let directory = with_burst(single_guild(), GENERAL, 10, 5);
    let directory = with_burst(directory, RANDOM, 10, 10);

    let report = ActivityScanner::new(&directory).scan(&guild(), since()).await;

    let counts: Vec<usize> = report.records.iter().map(|r| r.message_count).collect();
    assert_eq!(counts, vec![10, 5]);
    assert_eq!(report.records[0].id.get(), RANDOM);
}

#[tokio::test]
async fn test_ties_keep_channel_order() {
    let directory = with_burst(single_guild(), ANNOUNCEMENTS, 10, 4);
    let directory = with_burst(directory, GENERAL, 10, 4);
    let directory = with_burst(directory, RANDOM, 10, 4);

    for concurrency in [1, 2, 8] {
        let report = ActivityScanner::new(&directory)
            .with_concurrency(concurrency)
            .scan(&guild(), since())
            .await;
        let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["general", "random", "announcements"]);
    }
}

#[tokio::test]
async fn test_permission_failure_skips_only_that_channel() {
    let directory = with_burst(single_guild(), GENERAL, 10, 2);
    let directory = with_burst(directory, RANDOM, 10, 3);
    let directory = with_burst(directory, ANNOUNCEMENTS, 10, 4).with_failing_channel(RANDOM);

    let report = ActivityScanner::new(&directory).scan(&guild(), since()).await;

    assert_eq!(report.skipped, 1);
    let ids: Vec<u64> = report.records.iter().map(|r| r.id.get()).collect();
    assert_eq!(ids, vec![ANNOUNCEMENTS, GENERAL]);
}

#[tokio::test]
async fn test_boundary_instant_is_inclusive() {
    let at = message_at(GENERAL, 0, 0, "exactly at since");
    let just_before = Message::new(
        Snowflake::from_parts(since() - TimeDelta::milliseconds(1), 7),
        GENERAL,
        "bob",
        "one millisecond early",
    );
    let directory = single_guild().with_message(just_before).with_message(at);

    let report = ActivityScanner::new(&directory).scan(&guild(), since()).await;

    assert_eq!(report.total(), 1);
    assert_eq!(report.records[0].message_count, 1);
    assert_eq!(report.records[0].last_message_at, since());
}

#[tokio::test]
async fn test_cursor_round_trip_selects_exactly_the_new_messages() {
    let offsets: Vec<i64> = vec![-3600, -60, -1, 0, 1, 59, 3600];
    let directory = offsets
        .iter()
        .enumerate()
        .fold(single_guild(), |d, (i, offset)| {
            d.with_message(message_at(GENERAL, *offset, i as u64, "m"))
        });

    let cursor = since_cursor(since());
    let after_cursor: Vec<_> = directory
        .messages_in(GENERAL)
        .into_iter()
        .filter(|m| m.id > cursor)
        .collect();
    assert_eq!(after_cursor.len(), 4);
    assert!(after_cursor.iter().all(|m| m.created_at >= since()));

    let report = ActivityScanner::new(&directory).scan(&guild(), since()).await;
    assert_eq!(report.records[0].message_count, 4);
}

#[tokio::test]
async fn test_counts_are_capped_per_channel() {
    let directory = with_burst(single_guild(), GENERAL, 1, 150);
    let report = ActivityScanner::new(&directory).scan(&guild(), since()).await;
    assert_eq!(report.records[0].message_count, usize::from(MAX_FETCH));
}

#[tokio::test]
async fn test_quiet_and_non_text_channels_are_left_out() {
    let directory = single_guild()
        .with_channel(Channel::new(14u64, GUILD, "stage", ChannelKind::Voice))
        .with_message(message_at(VOICE, 30, 0, "voice chat text"))
        .with_message(message_at(GENERAL, -30, 0, "old news"));

    let report = ActivityScanner::new(&directory).scan(&guild(), since()).await;

    assert_eq!(report.total(), 0);
    assert_eq!(report.skipped, 0);
}

#[tokio::test]
async fn test_record_serializes_with_type_label() {
    let directory = with_burst(single_guild(), ANNOUNCEMENTS, 5, 1);
    let report = ActivityScanner::new(&directory).scan(&guild(), since()).await;

    let json = serde_json::to_value(&report.records[0]).unwrap();
    assert_eq!(json["type"], "news");
    assert_eq!(json["id"], "12");
    assert_eq!(json["messageCount"], 1);
    assert_eq!(json["lastMessageAt"], "2024-06-01T12:00:05.000Z");
    assert_eq!(json["oldestNewMessageAt"], "2024-06-01T12:00:05.000Z");
}
