//! Schedule assembly tests
//!
//! - One entry per session, unassigned sessions included
//! - Ordering: approved first, track name, start time
//! - Speakers nested per session
//! - Active schedule with no active event

mod helpers;

use codecamp_web::db::sessions::{create_session, NewSession};
use codecamp_web::db::speakers::{create_speaker, create_user, link_speaker_session};
use codecamp_web::schedule::{build_active_schedule, build_schedule};
use helpers::{at, test_pool, EventFixture};

#[tokio::test]
async fn test_one_entry_per_session_in_sort_order() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", true).await;
    let cloud = event.track("Cloud", "101").await;
    let alpha = event.track("Alpha", "100").await;
    let nine = event.timeslot(9).await;
    let ten = event.timeslot(10).await;

    let cloud_ten = event.scheduled_session("Cloud at ten", cloud, ten).await;
    let cloud_nine = event.scheduled_session("Cloud at nine", cloud, nine).await;
    let alpha_ten = event.scheduled_session("Alpha at ten", alpha, ten).await;
    let unassigned = event.session("Unassigned").await;

    let mut pending = NewSession::new(event.event_id, "Pending review");
    pending.is_approved = false;
    pending.track_id = Some(alpha);
    pending.timeslot_id = Some(nine);
    let pending = create_session(&db, &pending).await.unwrap();

    let schedule = build_schedule(&db, event.event_id).await.unwrap();
    let order: Vec<i64> = schedule.iter().map(|e| e.session_id).collect();
    assert_eq!(order, vec![unassigned, alpha_ten, cloud_nine, cloud_ten, pending]);

    let first = &schedule[0];
    assert_eq!(first.track_id, None);
    assert_eq!(first.track_name, "");
    assert_eq!(first.room_number, "");
    assert_eq!(first.timeslot_id, None);
    assert_eq!(first.start_time, None);
    assert_eq!(first.end_time, None);

    let cloud_entry = &schedule[2];
    assert_eq!(cloud_entry.track_name, "Cloud");
    assert_eq!(cloud_entry.room_number, "101");
    assert_eq!(cloud_entry.start_time, Some(at(9, 0)));
    assert_eq!(cloud_entry.end_time, Some(at(9, 50)));

    assert!(!schedule[4].is_approved);
}

#[tokio::test]
async fn test_timeslot_without_track_sorts_by_time() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", true).await;
    let nine = event.timeslot(9).await;

    let mut timed = NewSession::new(event.event_id, "Timed");
    timed.timeslot_id = Some(nine);
    let timed = create_session(&db, &timed).await.unwrap();
    let untimed = event.session("Untimed").await;

    let schedule = build_schedule(&db, event.event_id).await.unwrap();
    let order: Vec<i64> = schedule.iter().map(|e| e.session_id).collect();
    assert_eq!(order, vec![untimed, timed]);
}

#[tokio::test]
async fn test_speakers_nested_per_session() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", true).await;
    let talk = event.session("Talk").await;
    let panel = event.session("Panel").await;
    let quiet = event.session("Quiet").await;

    let ada = create_user(&db, "Ada", "Lovelace").await.unwrap();
    let ada = create_speaker(&db, &ada, Some("Analytical Engines")).await.unwrap();
    let alan = create_user(&db, "Alan", "Turing").await.unwrap();
    let alan = create_speaker(&db, &alan, None).await.unwrap();

    link_speaker_session(&db, ada, talk).await.unwrap();
    link_speaker_session(&db, ada, panel).await.unwrap();
    link_speaker_session(&db, alan, panel).await.unwrap();

    let schedule = build_schedule(&db, event.event_id).await.unwrap();
    assert_eq!(schedule.len(), 3, "speaker links must not duplicate entries");

    let entry = |id: i64| schedule.iter().find(|e| e.session_id == id).unwrap();

    let talk_speakers: Vec<&str> = entry(talk).speakers.iter().map(|s| s.last_name.as_str()).collect();
    assert_eq!(talk_speakers, vec!["Lovelace"]);
    assert_eq!(
        entry(talk).speakers[0].company_name.as_deref(),
        Some("Analytical Engines")
    );

    let panel_speakers: Vec<&str> = entry(panel).speakers.iter().map(|s| s.last_name.as_str()).collect();
    assert_eq!(panel_speakers, vec!["Lovelace", "Turing"]);

    assert!(entry(quiet).speakers.is_empty());
}

#[tokio::test]
async fn test_skill_level_description() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2024", true).await;

    let mut advanced = NewSession::new(event.event_id, "Deep dive");
    advanced.skill_level = 3;
    create_session(&db, &advanced).await.unwrap();
    let mut odd = NewSession::new(event.event_id, "Odd");
    odd.skill_level = 42;
    create_session(&db, &odd).await.unwrap();

    let schedule = build_schedule(&db, event.event_id).await.unwrap();
    let levels: Vec<(i64, &str)> = schedule
        .iter()
        .map(|e| (e.skill_level_id, e.skill_level))
        .collect();
    assert_eq!(levels, vec![(3, "Advanced"), (42, "Unknown")]);
}

#[tokio::test]
async fn test_schedule_scoped_to_event() {
    let db = test_pool().await;
    let current = EventFixture::new(&db, "Codecamp 2024", true).await;
    let past = EventFixture::new(&db, "Codecamp 2023", false).await;
    let mine = current.session("Mine").await;
    past.session("Old").await;

    let schedule = build_active_schedule(&db).await.unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].session_id, mine);
}

#[tokio::test]
async fn test_active_schedule_empty_without_active_event() {
    let db = test_pool().await;
    let event = EventFixture::new(&db, "Codecamp 2023", false).await;
    event.session("Orphan").await;

    assert!(build_active_schedule(&db).await.unwrap().is_empty());
}
