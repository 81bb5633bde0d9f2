//! End-to-end flows over the in-memory repository: mutations, derived
//! stats, trend buckets, and identity partitioning.

use std::sync::Arc;

use services::{AuthService, IdentityProvider, SyllabusService};
use storage::repository::InMemoryRepository;
use syllabus_core::model::{IconKey, PartitionKey, SubjectId, TopicStatus};
use syllabus_core::time::fixed_clock;
use syllabus_core::trend::TrendPeriod;

async fn guest_service(repo: &InMemoryRepository) -> SyllabusService {
    SyllabusService::load(fixed_clock(), Arc::new(repo.clone()), None).await
}

#[tokio::test]
async fn completing_one_topic_reaches_full_completion() {
    let repo = InMemoryRepository::new();
    let mut service = guest_service(&repo).await;

    let subject_id = service
        .add_subject("Computer Knowledge", IconKey::new("BrainIcon"))
        .await
        .unwrap();
    let topic_id = service
        .add_topic(subject_id, "Networking Basics")
        .await
        .unwrap()
        .unwrap();

    // only this subject counts: clear the starter subjects' influence by
    // checking the subject-level percentage as well
    service
        .update_topic_status(subject_id, topic_id, TopicStatus::Completed)
        .await;

    let subject = service
        .subjects()
        .iter()
        .find(|subject| subject.id() == subject_id)
        .unwrap();
    assert_eq!(subject.completion_percent(), 100);
    assert_eq!(subject.topics()[0].status(), TopicStatus::Completed);
    assert_eq!(service.history().count_on(fixed_clock().today()), 1);
}

#[tokio::test]
async fn complete_then_revert_same_day_removes_the_log_entry() {
    let repo = InMemoryRepository::new();
    let mut service = guest_service(&repo).await;

    let subject_id = service.subjects()[0].id();
    let topic_id = service.subjects()[0].topics()[0].id();

    service
        .update_topic_status(subject_id, topic_id, TopicStatus::Completed)
        .await;
    service
        .update_topic_status(subject_id, topic_id, TopicStatus::NotStarted)
        .await;

    assert!(service.history().is_empty());
    assert_eq!(service.stats().overall_completion, 0);
}

#[tokio::test]
async fn deleting_a_completed_topic_changes_stats_but_not_history() {
    let repo = InMemoryRepository::new();
    let mut service = guest_service(&repo).await;

    let subject_id = service
        .add_subject("Two Topics", IconKey::new("BookOpenIcon"))
        .await
        .unwrap();
    let done = service.add_topic(subject_id, "Done").await.unwrap().unwrap();
    let pending = service
        .add_topic(subject_id, "Pending")
        .await
        .unwrap()
        .unwrap();
    service
        .update_topic_status(subject_id, done, TopicStatus::Completed)
        .await;

    let before = service.stats();
    let history_before: Vec<_> = service.history().entries().collect();

    assert!(service.delete_topic(subject_id, done).await);

    let after = service.stats();
    assert_eq!(after.total_topics, before.total_topics - 1);
    assert_eq!(after.completed_topics, before.completed_topics - 1);
    let history_after: Vec<_> = service.history().entries().collect();
    assert_eq!(history_after, history_before);

    // the remaining topic is untouched
    let subject = service
        .subjects()
        .iter()
        .find(|subject| subject.id() == subject_id)
        .unwrap();
    assert_eq!(subject.topics().len(), 1);
    assert_eq!(subject.topics()[0].id(), pending);
}

#[tokio::test]
async fn stats_consistency_holds_across_arbitrary_transitions() {
    let repo = InMemoryRepository::new();
    let mut service = guest_service(&repo).await;

    let subject_id = service.subjects()[0].id();
    let topics: Vec<_> = service.subjects()[0]
        .topics()
        .iter()
        .map(|topic| topic.id())
        .collect();

    let cycle = [
        TopicStatus::InProgress,
        TopicStatus::Completed,
        TopicStatus::NotStarted,
        TopicStatus::Completed,
    ];
    for (index, topic_id) in topics.iter().enumerate() {
        service
            .update_topic_status(subject_id, *topic_id, cycle[index % cycle.len()])
            .await;
    }

    let stats = service.stats();
    assert_eq!(
        stats.completed_topics + stats.in_progress_topics + stats.not_started_topics,
        stats.total_topics
    );
}

#[tokio::test]
async fn mutations_under_one_identity_stay_invisible_to_others() {
    let repo = InMemoryRepository::new();
    let auth = AuthService::new(Arc::new(repo.clone()));
    let user_a = auth.sign_up("A", "a@example.com", "pw-a").await.unwrap();
    let user_b = auth.sign_up("B", "b@example.com", "pw-b").await.unwrap();

    let mut service =
        SyllabusService::load(fixed_clock(), Arc::new(repo.clone()), Some(&user_a)).await;
    let subject_id = service.subjects()[0].id();
    let topic_id = service.subjects()[0].topics()[0].id();
    service
        .update_topic_status(subject_id, topic_id, TopicStatus::Completed)
        .await;
    service
        .add_subject("Only For A", IconKey::new("CalculatorIcon"))
        .await
        .unwrap();

    service.switch_identity(Some(&user_b)).await;
    assert_eq!(service.partition(), &PartitionKey::for_identity(&user_b));
    assert_eq!(service.stats().completed_topics, 0);
    assert!(
        service
            .subjects()
            .iter()
            .all(|subject| subject.name() != "Only For A")
    );

    service.switch_identity(None).await;
    assert_eq!(service.stats().completed_topics, 0);

    // A's progress is still there when A comes back
    service.switch_identity(Some(&user_a)).await;
    assert_eq!(service.stats().completed_topics, 1);
    assert!(
        service
            .subjects()
            .iter()
            .any(|subject| subject.name() == "Only For A")
    );
}

#[tokio::test]
async fn trend_buckets_are_complete_for_every_period() {
    let repo = InMemoryRepository::new();
    let mut service = guest_service(&repo).await;

    // empty log
    assert_eq!(service.trend(TrendPeriod::Daily).len(), 7);
    assert_eq!(service.trend(TrendPeriod::Weekly).len(), 4);
    assert_eq!(service.trend(TrendPeriod::Monthly).len(), 6);

    let subject_id = service.subjects()[0].id();
    let topic_id = service.subjects()[0].topics()[0].id();
    service
        .update_topic_status(subject_id, topic_id, TopicStatus::Completed)
        .await;

    // still exactly the fixed bucket counts, with today's completion in
    // the newest bucket of each period
    for (period, expected) in [
        (TrendPeriod::Daily, 7),
        (TrendPeriod::Weekly, 4),
        (TrendPeriod::Monthly, 6),
    ] {
        let buckets = service.trend(period);
        assert_eq!(buckets.len(), expected);
        assert_eq!(buckets.last().unwrap().count, 1);
    }
}

#[tokio::test]
async fn unknown_subject_gains_nothing_and_raises_nothing() {
    let repo = InMemoryRepository::new();
    let mut service = guest_service(&repo).await;
    let topic_count: usize = service
        .subjects()
        .iter()
        .map(|subject| subject.topics().len())
        .sum();

    let result = service
        .add_topic(SubjectId::new_random(), "Nowhere To Go")
        .await
        .unwrap();
    assert!(result.is_none());

    let after: usize = service
        .subjects()
        .iter()
        .map(|subject| subject.topics().len())
        .sum();
    assert_eq!(after, topic_count);
}
