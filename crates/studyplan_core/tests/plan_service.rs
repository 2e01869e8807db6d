use studyplan_core::db::open_db_in_memory;
use studyplan_core::{
    FixedClock, KeyValueStorage, MemoryStorage, NodeKind, PlanInput, PlanService,
    PlanServiceError, PlanStore, PlanValidationError, SqliteStorage, StorageError, PLANS_KEY,
};

// 2030-01-01T00:00:00Z
const NOW_MS: i64 = 1_893_456_000_000;

fn input(name: &str, topics: &str, sub_topics: &str) -> PlanInput {
    PlanInput {
        exam_name: name.to_string(),
        exam_date: "2030-01-11".to_string(),
        study_topics: topics.to_string(),
        sub_topics: sub_topics.to_string(),
        topic_hours: Some("2".to_string()),
        ..PlanInput::default()
    }
}

#[test]
fn submit_persists_plan_and_returns_flowchart() {
    let conn = open_db_in_memory().unwrap();
    let service = PlanService::new(
        PlanStore::new(SqliteStorage::new(&conn)),
        FixedClock::at_millis(NOW_MS),
    );

    let submitted = service.submit(&input("Math", "Algebra, Geometry", "")).unwrap();
    assert_eq!(submitted.plan.id, NOW_MS);
    assert_eq!(
        submitted.flowchart.kinds(),
        vec![
            NodeKind::Start,
            NodeKind::Exam,
            NodeKind::Topic,
            NodeKind::Topic,
            NodeKind::End
        ]
    );
    assert_eq!(service.list(), vec![submitted.plan]);
}

#[test]
fn rejected_submission_does_not_touch_storage() {
    let storage = MemoryStorage::new();
    let service = PlanService::new(PlanStore::new(&storage), FixedClock::at_millis(NOW_MS));

    let err = service.submit(&input("Math", " , ", "x")).unwrap_err();
    assert!(matches!(
        err,
        PlanServiceError::Validation(PlanValidationError::NoStudyTopics)
    ));
    assert_eq!(storage.get_item(PLANS_KEY).unwrap(), None);
}

#[test]
fn submission_without_exam_name_or_date_does_not_touch_storage() {
    let storage = MemoryStorage::new();
    let service = PlanService::new(PlanStore::new(&storage), FixedClock::at_millis(NOW_MS));

    let err = service.submit(&input("   ", "Algebra", "")).unwrap_err();
    assert!(matches!(
        err,
        PlanServiceError::Validation(PlanValidationError::EmptyExamName)
    ));
    assert_eq!(storage.get_item(PLANS_KEY).unwrap(), None);

    let no_date = PlanInput {
        exam_date: String::new(),
        ..input("Math", "Algebra", "")
    };
    let err = service.submit(&no_date).unwrap_err();
    assert!(matches!(
        err,
        PlanServiceError::Validation(PlanValidationError::EmptyExamDate)
    ));
    assert_eq!(storage.get_item(PLANS_KEY).unwrap(), None);
    assert!(service.list().is_empty());
}

#[test]
fn second_submission_in_same_clock_tick_is_rejected() {
    let storage = MemoryStorage::new();
    let service = PlanService::new(PlanStore::new(&storage), FixedClock::at_millis(NOW_MS));

    service.submit(&input("Math", "Algebra", "")).unwrap();
    let err = service.submit(&input("Art", "Color", "")).unwrap_err();

    assert!(matches!(
        err,
        PlanServiceError::Storage(StorageError::DuplicateId(NOW_MS))
    ));
    assert_eq!(service.list().len(), 1);
}

#[test]
fn list_summaries_are_newest_first() {
    let storage = MemoryStorage::new();
    PlanService::new(PlanStore::new(&storage), FixedClock::at_millis(NOW_MS))
        .submit(&input("Older", "A", ""))
        .unwrap();
    let service = PlanService::new(
        PlanStore::new(&storage),
        FixedClock::at_millis(NOW_MS + 1_000),
    );
    service.submit(&input("Newer", "B, C", "")).unwrap();

    let summaries = service.list_summaries();
    let names: Vec<&str> = summaries
        .iter()
        .map(|summary| summary.exam_name.as_str())
        .collect();
    assert_eq!(names, vec!["Newer", "Older"]);
    assert_eq!(summaries[0].topics_label, "B, C");
    assert_eq!(summaries[0].remaining_days, 10);
    assert_eq!(summaries[0].topic_time_label, "2h");
}

#[test]
fn view_rebuilds_flowchart_for_stored_plan() {
    let storage = MemoryStorage::new();
    let service = PlanService::new(PlanStore::new(&storage), FixedClock::at_millis(NOW_MS));
    let submitted = service.submit(&input("Math", "Algebra", "Sets")).unwrap();

    let flowchart = service.view(submitted.plan.id).unwrap();
    assert_eq!(flowchart, submitted.flowchart);
    assert_eq!(
        flowchart.kinds(),
        vec![
            NodeKind::Start,
            NodeKind::Exam,
            NodeKind::Topic,
            NodeKind::Subtopic,
            NodeKind::End
        ]
    );
    assert!(service.view(12345).is_none());
}

#[test]
fn delete_removes_plan_and_ignores_unknown_ids() {
    let storage = MemoryStorage::new();
    let service = PlanService::new(PlanStore::new(&storage), FixedClock::at_millis(NOW_MS));
    let submitted = service.submit(&input("Math", "Algebra", "")).unwrap();

    assert_eq!(service.delete(1).unwrap(), vec![submitted.plan.clone()]);
    assert!(service.delete(submitted.plan.id).unwrap().is_empty());
    assert!(service.list().is_empty());
}

#[test]
fn storage_failure_is_reported_as_service_error() {
    let storage = MemoryStorage::new().with_quota(10);
    let service = PlanService::new(PlanStore::new(&storage), FixedClock::at_millis(NOW_MS));

    let err = service.submit(&input("Math", "Algebra", "")).unwrap_err();
    assert!(matches!(
        err,
        PlanServiceError::Storage(StorageError::QuotaExceeded { .. })
    ));
    assert!(err.to_string().contains("plan not saved"));
}
