// Copyright 2025 Cowboy AI, LLC.

//! Integration tests for trust events and their aggregation

use profile_manager::profile::{RelationshipType, SocialNetworkRelationship};
use profile_manager::{
    DomainError, FixedClock, ProfileManager, ProfileManagerConfig, SequentialIdGenerator,
    TrustAggregator, TrustEvent, TrustQuery, UserProfile, ValidationContext,
};
use std::sync::Arc;
use test_case::test_case;

const NOW: i64 = 1_700_000_000;

async fn manager_with_users() -> (ProfileManager, String, String) {
    let ctx = ValidationContext::new(
        Arc::new(SequentialIdGenerator::new("user")),
        Arc::new(FixedClock::at(NOW)),
    );
    let manager = ProfileManager::in_memory(ctx, ProfileManagerConfig::default()).unwrap();
    let target = manager
        .create_profile(UserProfile::default())
        .await
        .unwrap()
        .id
        .unwrap();
    let source = manager
        .create_profile(UserProfile {
            relationships: Some(vec![SocialNetworkRelationship::new(
                target.clone(),
                RelationshipType::Colleague,
            )]),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
        .unwrap();
    (manager, source, target)
}

async fn rate(manager: &ProfileManager, source: &str, target: &str, ratings: &[f64]) {
    for (index, rating) in ratings.iter().enumerate() {
        manager
            .add_trust_event(TrustEvent {
                app_id: Some(if index % 2 == 0 { "app1" } else { "app2" }.into()),
                ..TrustEvent::rating(source, target, *rating)
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_add_event_sets_report_time() {
    let (manager, source, target) = manager_with_users().await;
    let stored = manager
        .add_trust_event(TrustEvent {
            relationship: Some(RelationshipType::Colleague),
            ..TrustEvent::rating(source.as_str(), target.as_str(), 0.8)
        })
        .await
        .unwrap();
    assert_eq!(stored.report_time, NOW);
}

#[test_case(None, 1.5, "rating" ; "rating out of range")]
#[test_case(None, -0.1, "rating" ; "negative rating")]
#[test_case(Some(RelationshipType::Family), 0.5, "relationship" ; "relationship not held")]
#[tokio::test]
async fn test_invalid_events(relationship: Option<RelationshipType>, rating: f64, field: &str) {
    let (manager, source, target) = manager_with_users().await;
    let error = manager
        .add_trust_event(TrustEvent {
            relationship,
            ..TrustEvent::rating(source.as_str(), target.as_str(), rating)
        })
        .await
        .unwrap_err();
    assert_eq!(error.code(), Some(format!("event.{field}").as_str()));
}

#[tokio::test]
async fn test_event_users_must_exist() {
    let (manager, source, _) = manager_with_users().await;
    let error = manager
        .add_trust_event(TrustEvent::rating("undefined", source.as_str(), 0.5))
        .await
        .unwrap_err();
    assert_eq!(error.code(), Some("event.sourceId"));
    let error = manager
        .add_trust_event(TrustEvent::rating(source.as_str(), "undefined", 0.5))
        .await
        .unwrap_err();
    assert_eq!(error.code(), Some("event.targetId"));
    let error = manager
        .add_trust_event(TrustEvent::rating(source.as_str(), source.as_str(), 0.5))
        .await
        .unwrap_err();
    assert_eq!(error.code(), Some("event.targetId"));
}

#[test_case(TrustAggregator::Maximum, 0.9 ; "maximum")]
#[test_case(TrustAggregator::Minimum, 0.1 ; "minimum")]
#[test_case(TrustAggregator::Median, 0.3 ; "median")]
#[tokio::test]
async fn test_calculate_trust(aggregator: TrustAggregator, expected: f64) {
    let (manager, source, target) = manager_with_users().await;
    rate(&manager, &source, &target, &[0.1, 0.9, 0.3, 0.5]).await;
    let trust = manager
        .calculate_trust(&source, &target, TrustQuery::default(), Some(aggregator))
        .await
        .unwrap();
    assert_eq!(trust.value, expected);
    assert_eq!(trust.calculated_time, NOW);
}

#[tokio::test]
async fn test_calculate_trust_filters_events() {
    let (manager, source, target) = manager_with_users().await;
    rate(&manager, &source, &target, &[0.2, 1.0, 0.4]).await;
    let only_app1 = TrustQuery::default().with_app("app1");
    let trust = manager
        .calculate_trust(&source, &target, only_app1, Some(TrustAggregator::Average))
        .await
        .unwrap();
    assert!((trust.value - 0.3).abs() < 1e-9);

    let any_app = TrustQuery::default().with_app("/^app[0-9]$/");
    let trust = manager
        .calculate_trust(&source, &target, any_app, Some(TrustAggregator::Maximum))
        .await
        .unwrap();
    assert_eq!(trust.value, 1.0);
}

#[tokio::test]
async fn test_default_aggregator_is_recency_based() {
    let (manager, source, target) = manager_with_users().await;
    rate(&manager, &source, &target, &[0.5; 7]).await;
    let trust = manager
        .calculate_trust(&source, &target, TrustQuery::default(), None)
        .await
        .unwrap();
    assert_eq!(trust.value, 0.5);
}

#[tokio::test]
async fn test_no_events() {
    let (manager, source, target) = manager_with_users().await;
    let error = manager
        .calculate_trust(&source, &target, TrustQuery::default(), None)
        .await
        .unwrap_err();
    assert_eq!(error, DomainError::NoMatchingEvents);

    // the direction of the trust matters
    rate(&manager, &source, &target, &[0.5]).await;
    let error = manager
        .calculate_trust(&target, &source, TrustQuery::default(), None)
        .await
        .unwrap_err();
    assert_eq!(error, DomainError::NoMatchingEvents);
}

#[tokio::test]
async fn test_invalid_pattern_is_a_validation_error() {
    let (manager, source, target) = manager_with_users().await;
    let error = manager
        .calculate_trust(
            &source,
            &target,
            TrustQuery::default().with_task("/[/"),
            None,
        )
        .await
        .unwrap_err();
    assert!(error.is_validation_error());
}

#[tokio::test]
async fn test_user_ids_are_not_patterns() {
    let (manager, source, target) = manager_with_users().await;
    rate(&manager, &source, &target, &[0.5]).await;
    let error = manager
        .calculate_trust("/.*/", &target, TrustQuery::default(), None)
        .await
        .unwrap_err();
    assert_eq!(error, DomainError::NoMatchingEvents);
    let error = manager
        .calculate_trust(&source, "/^user/", TrustQuery::default(), None)
        .await
        .unwrap_err();
    assert_eq!(error, DomainError::NoMatchingEvents);
}
