//! Request lifecycle: create, respond, cancel, expire and stats.

mod common;

use chrono::{Duration, Utc};
use roomie_core::common::{ErrorKind, RoomId};
use roomie_core::domains::requests::{
    self, RequestDetails, RequestStatus, RequestType, ResponseDecision, REQUEST_TTL_DAYS,
    ROOM_RESERVED_MESSAGE,
};
use roomie_core::domains::rooms::RoomStatus;
use test_context::test_context;

use crate::common::{admin, owner, seed_request, seed_room, seeker, TestHarness};

// ============================================================================
// create
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn create_sets_pending_and_seven_day_expiry(ctx: &mut TestHarness) {
    let (landlord, applicant) = (owner(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;

    let details = RequestDetails::builder()
        .request_type(RequestType::Visit)
        .stay_months(6)
        .message("Could I see it on Saturday?".to_string())
        .build();
    let request = requests::create_request(applicant.member_id, room_id, details, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.request_type, RequestType::Visit);
    assert_eq!(request.stay_months, Some(6));
    assert_eq!(request.expires_at - request.created_at, Duration::days(REQUEST_TTL_DAYS));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_for_missing_room_is_not_found(ctx: &mut TestHarness) {
    let err = requests::create_request(
        seeker().member_id,
        RoomId::new(),
        RequestDetails::default(),
        &ctx.deps,
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn duplicate_pending_request_conflicts(ctx: &mut TestHarness) {
    let (landlord, applicant) = (owner(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    seed_request(&ctx.deps, &applicant, room_id).await;

    let err = requests::create_request(
        applicant.member_id,
        room_id,
        RequestDetails::default(),
        &ctx.deps,
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn new_request_after_cancel_is_allowed(ctx: &mut TestHarness) {
    let (landlord, applicant) = (owner(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let first = seed_request(&ctx.deps, &applicant, room_id).await;
    requests::cancel_request(first, &applicant, &ctx.deps).await.unwrap();

    let second = requests::create_request(
        applicant.member_id,
        room_id,
        RequestDetails::default(),
        &ctx.deps,
    )
    .await
    .unwrap();

    assert_ne!(first, second.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn request_for_reserved_room_is_invalid_state(ctx: &mut TestHarness) {
    let (landlord, first, late) = (owner(), seeker(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let request_id = seed_request(&ctx.deps, &first, room_id).await;
    requests::respond_to_request(request_id, &landlord, ResponseDecision::Accept, None, &ctx.deps)
        .await
        .unwrap();

    let err = requests::create_request(late.member_id, room_id, RequestDetails::default(), &ctx.deps)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

// ============================================================================
// respond
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn reject_records_message_and_leaves_room_available(ctx: &mut TestHarness) {
    let (landlord, applicant) = (owner(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let request_id = seed_request(&ctx.deps, &applicant, room_id).await;

    let request = requests::respond_to_request(
        request_id,
        &landlord,
        ResponseDecision::Reject,
        Some("Looking for a longer stay".to_string()),
        &ctx.deps,
    )
    .await
    .unwrap();

    assert_eq!(request.status, RequestStatus::Rejected);
    assert_eq!(request.response_message.as_deref(), Some("Looking for a longer stay"));
    assert!(request.responded_at.is_some());

    let tables = ctx.store.snapshot().await;
    assert_eq!(tables.rooms[&room_id].status, RoomStatus::Available);
    assert!(tables.matches.is_empty());
    assert!(tables.conversations.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn only_room_owner_may_respond(ctx: &mut TestHarness) {
    let (landlord, applicant, stranger) = (owner(), seeker(), owner());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let request_id = seed_request(&ctx.deps, &applicant, room_id).await;

    for actor in [applicant, stranger, admin()] {
        let err = requests::respond_to_request(
            request_id,
            &actor,
            ResponseDecision::Accept,
            None,
            &ctx.deps,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    let tables = ctx.store.snapshot().await;
    assert_eq!(tables.requests[&request_id].status, RequestStatus::Pending);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn responding_twice_is_invalid_state(ctx: &mut TestHarness) {
    let (landlord, applicant) = (owner(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let request_id = seed_request(&ctx.deps, &applicant, room_id).await;

    requests::respond_to_request(request_id, &landlord, ResponseDecision::Reject, None, &ctx.deps)
        .await
        .unwrap();
    let err =
        requests::respond_to_request(request_id, &landlord, ResponseDecision::Accept, None, &ctx.deps)
            .await
            .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn responding_to_missing_request_is_not_found(ctx: &mut TestHarness) {
    let err = requests::respond_to_request(
        roomie_core::common::RoomRequestId::new(),
        &owner(),
        ResponseDecision::Accept,
        None,
        &ctx.deps,
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn accept_rejects_rivals_with_system_message(ctx: &mut TestHarness) {
    let (landlord, s1, s2, s3) = (owner(), seeker(), seeker(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let chosen = seed_request(&ctx.deps, &s1, room_id).await;
    let rival_a = seed_request(&ctx.deps, &s2, room_id).await;
    let rival_b = seed_request(&ctx.deps, &s3, room_id).await;

    let accepted =
        requests::respond_to_request(chosen, &landlord, ResponseDecision::Accept, None, &ctx.deps)
            .await
            .unwrap();
    assert_eq!(accepted.status, RequestStatus::Accepted);

    let tables = ctx.store.snapshot().await;
    for rival in [rival_a, rival_b] {
        let request = &tables.requests[&rival];
        assert_eq!(request.status, RequestStatus::Rejected);
        assert_eq!(request.response_message.as_deref(), Some(ROOM_RESERVED_MESSAGE));
    }
}

// ============================================================================
// cancel
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn requester_cancels_pending_request(ctx: &mut TestHarness) {
    let (landlord, applicant) = (owner(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let request_id = seed_request(&ctx.deps, &applicant, room_id).await;

    let request = requests::cancel_request(request_id, &applicant, &ctx.deps).await.unwrap();

    assert_eq!(request.status, RequestStatus::Cancelled);
    assert!(request.responded_at.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn owner_cannot_cancel_for_requester(ctx: &mut TestHarness) {
    let (landlord, applicant) = (owner(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let request_id = seed_request(&ctx.deps, &applicant, room_id).await;

    let err = requests::cancel_request(request_id, &landlord, &ctx.deps).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn cancelling_an_accepted_request_is_invalid_state(ctx: &mut TestHarness) {
    let (landlord, applicant) = (owner(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let request_id = seed_request(&ctx.deps, &applicant, room_id).await;
    requests::respond_to_request(request_id, &landlord, ResponseDecision::Accept, None, &ctx.deps)
        .await
        .unwrap();

    let err = requests::cancel_request(request_id, &applicant, &ctx.deps).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

// ============================================================================
// get / expire / stats
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn get_request_is_limited_to_parties_and_admins(ctx: &mut TestHarness) {
    let (landlord, applicant) = (owner(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let request_id = seed_request(&ctx.deps, &applicant, room_id).await;

    for actor in [landlord, applicant, admin()] {
        assert!(requests::get_request(request_id, &actor, &ctx.deps).await.is_ok());
    }

    let err = requests::get_request(request_id, &seeker(), &ctx.deps).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn expiry_only_touches_overdue_pending_requests(ctx: &mut TestHarness) {
    let (landlord, a, b) = (owner(), seeker(), seeker());
    let room_id = seed_room(&ctx.store, &landlord).await;
    let stale = seed_request(&ctx.deps, &a, room_id).await;
    let answered = seed_request(&ctx.deps, &b, room_id).await;
    requests::respond_to_request(answered, &landlord, ResponseDecision::Reject, None, &ctx.deps)
        .await
        .unwrap();

    // Nothing is overdue yet.
    assert_eq!(requests::expire_overdue_requests(&ctx.deps, Utc::now()).await.unwrap(), 0);

    let later = Utc::now() + Duration::days(REQUEST_TTL_DAYS) + Duration::minutes(1);
    assert_eq!(requests::expire_overdue_requests(&ctx.deps, later).await.unwrap(), 1);

    let tables = ctx.store.snapshot().await;
    assert_eq!(tables.requests[&stale].status, RequestStatus::Expired);
    assert_eq!(tables.requests[&answered].status, RequestStatus::Rejected);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn stats_are_scoped_by_role(ctx: &mut TestHarness) {
    let (landlord, other_landlord, a, b) = (owner(), owner(), seeker(), seeker());
    let room = seed_room(&ctx.store, &landlord).await;
    let other_room = seed_room(&ctx.store, &other_landlord).await;

    let accepted = seed_request(&ctx.deps, &a, room).await;
    seed_request(&ctx.deps, &b, room).await;
    let cancelled = seed_request(&ctx.deps, &a, other_room).await;
    requests::cancel_request(cancelled, &a, &ctx.deps).await.unwrap();
    requests::respond_to_request(accepted, &landlord, ResponseDecision::Accept, None, &ctx.deps)
        .await
        .unwrap();

    let owner_stats = requests::request_stats(&landlord, &ctx.deps).await.unwrap();
    assert_eq!(owner_stats.total, 2);
    assert_eq!(owner_stats.accepted, 1);
    assert_eq!(owner_stats.rejected, 1);

    let seeker_stats = requests::request_stats(&a, &ctx.deps).await.unwrap();
    assert_eq!(seeker_stats.total, 2);
    assert_eq!(seeker_stats.accepted, 1);
    assert_eq!(seeker_stats.cancelled, 1);

    let admin_stats = requests::request_stats(&admin(), &ctx.deps).await.unwrap();
    assert_eq!(admin_stats.total, 3);
    assert_eq!(admin_stats.pending, 0);
}
