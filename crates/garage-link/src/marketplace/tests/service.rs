use super::common::*;
use crate::marketplace::domain::{ServiceRequestStatus, ServiceType, UserId, VehicleId};
use crate::marketplace::lifecycle::MechanicAction;
use crate::marketplace::plans::{PlanTier, Quota};
use crate::marketplace::repository::ServiceRequestRepository;
use crate::marketplace::service::MarketplaceError;

#[test]
fn free_tier_blocks_the_second_vehicle() {
    let (service, _, _) = build_service();

    service
        .register_vehicle(&client(), PlanTier::Free, vehicle_spec())
        .expect("first vehicle fits the free tier");

    match service.register_vehicle(&client(), PlanTier::Free, vehicle_spec()) {
        Err(MarketplaceError::VehicleLimitReached { tier, limit }) => {
            assert_eq!(tier, PlanTier::Free);
            assert_eq!(limit, Quota::Limited(1));
        }
        other => panic!("expected vehicle limit error, got {other:?}"),
    }
}

#[test]
fn removing_a_vehicle_frees_the_slot() {
    let (service, _, _) = build_service();

    let vehicle = service
        .register_vehicle(&client(), PlanTier::Free, vehicle_spec())
        .expect("first vehicle");
    service
        .remove_vehicle(&client(), &vehicle.id)
        .expect("owner can remove");

    service
        .register_vehicle(&client(), PlanTier::Free, vehicle_spec())
        .expect("slot is free again");
}

#[test]
fn removal_is_owner_scoped() {
    let (service, _, _) = build_service();
    let vehicle = service
        .register_vehicle(&client(), PlanTier::Free, vehicle_spec())
        .expect("vehicle registers");

    let stranger = UserId("user-bruno".to_string());
    assert!(service.remove_vehicle(&stranger, &vehicle.id).is_err());
    assert_eq!(
        service.vehicles_for(&client()).expect("list").len(),
        1,
        "vehicle must survive a foreign delete"
    );
}

#[test]
fn free_tier_blocks_the_fourth_request_in_a_month() {
    let (service, _, _) = build_service();
    let vehicle = service
        .register_vehicle(&client(), PlanTier::Free, vehicle_spec())
        .expect("vehicle registers");

    for day in 1..=3 {
        service
            .submit_request(
                &client(),
                PlanTier::Free,
                &vehicle.id,
                ServiceType::OilChange,
                "routine oil change".to_string(),
                ts(2026, 8, day),
            )
            .expect("within monthly cap");
    }

    match service.submit_request(
        &client(),
        PlanTier::Free,
        &vehicle.id,
        ServiceType::Tires,
        "slow leak, rear left".to_string(),
        ts(2026, 8, 28),
    ) {
        Err(MarketplaceError::RequestLimitReached { tier, limit }) => {
            assert_eq!(tier, PlanTier::Free);
            assert_eq!(limit, Quota::Limited(3));
        }
        other => panic!("expected request limit error, got {other:?}"),
    }
}

#[test]
fn the_cap_resets_at_the_calendar_month_boundary() {
    let (service, _, _) = build_service();
    let vehicle = service
        .register_vehicle(&client(), PlanTier::Free, vehicle_spec())
        .expect("vehicle registers");

    for day in [5, 12, 31] {
        service
            .submit_request(
                &client(),
                PlanTier::Free,
                &vehicle.id,
                ServiceType::Inspection,
                "pre-trip inspection".to_string(),
                ts(2026, 8, day),
            )
            .expect("august submissions fit");
    }

    service
        .submit_request(
            &client(),
            PlanTier::Free,
            &vehicle.id,
            ServiceType::Inspection,
            "follow-up inspection".to_string(),
            ts(2026, 9, 1),
        )
        .expect("september starts a fresh count");
}

#[test]
fn requests_require_an_owned_vehicle() {
    let (service, _, _) = build_service();

    let missing = service.submit_request(
        &client(),
        PlanTier::Premium,
        &VehicleId("veh-none".to_string()),
        ServiceType::Engine,
        "engine stalls at idle".to_string(),
        ts(2026, 8, 23),
    );
    assert!(matches!(missing, Err(MarketplaceError::UnknownVehicle)));

    let stranger = UserId("user-bruno".to_string());
    let vehicle = service
        .register_vehicle(&stranger, PlanTier::Free, vehicle_spec())
        .expect("stranger registers");

    let foreign = service.submit_request(
        &client(),
        PlanTier::Premium,
        &vehicle.id,
        ServiceType::Engine,
        "engine stalls at idle".to_string(),
        ts(2026, 8, 23),
    );
    assert!(
        matches!(foreign, Err(MarketplaceError::UnknownVehicle)),
        "foreign vehicles must look like missing ones"
    );
}

#[test]
fn lifecycle_runs_end_to_end_through_the_service() {
    let (service, _, requests) = build_service();
    let request = pending_request(&service, PlanTier::Free, ts(2026, 8, 23));

    let accepted = service
        .accept(&mechanic(), &request.id)
        .expect("accept pending");
    assert_eq!(accepted.status, ServiceRequestStatus::Accepted);
    assert_eq!(accepted.mechanic_id, Some(mechanic()));

    let started = service.start(&mechanic(), &request.id).expect("start");
    assert_eq!(started.status, ServiceRequestStatus::InProgress);

    let completed = service
        .complete(&mechanic(), &request.id)
        .expect("complete");
    assert_eq!(completed.status, ServiceRequestStatus::Completed);

    let stored = requests
        .fetch(&request.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, ServiceRequestStatus::Completed);
}

#[test]
fn an_illegal_transition_never_mutates_stored_state() {
    let (service, _, requests) = build_service();
    let request = pending_request(&service, PlanTier::Free, ts(2026, 8, 23));

    match service.complete(&mechanic(), &request.id) {
        Err(MarketplaceError::Transition(err)) => {
            assert_eq!(err.from, ServiceRequestStatus::Pending);
            assert_eq!(err.action, MechanicAction::Complete);
        }
        other => panic!("expected transition error, got {other:?}"),
    }

    let stored = requests
        .fetch(&request.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, ServiceRequestStatus::Pending);
    assert_eq!(stored.mechanic_id, None, "failed claim must not assign");
}

#[test]
fn only_the_assigned_mechanic_may_continue() {
    let (service, _, _) = build_service();
    let request = pending_request(&service, PlanTier::Free, ts(2026, 8, 23));

    service
        .accept(&mechanic(), &request.id)
        .expect("first mechanic claims");

    match service.start(&other_mechanic(), &request.id) {
        Err(MarketplaceError::NotAssigned) => {}
        other => panic!("expected assignment error, got {other:?}"),
    }

    service
        .start(&mechanic(), &request.id)
        .expect("assigned mechanic continues");
}

#[test]
fn open_pool_only_lists_unclaimed_pending_requests() {
    let (service, _, _) = build_service();
    let vehicle = service
        .register_vehicle(&client(), PlanTier::Basic, vehicle_spec())
        .expect("vehicle registers");

    let first = service
        .submit_request(
            &client(),
            PlanTier::Basic,
            &vehicle.id,
            ServiceType::Suspension,
            "knocking over bumps".to_string(),
            ts(2026, 8, 10),
        )
        .expect("first request");
    let second = service
        .submit_request(
            &client(),
            PlanTier::Basic,
            &vehicle.id,
            ServiceType::Electrical,
            "dashboard lights flicker".to_string(),
            ts(2026, 8, 11),
        )
        .expect("second request");

    service.accept(&mechanic(), &first.id).expect("claim first");

    let open = service.open_requests().expect("pool listing");
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, second.id);
}
