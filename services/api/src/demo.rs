use crate::infra::{InMemoryServiceRequestRepository, InMemoryVehicleRepository};
use chrono::Local;
use clap::Args;
use std::sync::Arc;

use garage_link::error::AppError;
use garage_link::marketplace::{
    MarketplaceError, MarketplaceService, PlanCatalog, PlanTier, ServiceType, UsagePolicy, UserId,
    VehicleSpec,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Plan tier the demo client is subscribed to
    #[arg(long, value_enum, default_value_t = DemoTier::Free)]
    pub(crate) tier: DemoTier,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub(crate) enum DemoTier {
    Free,
    Basic,
    Premium,
}

impl From<DemoTier> for PlanTier {
    fn from(value: DemoTier) -> Self {
        match value {
            DemoTier::Free => PlanTier::Free,
            DemoTier::Basic => PlanTier::Basic,
            DemoTier::Premium => PlanTier::Premium,
        }
    }
}

/// Print the published catalog the way the plans page renders it.
pub(crate) fn print_plans() -> Result<(), AppError> {
    let catalog = PlanCatalog::published();
    println!("tier     monthly  vehicles  requests/month");
    for plan in catalog.plans() {
        println!(
            "{:<8} {:>7} {:>9} {:>15}",
            plan.tier.label(),
            format!("{:.2}", plan.monthly_price_minor as f64 / 100.0),
            plan.entitlements.max_vehicles.to_string(),
            plan.entitlements.max_requests_per_month.to_string(),
        );
    }
    Ok(())
}

/// Walk a client and a mechanic through registration, the monthly cap, and
/// the full request lifecycle against in-memory stores.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let tier = PlanTier::from(args.tier);

    let service = MarketplaceService::new(
        UsagePolicy::default(),
        Arc::new(InMemoryVehicleRepository::default()),
        Arc::new(InMemoryServiceRequestRepository::default()),
    );

    let client = UserId("demo-client".to_string());
    let mechanic = UserId("demo-mechanic".to_string());
    let now = Local::now().naive_local();

    println!("== registering vehicles on the {tier} plan ==");
    let mut first_vehicle = None;
    for attempt in 1..=3 {
        let spec = VehicleSpec {
            brand: "Chevrolet".to_string(),
            model: "Onix".to_string(),
            year: 2020,
            plate: format!("DMO-{attempt:04}"),
            color: "white".to_string(),
        };
        match service.register_vehicle(&client, tier, spec) {
            Ok(vehicle) => {
                println!("registered {} ({})", vehicle.id.0, vehicle.plate);
                first_vehicle.get_or_insert(vehicle);
            }
            Err(MarketplaceError::VehicleLimitReached { limit, .. }) => {
                println!("refused: plan allows {limit} vehicle(s)");
                break;
            }
            Err(err) => {
                eprintln!("unexpected failure: {err}");
                return Ok(());
            }
        }
    }

    let Some(vehicle) = first_vehicle else {
        return Ok(());
    };

    println!("== submitting service requests ==");
    let mut first_request = None;
    for attempt in 1..=4 {
        match service.submit_request(
            &client,
            tier,
            &vehicle.id,
            ServiceType::OilChange,
            format!("demo request {attempt}"),
            now,
        ) {
            Ok(request) => {
                println!("submitted {} ({})", request.id.0, request.status);
                first_request.get_or_insert(request);
            }
            Err(MarketplaceError::RequestLimitReached { limit, .. }) => {
                println!("refused: plan allows {limit} request(s) per month");
                break;
            }
            Err(err) => {
                eprintln!("unexpected failure: {err}");
                return Ok(());
            }
        }
    }

    let Some(request) = first_request else {
        return Ok(());
    };

    println!("== mechanic drives the lifecycle ==");
    for step in ["accept", "start", "complete"] {
        let result = match step {
            "accept" => service.accept(&mechanic, &request.id),
            "start" => service.start(&mechanic, &request.id),
            _ => service.complete(&mechanic, &request.id),
        };
        match result {
            Ok(updated) => println!("{step}: {} is now {}", updated.id.0, updated.status),
            Err(err) => {
                eprintln!("{step} failed: {err}");
                return Ok(());
            }
        }
    }

    match service.complete(&mechanic, &request.id) {
        Err(err) => println!("further action refused as expected: {err}"),
        Ok(_) => eprintln!("completed request accepted another transition"),
    }

    Ok(())
}
