use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Local, NaiveDate, NaiveTime};
use clap::Args;
use visitgate::error::AppError;
use visitgate::risk::NoopRiskAnalyzer;
use visitgate::verification::{ApprovedBiasFeed, ScanEvent, ScanSimulator};
use visitgate::visits::{
    seed, ApplicationStatus, ApplicationStore, IdType, InMemoryApplicationStore, LifecycleEvent,
    NewApplication, ServiceError, StatusFilter, Visitor, VisitService,
};

use crate::infra::parse_date;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date for the demo (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Simulated decoder delay in milliseconds
    #[arg(long, default_value_t = 750)]
    pub(crate) scan_delay_ms: u64,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let store = Arc::new(InMemoryApplicationStore::default());
    for application in seed::initial_applications(today) {
        store.create(application).map_err(ServiceError::from)?;
    }
    let service = Arc::new(VisitService::new(
        Arc::clone(&store),
        Arc::new(NoopRiskAnalyzer),
    ));

    println!("Visitor pass demo (evaluated {today})");

    let stats = service.stats(today)?;
    println!(
        "\nDashboard: {} visiting today, {} applications on file, {} pending review",
        stats.today, stats.total, stats.pending
    );

    let pending = service.list(StatusFilter::Only(ApplicationStatus::Pending), None, today)?;
    println!("\nPending applications");
    for application in &pending {
        println!(
            "- {} | {} | {} | {} visitor(s)",
            application.id,
            application.visit_date,
            application.purpose,
            application.visitors.len()
        );
    }
    if let Some(application) = pending.first() {
        let approved = service.decide(&application.id, LifecycleEvent::Approve)?;
        println!(
            "Staff approved {} for {}",
            approved.id, approved.visit_date
        );
    }

    let submitted = service.submit(walk_in_submission(today))?;
    service.annotate_risk(&submitted.id).await?;
    if let Some(annotated) = service.get(&submitted.id)? {
        println!(
            "\nNew walk-in application {} submitted; advisory: {}",
            annotated.id,
            annotated
                .ai_risk_analysis
                .as_deref()
                .unwrap_or("(not annotated)")
        );
    }

    println!("\nCheckpoint verifications");
    let mut codes: Vec<String> = Vec::new();
    if let Some(approved) = service
        .list(StatusFilter::Only(ApplicationStatus::Approved), None, today)?
        .first()
    {
        codes.push(approved.id.0.clone());
        codes.push(format!("{}-1", approved.id.0));
    }
    if let Some(rejected) = service
        .list(StatusFilter::Only(ApplicationStatus::Rejected), None, today)?
        .first()
    {
        codes.push(rejected.id.0.clone());
    }
    codes.push("UNKNOWN".to_string());
    for code in codes {
        match service.verify(&code, today) {
            Ok(outcome) => println!("- {code}: {}", outcome.record.message),
            Err(err) => println!("- {code}: refused ({err})"),
        }
    }

    let simulator = ScanSimulator::new(
        service.engine(),
        Arc::new(ApprovedBiasFeed::new(service.store())),
        Duration::from_millis(args.scan_delay_ms),
    );

    println!("\nSimulated scan ({} ms decode delay)", args.scan_delay_ms);
    match simulator.start_scan(today).outcome().await {
        ScanEvent::Verified(outcome) => println!("- scan resolved: {}", outcome.record.message),
        ScanEvent::NoCodeDetected => println!("- scan resolved: no code detected"),
        ScanEvent::Cancelled => println!("- scan cancelled"),
    }

    let handle = simulator.start_scan(today);
    match handle.stop().await {
        ScanEvent::Cancelled => println!("- second scan stopped before decode"),
        other => println!("- second scan resolved before the stop landed: {other:?}"),
    }

    println!("\nVerification log (newest first)");
    for entry in service.verifications() {
        println!(
            "- {} | {} | {} | {}",
            entry.timestamp, entry.application_id, entry.visitor_name, entry.message
        );
    }

    Ok(())
}

fn walk_in_submission(today: NaiveDate) -> NewApplication {
    NewApplication {
        visit_date: today + ChronoDuration::days(1),
        start_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap_or(NaiveTime::MIN),
        duration_hours: 1,
        location: "Reception lobby".to_string(),
        purpose: "Parcel delivery".to_string(),
        max_visitors: 1,
        valid_days: 1,
        disclaimer: None,
        visitors: vec![Visitor {
            id: "v1".to_string(),
            name: "Chen Wei".to_string(),
            phone: "13100131000".to_string(),
            id_type: IdType::IdCard,
            id_number: "440301199203034567".to_string(),
            photo_url: None,
        }],
    }
}
