use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::risk::NoopRiskAnalyzer;
use crate::visits::domain::{
    Application, ApplicationId, ApplicationStatus, IdType, NewApplication, Visitor,
};
use crate::visits::service::VisitService;
use crate::visits::store::InMemoryApplicationStore;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

pub(super) fn visitors(names: &[&str]) -> Vec<Visitor> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| Visitor {
            id: format!("v{}", index + 1),
            name: (*name).to_string(),
            phone: format!("1380013{index:04}"),
            id_type: IdType::IdCard,
            id_number: format!("11010119800101{index:04}"),
            photo_url: None,
        })
        .collect()
}

pub(super) fn submission() -> NewApplication {
    NewApplication {
        visit_date: date(2099, 1, 2),
        start_time: time(9, 0),
        duration_hours: 2,
        location: "Admin Building Room 301".to_string(),
        purpose: "Business meeting".to_string(),
        max_visitors: 5,
        valid_days: 1,
        disclaimer: None,
        visitors: visitors(&["Wang Jianguo", "Li Xiaoming"]),
    }
}

pub(super) fn application(
    id: &str,
    status: ApplicationStatus,
    visit_date: NaiveDate,
    valid_days: u16,
) -> Application {
    Application {
        id: ApplicationId(id.to_string()),
        application_date: NaiveDateTime::new(visit_date, time(8, 30)),
        visit_date,
        start_time: time(9, 0),
        duration_hours: 2,
        location: "Admin Building Room 301".to_string(),
        purpose: "Business meeting".to_string(),
        max_visitors: 5,
        valid_days,
        disclaimer: None,
        status,
        visitors: visitors(&["Wang Jianguo"]),
        rejection_reason: None,
        ai_risk_analysis: None,
    }
}

pub(super) fn build_service() -> (
    Arc<VisitService<InMemoryApplicationStore, NoopRiskAnalyzer>>,
    Arc<InMemoryApplicationStore>,
) {
    let store = Arc::new(InMemoryApplicationStore::default());
    let service = Arc::new(VisitService::new(
        Arc::clone(&store),
        Arc::new(NoopRiskAnalyzer),
    ));
    (service, store)
}
