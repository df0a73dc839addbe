//! Sample data for demos and the `--seed` server flag.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::domain::{Application, ApplicationId, ApplicationStatus, IdType, Visitor};

fn visitor(id: &str, name: &str, phone: &str, id_type: IdType, id_number: &str) -> Visitor {
    Visitor {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        id_type,
        id_number: id_number.to_string(),
        photo_url: None,
    }
}

fn entry(
    sequence: u16,
    visit_date: NaiveDate,
    start_time: (u32, u32),
    duration_hours: u8,
    location: &str,
    purpose: &str,
    max_visitors: usize,
    status: ApplicationStatus,
    visitors: Vec<Visitor>,
) -> Application {
    Application {
        id: ApplicationId(format!("VS{}{sequence:03}", visit_date.format("%Y%m%d"))),
        application_date: NaiveDateTime::new(
            visit_date - Duration::days(1),
            NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
        ),
        visit_date,
        start_time: NaiveTime::from_hms_opt(start_time.0, start_time.1, 0).expect("valid time"),
        duration_hours,
        location: location.to_string(),
        purpose: purpose.to_string(),
        max_visitors,
        valid_days: 1,
        disclaimer: Some("Visitors must wear their badge at all times.".to_string()),
        status,
        visitors,
        rejection_reason: None,
        ai_risk_analysis: None,
    }
}

/// A small mixed-status data set anchored on `today`: one approved visit for
/// today, pending visits ahead, and an approved visit already past its
/// window so the derived-expiry path shows up in list views.
pub fn initial_applications(today: NaiveDate) -> Vec<Application> {
    let mut rejected = entry(
        2,
        today - Duration::days(1),
        (9, 0),
        2,
        "Gymnasium badminton court",
        "Private event",
        5,
        ApplicationStatus::Rejected,
        vec![visitor(
            "v5",
            "Sun Wukong",
            "13600136000",
            IdType::Other,
            "999999",
        )],
    );
    rejected.rejection_reason = Some("Facility unavailable for private events.".to_string());

    vec![
        entry(
            1,
            today + Duration::days(1),
            (9, 0),
            2,
            "Admin Building Room 301",
            "Business meeting",
            5,
            ApplicationStatus::Pending,
            vec![
                visitor(
                    "v1",
                    "Wang Jianguo",
                    "13800138000",
                    IdType::IdCard,
                    "110101198001011234",
                ),
                visitor(
                    "v2",
                    "Li Xiaoming",
                    "13900139000",
                    IdType::IdCard,
                    "110101199002025678",
                ),
            ],
        ),
        entry(
            2,
            today,
            (14, 0),
            4,
            "Lab Building Floor 2",
            "Academic exchange",
            3,
            ApplicationStatus::Approved,
            vec![visitor(
                "v3",
                "Sarah Jones",
                "15000150000",
                IdType::Passport,
                "E12345678",
            )],
        ),
        entry(
            1,
            today - Duration::days(2),
            (10, 0),
            1,
            "Library Floor 4 reading area",
            "Campus tour",
            2,
            ApplicationStatus::Approved,
            vec![visitor(
                "v4",
                "Zhao Tiezhu",
                "13700137000",
                IdType::IdCard,
                "320102198505054321",
            )],
        ),
        rejected,
        entry(
            3,
            today + Duration::days(2),
            (13, 0),
            3,
            "Teaching Building A",
            "Equipment repair",
            2,
            ApplicationStatus::Pending,
            vec![visitor(
                "v6",
                "Zhou Shifu",
                "13500135000",
                IdType::IdCard,
                "510101197508081111",
            )],
        ),
    ]
}
