use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for visit applications. The id doubles as the pass
/// code encoded into the QR badge, so it is assigned once and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    /// Generate a fresh id in the `VS<yyyymmdd><3 digits>` shape printed on
    /// badges. Collisions are rare and surface as a store conflict.
    pub fn generate(date: NaiveDate) -> Self {
        let suffix: u16 = rand::thread_rng().gen_range(0..1000);
        Self(format!("VS{}{suffix:03}", date.format("%Y%m%d")))
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepted identity document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdType {
    IdCard,
    Passport,
    Other,
}

/// A single person covered by an application. Owned exclusively by the parent
/// application; identity in practice is the (name, id_number) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub id_type: IdType,
    pub id_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Application status. A single enumeration covers both storage and display;
/// `Expired` is usually derived from the validity window rather than written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Expired => "expired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Host-submitted payload before an id and status are assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplication {
    pub visit_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: u8,
    pub location: String,
    pub purpose: String,
    pub max_visitors: usize,
    pub valid_days: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    pub visitors: Vec<Visitor>,
}

impl NewApplication {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_constraints(
            self.visitors.len(),
            self.max_visitors,
            self.duration_hours,
            self.valid_days,
        )
    }

    pub fn into_application(self, id: ApplicationId, submitted_at: NaiveDateTime) -> Application {
        Application {
            id,
            application_date: submitted_at,
            visit_date: self.visit_date,
            start_time: self.start_time,
            duration_hours: self.duration_hours,
            location: self.location,
            purpose: self.purpose,
            max_visitors: self.max_visitors,
            valid_days: self.valid_days,
            disclaimer: self.disclaimer,
            status: ApplicationStatus::Pending,
            visitors: self.visitors,
            rejection_reason: None,
            ai_risk_analysis: None,
        }
    }
}

/// A visit application: the unit the store, lifecycle, and verification all
/// operate on. The visitor list is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub application_date: NaiveDateTime,
    pub visit_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: u8,
    pub location: String,
    pub purpose: String,
    pub max_visitors: usize,
    pub valid_days: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    pub status: ApplicationStatus,
    pub visitors: Vec<Visitor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_risk_analysis: Option<String>,
}

impl Application {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_constraints(
            self.visitors.len(),
            self.max_visitors,
            self.duration_hours,
            self.valid_days,
        )
    }

    /// Display name for verification records: the first visitor, with a
    /// `+N more` suffix when the application covers a group.
    pub fn lead_visitor_label(&self) -> String {
        let lead = &self.visitors[0];
        if self.visitors.len() > 1 {
            format!("{} +{} more", lead.name, self.visitors.len() - 1)
        } else {
            lead.name.clone()
        }
    }

    pub fn lead_visitor(&self) -> &Visitor {
        &self.visitors[0]
    }
}

fn check_constraints(
    visitor_count: usize,
    max_visitors: usize,
    duration_hours: u8,
    valid_days: u16,
) -> Result<(), ValidationError> {
    if visitor_count == 0 {
        return Err(ValidationError::NoVisitors);
    }
    if visitor_count > max_visitors {
        return Err(ValidationError::TooManyVisitors {
            count: visitor_count,
            max: max_visitors,
        });
    }
    if !(1..=8).contains(&duration_hours) {
        return Err(ValidationError::DurationOutOfRange(duration_hours));
    }
    if valid_days == 0 {
        return Err(ValidationError::ZeroValidDays);
    }
    Ok(())
}

/// Malformed input at the creation boundary. Surfaced to the caller and never
/// mutates state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("an application must include at least one visitor")]
    NoVisitors,
    #[error("visitor count {count} exceeds the cap of {max}")]
    TooManyVisitors { count: usize, max: usize },
    #[error("visit duration must be between 1 and 8 hours, got {0}")]
    DurationOutOfRange(u8),
    #[error("validity window must cover at least one day")]
    ZeroValidDays,
}
