use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvitationRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub email: String,
    pub role: String,
    pub token: String,
    pub invited_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

impl InvitationRow {
    pub fn status(&self, now: DateTime<Utc>) -> InvitationStatus {
        if self.accepted_at.is_some() {
            InvitationStatus::Accepted
        } else if self.expires_at <= now {
            InvitationStatus::Expired
        } else {
            InvitationStatus::Pending
        }
    }
}

/// Fields needed to insert an invitation.
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub company_id: Uuid,
    pub email: String,
    pub role: String,
    pub token: String,
    pub invited_by: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invitation(expires_in: Duration, accepted: bool) -> InvitationRow {
        let now = Utc::now();
        InvitationRow {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            email: "dev@acme.test".to_string(),
            role: "member".to_string(),
            token: "token".to_string(),
            invited_by: Uuid::new_v4(),
            created_at: now,
            expires_at: now + expires_in,
            accepted_at: accepted.then_some(now),
        }
    }

    #[test]
    fn test_status_tracks_acceptance_and_expiry() {
        let now = Utc::now();
        assert_eq!(
            invitation(Duration::hours(1), false).status(now),
            InvitationStatus::Pending
        );
        assert_eq!(
            invitation(Duration::hours(-1), false).status(now),
            InvitationStatus::Expired
        );
        // accepted wins over expiry
        assert_eq!(
            invitation(Duration::hours(-1), true).status(now),
            InvitationStatus::Accepted
        );
    }
}
