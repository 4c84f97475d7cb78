use std::sync::Arc;

use chrono::Utc;

use super::{ContactRequest, CrmClient, LeadRecord, lead_score};
use crate::error::SubmissionError;

/// Forwards leads to the CRM. Failures are logged with the full lead payload
/// so the lead can be recovered by hand; nothing is retried or persisted.
#[derive(Clone)]
pub struct LeadGateway {
    crm: Arc<dyn CrmClient>,
    location_id: String,
}

impl LeadGateway {
    pub fn new(crm: Arc<dyn CrmClient>, location_id: impl Into<String>) -> Self {
        Self {
            crm,
            location_id: location_id.into(),
        }
    }

    pub async fn submit(&self, lead: &LeadRecord) -> Result<String, SubmissionError> {
        lead.check_required()?;

        let contact = ContactRequest::from_lead(lead, &self.location_id);
        match self.crm.create_contact(&contact).await {
            Ok(contact_id) => {
                tracing::info!(
                    %contact_id,
                    score = lead_score(lead),
                    lead = %lead_payload(lead),
                    timestamp = %Utc::now().to_rfc3339(),
                    "New OZ calculator lead"
                );
                Ok(contact_id)
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    lead = %lead_payload(lead),
                    timestamp = %Utc::now().to_rfc3339(),
                    "Lead captured but CRM submission failed"
                );
                Err(err.into())
            }
        }
    }
}

fn lead_payload(lead: &LeadRecord) -> String {
    serde_json::to_string(lead).unwrap_or_else(|e| format!("<unserializable lead: {e}>"))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::CrmError;
    use crate::lead::{ContactRequest, CrmClient};

    #[derive(Default)]
    pub struct RecordingCrm {
        pub fail_with_status: Option<u16>,
        pub received: Mutex<Vec<ContactRequest>>,
    }

    impl RecordingCrm {
        pub fn failing(status: u16) -> Self {
            Self {
                fail_with_status: Some(status),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.received.lock().map(|r| r.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl CrmClient for RecordingCrm {
        async fn create_contact(&self, contact: &ContactRequest) -> Result<String, CrmError> {
            let count = {
                let mut received = self.received.lock().unwrap();
                received.push(contact.clone());
                received.len()
            };
            match self.fail_with_status {
                Some(status) => Err(CrmError::Status {
                    status,
                    body: "upstream unavailable".to_string(),
                }),
                None => Ok(format!("contact-{count}")),
            }
        }
    }
}
