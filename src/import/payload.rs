//! Organization records shaped for the `organizations` table.

use crate::model::{Event, Organization, Tags};
use serde::{Deserialize, Serialize};

use super::slug::org_slug;

/// One row of the upsert request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationPayload {
    pub owner_id: String,
    pub name: String,
    /// Conflict key for the upsert
    pub slug: String,
    pub description: String,
    pub tags: Tags,
    pub events: Vec<Event>,
}

impl OrganizationPayload {
    /// Build the payload for one organization.
    pub fn from_organization(org: &Organization, owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            name: org.name.clone(),
            slug: org_slug(&org.name),
            description: org.description.clone(),
            tags: org.tags.clone(),
            events: org.events.clone(),
        }
    }
}

/// Build payloads for every organization, in sheet order.
pub fn build_payload(orgs: &[Organization], owner_id: &str) -> Vec<OrganizationPayload> {
    orgs.iter()
        .map(|org| OrganizationPayload::from_organization(org, owner_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orgs() -> Vec<Organization> {
        let mut acme = Organization::new("Acme", "Desc A", Tags::List(vec!["x".into(), "y".into()]));
        acme.events.push(Event {
            title: "Launch".into(),
            description: "Event desc".into(),
            date: "2024-01-01".into(),
            tags: Tags::List(vec!["y".into(), "z".into()]),
        });
        vec![acme, Organization::new("???", "", Tags::List(vec![]))]
    }

    #[test]
    fn test_build_payload() {
        let payload = build_payload(&orgs(), "owner-1");
        assert_eq!(payload.len(), 2);
        assert!(payload.iter().all(|p| p.owner_id == "owner-1"));
        assert_eq!(payload[0].slug, "acme-79d894");
        assert_eq!(payload[0].events.len(), 1);
        assert_eq!(payload[1].slug, "org-0d1b08");
    }

    #[test]
    fn test_payload_idempotent() {
        assert_eq!(build_payload(&orgs(), "o"), build_payload(&orgs(), "o"));
    }

    #[test]
    fn test_payload_json_shape() {
        let payload = build_payload(&orgs()[..1], "owner-1");
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"[{"owner_id":"owner-1","name":"Acme","slug":"acme-79d894","description":"Desc A","tags":["x","y"],"events":[{"title":"Launch","description":"Event desc","date":"2024-01-01","tags":["y","z"]}]}]"#
        );
    }
}
