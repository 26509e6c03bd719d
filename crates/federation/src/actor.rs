//! `ActivityPub` Person actor documents for local profiles.

use activitypub_federation::kinds::actor::PersonType;
use fedigram_db::entities::profile;
use serde::{Deserialize, Serialize};

use crate::urls::{ProfileUrls, UrlConfig};

/// `ActivityPub` Person actor.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApPerson {
    #[serde(rename = "@context")]
    pub context: serde_json::Value,
    #[serde(rename = "type")]
    pub kind: PersonType,
    pub id: String,
    pub preferred_username: String,
    pub inbox: String,
    pub outbox: String,
    pub followers: String,
    pub following: String,
    pub url: String,
    pub manually_approves_followers: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<ApImage>,

    pub endpoints: ApEndpoints,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<ApPublicKey>,
}

/// Actor endpoints.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApEndpoints {
    pub shared_inbox: String,
}

/// `ActivityPub` Image object.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApImage {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// `ActivityPub` public key.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApPublicKey {
    pub id: String,
    pub owner: String,
    pub public_key_pem: String,
}

/// Default `ActivityStreams` context for actor documents.
#[must_use]
pub fn actor_context() -> serde_json::Value {
    serde_json::json!([
        "https://www.w3.org/ns/activitystreams",
        "https://w3id.org/security/v1",
        {
            "manuallyApprovesFollowers": "as:manuallyApprovesFollowers"
        }
    ])
}

/// Build the actor document for a local profile.
#[must_use]
pub fn to_ap_person(profile: &profile::Model, config: &UrlConfig) -> ApPerson {
    let id = profile.permalink(config, "");

    let public_key = match (profile.key_id(config), profile.public_key.as_ref()) {
        (Some(key_id), Some(pem)) => Some(ApPublicKey {
            id: key_id,
            owner: id.clone(),
            public_key_pem: pem.clone(),
        }),
        _ => None,
    };

    ApPerson {
        context: actor_context(),
        kind: PersonType::Person,
        preferred_username: profile.username.clone(),
        inbox: ProfileUrls::inbox_url(profile, config),
        outbox: ProfileUrls::outbox_url(profile, config),
        followers: profile.permalink(config, "/followers"),
        following: profile.permalink(config, "/following"),
        url: profile.url(config, ""),
        manually_approves_followers: profile.is_private,
        name: profile.name.clone(),
        summary: profile.bio.clone(),
        icon: Some(ApImage {
            kind: "Image".to_string(),
            url: profile.avatar(config),
            media_type: None,
        }),
        endpoints: ApEndpoints {
            shared_inbox: profile.shared_inbox_url(config),
        },
        public_key,
        id,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::urls::tests::{config, local_profile};

    #[test]
    fn test_person_document() {
        let alice = local_profile(1, "alice");
        let person = to_ap_person(&alice, &config());
        let json = serde_json::to_value(&person).unwrap();

        assert_eq!(json["type"], "Person");
        assert_eq!(json["id"], "https://pix.example/users/alice");
        assert_eq!(json["preferredUsername"], "alice");
        assert_eq!(json["inbox"], "https://pix.example/users/alice/inbox");
        assert_eq!(json["followers"], "https://pix.example/users/alice/followers");
        assert_eq!(
            json["endpoints"]["sharedInbox"],
            "https://pix.example/users/alice/inbox"
        );
        assert_eq!(
            json["publicKey"]["id"],
            "https://pix.example/users/alice#main-key"
        );
        assert_eq!(json["publicKey"]["owner"], "https://pix.example/users/alice");
    }

    #[test]
    fn test_person_without_key_omits_public_key() {
        let mut alice = local_profile(1, "alice");
        alice.public_key = None;

        let json = serde_json::to_value(to_ap_person(&alice, &config())).unwrap();
        assert!(json.get("publicKey").is_none());
    }
}
