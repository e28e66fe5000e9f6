//! Platform profile payloads.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::session::AUTH_PROVIDER;

const TAG_IDS: [&str; 6] = ["2", "21", "1", "107", "596", "74"];

fn email_preferences(send: bool) -> String {
    json!({
        "generalEmail": { "sendEmails": send },
        "marketEmails": { "sendEmails": send },
        "newsletterEmails": { "sendEmails": send },
        "promotionalEmails": { "sendEmails": send },
        "eventEmails": { "sendEmails": send, "tagIds": TAG_IDS },
        "orderFillEmails": { "sendEmails": send, "hideSmallFills": true },
        "resolutionEmails": { "sendEmails": send },
    })
    .to_string()
}

fn app_preferences() -> String {
    json!({
        "eventApp": { "sendApp": true, "tagIds": TAG_IDS },
        "marketPriceChangeApp": { "sendApp": true },
        "orderFillApp": { "sendApp": true, "hideSmallFills": true },
        "resolutionApp": { "sendApp": true },
    })
    .to_string()
}

/// Notification preferences attached to a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserPreferences {
    pub email_notification_preferences: String,
    pub app_notification_preferences: String,
    pub market_interests: String,
    pub preferences_status: String,
    pub subscription_status: bool,
}

/// Wallet preferences attached to a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWalletPreferences {
    pub advanced_mode: bool,
    pub custom_gas_price: String,
    pub gas_preference: String,
    pub wallet_preferences_status: String,
}

/// User entry of a profile creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub address: String,
    pub is_external_auth: bool,
    pub provider: String,
    pub proxy_wallet: String,
    pub username: String,
    pub preferences: Vec<NewUserPreferences>,
    pub wallet_preferences: Vec<NewWalletPreferences>,
}

/// Body of `POST /profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub display_username_public: bool,
    pub email_opt_in: bool,
    pub name: String,
    pub proxy_wallet: String,
    pub pseudonym: String,
    pub referral: String,
    pub utm_campaign: String,
    pub utm_content: String,
    pub utm_medium: String,
    pub utm_source: String,
    pub utm_term: String,
    pub wallet_activated: bool,
    pub users: Vec<NewUser>,
}

impl CreateProfileRequest {
    /// Profile for an externally authenticated wallet and its proxy.
    ///
    /// The placeholder name is `{proxy}-{created_at_ms}`; the display name
    /// is replaced later in the flow.
    pub fn for_wallet(owner: Address, proxy: Address, created_at_ms: i64) -> Self {
        let proxy = proxy.to_checksum(None);
        let name = format!("{proxy}-{created_at_ms}");

        Self {
            display_username_public: true,
            email_opt_in: false,
            name: name.clone(),
            proxy_wallet: proxy.clone(),
            pseudonym: proxy.clone(),
            referral: String::new(),
            utm_campaign: String::new(),
            utm_content: String::new(),
            utm_medium: String::new(),
            utm_source: String::new(),
            utm_term: String::new(),
            wallet_activated: false,
            users: vec![NewUser {
                address: owner.to_checksum(None),
                is_external_auth: true,
                provider: AUTH_PROVIDER.to_string(),
                proxy_wallet: proxy,
                username: name,
                preferences: vec![NewUserPreferences {
                    email_notification_preferences: email_preferences(false),
                    app_notification_preferences: app_preferences(),
                    market_interests: "[]".to_string(),
                    preferences_status: "New/Existing - Created Prefs".to_string(),
                    subscription_status: false,
                }],
                wallet_preferences: vec![NewWalletPreferences {
                    advanced_mode: false,
                    custom_gas_price: "30".to_string(),
                    gas_preference: "fast".to_string(),
                    wallet_preferences_status: "New/Existing - Created Wallet Prefs"
                        .to_string(),
                }],
            }],
        }
    }
}

/// Preference record returned inside a profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRecord {
    pub id: String,
    #[serde(default)]
    pub market_interests: Option<String>,
    #[serde(default)]
    pub preferences_status: Option<String>,
}

/// User record returned inside a profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub proxy_wallet: Option<String>,
    #[serde(default)]
    pub preferences: Vec<PreferenceRecord>,
}

/// Profile as returned by `POST /profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub proxy_wallet: Option<String>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

impl ProfileRecord {
    /// Identifier of the first user's first preference record.
    pub fn preference_id(&self) -> Option<&str> {
        self.users
            .first()
            .and_then(|user| user.preferences.first())
            .map(|pref| pref.id.as_str())
    }
}

/// Body of `PUT /preferences/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub email_notification_preferences: String,
    pub market_interests: String,
}

impl PreferencesUpdate {
    /// Opt in to every email category.
    pub fn opt_in_all() -> Self {
        Self {
            email_notification_preferences: email_preferences(true),
            market_interests: "[]".to_string(),
        }
    }
}

/// Body of `PUT /profiles/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNameUpdate {
    pub display_username_public: bool,
    pub name: String,
    pub referral: String,
}

impl DisplayNameUpdate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            display_username_public: true,
            name: name.into(),
            referral: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use serde_json::json;

    const OWNER: Address = address!("7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    const PROXY: Address = address!("51b7C68A71dCcBc0b7FA4400934a293D8f4d3Ba8");

    #[test]
    fn test_create_profile_request_shape() {
        let request = CreateProfileRequest::for_wallet(OWNER, PROXY, 1_704_067_200_000);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["name"],
            "0x51b7C68A71dCcBc0b7FA4400934a293D8f4d3Ba8-1704067200000"
        );
        assert_eq!(value["proxyWallet"], "0x51b7C68A71dCcBc0b7FA4400934a293D8f4d3Ba8");
        assert_eq!(value["pseudonym"], value["proxyWallet"]);
        assert_eq!(value["displayUsernamePublic"], true);
        assert_eq!(value["walletActivated"], false);

        let user = &value["users"][0];
        assert_eq!(user["address"], "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
        assert_eq!(user["isExternalAuth"], true);
        assert_eq!(user["provider"], "metamask");
        assert_eq!(user["username"], value["name"]);
        assert_eq!(user["walletPreferences"][0]["gasPreference"], "fast");
        assert_eq!(user["walletPreferences"][0]["customGasPrice"], "30");
    }

    #[test]
    fn test_embedded_preferences_are_valid_json() {
        let request = CreateProfileRequest::for_wallet(OWNER, PROXY, 0);
        let prefs = &request.users[0].preferences[0];

        let email: serde_json::Value =
            serde_json::from_str(&prefs.email_notification_preferences).unwrap();
        assert_eq!(email["generalEmail"]["sendEmails"], false);
        assert_eq!(email["eventEmails"]["tagIds"].as_array().unwrap().len(), 6);

        let app: serde_json::Value =
            serde_json::from_str(&prefs.app_notification_preferences).unwrap();
        assert_eq!(app["orderFillApp"]["hideSmallFills"], true);

        let update = PreferencesUpdate::opt_in_all();
        let email: serde_json::Value =
            serde_json::from_str(&update.email_notification_preferences).unwrap();
        assert_eq!(email["resolutionEmails"]["sendEmails"], true);
    }

    #[test]
    fn test_email_preferences_toggle_every_category() {
        for send in [false, true] {
            let email: serde_json::Value = serde_json::from_str(&email_preferences(send)).unwrap();
            let categories = email.as_object().unwrap();

            assert_eq!(categories.len(), 7);
            for (name, category) in categories {
                assert_eq!(category["sendEmails"], send, "{name}");
            }
            assert_eq!(
                email["eventEmails"]["tagIds"],
                json!(["2", "21", "1", "107", "596", "74"])
            );
            assert_eq!(email["orderFillEmails"]["hideSmallFills"], true);
        }
    }

    #[test]
    fn test_profile_record_preference_id() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "id": "4242",
            "name": "whatever",
            "user": 17,
            "createdAt": "2024-01-01T00:00:00Z",
            "users": [{
                "id": "17",
                "address": "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf",
                "preferences": [{ "id": "99", "marketInterests": "[]" }],
                "walletPreferences": [{ "id": "5" }]
            }]
        }))
        .unwrap();

        assert_eq!(record.id, "4242");
        assert_eq!(record.preference_id(), Some("99"));
    }

    #[test]
    fn test_profile_record_without_preferences() {
        let record: ProfileRecord = serde_json::from_value(json!({ "id": "1" })).unwrap();
        assert_eq!(record.preference_id(), None);
    }

    #[test]
    fn test_display_name_update() {
        let value = serde_json::to_value(DisplayNameUpdate::new("brave-otter")).unwrap();
        assert_eq!(
            value,
            json!({ "displayUsernamePublic": true, "name": "brave-otter", "referral": "" })
        );
    }
}
