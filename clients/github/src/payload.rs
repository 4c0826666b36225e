use serde::Deserialize;
use top_contributors::api::{SearchEnvelope, UpstreamUser};

#[derive(Deserialize, Debug)]
pub struct SearchUsers {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default, rename = "incomplete_results")]
    pub incomplete: bool,
    pub items: Vec<User>,
}

#[derive(Deserialize, Debug)]
pub struct User {
    pub id: i64,
    pub login: String,
}

impl From<User> for UpstreamUser {
    fn from(user: User) -> Self {
        UpstreamUser {
            id: user.id,
            login: user.login,
        }
    }
}

impl From<SearchUsers> for SearchEnvelope {
    fn from(body: SearchUsers) -> Self {
        SearchEnvelope {
            total_count: body.total_count,
            incomplete: body.incomplete,
            items: body.items.into_iter().map(UpstreamUser::from).collect(),
        }
    }
}

#[test]
fn search_users_decode_test() {
    let body = r#"{
        "total_count": 2,
        "incomplete_results": true,
        "items": [
            { "login": "alice", "id": 7, "type": "User", "score": 1.0 },
            { "login": "bob", "id": 3, "type": "User", "score": 1.0 }
        ]
    }"#;
    let envelope = SearchEnvelope::from(serde_json::from_str::<SearchUsers>(body).unwrap());
    assert_eq!(envelope.total_count, 2);
    assert!(envelope.incomplete);
    assert_eq!(
        envelope.items,
        vec![
            UpstreamUser::new(7, "alice".to_string()),
            UpstreamUser::new(3, "bob".to_string()),
        ]
    );
}

#[test]
fn search_users_without_items_fails_test() {
    assert!(serde_json::from_str::<SearchUsers>(r#"{"total_count": 5}"#).is_err());
}
